use fund_rag_chatbot::{bootstrap, config::Config};
use tracing::info;

/// One-shot question from the command line:
/// `ask How many holdings does Alpha Fund have?`
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();
    bootstrap::init_tracing();

    let question = std::env::args().skip(1).collect::<Vec<_>>().join(" ");
    if question.trim().is_empty() {
        eprintln!("usage: ask <question>");
        std::process::exit(2);
    }

    let config = Config::from_env()?;
    let pipeline = bootstrap::build_pipeline(&config)?;

    let outcome = pipeline.run(&question).await;

    info!(
        request_id = %outcome.request_id,
        stages = ?outcome.stages,
        failure = ?outcome.failure,
        "Question processed"
    );

    println!("{}", outcome.answer);
    Ok(())
}
