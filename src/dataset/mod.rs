//! In-memory fund dataset
//!
//! Holdings and trades are read once at startup and never mutated.
//! Everything downstream holds the dataset behind an `Arc`.

use crate::error::PipelineError;
use crate::Result;
use serde::Deserialize;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::info;

pub mod schema;

use schema::{
    check_required_columns, HOLDINGS_FILE, HOLDINGS_REQUIRED_COLUMNS, TRADES_FILE,
    TRADES_REQUIRED_COLUMNS,
};

/// One row of `holdings.csv`. Numeric cells that are empty or unparseable
/// load as `None`.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct Holding {
    #[serde(rename = "PortfolioName")]
    pub portfolio_name: String,
    #[serde(rename = "SecName")]
    pub sec_name: String,
    #[serde(rename = "Qty", deserialize_with = "csv::invalid_option")]
    pub qty: Option<f64>,
    #[serde(rename = "PL_DTD", deserialize_with = "csv::invalid_option")]
    pub pl_dtd: Option<f64>,
    #[serde(rename = "PL_MTD", deserialize_with = "csv::invalid_option")]
    pub pl_mtd: Option<f64>,
    #[serde(rename = "PL_QTD", deserialize_with = "csv::invalid_option")]
    pub pl_qtd: Option<f64>,
    #[serde(rename = "PL_YTD", deserialize_with = "csv::invalid_option")]
    pub pl_ytd: Option<f64>,
}

impl Holding {
    /// Row with only the fields retrieval reads; the rest are left empty.
    pub fn new(portfolio_name: &str, sec_name: &str, pl_ytd: f64) -> Self {
        Self {
            portfolio_name: portfolio_name.to_string(),
            sec_name: sec_name.to_string(),
            qty: None,
            pl_dtd: None,
            pl_mtd: None,
            pl_qtd: None,
            pl_ytd: Some(pl_ytd),
        }
    }
}

/// One row of `trades.csv`.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct Trade {
    #[serde(rename = "PortfolioName")]
    pub portfolio_name: String,
    #[serde(rename = "TradeTypeName")]
    pub trade_type_name: String,
}

impl Trade {
    pub fn new(portfolio_name: &str, trade_type_name: &str) -> Self {
        Self {
            portfolio_name: portfolio_name.to_string(),
            trade_type_name: trade_type_name.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Dataset {
    holdings: Vec<Holding>,
    trades: Vec<Trade>,
}

impl Dataset {
    pub fn new(holdings: Vec<Holding>, trades: Vec<Trade>) -> Self {
        Self { holdings, trades }
    }

    /// Load `holdings.csv` and `trades.csv` from `data_dir`.
    pub fn load(data_dir: impl AsRef<Path>) -> Result<Self> {
        let data_dir = data_dir.as_ref();

        let holdings = read_holdings(File::open(data_dir.join(HOLDINGS_FILE))?)?;
        let trades = read_trades(File::open(data_dir.join(TRADES_FILE))?)?;

        info!(
            data_dir = %data_dir.display(),
            holdings_rows = holdings.len(),
            trades_rows = trades.len(),
            "Dataset loaded"
        );

        Ok(Self::new(holdings, trades))
    }

    pub fn holdings(&self) -> &[Holding] {
        &self.holdings
    }

    pub fn trades(&self) -> &[Trade] {
        &self.trades
    }
}

pub fn read_holdings<R: Read>(reader: R) -> Result<Vec<Holding>> {
    let rows: Vec<Holding> = read_rows(reader, HOLDINGS_FILE, HOLDINGS_REQUIRED_COLUMNS)?;
    ensure_portfolio_names(HOLDINGS_FILE, rows.iter().map(|h| h.portfolio_name.as_str()))?;
    Ok(rows)
}

pub fn read_trades<R: Read>(reader: R) -> Result<Vec<Trade>> {
    let rows: Vec<Trade> = read_rows(reader, TRADES_FILE, TRADES_REQUIRED_COLUMNS)?;
    ensure_portfolio_names(TRADES_FILE, rows.iter().map(|t| t.portfolio_name.as_str()))?;
    Ok(rows)
}

fn read_rows<R, T>(reader: R, file: &str, required: &[&str]) -> Result<Vec<T>>
where
    R: Read,
    T: serde::de::DeserializeOwned,
{
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::Headers)
        .from_reader(reader);

    let headers = reader.headers()?.clone();
    check_required_columns(file, &headers, required)?;

    reader
        .deserialize()
        .map(|row| row.map_err(PipelineError::from))
        .collect()
}

fn ensure_portfolio_names<'a>(file: &str, names: impl Iterator<Item = &'a str>) -> Result<()> {
    for (index, name) in names.enumerate() {
        if name.is_empty() {
            // +2: header line, then 1-based rows
            return Err(PipelineError::Dataset(format!(
                "{} line {} has no PortfolioName",
                file,
                index + 2
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const HOLDINGS_CSV: &str = "\
PortfolioName,SecName,Qty,PL_DTD,PL_MTD,PL_QTD,PL_YTD,Custodian
Alpha Fund,AAPL,100,1.5,2.5,3.5,10.0,Bank A
Alpha Fund,MSFT,50,,,,-4.0,Bank A
Beta Fund,TSLA,10,0,0,0,n/a,Bank B
";

    #[test]
    fn reads_holdings_and_ignores_extra_columns() {
        let rows = read_holdings(HOLDINGS_CSV.as_bytes()).unwrap();

        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].portfolio_name, "Alpha Fund");
        assert_eq!(rows[0].qty, Some(100.0));
        assert_eq!(rows[0].pl_ytd, Some(10.0));
        assert_eq!(rows[1].pl_dtd, None);
        assert_eq!(rows[2].pl_ytd, None);
    }

    #[test]
    fn missing_holdings_column_is_a_schema_error() {
        let csv = "PortfolioName,SecName,Qty,PL_DTD,PL_MTD,PL_QTD\nAlpha Fund,AAPL,1,0,0,0\n";

        match read_holdings(csv.as_bytes()) {
            Err(PipelineError::Schema { file, missing }) => {
                assert_eq!(file, HOLDINGS_FILE);
                assert_eq!(missing, vec!["PL_YTD"]);
            }
            other => panic!("expected schema error, got {:?}", other),
        }
    }

    #[test]
    fn empty_trades_file_is_a_schema_error() {
        let err = read_trades("".as_bytes()).unwrap_err();
        assert_eq!(err.kind(), "schema");
    }

    #[test]
    fn blank_portfolio_name_is_rejected() {
        let csv = "PortfolioName,TradeTypeName\nAlpha Fund,Buy\n,Sell\n";

        let err = read_trades(csv.as_bytes()).unwrap_err();
        assert_eq!(err.kind(), "dataset");
        assert!(err.to_string().contains("line 3"));
    }

    #[test]
    fn loads_both_files_from_directory() {
        let dir = tempfile::tempdir().unwrap();

        let mut holdings = File::create(dir.path().join(HOLDINGS_FILE)).unwrap();
        holdings.write_all(HOLDINGS_CSV.as_bytes()).unwrap();

        let mut trades = File::create(dir.path().join(TRADES_FILE)).unwrap();
        trades
            .write_all(b"PortfolioName,TradeTypeName\nAlpha Fund,Buy\nBeta Fund,Sell\n")
            .unwrap();

        let dataset = Dataset::load(dir.path()).unwrap();
        assert_eq!(dataset.holdings().len(), 3);
        assert_eq!(dataset.trades().len(), 2);
    }

    #[test]
    fn missing_file_fails_load() {
        let dir = tempfile::tempdir().unwrap();
        let err = Dataset::load(dir.path()).unwrap_err();
        assert_eq!(err.kind(), "io");
    }
}
