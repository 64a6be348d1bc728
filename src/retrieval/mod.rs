//! Retrieval engine for deterministic dataset queries
//!
//! Exact `PortfolioName` matching only, no case folding or fuzzy lookup.
//! LLM is NOT allowed here.

use crate::dataset::{Dataset, Holding};
use crate::error::PipelineError;
use crate::models::{Metric, RetrievalResult};
use crate::Result;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// The four retrieval shapes the pipeline can dispatch to.
#[derive(Debug, Clone, PartialEq)]
pub enum Query {
    CountHoldings { fund: String },
    CountTrades { fund: String },
    AggregatePlYtd { fund: String },
    BestPerformingFundYtd,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FundPerformance {
    pub fund: String,
    pub pl_ytd: f64,
}

/// Stateless query executor over a shared, read-only dataset
#[derive(Clone)]
pub struct RetrievalEngine {
    dataset: Arc<Dataset>,
}

impl RetrievalEngine {
    pub fn new(dataset: Arc<Dataset>) -> Self {
        Self { dataset }
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn execute(&self, query: &Query) -> Result<RetrievalResult> {
        debug!(?query, "Executing retrieval");

        let result = match query {
            Query::CountHoldings { fund } => RetrievalResult::Count(self.count_holdings(fund)?),
            Query::CountTrades { fund } => RetrievalResult::Count(self.count_trades(fund)?),
            Query::AggregatePlYtd { fund } => RetrievalResult::Aggregate {
                metric: Metric::PlYtd,
                value: self.aggregate_pl_ytd(fund)?,
            },
            Query::BestPerformingFundYtd => {
                let best = self.best_performing_fund_ytd()?;
                RetrievalResult::Comparison {
                    best_entity: best.fund,
                    best_value: best.pl_ytd,
                }
            }
        };

        Ok(result)
    }

    pub fn count_holdings(&self, fund_name: &str) -> Result<usize> {
        Ok(self.fund_holdings(fund_name)?.len())
    }

    pub fn count_trades(&self, fund_name: &str) -> Result<usize> {
        let count = self
            .dataset
            .trades()
            .iter()
            .filter(|t| t.portfolio_name == fund_name)
            .count();

        if count == 0 {
            return Err(fund_not_found(fund_name));
        }
        Ok(count)
    }

    /// Sum of PL_YTD over the fund's holdings. A known fund may sum to 0.0;
    /// that is not an error here.
    pub fn aggregate_pl_ytd(&self, fund_name: &str) -> Result<f64> {
        let rows = self.fund_holdings(fund_name)?;
        Ok(sum_pl_ytd(rows.iter().copied()))
    }

    /// Fund with the highest summed PL_YTD. On ties the fund that appears
    /// first in the holdings file wins. Funds whose total is not finite
    /// are passed over.
    pub fn best_performing_fund_ytd(&self) -> Result<FundPerformance> {
        let holdings = self.dataset.holdings();
        if holdings.is_empty() {
            return Err(PipelineError::NoData(
                "No holdings data available for comparison.".to_string(),
            ));
        }

        // per-fund totals in first-seen order
        let mut index: HashMap<&str, usize> = HashMap::new();
        let mut totals: Vec<(&str, f64)> = Vec::new();

        for holding in holdings {
            let name = holding.portfolio_name.as_str();
            let slot = *index.entry(name).or_insert_with(|| {
                totals.push((name, 0.0));
                totals.len() - 1
            });
            if let Some(value) = holding.pl_ytd.filter(|v| !v.is_nan()) {
                totals[slot].1 += value;
            }
        }

        let mut best: Option<(&str, f64)> = None;
        for (fund, total) in totals {
            if !total.is_finite() {
                continue;
            }
            match best {
                Some((_, current)) if total <= current => {}
                _ => best = Some((fund, total)),
            }
        }

        best.map(|(fund, pl_ytd)| FundPerformance {
            fund: fund.to_string(),
            pl_ytd,
        })
        .ok_or_else(|| {
            PipelineError::NoData("No holdings data available for comparison.".to_string())
        })
    }

    fn fund_holdings(&self, fund_name: &str) -> Result<Vec<&Holding>> {
        let rows: Vec<&Holding> = self
            .dataset
            .holdings()
            .iter()
            .filter(|h| h.portfolio_name == fund_name)
            .collect();

        if rows.is_empty() {
            return Err(fund_not_found(fund_name));
        }
        Ok(rows)
    }
}

/// Missing and NaN cells are skipped.
fn sum_pl_ytd<'a>(rows: impl Iterator<Item = &'a Holding>) -> f64 {
    rows.filter_map(|h| h.pl_ytd)
        .filter(|v| !v.is_nan())
        .sum()
}

fn fund_not_found(fund_name: &str) -> PipelineError {
    PipelineError::FundNotFound(format!("Fund '{}' not found.", fund_name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::Trade;

    fn engine() -> RetrievalEngine {
        let holdings = vec![
            Holding::new("Alpha Fund", "AAPL", 40.0),
            Holding::new("Beta Fund", "TSLA", 200.0),
            Holding::new("Alpha Fund", "MSFT", 60.0),
            Holding::new("Beta Fund", "NVDA", 50.0),
            Holding::new("Empty Fund", "CASH", 5.0),
            Holding::new("Empty Fund", "BOND", -5.0),
        ];
        let trades = vec![
            Trade::new("Alpha Fund", "Buy"),
            Trade::new("Alpha Fund", "Sell"),
            Trade::new("Gamma Fund", "Buy"),
        ];
        RetrievalEngine::new(Arc::new(Dataset::new(holdings, trades)))
    }

    #[test]
    fn counts_match_row_counts() {
        let engine = engine();
        assert_eq!(engine.count_holdings("Alpha Fund").unwrap(), 2);
        assert_eq!(engine.count_holdings("Empty Fund").unwrap(), 2);
        assert_eq!(engine.count_trades("Alpha Fund").unwrap(), 2);
        assert_eq!(engine.count_trades("Gamma Fund").unwrap(), 1);
    }

    #[test]
    fn unknown_fund_is_not_found_everywhere() {
        let engine = engine();
        assert_eq!(engine.count_holdings("Nope").unwrap_err().kind(), "fund_not_found");
        assert_eq!(engine.count_trades("Nope").unwrap_err().kind(), "fund_not_found");
        assert_eq!(engine.aggregate_pl_ytd("Nope").unwrap_err().kind(), "fund_not_found");
    }

    #[test]
    fn matching_is_exact() {
        let engine = engine();
        assert!(engine.count_holdings("alpha fund").is_err());
        assert!(engine.count_holdings("Alpha Fund ").is_err());
        // trades-only fund has no holdings
        assert!(engine.count_holdings("Gamma Fund").is_err());
    }

    #[test]
    fn aggregate_sums_pl_ytd() {
        let engine = engine();
        assert_eq!(engine.aggregate_pl_ytd("Alpha Fund").unwrap(), 100.0);
        assert_eq!(engine.aggregate_pl_ytd("Empty Fund").unwrap(), 0.0);
    }

    #[test]
    fn aggregate_skips_missing_cells() {
        let mut blank = Holding::new("Alpha Fund", "GOOG", 0.0);
        blank.pl_ytd = None;
        let dataset = Dataset::new(vec![Holding::new("Alpha Fund", "AAPL", 12.5), blank], vec![]);
        let engine = RetrievalEngine::new(Arc::new(dataset));

        assert_eq!(engine.aggregate_pl_ytd("Alpha Fund").unwrap(), 12.5);
    }

    #[test]
    fn best_fund_has_highest_sum() {
        let best = engine().best_performing_fund_ytd().unwrap();
        assert_eq!(
            best,
            FundPerformance {
                fund: "Beta Fund".to_string(),
                pl_ytd: 250.0
            }
        );
    }

    #[test]
    fn best_fund_tie_goes_to_first_seen() {
        let dataset = Dataset::new(
            vec![
                Holding::new("Second", "X", 10.0),
                Holding::new("First", "Y", 10.0),
            ],
            vec![],
        );
        let best = RetrievalEngine::new(Arc::new(dataset))
            .best_performing_fund_ytd()
            .unwrap();
        assert_eq!(best.fund, "Second");
    }

    #[test]
    fn best_fund_handles_all_negative_sums() {
        let dataset = Dataset::new(
            vec![
                Holding::new("A", "X", -30.0),
                Holding::new("B", "Y", -10.0),
            ],
            vec![],
        );
        let best = RetrievalEngine::new(Arc::new(dataset))
            .best_performing_fund_ytd()
            .unwrap();
        assert_eq!(best.fund, "B");
        assert_eq!(best.pl_ytd, -10.0);
    }

    #[test]
    fn best_fund_skips_non_finite_totals() {
        let dataset = Dataset::new(
            vec![
                Holding::new("Broken", "X", f64::INFINITY),
                Holding::new("Broken", "Y", f64::NEG_INFINITY),
                Holding::new("Steady", "Z", 5.0),
            ],
            vec![],
        );
        let engine = RetrievalEngine::new(Arc::new(dataset));

        assert!(engine.aggregate_pl_ytd("Broken").unwrap().is_nan());
        assert_eq!(engine.best_performing_fund_ytd().unwrap().fund, "Steady");

        let dataset = Dataset::new(vec![Holding::new("Broken", "X", f64::INFINITY)], vec![]);
        let engine = RetrievalEngine::new(Arc::new(dataset));
        assert_eq!(engine.best_performing_fund_ytd().unwrap_err().kind(), "no_data");
    }

    #[test]
    fn best_fund_on_empty_holdings_is_no_data() {
        let engine = RetrievalEngine::new(Arc::new(Dataset::default()));
        assert_eq!(engine.best_performing_fund_ytd().unwrap_err().kind(), "no_data");
    }

    #[test]
    fn execute_maps_queries_to_results() {
        let engine = engine();

        assert_eq!(
            engine
                .execute(&Query::CountTrades { fund: "Alpha Fund".to_string() })
                .unwrap(),
            RetrievalResult::Count(2)
        );
        assert_eq!(
            engine
                .execute(&Query::AggregatePlYtd { fund: "Alpha Fund".to_string() })
                .unwrap(),
            RetrievalResult::Aggregate { metric: Metric::PlYtd, value: 100.0 }
        );
        assert_eq!(
            engine.execute(&Query::BestPerformingFundYtd).unwrap(),
            RetrievalResult::Comparison {
                best_entity: "Beta Fund".to_string(),
                best_value: 250.0
            }
        );
    }
}
