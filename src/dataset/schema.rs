//! Required column sets for the dataset files

use crate::error::PipelineError;
use crate::Result;

pub const HOLDINGS_FILE: &str = "holdings.csv";
pub const TRADES_FILE: &str = "trades.csv";

pub const HOLDINGS_REQUIRED_COLUMNS: &[&str] = &[
    "PortfolioName",
    "SecName",
    "Qty",
    "PL_DTD",
    "PL_MTD",
    "PL_QTD",
    "PL_YTD",
];

pub const TRADES_REQUIRED_COLUMNS: &[&str] = &["PortfolioName", "TradeTypeName"];

/// Fails with [`PipelineError::Schema`] listing every required column the
/// header row lacks, in required-set order.
pub fn check_required_columns(
    file: &str,
    headers: &csv::StringRecord,
    required: &[&str],
) -> Result<()> {
    let missing: Vec<String> = required
        .iter()
        .filter(|column| !headers.iter().any(|h| h.trim() == **column))
        .map(|column| column.to_string())
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(PipelineError::Schema {
            file: file.to_string(),
            missing,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_superset_of_required_columns() {
        let headers = csv::StringRecord::from(vec!["PortfolioName", "TradeTypeName", "Extra"]);
        assert!(check_required_columns(TRADES_FILE, &headers, TRADES_REQUIRED_COLUMNS).is_ok());
    }

    #[test]
    fn reports_all_missing_columns() {
        let headers = csv::StringRecord::from(vec!["PortfolioName", "SecName", "Qty"]);

        match check_required_columns(HOLDINGS_FILE, &headers, HOLDINGS_REQUIRED_COLUMNS) {
            Err(PipelineError::Schema { file, missing }) => {
                assert_eq!(file, HOLDINGS_FILE);
                assert_eq!(missing, vec!["PL_DTD", "PL_MTD", "PL_QTD", "PL_YTD"]);
            }
            other => panic!("expected schema error, got {:?}", other),
        }
    }
}
