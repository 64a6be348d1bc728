//! Core data models for the fund chatbot

use serde::{Deserialize, Serialize};
use std::fmt;

//
// ================= Intent =================
//

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum Intent {
    Count,
    Aggregate,
    Compare,
    Unsupported,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Metric {
    #[serde(rename = "PL_YTD")]
    PlYtd,
    #[serde(rename = "holdings_count")]
    HoldingsCount,
    #[serde(rename = "trades_count")]
    TradesCount,
}

/// Structured classification of a question.
///
/// `entity` and `metric` default to `None` when the classifier omits them,
/// while unknown intent or metric strings, and extra keys, are rejected at
/// parse time.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct IntentDescriptor {
    pub intent: Intent,
    #[serde(default)]
    pub entity: Option<String>,
    #[serde(default)]
    pub metric: Option<Metric>,
}

impl IntentDescriptor {
    pub fn new(intent: Intent, entity: Option<&str>, metric: Option<Metric>) -> Self {
        Self {
            intent,
            entity: entity.map(str::to_string),
            metric,
        }
    }

    pub fn unsupported() -> Self {
        Self::new(Intent::Unsupported, None, None)
    }
}

//
// ================= Retrieval =================
//

#[derive(Debug, Clone, PartialEq)]
pub enum RetrievalResult {
    Count(usize),
    Aggregate { metric: Metric, value: f64 },
    Comparison { best_entity: String, best_value: f64 },
}

//
// ================= Context =================
//

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum EntityType {
    Fund,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum DataSource {
    #[serde(rename = "holdings.csv")]
    Holdings,
    #[serde(rename = "trades.csv")]
    Trades,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum ContextType {
    Count,
    Aggregate,
    Compare,
    Empty,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CountResult {
    pub count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AggregateResult {
    pub value: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ComparisonResult {
    pub best_entity: String,
    pub best_value: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CountContext {
    pub entity_type: EntityType,
    pub entity_name: String,
    pub result: CountResult,
    pub data_source: DataSource,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AggregateContext {
    pub entity_type: EntityType,
    pub entity_name: String,
    pub metric: Metric,
    pub result: AggregateResult,
    pub data_source: DataSource,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ComparisonContext {
    pub metric: Metric,
    pub result: ComparisonResult,
    pub data_source: DataSource,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EmptyContext {
    pub reason: String,
}

/// The only channel through which facts reach the renderer.
///
/// Serializes with a `context_type` tag next to the variant's fields.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "context_type", rename_all = "UPPERCASE")]
pub enum Context {
    Count(CountContext),
    Aggregate(AggregateContext),
    Compare(ComparisonContext),
    Empty(EmptyContext),
}

impl Context {
    pub fn context_type(&self) -> ContextType {
        match self {
            Context::Count(_) => ContextType::Count,
            Context::Aggregate(_) => ContextType::Aggregate,
            Context::Compare(_) => ContextType::Compare,
            Context::Empty(_) => ContextType::Empty,
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Metric::PlYtd => "PL_YTD",
            Metric::HoldingsCount => "holdings_count",
            Metric::TradesCount => "trades_count",
        };
        write!(f, "{}", s)
    }
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            DataSource::Holdings => "holdings.csv",
            DataSource::Trades => "trades.csv",
        };
        write!(f, "{}", s)
    }
}
