//! Context builder
//!
//! Turns retrieval results into the typed [`Context`] handed to rendering.
//! Degenerate results (zero count, zero or non-finite aggregate, blank or
//! non-finite comparison winner) never produce a non-empty context.

use crate::error::PipelineError;
use crate::models::{
    AggregateContext, AggregateResult, ComparisonContext, ComparisonResult, Context,
    CountContext, CountResult, DataSource, EmptyContext, EntityType, Metric, RetrievalResult,
};
use crate::retrieval::Query;
use crate::Result;

pub const DEFAULT_EMPTY_REASON: &str = "No data found in provided files.";
pub const UNSUPPORTED_QUERY_REASON: &str = "Unsupported or incomplete query.";

pub struct ContextBuilder;

impl ContextBuilder {
    pub fn build_count_context(
        entity_type: EntityType,
        entity_name: &str,
        count: usize,
        source: DataSource,
    ) -> Result<Context> {
        if count == 0 {
            return Err(PipelineError::EmptyContext("Count result is empty.".to_string()));
        }

        Ok(Context::Count(CountContext {
            entity_type,
            entity_name: entity_name.to_string(),
            result: CountResult { count },
            data_source: source,
        }))
    }

    /// An exact 0.0 is treated as "no data", even though a fund can
    /// legitimately net to zero P&L. NaN and infinite sums are rejected too.
    pub fn build_aggregate_context(
        entity_type: EntityType,
        entity_name: &str,
        metric: Metric,
        value: f64,
        source: DataSource,
    ) -> Result<Context> {
        if value == 0.0 {
            return Err(PipelineError::EmptyContext(
                "Aggregate result is zero or empty.".to_string(),
            ));
        }
        if !value.is_finite() {
            return Err(PipelineError::EmptyContext(format!(
                "Aggregate result {} is not a finite number.",
                value
            )));
        }

        Ok(Context::Aggregate(AggregateContext {
            entity_type,
            entity_name: entity_name.to_string(),
            metric,
            result: AggregateResult { value },
            data_source: source,
        }))
    }

    pub fn build_comparison_context(
        metric: Metric,
        best_entity: &str,
        best_value: f64,
        source: DataSource,
    ) -> Result<Context> {
        if best_entity.is_empty() {
            return Err(PipelineError::EmptyContext(
                "Comparison result is empty.".to_string(),
            ));
        }
        if !best_value.is_finite() {
            return Err(PipelineError::EmptyContext(format!(
                "Comparison value {} is not a finite number.",
                best_value
            )));
        }

        Ok(Context::Compare(ComparisonContext {
            metric,
            result: ComparisonResult {
                best_entity: best_entity.to_string(),
                best_value,
            },
            data_source: source,
        }))
    }

    pub fn build_empty_context(reason: Option<&str>) -> Context {
        Context::Empty(EmptyContext {
            reason: reason.unwrap_or(DEFAULT_EMPTY_REASON).to_string(),
        })
    }

    /// Context constructor for a dispatched query and its result.
    pub fn from_retrieval(query: &Query, result: RetrievalResult) -> Result<Context> {
        match (query, result) {
            (Query::CountHoldings { fund }, RetrievalResult::Count(count)) => {
                Self::build_count_context(EntityType::Fund, fund, count, DataSource::Holdings)
            }
            (Query::CountTrades { fund }, RetrievalResult::Count(count)) => {
                Self::build_count_context(EntityType::Fund, fund, count, DataSource::Trades)
            }
            (Query::AggregatePlYtd { fund }, RetrievalResult::Aggregate { metric, value }) => {
                Self::build_aggregate_context(
                    EntityType::Fund,
                    fund,
                    metric,
                    value,
                    DataSource::Holdings,
                )
            }
            (
                Query::BestPerformingFundYtd,
                RetrievalResult::Comparison {
                    best_entity,
                    best_value,
                },
            ) => Self::build_comparison_context(
                Metric::PlYtd,
                &best_entity,
                best_value,
                DataSource::Holdings,
            ),
            (query, result) => Err(PipelineError::EmptyContext(format!(
                "Result {:?} does not answer {:?}",
                result, query
            ))),
        }
    }
}
