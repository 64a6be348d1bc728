//! Category gates on either side of retrieval
//!
//! These reject whole categories (unsupported intents, empty contexts).
//! Degenerate data is rejected earlier by the context builder.

use crate::error::PipelineError;
use crate::models::{Context, ContextType, Intent, IntentDescriptor};
use crate::Result;

pub struct Validator;

impl Validator {
    pub fn validate_intent(descriptor: &IntentDescriptor) -> Result<()> {
        if descriptor.intent == Intent::Unsupported {
            return Err(PipelineError::Validation("Unsupported query".to_string()));
        }
        Ok(())
    }

    pub fn validate_context(context: &Context) -> Result<()> {
        if context.context_type() == ContextType::Empty {
            return Err(PipelineError::Validation("Empty context".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::ContextBuilder;
    use crate::models::{DataSource, EntityType, Metric};

    #[test]
    fn unsupported_intent_is_rejected() {
        let err = Validator::validate_intent(&IntentDescriptor::unsupported()).unwrap_err();
        assert_eq!(err.kind(), "validation");
    }

    #[test]
    fn supported_intents_pass_even_when_incomplete() {
        // incomplete descriptors are caught by dispatch, not here
        for intent in [Intent::Count, Intent::Aggregate, Intent::Compare] {
            let descriptor = IntentDescriptor::new(intent, None, None);
            assert!(Validator::validate_intent(&descriptor).is_ok());
        }
    }

    #[test]
    fn empty_context_is_rejected() {
        let context = ContextBuilder::build_empty_context(None);
        assert_eq!(
            Validator::validate_context(&context).unwrap_err().kind(),
            "validation"
        );
    }

    #[test]
    fn populated_context_passes() {
        let context = ContextBuilder::build_comparison_context(
            Metric::PlYtd,
            "Beta Fund",
            250.0,
            DataSource::Holdings,
        )
        .unwrap();
        assert!(Validator::validate_context(&context).is_ok());

        let context =
            ContextBuilder::build_count_context(EntityType::Fund, "Alpha Fund", 7, DataSource::Holdings)
                .unwrap();
        assert!(Validator::validate_context(&context).is_ok());
    }
}
