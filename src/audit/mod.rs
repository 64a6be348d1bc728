//! Context fingerprints
//!
//! Every context that reaches the renderer is hashed and logged with the
//! request id, so a rendered answer can be traced to the exact facts it was
//! given. Nothing is stored.

use crate::models::Context;
use sha2::{Digest, Sha256};
use std::io::Write;

/// SHA256 of the context's JSON encoding, hex encoded
/// Uses zero-copy streaming serialization into hasher
pub fn compute_context_hash(context: &Context) -> String {
    let mut hasher = Sha256::new();

    // Stream JSON directly into hasher (no intermediate String)
    if serde_json::to_writer(&mut HashWriter(&mut hasher), context).is_err() {
        return String::new();
    }

    hex::encode(hasher.finalize())
}

/// Adapter to allow writing into Sha256 via std::io::Write
struct HashWriter<'a, H: Digest>(&'a mut H);

impl<'a, H: Digest> Write for HashWriter<'a, H> {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.update(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::ContextBuilder;
    use crate::models::{DataSource, EntityType};

    fn count(n: usize) -> Context {
        ContextBuilder::build_count_context(EntityType::Fund, "Alpha Fund", n, DataSource::Holdings)
            .unwrap()
    }

    #[test]
    fn hash_is_stable_and_content_sensitive() {
        let first = compute_context_hash(&count(7));

        assert_eq!(first.len(), 64);
        assert_eq!(first, compute_context_hash(&count(7)));
        assert_ne!(first, compute_context_hash(&count(8)));
    }

    #[test]
    fn hash_matches_serialized_bytes() {
        let context = count(7);
        let bytes = serde_json::to_vec(&context).unwrap();
        assert_eq!(compute_context_hash(&context), hex::encode(Sha256::digest(&bytes)));
    }
}
