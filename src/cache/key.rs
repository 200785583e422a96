use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;

/// Content-addressed identity of a cached artifact.
///
/// The SHA-256 of the (text, language, provider) tuple, hex-encoded. The text
/// is hashed as-is, so inputs differing only in whitespace get distinct keys.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CacheKey(String);

impl CacheKey {
    pub fn new(text: &str, language: &str, provider: &str) -> Self {
        // Encoding as a JSON object keeps field boundaries unambiguous:
        // ("ab", "c") and ("a", "bc") hash differently.
        let cache_input = serde_json::json!({
            "text": text,
            "language": language,
            "provider": provider,
        });

        let mut hasher = Sha256::new();
        hasher.update(cache_input.to_string().as_bytes());
        Self(hex::encode(hasher.finalize()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
