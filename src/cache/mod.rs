mod key;
mod store;

pub use key::CacheKey;
pub use store::{
    CacheEntry, CacheError, CacheStats, CacheStore, DEFAULT_EXPIRATION_DAYS, INDEX_FILE,
};
