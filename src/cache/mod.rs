//! Cache en memoria del gateway

pub mod reference_cache;

pub use reference_cache::{cache_key, CacheStats, ReferenceCache};
