pub mod fingerprint;
pub mod response_cache;

pub use fingerprint::{cache_key, structural_hash};
pub use response_cache::{
    CachedGeneration, Clock, DEFAULT_TTL_HOURS, ResponseCache, SystemClock, spawn_sweeper,
};
