use rmcp::{ErrorData as McpError, model::CallToolResult};
use serde::Serialize;

use crate::cache::ResponseCache;
use crate::tools::success_json;

#[derive(Serialize)]
struct CacheStatusResponse {
    entries: usize,
}

pub async fn cache_status(cache: &ResponseCache) -> Result<CallToolResult, McpError> {
    success_json(&CacheStatusResponse {
        entries: cache.len(),
    })
}

#[derive(Serialize)]
struct ClearCacheResponse {
    cleared: usize,
}

pub async fn clear_cache(cache: &ResponseCache) -> Result<CallToolResult, McpError> {
    let cleared = cache.len();
    cache.clear();
    success_json(&ClearCacheResponse { cleared })
}
