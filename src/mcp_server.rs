use std::sync::Arc;

use rmcp::{
    ErrorData as McpError, ServerHandler,
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::{CallToolResult, ServerCapabilities, ServerInfo},
    tool, tool_handler, tool_router,
};

use crate::cache::ResponseCache;
use crate::generator::DamageSimulator;
use crate::tools::{RetryDamageRequest, SimulateDamageRequest};

#[derive(Clone)]
pub struct DamageSimServer {
    tool_router: ToolRouter<Self>,
    simulator: Arc<DamageSimulator>,
    cache: Arc<ResponseCache>,
}

impl DamageSimServer {
    pub fn new(simulator: Arc<DamageSimulator>, cache: Arc<ResponseCache>) -> Self {
        Self {
            tool_router: Self::tool_router(),
            simulator,
            cache,
        }
    }
}

#[tool_router]
impl DamageSimServer {
    #[tool(
        description = "Simulate damage on a product photo while preserving the product's identity. Accepts a data: image URI, a damage type from list_damage_types, optional free-text details and an optional camera angle. Returns the edited image as a data: URI; repeated identical requests are served from cache. Warn the user that a fresh generation may take a while."
    )]
    async fn simulate_damage(
        &self,
        Parameters(request): Parameters<SimulateDamageRequest>,
    ) -> Result<CallToolResult, McpError> {
        crate::tools::simulate_damage(&self.simulator, Parameters(request)).await
    }

    #[tool(
        description = "Redo a damage simulation the user was not happy with: ignores the cached result for this exact request and generates a fresh image, replacing the cached entry."
    )]
    async fn retry_damage(
        &self,
        Parameters(request): Parameters<RetryDamageRequest>,
    ) -> Result<CallToolResult, McpError> {
        crate::tools::retry_damage(&self.simulator, Parameters(request)).await
    }

    #[tool(description = "List the available damage types and camera angles with their descriptions.")]
    async fn list_damage_types(&self) -> Result<CallToolResult, McpError> {
        crate::tools::list_damage_types().await
    }

    #[tool(description = "Report how many generations are currently cached.")]
    async fn cache_status(&self) -> Result<CallToolResult, McpError> {
        crate::tools::cache_status(&self.cache).await
    }

    #[tool(description = "Drop every cached generation (full state reset).")]
    async fn clear_cache(&self) -> Result<CallToolResult, McpError> {
        crate::tools::clear_cache(&self.cache).await
    }
}

#[tool_handler]
impl ServerHandler for DamageSimServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }
}
