use rmcp::{
    ErrorData as McpError,
    handler::server::wrapper::Parameters,
    model::CallToolResult,
    schemars::JsonSchema,
};
use serde::Deserialize;

use crate::{
    damage::{AngleType, DamageType},
    generator::{DamageSimulator, GenerateOptions},
    tools::{ToolResponse, generation_failed, success_json},
};

#[derive(Debug, Deserialize, JsonSchema)]
pub struct SimulateDamageRequest {
    #[schemars(description = "Product photo as a data: image URI, or a bare base64 payload")]
    pub image: String,
    #[schemars(description = "Damage category to simulate")]
    pub damage_type: DamageType,
    #[schemars(description = "Optional free-text details for the damage")]
    pub custom_instruction: Option<String>,
    #[schemars(description = "Optional camera angle change; 'original' keeps the source perspective")]
    pub angle: Option<AngleType>,
    #[schemars(description = "Reuse a cached result for an identical request (default true)")]
    pub use_cache: Option<bool>,
    #[schemars(description = "Downscale and re-encode the photo before sending (default true)")]
    pub compress: Option<bool>,
}

pub async fn simulate_damage(
    simulator: &DamageSimulator,
    Parameters(request): Parameters<SimulateDamageRequest>,
) -> Result<CallToolResult, McpError> {
    let instruction = request.custom_instruction.unwrap_or_default();
    let options = GenerateOptions {
        use_cache: request.use_cache.unwrap_or(true),
        compress: request.compress.unwrap_or(true),
    };
    let image = simulator
        .generate(
            &request.image,
            request.damage_type,
            &instruction,
            request.angle,
            options,
        )
        .await
        .map_err(generation_failed)?;

    success_json(&ToolResponse {
        image,
        mime_type: "image/png".to_string(),
        text: "Damage simulation complete.".to_string(),
    })
}
