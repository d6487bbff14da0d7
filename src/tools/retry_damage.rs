use rmcp::{
    ErrorData as McpError,
    handler::server::wrapper::Parameters,
    model::CallToolResult,
    schemars::JsonSchema,
};
use serde::Deserialize;

use crate::{
    damage::{AngleType, DamageType},
    generator::DamageSimulator,
    tools::{ToolResponse, generation_failed, success_json},
};

#[derive(Debug, Deserialize, JsonSchema)]
pub struct RetryDamageRequest {
    #[schemars(description = "Product photo as a data: image URI, or a bare base64 payload")]
    pub image: String,
    #[schemars(description = "Damage category to simulate")]
    pub damage_type: DamageType,
    #[schemars(description = "Optional free-text details for the damage")]
    pub custom_instruction: Option<String>,
    #[schemars(description = "Optional camera angle change; 'original' keeps the source perspective")]
    pub angle: Option<AngleType>,
    #[schemars(description = "Downscale and re-encode the photo before sending (default true)")]
    pub compress: Option<bool>,
}

/// Resends a request the user was not happy with: any cached entry is ignored
/// and the fresh result overwrites it.
pub async fn retry_damage(
    simulator: &DamageSimulator,
    Parameters(request): Parameters<RetryDamageRequest>,
) -> Result<CallToolResult, McpError> {
    let instruction = request.custom_instruction.unwrap_or_default();
    let image = simulator
        .regenerate(
            &request.image,
            request.damage_type,
            &instruction,
            request.angle,
            request.compress.unwrap_or(true),
        )
        .await
        .map_err(generation_failed)?;

    success_json(&ToolResponse {
        image,
        mime_type: "image/png".to_string(),
        text: "Fresh damage simulation complete.".to_string(),
    })
}
