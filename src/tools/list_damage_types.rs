use rmcp::{ErrorData as McpError, model::CallToolResult};
use serde::Serialize;

use crate::damage::{AngleType, DamageType};
use crate::tools::success_json;

#[derive(Serialize)]
struct CatalogEntry {
    name: &'static str,
    description: &'static str,
}

#[derive(Serialize)]
struct Catalog {
    damage_types: Vec<CatalogEntry>,
    angles: Vec<CatalogEntry>,
}

/// Enumerates the damage and angle catalogs so a client can render its
/// selection controls.
pub async fn list_damage_types() -> Result<CallToolResult, McpError> {
    let catalog = Catalog {
        damage_types: DamageType::ALL
            .iter()
            .map(|damage| CatalogEntry {
                name: damage.tag(),
                description: damage.description(),
            })
            .collect(),
        angles: AngleType::ALL
            .iter()
            .map(|angle| CatalogEntry {
                name: angle.tag(),
                description: angle.label(),
            })
            .collect(),
    };
    success_json(&catalog)
}
