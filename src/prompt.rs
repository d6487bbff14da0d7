use crate::damage::{AngleType, DamageType};

/// Builds the damage simulation prompt sent to the image model.
///
/// Clauses are emitted in a fixed order and joined with `". "`; the angle
/// instruction deliberately precedes the damage instruction so the model does
/// not conflate the perspective change with the damage effect. Empty clauses
/// are skipped and the result always ends with a single period.
pub fn build_damage_prompt(
    damage: DamageType,
    custom_instruction: &str,
    angle: Option<AngleType>,
) -> String {
    let angle_clause = match angle {
        Some(angle) if angle != AngleType::Original => format!(
            "Change the camera angle to a {} of the product while preserving all damage \
             characteristics, textures, and materials",
            angle.label().to_lowercase()
        ),
        _ => "Maintain original camera perspective".to_string(),
    };
    let damage_clause = format!("Simulate {} damage", damage.description());
    let custom = custom_instruction.trim();

    let instructions = [
        "Maintain product identity, shape, and all visual details",
        angle_clause.as_str(),
        damage_clause.as_str(),
        "Make damage photorealistic",
        custom,
    ]
    .into_iter()
    .filter(|clause| !clause.is_empty())
    .collect::<Vec<_>>()
    .join(". ");

    format!("{instructions}.")
}
