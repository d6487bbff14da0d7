use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Closed catalog of damage categories a user can pick.
///
/// Each variant carries a human-readable description that is interpolated
/// verbatim into the generation prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum DamageType {
    BrokenSeal,
    OpenPackage,
    TornPackaging,
    CrushedBox,
    MisalignedParts,
    Leakage,
    MissingParts,
    LabelDamaged,
    DirtyOrStained,
    Deformed,
    ImpactDamage,
    MoistureExposed,
    TemperatureDamage,
    BrokenInternal,
    SmallDamage,
    Scratches,
    Rust,
    Corrosion,
    SideDent,
}

impl DamageType {
    pub const ALL: [DamageType; 19] = [
        Self::BrokenSeal,
        Self::OpenPackage,
        Self::TornPackaging,
        Self::CrushedBox,
        Self::MisalignedParts,
        Self::Leakage,
        Self::MissingParts,
        Self::LabelDamaged,
        Self::DirtyOrStained,
        Self::Deformed,
        Self::ImpactDamage,
        Self::MoistureExposed,
        Self::TemperatureDamage,
        Self::BrokenInternal,
        Self::SmallDamage,
        Self::Scratches,
        Self::Rust,
        Self::Corrosion,
        Self::SideDent,
    ];

    /// Stable identifier, also the serialized form. Used in cache keys.
    pub fn tag(&self) -> &'static str {
        match self {
            Self::BrokenSeal => "broken_seal",
            Self::OpenPackage => "open_package",
            Self::TornPackaging => "torn_packaging",
            Self::CrushedBox => "crushed_box",
            Self::MisalignedParts => "misaligned_parts",
            Self::Leakage => "leakage",
            Self::MissingParts => "missing_parts",
            Self::LabelDamaged => "label_damaged",
            Self::DirtyOrStained => "dirty_or_stained",
            Self::Deformed => "deformed",
            Self::ImpactDamage => "impact_damage",
            Self::MoistureExposed => "moisture_exposed",
            Self::TemperatureDamage => "temperature_damage",
            Self::BrokenInternal => "broken_internal",
            Self::SmallDamage => "small_damage",
            Self::Scratches => "scratches",
            Self::Rust => "rust",
            Self::Corrosion => "corrosion",
            Self::SideDent => "side_dent",
        }
    }

    /// Prompt-facing description.
    pub fn description(&self) -> &'static str {
        match self {
            Self::BrokenSeal => "Broken or tampered seal",
            Self::OpenPackage => "Opened package on delivery",
            Self::TornPackaging => "Torn or ripped packaging",
            Self::CrushedBox => "Crushed shipping box",
            Self::MisalignedParts => "Misaligned or loose parts",
            Self::Leakage => "Leaking contents",
            Self::MissingParts => "Missing parts or components",
            Self::LabelDamaged => "Damaged or unreadable label",
            Self::DirtyOrStained => "Dirty or stained during transport",
            Self::Deformed => "Deformed due to pressure or heat",
            Self::ImpactDamage => "Impact damage from drops",
            Self::MoistureExposed => "Exposed to excessive moisture",
            Self::TemperatureDamage => "Damaged by extreme temperature",
            Self::BrokenInternal => "Broken internal components",
            Self::SmallDamage => "Small damage on the product",
            Self::Scratches => "Scratches on the product",
            Self::Rust => "Rust on the product",
            Self::Corrosion => "Corrosion on the product",
            Self::SideDent => "Side dent on the product",
        }
    }
}

/// Camera-angle directives. `Original` is the sentinel for "no change" and is
/// treated as a no-op by the prompt builder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum AngleType {
    Original,
    Front,
    Back,
    Side,
    Top,
    Bottom,
    ThreeQuarter,
    CloseUp,
}

impl AngleType {
    pub const ALL: [AngleType; 8] = [
        Self::Original,
        Self::Front,
        Self::Back,
        Self::Side,
        Self::Top,
        Self::Bottom,
        Self::ThreeQuarter,
        Self::CloseUp,
    ];

    /// Stable identifier, also the serialized form. Used in cache keys.
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Original => "original",
            Self::Front => "front",
            Self::Back => "back",
            Self::Side => "side",
            Self::Top => "top",
            Self::Bottom => "bottom",
            Self::ThreeQuarter => "three_quarter",
            Self::CloseUp => "close_up",
        }
    }

    /// Display label; lower-cased when interpolated into the prompt.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Original => "Original view",
            Self::Front => "Front view",
            Self::Back => "Back view",
            Self::Side => "Side view",
            Self::Top => "Top-down view",
            Self::Bottom => "Bottom view",
            Self::ThreeQuarter => "Three-quarter view",
            Self::CloseUp => "Close-up view",
        }
    }
}
