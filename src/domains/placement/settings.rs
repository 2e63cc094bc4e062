use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::classifier::DEFAULT_LINE_BUFFER_DEG;
use super::rules::{default_building_limits, FeatureRules};

/// How the road-access check is decided.
///
/// `AnyRoadPresent` only asks for some passable road inside the search area.
/// `WithinDistance` requires one within `meters` of the footprint.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "policy", rename_all = "snake_case")]
pub enum AccessPolicy {
    AnyRoadPresent,
    WithinDistance { meters: f64 },
}

impl Default for AccessPolicy {
    fn default() -> Self {
        AccessPolicy::AnyRoadPresent
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacementSettings {
    /// Added to half the footprint diagonal when sizing the search box.
    pub search_margin_m: f64,
    /// Lateral margin around bridge lines.
    pub bridge_buffer_m: f64,
    /// Thickness given to linear obstructions, in degrees.
    pub line_buffer_deg: f64,
    #[serde(default)]
    pub access: AccessPolicy,
}

impl Default for PlacementSettings {
    fn default() -> Self {
        Self {
            search_margin_m: 150.0,
            bridge_buffer_m: 3.0,
            line_buffer_deg: DEFAULT_LINE_BUFFER_DEG,
            access: AccessPolicy::AnyRoadPresent,
        }
    }
}

/// Read-only tables and tuning for the placement engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacementConfig {
    /// Maximum linear dimension in meters per building type.
    pub building_limits: BTreeMap<String, f64>,
    #[serde(default)]
    pub rules: FeatureRules,
    #[serde(default)]
    pub settings: PlacementSettings,
}

impl Default for PlacementConfig {
    fn default() -> Self {
        Self {
            building_limits: default_building_limits(),
            rules: FeatureRules::default(),
            settings: PlacementSettings::default(),
        }
    }
}
