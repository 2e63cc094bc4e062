use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::types::MapElement;

/// Length may exceed the per-type limit by this factor.
pub const LENGTH_FACTOR: f64 = 1.8;
/// Width may exceed the per-type limit by this factor.
pub const WIDTH_FACTOR: f64 = 1.2;

/// One row of the obstruction table. `value: None` matches any value of `key`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObstructionRule {
    pub key: String,
    #[serde(default)]
    pub value: Option<String>,
    pub reason: String,
}

impl ObstructionRule {
    pub fn any(key: &str, reason: &str) -> Self {
        Self {
            key: key.to_string(),
            value: None,
            reason: reason.to_string(),
        }
    }

    pub fn exact(key: &str, value: &str, reason: &str) -> Self {
        Self {
            key: key.to_string(),
            value: Some(value.to_string()),
            reason: reason.to_string(),
        }
    }

    pub fn matches(&self, element: &MapElement) -> bool {
        match (element.tag(&self.key), &self.value) {
            (Some(_), None) => true,
            (Some(actual), Some(required)) => actual == required,
            (None, _) => false,
        }
    }
}

/// Priority order is significant: the first matching row wins.
pub static DEFAULT_OBSTRUCTION_RULES: Lazy<Vec<ObstructionRule>> = Lazy::new(|| {
    vec![
        ObstructionRule::any("building", "Building"),
        ObstructionRule::exact("natural", "water", "Water body"),
        ObstructionRule::any("waterway", "River/canal"),
        ObstructionRule::exact("landuse", "forest", "Forest"),
        ObstructionRule::exact("natural", "wood", "Forest"),
        ObstructionRule::exact("landuse", "industrial", "Industrial zone"),
        ObstructionRule::exact("landuse", "commercial", "Commercial zone"),
        ObstructionRule::exact("leisure", "park", "Park"),
        ObstructionRule::exact("leisure", "garden", "Garden/square"),
        ObstructionRule::any("railway", "Railway"),
        ObstructionRule::any("aeroway", "Airfield"),
        ObstructionRule::any("military", "Military zone"),
        ObstructionRule::exact("power", "plant", "Power plant"),
        ObstructionRule::exact("man_made", "works", "Factory"),
    ]
});

pub const DEFAULT_ACCEPTED_HIGHWAYS: [&str; 10] = [
    "motorway",
    "trunk",
    "primary",
    "secondary",
    "tertiary",
    "unclassified",
    "residential",
    "service",
    "track",
    "road",
];

pub fn default_building_limits() -> BTreeMap<String, f64> {
    [("house", 20.0), ("cottage", 30.0), ("warehouse", 60.0)]
        .into_iter()
        .map(|(name, limit)| (name.to_string(), limit))
        .collect()
}

/// Tag tables the classifier works from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureRules {
    /// `highway=*` values that count as passable roads.
    pub accepted_highways: Vec<String>,
    pub obstructions: Vec<ObstructionRule>,
}

impl FeatureRules {
    /// Table position and reason of the first matching rule.
    pub fn obstruction_match(&self, element: &MapElement) -> Option<(usize, &str)> {
        self.obstructions
            .iter()
            .position(|rule| rule.matches(element))
            .map(|idx| (idx, self.obstructions[idx].reason.as_str()))
    }

    pub fn is_accessible_road(&self, element: &MapElement) -> bool {
        element
            .tag("highway")
            .map(|hw| self.accepted_highways.iter().any(|accepted| accepted == hw))
            .unwrap_or(false)
    }
}

impl Default for FeatureRules {
    fn default() -> Self {
        Self {
            accepted_highways: DEFAULT_ACCEPTED_HIGHWAYS
                .iter()
                .map(|s| s.to_string())
                .collect(),
            obstructions: DEFAULT_OBSTRUCTION_RULES.clone(),
        }
    }
}
