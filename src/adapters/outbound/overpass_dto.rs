//! Transport DTOs for Overpass `[out:json]` payloads.
//!
//! Payloads are decoded into these first and mapped into `MapElement`s in
//! one pass; element types other than node/way/relation are dropped.

use serde::Deserialize;
use std::collections::HashMap;

use crate::common::{DomainError, DomainResult};
use crate::domains::placement::{ElementKind, GeoPoint, MapElement};

#[derive(Debug, Deserialize)]
pub(super) struct OverpassResponseDto {
    #[serde(default)]
    pub(super) elements: Vec<OverpassElementDto>,
    /// Set by Overpass when the query timed out or ran out of memory.
    #[serde(default)]
    pub(super) remark: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(super) struct OverpassElementDto {
    #[serde(rename = "type")]
    pub(super) element_type: String,
    pub(super) id: i64,
    pub(super) lat: Option<f64>,
    pub(super) lon: Option<f64>,
    #[serde(default)]
    pub(super) nodes: Vec<i64>,
    #[serde(default)]
    pub(super) tags: HashMap<String, String>,
}

impl OverpassResponseDto {
    pub(super) fn into_elements(self) -> Vec<MapElement> {
        self.elements
            .into_iter()
            .filter_map(OverpassElementDto::into_element)
            .collect()
    }
}

impl OverpassElementDto {
    fn into_element(self) -> Option<MapElement> {
        let kind = match self.element_type.as_str() {
            "node" => ElementKind::Node,
            "way" => ElementKind::Way,
            "relation" => ElementKind::Relation,
            _ => return None,
        };
        let position = match (self.lat, self.lon) {
            (Some(lat), Some(lon)) if kind == ElementKind::Node => Some(GeoPoint::new(lat, lon)),
            _ => None,
        };
        Some(MapElement {
            kind,
            id: self.id,
            node_refs: self.nodes,
            tags: self.tags,
            position,
        })
    }
}

/// Decode an Overpass JSON document into map elements.
pub fn parse_overpass_json(body: &str) -> DomainResult<Vec<MapElement>> {
    let dto: OverpassResponseDto =
        serde_json::from_str(body).map_err(|e| DomainError::Parse(format!("invalid overpass JSON: {}", e)))?;
    if let Some(remark) = &dto.remark {
        if dto.elements.is_empty() {
            return Err(DomainError::DataSource(format!("overpass remark: {}", remark)));
        }
    }
    Ok(dto.into_elements())
}
