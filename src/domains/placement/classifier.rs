//! Turns raw map elements into the geometry the placement rules test against.
//!
//! Relations are not expanded: areas mapped only as multipolygon relations
//! produce no geometry and are invisible to the rule checks.

use geo::{LineString, MultiPolygon, Polygon};
use std::collections::HashMap;

use super::geometry::GeometryKernel;
use super::rules::FeatureRules;
use super::types::{ElementKind, GeoPoint, MapElement};

/// Buffer radius in degrees applied to linear obstructions (rivers, rails).
pub const DEFAULT_LINE_BUFFER_DEG: f64 = 0.00005;

#[derive(Debug, Clone)]
pub struct ObstructionZone {
    pub geometry: MultiPolygon<f64>,
    pub reason: String,
    /// Position of the matching rule in the obstruction table.
    pub priority: usize,
    pub source_id: i64,
}

#[derive(Debug, Clone)]
pub struct RoadSegment {
    pub line: LineString<f64>,
    pub source_id: i64,
}

#[derive(Debug, Clone)]
pub struct BridgeSegment {
    pub line: LineString<f64>,
    pub source_id: i64,
}

#[derive(Debug, Clone, Default)]
pub struct ClassifiedFeatures {
    pub forbidden: Vec<ObstructionZone>,
    pub roads: Vec<RoadSegment>,
    pub bridges: Vec<BridgeSegment>,
    /// Ways dropped because their geometry could not be built.
    pub skipped: usize,
}

pub struct FeatureClassifier<'a> {
    rules: &'a FeatureRules,
    kernel: &'a dyn GeometryKernel,
    line_buffer_deg: f64,
}

impl<'a> FeatureClassifier<'a> {
    pub fn new(rules: &'a FeatureRules, kernel: &'a dyn GeometryKernel) -> Self {
        Self {
            rules,
            kernel,
            line_buffer_deg: DEFAULT_LINE_BUFFER_DEG,
        }
    }

    pub fn with_line_buffer(mut self, degrees: f64) -> Self {
        self.line_buffer_deg = degrees;
        self
    }

    pub fn classify(&self, elements: &[MapElement]) -> ClassifiedFeatures {
        let nodes = index_nodes(elements);
        let mut out = ClassifiedFeatures::default();

        for way in elements.iter().filter(|el| el.kind == ElementKind::Way) {
            let coords: Vec<GeoPoint> = way
                .node_refs
                .iter()
                .filter_map(|id| nodes.get(id).copied())
                .collect();
            if coords.len() < 2 {
                continue;
            }
            if !self.classify_way(way, &coords, &mut out) {
                out.skipped += 1;
            }
        }

        out
    }

    /// Returns false when a way that matters to the rule checks has
    /// unusable geometry. Irrelevant ways are dropped silently.
    fn classify_way(&self, way: &MapElement, coords: &[GeoPoint], out: &mut ClassifiedFeatures) -> bool {
        let obstruction = self.rules.obstruction_match(way);
        let is_bridge = way.tag("bridge") == Some("yes");
        let line: LineString<f64> = coords.iter().map(|p| p.to_coord()).collect();

        if is_closed(coords) {
            let polygon = Polygon::new(line.clone(), vec![]);
            if !self.kernel.is_valid_simple_polygon(&polygon) {
                return obstruction.is_none() && !is_bridge;
            }
            if let Some((priority, reason)) = obstruction {
                out.forbidden.push(ObstructionZone {
                    geometry: MultiPolygon::new(vec![polygon]),
                    reason: reason.to_string(),
                    priority,
                    source_id: way.id,
                });
            }
            if is_bridge {
                out.bridges.push(BridgeSegment {
                    line,
                    source_id: way.id,
                });
            }
            return true;
        }

        let is_road = self.rules.is_accessible_road(way);
        let is_linear_obstruction =
            obstruction.is_some() && (way.has_tag("waterway") || way.has_tag("railway"));
        if !self.kernel.is_valid_line(&line) {
            return !(is_road || is_linear_obstruction || is_bridge);
        }
        if is_road {
            out.roads.push(RoadSegment {
                line: line.clone(),
                source_id: way.id,
            });
        }
        if let Some((priority, reason)) = obstruction.filter(|_| is_linear_obstruction) {
            let geometry = self.kernel.buffer_line(&line, self.line_buffer_deg);
            if geometry.0.is_empty() {
                return false;
            }
            out.forbidden.push(ObstructionZone {
                geometry,
                reason: reason.to_string(),
                priority,
                source_id: way.id,
            });
        }
        if is_bridge {
            out.bridges.push(BridgeSegment {
                line,
                source_id: way.id,
            });
        }
        true
    }
}

fn index_nodes(elements: &[MapElement]) -> HashMap<i64, GeoPoint> {
    elements
        .iter()
        .filter(|el| el.kind == ElementKind::Node)
        .filter_map(|el| el.position.map(|p| (el.id, p)))
        .collect()
}

fn is_closed(coords: &[GeoPoint]) -> bool {
    coords.len() >= 3 && coords.first() == coords.last()
}
