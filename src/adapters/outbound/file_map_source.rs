use async_trait::async_trait;
use std::collections::HashSet;
use std::path::PathBuf;

use super::overpass_dto::parse_overpass_json;
use crate::common::{DomainError, DomainResult};
use crate::domains::placement::{ElementKind, GeoPoint, MapDataSource, MapElement};

/// Map data source reading a saved Overpass JSON response from disk.
///
/// Mirrors what the live query returns: ways with a node inside the box,
/// every node those ways reference, and all relations.
pub struct FileMapSource {
    path: PathBuf,
}

impl FileMapSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    async fn load(&self) -> DomainResult<Vec<MapElement>> {
        let body = tokio::fs::read_to_string(&self.path).await.map_err(|e| {
            DomainError::DataSource(format!("{}: {}", self.path.display(), e))
        })?;
        parse_overpass_json(&body)
    }
}

#[async_trait]
impl MapDataSource for FileMapSource {
    async fn fetch_elements(&self, center: GeoPoint, radius_deg: f64) -> DomainResult<Vec<MapElement>> {
        let elements = self.load().await?;
        Ok(clip_to_box(elements, center, radius_deg))
    }
}

fn clip_to_box(elements: Vec<MapElement>, center: GeoPoint, radius_deg: f64) -> Vec<MapElement> {
    let inside = |p: &GeoPoint| {
        (p.lat - center.lat).abs() <= radius_deg && (p.lon - center.lon).abs() <= radius_deg
    };

    let nodes_in_box: HashSet<i64> = elements
        .iter()
        .filter(|el| el.kind == ElementKind::Node)
        .filter(|el| el.position.as_ref().map(inside).unwrap_or(false))
        .map(|el| el.id)
        .collect();

    let mut wanted_nodes = nodes_in_box.clone();
    let mut kept_ways = HashSet::new();
    for way in elements.iter().filter(|el| el.kind == ElementKind::Way) {
        if way.node_refs.iter().any(|id| nodes_in_box.contains(id)) {
            kept_ways.insert(way.id);
            wanted_nodes.extend(way.node_refs.iter().copied());
        }
    }

    elements
        .into_iter()
        .filter(|el| match el.kind {
            ElementKind::Node => wanted_nodes.contains(&el.id),
            ElementKind::Way => kept_ways.contains(&el.id),
            ElementKind::Relation => true,
        })
        .collect()
}
