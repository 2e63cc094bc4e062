use crate::common::DomainResult;
use async_trait::async_trait;

use super::types::{GeoPoint, MapElement};

/// Port for fetching raw map elements around a point.
/// Implementations (adapters) query Overpass, read snapshots from disk, etc.
#[async_trait]
pub trait MapDataSource: Send + Sync {
    /// Elements inside the box `center +/- radius_deg` on both axes.
    async fn fetch_elements(&self, center: GeoPoint, radius_deg: f64) -> DomainResult<Vec<MapElement>>;
}
