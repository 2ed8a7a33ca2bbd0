//! Point-in-polygon zone lookup
//!
//! Rings are `[longitude, latitude]` position lists. Containment uses ray
//! casting along the point's latitude, evaluated per ring; the first feature
//! with any containing ring wins.

use super::nac::MapLayerFeature;

/// Ray-casting containment test for a single ring.
///
/// Points exactly on an edge or vertex may land on either side.
#[must_use]
pub fn point_in_ring(latitude: f64, longitude: f64, ring: &[[f64; 2]]) -> bool {
    let n = ring.len();
    if n < 3 {
        return false;
    }

    let mut inside = false;
    let mut j = n - 1;
    for i in 0..n {
        let [xi, yi] = ring[i];
        let [xj, yj] = ring[j];

        if (yi > latitude) != (yj > latitude)
            && longitude < (xj - xi) * (latitude - yi) / (yj - yi) + xi
        {
            inside = !inside;
        }
        j = i;
    }
    inside
}

/// First feature, in collection order, with a ring containing the point
#[must_use]
pub fn find_zone(features: &[MapLayerFeature], latitude: f64, longitude: f64) -> Option<&MapLayerFeature> {
    features.iter().find(|feature| {
        feature
            .geometry
            .rings()
            .iter()
            .any(|ring| point_in_ring(latitude, longitude, ring))
    })
}
