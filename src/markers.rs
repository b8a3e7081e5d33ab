use geo::Point;

use crate::{model::OsmId, views::MarkerHandle};

/// Coordinates closer than this on both axes refer to the same feature.
pub const PRECISION: f64 = 0.000_000_1;

#[derive(Clone, Debug, PartialEq)]
pub struct MarkerRef {
    pub marker: MarkerHandle,
    pub point: Point,
    pub id: OsmId,
}

/// Rendered markers in the order they were added, for looking a marker up
/// from a hovered card.
#[derive(Debug, Default)]
pub struct MarkerRegistry {
    markers: Vec<MarkerRef>,
}

impl MarkerRegistry {
    pub fn push(&mut self, marker: MarkerRef) {
        self.markers.push(marker);
    }

    pub fn clear(&mut self) {
        self.markers.clear();
    }

    pub fn len(&self) -> usize {
        self.markers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&MarkerRef> {
        self.markers.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &MarkerRef> {
        self.markers.iter()
    }

    /// First marker, in insertion order, sitting on `point`.
    pub fn find(&self, point: Point) -> Option<&MarkerRef> {
        self.markers.iter().find(|x| {
            (x.point.y() - point.y()).abs() < PRECISION
                && (x.point.x() - point.x()).abs() < PRECISION
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn marker(handle: usize, id: u64, lat: f64, lng: f64) -> MarkerRef {
        MarkerRef {
            marker: MarkerHandle(handle),
            point: Point::new(lng, lat),
            id: OsmId::Node(id),
        }
    }

    #[test]
    fn find_within_precision() {
        let mut markers = MarkerRegistry::default();
        markers.push(marker(0, 1, -23.55, -46.63));
        markers.push(marker(1, 2, -23.56, -46.64));

        let found = markers.find(Point::new(-46.64 + 0.000_000_01, -23.56));
        assert_eq!(found.map(|x| x.id), Some(OsmId::Node(2)));

        assert_eq!(markers.find(Point::new(-46.64, -23.560_001)), None);
        assert_eq!(markers.find(Point::new(-46.6401, -23.56)), None);
    }

    #[test]
    fn first_match_wins() {
        let mut markers = MarkerRegistry::default();
        markers.push(marker(0, 1, 1.0, 1.0));
        markers.push(marker(1, 2, 1.0, 1.0));
        assert_eq!(
            markers.find(Point::new(1.0, 1.0)).map(|x| x.marker),
            Some(MarkerHandle(0))
        );
    }

    #[test]
    fn clear_forgets_markers() {
        let mut markers = MarkerRegistry::default();
        markers.push(marker(0, 1, 1.0, 1.0));
        markers.clear();
        assert!(markers.is_empty());
        assert_eq!(markers.find(Point::new(1.0, 1.0)), None);
    }
}
