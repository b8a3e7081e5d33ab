use std::{collections::BTreeMap, fmt};

use geo::Point;
use serde::{Deserialize, Serialize};

#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", tag = "type", content = "id")]
pub enum OsmId {
    Node(u64),
    Way(u64),
    Relation(u64),
}

impl OsmId {
    pub fn link(&self) -> String {
        match self {
            Self::Node(x) => format!("https://www.openstreetmap.org/node/{x}"),
            Self::Way(x) => format!("https://www.openstreetmap.org/way/{x}"),
            Self::Relation(x) => format!("https://www.openstreetmap.org/relation/{x}"),
        }
    }
}

impl fmt::Display for OsmId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Node(x) => write!(f, "n{x}"),
            Self::Way(x) => write!(f, "w{x}"),
            Self::Relation(x) => write!(f, "r{x}"),
        }
    }
}

/// A shop returned by the feature query, before any validation.
///
/// Points follow the `geo` convention: x is longitude, y is latitude.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Feature {
    pub id: OsmId,
    /// Direct coordinate, present on nodes.
    pub point: Option<Point>,
    /// Representative center, present on ways and relations.
    pub center: Option<Point>,
    pub tags: BTreeMap<String, String>,
}

impl Feature {
    /// The coordinate to place this feature at, or `None` if it is malformed.
    pub fn position(&self) -> Option<Point> {
        self.point.or(self.center)
    }

    pub fn tag(&self, key: &str) -> Option<&str> {
        self.tags.get(key).map(|x| x.as_str())
    }

    pub fn shop(&self) -> Option<&str> {
        self.tag("shop")
    }
}

/// A geocoded address.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Location {
    pub point: Point,
    pub display_name: String,
}

pub fn lat_lng(point: Point) -> (f64, f64) {
    (point.y(), point.x())
}

#[cfg(test)]
pub(crate) fn shop(id: u64, shop: Option<&str>, lat: f64, lng: f64) -> Feature {
    let mut tags = BTreeMap::new();
    if let Some(x) = shop {
        tags.insert("shop".to_string(), x.to_string());
    }
    Feature {
        id: OsmId::Node(id),
        point: Some(Point::new(lng, lat)),
        center: None,
        tags,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn position_prefers_direct_point() {
        let mut x = shop(1, Some("bakery"), 10.0, 20.0);
        x.center = Some(Point::new(0.0, 0.0));
        assert_eq!(x.position(), Some(Point::new(20.0, 10.0)));

        x.point = None;
        assert_eq!(x.position(), Some(Point::new(0.0, 0.0)));

        x.center = None;
        assert_eq!(x.position(), None);
    }

    #[test]
    fn osm_link() {
        assert_eq!(OsmId::Way(42).link(), "https://www.openstreetmap.org/way/42");
        assert_eq!(OsmId::Relation(7).to_string(), "r7");
    }
}
