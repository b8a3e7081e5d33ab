use std::collections::BTreeMap;

use geo::Point;
use serde::Deserialize;
use tracing::{debug, warn};
use ureq::Agent;

use crate::{
    config::Config,
    error::{describe, SearchError},
    model::{lat_lng, Feature, OsmId},
    utils,
};

pub trait FeatureQueryClient {
    fn query(&self, center: Point, radius_km: f64) -> Result<Vec<Feature>, SearchError>;
}

pub struct Overpass {
    agent: Agent,
    url: String,
    timeout_secs: u64,
}

impl Overpass {
    pub fn new(config: &Config) -> Self {
        Self {
            agent: utils::agent(config),
            url: config.overpass_url.clone(),
            timeout_secs: config.overpass_timeout_secs,
        }
    }
}

impl FeatureQueryClient for Overpass {
    fn query(&self, center: Point, radius_km: f64) -> Result<Vec<Feature>, SearchError> {
        let payload = shops_around(center, radius_km, self.timeout_secs);
        debug!(%payload, "querying overpass");

        let response: OverpassResponse = self
            .agent
            .post(&self.url)
            .send_form(&[("data", payload.as_str())])
            .map_err(|e| SearchError::FeatureQuery(describe(e)))?
            .into_json()
            .map_err(|e| SearchError::FeatureQuery(e.to_string()))?;

        Ok(response.features())
    }
}

/// Nodes, ways and relations tagged `shop` within `radius_km`, with a center
/// for anything that is not a node.
pub fn shops_around(center: Point, radius_km: f64, timeout_secs: u64) -> String {
    let (lat, lng) = lat_lng(center);
    let around = format!("(around:{},{lat},{lng})", radius_km * 1000.0);
    format!(
        r#"[out:json][timeout:{timeout_secs}];
(
  node["shop"]{around};
  way["shop"]{around};
  relation["shop"]{around};
);
out center;"#
    )
}

#[derive(Deserialize)]
struct OverpassResponse {
    elements: Vec<RawElement>,
}

impl OverpassResponse {
    fn features(self) -> Vec<Feature> {
        self.elements
            .into_iter()
            .filter_map(|x| {
                let id = match x.kind {
                    ElementType::Node => OsmId::Node(x.id),
                    ElementType::Way => OsmId::Way(x.id),
                    ElementType::Relation => OsmId::Relation(x.id),
                    ElementType::Other => {
                        warn!(id = x.id, "skipping element of unknown type");
                        return None;
                    }
                };
                let point = match (x.lat, x.lon) {
                    (Some(lat), Some(lon)) => Some(Point::new(lon, lat)),
                    _ => None,
                };
                Some(Feature {
                    id,
                    point,
                    center: x.center.map(RawPosition::refine),
                    tags: x.tags,
                })
            })
            .collect()
    }
}

#[derive(Deserialize)]
struct RawElement {
    #[serde(rename = "type")]
    kind: ElementType,
    id: u64,
    lat: Option<f64>,
    lon: Option<f64>,
    center: Option<RawPosition>,
    #[serde(default)]
    tags: BTreeMap<String, String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "kebab-case")]
enum ElementType {
    Node,
    Way,
    Relation,
    #[serde(other)]
    Other,
}

#[derive(Deserialize)]
struct RawPosition {
    lat: f64,
    lon: f64,
}

impl RawPosition {
    fn refine(self) -> Point {
        Point::new(self.lon, self.lat)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_text() {
        let query = shops_around(Point::new(-46.6565, -23.5613), 2.5, 25);
        assert_eq!(
            query,
            r#"[out:json][timeout:25];
(
  node["shop"](around:2500,-23.5613,-46.6565);
  way["shop"](around:2500,-23.5613,-46.6565);
  relation["shop"](around:2500,-23.5613,-46.6565);
);
out center;"#
        );
    }

    #[test]
    fn parse_elements() {
        let body = r#"{
            "version": 0.6,
            "elements": [
                {"type": "node", "id": 1, "lat": -23.5, "lon": -46.6,
                 "tags": {"shop": "bakery", "name": "Padaria"}},
                {"type": "way", "id": 2,
                 "center": {"lat": -23.4, "lon": -46.5},
                 "nodes": [1, 2, 3],
                 "tags": {"shop": "supermarket"}},
                {"type": "relation", "id": 3, "tags": {"shop": "mall"}},
                {"type": "area", "id": 4}
            ]
        }"#;
        let response: OverpassResponse = serde_json::from_str(body).unwrap();
        let features = response.features();

        assert_eq!(features.len(), 3);
        assert_eq!(features[0].id, OsmId::Node(1));
        assert_eq!(features[0].position(), Some(Point::new(-46.6, -23.5)));
        assert_eq!(features[0].tag("name"), Some("Padaria"));
        assert_eq!(features[1].id, OsmId::Way(2));
        assert_eq!(features[1].point, None);
        assert_eq!(features[1].position(), Some(Point::new(-46.5, -23.4)));
        // kept here, dropped by the aggregator
        assert_eq!(features[2].id, OsmId::Relation(3));
        assert_eq!(features[2].position(), None);
    }
}
