use geo::Point;
use serde::Deserialize;
use serde_with::{serde_as, DisplayFromStr};
use tracing::debug;
use ureq::Agent;

use crate::{
    config::Config,
    error::{describe, SearchError},
    model::Location,
    utils,
};

pub trait GeoResolver {
    /// `Ok(None)` when the address matched nothing.
    fn resolve(&self, address: &str) -> Result<Option<Location>, SearchError>;
}

pub struct Nominatim {
    agent: Agent,
    base_url: String,
    email: Option<String>,
}

impl Nominatim {
    pub fn new(config: &Config) -> Self {
        Self {
            agent: utils::agent(config),
            base_url: config.nominatim_url.trim_end_matches('/').to_string(),
            email: config.contact_email.clone(),
        }
    }
}

impl GeoResolver for Nominatim {
    fn resolve(&self, address: &str) -> Result<Option<Location>, SearchError> {
        debug!(address, "geocoding");
        let mut request = self
            .agent
            .get(&format!("{}/search", self.base_url))
            .query("format", "json")
            .query("q", address)
            .query("limit", "1");
        if let Some(email) = &self.email {
            request = request.query("email", email);
        }

        let body = request
            .call()
            .map_err(|e| SearchError::Geocode(describe(e)))?
            .into_string()
            .map_err(|e| SearchError::Geocode(e.to_string()))?;
        parse(&body)
    }
}

fn parse(body: &str) -> Result<Option<Location>, SearchError> {
    let places: Vec<Place> =
        serde_json::from_str(body).map_err(|e| SearchError::Geocode(e.to_string()))?;
    Ok(places.into_iter().next().map(|x| Location {
        point: Point::new(x.lon, x.lat),
        display_name: x.display_name,
    }))
}

#[serde_as]
#[derive(Deserialize)]
struct Place {
    #[serde_as(as = "DisplayFromStr")]
    lat: f64,
    #[serde_as(as = "DisplayFromStr")]
    lon: f64,
    display_name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_first_place() {
        let body = r#"[
            {
                "place_id": 1,
                "osm_type": "way",
                "lat": "-23.5613",
                "lon": "-46.6565",
                "display_name": "Avenida Paulista, São Paulo, Brasil"
            },
            {"lat": "0", "lon": "0", "display_name": "ignored"}
        ]"#;
        assert_eq!(
            parse(body).unwrap(),
            Some(Location {
                point: Point::new(-46.6565, -23.5613),
                display_name: "Avenida Paulista, São Paulo, Brasil".to_string(),
            })
        );
    }

    #[test]
    fn parse_no_match() {
        assert_eq!(parse("[]").unwrap(), None);
    }

    #[test]
    fn parse_garbage() {
        assert!(matches!(parse("<html>"), Err(SearchError::Geocode(_))));
        assert!(matches!(
            parse(r#"[{"lat": "north", "lon": "1", "display_name": "x"}]"#),
            Err(SearchError::Geocode(_))
        ));
    }
}
