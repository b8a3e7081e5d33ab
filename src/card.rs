use geo::Point;
use itertools::Itertools;
use serde::Serialize;
use url::form_urlencoded::byte_serialize;

use crate::{
    aggregator::Entry,
    model::{lat_lng, OsmId},
};

pub const UNNAMED: &str = "Unnamed store";

/// What a result card shows for one store.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Card {
    pub id: OsmId,
    pub name: String,
    pub street: Option<String>,
    pub house_number: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub postcode: Option<String>,
    pub phone: Option<String>,
    pub website: Option<String>,
    pub category: String,
    #[serde(skip)]
    pub point: Point,
    pub lat: f64,
    pub lng: f64,
    pub maps_url: String,
}

impl Card {
    pub fn new(entry: &Entry) -> Self {
        let feature = &entry.feature;
        let tag = |keys: &[&str]| {
            keys.iter()
                .find_map(|k| feature.tag(k).filter(|x| !x.is_empty()))
                .map(|x| x.to_string())
        };

        let (lat, lng) = lat_lng(entry.point);
        let mut card = Card {
            id: feature.id,
            name: tag(&["name", "brand"]).unwrap_or_else(|| UNNAMED.to_string()),
            street: tag(&["addr:street"]),
            house_number: tag(&["addr:housenumber"]),
            city: tag(&["addr:city"]),
            state: tag(&["addr:state"]),
            postcode: tag(&["addr:postcode"]),
            phone: tag(&["phone", "contact:phone"]),
            website: tag(&["website", "contact:website"]),
            category: entry.category.clone(),
            point: entry.point,
            lat,
            lng,
            maps_url: String::new(),
        };
        card.maps_url = card.build_maps_url();
        card
    }

    fn build_maps_url(&self) -> String {
        let query = [
            Some(self.name.as_str()),
            self.street.as_deref(),
            self.house_number.as_deref(),
            self.city.as_deref(),
            self.state.as_deref(),
            self.postcode.as_deref(),
        ]
        .into_iter()
        .flatten()
        .map(str::trim)
        .filter(|x| !x.is_empty())
        .join(", ");

        // only reachable with a blank name tag
        if query.is_empty() {
            format!("https://www.google.com/maps/@{},{},18z", self.lat, self.lng)
        } else {
            format!(
                "https://www.google.com/maps/search/?api=1&query={}",
                byte_serialize(query.as_bytes()).collect::<String>()
            )
        }
    }

    /// "Street Number", when there is a street.
    pub fn street_line(&self) -> Option<String> {
        let street = self.street.as_deref()?;
        Some(match &self.house_number {
            Some(number) => format!("{street} {number}"),
            None => street.to_string(),
        })
    }

    /// "City - State", when there is a city.
    pub fn locality_line(&self) -> Option<String> {
        let city = self.city.as_deref()?;
        Some(match &self.state {
            Some(state) => format!("{city} - {state}"),
            None => city.to_string(),
        })
    }

    pub fn popup(&self) -> String {
        [Some(self.name.clone()), self.street_line(), Some(self.category.clone())]
            .into_iter()
            .flatten()
            .join("\n")
    }
}
