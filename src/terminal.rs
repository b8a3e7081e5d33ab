//! Plain-text renditions of the map and the result list.

use geo::{Point, Rect};
use indicatif::ProgressBar;
use itertools::Itertools;
use tracing::debug;

use crate::{
    card::Card,
    model::{lat_lng, Location},
    utils::spinner,
    views::{IconState, Listing, MapView, MarkerHandle, Notice, ResultListView},
};

pub const ALL: &str = "All";

/// Keeps what a map widget would be showing so it can be described on request.
#[derive(Debug)]
pub struct TerminalMap {
    center: Point,
    zoom: u8,
    location: Option<Location>,
    circle: Option<(Point, f64)>,
    markers: Vec<(Card, IconState)>,
    bounds: Option<Rect>,
}

impl Default for TerminalMap {
    fn default() -> Self {
        Self {
            center: Point::new(0.0, 0.0),
            zoom: 0,
            location: None,
            circle: None,
            markers: Vec::new(),
            bounds: None,
        }
    }
}

impl TerminalMap {
    pub fn describe(&self) -> String {
        let (lat, lng) = lat_lng(self.center);
        let mut lines = vec![format!("center {lat:.5},{lng:.5} zoom {}", self.zoom)];
        if let Some(x) = &self.location {
            lines.push(format!("you are here: {}", x.display_name));
        }
        if let Some((_, radius)) = self.circle {
            lines.push(format!("search radius {:.1} km", radius / 1000.0));
        }
        if let Some(bounds) = self.bounds {
            let (min_lat, min_lng) = lat_lng(bounds.min().into());
            let (max_lat, max_lng) = lat_lng(bounds.max().into());
            lines.push(format!(
                "showing {min_lat:.5},{min_lng:.5} to {max_lat:.5},{max_lng:.5}"
            ));
        }
        lines.push(format!("{} store markers", self.markers.len()));
        lines.join("\n")
    }
}

impl MapView for TerminalMap {
    fn set_center(&mut self, center: Point, zoom: u8) {
        self.center = center;
        self.zoom = zoom;
        self.bounds = None;
    }

    fn add_location_marker(&mut self, location: &Location) {
        self.location = Some(location.clone());
    }

    fn add_marker(&mut self, card: &Card, icon: IconState) -> MarkerHandle {
        self.markers.push((card.clone(), icon));
        MarkerHandle(self.markers.len() - 1)
    }

    fn set_icon(&mut self, marker: MarkerHandle, icon: IconState) {
        let Some((card, state)) = self.markers.get_mut(marker.0) else {
            debug!(?marker, "no such marker");
            return;
        };
        *state = icon;
        // stands in for the marker popup
        if icon == IconState::Highlighted {
            println!("{}", card.popup());
        }
    }

    fn remove_all_markers(&mut self) {
        self.markers.clear();
    }

    fn draw_circle(&mut self, center: Point, radius_m: f64) {
        self.circle = Some((center, radius_m));
    }

    fn set_circle_radius(&mut self, radius_m: f64) {
        if let Some((_, radius)) = &mut self.circle {
            *radius = radius_m;
        }
    }

    fn fit_to_bounds(&mut self, bounds: Rect) {
        self.center = bounds.center().into();
        self.bounds = Some(bounds);
    }
}

#[derive(Default)]
pub struct TerminalList {
    /// Suppresses list output, for when results are printed as JSON instead.
    pub quiet: bool,
    spinner: Option<ProgressBar>,
}

impl TerminalList {
    pub fn new(quiet: bool) -> Self {
        Self {
            quiet,
            spinner: None,
        }
    }
}

impl ResultListView for TerminalList {
    fn set_loading(&mut self, loading: bool) {
        match (loading, self.spinner.take()) {
            (true, None) => self.spinner = Some(spinner("Searching...")),
            (true, Some(x)) => self.spinner = Some(x),
            (false, Some(x)) => x.finish_and_clear(),
            (false, None) => {}
        }
    }

    fn show_notice(&mut self, notice: &Notice) {
        eprintln!("error: {}", notice.message);
    }

    fn render_categories(&mut self, categories: &[String], selected: Option<&str>) {
        if !self.quiet && !categories.is_empty() {
            println!("{}", format_categories(categories, selected));
        }
    }

    fn render_results(&mut self, listing: &Listing) {
        if self.quiet {
            return;
        }
        println!("Results ({})", listing.count());
        match listing {
            Listing::Cards(cards) => {
                for (i, card) in cards.iter().enumerate() {
                    println!("{}", format_card(i + 1, card));
                }
            }
            _ => {
                if let Some(x) = listing.empty_message() {
                    println!("  {x}");
                }
            }
        }
    }
}

pub fn format_categories(categories: &[String], selected: Option<&str>) -> String {
    std::iter::once((ALL, selected.is_none()))
        .chain(
            categories
                .iter()
                .map(|x| (x.as_str(), selected == Some(x.as_str()))),
        )
        .map(|(label, active)| {
            if active {
                format!("[{label}]")
            } else {
                label.to_string()
            }
        })
        .join(" | ")
}

pub fn format_card(index: usize, card: &Card) -> String {
    let mut lines = vec![format!("{index:>3}. {} ({})", card.name, card.category)];
    lines.extend(card.street_line());
    lines.extend(card.locality_line());
    lines.extend(card.phone.as_ref().map(|x| format!("tel. {x}")));
    lines.extend(card.website.clone());
    lines.push(card.maps_url.clone());
    lines.join("\n     ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{aggregator::Entry, model::shop};

    fn card() -> Card {
        let mut feature = shop(1, Some("bakery"), -23.5, -46.6);
        feature
            .tags
            .insert("name".to_string(), "Padaria Real".to_string());
        feature
            .tags
            .insert("addr:street".to_string(), "Rua Augusta".to_string());
        feature
            .tags
            .insert("phone".to_string(), "5555".to_string());
        Card::new(&Entry {
            point: feature.position().unwrap(),
            feature,
            category: "Padaria".to_string(),
        })
    }

    #[test]
    fn categories_bar() {
        let categories = vec!["Padaria".to_string(), "Roupas".to_string()];
        assert_eq!(
            format_categories(&categories, None),
            "[All] | Padaria | Roupas"
        );
        assert_eq!(
            format_categories(&categories, Some("Roupas")),
            "All | Padaria | [Roupas]"
        );
    }

    #[test]
    fn card_lines() {
        assert_eq!(
            format_card(2, &card()),
            "  2. Padaria Real (Padaria)\n     Rua Augusta\n     tel. 5555\n     \
             https://www.google.com/maps/search/?api=1&query=Padaria+Real%2C+Rua+Augusta"
        );
    }

    #[test]
    fn map_tracks_markers() {
        let mut map = TerminalMap::default();
        let marker = map.add_marker(&card(), IconState::Normal);
        assert_eq!(marker, MarkerHandle(0));
        map.set_icon(marker, IconState::Highlighted);
        assert_eq!(map.markers[0].1, IconState::Highlighted);

        map.draw_circle(Point::new(-46.6, -23.5), 2000.0);
        map.set_circle_radius(3000.0);
        assert!(map.describe().contains("search radius 3.0 km"));

        map.remove_all_markers();
        assert!(map.describe().ends_with("0 store markers"));
        // stale handles are ignored
        map.set_icon(marker, IconState::Normal);
    }
}
