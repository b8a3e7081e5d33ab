use geo::{BoundingRect, MultiPoint, Point};
use tracing::{info, warn};

use crate::{
    aggregator::ResultAggregator,
    card::Card,
    config::Config,
    error::SearchError,
    markers::{MarkerRef, MarkerRegistry},
    model::{Feature, Location},
    nominatim::GeoResolver,
    overpass::FeatureQueryClient,
    views::{
        IconState, Listing, MapView, Notice, ResultListView, INITIAL_CENTER, INITIAL_ZOOM,
        LOCATION_ZOOM,
    },
};

/// Identifies one search. Only the most recently issued ticket may touch the
/// views, anything older is discarded when it comes back.
#[derive(Clone, Debug, PartialEq)]
pub struct SearchTicket {
    generation: u64,
    pub address: String,
    pub radius_km: f64,
}

#[derive(Debug, PartialEq, Eq)]
pub enum SearchOutcome {
    Applied { count: usize },
    Superseded,
}

#[derive(Debug, Default)]
pub struct AppState {
    pub results: ResultAggregator,
    pub markers: MarkerRegistry,
    pub location: Option<Location>,
    pub radius_km: f64,
    generation: u64,
}

impl AppState {
    fn is_current(&self, ticket: &SearchTicket) -> bool {
        ticket.generation == self.generation
    }
}

pub struct Controller<G, Q, M, L> {
    config: Config,
    geo: G,
    features: Q,
    map: M,
    list: L,
    state: AppState,
}

impl<G, Q, M, L> Controller<G, Q, M, L>
where
    G: GeoResolver,
    Q: FeatureQueryClient,
    M: MapView,
    L: ResultListView,
{
    pub fn new(config: Config, geo: G, features: Q, mut map: M, mut list: L) -> Self {
        let (lat, lng) = INITIAL_CENTER;
        map.set_center(Point::new(lng, lat), INITIAL_ZOOM);
        list.render_categories(&[], None);
        list.render_results(&Listing::NotSearched);

        let state = AppState {
            radius_km: config.default_radius_km,
            ..AppState::default()
        };
        Self {
            config,
            geo,
            features,
            map,
            list,
            state,
        }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn map(&self) -> &M {
        &self.map
    }

    pub fn list(&self) -> &L {
        &self.list
    }

    pub fn list_mut(&mut self) -> &mut L {
        &mut self.list
    }

    pub fn on_search_submitted(&mut self, address: &str) -> Result<SearchOutcome, SearchError> {
        let ticket = self.begin_search(address)?;
        let Some(location) = self.resolve(&ticket)? else {
            return Ok(SearchOutcome::Superseded);
        };
        let Some(features) = self.fetch(&ticket, &location)? else {
            return Ok(SearchOutcome::Superseded);
        };
        Ok(self.apply_results(&ticket, features))
    }

    /// Validates the address and issues a new ticket, superseding any search
    /// still in flight. The category selection is cleared right away and the
    /// previous results are redrawn unfiltered until new ones are applied.
    pub fn begin_search(&mut self, address: &str) -> Result<SearchTicket, SearchError> {
        let address = address.trim();
        if address.is_empty() {
            return Err(self.fail(SearchError::EmptyAddress));
        }

        self.state.generation += 1;
        if self.state.results.has_searched() {
            self.state.results.select_category(None);
            self.render();
        }
        info!(
            generation = self.state.generation,
            address,
            radius_km = self.state.radius_km,
            "search started"
        );
        Ok(SearchTicket {
            generation: self.state.generation,
            address: address.to_string(),
            radius_km: self.state.radius_km,
        })
    }

    /// Geocodes the ticket's address and, if the ticket is still current,
    /// recenters the map on it. `Ok(None)` means the ticket was superseded.
    pub fn resolve(&mut self, ticket: &SearchTicket) -> Result<Option<Location>, SearchError> {
        self.list.set_loading(true);
        let resolved = self.geo.resolve(&ticket.address);
        self.list.set_loading(false);

        if !self.state.is_current(ticket) {
            warn!(generation = ticket.generation, "discarding superseded geocode");
            return Ok(None);
        }
        let location = match resolved {
            Ok(Some(x)) => x,
            Ok(None) => return Err(self.fail(SearchError::AddressNotFound)),
            Err(e) => return Err(self.fail(e)),
        };

        info!(name = %location.display_name, "address resolved");
        self.map.remove_all_markers();
        self.state.markers.clear();
        self.map.set_center(location.point, LOCATION_ZOOM);
        self.map.add_location_marker(&location);
        self.map.draw_circle(location.point, ticket.radius_km * 1000.0);
        self.state.location = Some(location.clone());
        Ok(Some(location))
    }

    /// Queries stores around `location`. `Ok(None)` means the ticket was
    /// superseded. On failure the map has already moved, so the old results
    /// are dropped and the list shows the empty state.
    pub fn fetch(
        &mut self,
        ticket: &SearchTicket,
        location: &Location,
    ) -> Result<Option<Vec<Feature>>, SearchError> {
        self.list.set_loading(true);
        let features = self.features.query(location.point, ticket.radius_km);
        self.list.set_loading(false);

        if !self.state.is_current(ticket) {
            warn!(generation = ticket.generation, "discarding superseded query");
            return Ok(None);
        }
        match features {
            Ok(x) => Ok(Some(x)),
            Err(e) => {
                self.state.results.load(Vec::new());
                self.render();
                Err(self.fail(e))
            }
        }
    }

    pub fn apply_results(
        &mut self,
        ticket: &SearchTicket,
        features: Vec<Feature>,
    ) -> SearchOutcome {
        if !self.state.is_current(ticket) {
            warn!(
                generation = ticket.generation,
                current = self.state.generation,
                "discarding superseded results"
            );
            return SearchOutcome::Superseded;
        }

        self.state.results.load(features);
        self.render();
        self.fit_to_results();

        let count = self.state.results.projection().count;
        info!(count, "search finished");
        SearchOutcome::Applied { count }
    }

    pub fn on_category_selected(&mut self, label: Option<&str>) {
        if !self.state.results.has_searched() {
            return;
        }
        self.state.results.select_category(label);
        self.render();
    }

    /// Clamps the radius and resizes the circle without searching again.
    pub fn on_radius_changed(&mut self, km: f64) -> f64 {
        let km = self.config.clamp_radius(km);
        self.state.radius_km = km;
        if self.state.location.is_some() {
            self.map.set_circle_radius(km * 1000.0);
        }
        km
    }

    /// Highlights (or restores) the marker under a card. Returns whether a
    /// marker was found.
    pub fn on_card_hover(&mut self, point: Point, hovered: bool) -> bool {
        let Some(marker) = self.state.markers.find(point) else {
            return false;
        };
        let icon = if hovered {
            IconState::Highlighted
        } else {
            IconState::Normal
        };
        self.map.set_icon(marker.marker, icon);
        true
    }

    pub fn cards(&self) -> Vec<Card> {
        self.state
            .results
            .projection()
            .entries
            .into_iter()
            .map(Card::new)
            .collect()
    }

    fn render(&mut self) {
        let results = &self.state.results;
        let categories = results.known_categories();
        if results.is_empty() {
            self.list.render_categories(&[], None);
        } else {
            self.list.render_categories(categories, results.selected_category());
        }

        let cards = self.cards();

        self.map.remove_all_markers();
        self.state.markers.clear();
        for card in &cards {
            let marker = self.map.add_marker(card, IconState::Normal);
            self.state.markers.push(MarkerRef {
                marker,
                point: card.point,
                id: card.id,
            });
        }

        let results = &self.state.results;
        let listing = if !results.has_searched() {
            Listing::NotSearched
        } else if results.is_empty() {
            Listing::Empty
        } else if cards.is_empty() {
            Listing::EmptyCategory(results.selected_category().unwrap_or_default().to_string())
        } else {
            Listing::Cards(cards)
        };
        self.list.render_results(&listing);
    }

    // covers every loaded store, not only the filtered ones
    fn fit_to_results(&mut self) {
        let Some(location) = &self.state.location else {
            return;
        };
        if self.state.results.is_empty() {
            return;
        }

        let points: MultiPoint = std::iter::once(location.point)
            .chain(self.state.results.all_entries().iter().map(|x| x.point))
            .collect();
        if let Some(bounds) = points.bounding_rect() {
            self.map.fit_to_bounds(bounds);
        }
    }

    fn fail(&mut self, err: SearchError) -> SearchError {
        warn!(%err, "search failed");
        self.list.show_notice(&Notice {
            message: err.to_string(),
            duration: self.config.notice_duration(),
        });
        err
    }
}
