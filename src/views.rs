//! Seams between the controller and whatever draws the map and the list.

use std::time::Duration;

use geo::{Point, Rect};

use crate::{card::Card, model::Location};

/// Brazil, at a zoom level showing the whole country.
pub const INITIAL_CENTER: (f64, f64) = (-15.8, -47.9);
pub const INITIAL_ZOOM: u8 = 4;
pub const LOCATION_ZOOM: u8 = 15;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct MarkerHandle(pub usize);

/// Highlighted markers are drawn larger and darker, nothing else changes.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum IconState {
    Normal,
    Highlighted,
}

pub trait MapView {
    fn set_center(&mut self, center: Point, zoom: u8);
    /// Replaces the marker of the previous searched address, if any.
    fn add_location_marker(&mut self, location: &Location);
    fn add_marker(&mut self, card: &Card, icon: IconState) -> MarkerHandle;
    fn set_icon(&mut self, marker: MarkerHandle, icon: IconState);
    /// Removes store markers. The location marker and the circle stay.
    fn remove_all_markers(&mut self);
    /// Replaces the previous search circle, if any.
    fn draw_circle(&mut self, center: Point, radius_m: f64);
    fn set_circle_radius(&mut self, radius_m: f64);
    fn fit_to_bounds(&mut self, bounds: Rect);
}

#[derive(Clone, Debug, PartialEq)]
pub enum Listing {
    NotSearched,
    /// The search came back with nothing.
    Empty,
    /// Results exist but none match the selected category.
    EmptyCategory(String),
    Cards(Vec<Card>),
}

impl Listing {
    pub fn count(&self) -> usize {
        match self {
            Self::Cards(x) => x.len(),
            _ => 0,
        }
    }

    /// Text for the list when there are no cards to show.
    pub fn empty_message(&self) -> Option<String> {
        match self {
            Self::NotSearched => Some("Enter an address to search for stores".to_string()),
            Self::Empty => Some("No stores found in this area".to_string()),
            Self::EmptyCategory(x) => Some(format!("No stores found in category \"{x}\"")),
            Self::Cards(_) => None,
        }
    }
}

/// A banner shown for a fixed time and then dismissed.
#[derive(Clone, Debug, PartialEq)]
pub struct Notice {
    pub message: String,
    pub duration: Duration,
}

pub trait ResultListView {
    fn set_loading(&mut self, loading: bool);
    fn show_notice(&mut self, notice: &Notice);
    /// An empty `categories` slice hides the bar, otherwise an "All" button
    /// is rendered ahead of them.
    fn render_categories(&mut self, categories: &[String], selected: Option<&str>);
    fn render_results(&mut self, listing: &Listing);
}
