use std::collections::BTreeSet;

use geo::Point;
use tracing::{debug, warn};

use crate::{category::classify, model::Feature};

/// A loaded feature along with what was derived from it at load time.
#[derive(Clone, Debug, PartialEq)]
pub struct Entry {
    pub feature: Feature,
    pub point: Point,
    pub category: String,
}

#[derive(Debug, Default)]
struct ResultSet {
    entries: Vec<Entry>,
    categories: Vec<String>,
    selected: Option<String>,
}

#[derive(Debug, PartialEq)]
pub struct Projection<'a> {
    pub entries: Vec<&'a Entry>,
    pub count: usize,
}

/// Holds the results of the latest search and the active category filter.
///
/// `None` means no search has been performed yet, which the views render
/// differently from a search that came back empty.
#[derive(Debug, Default)]
pub struct ResultAggregator {
    results: Option<ResultSet>,
}

impl ResultAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load(&mut self, features: Vec<Feature>) {
        let mut entries = Vec::with_capacity(features.len());
        for feature in features {
            let Some(point) = feature.position() else {
                warn!(id = %feature.id, "skipping feature without coordinates");
                continue;
            };
            let category = classify(feature.shop());
            entries.push(Entry {
                feature,
                point,
                category,
            });
        }

        let categories: BTreeSet<_> = entries.iter().map(|x| x.category.clone()).collect();
        debug!(
            entries = entries.len(),
            categories = categories.len(),
            "loaded results"
        );

        self.results = Some(ResultSet {
            entries,
            categories: categories.into_iter().collect(),
            selected: None,
        });
    }

    /// Unknown labels are accepted and simply match nothing.
    pub fn select_category(&mut self, label: Option<&str>) {
        if let Some(results) = &mut self.results {
            results.selected = label.map(|x| x.to_string());
        }
    }

    pub fn selected_category(&self) -> Option<&str> {
        self.results.as_ref()?.selected.as_deref()
    }

    pub fn projection(&self) -> Projection<'_> {
        let Some(results) = &self.results else {
            return Projection {
                entries: Vec::new(),
                count: 0,
            };
        };

        let entries: Vec<_> = match &results.selected {
            Some(selected) => results
                .entries
                .iter()
                .filter(|x| &x.category == selected)
                .collect(),
            None => results.entries.iter().collect(),
        };
        Projection {
            count: entries.len(),
            entries,
        }
    }

    pub fn known_categories(&self) -> &[String] {
        match &self.results {
            Some(x) => &x.categories,
            None => &[],
        }
    }

    /// Every loaded entry regardless of the filter, for map bounds.
    pub fn all_entries(&self) -> &[Entry] {
        match &self.results {
            Some(x) => &x.entries,
            None => &[],
        }
    }

    pub fn has_searched(&self) -> bool {
        self.results.is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.all_entries().is_empty()
    }
}
