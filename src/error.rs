use thiserror::Error;

/// Everything that can stop a search. The display text is what the user sees.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SearchError {
    #[error("Please enter a valid address")]
    EmptyAddress,

    #[error("Address not found. Try being more specific.")]
    AddressNotFound,

    #[error("Failed to look up address: {0}")]
    Geocode(String),

    #[error("Failed to fetch stores: {0}")]
    FeatureQuery(String),
}

/// Flattens a ureq failure into something fit for a banner. Timeouts land
/// here too, as transport errors.
pub(crate) fn describe(err: ureq::Error) -> String {
    match err {
        ureq::Error::Status(code, response) => {
            format!("server responded with {code} {}", response.status_text())
        }
        ureq::Error::Transport(transport) => transport.to_string(),
    }
}
