/// Filter for listing trips.
///
/// An empty query matches every trip. Results are always ordered by id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TripQuery {
    /// Only trips in this country (exact match).
    pub country: Option<String>,
}

impl TripQuery {
    /// Creates a query matching all trips.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a query for trips in a specific country.
    pub fn for_country(country: impl Into<String>) -> Self {
        Self {
            country: Some(country.into()),
        }
    }

    /// Filters by country. An empty string clears the filter.
    pub fn country(mut self, country: impl Into<String>) -> Self {
        let country = country.into();
        self.country = if country.is_empty() {
            None
        } else {
            Some(country)
        };
        self
    }

    /// Returns true if a trip in `country` matches this query.
    pub fn matches(&self, country: &str) -> bool {
        self.country.as_deref().is_none_or(|c| c == country)
    }
}
