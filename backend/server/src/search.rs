//! # Search
//!
//! `GET /api/nootropics` doubles as the browse filter when given query parameters.
//!
//! - `q`: free text, matched case-insensitively against name, category tags and benefits
//! - `categories`: comma-separated, keeps records carrying at least one of them
//!
//! No parameters, or blank ones, returns the full list in storage order.
use catalog::FilterCriteria;
use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    pub q: Option<String>,
    pub categories: Option<String>,
}

impl From<SearchParams> for FilterCriteria {
    fn from(params: SearchParams) -> Self {
        FilterCriteria::from_params(params.q.as_deref(), params.categories.as_deref())
    }
}
