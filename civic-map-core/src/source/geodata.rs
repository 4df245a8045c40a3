//! Geodata query trait.

use async_trait::async_trait;

use crate::poi::RawPoint;
use crate::query::OverpassQuery;

use super::error::GeodataError;

/// Run a viewport query against a remote geodata service.
///
/// Implementations return points in response order and drop elements
/// without coordinates. Duplicate ids are left for the classifier to skip.
///
/// # Examples
///
/// ```rust
/// use async_trait::async_trait;
/// use civic_map_core::{GeodataError, GeodataSource, OverpassQuery, RawPoint};
///
/// struct Nothing;
///
/// #[async_trait(?Send)]
/// impl GeodataSource for Nothing {
///     async fn fetch_points(&self, _query: &OverpassQuery) -> Result<Vec<RawPoint>, GeodataError> {
///         Ok(Vec::new())
///     }
/// }
/// ```
#[async_trait(?Send)]
pub trait GeodataSource {
    /// Execute `query` and return the tagged points it selects.
    async fn fetch_points(&self, query: &OverpassQuery) -> Result<Vec<RawPoint>, GeodataError>;
}

#[async_trait(?Send)]
impl<T: GeodataSource + ?Sized> GeodataSource for &T {
    async fn fetch_points(&self, query: &OverpassQuery) -> Result<Vec<RawPoint>, GeodataError> {
        (**self).fetch_points(query).await
    }
}
