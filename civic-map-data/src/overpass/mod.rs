//! Overpass interpreter adapter.
//!
//! [`HttpOverpassSource`] implements [`civic_map_core::GeodataSource`] by
//! sending the generated query as the `data` parameter of a `GET` request and
//! decoding the `[out:json]` element list.
//!
//! # Example
//!
//! ```no_run
//! use std::time::Duration;
//! use civic_map_core::{BoundingBox, GeodataSource, build_query};
//! use civic_map_data::overpass::{HttpOverpassSource, HttpOverpassSourceConfig};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let config = HttpOverpassSourceConfig::default()
//!     .with_timeout(Duration::from_secs(60))
//!     .with_user_agent("my-app/1.0");
//! let source = HttpOverpassSource::with_config(config)?;
//!
//! let bbox = BoundingBox::new(-25.33, -57.68, -25.26, -57.61)?;
//! let points = source.fetch_points(&build_query(&bbox)).await?;
//! println!("{} points", points.len());
//! # Ok(())
//! # }
//! ```

mod response;
mod source;

pub use response::{Element, OverpassResponse};
pub use source::{DEFAULT_OVERPASS_ENDPOINT, HttpOverpassSource, HttpOverpassSourceConfig};
