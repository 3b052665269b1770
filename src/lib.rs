//! Signpost - store locator directory service
//!
//! Signpost stores retail location records (address, contact info, hours,
//! geocoordinates, social links) in MongoDB and serves filtered, paginated
//! queries plus a nearby-search over a thin HTTP boundary. Records enter
//! the system once, through a bulk import of an external CSV feed.
//!
//! ## Modules
//!
//! - **db**: lazy MongoDB handle, typed collection wrapper, schemas
//! - **stores**: state catalog, filter translation, pagination, proximity
//!   queries, read-time views, and the store operations
//! - **ingest**: CSV feed fetch + parsing (free-text weekly hours included)
//! - **routes** / **server**: hyper HTTP boundary

pub mod config;
pub mod db;
pub mod ingest;
pub mod routes;
pub mod server;
pub mod stores;
pub mod types;

pub use config::Args;
pub use server::{run, AppState};
pub use types::{Result, SignpostError};
