//! Store domain
//!
//! The core of the service: the state catalog, the filter-to-query
//! translation layer, pagination and proximity policy, read-time views,
//! and the operations that tie them to storage.

pub mod filter;
pub mod nearby;
pub mod pagination;
pub mod service;
pub mod states;
pub mod view;

pub use filter::{
    AddressFilter, OpenHourFilter, StateFilter, StoreFilter, StringMatch, StringPredicate,
    StringSearch,
};
pub use nearby::{NearbyQuery, DEFAULT_RADIUS_KM};
pub use pagination::Pagination;
pub use service::{ImportSummary, SocialUpdate, StoreService, StoreUpdate};
pub use states::{State, STATES};
pub use view::StoreView;
