//! Document schemas

pub mod metadata;
pub mod store;

pub use metadata::Metadata;
pub use store::{
    Day, GeoPoint, OpenHour, Social, StoreAddress, StoreDoc, STORE_COLLECTION,
};
