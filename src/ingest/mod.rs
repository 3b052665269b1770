//! CSV feed ingestion
//!
//! One-shot bulk loader: fetches the external store feed, parses every row
//! into a normalized store document (free-text hours included), and hands
//! the whole batch to the store service for a single bulk insert. A single
//! bad row fails the entire import, since validation happens before the
//! write.

pub mod feed;
pub mod hours;

pub use feed::{fetch_feed, parse_records, CsvStoreRecord};
