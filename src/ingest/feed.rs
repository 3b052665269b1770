//! CSV store feed
//!
//! One external record per line: name, address columns, up to two each of
//! phone/fax/email, a free-text weekly-hours string, coordinates, and
//! optional social handles. Rows are transient: read once per ingestion
//! run, converted to store documents, never persisted raw.
//!
//! Conversion policy:
//! - the state column is stored as given, NOT checked against the state
//!   catalog (an invalid code surfaces later, at display-time lookup)
//! - unparsable coordinates default to 0 rather than failing (the feed is
//!   known to carry junk in these columns)
//! - a malformed hours string fails the whole batch, since all rows are
//!   validated before any write

use serde::Deserialize;

use crate::db::schemas::{GeoPoint, Metadata, Social, StoreAddress, StoreDoc};
use crate::ingest::hours;
use crate::types::{Result, SignpostError};

/// One row of the store feed, column names as published
#[derive(Debug, Clone, Deserialize)]
pub struct CsvStoreRecord {
    pub name: String,
    #[serde(default)]
    pub url: Option<String>,
    pub street_address: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub country: String,
    #[serde(default)]
    pub phone_number_1: Option<String>,
    #[serde(default)]
    pub phone_number_2: Option<String>,
    #[serde(default)]
    pub fax_1: Option<String>,
    #[serde(default)]
    pub fax_2: Option<String>,
    #[serde(default)]
    pub email_1: Option<String>,
    #[serde(default)]
    pub email_2: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
    pub open_hours: String,
    pub latitude: String,
    pub longitude: String,
    #[serde(default)]
    pub facebook: Option<String>,
    #[serde(default)]
    pub twitter: Option<String>,
    #[serde(default)]
    pub instagram: Option<String>,
    #[serde(default)]
    pub pinterest: Option<String>,
    #[serde(default)]
    pub youtube: Option<String>,
}

/// Keep the non-empty values of a column pair, in feed order
fn collect_present(values: [Option<String>; 2]) -> Vec<String> {
    values
        .into_iter()
        .flatten()
        .filter(|v| !v.is_empty())
        .collect()
}

fn none_if_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

/// Lenient coordinate parse: junk defaults to 0
fn parse_coordinate(value: &str) -> f64 {
    value.trim().parse::<f64>().unwrap_or(0.0)
}

impl CsvStoreRecord {
    /// Convert this row into a storage-ready store document
    pub fn into_store(self) -> Result<StoreDoc> {
        let open_hours = hours::parse_weekly(&self.open_hours)?;
        let longitude = parse_coordinate(&self.longitude);
        let latitude = parse_coordinate(&self.latitude);

        Ok(StoreDoc {
            _id: None,
            metadata: Metadata::default(),
            name: self.name,
            url: none_if_empty(self.url),
            address: StoreAddress {
                street: self.street_address,
                city: self.city,
                state: self.state,
                zip: self.zip_code,
                country: self.country,
            },
            phone_numbers: collect_present([self.phone_number_1, self.phone_number_2]),
            fax_numbers: collect_present([self.fax_1, self.fax_2]),
            emails: collect_present([self.email_1, self.email_2]),
            website: none_if_empty(self.website),
            open_hours,
            location: GeoPoint::new(longitude, latitude),
            social: Social {
                facebook: none_if_empty(self.facebook),
                twitter: none_if_empty(self.twitter),
                instagram: none_if_empty(self.instagram),
                pinterest: none_if_empty(self.pinterest),
                youtube: none_if_empty(self.youtube),
            },
            closed: false,
        })
    }
}

/// Parse the full feed into store documents, all-or-nothing
///
/// The first unreadable row or malformed hours string aborts the batch;
/// nothing is returned for partial input.
pub fn parse_records(data: &str) -> Result<Vec<StoreDoc>> {
    let mut reader = csv::Reader::from_reader(data.as_bytes());
    let mut stores = Vec::new();

    for (index, row) in reader.deserialize::<CsvStoreRecord>().enumerate() {
        let line = index + 2; // 1-based, after the header row
        let record = row.map_err(|e| {
            SignpostError::MalformedSourceData(format!("feed line {line}: {e}"))
        })?;
        let store = record.into_store().map_err(|e| match e {
            SignpostError::MalformedSourceData(msg) => {
                SignpostError::MalformedSourceData(format!("feed line {line}: {msg}"))
            }
            other => other,
        })?;
        stores.push(store);
    }

    Ok(stores)
}

/// Fetch the feed body as UTF-8 text
pub async fn fetch_feed(url: &str) -> Result<String> {
    let response = reqwest::get(url)
        .await
        .map_err(|e| SignpostError::Feed(format!("feed request failed: {e}")))?;

    let status = response.status();
    if !status.is_success() {
        return Err(SignpostError::Feed(format!("feed returned status {status}")));
    }

    response
        .text()
        .await
        .map_err(|e| SignpostError::Feed(format!("failed to read feed body: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "name,url,street_address,city,state,zip_code,country,\
phone_number_1,phone_number_2,fax_1,fax_2,email_1,email_2,website,open_hours,\
latitude,longitude,facebook,twitter,instagram,pinterest,youtube";

    fn feed(rows: &[&str]) -> String {
        let mut out = String::from(HEADER);
        for row in rows {
            out.push('\n');
            out.push_str(row);
        }
        out
    }

    #[test]
    fn test_row_converts_to_store() {
        let data = feed(&[
            "Corner Market,https://corner.example,1 Main St,Boston,MA,02118,US,\
555-0100,555-0101,,,info@corner.example,,https://corner.example,\
\"Monday 7:20 AM - 10:40 PM, Tuesday 7:00 AM - 7:00 PM\",\
42.36,-71.06,corner.fb,,,,",
        ]);

        let stores = parse_records(&data).unwrap();
        assert_eq!(stores.len(), 1);

        let store = &stores[0];
        assert_eq!(store.name, "Corner Market");
        assert_eq!(store.address.state, "MA");
        assert_eq!(store.phone_numbers, vec!["555-0100", "555-0101"]);
        assert!(store.fax_numbers.is_empty());
        assert_eq!(store.emails, vec!["info@corner.example"]);
        assert_eq!(store.open_hours.len(), 2);
        assert_eq!(store.open_hours[0].start, 720);
        assert_eq!(store.open_hours[0].end, 2240);
        // GeoJSON order: [longitude, latitude]
        assert_eq!(store.location.coordinates, [-71.06, 42.36]);
        assert_eq!(store.social.facebook.as_deref(), Some("corner.fb"));
        assert!(store.social.twitter.is_none());
        assert!(!store.closed);
    }

    #[test]
    fn test_unparsable_longitude_defaults_to_zero() {
        let data = feed(&[
            "Corner Market,,1 Main St,Boston,MA,02118,US,,,,,,,,\
Monday 7:00 AM - 7:00 PM,42.36,abc,,,,,",
        ]);

        let stores = parse_records(&data).unwrap();
        assert_eq!(stores[0].location.coordinates[0], 0.0);
        assert_eq!(stores[0].location.coordinates[1], 42.36);
    }

    #[test]
    fn test_state_is_not_validated_at_ingestion() {
        let data = feed(&[
            "Corner Market,,1 Main St,Boston,Narnia,02118,US,,,,,,,,\
Monday 7:00 AM - 7:00 PM,42.36,-71.06,,,,,",
        ]);

        // The bad state only fails later, at display-time lookup
        let stores = parse_records(&data).unwrap();
        assert_eq!(stores[0].address.state, "Narnia");
    }

    #[test]
    fn test_one_bad_row_aborts_the_batch() {
        let data = feed(&[
            "Good Store,,1 Main St,Boston,MA,02118,US,,,,,,,,\
Monday 7:00 AM - 7:00 PM,42.36,-71.06,,,,,",
            "Bad Store,,2 Main St,Boston,MA,02118,US,,,,,,,,\
Monday whenever,42.36,-71.06,,,,,",
        ]);

        assert!(matches!(
            parse_records(&data),
            Err(SignpostError::MalformedSourceData(_))
        ));
    }

    #[test]
    fn test_missing_row_fields_abort_the_batch() {
        let data = feed(&["Lonely Store,only-two-columns"]);
        assert!(matches!(
            parse_records(&data),
            Err(SignpostError::MalformedSourceData(_))
        ));
    }

    #[test]
    fn test_empty_feed_yields_no_stores() {
        let stores = parse_records(&feed(&[])).unwrap();
        assert!(stores.is_empty());
    }
}
