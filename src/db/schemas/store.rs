//! Store document schema
//!
//! The persisted shape of a retail location: address, contact columns,
//! weekly opening hours, GeoJSON coordinates, and social links.
//!
//! The `address.state` field holds a two-letter code and is stored as
//! given; it is NOT validated against the state catalog at write time.
//! Validation happens when the document is expanded for display (see
//! `stores::view`), so a bad code in the feed only surfaces on read.

use bson::{doc, oid::ObjectId, Document};
use mongodb::options::IndexOptions;
use serde::{Deserialize, Serialize};

use crate::db::mongo::{IntoIndexes, MutMetadata};
use crate::db::schemas::Metadata;

/// Collection name for stores
pub const STORE_COLLECTION: &str = "stores";

/// Days of the week, serialized lowercase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Day {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl Day {
    /// Lowercase canonical name
    pub fn as_str(self) -> &'static str {
        match self {
            Day::Monday => "monday",
            Day::Tuesday => "tuesday",
            Day::Wednesday => "wednesday",
            Day::Thursday => "thursday",
            Day::Friday => "friday",
            Day::Saturday => "saturday",
            Day::Sunday => "sunday",
        }
    }

    /// Case-insensitive parse of a weekday name
    pub fn parse(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().as_str() {
            "monday" => Some(Day::Monday),
            "tuesday" => Some(Day::Tuesday),
            "wednesday" => Some(Day::Wednesday),
            "thursday" => Some(Day::Thursday),
            "friday" => Some(Day::Friday),
            "saturday" => Some(Day::Saturday),
            "sunday" => Some(Day::Sunday),
            _ => None,
        }
    }
}

impl std::fmt::Display for Day {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Day {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        Day::parse(&value)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid day of week: '{value}'")))
    }
}

/// One opening interval: a day plus start/end times encoded as HHMM
/// integers (700 = 7:00, 1900 = 19:00)
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct OpenHour {
    pub day: Day,
    pub start: i32,
    pub end: i32,
}

/// Postal address; `state` is a two-letter code
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct StoreAddress {
    pub street: String,
    pub city: String,
    pub state: String,
    pub zip: String,
    pub country: String,
}

/// GeoJSON point, `coordinates` ordered [longitude, latitude]
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct GeoPoint {
    #[serde(rename = "type")]
    pub point_type: String,
    pub coordinates: [f64; 2],
}

impl GeoPoint {
    /// Build a GeoJSON point from a longitude/latitude pair
    pub fn new(longitude: f64, latitude: f64) -> Self {
        Self {
            point_type: "Point".to_string(),
            coordinates: [longitude, latitude],
        }
    }

    pub fn longitude(&self) -> f64 {
        self.coordinates[0]
    }

    pub fn latitude(&self) -> f64 {
        self.coordinates[1]
    }
}

/// Social network links
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct Social {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub facebook: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub twitter: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instagram: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pinterest: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub youtube: Option<String>,
}

/// Store document stored in MongoDB
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct StoreDoc {
    /// MongoDB document ID
    #[serde(skip_serializing_if = "Option::is_none")]
    pub _id: Option<ObjectId>,

    /// Common metadata (created_at, updated_at)
    #[serde(default)]
    pub metadata: Metadata,

    /// Store name
    pub name: String,

    /// Store page URL
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    /// Postal address
    pub address: StoreAddress,

    /// Contact phone numbers, non-empty values in feed order
    #[serde(default)]
    pub phone_numbers: Vec<String>,

    /// Contact fax numbers
    #[serde(default)]
    pub fax_numbers: Vec<String>,

    /// Contact email addresses
    #[serde(default)]
    pub emails: Vec<String>,

    /// Store website
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,

    /// Weekly opening hours
    #[serde(default)]
    pub open_hours: Vec<OpenHour>,

    /// Geocoordinates, 2dsphere-indexed
    pub location: GeoPoint,

    /// Social network links
    #[serde(default)]
    pub social: Social,

    /// Whether the store is closed down (hidden from queries by default)
    #[serde(default)]
    pub closed: bool,
}

impl IntoIndexes for StoreDoc {
    fn into_indices() -> Vec<(Document, Option<IndexOptions>)> {
        vec![
            // Geospatial index for nearby queries
            (
                doc! { "location": "2dsphere" },
                Some(
                    IndexOptions::builder()
                        .name("location_2dsphere".to_string())
                        .build(),
                ),
            ),
            // Index on state code for address filters
            (
                doc! { "address.state": 1 },
                Some(
                    IndexOptions::builder()
                        .name("address_state_index".to_string())
                        .build(),
                ),
            ),
        ]
    }
}

impl MutMetadata for StoreDoc {
    fn mut_metadata(&mut self) -> &mut Metadata {
        &mut self.metadata
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_day_parse_is_case_insensitive() {
        assert_eq!(Day::parse("Monday"), Some(Day::Monday));
        assert_eq!(Day::parse("SUNDAY"), Some(Day::Sunday));
        assert_eq!(Day::parse("wednesday"), Some(Day::Wednesday));
        assert_eq!(Day::parse("someday"), None);
    }

    #[test]
    fn test_day_serializes_lowercase() {
        let json = serde_json::to_string(&Day::Friday).unwrap();
        assert_eq!(json, r#""friday""#);
    }

    #[test]
    fn test_day_deserializes_mixed_case() {
        let day: Day = serde_json::from_str(r#""Tuesday""#).unwrap();
        assert_eq!(day, Day::Tuesday);
        assert!(serde_json::from_str::<Day>(r#""noday""#).is_err());
    }

    #[test]
    fn test_geo_point_order() {
        let point = GeoPoint::new(-71.06, 42.36);
        assert_eq!(point.longitude(), -71.06);
        assert_eq!(point.latitude(), 42.36);
        assert_eq!(point.point_type, "Point");
    }
}
