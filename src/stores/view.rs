//! Read-time store views
//!
//! The display form of a stored record. The stored two-letter state code is
//! expanded to its catalog entry here, at read time: a record ingested
//! with an unrecognized code fails only when it is viewed, preserving the
//! permissive-ingest / strict-read boundary.

use serde::Serialize;

use crate::db::schemas::{Day, StoreDoc};
use crate::stores::states::{self, State};
use crate::types::Result;

/// Geographic coordinates in display order
#[derive(Debug, Clone, Copy, Serialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

/// One opening interval as served to callers
#[derive(Debug, Clone, Serialize)]
pub struct OpenHourView {
    pub day: Day,
    pub open: i32,
    pub close: i32,
}

/// Address with the state code expanded to its catalog entry
#[derive(Debug, Clone, Serialize)]
pub struct AddressView {
    pub street: String,
    pub city: String,
    pub state: &'static State,
    pub zip: String,
    pub country: String,
}

/// Social links with empty-string defaults
#[derive(Debug, Clone, Serialize)]
pub struct SocialView {
    pub facebook: String,
    pub twitter: String,
    pub instagram: String,
    pub pinterest: String,
    pub youtube: String,
}

/// The response shape of a store
#[derive(Debug, Clone, Serialize)]
pub struct StoreView {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    pub address: AddressView,
    pub phone_numbers: Vec<String>,
    pub fax_numbers: Vec<String>,
    pub emails: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    pub open_hours: Vec<OpenHourView>,
    pub coordinates: Coordinates,
    pub social: SocialView,
    pub closed: bool,
}

impl StoreView {
    /// Expand a stored document into its display form
    ///
    /// Fails with [`crate::types::SignpostError::UnknownState`] when the
    /// stored state code is not in the catalog.
    pub fn from_doc(doc: StoreDoc) -> Result<Self> {
        let state = states::lookup(&doc.address.state)?;

        Ok(Self {
            id: doc
                ._id
                .map(|oid| oid.to_hex())
                .unwrap_or_else(|| "unknown".to_string()),
            name: doc.name,
            url: doc.url,
            address: AddressView {
                street: doc.address.street,
                city: doc.address.city,
                state,
                zip: doc.address.zip,
                country: doc.address.country,
            },
            phone_numbers: doc.phone_numbers,
            fax_numbers: doc.fax_numbers,
            emails: doc.emails,
            website: doc.website,
            open_hours: doc
                .open_hours
                .into_iter()
                .map(|h| OpenHourView {
                    day: h.day,
                    open: h.start,
                    close: h.end,
                })
                .collect(),
            coordinates: Coordinates {
                latitude: doc.location.latitude(),
                longitude: doc.location.longitude(),
            },
            social: SocialView {
                facebook: doc.social.facebook.unwrap_or_default(),
                twitter: doc.social.twitter.unwrap_or_default(),
                instagram: doc.social.instagram.unwrap_or_default(),
                pinterest: doc.social.pinterest.unwrap_or_default(),
                youtube: doc.social.youtube.unwrap_or_default(),
            },
            closed: doc.closed,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::schemas::{GeoPoint, Metadata, OpenHour, Social, StoreAddress};
    use crate::types::SignpostError;

    fn store_with_state(state: &str) -> StoreDoc {
        StoreDoc {
            _id: None,
            metadata: Metadata::default(),
            name: "Corner Market".to_string(),
            url: None,
            address: StoreAddress {
                street: "1 Main St".to_string(),
                city: "Boston".to_string(),
                state: state.to_string(),
                zip: "02118".to_string(),
                country: "US".to_string(),
            },
            phone_numbers: vec!["555-0100".to_string()],
            fax_numbers: vec![],
            emails: vec![],
            website: None,
            open_hours: vec![OpenHour {
                day: Day::Monday,
                start: 700,
                end: 1900,
            }],
            location: GeoPoint::new(-71.06, 42.36),
            social: Social::default(),
            closed: false,
        }
    }

    #[test]
    fn test_state_expands_at_read_time() {
        let view = StoreView::from_doc(store_with_state("MA")).unwrap();
        assert_eq!(view.address.state.abbreviation, "MA");
        assert_eq!(view.address.state.name, "Massachusetts");
    }

    #[test]
    fn test_unknown_stored_state_fails_on_read() {
        assert!(matches!(
            StoreView::from_doc(store_with_state("XX")),
            Err(SignpostError::UnknownState(_))
        ));
    }

    #[test]
    fn test_open_hours_rename_to_open_close() {
        let view = StoreView::from_doc(store_with_state("MA")).unwrap();
        assert_eq!(view.open_hours.len(), 1);
        assert_eq!(view.open_hours[0].open, 700);
        assert_eq!(view.open_hours[0].close, 1900);
    }

    #[test]
    fn test_coordinates_unswap_from_geojson_order() {
        let view = StoreView::from_doc(store_with_state("MA")).unwrap();
        assert_eq!(view.coordinates.longitude, -71.06);
        assert_eq!(view.coordinates.latitude, 42.36);
    }

    #[test]
    fn test_missing_id_renders_unknown() {
        let view = StoreView::from_doc(store_with_state("MA")).unwrap();
        assert_eq!(view.id, "unknown");
    }

    #[test]
    fn test_social_defaults_to_empty_strings() {
        let view = StoreView::from_doc(store_with_state("MA")).unwrap();
        assert_eq!(view.social.facebook, "");
        assert_eq!(view.social.youtube, "");
    }
}
