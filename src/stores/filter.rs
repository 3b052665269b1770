//! Store filters and their translation to MongoDB query documents
//!
//! A [`StoreFilter`] is a nested, partially-specified structure: only the
//! fields a caller sets contribute clauses to the resulting query document
//! (an absent field never translates to "match null"). All clauses combine
//! conjunctively, including the closed-visibility toggle.
//!
//! String-valued address fields accept either a bare string (exact match)
//! or a [`StringSearch`] object carrying pattern operators. Each operator
//! set on a search becomes its own clause; when several operators target
//! the same field the clauses are gathered under a top-level `$and`, since
//! a single condition document cannot hold two `$regex` keys.

use bson::{doc, Document};
use serde::{Deserialize, Serialize};

use crate::db::schemas::Day;
use crate::stores::states;
use crate::types::{Result, SignpostError};

/// String comparison operators; all set operators apply conjunctively
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StringSearch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub eq: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contains: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub not_contains: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub starts_with: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub not_starts_with: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ends_with: Option<String>,
}

/// One normalized string predicate
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StringPredicate {
    Equals(String),
    Contains(String),
    NotContains(String),
    StartsWith(String),
    NotStartsWith(String),
    EndsWith(String),
}

impl StringPredicate {
    /// Translate to a MongoDB condition document
    pub fn to_condition(&self) -> Document {
        match self {
            StringPredicate::Equals(value) => doc! { "$eq": value },
            StringPredicate::Contains(value) => doc! { "$regex": value },
            StringPredicate::NotContains(value) => doc! { "$not": { "$regex": value } },
            StringPredicate::StartsWith(value) => doc! { "$regex": format!("^{value}") },
            StringPredicate::NotStartsWith(value) => {
                doc! { "$not": { "$regex": format!("^{value}") } }
            }
            StringPredicate::EndsWith(value) => doc! { "$regex": format!("{value}$") },
        }
    }
}

impl StringSearch {
    /// Collect the active predicates, in declaration order
    ///
    /// Empty-string operator values count as unset. No operator set yields
    /// an empty list (matches everything).
    pub fn predicates(&self) -> Vec<StringPredicate> {
        let mut predicates = Vec::new();

        let mut push = |value: &Option<String>, build: fn(String) -> StringPredicate| {
            if let Some(v) = value {
                if !v.is_empty() {
                    predicates.push(build(v.clone()));
                }
            }
        };

        push(&self.eq, StringPredicate::Equals);
        push(&self.contains, StringPredicate::Contains);
        push(&self.not_contains, StringPredicate::NotContains);
        push(&self.starts_with, StringPredicate::StartsWith);
        push(&self.not_starts_with, StringPredicate::NotStartsWith);
        push(&self.ends_with, StringPredicate::EndsWith);

        predicates
    }
}

/// Either a bare value (exact match) or a pattern search
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StringMatch {
    Value(String),
    Search(StringSearch),
}

/// Filter on the nested state field, by full name or two-letter code
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StateFilter {
    /// Full state name, e.g. "California"
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    /// Two-letter code, e.g. "CA"
    #[serde(skip_serializing_if = "Option::is_none")]
    pub abbreviation: Option<String>,
}

impl StateFilter {
    /// Resolve to the canonical two-letter code via the state catalog
    ///
    /// An explicit abbreviation wins over a full name. Unresolvable input
    /// fails with [`SignpostError::InvalidFilter`]; nothing set resolves to
    /// `None` (no clause).
    fn resolve(&self) -> Result<Option<&'static str>> {
        if let Some(abbreviation) = self.abbreviation.as_deref().filter(|v| !v.is_empty()) {
            let entry = states::lookup(abbreviation).map_err(|_| {
                SignpostError::InvalidFilter(format!("unknown state code '{abbreviation}'"))
            })?;
            return Ok(Some(entry.abbreviation));
        }

        if let Some(name) = self.state.as_deref().filter(|v| !v.is_empty()) {
            let entry = states::find_by_name(name).ok_or_else(|| {
                SignpostError::InvalidFilter(format!("unknown state name '{name}'"))
            })?;
            return Ok(Some(entry.abbreviation));
        }

        Ok(None)
    }
}

/// Filter on the nested address fields
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AddressFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub street: Option<StringMatch>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<StringMatch>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<StateFilter>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zip: Option<StringMatch>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<StringMatch>,
}

/// Filter for stores open on a given day
///
/// The `is_open` time-of-day field is accepted for API compatibility but
/// has no effect: the original time-window comparison was disabled after a
/// query cast error and its intended interval semantics were never pinned
/// down, so only day filtering is active.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OpenHourFilter {
    /// Time of day in HHMM form. Parsed but intentionally not applied.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_open: Option<i32>,

    /// Day of the week (case-insensitive)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub day: Option<Day>,
}

/// The filter input for store queries
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoreFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<AddressFilter>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub open_hours: Option<OpenHourFilter>,
}

/// Attach the clauses for one string-matched field
fn apply_string_match(
    query: &mut Document,
    and_clauses: &mut Vec<Document>,
    path: &str,
    value: &StringMatch,
) {
    match value {
        StringMatch::Value(v) => {
            if !v.is_empty() {
                query.insert(path, v.clone());
            }
        }
        StringMatch::Search(search) => {
            let predicates = search.predicates();
            match predicates.as_slice() {
                [] => {}
                [single] => {
                    query.insert(path, single.to_condition());
                }
                many => {
                    for predicate in many {
                        and_clauses.push(doc! { path: predicate.to_condition() });
                    }
                }
            }
        }
    }
}

impl StoreFilter {
    /// Translate into a MongoDB query document
    ///
    /// By default records with `closed = true` are excluded; the
    /// `include_closed` toggle disables that clause. An empty filter yields
    /// a query matching every (non-closed) record.
    pub fn to_document(&self, include_closed: bool) -> Result<Document> {
        let mut query = Document::new();
        let mut and_clauses: Vec<Document> = Vec::new();

        if !include_closed {
            query.insert("closed", doc! { "$ne": true });
        }

        if let Some(name) = self.name.as_deref().filter(|v| !v.is_empty()) {
            query.insert("name", name);
        }

        if let Some(address) = &self.address {
            if let Some(street) = &address.street {
                apply_string_match(&mut query, &mut and_clauses, "address.street", street);
            }
            if let Some(city) = &address.city {
                apply_string_match(&mut query, &mut and_clauses, "address.city", city);
            }
            if let Some(state) = &address.state {
                if let Some(code) = state.resolve()? {
                    query.insert("address.state", code);
                }
            }
            if let Some(zip) = &address.zip {
                apply_string_match(&mut query, &mut and_clauses, "address.zip", zip);
            }
            if let Some(country) = &address.country {
                apply_string_match(&mut query, &mut and_clauses, "address.country", country);
            }
        }

        if let Some(open_hours) = &self.open_hours {
            if let Some(day) = open_hours.day {
                query.insert("open_hours.day", day.as_str());
            }
            // open_hours.is_open: parsed but not translated (inactive)
        }

        if !and_clauses.is_empty() {
            query.insert("$and", and_clauses);
        }

        Ok(query)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_filter_excludes_closed_only() {
        let query = StoreFilter::default().to_document(false).unwrap();
        assert_eq!(query, doc! { "closed": { "$ne": true } });
    }

    #[test]
    fn test_include_closed_yields_empty_query() {
        let query = StoreFilter::default().to_document(true).unwrap();
        assert!(query.is_empty());
    }

    #[test]
    fn test_name_is_direct_equality() {
        let filter = StoreFilter {
            name: Some("Corner Market".to_string()),
            ..Default::default()
        };
        let query = filter.to_document(true).unwrap();
        assert_eq!(query.get_str("name").unwrap(), "Corner Market");
    }

    #[test]
    fn test_address_value_maps_to_nested_paths() {
        let filter = StoreFilter {
            address: Some(AddressFilter {
                city: Some(StringMatch::Value("Boston".to_string())),
                zip: Some(StringMatch::Value("02118".to_string())),
                ..Default::default()
            }),
            ..Default::default()
        };
        let query = filter.to_document(true).unwrap();
        assert_eq!(query.get_str("address.city").unwrap(), "Boston");
        assert_eq!(query.get_str("address.zip").unwrap(), "02118");
    }

    #[test]
    fn test_state_name_resolves_to_code() {
        let filter = StoreFilter {
            address: Some(AddressFilter {
                state: Some(StateFilter {
                    state: Some("massachusetts".to_string()),
                    abbreviation: None,
                }),
                ..Default::default()
            }),
            ..Default::default()
        };
        let query = filter.to_document(true).unwrap();
        assert_eq!(query.get_str("address.state").unwrap(), "MA");
    }

    #[test]
    fn test_unresolvable_state_is_invalid_filter() {
        let filter = StoreFilter {
            address: Some(AddressFilter {
                state: Some(StateFilter {
                    state: Some("Atlantis".to_string()),
                    abbreviation: None,
                }),
                ..Default::default()
            }),
            ..Default::default()
        };
        assert!(matches!(
            filter.to_document(true),
            Err(SignpostError::InvalidFilter(_))
        ));

        let filter = StoreFilter {
            address: Some(AddressFilter {
                state: Some(StateFilter {
                    state: None,
                    abbreviation: Some("ZZ".to_string()),
                }),
                ..Default::default()
            }),
            ..Default::default()
        };
        assert!(matches!(
            filter.to_document(true),
            Err(SignpostError::InvalidFilter(_))
        ));
    }

    #[test]
    fn test_day_filter_lowercases() {
        let filter = StoreFilter {
            open_hours: Some(OpenHourFilter {
                is_open: None,
                day: Some(Day::Monday),
            }),
            ..Default::default()
        };
        let query = filter.to_document(true).unwrap();
        assert_eq!(query.get_str("open_hours.day").unwrap(), "monday");
    }

    #[test]
    fn test_is_open_contributes_no_clause() {
        let filter = StoreFilter {
            open_hours: Some(OpenHourFilter {
                is_open: Some(1200),
                day: None,
            }),
            ..Default::default()
        };
        let query = filter.to_document(true).unwrap();
        assert!(query.is_empty());
    }

    #[test]
    fn test_single_pattern_inlines_condition() {
        let filter = StoreFilter {
            address: Some(AddressFilter {
                street: Some(StringMatch::Search(StringSearch {
                    starts_with: Some("12".to_string()),
                    ..Default::default()
                })),
                ..Default::default()
            }),
            ..Default::default()
        };
        let query = filter.to_document(true).unwrap();
        assert_eq!(
            query.get_document("address.street").unwrap(),
            &doc! { "$regex": "^12" }
        );
    }

    // The source this design derives from assigned `contains`, `starts_with`
    // and `ends_with` into one `$regex` slot, so the last assignment won.
    // Here every active operator emits its own clause and they apply
    // conjunctively under `$and`.
    #[test]
    fn test_conjunction_not_last_wins() {
        let filter = StoreFilter {
            address: Some(AddressFilter {
                city: Some(StringMatch::Search(StringSearch {
                    contains: Some("port".to_string()),
                    starts_with: Some("New".to_string()),
                    ..Default::default()
                })),
                ..Default::default()
            }),
            ..Default::default()
        };
        let query = filter.to_document(true).unwrap();

        let and = query.get_array("$and").unwrap();
        assert_eq!(and.len(), 2);
        assert!(query.get("address.city").is_none());
    }

    #[test]
    fn test_string_search_predicate_order() {
        let search = StringSearch {
            eq: Some("a".to_string()),
            not_contains: Some("b".to_string()),
            ends_with: Some("c".to_string()),
            ..Default::default()
        };
        assert_eq!(
            search.predicates(),
            vec![
                StringPredicate::Equals("a".to_string()),
                StringPredicate::NotContains("b".to_string()),
                StringPredicate::EndsWith("c".to_string()),
            ]
        );
    }

    #[test]
    fn test_empty_operator_values_are_ignored() {
        let search = StringSearch {
            contains: Some(String::new()),
            ..Default::default()
        };
        assert!(search.predicates().is_empty());
    }

    #[test]
    fn test_filter_deserializes_bare_and_search_values() {
        let filter: StoreFilter = serde_json::from_str(
            r#"{
                "address": {
                    "city": "Boston",
                    "street": { "contains": "Main" },
                    "state": { "abbreviation": "MA" }
                },
                "open_hours": { "day": "Friday", "is_open": 930 }
            }"#,
        )
        .unwrap();

        let address = filter.address.as_ref().unwrap();
        assert!(matches!(address.city, Some(StringMatch::Value(_))));
        assert!(matches!(address.street, Some(StringMatch::Search(_))));

        let query = filter.to_document(true).unwrap();
        assert_eq!(query.get_str("address.city").unwrap(), "Boston");
        assert_eq!(query.get_str("open_hours.day").unwrap(), "friday");
    }
}
