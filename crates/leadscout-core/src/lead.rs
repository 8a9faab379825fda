use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Everything in a phone string that a dialer cannot use.
static NON_DIAL_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^0-9+]").expect("valid dial regex"));

/// One business as returned by the search service.
///
/// All five fields are required strings; deserialization rejects a record
/// with a missing field or a non-string value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BusinessListing {
    pub name: String,
    pub phone: String,
    pub address: String,
    pub cuisine: String,
    pub maps_url: String,
}

/// A sales lead: a business without a dedicated website plus outreach state.
///
/// The storage shape uses camelCase keys (`mapsUrl`, `searchDate`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Lead {
    pub id: Uuid,
    pub name: String,
    pub phone: String,
    pub address: String,
    pub cuisine: String,
    pub maps_url: String,
    pub called: bool,
    pub notes: String,
    pub search_date: DateTime<Utc>,
    pub location: String,
}

impl Lead {
    /// Build a fresh lead from a service listing.
    ///
    /// Assigns a new v4 id, `called = false` and empty notes.
    #[must_use]
    pub fn from_listing(
        listing: BusinessListing,
        location: &str,
        search_date: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: listing.name,
            phone: listing.phone,
            address: listing.address,
            cuisine: listing.cuisine,
            maps_url: listing.maps_url,
            called: false,
            notes: String::new(),
            search_date,
            location: location.to_owned(),
        }
    }

    /// Exact, case-sensitive match on `(name, phone)`.
    #[must_use]
    pub fn is_duplicate_of(&self, other: &Lead) -> bool {
        self.name == other.name && self.phone == other.phone
    }

    /// `tel:` URI for click-to-dial, keeping only digits and `+`.
    #[must_use]
    pub fn dial_uri(&self) -> String {
        format!("tel:{}", NON_DIAL_CHARS.replace_all(&self.phone, ""))
    }
}
