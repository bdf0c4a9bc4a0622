//! Pet schema returned by `/v2/pet` endpoints

use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub id: i64,
    pub name: String,
}

/// Every field is required; a pet missing one fails validation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pet {
    pub id: i64,
    pub category: Category,
    pub name: String,
    pub photo_urls: Vec<String>,
    pub tags: Vec<Tag>,
    pub status: String,
}

impl Pet {
    /// Pets in a `findByStatus` payload that satisfy the full schema
    ///
    /// The shared demo server holds records created by anyone, so entries
    /// that don't validate are skipped rather than failing the whole list.
    pub fn valid_entries(body: &Value) -> Option<Vec<Pet>> {
        let items = body.as_array()?;
        Some(
            items
                .iter()
                .filter_map(|item| serde_json::from_value(item.clone()).ok())
                .collect(),
        )
    }
}
