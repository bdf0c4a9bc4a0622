//! Request bodies and data tables for the Petstore suites

use serde_json::{json, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PetData {
    pub name: &'static str,
    pub id: i64,
    pub status: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PetFormData {
    pub id: i64,
    pub name: &'static str,
    pub status: &'static str,
}

pub const CREATE_PET_DATA: &[PetData] = &[
    PetData { name: "Fluffy", id: 123, status: "available" },
    PetData { name: "Buddy", id: 456, status: "pending" },
    PetData { name: "Max", id: 789, status: "sold" },
];

pub const UPDATE_PET_DATA: &[PetData] = &[
    PetData { name: "Fluffy", id: 123, status: "pending" },
    PetData { name: "Buddy", id: 456, status: "sold" },
    PetData { name: "Max", id: 789, status: "available" },
];

pub const PET_STATUS_DATA: &[&str] = &["available", "pending", "sold"];

pub const CREATED_PET_WITH_ID_DATA: &[PetFormData] = &[
    PetFormData { id: 1123, name: "FluffyForm", status: "pending" },
    PetFormData { id: 1456, name: "BuddyForm", status: "sold" },
    PetFormData { id: 1789, name: "MaxForm", status: "available" },
];

pub const DELETE_TEST_DATA: &[i64] = &[2123, 2456, 2789];

pub const NEGATIVE_PET_STATUS_DATA: &[&str] = &["Notavailable", "Notpending", "Notsold"];

/// Full pet payload with the fixed category, photo and tag
pub fn create_pet_request_body(name: &str, id: i64, status: &str) -> Value {
    json!({
        "id": id,
        "category": { "id": 1, "name": "Dogs" },
        "name": name,
        "photoUrls": ["string"],
        "tags": [{ "id": 1, "name": "tag1" }],
        "status": status,
    })
}
