//! Swagger Petstore API client and contract test data

pub mod client;
pub mod data;
pub mod models;

pub use client::{PetStoreClient, PET_PATH};
pub use data::{create_pet_request_body, PetData, PetFormData};
pub use models::{Category, Pet, Tag};
