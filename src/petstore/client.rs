//! Typed calls over [`WebBridge`] for the `/v2/pet` endpoints

use tracing::info;

use crate::bridge::{BridgeError, RequestBody, WebBridge, WebResponse};
use crate::config::WebConfig;

pub const PET_PATH: &str = "/v2/pet";

#[derive(Debug, Clone)]
pub struct PetStoreClient {
    web: WebBridge,
}

impl PetStoreClient {
    pub fn new(web: WebBridge) -> Self {
        Self { web }
    }

    pub fn from_base_url(base_url: &str) -> Result<Self, BridgeError> {
        Ok(Self::new(WebBridge::new(WebConfig::new(base_url))?))
    }

    pub fn web(&self) -> &WebBridge {
        &self.web
    }

    pub async fn add_pet(&self, pet: &serde_json::Value) -> Result<WebResponse, BridgeError> {
        self.web.post(PET_PATH, RequestBody::Json(pet.clone())).await
    }

    pub async fn update_pet(&self, pet: &serde_json::Value) -> Result<WebResponse, BridgeError> {
        self.web.put(PET_PATH, RequestBody::Json(pet.clone())).await
    }

    pub async fn find_by_status(&self, status: &str) -> Result<WebResponse, BridgeError> {
        self.web
            .get_with_query(
                &format!("{}/findByStatus", PET_PATH),
                &[("status", status.to_string())],
            )
            .await
    }

    pub async fn get_pet(&self, id: impl std::fmt::Display) -> Result<WebResponse, BridgeError> {
        self.web.get(&format!("{}/{}", PET_PATH, id)).await
    }

    pub async fn delete_pet(&self, id: i64) -> Result<WebResponse, BridgeError> {
        info!("Deleting pet {}", id);
        self.web.delete(&format!("{}/{}", PET_PATH, id)).await
    }

    /// `application/x-www-form-urlencoded` update of name and status
    pub async fn update_pet_with_form(
        &self,
        id: i64,
        name: &str,
        status: &str,
    ) -> Result<WebResponse, BridgeError> {
        let form = vec![
            ("name".to_string(), name.to_string()),
            ("status".to_string(), status.to_string()),
        ];
        self.web
            .post(&format!("{}/{}", PET_PATH, id), RequestBody::Form(form))
            .await
    }

    /// Post an arbitrary payload, e.g. an empty body for negative tests
    pub async fn post_raw(
        &self,
        path: &str,
        content: &str,
        content_type: &str,
    ) -> Result<WebResponse, BridgeError> {
        self.web
            .post(
                path,
                RequestBody::Raw {
                    content: content.to_string(),
                    content_type: content_type.to_string(),
                },
            )
            .await
    }
}
