use reqwest::Method;
use serde_json::{json, Value};
use tracing::{debug, info};

use shared_config::AppConfig;
use shared_database::{StoreError, SupabaseClient};

use crate::models::{CreatePractitionerRequest, Practitioner, PractitionerError};

pub struct PractitionerService {
    supabase: SupabaseClient,
}

impl PractitionerService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            supabase: SupabaseClient::new(config),
        }
    }

    /// The roster shown in the booking widget, ordered by name.
    pub async fn list(&self, auth_token: Option<&str>) -> Result<Vec<Practitioner>, PractitionerError> {
        let path = "/rest/v1/practitioners?select=id,name,specialty,created_at&order=name.asc";

        let practitioners: Vec<Practitioner> = self
            .supabase
            .request(Method::GET, path, auth_token, None)
            .await
            .map_err(store_error)?;

        Ok(practitioners)
    }

    pub async fn create(
        &self,
        request: CreatePractitionerRequest,
        auth_token: &str,
    ) -> Result<Practitioner, PractitionerError> {
        if request.name.trim().is_empty() {
            return Err(PractitionerError::ValidationError(
                "Practitioner name is required".to_string(),
            ));
        }

        let row = json!({
            "name": request.name,
            "specialty": request.specialty,
        });

        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(
            "Prefer",
            reqwest::header::HeaderValue::from_static("return=representation"),
        );

        let result: Vec<Practitioner> = self
            .supabase
            .request_with_headers(
                Method::POST,
                "/rest/v1/practitioners",
                Some(auth_token),
                Some(row),
                Some(headers),
            )
            .await
            .map_err(store_error)?;

        let practitioner = result.into_iter().next().ok_or_else(|| {
            PractitionerError::DatabaseError("Insert returned no rows".to_string())
        })?;

        info!("Practitioner {} ({}) created", practitioner.id, practitioner.name);
        Ok(practitioner)
    }

    pub async fn delete(&self, practitioner_id: i64, auth_token: &str) -> Result<(), PractitionerError> {
        debug!("Deleting practitioner {}", practitioner_id);

        let path = format!("/rest/v1/practitioners?id=eq.{}", practitioner_id);
        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(
            "Prefer",
            reqwest::header::HeaderValue::from_static("return=representation"),
        );

        let deleted: Vec<Value> = self
            .supabase
            .request_with_headers(Method::DELETE, &path, Some(auth_token), None, Some(headers))
            .await
            .map_err(store_error)?;

        if deleted.is_empty() {
            return Err(PractitionerError::NotFound);
        }

        info!("Practitioner {} deleted", practitioner_id);
        Ok(())
    }
}

fn store_error(err: StoreError) -> PractitionerError {
    match err {
        StoreError::Unreachable(msg) => PractitionerError::StoreUnavailable(msg),
        other => PractitionerError::DatabaseError(other.to_string()),
    }
}
