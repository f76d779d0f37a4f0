//! PostgREST-style HTTP backend for submissions.
//!
//! Talks to a `quote_submissions` table exposed under `/rest/v1/`, the
//! layout used by hosted Postgres services such as Supabase.

use crate::domain::{
    NewSubmission, StoreError, StoreResult, StoredSubmission, SubmissionStatus, SubmissionStore,
};
use reqwest::blocking::{Client, RequestBuilder, Response};
use reqwest::Method;
use serde::Serialize;
use std::time::Duration;

const TABLE: &str = "quote_submissions";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

#[derive(Serialize)]
struct StatusPatch {
    status: SubmissionStatus,
}

pub struct RestStore {
    client: Client,
    base_url: String,
    api_key: String,
    access_token: Option<String>,
}

impl RestStore {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> StoreResult<Self> {
        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            access_token: None,
        })
    }

    /// Sends requests on behalf of a signed-in user instead of the anonymous key.
    pub fn with_access_token(mut self, token: impl Into<String>) -> Self {
        self.access_token = Some(token.into());
        self
    }

    fn request(&self, method: Method) -> RequestBuilder {
        let bearer = self.access_token.as_deref().unwrap_or(&self.api_key);
        self.client
            .request(method, format!("{}/rest/v1/{TABLE}", self.base_url))
            .header("apikey", &self.api_key)
            .bearer_auth(bearer)
    }

    fn insert_request(&self, submission: &NewSubmission) -> RequestBuilder {
        self.request(Method::POST)
            .header("Prefer", "return=representation")
            .json(submission)
    }

    pub(crate) fn select_request(&self, owner_id: Option<&str>) -> RequestBuilder {
        let mut query = vec![
            ("select", "*".to_string()),
            ("order", "created_at.desc".to_string()),
        ];
        if let Some(owner_id) = owner_id {
            query.push(("user_id", format!("eq.{owner_id}")));
        }
        self.request(Method::GET).query(&query)
    }

    fn update_request(&self, id: &str, status: SubmissionStatus) -> RequestBuilder {
        self.request(Method::PATCH)
            .query(&[("id", format!("eq.{id}"))])
            .header("Prefer", "return=representation")
            .json(&StatusPatch { status })
    }

    fn send(request: RequestBuilder) -> StoreResult<Vec<StoredSubmission>> {
        let response = Self::check(request.send()?)?;
        Ok(response.json::<Vec<StoredSubmission>>()?)
    }

    fn check(response: Response) -> StoreResult<Response> {
        let status = response.status();
        if status.is_success() {
            Ok(response)
        } else {
            let body = response.text().unwrap_or_default();
            Err(StoreError::Rejected { status: status.as_u16(), body })
        }
    }
}

impl SubmissionStore for RestStore {
    fn insert(&mut self, submission: &NewSubmission) -> StoreResult<StoredSubmission> {
        Self::send(self.insert_request(submission))?
            .into_iter()
            .next()
            .ok_or(StoreError::EmptyResponse)
    }

    fn select_all(&self) -> StoreResult<Vec<StoredSubmission>> {
        Self::send(self.select_request(None))
    }

    fn select_by_owner(&self, owner_id: &str) -> StoreResult<Vec<StoredSubmission>> {
        Self::send(self.select_request(Some(owner_id)))
    }

    fn update_status(&mut self, id: &str, status: SubmissionStatus) -> StoreResult<()> {
        let updated = Self::send(self.update_request(id, status))?;
        if updated.is_empty() {
            return Err(StoreError::NotFound(id.to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{CoverageType, Jurisdiction, ViolationType};

    fn store() -> RestStore {
        RestStore::new("https://db.example.com/", "anon-key").unwrap()
    }

    #[test]
    fn test_select_all_request() {
        let request = store().select_request(None).build().unwrap();

        assert_eq!(request.method(), &Method::GET);
        assert_eq!(request.url().path(), "/rest/v1/quote_submissions");
        let query = request.url().query().unwrap();
        assert!(query.contains("order=created_at.desc"));
        assert!(!query.contains("user_id"));
        assert_eq!(request.headers()["apikey"], "anon-key");
        assert_eq!(request.headers()["authorization"], "Bearer anon-key");
    }

    #[test]
    fn test_select_by_owner_request_uses_access_token() {
        let request = store()
            .with_access_token("user-jwt")
            .select_request(Some("u1"))
            .build()
            .unwrap();

        assert!(request.url().query().unwrap().contains("user_id=eq.u1"));
        assert_eq!(request.headers()["authorization"], "Bearer user-jwt");
        assert_eq!(request.headers()["apikey"], "anon-key");
    }

    #[test]
    fn test_update_request_patches_status_only() {
        let request = store().update_request("abc", SubmissionStatus::Contacted).build().unwrap();

        assert_eq!(request.method(), &Method::PATCH);
        assert_eq!(request.url().query(), Some("id=eq.abc"));
        let body = request.body().and_then(|b| b.as_bytes()).unwrap();
        assert_eq!(body, br#"{"status":"contacted"}"#);
    }

    #[test]
    fn test_insert_request_body_uses_table_columns() {
        let submission = NewSubmission {
            jurisdiction: Jurisdiction::California,
            violation_type: ViolationType::Dui,
            coverage_type: CoverageType::NonOwner,
            has_vehicle: false,
            first_name: "John".to_string(),
            last_name: "Doe".to_string(),
            email: "john@example.com".to_string(),
            phone: None,
            zip_code: None,
            consent: true,
            owner_id: None,
        };
        let request = store().insert_request(&submission).build().unwrap();

        assert_eq!(request.method(), &Method::POST);
        assert_eq!(request.headers()["prefer"], "return=representation");
        let body: serde_json::Value =
            serde_json::from_slice(request.body().and_then(|b| b.as_bytes()).unwrap()).unwrap();
        assert_eq!(body["state"], "CA");
        assert_eq!(body["coverage_type"], "non-owner");
        assert!(body["user_id"].is_null());
        assert!(body.get("status").is_none());
    }
}
