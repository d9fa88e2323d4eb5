//! DevJobs REST client
//!
//! Django REST routes relative to a base URL, token auth in the
//! `Authorization: Token <key>` header.

use std::sync::RwLock;
use std::time::Duration;

use async_trait::async_trait;
use devjobs_core::config::DevJobsConfig;
use devjobs_core::models::{
    AuthToken, BasicUserProfile, DashboardSummary, Job, Listing, Session, UserProfile,
};
use devjobs_core::validation::{JobPosting, LoginForm, ProfileUpdate, SignupForm};
use devjobs_core::{FetchError, JobBoardApi};
use reqwest::{Client, Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, instrument};
use url::Url;

/// Longest error body kept in logs.
const LOGGED_BODY_LIMIT: usize = 500;

/// Map a transport error onto the three failure causes.
pub fn classify(err: &reqwest::Error) -> FetchError {
    if err.is_builder() {
        FetchError::request_setup(err.to_string())
    } else if let Some(status) = err.status() {
        FetchError::response(status.as_u16(), None)
    } else {
        FetchError::no_response(err.to_string())
    }
}

/// Client for the DevJobs backend.
pub struct ApiClient {
    client: Client,
    base: Url,
    auth: RwLock<Option<String>>,
}

impl ApiClient {
    /// Create a client rooted at `base_url` (e.g. `http://localhost:8000/api/`).
    pub fn new(base_url: &str) -> Result<Self, FetchError> {
        Self::with_timeout(base_url, None)
    }

    pub fn with_timeout(base_url: &str, timeout: Option<Duration>) -> Result<Self, FetchError> {
        let mut base = Url::parse(base_url.trim())
            .map_err(|e| FetchError::request_setup(format!("invalid base url {:?}: {}", base_url, e)))?;
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }

        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(|e| classify(&e))?;

        Ok(Self {
            client,
            base,
            auth: RwLock::new(None),
        })
    }

    pub fn from_config(config: &DevJobsConfig) -> Result<Self, FetchError> {
        Self::with_timeout(
            &config.api.base_url,
            config.api.timeout_secs.map(Duration::from_secs),
        )
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    fn endpoint(&self, path: &str) -> Result<Url, FetchError> {
        self.base
            .join(path)
            .map_err(|e| FetchError::request_setup(format!("invalid endpoint {:?}: {}", path, e)))
    }

    fn request(&self, method: Method, path: &str) -> Result<RequestBuilder, FetchError> {
        let url = self.endpoint(path)?;
        let mut request = self.client.request(method, url);
        let auth = self
            .auth
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone();
        if let Some(header) = auth {
            request = request.header(reqwest::header::AUTHORIZATION, header);
        }
        Ok(request)
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, FetchError> {
        let request = self.request(Method::GET, path)?;
        self.send(path, request).await
    }

    async fn write<B, T>(&self, method: Method, path: &str, body: &B) -> Result<T, FetchError>
    where
        B: Serialize + ?Sized + Sync,
        T: DeserializeOwned,
    {
        let request = self.request(method, path)?.json(body);
        self.send(path, request).await
    }

    async fn send<T: DeserializeOwned>(
        &self,
        path: &str,
        request: RequestBuilder,
    ) -> Result<T, FetchError> {
        let response = request.send().await.map_err(|e| classify(&e))?;
        let status = response.status();
        let bytes = response.bytes().await.map_err(|e| classify(&e))?;
        debug!(path, status = status.as_u16(), bytes = bytes.len(), "response received");

        if !status.is_success() {
            let text = String::from_utf8_lossy(&bytes);
            let truncated: String = text.chars().take(LOGGED_BODY_LIMIT).collect();
            debug!(path, status = status.as_u16(), body = %truncated, "error response");
            let body = serde_json::from_slice::<Value>(&bytes).ok();
            return Err(FetchError::response(status.as_u16(), body));
        }

        let bytes: &[u8] = if bytes.iter().all(u8::is_ascii_whitespace) {
            b"null"
        } else {
            &bytes
        };
        serde_json::from_slice(bytes).map_err(|e| {
            debug!(path, error = %e, "response body did not decode");
            FetchError::response(status.as_u16(), None)
        })
    }
}

#[async_trait]
impl JobBoardApi for ApiClient {
    fn set_auth(&self, session: Option<&Session>) {
        let mut auth = self
            .auth
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        *auth = session.map(Session::authorization);
    }

    #[instrument(skip(self))]
    async fn get_jobs(&self) -> Result<Listing<Job>, FetchError> {
        self.get("jobs/").await
    }

    #[instrument(skip(self))]
    async fn get_employer_dashboard(&self) -> Result<DashboardSummary, FetchError> {
        self.get("employer/dashboard/").await
    }

    #[instrument(skip_all, fields(title = %job.title))]
    async fn create_job(&self, job: &JobPosting) -> Result<Value, FetchError> {
        self.write(Method::POST, "jobs/create/", job).await
    }

    #[instrument(skip_all, fields(username = %form.username))]
    async fn register_user(&self, form: &SignupForm) -> Result<AuthToken, FetchError> {
        self.write(Method::POST, "auth/registration/", form).await
    }

    #[instrument(skip_all, fields(username = %form.username))]
    async fn login(&self, form: &LoginForm) -> Result<AuthToken, FetchError> {
        self.write(Method::POST, "auth/login/", form).await
    }

    #[instrument(skip(self))]
    async fn get_basic_user_profile(&self) -> Result<BasicUserProfile, FetchError> {
        self.get("auth/user/").await
    }

    #[instrument(skip_all)]
    async fn update_user_profile(&self, profile: &ProfileUpdate) -> Result<UserProfile, FetchError> {
        self.write(Method::PUT, "users/profile/", profile).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_gains_trailing_slash() {
        let client = ApiClient::new("http://localhost:8000/api").unwrap();
        assert_eq!(client.base_url().as_str(), "http://localhost:8000/api/");
        assert_eq!(
            client.endpoint("jobs/").unwrap().as_str(),
            "http://localhost:8000/api/jobs/"
        );
    }

    #[test]
    fn unparseable_base_url_is_request_setup() {
        let err = ApiClient::new("not a url").err().unwrap();
        assert!(matches!(err, FetchError::RequestSetup { .. }));
    }

    #[test]
    fn auth_header_follows_session() {
        let client = ApiClient::new("http://localhost:8000/api/").unwrap();
        let session = Session::new(
            AuthToken { key: "abc".into() },
            devjobs_core::AccountKind::Employer,
        );
        client.set_auth(Some(&session));
        let request = client.request(Method::GET, "jobs/").unwrap().build().unwrap();
        assert_eq!(
            request.headers().get(reqwest::header::AUTHORIZATION).unwrap(),
            "Token abc"
        );

        client.set_auth(None);
        let request = client.request(Method::GET, "jobs/").unwrap().build().unwrap();
        assert!(request.headers().get(reqwest::header::AUTHORIZATION).is_none());
    }
}
