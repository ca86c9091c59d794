use crate::config::TwentyConfig;
use crate::errors::{AppError, ResultExt};
use crate::fallback;
use crate::models::NewContact;
use chrono::Utc;
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Outcome of a call to the Twenty backend.
///
/// Calls never fail: either the backend answered (`Remote`) or local
/// fallback data was substituted (`Fallback`).
#[derive(Debug, Clone, PartialEq)]
pub enum Fetched<T> {
    Remote(T),
    Fallback(T),
}

impl<T> Fetched<T> {
    pub fn is_fallback(&self) -> bool {
        matches!(self, Fetched::Fallback(_))
    }

    pub fn data(&self) -> &T {
        match self {
            Fetched::Remote(data) | Fetched::Fallback(data) => data,
        }
    }

    pub fn into_inner(self) -> T {
        match self {
            Fetched::Remote(data) | Fetched::Fallback(data) => data,
        }
    }

    pub fn map<U, F>(self, f: F) -> Fetched<U>
    where
        F: FnOnce(T) -> U,
    {
        match self {
            Fetched::Remote(data) => Fetched::Remote(f(data)),
            Fetched::Fallback(data) => Fetched::Fallback(f(data)),
        }
    }
}

impl Fetched<Value> {
    /// Decodes the payload into a typed model, keeping the branch.
    pub fn parse<T: DeserializeOwned>(self) -> Result<Fetched<T>, AppError> {
        Ok(match self {
            Fetched::Remote(data) => Fetched::Remote(serde_json::from_value(data)?),
            Fetched::Fallback(data) => Fetched::Fallback(serde_json::from_value(data)?),
        })
    }
}

/// Client for the Twenty CRM REST API.
///
/// Cheap to clone; clones share the connection pool and the immutable
/// configuration.
#[derive(Clone)]
pub struct TwentyCrmClient {
    client: reqwest::Client,
    config: TwentyConfig,
}

impl TwentyCrmClient {
    /// Creates a new `TwentyCrmClient`.
    ///
    /// # Arguments
    ///
    /// * `config` - Resolved base URL and credential.
    pub fn new(config: TwentyConfig) -> Result<Self, AppError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!(
                env!("CARGO_PKG_NAME"),
                "/",
                env!("CARGO_PKG_VERSION")
            ))
            .build()
            .map_err(|e| {
                AppError::InternalError(format!("Failed to create Twenty client: {}", e))
            })?;

        Ok(Self { client, config })
    }

    pub fn config(&self) -> &TwentyConfig {
        &self.config
    }

    /// Lists contacts.
    ///
    /// Returns the backend body untouched, or the two demo contacts when
    /// the backend is unavailable.
    pub async fn get_contacts(&self) -> Fetched<Value> {
        match self.get_json("contacts").await {
            Ok(data) => Fetched::Remote(data),
            Err(e) => {
                tracing::warn!("Twenty CRM API not available, using fallback contacts: {}", e);
                Fetched::Fallback(fallback::to_payload(&fallback::contacts(Utc::now())))
            }
        }
    }

    /// Creates a contact.
    ///
    /// When the backend is unavailable the record is built locally with a
    /// generated id and fresh timestamps.
    pub async fn create_contact(&self, contact: &NewContact) -> Fetched<Value> {
        let url = self.config.endpoint("contacts");
        tracing::info!("Creating contact in Twenty: {}", contact.email);

        let result = self
            .send_json(self.request(Method::POST, &url).json(contact))
            .await
            .context("POST /contacts");

        match result {
            Ok(data) => Fetched::Remote(data),
            Err(e) => {
                tracing::warn!("Twenty CRM API not available, creating local contact: {}", e);
                Fetched::Fallback(fallback::synthesize_contact(contact, Utc::now()))
            }
        }
    }

    /// Fetches the dashboard analytics snapshot.
    pub async fn get_analytics(&self) -> Fetched<Value> {
        match self.get_json("analytics/dashboard").await {
            Ok(data) => Fetched::Remote(data),
            Err(e) => {
                tracing::warn!("Twenty CRM API not available, using fallback analytics: {}", e);
                Fetched::Fallback(fallback::to_payload(&fallback::analytics()))
            }
        }
    }

    async fn get_json(&self, path: &str) -> Result<Value, AppError> {
        let url = self.config.endpoint(path);
        tracing::info!("Fetching from Twenty: {}", url);

        self.send_json(self.request(Method::GET, &url))
            .await
            .with_context(|| format!("GET {}", url))
    }

    /// Request with the bearer credential and JSON content type set.
    fn request(&self, method: Method, url: &str) -> reqwest::RequestBuilder {
        self.client
            .request(method, url)
            .header("Authorization", format!("Bearer {}", self.config.api_key))
            .header("Content-Type", "application/json")
    }

    async fn send_json(&self, request: reqwest::RequestBuilder) -> Result<Value, AppError> {
        let response = request
            .send()
            .await
            .map_err(|e| AppError::ExternalApiError(format!("Twenty request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(AppError::ExternalApiError(format!(
                "Twenty returned {}: {}",
                status, error_text
            )));
        }

        response.json().await.map_err(|e| {
            AppError::InvalidResponse(format!("Failed to parse Twenty response: {}", e))
        })
    }
}
