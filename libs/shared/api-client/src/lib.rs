use std::sync::Arc;
use std::time::Duration;

use reqwest::{
    header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE},
    Client, Method,
};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, error};

use shared_config::AppConfig;
use shared_models::AppError;

/// Invoked when the backend answers 401/403. Installed at construction so
/// the session-expiry reaction is an explicit dependency of the client,
/// not a global interceptor.
pub type AuthFailureHandler = Arc<dyn Fn() + Send + Sync>;

pub struct ApiClient {
    client: Client,
    base_url: String,
    anon_key: String,
    on_auth_failure: Option<AuthFailureHandler>,
}

impl ApiClient {
    pub fn new(config: &AppConfig) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.api_timeout_secs))
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            base_url: config.api_base_url.clone(),
            anon_key: config.api_anon_key.clone(),
            on_auth_failure: None,
        }
    }

    pub fn with_auth_failure_handler(mut self, handler: AuthFailureHandler) -> Self {
        self.on_auth_failure = Some(handler);
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn get_headers(&self, auth_token: Option<&str>) -> HeaderMap {
        let mut headers = HeaderMap::new();

        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        if !self.anon_key.is_empty() {
            if let Ok(key) = HeaderValue::from_str(&self.anon_key) {
                headers.insert("apikey", key);
            }
        }

        if let Some(token) = auth_token {
            if let Ok(value) = HeaderValue::from_str(&format!("Bearer {}", token)) {
                headers.insert(AUTHORIZATION, value);
            }
        }

        headers
    }

    pub async fn request<T>(
        &self,
        method: Method,
        path: &str,
        auth_token: Option<&str>,
        body: Option<Value>,
    ) -> Result<T, AppError>
    where
        T: DeserializeOwned,
    {
        let url = format!("{}{}", self.base_url, path);
        debug!("Making request to {}", url);

        let headers = self.get_headers(auth_token);

        let mut req = self.client.request(method, &url).headers(headers);

        if let Some(body_data) = body {
            req = req.json(&body_data);
        }

        let response = req.send().await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            error!("API error ({}): {}", status, error_text);

            return Err(match status.as_u16() {
                401 | 403 => {
                    if let Some(handler) = &self.on_auth_failure {
                        handler();
                    }
                    AppError::Auth(error_text)
                }
                404 => AppError::NotFound(error_text),
                400 => AppError::BadRequest(error_text),
                _ => AppError::ExternalService(format!("{}: {}", status, error_text)),
            });
        }

        let data = response.json::<T>().await?;
        Ok(data)
    }

    pub async fn get<T>(&self, path: &str, auth_token: Option<&str>) -> Result<T, AppError>
    where
        T: DeserializeOwned,
    {
        self.request(Method::GET, path, auth_token, None).await
    }

    pub async fn post<T>(
        &self,
        path: &str,
        auth_token: Option<&str>,
        body: Value,
    ) -> Result<T, AppError>
    where
        T: DeserializeOwned,
    {
        self.request(Method::POST, path, auth_token, Some(body)).await
    }
}
