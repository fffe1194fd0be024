//! Typed HTTP access to the store backend.

use reqwest::{Client, Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::AppConfig;
use crate::error::{AppError, AppResult};

pub mod envelope;

pub use envelope::{Paged, unwrap_envelope, unwrap_list, unwrap_paged};

/// HTTP client bound to the backend base URL.
///
/// A client without a token only reaches public endpoints; admin endpoints
/// need [`ApiClient::authenticated`] or [`ApiClient::with_token`].
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct UploadedImage {
    #[serde(alias = "imageUrl", alias = "secure_url", alias = "secureUrl")]
    url: String,
}

impl ApiClient {
    pub fn public(config: &AppConfig) -> AppResult<Self> {
        let client = Client::builder().timeout(config.api_timeout()).build()?;
        Ok(Self {
            client,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            token: None,
        })
    }

    pub fn authenticated(config: &AppConfig, token: impl Into<String>) -> AppResult<Self> {
        Ok(Self::public(config)?.with_token(token))
    }

    /// Same connection pool, different credentials.
    pub fn with_token(&self, token: impl Into<String>) -> Self {
        Self {
            client: self.client.clone(),
            base_url: self.base_url.clone(),
            token: Some(token.into()),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = self.url(path);
        tracing::debug!(method = %method, url = %url, "backend request");
        let mut request = self.client.request(method, url);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }
        request
    }

    /// Raw JSON body of a GET, envelope untouched.
    pub async fn get_raw<Q>(&self, path: &str, query: &Q) -> AppResult<Value>
    where
        Q: Serialize + ?Sized,
    {
        self.send(self.request(Method::GET, path).query(query)).await
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> AppResult<T> {
        let value = self.send(self.request(Method::GET, path)).await?;
        unwrap_envelope(value)
    }

    pub async fn get_query<T, Q>(&self, path: &str, query: &Q) -> AppResult<T>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        unwrap_envelope(self.get_raw(path, query).await?)
    }

    pub async fn get_list<T: DeserializeOwned>(&self, path: &str) -> AppResult<Vec<T>> {
        let value = self.send(self.request(Method::GET, path)).await?;
        unwrap_list(value)
    }

    pub async fn get_paged<T, Q>(&self, path: &str, query: &Q) -> AppResult<Paged<T>>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        unwrap_paged(self.get_raw(path, query).await?)
    }

    pub async fn post<T, B>(&self, path: &str, body: &B) -> AppResult<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let value = self.send(self.request(Method::POST, path).json(body)).await?;
        unwrap_envelope(value)
    }

    pub async fn put<T, B>(&self, path: &str, body: &B) -> AppResult<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let value = self.send(self.request(Method::PUT, path).json(body)).await?;
        unwrap_envelope(value)
    }

    pub async fn patch<T, B>(&self, path: &str, body: &B) -> AppResult<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let value = self.send(self.request(Method::PATCH, path).json(body)).await?;
        unwrap_envelope(value)
    }

    /// DELETE whose body, if any, is ignored.
    pub async fn delete(&self, path: &str) -> AppResult<()> {
        let value = self.send(self.request(Method::DELETE, path)).await?;
        if let Value::Object(map) = &value {
            if matches!(map.get("success"), Some(Value::Bool(false))) {
                unwrap_envelope::<Value>(value)?;
            }
        }
        Ok(())
    }

    /// Multipart upload of one image; returns the hosted URL.
    pub async fn upload_image(
        &self,
        file_name: &str,
        bytes: Vec<u8>,
        mime: &str,
    ) -> AppResult<String> {
        let part = reqwest::multipart::Part::bytes(bytes)
            .file_name(file_name.to_string())
            .mime_str(mime)?;
        let form = reqwest::multipart::Form::new().part("image", part);
        let value = self
            .send(self.request(Method::POST, "upload/image").multipart(form))
            .await?;
        let uploaded: UploadedImage = unwrap_envelope(value)?;
        Ok(uploaded.url)
    }

    async fn send(&self, request: RequestBuilder) -> AppResult<Value> {
        let response = request.send().await?;
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            let message = error_message(&text);
            tracing::debug!(status = %status, message = %message, "backend rejected request");
            return Err(match status {
                StatusCode::UNAUTHORIZED => AppError::Unauthorized,
                StatusCode::FORBIDDEN => AppError::Forbidden,
                StatusCode::NOT_FOUND => AppError::NotFound,
                StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => {
                    AppError::BadRequest(message)
                }
                _ => AppError::Upstream {
                    status: status.as_u16(),
                    message,
                },
            });
        }

        if text.trim().is_empty() {
            return Ok(Value::Null);
        }
        Ok(serde_json::from_str(&text)?)
    }
}

fn error_message(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|value| {
            value
                .get("message")
                .or_else(|| value.get("error"))
                .and_then(Value::as_str)
                .map(str::to_string)
        })
        .unwrap_or_else(|| body.trim().to_string())
}
