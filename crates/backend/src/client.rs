use futures::StreamExt;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, RequestBuilder, StatusCode};
use shared::settings::{ClientSettings, Endpoints};
use std::sync::LazyLock;
use tracing::{debug, info, warn};
use url::Url;

use crate::api::{ChatApi, ChatReply, FileUpload};
use crate::error::{ChatError, Result};
use crate::wire::{ErrorDetail, TokenResponse, UploadReceipt};

// No request timeout: a send runs until the backend answers or drops us.
static SHARED_HTTP: LazyLock<Client> = LazyLock::new(|| {
    Client::builder()
        .pool_max_idle_per_host(2)
        .build()
        .expect("failed to build HTTP client")
});

const LOGIN_FALLBACK: &str = "Login failed";

/// HTTP client for the chat backend.
pub struct BackendClient {
    http: Client,
    base: Url,
    endpoints: Endpoints,
}

impl BackendClient {
    pub fn new(settings: &ClientSettings) -> Result<Self> {
        let base = Url::parse(&settings.base_url)?;
        Ok(Self {
            http: SHARED_HTTP.clone(),
            base,
            endpoints: settings.endpoints.clone(),
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    fn url(&self, path: &str) -> Result<Url> {
        Ok(self.base.join(path)?)
    }

    fn authorize(req: RequestBuilder, bearer: Option<&str>) -> RequestBuilder {
        match bearer {
            Some(token) => req.bearer_auth(token),
            None => req,
        }
    }

    /// 401 only means "session expired" when we actually sent a token.
    fn check_status(
        status: StatusCode,
        bearer: Option<&str>,
        failure: impl FnOnce(u16) -> ChatError,
    ) -> Result<()> {
        if status == StatusCode::UNAUTHORIZED && bearer.is_some() {
            return Err(ChatError::Unauthorized);
        }
        if !status.is_success() {
            return Err(failure(status.as_u16()));
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl ChatApi for BackendClient {
    async fn exchange_credentials(&self, username: &str, password: &str) -> Result<String> {
        let url = self.url(&self.endpoints.token)?;
        let resp = self
            .http
            .post(url)
            .form(&[("username", username), ("password", password)])
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.bytes().await.unwrap_or_default();
            let detail = serde_json::from_slice::<ErrorDetail>(&body)
                .ok()
                .and_then(|d| d.message().map(str::to_string))
                .unwrap_or_else(|| LOGIN_FALLBACK.to_string());
            warn!("credential exchange rejected: {}", status);
            return Err(ChatError::Login(detail));
        }

        let token: TokenResponse = serde_json::from_slice(&resp.bytes().await?)?;
        info!("credential exchange succeeded");
        Ok(token.access_token)
    }

    async fn upload(&self, file: FileUpload, bearer: Option<&str>) -> Result<UploadReceipt> {
        let url = self.url(&self.endpoints.upload)?;
        let size = file.bytes.len();
        let part = Part::bytes(file.bytes).file_name(file.file_name.clone());
        let form = Form::new().part("file", part).text("role", "user");

        let resp = Self::authorize(self.http.post(url), bearer)
            .multipart(form)
            .send()
            .await?;
        Self::check_status(resp.status(), bearer, |status| ChatError::Upload { status })?;

        let body = resp.bytes().await?;
        let receipt = serde_json::from_slice::<UploadReceipt>(&body).unwrap_or_else(|e| {
            debug!("upload receipt not understood: {}", e);
            UploadReceipt::default()
        });
        info!("uploaded {} ({} bytes)", file.file_name, size);
        Ok(receipt)
    }

    async fn chat(&self, message: &str, bearer: Option<&str>) -> Result<ChatReply> {
        let url = self.url(&self.endpoints.chat)?;
        let form = Form::new().text("message", message.to_string());

        let resp = Self::authorize(self.http.post(url), bearer)
            .multipart(form)
            .send()
            .await?;
        Self::check_status(resp.status(), bearer, |status| ChatError::Chat { status })?;
        debug!("chat response headers received: {}", resp.status());

        let body = resp
            .bytes_stream()
            .map(|chunk| chunk.map(|bytes| bytes.to_vec()).map_err(ChatError::from))
            .boxed();
        Ok(ChatReply::new(body))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_invalid_base_url() {
        let settings = ClientSettings {
            base_url: "not a url".into(),
            ..ClientSettings::default()
        };
        assert!(matches!(
            BackendClient::new(&settings),
            Err(ChatError::Url(_))
        ));
    }

    #[test]
    fn test_endpoint_join() {
        let client = BackendClient::new(&ClientSettings::default()).unwrap();
        let url = client.url(&client.endpoints.token).unwrap();
        assert_eq!(url.as_str(), "http://127.0.0.1:8000/auth/token");
    }

    #[test]
    fn test_status_mapping() {
        let unauthorized =
            BackendClient::check_status(StatusCode::UNAUTHORIZED, Some("t"), |status| {
                ChatError::Chat { status }
            });
        assert!(matches!(unauthorized, Err(ChatError::Unauthorized)));

        let anonymous = BackendClient::check_status(StatusCode::UNAUTHORIZED, None, |status| {
            ChatError::Chat { status }
        });
        assert!(matches!(anonymous, Err(ChatError::Chat { status: 401 })));

        assert!(BackendClient::check_status(StatusCode::OK, None, |status| {
            ChatError::Upload { status }
        })
        .is_ok());
    }
}
