//! API client: the single point of entry for every call to the career-guidance backend.
//!
//! No other module talks HTTP. The editor and views depend on the traits below so
//! they can run against an in-memory backend in tests.
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use crate::chips::ChipKind;
use crate::errors::AppError;
use crate::profile::models::SectionName;

#[cfg(test)]
pub mod memory;
pub mod types;

use types::{
    AuthResponse, ErrorBody, FullInfoResponse, GoogleLoginRequest, LoginRequest,
    RecommendRequest, RecommendResponse, RegisterRequest, Roadmap, RoadmapRequest, SaveResponse,
    SaveSectionRequest, SuggestionPayload,
};

// ────────────────────────────────────────────────────────────
// Seams
// ────────────────────────────────────────────────────────────

#[async_trait]
pub trait ProfileStore: Send + Sync {
    async fn fetch_profile(&self, token: &str) -> Result<FullInfoResponse, AppError>;
    async fn save_section(
        &self,
        token: &str,
        section: SectionName,
        data: &Value,
    ) -> Result<SaveResponse, AppError>;
    async fn save_full_info(&self, token: &str, profile: &Value) -> Result<SaveResponse, AppError>;
}

#[async_trait]
pub trait SuggestionSource: Send + Sync {
    async fn master_list(&self, kind: ChipKind) -> Result<Vec<String>, AppError>;
    async fn search(&self, kind: ChipKind, query: &str) -> Result<Vec<String>, AppError>;
}

#[async_trait]
pub trait CareerAdvisor: Send + Sync {
    async fn recommend(&self, token: &str, profile: &Value) -> Result<RecommendResponse, AppError>;
    async fn roadmap(&self, career: &str, profile: &Value) -> Result<Roadmap, AppError>;
}

#[async_trait]
pub trait AuthService: Send + Sync {
    async fn register(
        &self,
        fullname: &str,
        email: &str,
        password: &str,
    ) -> Result<AuthResponse, AppError>;
    async fn login(&self, email: &str, password: &str) -> Result<AuthResponse, AppError>;
    async fn google_login(&self, credential: &str) -> Result<AuthResponse, AppError>;
}

// ────────────────────────────────────────────────────────────
// HTTP implementation
// ────────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct HttpApi {
    client: Client,
    base_url: String,
}

impl HttpApi {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, AppError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn get(&self, path: &str, token: Option<&str>) -> RequestBuilder {
        with_token(self.client.get(self.url(path)), token)
    }

    fn post<B: Serialize + ?Sized>(&self, path: &str, token: Option<&str>, body: &B) -> RequestBuilder {
        with_token(self.client.post(self.url(path)), token).json(body)
    }

    async fn send_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, AppError> {
        let response = request.send().await?;
        read_json(response).await
    }

    /// Auth endpoints answer `{success:false, message|msg}` with 4xx statuses, so the
    /// body is parsed whatever the status; only an unreadable body falls back to the
    /// status mapping.
    async fn send_auth(&self, path: &str, body: &impl Serialize) -> Result<AuthResponse, AppError> {
        let response = self.post(path, None, body).send().await?;
        let status = response.status();
        let text = response.text().await?;
        match serde_json::from_str::<AuthResponse>(&text) {
            Ok(parsed) => {
                debug!("{path} -> {status} success={}", parsed.success);
                Ok(parsed)
            }
            Err(e) if status.is_success() => Err(AppError::Parse(e)),
            Err(_) => Err(error_from_status(status, &text)),
        }
    }
}

fn with_token(request: RequestBuilder, token: Option<&str>) -> RequestBuilder {
    match token {
        Some(token) => request.bearer_auth(token),
        None => request,
    }
}

async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, AppError> {
    let status = response.status();
    let url = response.url().path().to_string();
    let body = response.text().await?;

    if !status.is_success() {
        warn!("{url} returned {status}: {body}");
        return Err(error_from_status(status, &body));
    }

    debug!("{url} -> {status} ({} bytes)", body.len());
    Ok(serde_json::from_str(&body)?)
}

/// Maps a failed response onto the error taxonomy. 401/403 mean the session is
/// gone, 404 is "not found", everything else carries the server's message, the raw
/// body, or the status reason, in that order.
pub(crate) fn error_from_status(status: StatusCode, body: &str) -> AppError {
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => AppError::AuthRequired,
        StatusCode::NOT_FOUND => AppError::NotFound(
            message_from_body(body).unwrap_or_else(|| "Not found".to_string()),
        ),
        _ => AppError::Server {
            status: status.as_u16(),
            message: message_from_body(body).unwrap_or_else(|| {
                let trimmed = body.trim();
                if trimmed.is_empty() || trimmed.starts_with('{') {
                    status
                        .canonical_reason()
                        .unwrap_or("Request failed")
                        .to_string()
                } else {
                    trimmed.to_string()
                }
            }),
        },
    }
}

fn message_from_body(body: &str) -> Option<String> {
    serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(ErrorBody::into_message)
}

#[async_trait]
impl ProfileStore for HttpApi {
    async fn fetch_profile(&self, token: &str) -> Result<FullInfoResponse, AppError> {
        self.send_json(self.get("/api/get-fullinfo", Some(token))).await
    }

    async fn save_section(
        &self,
        token: &str,
        section: SectionName,
        data: &Value,
    ) -> Result<SaveResponse, AppError> {
        let body = SaveSectionRequest {
            section: section.as_str(),
            data,
        };
        self.send_json(self.post("/api/save-section", Some(token), &body))
            .await
    }

    async fn save_full_info(&self, token: &str, profile: &Value) -> Result<SaveResponse, AppError> {
        self.send_json(self.post("/api/save-fullinfo", Some(token), profile))
            .await
    }
}

#[async_trait]
impl SuggestionSource for HttpApi {
    async fn master_list(&self, kind: ChipKind) -> Result<Vec<String>, AppError> {
        let payload: SuggestionPayload = self.send_json(self.get(&kind.master_path(), None)).await?;
        Ok(payload.into_vec())
    }

    async fn search(&self, kind: ChipKind, query: &str) -> Result<Vec<String>, AppError> {
        let Some(path) = kind.search_path() else {
            return Ok(Vec::new());
        };
        let request = self.get(&path, None).query(&[("q", query)]);
        let payload: SuggestionPayload = self.send_json(request).await?;
        Ok(payload.into_vec())
    }
}

#[async_trait]
impl CareerAdvisor for HttpApi {
    async fn recommend(&self, token: &str, profile: &Value) -> Result<RecommendResponse, AppError> {
        let body = RecommendRequest { profile };
        self.send_json(self.post("/api/recommend", Some(token), &body))
            .await
    }

    async fn roadmap(&self, career: &str, profile: &Value) -> Result<Roadmap, AppError> {
        let body = RoadmapRequest { career, profile };
        self.send_json(self.post("/api/roadmap", None, &body)).await
    }
}

#[async_trait]
impl AuthService for HttpApi {
    async fn register(
        &self,
        fullname: &str,
        email: &str,
        password: &str,
    ) -> Result<AuthResponse, AppError> {
        let body = RegisterRequest {
            fullname,
            email,
            password,
        };
        self.send_auth("/api/register", &body).await
    }

    async fn login(&self, email: &str, password: &str) -> Result<AuthResponse, AppError> {
        self.send_auth("/api/login", &LoginRequest { email, password })
            .await
    }

    async fn google_login(&self, credential: &str) -> Result<AuthResponse, AppError> {
        self.send_auth("/api/google-login", &GoogleLoginRequest { credential })
            .await
    }
}
