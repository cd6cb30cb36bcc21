//! In-memory backend used by unit tests. Mirrors the server's section upsert and
//! records every call so tests can assert on network traffic.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::api_client::types::{
    AuthResponse, CareerMatch, FullInfoResponse, RecommendResponse, Roadmap, SaveResponse, UserInfo,
};
use crate::api_client::{AuthService, CareerAdvisor, ProfileStore, SuggestionSource};
use crate::chips::ChipKind;
use crate::errors::AppError;
use crate::profile::models::SectionName;

#[derive(Default)]
pub struct MemoryBackend {
    pub profile: Mutex<Value>,
    pub masters: Mutex<HashMap<ChipKind, Vec<String>>>,
    pub remote: Mutex<HashMap<ChipKind, Vec<String>>>,
    pub results: Mutex<Vec<CareerMatch>>,
    pub roadmap: Mutex<Option<Roadmap>>,
    /// `(status, message)` returned by the next save, if set.
    pub save_failure: Mutex<Option<(u16, String)>>,
    pub fetch_failure: Mutex<Option<u16>>,
    pub calls: Mutex<Vec<String>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self {
            profile: Mutex::new(json!({})),
            ..Default::default()
        }
    }

    pub fn with_profile(profile: Value) -> Self {
        let backend = Self::new();
        *backend.profile.lock().unwrap() = profile;
        backend
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn profile(&self) -> Value {
        self.profile.lock().unwrap().clone()
    }

    fn record(&self, call: impl Into<String>) {
        self.calls.lock().unwrap().push(call.into());
    }

    fn check_token(token: &str) -> Result<(), AppError> {
        if token.is_empty() {
            return Err(AppError::AuthRequired);
        }
        Ok(())
    }

    fn take_save_failure(&self) -> Option<AppError> {
        self.save_failure
            .lock()
            .unwrap()
            .take()
            .map(|(status, message)| AppError::Server { status, message })
    }
}

#[async_trait]
impl ProfileStore for MemoryBackend {
    async fn fetch_profile(&self, token: &str) -> Result<FullInfoResponse, AppError> {
        self.record("get-fullinfo");
        Self::check_token(token)?;
        match *self.fetch_failure.lock().unwrap() {
            Some(401) => return Err(AppError::AuthRequired),
            Some(404) => return Err(AppError::NotFound("User not found".to_string())),
            Some(status) => {
                return Err(AppError::Server {
                    status,
                    message: "fetch failed".to_string(),
                })
            }
            None => {}
        }
        Ok(FullInfoResponse {
            success: true,
            profile: self.profile(),
        })
    }

    async fn save_section(
        &self,
        token: &str,
        section: SectionName,
        data: &Value,
    ) -> Result<SaveResponse, AppError> {
        self.record(format!("save-section:{section}"));
        Self::check_token(token)?;
        if let Some(err) = self.take_save_failure() {
            return Err(err);
        }
        let mut profile = self.profile.lock().unwrap();
        if !profile.is_object() {
            *profile = json!({});
        }
        profile[section.as_str()] = data.clone();
        Ok(SaveResponse {
            success: Some(true),
            message: None,
        })
    }

    async fn save_full_info(&self, token: &str, profile: &Value) -> Result<SaveResponse, AppError> {
        self.record("save-fullinfo");
        Self::check_token(token)?;
        if let Some(err) = self.take_save_failure() {
            return Err(err);
        }
        *self.profile.lock().unwrap() = profile.clone();
        Ok(SaveResponse {
            success: Some(true),
            message: None,
        })
    }
}

#[async_trait]
impl SuggestionSource for MemoryBackend {
    async fn master_list(&self, kind: ChipKind) -> Result<Vec<String>, AppError> {
        self.record(format!("get-{kind}"));
        Ok(self
            .masters
            .lock()
            .unwrap()
            .get(&kind)
            .cloned()
            .unwrap_or_default())
    }

    async fn search(&self, kind: ChipKind, query: &str) -> Result<Vec<String>, AppError> {
        self.record(format!("search-{kind}:{query}"));
        match self.remote.lock().unwrap().get(&kind) {
            Some(items) => Ok(items.clone()),
            None => Err(AppError::Server {
                status: 500,
                message: "search failed".to_string(),
            }),
        }
    }
}

#[async_trait]
impl CareerAdvisor for MemoryBackend {
    async fn recommend(&self, token: &str, _profile: &Value) -> Result<RecommendResponse, AppError> {
        self.record("recommend");
        Self::check_token(token)?;
        let results = self.results.lock().unwrap().clone();
        Ok(RecommendResponse {
            success: !results.is_empty(),
            results,
        })
    }

    async fn roadmap(&self, career: &str, _profile: &Value) -> Result<Roadmap, AppError> {
        self.record(format!("roadmap:{career}"));
        self.roadmap
            .lock()
            .unwrap()
            .clone()
            .ok_or_else(|| AppError::NotFound(format!("No roadmap found for career '{career}'")))
    }
}

#[async_trait]
impl AuthService for MemoryBackend {
    async fn register(
        &self,
        fullname: &str,
        email: &str,
        _password: &str,
    ) -> Result<AuthResponse, AppError> {
        self.record("register");
        Ok(AuthResponse {
            success: true,
            token: Some("token-register".to_string()),
            user: Some(UserInfo {
                fullname: Some(fullname.to_string()),
                email: email.to_string(),
                ..Default::default()
            }),
            ..Default::default()
        })
    }

    async fn login(&self, email: &str, password: &str) -> Result<AuthResponse, AppError> {
        self.record("login");
        if password != "secret" {
            return Ok(AuthResponse {
                success: false,
                msg: Some("Invalid credentials".to_string()),
                ..Default::default()
            });
        }
        Ok(AuthResponse {
            success: true,
            token: Some("token-login".to_string()),
            user: Some(UserInfo {
                fullname: Some("Asha Rao".to_string()),
                email: email.to_string(),
                ..Default::default()
            }),
            ..Default::default()
        })
    }

    async fn google_login(&self, _credential: &str) -> Result<AuthResponse, AppError> {
        self.record("google-login");
        Ok(AuthResponse {
            success: true,
            token: Some("token-google".to_string()),
            user: Some(UserInfo {
                name: Some("Meera Nair".to_string()),
                email: "meera@example.com".to_string(),
                ..Default::default()
            }),
            ..Default::default()
        })
    }
}
