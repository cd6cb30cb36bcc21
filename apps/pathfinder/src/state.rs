use std::sync::Arc;

use anyhow::{Context, Result};

use crate::api_client::HttpApi;
use crate::auth::AuthSession;
use crate::config::Config;
use crate::profile::ProfileEditor;
use crate::recommendation::RecommendationView;
use crate::session::SessionStore;

/// Shared handles the front end builds its components from.
#[derive(Clone)]
pub struct AppContext {
    pub config: Config,
    pub api: Arc<HttpApi>,
    pub session: Arc<SessionStore>,
}

impl AppContext {
    pub fn new(config: Config) -> Result<Self> {
        let api = HttpApi::new(config.api_base.clone(), config.request_timeout)
            .context("Failed to build HTTP client")?;
        let session = SessionStore::open(&config.session_file).with_context(|| {
            format!(
                "Failed to open session store at {}",
                config.session_file.display()
            )
        })?;
        Ok(Self {
            config,
            api: Arc::new(api),
            session: Arc::new(session),
        })
    }

    pub fn editor(&self) -> ProfileEditor {
        ProfileEditor::new(
            self.api.clone(),
            self.api.clone(),
            self.session.clone(),
            self.config.save_policy,
            self.config.search_debounce,
        )
    }

    pub fn recommendations(&self) -> RecommendationView {
        RecommendationView::new(self.api.clone(), self.api.clone(), self.session.clone())
    }

    pub fn auth(&self) -> AuthSession {
        AuthSession::new(self.api.clone(), self.session.clone())
    }
}
