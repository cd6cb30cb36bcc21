use std::sync::Arc;

use serde::Serialize;
use tracing::info;

use crate::api_client::types::{AuthResponse, UserInfo};
use crate::api_client::AuthService;
use crate::errors::AppError;
use crate::notice::Notice;
use crate::profile::validation::validate_credentials;
use crate::session::SessionStore;

/// What the header shows for the logged-in user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserDisplay {
    pub name: String,
    pub initial: char,
    pub email: String,
}

impl UserDisplay {
    /// `name`, then `fullname`, then `"User"`. The initial comes from the first word.
    pub fn from_user(user: &UserInfo) -> Self {
        let name = [user.name.as_deref(), user.fullname.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .find(|n| !n.is_empty())
            .unwrap_or("User")
            .to_string();
        let initial = name
            .split_whitespace()
            .next()
            .and_then(|word| word.chars().next())
            .map(|c| c.to_ascii_uppercase())
            .unwrap_or('U');
        Self {
            name,
            initial,
            email: user.email.clone(),
        }
    }
}

pub struct AuthSession {
    auth: Arc<dyn AuthService>,
    session: Arc<SessionStore>,
    notices: Vec<Notice>,
}

impl AuthSession {
    pub fn new(auth: Arc<dyn AuthService>, session: Arc<SessionStore>) -> Self {
        Self {
            auth,
            session,
            notices: Vec::new(),
        }
    }

    pub async fn register(
        &mut self,
        fullname: &str,
        email: &str,
        password: &str,
    ) -> Result<UserInfo, AppError> {
        validate_credentials(&[fullname, email, password]).map_err(|e| self.surface(e))?;
        let response = self
            .auth
            .register(fullname.trim(), email.trim(), password)
            .await
            .map_err(|e| self.surface(e))?;
        self.accept(response, "Registration failed", "Registration successful")
    }

    pub async fn login(&mut self, email: &str, password: &str) -> Result<UserInfo, AppError> {
        validate_credentials(&[email, password]).map_err(|e| self.surface(e))?;
        let response = self
            .auth
            .login(email.trim(), password)
            .await
            .map_err(|e| self.surface(e))?;
        self.accept(response, "Invalid credentials", "Login successful")
    }

    pub async fn google_login(&mut self, credential: &str) -> Result<UserInfo, AppError> {
        validate_credentials(&[credential]).map_err(|e| self.surface(e))?;
        let response = self
            .auth
            .google_login(credential.trim())
            .await
            .map_err(|e| self.surface(e))?;
        self.accept(response, "Google login failed", "Login successful")
    }

    pub fn logout(&mut self) -> Result<(), AppError> {
        self.session.clear().map_err(|e| self.surface(e))?;
        self.notices.push(Notice::info("Logged out"));
        info!("Session cleared");
        Ok(())
    }

    pub fn current_user(&self) -> Option<UserDisplay> {
        self.session.token()?;
        self.session.user().map(|user| UserDisplay::from_user(&user))
    }

    pub fn drain_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    fn accept(
        &mut self,
        response: AuthResponse,
        fallback: &str,
        success: &str,
    ) -> Result<UserInfo, AppError> {
        let token = response.token.filter(|t| !t.trim().is_empty());
        let token = match (response.success, token) {
            (true, Some(token)) => token,
            _ => {
                let message = response
                    .message
                    .or(response.msg)
                    .filter(|m| !m.trim().is_empty())
                    .unwrap_or_else(|| fallback.to_string());
                return Err(self.surface(AppError::Server {
                    status: 401,
                    message,
                }));
            }
        };

        let user = response.user.unwrap_or_default();
        self.session
            .store_login(&token, &user)
            .map_err(|e| self.surface(e))?;
        self.notices.push(Notice::success(success));
        info!(email = %user.email, "Logged in");
        Ok(user)
    }

    fn surface(&mut self, err: AppError) -> AppError {
        tracing::warn!(code = err.code(), "{err}");
        self.notices.push(err.notice());
        err
    }
}
