//! Authentication session against the remote auth API.
//!
//! The transport is abstracted behind [`AuthApi`]; the session owns the
//! token lifecycle and turns outcomes into user-facing [`Notice`]s.

use crate::storage::KeyValueStore;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::pin::Pin;
use thiserror::Error;

/// Store key holding the bearer token.
pub const TOKEN_KEY: &str = "token";

const GENERIC_FAILURE: &str = "Something went wrong";
const REGISTER_FAILURE: &str = "Something went wrong during registration";
const PASSWORD_MISMATCH: &str = "Passwords Not Matched";
const RESET_LINK_SENT: &str = "Reset password link sent successfully";

/// Boxed future for async operations (compatible with WASM).
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + 'a>>;

/// Errors from the auth transport.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// The server could not be reached.
    #[error("Transport error: {0}")]
    Transport(String),
    /// Non-success HTTP status, with the server's message if it sent one.
    #[error("HTTP {status}: {}", .message.as_deref().unwrap_or("no message"))]
    Status {
        status: u16,
        message: Option<String>,
    },
    #[error("Invalid response: {0}")]
    Decode(String),
}

impl ApiError {
    /// Message the server attached to the failure, if any.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            ApiError::Status { message, .. } => message.as_deref(),
            _ => None,
        }
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

/// Authenticated user as returned by the API.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    #[serde(default, alias = "_id")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
}

/// JSON envelope every auth endpoint answers with.
///
/// Login puts the user under `data`, `/me` under `user`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthEnvelope {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default, alias = "data")]
    pub user: Option<User>,
    #[serde(default)]
    pub token: Option<String>,
}

impl AuthEnvelope {
    pub fn from_json(json: &str) -> ApiResult<Self> {
        serde_json::from_str(json).map_err(|e| ApiError::Decode(e.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Registration {
    pub name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

/// Remote auth endpoints.
///
/// `/api/auth/login`, `/api/auth/register`, `/api/auth/me` and
/// `/api/auth/send-password-reset-link`.
pub trait AuthApi {
    fn login<'a>(&'a self, credentials: &'a Credentials) -> BoxFuture<'a, ApiResult<AuthEnvelope>>;

    fn register<'a>(&'a self, form: &'a Registration) -> BoxFuture<'a, ApiResult<AuthEnvelope>>;

    /// Current user for a bearer token.
    fn me<'a>(&'a self, token: &'a str) -> BoxFuture<'a, ApiResult<AuthEnvelope>>;

    fn send_password_reset_link<'a>(&'a self, email: &'a str) -> BoxFuture<'a, ApiResult<()>>;
}

/// Transient user-facing notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Success(String),
    Error(String),
}

impl Notice {
    pub fn is_success(&self) -> bool {
        matches!(self, Notice::Success(_))
    }

    pub fn message(&self) -> &str {
        match self {
            Notice::Success(message) | Notice::Error(message) => message,
        }
    }
}

/// Session state: who is logged in and which token is attached to requests.
pub struct AuthSession<S, A> {
    store: S,
    api: A,
    user: Option<User>,
    bearer: Option<String>,
    loading: bool,
}

impl<S: KeyValueStore, A: AuthApi> AuthSession<S, A> {
    pub fn new(store: S, api: A) -> Self {
        Self {
            store,
            api,
            user: None,
            bearer: None,
            loading: true,
        }
    }

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    /// Token currently attached to outgoing requests.
    pub fn bearer(&self) -> Option<&str> {
        self.bearer.as_deref()
    }

    /// True until the first [`AuthSession::fetch_user`] finishes.
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    fn stored_token(&self) -> Option<String> {
        match self.store.get(TOKEN_KEY) {
            Ok(token) => token.filter(|t| !t.is_empty()),
            Err(err) => {
                log::warn!("could not read auth token: {}", err);
                None
            }
        }
    }

    fn drop_auth(&mut self) {
        self.user = None;
        self.bearer = None;
    }

    /// Resolve the current user from the stored token.
    ///
    /// Every failure ends unauthenticated; none is reported as an error.
    pub async fn fetch_user(&mut self) -> Option<&User> {
        let result = match self.stored_token() {
            None => None,
            Some(token) => {
                self.bearer = Some(token.clone());
                Some(self.api.me(&token).await)
            }
        };

        match result {
            None => self.drop_auth(),
            Some(Ok(envelope)) if envelope.success => {
                log::info!("session restored");
                self.user = envelope.user;
            }
            Some(Ok(envelope)) => {
                log::warn!(
                    "auth check rejected: {}",
                    envelope.message.as_deref().unwrap_or("no message")
                );
                self.drop_auth();
            }
            Some(Err(err)) => {
                log::warn!("auth check failed: {}", err);
                self.drop_auth();
            }
        }
        self.loading = false;
        self.user.as_ref()
    }

    pub async fn login(&mut self, credentials: &Credentials) -> Notice {
        match self.api.login(credentials).await {
            Ok(envelope) if envelope.success => {
                if let Some(token) = envelope.token {
                    if let Err(err) = self.store.set(TOKEN_KEY, &token) {
                        log::warn!("could not persist auth token: {}", err);
                    }
                    self.bearer = Some(token);
                }
                self.user = envelope.user;
                log::info!("logged in as {}", credentials.email);
                Notice::Success(envelope.message.unwrap_or_default())
            }
            Ok(envelope) => {
                Notice::Error(envelope.message.unwrap_or_else(|| GENERIC_FAILURE.to_string()))
            }
            Err(err) => {
                log::warn!("login failed: {}", err);
                Notice::Error(err.server_message().unwrap_or(GENERIC_FAILURE).to_string())
            }
        }
    }

    /// Register a new account. Mismatched passwords never reach the server.
    pub async fn register(&mut self, form: &Registration) -> Notice {
        if form.password != form.confirm_password {
            return Notice::Error(PASSWORD_MISMATCH.to_string());
        }
        match self.api.register(form).await {
            Ok(envelope) if envelope.success => {
                log::info!("registered {}", form.email);
                Notice::Success(envelope.message.unwrap_or_default())
            }
            Ok(envelope) => Notice::Error(envelope.message.unwrap_or_default()),
            Err(err) => {
                log::warn!("registration failed: {}", err);
                Notice::Error(REGISTER_FAILURE.to_string())
            }
        }
    }

    pub async fn send_password_reset_link(&self, email: &str) -> Notice {
        match self.api.send_password_reset_link(email).await {
            Ok(()) => Notice::Success(RESET_LINK_SENT.to_string()),
            Err(err) => {
                log::warn!("password reset request failed: {}", err);
                Notice::Error(GENERIC_FAILURE.to_string())
            }
        }
    }

    /// Forget the user and the stored token.
    pub fn logout(&mut self) {
        if let Err(err) = self.store.remove(TOKEN_KEY) {
            log::warn!("could not remove auth token: {}", err);
        }
        self.drop_auth();
        log::info!("logged out");
    }
}
