//! Login session
//!
//! The identity provider is external; the game only needs to know whether a
//! login is in progress and which opaque identity (if any) it produced.

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Opaque principal handed out by the identity provider
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Identity(String);

impl Identity {
    pub fn new(principal: impl Into<String>) -> Self {
        Self(principal.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// First 10 characters followed by an ellipsis
    pub fn abbreviated(&self) -> String {
        let prefix: String = self.0.chars().take(10).collect();
        format!("{}...", prefix)
    }

    /// Generate a principal-shaped identifier: five-character groups of
    /// lowercase base32 joined by dashes
    pub fn generate<R: Rng>(rng: &mut R) -> Self {
        const ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyz234567";
        let groups: Vec<String> = (0..5)
            .map(|_| {
                (0..5)
                    .map(|_| ALPHABET[rng.random_range(0..ALPHABET.len())] as char)
                    .collect()
            })
            .collect();
        Self(groups.join("-"))
    }
}

impl std::fmt::Display for Identity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Progress of the login flow
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LoginStatus {
    #[default]
    Idle,
    LoggingIn,
    Success,
    LoginError(String),
}

/// Current login state
#[derive(Debug, Clone, Default)]
pub struct Session {
    pub status: LoginStatus,
    pub identity: Option<Identity>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Session restored with a known identity
    pub fn logged_in(identity: Identity) -> Self {
        Self {
            status: LoginStatus::Success,
            identity: Some(identity),
        }
    }

    pub fn begin_login(&mut self) {
        self.status = LoginStatus::LoggingIn;
    }

    pub fn complete_login(&mut self, identity: Identity) {
        log::info!("Logged in as {}", identity.abbreviated());
        self.status = LoginStatus::Success;
        self.identity = Some(identity);
    }

    pub fn fail_login(&mut self, message: impl Into<String>) {
        let message = message.into();
        log::warn!("Login failed: {}", message);
        self.status = LoginStatus::LoginError(message);
        self.identity = None;
    }

    pub fn logout(&mut self) {
        if let Some(identity) = self.identity.take() {
            log::info!("Logged out {}", identity.abbreviated());
        }
        self.status = LoginStatus::Idle;
    }

    pub fn is_logging_in(&self) -> bool {
        self.status == LoginStatus::LoggingIn
    }

    /// Logged in with a usable identity
    pub fn is_logged_in(&self) -> bool {
        self.status == LoginStatus::Success && self.identity.is_some()
    }

    /// Identity for authenticated calls
    pub fn identity(&self) -> Option<&Identity> {
        if self.is_logged_in() {
            self.identity.as_ref()
        } else {
            None
        }
    }

    /// LocalStorage key for the device identity (used only in wasm32)
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "neon_dash_identity";

    /// Identity remembered on this device from a previous login
    pub fn load_remembered() -> Option<Identity> {
        crate::platform::storage_get(Self::STORAGE_KEY)
            .filter(|s| !s.trim().is_empty())
            .map(Identity::new)
    }

    /// Remember the identity across page loads
    pub fn remember(identity: &Identity) -> Result<(), String> {
        crate::platform::storage_set(Self::STORAGE_KEY, identity.as_str())
    }

    /// Forget the remembered identity on logout
    pub fn forget() {
        crate::platform::storage_remove(Self::STORAGE_KEY);
    }
}
