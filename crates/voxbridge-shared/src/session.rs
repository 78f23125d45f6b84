//! Wallet session state supplied by the identity provider.
//!
//! The bridge itself never reads a global session: every operation takes
//! the principal as an explicit argument. This module models the session
//! the surrounding application holds, with the same 24 hour expiry the
//! wallet layer enforces.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::constants::SESSION_TTL_HOURS;
use crate::types::Principal;

/// Wallet flavours a session can be established through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WalletKind {
    #[serde(rename = "plug")]
    Plug,
    #[serde(rename = "ii")]
    InternetIdentity,
}

impl WalletKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Plug => "plug",
            Self::InternetIdentity => "ii",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "plug" => Some(Self::Plug),
            "ii" => Some(Self::InternetIdentity),
            _ => None,
        }
    }
}

impl std::fmt::Display for WalletKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An authenticated wallet session.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Session {
    pub wallet: WalletKind,
    pub principal: Principal,
    pub connected_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl Session {
    /// Open a session for a freshly connected wallet.
    pub fn connect(wallet: WalletKind, principal: Principal) -> Self {
        let now = Utc::now();
        Self {
            wallet,
            principal,
            connected_at: now,
            expires_at: now + Duration::hours(SESSION_TTL_HOURS),
        }
    }

    pub fn has_expired(&self) -> bool {
        Utc::now() >= self.expires_at
    }

    /// The session principal, or `None` once the session has lapsed.
    pub fn current_principal(&self) -> Option<&Principal> {
        if self.has_expired() {
            None
        } else {
            Some(&self.principal)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_session_yields_principal() {
        let session = Session::connect(WalletKind::Plug, Principal::new("abc"));
        assert!(!session.has_expired());
        assert_eq!(session.current_principal(), Some(&Principal::new("abc")));
    }

    #[test]
    fn test_expired_session_yields_nothing() {
        let mut session = Session::connect(WalletKind::InternetIdentity, Principal::new("abc"));
        session.expires_at = Utc::now() - Duration::hours(1);
        assert!(session.has_expired());
        assert_eq!(session.current_principal(), None);
    }

    #[test]
    fn test_wallet_kind_wire_names() {
        assert_eq!(WalletKind::parse("plug"), Some(WalletKind::Plug));
        assert_eq!(WalletKind::parse("ii"), Some(WalletKind::InternetIdentity));
        assert_eq!(WalletKind::parse("ledger"), None);
        let json = serde_json::to_string(&WalletKind::InternetIdentity).unwrap();
        assert_eq!(json, "\"ii\"");
    }
}
