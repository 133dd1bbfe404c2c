//! # Domain Identity Newtypes
//!
//! Newtype wrappers for the identifiers in the Merchant Guard Stack.
//! These prevent accidental identifier confusion — you cannot pass an
//! `ActorId` where a `MerchantId` is expected.
//!
//! ## Tenancy Invariant
//!
//! Every gate state and baseline record is owned by exactly one merchant
//! scope. Type-level distinction between identifier namespaces keeps
//! cross-tenant mixups out of the compiled program.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a merchant (one storefront tenant).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MerchantId(pub Uuid);

/// Identifier for a human actor recording a manual override.
///
/// Actors come from the external auth layer; this core treats the value as
/// an opaque, non-empty string (e.g., a staff email or an SSO subject).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ActorId(pub String);

impl MerchantId {
    /// Generate a new random merchant identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Access the inner UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }

    /// Parse from the canonical hyphenated UUID form.
    pub fn parse(s: &str) -> Result<Self, crate::MguardError> {
        Uuid::parse_str(s)
            .map(Self)
            .map_err(|e| crate::MguardError::Validation(format!("invalid merchant id {s:?}: {e}")))
    }
}

impl Default for MerchantId {
    fn default() -> Self {
        Self::new()
    }
}

impl ActorId {
    /// Create an actor identifier, rejecting empty or blank values.
    pub fn new(s: impl Into<String>) -> Result<Self, crate::MguardError> {
        let s = s.into();
        if s.trim().is_empty() {
            return Err(crate::MguardError::Validation(
                "actor id must not be empty".to_string(),
            ));
        }
        Ok(Self(s))
    }

    /// Access the inner string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for MerchantId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "merchant:{}", self.0)
    }
}

impl std::fmt::Display for ActorId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merchant_id_unique() {
        assert_ne!(MerchantId::new(), MerchantId::new());
    }

    #[test]
    fn test_merchant_id_parse_roundtrip() {
        let id = MerchantId::new();
        let parsed = MerchantId::parse(&id.as_uuid().to_string()).unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn test_merchant_id_parse_invalid() {
        assert!(MerchantId::parse("not-a-uuid").is_err());
        assert!(MerchantId::parse("").is_err());
    }

    #[test]
    fn test_merchant_id_display_prefix() {
        let id = MerchantId::new();
        assert!(id.to_string().starts_with("merchant:"));
    }

    #[test]
    fn test_actor_id_rejects_blank() {
        assert!(ActorId::new("").is_err());
        assert!(ActorId::new("   ").is_err());
        assert!(ActorId::new("ops@example.com").is_ok());
    }

    #[test]
    fn test_actor_id_display() {
        let actor = ActorId::new("ops@example.com").unwrap();
        assert_eq!(actor.to_string(), "ops@example.com");
        assert_eq!(actor.as_str(), "ops@example.com");
    }

    #[test]
    fn test_merchant_id_serde_roundtrip() {
        let id = MerchantId::new();
        let json = serde_json::to_string(&id).unwrap();
        let parsed: MerchantId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, parsed);
    }
}
