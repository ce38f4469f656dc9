//! Manifest payload validation.
//!
//! # Responsibility
//! - Classify a borrowed manifest payload as valid or invalid.
//! - Offer a cheap smoke check and a strict decode + schema check.
//!
//! # Invariants
//! - Validators only borrow payload bytes; ownership is never affected.
//! - Validation is deterministic: equal input yields equal results.
//! - The smoke check is non-authoritative. It only proves the payload looks
//!   like a manifest; use `strict_check` to gate on content.

use crate::manifest::{ManifestSchemaError, ProviderManifest};
use std::fmt::{Display, Formatter};

/// Literal prefix every rendered manifest starts with.
pub const MANIFEST_PREFIX: &[u8] = b"{\"info\"";

/// Validation outcome for one payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationResult {
    Valid,
    Invalid(InvalidReason),
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid)
    }

    /// Returns the failure reason, if any.
    pub fn reason(&self) -> Option<&InvalidReason> {
        match self {
            Self::Valid => None,
            Self::Invalid(reason) => Some(reason),
        }
    }
}

/// Why a payload was rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvalidReason {
    /// Provider returned the absent sentinel.
    Missing,
    /// Payload does not start with [`MANIFEST_PREFIX`].
    UnexpectedPrefix,
    NotUtf8,
    /// Payload is not a decodable manifest document.
    Malformed(String),
    Schema(ManifestSchemaError),
}

impl InvalidReason {
    /// Stable short code used in logs and CLI output.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Missing => "missing",
            Self::UnexpectedPrefix => "unexpected-prefix",
            Self::NotUtf8 => "not-utf8",
            Self::Malformed(_) => "malformed",
            Self::Schema(_) => "schema",
        }
    }
}

impl Display for InvalidReason {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Missing => write!(f, "missing: provider returned no manifest"),
            Self::UnexpectedPrefix => write!(
                f,
                "unexpected-prefix: payload does not start with {}",
                String::from_utf8_lossy(MANIFEST_PREFIX)
            ),
            Self::NotUtf8 => write!(f, "not-utf8: payload is not valid UTF-8"),
            Self::Malformed(message) => write!(f, "malformed: {message}"),
            Self::Schema(err) => write!(f, "schema: {err}"),
        }
    }
}

/// Validation depth selected by configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ValidationMode {
    /// Prefix check only.
    #[default]
    Smoke,
    /// Prefix check plus full decode and schema validation.
    Strict,
}

/// Shallow prefix check.
///
/// `None` stands for the absent sentinel and yields `Invalid(Missing)`.
pub fn smoke_check(payload: Option<&[u8]>) -> ValidationResult {
    match payload {
        None => ValidationResult::Invalid(InvalidReason::Missing),
        Some(bytes) if bytes.starts_with(MANIFEST_PREFIX) => ValidationResult::Valid,
        Some(_) => ValidationResult::Invalid(InvalidReason::UnexpectedPrefix),
    }
}

/// Full decode into [`ProviderManifest`] followed by schema validation.
pub fn strict_check(payload: &[u8]) -> ValidationResult {
    let text = match std::str::from_utf8(payload) {
        Ok(text) => text,
        Err(_) => return ValidationResult::Invalid(InvalidReason::NotUtf8),
    };
    let manifest = match serde_json::from_str::<ProviderManifest>(text) {
        Ok(manifest) => manifest,
        Err(err) => return ValidationResult::Invalid(InvalidReason::Malformed(err.to_string())),
    };
    match manifest.validate() {
        Ok(()) => ValidationResult::Valid,
        Err(err) => ValidationResult::Invalid(InvalidReason::Schema(err)),
    }
}
