//! Provider identity model.
//!
//! # Responsibility
//! - Define the closed set of providers that can publish a manifest.
//! - Map identities to stable string ids and stable ABI codes.
//!
//! # Invariants
//! - String ids and ABI codes never change once published.
//! - Unknown ids and codes are rejected, never coerced to a default provider.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Stable string id for the OpenAI provider.
pub const PROVIDER_OPENAI: &str = "openai";
/// Stable string id for the Anthropic provider.
pub const PROVIDER_ANTHROPIC: &str = "anthropic";

/// ABI code for the OpenAI provider.
pub const PROVIDER_CODE_OPENAI: u32 = 0;
/// ABI code for the Anthropic provider.
pub const PROVIDER_CODE_ANTHROPIC: u32 = 1;

const ALL_PROVIDERS: &[ProviderId] = &[ProviderId::OpenAi, ProviderId::Anthropic];

/// Identity of a manifest-publishing provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderId {
    #[serde(rename = "openai")]
    OpenAi,
    Anthropic,
}

impl ProviderId {
    /// Returns every known provider in ABI-code order.
    pub fn all() -> &'static [ProviderId] {
        ALL_PROVIDERS
    }

    /// Stable string id used by CLI flags and the model lookup ABI.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::OpenAi => PROVIDER_OPENAI,
            Self::Anthropic => PROVIDER_ANTHROPIC,
        }
    }

    /// Stable numeric code used by `provcap_get_manifest`.
    pub fn code(self) -> u32 {
        match self {
            Self::OpenAi => PROVIDER_CODE_OPENAI,
            Self::Anthropic => PROVIDER_CODE_ANTHROPIC,
        }
    }

    /// Human-readable provider name.
    pub fn display_name(self) -> &'static str {
        match self {
            Self::OpenAi => "OpenAI",
            Self::Anthropic => "Anthropic",
        }
    }

    /// Resolves an ABI code. Returns `None` for codes outside the known set.
    pub fn from_code(code: u32) -> Option<Self> {
        match code {
            PROVIDER_CODE_OPENAI => Some(Self::OpenAi),
            PROVIDER_CODE_ANTHROPIC => Some(Self::Anthropic),
            _ => None,
        }
    }

    /// Parses a provider string id.
    ///
    /// Input is trimmed and matched case-insensitively.
    pub fn parse(value: &str) -> Result<Self, ProviderIdError> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "" => Err(ProviderIdError::Empty),
            PROVIDER_OPENAI => Ok(Self::OpenAi),
            PROVIDER_ANTHROPIC => Ok(Self::Anthropic),
            _ => Err(ProviderIdError::Unknown(value.trim().to_string())),
        }
    }
}

impl Display for ProviderId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ProviderId {
    type Err = ProviderIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Provider id parse errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderIdError {
    Empty,
    Unknown(String),
}

impl Display for ProviderIdError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Empty => write!(f, "provider id must not be empty"),
            Self::Unknown(value) => write!(
                f,
                "provider id is unknown: {value} (expected {PROVIDER_OPENAI}|{PROVIDER_ANTHROPIC})"
            ),
        }
    }
}

impl Error for ProviderIdError {}

#[cfg(test)]
mod tests {
    use super::{ProviderId, ProviderIdError};

    #[test]
    fn parses_known_ids_case_insensitively() {
        assert_eq!(
            ProviderId::parse(" OpenAI ").expect("openai parse"),
            ProviderId::OpenAi
        );
        assert_eq!(
            ProviderId::parse("anthropic").expect("anthropic parse"),
            ProviderId::Anthropic
        );
    }

    #[test]
    fn rejects_empty_and_unknown_ids() {
        assert_eq!(ProviderId::parse("  "), Err(ProviderIdError::Empty));
        assert_eq!(
            ProviderId::parse("mistral"),
            Err(ProviderIdError::Unknown("mistral".to_string()))
        );
    }

    #[test]
    fn codes_round_trip_and_unknown_codes_are_absent() {
        for provider in ProviderId::all() {
            assert_eq!(ProviderId::from_code(provider.code()), Some(*provider));
        }
        assert_eq!(ProviderId::from_code(2), None);
        assert_eq!(ProviderId::from_code(u32::MAX), None);
    }

    #[test]
    fn serde_uses_stable_string_ids() {
        let raw = serde_json::to_string(&ProviderId::OpenAi).expect("serialize id");
        assert_eq!(raw, "\"openai\"");
        let parsed: ProviderId = serde_json::from_str("\"anthropic\"").expect("deserialize id");
        assert_eq!(parsed, ProviderId::Anthropic);
    }
}
