//! Manifest consumer: fetch, inspect, release, report.
//!
//! # Responsibility
//! - Drive one `Requested → Allocated|Absent → Inspected → Released` cycle per
//!   provider, strictly in sequence.
//! - Aggregate per-check outcomes into a process-level verdict.
//!
//! # Invariants
//! - Every obtained handle is released exactly once, whatever the checks say.
//! - A failed provider never stops the remaining providers from running.
//! - Checks only see borrowed views of the payload.

use crate::handle::{get_manifest, release_handle, ForeignString, ManifestView};
use log::{info, warn};
use provcap_core::{
    smoke_check, strict_check, InvalidReason, ProviderId, ValidationMode, ValidationResult,
};
use std::fmt::{Display, Formatter};

/// Producer seam the consumer fetches manifests from.
pub trait ManifestSource {
    /// Returns an owned manifest, or `None` for the absent sentinel.
    fn fetch(&self, provider: ProviderId) -> Option<ForeignString>;
}

/// Source backed by this library's own C exports.
#[derive(Debug, Default, Clone, Copy)]
pub struct LinkedLibrary;

impl ManifestSource for LinkedLibrary {
    fn fetch(&self, provider: ProviderId) -> Option<ForeignString> {
        get_manifest(provider)
    }
}

/// Consumer run configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsumerConfig {
    /// Providers to query, in order.
    pub providers: Vec<ProviderId>,
    pub mode: ValidationMode,
}

impl Default for ConsumerConfig {
    fn default() -> Self {
        Self {
            providers: ProviderId::all().to_vec(),
            mode: ValidationMode::Smoke,
        }
    }
}

/// Kind of check applied to one payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckKind {
    /// `{"info"` prefix smoke check.
    Prefix,
    /// Full decode plus schema validation.
    Schema,
}

impl CheckKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Prefix => "prefix",
            Self::Schema => "schema",
        }
    }
}

impl Display for CheckKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckOutcome {
    pub kind: CheckKind,
    pub result: ValidationResult,
}

/// Outcome of one provider cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderReport {
    pub provider: ProviderId,
    /// Payload length in bytes; `None` when the provider returned nothing.
    pub payload_len: Option<usize>,
    pub checks: Vec<CheckOutcome>,
}

impl ProviderReport {
    pub fn passed(&self) -> bool {
        self.checks.iter().all(|check| check.result.is_valid())
    }

    /// First failing check result, in check order.
    pub fn first_failure(&self) -> Option<&InvalidReason> {
        self.checks.iter().find_map(|check| check.result.reason())
    }
}

/// Outcome of a full consumer run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProbeReport {
    pub providers: Vec<ProviderReport>,
}

impl ProbeReport {
    pub fn all_passed(&self) -> bool {
        self.providers.iter().all(ProviderReport::passed)
    }

    pub fn failed_checks(&self) -> usize {
        self.providers
            .iter()
            .flat_map(|report| report.checks.iter())
            .filter(|check| !check.result.is_valid())
            .count()
    }

    /// `0` when every check passed, `1` otherwise.
    pub fn exit_code(&self) -> u8 {
        if self.all_passed() {
            0
        } else {
            1
        }
    }
}

/// Sequential manifest consumer over a [`ManifestSource`].
#[derive(Debug)]
pub struct ManifestConsumer<S> {
    source: S,
    mode: ValidationMode,
}

impl<S: ManifestSource> ManifestConsumer<S> {
    pub fn new(source: S, mode: ValidationMode) -> Self {
        Self { source, mode }
    }

    pub fn mode(&self) -> ValidationMode {
        self.mode
    }

    /// Runs one fetch/inspect/release cycle.
    ///
    /// # Side effects
    /// - Releases the fetched handle before returning.
    /// - Emits `manifest_probe` logging events.
    pub fn probe(&self, provider: ProviderId) -> ProviderReport {
        info!(
            "event=manifest_probe module=consumer status=start provider={}",
            provider
        );
        let handle = self.source.fetch(provider);
        let report = inspect(provider, handle.as_ref().map(ForeignString::view), self.mode);
        release_handle(handle);

        match report.first_failure() {
            None => info!(
                "event=manifest_probe module=consumer status=ok provider={} bytes={}",
                provider,
                report.payload_len.unwrap_or(0)
            ),
            Some(reason) => warn!(
                "event=manifest_probe module=consumer status=invalid provider={} reason={}",
                provider,
                reason.code()
            ),
        }
        report
    }

    /// Probes every provider in `providers`, in order.
    pub fn run(&self, providers: &[ProviderId]) -> ProbeReport {
        ProbeReport {
            providers: providers
                .iter()
                .map(|provider| self.probe(*provider))
                .collect(),
        }
    }
}

impl ManifestConsumer<LinkedLibrary> {
    /// Consumer over the linked C exports.
    pub fn linked(mode: ValidationMode) -> Self {
        Self::new(LinkedLibrary, mode)
    }
}

/// Runs every configured check against a borrowed payload.
pub fn inspect(
    provider: ProviderId,
    view: Option<ManifestView<'_>>,
    mode: ValidationMode,
) -> ProviderReport {
    let payload = view.map(|view| view.as_bytes());
    let mut checks = vec![CheckOutcome {
        kind: CheckKind::Prefix,
        result: smoke_check(payload),
    }];
    if mode == ValidationMode::Strict {
        checks.push(CheckOutcome {
            kind: CheckKind::Schema,
            result: payload
                .map(strict_check)
                .unwrap_or(ValidationResult::Invalid(InvalidReason::Missing)),
        });
    }

    ProviderReport {
        provider,
        payload_len: payload.map(<[u8]>::len),
        checks,
    }
}

#[cfg(test)]
mod tests {
    use super::{CheckKind, ConsumerConfig, ManifestConsumer};
    use provcap_core::{ProviderId, ValidationMode, ValidationResult};

    #[test]
    fn default_config_queries_every_provider_with_smoke_checks() {
        let config = ConsumerConfig::default();
        assert_eq!(config.providers, ProviderId::all().to_vec());
        assert_eq!(config.mode, ValidationMode::Smoke);
    }

    #[test]
    fn linked_consumer_passes_every_builtin_provider() {
        let consumer = ManifestConsumer::linked(ValidationMode::Strict);
        let report = consumer.run(ProviderId::all());

        assert!(report.all_passed(), "{report:?}");
        assert_eq!(report.exit_code(), 0);
        for provider in &report.providers {
            let kinds: Vec<CheckKind> = provider.checks.iter().map(|check| check.kind).collect();
            assert_eq!(kinds, vec![CheckKind::Prefix, CheckKind::Schema]);
            assert!(provider.payload_len.unwrap_or(0) > 0);
            assert!(provider
                .checks
                .iter()
                .all(|check| check.result == ValidationResult::Valid));
        }
    }

    #[test]
    fn smoke_mode_runs_only_the_prefix_check() {
        let consumer = ManifestConsumer::linked(ValidationMode::Smoke);
        let report = consumer.probe(ProviderId::OpenAi);
        assert_eq!(report.checks.len(), 1);
        assert_eq!(report.checks[0].kind, CheckKind::Prefix);
    }
}
