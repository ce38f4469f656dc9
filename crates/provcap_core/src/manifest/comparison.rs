//! Capability comparison and lossiness reporting.
//!
//! # Responsibility
//! - Report what a request shaped for one model loses when sent to another.
//! - Cover features, modalities, control parameter ranges and token limits.
//!
//! # Invariants
//! - Comparison is directional: `source.compare(&target)` only reports losses
//!   on the way from `source` to `target`; gains land in
//!   `additional_capabilities`.
//! - `severity` is `None` exactly when `is_lossy` is false.

use crate::manifest::registry::ManifestError;
use crate::manifest::types::{Capability, Modality, ParameterSupport, FEATURE_NAMES};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Directional comparison of two capability sets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CapabilityComparison {
    /// Capabilities `source` has and `target` lacks.
    pub missing_capabilities: Vec<String>,
    /// Capabilities `target` has and `source` lacks.
    pub additional_capabilities: Vec<String>,
    /// Capabilities both have, with narrower limits on `target`.
    pub constrained_capabilities: Vec<ConstraintDifference>,
    pub lossiness_report: LossinessReport,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConstraintDifference {
    pub capability: String,
    pub source_value: Value,
    pub target_value: Value,
    pub impact: LossinessImpact,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LossinessReport {
    pub is_lossy: bool,
    pub lossiness_types: Vec<LossinessType>,
    pub severity: LossinessSeverity,
    /// One human-readable line per detected loss.
    pub details: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "name")]
pub enum LossinessType {
    MissingFeature(String),
    MissingModality(String),
    ConstrainedParameter(String),
    TokenLimitReduced,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LossinessSeverity {
    None,
    Low,
    Medium,
    High,
    Critical,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LossinessImpact {
    Minor,
    Major,
}

impl LossinessType {
    fn severity(&self) -> LossinessSeverity {
        match self {
            Self::MissingFeature(name) => match name.as_str() {
                "function_calling" | "tool_use" => LossinessSeverity::High,
                "streaming" | "logprobs" | "seed" => LossinessSeverity::Low,
                _ => LossinessSeverity::Medium,
            },
            Self::MissingModality(_) => LossinessSeverity::Critical,
            Self::ConstrainedParameter(_) => LossinessSeverity::Medium,
            Self::TokenLimitReduced => LossinessSeverity::High,
        }
    }
}

impl Capability {
    /// Compares `self` (the source) against `target`.
    pub fn compare(&self, target: &Capability) -> CapabilityComparison {
        let mut builder = ComparisonBuilder::default();
        builder.features(self, target);
        builder.modalities(self, target);
        builder.parameters(self, target);
        builder.limits(self, target);
        builder.finish()
    }
}

/// Decodes two capability documents and renders their comparison as JSON.
///
/// # Errors
/// - `ManifestError::Decode` when either input is not a capability document.
/// - `ManifestError::Serialize` when the result fails to render.
pub fn render_comparison(source_json: &str, target_json: &str) -> Result<String, ManifestError> {
    let source: Capability = serde_json::from_str(source_json).map_err(ManifestError::Decode)?;
    let target: Capability = serde_json::from_str(target_json).map_err(ManifestError::Decode)?;
    Ok(serde_json::to_string(&source.compare(&target))?)
}

#[derive(Default)]
struct ComparisonBuilder {
    missing: Vec<String>,
    additional: Vec<String>,
    constrained: Vec<ConstraintDifference>,
    losses: Vec<LossinessType>,
    details: Vec<String>,
}

impl ComparisonBuilder {
    fn features(&mut self, source: &Capability, target: &Capability) {
        for name in FEATURE_NAMES {
            let has_source = source.supports_feature(name);
            let has_target = target.supports_feature(name);
            if has_source && !has_target {
                // Tool blocks can be expressed as function calls.
                if *name == "tool_use" && target.features.function_calling {
                    continue;
                }
                self.missing.push(name.to_string());
                self.losses.push(LossinessType::MissingFeature(name.to_string()));
                self.details
                    .push(format!("target does not support feature {name}"));
            } else if has_target && !has_source {
                self.additional.push(name.to_string());
            }
        }
    }

    fn modalities(&mut self, source: &Capability, target: &Capability) {
        let directions = [
            ("input", &source.modalities.input, &target.modalities.input),
            ("output", &source.modalities.output, &target.modalities.output),
        ];
        for (direction, from, to) in directions {
            for modality in from.iter().filter(|modality| !to.contains(modality)) {
                self.missing.push(modality_key(direction, *modality));
                self.losses
                    .push(LossinessType::MissingModality(modality.as_str().to_string()));
                self.details.push(format!(
                    "target does not accept {} {direction}",
                    modality.as_str()
                ));
            }
            for modality in to.iter().filter(|modality| !from.contains(modality)) {
                self.additional.push(modality_key(direction, *modality));
            }
        }
    }

    fn parameters(&mut self, source: &Capability, target: &Capability) {
        let (from, to) = (&source.parameters, &target.parameters);
        self.parameter("temperature", &from.temperature, &to.temperature, LossinessImpact::Minor);
        self.parameter("top_p", &from.top_p, &to.top_p, LossinessImpact::Minor);
        self.parameter("top_k", &from.top_k, &to.top_k, LossinessImpact::Minor);
        self.parameter("max_tokens", &from.max_tokens, &to.max_tokens, LossinessImpact::Major);
        self.parameter(
            "frequency_penalty",
            &from.frequency_penalty,
            &to.frequency_penalty,
            LossinessImpact::Minor,
        );
        self.parameter(
            "presence_penalty",
            &from.presence_penalty,
            &to.presence_penalty,
            LossinessImpact::Minor,
        );
    }

    fn parameter<T: PartialOrd + Serialize>(
        &mut self,
        name: &str,
        source: &ParameterSupport<T>,
        target: &ParameterSupport<T>,
        impact: LossinessImpact,
    ) {
        if !source.supported {
            return;
        }
        if !target.supported {
            self.losses
                .push(LossinessType::ConstrainedParameter(name.to_string()));
            self.details
                .push(format!("target does not accept parameter {name}"));
            return;
        }
        let raised_min = matches!((&source.min, &target.min), (Some(from), Some(to)) if to > from);
        let lowered_max = matches!((&source.max, &target.max), (Some(from), Some(to)) if to < from);
        if raised_min || lowered_max {
            self.constrained.push(ConstraintDifference {
                capability: name.to_string(),
                source_value: json!({ "min": source.min, "max": source.max }),
                target_value: json!({ "min": target.min, "max": target.max }),
                impact,
            });
            self.losses
                .push(LossinessType::ConstrainedParameter(name.to_string()));
            self.details
                .push(format!("target narrows the accepted range of {name}"));
        }
    }

    fn limits(&mut self, source: &Capability, target: &Capability) {
        let (from, to) = (&source.limits, &target.limits);
        self.limit("context_window", from.max_context_window, to.max_context_window);
        self.limit("output_tokens", from.max_output_tokens, to.max_output_tokens);
    }

    fn limit(&mut self, name: &str, source: Option<u32>, target: Option<u32>) {
        let (Some(from), Some(to)) = (source, target) else {
            return;
        };
        if to >= from {
            return;
        }
        self.constrained.push(ConstraintDifference {
            capability: name.to_string(),
            source_value: json!(from),
            target_value: json!(to),
            impact: LossinessImpact::Major,
        });
        if !self.losses.contains(&LossinessType::TokenLimitReduced) {
            self.losses.push(LossinessType::TokenLimitReduced);
        }
        self.details
            .push(format!("target {name} ({to}) is smaller than source ({from})"));
    }

    fn finish(self) -> CapabilityComparison {
        let severity = self
            .losses
            .iter()
            .map(LossinessType::severity)
            .max()
            .unwrap_or(LossinessSeverity::None);
        CapabilityComparison {
            missing_capabilities: self.missing,
            additional_capabilities: self.additional,
            constrained_capabilities: self.constrained,
            lossiness_report: LossinessReport {
                is_lossy: !self.losses.is_empty(),
                lossiness_types: self.losses,
                severity,
                details: self.details,
            },
        }
    }
}

fn modality_key(direction: &str, modality: Modality) -> String {
    format!("{direction}_{}", modality.as_str())
}

#[cfg(test)]
mod tests {
    use super::{render_comparison, LossinessImpact, LossinessSeverity, LossinessType};
    use crate::manifest::registry::ManifestError;
    use crate::manifest::types::{Capability, ProviderManifest};

    fn capability(manifest: &ProviderManifest, model: &str) -> Capability {
        manifest
            .model_capabilities(model)
            .cloned()
            .expect("builtin model")
    }

    #[test]
    fn identical_capabilities_are_lossless() {
        let gpt4 = capability(&ProviderManifest::openai(), "gpt-4-turbo");
        let comparison = gpt4.compare(&gpt4);
        assert!(!comparison.lossiness_report.is_lossy);
        assert_eq!(comparison.lossiness_report.severity, LossinessSeverity::None);
        assert!(comparison.missing_capabilities.is_empty());
        assert!(comparison.additional_capabilities.is_empty());
        assert!(comparison.constrained_capabilities.is_empty());
    }

    #[test]
    fn upgrade_reports_gains_without_loss() {
        let openai = ProviderManifest::openai();
        let comparison =
            capability(&openai, "gpt-3.5-turbo").compare(&capability(&openai, "gpt-4-turbo"));
        assert!(!comparison.lossiness_report.is_lossy);
        assert_eq!(
            comparison.additional_capabilities,
            vec!["vision".to_string(), "input_image".to_string()]
        );
    }

    #[test]
    fn dropping_image_input_is_critical() {
        let openai = ProviderManifest::openai();
        let comparison =
            capability(&openai, "gpt-4-turbo").compare(&capability(&openai, "gpt-3.5-turbo"));
        let report = &comparison.lossiness_report;
        assert!(report.is_lossy);
        assert_eq!(report.severity, LossinessSeverity::Critical);
        assert!(comparison.missing_capabilities.contains(&"vision".to_string()));
        assert!(comparison
            .missing_capabilities
            .contains(&"input_image".to_string()));
        assert!(report
            .lossiness_types
            .contains(&LossinessType::TokenLimitReduced));
        let context = comparison
            .constrained_capabilities
            .iter()
            .find(|diff| diff.capability == "context_window")
            .expect("context window narrowed");
        assert_eq!(context.impact, LossinessImpact::Major);
        assert_eq!(context.source_value, 128_000);
        assert_eq!(context.target_value, 16_385);
    }

    #[test]
    fn openai_to_anthropic_loses_function_calling_and_narrows_temperature() {
        let source = capability(&ProviderManifest::openai(), "gpt-4-turbo");
        let target = capability(&ProviderManifest::anthropic(), "claude-3-opus");
        let comparison = source.compare(&target);
        let report = &comparison.lossiness_report;

        assert_eq!(report.severity, LossinessSeverity::High);
        assert!(comparison
            .missing_capabilities
            .contains(&"function_calling".to_string()));
        assert!(comparison
            .constrained_capabilities
            .iter()
            .any(|diff| diff.capability == "temperature"));
        assert!(report
            .lossiness_types
            .contains(&LossinessType::ConstrainedParameter("frequency_penalty".to_string())));
        assert!(comparison.additional_capabilities.contains(&"tool_use".to_string()));
    }

    #[test]
    fn tool_use_maps_onto_function_calling() {
        let source = capability(&ProviderManifest::anthropic(), "claude-3-opus");
        let target = capability(&ProviderManifest::openai(), "gpt-4-turbo");
        let comparison = source.compare(&target);
        assert!(!comparison
            .missing_capabilities
            .contains(&"tool_use".to_string()));
        // top_k has no OpenAI counterpart; the context window shrinks.
        assert_eq!(
            comparison.lossiness_report.lossiness_types,
            vec![
                LossinessType::ConstrainedParameter("top_k".to_string()),
                LossinessType::TokenLimitReduced,
            ]
        );
        assert_eq!(comparison.lossiness_report.severity, LossinessSeverity::High);
    }

    #[test]
    fn render_comparison_rejects_undecodable_input() {
        let gpt4 = capability(&ProviderManifest::openai(), "gpt-4-turbo");
        let json = serde_json::to_string(&gpt4).expect("serialize");

        let rendered = render_comparison(&json, &json).expect("valid capabilities");
        let value: serde_json::Value = serde_json::from_str(&rendered).expect("json");
        assert_eq!(value["lossiness_report"]["is_lossy"], false);
        assert_eq!(value["lossiness_report"]["severity"], "none");

        let err = render_comparison("{\"version\":1}", &json).expect_err("not a capability");
        assert!(matches!(err, ManifestError::Decode(_)));
        let err = render_comparison(&json, "not json").expect_err("not json");
        assert!(matches!(err, ManifestError::Decode(_)));
    }
}
