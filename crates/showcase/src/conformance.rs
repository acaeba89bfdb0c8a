//! Interface to the external conformance collaborator.
//!
//! The engine hands over the markup snapshot of a [`PreviewHost`] and gets a
//! structured report back. The checks themselves (HTML validation and the
//! accessibility audit) run in the collaborator; this module only shapes
//! their input and summarizes their raw output into counts, scores and badges.

use std::collections::BTreeMap;
use std::future::Future;

use serde::{Deserialize, Serialize};

use crate::error::ConformanceError;
use crate::html::attr;
use crate::preview::{MarkupSnapshot, PreviewHost};

/// Markup handed to the collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConformanceInput {
    /// Component root markup or full page document.
    pub markup: String,
    /// Whether `markup` is a full document.
    pub is_full_document: bool,
}

impl From<MarkupSnapshot> for ConformanceInput {
    fn from(snapshot: MarkupSnapshot) -> Self {
        Self {
            markup: snapshot.markup,
            is_full_document: snapshot.is_full_document,
        }
    }
}

impl ConformanceInput {
    /// Document submitted to an HTML validator.
    ///
    /// Component markup is wrapped in a minimal valid document; full
    /// documents are sent unchanged.
    pub fn validator_document(&self, lang: &str) -> String {
        if self.is_full_document {
            return self.markup.clone();
        }
        format!(
            "<!DOCTYPE html>\n<html lang=\"{}\">\n<head>\n  <meta charset=\"UTF-8\">\n  <meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n  <title>Component Test</title>\n</head>\n<body>\n{}\n</body>\n</html>",
            attr(lang),
            self.markup
        )
    }
}

/// On/off switch of one audit rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleToggle {
    /// Whether the rule runs.
    pub enabled: bool,
}

/// Rule configuration passed to the accessibility audit.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AuditOptions {
    /// Rule id to toggle.
    pub rules: BTreeMap<String, RuleToggle>,
}

/// Rules about document structure; they make no sense for an isolated component.
const DOCUMENT_RULES: [&str; 4] = ["html-has-lang", "landmark-one-main", "region", "document-title"];

impl AuditOptions {
    /// Rules for auditing the given input.
    pub fn for_input(input: &ConformanceInput) -> Self {
        let mut rules = BTreeMap::new();
        rules.insert("frame-title".to_string(), RuleToggle { enabled: false });
        rules.insert("page-has-heading-one".to_string(), RuleToggle { enabled: false });
        for rule in DOCUMENT_RULES {
            rules.insert(
                rule.to_string(),
                RuleToggle {
                    enabled: input.is_full_document,
                },
            );
        }
        Self { rules }
    }

    /// Whether a rule runs. Rules not listed keep the audit's own default (on).
    pub fn is_enabled(&self, rule: &str) -> bool {
        self.rules.get(rule).is_none_or(|toggle| toggle.enabled)
    }
}

/// Outcome shown on a result badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BadgeStatus {
    /// No findings.
    Success,
    /// Minor findings.
    Warning,
    /// Errors, or the check itself failed.
    Error,
}

impl BadgeStatus {
    /// Badge modifier class.
    pub fn class(self) -> &'static str {
        match self {
            BadgeStatus::Success => "quality-badge quality-badge--success",
            BadgeStatus::Warning => "quality-badge quality-badge--warning",
            BadgeStatus::Error => "quality-badge quality-badge--error",
        }
    }
}

/// One message from the HTML validator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidatorMessage {
    /// `error`, `info` or `warning`.
    #[serde(rename = "type")]
    pub kind: String,
    /// Refinement of `kind` (`warning` for info messages that are warnings).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub_type: Option<String>,
    /// Human-readable message.
    #[serde(default)]
    pub message: String,
    /// Line the message points at.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_line: Option<u32>,
}

#[derive(Deserialize)]
struct ValidatorResponse {
    #[serde(default)]
    messages: Vec<ValidatorMessage>,
}

/// Counts derived from the validator's messages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidatorSummary {
    /// Messages of type `error`.
    pub errors: usize,
    /// Messages of type `info` or `warning`.
    pub warnings: usize,
    /// Every message, in validator order.
    pub messages: Vec<ValidatorMessage>,
}

impl ValidatorSummary {
    /// Summarize the validator's JSON output (`{"messages": [...]}`).
    pub fn from_messages_json(json: &str) -> Result<Self, ConformanceError> {
        let response: ValidatorResponse = serde_json::from_str(json)
            .map_err(|err| ConformanceError::Collaborator(format!("invalid validator output: {err}")))?;
        Ok(Self::from_messages(response.messages))
    }

    /// Summarize already decoded messages.
    pub fn from_messages(messages: Vec<ValidatorMessage>) -> Self {
        let errors = messages.iter().filter(|m| m.kind == "error").count();
        let warnings = messages
            .iter()
            .filter(|m| m.kind == "info" || m.kind == "warning")
            .count();
        Self {
            errors,
            warnings,
            messages,
        }
    }

    /// Badge outcome.
    pub fn status(&self) -> BadgeStatus {
        match (self.errors, self.warnings) {
            (0, 0) => BadgeStatus::Success,
            (0, _) => BadgeStatus::Warning,
            _ => BadgeStatus::Error,
        }
    }

    /// Badge text.
    pub fn label(&self) -> String {
        match self.status() {
            BadgeStatus::Success => "100%".to_string(),
            BadgeStatus::Warning => format!("{} warning(s)", self.warnings),
            BadgeStatus::Error => format!("{} error(s)", self.errors),
        }
    }
}

/// One failed accessibility rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Violation {
    /// Rule id.
    pub id: String,
    /// `minor`, `moderate`, `serious` or `critical`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub impact: Option<String>,
    /// Short rule summary.
    #[serde(default)]
    pub help: String,
    /// Offending nodes, as reported.
    #[serde(default)]
    pub nodes: Vec<serde_json::Value>,
}

impl Violation {
    /// Severity shown next to the violation.
    pub fn severity(&self) -> BadgeStatus {
        match self.impact.as_deref() {
            Some("critical" | "serious") => BadgeStatus::Error,
            _ => BadgeStatus::Warning,
        }
    }
}

#[derive(Deserialize)]
struct AuditResults {
    #[serde(default)]
    violations: Vec<Violation>,
    #[serde(default)]
    passes: Vec<serde::de::IgnoredAny>,
}

/// Counts and score derived from an accessibility audit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessibilitySummary {
    /// Failed rules.
    pub violations: Vec<Violation>,
    /// Number of passed rules.
    pub passes: usize,
    /// Offending nodes across all violations.
    pub alerts: usize,
    /// Share of passed rules, 0 to 100.
    pub score: u8,
}

/// Violation count up to which the badge is a warning.
const WARNING_VIOLATIONS: usize = 3;

impl AccessibilitySummary {
    /// Summarize the audit's JSON results (`{"violations": [...], "passes": [...]}`).
    pub fn from_results_json(json: &str) -> Result<Self, ConformanceError> {
        let results: AuditResults = serde_json::from_str(json)
            .map_err(|err| ConformanceError::Collaborator(format!("invalid audit output: {err}")))?;
        Ok(Self::new(results.violations, results.passes.len()))
    }

    /// Summarize decoded violations and a pass count.
    pub fn new(violations: Vec<Violation>, passes: usize) -> Self {
        let total = violations.len() + passes;
        let score = if total == 0 {
            100
        } else {
            (passes as f64 / total as f64 * 100.0).round() as u8
        };
        let alerts = violations.iter().map(|v| v.nodes.len()).sum();
        Self {
            violations,
            passes,
            alerts,
            score,
        }
    }

    /// Badge outcome.
    pub fn status(&self) -> BadgeStatus {
        match self.violations.len() {
            0 => BadgeStatus::Success,
            n if n <= WARNING_VIOLATIONS => BadgeStatus::Warning,
            _ => BadgeStatus::Error,
        }
    }

    /// Badge text.
    pub fn label(&self) -> String {
        match self.status() {
            BadgeStatus::Success => format!("{}%", self.score),
            _ => format!("{}% ({} alert(s))", self.score, self.alerts),
        }
    }
}

/// Report returned by the collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConformanceReport {
    /// HTML validation outcome.
    pub validator: ValidatorSummary,
    /// Accessibility audit outcome.
    pub accessibility: AccessibilitySummary,
}

/// The external conformance checker.
pub trait ConformanceRunner {
    /// Check one markup snapshot.
    fn run(
        &self,
        input: &ConformanceInput,
    ) -> impl Future<Output = Result<ConformanceReport, ConformanceError>>;
}

/// Check whatever the host currently renders.
///
/// The runner is only called once the host has a loaded, non-empty snapshot.
pub async fn run_conformance<R: ConformanceRunner>(
    host: &PreviewHost,
    runner: &R,
) -> Result<ConformanceReport, ConformanceError> {
    let input = ConformanceInput::from(host.rendered_markup()?);
    log::debug!(
        "Running conformance checks on {} bytes (full document: {})",
        input.markup.len(),
        input.is_full_document
    );
    runner.run(&input).await
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;
    use crate::error::PreviewError;
    use crate::options::ShowcaseOptions;

    struct Recorder {
        inputs: RefCell<Vec<ConformanceInput>>,
    }

    impl ConformanceRunner for Recorder {
        async fn run(&self, input: &ConformanceInput) -> Result<ConformanceReport, ConformanceError> {
            self.inputs.borrow_mut().push(input.clone());
            Ok(ConformanceReport {
                validator: ValidatorSummary::from_messages(Vec::new()),
                accessibility: AccessibilitySummary::new(Vec::new(), 12),
            })
        }
    }

    fn recorder() -> Recorder {
        Recorder {
            inputs: RefCell::new(Vec::new()),
        }
    }

    #[test]
    fn runner_gets_the_component_root() {
        let mut host = PreviewHost::for_component(
            "Button",
            "<button class=\"btn\">Go</button>",
            &ShowcaseOptions::default(),
        );
        host.mark_srcdoc_loaded();
        let runner = recorder();
        let report = pollster::block_on(run_conformance(&host, &runner)).unwrap();
        assert_eq!(report.accessibility.score, 100);
        assert_eq!(
            runner.inputs.borrow().as_slice(),
            [ConformanceInput {
                markup: "<button class=\"btn\">Go</button>".to_string(),
                is_full_document: false,
            }]
        );
    }

    #[test]
    fn runner_is_not_called_before_load() {
        let host = PreviewHost::for_component("Button", "<b>x</b>", &ShowcaseOptions::default());
        let runner = recorder();
        let err = pollster::block_on(run_conformance(&host, &runner)).unwrap_err();
        assert_eq!(err, ConformanceError::Preview(PreviewError::NotLoaded));
        assert!(runner.inputs.borrow().is_empty());
    }

    #[test]
    fn component_markup_is_wrapped_for_validation() {
        let input = ConformanceInput {
            markup: "<p>Hi</p>".to_string(),
            is_full_document: false,
        };
        let document = input.validator_document("en");
        assert!(document.starts_with("<!DOCTYPE html>\n<html lang=\"en\">"));
        assert!(document.contains("<title>Component Test</title>"));
        assert!(document.contains("<body>\n<p>Hi</p>\n</body>"));

        let page = ConformanceInput {
            markup: "<!DOCTYPE html><html></html>".to_string(),
            is_full_document: true,
        };
        assert_eq!(page.validator_document("en"), page.markup);
    }

    #[test]
    fn document_rules_are_off_for_components() {
        let component = AuditOptions::for_input(&ConformanceInput {
            markup: String::new(),
            is_full_document: false,
        });
        assert!(!component.is_enabled("region"));
        assert!(!component.is_enabled("frame-title"));
        assert!(component.is_enabled("color-contrast"));

        let page = AuditOptions::for_input(&ConformanceInput {
            markup: String::new(),
            is_full_document: true,
        });
        assert!(page.is_enabled("region"));
        assert!(!page.is_enabled("page-has-heading-one"));
        assert_eq!(
            serde_json::to_value(&page).unwrap()["rules"]["document-title"],
            serde_json::json!({"enabled": true})
        );
    }

    #[test]
    fn validator_counts() {
        let summary = ValidatorSummary::from_messages_json(
            r#"{"messages": [
                {"type": "error", "message": "Stray end tag"},
                {"type": "info", "subType": "warning", "message": "Consider lang"},
                {"type": "warning", "message": "Trailing slash"},
                {"type": "non-document-error", "message": "IO"}
            ]}"#,
        )
        .unwrap();
        assert_eq!((summary.errors, summary.warnings), (1, 2));
        assert_eq!(summary.status(), BadgeStatus::Error);
        assert_eq!(summary.label(), "1 error(s)");

        let clean = ValidatorSummary::from_messages_json("{}").unwrap();
        assert_eq!(clean.label(), "100%");
        assert!(ValidatorSummary::from_messages_json("<html>").is_err());
    }

    #[test]
    fn accessibility_score_and_badge() {
        let summary = AccessibilitySummary::from_results_json(
            r#"{
                "violations": [
                    {"id": "label", "impact": "critical", "nodes": [{}, {}]},
                    {"id": "color-contrast", "impact": "moderate", "nodes": [{}]}
                ],
                "passes": [{"id": "a"}, {"id": "b"}, {"id": "c"}, {"id": "d"}]
            }"#,
        )
        .unwrap();
        assert_eq!(summary.score, 67);
        assert_eq!(summary.alerts, 3);
        assert_eq!(summary.status(), BadgeStatus::Warning);
        assert_eq!(summary.label(), "67% (3 alert(s))");
        assert_eq!(summary.violations[0].severity(), BadgeStatus::Error);
        assert_eq!(summary.violations[1].severity(), BadgeStatus::Warning);

        let empty = AccessibilitySummary::from_results_json("{}").unwrap();
        assert_eq!((empty.score, empty.status()), (100, BadgeStatus::Success));

        let many = AccessibilitySummary::new(
            (0..4)
                .map(|i| Violation {
                    id: format!("rule-{i}"),
                    impact: None,
                    help: String::new(),
                    nodes: Vec::new(),
                })
                .collect(),
            0,
        );
        assert_eq!((many.score, many.status()), (0, BadgeStatus::Error));
    }
}
