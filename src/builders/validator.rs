use std::collections::HashSet;

use crate::builders::importer::RULES_FILE_VERSION;
use crate::builders::rules::{self, RuleKind};
use crate::core::config::FixerConfig;

/// The `RulesValidator` trait defines the public interface for checking the
/// rule configuration before a dump is touched.
pub trait RulesValidator {
    /// Validates the whole configuration and returns every issue found.
    ///
    /// # Arguments
    /// * `config`: The resolved `FixerConfig`, built-in and imported rules included.
    ///
    /// # Returns
    /// A `Vec<String>` where each entry describes one issue. Empty means valid.
    fn validate_config(&self, config: &FixerConfig) -> Vec<String>;

    /// Validates a single rule.
    fn validate_rule(&self, rule: &rules::Rule) -> Vec<String>;
}

/// The `StandardValidator` performs the checks every run goes through.
pub struct StandardValidator;

impl StandardValidator {
    /// Creates a new instance of `StandardValidator`.
    pub fn new() -> Self {
        Self
    }

    /// Reports rule ids that appear more than once. Duplicate ids make the
    /// verbose output ambiguous about which rule fired.
    fn check_duplicate_ids(&self, rules: &[rules::Rule]) -> Vec<String> {
        let mut seen = HashSet::new();
        let mut warnings = Vec::new();

        for rule in rules {
            if !seen.insert(rule.id.as_str()) {
                warnings.push(format!("Duplicate rule id: {}", rule.id));
            }
        }
        warnings
    }
}

impl Default for StandardValidator {
    fn default() -> Self {
        Self::new()
    }
}

impl RulesValidator for StandardValidator {
    fn validate_config(&self, config: &FixerConfig) -> Vec<String> {
        let mut issues = Vec::new();

        if config.version != RULES_FILE_VERSION {
            issues.push(format!("Unsupported rules file version: {}", config.version));
        }

        if config.rules.is_empty() {
            issues.push("No rules configured; nothing would be commented out".to_string());
        }

        issues.extend(self.check_duplicate_ids(&config.rules));

        for rule in &config.rules {
            issues.extend(self.validate_rule(rule));
        }

        issues
    }

    fn validate_rule(&self, rule: &rules::Rule) -> Vec<String> {
        let mut issues = Vec::new();

        if rule.pattern.trim().is_empty() {
            // An empty pattern matches every line, commenting out the whole dump.
            issues.push(format!("Rule {} has an empty pattern", rule.id));
            return issues;
        }

        if let Err(e) = rule.compile() {
            issues.push(format!("Invalid rule {}: {:#}", rule.id, e));
        }

        if rule.kind == RuleKind::Regex && matches!(rule.pattern.trim(), ".*" | "^.*$" | ".+") {
            issues.push(format!("Rule {}: pattern '{}' will match all lines", rule.id, rule.pattern));
        }

        issues
    }
}
