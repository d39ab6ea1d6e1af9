use anyhow::{Context, Result};
use regex::{Regex, RegexBuilder};
use serde::Deserialize;
use std::fmt;
use uuid::Uuid;

/// An enum that defines how a rule's `pattern` string is interpreted.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum RuleKind {
    /// The pattern is a plain substring. Regex metacharacters in it carry no
    /// special meaning.
    Literal,
    /// The pattern is a regular expression searched anywhere in the line.
    Regex,
}

impl fmt::Display for RuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuleKind::Literal => write!(f, "literal"),
            RuleKind::Regex => write!(f, "regex"),
        }
    }
}

impl RuleKind {
    /// Parses the kind names accepted on the command line and in plain rule lists.
    pub fn parse(kind: &str) -> Result<Self> {
        match kind.trim().to_ascii_lowercase().as_str() {
            "literal" => Ok(RuleKind::Literal),
            "regex" => Ok(RuleKind::Regex),
            other => anyhow::bail!("Invalid rule kind: {}", other),
        }
    }
}

/// A single match rule for problematic SQL statements.
///
/// Rules are immutable once the run starts. Matching is always
/// case-insensitive, for both kinds.
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct Rule {
    /// Identifier shown in verbose output. Built-in rules use a stable slug;
    /// imported rules that leave it out get a random UUID.
    #[serde(default = "generate_rule_id")]
    pub id: String,
    pub kind: RuleKind,
    pub pattern: String,
    #[serde(default)]
    pub description: Option<String>,
}

pub(crate) fn generate_rule_id() -> String {
    Uuid::new_v4().to_string()
}

impl Rule {
    /// Creates a literal substring rule.
    pub fn literal(id: &str, pattern: &str) -> Self {
        Self {
            id: id.to_string(),
            kind: RuleKind::Literal,
            pattern: pattern.to_string(),
            description: None,
        }
    }

    /// Creates a regular expression rule.
    pub fn regex(id: &str, pattern: &str) -> Self {
        Self {
            id: id.to_string(),
            kind: RuleKind::Regex,
            pattern: pattern.to_string(),
            description: None,
        }
    }

    /// Attaches a human description, used by the verbose listing.
    pub fn with_description(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }

    /// Builds the case-insensitive regex that implements this rule.
    ///
    /// Literal rules are escaped first, so `SET transaction_timeout` matches
    /// exactly that text in any letter case.
    pub fn compile(&self) -> Result<Regex> {
        let source = match self.kind {
            RuleKind::Literal => regex::escape(&self.pattern),
            RuleKind::Regex => self.pattern.clone(),
        };
        RegexBuilder::new(&source)
            .case_insensitive(true)
            .build()
            .with_context(|| format!("Invalid {} pattern for rule '{}'", self.kind, self.id))
    }
}

/// The `LineMatcher` trait is the single question the line filter asks of a rule.
pub trait LineMatcher {
    /// Returns `true` when `line` contains the problematic construct.
    fn matches_line(&self, line: &str) -> bool;
}

/// A `Rule` paired with its compiled regex.
#[derive(Debug, Clone)]
pub struct CompiledRule {
    rule: Rule,
    regex: Regex,
}

impl CompiledRule {
    pub fn new(rule: Rule) -> Result<Self> {
        let regex = rule.compile()?;
        Ok(Self { rule, regex })
    }

    pub fn rule(&self) -> &Rule {
        &self.rule
    }
}

impl LineMatcher for CompiledRule {
    fn matches_line(&self, line: &str) -> bool {
        self.regex.is_match(line)
    }
}

/// An ordered list of compiled rules.
///
/// Order matters: [`RuleSet::first_match`] checks rules in the order they were
/// given and stops at the first hit.
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    rules: Vec<CompiledRule>,
}

impl RuleSet {
    /// Compiles every rule, failing on the first invalid pattern.
    pub fn compile(rules: &[Rule]) -> Result<Self> {
        let rules = rules
            .iter()
            .cloned()
            .map(CompiledRule::new)
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { rules })
    }

    /// Returns the first rule matching `line`, if any.
    pub fn first_match(&self, line: &str) -> Option<&Rule> {
        self.rules
            .iter()
            .find(|compiled| compiled.matches_line(line))
            .map(CompiledRule::rule)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Rule> {
        self.rules.iter().map(CompiledRule::rule)
    }
}
