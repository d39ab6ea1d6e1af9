use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;
use tracing::debug;

use crate::builders::rules::{Rule, RuleKind, generate_rule_id};

/// The current version of the rules file format.
pub const RULES_FILE_VERSION: &str = "1.0";

/// The contents of a user-supplied rules file.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct RulesFile {
    #[serde(default = "default_version")]
    pub version: String,
    /// When `false`, these rules replace the profile's built-in rules
    /// instead of being appended to them.
    #[serde(default = "default_include_profile")]
    pub include_profile: bool,
    #[serde(default)]
    pub rules: Vec<Rule>,
}

fn default_version() -> String {
    RULES_FILE_VERSION.to_string()
}

fn default_include_profile() -> bool {
    true
}

impl Default for RulesFile {
    fn default() -> Self {
        Self {
            version: default_version(),
            include_profile: default_include_profile(),
            rules: Vec::new(),
        }
    }
}

/// A trait that defines the behavior for importing rules from a source.
pub trait RuleImporter {
    /// Reads and parses the rules stored at `file_path`.
    fn import_from_file(&self, file_path: &Path) -> Result<RulesFile>;
}

/// Imports rules from a file on disk, picking the format from the extension.
///
/// `.toml`, `.json`, `.yaml` and `.yml` files are parsed as structured
/// documents. Anything else is read as a plain list, one `kind:pattern` per
/// line.
pub struct FileImporter;

impl FileImporter {
    /// Constructs a new `FileImporter` instance.
    pub fn new() -> Self {
        Self
    }

    /// Parses a plain rule list.
    ///
    /// Blank lines and lines starting with `#` are skipped. A line of the form
    /// `regex:<pattern>` or `literal:<pattern>` names its kind; any other line
    /// is taken as a literal pattern in full, so `SET default_with_oids`
    /// works without a prefix.
    ///
    /// # Arguments
    /// * `content`: The full string content of the list.
    ///
    /// # Returns
    /// A `RulesFile` that extends the selected profile.
    pub fn parse_plain_list(&self, content: &str) -> Result<RulesFile> {
        let mut rules = Vec::new();

        for line in content.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let rule = match line.split_once(':') {
                Some((kind, pattern)) => match RuleKind::parse(kind) {
                    Ok(kind) => Rule {
                        id: generate_rule_id(),
                        kind,
                        pattern: pattern.trim().to_string(),
                        description: None,
                    },
                    // Not a kind prefix, just a colon inside the pattern.
                    Err(_) => Rule::literal(&generate_rule_id(), line),
                },
                None => Rule::literal(&generate_rule_id(), line),
            };
            rules.push(rule);
        }

        Ok(RulesFile {
            rules,
            ..RulesFile::default()
        })
    }
}

impl Default for FileImporter {
    fn default() -> Self {
        Self::new()
    }
}

impl RuleImporter for FileImporter {
    fn import_from_file(&self, file_path: &Path) -> Result<RulesFile> {
        let content = fs::read_to_string(file_path)
            .with_context(|| format!("Failed to read rules file {}", file_path.display()))?;

        let extension = file_path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);

        let rules_file = match extension.as_deref() {
            Some("toml") => toml::from_str(&content).context("Failed to parse TOML rules file")?,
            Some("json") => {
                serde_json::from_str(&content).context("Failed to parse JSON rules file")?
            }
            Some("yaml") | Some("yml") => {
                serde_yaml::from_str(&content).context("Failed to parse YAML rules file")?
            }
            _ => self.parse_plain_list(&content)?,
        };

        debug!(
            path = %file_path.display(),
            count = rules_file.rules.len(),
            "imported rules"
        );
        Ok(rules_file)
    }
}
