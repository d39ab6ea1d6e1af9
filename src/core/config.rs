use anyhow::Result;
use std::path::PathBuf;
use tracing::{debug, warn};

use crate::builders::importer::{FileImporter, RULES_FILE_VERSION, RuleImporter};
use crate::builders::profiles::Profile;
use crate::builders::rules::Rule;
use crate::builders::storage::BackupStrategy;
use crate::builders::validator::{RulesValidator, StandardValidator};

/// Everything a single run needs, resolved from the command line and the
/// optional rules file.
#[derive(Debug, Clone)]
pub struct FixerConfig {
    pub version: String,
    pub profile: Profile,
    /// Suffix of the sidecar backup, `<input>.<suffix>`.
    pub backup_suffix: String,
    pub backup_strategy: BackupStrategy,
    /// Rules in match order. The first one to match a line wins.
    pub rules: Vec<Rule>,
    pub dry_run: bool,
}

impl Default for FixerConfig {
    fn default() -> Self {
        let profile = Profile::default();
        Self {
            version: RULES_FILE_VERSION.to_string(),
            profile,
            backup_suffix: profile.backup_suffix().to_string(),
            backup_strategy: BackupStrategy::default(),
            rules: profile.rules(),
            dry_run: false,
        }
    }
}

/// The knobs the command line exposes.
#[derive(Debug, Clone, Default)]
pub struct ConfigOptions {
    pub profile: Profile,
    pub rules_file: Option<PathBuf>,
    pub backup_suffix: Option<String>,
    pub backup_strategy: BackupStrategy,
    pub dry_run: bool,
}

/// Builds and validates a `FixerConfig`.
pub struct ConfigManager {
    options: ConfigOptions,
    importer: Box<dyn RuleImporter>,
    validator: Box<dyn RulesValidator>,
}

impl ConfigManager {
    pub fn new(options: ConfigOptions) -> Self {
        Self {
            options,
            importer: Box::new(FileImporter::new()),
            validator: Box::new(StandardValidator::new()),
        }
    }

    /// Resolves the effective configuration.
    ///
    /// The profile's rules come first, followed by any imported rules, unless
    /// the rules file sets `include_profile = false`.
    pub fn load_config(&self) -> Result<FixerConfig> {
        let profile = self.options.profile;
        let mut config = FixerConfig {
            profile,
            backup_suffix: profile.backup_suffix().to_string(),
            backup_strategy: self.options.backup_strategy,
            rules: profile.rules(),
            dry_run: self.options.dry_run,
            ..FixerConfig::default()
        };

        if let Some(path) = &self.options.rules_file {
            let imported = self.importer.import_from_file(path)?;
            if !imported.include_profile {
                debug!(%profile, "rules file replaces the profile rules");
                config.rules.clear();
            }
            config.version = imported.version;
            config.rules.extend(imported.rules);
        }

        if let Some(suffix) = &self.options.backup_suffix {
            let suffix = suffix.trim_start_matches('.');
            if suffix.is_empty() {
                anyhow::bail!("Backup suffix cannot be empty");
            }
            config.backup_suffix = suffix.to_string();
        }

        debug!(
            %profile,
            rules = config.rules.len(),
            backup_suffix = %config.backup_suffix,
            backup_strategy = %config.backup_strategy,
            dry_run = config.dry_run,
            "resolved configuration"
        );
        Ok(config)
    }

    /// Fails when the validator finds any issue, after printing them all.
    pub fn validate_config(&self, config: &FixerConfig) -> Result<()> {
        let issues = self.validator.validate_config(config);

        if issues.is_empty() {
            return Ok(());
        }

        println!("⚠️  Found issues in rule configuration:");
        for issue in &issues {
            warn!(%issue, "invalid rule configuration");
            println!("  - {issue}");
        }
        anyhow::bail!("Rule configuration validation failed ({} issue(s))", issues.len());
    }

    /// Loads and validates in one step.
    pub fn resolve(&self) -> Result<FixerConfig> {
        let config = self.load_config()?;
        self.validate_config(&config)?;
        Ok(config)
    }
}
