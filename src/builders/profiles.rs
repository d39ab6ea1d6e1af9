use clap::ValueEnum;
use std::fmt;

use crate::builders::rules::Rule;

/// A named, built-in rule list.
///
/// Each profile targets a different kind of restore failure and writes its
/// backup under its own suffix, so running two profiles against the same
/// dump never clobbers the other's backup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Profile {
    /// Settings that older PostgreSQL servers reject (`transaction_timeout` only).
    Compatibility,
    /// Version settings plus every permission rule.
    #[default]
    Complete,
    /// Statements that require superuser or schema ownership.
    Permissions,
}

impl fmt::Display for Profile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Profile::Compatibility => write!(f, "compatibility"),
            Profile::Complete => write!(f, "complete"),
            Profile::Permissions => write!(f, "permissions"),
        }
    }
}

impl Profile {
    /// The built-in rules of this profile, in match order.
    pub fn rules(&self) -> Vec<Rule> {
        match self {
            Profile::Compatibility => vec![transaction_timeout()],
            Profile::Complete => {
                let mut rules = vec![
                    transaction_timeout(),
                    Rule::literal("default-table-access-method", "SET default_table_access_method")
                        .with_description("Setting introduced in PostgreSQL 12"),
                    Rule::literal("default-tablespace", "SET default_tablespace")
                        .with_description("Tablespace may not exist on the target"),
                ];
                rules.extend(permission_rules("REVOKE USAGE ON SCHEMA public FROM PUBLIC"));
                rules
            }
            Profile::Permissions => {
                permission_rules("REVOKE USAGE ON SCHEMA public FROM PUBLIC;")
            }
        }
    }

    /// The suffix appended to the input path for the backup copy.
    pub fn backup_suffix(&self) -> &'static str {
        match self {
            Profile::Compatibility => "backup",
            Profile::Complete => "complete_backup",
            Profile::Permissions => "permissions_backup",
        }
    }

    /// How the summary line names a commented-out statement.
    pub fn issue_noun(&self) -> &'static str {
        match self {
            Profile::Compatibility | Profile::Complete => "compatibility issue(s)",
            Profile::Permissions => "permission-related statement(s)",
        }
    }

    /// The summary line after a run that changed `count` lines.
    pub fn success_message(&self, count: usize) -> String {
        let verb = match self {
            Profile::Compatibility | Profile::Complete => "fixed",
            Profile::Permissions => "commented out",
        };
        format!("Successfully {verb} {count} {}.", self.issue_noun())
    }

    /// What the summary prints when nothing matched.
    pub fn nothing_found(&self) -> &'static str {
        match self {
            Profile::Compatibility | Profile::Complete => "No compatibility issues found.",
            Profile::Permissions => "No permission issues found.",
        }
    }

    /// Notes printed after a successful run.
    pub fn closing_notes(&self) -> &'static [&'static str] {
        match self {
            Profile::Compatibility => &["You can now import it into PostgreSQL."],
            Profile::Complete => &[
                "You can now try importing it again.",
                "Note: Some version-specific and permission settings were commented out,",
                "but all your data and table structures will import correctly.",
            ],
            Profile::Permissions => &[
                "You can now try importing it again.",
                "Note: Some ownership settings were commented out, but the data will still import correctly.",
            ],
        }
    }
}

fn transaction_timeout() -> Rule {
    Rule::literal("transaction-timeout", "SET transaction_timeout")
        .with_description("Not supported before PostgreSQL 17")
}

// The permissions and complete lists differ only in the trailing `;` of the
// public-schema revoke.
fn permission_rules(revoke_public: &str) -> Vec<Rule> {
    vec![
        Rule::regex("alter-schema-owner", "ALTER SCHEMA.*OWNER TO.*"),
        Rule::regex("revoke-on-schema", "REVOKE.*ON SCHEMA.*FROM.*"),
        Rule::regex("grant-on-schema", "GRANT.*ON SCHEMA.*TO.*"),
        Rule::regex("owner-to-postgres", ".*OWNER TO postgres.*")
            .with_description("Ownership by the postgres superuser"),
        Rule::regex("comment-on-schema", "COMMENT ON SCHEMA.*"),
        Rule::literal("revoke-usage-public", revoke_public),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builders::rules::RuleSet;

    #[test]
    fn test_backup_suffixes() {
        assert_eq!(Profile::Compatibility.backup_suffix(), "backup");
        assert_eq!(Profile::Complete.backup_suffix(), "complete_backup");
        assert_eq!(Profile::Permissions.backup_suffix(), "permissions_backup");
    }

    #[test]
    fn test_success_message_wording() {
        assert_eq!(
            Profile::Complete.success_message(3),
            "Successfully fixed 3 compatibility issue(s)."
        );
        assert_eq!(
            Profile::Permissions.success_message(2),
            "Successfully commented out 2 permission-related statement(s)."
        );
    }

    #[test]
    fn test_compatibility_ignores_permission_statements() {
        let rules = RuleSet::compile(&Profile::Compatibility.rules()).unwrap();
        assert!(rules.first_match("SET transaction_timeout = 0;").is_some());
        assert!(rules
            .first_match("ALTER SCHEMA public OWNER TO postgres;")
            .is_none());
    }

    #[test]
    fn test_complete_covers_both_rule_families() {
        assert_eq!(Profile::Complete.rules().len(), 9);
        let rules = RuleSet::compile(&Profile::Complete.rules()).unwrap();
        assert!(rules.first_match("SET default_tablespace = '';").is_some());
        assert!(rules
            .first_match("ALTER SCHEMA public OWNER TO postgres;")
            .is_some());
        assert!(rules.first_match("SET client_encoding = 'UTF8';").is_none());
    }

    #[test]
    fn test_permissions_matches_ownership() {
        let rules = RuleSet::compile(&Profile::Permissions.rules()).unwrap();
        let hit = rules
            .first_match("ALTER TABLE public.users OWNER TO postgres;")
            .unwrap();
        assert_eq!(hit.id, "owner-to-postgres");
        assert!(rules.first_match("SET transaction_timeout = 0;").is_none());
    }
}
