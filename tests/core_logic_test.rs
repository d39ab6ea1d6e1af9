use pg_dump_fixer::builders::profiles::Profile;
use pg_dump_fixer::core::config::ConfigOptions;
use pg_dump_fixer::utils::fix_dump_file;
use std::fs;
use std::path::PathBuf;
use std::process::Command;
use tempfile::TempDir;

const DUMP: &str = "--\n\
-- PostgreSQL database dump\n\
--\n\
\n\
SET statement_timeout = 0;\n\
SET lock_timeout = 0;\n\
SET idle_in_transaction_session_timeout = 0;\n\
SET transaction_timeout = 0;\n\
SET client_encoding = 'UTF8';\n\
SET default_tablespace = '';\n\
SET default_table_access_method = heap;\n\
\n\
-- SET transaction_timeout = 0;\n\
ALTER SCHEMA public OWNER TO postgres;\n\
COMMENT ON SCHEMA public IS 'standard public schema';\n\
REVOKE USAGE ON SCHEMA public FROM PUBLIC;\n\
GRANT ALL ON SCHEMA public TO PUBLIC;\n\
CREATE TABLE public.users (\n\
    id integer NOT NULL,\n\
    email text\n\
);\n\
ALTER TABLE public.users OWNER TO postgres;\n\
COPY public.users (id, email) FROM stdin;\n\
1\towner@example.com\n\
\\.\n";

fn setup_dump(content: &str) -> (TempDir, PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("stayhaven.sql");
    fs::write(&path, content).unwrap();
    (dir, path)
}

fn options(profile: Profile) -> ConfigOptions {
    ConfigOptions {
        profile,
        ..ConfigOptions::default()
    }
}

fn commented(content: &str) -> Vec<&str> {
    content
        .lines()
        .filter(|line| line.starts_with("-- ") && !line.starts_with("-- PostgreSQL"))
        .collect()
}

#[test]
fn test_complete_profile_workflow() {
    let (dir, path) = setup_dump(DUMP);

    let report = fix_dump_file(&path, options(Profile::Complete), false, true).unwrap();

    // Three version settings, plus owner, comment, revoke, grant and the table owner.
    assert_eq!(report.changed_count(), 8);
    assert_eq!(report.total_lines, DUMP.lines().count());

    let fixed = fs::read_to_string(&path).unwrap();
    assert_eq!(fixed.lines().count(), DUMP.lines().count());
    assert!(fixed.contains("= 0;\n-- SET transaction_timeout = 0;\nSET client_encoding"));
    assert!(fixed.contains("-- SET default_table_access_method = heap;\n"));
    assert!(fixed.contains("-- ALTER TABLE public.users OWNER TO postgres;\n"));
    assert!(fixed.contains("\nSET client_encoding = 'UTF8';\n"));
    assert!(fixed.contains("1\towner@example.com\n\\.\n"));
    // The line that was already a comment is not commented again.
    assert!(!fixed.contains("-- -- "));

    let backup = dir.path().join("stayhaven.sql.complete_backup");
    assert_eq!(fs::read_to_string(backup).unwrap(), DUMP);

    // A second run finds nothing left to do.
    let again = fix_dump_file(&path, options(Profile::Complete), false, true).unwrap();
    assert_eq!(again.changed_count(), 0);
    assert_eq!(fs::read_to_string(&path).unwrap(), fixed);
}

#[test]
fn test_profiles_select_different_statements() {
    let (_dir, path) = setup_dump(DUMP);
    fix_dump_file(&path, options(Profile::Compatibility), false, true).unwrap();
    let after_compat = fs::read_to_string(&path).unwrap();
    assert_eq!(
        commented(&after_compat),
        vec!["-- SET transaction_timeout = 0;", "-- SET transaction_timeout = 0;"]
    );

    let (_dir, path) = setup_dump(DUMP);
    let report = fix_dump_file(&path, options(Profile::Permissions), false, true).unwrap();
    assert_eq!(report.changed_count(), 5);
    let after_perms = fs::read_to_string(&path).unwrap();
    assert!(after_perms.contains("\nSET transaction_timeout = 0;\n"));
    assert!(after_perms.contains("-- REVOKE USAGE ON SCHEMA public FROM PUBLIC;\n"));
}

#[test]
fn test_clean_dump_is_untouched() {
    let clean = "CREATE TABLE t (id int);\r\nINSERT INTO t VALUES (1);";
    let (_dir, path) = setup_dump(clean);

    let report = fix_dump_file(&path, options(Profile::Complete), false, true).unwrap();

    assert_eq!(report.changed_count(), 0);
    assert_eq!(fs::read_to_string(&path).unwrap(), clean);
}

#[test]
fn test_custom_rules_file() {
    let (dir, path) = setup_dump("CREATE EXTENSION IF NOT EXISTS pgcrypto;\nSET transaction_timeout = 0;\n");
    let rules = dir.path().join("extra.yaml");
    fs::write(
        &rules,
        "include_profile: false\nrules:\n  - id: extensions\n    kind: regex\n    pattern: CREATE EXTENSION.*\n",
    )
    .unwrap();

    let report = fix_dump_file(
        &path,
        ConfigOptions {
            rules_file: Some(rules),
            backup_suffix: Some("orig".to_string()),
            ..ConfigOptions::default()
        },
        false,
        true,
    )
    .unwrap();

    assert_eq!(report.changed_count(), 1);
    assert_eq!(report.changes[0].rule_id, "extensions");
    assert_eq!(
        fs::read_to_string(&path).unwrap(),
        "-- CREATE EXTENSION IF NOT EXISTS pgcrypto;\nSET transaction_timeout = 0;\n"
    );
    assert!(dir.path().join("stayhaven.sql.orig").exists());
}

#[test]
fn test_cli_exit_codes() {
    let bin = env!("CARGO_BIN_EXE_pg-dump-fixer");
    let (dir, path) = setup_dump("SET transaction_timeout = 0;\n");

    let ok = Command::new(bin).arg(&path).output().unwrap();
    assert!(ok.status.success());
    let stdout = String::from_utf8_lossy(&ok.stdout);
    assert!(stdout.contains("Backup created:"));
    assert!(stdout.contains("Line 1: Commented out: SET transaction_timeout = 0;"));
    assert!(stdout.contains("Successfully fixed 1 compatibility issue(s)."));

    let no_match = Command::new(bin).arg(&path).output().unwrap();
    assert!(no_match.status.success());
    assert!(String::from_utf8_lossy(&no_match.stdout).contains("No compatibility issues found."));

    let missing = Command::new(bin)
        .arg(dir.path().join("nope.sql"))
        .output()
        .unwrap();
    assert_eq!(missing.status.code(), Some(1));

    let no_args = Command::new(bin).output().unwrap();
    assert_eq!(no_args.status.code(), Some(1));

    let extra = Command::new(bin).arg(&path).arg("second.sql").output().unwrap();
    assert_eq!(extra.status.code(), Some(1));
}

#[test]
fn test_cli_memory_backup_strategy_leaves_no_sidecar() {
    let bin = env!("CARGO_BIN_EXE_pg-dump-fixer");
    let (dir, path) = setup_dump(DUMP);

    let out = Command::new(bin)
        .arg(&path)
        .args(["--backup-strategy", "memory"])
        .output()
        .unwrap();
    assert!(out.status.success());
    assert!(!String::from_utf8_lossy(&out.stdout).contains("Backup created:"));
    assert!(fs::read_to_string(&path).unwrap().contains("-- SET transaction_timeout = 0;"));
    assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
}

#[test]
fn test_cli_messages_follow_mode_and_profile() {
    let bin = env!("CARGO_BIN_EXE_pg-dump-fixer");
    let (_dir, path) = setup_dump("ALTER SCHEMA public OWNER TO postgres;\n");

    let dry = Command::new(bin).arg(&path).arg("--dry-run").output().unwrap();
    assert!(dry.status.success());
    let stdout = String::from_utf8_lossy(&dry.stdout);
    assert!(stdout.contains("Line 1: Would comment out: ALTER SCHEMA public OWNER TO postgres;"));
    assert!(!stdout.contains("Commented out"));

    let real = Command::new(bin)
        .arg(&path)
        .args(["--profile", "permissions"])
        .output()
        .unwrap();
    assert!(real.status.success());
    assert!(String::from_utf8_lossy(&real.stdout)
        .contains("Successfully commented out 1 permission-related statement(s)."));
}

#[test]
fn test_cli_backup_failure_is_reported_once() {
    let bin = env!("CARGO_BIN_EXE_pg-dump-fixer");
    let (dir, path) = setup_dump("SET transaction_timeout = 0;\n");
    fs::create_dir(dir.path().join("stayhaven.sql.complete_backup")).unwrap();

    let out = Command::new(bin).arg(&path).output().unwrap();
    assert_eq!(out.status.code(), Some(1));
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("Error: could not create backup:"));
    assert!(!stdout.contains("Error: Error"));
    assert!(!String::from_utf8_lossy(&out.stderr).contains('\u{1b}'));
}
