//! Configuration loading and precedence tests

use moonlet_config::loader::PROJECT_FILE_NAME;
use moonlet_config::{ConfigError, ConfigLoader, DEFAULT_SHORT_SRC_LEN};
use pretty_assertions::assert_eq;
use rstest::rstest;
use serial_test::serial;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn create_config_file(dir: &Path, content: &str) -> PathBuf {
    let config_path = dir.join(PROJECT_FILE_NAME);
    fs::write(&config_path, content).unwrap();
    config_path
}

fn create_global_file(dir: &Path, content: &str) -> PathBuf {
    let global_dir = dir.join("home").join(".moonlet");
    fs::create_dir_all(&global_dir).unwrap();
    let path = global_dir.join("config.toml");
    fs::write(&path, content).unwrap();
    path
}

/// Loader that never reads the real home directory
fn loader_in(dir: &Path) -> ConfigLoader {
    ConfigLoader::with_global_path(dir.join("missing-global.toml"))
}

/// Run `f` with `var` set, removing it afterwards
fn with_env<T>(var: &str, value: &str, f: impl FnOnce() -> T) -> T {
    env::set_var(var, value);
    let result = f();
    env::remove_var(var);
    result
}

// ============================================================================
// Project Config Tests
// ============================================================================

#[test]
#[serial]
fn test_load_project_settings() {
    let temp_dir = TempDir::new().unwrap();
    let content = r#"
[debug]
short_src_len = 40
private_prefix = "_"

[hooks]
enabled = false
"#;
    create_config_file(temp_dir.path(), content);

    let config = loader_in(temp_dir.path())
        .load_from_directory(temp_dir.path())
        .unwrap();

    assert!(config.is_project());
    assert_eq!(config.short_src_len(), 40);
    assert_eq!(config.private_prefix(), '_');
    assert!(!config.hooks_enabled());
}

#[test]
#[serial]
fn test_defaults_when_no_config_exists() {
    let temp_dir = TempDir::new().unwrap();

    let config = loader_in(temp_dir.path())
        .load_from_directory(temp_dir.path())
        .unwrap();

    assert!(!config.is_project());
    assert_eq!(config.project_root(), None);
    assert_eq!(config.short_src_len(), DEFAULT_SHORT_SRC_LEN);
    assert_eq!(config.private_prefix(), '*');
    assert!(config.hooks_enabled());
}

#[test]
#[serial]
fn test_nearest_project_file_wins() {
    let temp_dir = TempDir::new().unwrap();
    create_config_file(temp_dir.path(), "[debug]\nshort_src_len = 80\n");

    let inner = temp_dir.path().join("a").join("b");
    fs::create_dir_all(&inner).unwrap();
    create_config_file(&temp_dir.path().join("a"), "[debug]\nshort_src_len = 20\n");

    let config = loader_in(temp_dir.path())
        .load_from_directory(&inner)
        .unwrap();

    assert_eq!(config.short_src_len(), 20);
    assert_eq!(config.project_root(), Some(temp_dir.path().join("a").as_path()));
}

#[test]
#[serial]
fn test_load_from_explicit_file() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("custom.toml");
    fs::write(&path, "[hooks]\nenabled = false\n").unwrap();

    let config = loader_in(temp_dir.path()).load_from_file(&path).unwrap();

    assert!(!config.hooks_enabled());
    assert_eq!(config.project_root(), Some(temp_dir.path()));
}

#[test]
#[serial]
fn test_missing_explicit_file() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("absent.toml");

    let result = loader_in(temp_dir.path()).load_from_file(&path);

    assert!(matches!(result, Err(ConfigError::NotFound(p)) if p == path));
}

// ============================================================================
// Error Tests
// ============================================================================

#[rstest]
#[case::bad_syntax("[debug\nshort_src_len = 40\n")]
#[case::unknown_section("[colours]\nerror = \"red\"\n")]
#[case::wrong_type("[debug]\nshort_src_len = \"long\"\n")]
#[serial]
fn test_malformed_project_file(#[case] content: &str) {
    let temp_dir = TempDir::new().unwrap();
    create_config_file(temp_dir.path(), content);

    let result = loader_in(temp_dir.path()).load_from_directory(temp_dir.path());

    assert!(matches!(result, Err(ConfigError::TomlParseError { .. })));
}

#[rstest]
#[case::too_short("[debug]\nshort_src_len = 8\n", "debug.short_src_len")]
#[case::empty_prefix("[debug]\nprivate_prefix = \"\"\n", "debug.private_prefix")]
#[case::long_prefix("[debug]\nprivate_prefix = \"**\"\n", "debug.private_prefix")]
#[serial]
fn test_invalid_project_value(#[case] content: &str, #[case] expected_field: &str) {
    let temp_dir = TempDir::new().unwrap();
    create_config_file(temp_dir.path(), content);

    let result = loader_in(temp_dir.path()).load_from_directory(temp_dir.path());

    match result {
        Err(ConfigError::InvalidValue { field, .. }) => assert_eq!(field, expected_field),
        other => panic!("expected InvalidValue, got {:?}", other),
    }
}

#[test]
#[serial]
fn test_error_message_names_file() {
    let temp_dir = TempDir::new().unwrap();
    let path = create_config_file(temp_dir.path(), "not toml at all [");

    let err = loader_in(temp_dir.path())
        .load_from_directory(temp_dir.path())
        .unwrap_err();

    assert!(err.to_string().contains(&path.display().to_string()));
}

#[test]
#[serial]
fn test_malformed_global_file_is_rejected() {
    let temp_dir = TempDir::new().unwrap();
    let global = create_global_file(temp_dir.path(), "[debug\nshort_src_len = 40\n");
    let work = temp_dir.path().join("work");
    fs::create_dir(&work).unwrap();

    let result = ConfigLoader::with_global_path(&global).load_from_directory(&work);

    assert!(matches!(result, Err(ConfigError::TomlParseError { file, .. }) if file == global));
}

#[test]
#[serial]
fn test_invalid_global_value_is_rejected() {
    let temp_dir = TempDir::new().unwrap();
    let global = create_global_file(temp_dir.path(), "[debug]\nshort_src_len = 4\n");
    let project = temp_dir.path().join("project");
    fs::create_dir(&project).unwrap();
    create_config_file(&project, "[debug]\nshort_src_len = 30\n");

    let from_dir = ConfigLoader::with_global_path(&global).load_from_directory(&project);
    let from_file = ConfigLoader::with_global_path(&global)
        .load_from_file(&project.join(PROJECT_FILE_NAME));

    for result in [from_dir, from_file] {
        match result {
            Err(ConfigError::InvalidValue { field, .. }) => {
                assert_eq!(field, "debug.short_src_len")
            }
            other => panic!("expected InvalidValue, got {:?}", other),
        }
    }
}

// ============================================================================
// Precedence Tests
// ============================================================================

#[test]
#[serial]
fn test_project_overrides_global_field_by_field() {
    let temp_dir = TempDir::new().unwrap();
    let global = create_global_file(
        temp_dir.path(),
        "[debug]\nshort_src_len = 100\nprivate_prefix = \"#\"\n\n[hooks]\nenabled = false\n",
    );
    let project = temp_dir.path().join("project");
    fs::create_dir(&project).unwrap();
    create_config_file(&project, "[debug]\nshort_src_len = 30\n");

    let config = ConfigLoader::with_global_path(global)
        .load_from_directory(&project)
        .unwrap();

    assert_eq!(config.short_src_len(), 30);
    assert_eq!(config.private_prefix(), '#');
    assert!(!config.hooks_enabled());
}

#[test]
#[serial]
fn test_global_only() {
    let temp_dir = TempDir::new().unwrap();
    let global = create_global_file(temp_dir.path(), "[debug]\nshort_src_len = 72\n");
    let work = temp_dir.path().join("work");
    fs::create_dir(&work).unwrap();

    let config = ConfigLoader::with_global_path(global)
        .load_from_directory(&work)
        .unwrap();

    assert!(!config.is_project());
    assert_eq!(config.short_src_len(), 72);
}

#[test]
#[serial]
fn test_env_overrides_project() {
    let temp_dir = TempDir::new().unwrap();
    create_config_file(
        temp_dir.path(),
        "[debug]\nshort_src_len = 30\nprivate_prefix = \"_\"\n",
    );

    let config = with_env("MOONLET_SHORT_SRC_LEN", "90", || {
        with_env("MOONLET_PRIVATE_PREFIX", "$", || {
            loader_in(temp_dir.path()).load_from_directory(temp_dir.path())
        })
    })
    .unwrap();

    assert_eq!(config.short_src_len(), 90);
    assert_eq!(config.private_prefix(), '$');
}

#[rstest]
#[case("true", true)]
#[case("1", true)]
#[case("YES", true)]
#[case("on", true)]
#[case("false", false)]
#[case("0", false)]
#[case("nonsense", false)]
#[serial]
fn test_env_hooks_switch(#[case] value: &str, #[case] expected: bool) {
    let temp_dir = TempDir::new().unwrap();

    let config = with_env("MOONLET_HOOKS", value, || {
        loader_in(temp_dir.path()).load_from_directory(temp_dir.path())
    })
    .unwrap();

    assert_eq!(config.hooks_enabled(), expected);
}

#[rstest]
#[case::not_a_number("MOONLET_SHORT_SRC_LEN", "wide")]
#[case::below_minimum("MOONLET_SHORT_SRC_LEN", "3")]
#[case::long_prefix("MOONLET_PRIVATE_PREFIX", "ab")]
#[serial]
fn test_env_invalid_value(#[case] var: &str, #[case] value: &str) {
    let temp_dir = TempDir::new().unwrap();

    let result = with_env(var, value, || {
        loader_in(temp_dir.path()).load_from_directory(temp_dir.path())
    });

    assert!(matches!(result, Err(ConfigError::InvalidValue { .. })));
}
