//! Tests for configuration file loading.

use super::*;
use serial_test::serial;
use std::env;
use std::fs;

#[test]
fn test_default_config_path_contains_vrender_config_toml() {
    if let Some(path) = default_config_path() {
        let path_str = path.to_string_lossy();
        assert!(
            path_str.contains("vrender") && path_str.ends_with("config.toml"),
            "Path should contain 'vrender' and end with 'config.toml', got: {}",
            path_str
        );
    }
}

#[test]
fn test_load_config_file_returns_ok_none_for_missing_file() {
    let result = load_config_file("/nonexistent/path/to/config.toml");
    assert_eq!(
        result,
        Ok(None),
        "Missing config file should return Ok(None), not an error"
    );
}

#[test]
fn test_load_config_file_parses_valid_toml() {
    let config_path = env::temp_dir().join("vrender_test_config.toml");

    let toml_content = r#"
log_file_path = "/tmp/vrender-test.log"

[renderer]
max_lines = 25
min_lines = 3
show_gutter = false
scroll_past_end = 0.5

[renderer.scroll_margin]
top = 6
bottom = 4
"#;

    fs::write(&config_path, toml_content).expect("Failed to write test config");

    let config = load_config_file(&config_path)
        .expect("Should successfully parse valid TOML")
        .expect("Should return Some(ConfigFile) for existing file");

    assert_eq!(
        config.log_file_path,
        Some(PathBuf::from("/tmp/vrender-test.log"))
    );
    let renderer = config.renderer.expect("renderer table present");
    assert_eq!(renderer.max_lines, Some(25));
    assert_eq!(renderer.min_lines, Some(3));
    assert!(!renderer.show_gutter);
    assert_eq!(renderer.scroll_past_end, 0.5);
    assert_eq!(renderer.scroll_margin.top, 6.0);
    assert_eq!(renderer.scroll_margin.bottom, 4.0);
    // Unspecified fields keep their defaults
    assert_eq!(renderer.padding, 4.0);

    fs::remove_file(config_path).ok();
}

#[test]
fn test_load_config_file_returns_error_for_invalid_toml() {
    let config_path = env::temp_dir().join("vrender_test_invalid.toml");

    fs::write(&config_path, "this is not valid TOML ][}{").expect("Failed to write test config");

    match load_config_file(&config_path) {
        Err(ConfigError::ParseError { path, reason: _ }) => {
            assert_eq!(path, config_path);
        }
        other => panic!("Expected ParseError, got {:?}", other),
    }

    fs::remove_file(config_path).ok();
}

#[test]
fn test_load_config_file_rejects_unknown_top_level_keys() {
    let config_path = env::temp_dir().join("vrender_test_unknown_key.toml");

    fs::write(&config_path, "theme = \"monokai\"\n").expect("Failed to write test config");

    let result = load_config_file(&config_path);
    assert!(
        matches!(result, Err(ConfigError::ParseError { .. })),
        "Unknown keys should be rejected, got {:?}",
        result
    );

    fs::remove_file(config_path).ok();
}

#[test]
fn test_merge_config_without_file_uses_defaults() {
    let resolved = merge_config(None);
    assert_eq!(resolved, ResolvedConfig::default());
}

#[test]
fn test_merge_config_takes_renderer_table_from_file() {
    let file = ConfigFile {
        log_file_path: None,
        renderer: Some(RendererConfig {
            max_lines: Some(12),
            ..RendererConfig::default()
        }),
    };

    let resolved = merge_config(Some(file));
    assert_eq!(resolved.renderer.max_lines, Some(12));
    assert_eq!(resolved.log_file_path, default_log_path());
}

#[test]
fn test_config_file_log_path_overrides_default() {
    let custom_path = PathBuf::from("/custom/path/to/render.log");
    let file = ConfigFile {
        log_file_path: Some(custom_path.clone()),
        renderer: None,
    };

    let resolved = merge_config(Some(file));
    assert_eq!(resolved.log_file_path, custom_path);
    assert_eq!(resolved.renderer, RendererConfig::default());
}

#[test]
fn test_cli_options_apply_in_order() {
    let resolved = apply_cli_overrides(
        ResolvedConfig::default(),
        None,
        &[
            RendererOption::MaxLines(Some(10)),
            RendererOption::ShowGutter(false),
            RendererOption::MaxLines(Some(40)),
        ],
    );
    assert_eq!(resolved.renderer.max_lines, Some(40));
    assert!(!resolved.renderer.show_gutter);
}

#[test]
fn test_cli_log_file_overrides_everything() {
    let resolved = apply_cli_overrides(
        ResolvedConfig::default(),
        Some(PathBuf::from("/tmp/cli.log")),
        &[],
    );
    assert_eq!(resolved.log_file_path, PathBuf::from("/tmp/cli.log"));
}

#[test]
#[serial(env)]
fn test_env_var_overrides_log_file_path() {
    env::set_var(LOG_FILE_ENV_VAR, "/tmp/from-env.log");
    let resolved = apply_env_overrides(ResolvedConfig::default());
    env::remove_var(LOG_FILE_ENV_VAR);

    assert_eq!(resolved.log_file_path, PathBuf::from("/tmp/from-env.log"));
}

#[test]
#[serial(env)]
fn test_explicit_path_beats_env_var() {
    let explicit = env::temp_dir().join("vrender_test_explicit.toml");
    let from_env = env::temp_dir().join("vrender_test_from_env.toml");
    fs::write(&explicit, "[renderer]\nmax_lines = 7\n").expect("write explicit");
    fs::write(&from_env, "[renderer]\nmax_lines = 99\n").expect("write env");

    env::set_var(CONFIG_ENV_VAR, &from_env);
    let loaded = load_config_with_precedence(Some(explicit.clone()));
    let loaded_from_env = load_config_with_precedence(None);
    env::remove_var(CONFIG_ENV_VAR);

    let explicit_lines = loaded
        .expect("explicit config loads")
        .and_then(|c| c.renderer)
        .and_then(|r| r.max_lines);
    let env_lines = loaded_from_env
        .expect("env config loads")
        .and_then(|c| c.renderer)
        .and_then(|r| r.max_lines);
    assert_eq!(explicit_lines, Some(7));
    assert_eq!(env_lines, Some(99));

    fs::remove_file(explicit).ok();
    fs::remove_file(from_env).ok();
}

#[test]
fn test_default_log_path_ends_with_vrender_log() {
    let path = default_log_path();
    assert!(
        path.to_string_lossy().ends_with("vrender.log"),
        "Default log path should end with 'vrender.log', got: {:?}",
        path
    );
}
