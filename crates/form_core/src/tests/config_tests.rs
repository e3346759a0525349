use super::*;

use std::{
    collections::HashMap,
    env,
    time::{SystemTime, UNIX_EPOCH},
};

fn no_env(_: &str) -> Option<String> {
    None
}

fn temp_settings_file(contents: &str) -> std::path::PathBuf {
    let suffix = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock")
        .as_nanos();
    let path = env::temp_dir().join(format!("form_core_settings_{suffix}.toml"));
    fs::write(&path, contents).expect("write settings");
    path
}

#[test]
fn defaults_apply_without_file_or_env() {
    let settings = load_settings_with(Path::new("/nonexistent/form.toml"), no_env);
    assert_eq!(settings, Settings::default());
}

#[test]
fn joins_endpoints_under_server_path() {
    let settings = Settings {
        server_url: "http://localhost:8080/webapp".into(),
        ..Settings::default()
    };
    assert_eq!(
        settings.trigger_endpoint().expect("trigger").url().as_str(),
        "http://localhost:8080/webapp/api/v1/application/action"
    );
    assert_eq!(
        settings.detail_endpoint().expect("detail").as_str(),
        "http://localhost:8080/webapp/api/v1/application/detail"
    );
}

#[test]
fn invalid_server_url_is_reported_for_triggers() {
    let settings = Settings {
        server_url: "::not-a-url".into(),
        ..Settings::default()
    };
    assert!(matches!(
        settings.trigger_endpoint(),
        Err(TriggerError::InvalidEndpoint { .. })
    ));
}

#[test]
fn file_then_env_overrides() {
    let path = temp_settings_file(
        r#"
server_url = "http://file:1"
request_timeout_secs = 5
load_failure_policy = "reset_selection"
"#,
    );
    let vars = HashMap::from([
        ("FORM_SERVER_URL", "http://short:2"),
        ("APP__SERVER_URL", "http://long:3"),
        ("APP__REQUEST_TIMEOUT_SECS", "not-a-number"),
    ]);

    let settings = load_settings_with(&path, |key| vars.get(key).map(|v| v.to_string()));

    assert_eq!(settings.server_url, "http://long:3");
    assert_eq!(settings.request_timeout_secs, 5);
    assert_eq!(
        settings.load_failure_policy,
        LoadFailurePolicy::ResetSelection
    );
    fs::remove_file(path).expect("cleanup");
}

#[test]
fn unparsable_file_is_ignored() {
    let path = temp_settings_file("server_url = [");
    let settings = load_settings_with(&path, no_env);
    assert_eq!(settings, Settings::default());
    fs::remove_file(path).expect("cleanup");
}

#[test]
fn env_selects_failure_policy() {
    let settings = load_settings_with(Path::new("/nonexistent/form.toml"), |key| {
        (key == "APP__LOAD_FAILURE_POLICY").then(|| "Reset_Selection".to_string())
    });
    assert_eq!(
        settings.load_failure_policy,
        LoadFailurePolicy::ResetSelection
    );
}
