use std::{fs, path::Path, time::Duration};

use serde::Deserialize;
use url::Url;

use crate::{error::TriggerError, session::LoadFailurePolicy, trigger::TriggerEndpoint};

pub const SETTINGS_FILE: &str = "form.toml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub server_url: String,
    pub trigger_path: String,
    pub detail_path: String,
    pub request_timeout_secs: u64,
    pub load_failure_policy: LoadFailurePolicy,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server_url: "http://127.0.0.1:8080".into(),
            trigger_path: "api/v1/application/action".into(),
            detail_path: "api/v1/application/detail".into(),
            request_timeout_secs: 30,
            load_failure_policy: LoadFailurePolicy::StayLoading,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct FileSettings {
    server_url: Option<String>,
    trigger_path: Option<String>,
    detail_path: Option<String>,
    request_timeout_secs: Option<u64>,
    load_failure_policy: Option<LoadFailurePolicy>,
}

impl Settings {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn trigger_endpoint(&self) -> Result<TriggerEndpoint, TriggerError> {
        join_endpoint(&self.server_url, &self.trigger_path)
            .map(TriggerEndpoint::from)
            .map_err(|source| TriggerError::InvalidEndpoint {
                url: format!("{}/{}", self.server_url, self.trigger_path),
                source,
            })
    }

    pub fn detail_endpoint(&self) -> Result<Url, url::ParseError> {
        join_endpoint(&self.server_url, &self.detail_path)
    }

    pub fn http_client(&self) -> reqwest::Result<reqwest::Client> {
        reqwest::Client::builder()
            .timeout(self.request_timeout())
            .build()
    }
}

pub fn load_settings() -> Settings {
    load_settings_with(Path::new(SETTINGS_FILE), |key| std::env::var(key).ok())
}

/// Defaults, then the settings file when it parses, then environment
/// overrides. `APP__*` variables win over the short names.
pub fn load_settings_with(path: &Path, env: impl Fn(&str) -> Option<String>) -> Settings {
    let mut settings = Settings::default();

    if let Ok(raw) = fs::read_to_string(path) {
        match toml::from_str::<FileSettings>(&raw) {
            Ok(file_cfg) => {
                if let Some(v) = file_cfg.server_url {
                    settings.server_url = v;
                }
                if let Some(v) = file_cfg.trigger_path {
                    settings.trigger_path = v;
                }
                if let Some(v) = file_cfg.detail_path {
                    settings.detail_path = v;
                }
                if let Some(v) = file_cfg.request_timeout_secs {
                    settings.request_timeout_secs = v;
                }
                if let Some(v) = file_cfg.load_failure_policy {
                    settings.load_failure_policy = v;
                }
            }
            Err(err) => {
                tracing::warn!(path = %path.display(), %err, "ignoring unreadable settings file");
            }
        }
    }

    if let Some(v) = env("FORM_SERVER_URL") {
        settings.server_url = v;
    }
    if let Some(v) = env("APP__SERVER_URL") {
        settings.server_url = v;
    }
    if let Some(v) = env("APP__TRIGGER_PATH") {
        settings.trigger_path = v;
    }
    if let Some(v) = env("APP__DETAIL_PATH") {
        settings.detail_path = v;
    }
    if let Some(v) = env("APP__REQUEST_TIMEOUT_SECS") {
        if let Ok(parsed) = v.parse::<u64>() {
            settings.request_timeout_secs = parsed;
        }
    }
    if let Some(v) = env("APP__LOAD_FAILURE_POLICY") {
        match v.trim().to_ascii_lowercase().as_str() {
            "stay_loading" => settings.load_failure_policy = LoadFailurePolicy::StayLoading,
            "reset_selection" => settings.load_failure_policy = LoadFailurePolicy::ResetSelection,
            other => tracing::warn!(value = other, "unknown load failure policy"),
        }
    }

    settings
}

fn join_endpoint(server_url: &str, path: &str) -> Result<Url, url::ParseError> {
    let base = if server_url.ends_with('/') {
        Url::parse(server_url)?
    } else {
        Url::parse(&format!("{server_url}/"))?
    };
    base.join(path.trim_start_matches('/'))
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
