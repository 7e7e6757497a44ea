// Configuration: YAML file with compiled-in defaults, env overrides for host/port.
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::Path;
use tracing::warn;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub templates: TemplateConfig,
    #[serde(default)]
    pub defaults: FormDefaults,
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub max_upload_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            // Uploaded spreadsheets are small; 16 MiB matches the form contract.
            max_upload_bytes: 16 * 1024 * 1024,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemplateConfig {
    pub current_path: String,
    pub legacy_path: String,
}

impl Default for TemplateConfig {
    fn default() -> Self {
        Self {
            current_path: "New ARN Change form.docx".to_string(),
            legacy_path: "Request for Change of Broker.docx".to_string(),
        }
    }
}

impl TemplateConfig {
    /// The active template: the current form wins whenever it exists on disk.
    pub fn active_path(&self) -> &str {
        if Path::new(&self.current_path).exists() {
            &self.current_path
        } else {
            &self.legacy_path
        }
    }
}

/// Values used only when the spreadsheet does not provide them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormDefaults {
    pub new_broker_code: String,
    pub new_broker_name: String,
    pub advisor_code: String,
    pub advisor_name: String,
    pub place: String,
}

impl Default for FormDefaults {
    fn default() -> Self {
        Self {
            new_broker_code: "310082".to_string(),
            new_broker_name: "Shareway Securities Pvt Ltd".to_string(),
            advisor_code: "588234".to_string(),
            advisor_name: "Ajath Anjanappa".to_string(),
            place: "Bengaluru, Karnataka".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservabilityConfig {
    pub log_level: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

pub fn load_config() -> Config {
    let path = env::var("ARNFORM_CONFIG_PATH").unwrap_or_else(|_| "config/arnform.yaml".to_string());
    if !Path::new(&path).exists() {
        // The config file is optional; defaults cover local runs.
        return Config::default();
    }
    let content = match fs::read_to_string(&path) {
        Ok(text) => text,
        Err(err) => {
            warn!("failed to read config {path}: {err}");
            return Config::default();
        }
    };
    serde_yaml::from_str::<Config>(&content).unwrap_or_else(|err| {
        warn!("failed to parse config {path}: {err}");
        Config::default()
    })
}

pub fn bind_address(config: &Config) -> String {
    // Env overrides keep containerised deployments simple.
    let host = env::var("ARNFORM_HOST").unwrap_or_else(|_| config.server.host.clone());
    let port = env::var("ARNFORM_PORT")
        .ok()
        .and_then(|value| value.parse::<u16>().ok())
        .unwrap_or(config.server.port);
    format!("{host}:{port}")
}
