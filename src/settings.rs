use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SalesError};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default = "default_catalog_url")]
    pub catalog_url: String,
    #[serde(default = "default_catalog_limit")]
    pub catalog_limit: u32,
    #[serde(default = "default_catalog_timeout_secs")]
    pub catalog_timeout_secs: u64,
    #[serde(default = "default_output_dir")]
    pub output_dir: String,
    #[serde(default = "default_top_n")]
    pub top_n: usize,
    #[serde(default = "default_low_quantity_threshold")]
    pub low_quantity_threshold: i64,
}

fn default_catalog_url() -> String {
    "https://dummyjson.com/products".to_string()
}

fn default_catalog_limit() -> u32 {
    100
}

fn default_catalog_timeout_secs() -> u64 {
    10
}

fn default_output_dir() -> String {
    "output".to_string()
}

fn default_top_n() -> usize {
    5
}

fn default_low_quantity_threshold() -> i64 {
    10
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            catalog_url: default_catalog_url(),
            catalog_limit: default_catalog_limit(),
            catalog_timeout_secs: default_catalog_timeout_secs(),
            output_dir: default_output_dir(),
            top_n: default_top_n(),
            low_quantity_threshold: default_low_quantity_threshold(),
        }
    }
}

impl Settings {
    pub fn enriched_path(&self) -> PathBuf {
        PathBuf::from(&self.output_dir).join("enriched_sales_data.txt")
    }

    pub fn report_path(&self) -> PathBuf {
        PathBuf::from(&self.output_dir).join("sales_report.txt")
    }
}

fn config_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config")
        .join("salesreport")
}

pub fn settings_path() -> PathBuf {
    config_dir().join("settings.json")
}

pub fn load_settings() -> Settings {
    let path = settings_path();
    if path.exists() {
        let content = std::fs::read_to_string(&path).unwrap_or_default();
        serde_json::from_str(&content).unwrap_or_default()
    } else {
        Settings::default()
    }
}

pub fn save_settings(settings: &Settings) -> Result<()> {
    let dir = config_dir();
    std::fs::create_dir_all(&dir)?;
    let json = serde_json::to_string_pretty(settings)
        .map_err(|e| SalesError::Settings(e.to_string()))?;
    std::fs::write(settings_path(), format!("{json}\n"))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        let settings = Settings {
            catalog_url: "http://localhost:8080/products".to_string(),
            catalog_limit: 30,
            output_dir: "/tmp/reports".to_string(),
            ..Settings::default()
        };
        let json = serde_json::to_string_pretty(&settings).unwrap();
        std::fs::write(&path, &json).unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        let loaded: Settings = serde_json::from_str(&content).unwrap();
        assert_eq!(loaded.catalog_url, "http://localhost:8080/products");
        assert_eq!(loaded.catalog_limit, 30);
        assert_eq!(loaded.output_dir, "/tmp/reports");
    }

    #[test]
    fn test_defaults() {
        let s = Settings::default();
        assert_eq!(s.catalog_limit, 100);
        assert_eq!(s.catalog_timeout_secs, 10);
        assert_eq!(s.top_n, 5);
        assert_eq!(s.low_quantity_threshold, 10);
        assert_eq!(s.report_path(), PathBuf::from("output").join("sales_report.txt"));
    }

    #[test]
    fn test_load_merges_with_defaults() {
        let json = r#"{"output_dir": "reports", "top_n": 3}"#;
        let s: Settings = serde_json::from_str(json).unwrap();
        assert_eq!(s.output_dir, "reports");
        assert_eq!(s.top_n, 3);
        assert_eq!(s.catalog_url, "https://dummyjson.com/products");
        assert_eq!(s.enriched_path(), PathBuf::from("reports").join("enriched_sales_data.txt"));
    }
}
