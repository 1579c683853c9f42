// src/config.rs
use crate::error::{Result, RetargetError};
use crate::mapping::MatchingMode;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetargetConfig {
    pub matching_mode: MatchingMode,
    pub left_glove: String,
    pub right_glove: String,
    pub update_channel_capacity: usize,
    pub simulation_rate_hz: f64,
    pub log_level: String,
    pub output_directory: PathBuf,
}

impl Default for RetargetConfig {
    fn default() -> Self {
        Self {
            matching_mode: MatchingMode::ByName,
            left_glove: "LeftGlove".to_string(),
            right_glove: "RightGlove".to_string(),
            update_channel_capacity: 64,
            simulation_rate_hz: 90.0,
            log_level: "info".to_string(),
            output_directory: directories::UserDirs::new()
                .and_then(|dirs| dirs.document_dir().map(|p| p.join("HandRetarget")))
                .unwrap_or_else(|| PathBuf::from("./output")),
        }
    }
}

impl RetargetConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|source| RetargetError::Config {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_keeps_defaults() {
        let config: RetargetConfig =
            serde_json::from_str(r#"{ "matching_mode": "by_position", "left_glove": "L" }"#)
                .unwrap();
        assert_eq!(config.matching_mode, MatchingMode::ByPosition);
        assert_eq!(config.left_glove, "L");
        assert_eq!(config.right_glove, "RightGlove");
        assert_eq!(config.update_channel_capacity, 64);
    }

    #[test]
    fn test_load_reports_bad_json() {
        let path = std::env::temp_dir().join(format!("hand_retarget_{}.json", uuid::Uuid::new_v4()));
        std::fs::write(&path, "{ not json").unwrap();

        let err = RetargetConfig::load(&path).unwrap_err();
        assert!(matches!(err, RetargetError::Config { .. }));
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = RetargetConfig::load("/nonexistent/hand_retarget.json").unwrap_err();
        assert!(matches!(err, RetargetError::Io(_)));
        assert!(RetargetConfig::load_or_default(None).is_ok());
    }
}
