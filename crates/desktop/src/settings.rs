use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use facewatch_core::shared::constants::NOTIFY_COOLDOWN_SECS;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Push service API key; notifications are skipped while empty.
    pub api_key: String,
    pub cooldown_secs: u64,
    pub min_face_size: u32,
    pub score_thresh: f64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            cooldown_secs: NOTIFY_COOLDOWN_SECS,
            min_face_size: 40,
            score_thresh: 2.0,
        }
    }
}

impl Settings {
    fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("FaceWatch").join("settings.json"))
    }

    pub fn load() -> Self {
        Self::config_path()
            .and_then(|path| fs::read_to_string(path).ok())
            .and_then(|json| serde_json::from_str(&json).ok())
            .unwrap_or_default()
    }

    pub fn save(&self) {
        if let Some(path) = Self::config_path() {
            if let Some(parent) = path.parent() {
                let _ = fs::create_dir_all(parent);
            }
            if let Ok(json) = serde_json::to_string_pretty(self) {
                let _ = fs::write(path, json);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_has_no_api_key() {
        let settings = Settings::default();
        assert!(settings.api_key.is_empty());
        assert_eq!(settings.cooldown_secs, NOTIFY_COOLDOWN_SECS);
    }

    #[test]
    fn test_json_round_trip() {
        let settings = Settings {
            api_key: "abc".to_string(),
            cooldown_secs: 30,
            min_face_size: 60,
            score_thresh: 3.5,
        };
        let json = serde_json::to_string(&settings).unwrap();
        let back: Settings = serde_json::from_str(&json).unwrap();
        assert_eq!(back.api_key, "abc");
        assert_eq!(back.cooldown_secs, 30);
        assert_eq!(back.min_face_size, 60);
        assert_eq!(back.score_thresh, 3.5);
    }
}
