#[cfg(test)]
mod tests {

    use std::path::PathBuf;
    use std::time::Duration;
    use crate::core::{PlayerConfig, Resolution};

    fn temp_config_path() -> PathBuf {
        std::env::temp_dir()
            .join(format!("timeline-player-test-{}", uuid::Uuid::new_v4()))
            .join("config.json")
    }

    #[test]
    fn test_player_config_default() {
        let config = PlayerConfig::default();
        assert_eq!(config.default_resolution, Resolution::new(1280, 720));
        assert_eq!(config.frame_interval_ms, 16);
        assert_eq!(config.frame_interval(), Duration::from_millis(16));
    }

    #[test]
    fn test_frame_interval_never_zero() {
        let config = PlayerConfig { frame_interval_ms: 0, ..Default::default() };
        assert_eq!(config.frame_interval(), Duration::from_millis(1));
    }

    #[test]
    fn test_config_save_and_load() {
        let path = temp_config_path();
        let mut config = PlayerConfig::default();
        config.default_resolution = Resolution::new(1920, 1080);
        config.frame_interval_ms = 33;

        config.save_to(&path).expect("Failed to save config");
        let loaded = PlayerConfig::load_from(&path).expect("Failed to load config");

        assert_eq!(loaded.default_resolution, Resolution::new(1920, 1080));
        assert_eq!(loaded.frame_interval_ms, 33);

        if let Some(parent) = path.parent() {
            let _ = std::fs::remove_dir_all(parent);
        }
    }

    #[test]
    fn test_config_missing_fields_take_defaults() {
        // Older config files only carried the frame interval
        let old_config_json = r#"{ "frame_interval_ms": 40 }"#;

        let config: PlayerConfig = serde_json::from_str(old_config_json).expect("Failed to parse old config");

        assert_eq!(config.frame_interval_ms, 40);
        assert_eq!(config.default_resolution, Resolution::new(1280, 720));
        assert_eq!(config.merge_epsilon, 1e-6);
    }

    #[test]
    fn test_load_from_missing_file_fails() {
        let path = temp_config_path();
        assert!(PlayerConfig::load_from(&path).is_err());
    }

    #[test]
    fn test_load_from_broken_file_fails() {
        let path = temp_config_path();
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, "{ not json").unwrap();

        assert!(PlayerConfig::load_from(&path).is_err());

        let _ = std::fs::remove_dir_all(path.parent().unwrap());
    }
}
