use anyhow::{Context, Result};
use std::{fs, path::Path};
use tank_shared::TankSettings;

/// Load tank tuning from a JSON file, or the built-in defaults when no path is given.
pub fn load_settings(path: Option<&Path>) -> Result<TankSettings> {
    let Some(path) = path else {
        return Ok(TankSettings::default());
    };

    let data = fs::read_to_string(path)
        .with_context(|| format!("failed to read settings {}", path.display()))?;
    let settings = TankSettings::from_json(&data)
        .with_context(|| format!("invalid settings in {}", path.display()))?;
    settings
        .bubble_config()
        .with_context(|| format!("invalid settings in {}", path.display()))?;
    log::debug!("Loaded settings from {}", path.display());
    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_without_path() {
        assert_eq!(load_settings(None).unwrap(), TankSettings::default());
    }

    #[test]
    fn test_reads_partial_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tank.json");
        fs::write(&path, r#"{ "arrival_threshold": 1.5 }"#).unwrap();

        let settings = load_settings(Some(&path)).unwrap();
        assert_eq!(settings.arrival_threshold, 1.5);
        assert_eq!(settings.wobble_increment, 0.1);
    }

    #[test]
    fn test_invalid_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tank.json");
        fs::write(&path, "[]").unwrap();

        assert!(load_settings(Some(&path)).is_err());
    }

    #[test]
    fn test_tiny_bubble_interval_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tank.json");
        fs::write(&path, r#"{ "bubble_interval_ms": 1e-300 }"#).unwrap();

        let err = load_settings(Some(&path)).unwrap_err();
        assert!(format!("{:#}", err).contains("bubble interval"));
    }
}
