//! Settings files for [`SnowStore`]

use crate::error::EngineError;
use snow_accumulation::SnowStore;
use std::path::Path;

/// Load settings from `path` into `store`.
///
/// A missing file is not an error and returns `Ok(false)`.
pub fn load_settings_file(store: &mut SnowStore, path: impl AsRef<Path>) -> Result<bool, EngineError> {
    let path = path.as_ref();
    if !path.exists() {
        return Ok(false);
    }

    let json = std::fs::read_to_string(path)?;
    store.load_settings(&json)?;
    log::info!("Loaded settings from {}", path.display());
    Ok(true)
}

pub fn save_settings_file(store: &SnowStore, path: impl AsRef<Path>) -> Result<(), EngineError> {
    let path = path.as_ref();
    std::fs::write(path, store.save_settings()?)?;
    log::info!("Saved settings to {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use snow_simulation::SnowConfigPatch;

    fn temp_path(name: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!("snowfall-{}-{}.json", name, std::process::id()))
    }

    #[test]
    fn test_missing_file_is_ok() {
        let mut store = SnowStore::default();
        let loaded = load_settings_file(&mut store, temp_path("missing")).unwrap();
        assert!(!loaded);
    }

    #[test]
    fn test_file_round_trip() {
        let path = temp_path("round-trip");
        let mut store = SnowStore::default();
        store.update_config(&SnowConfigPatch::default().with_intensity(42));
        save_settings_file(&store, &path).unwrap();

        let mut restored = SnowStore::default();
        assert!(load_settings_file(&mut restored, &path).unwrap());
        assert_eq!(restored.config().intensity, 42);
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_corrupt_file_is_settings_error() {
        let path = temp_path("corrupt");
        std::fs::write(&path, "not json").unwrap();

        let mut store = SnowStore::default();
        let err = load_settings_file(&mut store, &path).unwrap_err();
        assert!(matches!(err, EngineError::Settings(_)));
        let _ = std::fs::remove_file(&path);
    }
}
