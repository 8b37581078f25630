use std::fs;
use std::path::PathBuf;
use tracing::{error, info};

pub struct PortablePathManager;

impl PortablePathManager {
    /// Application root: the directory holding the executable, or the crate
    /// directory in debug builds.
    pub fn root_dir() -> PathBuf {
        if cfg!(debug_assertions) {
            return PathBuf::from(env!("CARGO_MANIFEST_DIR"));
        }

        match std::env::current_exe() {
            Ok(mut path) => {
                path.pop();
                path
            }
            Err(e) => {
                error!("Failed to get current exe path: {}. Falling back to current dir.", e);
                PathBuf::from(".")
            }
        }
    }

    /// Main data directory (./data).
    pub fn data_dir() -> PathBuf {
        Self::root_dir().join("data")
    }

    /// Saved artifacts (./data/downloads).
    pub fn downloads_dir() -> PathBuf {
        Self::data_dir().join("downloads")
    }

    /// Creates the data and downloads directories if missing.
    pub fn init() -> Result<(), std::io::Error> {
        for dir in [Self::data_dir(), Self::downloads_dir()] {
            if !dir.exists() {
                info!("Creating directory: {:?}", dir);
                fs::create_dir_all(&dir)?;
            }
        }
        Ok(())
    }
}
