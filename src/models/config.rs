use std::env;
use std::path::{Path, PathBuf};

/// Artifact store configuration
#[derive(Debug, Clone)]
pub struct StoreConfig {
    pub firmware_dir: PathBuf,
    pub bootrom_dir: PathBuf,
}

impl StoreConfig {
    /// Place the two store directories under a common static-assets root.
    pub fn under_root(root: impl AsRef<Path>) -> Self {
        let root = root.as_ref();
        Self {
            firmware_dir: root.join("firmware"),
            bootrom_dir: root.join("bootrom"),
        }
    }

    /// Read the static root from `PROVISIONER_STATIC_DIR`, falling back to
    /// the default.
    pub fn from_env() -> Self {
        match env::var("PROVISIONER_STATIC_DIR") {
            Ok(root) => Self::under_root(root),
            Err(_) => Self::default(),
        }
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self::under_root("static")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_under_root_splits_directories() {
        let config = StoreConfig::under_root("/srv/provisioner/static");
        assert_eq!(
            config.firmware_dir,
            PathBuf::from("/srv/provisioner/static/firmware")
        );
        assert_eq!(
            config.bootrom_dir,
            PathBuf::from("/srv/provisioner/static/bootrom")
        );
    }

    #[test]
    fn test_default_uses_static_root() {
        let config = StoreConfig::default();
        assert_eq!(config.firmware_dir, PathBuf::from("static/firmware"));
        assert_eq!(config.bootrom_dir, PathBuf::from("static/bootrom"));
    }
}
