use std::path::PathBuf;

use crate::config::Config;
use color_eyre::Result;
use dirs::data_dir;
use ticklist_storage::file_store::FileStore;
use tracing::debug;

/// Resolve the default data directory for Ticklist.
pub fn default_data_dir() -> Result<PathBuf> {
    let base = data_dir().ok_or_else(|| color_eyre::eyre::eyre!("no data dir available"))?;
    Ok(base.join("ticklist"))
}

/// Build the file store, honoring a `data_dir` override from config.
pub fn store_from_config(config: &Config) -> Result<FileStore> {
    let root = match &config.data_dir {
        Some(root) => {
            debug!(?root, "initializing file store (config override)");
            root.clone()
        }
        None => {
            let root = default_data_dir()?;
            debug!(?root, "initializing file store");
            root
        }
    };
    Ok(FileStore::new(root))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_override_wins() {
        let cfg = Config {
            data_dir: Some(PathBuf::from("/tmp/ticklist-test")),
            ..Config::default()
        };
        let store = store_from_config(&cfg).expect("store");
        assert_eq!(store.root(), PathBuf::from("/tmp/ticklist-test").as_path());
    }
}
