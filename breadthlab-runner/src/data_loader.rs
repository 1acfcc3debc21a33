//! Panel loading for the runner.
//!
//! Reads every instrument CSV in the configured folder, aligns them into a
//! panel and fingerprints the result. Per-file failures are carried as
//! warnings on the build; only an empty universe is an error.

use crate::config::DataConfig;
use breadthlab_core::data::{DataError, PanelBuild};
use breadthlab_core::fingerprint::DatasetHash;

/// A built panel plus its provenance.
#[derive(Debug, Clone)]
pub struct LoadedData {
    pub build: PanelBuild,
    /// Dataset hash for fingerprinting (BLAKE3 over the aligned panel).
    pub dataset_hash: DatasetHash,
}

/// Load and align the folder named by `config`.
pub fn load_panel(config: &DataConfig) -> Result<LoadedData, DataError> {
    log::info!(
        "Loading instrument CSVs from {} (align={})",
        config.dir.display(),
        config.align
    );
    let build = PanelBuild::from_csv_dir(&config.dir, config.align, config.fields.as_deref())?;
    let dataset_hash = DatasetHash::of_panel(&build.panel);
    log::info!(
        "Loaded {} instruments over {} dates (dataset {})",
        build.panel.instruments().len(),
        build.panel.dates().len(),
        dataset_hash.short()
    );
    Ok(LoadedData {
        build,
        dataset_hash,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use breadthlab_core::data::AlignMode;

    fn write_fixture(dir: &std::path::Path) {
        std::fs::write(
            dir.join("AAA.csv"),
            "date,close,volume\n2024-01-02,10,100\n2024-01-03,11,110\n",
        )
        .unwrap();
        std::fs::write(
            dir.join("BBB.csv"),
            "date,close,volume\n2024-01-02,20,200\n2024-01-03,19,210\n",
        )
        .unwrap();
    }

    #[test]
    fn loads_and_hashes_deterministically() {
        let dir = tempfile::tempdir().unwrap();
        write_fixture(dir.path());
        let config = DataConfig {
            dir: dir.path().to_path_buf(),
            align: AlignMode::Common,
            fields: None,
        };
        let a = load_panel(&config).unwrap();
        let b = load_panel(&config).unwrap();
        assert_eq!(a.build.panel.instruments().len(), 2);
        assert_eq!(a.dataset_hash, b.dataset_hash);
    }

    #[test]
    fn empty_folder_is_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let config = DataConfig {
            dir: dir.path().to_path_buf(),
            ..Default::default()
        };
        assert!(matches!(
            load_panel(&config),
            Err(DataError::DataUnavailable(_))
        ));
    }
}
