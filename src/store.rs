use crate::{
    config::StructureConfig,
    errors::{FileOperation, IoError},
};
use miette::Diagnostic;
use std::{fs, path::Path, path::PathBuf};
use thiserror::Error;

pub const DEFAULT_CONFIG_PATH: &str = "Assets/Editor/folder-structure.toml";

#[derive(Error, Debug, Diagnostic)]
pub enum StoreError {
    #[error("I/O error within config store")]
    #[diagnostic(code(foldergen::store::io))]
    Io(#[from] IoError),

    #[error("Unable to parse toml file at '{path}': {source}")]
    #[diagnostic(code(foldergen::store::parse_toml), help("Review toml file"))]
    ParseToml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Unable to serialize folder structure config for '{path}'")]
    #[diagnostic(code(foldergen::store::serialize_toml))]
    SerializeToml {
        path: PathBuf,
        #[source]
        source: toml::ser::Error,
    },

    #[error("config already exists at '{path}'")]
    #[diagnostic(
        code(foldergen::store::already_exists),
        help("Pass --force to overwrite it with the starter structure")
    )]
    AlreadyExists { path: PathBuf },
}

/// Reads a config from `path` and sanitizes it.
pub fn load(path: &Path) -> Result<StructureConfig, StoreError> {
    let content = fs::read_to_string(path)
        .map_err(|error| IoError::new(FileOperation::Read, path.to_path_buf(), error))?;

    let mut config: StructureConfig =
        toml::from_str(&content).map_err(|error| StoreError::ParseToml {
            path: path.to_path_buf(),
            source: error,
        })?;

    config.sanitize();

    log::debug!("loaded folder structure config from {}", path.display());

    Ok(config)
}

/// Writes `config` to `path`, creating parent directories as needed.
pub fn save(config: &StructureConfig, path: &Path) -> Result<(), StoreError> {
    let content = toml::to_string_pretty(config).map_err(|error| StoreError::SerializeToml {
        path: path.to_path_buf(),
        source: error,
    })?;

    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .map_err(|error| IoError::new(FileOperation::Mkdir, parent.to_path_buf(), error))?;
    }

    fs::write(path, content)
        .map_err(|error| IoError::new(FileOperation::Write, path.to_path_buf(), error))?;

    Ok(())
}

/// Loads the config at `path`, writing the starter structure there first if none exists.
pub fn load_or_create(path: &Path) -> Result<StructureConfig, StoreError> {
    if path.exists() {
        return load(path);
    }

    let mut config = StructureConfig::starter();
    save(&config, path)?;
    config.sanitize();

    log::info!("created default folder structure config at: {}", path.display());

    Ok(config)
}

/// Writes the starter structure to `path`. An existing file is only replaced when `force` is set.
pub fn init(path: &Path, force: bool) -> Result<StructureConfig, StoreError> {
    if path.exists() && !force {
        return Err(StoreError::AlreadyExists {
            path: path.to_path_buf(),
        });
    }

    let config = StructureConfig::starter();
    save(&config, path)?;

    log::info!("wrote starter folder structure config to: {}", path.display());

    Ok(config)
}
