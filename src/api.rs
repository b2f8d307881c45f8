use crate::{
    config::StructureConfig,
    engine::{plan_structure, FolderGenerator, GenerateError, GenerationResult, LogRefresh},
    preview::preview_as_tree,
    prompt::{self, PromptError},
    store::{self, StoreError},
};
use colored::Colorize;
use std::path::Path;

#[derive(Debug, thiserror::Error, miette::Diagnostic)]
pub enum FolderGenError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Prompt(#[from] PromptError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Generate(#[from] GenerateError),

    #[error("{message}")]
    #[diagnostic(
        code(foldergen::generation_failed),
        help("Folders created before the failure were kept; run the command again to resume")
    )]
    Generation { message: String },
}

/// Generates the folder structure described by the config at `config_path` under `assets_root`.
///
/// A missing config is created with the starter structure first. Without a
/// `root_name` the user is prompted for one; without `assume_yes` the user must
/// confirm the previewed tree. Returns `Ok(None)` when the user declines.
///
/// # Errors
///
/// Returns a [`FolderGenError`] if:
///
/// - The config cannot be read, parsed or created.
/// - User prompts fail or the user cancels the input.
/// - The generation run reports a failure (invalid root name or filesystem error).
pub fn generate_folders(
    config_path: &Path,
    assets_root: &Path,
    root_name: Option<&str>,
    assume_yes: bool,
) -> Result<Option<GenerationResult>, FolderGenError> {
    let config = store::load_or_create(config_path)?;

    let root_name = match root_name {
        Some(name) => name.to_string(),
        None => prompt::get_root_name(&config.default_root_name)?,
    };

    // an invalid root is reported by the run itself, with nothing to preview
    if let Ok(vfs) = plan_structure(&config, &root_name) {
        if !assume_yes {
            preview_as_tree(&config, &vfs, assets_root);

            if !prompt::apply_changes()? {
                log::info!("generation of '{}' canceled", root_name);
                return Ok(None);
            }
        }
    }

    let result = FolderGenerator::new(assets_root)
        .with_refresh_hook(LogRefresh)
        .generate(&config, &root_name);

    if result.succeeded() {
        Ok(Some(result))
    } else {
        Err(FolderGenError::Generation {
            message: result.message().to_string(),
        })
    }
}

/// Prints the tree a generation run would produce, without touching the disk.
///
/// Falls back to the starter structure when no config exists at `config_path`,
/// and to the config's default root name when `root_name` is `None`.
pub fn preview_folders(
    config_path: &Path,
    assets_root: &Path,
    root_name: Option<&str>,
) -> Result<(), FolderGenError> {
    let config = if config_path.exists() {
        store::load(config_path)?
    } else {
        log::debug!(
            "no config at {}, previewing the starter structure",
            config_path.display()
        );
        StructureConfig::starter()
    };

    let root_name = root_name.unwrap_or(&config.default_root_name);

    let vfs = plan_structure(&config, root_name)?;

    preview_as_tree(&config, &vfs, assets_root);

    Ok(())
}

/// Writes the starter config to `config_path`.
pub fn init_config(config_path: &Path, force: bool) -> Result<(), FolderGenError> {
    store::init(config_path, force)?;

    println!("{} {}", "create".green(), config_path.display());

    Ok(())
}
