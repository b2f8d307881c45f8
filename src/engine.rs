use crate::{
    config::StructureConfig,
    errors::{FileOperation, IoError},
    utils::{error_chain, pluralize},
    vfs::{EntryKind, VirtualEntry, VirtualFs},
};
use miette::Diagnostic;
use std::{
    fs,
    path::{Path, PathBuf},
};
use thiserror::Error;

pub const MARKER_FILE_NAME: &str = ".gitkeep";
pub const MARKER_CONTENTS: &str = "# This file ensures the folder is tracked by Git.\n";

#[cfg(windows)]
const RESERVED_CHARACTERS: &[char] = &['/', '\\', ':', '*', '?', '"', '<', '>', '|', '\0'];
#[cfg(not(windows))]
const RESERVED_CHARACTERS: &[char] = &['/', '\0'];

#[derive(Debug, Error, Diagnostic)]
pub enum GenerateError {
    #[error("invalid root name: '{name}'")]
    #[diagnostic(
        code(foldergen::generate::invalid_root_name),
        help("Use a non-empty name without path separators or reserved characters")
    )]
    InvalidRootName { name: String },

    #[error(transparent)]
    #[diagnostic(transparent)]
    Io(#[from] IoError),
}

/// Outcome of a single [`FolderGenerator::generate`] call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationResult {
    succeeded: bool,
    root_name: String,
    created_count: usize,
    skipped_count: usize,
    message: String,
}
impl GenerationResult {
    fn completed(root_name: &str, tally: Tally) -> Self {
        let message = match (tally.created, tally.skipped) {
            (0, 0) => format!("No folders were created for '{}'.", root_name),
            (created, 0) => format!(
                "Created {} for '{}'.",
                pluralize(created, "folder", "folders"),
                root_name
            ),
            (0, skipped) => format!(
                "No new folders were created for '{}': {} already existed.",
                root_name,
                pluralize(skipped, "folder", "folders")
            ),
            (created, skipped) => format!(
                "Created {} for '{}' ({} already existed).",
                pluralize(created, "folder", "folders"),
                root_name,
                pluralize(skipped, "folder", "folders")
            ),
        };

        Self::new(true, root_name, tally, message)
    }

    fn failed(root_name: &str, tally: Tally, error: &GenerateError) -> Self {
        let message = match error {
            GenerateError::InvalidRootName { .. } => format!(
                "Invalid root name '{}': use a non-empty name without path separators or reserved characters.",
                root_name
            ),
            GenerateError::Io(_) => format!(
                "Failed to create folders for '{}': {}",
                root_name,
                error_chain(error)
            ),
        };

        Self::new(false, root_name, tally, message)
    }

    fn new(succeeded: bool, root_name: &str, tally: Tally, message: String) -> Self {
        Self {
            succeeded,
            root_name: root_name.to_string(),
            created_count: tally.created,
            skipped_count: tally.skipped,
            message,
        }
    }

    pub fn succeeded(&self) -> bool {
        self.succeeded
    }

    pub fn root_name(&self) -> &str {
        &self.root_name
    }

    pub fn created_count(&self) -> usize {
        self.created_count
    }

    pub fn skipped_count(&self) -> usize {
        self.skipped_count
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

#[derive(Debug, Clone, Copy, Default)]
struct Tally {
    created: usize,
    skipped: usize,
}

/// Host hook asking whatever watches the assets root to rescan it.
pub trait RefreshHook {
    fn refresh(&self, region: &Path);
}
/// Does nothing; the default when no host is watching.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoRefresh;
impl RefreshHook for NoRefresh {
    fn refresh(&self, _region: &Path) {}
}
/// Logs the rescan request.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogRefresh;
impl RefreshHook for LogRefresh {
    fn refresh(&self, region: &Path) {
        log::info!("requesting rescan of {}", region.display());
    }
}
impl<F> RefreshHook for F
where
    F: Fn(&Path),
{
    fn refresh(&self, region: &Path) {
        self(region)
    }
}

/// Whether `name` can be used as a single folder name on this platform.
///
/// Rejects blank names, `.` and `..`, and any name holding a path separator,
/// NUL or (on Windows) one of `\ : * ? " < > |` or an ASCII control character.
pub fn is_valid_folder_name(name: &str) -> bool {
    if name.trim().is_empty() || name == "." || name == ".." {
        return false;
    }

    !name
        .chars()
        .any(|c| RESERVED_CHARACTERS.contains(&c) || (cfg!(windows) && c.is_ascii_control()))
}

/// Resolves `config` into the ordered folders to reconcile under `root_name`.
///
/// Paths are relative to the assets root. Entries with invalid names are left
/// out; an invalid group name also drops the group's subfolders.
///
/// # Errors
///
/// Returns [`GenerateError::InvalidRootName`] when `root_name` is not a valid folder name.
pub fn plan_structure(config: &StructureConfig, root_name: &str) -> Result<VirtualFs, GenerateError> {
    if !is_valid_folder_name(root_name) {
        return Err(GenerateError::InvalidRootName {
            name: root_name.to_string(),
        });
    }

    let root = PathBuf::from(root_name);
    let mut vfs = VirtualFs::new(&root);

    for (group, subfolders) in config.derived_main_structure() {
        if !is_valid_folder_name(&group) {
            log::debug!("skipping group with invalid name: {:?}", group);
            continue;
        }

        let group_path = root.join(&group);

        let subfolders: Vec<&String> = subfolders
            .iter()
            .filter(|subfolder| {
                let valid = is_valid_folder_name(subfolder);
                if !valid {
                    log::debug!("skipping subfolder of '{}' with invalid name: {:?}", group, subfolder);
                }
                valid
            })
            .collect();

        // counted after the validity filter: a group whose subfolders are all
        // invalid ends up empty on disk, so it is a leaf and gets the marker
        let is_leaf = subfolders.is_empty();

        vfs.entries.push(VirtualEntry {
            destination: group_path.clone(),
            kind: EntryKind::Group,
            counted: is_leaf,
            marker: is_leaf && config.create_marker_files,
        });

        for subfolder in subfolders {
            vfs.entries.push(VirtualEntry {
                destination: group_path.join(subfolder),
                kind: EntryKind::Subfolder,
                counted: true,
                marker: config.create_marker_files,
            });
        }
    }

    for folder in config.derived_standalone_folders() {
        if !is_valid_folder_name(&folder) {
            log::debug!("skipping standalone folder with invalid name: {:?}", folder);
            continue;
        }

        vfs.entries.push(VirtualEntry {
            destination: PathBuf::from(folder),
            kind: EntryKind::Standalone,
            counted: true,
            marker: config.create_marker_files,
        });
    }

    Ok(vfs)
}

/// Creates the folders a [`StructureConfig`] describes under an assets root.
///
/// Holds no state between runs: every [`FolderGenerator::generate`] call derives
/// the structure afresh and compares it with what is on disk.
#[derive(Debug, Clone)]
pub struct FolderGenerator<H = NoRefresh> {
    assets_root: PathBuf,
    refresh: H,
}
impl FolderGenerator<NoRefresh> {
    pub fn new(assets_root: impl Into<PathBuf>) -> Self {
        Self {
            assets_root: assets_root.into(),
            refresh: NoRefresh,
        }
    }
}
impl<H: RefreshHook> FolderGenerator<H> {
    pub fn with_refresh_hook<R: RefreshHook>(self, refresh: R) -> FolderGenerator<R> {
        FolderGenerator {
            assets_root: self.assets_root,
            refresh,
        }
    }

    pub fn assets_root(&self) -> &Path {
        &self.assets_root
    }

    /// Creates every missing folder of `config` under `assets_root/root_name`,
    /// plus the standalone folders next to it.
    ///
    /// Existing folders are skipped, so calling this again with the same input
    /// resumes an interrupted run. Failures never escape: an invalid root name
    /// or a filesystem error is reported through an unsuccessful
    /// [`GenerationResult`], with folders created before the error left in place.
    pub fn generate(&self, config: &StructureConfig, root_name: &str) -> GenerationResult {
        let vfs = match plan_structure(config, root_name) {
            Ok(vfs) => vfs,
            Err(error) => {
                log::warn!("{}", error);
                return GenerationResult::failed(root_name, Tally::default(), &error);
            }
        };

        let mut tally = Tally::default();
        let outcome = self.apply(&vfs, &mut tally);

        if tally.created > 0 {
            self.refresh.refresh(&self.assets_root);
        }

        match outcome {
            Ok(()) => {
                log::debug!(
                    "generation of '{}' finished: {} created, {} skipped",
                    root_name,
                    tally.created,
                    tally.skipped
                );
                GenerationResult::completed(root_name, tally)
            }
            Err(error) => {
                log::error!("failed to create folder structure: {}", error_chain(&error));
                GenerationResult::failed(root_name, tally, &error)
            }
        }
    }

    fn apply(&self, vfs: &VirtualFs, tally: &mut Tally) -> Result<(), GenerateError> {
        for entry in vfs.counted() {
            let path = self.assets_root.join(&entry.destination);

            if path.is_dir() {
                log::debug!("folder already exists: {}", path.display());
                tally.skipped += 1;
                continue;
            }

            fs::create_dir_all(&path)
                .map_err(|error| IoError::new(FileOperation::Mkdir, path.clone(), error))?;

            log::info!("created folder: {}", path.display());
            tally.created += 1;

            if entry.marker {
                write_marker(&path);
            }
        }

        Ok(())
    }
}

/// Best effort: a marker that cannot be written is logged and otherwise ignored.
fn write_marker(folder: &Path) {
    let marker = folder.join(MARKER_FILE_NAME);

    if marker.exists() {
        return;
    }

    if let Err(error) = fs::write(&marker, MARKER_CONTENTS) {
        log::warn!(
            "{}",
            error_chain(&IoError::new(FileOperation::Write, marker, error))
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FolderGroup;
    use std::cell::Cell;
    use tempfile::TempDir;

    fn demo_config() -> StructureConfig {
        StructureConfig {
            groups: vec![FolderGroup::new("Art", ["Sprites", "Shaders"])],
            standalone_folders: vec!["Settings".to_string()],
            create_marker_files: true,
            ..StructureConfig::default()
        }
    }

    fn has_marker(path: &Path) -> bool {
        path.join(MARKER_FILE_NAME).is_file()
    }

    #[test]
    fn accepts_ordinary_names() {
        for name in ["MyFolder", "Folder_123", "with space", "dots.in.name", "Ünïcødé", " padded "] {
            assert!(is_valid_folder_name(name), "{name:?} should be valid");
        }
    }

    #[test]
    fn rejects_blank_names() {
        for name in ["", " ", "\t\n"] {
            assert!(!is_valid_folder_name(name), "{name:?} should be invalid");
        }
    }

    #[test]
    fn rejects_reserved_characters() {
        for reserved in RESERVED_CHARACTERS {
            let name = format!("Invalid{}Name", reserved);
            assert!(!is_valid_folder_name(&name), "{name:?} should be invalid");
        }
        assert!(!is_valid_folder_name("Art/Sprites"));
        assert!(!is_valid_folder_name("nul\0byte"));
    }

    #[test]
    fn rejects_relative_path_components() {
        assert!(!is_valid_folder_name("."));
        assert!(!is_valid_folder_name(".."));
        assert!(is_valid_folder_name("..hidden"));
    }

    #[test]
    fn plan_orders_groups_then_standalone() {
        let mut config = demo_config();
        config.groups.push(FolderGroup::new("Docs", Vec::<String>::new()));

        let vfs = plan_structure(&config, "Demo").expect("valid root");
        let paths: Vec<PathBuf> = vfs.entries.iter().map(|e| e.destination.clone()).collect();

        assert_eq!(
            paths,
            vec![
                PathBuf::from("Demo/Art"),
                PathBuf::from("Demo/Art/Sprites"),
                PathBuf::from("Demo/Art/Shaders"),
                PathBuf::from("Demo/Docs"),
                PathBuf::from("Settings"),
            ]
        );
        assert!(!vfs.entries[0].counted);
        assert!(vfs.entries[3].counted && vfs.entries[3].marker);
    }

    #[test]
    fn scenario_creates_leaves_with_markers() {
        let temp = TempDir::new().unwrap();
        let generator = FolderGenerator::new(temp.path());

        let result = generator.generate(&demo_config(), "Demo");

        assert!(result.succeeded(), "{}", result.message());
        assert_eq!(result.root_name(), "Demo");
        assert_eq!(result.created_count(), 3);
        assert_eq!(result.skipped_count(), 0);
        assert_eq!(result.message(), "Created 3 folders for 'Demo'.");

        let art = temp.path().join("Demo/Art");
        assert!(has_marker(&art.join("Sprites")));
        assert!(has_marker(&art.join("Shaders")));
        assert!(has_marker(&temp.path().join("Settings")));
        assert!(art.is_dir());
        assert!(!has_marker(&art));
        assert!(!has_marker(&temp.path().join("Demo")));
        assert_eq!(
            fs::read_to_string(art.join("Sprites").join(MARKER_FILE_NAME)).unwrap(),
            MARKER_CONTENTS
        );
    }

    #[test]
    fn second_run_skips_everything() {
        let temp = TempDir::new().unwrap();
        let generator = FolderGenerator::new(temp.path());

        let first = generator.generate(&demo_config(), "Demo");
        let second = generator.generate(&demo_config(), "Demo");

        assert_eq!(first.created_count(), 3);
        assert!(second.succeeded());
        assert_eq!(second.created_count(), 0);
        assert_eq!(second.skipped_count(), first.created_count());
        assert_eq!(
            second.message(),
            "No new folders were created for 'Demo': 3 folders already existed."
        );
    }

    #[test]
    fn empty_root_name_fails_without_side_effects() {
        let temp = TempDir::new().unwrap();
        let generator = FolderGenerator::new(temp.path());

        let result = generator.generate(&demo_config(), "");

        assert!(!result.succeeded());
        assert_eq!(result.created_count(), 0);
        assert_eq!(result.skipped_count(), 0);
        assert!(result.message().starts_with("Invalid root name"));
        assert_eq!(fs::read_dir(temp.path()).unwrap().count(), 0);
    }

    #[test]
    fn root_name_with_separator_is_rejected() {
        let temp = TempDir::new().unwrap();
        let result = FolderGenerator::new(temp.path()).generate(&demo_config(), "Demo/Nested");

        assert!(!result.succeeded());
        assert!(!temp.path().join("Demo").exists());
        assert!(!temp.path().join("Settings").exists());
    }

    #[test]
    fn invalid_entries_are_skipped_individually() {
        let temp = TempDir::new().unwrap();
        let config = StructureConfig {
            groups: vec![
                FolderGroup::new("Art", ["Sprites", "Bad/Name", ".."]),
                FolderGroup::new("Bad/Group", ["Child"]),
            ],
            standalone_folders: vec!["..".to_string(), "Settings".to_string()],
            ..StructureConfig::default()
        };

        let result = FolderGenerator::new(temp.path()).generate(&config, "Demo");

        assert!(result.succeeded());
        assert_eq!(result.created_count(), 2);
        assert!(temp.path().join("Demo/Art/Sprites").is_dir());
        assert!(!temp.path().join("Demo/Bad").exists());
        assert!(temp.path().join("Settings").is_dir());
    }

    #[test]
    fn disabled_groups_are_not_created() {
        let temp = TempDir::new().unwrap();
        let config = StructureConfig {
            groups: vec![
                FolderGroup::new("Art", ["Sprites"]),
                FolderGroup::new("Audio", ["Music"]).disabled(),
            ],
            ..StructureConfig::default()
        };

        let result = FolderGenerator::new(temp.path()).generate(&config, "Demo");

        assert_eq!(result.created_count(), 1);
        assert!(!temp.path().join("Demo/Audio").exists());
    }

    #[test]
    fn markers_are_skipped_when_disabled() {
        let temp = TempDir::new().unwrap();
        let mut config = demo_config();
        config.create_marker_files = false;

        let result = FolderGenerator::new(temp.path()).generate(&config, "Demo");

        assert_eq!(result.created_count(), 3);
        assert!(!has_marker(&temp.path().join("Demo/Art/Sprites")));
        assert!(!has_marker(&temp.path().join("Settings")));
    }

    #[test]
    fn empty_group_is_a_leaf() {
        let temp = TempDir::new().unwrap();
        let config = StructureConfig {
            groups: vec![FolderGroup::new("Docs", ["", "  "])],
            ..StructureConfig::default()
        };

        let result = FolderGenerator::new(temp.path()).generate(&config, "Demo");

        assert_eq!(result.created_count(), 1);
        assert_eq!(result.message(), "Created 1 folder for 'Demo'.");
        assert!(has_marker(&temp.path().join("Demo/Docs")));
    }

    #[test]
    fn group_with_only_invalid_subfolders_is_a_leaf() {
        let temp = TempDir::new().unwrap();
        let config = StructureConfig {
            groups: vec![FolderGroup::new("Art", ["Bad/Name", ".."])],
            ..StructureConfig::default()
        };

        let result = FolderGenerator::new(temp.path()).generate(&config, "Demo");

        assert_eq!(result.created_count(), 1);
        assert!(has_marker(&temp.path().join("Demo/Art")));
    }

    #[test]
    fn existing_folders_get_no_marker() {
        let temp = TempDir::new().unwrap();
        fs::create_dir_all(temp.path().join("Demo/Art/Sprites")).unwrap();

        let result = FolderGenerator::new(temp.path()).generate(&demo_config(), "Demo");

        assert_eq!(result.created_count(), 2);
        assert_eq!(result.skipped_count(), 1);
        assert_eq!(
            result.message(),
            "Created 2 folders for 'Demo' (1 folder already existed)."
        );
        assert!(!has_marker(&temp.path().join("Demo/Art/Sprites")));
        assert!(has_marker(&temp.path().join("Demo/Art/Shaders")));
    }

    #[test]
    fn nothing_to_create_has_its_own_message() {
        let temp = TempDir::new().unwrap();

        let result = FolderGenerator::new(temp.path()).generate(&StructureConfig::default(), "Demo");

        assert!(result.succeeded());
        assert_eq!(result.created_count(), 0);
        assert_eq!(result.skipped_count(), 0);
        assert_eq!(result.message(), "No folders were created for 'Demo'.");
    }

    #[test]
    fn duplicate_standalone_folder_is_skipped_the_second_time() {
        let temp = TempDir::new().unwrap();
        let config = StructureConfig {
            standalone_folders: vec!["Settings".to_string(), "Settings".to_string()],
            ..StructureConfig::default()
        };

        let result = FolderGenerator::new(temp.path()).generate(&config, "Demo");

        assert_eq!(result.created_count(), 1);
        assert_eq!(result.skipped_count(), 1);
    }

    #[test]
    fn standalone_may_share_a_group_name() {
        let temp = TempDir::new().unwrap();
        let config = StructureConfig {
            groups: vec![FolderGroup::new("Art", Vec::<String>::new())],
            standalone_folders: vec!["Art".to_string()],
            ..StructureConfig::default()
        };

        let result = FolderGenerator::new(temp.path()).generate(&config, "Demo");

        assert_eq!(result.created_count(), 2);
        assert!(temp.path().join("Demo/Art").is_dir());
        assert!(temp.path().join("Art").is_dir());
    }

    #[test]
    fn filesystem_failure_keeps_partial_work_and_resumes() {
        let temp = TempDir::new().unwrap();
        let blocker = temp.path().join("Settings");
        fs::write(&blocker, "not a folder").unwrap();

        let generator = FolderGenerator::new(temp.path());
        let failed = generator.generate(&demo_config(), "Demo");

        assert!(!failed.succeeded());
        assert_eq!(failed.created_count(), 2);
        assert!(failed.message().starts_with("Failed to create folders for 'Demo'"));
        assert!(failed.message().contains("creating a directory"));
        assert!(temp.path().join("Demo/Art/Sprites").is_dir());

        fs::remove_file(&blocker).unwrap();
        let resumed = generator.generate(&demo_config(), "Demo");

        assert!(resumed.succeeded());
        assert_eq!(resumed.created_count(), 1);
        assert_eq!(resumed.skipped_count(), 2);
    }

    #[test]
    fn failure_aborts_remaining_entries() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("Demo"), "not a folder").unwrap();

        let result = FolderGenerator::new(temp.path()).generate(&demo_config(), "Demo");

        assert!(!result.succeeded());
        assert_eq!(result.created_count(), 0);
        assert!(!temp.path().join("Settings").exists());
    }

    #[test]
    fn existing_marker_keeps_its_contents() {
        let temp = TempDir::new().unwrap();
        let marker = temp.path().join(MARKER_FILE_NAME);
        fs::write(&marker, "mine").unwrap();

        write_marker(temp.path());

        assert_eq!(fs::read_to_string(&marker).unwrap(), "mine");
    }

    #[test]
    fn unwritable_marker_is_ignored() {
        let temp = TempDir::new().unwrap();
        let missing = temp.path().join("Missing");

        write_marker(&missing);

        assert!(!missing.exists());

        let result = FolderGenerator::new(temp.path()).generate(&demo_config(), "Demo");
        assert!(result.succeeded());
        assert_eq!(result.created_count(), 3);
    }

    #[test]
    fn refresh_hook_runs_only_after_creating_folders() {
        let temp = TempDir::new().unwrap();
        let calls = Cell::new(0);
        let generator = FolderGenerator::new(temp.path()).with_refresh_hook(|region: &Path| {
            assert_eq!(region, temp.path());
            calls.set(calls.get() + 1);
        });

        generator.generate(&demo_config(), "Demo");
        generator.generate(&demo_config(), "Demo");
        generator.generate(&demo_config(), "");

        assert_eq!(calls.get(), 1);
    }
}
