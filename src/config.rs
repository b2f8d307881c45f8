use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::utils::is_blank;

pub const DEFAULT_ROOT_NAME: &str = "_PROJECT_NAME";

/// One top-level folder (e.g. `Art`) and the subfolders created inside it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FolderGroup {
    pub name: String,
    pub subfolders: Vec<String>,
    pub enabled: bool,
}
impl Default for FolderGroup {
    fn default() -> Self {
        Self {
            name: String::new(),
            subfolders: Vec::new(),
            enabled: true,
        }
    }
}
impl FolderGroup {
    pub fn new<N, I, S>(name: N, subfolders: I) -> Self
    where
        N: Into<String>,
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            subfolders: subfolders.into_iter().map(Into::into).collect(),
            enabled: true,
        }
    }

    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }
}

/// Declarative description of the folder tree to generate.
///
/// The lists are the editable draft and may hold blank entries, at most one
/// per list after [`StructureConfig::sanitize`]. Generation never reads them
/// directly: it goes through [`StructureConfig::derived_main_structure`] and
/// [`StructureConfig::derived_standalone_folders`], which drop every blank.
///
/// Editors should change the draft through [`StructureConfig::edit`]: writing
/// the public fields directly neither sanitizes nor bumps the revision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StructureConfig {
    /// Root name offered to the user before generating.
    pub default_root_name: String,
    /// Write a `.gitkeep` into every newly created leaf folder.
    pub create_marker_files: bool,
    /// Folders created next to the root rather than inside it.
    pub standalone_folders: Vec<String>,
    // kept last so it serializes as trailing `[[groups]]` tables
    pub groups: Vec<FolderGroup>,
    #[serde(skip)]
    pub(crate) revision: u64,
}
impl Default for StructureConfig {
    fn default() -> Self {
        Self {
            default_root_name: DEFAULT_ROOT_NAME.to_string(),
            create_marker_files: true,
            standalone_folders: Vec::new(),
            groups: Vec::new(),
            revision: 0,
        }
    }
}
impl StructureConfig {
    /// The structure written when no config file exists yet.
    pub fn starter() -> Self {
        Self {
            groups: vec![
                FolderGroup::new(
                    "Art",
                    [
                        "Animations",
                        "Materials",
                        "Models",
                        "Shaders",
                        "Sprites",
                        "Textures",
                    ],
                ),
                FolderGroup::new("Audio", ["Music", "SFX"]),
                FolderGroup::new("Code", ["Scripts", "Editor"]),
                FolderGroup::new("Level", ["Prefabs", "Scenes", "UI"]),
                FolderGroup::new("Docs", Vec::<String>::new()),
            ],
            standalone_folders: vec!["Plugins".to_string(), "Settings".to_string()],
            ..Self::default()
        }
    }

    /// Enabled, non-blank groups mapped to their non-blank subfolders, in config order.
    ///
    /// A repeated group name keeps its first position but takes the subfolders of
    /// the last group declaring it.
    pub fn derived_main_structure(&self) -> IndexMap<String, Vec<String>> {
        let mut structure = IndexMap::new();

        for group in &self.groups {
            if !group.enabled || is_blank(&group.name) {
                continue;
            }

            let subfolders = group
                .subfolders
                .iter()
                .filter(|subfolder| !is_blank(subfolder))
                .cloned()
                .collect();

            structure.insert(group.name.clone(), subfolders);
        }

        structure
    }

    /// Non-blank standalone folders in config order. Duplicates are kept.
    pub fn derived_standalone_folders(&self) -> Vec<String> {
        self.standalone_folders
            .iter()
            .filter(|folder| !is_blank(folder))
            .cloned()
            .collect()
    }

    pub fn enabled_group_count(&self) -> usize {
        self.derived_main_structure().len()
    }

    /// Removes blank list entries, keeping the last blank slot of each list for an
    /// editing surface, and bumps the revision.
    pub fn sanitize(&mut self) {
        retain_last_blank(&mut self.standalone_folders);

        for group in &mut self.groups {
            retain_last_blank(&mut group.subfolders);
        }

        self.revision = self.revision.wrapping_add(1);
    }

    /// Applies an external edit to the draft, then sanitizes it.
    pub fn edit<F>(&mut self, change: F)
    where
        F: FnOnce(&mut Self),
    {
        change(self);
        self.sanitize();
    }

    /// Bumped on every [`StructureConfig::sanitize`]; front ends compare it to
    /// notice that the config changed.
    pub fn revision(&self) -> u64 {
        self.revision
    }
}

fn retain_last_blank(entries: &mut Vec<String>) {
    if entries.len() <= 1 {
        return;
    }

    let kept_blank = entries.iter().rposition(|entry| is_blank(entry));
    let mut index = 0;

    entries.retain(|entry| {
        let keep = !is_blank(entry) || Some(index) == kept_blank;
        index += 1;
        keep
    });
}
