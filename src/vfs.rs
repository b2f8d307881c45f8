use std::path::PathBuf;

/// Where a planned folder sits in the generated tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    /// A top-level folder under the root.
    Group,
    /// A folder inside a group.
    Subfolder,
    /// A folder next to the root.
    Standalone,
}

/// A folder planned for creation, before anything touches the disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VirtualEntry {
    /// Path relative to the assets root.
    pub destination: PathBuf,
    pub kind: EntryKind,
    /// Counted in the run's created/skipped totals. Groups with subfolders are
    /// created as intermediate segments and are not counted.
    pub counted: bool,
    /// Receives a marker file when newly created.
    pub marker: bool,
}

/// The ordered list of folders a generation run will reconcile.
#[derive(Debug, Clone, Default)]
pub struct VirtualFs {
    pub root: PathBuf,
    pub entries: Vec<VirtualEntry>,
}
impl VirtualFs {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            entries: Vec::new(),
        }
    }

    pub fn counted(&self) -> impl Iterator<Item = &VirtualEntry> {
        self.entries.iter().filter(|entry| entry.counted)
    }
}
