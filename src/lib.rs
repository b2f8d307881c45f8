pub mod api;
pub mod config;
pub mod engine;
pub mod errors;
pub mod preview;
pub mod prompt;
pub mod store;
pub mod utils;
pub mod vfs;

pub use config::{FolderGroup, StructureConfig};
pub use engine::{is_valid_folder_name, FolderGenerator, GenerationResult, RefreshHook};
