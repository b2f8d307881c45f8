use crate::{
    config::StructureConfig,
    utils::pluralize,
    vfs::{EntryKind, VirtualFs},
};
use colored::Colorize;
use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt::Write;
use std::path::{Path, PathBuf};
use std::rc::Rc;

/// A folder in the preview tree.
#[derive(Debug)]
struct TreeNode {
    name: String,
    children: Vec<Rc<RefCell<TreeNode>>>,
    exists: bool,
    marker: bool,
}
impl TreeNode {
    fn new(name: String, exists: bool) -> Self {
        Self {
            name,
            children: Vec::new(),
            exists,
            marker: false,
        }
    }
}

/// Build the folder tree from the planned entries, rooted at `assets_root`.
fn build_tree(vfs: &VirtualFs, assets_root: &Path) -> Rc<RefCell<TreeNode>> {
    let root_name = assets_root
        .file_name()
        .map(|os| os.to_string_lossy().to_string())
        .unwrap_or_else(|| assets_root.display().to_string());

    let root = Rc::new(RefCell::new(TreeNode::new(root_name, assets_root.is_dir())));

    // relative path -> node
    let mut lookup: HashMap<PathBuf, Rc<RefCell<TreeNode>>> = HashMap::new();
    lookup.insert(PathBuf::new(), Rc::clone(&root));

    // the project root always shows, even when every group is skipped
    let mut destinations = vec![(vfs.root.clone(), false)];
    destinations.extend(
        vfs.entries
            .iter()
            .map(|entry| (entry.destination.clone(), entry.marker)),
    );

    for (destination, marker) in destinations {
        let mut current = PathBuf::new();
        let mut parent = Rc::clone(&root);

        // link every missing intermediate segment under its parent
        for component in destination.components() {
            current.push(component);

            let node = match lookup.get(&current) {
                Some(node) => Rc::clone(node),
                None => {
                    let name = component.as_os_str().to_string_lossy().to_string();
                    let exists = assets_root.join(&current).is_dir();
                    let node = Rc::new(RefCell::new(TreeNode::new(name, exists)));

                    parent.borrow_mut().children.push(Rc::clone(&node));
                    lookup.insert(current.clone(), Rc::clone(&node));

                    node
                }
            };

            parent = node;
        }

        if marker {
            parent.borrow_mut().marker = true;
        }
    }

    root
}

fn write_tree(out: &mut String, node: &Rc<RefCell<TreeNode>>, prefix: &str, is_last: bool) {
    let node_borrow = node.borrow();

    let connector = if is_last {
        "└── ".yellow()
    } else {
        "├── ".yellow()
    };
    let name = if node_borrow.exists {
        format!("{} {}", node_borrow.name.dimmed(), "(exists)".dimmed())
    } else {
        node_borrow.name.blue().to_string()
    };
    let marker = if node_borrow.marker && !node_borrow.exists {
        format!(" {}", "+ .gitkeep".green())
    } else {
        String::new()
    };
    let _ = writeln!(out, "{}{}{}{}", prefix.yellow(), connector, name, marker);

    let child_prefix = if is_last {
        format!("{}    ", prefix)
    } else {
        format!("{}│   ", prefix)
    };

    let len = node_borrow.children.len();
    for (i, child) in node_borrow.children.iter().enumerate() {
        let last = i == len - 1;
        write_tree(out, child, &child_prefix, last);
    }
}

/// Renders the planned folders as an ASCII tree.
pub fn render_tree(vfs: &VirtualFs, assets_root: &Path) -> String {
    let tree_root = build_tree(vfs, assets_root);
    let mut out = String::new();

    write_tree(&mut out, &tree_root, "", true);

    out
}

/// One-paragraph description of what a generation run would do.
pub fn summary(config: &StructureConfig, vfs: &VirtualFs) -> String {
    let standalone = vfs
        .entries
        .iter()
        .filter(|entry| entry.kind == EntryKind::Standalone)
        .count();

    format!(
        "Marker files: {}\nFolder groups: {}\nStandalone folders: {}\nPlanned: {}",
        if config.create_marker_files {
            "enabled"
        } else {
            "disabled"
        },
        config.enabled_group_count(),
        standalone,
        pluralize(vfs.counted().count(), "folder", "folders"),
    )
}

pub fn preview_as_tree(config: &StructureConfig, vfs: &VirtualFs, assets_root: &Path) {
    println!(
        "Legend: {} = (new folder), {} = (existing folder)",
        "blue".blue(),
        "dimmed".dimmed()
    );

    let fancy_prompt = format!(
        "{} {}\n",
        "┌─".bold().bright_blue(),
        "Preview".bold().bright_blue(),
    );

    println!("{}", fancy_prompt);

    print!("{}", render_tree(vfs, assets_root));

    println!("\n{}", summary(config, vfs));
}
