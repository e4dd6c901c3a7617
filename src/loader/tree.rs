use crate::error::Result;
use std::fs;
use std::path::{Path, PathBuf};

/// One entry of a scanned command directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DirectoryNode {
    File(String),
    Dir {
        name: String,
        children: Vec<DirectoryNode>,
    },
}

impl DirectoryNode {
    pub fn name(&self) -> &str {
        match self {
            DirectoryNode::File(name) => name,
            DirectoryNode::Dir { name, .. } => name,
        }
    }
}

/// Scan `path` recursively. Entries are sorted by name at every level.
///
/// Symlinks are listed as files and not followed.
pub fn build_directory_tree(path: &Path) -> Result<Vec<DirectoryNode>> {
    let mut entries = Vec::new();
    for entry in fs::read_dir(path)? {
        entries.push(entry?);
    }
    entries.sort_by_key(|entry| entry.file_name());

    let mut nodes = Vec::with_capacity(entries.len());
    for entry in entries {
        let name = entry.file_name().to_string_lossy().into_owned();
        let entry_path = entry.path();

        if fs::symlink_metadata(&entry_path)?.is_dir() {
            nodes.push(DirectoryNode::Dir {
                name,
                children: build_directory_tree(&entry_path)?,
            });
        } else {
            nodes.push(DirectoryNode::File(name));
        }
    }

    Ok(nodes)
}

/// Full paths of every file in the tree, in tree order.
pub fn leaf_paths(base: &Path, tree: &[DirectoryNode]) -> Vec<PathBuf> {
    let mut paths = Vec::new();
    for node in tree {
        match node {
            DirectoryNode::File(name) => paths.push(base.join(name)),
            DirectoryNode::Dir { name, children } => {
                paths.extend(leaf_paths(&base.join(name), children));
            }
        }
    }
    paths
}

/// Draw the tree with box connectors, directories annotated with their child count.
pub fn render_tree(tree: &[DirectoryNode]) -> String {
    let mut out = String::from("/\n");
    render_level(tree, "", &mut out);
    out
}

fn render_level(nodes: &[DirectoryNode], prefix: &str, out: &mut String) {
    for (i, node) in nodes.iter().enumerate() {
        let is_last = i == nodes.len() - 1;
        out.push_str(prefix);
        out.push_str(if is_last { "└── " } else { "├── " });

        match node {
            DirectoryNode::File(name) => {
                out.push_str(name);
                out.push('\n');
            }
            DirectoryNode::Dir { name, children } => {
                out.push_str(&format!("{} ({})\n", name, children.len()));
                let child_prefix = format!("{}{}", prefix, if is_last { "    " } else { "│   " });
                render_level(children, &child_prefix, out);
            }
        }
    }
}
