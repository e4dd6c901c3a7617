//! Command loading from a directory of descriptor files.
//!
//! Every file below the base directory is one command: a `.toml` or `.json`
//! descriptor with at least a `name`. A load either registers all of them or
//! none.

pub mod tree;

pub use tree::{build_directory_tree, leaf_paths, render_tree, DirectoryNode};

use crate::error::{Result, TransloaderError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info};

/// A command as declared by its descriptor file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandDefinition {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub usage: Option<String>,
    #[serde(default)]
    pub aliases: Vec<String>,
    /// File the definition was read from.
    #[serde(skip)]
    pub source: PathBuf,
}

/// Commands keyed by name.
#[derive(Debug, Default)]
pub struct CommandRegistry {
    pub commands: BTreeMap<String, CommandDefinition>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, command: CommandDefinition) {
        if let Some(previous) = self.commands.get(&command.name) {
            debug!(
                "Command {} from {} replaces {}",
                command.name,
                command.source.display(),
                previous.source.display()
            );
        }
        self.commands.insert(command.name.clone(), command);
    }

    pub fn get(&self, name: &str) -> Option<&CommandDefinition> {
        self.commands.get(name)
    }

    /// Look a command up by name or alias.
    pub fn resolve(&self, name_or_alias: &str) -> Option<&CommandDefinition> {
        self.get(name_or_alias).or_else(|| {
            self.commands
                .values()
                .find(|c| c.aliases.iter().any(|a| a == name_or_alias))
        })
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

fn parse_descriptor(path: &Path) -> std::result::Result<CommandDefinition, Box<dyn std::error::Error + Send + Sync>> {
    let contents = fs::read_to_string(path)?;

    let mut command: CommandDefinition = match path.extension().and_then(|e| e.to_str()) {
        Some("toml") => toml::from_str(&contents)?,
        Some("json") => serde_json::from_str(&contents)?,
        Some(ext) => return Err(format!("unsupported descriptor extension .{}", ext).into()),
        None => return Err("descriptor has no extension".into()),
    };

    if command.name.trim().is_empty() {
        return Err("command name cannot be empty".into());
    }

    command.source = path.to_path_buf();
    Ok(command)
}

/// Read one descriptor, wrapping any failure with its path.
pub fn load_command(path: &Path) -> Result<CommandDefinition> {
    parse_descriptor(path).map_err(|source| {
        error!("Failed to load command {}: {}", path.display(), source);
        TransloaderError::ModuleLoad {
            path: path.to_path_buf(),
            source,
        }
    })
}

/// Register every command under `base_path`, printing the tree unless `silent`.
///
/// Returns how many commands were registered.
pub fn load(registry: &mut CommandRegistry, base_path: &Path, silent: bool) -> Result<usize> {
    let tree = build_directory_tree(base_path)?;

    let commands = leaf_paths(base_path, &tree)
        .iter()
        .map(|path| load_command(path))
        .collect::<Result<Vec<_>>>()?;

    let count = commands.len();
    for command in commands {
        registry.register(command);
    }
    info!("Loaded {} commands from {}", count, base_path.display());

    if !silent {
        print!("{}", render_tree(&tree));
    }

    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn command(name: &str, aliases: &[&str]) -> CommandDefinition {
        CommandDefinition {
            name: name.to_string(),
            description: None,
            usage: None,
            aliases: aliases.iter().map(|a| a.to_string()).collect(),
            source: PathBuf::from(format!("{}.toml", name)),
        }
    }

    #[test]
    fn test_registry_register_and_resolve() {
        let mut registry = CommandRegistry::new();
        registry.register(command("translate", &["tr", "t"]));
        registry.register(command("ping", &[]));

        assert_eq!(registry.len(), 2);
        assert_eq!(registry.resolve("tr").unwrap().name, "translate");
        assert_eq!(registry.resolve("ping").unwrap().name, "ping");
        assert!(registry.resolve("pong").is_none());
    }

    #[test]
    fn test_registry_same_name_replaces() {
        let mut registry = CommandRegistry::new();
        registry.register(command("ping", &[]));
        let mut newer = command("ping", &["p"]);
        newer.source = PathBuf::from("sub/ping.toml");
        registry.register(newer);

        assert_eq!(registry.len(), 1);
        assert_eq!(registry.get("ping").unwrap().source, PathBuf::from("sub/ping.toml"));
    }

    #[test]
    fn test_descriptor_deserialize_defaults() {
        let command: CommandDefinition = toml::from_str("name = \"ping\"").unwrap();
        assert_eq!(command.name, "ping");
        assert!(command.description.is_none());
        assert!(command.aliases.is_empty());
    }

    #[test]
    fn test_descriptor_requires_name() {
        assert!(toml::from_str::<CommandDefinition>("description = \"no name\"").is_err());
        assert!(serde_json::from_str::<CommandDefinition>("{\"usage\": \"x\"}").is_err());
    }
}
