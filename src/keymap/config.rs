//! YAML init files
//!
//! An init file holds the key handler settings and an ordered list of
//! binding and copy directives. It is both the configuration format and the
//! serialization format of a populated [`KeyMapStore`].

use std::collections::BTreeSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::action::CommandRegistry;
use super::binding::KeySpec;
use super::mode::Mode;
use super::store::KeyMapStore;
use super::types::join_tokens;
use crate::config::KeyHandlerConfig;

/// Default init file embedded at compile time
pub const DEFAULT_INIT_YAML: &str = include_str!("../../init.yaml");

const GENERATED_HEADER: &str = "# ================ keyseq init file ================\n";

/// Root structure of an init file
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct InitFile {
    #[serde(flatten)]
    pub config: KeyHandlerConfig,
    #[serde(default)]
    pub bindings: Vec<BindingEntry>,
}

/// One directive of the `bindings` list, applied in file order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BindingEntry {
    Bind(BindingConfig),
    Copy { copy: CopyConfig },
}

/// A binding entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BindingConfig {
    pub mode: String,
    pub keys: KeysConfig,
    pub command: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub no_repeat: bool,
}

fn is_false(b: &bool) -> bool {
    !*b
}

/// `keys: "C-x C-s"` or `keys: ["j", "C-n"]`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum KeysConfig {
    One(String),
    Many(Vec<String>),
}

impl KeysConfig {
    fn to_spec(&self) -> Result<KeySpec, KeymapError> {
        let spec = match self {
            KeysConfig::One(keys) => KeySpec::from(keys.as_str()),
            KeysConfig::Many(list) => KeySpec::many(list),
        };
        let sequences = spec.sequences();
        if sequences.is_empty() || sequences.iter().any(|seq| seq.is_empty()) {
            return Err(KeymapError::InvalidKey(format!("{:?}", self)));
        }
        Ok(spec)
    }
}

/// A `copy: {from, to}` directive
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CopyConfig {
    pub from: String,
    pub to: String,
}

fn parse_mode(mode: &str) -> Result<Mode, KeymapError> {
    mode.parse::<Mode>()
        .map_err(|_| KeymapError::InvalidMode(mode.to_string()))
}

impl InitFile {
    /// Apply every directive to `store`, resolving commands through `registry`
    ///
    /// Stops at the first invalid entry; entries before it stay applied.
    pub fn apply(&self, store: &mut KeyMapStore, registry: &CommandRegistry) -> Result<(), KeymapError> {
        for entry in &self.bindings {
            match entry {
                BindingEntry::Bind(binding) => {
                    let mode = parse_mode(&binding.mode)?;
                    let spec = binding.keys.to_spec()?;
                    let action = registry
                        .action(&binding.command)
                        .ok_or_else(|| KeymapError::InvalidCommand(binding.command.clone()))?
                        .with_description(binding.description.clone().unwrap_or_default())
                        .no_repeat(binding.no_repeat);
                    store.bind(mode, spec, action);
                }
                BindingEntry::Copy { copy } => {
                    let from = parse_mode(&copy.from)?;
                    let to = parse_mode(&copy.to)?;
                    store.copy_mode(from, to);
                }
            }
        }
        tracing::debug!(entries = self.bindings.len(), "Applied init file");
        Ok(())
    }

    /// Every command name the bindings refer to, sorted
    pub fn command_names(&self) -> Vec<&str> {
        self.bindings
            .iter()
            .filter_map(|entry| match entry {
                BindingEntry::Bind(binding) => Some(binding.command.as_str()),
                BindingEntry::Copy { .. } => None,
            })
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }
}

/// Load an init file from disk
pub fn load_init_file(path: &Path) -> Result<InitFile, KeymapError> {
    let content = std::fs::read_to_string(path).map_err(|e| KeymapError::IoError(e.to_string()))?;

    parse_init_yaml(&content)
}

/// Parse an init file from a YAML string
pub fn parse_init_yaml(yaml: &str) -> Result<InitFile, KeymapError> {
    serde_yaml::from_str(yaml).map_err(|e| KeymapError::ParseError(e.to_string()))
}

/// Pick the init file to use
///
/// Loading order (first hit wins):
/// 1. `path`, when given (errors are returned)
/// 2. User config at ~/.config/keyseq/init.yaml
/// 3. The embedded default init file
pub fn load_init(path: Option<&Path>) -> Result<InitFile, KeymapError> {
    if let Some(path) = path {
        let init = load_init_file(path)?;
        tracing::info!("Loaded init file from {}", path.display());
        return Ok(init);
    }

    if let Some(user_path) = crate::config_paths::init_file() {
        if user_path.exists() {
            match load_init_file(&user_path) {
                Ok(init) => {
                    tracing::info!("Loaded user init file from {}", user_path.display());
                    return Ok(init);
                }
                Err(e) => {
                    tracing::warn!(
                        "Failed to load user init file from {}: {}, using defaults",
                        user_path.display(),
                        e
                    );
                }
            }
        }
    }

    let init = parse_init_yaml(DEFAULT_INIT_YAML)?;
    tracing::info!("Loaded embedded default init file ({} entries)", init.bindings.len());
    Ok(init)
}

/// Serialize the settings and every bound leaf as an init file
///
/// One binding entry per leaf, depth-first, modes in Global, View, Edit,
/// Caret order. Copies are not reconstructed: aliased sub-tries show up as
/// plain bindings in every mode that reaches them.
pub fn generate_init_file(config: &KeyHandlerConfig, store: &KeyMapStore) -> Result<String, KeymapError> {
    let mut bindings = Vec::new();
    for mode in Mode::ALL {
        for leaf in store.leaves(mode) {
            let description = leaf.action.description();
            bindings.push(BindingEntry::Bind(BindingConfig {
                mode: mode.name().to_string(),
                keys: KeysConfig::One(join_tokens(&leaf.keys)),
                command: leaf.action.name().to_string(),
                description: (!description.is_empty()).then(|| description.to_string()),
                no_repeat: leaf.action.is_no_repeat(),
            }));
        }
    }

    let init = InitFile {
        config: config.clone(),
        bindings,
    };
    let body = serde_yaml::to_string(&init).map_err(|e| KeymapError::SerializeError(e.to_string()))?;
    Ok(format!("{}{}", GENERATED_HEADER, body))
}

/// Errors that can occur when loading or writing init files
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeymapError {
    IoError(String),
    ParseError(String),
    InvalidKey(String),
    InvalidCommand(String),
    InvalidMode(String),
    SerializeError(String),
}

impl std::fmt::Display for KeymapError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            KeymapError::IoError(e) => write!(f, "IO error: {}", e),
            KeymapError::ParseError(e) => write!(f, "Parse error: {}", e),
            KeymapError::InvalidKey(k) => write!(f, "Invalid key: {}", k),
            KeymapError::InvalidCommand(c) => write!(f, "Invalid command: {}", c),
            KeymapError::InvalidMode(m) => write!(f, "Invalid mode: {}", m),
            KeymapError::SerializeError(e) => write!(f, "Serialize error: {}", e),
        }
    }
}

impl std::error::Error for KeymapError {}
