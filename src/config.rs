//! Tool package loading: the menu tree, the navigator settings and the
//! optional architecture picker, all stored as JSON next to the tools.
//!
//! A package directory looks like:
//!
//! ```text
//! <root>/menu.json         required
//! <root>/settings.json     optional, defaults apply
//! <root>/arch_picker.json  optional, built-in picker used when absent
//! ```

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use clap::ValueEnum;
use log::{debug, info};
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::arch::ArchTag;
use crate::error::{NavError, Result};
use crate::menu::{MenuTree, ROOT_MENU};

pub const MENU_FILE: &str = "menu.json";
pub const SETTINGS_FILE: &str = "settings.json";
pub const ARCH_PICKER_FILE: &str = "arch_picker.json";

pub const DEFAULT_ARROW_INDICATOR: &str = "> ";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, ValueEnum)]
pub enum InputMethod {
    #[default]
    #[serde(rename = "num_input")]
    #[value(name = "num")]
    Numeric,
    #[serde(rename = "arrow_input")]
    #[value(name = "arrow")]
    Arrow,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub input_method: InputMethod,
    pub display_clear: bool,
    pub arch_picker: bool,
    pub arrow_indicator: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            input_method: InputMethod::Numeric,
            display_clear: false,
            arch_picker: false,
            arrow_indicator: DEFAULT_ARROW_INDICATOR.to_string(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct ArchPicker {
    #[serde(default = "default_picker_title")]
    pub title: String,
    pub options: Vec<ArchOption>,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct ArchOption {
    pub id: u32,
    pub display: String,
    pub value: ArchTag,
}

fn default_picker_title() -> String {
    "Select architecture".to_string()
}

impl Default for ArchPicker {
    fn default() -> Self {
        let options = ArchTag::CONCRETE
            .iter()
            .zip(1..)
            .map(|(tag, id)| ArchOption {
                id,
                display: tag.to_string(),
                value: *tag,
            })
            .collect();
        Self {
            title: default_picker_title(),
            options,
        }
    }
}

impl ArchPicker {
    pub fn option(&self, id: u32) -> Option<&ArchOption> {
        self.options.iter().find(|option| option.id == id)
    }
}

/// Everything the navigator needs from one package directory.
#[derive(Clone, Debug)]
pub struct ToolPackage {
    pub root: PathBuf,
    pub tree: MenuTree,
    pub settings: Settings,
    pub arch_picker: ArchPicker,
}

impl ToolPackage {
    pub fn load(root: &Path) -> Result<Self> {
        let menu_path = root.join(MENU_FILE);
        let tree: MenuTree = read_json(&menu_path)?;
        if tree.is_empty() {
            return Err(NavError::ConfigInvalid {
                path: menu_path,
                reason: "no menus defined".to_string(),
            });
        }
        if !tree.has_root() {
            return Err(NavError::ConfigInvalid {
                path: menu_path,
                reason: format!("no '{ROOT_MENU}' menu defined"),
            });
        }

        let settings: Settings =
            read_optional_json(&root.join(SETTINGS_FILE))?.unwrap_or_default();
        let arch_picker: ArchPicker =
            read_optional_json(&root.join(ARCH_PICKER_FILE))?.unwrap_or_default();
        info!(
            "Loaded tool package {} ({} menus, input {:?})",
            root.display(),
            tree.len(),
            settings.input_method
        );
        Ok(Self {
            root: root.to_path_buf(),
            tree,
            settings,
            arch_picker,
        })
    }

    /// Assembles a package from already-parsed parts.
    pub fn from_parts(root: impl Into<PathBuf>, tree: MenuTree, settings: Settings) -> Self {
        Self {
            root: root.into(),
            tree,
            settings,
            arch_picker: ArchPicker::default(),
        }
    }

    pub fn with_arch_picker(mut self, picker: ArchPicker) -> Self {
        self.arch_picker = picker;
        self
    }
}

pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let data = fs::read_to_string(path).map_err(|err| match err.kind() {
        io::ErrorKind::NotFound => NavError::ConfigMissing {
            path: path.to_path_buf(),
        },
        _ => NavError::Io(err),
    })?;
    serde_json::from_str(&data).map_err(|source| NavError::ConfigParse {
        path: path.to_path_buf(),
        source,
    })
}

fn read_optional_json<T: DeserializeOwned>(path: &Path) -> Result<Option<T>> {
    match read_json(path) {
        Ok(value) => Ok(Some(value)),
        Err(NavError::ConfigMissing { .. }) => {
            debug!("{} not present, using defaults", path.display());
            Ok(None)
        }
        Err(err) => Err(err),
    }
}

/// Per-user state location.
pub struct AppPaths {
    pub log_file: PathBuf,
}

impl AppPaths {
    pub fn new() -> anyhow::Result<Self> {
        use anyhow::Context;

        let home = dirs::home_dir().context("Unable to determine home directory")?;
        let state_dir = home.join(".local/toolnav");
        fs::create_dir_all(&state_dir)
            .with_context(|| format!("Unable to create {}", state_dir.display()))?;
        Ok(Self {
            log_file: state_dir.join("toolnav.log"),
        })
    }
}
