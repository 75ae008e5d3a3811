//! Test utilities shared across the crate.
//!
//! This module is only compiled during tests (`#[cfg(test)]`).

use std::collections::VecDeque;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::config::{Settings, ToolPackage};
use crate::error::Result;
use crate::executor::{ToolCommand, ToolLauncher};
use crate::menu::MenuTree;
use crate::package::PackageSwitcher;
use crate::select::{MenuView, SelectionResult, Selector};

/// Plays back a fixed list of selections, then quits.
#[derive(Default)]
pub struct ScriptedSelector {
    script: VecDeque<SelectionResult>,
    pub seen: Vec<MenuView>,
}

impl ScriptedSelector {
    pub fn new(script: impl IntoIterator<Item = SelectionResult>) -> Self {
        Self {
            script: script.into_iter().collect(),
            seen: Vec::new(),
        }
    }

    /// Shorthand for a script of plain item picks.
    pub fn items(ids: &[u32]) -> Self {
        Self::new(ids.iter().map(|id| SelectionResult::Item(*id)))
    }

    pub fn titles(&self) -> Vec<&str> {
        self.seen.iter().map(|view| view.title.as_str()).collect()
    }
}

impl Selector for ScriptedSelector {
    fn select(&mut self, view: &MenuView) -> io::Result<SelectionResult> {
        self.seen.push(view.clone());
        Ok(self.script.pop_front().unwrap_or(SelectionResult::Quit))
    }
}

/// Records launches instead of spawning processes.
#[derive(Default)]
pub struct RecordingLauncher {
    pub launched: Vec<ToolCommand>,
    pub exit_code: Option<i32>,
}

impl ToolLauncher for RecordingLauncher {
    fn launch(&mut self, command: &ToolCommand) -> Option<i32> {
        self.launched.push(command.clone());
        self.exit_code
    }
}

/// Hands out a prepared package once, then declines.
#[derive(Default)]
pub struct StaticSwitcher {
    pub next: Option<ToolPackage>,
    pub calls: usize,
}

impl PackageSwitcher for StaticSwitcher {
    fn switch(&mut self, _current_root: &Path) -> Result<Option<ToolPackage>> {
        self.calls += 1;
        Ok(self.next.take())
    }
}

pub const GPU_TREE: &str = r#"{
    "main": {"title": "Main", "items": [
        {"id": 1, "type": "submenu", "label": "GPU", "submenu": "gpu"}
    ]},
    "gpu": {"title": "GPU", "parent": "main", "items": [
        {"id": 1, "type": "executable", "label": "FurMark", "path": "furmark"},
        {"id": 2, "type": "back", "label": "Back"}
    ]}
}"#;

pub fn package(tree_json: &str) -> ToolPackage {
    let tree = MenuTree::from_json(tree_json).expect("fixture tree parses");
    ToolPackage::from_parts("/nonexistent/toolnav-package", tree, Settings::default())
}

/// A fresh, empty directory under the system temp dir.
pub fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir()
        .join(format!("toolnav-test-{}", std::process::id()))
        .join(name);
    let _ = fs::remove_dir_all(&dir);
    fs::create_dir_all(&dir).expect("create scratch dir");
    dir
}
