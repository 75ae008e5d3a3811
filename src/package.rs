//! Switching to another tool package in the middle of a session.

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use log::{info, warn};

use crate::config::ToolPackage;
use crate::error::Result;
use crate::terminal::LineInput;

pub trait PackageSwitcher {
    /// Asks for and loads another package. `Ok(None)` means the operator
    /// backed out and the current package stays active.
    fn switch(&mut self, current_root: &Path) -> Result<Option<ToolPackage>>;
}

/// Prompts for a package directory on a line source.
pub struct PromptSwitcher<R, W> {
    input: R,
    output: W,
}

impl PromptSwitcher<io::Stdin, io::Stdout> {
    pub fn stdio() -> Self {
        Self::new(io::stdin(), io::stdout())
    }
}

impl<R: LineInput, W: Write> PromptSwitcher<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    pub fn output(&self) -> &W {
        &self.output
    }
}

impl<R: LineInput, W: Write> PackageSwitcher for PromptSwitcher<R, W> {
    fn switch(&mut self, current_root: &Path) -> Result<Option<ToolPackage>> {
        writeln!(self.output, "\nCurrent tool package: {}", current_root.display())?;
        write!(self.output, "New package directory (blank to cancel): ")?;
        self.output.flush()?;

        let mut line = String::new();
        self.input.read_line(&mut line)?;
        let entered = line.trim();
        if entered.is_empty() {
            return Ok(None);
        }

        let mut root = PathBuf::from(entered);
        if root.is_relative() {
            root = current_root.join(root);
        }
        let package = ToolPackage::load(&root)?;
        for problem in package.tree.problems() {
            warn!("{}: {problem}", root.display());
            writeln!(self.output, "warning: {problem}")?;
        }
        info!("switched to tool package {}", root.display());
        Ok(Some(package))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MENU_FILE;
    use crate::error::NavError;
    use crate::test_support::scratch_dir;
    use std::fs;
    use std::io::Cursor;

    #[test]
    fn test_blank_line_cancels() {
        let mut switcher = PromptSwitcher::new(Cursor::new("\n"), Vec::new());
        assert!(switcher.switch(Path::new("/pkg")).unwrap().is_none());
        let out = String::from_utf8(switcher.output().clone()).unwrap();
        assert!(out.contains("Current tool package: /pkg"));
    }

    #[test]
    fn test_relative_path_is_resolved_from_current_package() {
        let base = scratch_dir("switch_relative");
        let next = base.join("next");
        fs::create_dir_all(&next).unwrap();
        fs::write(
            next.join(MENU_FILE),
            r#"{"main": {"items": [{"id": 1, "type": "submenu", "submenu": "gone"}]}}"#,
        )
        .unwrap();

        let mut switcher = PromptSwitcher::new(Cursor::new("next\n"), Vec::new());
        let package = switcher.switch(&base).unwrap().unwrap();
        assert_eq!(package.root, next);
        let out = String::from_utf8(switcher.output().clone()).unwrap();
        assert!(out.contains("warning: item 1 in menu 'main' points to missing menu 'gone'"));
    }

    #[test]
    fn test_load_error_is_returned() {
        let base = scratch_dir("switch_missing");
        let mut switcher = PromptSwitcher::new(Cursor::new("nowhere\n"), Vec::new());
        let err = switcher.switch(&base).unwrap_err();
        assert!(matches!(err, NavError::ConfigMissing { .. }));
    }
}
