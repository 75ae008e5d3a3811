//! The navigation state machine: a stack of menu ids, driven one
//! selection at a time.

use std::io::{self, Write};

use log::{debug, info, warn};

use crate::arch::ArchTag;
use crate::config::{Settings, ToolPackage};
use crate::error::NavError;
use crate::executor::{self, ToolLauncher};
use crate::menu::{ExecPath, ItemKind, ROOT_MENU};
use crate::package::PackageSwitcher;
use crate::select::{MenuView, SelectionResult, Selector};

/// Menu ids from the root to the current menu. Never empty; the bottom
/// entry is always the root menu.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NavigationStack {
    ids: Vec<String>,
}

impl Default for NavigationStack {
    fn default() -> Self {
        Self::new()
    }
}

impl NavigationStack {
    pub fn new() -> Self {
        Self {
            ids: vec![ROOT_MENU.to_string()],
        }
    }

    pub fn current(&self) -> &str {
        self.ids.last().map(String::as_str).unwrap_or(ROOT_MENU)
    }

    pub fn ids(&self) -> &[String] {
        &self.ids
    }

    pub fn depth(&self) -> usize {
        self.ids.len()
    }

    pub fn push(&mut self, id: impl Into<String>) {
        self.ids.push(id.into());
    }

    /// Drops the current menu. Returns false, leaving the stack alone, when
    /// already at the root.
    pub fn pop(&mut self) -> bool {
        if self.ids.len() > 1 {
            self.ids.pop();
            true
        } else {
            false
        }
    }

    pub fn reset(&mut self) {
        self.ids.truncate(1);
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

enum PickerOutcome {
    Chosen(ArchTag),
    Cancelled,
    Home,
    Quit,
}

pub struct Navigator<L, W> {
    package: ToolPackage,
    stack: NavigationStack,
    host_arch: ArchTag,
    launcher: L,
    console: W,
    notice: Option<String>,
}

impl<L: ToolLauncher, W: Write> Navigator<L, W> {
    pub fn new(package: ToolPackage, host_arch: ArchTag, launcher: L, console: W) -> Self {
        Self {
            package,
            stack: NavigationStack::new(),
            host_arch,
            launcher,
            console,
            notice: None,
        }
    }

    pub fn stack(&self) -> &NavigationStack {
        &self.stack
    }

    pub fn package(&self) -> &ToolPackage {
        &self.package
    }

    pub fn launcher(&self) -> &L {
        &self.launcher
    }

    pub fn console(&self) -> &W {
        &self.console
    }

    /// Runs until the operator quits. The selector is rebuilt from the
    /// active settings before every screen, so a package switch can change
    /// the input method.
    pub fn run<F>(
        &mut self,
        switcher: &mut dyn PackageSwitcher,
        mut selector_for: F,
    ) -> io::Result<()>
    where
        F: FnMut(&Settings) -> Box<dyn Selector>,
    {
        loop {
            let mut selector = selector_for(&self.package.settings);
            if self.step(selector.as_mut(), switcher)? == Flow::Quit {
                info!("leaving navigator at menu '{}'", self.stack.current());
                return Ok(());
            }
        }
    }

    /// Shows the current menu once and acts on the answer.
    pub fn step(
        &mut self,
        selector: &mut dyn Selector,
        switcher: &mut dyn PackageSwitcher,
    ) -> io::Result<Flow> {
        let view = match self.package.tree.get(self.stack.current()) {
            Some(menu) => MenuView::from_menu(menu).with_notice(self.notice.take()),
            None if self.stack.depth() > 1 => {
                let missing = self.stack.current().to_string();
                self.report(&NavError::InvalidSelection(format!(
                    "menu '{missing}' is not defined in this package"
                )));
                self.stack.reset();
                return Ok(Flow::Continue);
            }
            None => {
                let message = format!("no '{ROOT_MENU}' menu to show");
                warn!("{message}");
                writeln!(self.console, "! {message}")?;
                self.console.flush()?;
                return Ok(Flow::Quit);
            }
        };

        match selector.select(&view)? {
            SelectionResult::Item(id) => return self.dispatch_item(id, selector),
            SelectionResult::Back | SelectionResult::QuitToParent => self.go_back(),
            SelectionResult::Home => self.go_home(),
            SelectionResult::SwitchPackage => self.switch_package(switcher)?,
            SelectionResult::Quit => return Ok(Flow::Quit),
        }
        Ok(Flow::Continue)
    }

    fn dispatch_item(&mut self, id: u32, selector: &mut dyn Selector) -> io::Result<Flow> {
        let item = self
            .package
            .tree
            .get(self.stack.current())
            .and_then(|menu| menu.item(id))
            .cloned();
        let Some(item) = item else {
            self.report(&NavError::InvalidSelection(format!(
                "there is no entry {id} in this menu"
            )));
            return Ok(Flow::Continue);
        };

        match &item.kind {
            ItemKind::Submenu { submenu } => {
                if self.package.tree.contains(submenu) {
                    debug!("entering menu '{submenu}'");
                    self.stack.push(submenu.as_str());
                } else {
                    self.report(&NavError::InvalidSelection(format!(
                        "menu '{submenu}' is not defined in this package"
                    )));
                }
            }
            ItemKind::Executable { path, args } => {
                return self.run_tool(item.display_label(), path, args, selector)
            }
            ItemKind::Back => self.go_back(),
            ItemKind::Main => self.go_home(),
        }
        Ok(Flow::Continue)
    }

    fn run_tool(
        &mut self,
        label: &str,
        path: &ExecPath,
        args: &[String],
        selector: &mut dyn Selector,
    ) -> io::Result<Flow> {
        let arch = if self.package.settings.arch_picker {
            match self.pick_architecture(selector)? {
                PickerOutcome::Chosen(tag) => tag,
                PickerOutcome::Cancelled => return Ok(Flow::Continue),
                PickerOutcome::Home => {
                    self.go_home();
                    return Ok(Flow::Continue);
                }
                PickerOutcome::Quit => return Ok(Flow::Quit),
            }
        } else {
            self.host_arch
        };

        match executor::prepare(path, args, arch, &self.package.root) {
            Ok(command) => {
                info!("running '{label}' for {arch}");
                // The exit code has already been shown to the operator.
                let _ = self.launcher.launch(&command);
            }
            Err(err) => self.report(&err),
        }
        Ok(Flow::Continue)
    }

    fn pick_architecture(&mut self, selector: &mut dyn Selector) -> io::Result<PickerOutcome> {
        let picker = MenuView::from_arch_picker(&self.package.arch_picker);
        loop {
            let view = picker.clone().with_notice(self.notice.take());
            match selector.select(&view)? {
                SelectionResult::Item(id) => match self.package.arch_picker.option(id) {
                    Some(option) => return Ok(PickerOutcome::Chosen(option.value)),
                    None => self.report(&NavError::InvalidSelection(format!(
                        "there is no architecture option {id}"
                    ))),
                },
                SelectionResult::Back | SelectionResult::QuitToParent => {
                    return Ok(PickerOutcome::Cancelled)
                }
                SelectionResult::Home => return Ok(PickerOutcome::Home),
                SelectionResult::Quit => return Ok(PickerOutcome::Quit),
                SelectionResult::SwitchPackage => self.report_message(
                    "leave the architecture picker before switching packages",
                ),
            }
        }
    }

    fn switch_package(&mut self, switcher: &mut dyn PackageSwitcher) -> io::Result<()> {
        match switcher.switch(&self.package.root) {
            Ok(Some(package)) => {
                self.package = package;
                self.stack.reset();
            }
            Ok(None) => debug!("package switch cancelled"),
            Err(err) => self.report(&err),
        }
        Ok(())
    }

    fn go_back(&mut self) {
        if !self.stack.pop() {
            debug!("already at the root menu");
        }
    }

    fn go_home(&mut self) {
        self.stack.reset();
    }

    /// Queues `err` for the next screen, which draws it after any clear.
    fn report(&mut self, err: &NavError) {
        self.report_message(&err.to_string());
    }

    fn report_message(&mut self, message: &str) {
        warn!("{message}");
        self.notice = Some(message.to_string());
    }
}
