//! Turning an executable menu item into a foreground child process.

use std::fmt;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::Command;

use log::{info, warn};

use crate::arch::ArchTag;
use crate::error::{NavError, Result};
use crate::menu::{ExecPath, PathMatch};
use crate::terminal::pause;

/// A fully resolved launch: what to run, with which arguments, from where.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ToolCommand {
    pub program: PathBuf,
    pub args: Vec<String>,
    pub working_dir: PathBuf,
}

impl fmt::Display for ToolCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program.display())?;
        for arg in &self.args {
            if arg.contains(char::is_whitespace) {
                write!(f, " \"{arg}\"")?;
            } else {
                write!(f, " {arg}")?;
            }
        }
        Ok(())
    }
}

/// Resolves the build of `path` for `arch` and locates it relative to the
/// package root.
pub fn prepare(
    path: &ExecPath,
    args: &[String],
    arch: ArchTag,
    root: &Path,
) -> Result<ToolCommand> {
    let resolved = path.resolve(arch).ok_or_else(|| {
        NavError::InvalidSelection("tool has no executable path configured".to_string())
    })?;
    match resolved.matched {
        PathMatch::X86_64Fallback => {
            info!("no {arch} build of {}, using the X86_64 build", resolved.path)
        }
        PathMatch::FirstDeclared => warn!(
            "no {arch} or X86_64 build configured, falling back to {}",
            resolved.path
        ),
        PathMatch::Verbatim | PathMatch::Exact => {}
    }
    Ok(ToolCommand {
        program: locate_program(root, resolved.path),
        args: args.to_vec(),
        working_dir: root.to_path_buf(),
    })
}

/// Paths that exist under the package root are anchored to it; anything
/// else is handed to the OS as written, so bare names go through `PATH`.
fn locate_program(root: &Path, raw: &str) -> PathBuf {
    let path = Path::new(raw);
    if path.is_absolute() {
        return path.to_path_buf();
    }
    let joined = root.join(path);
    if joined.is_file() {
        joined
    } else {
        path.to_path_buf()
    }
}

/// Runs `command` to completion with the terminal's stdio inherited.
/// `Ok(None)` means the child ended without an exit code (killed by a signal).
pub fn spawn_and_wait(command: &ToolCommand) -> Result<Option<i32>> {
    let status = Command::new(&command.program)
        .args(&command.args)
        .current_dir(&command.working_dir)
        .status()
        .map_err(|source| NavError::ProcessSpawn {
            program: command.program.display().to_string(),
            source,
        })?;
    Ok(status.code())
}

/// Process boundary of the navigator.
pub trait ToolLauncher {
    /// Runs a tool and reports how it ended. Failures are handled here and
    /// never returned to the navigator.
    fn launch(&mut self, command: &ToolCommand) -> Option<i32>;
}

/// Launches tools on the real terminal, echoing the command line and the
/// exit code, then waits for the operator before the menu comes back.
#[derive(Default)]
pub struct ProcessLauncher;

impl ProcessLauncher {
    pub fn new() -> Self {
        Self
    }
}

impl ToolLauncher for ProcessLauncher {
    fn launch(&mut self, command: &ToolCommand) -> Option<i32> {
        let mut stdout = io::stdout();
        let _ = writeln!(stdout, "\n> {command}");
        let _ = writeln!(stdout, "  (in {})\n", command.working_dir.display());
        let _ = stdout.flush();
        info!("launching {command} in {}", command.working_dir.display());

        let exit_code = match spawn_and_wait(command) {
            Ok(Some(code)) => {
                if code == 0 {
                    info!("{} exited with code 0", command.program.display());
                } else {
                    warn!("{} exited with code {code}", command.program.display());
                }
                let _ = writeln!(stdout, "\nExit code: {code}");
                Some(code)
            }
            Ok(None) => {
                warn!("{} terminated by a signal", command.program.display());
                let _ = writeln!(stdout, "\nTool terminated by a signal");
                None
            }
            Err(err) => {
                warn!("{err}");
                let _ = writeln!(stdout, "{err}");
                None
            }
        };
        let _ = pause(&mut io::stdin(), &mut stdout, "Press Enter to return to the menu...");
        exit_code
    }
}
