use std::fs::File;
use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use log::{info, warn};
use simplelog::{ConfigBuilder, LevelFilter, WriteLogger};

use toolnav::arch::{self, ArchTag};
use toolnav::config::{AppPaths, InputMethod, ToolPackage};
use toolnav::executor::ProcessLauncher;
use toolnav::navigator::Navigator;
use toolnav::package::PromptSwitcher;
use toolnav::select;

#[derive(Parser)]
#[command(name = "toolnav", about = "Menu launcher for architecture-specific tool packages")]
struct Args {
    /// Tool package directory (defaults to the current directory)
    #[arg(short, long)]
    package: Option<PathBuf>,

    /// Override the package's input method
    #[arg(short, long, value_enum)]
    input: Option<InputMethod>,

    /// Launch builds for this architecture instead of the detected one
    #[arg(long, value_enum)]
    arch: Option<ArchTag>,

    /// Verbosity of ~/.local/toolnav/toolnav.log (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let level = args.log_level.parse().unwrap_or_else(|_| {
        eprintln!("unknown log level '{}', using info", args.log_level);
        LevelFilter::Info
    });
    init_logging(level);

    let root = match args.package {
        Some(path) => path,
        None => std::env::current_dir().context("Unable to determine current directory")?,
    };
    let package = ToolPackage::load(&root)
        .with_context(|| format!("Unable to load tool package at {}", root.display()))?;
    for problem in package.tree.problems() {
        warn!("{problem}");
        eprintln!("warning: {problem}");
    }

    let host_arch = args.arch.unwrap_or_else(arch::detect);
    info!("toolnav starting in {} for {host_arch}", root.display());

    let input_override = args.input;
    let mut navigator = Navigator::new(package, host_arch, ProcessLauncher::new(), io::stdout());
    navigator.run(&mut PromptSwitcher::stdio(), |settings| {
        select::build(input_override.unwrap_or(settings.input_method), settings)
    })?;
    Ok(())
}

/// The terminal belongs to the menu, so logs go to a file.
fn init_logging(level: LevelFilter) {
    let paths = match AppPaths::new() {
        Ok(paths) => paths,
        Err(err) => {
            eprintln!("logging disabled: {err:#}");
            return;
        }
    };
    let log_config = ConfigBuilder::new().set_time_format_rfc3339().build();
    if let Ok(log_file) = File::create(&paths.log_file) {
        let _ = WriteLogger::init(level, log_config, log_file);
    }
}
