//! Host architecture probing and the normalized tags used to pick
//! per-architecture tool builds.

use std::fmt;
use std::str::FromStr;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
pub enum ArchTag {
    #[serde(rename = "X86_64")]
    #[value(name = "x86_64")]
    X86_64,
    #[serde(rename = "X86")]
    #[value(name = "x86")]
    X86,
    #[serde(rename = "ARM64")]
    #[value(name = "arm64")]
    Arm64,
    #[serde(rename = "ARM32")]
    #[value(name = "arm32")]
    Arm32,
    #[serde(rename = "Unknown")]
    #[value(name = "unknown")]
    Unknown,
}

impl ArchTag {
    /// Tags a tool package can actually ship binaries for.
    pub const CONCRETE: [ArchTag; 4] =
        [ArchTag::X86_64, ArchTag::X86, ArchTag::Arm64, ArchTag::Arm32];

    pub fn as_str(self) -> &'static str {
        match self {
            ArchTag::X86_64 => "X86_64",
            ArchTag::X86 => "X86",
            ArchTag::Arm64 => "ARM64",
            ArchTag::Arm32 => "ARM32",
            ArchTag::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for ArchTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ArchTag {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "x86_64" | "amd64" | "x64" => Ok(ArchTag::X86_64),
            "x86" | "i386" | "i686" => Ok(ArchTag::X86),
            "arm64" | "aarch64" => Ok(ArchTag::Arm64),
            "arm32" | "arm" | "armv7" => Ok(ArchTag::Arm32),
            "unknown" => Ok(ArchTag::Unknown),
            other => Err(format!("unrecognized architecture '{other}'")),
        }
    }
}

/// Maps a Rust target architecture name onto a tag.
pub fn from_target_arch(arch: &str) -> ArchTag {
    match arch {
        "x86_64" => ArchTag::X86_64,
        "x86" => ArchTag::X86,
        "aarch64" => ArchTag::Arm64,
        "arm" => ArchTag::Arm32,
        _ => ArchTag::Unknown,
    }
}

pub fn detect() -> ArchTag {
    let tag = from_target_arch(std::env::consts::ARCH);
    log::debug!("host architecture {} -> {tag}", std::env::consts::ARCH);
    tag
}
