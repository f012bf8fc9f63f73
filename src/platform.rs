//! Target platform model: operating system, architecture, and the mapping to
//! concrete target triples.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

/// Target operating system for a measurement build
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetOs {
    /// Linux (GNU userland)
    Linux,
    /// macOS
    Macos,
    /// Windows (GNU toolchain, cross-compilable without MSVC)
    Windows,
}

impl TargetOs {
    /// Get the OS name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Linux => "linux",
            Self::Macos => "macos",
            Self::Windows => "windows",
        }
    }

    /// The operating system depcost itself is running on
    pub fn host() -> Self {
        match std::env::consts::OS {
            "macos" => Self::Macos,
            "windows" => Self::Windows,
            _ => Self::Linux,
        }
    }
}

impl fmt::Display for TargetOs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TargetOs {
    type Err = PlatformParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "linux" => Ok(Self::Linux),
            "macos" | "darwin" => Ok(Self::Macos),
            "windows" => Ok(Self::Windows),
            _ => Err(PlatformParseError::UnknownOs(s.to_string())),
        }
    }
}

/// Target CPU architecture for a measurement build
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetArch {
    /// 64-bit x86
    #[serde(rename = "x86_64")]
    X86_64,
    /// 64-bit ARM
    Aarch64,
}

impl TargetArch {
    /// Get the architecture name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::X86_64 => "x86_64",
            Self::Aarch64 => "aarch64",
        }
    }

    /// The architecture depcost itself is running on
    pub fn host() -> Self {
        match std::env::consts::ARCH {
            "aarch64" => Self::Aarch64,
            _ => Self::X86_64,
        }
    }
}

impl fmt::Display for TargetArch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TargetArch {
    type Err = PlatformParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "x86_64" | "amd64" => Ok(Self::X86_64),
            "aarch64" | "arm64" => Ok(Self::Aarch64),
            _ => Err(PlatformParseError::UnknownArch(s.to_string())),
        }
    }
}

/// Error parsing an OS or architecture name
#[derive(thiserror::Error, Debug)]
pub enum PlatformParseError {
    /// OS name not recognized
    #[error("unknown target OS '{0}' (expected linux, macos, or windows)")]
    UnknownOs(String),

    /// Architecture name not recognized
    #[error("unknown target architecture '{0}' (expected x86_64/amd64 or aarch64/arm64)")]
    UnknownArch(String),
}

/// One (OS, architecture) pair targeted by a single build
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Platform {
    /// Target operating system
    pub os: TargetOs,
    /// Target architecture
    pub arch: TargetArch,
}

impl Platform {
    /// Create a platform from an OS and architecture
    pub fn new(os: TargetOs, arch: TargetArch) -> Self {
        Self { os, arch }
    }

    /// The platform depcost itself is running on
    pub fn host() -> Self {
        Self::new(TargetOs::host(), TargetArch::host())
    }

    /// The target triple passed to the toolchain for this platform
    pub fn triple(&self) -> &'static str {
        match (self.os, self.arch) {
            (TargetOs::Linux, TargetArch::X86_64) => "x86_64-unknown-linux-gnu",
            (TargetOs::Linux, TargetArch::Aarch64) => "aarch64-unknown-linux-gnu",
            (TargetOs::Macos, TargetArch::X86_64) => "x86_64-apple-darwin",
            (TargetOs::Macos, TargetArch::Aarch64) => "aarch64-apple-darwin",
            (TargetOs::Windows, TargetArch::X86_64) => "x86_64-pc-windows-gnu",
            (TargetOs::Windows, TargetArch::Aarch64) => "aarch64-pc-windows-gnullvm",
        }
    }

    /// Suffix appended to executable names on this platform
    pub fn exe_suffix(&self) -> &'static str {
        match self.os {
            TargetOs::Windows => ".exe",
            _ => "",
        }
    }

    /// Directory-name-safe label, e.g. `linux-x86_64`
    pub fn slug(&self) -> String {
        format!("{}-{}", self.os, self.arch)
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.os, self.arch)
    }
}
