//! Host platform identification.
//!
//! A platform is an `os/cpu` token such as `linux/amd64`. Raw names reported by
//! the host (uname-style or Rust target names) are normalized through fixed
//! allow-lists; anything outside them is rejected.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Operating systems an artifact can be declared for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Os {
    Linux,
    Darwin,
    Windows,
    DragonFly,
    FreeBsd,
}

/// CPU architectures an artifact can be declared for (canonical names).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cpu {
    Arm64,
    Arm64Be,
    Arm,
    X86,
    Amd64,
    Ppc,
    Ppc64,
    Ppc64Le,
}

/// Raw OS names (uname `system` and Rust `target_os`) to canonical OS.
const OS_ALIASES: &[(&str, Os)] = &[
    ("Linux", Os::Linux),
    ("linux", Os::Linux),
    ("Darwin", Os::Darwin),
    ("macos", Os::Darwin),
    ("Windows", Os::Windows),
    ("windows", Os::Windows),
    ("DragonFly", Os::DragonFly),
    ("dragonfly", Os::DragonFly),
    ("FreeBSD", Os::FreeBsd),
    ("freebsd", Os::FreeBsd),
];

/// Raw CPU names (uname `machine`, plus Rust `target_arch` spellings) to canonical CPU.
const CPU_ALIASES: &[(&str, Cpu)] = &[
    ("aarch64", Cpu::Arm64),
    ("aarch64_be", Cpu::Arm64Be),
    ("arm", Cpu::Arm),
    ("i386", Cpu::X86),
    ("i686", Cpu::X86),
    ("x86_64", Cpu::Amd64),
    ("AMD64", Cpu::Amd64),
    ("ppc", Cpu::Ppc),
    ("ppc64", Cpu::Ppc64),
    ("ppc64le", Cpu::Ppc64Le),
    ("x86", Cpu::X86),
    ("powerpc", Cpu::Ppc),
    ("powerpc64", Cpu::Ppc64),
];

const ALL_OS: [Os; 5] = [Os::Linux, Os::Darwin, Os::Windows, Os::DragonFly, Os::FreeBsd];

const ALL_CPU: [Cpu; 8] = [
    Cpu::Arm64,
    Cpu::Arm64Be,
    Cpu::Arm,
    Cpu::X86,
    Cpu::Amd64,
    Cpu::Ppc,
    Cpu::Ppc64,
    Cpu::Ppc64Le,
];

/// Invalid or unrecognized platform value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlatformError {
    #[error("invalid platform `{0}`, expected `<os>/<cpu>`")]
    MissingSeparator(String),
    #[error("invalid operating system `{value}`, valid values are: {}", .valid.join(","))]
    InvalidOs { value: String, valid: Vec<String> },
    #[error("invalid CPU `{value}`, valid values are: {}", .valid.join(","))]
    InvalidCpu { value: String, valid: Vec<String> },
}

impl Os {
    pub fn as_str(&self) -> &'static str {
        match self {
            Os::Linux => "linux",
            Os::Darwin => "darwin",
            Os::Windows => "windows",
            Os::DragonFly => "dragonfly",
            Os::FreeBsd => "freebsd",
        }
    }

    /// Normalize a raw host OS name (e.g. `Linux`, `macos`).
    pub fn from_raw(raw: &str) -> Result<Self, PlatformError> {
        OS_ALIASES
            .iter()
            .find(|(name, _)| *name == raw)
            .map(|(_, os)| *os)
            .ok_or_else(|| PlatformError::InvalidOs {
                value: raw.to_string(),
                valid: OS_ALIASES.iter().map(|(name, _)| name.to_string()).collect(),
            })
    }
}

impl FromStr for Os {
    type Err = PlatformError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ALL_OS
            .iter()
            .copied()
            .find(|os| os.as_str() == s)
            .ok_or_else(|| PlatformError::InvalidOs {
                value: s.to_string(),
                valid: ALL_OS.iter().map(|os| os.as_str().to_string()).collect(),
            })
    }
}

impl Cpu {
    pub fn as_str(&self) -> &'static str {
        match self {
            Cpu::Arm64 => "arm64",
            Cpu::Arm64Be => "arm64be",
            Cpu::Arm => "arm",
            Cpu::X86 => "386",
            Cpu::Amd64 => "amd64",
            Cpu::Ppc => "ppc",
            Cpu::Ppc64 => "ppc64",
            Cpu::Ppc64Le => "ppc64le",
        }
    }

    /// Normalize a raw host CPU name (e.g. `x86_64`, `aarch64`, `i686`).
    pub fn from_raw(raw: &str) -> Result<Self, PlatformError> {
        CPU_ALIASES
            .iter()
            .find(|(name, _)| *name == raw)
            .map(|(_, cpu)| *cpu)
            .ok_or_else(|| PlatformError::InvalidCpu {
                value: raw.to_string(),
                valid: CPU_ALIASES.iter().map(|(name, _)| name.to_string()).collect(),
            })
    }
}

impl FromStr for Cpu {
    type Err = PlatformError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ALL_CPU
            .iter()
            .copied()
            .find(|cpu| cpu.as_str() == s)
            .ok_or_else(|| PlatformError::InvalidCpu {
                value: s.to_string(),
                valid: ALL_CPU.iter().map(|cpu| cpu.as_str().to_string()).collect(),
            })
    }
}

/// An `os/cpu` pair. Equality is structural; there is no wildcard matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Platform {
    pub os: Os,
    pub cpu: Cpu,
}

impl Platform {
    pub fn new(os: Os, cpu: Cpu) -> Self {
        Self { os, cpu }
    }

    /// The platform this process is running on.
    pub fn host() -> Result<Self, PlatformError> {
        Self::from_raw(std::env::consts::OS, host_cpu_name())
    }

    /// Build a platform from raw host names, normalizing each through its allow-list.
    pub fn from_raw(os: &str, cpu: &str) -> Result<Self, PlatformError> {
        Ok(Self {
            os: Os::from_raw(os)?,
            cpu: Cpu::from_raw(cpu)?,
        })
    }
}

/// `std::env::consts::ARCH` does not encode endianness; refine it the way uname would.
fn host_cpu_name() -> &'static str {
    match std::env::consts::ARCH {
        "aarch64" if cfg!(target_endian = "big") => "aarch64_be",
        "powerpc64" if cfg!(target_endian = "little") => "ppc64le",
        other => other,
    }
}

impl FromStr for Platform {
    type Err = PlatformError;

    /// Parses a canonical token such as `linux/amd64`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (os, cpu) = s
            .split_once('/')
            .ok_or_else(|| PlatformError::MissingSeparator(s.to_string()))?;
        Ok(Self {
            os: os.parse()?,
            cpu: cpu.parse()?,
        })
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.os.as_str(), self.cpu.as_str())
    }
}
