//! Domain enums and the version specifier shared by the manifest model and the policy engine.

use serde::Serialize;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Opaque version specifier stored as a dependency value (e.g. `^2.0.0`, `latest`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionSpec(String);

impl VersionSpec {
    pub fn new(spec: impl Into<String>) -> Self {
        Self(spec.into())
    }

    /// Caret range for a bare version: `2.0.0` becomes `^2.0.0`.
    pub fn caret(version: &str) -> Self {
        Self(format!("^{version}"))
    }

    pub fn latest() -> Self {
        Self("latest".to_owned())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for VersionSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {kind} '{value}', expected one of: {expected}")]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
    pub expected: &'static str,
}

/// One of the four dependency maps of a manifest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum DependencyClass {
    Dependencies,
    DevDependencies,
    PeerDependencies,
    OptionalDependencies,
}

impl DependencyClass {
    /// Every class, in lookup priority order.
    pub const ALL: [DependencyClass; 4] = [
        DependencyClass::Dependencies,
        DependencyClass::DevDependencies,
        DependencyClass::PeerDependencies,
        DependencyClass::OptionalDependencies,
    ];

    /// Top-level manifest key holding this class.
    pub fn key(self) -> &'static str {
        match self {
            DependencyClass::Dependencies => "dependencies",
            DependencyClass::DevDependencies => "devDependencies",
            DependencyClass::PeerDependencies => "peerDependencies",
            DependencyClass::OptionalDependencies => "optionalDependencies",
        }
    }
}

impl fmt::Display for DependencyClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Script-runner convention used when synthesizing `<manager> run <script>` commands.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PackageManager {
    #[default]
    Npm,
    Yarn,
}

impl PackageManager {
    pub fn as_str(self) -> &'static str {
        match self {
            PackageManager::Npm => "npm",
            PackageManager::Yarn => "yarn",
        }
    }

    /// Command prefix that runs a named package script.
    pub fn run_prefix(self) -> &'static str {
        match self {
            PackageManager::Npm => "npm run",
            PackageManager::Yarn => "yarn run",
        }
    }

    /// Render `<manager> run <script>`.
    pub fn run_script(self, script: &str) -> String {
        format!("{} {script}", self.run_prefix())
    }

    /// The convention this one migrates away from.
    pub fn other(self) -> Self {
        match self {
            PackageManager::Npm => PackageManager::Yarn,
            PackageManager::Yarn => PackageManager::Npm,
        }
    }
}

impl fmt::Display for PackageManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PackageManager {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "npm" => Ok(PackageManager::Npm),
            "yarn" => Ok(PackageManager::Yarn),
            _ => Err(UnknownVariant {
                kind: "package manager",
                value: s.to_owned(),
                expected: "npm, yarn",
            }),
        }
    }
}
