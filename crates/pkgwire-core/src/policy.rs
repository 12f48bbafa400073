use crate::placement::{
    locate_dependency, update_protect_dependency, update_scanner_dependency, ManagedDependency,
};
use crate::predicate::{is_protecting, is_testing};
use crate::script::{add_protect_script, add_test_script, DEFAULT_PROTECT_HOOK};
use crate::CoreError;
use pkgwire_schema::{DependencyClass, Manifest, PackageManager};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;
use tracing::info;

/// Which behavior `add` wires into the manifest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PolicyKind {
    /// Run `snyk test` as part of `npm test`.
    Test,
    /// Run `snyk-protect` from a publish/install lifecycle hook.
    Protect,
}

impl PolicyKind {
    pub fn as_str(self) -> &'static str {
        match self {
            PolicyKind::Test => "test",
            PolicyKind::Protect => "protect",
        }
    }
}

impl fmt::Display for PolicyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PolicyKind {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "test" => Ok(PolicyKind::Test),
            "protect" => Ok(PolicyKind::Protect),
            other => Err(CoreError::InvalidPolicyKind(other.to_owned())),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AddOptions {
    /// Scanner version; dependency placement only runs when set.
    pub version: Option<String>,
    /// Requested protect hook, used when neither `prepare` nor `prepublish` exists.
    pub script_name: Option<String>,
    pub package_manager: PackageManager,
}

impl AddOptions {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_version(mut self, version: &str) -> Self {
        self.version = Some(version.to_owned());
        self
    }

    #[must_use]
    pub fn with_script_name(mut self, script_name: &str) -> Self {
        self.script_name = Some(script_name.to_owned());
        self
    }

    #[must_use]
    pub fn with_package_manager(mut self, package_manager: PackageManager) -> Self {
        self.package_manager = package_manager;
        self
    }
}

/// Apply the policy named by `kind` to `manifest`.
///
/// `kind` is validated before anything is touched, so an unknown kind leaves
/// the manifest unchanged. Applying the same arguments twice yields the same
/// manifest as applying them once.
pub fn add(manifest: &mut Manifest, kind: &str, options: &AddOptions) -> Result<(), CoreError> {
    let kind: PolicyKind = kind.parse()?;
    apply(manifest, kind, options);
    Ok(())
}

pub fn apply(manifest: &mut Manifest, kind: PolicyKind, options: &AddOptions) {
    let manager = options.package_manager;
    info!("applying {kind} policy ({manager})");

    match kind {
        PolicyKind::Protect => {
            let requested = options
                .script_name
                .as_deref()
                .unwrap_or(DEFAULT_PROTECT_HOOK);
            add_protect_script(manifest, requested, manager);
        }
        PolicyKind::Test => add_test_script(manifest),
    }

    if let Some(version) = options.version.as_deref() {
        let protecting = is_protecting(manifest, manager);
        update_protect_dependency(manifest, protecting);
        let testing = is_testing(manifest);
        update_scanner_dependency(manifest, testing, version);
    }
}

/// Snapshot of what a manifest currently has wired in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PolicyStatus {
    pub testing: bool,
    pub protecting: bool,
    pub scanner: Option<DependencyClass>,
    pub protect: Option<DependencyClass>,
}

pub fn status(manifest: &Manifest, manager: PackageManager) -> PolicyStatus {
    PolicyStatus {
        testing: is_testing(manifest),
        protecting: is_protecting(manifest, manager),
        scanner: locate_dependency(manifest, ManagedDependency::Scanner.name()),
        protect: locate_dependency(manifest, ManagedDependency::Protect.name()),
    }
}
