//! Read-only checks used as the idempotency oracle.
//!
//! Both predicates probe script text by substring. A script that merely mentions
//! the marker inside an unrelated command is classified as testing/protecting.

use crate::script::{POSTINSTALL_SCRIPT, PROTECT_SCRIPT, TEST_COMMAND, TEST_SCRIPT};
use pkgwire_schema::{Manifest, PackageManager};

/// Lifecycle scripts inspected when deciding whether a manifest protects.
pub const PROTECTING_HOOKS: [&str; 3] = ["prepare", "prepublish", POSTINSTALL_SCRIPT];

/// `<manager> run snyk-protect`.
pub fn protect_invocation(manager: PackageManager) -> String {
    manager.run_script(PROTECT_SCRIPT)
}

pub fn is_testing(manifest: &Manifest) -> bool {
    manifest.script_or_empty(TEST_SCRIPT).contains(TEST_COMMAND)
}

pub fn is_protecting(manifest: &Manifest, manager: PackageManager) -> bool {
    let cmd = protect_invocation(manager);
    PROTECTING_HOOKS
        .iter()
        .any(|hook| manifest.script_or_empty(hook).contains(&cmd))
}
