//! Lifecycle script synthesis: where a directive goes and how it is merged into
//! whatever the script already runs.

use crate::predicate::protect_invocation;
use pkgwire_schema::{Manifest, PackageManager};
use tracing::debug;

pub const TEST_SCRIPT: &str = "test";
pub const TEST_COMMAND: &str = "snyk test";
/// What `npm init` writes when no test runner was configured.
pub const NPM_TEST_PLACEHOLDER: &str = "echo \"Error: no test specified\" && exit 1";

/// Name of the script that runs the protection step, and its command.
pub const PROTECT_SCRIPT: &str = "snyk-protect";
pub const PROTECT_STEP: &str = "snyk-protect";

pub const POSTINSTALL_SCRIPT: &str = "postinstall";
/// Hooks that win over the requested hook when already defined, first match first.
pub const PROTECT_HOOK_PREFERENCE: [&str; 2] = ["prepare", "prepublish"];
pub const DEFAULT_PROTECT_HOOK: &str = "prepare";

pub const COMMAND_SEPARATOR: &str = " && ";
/// Shell no-op swapped in for a protect invocation left in `postinstall`.
pub const LEGACY_NOOP: &str = "true";

/// Prepend `cmd` to an existing command line unless it is already in there.
pub fn merge_command(existing: Option<&str>, cmd: &str) -> String {
    match existing {
        Some(current) if !current.is_empty() => {
            if current.contains(cmd) {
                current.to_owned()
            } else {
                format!("{cmd}{COMMAND_SEPARATOR}{current}")
            }
        }
        _ => cmd.to_owned(),
    }
}

pub fn add_test_script(manifest: &mut Manifest) {
    let next = match manifest.script(TEST_SCRIPT) {
        Some(current) if !current.is_empty() && current != NPM_TEST_PLACEHOLDER => {
            merge_command(Some(current), TEST_COMMAND)
        }
        _ => TEST_COMMAND.to_owned(),
    };
    debug!("test script: {next}");
    manifest.set_script(TEST_SCRIPT, next);
}

/// Pick the lifecycle script that hosts the protect invocation.
///
/// An existing `prepare` or `prepublish` script overrides `requested`, so a
/// project that already customized one of them keeps using it.
pub fn resolve_protect_hook<'a>(manifest: &Manifest, requested: &'a str) -> &'a str {
    PROTECT_HOOK_PREFERENCE
        .into_iter()
        .find(|hook| manifest.has_script(hook))
        .unwrap_or(requested)
}

/// Wire the protect step into the manifest's lifecycle scripts.
///
/// Migrates an invocation written for the other package manager, adds the
/// invocation if missing, defuses the legacy `postinstall` variant and marks
/// the manifest. Always returns `true`.
pub fn add_protect_script(
    manifest: &mut Manifest,
    requested_script: &str,
    manager: PackageManager,
) -> bool {
    let hook = resolve_protect_hook(manifest, requested_script).to_owned();
    let cmd = protect_invocation(manager);
    debug!("protect hook: '{hook}' (requested '{requested_script}')");

    let stale = protect_invocation(manager.other());
    if let Some(current) = manifest.script(&hook) {
        if current.contains(&stale) {
            let migrated = current.replace(&stale, &cmd);
            debug!("migrating '{hook}' from {} to {manager}", manager.other());
            manifest.set_script(&hook, migrated);
        }
    }

    let already_protecting = manifest.script_or_empty(&hook).contains(&cmd);
    if already_protecting {
        // partially applied earlier: the hook runs a script that no longer exists
        if !manifest.has_script(PROTECT_SCRIPT) {
            manifest.set_script(PROTECT_SCRIPT, PROTECT_STEP);
        }
    } else {
        manifest.set_script(PROTECT_SCRIPT, PROTECT_STEP);
        let merged = merge_command(manifest.script(&hook), &cmd);
        debug!("{hook} script: {merged}");
        manifest.set_script(&hook, merged);
    }

    if hook != POSTINSTALL_SCRIPT {
        if let Some(postinstall) = manifest.script(POSTINSTALL_SCRIPT) {
            if postinstall.contains(&cmd) {
                let defused = postinstall.replace(&cmd, LEGACY_NOOP);
                debug!("defusing legacy postinstall protect: {defused}");
                manifest.set_script(POSTINSTALL_SCRIPT, defused);
            }
        }
    }

    manifest.set_marker();
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn manifest(value: serde_json::Value) -> Manifest {
        Manifest::try_from(value).unwrap()
    }

    #[test]
    fn merge_prepends_with_separator() {
        assert_eq!(
            merge_command(Some("npm run build"), "npm run snyk-protect"),
            "npm run snyk-protect && npm run build"
        );
    }

    #[test]
    fn merge_into_absent_or_empty_is_bare_command() {
        assert_eq!(merge_command(None, "snyk test"), "snyk test");
        assert_eq!(merge_command(Some(""), "snyk test"), "snyk test");
    }

    #[test]
    fn merge_skips_duplicates() {
        assert_eq!(
            merge_command(Some("jest; snyk test"), "snyk test"),
            "jest; snyk test"
        );
    }

    #[test]
    fn test_script_created_when_missing() {
        let mut m = Manifest::new();
        add_test_script(&mut m);
        assert_eq!(m.into_value(), json!({ "scripts": { "test": "snyk test" } }));
    }

    #[test]
    fn test_script_replaces_npm_placeholder() {
        let mut m = manifest(json!({ "scripts": { "test": NPM_TEST_PLACEHOLDER } }));
        add_test_script(&mut m);
        assert_eq!(m.script("test"), Some("snyk test"));
    }

    #[test]
    fn test_script_prepends_to_existing_runner() {
        let mut m = manifest(json!({ "scripts": { "test": "jest --ci" } }));
        add_test_script(&mut m);
        assert_eq!(m.script("test"), Some("snyk test && jest --ci"));
        add_test_script(&mut m);
        assert_eq!(m.script("test"), Some("snyk test && jest --ci"));
    }

    #[test]
    fn test_script_left_alone_when_already_scanning() {
        let mut m = manifest(json!({ "scripts": { "test": " && snyk test" } }));
        add_test_script(&mut m);
        assert_eq!(m.script("test"), Some(" && snyk test"));
    }

    #[test]
    fn protect_defaults_to_requested_hook() {
        let mut m = Manifest::new();
        assert!(add_protect_script(&mut m, DEFAULT_PROTECT_HOOK, PackageManager::Npm));
        assert_eq!(
            m.into_value(),
            json!({
                "scripts": {
                    "snyk-protect": "snyk-protect",
                    "prepare": "npm run snyk-protect"
                },
                "snyk": true
            })
        );
    }

    #[test]
    fn existing_prepublish_wins_over_requested_hook() {
        let mut m = manifest(json!({ "scripts": { "prepublish": "npm run build" } }));
        add_protect_script(&mut m, "prepare", PackageManager::Npm);
        assert_eq!(
            m.script("prepublish"),
            Some("npm run snyk-protect && npm run build")
        );
        assert!(!m.has_script("prepare"));
    }

    #[test]
    fn prepare_wins_over_prepublish() {
        let mut m = manifest(json!({
            "scripts": { "prepublish": "npm run build", "prepare": "npm run test" }
        }));
        add_protect_script(&mut m, "prepare", PackageManager::Npm);
        assert_eq!(m.script("prepare"), Some("npm run snyk-protect && npm run test"));
        assert_eq!(m.script("prepublish"), Some("npm run build"));
    }

    #[test]
    fn custom_hook_used_when_no_preferred_hook_exists() {
        let mut m = Manifest::new();
        add_protect_script(&mut m, "prepack", PackageManager::Yarn);
        assert_eq!(m.script("prepack"), Some("yarn run snyk-protect"));
        assert!(!m.has_script("prepare"));
    }

    #[test]
    fn migrates_npm_invocation_to_yarn_in_place() {
        let mut m = manifest(json!({
            "scripts": {
                "snyk-protect": "snyk-protect",
                "prepublish": "npm run lint && npm run snyk-protect && npm run build"
            }
        }));
        add_protect_script(&mut m, "prepare", PackageManager::Yarn);
        assert_eq!(
            m.script("prepublish"),
            Some("npm run lint && yarn run snyk-protect && npm run build")
        );
    }

    #[test]
    fn restores_missing_protect_step_script() {
        let mut m = manifest(json!({ "scripts": { "prepare": "npm run snyk-protect" } }));
        add_protect_script(&mut m, "prepare", PackageManager::Npm);
        assert_eq!(m.script("snyk-protect"), Some("snyk-protect"));
        assert_eq!(m.script("prepare"), Some("npm run snyk-protect"));
    }

    #[test]
    fn legacy_postinstall_invocation_is_defused() {
        let mut m = manifest(json!({
            "scripts": { "postinstall": "node setup.js && npm run snyk-protect" }
        }));
        add_protect_script(&mut m, "prepare", PackageManager::Npm);
        assert_eq!(m.script("postinstall"), Some("node setup.js && true"));
        assert_eq!(m.script("prepare"), Some("npm run snyk-protect"));
    }

    #[test]
    fn postinstall_as_requested_hook_is_kept() {
        let mut m = Manifest::new();
        add_protect_script(&mut m, "postinstall", PackageManager::Npm);
        add_protect_script(&mut m, "postinstall", PackageManager::Npm);
        assert_eq!(m.script("postinstall"), Some("npm run snyk-protect"));
    }

    #[test]
    fn marker_set_even_without_changes() {
        let mut m = manifest(json!({
            "scripts": { "snyk-protect": "snyk-protect", "prepare": "npm run snyk-protect" }
        }));
        add_protect_script(&mut m, "prepare", PackageManager::Npm);
        assert!(m.marker());
    }
}
