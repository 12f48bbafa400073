pub mod add;
pub mod generate;
pub mod status;

use pkgwire_schema::{DependencyClass, PackageManager};
use std::path::Path;
use tracing::debug;

pub const EXIT_SUCCESS: u8 = 0;
pub const EXIT_FAILURE: u8 = 1;
pub const EXIT_MANIFEST_ERROR: u8 = 2;
pub const EXIT_INVALID_POLICY: u8 = 3;

const YARN_LOCKFILE: &str = "yarn.lock";

pub fn json_pretty(value: &impl serde::Serialize) -> Result<String, String> {
    serde_json::to_string_pretty(value).map_err(|e| format!("JSON serialization failed: {e}"))
}

/// Explicit choice wins; otherwise yarn when a `yarn.lock` sits next to the manifest.
pub fn resolve_package_manager(
    manifest_path: &Path,
    explicit: Option<PackageManager>,
) -> PackageManager {
    if let Some(manager) = explicit {
        return manager;
    }
    let dir = manifest_path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let manager = if dir.join(YARN_LOCKFILE).is_file() {
        PackageManager::Yarn
    } else {
        PackageManager::Npm
    };
    debug!("detected package manager {manager} for {}", manifest_path.display());
    manager
}

pub fn colorize_flag(on: bool) -> String {
    use console::Style;
    if on {
        Style::new().green().apply_to("yes").to_string()
    } else {
        Style::new().dim().apply_to("no").to_string()
    }
}

pub fn describe_class(class: Option<DependencyClass>) -> String {
    class.map_or_else(|| "(not declared)".to_owned(), |c| c.to_string())
}
