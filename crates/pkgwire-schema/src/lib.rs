//! Manifest document model and domain types for pkgwire.
//!
//! This crate defines the schema layer: the order-preserving `package.json`
//! document (`Manifest`) with typed accessors for `scripts` and the four
//! dependency classes, JSON loading and atomic writing, and the small enums
//! shared by the policy engine (`DependencyClass`, `PackageManager`).

pub mod manifest;
pub mod types;

pub use manifest::{
    parse_manifest_file, parse_manifest_str, write_manifest_file, Manifest, ManifestError,
    MARKER_KEY, SCRIPTS_KEY,
};
pub use types::{DependencyClass, PackageManager, UnknownVariant, VersionSpec};
