//! Policy engine that wires `snyk test` and `snyk-protect` into a `package.json`.
//!
//! Everything here operates on an exclusively borrowed [`Manifest`] and never
//! touches the disk: predicates answer whether a manifest is already testing or
//! protecting, the script engine merges commands into lifecycle scripts, the
//! placement resolver keeps each managed dependency in exactly one dependency
//! class, and [`add`] sequences the three. Every operation is idempotent.
//!
//! [`Manifest`]: pkgwire_schema::Manifest

pub mod placement;
pub mod policy;
pub mod predicate;
pub mod script;

pub use placement::{
    locate_dependency, place_dependency, place_dependency_with, remove_dependency_everywhere,
    update_protect_dependency, update_scanner_dependency, ManagedDependency, PlacementRule,
};
pub use policy::{add, apply, status, AddOptions, PolicyKind, PolicyStatus};
pub use predicate::{is_protecting, is_testing, protect_invocation};
pub use script::{add_protect_script, add_test_script, merge_command, resolve_protect_hook};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("invalid policy kind '{0}': must specify type [protect | test]")]
    InvalidPolicyKind(String),
}
