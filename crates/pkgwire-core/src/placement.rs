//! Dependency placement: keeps each managed dependency declared in exactly one
//! dependency class, or in none when its policy is inactive.

use pkgwire_schema::{DependencyClass, Manifest, VersionSpec};
use serde_json::Value;
use tracing::debug;

/// How the target class for an active dependency is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlacementRule {
    /// Always this class; declarations elsewhere are moved here.
    Fixed(DependencyClass),
    /// Wherever the dependency is already declared, else the given class.
    PreferExisting(DependencyClass),
}

impl PlacementRule {
    pub fn target(self, found: Option<DependencyClass>) -> DependencyClass {
        match self {
            PlacementRule::Fixed(class) => class,
            PlacementRule::PreferExisting(default) => found.unwrap_or(default),
        }
    }
}

/// The two dependencies whose placement follows the active policies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ManagedDependency {
    /// The `snyk` CLI, needed while `scripts.test` runs `snyk test`.
    Scanner,
    /// `@snyk/protect`, needed at install/publish time by the protect hook.
    Protect,
}

impl ManagedDependency {
    pub fn name(self) -> &'static str {
        match self {
            ManagedDependency::Scanner => "snyk",
            ManagedDependency::Protect => "@snyk/protect",
        }
    }

    pub fn rule(self) -> PlacementRule {
        match self {
            ManagedDependency::Scanner => {
                PlacementRule::PreferExisting(DependencyClass::DevDependencies)
            }
            ManagedDependency::Protect => PlacementRule::Fixed(DependencyClass::Dependencies),
        }
    }
}

/// First class, in priority order, that declares `name`.
pub fn locate_dependency(manifest: &Manifest, name: &str) -> Option<DependencyClass> {
    DependencyClass::ALL.into_iter().find(|class| {
        manifest
            .dependency_class(*class)
            .is_some_and(|deps| deps.contains_key(name))
    })
}

fn remove_from(manifest: &mut Manifest, class: DependencyClass, name: &str) -> bool {
    manifest
        .dependency_class_existing_mut(class)
        .and_then(|deps| deps.shift_remove(name))
        .is_some()
}

/// Drop `name` from every class. Class objects stay, even when left empty.
pub fn remove_dependency_everywhere(manifest: &mut Manifest, name: &str) {
    for class in DependencyClass::ALL {
        if remove_from(manifest, class, name) {
            debug!("removed {name} from {class}");
        }
    }
}

pub fn place_dependency_with(
    manifest: &mut Manifest,
    name: &str,
    spec: &VersionSpec,
    active: bool,
    rule: PlacementRule,
) {
    if !active {
        remove_dependency_everywhere(manifest, name);
        return;
    }

    let found = locate_dependency(manifest, name);
    let target = rule.target(found);
    for class in DependencyClass::ALL.into_iter().filter(|c| *c != target) {
        if remove_from(manifest, class, name) {
            debug!("moved {name} from {class} to {target}");
        }
    }
    debug!("placing {name}@{spec} in {target}");
    manifest
        .dependency_class_mut(target)
        .insert(name.to_owned(), Value::String(spec.to_string()));
}

pub fn place_dependency(
    manifest: &mut Manifest,
    dependency: ManagedDependency,
    spec: &VersionSpec,
    active: bool,
) {
    place_dependency_with(manifest, dependency.name(), spec, active, dependency.rule());
}

/// Place `snyk` at `^version` while testing, remove it otherwise.
pub fn update_scanner_dependency(manifest: &mut Manifest, testing: bool, version: &str) {
    place_dependency(
        manifest,
        ManagedDependency::Scanner,
        &VersionSpec::caret(version),
        testing,
    );
}

/// Place `@snyk/protect` at `latest` while protecting, remove it otherwise.
pub fn update_protect_dependency(manifest: &mut Manifest, protecting: bool) {
    place_dependency(
        manifest,
        ManagedDependency::Protect,
        &VersionSpec::latest(),
        protecting,
    );
}
