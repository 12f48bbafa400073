//! Applying `add` twice must leave the manifest exactly as applying it once.

use pkgwire_core::{add, AddOptions};
use pkgwire_schema::{Manifest, PackageManager};
use serde_json::{json, Value};

fn starting_points() -> Vec<Value> {
    vec![
        json!({}),
        json!({ "name": "empty" }),
        json!({ "scripts": { "test": "echo \"Error: no test specified\" && exit 1" } }),
        json!({ "scripts": { "test": "jest", "prepublish": "npm run build" } }),
        json!({ "scripts": { "prepare": "npm run test", "prepublish": "npm run build" } }),
        json!({ "scripts": { "prepublish": "npm run snyk-protect && npm run build" } }),
        json!({ "scripts": { "prepare": "yarn run snyk-protect" } }),
        json!({ "scripts": { "postinstall": "node x.js && npm run snyk-protect" } }),
        json!({ "scripts": { "postinstall": "yarn run snyk-protect" } }),
        json!({
            "scripts": { "test": " && snyk test" },
            "devDependencies": { "snyk": "1.0.0" },
            "optionalDependencies": { "snyk": "1.0.0", "@snyk/protect": "1.0.0" }
        }),
        json!({
            "peerDependencies": { "snyk": "1.0.0" },
            "dependencies": { "@snyk/protect": "1.0.0" }
        }),
        json!({ "scripts": null, "dependencies": "broken" }),
    ]
}

fn option_sets() -> Vec<AddOptions> {
    let base = AddOptions::new().with_version("2.0.0");
    vec![
        AddOptions::new(),
        base.clone(),
        base.clone().with_package_manager(PackageManager::Yarn),
        base.clone().with_script_name("postinstall"),
        base.with_script_name("prepack")
            .with_package_manager(PackageManager::Yarn),
    ]
}

#[test]
fn add_is_idempotent() {
    for start in starting_points() {
        for kind in ["test", "protect"] {
            for opts in option_sets() {
                let mut once = Manifest::try_from(start.clone()).unwrap();
                add(&mut once, kind, &opts).unwrap();

                let mut twice = once.clone();
                add(&mut twice, kind, &opts).unwrap();

                assert_eq!(
                    once, twice,
                    "not idempotent: start={start} kind={kind} opts={opts:?}"
                );
            }
        }
    }
}

#[test]
fn mixed_sequences_settle() {
    let opts = AddOptions::new().with_version("2.0.0");
    for start in starting_points() {
        let mut m = Manifest::try_from(start.clone()).unwrap();
        add(&mut m, "test", &opts).unwrap();
        add(&mut m, "protect", &opts).unwrap();
        let settled = m.clone();

        add(&mut m, "test", &opts).unwrap();
        add(&mut m, "protect", &opts).unwrap();
        assert_eq!(m, settled, "sequence did not settle from {start}");
    }
}
