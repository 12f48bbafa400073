use super::{colorize_flag, describe_class, json_pretty, resolve_package_manager, EXIT_SUCCESS};
use pkgwire_core::{apply, status, AddOptions, PolicyKind};
use pkgwire_schema::{parse_manifest_file, write_manifest_file, PackageManager};
use std::path::Path;
use tracing::info;

#[derive(Debug, Default)]
pub struct AddArgs {
    pub version: Option<String>,
    pub script: Option<String>,
    pub package_manager: Option<PackageManager>,
    pub dry_run: bool,
}

pub fn run(manifest_path: &Path, kind: &str, args: &AddArgs, json: bool) -> Result<u8, String> {
    let kind: PolicyKind = kind.parse().map_err(|e: pkgwire_core::CoreError| e.to_string())?;
    if kind == PolicyKind::Test && args.script.is_some() {
        return Err("--script only applies to the protect policy".to_owned());
    }
    let mut manifest = parse_manifest_file(manifest_path).map_err(|e| e.to_string())?;
    let manager = resolve_package_manager(manifest_path, args.package_manager);

    let mut options = AddOptions::new().with_package_manager(manager);
    if let Some(version) = args.version.as_deref() {
        options = options.with_version(version);
    }
    if let Some(script) = args.script.as_deref() {
        options = options.with_script_name(script);
    }

    let before = manifest.clone();
    apply(&mut manifest, kind, &options);
    let changed = manifest != before;

    let outcome = if args.dry_run {
        "dry-run"
    } else if changed {
        write_manifest_file(manifest_path, &manifest).map_err(|e| e.to_string())?;
        info!("wrote {}", manifest_path.display());
        "updated"
    } else {
        "unchanged"
    };

    let st = status(&manifest, manager);
    if json {
        let mut payload = serde_json::json!({
            "status": outcome,
            "manifest": manifest_path.display().to_string(),
            "policy": kind,
            "package_manager": manager,
            "testing": st.testing,
            "protecting": st.protecting,
            "scanner": st.scanner,
            "protect": st.protect,
        });
        if args.dry_run {
            payload["result"] = manifest.into_value();
        }
        println!("{}", json_pretty(&payload)?);
    } else if args.dry_run {
        print!("{}", manifest.to_json_pretty().map_err(|e| e.to_string())?);
    } else {
        println!("{outcome} {} ({kind} policy, {manager})", manifest_path.display());
        println!("testing:     {}", colorize_flag(st.testing));
        println!("protecting:  {}", colorize_flag(st.protecting));
        println!("snyk:        {}", describe_class(st.scanner));
        println!("protect dep: {}", describe_class(st.protect));
    }
    Ok(EXIT_SUCCESS)
}
