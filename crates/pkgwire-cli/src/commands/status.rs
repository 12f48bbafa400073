use super::{colorize_flag, describe_class, json_pretty, resolve_package_manager, EXIT_SUCCESS};
use pkgwire_core::status;
use pkgwire_schema::{parse_manifest_file, PackageManager};
use std::path::Path;

pub fn run(
    manifest_path: &Path,
    package_manager: Option<PackageManager>,
    json: bool,
) -> Result<u8, String> {
    let manifest = parse_manifest_file(manifest_path).map_err(|e| e.to_string())?;
    let manager = resolve_package_manager(manifest_path, package_manager);
    let st = status(&manifest, manager);

    if json {
        let payload = serde_json::json!({
            "manifest": manifest_path.display().to_string(),
            "package_manager": manager,
            "marked": manifest.marker(),
            "testing": st.testing,
            "protecting": st.protecting,
            "scanner": st.scanner,
            "protect": st.protect,
        });
        println!("{}", json_pretty(&payload)?);
    } else {
        println!("manifest:    {}", manifest_path.display());
        println!("manager:     {manager}");
        println!("testing:     {}", colorize_flag(st.testing));
        println!("protecting:  {}", colorize_flag(st.protecting));
        println!("snyk:        {}", describe_class(st.scanner));
        println!("protect dep: {}", describe_class(st.protect));
    }
    Ok(EXIT_SUCCESS)
}
