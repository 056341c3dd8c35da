use std::path::Path;

use colored::Colorize;

/// Fail unless every manifest file exists under `dir`.
pub fn run(dir: &Path, pages: u32) -> Result<(), String> {
    let manifest = super::manifest_for(pages)?;

    let missing: Vec<_> = manifest
        .assets()
        .iter()
        .filter(|asset| !dir.join(&asset.path).is_file())
        .collect();

    for asset in &missing {
        println!("  {} {} ({})", "MISSING".red().bold(), asset.path, asset.role);
    }

    if missing.is_empty() {
        println!(
            "  All {} assets present in '{}'.",
            manifest.len(),
            dir.display()
        );
        Ok(())
    } else {
        Err(format!(
            "{} of {} assets missing",
            missing.len(),
            manifest.len()
        ))
    }
}
