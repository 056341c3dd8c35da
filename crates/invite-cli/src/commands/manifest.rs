use comfy_table::{ContentArrangement, Table};

/// Print the manifest as a table.
pub fn run(pages: u32) -> Result<(), String> {
    let manifest = super::manifest_for(pages)?;

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Role", "Path"]);
    for asset in manifest.assets() {
        table.add_row(vec![asset.role.to_string(), asset.path.clone()]);
    }

    println!("{table}");
    println!();
    println!(
        "  {} images, {} sounds",
        manifest.image_count(),
        manifest.len() - manifest.image_count()
    );

    Ok(())
}
