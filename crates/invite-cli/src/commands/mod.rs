pub mod check;
pub mod manifest;
pub mod simulate;
pub mod split;

use invite_core::AssetManifest;

/// Manifest for `pages` flipbook pages; zero pages is a usage error.
fn manifest_for(pages: u32) -> Result<AssetManifest, String> {
    if pages == 0 {
        return Err("the flipbook needs at least one page".into());
    }
    Ok(AssetManifest::for_pages(pages))
}
