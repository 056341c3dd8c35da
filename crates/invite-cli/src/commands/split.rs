use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use colored::Colorize;
use image::DynamicImage;
use image::codecs::jpeg::JpegEncoder;
use invite_core::AssetRole;

const JPEG_QUALITY: u8 = 95;

/// Rectangle cut out of the source image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Crop {
    /// Left edge.
    pub x: u32,
    /// Top edge.
    pub y: u32,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

/// Where the artwork is cut: one vertical line through the middle and one
/// horizontal line above the bottom text band.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SplitPlan {
    /// Source width.
    pub width: u32,
    /// Source height.
    pub height: u32,
    /// Column the doors part at.
    pub mid_x: u32,
    /// Rows above the text band.
    pub door_height: u32,
}

impl SplitPlan {
    /// Plan the cut, rejecting any plan with an empty piece.
    pub fn new(width: u32, height: u32, text_ratio: f64) -> Result<Self, String> {
        if !(0.1..=0.5).contains(&text_ratio) {
            return Err(format!(
                "text ratio must be between 0.1 and 0.5, got {text_ratio}"
            ));
        }
        if width < 2 || height < 2 {
            return Err(format!("image too small to split: {width}x{height}"));
        }
        let text_height = (f64::from(height) * text_ratio).floor() as u32;
        if text_height == 0 || text_height == height {
            return Err(format!(
                "image too short to split: {height}px leaves {text_height}px of text at ratio {text_ratio}"
            ));
        }
        Ok(Self {
            width,
            height,
            mid_x: width / 2,
            door_height: height - text_height,
        })
    }

    /// Height of the bottom text band.
    pub fn text_height(&self) -> u32 {
        self.height - self.door_height
    }

    /// The four pieces, each with the asset it becomes.
    pub fn pieces(&self) -> [(AssetRole, Crop); 4] {
        let left = self.mid_x;
        let right = self.width - self.mid_x;
        let top = self.door_height;
        let bottom = self.text_height();
        [
            (AssetRole::LeftDoor, Crop { x: 0, y: 0, width: left, height: top }),
            (
                AssetRole::RightDoor,
                Crop { x: self.mid_x, y: 0, width: right, height: top },
            ),
            (
                AssetRole::LeftBottomText,
                Crop { x: 0, y: top, width: left, height: bottom },
            ),
            (
                AssetRole::RightBottomText,
                Crop { x: self.mid_x, y: top, width: right, height: bottom },
            ),
        ]
    }
}

/// File the piece for `role` is written to inside `dir`.
pub fn output_path(dir: &Path, role: AssetRole) -> PathBuf {
    let path = role.path();
    let name = Path::new(&path)
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| path.clone().into());
    dir.join(name)
}

fn write_jpeg(piece: &DynamicImage, path: &Path) -> Result<(), String> {
    let file = File::create(path).map_err(|e| format!("cannot create {}: {e}", path.display()))?;
    let encoder = JpegEncoder::new_with_quality(BufWriter::new(file), JPEG_QUALITY);
    // JPEG has no alpha channel.
    piece
        .to_rgb8()
        .write_with_encoder(encoder)
        .map_err(|e| format!("cannot encode {}: {e}", path.display()))
}

/// Cut `input` into the four door pieces under `output`.
pub fn run(input: &Path, output: &Path, text_ratio: f64) -> Result<(), String> {
    let img = image::open(input).map_err(|e| format!("cannot open {}: {e}", input.display()))?;
    let plan = SplitPlan::new(img.width(), img.height(), text_ratio)?;
    tracing::info!(?plan, "splitting {}", input.display());

    fs::create_dir_all(output)
        .map_err(|e| format!("cannot create {}: {e}", output.display()))?;

    println!("  Source image size: {}x{}", plan.width, plan.height);
    println!("  Split points:");
    println!("    Horizontal: {}px", plan.mid_x);
    println!(
        "    Vertical:   {}px (door), {}px (text)",
        plan.door_height,
        plan.text_height()
    );
    println!();

    for (role, crop) in plan.pieces() {
        let piece = img.crop_imm(crop.x, crop.y, crop.width, crop.height);
        let path = output_path(output, role);
        write_jpeg(&piece, &path)?;
        println!(
            "  {} {} {}",
            "wrote".green(),
            path.display(),
            format!("({}x{})", crop.width, crop.height).dimmed()
        );
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_ratio_leaves_thirty_percent_for_text() {
        let plan = SplitPlan::new(1000, 1001, 0.3).unwrap();
        assert_eq!(plan.mid_x, 500);
        assert_eq!(plan.text_height(), 300);
        assert_eq!(plan.door_height, 701);
    }

    #[test]
    fn odd_width_gives_the_extra_column_to_the_right() {
        let plan = SplitPlan::new(801, 600, 0.3).unwrap();
        let [(_, left), (_, right), _, _] = plan.pieces();
        assert_eq!(left.width, 400);
        assert_eq!(right.width, 401);
        assert_eq!(right.x, 400);
    }

    #[test]
    fn pieces_tile_the_image() {
        let plan = SplitPlan::new(640, 480, 0.25).unwrap();
        let area: u32 = plan.pieces().iter().map(|(_, c)| c.width * c.height).sum();
        assert_eq!(area, 640 * 480);
    }

    #[test]
    fn ratio_outside_range_is_rejected() {
        assert!(SplitPlan::new(100, 100, 0.05).is_err());
        assert!(SplitPlan::new(100, 100, 0.6).is_err());
        assert!(SplitPlan::new(100, 100, 0.5).is_ok());
    }

    #[test]
    fn short_images_with_empty_text_band_are_rejected() {
        // 3 * 0.3 floors to zero rows of text.
        let err = SplitPlan::new(10, 3, 0.3).unwrap_err();
        assert!(err.contains("too short"));
        assert!(SplitPlan::new(10, 4, 0.3).is_ok());
        let plan = SplitPlan::new(10, 4, 0.5).unwrap();
        assert_eq!((plan.door_height, plan.text_height()), (2, 2));
        assert!(plan.pieces().iter().all(|(_, c)| c.width > 0 && c.height > 0));
    }

    #[test]
    fn pieces_are_named_after_assets() {
        let path = output_path(Path::new("out"), AssetRole::RightBottomText);
        assert_eq!(path, Path::new("out").join("right_bottom_text.jpeg"));
    }
}
