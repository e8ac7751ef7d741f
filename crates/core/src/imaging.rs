//! Upload normalization for project and gallery images.
//!
//! Every stored image slot has a fixed pixel size. After an upload has been
//! written to its final storage path, [`normalize_image`] crops it to the
//! slot's aspect ratio around the centre, resizes it to the exact target
//! size and overwrites the file in place.
//!
//! The re-encoded output is written to a sibling temporary file and renamed
//! over the original, so a failure at any stage leaves the upload untouched.

use std::fs::File;
use std::io::{BufWriter, ErrorKind};
use std::path::{Path, PathBuf};

use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::{CompressionType, FilterType as PngFilterType, PngEncoder};
use image::imageops::{self, FilterType};
use image::{ExtendedColorType, ImageEncoder, ImageReader, RgbImage};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// JPEG quality used when re-encoding non-PNG uploads.
pub const JPEG_QUALITY: u8 = 90;

/// Project listing card image (57:40).
pub const LISTING_SIZE: TargetSize = TargetSize::new(570, 400);

/// Project hero and banner images (2:1).
pub const HERO_SIZE: TargetSize = TargetSize::new(1170, 585);

/// Project gallery images (3:2).
pub const GALLERY_SIZE: TargetSize = TargetSize::new(1170, 780);

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Exact output dimensions in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TargetSize {
    pub width: u32,
    pub height: u32,
}

impl TargetSize {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// Image slots that are normalized on save.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageSlot {
    Listing,
    Main,
    BannerOne,
    BannerTwo,
    Gallery,
}

impl ImageSlot {
    /// The four project-level slots, in form order.
    pub const PROJECT_SLOTS: [ImageSlot; 4] = [
        ImageSlot::Listing,
        ImageSlot::Main,
        ImageSlot::BannerOne,
        ImageSlot::BannerTwo,
    ];

    pub fn target_size(self) -> TargetSize {
        match self {
            ImageSlot::Listing => LISTING_SIZE,
            ImageSlot::Main | ImageSlot::BannerOne | ImageSlot::BannerTwo => HERO_SIZE,
            ImageSlot::Gallery => GALLERY_SIZE,
        }
    }

    /// Media sub-directory uploads for this slot are stored under.
    pub fn upload_dir(self) -> &'static str {
        match self {
            ImageSlot::Listing => "projects/listing",
            ImageSlot::Main => "projects/main",
            ImageSlot::BannerOne | ImageSlot::BannerTwo => "projects/banners",
            ImageSlot::Gallery => "projects/gallery",
        }
    }

    /// Form / column name of the slot.
    pub fn field_name(self) -> &'static str {
        match self {
            ImageSlot::Listing => "listing_image",
            ImageSlot::Main => "main_image",
            ImageSlot::BannerOne => "banner_image_one",
            ImageSlot::BannerTwo => "banner_image_two",
            ImageSlot::Gallery => "image",
        }
    }
}

/// Region of the source image kept by the crop-to-fill step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CropRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// Output encoding, chosen from the file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Png,
    Jpeg,
}

impl OutputFormat {
    /// `.png` (any case) stays lossless; every other extension becomes JPEG.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("png") => OutputFormat::Png,
            _ => OutputFormat::Jpeg,
        }
    }
}

// ---------------------------------------------------------------------------
// Error
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum NormalizeError {
    /// Nothing exists at the given path.
    #[error("Image file not found: {0}")]
    Missing(PathBuf),

    /// The file could not be decoded or re-encoded.
    #[error("Image codec error: {0}")]
    Codec(#[from] image::ImageError),

    #[error("Image I/O error: {0}")]
    Io(#[from] std::io::Error),
}

// ---------------------------------------------------------------------------
// Geometry
// ---------------------------------------------------------------------------

/// Compute the centred crop that gives `src` the aspect ratio of `target`.
///
/// The longer dimension (relative to the target ratio) is trimmed equally on
/// both sides; the other dimension is kept whole. Never pads.
pub fn fit_crop(src_width: u32, src_height: u32, target: TargetSize) -> CropRect {
    let (sw, sh) = (u64::from(src_width), u64::from(src_height));
    let (tw, th) = (u64::from(target.width), u64::from(target.height));

    if sw == 0 || sh == 0 || tw == 0 || th == 0 {
        return CropRect {
            x: 0,
            y: 0,
            width: src_width,
            height: src_height,
        };
    }

    if sw * th > tw * sh {
        // Wider than the target: keep full height, trim the sides.
        let width = ((sh * tw + th / 2) / th).clamp(1, sw) as u32;
        CropRect {
            x: (src_width - width) / 2,
            y: 0,
            width,
            height: src_height,
        }
    } else if sw * th < tw * sh {
        // Taller than the target: keep full width, trim top and bottom.
        let height = ((sw * th + tw / 2) / tw).clamp(1, sh) as u32;
        CropRect {
            x: 0,
            y: (src_height - height) / 2,
            width: src_width,
            height,
        }
    } else {
        CropRect {
            x: 0,
            y: 0,
            width: src_width,
            height: src_height,
        }
    }
}

/// Crop-to-fill and resize an RGB buffer to exactly `target`.
pub fn fit_to_target(source: &RgbImage, target: TargetSize) -> RgbImage {
    let crop = fit_crop(source.width(), source.height(), target);
    let cropped = imageops::crop_imm(source, crop.x, crop.y, crop.width, crop.height).to_image();

    if cropped.width() == target.width && cropped.height() == target.height {
        return cropped;
    }

    imageops::resize(&cropped, target.width, target.height, FilterType::Lanczos3)
}

// ---------------------------------------------------------------------------
// In-place normalization
// ---------------------------------------------------------------------------

/// Normalize the image stored at `path` to `target`, overwriting it.
///
/// Alpha is discarded (RGB output). The file keeps its name; the encoding
/// follows [`OutputFormat::from_path`].
pub fn normalize_image(path: &Path, target: TargetSize) -> Result<(), NormalizeError> {
    let reader = match ImageReader::open(path) {
        Ok(reader) => reader,
        Err(err) if err.kind() == ErrorKind::NotFound => {
            return Err(NormalizeError::Missing(path.to_path_buf()));
        }
        Err(err) => return Err(err.into()),
    };

    let decoded = reader.with_guessed_format()?.decode()?;
    let fitted = fit_to_target(&decoded.to_rgb8(), target);

    let tmp_path = sibling_tmp_path(path);
    match write_encoded(&tmp_path, &fitted, OutputFormat::from_path(path)) {
        Ok(()) => {}
        Err(err) => {
            let _ = std::fs::remove_file(&tmp_path);
            return Err(err);
        }
    }

    if let Err(err) = std::fs::rename(&tmp_path, path) {
        let _ = std::fs::remove_file(&tmp_path);
        return Err(err.into());
    }

    Ok(())
}

fn write_encoded(
    path: &Path,
    image: &RgbImage,
    format: OutputFormat,
) -> Result<(), NormalizeError> {
    let mut writer = BufWriter::new(File::create(path)?);

    match format {
        OutputFormat::Png => {
            let encoder = PngEncoder::new_with_quality(
                &mut writer,
                CompressionType::Best,
                PngFilterType::Adaptive,
            );
            encoder.write_image(
                image.as_raw(),
                image.width(),
                image.height(),
                ExtendedColorType::Rgb8,
            )?;
        }
        OutputFormat::Jpeg => {
            let encoder = JpegEncoder::new_with_quality(&mut writer, JPEG_QUALITY);
            encoder.write_image(
                image.as_raw(),
                image.width(),
                image.height(),
                ExtendedColorType::Rgb8,
            )?;
        }
    }

    writer.into_inner().map_err(|e| e.into_error())?.sync_all()?;
    Ok(())
}

fn sibling_tmp_path(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("upload");
    path.with_file_name(format!(".{name}.{}.tmp", uuid::Uuid::new_v4().simple()))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use image::{GenericImageView, Rgb, Rgba, RgbaImage};

    fn solid(width: u32, height: u32, color: [u8; 3]) -> RgbImage {
        RgbImage::from_pixel(width, height, Rgb(color))
    }

    fn dims(path: &Path) -> (u32, u32) {
        image::open(path).unwrap().dimensions()
    }

    #[test]
    fn slot_sizes() {
        assert_eq!(ImageSlot::Listing.target_size(), TargetSize::new(570, 400));
        assert_eq!(ImageSlot::Main.target_size(), TargetSize::new(1170, 585));
        assert_eq!(ImageSlot::BannerOne.target_size(), TargetSize::new(1170, 585));
        assert_eq!(ImageSlot::BannerTwo.target_size(), TargetSize::new(1170, 585));
        assert_eq!(ImageSlot::Gallery.target_size(), TargetSize::new(1170, 780));
    }

    #[test]
    fn crop_wide_source_trims_sides_symmetrically() {
        let crop = fit_crop(4000, 1000, TargetSize::new(1170, 585));
        assert_eq!(
            crop,
            CropRect {
                x: 1000,
                y: 0,
                width: 2000,
                height: 1000
            }
        );
    }

    #[test]
    fn crop_tall_source_trims_top_and_bottom_symmetrically() {
        let crop = fit_crop(600, 1000, TargetSize::new(1170, 780));
        assert_eq!(
            crop,
            CropRect {
                x: 0,
                y: 300,
                width: 600,
                height: 400
            }
        );
    }

    #[test]
    fn crop_matching_ratio_keeps_everything() {
        let crop = fit_crop(1140, 800, TargetSize::new(570, 400));
        assert_eq!(
            crop,
            CropRect {
                x: 0,
                y: 0,
                width: 1140,
                height: 800
            }
        );
    }

    #[test]
    fn fit_produces_exact_target_for_many_sources() {
        let sources = [(10, 10), (3000, 200), (200, 3000), (1171, 586), (1, 1), (640, 480)];
        for slot in [ImageSlot::Listing, ImageSlot::Main, ImageSlot::Gallery] {
            let target = slot.target_size();
            for (w, h) in sources {
                let out = fit_to_target(&solid(w, h, [10, 20, 30]), target);
                assert_eq!(
                    (out.width(), out.height()),
                    (target.width, target.height),
                    "source {w}x{h} for {slot:?}"
                );
            }
        }
    }

    #[test]
    fn wide_source_keeps_centre_band() {
        // Red outer thirds, green centre third. A square target keeps only the centre.
        let mut src = solid(300, 100, [255, 0, 0]);
        for x in 100..200 {
            for y in 0..100 {
                src.put_pixel(x, y, Rgb([0, 255, 0]));
            }
        }
        let out = fit_to_target(&src, TargetSize::new(50, 50));
        for (x, y) in [(0, 0), (49, 0), (0, 49), (49, 49), (25, 25)] {
            let Rgb([r, g, _]) = *out.get_pixel(x, y);
            assert!(g > 200 && r < 60, "pixel ({x},{y}) should come from the centre band");
        }
    }

    #[test]
    fn wide_source_keeps_full_height() {
        // Blue top band and yellow bottom band must both survive the crop.
        let mut src = solid(400, 100, [128, 128, 128]);
        for x in 0..400 {
            for y in 0..20 {
                src.put_pixel(x, y, Rgb([0, 0, 255]));
            }
            for y in 80..100 {
                src.put_pixel(x, y, Rgb([255, 255, 0]));
            }
        }
        let out = fit_to_target(&src, TargetSize::new(100, 100));
        let Rgb([_, _, top_b]) = *out.get_pixel(50, 5);
        let Rgb([bot_r, bot_g, bot_b]) = *out.get_pixel(50, 94);
        assert!(top_b > 200);
        assert!(bot_r > 200 && bot_g > 200 && bot_b < 60);
    }

    #[test]
    fn tall_source_keeps_full_width() {
        let mut src = solid(100, 400, [128, 128, 128]);
        for y in 0..400 {
            for x in 0..20 {
                src.put_pixel(x, y, Rgb([0, 0, 255]));
            }
            for x in 80..100 {
                src.put_pixel(x, y, Rgb([255, 255, 0]));
            }
        }
        let out = fit_to_target(&src, TargetSize::new(100, 100));
        let Rgb([_, _, left_b]) = *out.get_pixel(5, 50);
        let Rgb([right_r, _, _]) = *out.get_pixel(94, 50);
        assert!(left_b > 200);
        assert!(right_r > 200);
    }

    #[test]
    fn output_format_follows_extension() {
        assert_eq!(OutputFormat::from_path(Path::new("a/b.png")), OutputFormat::Png);
        assert_eq!(OutputFormat::from_path(Path::new("a/b.PNG")), OutputFormat::Png);
        assert_eq!(OutputFormat::from_path(Path::new("a/b.jpg")), OutputFormat::Jpeg);
        assert_eq!(OutputFormat::from_path(Path::new("a/b.webp")), OutputFormat::Jpeg);
        assert_eq!(OutputFormat::from_path(Path::new("a/b")), OutputFormat::Jpeg);
    }

    #[test]
    fn normalizes_png_in_place_and_drops_alpha() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("upload.png");
        RgbaImage::from_pixel(900, 300, Rgba([10, 200, 30, 128]))
            .save(&path)
            .unwrap();

        normalize_image(&path, LISTING_SIZE).unwrap();

        let out = image::open(&path).unwrap();
        assert_eq!(out.dimensions(), (570, 400));
        assert!(!out.color().has_alpha());
        // No temp files left behind.
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn normalizes_jpeg_in_place() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hero.jpg");
        solid(800, 1200, [90, 90, 200]).save(&path).unwrap();

        normalize_image(&path, HERO_SIZE).unwrap();

        assert_eq!(dims(&path), (1170, 585));
        let bytes = std::fs::read(&path).unwrap();
        assert_eq!(&bytes[..2], &[0xFF, 0xD8], "output should be JPEG");
    }

    #[test]
    fn normalizing_twice_keeps_dimensions() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gallery.jpeg");
        solid(2000, 900, [200, 100, 50]).save(&path).unwrap();

        normalize_image(&path, GALLERY_SIZE).unwrap();
        assert_eq!(dims(&path), (1170, 780));
        normalize_image(&path, GALLERY_SIZE).unwrap();
        assert_eq!(dims(&path), (1170, 780));
    }

    #[test]
    fn missing_file_is_reported_as_missing() {
        let dir = tempfile::tempdir().unwrap();
        let result = normalize_image(&dir.path().join("nope.jpg"), HERO_SIZE);
        assert_matches!(result, Err(NormalizeError::Missing(_)));
    }

    #[test]
    fn corrupt_file_is_left_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.jpg");
        std::fs::write(&path, b"definitely not an image").unwrap();

        let result = normalize_image(&path, HERO_SIZE);
        assert_matches!(result, Err(NormalizeError::Codec(_)));
        assert_eq!(std::fs::read(&path).unwrap(), b"definitely not an image");
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }
}
