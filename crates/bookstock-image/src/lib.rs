//! Bounded image decoding for display views. Instead of decoding a picked
//! image at full resolution, the source is downsampled by an integer factor
//! computed from the view dimensions, which bounds memory use. Callers map
//! any failure to "no image".

use std::{io::BufWriter, path::Path};

use fast_image_resize::{images::Image, IntoImageView as _, Resizer};
use image::{codecs::png::PngEncoder, GenericImageView, ImageEncoder as _, ImageReader};

type Result<T> = anyhow::Result<T>;

/// Integer downsample factor: `floor(min(aw/tw, ah/th))`, never below 1.
/// A zero target dimension means the view has not been measured yet; no
/// division happens and the source stays at full scale.
pub fn sample_factor(actual: (u32, u32), target: (u32, u32)) -> u32 {
    if target.0 == 0 || target.1 == 0 {
        return 1;
    }
    u32::min(actual.0 / target.0, actual.1 / target.1).max(1)
}

/// Decodes the image at `path` downsampled to fit a view of the given
/// dimensions, returning PNG bytes. The header is read first so the factor is
/// known before the pixel data is touched.
pub fn load_for_view(
    path: impl AsRef<Path> + std::fmt::Debug,
    view_width: u32,
    view_height: u32,
) -> Result<Vec<u8>> {
    let actual_dim = ImageReader::open(&path)?
        .with_guessed_format()?
        .into_dimensions()?;
    let factor = sample_factor(actual_dim, (view_width, view_height));

    let img = ImageReader::open(&path)?.with_guessed_format()?.decode()?;
    let (width, height) = (
        (actual_dim.0 / factor).max(1),
        (actual_dim.1 / factor).max(1),
    );

    if factor == 1 {
        let data = Vec::with_capacity(1024);
        let mut writer = BufWriter::new(data);
        PngEncoder::new(&mut writer).write_image(
            img.as_bytes(),
            width,
            height,
            img.color().into(),
        )?;
        return Ok(writer.into_inner()?);
    }

    let mut dst_image = Image::new(
        width,
        height,
        img.pixel_type()
            .ok_or_else(|| anyhow::anyhow!("Cannot get pixel type"))?,
    );
    let mut resizer = Resizer::new();
    resizer.resize(&img, &mut dst_image, None)?;

    let data = Vec::with_capacity(1024);
    let mut writer = BufWriter::new(data);
    PngEncoder::new(&mut writer).write_image(
        dst_image.buffer(),
        width,
        height,
        img.color().into(),
    )?;
    Ok(writer.into_inner()?)
}

#[cfg(test)]
mod tests {
    use image::{ImageFormat, RgbImage};

    use super::*;

    #[test]
    fn test_sample_factor() {
        assert_eq!(sample_factor((4000, 3000), (400, 300)), 10);
        assert_eq!(sample_factor((4000, 3000), (400, 600)), 5);
        assert_eq!(sample_factor((1000, 1000), (999, 1000)), 1);
        // Source smaller than the view never upscales the factor below 1
        assert_eq!(sample_factor((100, 100), (400, 300)), 1);
    }

    #[test]
    fn test_sample_factor_unmeasured_view() {
        assert_eq!(sample_factor((4000, 3000), (0, 300)), 1);
        assert_eq!(sample_factor((4000, 3000), (400, 0)), 1);
        assert_eq!(sample_factor((4000, 3000), (0, 0)), 1);
    }

    #[test]
    fn test_load_for_view_downsamples() {
        let dir = tempfile::tempdir().unwrap();
        let source_path = dir.path().join("cover.png");
        RgbImage::from_fn(64, 48, |x, y| image::Rgb([x as u8, y as u8, 0]))
            .save(&source_path)
            .unwrap();

        let data = load_for_view(&source_path, 16, 12).unwrap();
        let decoded = ImageReader::with_format(std::io::Cursor::new(data), ImageFormat::Png)
            .decode()
            .unwrap();
        assert_eq!(decoded.dimensions(), (16, 12));
    }

    #[test]
    fn test_load_for_view_unmeasured_view_keeps_size() {
        let dir = tempfile::tempdir().unwrap();
        let source_path = dir.path().join("cover.png");
        RgbImage::from_fn(32, 24, |_, _| image::Rgb([7, 7, 7]))
            .save(&source_path)
            .unwrap();

        let data = load_for_view(&source_path, 0, 0).unwrap();
        let decoded = ImageReader::with_format(std::io::Cursor::new(data), ImageFormat::Png)
            .decode()
            .unwrap();
        assert_eq!(decoded.dimensions(), (32, 24));
    }

    #[test]
    fn test_load_failure_is_an_error_not_a_panic() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_for_view(dir.path().join("missing.png"), 100, 100).is_err());

        let bogus = dir.path().join("bogus.png");
        std::fs::write(&bogus, b"not an image").unwrap();
        assert!(load_for_view(&bogus, 100, 100).is_err());
    }
}
