use std::path::{Path, PathBuf};

use thiserror::Error;

use super::PixelFormat;

#[derive(Error, Debug)]
pub enum TextureLoadError {
    #[error("failed to decode '{path}': {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error("'{path}' has {channels} channels; only 1 to 4 are supported")]
    UnsupportedChannels { path: PathBuf, channels: u8 },
}

/// Tightly packed 8-bit pixels ready for upload.
#[derive(Debug, Clone)]
pub struct DecodedImage {
    pub width: u32,
    pub height: u32,
    pub format: PixelFormat,
    pub pixels: Vec<u8>,
}

/// Decodes a raster file, keeping its native channel count.
///
/// Grey, grey+alpha, RGB and RGBA sources map to `R8`, `Rg8`, `Rgb8` and
/// `Rgba8`. Deeper formats (16-bit, float) are reduced to 8 bits per channel.
pub fn decode_image(path: &Path) -> Result<DecodedImage, TextureLoadError> {
    let img = image::open(path).map_err(|source| TextureLoadError::Decode {
        path: path.to_path_buf(),
        source,
    })?;

    let channels = img.color().channel_count();
    let format = PixelFormat::from_channels(channels).ok_or_else(|| {
        TextureLoadError::UnsupportedChannels {
            path: path.to_path_buf(),
            channels,
        }
    })?;

    let (width, height) = (img.width(), img.height());
    let pixels = match format {
        PixelFormat::R8 => img.into_luma8().into_raw(),
        PixelFormat::Rg8 => img.into_luma_alpha8().into_raw(),
        PixelFormat::Rgb8 => img.into_rgb8().into_raw(),
        PixelFormat::Rgba8 => img.into_rgba8().into_raw(),
    };

    Ok(DecodedImage {
        width,
        height,
        format,
        pixels,
    })
}
