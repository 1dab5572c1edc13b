use super::ResourceKey;

/// Opaque handle to a GPU texture owned by a [`TextureDevice`].
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct TextureId(u32);

impl TextureId {
    #[inline]
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

/// 8-bit-per-channel pixel layouts accepted for upload.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum PixelFormat {
    R8,
    Rg8,
    Rgb8,
    Rgba8,
}

impl PixelFormat {
    /// Maps a decoded channel count (1..=4) to a format.
    pub fn from_channels(channels: u8) -> Option<Self> {
        match channels {
            1 => Some(PixelFormat::R8),
            2 => Some(PixelFormat::Rg8),
            3 => Some(PixelFormat::Rgb8),
            4 => Some(PixelFormat::Rgba8),
            _ => None,
        }
    }

    #[inline]
    pub fn channels(self) -> usize {
        match self {
            PixelFormat::R8 => 1,
            PixelFormat::Rg8 => 2,
            PixelFormat::Rgb8 => 3,
            PixelFormat::Rgba8 => 4,
        }
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum TextureFilter {
    Nearest,
    Linear,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum TextureAddress {
    ClampToEdge,
    Repeat,
}

/// Upload parameters for a 2D texture.
#[derive(Debug, Clone, PartialEq)]
pub struct TextureDesc {
    pub label: String,
    pub width: u32,
    pub height: u32,
    pub format: PixelFormat,
    pub filter: TextureFilter,
    pub address: TextureAddress,
}

impl TextureDesc {
    /// Expected byte length of tightly packed pixel data.
    #[inline]
    pub fn byte_len(&self) -> usize {
        self.width as usize * self.height as usize * self.format.channels()
    }
}

/// Texture upload surface used by the resource cache.
///
/// Implemented over wgpu by `render::GpuTextures`; tests use a counting fake.
pub trait TextureDevice {
    /// Creates a texture and uploads `pixels` (tightly packed, `desc.format`).
    fn create_texture(&mut self, desc: &TextureDesc, pixels: &[u8]) -> TextureId;

    /// Releases a texture. Unknown ids are ignored.
    fn destroy_texture(&mut self, id: TextureId);

    /// Largest width or height [`create_texture`](Self::create_texture) accepts.
    fn max_texture_dimension(&self) -> u32 {
        u32::MAX
    }
}

/// A decoded, uploaded texture.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct Texture {
    pub key: ResourceKey,
    pub width: u32,
    pub height: u32,
    pub format: PixelFormat,
    pub id: TextureId,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn channel_counts_round_trip() {
        for n in 1..=4u8 {
            let f = PixelFormat::from_channels(n).unwrap();
            assert_eq!(f.channels(), n as usize);
        }
        assert!(PixelFormat::from_channels(0).is_none());
        assert!(PixelFormat::from_channels(5).is_none());
    }

    #[test]
    fn byte_len_accounts_for_channels() {
        let desc = TextureDesc {
            label: "t".into(),
            width: 3,
            height: 2,
            format: PixelFormat::Rgb8,
            filter: TextureFilter::Linear,
            address: TextureAddress::Repeat,
        };
        assert_eq!(desc.byte_len(), 18);
    }
}
