use std::borrow::Cow;
use std::collections::HashMap;

use crate::resource::{
    PixelFormat, TextureAddress, TextureDesc, TextureDevice, TextureFilter, TextureId,
};

/// One uploaded texture with the sampler its descriptor asked for.
pub(super) struct GpuTexture {
    // Kept alive for the view.
    _texture: wgpu::Texture,
    pub(super) view: wgpu::TextureView,
    pub(super) sampler: wgpu::Sampler,
}

/// Textures created through [`GpuTextures`], keyed by the ids handed out.
#[derive(Default)]
pub struct TextureStore {
    textures: HashMap<TextureId, GpuTexture>,
    next_id: u32,
    // Bumped on destroy so cached bind groups can be dropped.
    generation: u64,
}

impl TextureStore {
    #[inline]
    pub fn len(&self) -> usize {
        self.textures.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.textures.is_empty()
    }

    #[inline]
    pub(super) fn get(&self, id: TextureId) -> Option<&GpuTexture> {
        self.textures.get(&id)
    }

    #[inline]
    pub(super) fn generation(&self) -> u64 {
        self.generation
    }

    fn allocate_id(&mut self) -> TextureId {
        self.next_id = self.next_id.wrapping_add(1).max(1);
        TextureId::new(self.next_id)
    }
}

/// [`TextureDevice`] over a wgpu device, storing into a [`TextureStore`].
pub struct GpuTextures<'a> {
    device: &'a wgpu::Device,
    queue: &'a wgpu::Queue,
    store: &'a mut TextureStore,
}

impl<'a> GpuTextures<'a> {
    pub fn new(device: &'a wgpu::Device, queue: &'a wgpu::Queue, store: &'a mut TextureStore) -> Self {
        Self {
            device,
            queue,
            store,
        }
    }
}

impl TextureDevice for GpuTextures<'_> {
    fn create_texture(&mut self, desc: &TextureDesc, pixels: &[u8]) -> TextureId {
        if pixels.len() != desc.byte_len() {
            log::warn!(
                "texture '{}': {} bytes of pixel data, expected {}",
                desc.label,
                pixels.len(),
                desc.byte_len()
            );
        }

        let (format, data) = upload_layout(desc.format, pixels);
        let bytes_per_pixel = format
            .block_copy_size(None)
            .unwrap_or(4);

        let (size, within_limit) = texture_extent(desc, self.max_texture_dimension());
        if !within_limit {
            log::warn!(
                "texture '{}' is {}x{}, clamped to {}x{} without pixel data",
                desc.label,
                desc.width,
                desc.height,
                size.width,
                size.height
            );
        }

        let texture = self.device.create_texture(&wgpu::TextureDescriptor {
            label: Some(&desc.label),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        let expected = (size.width * size.height * bytes_per_pixel) as usize;
        if within_limit && data.len() >= expected {
            self.queue.write_texture(
                wgpu::TexelCopyTextureInfo {
                    texture: &texture,
                    mip_level: 0,
                    origin: wgpu::Origin3d::ZERO,
                    aspect: wgpu::TextureAspect::All,
                },
                &data[..expected],
                wgpu::TexelCopyBufferLayout {
                    offset: 0,
                    bytes_per_row: Some(size.width * bytes_per_pixel),
                    rows_per_image: Some(size.height),
                },
                size,
            );
        }

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let sampler = self.device.create_sampler(&sampler_desc(desc));

        let id = self.store.allocate_id();
        self.store.textures.insert(
            id,
            GpuTexture {
                _texture: texture,
                view,
                sampler,
            },
        );

        id
    }

    fn destroy_texture(&mut self, id: TextureId) {
        if self.store.textures.remove(&id).is_some() {
            self.store.generation = self.store.generation.wrapping_add(1);
        }
    }

    fn max_texture_dimension(&self) -> u32 {
        self.device.limits().max_texture_dimension_2d
    }
}

/// Texture size for `desc`, at least 1x1 and at most `max` per side.
/// The flag is false when clamping was needed.
fn texture_extent(desc: &TextureDesc, max: u32) -> (wgpu::Extent3d, bool) {
    let max = max.max(1);
    let within_limit = desc.width <= max && desc.height <= max;
    let size = wgpu::Extent3d {
        width: desc.width.clamp(1, max),
        height: desc.height.clamp(1, max),
        depth_or_array_layers: 1,
    };
    (size, within_limit)
}

/// GPU format and pixel data for an upload. RGB has no wgpu format and is
/// widened to RGBA with opaque alpha.
fn upload_layout(format: PixelFormat, pixels: &[u8]) -> (wgpu::TextureFormat, Cow<'_, [u8]>) {
    match format {
        PixelFormat::R8 => (wgpu::TextureFormat::R8Unorm, Cow::Borrowed(pixels)),
        PixelFormat::Rg8 => (wgpu::TextureFormat::Rg8Unorm, Cow::Borrowed(pixels)),
        PixelFormat::Rgba8 => (wgpu::TextureFormat::Rgba8Unorm, Cow::Borrowed(pixels)),
        PixelFormat::Rgb8 => {
            let widened: Vec<u8> = pixels
                .chunks_exact(3)
                .flat_map(|px| [px[0], px[1], px[2], 0xFF])
                .collect();
            (wgpu::TextureFormat::Rgba8Unorm, Cow::Owned(widened))
        }
    }
}

fn sampler_desc(desc: &TextureDesc) -> wgpu::SamplerDescriptor<'_> {
    let filter = match desc.filter {
        TextureFilter::Nearest => wgpu::FilterMode::Nearest,
        TextureFilter::Linear => wgpu::FilterMode::Linear,
    };
    let address = match desc.address {
        TextureAddress::ClampToEdge => wgpu::AddressMode::ClampToEdge,
        TextureAddress::Repeat => wgpu::AddressMode::Repeat,
    };

    wgpu::SamplerDescriptor {
        label: Some(&desc.label),
        address_mode_u: address,
        address_mode_v: address,
        address_mode_w: address,
        mag_filter: filter,
        min_filter: filter,
        mipmap_filter: wgpu::MipmapFilterMode::Nearest,
        ..Default::default()
    }
}
