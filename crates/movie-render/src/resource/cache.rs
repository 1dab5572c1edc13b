use std::collections::HashMap;
use std::path::Path;

use super::{
    decode_image, ResourceKey, Texture, TextureAddress, TextureDesc, TextureDevice,
    TextureFilter, TextureId, PixelFormat,
};

/// Named wrapper around an atlas texture.
///
/// Created on first lookup by name; the texture is attached later, when the
/// atlas entry for that name is resolved.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct Image {
    pub texture: Option<ResourceKey>,
    pub premultiplied: bool,
}

impl Default for Image {
    fn default() -> Self {
        Self {
            texture: None,
            premultiplied: true,
        }
    }
}

impl Image {
    #[inline]
    pub fn attach(&mut self, texture: &Texture) {
        self.texture = Some(texture.key);
    }
}

/// A cache entry.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Resource {
    Texture(Texture),
    Image(Image),
}

/// Reference to a cached resource, handed to the composition engine and
/// carried back on render meshes.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum ResourceHandle {
    Texture(ResourceKey),
    Image(ResourceKey),
}

/// What the batch renderer needs to know about an image source.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct ImageBinding {
    /// `None` when the image has no texture (yet); the fallback is bound instead.
    pub texture: Option<TextureId>,
    pub premultiplied: bool,
}

/// Session-wide cache of textures and images, keyed by hashed path or name.
///
/// Owns every GPU texture it creates, plus a 1×1 opaque white fallback.
/// Call [`initialize`](Self::initialize) before drawing and
/// [`shutdown`](Self::shutdown) before the texture device goes away.
#[derive(Debug, Default)]
pub struct ResourceCache {
    resources: HashMap<ResourceKey, Resource>,
    fallback: Option<TextureId>,
}

impl ResourceCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates the fallback texture. Calling it again is a no-op.
    pub fn initialize(&mut self, device: &mut dyn TextureDevice) {
        if self.fallback.is_some() {
            return;
        }

        let desc = TextureDesc {
            label: "fallback white".to_string(),
            width: 1,
            height: 1,
            format: PixelFormat::Rgba8,
            filter: TextureFilter::Nearest,
            address: TextureAddress::ClampToEdge,
        };
        self.fallback = Some(device.create_texture(&desc, &[0xFF; 4]));
        log::debug!("resource cache initialized");
    }

    /// Releases every cached texture and the fallback, then empties the cache.
    pub fn shutdown(&mut self, device: &mut dyn TextureDevice) {
        if let Some(id) = self.fallback.take() {
            device.destroy_texture(id);
        }

        for (_, resource) in self.resources.drain() {
            if let Resource::Texture(texture) = resource {
                device.destroy_texture(texture.id);
            }
        }

        log::debug!("resource cache shut down");
    }

    /// The 1×1 white texture bound in place of missing textures.
    ///
    /// `None` before [`initialize`](Self::initialize).
    #[inline]
    pub fn fallback_texture(&self) -> Option<TextureId> {
        self.fallback
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.resources.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }

    /// Returns the cached texture for `path`, decoding and uploading it on miss.
    ///
    /// Decode failures are logged and yield `None`; the caller binds the
    /// fallback texture instead.
    pub fn get_texture(&mut self, device: &mut dyn TextureDevice, path: &str) -> Option<Texture> {
        let key = ResourceKey::of(path);

        match self.resources.get(&key) {
            Some(Resource::Texture(texture)) => return Some(*texture),
            Some(Resource::Image(_)) => {
                log::warn!("texture '{path}' collides with a cached image key; not loaded");
                return None;
            }
            None => {}
        }

        let decoded = match decode_image(Path::new(path)) {
            Ok(decoded) => decoded,
            Err(e) => {
                log::warn!("{e}");
                return None;
            }
        };

        let max = device.max_texture_dimension();
        if decoded.width > max || decoded.height > max {
            log::warn!(
                "texture '{path}' is {}x{}, above the device limit of {max}; not loaded",
                decoded.width,
                decoded.height
            );
            return None;
        }

        let desc = TextureDesc {
            label: path.to_string(),
            width: decoded.width,
            height: decoded.height,
            format: decoded.format,
            filter: TextureFilter::Linear,
            address: TextureAddress::Repeat,
        };
        let id = device.create_texture(&desc, &decoded.pixels);

        let texture = Texture {
            key,
            width: decoded.width,
            height: decoded.height,
            format: decoded.format,
            id,
        };
        self.resources.insert(key, Resource::Texture(texture));

        log::debug!(
            "loaded texture '{path}' ({}x{}, {:?})",
            texture.width,
            texture.height,
            texture.format
        );

        Some(texture)
    }

    /// Returns the image named `name`, creating an empty one on miss.
    ///
    /// New images have no texture and assume premultiplied alpha.
    /// `None` only when the name collides with a cached texture key.
    pub fn get_image(&mut self, name: &str) -> Option<&mut Image> {
        let key = ResourceKey::of(name);

        let entry = self
            .resources
            .entry(key)
            .or_insert_with(|| Resource::Image(Image::default()));

        match entry {
            Resource::Image(image) => Some(image),
            Resource::Texture(_) => {
                log::warn!("image '{name}' collides with a cached texture key");
                None
            }
        }
    }

    /// Looks up a cached texture without loading.
    pub fn texture(&self, key: ResourceKey) -> Option<Texture> {
        match self.resources.get(&key) {
            Some(Resource::Texture(texture)) => Some(*texture),
            _ => None,
        }
    }

    /// Looks up a cached image without creating one.
    pub fn image(&self, key: ResourceKey) -> Option<Image> {
        match self.resources.get(&key) {
            Some(Resource::Image(image)) => Some(*image),
            _ => None,
        }
    }

    /// Resolves a handle into the texture and alpha mode used for batching.
    ///
    /// Plain textures are treated as straight alpha; images carry their own
    /// flag. Handles to entries that no longer exist resolve to `None`.
    pub fn binding(&self, handle: ResourceHandle) -> Option<ImageBinding> {
        match handle {
            ResourceHandle::Texture(key) => self.texture(key).map(|t| ImageBinding {
                texture: Some(t.id),
                premultiplied: false,
            }),
            ResourceHandle::Image(key) => self.image(key).map(|image| ImageBinding {
                texture: image.texture.and_then(|k| self.texture(k)).map(|t| t.id),
                premultiplied: image.premultiplied,
            }),
        }
    }
}
