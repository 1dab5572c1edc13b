//! Resolving movie resources against the resource cache.

use crate::engine::{MovieResource, ResourceKind, ResourceProvider};
use crate::resource::{ResourceCache, ResourceHandle, ResourceKey, TextureDevice};

/// Directory part of a movie file path, trailing separator included.
///
/// Backslash wins over slash when both occur. A path without separators has
/// an empty base folder.
pub fn base_folder_of(movie_path: &str) -> &str {
    let split = movie_path.rfind('\\').or_else(|| movie_path.rfind('/'));
    match split {
        Some(i) => &movie_path[..=i],
        None => "",
    }
}

/// [`ResourceProvider`] that loads images into a [`ResourceCache`].
///
/// Borrows the cache and the texture device for the duration of a movie
/// load; resource paths are joined onto `base_folder` verbatim.
pub struct MovieResources<'a> {
    base_folder: String,
    cache: &'a mut ResourceCache,
    device: &'a mut dyn TextureDevice,
}

impl<'a> MovieResources<'a> {
    pub fn new(
        base_folder: impl Into<String>,
        cache: &'a mut ResourceCache,
        device: &'a mut dyn TextureDevice,
    ) -> Self {
        Self {
            base_folder: base_folder.into(),
            cache,
            device,
        }
    }

    #[inline]
    pub fn base_folder(&self) -> &str {
        &self.base_folder
    }

    fn full_path(&self, path: &str) -> String {
        format!("{}{}", self.base_folder, path)
    }
}

impl ResourceProvider for MovieResources<'_> {
    fn provide_resource(&mut self, resource: &MovieResource) -> Option<ResourceHandle> {
        let image = match resource {
            MovieResource::Image(image) => image,
            other => {
                log::debug!("no host support for {:?} resources", other.kind());
                return None;
            }
        };

        let Some(atlas) = &image.atlas else {
            let path = self.full_path(&image.path);
            let texture = self.cache.get_texture(&mut *self.device, &path)?;
            return Some(ResourceHandle::Texture(texture.key));
        };

        let atlas_path = self.full_path(&atlas.path);
        let texture = self.cache.get_texture(&mut *self.device, &atlas_path);

        let entry = self.cache.get_image(&image.name)?;
        match texture {
            Some(texture) => entry.attach(&texture),
            None => log::warn!("atlas '{atlas_path}' for image '{}' unavailable", image.name),
        }

        Some(ResourceHandle::Image(ResourceKey::of(&image.name)))
    }

    fn delete_resource(&mut self, kind: ResourceKind, handle: Option<ResourceHandle>) {
        // Cached entries live until the cache shuts down.
        log::debug!("resource released: {kind:?} {handle:?}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{AtlasRef, ImageResource};
    use crate::testing::{temp_dir, CountingTextures};
    use std::path::Path;

    fn write_png(dir: &Path, name: &str) {
        image::RgbaImage::from_pixel(4, 4, image::Rgba([0, 255, 0, 128]))
            .save(dir.join(name))
            .unwrap();
    }

    fn image(name: &str, path: &str, atlas: Option<&str>) -> MovieResource {
        MovieResource::Image(ImageResource {
            name: name.to_string(),
            path: path.to_string(),
            trim_width: 4.0,
            trim_height: 4.0,
            has_mesh: false,
            atlas: atlas.map(|p| AtlasRef { path: p.to_string() }),
        })
    }

    fn base_of(dir: &Path) -> String {
        format!("{}/", dir.to_string_lossy())
    }

    #[test]
    fn base_folder_keeps_trailing_separator() {
        assert_eq!(base_folder_of("movies/intro/intro.aem"), "movies/intro/");
        assert_eq!(base_folder_of("C:\\movies\\intro.aem"), "C:\\movies\\");
        assert_eq!(base_folder_of("a/b\\c.aem"), "a/b\\");
        assert_eq!(base_folder_of("intro.aem"), "");
    }

    #[test]
    fn plain_image_resolves_to_texture_handle() {
        let dir = temp_dir("movie_plain");
        write_png(&dir, "hero.png");

        let mut cache = ResourceCache::new();
        let mut device = CountingTextures::default();
        let mut resources = MovieResources::new(base_of(&dir), &mut cache, &mut device);

        let handle = resources
            .provide_resource(&image("hero", "hero.png", None))
            .unwrap();

        let expected = ResourceKey::of(&format!("{}hero.png", base_of(&dir)));
        assert_eq!(handle, ResourceHandle::Texture(expected));

        let binding = cache.binding(handle).unwrap();
        assert!(binding.texture.is_some());
        assert!(!binding.premultiplied);
        assert_eq!(device.created.len(), 1);
    }

    #[test]
    fn missing_image_yields_no_handle() {
        let dir = temp_dir("movie_missing");
        let mut cache = ResourceCache::new();
        let mut device = CountingTextures::default();
        let mut resources = MovieResources::new(base_of(&dir), &mut cache, &mut device);

        assert!(resources
            .provide_resource(&image("ghost", "ghost.png", None))
            .is_none());
        assert!(device.created.is_empty());
    }

    #[test]
    fn atlas_image_shares_one_texture() {
        let dir = temp_dir("movie_atlas");
        write_png(&dir, "atlas.png");

        let mut cache = ResourceCache::new();
        let mut device = CountingTextures::default();
        let mut resources = MovieResources::new(base_of(&dir), &mut cache, &mut device);

        let a = resources
            .provide_resource(&image("a", "a.png", Some("atlas.png")))
            .unwrap();
        let b = resources
            .provide_resource(&image("b", "b.png", Some("atlas.png")))
            .unwrap();

        assert_eq!(a, ResourceHandle::Image(ResourceKey::of("a")));
        assert_eq!(device.created.len(), 1);

        let (ba, bb) = (cache.binding(a).unwrap(), cache.binding(b).unwrap());
        assert_eq!(ba.texture, bb.texture);
        assert!(ba.texture.is_some());
        assert!(ba.premultiplied);
    }

    #[test]
    fn atlas_without_texture_still_names_image() {
        let dir = temp_dir("movie_atlas_missing");
        let mut cache = ResourceCache::new();
        let mut device = CountingTextures::default();
        let mut resources = MovieResources::new(base_of(&dir), &mut cache, &mut device);

        let handle = resources
            .provide_resource(&image("lonely", "x.png", Some("nope.png")))
            .unwrap();

        let binding = cache.binding(handle).unwrap();
        assert_eq!(binding.texture, None);
    }

    #[test]
    fn unsupported_kinds_yield_no_handle() {
        let mut cache = ResourceCache::new();
        let mut device = CountingTextures::default();
        let mut resources = MovieResources::new("", &mut cache, &mut device);

        for resource in [
            MovieResource::Sequence { name: "s".into() },
            MovieResource::Video { path: "v.webm".into() },
            MovieResource::Sound { path: "s.ogg".into() },
            MovieResource::Slot { width: 1.0, height: 1.0 },
            MovieResource::Other { name: "o".into() },
        ] {
            assert!(resources.provide_resource(&resource).is_none());
        }
        assert!(cache.is_empty());
    }
}
