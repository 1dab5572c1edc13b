//! Decoded resources shared by every composition of a viewing session.
//!
//! Textures are decoded from local raster files and uploaded through a
//! [`TextureDevice`]; images are named wrappers that reference an atlas
//! texture. Both live in one [`ResourceCache`] keyed by [`ResourceKey`].

mod cache;
mod decode;
mod key;
mod texture;

pub use cache::{Image, ImageBinding, Resource, ResourceCache, ResourceHandle};
pub use decode::{decode_image, DecodedImage, TextureLoadError};
pub use key::ResourceKey;
pub use texture::{PixelFormat, Texture, TextureAddress, TextureDesc, TextureDevice, TextureFilter, TextureId};
