//! Test doubles shared by the unit tests of this crate.

use std::path::PathBuf;

use crate::paint::BlendMode;
use crate::render::{DrawBackend, DrawPass, DrawVertex};
use crate::resource::{TextureDesc, TextureDevice, TextureId};

/// Fresh, empty scratch directory under the system temp dir.
pub(crate) fn temp_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!(
        "movie_render_test_{}_{}",
        name,
        std::process::id()
    ));
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

/// Texture device that hands out sequential ids and remembers every upload.
#[derive(Debug, Default)]
pub(crate) struct CountingTextures {
    pub created: Vec<(TextureDesc, Vec<u8>)>,
    pub destroyed: Vec<TextureId>,
    pub max_dimension: Option<u32>,
}

impl CountingTextures {
    /// Ids created and not yet destroyed.
    pub fn live(&self) -> Vec<TextureId> {
        (1..=self.created.len() as u32)
            .map(TextureId::new)
            .filter(|id| !self.destroyed.contains(id))
            .collect()
    }
}

impl TextureDevice for CountingTextures {
    fn create_texture(&mut self, desc: &TextureDesc, pixels: &[u8]) -> TextureId {
        self.created.push((desc.clone(), pixels.to_vec()));
        TextureId::new(self.created.len() as u32)
    }

    fn destroy_texture(&mut self, id: TextureId) {
        self.destroyed.push(id);
    }

    fn max_texture_dimension(&self) -> u32 {
        self.max_dimension.unwrap_or(u32::MAX)
    }
}

/// One call observed by [`RecordingBackend`].
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum BackendCall {
    Map,
    Unmap {
        vertices: Vec<DrawVertex>,
        indices: Vec<u16>,
    },
    SetBlend(BlendMode),
    Bind(TextureId, TextureId),
    Draw(DrawPass, u32),
}

/// Draw backend that records calls in order and checks the map/draw protocol.
#[derive(Debug, Default)]
pub(crate) struct RecordingBackend {
    pub calls: Vec<BackendCall>,
    mapped: bool,
}

impl RecordingBackend {
    pub fn draws(&self) -> Vec<(DrawPass, u32)> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                BackendCall::Draw(pass, count) => Some((*pass, *count)),
                _ => None,
            })
            .collect()
    }

    /// Buffer contents handed over by unmaps that were followed by a draw.
    pub fn drawn_batches(&self) -> Vec<(Vec<DrawVertex>, Vec<u16>)> {
        let mut out = Vec::new();
        for (i, call) in self.calls.iter().enumerate() {
            if let BackendCall::Unmap { vertices, indices } = call {
                let drawn = self.calls[i + 1..]
                    .iter()
                    .take_while(|c| !matches!(c, BackendCall::Map))
                    .any(|c| matches!(c, BackendCall::Draw(..)));
                if drawn {
                    out.push((vertices.clone(), indices.clone()));
                }
            }
        }
        out
    }

    pub fn binds(&self) -> Vec<(TextureId, TextureId)> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                BackendCall::Bind(rgb, alpha) => Some((*rgb, *alpha)),
                _ => None,
            })
            .collect()
    }

    pub fn blends(&self) -> Vec<BlendMode> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                BackendCall::SetBlend(mode) => Some(*mode),
                _ => None,
            })
            .collect()
    }

    pub fn clear(&mut self) {
        self.calls.clear();
    }
}

impl DrawBackend for RecordingBackend {
    fn map_buffers(&mut self) {
        assert!(!self.mapped, "buffers mapped twice");
        self.mapped = true;
        self.calls.push(BackendCall::Map);
    }

    fn unmap_buffers(&mut self, vertices: &[DrawVertex], indices: &[u16]) {
        assert!(self.mapped, "unmap without map");
        self.mapped = false;
        self.calls.push(BackendCall::Unmap {
            vertices: vertices.to_vec(),
            indices: indices.to_vec(),
        });
    }

    fn set_blend(&mut self, mode: BlendMode) {
        self.calls.push(BackendCall::SetBlend(mode));
    }

    fn bind_textures(&mut self, rgb: TextureId, alpha: TextureId) {
        self.calls.push(BackendCall::Bind(rgb, alpha));
    }

    fn draw(&mut self, pass: DrawPass, index_count: u32) {
        assert!(!self.mapped, "draw while buffers are mapped");
        self.calls.push(BackendCall::Draw(pass, index_count));
    }
}
