//! Track matte state kept on behalf of the engine.
//!
//! A matte is created, refreshed and removed by engine callbacks, keyed by
//! the node it masks. At draw time its mesh positions are projected into the
//! masked layer's UV space through [`MatteUvScratch`].

use std::collections::HashMap;

use thiserror::Error;

use crate::coords::{UvProjector, Vec2};
use crate::engine::{MatteMode, TrackMatteRequest, TrackMatteUpdate, UpdateState};
use crate::mesh::{NodeId, RenderMesh};

/// Latest transform and mesh snapshot of one track matte.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackMatteDesc {
    pub matrix: [f32; 16],
    pub mesh: RenderMesh,
    pub mode: MatteMode,
}

/// Track mattes keyed by the node they apply to.
#[derive(Debug, Default)]
pub struct TrackMatteStore {
    mattes: HashMap<NodeId, TrackMatteDesc>,
}

impl TrackMatteStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a new matte; a matte already stored for the node is replaced.
    pub fn provide(&mut self, request: &TrackMatteRequest<'_>) {
        let desc = TrackMatteDesc {
            matrix: *request.matrix,
            mesh: request.mesh.clone(),
            mode: request.mode,
        };

        if self.mattes.insert(request.node, desc).is_some() {
            log::debug!("track matte for {:?} provided twice; replaced", request.node);
        }
    }

    /// Refreshes matrix and mesh on `Begin` and `Process` ticks.
    ///
    /// Returns whether the stored matte changed.
    pub fn update(&mut self, update: &TrackMatteUpdate<'_>) -> bool {
        if !matches!(update.state, UpdateState::Begin | UpdateState::Process) {
            return false;
        }

        let Some(desc) = self.mattes.get_mut(&update.node) else {
            log::debug!("update for unknown track matte {:?}", update.node);
            return false;
        };

        desc.matrix = *update.matrix;
        desc.mesh.clone_from(update.mesh);
        true
    }

    pub fn remove(&mut self, node: NodeId) -> Option<TrackMatteDesc> {
        self.mattes.remove(&node)
    }

    #[inline]
    pub fn get(&self, node: NodeId) -> Option<&TrackMatteDesc> {
        self.mattes.get(&node)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.mattes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.mattes.is_empty()
    }
}

#[derive(Error, Debug, Copy, Clone, Eq, PartialEq)]
pub enum MatteUvError {
    #[error("matte mesh has {vertices} vertices, scratch holds at most {capacity}")]
    TooManyVertices { vertices: usize, capacity: usize },
}

/// Reusable buffer for the alternate UV set of a matte mesh.
///
/// Bounded: meshes above `capacity` vertices are rejected, never truncated.
#[derive(Debug)]
pub struct MatteUvScratch {
    uvs: Vec<[f32; 2]>,
    capacity: usize,
}

impl MatteUvScratch {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            uvs: Vec::with_capacity(capacity),
            capacity,
        }
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Projects every position through `projector` and returns the UVs.
    pub fn project(
        &mut self,
        projector: &UvProjector,
        positions: &[[f32; 3]],
    ) -> Result<&[[f32; 2]], MatteUvError> {
        if positions.len() > self.capacity {
            return Err(MatteUvError::TooManyVertices {
                vertices: positions.len(),
                capacity: self.capacity,
            });
        }

        self.uvs.clear();
        self.uvs.extend(
            positions
                .iter()
                .map(|&p| projector.project(Vec2::from_xyz(p)).to_array()),
        );

        Ok(&self.uvs)
    }
}
