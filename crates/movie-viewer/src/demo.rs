//! Built-in composition that exercises the renderer without movie data.
//!
//! Layers, back to front: a solid background, an additive pulsing disc, an
//! optional image, an optional atlas cut-out and, with an image, a layer
//! masked by a rotating track matte.

use std::f32::consts::TAU;

use movie_render::coords::Viewport;
use movie_render::engine::{
    CameraDesc, CompositionEngine, CompositionEvent, CompositionProviders, CompositionState,
    LayerDesc, MatteMode, NodeDesc, NodeReply, TrackMatteRequest, TrackMatteUpdate, UpdateState,
};
use movie_render::mesh::{LayerType, MeshBlend, NodeId, RenderMesh};
use movie_render::paint::Rgb;
use movie_render::resource::ResourceHandle;

const WIDTH: f32 = 1280.0;
const HEIGHT: f32 = 720.0;
const DURATION: f32 = 4.0;

const PULSE_PERIOD: f32 = 1.5;
const DISC_SEGMENTS: u16 = 48;

const PANEL: f32 = 320.0;
const PANEL_TOP: f32 = 200.0;
const MATTE_HALF: f32 = 150.0;

/// Image handles resolved before the composition starts.
#[derive(Debug, Copy, Clone, Default)]
pub struct DemoAssets {
    pub image: Option<ResourceHandle>,
    pub atlas: Option<ResourceHandle>,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
enum Role {
    Background,
    Pulse,
    Photo,
    AtlasCut,
    Matte,
    Masked,
}

#[derive(Debug)]
struct DemoNode {
    id: NodeId,
    role: Role,
    layer: LayerDesc,
    /// Index of the node acting as this node's track matte.
    matte: Option<usize>,
    accepted: bool,
    element: Option<ResourceHandle>,
}

/// Playback state of the "pulse" sub-composition.
#[derive(Debug, Copy, Clone)]
struct Clip {
    time: f32,
    playing: bool,
    looped: bool,
}

pub struct DemoComposition {
    nodes: Vec<DemoNode>,
    meshes: Vec<RenderMesh>,

    time: f32,
    playing: bool,
    paused: bool,
    looped: bool,

    pulse: Clip,
}

impl DemoComposition {
    pub fn new(assets: DemoAssets) -> Self {
        let mut layers = vec![
            (Role::Background, layer("background", LayerType::Solid, None)),
            (Role::Pulse, layer("pulse", LayerType::Shape, None)),
        ];

        if let Some(image) = assets.image {
            layers.push((Role::Photo, layer("photo", LayerType::Image, Some(image))));
        }
        if let Some(atlas) = assets.atlas {
            layers.push((Role::AtlasCut, layer("atlas cut", LayerType::Image, Some(atlas))));
        }
        if let Some(image) = assets.image {
            let mut matte = layer("matte", LayerType::Image, Some(assets.atlas.unwrap_or(image)));
            matte.is_track_matte = true;
            layers.push((Role::Matte, matte));
            layers.push((Role::Masked, layer("masked", LayerType::Image, Some(image))));
        }

        let matte_index = layers.iter().position(|(role, _)| *role == Role::Matte);
        let nodes = layers
            .into_iter()
            .enumerate()
            .map(|(i, (role, layer))| DemoNode {
                id: NodeId(i as u32 + 1),
                role,
                layer,
                matte: if role == Role::Masked { matte_index } else { None },
                accepted: false,
                element: None,
            })
            .collect();

        Self {
            nodes,
            meshes: Vec::new(),
            time: 0.0,
            playing: false,
            paused: false,
            looped: false,
            pulse: Clip {
                time: 0.0,
                playing: true,
                looped: true,
            },
        }
    }

    fn node_desc(&self, index: usize) -> NodeDesc<'_> {
        let node = &self.nodes[index];
        NodeDesc {
            node: node.id,
            layer: &node.layer,
            track_matte_layer: node.matte.map(|m| &self.nodes[m].layer),
        }
    }

    fn masked(&self) -> Option<&DemoNode> {
        self.nodes
            .iter()
            .find(|n| n.role == Role::Masked && n.accepted)
    }

    // ── frame building ───────────────────────────────────────────────────

    fn matte_angle(&self) -> f32 {
        self.time / DURATION * TAU
    }

    fn matte_matrix(&self) -> [f32; 16] {
        let (s, c) = self.matte_angle().sin_cos();
        let (cx, cy) = matte_center();
        let tx = cx - c * cx + s * cy;
        let ty = cy - s * cx - c * cy;
        [
            c, s, 0.0, 0.0, //
            -s, c, 0.0, 0.0, //
            0.0, 0.0, 1.0, 0.0, //
            tx, ty, 0.0, 1.0,
        ]
    }

    fn matte_mesh(&self) -> RenderMesh {
        let (s, c) = self.matte_angle().sin_cos();
        let (cx, cy) = matte_center();

        let mut mesh = RenderMesh::quad(LayerType::Image, 0.0, 0.0, 1.0, 1.0);
        for p in &mut mesh.positions {
            let x = (p[0] * 2.0 - 1.0) * MATTE_HALF;
            let y = (p[1] * 2.0 - 1.0) * MATTE_HALF;
            *p = [cx + x * c - y * s, cy + x * s + y * c, 0.0];
        }
        mesh
    }

    fn pulse_mesh(&self) -> RenderMesh {
        let phase = (self.pulse.time / PULSE_PERIOD * TAU).sin() * 0.5 + 0.5;
        let radius = 140.0 + 60.0 * phase;

        let mut mesh = disc(WIDTH * 0.5, HEIGHT * 0.5, radius, DISC_SEGMENTS);
        mesh.layer_type = LayerType::Shape;
        mesh.color = Rgb::new(1.0, 0.55, 0.2);
        mesh.opacity = 0.25 + 0.5 * phase;
        mesh.blend = MeshBlend::Add;
        mesh
    }

    fn rebuild_meshes(&mut self) {
        let mut meshes = Vec::with_capacity(self.nodes.len());

        for node in self.nodes.iter().filter(|n| n.accepted) {
            let mut mesh = match node.role {
                Role::Background => {
                    let mut m = RenderMesh::quad(LayerType::Solid, 0.0, 0.0, WIDTH, HEIGHT);
                    m.color = Rgb::new(0.08, 0.09, 0.12);
                    m.opacity = 0.85;
                    m
                }
                Role::Pulse => self.pulse_mesh(),
                Role::Photo => RenderMesh::quad(LayerType::Image, 80.0, PANEL_TOP, PANEL, PANEL),
                Role::AtlasCut => {
                    let mut m = RenderMesh::quad(LayerType::Image, 880.0, PANEL_TOP, PANEL, PANEL);
                    m.uvs = vec![[0.0, 0.0], [0.5, 0.0], [0.5, 0.5], [0.0, 0.5]];
                    m
                }
                // Drawn through the layer it masks.
                Role::Matte => continue,
                Role::Masked => {
                    let (cx, cy) = matte_center();
                    let mut m = RenderMesh::quad(
                        LayerType::Image,
                        cx - PANEL * 0.5,
                        cy - PANEL * 0.5,
                        PANEL,
                        PANEL,
                    );
                    m.track_matte = Some(node.id);
                    m
                }
            };

            mesh.resource = node.layer.resource;
            mesh.element = node.element;
            meshes.push(mesh);
        }

        self.meshes = meshes;
    }

    fn advance(&mut self, dt: f32, providers: &mut dyn CompositionProviders) {
        if !self.playing || self.paused {
            return;
        }

        let before = self.time;
        self.time += dt;

        let half = DURATION * 0.5;
        if before < half && self.time >= half {
            providers.composition_event(&CompositionEvent {
                node: self.nodes[1].id,
                name: "halfway".to_string(),
            });
        }

        if self.time >= DURATION {
            if self.looped {
                self.time %= DURATION;
                providers.composition_state(CompositionState::Loop);
            } else {
                self.time = DURATION;
                self.playing = false;
                providers.composition_state(CompositionState::End);
            }
        }
    }

    fn advance_pulse(&mut self, dt: f32) {
        if !self.pulse.playing {
            return;
        }

        self.pulse.time += dt;
        if self.pulse.time >= PULSE_PERIOD {
            if self.pulse.looped {
                self.pulse.time %= PULSE_PERIOD;
            } else {
                self.pulse.time = PULSE_PERIOD;
                self.pulse.playing = false;
            }
        }
    }
}

impl CompositionEngine for DemoComposition {
    fn name(&self) -> &str {
        "demo"
    }

    fn duration(&self) -> f32 {
        DURATION
    }

    fn current_time(&self) -> f32 {
        self.time
    }

    fn is_playing(&self) -> bool {
        self.playing
    }

    fn is_paused(&self) -> bool {
        self.paused
    }

    fn play(&mut self, start_time: f32) {
        self.time = start_time.clamp(0.0, DURATION);
        self.playing = true;
        self.paused = false;
    }

    fn pause(&mut self) {
        if self.playing {
            self.paused = true;
        }
    }

    fn resume(&mut self) {
        self.paused = false;
    }

    fn stop(&mut self) {
        self.playing = false;
        self.paused = false;
        self.time = 0.0;
    }

    fn set_loop(&mut self, looped: bool) {
        self.looped = looped;
    }

    fn is_looped(&self) -> bool {
        self.looped
    }

    fn size(&self) -> Viewport {
        Viewport::new(WIDTH, HEIGHT)
    }

    fn start(&mut self, providers: &mut dyn CompositionProviders) {
        providers.provide_camera(&CameraDesc {
            name: "main".to_string(),
            width: WIDTH,
            height: HEIGHT,
        });

        for i in 0..self.nodes.len() {
            let reply = providers.provide_node(&self.node_desc(i));
            let node = &mut self.nodes[i];
            match reply {
                NodeReply::Accept { element } => {
                    node.accepted = true;
                    node.element = element;
                }
                NodeReply::Decline => log::debug!("demo layer '{}' declined", node.layer.name),
            }
        }

        self.rebuild_meshes();

        if let Some(masked) = self.masked() {
            let mesh = self.matte_mesh();
            providers.provide_track_matte(&TrackMatteRequest {
                node: masked.id,
                matrix: &self.matte_matrix(),
                mesh: &mesh,
                mode: MatteMode::Alpha,
            });
        }
    }

    fn update(&mut self, dt: f32, providers: &mut dyn CompositionProviders) {
        self.advance(dt, providers);
        self.advance_pulse(dt);

        for i in 0..self.nodes.len() {
            if self.nodes[i].accepted {
                providers.update_node(&self.node_desc(i), UpdateState::Process);
            }
        }

        self.rebuild_meshes();

        if let Some(masked) = self.masked() {
            let mesh = self.matte_mesh();
            providers.update_track_matte(&TrackMatteUpdate {
                node: masked.id,
                state: UpdateState::Process,
                matrix: &self.matte_matrix(),
                mesh: &mesh,
            });
        }
    }

    fn for_each_mesh(&self, visit: &mut dyn FnMut(&RenderMesh)) {
        self.meshes.iter().for_each(visit);
    }

    fn finish(&mut self, providers: &mut dyn CompositionProviders) {
        if let Some(masked) = self.masked() {
            providers.delete_track_matte(masked.id);
        }

        for i in (0..self.nodes.len()).rev() {
            if self.nodes[i].accepted {
                providers.delete_node(&self.node_desc(i));
                self.nodes[i].accepted = false;
            }
        }

        providers.composition_state(CompositionState::Stop);
        self.meshes.clear();
    }

    // ── sub-compositions ─────────────────────────────────────────────────

    fn sub_composition_count(&self) -> usize {
        1
    }

    fn sub_composition_name(&self, index: usize) -> Option<&str> {
        (index == 0).then_some("pulse")
    }

    fn play_sub_composition(&mut self, _index: usize) {
        if self.pulse.time >= PULSE_PERIOD {
            self.pulse.time = 0.0;
        }
        self.pulse.playing = true;
    }

    fn pause_sub_composition(&mut self, _index: usize) {
        self.pulse.playing = false;
    }

    fn stop_sub_composition(&mut self, _index: usize) {
        self.pulse.playing = false;
        self.pulse.time = 0.0;
    }

    fn set_sub_composition_time(&mut self, _index: usize, time: f32) {
        self.pulse.time = time.clamp(0.0, PULSE_PERIOD);
    }

    fn set_sub_composition_loop(&mut self, _index: usize, looped: bool) {
        self.pulse.looped = looped;
    }

    fn is_sub_composition_looped(&self, _index: usize) -> bool {
        self.pulse.looped
    }
}

impl DemoComposition {
    /// Whether the "pulse" sub-composition is advancing.
    pub fn pulse_playing(&self) -> bool {
        self.pulse.playing
    }
}

fn layer(name: &str, layer_type: LayerType, resource: Option<ResourceHandle>) -> LayerDesc {
    LayerDesc {
        name: name.to_string(),
        layer_type,
        is_track_matte: false,
        resource,
    }
}

fn matte_center() -> (f32, f32) {
    (WIDTH * 0.5, PANEL_TOP + PANEL * 0.5)
}

/// Triangle fan around `(cx, cy)`: center vertex first, then the rim.
fn disc(cx: f32, cy: f32, radius: f32, segments: u16) -> RenderMesh {
    let mut mesh = RenderMesh::new(LayerType::Shape);
    mesh.positions.push([cx, cy, 0.0]);
    mesh.uvs.push([0.5, 0.5]);

    for i in 0..segments {
        let (s, c) = (f32::from(i) / f32::from(segments) * TAU).sin_cos();
        mesh.positions.push([cx + c * radius, cy + s * radius, 0.0]);
        mesh.uvs.push([0.5 + c * 0.5, 0.5 + s * 0.5]);
    }

    for i in 0..segments {
        let next = (i + 1) % segments;
        mesh.indices.extend_from_slice(&[0, i + 1, next + 1]);
    }

    mesh
}
