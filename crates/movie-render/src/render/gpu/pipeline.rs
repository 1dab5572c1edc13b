use crate::paint::BlendMode;
use crate::render::{DrawPass, DrawVertex};

/// Shader program selected by a draw.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub(super) enum Program {
    Straight,
    Premultiplied,
    Wire,
}

impl Program {
    pub(super) const COUNT: usize = 3;

    pub(super) fn for_pass(pass: DrawPass) -> Self {
        match pass {
            DrawPass::Solid { premultiplied: false } => Program::Straight,
            DrawPass::Solid { premultiplied: true } => Program::Premultiplied,
            DrawPass::Wireframe => Program::Wire,
        }
    }

    fn index(self) -> usize {
        match self {
            Program::Straight => 0,
            Program::Premultiplied => 1,
            Program::Wire => 2,
        }
    }

    fn entry_points(self) -> (&'static str, &'static str) {
        match self {
            Program::Straight => ("vs_main", "fs_straight"),
            Program::Premultiplied => ("vs_main", "fs_premultiplied"),
            Program::Wire => ("vs_wire", "fs_wire"),
        }
    }

    fn polygon_mode(self) -> wgpu::PolygonMode {
        match self {
            Program::Wire => wgpu::PolygonMode::Line,
            _ => wgpu::PolygonMode::Fill,
        }
    }
}

/// Slot in the pipeline table for a (program, blend) pair.
#[inline]
pub(super) fn slot(program: Program, blend: BlendMode) -> usize {
    program.index() * BlendMode::ALL.len() + blend.index()
}

pub(super) const SLOTS: usize = Program::COUNT * BlendMode::ALL.len();

/// Layouts shared by every mesh pipeline.
pub(super) struct Layouts {
    pub(super) uniforms: wgpu::BindGroupLayout,
    pub(super) textures: wgpu::BindGroupLayout,
    pub(super) pipeline: wgpu::PipelineLayout,
}

impl Layouts {
    pub(super) fn new(device: &wgpu::Device) -> Self {
        let uniforms = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("movie mesh uniforms bgl"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: wgpu::BufferSize::new(WVP_SIZE),
                },
                count: None,
            }],
        });

        let texture_entry = |binding| wgpu::BindGroupLayoutEntry {
            binding,
            visibility: wgpu::ShaderStages::FRAGMENT,
            ty: wgpu::BindingType::Texture {
                sample_type: wgpu::TextureSampleType::Float { filterable: true },
                view_dimension: wgpu::TextureViewDimension::D2,
                multisampled: false,
            },
            count: None,
        };
        let sampler_entry = |binding| wgpu::BindGroupLayoutEntry {
            binding,
            visibility: wgpu::ShaderStages::FRAGMENT,
            ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
            count: None,
        };

        let textures = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("movie mesh textures bgl"),
            entries: &[
                texture_entry(0),
                sampler_entry(1),
                texture_entry(2),
                sampler_entry(3),
            ],
        });

        let pipeline = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("movie mesh pipeline layout"),
            bind_group_layouts: &[&uniforms, &textures],
            immediate_size: 0,
        });

        Self {
            uniforms,
            textures,
            pipeline,
        }
    }
}

/// Size of the world-view-projection uniform (one column-major mat4).
pub(super) const WVP_SIZE: u64 = std::mem::size_of::<[f32; 16]>() as u64;

/// Compiles the mesh shader module, logging compiler errors.
///
/// Returns `None` when compilation produced errors.
pub(super) fn create_shader(device: &wgpu::Device) -> Option<wgpu::ShaderModule> {
    let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some("movie mesh shader"),
        source: wgpu::ShaderSource::Wgsl(include_str!("shaders/mesh.wgsl").into()),
    });

    let info = pollster::block_on(shader.get_compilation_info());
    let mut failed = false;
    for message in &info.messages {
        match message.message_type {
            wgpu::CompilationMessageType::Error => {
                log::error!("mesh shader: {}", message.message);
                failed = true;
            }
            wgpu::CompilationMessageType::Warning => {
                log::warn!("mesh shader: {}", message.message);
            }
            wgpu::CompilationMessageType::Info => {
                log::debug!("mesh shader: {}", message.message);
            }
        }
    }

    (!failed).then_some(shader)
}

pub(super) fn create_pipeline(
    device: &wgpu::Device,
    layouts: &Layouts,
    shader: &wgpu::ShaderModule,
    format: wgpu::TextureFormat,
    program: Program,
    blend: BlendMode,
) -> wgpu::RenderPipeline {
    let (vs, fs) = program.entry_points();
    let label = format!("movie mesh pipeline {program:?}/{blend:?}");

    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(&label),
        layout: Some(&layouts.pipeline),

        vertex: wgpu::VertexState {
            module: shader,
            entry_point: Some(vs),
            compilation_options: Default::default(),
            buffers: &[DrawVertex::layout()],
        },

        fragment: Some(wgpu::FragmentState {
            module: shader,
            entry_point: Some(fs),
            compilation_options: Default::default(),
            targets: &[Some(wgpu::ColorTargetState {
                format,
                blend: Some(blend.blend_state()),
                write_mask: wgpu::ColorWrites::ALL,
            })],
        }),

        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            strip_index_format: None,
            front_face: wgpu::FrontFace::Ccw,
            cull_mode: None,
            polygon_mode: program.polygon_mode(),
            unclipped_depth: false,
            conservative: false,
        },

        depth_stencil: None,
        multisample: wgpu::MultisampleState::default(),
        multiview_mask: None,
        cache: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slots_are_unique() {
        let programs = [Program::Straight, Program::Premultiplied, Program::Wire];
        let mut seen = std::collections::HashSet::new();
        for p in programs {
            for b in BlendMode::ALL {
                let s = slot(p, b);
                assert!(s < SLOTS);
                assert!(seen.insert(s));
            }
        }
    }

    #[test]
    fn pass_selects_program() {
        assert_eq!(
            Program::for_pass(DrawPass::Solid { premultiplied: true }),
            Program::Premultiplied
        );
        assert_eq!(Program::for_pass(DrawPass::Wireframe), Program::Wire);
        assert_eq!(Program::Wire.polygon_mode(), wgpu::PolygonMode::Line);
    }
}
