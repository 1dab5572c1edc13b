use winit::event::{ElementState, WindowEvent};
use winit::keyboard::{Key, NamedKey};
use winit::window::WindowId;

use movie_render::composition::Composition;
use movie_render::core::{App, AppControl, FrameCtx};
use movie_render::device::Gpu;
use movie_render::engine::{AtlasRef, ImageResource, MovieResource, ResourceProvider};
use movie_render::movie::{base_folder_of, MovieResources};
use movie_render::paint::Rgb;
use movie_render::render::{BatchConfig, DrawMode, MeshGpu};
use movie_render::resource::{ResourceCache, ResourceHandle, TextureDevice};

use crate::demo::{DemoAssets, DemoComposition};

const CLEAR: Rgb = Rgb::new(0.412, 0.796, 1.0);
const PULSE: usize = 0;

/// Startup options taken from the command line.
#[derive(Debug, Clone)]
pub struct ViewerOptions {
    pub image: Option<String>,
    pub atlas: Option<String>,
    pub looped: bool,
    pub solid: bool,
    pub wireframe: bool,
    pub batch: BatchConfig,
}

/// GPU-side state, created on the first frame and released with the window.
struct Session {
    mesh_gpu: MeshGpu,
    cache: ResourceCache,
    composition: Composition<DemoComposition>,
}

impl Session {
    fn open(options: &ViewerOptions, gpu: &Gpu<'_>) -> Self {
        let mut mesh_gpu = MeshGpu::new(&options.batch);
        let mut cache = ResourceCache::new();

        let assets = {
            let mut textures = mesh_gpu.textures(gpu.device(), gpu.queue());
            cache.initialize(&mut textures);

            let image = options
                .image
                .as_deref()
                .and_then(|path| load_image(&mut cache, &mut textures, "image", path, false));
            let atlas = options
                .atlas
                .as_deref()
                .and_then(|path| load_image(&mut cache, &mut textures, "atlas", path, true));

            DemoAssets { image, atlas }
        };

        let mut composition = Composition::new(DemoComposition::new(assets), options.batch);
        composition.set_loop(options.looped);
        composition.play(0.0);

        log::info!(
            "session open: {} cached resources, {} GPU textures",
            cache.len(),
            mesh_gpu.texture_store().len()
        );

        Self {
            mesh_gpu,
            cache,
            composition,
        }
    }

    /// Runs the composition deleters, then frees every cached texture.
    fn close(self, gpu: &Gpu<'_>) {
        let Session {
            mut mesh_gpu,
            mut cache,
            composition,
        } = self;

        drop(composition);
        cache.shutdown(&mut mesh_gpu.textures(gpu.device(), gpu.queue()));

        log::info!(
            "session closed: {} GPU textures left",
            mesh_gpu.texture_store().len()
        );
    }
}

/// Loads `path` as a movie image; atlases are registered under `name`.
fn load_image(
    cache: &mut ResourceCache,
    device: &mut dyn TextureDevice,
    name: &str,
    path: &str,
    atlas: bool,
) -> Option<ResourceHandle> {
    let base = base_folder_of(path);
    let file = &path[base.len()..];

    let resource = MovieResource::Image(ImageResource {
        name: name.to_string(),
        path: file.to_string(),
        trim_width: 0.0,
        trim_height: 0.0,
        has_mesh: false,
        atlas: atlas.then(|| AtlasRef {
            path: file.to_string(),
        }),
    });

    let handle = MovieResources::new(base, cache, device).provide_resource(&resource);
    if handle.is_none() {
        log::warn!("'{path}' not loaded; its layer is skipped");
    }
    handle
}

pub struct ViewerApp {
    options: ViewerOptions,
    solid: bool,
    wireframe: bool,
    session: Option<Session>,
}

impl ViewerApp {
    pub fn new(options: ViewerOptions) -> Self {
        Self {
            solid: options.solid,
            wireframe: options.wireframe,
            options,
            session: None,
        }
    }

    fn log_draw_mode(&self) {
        match DrawMode::from_toggles(self.solid, self.wireframe) {
            Some(mode) => log::info!("draw mode: {mode:?}"),
            None => log::info!("draw mode: nothing"),
        }
    }

    fn toggle_playback(&mut self) {
        let Some(session) = self.session.as_mut() else { return };
        let comp = &mut session.composition;

        if comp.is_playing() && !comp.is_paused() {
            comp.pause();
            log::info!("paused at {:.2}s", comp.current_time());
        } else {
            comp.play(0.0);
            log::info!("playing from {:.2}s", comp.current_time());
        }
    }

    fn restart(&mut self) {
        let Some(session) = self.session.as_mut() else { return };
        session.composition.stop();
        session.composition.play(0.0);
        log::info!("restarted");
    }

    fn toggle_loop(&mut self) {
        let Some(session) = self.session.as_mut() else { return };
        let looped = !session.composition.is_looped();
        session.composition.set_loop(looped);
        log::info!("looping {}", if looped { "on" } else { "off" });
    }

    fn toggle_pulse(&mut self) {
        let Some(session) = self.session.as_mut() else { return };
        let comp = &mut session.composition;

        if comp.engine().pulse_playing() {
            comp.pause_sub_composition(PULSE);
        } else {
            comp.play_sub_composition(PULSE);
        }

        log::info!(
            "sub-composition '{}' {}",
            comp.sub_composition_name(PULSE).unwrap_or("?"),
            if comp.engine().pulse_playing() { "playing" } else { "paused" }
        );
    }
}

impl App for ViewerApp {
    fn on_window_event(&mut self, _window_id: WindowId, event: &WindowEvent) -> AppControl {
        let WindowEvent::KeyboardInput { event: key, .. } = event else {
            return AppControl::Continue;
        };
        if key.state != ElementState::Pressed || key.repeat {
            return AppControl::Continue;
        }

        match key.logical_key.as_ref() {
            Key::Named(NamedKey::Escape) => return AppControl::Exit,
            Key::Named(NamedKey::Space) => self.toggle_playback(),
            Key::Character(c) => match c.to_ascii_lowercase().as_str() {
                "s" => {
                    self.solid = !self.solid;
                    self.log_draw_mode();
                }
                "w" => {
                    self.wireframe = !self.wireframe;
                    self.log_draw_mode();
                }
                "r" => self.restart(),
                "l" => self.toggle_loop(),
                "p" => self.toggle_pulse(),
                _ => {}
            },
            _ => {}
        }

        AppControl::Continue
    }

    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl {
        if self.session.is_none() {
            let session = Session::open(&self.options, ctx.gpu);
            ctx.runtime.set_title(
                ctx.window.id,
                format!("{} - movie viewer", session.composition.name()),
            );
            self.session = Some(session);
        }

        let Some(session) = self.session.as_mut() else {
            return AppControl::Continue;
        };

        if session.composition.is_playing() && !session.composition.is_paused() {
            session.composition.update(ctx.time.dt);
        }

        let mode = DrawMode::from_toggles(self.solid, self.wireframe);
        let viewport = session.composition.size();

        let Session {
            mesh_gpu,
            cache,
            composition,
        } = session;

        ctx.render(CLEAR, viewport, |rctx, target| {
            let Some(mode) = mode else { return };

            let mut frame = mesh_gpu.frame(rctx, target);
            let stats = composition.draw(&mut frame, cache, mode);
            log::trace!("frame: {stats:?}");
        })
    }

    fn on_window_closing(&mut self, _window_id: WindowId, gpu: &Gpu<'_>) {
        if let Some(session) = self.session.take() {
            session.close(gpu);
        }
    }
}
