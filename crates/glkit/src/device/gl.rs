use std::num::NonZeroU32;
use std::rc::Rc;

use anyhow::{anyhow, Context, Result};
use glow::HasContext;
use glutin::config::{Config, ConfigTemplateBuilder, GlConfig};
use glutin::context::{
    ContextApi, ContextAttributesBuilder, GlProfile, NotCurrentGlContext, PossiblyCurrentContext,
    Version,
};
use glutin::display::{GetGlDisplay, GlDisplay};
use glutin::surface::{GlSurface, Surface, SwapInterval, WindowSurface};
use glutin_winit::{DisplayBuilder, GlWindow};
use raw_window_handle::HasWindowHandle;
use winit::dpi::{LogicalSize, PhysicalSize};
use winit::event_loop::ActiveEventLoop;
use winit::window::{Fullscreen, Window};

use crate::config::{AppConfig, GlVersion, WindowSettings};

use super::context::GlContext;
use super::negotiate::{negotiate, select_monitor};

/// A window with a current OpenGL context.
///
/// Field order is drop order: the context is released before its surface and
/// the surface before the window.
pub struct GlDevice {
    gl: Rc<GlContext>,
    context: PossiblyCurrentContext,
    surface: Surface<WindowSurface>,
    window: Window,
    version: GlVersion,
}

impl GlDevice {
    /// Creates the window and negotiates a core-profile context, trying each
    /// of `config.supported_gl_versions` in order.
    pub fn new(
        event_loop: &ActiveEventLoop,
        settings: &WindowSettings,
        config: &AppConfig,
    ) -> Result<Self> {
        let monitors = event_loop
            .available_monitors()
            .map(|m| (m.name(), m))
            .collect();
        let monitor = select_monitor(monitors, settings.screen)?;

        let mut attrs = Window::default_attributes()
            .with_title(settings.title.clone())
            .with_inner_size(LogicalSize::new(settings.width as f64, settings.height as f64))
            .with_resizable(false);
        if let Some(monitor) = monitor {
            attrs = attrs.with_fullscreen(Some(Fullscreen::Borderless(Some(monitor))));
        }

        let (window, gl_config) = DisplayBuilder::new()
            .with_window_attributes(Some(attrs))
            .build(event_loop, ConfigTemplateBuilder::new(), pick_config)
            .map_err(|e| anyhow!("failed to create window: {e}"))?;
        let window = window.context("display builder did not create a window")?;

        let raw_handle = window
            .window_handle()
            .context("window has no raw handle")?
            .as_raw();
        let display = gl_config.display();

        let (version, not_current) = negotiate(&config.supported_gl_versions, |v| {
            let attrs = ContextAttributesBuilder::new()
                .with_profile(GlProfile::Core)
                .with_context_api(ContextApi::OpenGl(Some(Version::new(v.major, v.minor))))
                .build(Some(raw_handle));
            // SAFETY: `raw_handle` belongs to `window`, which outlives the context.
            unsafe { display.create_context(&gl_config, &attrs) }
        })?;

        let surface_attrs = window
            .build_surface_attributes(Default::default())
            .context("failed to build window surface attributes")?;
        // SAFETY: the surface is dropped before `window` (see field order).
        let surface = unsafe { display.create_window_surface(&gl_config, &surface_attrs) }
            .context("failed to create window surface")?;

        let context = not_current
            .make_current(&surface)
            .context("failed to make OpenGL context current")?;

        if config.vsync {
            if let Err(e) = surface.set_swap_interval(&context, SwapInterval::Wait(NonZeroU32::MIN)) {
                log::warn!("failed to enable vsync: {e}");
            }
        }

        // SAFETY: the context is current on this thread.
        let gl = unsafe { GlContext::from_loader(|s| display.get_proc_address(s)) };

        Ok(Self {
            gl: Rc::new(gl),
            context,
            surface,
            window,
            version,
        })
    }

    pub fn gl(&self) -> &Rc<GlContext> {
        &self.gl
    }

    pub fn window(&self) -> &Window {
        &self.window
    }

    pub fn version(&self) -> GlVersion {
        self.version
    }

    pub fn size(&self) -> PhysicalSize<u32> {
        self.window.inner_size()
    }

    /// Logs the driver identification strings.
    pub fn log_info(&self) {
        // SAFETY: the context is current on this thread.
        unsafe {
            log::info!("OpenGL vendor {}", self.gl.get_parameter_string(glow::VENDOR));
            log::info!("OpenGL renderer {}", self.gl.get_parameter_string(glow::RENDERER));
            log::info!("OpenGL version {}", self.gl.get_parameter_string(glow::VERSION));
            log::info!(
                "GLSL version {}",
                self.gl.get_parameter_string(glow::SHADING_LANGUAGE_VERSION)
            );
        }
    }

    /// Resizes the surface and viewport. Zero-sized updates are ignored.
    pub fn resize(&self, size: PhysicalSize<u32>) {
        let (Some(w), Some(h)) = (NonZeroU32::new(size.width), NonZeroU32::new(size.height)) else {
            return;
        };

        self.surface.resize(&self.context, w, h);
        // SAFETY: the context is current on this thread.
        unsafe { self.gl.viewport(0, 0, size.width as i32, size.height as i32) };
    }

    pub fn flush(&self) {
        // SAFETY: the context is current on this thread.
        unsafe { self.gl.flush() };
    }

    pub fn swap_buffers(&self) -> Result<()> {
        self.surface
            .swap_buffers(&self.context)
            .context("failed to swap buffers")
    }
}

/// Prefers the config with the fewest samples; demos opt into MSAA themselves.
fn pick_config(configs: Box<dyn Iterator<Item = Config> + '_>) -> Config {
    configs
        .min_by_key(|c| c.num_samples())
        .expect("glutin always offers at least one config to the picker")
}
