use std::path::Path;
use std::rc::Rc;

use anyhow::{Context, Result};

use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::WindowId;

use crate::config::{AppConfig, LaunchArgs, WindowSettings};
use crate::core::{AppControl, Scene, SceneCtx};
use crate::device::GlDevice;
use crate::input::platform::winit::{map_modifiers, translate_key_event};
use crate::input::{Key, KeyInput, Modifiers};
use crate::time::FrameClock;

/// User key handler. Returning [`AppControl::Exit`] closes the window.
pub type KeyCallback = Box<dyn FnMut(&KeyInput) -> AppControl>;

/// Lifecycle of a run.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum RunState {
    Uninitialized,
    WindowCreated,
    SceneReady,
    Running,
    Closing,
    Terminated,
}

impl RunState {
    /// Whether `Scene::setup` has succeeded, so `Scene::cleanup` is owed.
    pub fn scene_ready(self) -> bool {
        matches!(self, RunState::SceneReady | RunState::Running | RunState::Closing)
    }
}

/// A scene plus the configuration used to run it.
pub struct App<S: Scene> {
    config: AppConfig,
    scene: S,
    args: Option<LaunchArgs>,
    key_callback: Option<KeyCallback>,
}

impl<S: Scene> App<S> {
    pub fn new(config: AppConfig, scene: S) -> Self {
        Self {
            config,
            scene,
            args: None,
            key_callback: None,
        }
    }

    /// Overrides the command-line arguments (otherwise read from the process).
    pub fn with_args(mut self, args: LaunchArgs) -> Self {
        self.args = Some(args);
        self
    }

    /// Receives every key event, including the Escape release that quits.
    pub fn with_key_callback<F>(mut self, callback: F) -> Self
    where
        F: FnMut(&KeyInput) -> AppControl + 'static,
    {
        self.key_callback = Some(Box::new(callback));
        self
    }

    /// Opens the window, runs the scene until the window closes and returns
    /// any initialization error.
    pub fn run(self) -> Result<()> {
        let args = match self.args {
            Some(args) => args,
            None => LaunchArgs::from_env().context("invalid command-line arguments")?,
        };
        let settings = WindowSettings::resolve(&self.config, &args, &program_name());
        log::debug!("window settings: {settings:?}");

        let event_loop = EventLoop::new().context("failed to create winit EventLoop")?;
        event_loop.set_control_flow(ControlFlow::Poll);

        let keys = KeyRouter::new(self.config.escape_to_quit, self.key_callback);
        let mut runtime = Runtime::new(self.config, settings, self.scene, keys);

        event_loop
            .run_app(&mut runtime)
            .context("winit event loop terminated with error")?;

        runtime.finish()
    }
}

fn program_name() -> String {
    std::env::args()
        .next()
        .and_then(|arg0| {
            Path::new(&arg0)
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
        })
        .unwrap_or_else(|| "glkit".to_string())
}

/// Routes key events to escape-to-quit and the user callback.
pub(crate) struct KeyRouter {
    escape_to_quit: bool,
    modifiers: Modifiers,
    callback: Option<KeyCallback>,
}

impl KeyRouter {
    pub(crate) fn new(escape_to_quit: bool, callback: Option<KeyCallback>) -> Self {
        Self {
            escape_to_quit,
            modifiers: Modifiers::default(),
            callback,
        }
    }

    pub(crate) fn modifiers(&self) -> Modifiers {
        self.modifiers
    }

    pub(crate) fn set_modifiers(&mut self, modifiers: Modifiers) {
        self.modifiers = modifiers;
    }

    pub(crate) fn route(&mut self, input: &KeyInput) -> AppControl {
        let mut control = AppControl::Continue;

        if self.escape_to_quit && input.is_release_of(Key::Escape) {
            control = AppControl::Exit;
        }

        if let Some(callback) = self.callback.as_mut() {
            if callback(input) == AppControl::Exit {
                control = AppControl::Exit;
            }
        }

        control
    }
}

// `device` is torn down in `exiting`, right after `Scene::cleanup`, while the
// event loop still owns the display. Field order keeps `scene` dropping before
// `device` on any other path.
struct Runtime<S: Scene> {
    config: AppConfig,
    settings: WindowSettings,
    scene: S,
    keys: KeyRouter,
    clock: FrameClock,
    state: RunState,
    error: Option<anyhow::Error>,
    /// Last framebuffer size reported to the scene, in physical pixels.
    size: (u32, u32),
    device: Option<GlDevice>,
}

impl<S: Scene> Runtime<S> {
    fn new(config: AppConfig, settings: WindowSettings, scene: S, keys: KeyRouter) -> Self {
        Self {
            config,
            settings,
            scene,
            keys,
            clock: FrameClock::new(),
            state: RunState::Uninitialized,
            error: None,
            size: (0, 0),
            device: None,
        }
    }

    fn set_state(&mut self, next: RunState) {
        log::debug!("runtime state {:?} -> {:?}", self.state, next);
        self.state = next;
    }

    fn initialize(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let device = GlDevice::new(event_loop, &self.settings, &self.config)?;
        self.set_state(RunState::WindowCreated);
        device.log_info();

        let size = device.size();
        self.size = (size.width, size.height);
        let ctx = SceneCtx::new(
            Rc::clone(device.gl()),
            device.version(),
            self.settings.title.clone(),
            size.width,
            size.height,
        );
        self.device = Some(device);

        self.scene.setup(&ctx).context("scene setup failed")?;
        self.set_state(RunState::SceneReady);

        self.clock.reset();
        self.set_state(RunState::Running);
        Ok(())
    }

    fn frame(&mut self) -> Result<()> {
        if self.state != RunState::Running {
            return Ok(());
        }
        let Some(device) = self.device.as_ref() else {
            return Ok(());
        };

        let ft = self.clock.tick();
        self.scene.update(ft.dt);
        self.scene.display();

        if !self.config.skip_flush_after_loop {
            device.flush();
        }
        device.window().pre_present_notify();
        device.swap_buffers()
    }

    /// Resizes the surface and forwards real size changes to the scene.
    /// Zero sizes (minimized windows) are ignored.
    fn resize(&mut self, size: PhysicalSize<u32>) {
        if size.width == 0 || size.height == 0 {
            return;
        }
        if let Some(device) = &self.device {
            device.resize(size);
        }

        let next = (size.width, size.height);
        if next == self.size {
            return;
        }
        log::debug!("framebuffer resized to {}x{}", next.0, next.1);
        self.size = next;

        if self.state.scene_ready() {
            self.scene.resize(next.0, next.1);
        }
    }

    /// Runs `Scene::cleanup` if it is owed, then destroys the context and
    /// window.
    fn shutdown(&mut self) {
        if self.state.scene_ready() {
            self.scene.cleanup();
        }
        if let Some(device) = self.device.take() {
            log::debug!("destroying OpenGL context and window");
            drop(device);
        }
        if self.state != RunState::Terminated {
            self.set_state(RunState::Terminated);
        }
    }

    fn request_close(&mut self, event_loop: &ActiveEventLoop) {
        if self.state == RunState::Running {
            self.set_state(RunState::Closing);
        }
        event_loop.exit();
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, err: anyhow::Error) {
        log::error!("{err:#}");
        if self.error.is_none() {
            self.error = Some(err);
        }
        self.request_close(event_loop);
    }

    fn finish(self) -> Result<()> {
        match self.error {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

impl<S: Scene> ApplicationHandler for Runtime<S> {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.state != RunState::Uninitialized {
            return;
        }

        if let Err(err) = self.initialize(event_loop) {
            self.fail(event_loop, err);
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if self.state != RunState::Running {
            return;
        }
        if let Some(device) = &self.device {
            device.window().request_redraw();
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => self.request_close(event_loop),

            WindowEvent::ModifiersChanged(m) => self.keys.set_modifiers(map_modifiers(m.state())),

            WindowEvent::KeyboardInput { event, .. } => {
                let input = translate_key_event(&event, self.keys.modifiers());
                if self.keys.route(&input) == AppControl::Exit {
                    self.request_close(event_loop);
                }
            }

            WindowEvent::Resized(size) => self.resize(size),

            WindowEvent::RedrawRequested => {
                if let Err(err) = self.frame() {
                    self.fail(event_loop, err);
                }
            }

            _ => {}
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        self.shutdown();
    }
}
