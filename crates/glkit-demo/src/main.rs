//! Draws a single triangle with a shader program built by `glkit::shader`.
//!
//! Run from anywhere inside the workspace; the working directory is moved to
//! this crate so `assets/` resolves. `--width`, `--height` and `--screen`
//! override the window defaults. Escape quits.

mod triangle;

use anyhow::Result;

use glkit::config::{AppConfig, GlVersion};
use glkit::core::AppControl;
use glkit::input::KeyState;
use glkit::logging::{init_logging, LoggingConfig};
use glkit::path;
use glkit::window::App;

use crate::triangle::TriangleScene;

fn main() -> Result<()> {
    init_logging(LoggingConfig::default());

    path::set_working_dir("crates/glkit-demo")?;

    let config = AppConfig {
        name: "Example App".to_string(),
        default_screen_width: 320,
        default_screen_height: 200,
        escape_to_quit: true,
        supported_gl_versions: vec![
            GlVersion::new(4, 3),
            GlVersion::new(4, 1),
        ],
        ..AppConfig::default()
    };

    App::new(config, TriangleScene::default())
        .with_key_callback(|input| {
            if input.state == KeyState::Pressed && !input.repeat {
                log::debug!("key pressed: {}", input.key);
            }
            AppControl::Continue
        })
        .run()
}
