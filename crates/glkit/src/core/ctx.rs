use std::rc::Rc;

use crate::config::GlVersion;
use crate::device::GlContext;

/// Context passed to [`Scene::setup`](super::Scene::setup).
pub struct SceneCtx {
    gl: Rc<GlContext>,
    gl_version: GlVersion,
    title: String,
    screen_width: u32,
    screen_height: u32,
}

impl SceneCtx {
    pub(crate) fn new(
        gl: Rc<GlContext>,
        gl_version: GlVersion,
        title: String,
        screen_width: u32,
        screen_height: u32,
    ) -> Self {
        Self {
            gl,
            gl_version,
            title,
            screen_width,
            screen_height,
        }
    }

    /// Shared handle to the GL function table. Clone it to keep it past setup.
    pub fn gl(&self) -> &Rc<GlContext> {
        &self.gl
    }

    /// The context version that was negotiated.
    pub fn gl_version(&self) -> GlVersion {
        self.gl_version
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// Framebuffer size in physical pixels as `(width, height)` when setup
    /// runs. Later changes arrive through [`Scene::resize`](super::Scene::resize).
    pub fn screen_size(&self) -> (u32, u32) {
        (self.screen_width, self.screen_height)
    }
}
