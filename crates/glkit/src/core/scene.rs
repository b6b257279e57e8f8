use super::ctx::SceneCtx;

/// Control directive returned by key callbacks.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum AppControl {
    Continue,
    Exit,
}

/// A scene rendered by the runtime.
///
/// Call order: `setup` once, then `update`/`display` every frame until the
/// window closes, then `cleanup` once. `resize` may arrive between frames. `cleanup` is only called if `setup`
/// succeeded. All methods run on the thread that owns the GL context.
pub trait Scene {
    /// Creates GL resources for the scene. An error aborts the run.
    fn setup(&mut self, ctx: &SceneCtx) -> anyhow::Result<()>;

    /// Advances scene state by `dt` seconds.
    fn update(&mut self, dt: f32);

    /// The framebuffer changed to `width` x `height` physical pixels. The
    /// viewport has already been updated.
    fn resize(&mut self, _width: u32, _height: u32) {}

    /// Issues the draw calls for the current frame.
    fn display(&mut self);

    /// Releases resources created in `setup`. The context is destroyed right
    /// after this returns.
    fn cleanup(&mut self);
}
