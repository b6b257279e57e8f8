use std::fmt;
use std::rc::Rc;

use super::api::ShaderApi;
use super::error::{error_message, InfoLogSource, LoadError};
use super::info::{ShaderInfo, ShaderStage};

/// A linked GL program.
///
/// The native program is deleted when this value is dropped unless ownership
/// is given up with [`into_raw`](Self::into_raw).
pub struct Program<G: ShaderApi> {
    // `None` once ownership was handed out by `into_raw`.
    gl: Option<Rc<G>>,
    raw: G::Program,
}

impl<G: ShaderApi> Program<G> {
    /// Takes ownership of an existing native program.
    pub fn from_raw(gl: Rc<G>, raw: G::Program) -> Self {
        Self { gl: Some(gl), raw }
    }

    pub fn raw(&self) -> G::Program {
        self.raw
    }

    /// Releases ownership; the caller becomes responsible for deleting it.
    pub fn into_raw(mut self) -> G::Program {
        self.gl = None;
        self.raw
    }

    /// Deletes the native program now.
    pub fn delete(self) {}
}

impl<G: ShaderApi> Drop for Program<G> {
    fn drop(&mut self) {
        if let Some(gl) = self.gl.take() {
            log::debug!("deleting program {:?}", self.raw);
            gl.delete_program(self.raw);
        }
    }
}

impl<G: ShaderApi> fmt::Debug for Program<G> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Program").field("raw", &self.raw).finish()
    }
}

/// Compiles `shaders` in order and links them into a program.
///
/// Every intermediate shader object is released before this returns, on
/// success and on failure alike.
pub fn load<G: ShaderApi>(gl: &Rc<G>, shaders: &[ShaderInfo]) -> Result<Program<G>, LoadError> {
    link(gl, shaders, false)
}

/// Same as [`load`], but marks the program separable before linking.
pub fn load_separable<G: ShaderApi>(
    gl: &Rc<G>,
    shaders: &[ShaderInfo],
) -> Result<Program<G>, LoadError> {
    link(gl, shaders, true)
}

fn link<G: ShaderApi>(
    gl: &Rc<G>,
    shaders: &[ShaderInfo],
    separable: bool,
) -> Result<Program<G>, LoadError> {
    let raw = gl.create_program().map_err(|message| LoadError::Create {
        object: "program",
        message,
    })?;
    let program = Program::from_raw(Rc::clone(gl), raw);
    log::debug!("created program {raw:?} for {} stage(s)", shaders.len());

    let mut stages: Vec<ShaderStage<'_, G>> = Vec::with_capacity(shaders.len());
    for info in shaders {
        let mut stage = ShaderStage::new(gl.as_ref(), info);
        let compiled = stage.compile(raw);
        stages.push(stage);

        if let Err(err) = compiled {
            log::warn!("{err}");
            // `stages` and `program` drop here, releasing every native object.
            return Err(err);
        }
        log::debug!("compiled {} shader {}", info.kind, info.file_name());
    }

    if separable {
        if let Err(message) = gl.set_program_separable(raw, true) {
            log::warn!("failed to mark program {raw:?} separable: {message}");
            return Err(LoadError::Separable { message });
        }
    }

    gl.link_program(raw);

    // Attached shaders are no longer needed once the link has run.
    for stage in &mut stages {
        stage.delete();
    }
    drop(stages);

    if !gl.program_link_status(raw) {
        let log = error_message(gl.as_ref(), InfoLogSource::Program(raw));
        log::warn!("failed to link program {raw:?}: {log}");
        return Err(LoadError::Link { log });
    }

    Ok(program)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shader::mock::{testdata, MockGl};
    use crate::shader::ShaderKind;

    fn valid_pair() -> Vec<ShaderInfo> {
        vec![
            ShaderInfo::vertex(testdata("valid.vert")),
            ShaderInfo::fragment(testdata("valid.frag")),
        ]
    }

    #[test]
    fn valid_pair_links() {
        let gl = Rc::new(MockGl::new());

        let program = load(&gl, &valid_pair()).unwrap();

        assert_ne!(program.raw(), 0);
        assert!(gl.program_link_status(program.raw()));
        assert_eq!(gl.shaders_created(), 2);
        assert_eq!(gl.live_shaders(), 0);
        assert_eq!(gl.live_programs(), 1);
        assert_eq!(gl.invalid_deletes(), 0);
    }

    #[test]
    fn single_stage_links() {
        let gl = Rc::new(MockGl::new());
        let shaders = [ShaderInfo::new(ShaderKind::Compute, testdata("valid.comp"))];

        let program = load(&gl, &shaders).unwrap();

        assert!(gl.program_link_status(program.raw()));
        assert_eq!(gl.live_shaders(), 0);
    }

    #[test]
    fn broken_fragment_releases_vertex_shader() {
        let gl = Rc::new(MockGl::new());
        let shaders = [
            ShaderInfo::vertex(testdata("valid.vert")),
            ShaderInfo::fragment(testdata("broken.frag")),
        ];

        let err = load(&gl, &shaders).unwrap_err();

        match err {
            LoadError::Compile(e) => {
                assert!(e.file.ends_with("broken.frag"));
                assert_eq!(e.kind, ShaderKind::Fragment);
                assert!(e.log.contains("missing_semicolon"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(gl.shaders_created(), 2);
        assert_eq!(gl.live_shaders(), 0);
        assert_eq!(gl.live_programs(), 0);
        assert_eq!(gl.invalid_deletes(), 0);
    }

    #[test]
    fn compile_failure_stops_processing() {
        let gl = Rc::new(MockGl::new());
        let shaders = [
            ShaderInfo::vertex(testdata("broken.vert")),
            ShaderInfo::fragment(testdata("valid.frag")),
        ];

        assert!(load(&gl, &shaders).is_err());
        assert_eq!(gl.shaders_created(), 1);
        assert_eq!(gl.live_shaders(), 0);
        assert_eq!(gl.live_programs(), 0);
    }

    #[test]
    fn missing_file_releases_everything() {
        let gl = Rc::new(MockGl::new());
        let shaders = [
            ShaderInfo::vertex(testdata("valid.vert")),
            ShaderInfo::fragment(testdata("missing.frag")),
        ];

        let err = load(&gl, &shaders).unwrap_err();

        assert!(matches!(err, LoadError::Source { .. }));
        assert_eq!(gl.live_shaders(), 0);
        assert_eq!(gl.live_programs(), 0);
    }

    #[test]
    fn link_failure_releases_everything() {
        let gl = Rc::new(MockGl::new());
        let shaders = [
            ShaderInfo::vertex(testdata("valid.vert")),
            ShaderInfo::vertex(testdata("valid.vert")),
        ];

        let err = load(&gl, &shaders).unwrap_err();

        match err {
            LoadError::Link { log } => assert!(log.contains("vertex")),
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(gl.shaders_created(), 2);
        assert_eq!(gl.live_shaders(), 0);
        assert_eq!(gl.live_programs(), 0);
        assert_eq!(gl.invalid_deletes(), 0);
    }

    #[test]
    fn empty_list_fails_to_link() {
        let gl = Rc::new(MockGl::new());

        let err = load(&gl, &[]).unwrap_err();

        assert!(matches!(err, LoadError::Link { .. }));
        assert_eq!(gl.shaders_created(), 0);
        assert_eq!(gl.live_programs(), 0);
    }

    #[test]
    fn separable_flag_is_set_before_link() {
        let gl = Rc::new(MockGl::new());

        let separable = load_separable(&gl, &valid_pair()).unwrap();
        assert_eq!(gl.separable_at_link(separable.raw()), Some(true));

        let plain = load(&gl, &valid_pair()).unwrap();
        assert_eq!(gl.separable_at_link(plain.raw()), Some(false));
    }

    #[test]
    fn unsupported_separable_releases_everything() {
        let gl = Rc::new(MockGl::without_separable());

        let err = load_separable(&gl, &valid_pair()).unwrap_err();

        assert!(matches!(err, LoadError::Separable { .. }), "{err:?}");
        assert_eq!(gl.shaders_created(), 2);
        assert_eq!(gl.live_shaders(), 0);
        assert_eq!(gl.live_programs(), 0);
        assert_eq!(gl.invalid_deletes(), 0);

        // Plain programs never touch the separable parameter.
        assert!(load(&gl, &valid_pair()).is_ok());
    }

    #[test]
    fn dropping_program_deletes_it() {
        let gl = Rc::new(MockGl::new());

        let program = load(&gl, &valid_pair()).unwrap();
        assert_eq!(gl.live_programs(), 1);

        program.delete();
        assert_eq!(gl.live_programs(), 0);
        assert_eq!(gl.invalid_deletes(), 0);
    }

    #[test]
    fn into_raw_keeps_program_alive() {
        let gl = Rc::new(MockGl::new());

        let raw = load(&gl, &valid_pair()).unwrap().into_raw();
        assert_eq!(gl.live_programs(), 1);
        assert_eq!(Rc::strong_count(&gl), 1);

        gl.delete_program(raw);
        assert_eq!(gl.live_programs(), 0);
        assert_eq!(gl.invalid_deletes(), 0);
    }

    #[test]
    fn into_raw_releases_the_context_handle() {
        let gl = Rc::new(MockGl::new());
        let program = load(&gl, &valid_pair()).unwrap();
        assert_eq!(Rc::strong_count(&gl), 2);

        let raw = program.into_raw();

        assert_eq!(Rc::strong_count(&gl), 1);
        assert!(gl.program_link_status(raw));
        assert_eq!(gl.live_programs(), 1);
    }
}
