//! Deterministic in-memory driver used by the shader tests.
//!
//! Compile rule: a source fails when it is empty or when any line starts with
//! `#error`; the log names the line and the rest of that line.
//! Link rule: a program fails with no attached shaders or with two attached
//! shaders of the same kind.
//! [`MockGl::without_separable`] models a context that cannot set program
//! parameters.

use std::cell::RefCell;
use std::collections::HashMap;
use std::path::PathBuf;

use super::api::ShaderApi;
use super::info::ShaderKind;

pub(crate) fn testdata(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("testdata")
        .join("shaders")
        .join(name)
}

struct MockShader {
    kind: ShaderKind,
    source: String,
    compiled: bool,
    log: String,
}

#[derive(Default)]
struct MockProgram {
    attached: Vec<u32>,
    separable: bool,
    separable_at_link: Option<bool>,
    linked: bool,
    log: String,
}

#[derive(Default)]
struct State {
    next_id: u32,
    shaders: HashMap<u32, MockShader>,
    programs: HashMap<u32, MockProgram>,
    shaders_created: usize,
    invalid_deletes: usize,
}

impl State {
    fn next_id(&mut self) -> u32 {
        self.next_id += 1;
        self.next_id
    }
}

#[derive(Default)]
pub(crate) struct MockGl {
    state: RefCell<State>,
    no_separable: bool,
}

impl MockGl {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn without_separable() -> Self {
        Self {
            no_separable: true,
            ..Self::default()
        }
    }

    pub(crate) fn shaders_created(&self) -> usize {
        self.state.borrow().shaders_created
    }

    pub(crate) fn live_shaders(&self) -> usize {
        self.state.borrow().shaders.len()
    }

    pub(crate) fn live_programs(&self) -> usize {
        self.state.borrow().programs.len()
    }

    /// Deletes of zero, unknown or already-deleted handles.
    pub(crate) fn invalid_deletes(&self) -> usize {
        self.state.borrow().invalid_deletes
    }

    pub(crate) fn attached(&self, program: u32) -> Vec<u32> {
        self.state
            .borrow()
            .programs
            .get(&program)
            .map(|p| p.attached.clone())
            .unwrap_or_default()
    }

    /// Separable flag as it was when `link_program` ran.
    pub(crate) fn separable_at_link(&self, program: u32) -> Option<bool> {
        self.state
            .borrow()
            .programs
            .get(&program)
            .and_then(|p| p.separable_at_link)
    }
}

fn compile_log(source: &str) -> Option<String> {
    if source.trim().is_empty() {
        return Some("ERROR: 0:0: '' : empty shader source\n".to_string());
    }

    source.lines().enumerate().find_map(|(i, line)| {
        line.trim_start()
            .strip_prefix("#error")
            .map(|rest| format!("ERROR: 0:{}: '{}' : syntax error\n", i + 1, rest.trim()))
    })
}

impl ShaderApi for MockGl {
    type Shader = u32;
    type Program = u32;

    fn create_shader(&self, kind: ShaderKind) -> Result<u32, String> {
        let mut st = self.state.borrow_mut();
        let id = st.next_id();
        st.shaders.insert(
            id,
            MockShader {
                kind,
                source: String::new(),
                compiled: false,
                log: String::new(),
            },
        );
        st.shaders_created += 1;
        Ok(id)
    }

    fn shader_source(&self, shader: u32, source: &str) {
        if let Some(s) = self.state.borrow_mut().shaders.get_mut(&shader) {
            s.source = source.to_string();
        }
    }

    fn compile_shader(&self, shader: u32) {
        if let Some(s) = self.state.borrow_mut().shaders.get_mut(&shader) {
            match compile_log(&s.source) {
                Some(log) => {
                    s.compiled = false;
                    s.log = log;
                }
                None => {
                    s.compiled = true;
                    s.log.clear();
                }
            }
        }
    }

    fn shader_compile_status(&self, shader: u32) -> bool {
        self.state
            .borrow()
            .shaders
            .get(&shader)
            .is_some_and(|s| s.compiled)
    }

    fn shader_info_log(&self, shader: u32) -> String {
        self.state
            .borrow()
            .shaders
            .get(&shader)
            .map(|s| format!("{}\0", s.log))
            .unwrap_or_default()
    }

    fn delete_shader(&self, shader: u32) {
        let mut st = self.state.borrow_mut();
        if st.shaders.remove(&shader).is_none() {
            st.invalid_deletes += 1;
        }
    }

    fn create_program(&self) -> Result<u32, String> {
        let mut st = self.state.borrow_mut();
        let id = st.next_id();
        st.programs.insert(id, MockProgram::default());
        Ok(id)
    }

    fn attach_shader(&self, program: u32, shader: u32) {
        if let Some(p) = self.state.borrow_mut().programs.get_mut(&program) {
            p.attached.push(shader);
        }
    }

    fn set_program_separable(&self, program: u32, separable: bool) -> Result<(), String> {
        if self.no_separable {
            return Err("glProgramParameteri is not supported by this context".to_string());
        }
        if let Some(p) = self.state.borrow_mut().programs.get_mut(&program) {
            p.separable = separable;
        }
        Ok(())
    }

    fn link_program(&self, program: u32) {
        let mut st = self.state.borrow_mut();
        let State {
            shaders, programs, ..
        } = &mut *st;

        let Some(p) = programs.get_mut(&program) else {
            return;
        };
        p.separable_at_link = Some(p.separable);

        let mut kinds: Vec<ShaderKind> = Vec::new();
        let mut failure = None;
        if p.attached.is_empty() {
            failure = Some("error: no shaders attached to program\n".to_string());
        }
        for id in &p.attached {
            match shaders.get(id) {
                Some(s) if !s.compiled => {
                    failure = Some(format!("error: shader {id} is not compiled\n"));
                }
                Some(s) if kinds.contains(&s.kind) => {
                    failure = Some(format!("error: multiple {} shaders attached\n", s.kind));
                }
                Some(s) => kinds.push(s.kind),
                None => failure = Some(format!("error: shader {id} does not exist\n")),
            }
        }

        p.linked = failure.is_none();
        p.log = failure.unwrap_or_default();
    }

    fn program_link_status(&self, program: u32) -> bool {
        self.state
            .borrow()
            .programs
            .get(&program)
            .is_some_and(|p| p.linked)
    }

    fn program_info_log(&self, program: u32) -> String {
        self.state
            .borrow()
            .programs
            .get(&program)
            .map(|p| format!("{}\0", p.log))
            .unwrap_or_default()
    }

    fn delete_program(&self, program: u32) {
        let mut st = self.state.borrow_mut();
        if st.programs.remove(&program).is_none() {
            st.invalid_deletes += 1;
        }
    }
}
