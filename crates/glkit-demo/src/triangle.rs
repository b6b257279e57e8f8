use std::rc::Rc;

use anyhow::{anyhow, Result};
use bytemuck::{Pod, Zeroable};
use glow::HasContext;

use glkit::core::{Scene, SceneCtx};
use glkit::device::GlContext;
use glkit::shader::{self, Program, ShaderInfo};

#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
struct Vertex {
    position: [f32; 2],
}

const VERTICES: [Vertex; 3] = [
    Vertex { position: [-0.90, -0.90] },
    Vertex { position: [0.90, -0.90] },
    Vertex { position: [0.0, 0.90] },
];

const MC_VERTEX_LOC: u32 = 0;

struct Gpu {
    gl: Rc<GlContext>,
    program: Program<GlContext>,
    vao: glow::VertexArray,
    vbo: glow::Buffer,
}

/// A static blue triangle.
#[derive(Default)]
pub struct TriangleScene {
    gpu: Option<Gpu>,
}

impl Scene for TriangleScene {
    fn setup(&mut self, ctx: &SceneCtx) -> Result<()> {
        let gl = Rc::clone(ctx.gl());
        log::info!("setting up triangle scene on OpenGL {}", ctx.gl_version());

        let shaders = [
            ShaderInfo::vertex("assets/simple.vert"),
            ShaderInfo::fragment("assets/simple.frag"),
        ];
        let program = shader::load(&gl, &shaders)?;

        // SAFETY: setup runs on the thread that owns the current context.
        let (vao, vbo) = unsafe {
            gl.use_program(Some(program.raw()));

            let vao = gl.create_vertex_array().map_err(|e| anyhow!(e))?;
            gl.bind_vertex_array(Some(vao));

            let vbo = gl.create_buffer().map_err(|e| anyhow!(e))?;
            gl.bind_buffer(glow::ARRAY_BUFFER, Some(vbo));
            gl.buffer_data_u8_slice(
                glow::ARRAY_BUFFER,
                bytemuck::cast_slice(&VERTICES),
                glow::STATIC_DRAW,
            );

            gl.vertex_attrib_pointer_f32(MC_VERTEX_LOC, 2, glow::FLOAT, false, 0, 0);
            gl.enable_vertex_attrib_array(MC_VERTEX_LOC);

            (vao, vbo)
        };

        self.gpu = Some(Gpu {
            gl,
            program,
            vao,
            vbo,
        });
        Ok(())
    }

    fn update(&mut self, _dt: f32) {
        // Static scene.
    }

    fn resize(&mut self, width: u32, height: u32) {
        log::debug!("triangle scene resized to {width}x{height}");
    }

    fn display(&mut self) {
        let Some(gpu) = &self.gpu else {
            return;
        };

        // SAFETY: display runs on the thread that owns the current context.
        unsafe {
            gpu.gl.clear(glow::COLOR_BUFFER_BIT);
            gpu.gl.use_program(Some(gpu.program.raw()));
            gpu.gl.bind_vertex_array(Some(gpu.vao));
            gpu.gl.draw_arrays(glow::TRIANGLES, 0, VERTICES.len() as i32);
        }
    }

    fn cleanup(&mut self) {
        let Some(gpu) = self.gpu.take() else {
            return;
        };

        // SAFETY: cleanup runs on the thread that owns the current context.
        unsafe {
            gpu.gl.use_program(None);
            gpu.gl.delete_buffer(gpu.vbo);
            gpu.gl.delete_vertex_array(gpu.vao);
        }
        gpu.program.delete();
    }
}
