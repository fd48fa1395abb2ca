//! Headless resource demo
//!
//! Builds a small frame setup (vertex buffer, shader, pipeline, render target
//! and its view) on the headless backend and reports pool usage as the owners
//! go out of scope. An optional `.toml` or `.ron` path overrides pool sizes.

use std::error::Error;

use gfx_handles::foundation::logging::{self, LevelFilter};
use gfx_handles::prelude::*;

const VERTEX_SOURCE: &str = "
    layout(location = 0) in vec3 position;
    void main() { gl_Position = vec4(position, 1.0); }
";

const FRAGMENT_SOURCE: &str = "
    layout(location = 0) out vec4 color;
    void main() { color = vec4(1.0); }
";

struct Frame {
    vertices: Owned<Buffer>,
    shader: Owned<Shader>,
    pipeline: Owned<Pipeline>,
    color_target: Owned<Image>,
    color_view: Owned<View>,
}

impl Frame {
    fn new(gfx: &Gfx) -> Self {
        let vertices = Owned::<Buffer>::make(gfx, &BufferDesc::vertex_with_data(&[0u8; 256]).label("vertices"));
        let shader = Owned::<Shader>::make(
            gfx,
            &ShaderDesc::from_sources(VERTEX_SOURCE, FRAGMENT_SOURCE).label("triangle"),
        );
        let pipeline = Owned::<Pipeline>::make(gfx, &PipelineDesc::new(shader.get()).label("triangle"));
        let color_target = Owned::<Image>::make(
            gfx,
            &ImageDesc::render_target(800, 600, PixelFormat::Rgba8, 1).label("color"),
        );
        let color_view = Owned::<View>::make(gfx, &ViewDesc::color_attachment(color_target.get()));

        Self {
            vertices,
            shader,
            pipeline,
            color_target,
            color_view,
        }
    }

    fn is_complete(&self) -> bool {
        self.vertices.is_valid()
            && self.shader.is_valid()
            && self.pipeline.is_valid()
            && self.color_target.is_valid()
            && self.color_view.is_valid()
    }
}

fn report(gfx: &Gfx) {
    for kind in ResourceKind::ALL {
        let stats = gfx.stats(kind);
        log::info!(
            "{:>8}: {}/{} live, {} destroy call(s)",
            kind.name(),
            stats.live,
            stats.capacity,
            stats.destroy_calls
        );
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    logging::init_with_level(LevelFilter::Debug);

    let gfx = match std::env::args().nth(1) {
        Some(path) => {
            log::info!("Loading pool sizes from {path}");
            Gfx::from_config_file(path)?
        }
        None => Gfx::new(&GfxConfig::default())?,
    };

    {
        let frame = Frame::new(&gfx);
        log::info!("Frame resources created, complete: {}", frame.is_complete());
        log::info!("Vertex buffer: {:?} ({})", frame.vertices, frame.vertices.state());
        report(&gfx);
    }

    log::info!("Frame dropped");
    report(&gfx);
    Ok(())
}
