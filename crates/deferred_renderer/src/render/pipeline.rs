//! Deferred frame pipeline
//!
//! Sequences the dependent GPU passes of a frame against the backend:
//!
//! 1. **Geometry pass** — scene batched into the gbuffer framebuffer
//! 2. **Shadow pass** (optional) — scene depth from the sun, before the
//!    resolve so the resolve samples this frame's map
//! 3. **Lighting resolve** — fullscreen pass reading the gbuffer plus the
//!    scene's frame/light buffers, into the HDR lit framebuffer
//! 4. **Tonemap** — fullscreen pass mapping the lit result to the default
//!    framebuffer for presentation
//!
//! The pipeline owns no framebuffers or programs; the application creates
//! them through its graphics collaborator and hands over the handles. The
//! lighting and tonemap passes are expressed as [`Material`]s whose
//! texture slots carry the gbuffer / lit attachments.

use crate::render::api::{ClearFlags, FramebufferHandle, ProgramHandle, RenderBackend};
use crate::render::frame_data::{FRAME_DATA_SLOT, POINT_LIGHT_SLOT};
use crate::render::material::Material;
use crate::render::primitives::Camera;
use crate::render::{BufferKind, RenderResult};
use crate::scene::Scene;

/// Shadow pass resources: a depth framebuffer and a depth-only program
#[derive(Debug, Clone, Copy)]
pub struct ShadowPass {
    /// Depth target rendered from the sun's perspective
    pub framebuffer: FramebufferHandle,

    /// Depth-only program bound for the whole pass
    pub program: ProgramHandle,
}

/// Frame orchestrator for the deferred pipeline
///
/// Holds the per-pass targets and materials and replays the pass sequence
/// every frame. All per-frame GPU data is rebuilt by the scene; the
/// pipeline itself carries no frame state beyond a counter.
pub struct DeferredPipeline {
    gbuffer: FramebufferHandle,
    lit: FramebufferHandle,
    shadow: Option<ShadowPass>,
    lighting_material: Material,
    tonemap_material: Material,
    frame_count: u64,
}

impl DeferredPipeline {
    /// Create a pipeline without a shadow pass
    ///
    /// `lighting_material` should sample the gbuffer attachments;
    /// `tonemap_material` should sample the lit attachment.
    #[must_use]
    pub fn new(
        gbuffer: FramebufferHandle,
        lit: FramebufferHandle,
        lighting_material: Material,
        tonemap_material: Material,
    ) -> Self {
        Self {
            gbuffer,
            lit,
            shadow: None,
            lighting_material,
            tonemap_material,
            frame_count: 0,
        }
    }

    /// Enable the sun shadow pass
    #[must_use]
    pub fn with_shadow_pass(mut self, shadow: ShadowPass) -> Self {
        self.shadow = Some(shadow);
        self
    }

    /// Number of frames rendered so far
    #[must_use]
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Render one complete frame
    pub fn render_frame(
        &mut self,
        scene: &Scene,
        camera: &Camera,
        backend: &mut dyn RenderBackend,
    ) -> RenderResult<()> {
        log::trace!("frame {}", self.frame_count);

        // Geometry pass
        backend.bind_framebuffer(self.gbuffer, ClearFlags::COLOR | ClearFlags::DEPTH);
        scene.render(camera, backend)?;

        // Shadow pass runs before the resolve that samples its output
        if let Some(shadow) = self.shadow {
            backend.bind_framebuffer(shadow.framebuffer, ClearFlags::DEPTH);
            backend.bind_program(shadow.program);
            scene.render_shadowmap(camera, backend)?;
        }

        // Lighting resolve
        let frame_buffer = scene.frame_data_buffer(camera, backend)?;
        backend.bind_buffer(frame_buffer, BufferKind::Uniform, FRAME_DATA_SLOT);
        let light_buffer = scene.point_light_buffer(backend)?;
        backend.bind_buffer(light_buffer, BufferKind::Storage, POINT_LIGHT_SLOT);

        backend.bind_framebuffer(self.lit, ClearFlags::COLOR);
        backend.bind_material(&self.lighting_material);
        backend.draw_fullscreen()?;

        // Tonemap to the presentation target
        backend.bind_default_framebuffer(ClearFlags::COLOR);
        backend.bind_material(&self.tonemap_material);
        backend.draw_fullscreen()?;

        backend.destroy_buffer(light_buffer);
        backend.destroy_buffer(frame_buffer);

        self.frame_count += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::{Mat4, Vec3};
    use crate::render::backends::{Command, HeadlessBackend};
    use crate::render::primitives::{MeshData, MeshResource};
    use crate::scene::RenderObject;

    struct Fixture {
        backend: HeadlessBackend,
        pipeline: DeferredPipeline,
        scene: Scene,
    }

    fn fixture(with_shadow: bool) -> Fixture {
        let mut backend = HeadlessBackend::new();

        let gbuffer = backend.register_framebuffer("gbuffer");
        let lit = backend.register_framebuffer("lit");
        let lighting = Material::new(backend.load_program("lighting").unwrap());
        let tonemap = Material::new(backend.load_program("tonemap").unwrap());
        let mut pipeline = DeferredPipeline::new(gbuffer, lit, lighting, tonemap);
        if with_shadow {
            pipeline = pipeline.with_shadow_pass(ShadowPass {
                framebuffer: backend.register_framebuffer("shadow"),
                program: backend.load_program("shadow_depth").unwrap(),
            });
        }

        let mut scene = Scene::new();
        let mesh = scene.add_mesh(MeshResource::new(&MeshData::cube(), &mut backend).unwrap());
        let program = backend.load_program("gbuffer").unwrap();
        let material = scene.add_material(Material::new(program));
        scene.add_object(RenderObject::new(mesh, material, Mat4::identity()));

        Fixture {
            backend,
            pipeline,
            scene,
        }
    }

    fn camera() -> Camera {
        Camera::perspective(Vec3::new(0.0, 0.0, 10.0), 60.0, 1.0, 0.1, 100.0)
    }

    #[test]
    fn test_pass_sequence_without_shadows() {
        let mut f = fixture(false);
        f.pipeline.render_frame(&f.scene, &camera(), &mut f.backend).unwrap();

        let framebuffer_binds: Vec<&Command> = f
            .backend
            .commands()
            .iter()
            .filter(|c| {
                matches!(
                    c,
                    Command::BindFramebuffer { .. } | Command::BindDefaultFramebuffer { .. }
                )
            })
            .collect();

        // gbuffer, lit, default - in that order
        assert_eq!(framebuffer_binds.len(), 3);
        assert!(matches!(
            framebuffer_binds[2],
            Command::BindDefaultFramebuffer { .. }
        ));

        // Two fullscreen draws: lighting resolve and tonemap
        let fullscreen = f
            .backend
            .commands()
            .iter()
            .filter(|c| matches!(c, Command::DrawFullscreen))
            .count();
        assert_eq!(fullscreen, 2);

        assert_eq!(f.pipeline.frame_count(), 1);
    }

    #[test]
    fn test_shadow_pass_runs_before_lighting_resolve() {
        let mut f = fixture(true);
        f.pipeline.render_frame(&f.scene, &camera(), &mut f.backend).unwrap();

        let commands = f.backend.commands();
        let shadow_program = f
            .backend
            .commands()
            .iter()
            .position(|c| matches!(c, Command::BindProgram { .. }))
            .expect("no shadow program bound");
        let first_fullscreen = commands
            .iter()
            .position(|c| matches!(c, Command::DrawFullscreen))
            .expect("no lighting resolve");

        assert!(shadow_program < first_fullscreen);
    }

    #[test]
    fn test_geometry_pass_targets_gbuffer_first() {
        let mut f = fixture(true);
        f.pipeline.render_frame(&f.scene, &camera(), &mut f.backend).unwrap();

        match &f.backend.commands()[0] {
            Command::BindFramebuffer { framebuffer, clear } => {
                assert_eq!(f.backend.framebuffer_name(*framebuffer), Some("gbuffer"));
                assert_eq!(*clear, ClearFlags::COLOR | ClearFlags::DEPTH);
            }
            other => panic!("expected gbuffer bind first, got {other:?}"),
        }
    }

    #[test]
    fn test_resolve_buffers_destroyed_after_frame() {
        let mut f = fixture(false);
        f.pipeline.render_frame(&f.scene, &camera(), &mut f.backend).unwrap();

        let frame = f
            .backend
            .bound_buffer(BufferKind::Uniform, FRAME_DATA_SLOT)
            .unwrap();
        let lights = f
            .backend
            .bound_buffer(BufferKind::Storage, POINT_LIGHT_SLOT)
            .unwrap();
        assert!(f.backend.is_buffer_destroyed(frame));
        assert!(f.backend.is_buffer_destroyed(lights));
    }

    #[test]
    fn test_frame_count_advances_per_frame() {
        let mut f = fixture(false);
        let camera = camera();
        for _ in 0..3 {
            f.pipeline.render_frame(&f.scene, &camera, &mut f.backend).unwrap();
        }
        assert_eq!(f.pipeline.frame_count(), 3);
    }
}
