//! Headless deferred-rendering demo
//!
//! Builds the default scene (a cube with two colored point lights), runs a
//! few frames of the full deferred pipeline on the command-recording
//! backend, and logs what was submitted. Useful as an executable tour of
//! the frame structure without any graphics API present.

use deferred_renderer::prelude::*;
use deferred_renderer::render::backends::Command;
use deferred_renderer::render::ShadowPass;

/// Build the default scene: one cube, two point lights
fn create_default_scene(backend: &mut HeadlessBackend) -> Scene {
    let mut scene = Scene::new();

    let mesh_data = MeshData::cube();
    let mesh = scene
        .add_mesh(MeshResource::new(&mesh_data, backend).expect("cube upload failed"));
    let program = backend.load_program("gbuffer").expect("program load failed");
    let material = scene.add_material(Material::new(program));
    scene.add_object(RenderObject::new(mesh, material, Mat4::identity()));

    scene.add_point_light(PointLight::new(
        Vec3::new(1.0, 2.0, 4.0),
        100.0,
        Vec3::new(0.0, 10.0, 0.0),
    ));
    scene.add_point_light(PointLight::new(
        Vec3::new(1.0, 2.0, -4.0),
        50.0,
        Vec3::new(10.0, 0.0, 0.0),
    ));

    scene
}

fn main() {
    deferred_renderer::foundation::logging::init();
    log::info!("starting headless deferred-rendering demo");

    let mut backend = HeadlessBackend::new();

    // Per-pass targets and resolve materials; on a real backend these
    // framebuffers would own gbuffer/lit/shadow attachments
    let gbuffer = backend.register_framebuffer("gbuffer");
    let lit = backend.register_framebuffer("lit");
    let shadow = backend.register_framebuffer("shadow");

    let lighting_material = Material::new(backend.load_program("lighting").unwrap());
    let tonemap_material = Material::new(backend.load_program("tonemap").unwrap());
    let shadow_program = backend.load_program("shadow_depth").unwrap();

    let mut pipeline = DeferredPipeline::new(gbuffer, lit, lighting_material, tonemap_material)
        .with_shadow_pass(ShadowPass {
            framebuffer: shadow,
            program: shadow_program,
        });

    let mut scene = create_default_scene(&mut backend);
    let mut camera = Camera::perspective(Vec3::new(2.0, 2.0, 10.0), 45.0, 16.0 / 9.0, 0.1, 100.0);
    camera.look_at(Vec3::zeros(), Vec3::y());

    for frame in 0..3 {
        backend.clear_commands();
        pipeline
            .render_frame(&scene, &camera, &mut backend)
            .expect("frame failed");

        let draws = backend.mesh_draw_count();
        let fullscreen = backend
            .commands()
            .iter()
            .filter(|c| matches!(c, Command::DrawFullscreen))
            .count();
        log::info!(
            "frame {frame}: {} commands, {draws} instanced draws, {fullscreen} fullscreen passes",
            backend.commands().len()
        );
    }

    println!("rendered {} frames", pipeline.frame_count());
    println!("last frame command stream:");
    for command in backend.commands() {
        println!("  {command:?}");
    }

    // Ordered teardown: GPU resources go first, while the backend is alive
    scene.release_gpu_resources(&mut backend);
}
