//! glTF scene loader
//!
//! Imports a glTF file into a [`Scene`]: meshes, materials (base color
//! texture and alpha mode), point lights (`KHR_lights_punctual`), and
//! node transforms. Node hierarchies are flattened at load time — each
//! renderable instance gets its composed world matrix, and the hierarchy
//! itself is discarded.
//!
//! Loading is atomic: on any error the partially-created GPU resources
//! are released and the error is returned, leaving the caller's previous
//! scene untouched.

use crate::assets::AssetError;
use crate::foundation::math::{Mat4, Mat4Ext, Vec3};
use crate::render::api::RenderBackend;
use crate::render::material::{BlendMode, Material};
use crate::render::primitives::{MeshData, MeshResource, Vertex};
use crate::render::PointLight;
use crate::scene::{MaterialKey, MeshKey, RenderObject, Scene};
use std::collections::HashMap;
use std::path::Path;

/// Radius used for point lights that carry no range in the file
const DEFAULT_LIGHT_RADIUS: f32 = 100.0;

/// Load a glTF file into a new scene
///
/// The returned scene contains one render object per (node, primitive)
/// pair of the file's default scene, with flattened world transforms.
pub fn load_gltf<P: AsRef<Path>>(
    path: P,
    backend: &mut dyn RenderBackend,
) -> Result<Scene, AssetError> {
    let path = path.as_ref();
    log::info!("loading glTF scene from {}", path.display());

    let mut scene = Scene::new();
    match build_scene(path, backend, &mut scene) {
        Ok(()) => {
            log::info!(
                "loaded {} objects, {} point lights",
                scene.object_count(),
                scene.point_light_count()
            );
            Ok(scene)
        }
        Err(err) => {
            // Atomic failure: nothing of the partial load survives
            scene.release_gpu_resources(backend);
            Err(err)
        }
    }
}

fn build_scene(
    path: &Path,
    backend: &mut dyn RenderBackend,
    scene: &mut Scene,
) -> Result<(), AssetError> {
    let (document, buffers, images) = gltf::import(path)?;

    let program = backend.load_program("gbuffer")?;

    // Materials, keyed by file index; the entry for `None` is the glTF
    // default material
    let mut materials: HashMap<Option<usize>, MaterialKey> = HashMap::new();
    for gltf_material in document.materials() {
        let mut material = Material::new(program);

        if let Some(info) = gltf_material.pbr_metallic_roughness().base_color_texture() {
            let image = images
                .get(info.texture().source().index())
                .ok_or_else(|| AssetError::InvalidData("texture references a missing image".to_string()))?;
            let pixels = expand_to_rgba8(image.format, &image.pixels)?;
            let texture = backend.create_texture(image.width, image.height, &pixels)?;
            material.set_texture(0, texture);
        }

        if gltf_material.alpha_mode() == gltf::material::AlphaMode::Blend {
            material.set_blend_mode(BlendMode::Alpha);
        }

        materials.insert(gltf_material.index(), scene.add_material(material));
    }
    materials
        .entry(None)
        .or_insert_with(|| scene.add_material(Material::new(program)));

    // Meshes, keyed by (mesh index, primitive index)
    let mut meshes: HashMap<(usize, usize), (MeshKey, Option<usize>)> = HashMap::new();
    for gltf_mesh in document.meshes() {
        for primitive in gltf_mesh.primitives() {
            let data = read_primitive(&primitive, &buffers)?;
            let resource = MeshResource::new(&data, backend)?;
            meshes.insert(
                (gltf_mesh.index(), primitive.index()),
                (scene.add_mesh(resource), primitive.material().index()),
            );
        }
    }

    // Flatten the node hierarchy of the default scene
    let gltf_scene = document
        .default_scene()
        .or_else(|| document.scenes().next())
        .ok_or_else(|| AssetError::InvalidData("glTF file contains no scene".to_string()))?;
    for node in gltf_scene.nodes() {
        flatten_node(&node, &Mat4::identity(), &meshes, &materials, scene);
    }

    Ok(())
}

fn flatten_node(
    node: &gltf::Node<'_>,
    parent: &Mat4,
    meshes: &HashMap<(usize, usize), (MeshKey, Option<usize>)>,
    materials: &HashMap<Option<usize>, MaterialKey>,
    scene: &mut Scene,
) {
    let world = parent * Mat4::from(node.transform().matrix());

    if let Some(gltf_mesh) = node.mesh() {
        for primitive in gltf_mesh.primitives() {
            if let Some(&(mesh_key, material_index)) =
                meshes.get(&(gltf_mesh.index(), primitive.index()))
            {
                let material_key = materials[&material_index];
                scene.add_object(RenderObject::new(mesh_key, material_key, world));
            }
        }
    }

    if let Some(light) = node.light() {
        if matches!(light.kind(), gltf::khr_lights_punctual::Kind::Point) {
            let position = world.transform_point3(Vec3::zeros());
            let color = Vec3::from(light.color()) * light.intensity();
            let radius = light.range().unwrap_or(DEFAULT_LIGHT_RADIUS);
            scene.add_point_light(PointLight::new(position, radius, color));
        }
    }

    for child in node.children() {
        flatten_node(&child, &world, meshes, materials, scene);
    }
}

fn read_primitive(
    primitive: &gltf::Primitive<'_>,
    buffers: &[gltf::buffer::Data],
) -> Result<MeshData, AssetError> {
    let reader = primitive.reader(|buffer| buffers.get(buffer.index()).map(|data| data.0.as_slice()));

    let positions: Vec<[f32; 3]> = reader
        .read_positions()
        .ok_or_else(|| AssetError::InvalidData("primitive has no positions".to_string()))?
        .collect();

    let normals: Vec<[f32; 3]> = reader
        .read_normals()
        .map_or_else(|| vec![[0.0, 0.0, 1.0]; positions.len()], Iterator::collect);
    let uvs: Vec<[f32; 2]> = reader
        .read_tex_coords(0)
        .map_or_else(|| vec![[0.0, 0.0]; positions.len()], |coords| coords.into_f32().collect());
    let tangents: Vec<[f32; 4]> = reader
        .read_tangents()
        .map_or_else(|| vec![[1.0, 0.0, 0.0, 1.0]; positions.len()], Iterator::collect);
    let colors: Vec<[f32; 3]> = reader
        .read_colors(0)
        .map_or_else(|| vec![[1.0, 1.0, 1.0]; positions.len()], |colors| {
            colors.into_rgb_f32().collect()
        });

    let vertices: Vec<Vertex> = positions
        .iter()
        .enumerate()
        .map(|(i, &position)| Vertex {
            position,
            normal: normals[i],
            uv: uvs[i],
            tangent: tangents[i],
            color: colors[i],
        })
        .collect();

    let indices: Vec<u32> = reader
        .read_indices()
        .map_or_else(|| (0..vertices.len() as u32).collect(), |indices| {
            indices.into_u32().collect()
        });

    Ok(MeshData::new(vertices, indices))
}

/// Expand a decoded glTF image to tightly packed RGBA8
fn expand_to_rgba8(format: gltf::image::Format, pixels: &[u8]) -> Result<Vec<u8>, AssetError> {
    match format {
        gltf::image::Format::R8G8B8A8 => Ok(pixels.to_vec()),
        gltf::image::Format::R8G8B8 => Ok(pixels
            .chunks_exact(3)
            .flat_map(|rgb| [rgb[0], rgb[1], rgb[2], 255])
            .collect()),
        gltf::image::Format::R8 => Ok(pixels
            .iter()
            .flat_map(|&gray| [gray, gray, gray, 255])
            .collect()),
        other => Err(AssetError::UnsupportedFormat(format!(
            "texture format {other:?}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::backends::HeadlessBackend;

    // Single triangle at nodes[0] with translation (2, 0, 0); positions
    // (0,0,0), (1,0,0), (0,1,0) in a base64 data URI buffer
    const TRIANGLE_GLTF: &str = r#"{
        "asset": {"version": "2.0"},
        "scene": 0,
        "scenes": [{"nodes": [0]}],
        "nodes": [{"mesh": 0, "translation": [2.0, 0.0, 0.0]}],
        "meshes": [{"primitives": [{"attributes": {"POSITION": 0}}]}],
        "accessors": [{
            "bufferView": 0,
            "componentType": 5126,
            "count": 3,
            "type": "VEC3",
            "min": [0.0, 0.0, 0.0],
            "max": [1.0, 1.0, 0.0]
        }],
        "bufferViews": [{"buffer": 0, "byteOffset": 0, "byteLength": 36}],
        "buffers": [{
            "byteLength": 36,
            "uri": "data:application/octet-stream;base64,AAAAAAAAAAAAAAAAAACAPwAAAAAAAAAAAAAAAAAAgD8AAAAA"
        }]
    }"#;

    fn write_temp_gltf(name: &str) -> std::path::PathBuf {
        let path = std::env::temp_dir().join(name);
        std::fs::write(&path, TRIANGLE_GLTF).unwrap();
        path
    }

    #[test]
    fn test_load_minimal_triangle() {
        let mut backend = HeadlessBackend::new();
        let path = write_temp_gltf("deferred_renderer_triangle.gltf");

        let scene = load_gltf(&path, &mut backend).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(scene.object_count(), 1);
        assert_eq!(scene.point_light_count(), 0);
        assert_eq!(backend.live_mesh_count(), 1);
    }

    #[test]
    fn test_loaded_node_transform_is_flattened() {
        let mut backend = HeadlessBackend::new();
        let path = write_temp_gltf("deferred_renderer_triangle_transform.gltf");

        let scene = load_gltf(&path, &mut backend).unwrap();
        std::fs::remove_file(&path).ok();

        // The single object carries the node's translation in its world
        // matrix; verify through the frame it renders
        let camera = crate::render::primitives::Camera::default();
        scene.render(&camera, &mut backend).unwrap();
        let transform_buffer = backend
            .bound_buffer(
                crate::render::api::BufferKind::Storage,
                crate::render::frame_data::TRANSFORM_SLOT,
            )
            .expect("no draw recorded for the loaded object");
        let matrix: [[f32; 4]; 4] =
            bytemuck::pod_read_unaligned(&backend.buffer_data(transform_buffer).unwrap()[0..64]);
        assert_eq!(matrix[3][0], 2.0);
    }

    #[test]
    fn test_missing_file_is_recoverable() {
        let mut backend = HeadlessBackend::new();

        let result = load_gltf("/nonexistent/scene.gltf", &mut backend);

        assert!(result.is_err());
        // Nothing leaked into the backend
        assert_eq!(backend.live_mesh_count(), 0);
        assert_eq!(backend.texture_count(), 0);
    }

    #[test]
    fn test_expand_rgb_to_rgba() {
        let rgba = expand_to_rgba8(gltf::image::Format::R8G8B8, &[10, 20, 30, 40, 50, 60]).unwrap();
        assert_eq!(rgba, vec![10, 20, 30, 255, 40, 50, 60, 255]);
    }

    #[test]
    fn test_expand_gray_to_rgba() {
        let rgba = expand_to_rgba8(gltf::image::Format::R8, &[7, 9]).unwrap();
        assert_eq!(rgba, vec![7, 7, 7, 255, 9, 9, 9, 255]);
    }

    #[test]
    fn test_float_texture_format_is_unsupported() {
        let result = expand_to_rgba8(gltf::image::Format::R32G32B32A32FLOAT, &[]);
        assert!(matches!(result, Err(AssetError::UnsupportedFormat(_))));
    }
}
