//! Scene: renderable objects, lights, and per-frame draw submission
//!
//! The scene owns the mesh and material arenas, an append-only object
//! list, and the point-light sequence. Each frame it rebuilds the
//! GPU-resident frame data unconditionally — no dirty tracking — and
//! submits one instanced draw per material batch.
//!
//! ## Teardown Ordering
//! GPU-owned resources must be released while the backend is still alive:
//! call [`Scene::release_gpu_resources`] before tearing down the backend.

use crate::config::RendererConfig;
use crate::foundation::math::{Mat4, Vec3};
use crate::render::api::{BufferHandle, BufferKind, RenderBackend};
use crate::render::frame_data::{
    FrameData, GpuPointLight, FRAME_DATA_SLOT, POINT_LIGHT_SLOT, TRANSFORM_SLOT,
};
use crate::render::lighting::{PointLight, DEFAULT_SUN_DIRECTION, SUN_COLOR};
use crate::render::material::Material;
use crate::render::primitives::{Camera, MeshResource};
use crate::render::RenderResult;
use crate::scene::{shadow, Frustum, MaterialKey, MeshKey, RenderBatch, RenderObject, RenderQueue};
use slotmap::SlotMap;
use std::path::Path;

/// A scene of renderable objects and lights
///
/// Meshes and materials live in arenas and are shared by any number of
/// objects through stable keys; material-key identity decides batch
/// membership. Objects and lights are append-only.
pub struct Scene {
    meshes: SlotMap<MeshKey, MeshResource>,
    materials: SlotMap<MaterialKey, Material>,
    objects: Vec<RenderObject>,
    point_lights: Vec<PointLight>,
    sun_direction: Vec3,
    config: RendererConfig,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene {
    /// Create an empty scene with the default configuration
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(RendererConfig::default())
    }

    /// Create an empty scene with an explicit configuration
    #[must_use]
    pub fn with_config(config: RendererConfig) -> Self {
        Self {
            meshes: SlotMap::with_key(),
            materials: SlotMap::with_key(),
            objects: Vec::new(),
            point_lights: Vec::new(),
            sun_direction: Vec3::from(DEFAULT_SUN_DIRECTION),
            config,
        }
    }

    /// Load a scene from a glTF file
    ///
    /// Failure is recoverable: on error the caller keeps its previous
    /// scene, and any partially-created GPU resources are released.
    pub fn from_gltf<P: AsRef<Path>>(
        path: P,
        backend: &mut dyn RenderBackend,
    ) -> Result<Self, crate::assets::AssetError> {
        crate::assets::gltf_loader::load_gltf(path, backend)
    }

    // ========================================================================
    // Resource arenas and scene mutation (append-only)
    // ========================================================================

    /// Register a mesh resource and return its stable key
    pub fn add_mesh(&mut self, mesh: MeshResource) -> MeshKey {
        self.meshes.insert(mesh)
    }

    /// Register a material and return its stable key
    pub fn add_material(&mut self, material: Material) -> MaterialKey {
        self.materials.insert(material)
    }

    /// Look up a mesh resource
    #[must_use]
    pub fn mesh(&self, key: MeshKey) -> Option<&MeshResource> {
        self.meshes.get(key)
    }

    /// Look up a material
    #[must_use]
    pub fn material(&self, key: MaterialKey) -> Option<&Material> {
        self.materials.get(key)
    }

    /// Add a renderable object
    ///
    /// # Panics
    /// Panics if the object's mesh or material key is not registered in
    /// this scene (programmer error).
    pub fn add_object(&mut self, object: RenderObject) {
        assert!(
            self.meshes.contains_key(object.mesh),
            "object references a mesh that is not in this scene"
        );
        assert!(
            self.materials.contains_key(object.material),
            "object references a material that is not in this scene"
        );
        self.objects.push(object);
    }

    /// Add a point light
    pub fn add_point_light(&mut self, light: PointLight) {
        self.point_lights.push(light);
        if self.point_lights.len() > self.config.max_point_lights {
            log::warn!(
                "scene has {} point lights, above the configured cap of {}",
                self.point_lights.len(),
                self.config.max_point_lights
            );
        }
    }

    /// Set the global sun direction
    pub fn set_sun_direction(&mut self, direction: Vec3) {
        self.sun_direction = direction;
    }

    /// The global sun direction (not normalized)
    #[must_use]
    pub fn sun_direction(&self) -> Vec3 {
        self.sun_direction
    }

    /// Number of renderable objects
    #[must_use]
    pub fn object_count(&self) -> usize {
        self.objects.len()
    }

    /// Number of point lights
    #[must_use]
    pub fn point_light_count(&self) -> usize {
        self.point_lights.len()
    }

    // ========================================================================
    // Per-frame GPU data
    // ========================================================================

    /// Build the frame-global uniform record for a camera
    ///
    /// Rebuilt unconditionally every frame. `point_light_count` always
    /// equals the live light sequence length at build time.
    #[must_use]
    pub fn frame_data(&self, camera: &Camera) -> FrameData {
        FrameData {
            camera_view_proj: camera.view_projection_matrix().into(),
            point_light_count: self.point_lights.len() as u32,
            _pad0: [0; 3],
            sun_color: SUN_COLOR,
            _pad1: 0.0,
            sun_dir: self.sun_direction.normalize().into(),
            _pad2: 0.0,
            sun_view_proj: shadow::sun_view_projection(camera, self.sun_direction, &self.config)
                .into(),
        }
    }

    /// Build the point-light records for the storage buffer
    ///
    /// Always at least one record, so the buffer is constructible and
    /// bindable with zero lights.
    #[must_use]
    pub fn point_lights_gpu(&self) -> Vec<GpuPointLight> {
        let mut records: Vec<GpuPointLight> =
            self.point_lights.iter().map(GpuPointLight::from).collect();
        if records.is_empty() {
            records.push(GpuPointLight::default());
        }
        records
    }

    /// Create a fresh frame-data uniform buffer for a camera
    ///
    /// The caller binds it (slot 0) and destroys it when the consuming
    /// pass has been submitted.
    pub fn frame_data_buffer(
        &self,
        camera: &Camera,
        backend: &mut dyn RenderBackend,
    ) -> RenderResult<BufferHandle> {
        let frame = self.frame_data(camera);
        backend.create_buffer(BufferKind::Uniform, bytemuck::bytes_of(&frame))
    }

    /// Create a fresh point-light storage buffer
    ///
    /// The caller binds it (slot 1) and destroys it when the consuming
    /// pass has been submitted.
    pub fn point_light_buffer(&self, backend: &mut dyn RenderBackend) -> RenderResult<BufferHandle> {
        let records = self.point_lights_gpu();
        backend.create_buffer(BufferKind::Storage, bytemuck::cast_slice(&records))
    }

    // ========================================================================
    // Draw submission
    // ========================================================================

    /// Render all objects into the currently bound framebuffer
    ///
    /// Builds and binds the frame-data and point-light buffers, partitions
    /// objects into material batches (frustum-culled when enabled), and
    /// issues one instanced draw per batch. The target framebuffer must
    /// already be bound by the caller.
    pub fn render(&self, camera: &Camera, backend: &mut dyn RenderBackend) -> RenderResult<()> {
        let frame_buffer = self.frame_data_buffer(camera, backend)?;
        backend.bind_buffer(frame_buffer, BufferKind::Uniform, FRAME_DATA_SLOT);

        let light_buffer = self.point_light_buffer(backend)?;
        backend.bind_buffer(light_buffer, BufferKind::Storage, POINT_LIGHT_SLOT);

        let frustum = self.config.enable_frustum_culling.then(|| camera.frustum());
        let visible = self.visible_objects(frustum.as_ref());
        let queue = RenderQueue::from_objects(&visible);
        log::trace!(
            "rendering {} of {} objects in {} batches",
            queue.total_object_count(),
            self.objects.len(),
            queue.batch_count()
        );

        for batch in queue.batches() {
            backend.bind_material(&self.materials[batch.material]);
            self.draw_batch(batch, backend)?;
        }

        backend.destroy_buffer(light_buffer);
        backend.destroy_buffer(frame_buffer);
        Ok(())
    }

    /// Render scene depth from the sun's perspective
    ///
    /// Reuses the material-batching traversal but binds no material state:
    /// the depth shader reads only the sun view-projection (bound in the
    /// frame-data camera slot) and the per-batch transforms. The shadow
    /// framebuffer and depth-only program must already be bound by the
    /// caller. Objects are not frustum-culled: casters outside the camera
    /// frustum still shadow visible geometry.
    pub fn render_shadowmap(
        &self,
        camera: &Camera,
        backend: &mut dyn RenderBackend,
    ) -> RenderResult<()> {
        let mut frame = self.frame_data(camera);
        frame.camera_view_proj = frame.sun_view_proj;
        let frame_buffer = backend.create_buffer(BufferKind::Uniform, bytemuck::bytes_of(&frame))?;
        backend.bind_buffer(frame_buffer, BufferKind::Uniform, FRAME_DATA_SLOT);

        let queue = RenderQueue::from_objects(&self.objects);
        for batch in queue.batches() {
            self.draw_batch(batch, backend)?;
        }

        backend.destroy_buffer(frame_buffer);
        Ok(())
    }

    /// Release all GPU-owned resources through the backend
    ///
    /// Must run while the backend is still alive. The scene is empty
    /// afterwards.
    pub fn release_gpu_resources(&mut self, backend: &mut dyn RenderBackend) {
        for mesh in self.meshes.values() {
            mesh.release(backend);
        }
        for material in self.materials.values() {
            for &(_, texture) in material.textures() {
                backend.destroy_texture(texture);
            }
        }
        self.objects.clear();
        self.meshes.clear();
        self.materials.clear();
    }

    /// Objects passing the frustum test (all objects when `frustum` is None)
    fn visible_objects(&self, frustum: Option<&Frustum>) -> Vec<RenderObject> {
        match frustum {
            None => self.objects.clone(),
            Some(frustum) => self
                .objects
                .iter()
                .filter(|object| {
                    let bounds = self.meshes[object.mesh].bounds().transformed(&object.transform);
                    frustum.intersects_sphere(&bounds)
                })
                .copied()
                .collect(),
        }
    }

    /// Upload a batch's transforms and issue its instanced draw
    ///
    /// # Panics
    /// Panics if the batch mixes meshes: the instanced draw reads one mesh
    /// for the whole batch, so mixed-mesh batches would silently mis-render.
    fn draw_batch(&self, batch: &RenderBatch, backend: &mut dyn RenderBackend) -> RenderResult<()> {
        let mesh_key = batch.objects[0].mesh;
        assert!(
            batch.objects.iter().all(|object| object.mesh == mesh_key),
            "all objects in a material batch must share one mesh"
        );

        let mut transforms: Vec<[[f32; 4]; 4]> =
            batch.objects.iter().map(|object| object.transform.into()).collect();
        if transforms.is_empty() {
            // Non-empty-buffer requirement
            transforms.push(Mat4::identity().into());
        }

        let transform_buffer =
            backend.create_buffer(BufferKind::Storage, bytemuck::cast_slice(&transforms))?;
        backend.bind_buffer(transform_buffer, BufferKind::Storage, TRANSFORM_SLOT);

        self.meshes[mesh_key].draw_instanced(backend, batch.object_count() as u32)?;

        // Frame-scoped: reclamation is deferred past the draw just issued
        backend.destroy_buffer(transform_buffer);
        Ok(())
    }
}
