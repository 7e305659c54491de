//! Render queue for batched rendering
//!
//! Collects renderable objects and organizes them for efficient rendering.
//! Following Game Engine Architecture Chapter 11.3 - Render Queues.
//!
//! Objects are grouped by material identity (arena key): one batch per
//! distinct material, one instanced draw per batch. Batch order is
//! unspecified; nothing downstream depends on it.

use crate::scene::{MaterialKey, RenderObject};
use std::collections::HashMap;

/// A batch of objects sharing the same material
#[derive(Debug, Clone)]
pub struct RenderBatch {
    /// Material used by all objects in this batch
    pub material: MaterialKey,

    /// Objects in this batch, in scene order
    pub objects: Vec<RenderObject>,
}

impl RenderBatch {
    /// Create a new empty batch for a material
    #[must_use]
    pub fn new(material: MaterialKey) -> Self {
        Self {
            material,
            objects: Vec::new(),
        }
    }

    /// Add an object to this batch
    pub fn add_object(&mut self, object: RenderObject) {
        self.objects.push(object);
    }

    /// Get the number of objects in this batch
    #[must_use]
    pub fn object_count(&self) -> usize {
        self.objects.len()
    }
}

/// Per-frame render queue batched by material identity
///
/// Minimizes GPU state changes: material state is bound once per batch,
/// not once per object.
#[derive(Debug, Default)]
pub struct RenderQueue {
    batches: Vec<RenderBatch>,
}

impl RenderQueue {
    /// Create an empty render queue
    #[must_use]
    pub fn new() -> Self {
        Self {
            batches: Vec::new(),
        }
    }

    /// Build a render queue from a list of renderable objects
    ///
    /// Every input object lands in exactly one batch; objects batch
    /// together iff they reference the same material key.
    #[must_use]
    pub fn from_objects(objects: &[RenderObject]) -> Self {
        let mut batches_map: HashMap<MaterialKey, RenderBatch> = HashMap::new();

        for obj in objects {
            batches_map
                .entry(obj.material)
                .or_insert_with(|| RenderBatch::new(obj.material))
                .add_object(*obj);
        }

        Self {
            batches: batches_map.into_values().collect(),
        }
    }

    /// Get the material batches (unspecified order)
    #[must_use]
    pub fn batches(&self) -> &[RenderBatch] {
        &self.batches
    }

    /// Get the total number of batches
    #[must_use]
    pub fn batch_count(&self) -> usize {
        self.batches.len()
    }

    /// Get the total number of objects in the queue
    #[must_use]
    pub fn total_object_count(&self) -> usize {
        self.batches.iter().map(RenderBatch::object_count).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::Mat4;
    use crate::scene::MeshKey;
    use slotmap::SlotMap;

    fn keys(count: usize) -> (MeshKey, Vec<MaterialKey>) {
        let mut meshes: SlotMap<MeshKey, ()> = SlotMap::with_key();
        let mut materials: SlotMap<MaterialKey, ()> = SlotMap::with_key();
        let mesh = meshes.insert(());
        let mats = (0..count).map(|_| materials.insert(())).collect();
        (mesh, mats)
    }

    #[test]
    fn test_render_batch() {
        let (mesh, mats) = keys(1);
        let mut batch = RenderBatch::new(mats[0]);
        assert_eq!(batch.object_count(), 0);

        batch.add_object(RenderObject::new(mesh, mats[0], Mat4::identity()));
        assert_eq!(batch.object_count(), 1);
    }

    #[test]
    fn test_render_queue_batching() {
        let (mesh, mats) = keys(2);
        let objects = vec![
            RenderObject::new(mesh, mats[0], Mat4::identity()),
            RenderObject::new(mesh, mats[0], Mat4::identity()),
            RenderObject::new(mesh, mats[1], Mat4::identity()),
        ];

        let queue = RenderQueue::from_objects(&objects);

        assert_eq!(queue.total_object_count(), 3);
        assert_eq!(queue.batch_count(), 2); // 2 unique materials

        let mut sizes: Vec<usize> = queue.batches().iter().map(RenderBatch::object_count).collect();
        sizes.sort_unstable();
        assert_eq!(sizes, vec![1, 2]);
    }

    #[test]
    fn test_batches_partition_the_object_set() {
        let (mesh, mats) = keys(3);
        let objects: Vec<RenderObject> = (0..10)
            .map(|i| {
                RenderObject::new(
                    mesh,
                    mats[i % 3],
                    Mat4::new_translation(&crate::foundation::math::Vec3::new(i as f32, 0.0, 0.0)),
                )
            })
            .collect();

        let queue = RenderQueue::from_objects(&objects);

        // Union of batch memberships equals the input set: no omissions,
        // no duplicates
        assert_eq!(queue.batch_count(), 3);
        assert_eq!(queue.total_object_count(), objects.len());

        let mut seen: Vec<f32> = queue
            .batches()
            .iter()
            .flat_map(|b| b.objects.iter().map(|o| o.transform[(0, 3)]))
            .collect();
        seen.sort_by(f32::total_cmp);
        let expected: Vec<f32> = (0..10).map(|i| i as f32).collect();
        assert_eq!(seen, expected);
    }

    #[test]
    fn test_batch_members_share_material() {
        let (mesh, mats) = keys(2);
        let objects = vec![
            RenderObject::new(mesh, mats[1], Mat4::identity()),
            RenderObject::new(mesh, mats[0], Mat4::identity()),
            RenderObject::new(mesh, mats[1], Mat4::identity()),
        ];

        let queue = RenderQueue::from_objects(&objects);

        for batch in queue.batches() {
            assert!(batch.objects.iter().all(|o| o.material == batch.material));
        }
    }

    #[test]
    fn test_empty_object_set_yields_no_batches() {
        let queue = RenderQueue::from_objects(&[]);
        assert_eq!(queue.batch_count(), 0);
        assert_eq!(queue.total_object_count(), 0);
    }
}
