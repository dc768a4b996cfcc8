//! Scene context
//!
//! Explicit scene state: the object collection, the material library,
//! selection, the active object and the interaction mode. Every pipeline component receives it as `&mut SceneContext`.

mod join_ops;
mod mode;
mod naming;
mod object;

pub use mode::InteractionMode;
pub use naming::unique_name;
pub use object::{ObjectData, ObjectRole, SceneObject};

use shared::{ObjectId, ObjectKind, ObjectSummary};

use crate::error::{NeonError, NeonResult};
use crate::material::Material;

/// Index into the scene's material library
pub type MaterialId = usize;

#[derive(Default)]
pub struct SceneContext {
    objects: Vec<SceneObject>,
    materials: Vec<Material>,
    selection: Vec<ObjectId>,
    active: Option<ObjectId>,
    mode: InteractionMode,
}

impl SceneContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an object into the collection. Like the host's add operators the
    /// new object becomes the only selected and the active one.
    pub fn add_object(&mut self, mut object: SceneObject) -> NeonResult<ObjectId> {
        self.require_mode(InteractionMode::Object)?;
        object.name = unique_name(&object.name, |n| self.objects.iter().any(|o| o.name == n));
        let id = object.id.clone();
        tracing::debug!("Added object '{}' ({:?})", object.name, object.kind.kind());
        self.objects.push(object);
        self.deselect_all();
        self.selection.push(id.clone());
        self.active = Some(id.clone());
        Ok(id)
    }

    pub fn object(&self, id: &str) -> NeonResult<&SceneObject> {
        self.objects
            .iter()
            .find(|o| o.id == id)
            .ok_or_else(|| NeonError::ObjectNotFound(id.to_string()))
    }

    pub fn object_mut(&mut self, id: &str) -> NeonResult<&mut SceneObject> {
        self.objects
            .iter_mut()
            .find(|o| o.id == id)
            .ok_or_else(|| NeonError::ObjectNotFound(id.to_string()))
    }

    pub fn object_by_name(&self, name: &str) -> Option<&SceneObject> {
        self.objects.iter().find(|o| o.name == name)
    }

    /// Remove an object, dropping it from the selection
    pub fn remove_object(&mut self, id: &str) -> NeonResult<SceneObject> {
        let idx = self
            .objects
            .iter()
            .position(|o| o.id == id)
            .ok_or_else(|| NeonError::ObjectNotFound(id.to_string()))?;
        self.selection.retain(|s| s != id);
        if self.active.as_deref() == Some(id) {
            self.active = None;
        }
        Ok(self.objects.remove(idx))
    }

    /// Objects in insertion order
    pub fn objects(&self) -> &[SceneObject] {
        &self.objects
    }

    pub fn objects_of_kind(&self, kind: ObjectKind) -> Vec<&SceneObject> {
        self.objects.iter().filter(|o| o.kind.kind() == kind).collect()
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    // ── Selection ─────────────────────────────────────────────

    pub fn deselect_all(&mut self) {
        self.selection.clear();
    }

    pub fn select(&mut self, id: &str) -> NeonResult<()> {
        self.object(id)?;
        if !self.selection.iter().any(|s| s == id) {
            self.selection.push(id.to_string());
        }
        Ok(())
    }

    pub fn selected(&self) -> &[ObjectId] {
        &self.selection
    }

    pub fn set_active(&mut self, id: &str) -> NeonResult<()> {
        self.object(id)?;
        self.active = Some(id.to_string());
        Ok(())
    }

    pub fn active(&self) -> Option<&str> {
        self.active.as_deref()
    }

    // ── Materials ─────────────────────────────────────────────

    /// Add a material to the library under a unique name
    pub fn add_material(&mut self, mut material: Material) -> MaterialId {
        material.name = unique_name(&material.name, |n| self.materials.iter().any(|m| m.name == n));
        self.materials.push(material);
        self.materials.len() - 1
    }

    pub fn material(&self, id: MaterialId) -> Option<&Material> {
        self.materials.get(id)
    }

    pub fn materials(&self) -> &[Material] {
        &self.materials
    }

    /// Material names of an object's slots, empty string for empty slots
    pub fn slot_names(&self, object: &SceneObject) -> Vec<String> {
        object
            .material_slots
            .iter()
            .map(|slot| {
                slot.and_then(|m| self.material(m))
                    .map(|m| m.name.clone())
                    .unwrap_or_default()
            })
            .collect()
    }

    /// Remove every object and material and reset selection and mode
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn object_summary(&self, id: &str) -> NeonResult<ObjectSummary> {
        let object = self.object(id)?;
        let evaluated = object.evaluated_mesh()?;
        Ok(ObjectSummary {
            id: object.id.clone(),
            name: object.name.clone(),
            kind: object.kind.kind(),
            location: object.location.to_array(),
            dimensions: (evaluated.dimensions() * object.scale.abs()).to_array(),
            materials: self.slot_names(object),
            vertex_count: evaluated.vertex_count(),
            face_count: evaluated.face_count(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::primitives::cube;
    use glam::Vec3;

    fn cube_object(name: &str) -> SceneObject {
        SceneObject::with_mesh(name, ObjectRole::Connector, cube(Vec3::ONE))
    }

    #[test]
    fn test_add_selects_and_activates() {
        let mut scene = SceneContext::new();
        let a = scene.add_object(cube_object("Cube")).unwrap();
        let b = scene.add_object(cube_object("Cube")).unwrap();
        assert_eq!(scene.selected(), &[b.clone()]);
        assert_eq!(scene.active(), Some(b.as_str()));
        assert_eq!(scene.object(&a).unwrap().name, "Cube");
        assert_eq!(scene.object(&b).unwrap().name, "Cube.001");
    }

    #[test]
    fn test_remove_clears_active() {
        let mut scene = SceneContext::new();
        let a = scene.add_object(cube_object("Cube")).unwrap();
        let removed = scene.remove_object(&a).unwrap();
        assert_eq!(removed.id, a);
        assert!(scene.active().is_none());
        assert!(scene.selected().is_empty());
        assert!(matches!(scene.object(&a), Err(NeonError::ObjectNotFound(_))));
    }

    #[test]
    fn test_select_unknown_fails() {
        let mut scene = SceneContext::new();
        assert!(scene.select("missing").is_err());
        assert!(scene.set_active("missing").is_err());
    }

    #[test]
    fn test_objects_of_kind_and_clear() {
        let mut scene = SceneContext::new();
        scene.add_object(cube_object("Cube")).unwrap();
        scene
            .add_object(SceneObject::with_mesh("Text", ObjectRole::Text, cube(Vec3::ONE)))
            .unwrap();
        assert_eq!(scene.objects_of_kind(ObjectKind::Connector).len(), 1);
        assert_eq!(scene.objects_of_kind(ObjectKind::Text).len(), 1);
        scene.clear();
        assert!(scene.is_empty());
        assert_eq!(scene.mode(), InteractionMode::Object);
    }

    #[test]
    fn test_summary_reports_evaluated_mesh() {
        let mut scene = SceneContext::new();
        let mut obj = cube_object("Cube");
        obj.scale = Vec3::splat(0.02);
        obj.location = Vec3::new(1.0, 2.0, 3.0);
        let id = scene.add_object(obj).unwrap();
        let summary = scene.object_summary(&id).unwrap();
        assert_eq!(summary.kind, ObjectKind::Connector);
        assert_eq!(summary.location, [1.0, 2.0, 3.0]);
        assert!((summary.dimensions[0] - 0.04).abs() < 1e-6);
        assert_eq!(summary.vertex_count, 8);
        assert_eq!(summary.face_count, 6);
        assert!(summary.materials.is_empty());
    }
}
