//! Joining mesh objects

use super::SceneContext;
use crate::error::NeonResult;
use crate::scene::InteractionMode;

impl SceneContext {
    /// Merge `others` into `active`.
    ///
    /// Geometry is moved into the active object's local space, material slots
    /// are appended after the active object's own and the merged objects are
    /// removed. Modifiers on merged objects are dropped.
    pub fn join(&mut self, active: &str, others: &[String]) -> NeonResult<()> {
        self.require_mode(InteractionMode::Object)?;
        self.object(active)?.mesh()?;
        for id in others {
            self.object(id)?.mesh()?;
        }

        let to_local = self.object(active)?.matrix_world().inverse();
        for id in others.iter().filter(|id| id.as_str() != active) {
            let other = self.remove_object(id)?;
            let mut mesh = other.mesh()?.clone();
            mesh.transform(&(to_local * other.matrix_world()));

            let target = self.object_mut(active)?;
            let offset = target.material_slots.len() as u32;
            target.material_slots.extend(other.material_slots.iter().copied());
            target.mesh_mut()?.append(&mesh, offset);
            tracing::debug!("Joined '{}' into '{}'", other.name, target.name);
        }

        self.deselect_all();
        self.selection.push(active.to_string());
        self.active = Some(active.to_string());
        Ok(())
    }
}
