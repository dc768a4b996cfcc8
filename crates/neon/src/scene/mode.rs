//! Interaction mode transitions

use serde::{Deserialize, Serialize};

use super::SceneContext;
use crate::error::{NeonError, NeonResult};
use crate::geometry::Mesh;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum InteractionMode {
    #[default]
    Object,
    Edit,
}

impl SceneContext {
    pub fn mode(&self) -> InteractionMode {
        self.mode
    }

    pub(crate) fn require_mode(&self, expected: InteractionMode) -> NeonResult<()> {
        if self.mode != expected {
            return Err(NeonError::ModeViolation {
                expected,
                actual: self.mode,
            });
        }
        Ok(())
    }

    /// Switch mode. Edit mode needs an active mesh object.
    pub fn mode_set(&mut self, mode: InteractionMode) -> NeonResult<()> {
        if mode == InteractionMode::Edit {
            let active = self.active.clone().ok_or_else(|| {
                NeonError::ObjectNotFound("<no active object>".to_string())
            })?;
            self.object(&active)?.mesh()?;
        }
        self.mode = mode;
        Ok(())
    }

    /// Make `id` active, enter edit mode, run `f` on its mesh and return to the
    /// mode the scene was in before, whatever `f` returned.
    pub fn with_edit_mesh<T>(
        &mut self,
        id: &str,
        f: impl FnOnce(&mut Mesh) -> NeonResult<T>,
    ) -> NeonResult<T> {
        let prior = self.mode;
        let prior_active = self.active.clone();
        self.set_active(id)?;
        if let Err(e) = self.mode_set(InteractionMode::Edit) {
            self.active = prior_active;
            return Err(e);
        }

        let result = self.object_mut(id).and_then(|o| o.mesh_mut()).and_then(f);

        self.mode = prior;
        result
    }

    /// Run `f` in object mode, then restore the previous mode whatever `f` returned.
    pub fn with_object_mode<T>(
        &mut self,
        f: impl FnOnce(&mut SceneContext) -> NeonResult<T>,
    ) -> NeonResult<T> {
        let prior = self.mode;
        self.mode = InteractionMode::Object;
        let result = f(self);
        self.mode = prior;
        result
    }
}
