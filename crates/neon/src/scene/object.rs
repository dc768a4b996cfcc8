//! Scene objects and their derived transforms

use glam::{EulerRot, Mat4, Quat, Vec3};
use shared::{ObjectId, ObjectKind};

use crate::error::{NeonError, NeonResult};
use crate::geometry::{apply_stack, Curve, Mesh, Modifier};

use super::MaterialId;

/// Role of an object in a generated sign
#[derive(Clone, Debug, PartialEq)]
pub enum ObjectRole {
    /// One character; `advance` is the pen advance used when it has no geometry
    Glyph { character: char, advance: f32 },
    Connector,
    CableCurve,
    /// `applied_scale` is the box scale baked into the mesh before modifiers
    BackingPlate { applied_scale: Vec3 },
    /// Text object before it is merged into a glyph
    Text,
}

impl ObjectRole {
    pub fn kind(&self) -> ObjectKind {
        match self {
            ObjectRole::Glyph { .. } => ObjectKind::Glyph,
            ObjectRole::Connector => ObjectKind::Connector,
            ObjectRole::CableCurve => ObjectKind::CableCurve,
            ObjectRole::BackingPlate { .. } => ObjectKind::BackingPlate,
            ObjectRole::Text => ObjectKind::Text,
        }
    }
}

/// Geometry owned by an object
#[derive(Clone, Debug, PartialEq)]
pub enum ObjectData {
    Mesh(Mesh),
    Curve(Curve),
}

#[derive(Clone, Debug)]
pub struct SceneObject {
    pub id: ObjectId,
    pub name: String,
    pub kind: ObjectRole,
    pub data: ObjectData,
    pub location: Vec3,
    /// XYZ euler angles in radians
    pub rotation: Vec3,
    pub scale: Vec3,
    /// Material per slot; faces index into this list
    pub material_slots: Vec<Option<MaterialId>>,
    pub modifiers: Vec<Modifier>,
}

impl SceneObject {
    pub fn new(name: impl Into<String>, kind: ObjectRole, data: ObjectData) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            name: name.into(),
            kind,
            data,
            location: Vec3::ZERO,
            rotation: Vec3::ZERO,
            scale: Vec3::ONE,
            material_slots: Vec::new(),
            modifiers: Vec::new(),
        }
    }

    pub fn with_mesh(name: impl Into<String>, kind: ObjectRole, mesh: Mesh) -> Self {
        Self::new(name, kind, ObjectData::Mesh(mesh))
    }

    pub fn with_curve(name: impl Into<String>, kind: ObjectRole, curve: Curve) -> Self {
        Self::new(name, kind, ObjectData::Curve(curve))
    }

    pub fn mesh(&self) -> NeonResult<&Mesh> {
        match &self.data {
            ObjectData::Mesh(mesh) => Ok(mesh),
            ObjectData::Curve(_) => Err(self.wrong_kind("mesh")),
        }
    }

    pub fn mesh_mut(&mut self) -> NeonResult<&mut Mesh> {
        match &mut self.data {
            ObjectData::Mesh(mesh) => Ok(mesh),
            ObjectData::Curve(_) => Err(NeonError::WrongObjectKind {
                id: self.id.clone(),
                expected: "mesh",
            }),
        }
    }

    pub fn curve(&self) -> NeonResult<&Curve> {
        match &self.data {
            ObjectData::Curve(curve) => Ok(curve),
            ObjectData::Mesh(_) => Err(self.wrong_kind("curve")),
        }
    }

    pub fn is_mesh(&self) -> bool {
        matches!(self.data, ObjectData::Mesh(_))
    }

    fn wrong_kind(&self, expected: &'static str) -> NeonError {
        NeonError::WrongObjectKind {
            id: self.id.clone(),
            expected,
        }
    }

    /// Rotation as applied by the host for XYZ euler mode (X first)
    pub fn rotation_quat(&self) -> Quat {
        Quat::from_euler(EulerRot::ZYX, self.rotation.z, self.rotation.y, self.rotation.x)
    }

    pub fn matrix_world(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation_quat(), self.location)
    }

    /// Bake the scale into the geometry and reset it to one
    pub fn apply_scale(&mut self) -> NeonResult<()> {
        let scale = Mat4::from_scale(self.scale);
        self.mesh_mut()?.transform(&scale);
        self.scale = Vec3::ONE;
        Ok(())
    }

    /// Geometry after modifiers, curves swept into their bevel tubes
    pub fn evaluated_mesh(&self) -> NeonResult<Mesh> {
        let base = match &self.data {
            ObjectData::Mesh(mesh) => mesh.clone(),
            ObjectData::Curve(curve) => curve.to_mesh(),
        };
        apply_stack(&base, &self.modifiers)
    }

    /// Evaluated geometry in world space
    pub fn world_mesh(&self) -> NeonResult<Mesh> {
        let mut mesh = self.evaluated_mesh()?;
        mesh.transform(&self.matrix_world());
        Ok(mesh)
    }

    /// Size of the evaluated local bounds, times scale
    pub fn dimensions(&self) -> NeonResult<Vec3> {
        Ok(self.evaluated_mesh()?.dimensions() * self.scale.abs())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::primitives::cube;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn test_upright_rotation_maps_axes() {
        let mut obj = SceneObject::with_mesh("Text", ObjectRole::Text, Mesh::new());
        obj.rotation.x = FRAC_PI_2;
        let m = obj.matrix_world();
        let p = m.transform_point3(Vec3::new(1.0, 2.0, 3.0));
        assert!((p - Vec3::new(1.0, -3.0, 2.0)).length() < 1e-5);
    }

    #[test]
    fn test_dimensions_use_scale() {
        let mut obj = SceneObject::with_mesh("Cube", ObjectRole::Connector, cube(Vec3::ONE));
        obj.scale = Vec3::splat(0.02);
        assert!((obj.dimensions().unwrap() - Vec3::splat(0.04)).length() < 1e-6);
    }

    #[test]
    fn test_apply_scale_bakes_geometry() {
        let mut obj = SceneObject::with_mesh("Cube", ObjectRole::Text, cube(Vec3::ONE));
        obj.scale = Vec3::new(3.0, 0.25, 1.0);
        obj.apply_scale().unwrap();
        assert_eq!(obj.scale, Vec3::ONE);
        assert!((obj.mesh().unwrap().dimensions() - Vec3::new(6.0, 0.5, 2.0)).length() < 1e-5);
    }

    #[test]
    fn test_curve_is_not_mesh() {
        let mut obj = SceneObject::with_curve("Curve", ObjectRole::CableCurve, Curve::new(vec![]));
        assert!(matches!(obj.mesh(), Err(NeonError::WrongObjectKind { expected: "mesh", .. })));
        assert!(obj.apply_scale().is_err());
        assert!(obj.curve().is_ok());
        assert_eq!(obj.kind.kind(), ObjectKind::CableCurve);
    }
}
