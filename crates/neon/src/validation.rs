//! Mesh validation utilities.
//!
//! `MeshValidator` checks the integrity of generated geometry:
//! in-range indices, degenerate faces, open edges, AABB dimensions, etc.

use glam::Vec3;

use crate::geometry::Mesh;

/// Validator for `Mesh` integrity checks.
pub struct MeshValidator<'a> {
    mesh: &'a Mesh,
}

impl<'a> MeshValidator<'a> {
    /// Create a new validator for the given mesh.
    pub fn new(mesh: &'a Mesh) -> Self {
        Self { mesh }
    }

    /// Check that every face references an existing vertex.
    pub fn are_indices_in_range(&self) -> bool {
        let max_idx = self.mesh.vertex_count() as u32;
        self.mesh
            .faces
            .iter()
            .all(|f| f.vertices.iter().all(|&i| i < max_idx))
    }

    /// Faces with fewer than 3 vertices or (near) zero area.
    pub fn degenerate_faces(&self, epsilon: f32) -> Vec<usize> {
        self.mesh
            .faces
            .iter()
            .enumerate()
            .filter(|(_, f)| f.vertices.len() < 3 || self.mesh.face_area_vector(f).length() < epsilon)
            .map(|(i, _)| i)
            .collect()
    }

    /// No edge is used by only one face.
    pub fn is_closed(&self) -> bool {
        self.mesh.boundary_edges().is_empty()
    }

    /// Check that no vertex coordinate is NaN or infinite.
    pub fn are_positions_finite(&self) -> bool {
        self.mesh.positions.iter().all(|p| p.is_finite())
    }

    /// Dimensions (width, depth, height) of the bounding box.
    pub fn dimensions(&self) -> Vec3 {
        self.mesh.dimensions()
    }

    /// Check that the AABB dimensions are approximately equal to `expected`.
    pub fn assert_dimensions_approx(&self, expected: Vec3, tolerance: f32) -> bool {
        (self.dimensions() - expected).abs().max_element() < tolerance
    }

    /// Run all validation checks and return a list of error messages.
    /// An empty list means the mesh is valid.
    pub fn validate_all(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if !self.are_indices_in_range() {
            errors.push(format!(
                "Face indices out of range (vertex_count={})",
                self.mesh.vertex_count()
            ));
            // Everything below indexes positions
            return errors;
        }

        if !self.are_positions_finite() {
            errors.push("Some vertex positions are not finite".to_string());
        }

        let degenerate = self.degenerate_faces(1e-12);
        if !degenerate.is_empty() {
            errors.push(format!(
                "{} degenerate faces: {:?}",
                degenerate.len(),
                &degenerate[..degenerate.len().min(5)]
            ));
        }

        errors
    }
}
