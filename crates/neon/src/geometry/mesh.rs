use std::collections::HashMap;

use glam::{Mat4, Vec3};

/// CPU-side render data: interleaved [pos.x, pos.y, pos.z, norm.x, norm.y, norm.z, r, g, b]
#[derive(Clone, Debug, Default)]
pub struct MeshData {
    /// 9 floats per vertex: position(3) + normal(3) + color(3)
    pub vertices: Vec<f32>,
    pub indices: Vec<u32>,
}

impl MeshData {
    pub fn vertex_count(&self) -> usize {
        self.vertices.len() / 9
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }
}

/// Axis-aligned bounding box
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    /// Bounds of a point set; `None` when empty
    pub fn from_points<'a>(points: impl IntoIterator<Item = &'a Vec3>) -> Option<Self> {
        let mut iter = points.into_iter();
        let first = *iter.next()?;
        let (min, max) = iter.fold((first, first), |(min, max), p| (min.min(*p), max.max(*p)));
        Some(Self { min, max })
    }

    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }
}

/// One polygon of a `Mesh`, vertices in counter-clockwise order seen from outside
#[derive(Clone, Debug, PartialEq)]
pub struct Face {
    pub vertices: Vec<u32>,
    /// Index into the owning object's material slots
    pub material_index: u32,
}

impl Face {
    pub fn new(vertices: Vec<u32>) -> Self {
        Self {
            vertices,
            material_index: 0,
        }
    }

    /// Directed edges in winding order
    pub fn edges(&self) -> impl Iterator<Item = (u32, u32)> + '_ {
        let n = self.vertices.len();
        (0..n).map(move |i| (self.vertices[i], self.vertices[(i + 1) % n]))
    }
}

/// Indexed polygon mesh used as the editable representation of scene objects.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Mesh {
    pub positions: Vec<Vec3>,
    pub faces: Vec<Face>,
}

impl Mesh {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    pub fn add_vertex(&mut self, p: Vec3) -> u32 {
        self.positions.push(p);
        (self.positions.len() - 1) as u32
    }

    pub fn add_face(&mut self, vertices: Vec<u32>) {
        self.faces.push(Face::new(vertices));
    }

    /// Unnormalized Newell normal; its length is twice the face area.
    pub fn face_area_vector(&self, face: &Face) -> Vec3 {
        let mut n = Vec3::ZERO;
        for (a, b) in face.edges() {
            let p = self.positions[a as usize];
            let q = self.positions[b as usize];
            n.x += (p.y - q.y) * (p.z + q.z);
            n.y += (p.z - q.z) * (p.x + q.x);
            n.z += (p.x - q.x) * (p.y + q.y);
        }
        n
    }

    /// Outward unit normal of a face (zero for degenerate faces)
    pub fn face_normal(&self, face: &Face) -> Vec3 {
        self.face_area_vector(face).normalize_or_zero()
    }

    pub fn face_center(&self, face: &Face) -> Vec3 {
        let sum: Vec3 = face.vertices.iter().map(|&i| self.positions[i as usize]).sum();
        sum / face.vertices.len().max(1) as f32
    }

    pub fn bounds(&self) -> Option<Aabb> {
        Aabb::from_points(&self.positions)
    }

    /// Bounding box size, zero for an empty mesh
    pub fn dimensions(&self) -> Vec3 {
        self.bounds().map(|b| b.size()).unwrap_or(Vec3::ZERO)
    }

    pub fn transform(&mut self, matrix: &Mat4) {
        for p in &mut self.positions {
            *p = matrix.transform_point3(*p);
        }
        // Mirroring transforms flip the winding
        if matrix.determinant() < 0.0 {
            for face in &mut self.faces {
                face.vertices.reverse();
            }
        }
    }

    pub fn translate(&mut self, offset: Vec3) {
        for p in &mut self.positions {
            *p += offset;
        }
    }

    /// Append another mesh, shifting its material indices by `material_offset`
    pub fn append(&mut self, other: &Mesh, material_offset: u32) {
        let base = self.positions.len() as u32;
        self.positions.extend_from_slice(&other.positions);
        self.faces.extend(other.faces.iter().map(|f| Face {
            vertices: f.vertices.iter().map(|&i| i + base).collect(),
            material_index: f.material_index + material_offset,
        }));
    }

    /// Delete every face matching `predicate`, then drop vertices no face uses.
    /// Returns the number of faces removed.
    pub fn delete_faces(&mut self, mut predicate: impl FnMut(&Mesh, &Face) -> bool) -> usize {
        let doomed: Vec<bool> = self.faces.iter().map(|f| predicate(self, f)).collect();
        let before = self.faces.len();
        let mut i = 0;
        self.faces.retain(|_| {
            let keep = !doomed[i];
            i += 1;
            keep
        });
        self.remove_loose_vertices();
        before - self.faces.len()
    }

    /// Drop vertices referenced by no face and compact indices
    pub fn remove_loose_vertices(&mut self) {
        let mut used = vec![false; self.positions.len()];
        for face in &self.faces {
            for &v in &face.vertices {
                used[v as usize] = true;
            }
        }
        let mut remap = vec![u32::MAX; self.positions.len()];
        let mut positions = Vec::with_capacity(self.positions.len());
        for (i, p) in self.positions.iter().enumerate() {
            if used[i] {
                remap[i] = positions.len() as u32;
                positions.push(*p);
            }
        }
        self.positions = positions;
        for face in &mut self.faces {
            for v in &mut face.vertices {
                *v = remap[*v as usize];
            }
        }
    }

    /// Merge vertices closer than `epsilon` and drop faces that collapse.
    pub fn weld(&mut self, epsilon: f32) {
        let inv = 1.0 / epsilon.max(1e-9);
        let mut lookup: HashMap<(i64, i64, i64), u32> = HashMap::new();
        let mut remap = Vec::with_capacity(self.positions.len());
        let mut positions = Vec::new();
        for p in &self.positions {
            let key = (
                (p.x * inv).round() as i64,
                (p.y * inv).round() as i64,
                (p.z * inv).round() as i64,
            );
            let idx = *lookup.entry(key).or_insert_with(|| {
                positions.push(*p);
                (positions.len() - 1) as u32
            });
            remap.push(idx);
        }
        self.positions = positions;

        for face in &mut self.faces {
            let mut verts: Vec<u32> = Vec::with_capacity(face.vertices.len());
            for &v in &face.vertices {
                let v = remap[v as usize];
                if verts.last() != Some(&v) {
                    verts.push(v);
                }
            }
            while verts.len() > 1 && verts.first() == verts.last() {
                verts.pop();
            }
            face.vertices = verts;
        }
        self.faces.retain(|f| f.vertices.len() >= 3);
    }

    /// Edges used by exactly one face, in that face's winding direction
    pub fn boundary_edges(&self) -> Vec<(u32, u32)> {
        let mut counts: HashMap<(u32, u32), usize> = HashMap::new();
        for face in &self.faces {
            for (a, b) in face.edges() {
                *counts.entry((a.min(b), a.max(b))).or_insert(0) += 1;
            }
        }
        self.faces
            .iter()
            .flat_map(|f| f.edges())
            .filter(|&(a, b)| counts[&(a.min(b), a.max(b))] == 1)
            .collect()
    }

    /// Fan-triangulate into flat-shaded render buffers.
    /// `colors` is indexed by material index; missing entries render grey.
    pub fn triangulate(&self, colors: &[[f32; 3]]) -> MeshData {
        let mut vertices = Vec::new();
        let mut indices = Vec::new();
        for face in &self.faces {
            if face.vertices.len() < 3 {
                continue;
            }
            let normal = self.face_normal(face);
            let color = colors
                .get(face.material_index as usize)
                .copied()
                .unwrap_or([0.6, 0.6, 0.65]);
            let base = (vertices.len() / 9) as u32;
            for &v in &face.vertices {
                let p = self.positions[v as usize];
                vertices.extend_from_slice(&[
                    p.x, p.y, p.z, normal.x, normal.y, normal.z, color[0], color[1], color[2],
                ]);
            }
            for i in 1..(face.vertices.len() as u32 - 1) {
                indices.extend_from_slice(&[base, base + i, base + i + 1]);
            }
        }
        MeshData { vertices, indices }
    }
}

/// `true` when `normal` points within the cone around `direction` given by `limit` (a cosine).
pub fn normal_in_direction(normal: Vec3, direction: Vec3, limit: f32) -> bool {
    direction.dot(normal) > limit
}

pub fn going_up(normal: Vec3, limit: f32) -> bool {
    normal_in_direction(normal, Vec3::Z, limit)
}

pub fn going_down(normal: Vec3, limit: f32) -> bool {
    normal_in_direction(normal, Vec3::NEG_Z, limit)
}

pub fn going_side(normal: Vec3, limit: f32) -> bool {
    !going_up(normal, limit) && !going_down(normal, limit)
}
