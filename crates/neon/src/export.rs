use std::collections::BTreeMap;

use crate::error::NeonResult;
use crate::geometry::{Face, Mesh, MeshData};
use crate::material::Material;
use crate::scene::SceneContext;

/// GLB magic number: "glTF"
const GLB_MAGIC: u32 = 0x46546C67;
/// GLB version 2
const GLB_VERSION: u32 = 2;
/// JSON chunk type
const CHUNK_TYPE_JSON: u32 = 0x4E4F534A;
/// BIN chunk type
const CHUNK_TYPE_BIN: u32 = 0x004E4942;

/// glTF component types
const FLOAT: u32 = 5126;
const UNSIGNED_INT: u32 = 5125;

/// glTF buffer view targets
const ARRAY_BUFFER: u32 = 34962;
const ELEMENT_ARRAY_BUFFER: u32 = 34963;

const EMISSIVE_STRENGTH_EXT: &str = "KHR_materials_emissive_strength";

/// One object's triangles for one material
struct Primitive {
    material: usize,
    data: MeshData,
}

struct NodeMeta {
    name: String,
    primitives: Vec<PrimitiveMeta>,
}

struct PrimitiveMeta {
    material: usize,
    vertex_count: usize,
    index_count: usize,
    pos_offset: usize,
    pos_length: usize,
    norm_offset: usize,
    norm_length: usize,
    idx_offset: usize,
    idx_length: usize,
    pos_min: [f32; 3],
    pos_max: [f32; 3],
}

/// Split a mesh by material index
fn split_by_material(mesh: &Mesh) -> BTreeMap<u32, Mesh> {
    let mut parts: BTreeMap<u32, Mesh> = BTreeMap::new();
    for face in &mesh.faces {
        parts
            .entry(face.material_index)
            .or_insert_with(|| Mesh {
                positions: mesh.positions.clone(),
                faces: Vec::new(),
            })
            .faces
            .push(Face {
                vertices: face.vertices.clone(),
                material_index: 0,
            });
    }
    parts
}

fn material_json(material: &Material) -> serde_json::Value {
    let inputs = &material.inputs;
    let mut json = serde_json::json!({
        "name": material.name,
        "pbrMetallicRoughness": {
            "baseColorFactor": inputs.base_color.to_rgba(),
            "metallicFactor": 0.0,
            "roughnessFactor": 0.5
        }
    });
    if inputs.is_emissive() {
        json["emissiveFactor"] = serde_json::json!(inputs.emission_color.to_array());
        json["extensions"] = serde_json::json!({
            EMISSIVE_STRENGTH_EXT: { "emissiveStrength": inputs.emission_strength }
        });
    }
    json
}

/// Build a complete GLB (binary glTF) file from every object in the scene.
///
/// Geometry is baked in world space with modifiers applied. Each object
/// becomes a node; each of its material slots becomes a primitive.
pub fn build_glb(scene: &SceneContext) -> NeonResult<Vec<u8>> {
    let materials = scene.materials();
    let default_material = materials.len();

    // ── Phase 1: Evaluate objects ────────────────────────────
    let mut nodes_src: Vec<(String, Vec<Primitive>)> = Vec::new();
    for object in scene.objects() {
        let world = object.world_mesh()?;
        let mut primitives = Vec::new();
        for (slot, part) in split_by_material(&world) {
            let data = part.triangulate(&[]);
            if data.vertex_count() == 0 || data.indices.is_empty() {
                continue;
            }
            let material = object
                .material_slots
                .get(slot as usize)
                .copied()
                .flatten()
                .filter(|&m| m < materials.len())
                .unwrap_or(default_material);
            primitives.push(Primitive { material, data });
        }
        if !primitives.is_empty() {
            nodes_src.push((object.name.clone(), primitives));
        }
    }

    if nodes_src.is_empty() {
        return Ok(Vec::new());
    }

    // ── Phase 2: Build binary buffer ─────────────────────────
    let mut bin_data: Vec<u8> = Vec::new();
    let mut metas: Vec<NodeMeta> = Vec::new();

    for (name, primitives) in &nodes_src {
        let mut prim_metas = Vec::new();
        for prim in primitives {
            let mesh = &prim.data;
            let vertex_count = mesh.vertex_count();

            // Extract positions and normals from interleaved data
            // Format: [px, py, pz, nx, ny, nz, r, g, b] × vertex_count
            let mut positions: Vec<f32> = Vec::with_capacity(vertex_count * 3);
            let mut normals: Vec<f32> = Vec::with_capacity(vertex_count * 3);
            let mut pos_min = [f32::MAX; 3];
            let mut pos_max = [f32::MIN; 3];

            for v in mesh.vertices.chunks_exact(9) {
                positions.extend_from_slice(&v[0..3]);
                normals.extend_from_slice(&v[3..6]);
                for axis in 0..3 {
                    pos_min[axis] = pos_min[axis].min(v[axis]);
                    pos_max[axis] = pos_max[axis].max(v[axis]);
                }
            }

            let pos_offset = bin_data.len();
            let pos_bytes = floats_to_bytes(&positions);
            let pos_length = pos_bytes.len();
            bin_data.extend_from_slice(&pos_bytes);

            let norm_offset = bin_data.len();
            let norm_bytes = floats_to_bytes(&normals);
            let norm_length = norm_bytes.len();
            bin_data.extend_from_slice(&norm_bytes);

            let idx_offset = bin_data.len();
            let idx_bytes = u32s_to_bytes(&mesh.indices);
            let idx_length = idx_bytes.len();
            bin_data.extend_from_slice(&idx_bytes);

            prim_metas.push(PrimitiveMeta {
                material: prim.material,
                vertex_count,
                index_count: mesh.indices.len(),
                pos_offset,
                pos_length,
                norm_offset,
                norm_length,
                idx_offset,
                idx_length,
                pos_min,
                pos_max,
            });
        }
        metas.push(NodeMeta {
            name: name.clone(),
            primitives: prim_metas,
        });
    }

    // ── Phase 3: Build glTF JSON ─────────────────────────────
    // 3 bufferViews and 3 accessors per primitive (positions, normals, indices)
    let mut accessors = Vec::new();
    let mut buffer_views = Vec::new();
    let mut gltf_meshes = Vec::new();
    let mut nodes = Vec::new();

    for (i, meta) in metas.iter().enumerate() {
        let mut primitives = Vec::new();
        for prim in &meta.primitives {
            let base = accessors.len();

            for (offset, length, target) in [
                (prim.pos_offset, prim.pos_length, ARRAY_BUFFER),
                (prim.norm_offset, prim.norm_length, ARRAY_BUFFER),
                (prim.idx_offset, prim.idx_length, ELEMENT_ARRAY_BUFFER),
            ] {
                buffer_views.push(serde_json::json!({
                    "buffer": 0,
                    "byteOffset": offset,
                    "byteLength": length,
                    "target": target
                }));
            }

            accessors.push(serde_json::json!({
                "bufferView": base,
                "byteOffset": 0,
                "componentType": FLOAT,
                "count": prim.vertex_count,
                "type": "VEC3",
                "min": prim.pos_min,
                "max": prim.pos_max
            }));
            accessors.push(serde_json::json!({
                "bufferView": base + 1,
                "byteOffset": 0,
                "componentType": FLOAT,
                "count": prim.vertex_count,
                "type": "VEC3"
            }));
            accessors.push(serde_json::json!({
                "bufferView": base + 2,
                "byteOffset": 0,
                "componentType": UNSIGNED_INT,
                "count": prim.index_count,
                "type": "SCALAR"
            }));

            primitives.push(serde_json::json!({
                "attributes": {
                    "POSITION": base,
                    "NORMAL": base + 1
                },
                "indices": base + 2,
                "material": prim.material
            }));
        }

        gltf_meshes.push(serde_json::json!({
            "name": meta.name,
            "primitives": primitives
        }));
        nodes.push(serde_json::json!({
            "name": meta.name,
            "mesh": i
        }));
    }

    let mut gltf_materials: Vec<serde_json::Value> = materials.iter().map(material_json).collect();
    gltf_materials.push(serde_json::json!({
        "name": "Default",
        "pbrMetallicRoughness": {
            "baseColorFactor": [0.7, 0.7, 0.72, 1.0],
            "metallicFactor": 0.3,
            "roughnessFactor": 0.5
        }
    }));

    let mut gltf_json = serde_json::json!({
        "asset": {
            "version": "2.0",
            "generator": "neon-sign v0.1"
        },
        "scene": 0,
        "scenes": [{
            "name": "Scene",
            "nodes": (0..nodes.len()).collect::<Vec<_>>()
        }],
        "nodes": nodes,
        "meshes": gltf_meshes,
        "accessors": accessors,
        "bufferViews": buffer_views,
        "buffers": [{
            "byteLength": bin_data.len()
        }],
        "materials": gltf_materials
    });
    if materials.iter().any(|m| m.inputs.is_emissive()) {
        gltf_json["extensionsUsed"] = serde_json::json!([EMISSIVE_STRENGTH_EXT]);
    }

    let mut json_bytes = serde_json::to_vec(&gltf_json)?;

    // Pad JSON to 4-byte alignment with spaces (per GLB spec)
    while json_bytes.len() % 4 != 0 {
        json_bytes.push(b' ');
    }

    // Pad BIN to 4-byte alignment with zeros (per GLB spec)
    while bin_data.len() % 4 != 0 {
        bin_data.push(0);
    }

    // ── Phase 4: Assemble GLB ────────────────────────────────
    let json_chunk_length = json_bytes.len() as u32;
    let bin_chunk_length = bin_data.len() as u32;

    let total_length: u32 = 12 // header
        + 8 + json_chunk_length  // JSON chunk header + data
        + 8 + bin_chunk_length; // BIN chunk header + data

    let mut glb = Vec::with_capacity(total_length as usize);

    glb.extend_from_slice(&GLB_MAGIC.to_le_bytes());
    glb.extend_from_slice(&GLB_VERSION.to_le_bytes());
    glb.extend_from_slice(&total_length.to_le_bytes());

    glb.extend_from_slice(&json_chunk_length.to_le_bytes());
    glb.extend_from_slice(&CHUNK_TYPE_JSON.to_le_bytes());
    glb.extend_from_slice(&json_bytes);

    glb.extend_from_slice(&bin_chunk_length.to_le_bytes());
    glb.extend_from_slice(&CHUNK_TYPE_BIN.to_le_bytes());
    glb.extend_from_slice(&bin_data);

    tracing::info!("GLB export: {} nodes, {} bytes", metas.len(), glb.len());
    Ok(glb)
}

/// Parse the JSON chunk back out of a GLB file
pub fn glb_json(glb: &[u8]) -> Option<serde_json::Value> {
    let read_u32 = |at: usize| -> Option<u32> {
        let bytes: [u8; 4] = glb.get(at..at + 4)?.try_into().ok()?;
        Some(u32::from_le_bytes(bytes))
    };
    if read_u32(0)? != GLB_MAGIC || read_u32(16)? != CHUNK_TYPE_JSON {
        return None;
    }
    let len = read_u32(12)? as usize;
    serde_json::from_slice(glb.get(20..20 + len)?).ok()
}

fn floats_to_bytes(data: &[f32]) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(data.len() * 4);
    for &f in data {
        bytes.extend_from_slice(&f.to_le_bytes());
    }
    bytes
}

fn u32s_to_bytes(data: &[u32]) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(data.len() * 4);
    for &v in data {
        bytes.extend_from_slice(&v.to_le_bytes());
    }
    bytes
}
