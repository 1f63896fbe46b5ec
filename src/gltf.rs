/*

    Declare glTF 1 document structs needed to find
    mesh vertex positions, and a PositionSource reading
    them out of the document's binary buffers.

    glTF 1 keys every object by a string id:
        mesh.primitives[i].attributes.POSITION -> accessor
        accessor.bufferView -> bufferView
        bufferView.buffer -> buffer (raw bytes)

    Only FLOAT (5126) VEC3 position accessors are read.

    @date: 13 Oct, 2025
    @author: Bartu
*/

use std::borrow::Cow;
use std::collections::{BTreeMap, HashMap};

use byteorder::{ByteOrder, LittleEndian};

use crate::json_parser::deser_usize;
use crate::mesh::PositionSource;
use crate::prelude::*;
use crate::scene::{MeshRef, SceneGraph};

pub const COMPONENT_FLOAT: usize = 5126;
const VEC3_BYTES: usize = 3 * 4;

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GltfDocument {
    /// Default scene id, informational only. Bounds cover every node
    pub scene: Option<String>,
    pub scenes: BTreeMap<String, SceneDesc>,
    pub nodes: SceneGraph,
    pub meshes: BTreeMap<String, MeshDesc>,
    pub accessors: BTreeMap<String, Accessor>,
    pub buffer_views: BTreeMap<String, BufferView>,
    pub buffers: BTreeMap<String, BufferDesc>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SceneDesc {
    /// Root node ids
    pub nodes: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct MeshDesc {
    pub name: Option<String>,
    pub primitives: Vec<Primitive>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Primitive {
    pub attributes: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Deserialize, SmartDefault)]
#[serde(default, rename_all = "camelCase")]
pub struct Accessor {
    pub buffer_view: String,
    #[serde(deserialize_with = "deser_usize")]
    pub byte_offset: usize,
    /// 0 means tightly packed
    #[serde(deserialize_with = "deser_usize")]
    pub byte_stride: usize,
    #[default = 5126]
    #[serde(deserialize_with = "deser_usize")]
    pub component_type: usize,
    #[serde(deserialize_with = "deser_usize")]
    pub count: usize,
    #[default = "VEC3"]
    #[serde(rename = "type")]
    pub kind: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BufferView {
    pub buffer: String,
    #[serde(deserialize_with = "deser_usize")]
    pub byte_offset: usize,
    #[serde(deserialize_with = "deser_usize")]
    pub byte_length: usize,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BufferDesc {
    pub uri: String,
    #[serde(deserialize_with = "deser_usize")]
    pub byte_length: usize,
}

/// Reads positions of a document whose buffers are already in memory, keyed by buffer id.
#[derive(Debug, Clone, Copy)]
pub struct GltfPositions<'a> {
    pub document: &'a GltfDocument,
    pub buffers: &'a HashMap<String, Vec<u8>>,
}

impl<'a> GltfPositions<'a> {
    pub fn new(document: &'a GltfDocument, buffers: &'a HashMap<String, Vec<u8>>) -> Self {
        Self { document, buffers }
    }

    fn read_vec3_accessor(&self, mesh: &str, accessor_id: &str, out: &mut Vec<Float>) -> Result<(), MeshDataError> {
        let missing = |kind: &'static str, id: &str| MeshDataError::MissingReference {
            mesh: mesh.to_string(),
            kind,
            id: id.to_string(),
        };
        let unsupported = |reason: String| MeshDataError::UnsupportedAccessor {
            accessor: accessor_id.to_string(),
            reason,
        };

        let accessor = self.document.accessors.get(accessor_id).ok_or_else(|| missing("accessor", accessor_id))?;
        if accessor.component_type != COMPONENT_FLOAT {
            return Err(unsupported(format!("componentType {} is not FLOAT ({})", accessor.component_type, COMPONENT_FLOAT)));
        }
        if accessor.kind != "VEC3" {
            return Err(unsupported(format!("type '{}' is not VEC3", accessor.kind)));
        }

        let view = self
            .document
            .buffer_views
            .get(&accessor.buffer_view)
            .ok_or_else(|| missing("bufferView", &accessor.buffer_view))?;
        let bytes = self.buffers.get(&view.buffer).ok_or_else(|| missing("buffer", &view.buffer))?;

        let stride = match accessor.byte_stride {
            0 => VEC3_BYTES,
            s if s < VEC3_BYTES => return Err(unsupported(format!("byteStride {} is smaller than a VEC3", s))),
            s => s,
        };

        let out_of_bounds = || MeshDataError::OutOfBounds {
            accessor: accessor_id.to_string(),
            buffer: view.buffer.clone(),
        };

        // Bytes the accessor spans, from its first element to the end of its last one
        let span = match accessor.count {
            0 => 0,
            n => (n - 1)
                .checked_mul(stride)
                .and_then(|v| v.checked_add(VEC3_BYTES))
                .ok_or_else(out_of_bounds)?,
        };
        let start = view.byte_offset.checked_add(accessor.byte_offset).ok_or_else(out_of_bounds)?;
        let end = start.checked_add(span).ok_or_else(out_of_bounds)?;

        let mut limit = bytes.len();
        if view.byte_length > 0 {
            limit = limit.min(view.byte_offset.saturating_add(view.byte_length));
        }
        if end > limit {
            return Err(out_of_bounds());
        }

        out.reserve(accessor.count * 3);
        for i in 0..accessor.count {
            let at = start + i * stride;
            let element = &bytes[at..at + VEC3_BYTES];
            out.extend(element.chunks_exact(4).map(|c| LittleEndian::read_f32(c) as Float));
        }
        Ok(())
    }
}

impl PositionSource for GltfPositions<'_> {
    /// Positions of every primitive of the mesh, concatenated in primitive order.
    fn positions(&self, mesh: &MeshRef) -> Result<Cow<'_, [Float]>, MeshDataError> {
        let desc = self
            .document
            .meshes
            .get(&mesh.mesh)
            .ok_or_else(|| MeshDataError::UnknownMesh(mesh.mesh.clone()))?;

        let mut out = Vec::new();
        for (i, primitive) in desc.primitives.iter().enumerate() {
            match primitive.attributes.get("POSITION") {
                Some(accessor_id) => self.read_vec3_accessor(&mesh.mesh, accessor_id, &mut out)?,
                None => debug!("Primitive {} of mesh '{}' has no POSITION attribute, skipping", i, mesh.mesh),
            }
        }
        Ok(Cow::Owned(out))
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    fn f32_bytes(values: &[f32]) -> Vec<u8> {
        let mut bytes = vec![0u8; values.len() * 4];
        LittleEndian::write_f32_into(values, &mut bytes);
        bytes
    }

    fn document(accessor: &str) -> GltfDocument {
        let json = format!(
            r#"{{
                "nodes": {{ "n": {{ "meshes": ["m"] }} }},
                "meshes": {{ "m": {{ "primitives": [ {{ "attributes": {{ "POSITION": "acc", "NORMAL": "other" }} }} ] }} }},
                "accessors": {{ "acc": {accessor} }},
                "bufferViews": {{ "view": {{ "buffer": "buf", "byteOffset": 4, "byteLength": 64 }} }},
                "buffers": {{ "buf": {{ "uri": "buf.bin", "byteLength": 68 }} }}
            }}"#
        );
        serde_json::from_str(&json).unwrap()
    }

    fn mesh_ref() -> MeshRef {
        MeshRef { mesh: "m".into(), node: "n".into() }
    }

    fn buffers(payload: &[f32]) -> HashMap<String, Vec<u8>> {
        // 4 leading bytes belong to something else
        let mut bytes = vec![0xAB; 4];
        bytes.extend(f32_bytes(payload));
        [("buf".to_string(), bytes)].into_iter().collect()
    }

    #[test]
    fn reads_packed_positions() {
        let doc = document(r#"{ "bufferView": "view", "byteOffset": 0, "componentType": 5126, "count": 2, "type": "VEC3" }"#);
        let bufs = buffers(&[1.0, 2.0, 3.0, -4.0, 5.5, 6.0]);
        let source = GltfPositions::new(&doc, &bufs);
        let positions = source.positions(&mesh_ref()).unwrap();
        assert_eq!(positions.as_ref(), &[1.0, 2.0, 3.0, -4.0, 5.5, 6.0]);
    }

    #[test]
    fn honors_stride_and_offset() {
        // Interleaved position + 1 float of padding, starting after the first element
        let doc = document(r#"{ "bufferView": "view", "byteOffset": 16, "byteStride": 16, "componentType": 5126, "count": 2, "type": "VEC3" }"#);
        let bufs = buffers(&[9.0, 9.0, 9.0, 0.0, 1.0, 2.0, 3.0, 0.0, 4.0, 5.0, 6.0]);
        let source = GltfPositions::new(&doc, &bufs);
        let positions = source.positions(&mesh_ref()).unwrap();
        assert_eq!(positions.as_ref(), &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
    }

    #[test]
    fn accepts_quoted_numbers() {
        let doc = document(r#"{ "bufferView": "view", "byteOffset": "0", "componentType": "5126", "count": "1", "type": "VEC3" }"#);
        let bufs = buffers(&[7.0, 8.0, 9.0]);
        let source = GltfPositions::new(&doc, &bufs);
        let positions = source.positions(&mesh_ref()).unwrap();
        assert_eq!(positions.as_ref(), &[7.0, 8.0, 9.0]);
    }

    #[test]
    fn rejects_reads_past_the_buffer() {
        let doc = document(r#"{ "bufferView": "view", "componentType": 5126, "count": 3, "type": "VEC3" }"#);
        let bufs = buffers(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        let source = GltfPositions::new(&doc, &bufs);
        let err = source.positions(&mesh_ref()).unwrap_err();
        assert!(matches!(err, MeshDataError::OutOfBounds { .. }));
    }

    #[test]
    fn rejects_non_float_components() {
        let doc = document(r#"{ "bufferView": "view", "componentType": 5123, "count": 1, "type": "VEC3" }"#);
        let bufs = buffers(&[1.0, 2.0, 3.0]);
        let source = GltfPositions::new(&doc, &bufs);
        let err = source.positions(&mesh_ref()).unwrap_err();
        assert!(matches!(err, MeshDataError::UnsupportedAccessor { .. }));
    }

    #[test]
    fn missing_buffer_bytes_and_unknown_mesh() {
        let doc = document(r#"{ "bufferView": "view", "componentType": 5126, "count": 1, "type": "VEC3" }"#);
        let empty = HashMap::new();
        let source = GltfPositions::new(&doc, &empty);
        let err = source.positions(&mesh_ref()).unwrap_err();
        assert!(matches!(err, MeshDataError::MissingReference { kind: "buffer", .. }));

        let bufs = buffers(&[1.0, 2.0, 3.0]);
        let other = MeshRef { mesh: "nope".into(), node: "n".into() };
        let source = GltfPositions::new(&doc, &bufs);
        let err = source.positions(&other).unwrap_err();
        assert_eq!(err, MeshDataError::UnknownMesh("nope".into()));
    }

    #[test]
    fn primitives_without_position_are_skipped() {
        let json = r#"{ "meshes": { "m": { "primitives": [ { "attributes": { "NORMAL": "n" } } ] } } }"#;
        let doc: GltfDocument = serde_json::from_str(json).unwrap();
        let bufs = HashMap::new();
        let source = GltfPositions::new(&doc, &bufs);
        let positions = source.positions(&mesh_ref()).unwrap();
        assert!(positions.is_empty());
    }

    #[test]
    fn reads_default_scene_and_roots() {
        let json = r#"{
            "scene": "main",
            "scenes": { "main": { "nodes": ["root", "lamp"] }, "empty": {} },
            "nodes": { "root": {}, "lamp": {} }
        }"#;
        let doc: GltfDocument = serde_json::from_str(json).unwrap();
        assert_eq!(doc.scene.as_deref(), Some("main"));
        assert_eq!(doc.scenes["main"].nodes, vec!["root".to_string(), "lamp".to_string()]);
        assert!(doc.scenes["empty"].nodes.is_empty());

        let bare: GltfDocument = serde_json::from_str(r#"{ "nodes": {} }"#).unwrap();
        assert!(bare.scene.is_none());
        assert!(bare.scenes.is_empty());
    }
}
