/*

    Provide utilities to load glTF 1 (.gltf) files from disk.

    The parser is somewhat robust, integer fields of the
    document can be given both in quotes (string) or as is.

    e.g. In JSON file both
    "byteStride": "12" and "byteStride": 12
    works as byte_stride: usize in source code

    WARNING: Embedded buffers (data: URIs) and binary glTF
    are not supported, buffers must be separate files.

    @date: 2 Oct, 2025
    @author: bartu
*/

use std::collections::HashMap;
use std::fs::{self, File};
use std::io::BufReader;
use std::path::Path;

use serde::{Deserializer, de};

use crate::error::LoadError;
use crate::gltf::GltfDocument;
use crate::prelude::*;

pub fn parse_gltf<P: AsRef<Path>>(path: P) -> Result<GltfDocument, LoadError> {
    let span = tracing::span!(tracing::Level::INFO, "load_scene");
    let _enter = span.enter();

    // Open file
    let path = path.as_ref();
    let file = File::open(path)?;
    let reader = BufReader::new(file);
    debug!("Reading file from {}", path.display());

    // Parse JSON into document
    let document: GltfDocument = serde_json::from_reader(reader)?;
    info!(
        "Loaded {} nodes, {} meshes, {} buffers",
        document.nodes.len(), document.meshes.len(), document.buffers.len()
    );
    Ok(document)
}

/// Read every buffer of the document, relative uris resolved against `base_dir`.
pub fn load_buffers(document: &GltfDocument, base_dir: &Path) -> Result<HashMap<String, Vec<u8>>, LoadError> {
    let mut buffers = HashMap::with_capacity(document.buffers.len());

    for (id, desc) in document.buffers.iter() {
        if desc.uri.starts_with("data:") || desc.uri.is_empty() {
            error!("Buffer '{}' is not stored in a separate file", id);
            return Err(LoadError::UnsupportedUri {
                buffer: id.clone(),
                uri: desc.uri.chars().take(32).collect(),
            });
        }

        let path = base_dir.join(&desc.uri);
        debug!("Reading buffer '{}' from {}", id, path.display());
        let bytes = fs::read(&path)?;
        if desc.byte_length > 0 && bytes.len() < desc.byte_length {
            warn!("Buffer '{}' declares {} bytes but {} were read", id, desc.byte_length, bytes.len());
        }
        buffers.insert(id.clone(), bytes);
    }

    Ok(buffers)
}

pub(crate) fn deser_usize<'de, D>(deserializer: D) -> Result<usize, D::Error>
where
    D: Deserializer<'de>,
{
    /*
        Deserialize usize type given as either string or number in JSON
    */
    let s: serde_json::Value = Deserialize::deserialize(deserializer)?;
    match s {
        serde_json::Value::Number(n) => n.as_u64()
            .map(|v| v as usize)
            .ok_or_else(|| de::Error::custom("Invalid unsigned integer")),
        serde_json::Value::String(s) => s.parse::<usize>()
            .map_err(|_| de::Error::custom("Failed to parse integer from string")),
        t => Err(de::Error::custom(format!("Expected int or string, found {:#?}", t))),
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("gltf-extent-{}-{}", name, std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn loads_document_and_buffers_from_disk() {
        let dir = scratch_dir("load");
        let gltf = r#"{
            "nodes": { "n": { "meshes": ["m"] } },
            "buffers": { "buf": { "uri": "data.bin", "byteLength": 4, "type": "arraybuffer" } }
        }"#;
        fs::write(dir.join("scene.gltf"), gltf).unwrap();
        fs::write(dir.join("data.bin"), [1u8, 2, 3, 4]).unwrap();

        let doc = parse_gltf(dir.join("scene.gltf")).unwrap();
        assert_eq!(doc.nodes.len(), 1);
        let buffers = load_buffers(&doc, &dir).unwrap();
        assert_eq!(buffers["buf"], vec![1, 2, 3, 4]);

        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn embedded_buffers_are_rejected() {
        let doc: GltfDocument = serde_json::from_str(
            r#"{ "buffers": { "buf": { "uri": "data:application/octet-stream;base64,AAAA" } } }"#,
        )
        .unwrap();
        let err = load_buffers(&doc, Path::new(".")).unwrap_err();
        assert!(matches!(err, LoadError::UnsupportedUri { ref buffer, .. } if buffer == "buf"));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = parse_gltf("/definitely/not/here.gltf").unwrap_err();
        assert!(matches!(err, LoadError::Io(_)));
    }

    #[test]
    fn malformed_json_is_parse_error() {
        let dir = scratch_dir("malformed");
        fs::write(dir.join("bad.gltf"), "{ \"nodes\": [").unwrap();
        let err = parse_gltf(dir.join("bad.gltf")).unwrap_err();
        assert!(matches!(err, LoadError::Json(_)));
        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn usize_from_string_or_number() {
        #[derive(Deserialize)]
        struct Holder {
            #[serde(deserialize_with = "deser_usize")]
            v: usize,
        }
        let a: Holder = serde_json::from_str(r#"{ "v": 12 }"#).unwrap();
        let b: Holder = serde_json::from_str(r#"{ "v": "12" }"#).unwrap();
        assert_eq!(a.v, 12);
        assert_eq!(b.v, 12);
        assert!(serde_json::from_str::<Holder>(r#"{ "v": -1 }"#).is_err());
        assert!(serde_json::from_str::<Holder>(r#"{ "v": [1] }"#).is_err());
    }
}
