/*

    Error types for graph resolution, mesh data extraction
    and file loading.

    @date: Nov, 2025
    @author: bartu
*/

use thiserror::Error;

/// The node graph does not form a valid forest.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GraphIntegrityError {
    #[error("node '{parent}' lists child '{child}' which does not exist in the scene")]
    MissingChild { parent: String, child: String },
    #[error("node '{0}' does not exist in the scene")]
    UnknownNode(String),
    #[error("cycle detected while climbing ancestors of '{start}', node '{repeated}' visited twice")]
    Cycle { start: String, repeated: String },
}

/// A mesh's raw positions could not be resolved.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MeshDataError {
    #[error("mesh '{0}' is not known to the position source")]
    UnknownMesh(String),
    #[error("mesh '{mesh}' has {len} position values, not a multiple of 3")]
    Stride { mesh: String, len: usize },
    #[error("mesh '{mesh}' has a non-finite position value at index {index}")]
    NonFinite { mesh: String, index: usize },
    #[error("mesh '{mesh}' references missing {kind} '{id}'")]
    MissingReference { mesh: String, kind: &'static str, id: String },
    #[error("accessor '{accessor}' is unsupported: {reason}")]
    UnsupportedAccessor { accessor: String, reason: String },
    #[error("accessor '{accessor}' reads past the end of buffer '{buffer}'")]
    OutOfBounds { accessor: String, buffer: String },
}

#[derive(Error, Debug)]
pub enum BoundsError {
    #[error("graph integrity error: {0}")]
    Graph(#[from] GraphIntegrityError),
    #[error("mesh data error: {0}")]
    MeshData(#[from] MeshDataError),
}

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Parse error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("buffer '{buffer}' uses an unsupported uri: {uri}")]
    UnsupportedUri { buffer: String, uri: String },
}
