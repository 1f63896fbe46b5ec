/*

    Axis aligned bounding box of a glTF 1 scene graph.

    Every mesh vertex is carried through the local matrices
    of its node and all of the node's ancestors, then the
    world space point cloud is reduced to extrema.

    Quick use:
        let bounds = compute_bounding_box(&graph, &positions, Some(3))?;

*/

pub mod bbox;
pub mod config;
pub mod error;
pub mod gltf;
pub mod json_parser;
pub mod mesh;
pub mod numeric;
pub mod rounding;
pub mod scene;
pub mod transform;

pub mod prelude;

pub use bbox::{BoundingBox, Center, Dimensions, Extrema, SceneBounds, compute_bounding_box, compute_bounding_box_with};
pub use config::BoundsConfig;
pub use error::{BoundsError, GraphIntegrityError, LoadError, MeshDataError};
pub use mesh::PositionSource;
pub use scene::{MeshRef, Node, SceneGraph};
