/*

    Collect mesh vertices of a scene into world space.

    Raw positions come from a PositionSource as a flat
    [x0, y0, z0, x1, y1, z1, ...] sequence in the mesh's
    local space. Each (mesh, node) occurrence is transformed
    by the owning node's composed world matrix.

@date: Oct-Nov 2025
@author: Bartu

*/

use std::borrow::Cow;
use std::collections::{BTreeMap, HashMap};

use rayon::prelude::*;

use crate::prelude::*;
use crate::scene::{MeshRef, ParentIndex, SceneGraph};
use crate::transform::apply;

/// Provides raw local-space vertex positions for a mesh occurrence.
pub trait PositionSource: Sync {
    fn positions(&self, mesh: &MeshRef) -> Result<Cow<'_, [Float]>, MeshDataError>;
}

impl PositionSource for HashMap<String, Vec<Float>> {
    fn positions(&self, mesh: &MeshRef) -> Result<Cow<'_, [Float]>, MeshDataError> {
        self.get(&mesh.mesh)
            .map(|v| Cow::Borrowed(v.as_slice()))
            .ok_or_else(|| MeshDataError::UnknownMesh(mesh.mesh.clone()))
    }
}

impl PositionSource for BTreeMap<String, Vec<Float>> {
    fn positions(&self, mesh: &MeshRef) -> Result<Cow<'_, [Float]>, MeshDataError> {
        self.get(&mesh.mesh)
            .map(|v| Cow::Borrowed(v.as_slice()))
            .ok_or_else(|| MeshDataError::UnknownMesh(mesh.mesh.clone()))
    }
}

/// Group a flat position sequence into homogeneous points.
pub fn points_from_flat(mesh: &str, flat: &[Float]) -> Result<Vec<Point>, MeshDataError> {
    if flat.len() % 3 != 0 {
        return Err(MeshDataError::Stride {
            mesh: mesh.to_string(),
            len: flat.len(),
        });
    }
    if let Some(index) = flat.iter().position(|v| !v.is_finite()) {
        return Err(MeshDataError::NonFinite {
            mesh: mesh.to_string(),
            index,
        });
    }
    Ok(flat
        .chunks_exact(3)
        .map(|c| homogeneous(c[0], c[1], c[2]))
        .collect())
}

pub(crate) fn mesh_world_points<S>(index: &ParentIndex<'_>, source: &S, mesh_ref: &MeshRef) -> Result<Vec<Point>, BoundsError>
where
    S: PositionSource + ?Sized,
{
    let world = index.world_matrix(&mesh_ref.node)?;
    let raw = source.positions(mesh_ref)?;
    let local = points_from_flat(&mesh_ref.mesh, &raw)?;
    debug!("Mesh '{}' on node '{}': {} vertices", mesh_ref.mesh, mesh_ref.node, local.len());

    Ok(local.iter().map(|p| apply(p, &world)).collect())
}

/// All mesh vertices of the scene in world space. Fails on the first bad node or mesh.
pub fn world_points<S>(graph: &SceneGraph, source: &S) -> Result<Vec<Point>, BoundsError>
where
    S: PositionSource + ?Sized,
{
    let index = ParentIndex::build(graph)?;
    let mut points = Vec::new();
    for mesh_ref in graph.mesh_refs() {
        points.extend(mesh_world_points(&index, source, &mesh_ref)?);
    }
    Ok(points)
}

/// Same sequence as `world_points`, each mesh occurrence transformed on the rayon pool.
pub fn world_points_par<S>(graph: &SceneGraph, source: &S) -> Result<Vec<Point>, BoundsError>
where
    S: PositionSource + ?Sized,
{
    let index = ParentIndex::build(graph)?;
    let per_mesh: Vec<Vec<Point>> = graph
        .mesh_refs()
        .par_iter()
        .map(|mesh_ref| mesh_world_points(&index, source, mesh_ref))
        .collect::<Result<_, _>>()?;
    Ok(per_mesh.into_iter().flatten().collect())
}
