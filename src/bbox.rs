/*

    Axis Aligned Bounding Box of a whole scene.

    Axis convention: X (index 0) is width, Y (index 1) is
    the up axis and gives height, Z (index 2) gives depth.
    Center coordinates use the same mapping.

    @author: bartu
    @date: 9 Nov, 2025
*/

use rayon::prelude::*;

use crate::prelude::*;
use crate::config::BoundsConfig;
use crate::mesh::{PositionSource, mesh_world_points, world_points};
use crate::rounding::{DecimalRounding, Rounding};
use crate::scene::{ParentIndex, SceneGraph};

/// Running per-axis minimum and maximum. Never shrinks.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Extrema {
    pub min: Vector3,
    pub max: Vector3,
}

impl Default for Extrema {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl Extrema {
    pub const EMPTY: Self = Self {
        min: Vector3::INFINITY,
        max: Vector3::NEG_INFINITY,
    };

    /// Only x, y, z take part, w is dropped.
    pub fn expand(&mut self, point: &Point) {
        let p = point.truncate();
        self.min = self.min.min(p);
        self.max = self.max.max(p);
    }

    pub fn merge(&self, other: &Extrema) -> Extrema {
        Extrema {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    /// True while no point has been seen.
    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y || self.min.z > self.max.z
    }

    pub fn size(&self) -> Vector3 {
        self.max - self.min
    }

    pub fn midpoint(&self) -> Vector3 {
        (self.max + self.min) / 2.0
    }
}

pub fn reduce<'a, I>(points: I) -> Extrema
where
    I: IntoIterator<Item = &'a Point>,
{
    points.into_iter().fold(Extrema::EMPTY, |mut acc, p| {
        acc.expand(p);
        acc
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Dimensions {
    pub width: Float,
    pub height: Float,
    pub depth: Float,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Center {
    pub x: Float,
    pub y: Float,
    pub z: Float,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub dimensions: Dimensions,
    pub center: Center,
}

impl BoundingBox {
    /// Derive dimensions and center, rounding each of the six values.
    /// Center is rounded after halving.
    pub fn from_extrema<R>(extrema: &Extrema, precision: Option<u32>, rounding: &R) -> Self
    where
        R: Rounding + ?Sized,
    {
        let round = |v: Float| match precision {
            Some(p) => rounding.round(v, p),
            None => v,
        };
        let size = extrema.size();
        let mid = extrema.midpoint();

        Self {
            dimensions: Dimensions {
                width: round(size.x),
                height: round(size.y),
                depth: round(size.z),
            },
            center: Center {
                x: round(mid.x),
                y: round(mid.y),
                z: round(mid.z),
            },
        }
    }
}

/// Outcome of a bounding box computation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SceneBounds {
    /// No mesh vertex was found in the scene.
    EmptyScene,
    Bounded(BoundingBox),
}

impl SceneBounds {
    pub fn is_empty(&self) -> bool {
        matches!(self, SceneBounds::EmptyScene)
    }

    pub fn bounding_box(&self) -> Option<&BoundingBox> {
        match self {
            SceneBounds::EmptyScene => None,
            SceneBounds::Bounded(b) => Some(b),
        }
    }
}

/// Per mesh occurrence extrema computed on the rayon pool, then merged.
fn scene_extrema_par<S>(graph: &SceneGraph, source: &S) -> Result<Extrema, BoundsError>
where
    S: PositionSource + ?Sized,
{
    let index = ParentIndex::build(graph)?;
    graph
        .mesh_refs()
        .par_iter()
        .map(|mesh_ref| mesh_world_points(&index, source, mesh_ref).map(|points| reduce(&points)))
        .try_reduce(|| Extrema::EMPTY, |a, b| Ok(a.merge(&b)))
}

pub fn scene_extrema<S>(graph: &SceneGraph, source: &S, parallel: bool) -> Result<Extrema, BoundsError>
where
    S: PositionSource + ?Sized,
{
    if parallel {
        scene_extrema_par(graph, source)
    } else {
        Ok(reduce(&world_points(graph, source)?))
    }
}

/// Bounding box of every mesh vertex in the scene, in world space.
pub fn compute_bounding_box<S>(graph: &SceneGraph, source: &S, precision: Option<u32>) -> Result<SceneBounds, BoundsError>
where
    S: PositionSource + ?Sized,
{
    compute_bounding_box_with(graph, source, &BoundsConfig::with_precision(precision), &DecimalRounding)
}

pub fn compute_bounding_box_with<S, R>(
    graph: &SceneGraph,
    source: &S,
    config: &BoundsConfig,
    rounding: &R,
) -> Result<SceneBounds, BoundsError>
where
    S: PositionSource + ?Sized,
    R: Rounding + ?Sized,
{
    let span = tracing::span!(tracing::Level::INFO, "compute_bounds");
    let _enter = span.enter();

    debug!("Computing bounds over {} nodes with {:?}", graph.len(), config);
    let extrema = scene_extrema(graph, source, config.parallel)?;

    if extrema.is_empty() {
        warn!("No mesh vertices found in the scene");
        return Ok(SceneBounds::EmptyScene);
    }
    debug!("Extrema min: {:?}, max: {:?}", extrema.min, extrema.max);

    let bbox = BoundingBox::from_extrema(&extrema, config.precision, rounding);
    info!(
        "Bounds {} x {} x {} centered at ({}, {}, {})",
        bbox.dimensions.width, bbox.dimensions.height, bbox.dimensions.depth,
        bbox.center.x, bbox.center.y, bbox.center.z,
    );
    Ok(SceneBounds::Bounded(bbox))
}
