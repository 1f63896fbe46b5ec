/*

    Declare the node graph of a glTF 1 scene and resolve
    node ancestry into world transforms.

    Nodes do not store their parent, it is discovered from
    whichever node lists them as a child. The child -> parent
    index is built once per invocation instead of rescanning
    the whole graph for every lookup.

    Nodes are kept in a BTreeMap, so iteration follows the
    lexicographic order of node ids. That order decides which
    parent wins when several nodes claim the same child.

    @date: 2 Oct, 2025
    @author: Bartu
*/

use std::collections::{BTreeMap, HashMap, HashSet};
use std::collections::hash_map::Entry;

use crate::prelude::*;
use crate::transform::{RowMatrix, compose};

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Node {
    pub name: Option<String>,
    pub matrix: Option<RowMatrix>,
    pub meshes: Vec<String>,
    pub children: Vec<String>,

    // TRS properties are recognized only to warn about them
    pub translation: Option<Vec<Float>>,
    pub rotation: Option<Vec<Float>>,
    pub scale: Option<Vec<Float>>,
}

impl Node {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_matrix(mut self, matrix: RowMatrix) -> Self {
        self.matrix = Some(matrix);
        self
    }

    pub fn with_meshes<S: Into<String>>(mut self, meshes: impl IntoIterator<Item = S>) -> Self {
        self.meshes = meshes.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_children<S: Into<String>>(mut self, children: impl IntoIterator<Item = S>) -> Self {
        self.children = children.into_iter().map(Into::into).collect();
        self
    }

    /// Local matrix, identity when absent.
    pub fn local_matrix(&self) -> RowMatrix {
        self.matrix.unwrap_or(RowMatrix::IDENTITY)
    }

    fn has_trs(&self) -> bool {
        self.translation.is_some() || self.rotation.is_some() || self.scale.is_some()
    }
}

/// A mesh occurrence together with the node that owns it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MeshRef {
    pub mesh: String,
    pub node: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct SceneGraph {
    nodes: BTreeMap<String, Node>,
}

impl SceneGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert<S: Into<String>>(&mut self, name: S, node: Node) -> Option<Node> {
        self.nodes.insert(name.into(), node)
    }

    pub fn get(&self, name: &str) -> Option<&Node> {
        self.nodes.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.nodes.contains_key(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Node)> {
        self.nodes.iter()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Every (mesh, owning node) pair, in node order and then
    /// in each node's own mesh order. Nodes without meshes are skipped.
    pub fn mesh_refs(&self) -> Vec<MeshRef> {
        self.nodes
            .iter()
            .filter(|(_, node)| !node.meshes.is_empty())
            .flat_map(|(name, node)| {
                node.meshes.iter().map(move |mesh| MeshRef {
                    mesh: mesh.clone(),
                    node: name.clone(),
                })
            })
            .collect()
    }
}

impl<S: Into<String>> FromIterator<(S, Node)> for SceneGraph {
    fn from_iter<I: IntoIterator<Item = (S, Node)>>(iter: I) -> Self {
        Self {
            nodes: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}

/// Child -> parent lookup over a borrowed graph.
#[derive(Debug)]
pub struct ParentIndex<'g> {
    graph: &'g SceneGraph,
    parents: HashMap<&'g str, &'g str>,
}

impl<'g> ParentIndex<'g> {
    /// Validates every child reference while indexing.
    pub fn build(graph: &'g SceneGraph) -> Result<Self, GraphIntegrityError> {
        let mut parents: HashMap<&'g str, &'g str> = HashMap::with_capacity(graph.len());

        for (name, node) in graph.nodes.iter() {
            if node.matrix.is_none() && node.has_trs() {
                warn!("Node '{}' uses translation/rotation/scale which are not composed, treating it as identity", name);
            }

            for child in node.children.iter() {
                if !graph.contains(child) {
                    error!("Node '{}' lists unknown child '{}'", name, child);
                    return Err(GraphIntegrityError::MissingChild {
                        parent: name.clone(),
                        child: child.clone(),
                    });
                }

                match parents.entry(child.as_str()) {
                    Entry::Vacant(e) => {
                        e.insert(name.as_str());
                    }
                    Entry::Occupied(e) => {
                        warn!("Node '{}' is claimed by both '{}' and '{}', keeping '{}'", child, e.get(), name, e.get());
                    }
                }
            }
        }

        debug!("Indexed {} parent links over {} nodes", parents.len(), graph.len());
        Ok(Self { graph, parents })
    }

    pub fn parent_of(&self, node: &str) -> Option<&'g str> {
        self.parents.get(node).copied()
    }

    /// Local matrices from `node` up to its root, nearest first.
    pub fn ancestor_chain(&self, node: &str) -> Result<Vec<RowMatrix>, GraphIntegrityError> {
        let (mut name, mut current) = self
            .graph
            .nodes
            .get_key_value(node)
            .ok_or_else(|| GraphIntegrityError::UnknownNode(node.to_string()))?;

        let mut visited: HashSet<&'g str> = HashSet::new();
        let mut chain = Vec::new();

        loop {
            if !visited.insert(name.as_str()) {
                error!("Cycle found above node '{}' at '{}'", node, name);
                return Err(GraphIntegrityError::Cycle {
                    start: node.to_string(),
                    repeated: name.clone(),
                });
            }
            chain.push(current.local_matrix());

            match self.parent_of(name) {
                Some(parent) => {
                    (name, current) = self
                        .graph
                        .nodes
                        .get_key_value(parent)
                        .ok_or_else(|| GraphIntegrityError::UnknownNode(parent.to_string()))?;
                }
                None => break,
            }
        }

        Ok(chain)
    }

    /// Composed local-to-world matrix of `node`.
    pub fn world_matrix(&self, node: &str) -> Result<RowMatrix, GraphIntegrityError> {
        Ok(compose(&self.ancestor_chain(node)?))
    }
}

pub fn ancestor_chain(node: &str, graph: &SceneGraph) -> Result<Vec<RowMatrix>, GraphIntegrityError> {
    ParentIndex::build(graph)?.ancestor_chain(node)
}
