//! The notation graph of one document, whose edges are always stored on both endpoints.

use std::{
    collections::HashMap,
    fmt::{Display, Formatter},
};

use crate::{DetectedObject, ObjId};

index_vec::define_index_type! { pub struct NodeIdx = usize; }
pub type NodeVec<T> = index_vec::IndexVec<NodeIdx, T>;

/// The objects of a single document, along with the edges between them.
///
/// Every edge `a -> b` is recorded twice: `b` is in the outlinks of `a`, and `a` is in the
/// inlinks of `b`.  [`NotationGraph::add_edge`] and [`NotationGraph::remove_edge`] are the only
/// ways of changing edges, and they never leave only one half of an edge behind.  Finding an edge
/// which is only recorded on one side is always reported as [`GraphError::Inconsistent`] and never
/// repaired.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotationGraph {
    /// The objects, in the order that they were given
    objects: NodeVec<DetectedObject>,
    indices: HashMap<ObjId, NodeIdx>,
}

impl NotationGraph {
    /// Creates a `NotationGraph` which owns the given objects.  The only check made is that no two
    /// objects share an id; links are taken as-is (see [`NotationGraph::check_consistency`]).
    pub fn new(objects: impl IntoIterator<Item = DetectedObject>) -> Result<Self, GraphError> {
        let objects: NodeVec<DetectedObject> = objects.into_iter().collect();
        let mut indices = HashMap::with_capacity(objects.len());
        for (idx, obj) in objects.iter_enumerated() {
            if indices.insert(obj.id(), idx).is_some() {
                return Err(GraphError::DuplicateId(obj.id()));
            }
        }
        Ok(Self { objects, indices })
    }

    /// Creates a new graph containing a deep copy of every object in `self`, but no edges at all.
    /// `self` is left untouched.
    pub fn cloned_without_edges(&self) -> Self {
        Self {
            objects: self.objects.iter().map(DetectedObject::without_links).collect(),
            indices: self.indices.clone(),
        }
    }

    /////////////
    // GETTERS //
    /////////////

    pub fn get(&self, id: ObjId) -> Option<&DetectedObject> {
        self.indices.get(&id).map(|&idx| &self.objects[idx])
    }

    pub fn contains(&self, id: ObjId) -> bool {
        self.indices.contains_key(&id)
    }

    /// The objects of this graph, in the order they were added
    pub fn objects(&self) -> &[DetectedObject] {
        self.objects.as_raw_slice()
    }

    pub fn ids(&self) -> impl Iterator<Item = ObjId> + '_ {
        self.objects.iter().map(DetectedObject::id)
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Every `(from, to)` edge, as seen from the outlinks of each object
    pub fn edges(&self) -> impl Iterator<Item = (ObjId, ObjId)> + '_ {
        self.objects
            .iter()
            .flat_map(|obj| obj.outlinks().iter().map(move |&to| (obj.id(), to)))
    }

    pub fn num_edges(&self) -> usize {
        self.objects.iter().map(|obj| obj.outlinks().len()).sum()
    }

    //////////////
    // EDGE OPS //
    //////////////

    /// Returns `true` if the edge `from -> to` exists on both of its endpoints, and `false` if it
    /// exists on neither.  An edge recorded only on one endpoint is an error.
    pub fn has_edge(&self, from: ObjId, to: ObjId) -> Result<bool, GraphError> {
        let (from_idx, to_idx) = self.endpoint_indices(from, to)?;
        self.edge_state(from_idx, to_idx)
    }

    /// Adds the edge `from -> to` to both endpoints.  Adding an edge which already exists does
    /// nothing.
    pub fn add_edge(&mut self, from: ObjId, to: ObjId) -> Result<(), GraphError> {
        let (from_idx, to_idx) = self.endpoint_indices(from, to)?;
        if self.edge_state(from_idx, to_idx)? {
            log::info!("Adding edge that is already in the graph: {from} --> {to}; doing nothing");
            return Ok(());
        }
        // Both checks have passed, so neither of these can fail
        self.objects[from_idx].outlinks_mut().insert(to);
        self.objects[to_idx].inlinks_mut().insert(from);
        Ok(())
    }

    /// Removes the edge `from -> to` from both endpoints.  Removing an edge which doesn't exist
    /// does nothing.
    pub fn remove_edge(&mut self, from: ObjId, to: ObjId) -> Result<(), GraphError> {
        let (from_idx, to_idx) = self.endpoint_indices(from, to)?;
        if !self.edge_state(from_idx, to_idx)? {
            return Ok(());
        }
        self.objects[from_idx].outlinks_mut().remove(&to);
        self.objects[to_idx].inlinks_mut().remove(&from);
        Ok(())
    }

    /// Checks that every link in the graph points to an object in the graph, and that every edge
    /// is recorded on both of its endpoints.  Returns the first problem found.
    pub fn check_consistency(&self) -> Result<(), GraphError> {
        for obj in &self.objects {
            let id = obj.id();
            for &to in obj.outlinks() {
                let target = self
                    .get(to)
                    .ok_or(GraphError::DanglingLink { from: id, to })?;
                if !target.inlinks().contains(&id) {
                    return Err(GraphError::Inconsistent {
                        from: id,
                        to,
                        side: EdgeSide::OutlinkOnly,
                    });
                }
            }
            for &from in obj.inlinks() {
                let source = self
                    .get(from)
                    .ok_or(GraphError::DanglingLink { from, to: id })?;
                if !source.outlinks().contains(&id) {
                    return Err(GraphError::Inconsistent {
                        from,
                        to: id,
                        side: EdgeSide::InlinkOnly,
                    });
                }
            }
        }
        Ok(())
    }

    fn endpoint_indices(&self, from: ObjId, to: ObjId) -> Result<(NodeIdx, NodeIdx), GraphError> {
        let from_idx = *self
            .indices
            .get(&from)
            .ok_or(GraphError::UnknownNode(from))?;
        let to_idx = *self.indices.get(&to).ok_or(GraphError::UnknownNode(to))?;
        Ok((from_idx, to_idx))
    }

    fn edge_state(&self, from_idx: NodeIdx, to_idx: NodeIdx) -> Result<bool, GraphError> {
        let from = self.objects[from_idx].id();
        let to = self.objects[to_idx].id();
        let in_outlinks = self.objects[from_idx].outlinks().contains(&to);
        let in_inlinks = self.objects[to_idx].inlinks().contains(&from);
        match (in_outlinks, in_inlinks) {
            (true, true) => Ok(true),
            (false, false) => Ok(false),
            (true, false) => Err(GraphError::Inconsistent {
                from,
                to,
                side: EdgeSide::OutlinkOnly,
            }),
            (false, true) => Err(GraphError::Inconsistent {
                from,
                to,
                side: EdgeSide::InlinkOnly,
            }),
        }
    }
}

/// Which half of a one-sided edge is present
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeSide {
    /// `to` is in the outlinks of `from`, but `from` isn't in the inlinks of `to`
    OutlinkOnly,
    /// `from` is in the inlinks of `to`, but `to` isn't in the outlinks of `from`
    InlinkOnly,
}

/// The ways that reading or changing the edges of a [`NotationGraph`] can fail
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GraphError {
    /// An edge operation referred to an object which isn't in the graph
    UnknownNode(ObjId),
    /// The edge `from -> to` is only recorded on one of its endpoints.  This always means that
    /// the graph was corrupted before the operation that found it.
    Inconsistent {
        from: ObjId,
        to: ObjId,
        side: EdgeSide,
    },
    /// Two objects in the same document share an id
    DuplicateId(ObjId),
    /// The edge `from -> to` is recorded on one endpoint, but the other endpoint isn't in the
    /// graph
    DanglingLink { from: ObjId, to: ObjId },
}

impl Display for GraphError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            GraphError::UnknownNode(id) => write!(f, "Object {} is not in the graph", id),
            GraphError::Inconsistent {
                from,
                to,
                side: EdgeSide::OutlinkOnly,
            } => write!(
                f,
                "Inconsistent edge {from} --> {to}: found {to} in outlinks of {from}, \
                 but not {from} in inlinks of {to}"
            ),
            GraphError::Inconsistent {
                from,
                to,
                side: EdgeSide::InlinkOnly,
            } => write!(
                f,
                "Inconsistent edge {from} --> {to}: found {from} in inlinks of {to}, \
                 but not {to} in outlinks of {from}"
            ),
            GraphError::DuplicateId(id) => write!(f, "Object id {} is used more than once", id),
            GraphError::DanglingLink { from, to } => write!(
                f,
                "Edge {from} --> {to} refers to an object which is not in the graph"
            ),
        }
    }
}

impl std::error::Error for GraphError {}
