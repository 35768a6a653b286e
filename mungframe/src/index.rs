//! Id-keyed lookup of a flat list of objects.

use std::collections::HashMap;

use crate::{graph::GraphError, DetectedObject, ObjId};

/// A borrowed lookup table from [`ObjId`]s to the [`DetectedObject`]s of one document.
#[derive(Debug, Clone, Default)]
pub struct ObjectIndex<'obj> {
    map: HashMap<ObjId, &'obj DetectedObject>,
}

impl<'obj> ObjectIndex<'obj> {
    /// Index a flat list of objects by their ids.  Ids are required to be unique within a
    /// document, so a repeated id is an error.
    pub fn new(
        objects: impl IntoIterator<Item = &'obj DetectedObject>,
    ) -> Result<Self, GraphError> {
        let mut map = HashMap::new();
        for obj in objects {
            if map.insert(obj.id(), obj).is_some() {
                return Err(GraphError::DuplicateId(obj.id()));
            }
        }
        Ok(Self { map })
    }

    pub fn get(&self, id: ObjId) -> Option<&'obj DetectedObject> {
        self.map.get(&id).copied()
    }

    /// Like [`ObjectIndex::get`], but failing with [`GraphError::UnknownNode`]
    pub fn lookup(&self, id: ObjId) -> Result<&'obj DetectedObject, GraphError> {
        self.get(id).ok_or(GraphError::UnknownNode(id))
    }

    pub fn contains(&self, id: ObjId) -> bool {
        self.map.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}
