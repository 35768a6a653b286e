//! Detected notation objects and their identifiers.

use std::{
    collections::BTreeSet,
    fmt::{Debug, Display, Formatter},
    num::ParseIntError,
    str::FromStr,
};

#[cfg(feature = "serde")]
use serde_crate::{Deserialize, Serialize};

use crate::BoundingBox;

/// The identifier of a [`DetectedObject`], unique within one document.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate", transparent)
)]
pub struct ObjId(u32);

impl ObjId {
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    pub fn as_u32(self) -> u32 {
        self.0
    }
}

impl From<u32> for ObjId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl FromStr for ObjId {
    type Err = ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(Self)
    }
}

impl Debug for ObjId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl Display for ObjId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A single notation primitive (notehead, stem, beam, ...) found on a page, along with the ids of
/// the objects it is linked to.
///
/// The links of an object can be read freely, but can only be changed by the
/// [`NotationGraph`](crate::NotationGraph) which owns it.  This is what allows the graph to
/// guarantee that every outlink has a matching inlink.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
pub struct DetectedObject {
    id: ObjId,
    class_name: String,
    bbox: BoundingBox,
    #[cfg_attr(feature = "serde", serde(default))]
    inlinks: BTreeSet<ObjId>,
    #[cfg_attr(feature = "serde", serde(default))]
    outlinks: BTreeSet<ObjId>,
}

impl DetectedObject {
    /// Creates a new `DetectedObject` with no links
    pub fn new(id: ObjId, class_name: impl Into<String>, bbox: BoundingBox) -> Self {
        Self {
            id,
            class_name: class_name.into(),
            bbox,
            inlinks: BTreeSet::new(),
            outlinks: BTreeSet::new(),
        }
    }

    /// Creates a `DetectedObject` which already has links (e.g. when loading an annotated
    /// document).  Nothing is checked here; a [`NotationGraph`](crate::NotationGraph) containing
    /// one-sided links will report them as soon as they're touched.
    pub fn with_links(
        id: ObjId,
        class_name: impl Into<String>,
        bbox: BoundingBox,
        inlinks: impl IntoIterator<Item = ObjId>,
        outlinks: impl IntoIterator<Item = ObjId>,
    ) -> Self {
        Self {
            id,
            class_name: class_name.into(),
            bbox,
            inlinks: inlinks.into_iter().collect(),
            outlinks: outlinks.into_iter().collect(),
        }
    }

    /// Deep-copies this object, leaving out all of its links.
    pub fn without_links(&self) -> Self {
        Self {
            id: self.id,
            class_name: self.class_name.clone(),
            bbox: self.bbox,
            inlinks: BTreeSet::new(),
            outlinks: BTreeSet::new(),
        }
    }

    pub fn id(&self) -> ObjId {
        self.id
    }

    pub fn class_name(&self) -> &str {
        &self.class_name
    }

    pub fn bbox(&self) -> &BoundingBox {
        &self.bbox
    }

    /// Ids of the objects with an edge pointing **to** this one
    pub fn inlinks(&self) -> &BTreeSet<ObjId> {
        &self.inlinks
    }

    /// Ids of the objects which this object has an edge pointing to
    pub fn outlinks(&self) -> &BTreeSet<ObjId> {
        &self.outlinks
    }

    pub(crate) fn inlinks_mut(&mut self) -> &mut BTreeSet<ObjId> {
        &mut self.inlinks
    }

    pub(crate) fn outlinks_mut(&mut self) -> &mut BTreeSet<ObjId> {
        &mut self.outlinks
    }
}
