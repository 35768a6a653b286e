//! Code to rebuild the edges of a [`NotationGraph`] from a classifier's pairwise decisions.

use mungframe::{NotationGraph, ObjId};

use crate::{Config, Error, Result};

/// A classifier's verdict on whether or not the edge `from -> to` should exist
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Decision {
    pub from: ObjId,
    pub to: ObjId,
    pub has_edge: bool,
}

impl Decision {
    pub fn new(from: ObjId, to: ObjId, has_edge: bool) -> Self {
        Self { from, to, has_edge }
    }

    /// Creates a `Decision` from a classifier's output class, which must be `0` (no edge) or `1`
    /// (edge).
    pub fn from_label(from: ObjId, to: ObjId, label: u8) -> Result<Self> {
        match label {
            0 => Ok(Self::new(from, to, false)),
            1 => Ok(Self::new(from, to, true)),
            _ => Err(Error::InvalidLabel { from, to, label }),
        }
    }
}

/// Produces new [`NotationGraph`]s which have the same objects as an input graph, but whose edges
/// come from a sequence of [`Decision`]s.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GraphUpdater {
    /// If `true`, every edge of the input graph is discarded before the decisions are applied,
    /// so the output edges come from the decisions alone.  If `false`, the input's edges are
    /// kept and negative decisions remove them.
    pub replace_all_edges: bool,
}

impl GraphUpdater {
    pub fn new(replace_all_edges: bool) -> Self {
        Self { replace_all_edges }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.replace_all_edges)
    }

    /// Builds a new graph by replaying `decisions` (in order) onto a deep copy of `graph`'s
    /// objects.  `graph` itself is never modified.
    ///
    /// Positive decisions add their edge.  Negative decisions remove their edge if the graph
    /// currently has it; when `replace_all_edges` is set, this can only happen if an earlier
    /// decision added it.
    ///
    /// Any error aborts the whole update: no partially updated graph is ever returned.
    pub fn update(
        &self,
        graph: &NotationGraph,
        decisions: impl IntoIterator<Item = Decision>,
    ) -> Result<NotationGraph> {
        let mut new_graph = if self.replace_all_edges {
            graph.cloned_without_edges()
        } else {
            graph.clone()
        };

        let mut num_decisions = 0;
        let mut num_added = 0;
        let mut num_removed = 0;
        for Decision { from, to, has_edge } in decisions {
            num_decisions += 1;
            if has_edge {
                log::debug!("Adding edge: {} --> {}", from, to);
                new_graph.add_edge(from, to)?;
                num_added += 1;
            } else if new_graph.has_edge(from, to)? {
                log::debug!("Removing edge: {} --> {}", from, to);
                new_graph.remove_edge(from, to)?;
                num_removed += 1;
            }
        }

        log::info!(
            "Applied {} decisions to {} objects: {} positive, {} edges removed, {} edges in output",
            num_decisions,
            new_graph.len(),
            num_added,
            num_removed,
            new_graph.num_edges()
        );
        Ok(new_graph)
    }
}

impl Default for GraphUpdater {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use itertools::Itertools;
    use mungframe::{BoundingBox, DetectedObject, EdgeSide, GraphError};
    use quickcheck_macros::quickcheck;

    use super::*;

    fn id(n: u32) -> ObjId {
        ObjId::new(n)
    }

    fn decision(from: u32, to: u32, has_edge: bool) -> Decision {
        Decision::new(id(from), id(to), has_edge)
    }

    /// A graph of 4 objects, with edges `0 -> 1` and `2 -> 3`
    fn input_graph() -> NotationGraph {
        let mut graph = NotationGraph::new((0..4).map(|n| {
            DetectedObject::new(id(n), "notehead-full", BoundingBox::new(0, 0, 9, 9))
        }))
        .unwrap();
        graph.add_edge(id(0), id(1)).unwrap();
        graph.add_edge(id(2), id(3)).unwrap();
        graph
    }

    fn edges(graph: &NotationGraph) -> Vec<(u32, u32)> {
        graph
            .edges()
            .map(|(from, to)| (from.as_u32(), to.as_u32()))
            .sorted()
            .collect_vec()
    }

    #[test]
    fn from_label() {
        assert_eq!(Decision::from_label(id(1), id(2), 1), Ok(decision(1, 2, true)));
        assert_eq!(Decision::from_label(id(1), id(2), 0), Ok(decision(1, 2, false)));
        assert_eq!(
            Decision::from_label(id(1), id(2), 2),
            Err(Error::InvalidLabel {
                from: id(1),
                to: id(2),
                label: 2
            })
        );
    }

    #[test]
    fn replace_all_edges() {
        let input = input_graph();
        let original = input.clone();
        let decisions = vec![
            decision(1, 2, true),
            decision(0, 1, false),
            decision(3, 0, true),
            decision(2, 3, false),
        ];
        let output = GraphUpdater::new(true).update(&input, decisions).unwrap();
        assert_eq!(edges(&output), vec![(1, 2), (3, 0)]);
        assert_eq!(output.check_consistency(), Ok(()));
        assert_eq!(output.ids().collect_vec(), input.ids().collect_vec());
        // Input is untouched
        assert_eq!(input, original);
    }

    #[test]
    fn keep_existing_edges() {
        let input = input_graph();
        let decisions = vec![
            decision(1, 2, true),
            decision(0, 1, false), // Removes an input edge
            decision(3, 1, false), // Absent, so does nothing
        ];
        let output = GraphUpdater::new(false).update(&input, decisions).unwrap();
        assert_eq!(edges(&output), vec![(1, 2), (2, 3)]);
        assert_eq!(edges(&input), vec![(0, 1), (2, 3)]);
    }

    #[test]
    fn decisions_are_applied_in_order() {
        let input = input_graph();
        let updater = GraphUpdater::default();
        let added_then_removed = vec![decision(0, 2, true), decision(0, 2, false)];
        let removed_then_added = vec![decision(0, 2, false), decision(0, 2, true)];
        assert_eq!(
            edges(&updater.update(&input, added_then_removed).unwrap()),
            Vec::<(u32, u32)>::new()
        );
        assert_eq!(
            edges(&updater.update(&input, removed_then_added).unwrap()),
            vec![(0, 2)]
        );
    }

    #[test]
    fn duplicate_positive_decisions() {
        let output = GraphUpdater::default()
            .update(&input_graph(), vec![decision(0, 3, true), decision(0, 3, true)])
            .unwrap();
        assert_eq!(edges(&output), vec![(0, 3)]);
    }

    #[test]
    fn unknown_object_aborts() {
        let result = GraphUpdater::default()
            .update(&input_graph(), vec![decision(0, 1, true), decision(0, 9, true)]);
        assert_eq!(result, Err(Error::Graph(GraphError::UnknownNode(id(9)))));
    }

    #[test]
    fn inconsistent_input_aborts() {
        // Object 0 claims an edge to 1, but 1 doesn't know about it
        let objects = vec![
            DetectedObject::with_links(id(0), "stem", BoundingBox::new(0, 0, 1, 9), [], [id(1)]),
            DetectedObject::new(id(1), "notehead-full", BoundingBox::new(0, 0, 9, 9)),
        ];
        let input = NotationGraph::new(objects).unwrap();
        let expected = Err(Error::Graph(GraphError::Inconsistent {
            from: id(0),
            to: id(1),
            side: EdgeSide::OutlinkOnly,
        }));
        // With edges replaced, the corruption is never seen
        assert!(GraphUpdater::new(true)
            .update(&input, vec![decision(0, 1, false)])
            .is_ok());
        // Without, it's fatal for both kinds of decision
        let updater = GraphUpdater::new(false);
        assert_eq!(updater.update(&input, vec![decision(0, 1, false)]), expected);
        assert_eq!(updater.update(&input, vec![decision(0, 1, true)]), expected);
    }

    /// With `replace_all_edges`, an edge is in the output iff the last decision about it was
    /// positive
    #[quickcheck]
    fn last_decision_wins(raw_decisions: Vec<(u8, u8, bool)>) -> bool {
        let decisions = raw_decisions
            .into_iter()
            .map(|(from, to, has_edge)| decision(u32::from(from % 4), u32::from(to % 4), has_edge))
            .collect_vec();
        let mut last_decisions = BTreeMap::new();
        for d in &decisions {
            last_decisions.insert((d.from.as_u32(), d.to.as_u32()), d.has_edge);
        }
        let expected = last_decisions
            .into_iter()
            .filter(|&(_, has_edge)| has_edge)
            .map(|(edge, _)| edge)
            .collect_vec();

        let output = GraphUpdater::new(true)
            .update(&input_graph(), decisions)
            .unwrap();
        edges(&output) == expected && output.check_consistency().is_ok()
    }
}
