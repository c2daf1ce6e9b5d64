//! Breadth-first traversal over undirected adjacency edges.
//!
//! # Invariants
//! - Edge direction is ignored; `source -> target` is walked both ways.
//! - Incident edges are expanded in the order the source returns them, so
//!   results are deterministic for a fixed store.
//! - `check` runs once per expanded node; its error aborts the walk.

use crate::context::Interrupt;
use crate::model::edge::AdjacencyEdge;
use crate::model::word::WordId;
use crate::query::{QueryError, QueryResult};
use std::collections::{HashMap, HashSet, VecDeque};

/// Incident-edge lookup used by traversals.
pub trait AdjacencySource {
    /// Edges with `word` as either endpoint.
    fn incident_edges(&self, word: WordId) -> QueryResult<Vec<AdjacencyEdge>>;
}

/// Word ids of a path with the edges between consecutive ids.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathIds {
    pub words: Vec<WordId>,
    pub edges: Vec<AdjacencyEdge>,
}

/// Finds one path with the minimal number of edges from `from` to `to`.
///
/// `from == to` yields the single-node path; `None` means unreachable.
pub fn shortest_path(
    source: &impl AdjacencySource,
    from: WordId,
    to: WordId,
    check: &dyn Fn() -> Result<(), Interrupt>,
) -> QueryResult<Option<PathIds>> {
    if from == to {
        return Ok(Some(PathIds {
            words: vec![from],
            edges: Vec::new(),
        }));
    }

    let mut previous: HashMap<WordId, AdjacencyEdge> = HashMap::new();
    let mut visited = HashSet::from([from]);
    let mut queue = VecDeque::from([from]);

    while let Some(current) = queue.pop_front() {
        check().map_err(QueryError::Interrupted)?;
        for edge in source.incident_edges(current)? {
            let Some(next) = edge.opposite(current) else {
                continue;
            };
            if !visited.insert(next) {
                continue;
            }
            previous.insert(next, edge);
            if next == to {
                return Ok(Some(rebuild_path(&previous, from, to)));
            }
            queue.push_back(next);
        }
    }

    Ok(None)
}

fn rebuild_path(previous: &HashMap<WordId, AdjacencyEdge>, from: WordId, to: WordId) -> PathIds {
    let mut words = vec![to];
    let mut edges = Vec::new();
    let mut cursor = to;
    while cursor != from {
        let Some(edge) = previous.get(&cursor) else {
            break;
        };
        let Some(prior) = edge.opposite(cursor) else {
            break;
        };
        edges.push(edge.clone());
        words.push(prior);
        cursor = prior;
    }
    words.reverse();
    edges.reverse();
    PathIds { words, edges }
}

/// Collects every edge incident to a word at distance `< depth` from `start`.
///
/// Equivalently: all edges lying on some walk of at most `depth` hops from
/// `start`. `depth == 0` yields nothing; results grow monotonically with depth.
pub fn neighbors_within_depth(
    source: &impl AdjacencySource,
    start: WordId,
    depth: u32,
    check: &dyn Fn() -> Result<(), Interrupt>,
) -> QueryResult<Vec<AdjacencyEdge>> {
    let mut edges = Vec::new();
    let mut seen_edges = HashSet::new();
    let mut visited = HashSet::from([start]);
    let mut frontier = vec![start];

    for _ in 0..depth {
        if frontier.is_empty() {
            break;
        }
        let mut next_frontier = Vec::new();
        for word in frontier {
            check().map_err(QueryError::Interrupted)?;
            for edge in source.incident_edges(word)? {
                if let Some(next) = edge.opposite(word) {
                    if visited.insert(next) {
                        next_frontier.push(next);
                    }
                }
                if seen_edges.insert(edge.id) {
                    edges.push(edge);
                }
            }
        }
        frontier = next_frontier;
    }

    Ok(edges)
}

#[cfg(test)]
mod tests {
    use super::{neighbors_within_depth, shortest_path, AdjacencySource};
    use crate::context::Interrupt;
    use crate::model::edge::AdjacencyEdge;
    use crate::model::word::WordId;
    use crate::query::{QueryError, QueryResult};
    use std::cell::Cell;
    use std::collections::HashSet;
    use uuid::Uuid;

    struct MemoryGraph {
        edges: Vec<AdjacencyEdge>,
    }

    impl MemoryGraph {
        fn new(pairs: &[(WordId, WordId)]) -> Self {
            let edges = pairs
                .iter()
                .map(|(source, target)| AdjacencyEdge {
                    id: Uuid::new_v4(),
                    source_id: *source,
                    target_id: *target,
                    link_id: None,
                })
                .collect();
            Self { edges }
        }
    }

    impl AdjacencySource for MemoryGraph {
        fn incident_edges(&self, word: WordId) -> QueryResult<Vec<AdjacencyEdge>> {
            Ok(self
                .edges
                .iter()
                .filter(|edge| edge.touches(word))
                .cloned()
                .collect())
        }
    }

    fn ids(count: usize) -> Vec<WordId> {
        (0..count).map(|_| Uuid::new_v4()).collect()
    }

    fn never() -> Result<(), Interrupt> {
        Ok(())
    }

    #[test]
    fn path_to_self_is_single_node() {
        let w = ids(1);
        let graph = MemoryGraph::new(&[]);
        let path = shortest_path(&graph, w[0], w[0], &never).unwrap().unwrap();
        assert_eq!(path.words, vec![w[0]]);
        assert!(path.edges.is_empty());
    }

    #[test]
    fn path_prefers_fewer_hops_and_ignores_direction() {
        // a - b - c - d and a shortcut d -> a written against traversal direction.
        let w = ids(4);
        let graph = MemoryGraph::new(&[(w[0], w[1]), (w[1], w[2]), (w[2], w[3]), (w[3], w[0])]);
        let path = shortest_path(&graph, w[0], w[3], &never).unwrap().unwrap();
        assert_eq!(path.words, vec![w[0], w[3]]);
        assert_eq!(path.edges.len(), 1);

        let back = shortest_path(&graph, w[3], w[1], &never).unwrap().unwrap();
        assert_eq!(back.words.len(), 3);
        assert_eq!(back.edges.len(), 2);
    }

    #[test]
    fn path_lengths_are_symmetric() {
        let w = ids(6);
        let graph = MemoryGraph::new(&[
            (w[0], w[1]),
            (w[1], w[2]),
            (w[2], w[3]),
            (w[1], w[4]),
            (w[4], w[3]),
            (w[3], w[5]),
        ]);
        for a in &w {
            for b in &w {
                let forward = shortest_path(&graph, *a, *b, &never).unwrap().unwrap();
                let backward = shortest_path(&graph, *b, *a, &never).unwrap().unwrap();
                assert_eq!(forward.edges.len(), backward.edges.len());
                assert_eq!(forward.words.first(), Some(a));
                assert_eq!(forward.words.last(), Some(b));
            }
        }
    }

    #[test]
    fn disconnected_words_have_no_path() {
        let w = ids(3);
        let graph = MemoryGraph::new(&[(w[0], w[1])]);
        assert_eq!(shortest_path(&graph, w[0], w[2], &never).unwrap(), None);
    }

    #[test]
    fn neighbors_depth_zero_is_empty_and_growth_is_monotonic() {
        let w = ids(5);
        let graph = MemoryGraph::new(&[(w[0], w[1]), (w[1], w[2]), (w[2], w[3]), (w[0], w[4])]);
        assert!(neighbors_within_depth(&graph, w[0], 0, &never)
            .unwrap()
            .is_empty());

        let mut previous: HashSet<_> = HashSet::new();
        for depth in 1..=5 {
            let current: HashSet<_> = neighbors_within_depth(&graph, w[0], depth, &never)
                .unwrap()
                .into_iter()
                .map(|edge| edge.id)
                .collect();
            assert!(previous.is_subset(&current));
            previous = current;
        }
        assert_eq!(previous.len(), 4);

        let one_hop = neighbors_within_depth(&graph, w[0], 1, &never).unwrap();
        assert_eq!(one_hop.len(), 2);
    }

    #[test]
    fn neighbors_report_each_edge_once_in_cycles() {
        let w = ids(3);
        let graph = MemoryGraph::new(&[(w[0], w[1]), (w[1], w[2]), (w[2], w[0])]);
        let edges = neighbors_within_depth(&graph, w[0], 3, &never).unwrap();
        assert_eq!(edges.len(), 3);
    }

    #[test]
    fn interruption_stops_traversal() {
        let w = ids(4);
        let graph = MemoryGraph::new(&[(w[0], w[1]), (w[1], w[2]), (w[2], w[3])]);
        let steps = Cell::new(0);
        let check = || {
            steps.set(steps.get() + 1);
            if steps.get() > 2 {
                Err(Interrupt::Cancelled)
            } else {
                Ok(())
            }
        };
        let err = shortest_path(&graph, w[0], w[3], &check).unwrap_err();
        assert!(matches!(err, QueryError::Interrupted(Interrupt::Cancelled)));
    }
}
