//! Directed labelled multigraph used for dependency trees and the
//! shared output graph
//!
//! Thin domain wrapper over [`petgraph`]'s stable graph: node identity
//! is the stable index (two nodes with equal labels stay distinct),
//! labels are compared by value, and [`sort`](DependencyGraph::sort)
//! yields a reverse topological order rooted at a node, leaves first.

use petgraph::Direction;
use petgraph::graph::{EdgeIndex, NodeIndex};
use petgraph::stable_graph::StableDiGraph;
use petgraph::visit::{DfsPostOrder, EdgeRef};

/// Identity of a node in a [`DependencyGraph`]. Stable across removals.
pub type NodeId = NodeIndex<u32>;

/// Identity of an edge in a [`DependencyGraph`].
pub type EdgeId = EdgeIndex<u32>;

/// A directed multigraph with value-labelled nodes and edges.
///
/// Edges point from a dependent (head) to its dependency (tail):
/// `head --label--> tail`.
#[derive(Clone, Debug)]
pub struct DependencyGraph<N, E> {
    inner: StableDiGraph<N, E>,
}

impl<N, E> DependencyGraph<N, E> {
    /// Create an empty graph.
    pub fn new() -> Self {
        Self {
            inner: StableDiGraph::new(),
        }
    }

    /// Add a node with the given label, returning its identity.
    pub fn add_node(&mut self, label: N) -> NodeId {
        self.inner.add_node(label)
    }

    /// Add an edge `head --label--> tail`.
    ///
    /// # Panics
    ///
    /// Panics if either endpoint has not been added to this graph.
    pub fn add_edge(&mut self, head: NodeId, tail: NodeId, label: E) -> EdgeId {
        assert!(
            self.inner.contains_node(head) && self.inner.contains_node(tail),
            "both endpoints must be added to the graph before connecting them"
        );
        self.inner.add_edge(head, tail, label)
    }

    /// The label of a node.
    #[inline]
    pub fn node_label(&self, node: NodeId) -> Option<&N> {
        self.inner.node_weight(node)
    }

    /// Whether the node belongs to this graph.
    #[inline]
    pub fn contains_node(&self, node: NodeId) -> bool {
        self.inner.contains_node(node)
    }

    /// Iterate the identities of all nodes.
    pub fn nodes(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.inner.node_indices()
    }

    /// Number of nodes.
    #[inline]
    pub fn node_count(&self) -> usize {
        self.inner.node_count()
    }

    /// Number of edges.
    #[inline]
    pub fn edge_count(&self) -> usize {
        self.inner.edge_count()
    }

    /// Iterate the outgoing edges of a node as
    /// `(edge, tail, label)` triples.
    pub fn outgoing_edges(&self, node: NodeId) -> impl Iterator<Item = (EdgeId, NodeId, &E)> + '_ {
        self.inner
            .edges_directed(node, Direction::Outgoing)
            .map(|edge| (edge.id(), edge.target(), edge.weight()))
    }

    /// The tails of a node's outgoing edges.
    pub fn outgoing_tails(&self, node: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.inner
            .edges_directed(node, Direction::Outgoing)
            .map(|edge| edge.target())
    }

    /// Remove `node` and every node reachable from it, with their
    /// edges.
    ///
    /// Used by the tree builder to abandon the subtree of a skipped
    /// satisfaction. On a tree the reachable set is exactly the
    /// subtree.
    pub fn remove_subtree(&mut self, node: NodeId) {
        let mut pending = vec![node];
        let mut doomed = Vec::new();
        while let Some(current) = pending.pop() {
            if doomed.contains(&current) {
                continue;
            }
            doomed.push(current);
            pending.extend(self.outgoing_tails(current));
        }
        for node in doomed {
            self.inner.remove_node(node);
        }
    }

    /// Reverse topological order of the nodes reachable from `root`:
    /// leaves first, `root` last.
    pub fn sort(&self, root: NodeId) -> Vec<NodeId> {
        let mut dfs = DfsPostOrder::new(&self.inner, root);
        let mut order = Vec::new();
        while let Some(node) = dfs.next(&self.inner) {
            order.push(node);
        }
        order
    }
}

impl<N, E> Default for DependencyGraph<N, E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<N, E: PartialEq> DependencyGraph<N, E> {
    /// The tail of the unique outgoing edge of `node` carrying `label`,
    /// or `None` when no such edge exists.
    pub fn outgoing_edge(&self, node: NodeId, label: &E) -> Option<NodeId> {
        self.outgoing_edges(node)
            .find(|(_, _, candidate)| *candidate == label)
            .map(|(_, tail, _)| tail)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn diamond() -> (DependencyGraph<&'static str, u32>, [NodeId; 4]) {
        // a -> b -> d, a -> c -> d
        let mut graph = DependencyGraph::new();
        let a = graph.add_node("a");
        let b = graph.add_node("b");
        let c = graph.add_node("c");
        let d = graph.add_node("d");
        graph.add_edge(a, b, 1);
        graph.add_edge(a, c, 2);
        graph.add_edge(b, d, 3);
        graph.add_edge(c, d, 4);
        (graph, [a, b, c, d])
    }

    #[test]
    fn test_nodes_with_equal_labels_are_distinct() {
        let mut graph: DependencyGraph<&str, u32> = DependencyGraph::new();
        let a = graph.add_node("same");
        let b = graph.add_node("same");
        assert_ne!(a, b);
        assert_eq!(graph.node_count(), 2);
    }

    #[test]
    fn test_outgoing_edges() {
        let (graph, [a, b, c, d]) = diamond();

        let mut tails: Vec<NodeId> = graph.outgoing_tails(a).collect();
        tails.sort();
        assert_eq!(tails, vec![b, c]);
        assert_eq!(graph.outgoing_edges(d).count(), 0);
    }

    #[test]
    fn test_outgoing_edge_by_label() {
        let (graph, [a, b, c, _]) = diamond();
        assert_eq!(graph.outgoing_edge(a, &1), Some(b));
        assert_eq!(graph.outgoing_edge(a, &2), Some(c));
        assert_eq!(graph.outgoing_edge(a, &9), None);
    }

    #[test]
    fn test_parallel_edges_are_kept() {
        let mut graph: DependencyGraph<&str, u32> = DependencyGraph::new();
        let a = graph.add_node("a");
        let b = graph.add_node("b");
        graph.add_edge(a, b, 1);
        graph.add_edge(a, b, 1);
        assert_eq!(graph.edge_count(), 2);
    }

    #[test]
    fn test_sort_is_leaves_first() {
        let (graph, [a, _, _, d]) = diamond();
        let order = graph.sort(a);

        assert_eq!(order.len(), 4);
        assert_eq!(order[0], d);
        assert_eq!(order[3], a);
    }

    #[test]
    fn test_sort_ignores_unreachable_nodes() {
        let (mut graph, [a, ..]) = diamond();
        graph.add_node("island");
        assert_eq!(graph.sort(a).len(), 4);
    }

    #[test]
    fn test_remove_subtree() {
        let (mut graph, [a, b, _, _]) = diamond();
        // removing b's subtree takes d with it; c survives without a tail
        graph.remove_subtree(b);

        assert_eq!(graph.node_count(), 2);
        assert!(graph.contains_node(a));
        assert!(!graph.contains_node(b));
        assert_eq!(graph.outgoing_edges(a).count(), 1);
    }

    #[test]
    #[should_panic(expected = "both endpoints must be added")]
    fn test_add_edge_rejects_absent_node() {
        let mut graph: DependencyGraph<&str, u32> = DependencyGraph::new();
        let mut other: DependencyGraph<&str, u32> = DependencyGraph::new();
        let a = graph.add_node("a");
        other.add_node("x");
        let foreign = other.add_node("y");
        graph.add_edge(a, foreign, 1);
    }
}
