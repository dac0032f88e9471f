//! Graph representation, construction and induced views

pub mod adapters;
pub mod builder;
pub mod compressed;
pub mod view;

pub use builder::GraphBuilder;
pub use compressed::CompressedGraph;
pub use view::InducedSubgraph;

/// Node identifier ("row") within a network
pub type NodeId = u32;

/// Read-only access to an undirected network.
///
/// This is everything the clustering core asks of graph storage. Node ids
/// must stay stable for the duration of a scoring / clustering run.
pub trait Network {
    /// Number of nodes in the network
    fn node_count(&self) -> usize;

    /// All node ids, in a stable order
    fn node_ids(&self) -> Vec<NodeId>;

    /// Open neighborhood of `node`: sorted, without duplicates, and
    /// containing `node` itself only when it has a self-loop.
    fn neighbors(&self, node: NodeId) -> Vec<NodeId>;

    /// Whether `node` exists in the network
    fn contains_node(&self, node: NodeId) -> bool {
        (node as usize) < self.node_count()
    }
}
