use ls_core::Point2;

pub type NodeId = usize;
pub type EdgeId = usize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    /// Degree-1 vertex: the chain stops at the grid border or at a third label.
    End,
    /// Three or more boundary segments meet.
    Junction,
    /// Arbitrary vertex chosen to anchor a closed chain.
    LoopAnchor,
}

#[derive(Debug, Clone)]
pub struct Node {
    pub id: NodeId,
    pub kind: NodeKind,
    pub p: Point2,
    /// Lattice vertex `(x, y)`.
    pub idx: (usize, usize),
    pub degree: usize,
    pub incident_edges: Vec<EdgeId>,
}

#[derive(Debug, Clone)]
pub struct GraphEdge {
    pub id: EdgeId,
    pub a: NodeId,
    pub b: NodeId,
    /// Corner vertices from `a` to `b`. Loops repeat the first point at the end.
    pub points: Vec<Point2>,
    pub length: f64,
    pub is_loop: bool,
}

#[derive(Debug, Clone, Default)]
pub struct ChainGraph {
    /// Pixel dimensions of the source label image.
    pub width: usize,
    pub height: usize,
    pub nodes: Vec<Node>,
    pub edges: Vec<GraphEdge>,
}

impl ChainGraph {
    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    pub fn num_junctions(&self) -> usize {
        self.nodes
            .iter()
            .filter(|n| n.kind == NodeKind::Junction)
            .count()
    }

    pub fn num_ends(&self) -> usize {
        self.nodes
            .iter()
            .filter(|n| n.kind == NodeKind::End)
            .count()
    }

    pub fn iter_junctions(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter().filter(|n| n.kind == NodeKind::Junction)
    }

    pub fn iter_edges(&self) -> impl Iterator<Item = &GraphEdge> {
        self.edges.iter()
    }
}
