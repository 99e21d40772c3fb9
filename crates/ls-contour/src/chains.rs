use ls_core::Point2;
use ls_label::{Label, LabelImage};

use crate::graph::{ChainGraph, EdgeId, GraphEdge, Node, NodeId, NodeKind};
use crate::lattice::{Lattice, opposite_dir};

const DIRS: [u8; 4] = [0, 1, 2, 3];

/// Which lattice segments count as boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoundarySelector {
    /// Segments with label `a` on one side and `b` on the other.
    Pair(Label, Label),
    /// Segments between any two different labels inside the grid.
    All,
}

impl BoundarySelector {
    fn separates(self, left: Option<Label>, right: Option<Label>) -> bool {
        let (Some(l), Some(r)) = (left, right) else {
            return false;
        };
        match self {
            Self::Pair(a, b) => a != b && ((l == a && r == b) || (l == b && r == a)),
            Self::All => l != r,
        }
    }
}

/// Links boundary segments into chains.
///
/// Chains run between node vertices (ends and junctions). Components with no
/// such vertex become single loop edges anchored at their first vertex in
/// raster order. Collinear interior vertices are dropped from the chains.
pub fn build_boundary_graph(labels: &LabelImage, selector: BoundarySelector) -> ChainGraph {
    let (width, height) = (labels.width(), labels.height());
    let mut graph = ChainGraph {
        width,
        height,
        ..ChainGraph::default()
    };
    if width == 0 || height == 0 {
        return graph;
    }

    let lat = Lattice::new(width, height);
    let n = lat.num_vertices();
    let label_of = |p: Option<usize>| p.map(|i| labels.data()[i]);

    let mut link = vec![0_u8; n];
    for (v, bits) in link.iter_mut().enumerate() {
        for dir in DIRS {
            if lat.step(v, dir).is_none() {
                continue;
            }
            if selector.separates(
                label_of(lat.left_pixel(v, dir)),
                label_of(lat.right_pixel(v, dir)),
            ) {
                *bits |= 1 << dir;
            }
        }
    }

    let is_saddle = |v: usize| {
        if link[v].count_ones() != 4 {
            return false;
        }
        let [nw, ne, sw, se] = lat.corner_pixels(v).map(label_of);
        nw == se && ne == sw && nw != ne
    };

    let mut nodes = Vec::new();
    let mut node_at: Vec<Option<NodeId>> = vec![None; n];
    for v in 0..n {
        let degree = link[v].count_ones() as usize;
        if degree == 0 || degree == 2 || is_saddle(v) {
            continue;
        }
        let kind = if degree == 1 {
            NodeKind::End
        } else {
            NodeKind::Junction
        };
        push_node(&lat, v, degree, kind, &mut node_at, &mut nodes);
    }

    let mut edges = Vec::new();
    let mut used_link = vec![0_u8; n];

    for start_node in 0..nodes.len() {
        let start = lat.vertex(nodes[start_node].idx.0, nodes[start_node].idx.1);
        for dir in DIRS {
            if link[start] & (1 << dir) == 0 || is_link_used(&used_link, start, dir) {
                continue;
            }

            let trace = trace_chain(&lat, &link, &mut used_link, &node_at, start, dir);
            let end_node = ensure_node(&lat, &link, trace.end, &mut node_at, &mut nodes);
            push_edge(&mut edges, start_node, end_node, trace);
        }
    }

    // Closed components with no node vertex.
    for v in 0..n {
        for dir in DIRS {
            if link[v] & (1 << dir) == 0 || is_link_used(&used_link, v, dir) {
                continue;
            }

            let anchor = match node_at[v] {
                Some(id) => id,
                None => push_node(
                    &lat,
                    v,
                    link[v].count_ones() as usize,
                    NodeKind::LoopAnchor,
                    &mut node_at,
                    &mut nodes,
                ),
            };
            let trace = trace_chain(&lat, &link, &mut used_link, &node_at, v, dir);
            let end_node = if trace.closed {
                anchor
            } else {
                ensure_node(&lat, &link, trace.end, &mut node_at, &mut nodes)
            };
            push_edge(&mut edges, anchor, end_node, trace);
        }
    }

    for edge in &edges {
        let id: EdgeId = edge.id;
        nodes[edge.a].incident_edges.push(id);
        if edge.a != edge.b {
            nodes[edge.b].incident_edges.push(id);
        }
    }

    log::trace!(
        "{selector:?}: {} chains, {} nodes",
        edges.len(),
        nodes.len()
    );

    graph.nodes = nodes;
    graph.edges = edges;
    graph
}

struct Trace {
    points: Vec<Point2>,
    end: usize,
    closed: bool,
}

fn trace_chain(
    lat: &Lattice,
    link: &[u8],
    used_link: &mut [u8],
    node_at: &[Option<NodeId>],
    start: usize,
    start_dir: u8,
) -> Trace {
    let mut points = vec![lat.point(start)];
    let mut cur = start;
    let mut dir = start_dir;
    let mut closed = false;

    for _ in 0..link.len() * 2 {
        let Some(next) = lat.step(cur, dir) else {
            break;
        };
        mark_link_both(used_link, cur, dir, next);
        cur = next;

        if cur == start {
            closed = true;
            points.push(lat.point(cur));
            break;
        }
        if node_at[cur].is_some() {
            points.push(lat.point(cur));
            break;
        }

        let Some(next_dir) = continue_dir(link, used_link, cur, dir) else {
            points.push(lat.point(cur));
            break;
        };
        if next_dir != dir {
            points.push(lat.point(cur));
        }
        dir = next_dir;
    }

    Trace {
        points,
        end: cur,
        closed,
    }
}

/// Outgoing direction at a pass-through vertex. Saddles are crossed straight.
fn continue_dir(link: &[u8], used_link: &[u8], v: usize, dir: u8) -> Option<u8> {
    if link[v].count_ones() == 4 {
        return Some(dir);
    }
    let back = opposite_dir(dir);
    DIRS.into_iter()
        .find(|&d| d != back && link[v] & (1 << d) != 0 && !is_link_used(used_link, v, d))
}

fn push_node(
    lat: &Lattice,
    v: usize,
    degree: usize,
    kind: NodeKind,
    node_at: &mut [Option<NodeId>],
    nodes: &mut Vec<Node>,
) -> NodeId {
    let id = nodes.len();
    node_at[v] = Some(id);
    nodes.push(Node {
        id,
        kind,
        p: lat.point(v),
        idx: lat.coords(v),
        degree,
        incident_edges: Vec::new(),
    });
    id
}

fn ensure_node(
    lat: &Lattice,
    link: &[u8],
    v: usize,
    node_at: &mut [Option<NodeId>],
    nodes: &mut Vec<Node>,
) -> NodeId {
    if let Some(id) = node_at[v] {
        return id;
    }
    let degree = link[v].count_ones() as usize;
    push_node(lat, v, degree, NodeKind::End, node_at, nodes)
}

fn push_edge(edges: &mut Vec<GraphEdge>, a: NodeId, b: NodeId, trace: Trace) {
    let length = trace
        .points
        .windows(2)
        .map(|w| w[0].distance(w[1]))
        .sum();
    edges.push(GraphEdge {
        id: edges.len(),
        a,
        b,
        points: trace.points,
        length,
        is_loop: trace.closed && a == b,
    });
}

#[inline]
fn is_link_used(used_link: &[u8], v: usize, dir: u8) -> bool {
    used_link[v] & (1 << dir) != 0
}

#[inline]
fn mark_link_both(used_link: &mut [u8], a: usize, dir_ab: u8, b: usize) {
    used_link[a] |= 1 << dir_ab;
    used_link[b] |= 1 << opposite_dir(dir_ab);
}
