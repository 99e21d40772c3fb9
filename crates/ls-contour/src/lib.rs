//! Vector extraction from label rasters.
//!
//! Everything here works on the pixel *lattice*: vertex `(x, y)` is the corner
//! shared by pixels `(x - 1, y - 1)`, `(x, y - 1)`, `(x - 1, y)` and `(x, y)`,
//! so a `w x h` label image has `(w + 1) x (h + 1)` vertices. Traced geometry
//! follows cell edges, never pixel centers, and comes out in grid-local
//! coordinates with integer vertices.
//!
//! - [`vectorize`] turns every 4-connected region of a label into one
//!   [`Polygon`](ls_core::Polygon): a positive-area exterior ring plus
//!   negative-area holes. At a saddle vertex a ring turns away when both
//!   diagonal pixels belong to its own region, so a pinched hole stays a
//!   separate ring.
//! - [`build_boundary_graph`] links the lattice edges separating selected
//!   label pairs into chains:
//!   - Node vertices have degree `!= 2`, except two-label checkerboard saddles
//!     which chains cross straight through.
//!   - Pure loops are represented by a loop edge and a `LoopAnchor` node.

mod chains;
mod graph;
mod lattice;
mod vectorize;

pub use chains::{BoundarySelector, build_boundary_graph};
pub use graph::{ChainGraph, EdgeId, GraphEdge, Node, NodeId, NodeKind};
pub use vectorize::{LabelRegions, vectorize};
