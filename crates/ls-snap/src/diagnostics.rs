use core::fmt;

/// Non-fatal geometric degeneracy found while snapping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    /// The input polygon crosses itself at `edges`; it was filled even-odd.
    SelfIntersectingLayer { layer: String, edges: (usize, usize) },
    /// The layer has no pixels at the working scale, or no area after clipping.
    EmptyLayer { layer: String },
    /// The snapped layer splits into several disjoint parts.
    FragmentedLayer { layer: String, parts: usize },
    /// A boundary has several disjoint parts; the longest one is kept.
    FragmentedBoundary {
        upper: String,
        lower: String,
        parts: usize,
    },
    /// The outermost layer never touches its reference surface, so the whole
    /// surface stands in for its side.
    DetachedSurface { layer: String, surface: String },
}

impl Diagnostic {
    /// Layer names the diagnostic refers to.
    pub fn layers(&self) -> Vec<&str> {
        match self {
            Self::EmptyLayer { layer }
            | Self::SelfIntersectingLayer { layer, .. }
            | Self::FragmentedLayer { layer, .. }
            | Self::DetachedSurface { layer, .. } => vec![layer],
            Self::FragmentedBoundary { upper, lower, .. } => vec![upper, lower],
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SelfIntersectingLayer { layer, edges } => write!(
                f,
                "layer {layer:?} crosses itself (edges {} and {}); filled even-odd",
                edges.0, edges.1
            ),
            Self::EmptyLayer { layer } => write!(f, "layer {layer:?} is empty"),
            Self::FragmentedLayer { layer, parts } => {
                write!(f, "layer {layer:?} splits into {parts} parts")
            }
            Self::FragmentedBoundary {
                upper,
                lower,
                parts,
            } => write!(
                f,
                "boundary {upper:?}/{lower:?} has {parts} parts; keeping the longest"
            ),
            Self::DetachedSurface { layer, surface } => {
                write!(f, "layer {layer:?} does not touch surface {surface:?}")
            }
        }
    }
}

/// Collects diagnostics and logs each one as it arrives.
#[derive(Debug, Default)]
pub(crate) struct Diagnostics {
    items: Vec<Diagnostic>,
}

impl Diagnostics {
    pub(crate) fn report(&mut self, d: Diagnostic) {
        log::warn!("{d}");
        self.items.push(d);
    }

    pub(crate) fn contains(&self, d: &Diagnostic) -> bool {
        self.items.contains(d)
    }

    pub(crate) fn into_vec(self) -> Vec<Diagnostic> {
        self.items
    }
}
