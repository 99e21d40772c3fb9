use crate::{Error, Geometries};

/// One image written by an [`ImageOutputter`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageRecord {
    pub name: String,
    pub path: String,
    pub width: u32,
    pub height: u32,
}

/// Renders diagnostic images of a snapping run.
///
/// The pipeline calls this once with the world-space input and the snapped
/// result, and stores the returned records in the result manifest.
pub trait ImageOutputter {
    fn write_images(&mut self, raw: &Geometries, snapped: &Geometries) -> Result<Vec<ImageRecord>, Error>;
}
