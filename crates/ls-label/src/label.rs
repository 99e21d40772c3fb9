use ls_core::Image;

/// Plane index of a [`ls_raster::RasterStack`] layer.
pub type Label = u32;

/// Sentinel for pixels that belong to no layer.
pub const BACKGROUND: Label = Label::MAX;

pub type LabelImage = Image<Label>;

/// Pixel count per label `0..num_labels`; background is not counted.
pub fn label_pixel_counts(labels: &LabelImage, num_labels: usize) -> Vec<usize> {
    let mut counts = vec![0_usize; num_labels];
    for &l in labels.data() {
        if l == BACKGROUND {
            continue;
        }
        if let Some(c) = counts.get_mut(l as usize) {
            *c += 1;
        }
    }
    counts
}

#[cfg(test)]
mod tests {
    use ls_core::Image;

    use crate::{BACKGROUND, label_pixel_counts};

    #[test]
    fn counts_ignore_background() {
        let labels = Image::from_vec(4, 1, vec![0, 1, BACKGROUND, 1]).expect("valid");
        assert_eq!(label_pixel_counts(&labels, 3), vec![1, 2, 0]);
    }
}
