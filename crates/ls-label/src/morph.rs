//! Minimal binary morphology on boolean masks.
//!
//! Pixels outside the grid count as unset.

use ls_core::{Image, ImageView};

pub fn dilate3x3_mask(src: &ImageView<'_, bool>) -> Image<bool> {
    let mut out = Image::new_fill(src.width(), src.height(), false);
    if src.width() == 0 || src.height() == 0 {
        return out;
    }

    for y in 0..src.height() {
        for x in 0..src.width() {
            let mut any_set = false;
            'window: for dy in -1isize..=1 {
                for dx in -1isize..=1 {
                    if src
                        .get_signed(x as isize + dx, y as isize + dy)
                        .copied()
                        .unwrap_or(false)
                    {
                        any_set = true;
                        break 'window;
                    }
                }
            }

            *out.get_mut(x, y).expect("in-bounds write in dilate3x3_mask") = any_set;
        }
    }

    out
}
