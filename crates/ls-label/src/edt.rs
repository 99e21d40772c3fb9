//! Exact squared Euclidean distance transform.
//!
//! Separable lower-envelope-of-parabolas method (Felzenszwalb and
//! Huttenlocher): a 1D pass along rows, then a parabola pass along columns.
//! All squared distances are small integers, so the `f64` results are exact
//! and independent of how rows and columns are scheduled across threads.

use ls_core::{Image, ImageView};
use rayon::prelude::*;

/// Squared distance from every pixel to the nearest `true` pixel of `sites`.
/// Pixels with no reachable site get `f64::INFINITY`.
pub fn squared_edt(sites: &ImageView<'_, bool>) -> Image<f64> {
    let (w, h) = (sites.width(), sites.height());
    let mut out = Image::new_fill(w, h, f64::INFINITY);
    if w == 0 || h == 0 {
        return out;
    }

    out.data_mut()
        .par_chunks_mut(w)
        .enumerate()
        .for_each(|(y, row)| row_pass(sites.row(y), row));

    let columns: Vec<Vec<f64>> = (0..w)
        .into_par_iter()
        .map(|x| {
            let f: Vec<f64> = (0..h).map(|y| out.data()[y * w + x]).collect();
            let mut d = vec![f64::INFINITY; h];
            let mut v = vec![0_usize; h];
            let mut z = vec![0.0_f64; h + 1];
            parabola_pass(&f, &mut d, &mut v, &mut z);
            d
        })
        .collect();

    for (x, col) in columns.into_iter().enumerate() {
        for (y, d) in col.into_iter().enumerate() {
            out.data_mut()[y * w + x] = d;
        }
    }

    out
}

/// Squared distance to the nearest site within one row.
fn row_pass(sites: &[bool], out: &mut [f64]) {
    let n = sites.len();
    let mut last: Option<usize> = None;
    for i in 0..n {
        if sites[i] {
            last = Some(i);
        }
        out[i] = last.map_or(f64::INFINITY, |s| sq(i - s));
    }

    let mut next: Option<usize> = None;
    for i in (0..n).rev() {
        if sites[i] {
            next = Some(i);
        }
        if let Some(s) = next {
            out[i] = out[i].min(sq(s - i));
        }
    }
}

/// 1D lower envelope of parabolas `(q - i)^2 + f[q]` over finite `f[q]`.
fn parabola_pass(f: &[f64], d: &mut [f64], v: &mut [usize], z: &mut [f64]) {
    let n = f.len();
    let mut k: isize = -1;

    for q in 0..n {
        if !f[q].is_finite() {
            continue;
        }
        loop {
            if k < 0 {
                k = 0;
                v[0] = q;
                z[0] = f64::NEG_INFINITY;
                z[1] = f64::INFINITY;
                break;
            }
            let p = v[k as usize];
            let s = ((f[q] + sq(q)) - (f[p] + sq(p))) / (2.0 * (q as f64 - p as f64));
            if s <= z[k as usize] {
                k -= 1;
                continue;
            }
            k += 1;
            v[k as usize] = q;
            z[k as usize] = s;
            z[k as usize + 1] = f64::INFINITY;
            break;
        }
    }

    if k < 0 {
        d.fill(f64::INFINITY);
        return;
    }

    let mut j = 0_usize;
    for (i, out) in d.iter_mut().enumerate() {
        while z[j + 1] < i as f64 {
            j += 1;
        }
        let p = v[j];
        let delta = i as f64 - p as f64;
        *out = delta * delta + f[p];
    }
}

#[inline]
fn sq(v: usize) -> f64 {
    let v = v as f64;
    v * v
}
