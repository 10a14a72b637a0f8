//! Normalized box filter for single-channel float planes.
//!
//! The kernel is `size x size` with its anchor at `size / 2`, and samples past
//! the edges are mirrored without repeating the border pixel (`dcb|abcd|cba`).

use rayon::prelude::*;

/// Blur a row-major `width x height` plane in place.
pub fn box_blur(plane: &mut [f32], width: usize, height: usize, size: usize) {
    debug_assert_eq!(plane.len(), width * height);

    if size <= 1 || width == 0 || height == 0 {
        return;
    }

    blur_rows(plane, width, size);

    let mut transposed = transpose(plane, width, height);
    blur_rows(&mut transposed, height, size);
    plane.copy_from_slice(&transpose(&transposed, height, width));
}

fn blur_rows(plane: &mut [f32], width: usize, size: usize) {
    let anchor = (size / 2) as isize;

    plane.par_chunks_mut(width).for_each(|row| {
        // prefix[i] is the sum of the first i samples of the mirrored row,
        // which starts `anchor` samples before column 0.
        let padded = width + size - 1;
        let mut prefix = Vec::with_capacity(padded + 1);
        prefix.push(0.0f64);

        let mut sum = 0.0f64;
        for i in 0..padded {
            sum += row[reflect_101(i as isize - anchor, width)] as f64;
            prefix.push(sum);
        }

        for (x, value) in row.iter_mut().enumerate() {
            *value = ((prefix[x + size] - prefix[x]) / size as f64) as f32;
        }
    });
}

fn transpose(plane: &[f32], width: usize, height: usize) -> Vec<f32> {
    let mut out = vec![0.0; plane.len()];
    for y in 0..height {
        for x in 0..width {
            out[x * height + y] = plane[y * width + x];
        }
    }
    out
}

pub(crate) fn reflect_101(index: isize, len: usize) -> usize {
    if len == 1 {
        return 0;
    }

    let len = len as isize;
    let mut i = index;
    while i < 0 || i >= len {
        if i < 0 {
            i = -i;
        }
        if i >= len {
            i = 2 * len - 2 - i;
        }
    }
    i as usize
}
