use rayon::prelude::*;

use landmask_image::Image;

/// Apply a function to whole rows of the image in parallel.
///
/// The closure receives the row index and the full row buffer
/// (`cols * C` values).
pub fn par_iter_rows_mut<T, const C: usize>(
    dst: &mut Image<T, C>,
    f: impl Fn(usize, &mut [T]) + Send + Sync,
) where
    T: Send + Sync,
{
    let cols = dst.cols();
    if cols == 0 {
        return;
    }
    dst.as_slice_mut()
        .par_chunks_exact_mut(C * cols)
        .enumerate()
        .for_each(|(row, dst_chunk)| f(row, dst_chunk));
}
