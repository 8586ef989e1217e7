use anyhow::Result;
use nalgebra::DMatrix;

use crate::fit::{fit_plane_along, FitAxis};

/// Fixed reflection-pad margin for angle mode. Content that rotates further
/// than this from its original position is lost without warning.
pub const DEFAULT_MARGIN: usize = 100;

/// Mirror an index into [0, n), reflecting without repeating the edge sample.
fn reflect_index(i: i64, n: usize) -> usize {
    if n <= 1 {
        return 0;
    }
    let period = 2 * (n as i64) - 2;
    let mut k = i.rem_euclid(period);
    if k >= n as i64 {
        k = period - k;
    }
    k as usize
}

/// Grow a plane by `margin` pixels on every side using reflection padding,
/// so rotation does not smear border values into the content.
pub fn pad_reflect(plane: &DMatrix<f64>, margin: usize) -> DMatrix<f64> {
    let height = plane.nrows();
    let width = plane.ncols();

    DMatrix::from_fn(height + 2 * margin, width + 2 * margin, |row, col| {
        let src_row = reflect_index(row as i64 - margin as i64, height);
        let src_col = reflect_index(col as i64 - margin as i64, width);
        plane[(src_row, src_col)]
    })
}

/// Bilinear sample with mirror-edge handling for out-of-bounds coordinates.
fn sample_mirror_bilinear(plane: &DMatrix<f64>, x: f64, y: f64) -> f64 {
    let fx = x - x.floor();
    let fy = y - y.floor();
    let x0 = x.floor() as i64;
    let y0 = y.floor() as i64;

    let at = |row: i64, col: i64| {
        plane[(reflect_index(row, plane.nrows()), reflect_index(col, plane.ncols()))]
    };

    let top = at(y0, x0) * (1.0 - fx) + at(y0, x0 + 1) * fx;
    let bottom = at(y0 + 1, x0) * (1.0 - fx) + at(y0 + 1, x0 + 1) * fx;
    top * (1.0 - fy) + bottom * fy
}

/// Rotate a plane about its center on the same canvas by inverse mapping with
/// bilinear sampling. Coordinates that fall outside the canvas are sampled by
/// reflection, so no fill value ever enters the result.
pub fn rotate_plane(plane: &DMatrix<f64>, degrees: f64) -> DMatrix<f64> {
    let (sin_t, cos_t) = degrees.to_radians().sin_cos();
    let cx = (plane.ncols() as f64 - 1.0) * 0.5;
    let cy = (plane.nrows() as f64 - 1.0) * 0.5;

    DMatrix::from_fn(plane.nrows(), plane.ncols(), |row, col| {
        let dx = col as f64 - cx;
        let dy = row as f64 - cy;
        let src_x = cos_t * dx + sin_t * dy + cx;
        let src_y = -sin_t * dx + cos_t * dy + cy;
        sample_mirror_bilinear(plane, src_x, src_y)
    })
}

/// Row-fit a plane along an arbitrary direction: pad, rotate so the requested
/// angle becomes horizontal, fit each row, rotate back, crop the padding.
/// Output shape equals input shape.
pub fn fit_plane_at_angle(
    plane: &DMatrix<f64>,
    degree: usize,
    degrees: f64,
    margin: usize,
) -> Result<DMatrix<f64>> {
    let padded = pad_reflect(plane, margin);
    let rotated = rotate_plane(&padded, degrees);
    let fitted = fit_plane_along(&rotated, degree, FitAxis::X)?;
    let restored = rotate_plane(&fitted, -degrees);

    Ok(restored
        .view((margin, margin), (plane.nrows(), plane.ncols()))
        .into_owned())
}
