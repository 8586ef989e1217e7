use anyhow::Result;
use nalgebra::{DMatrix, DVector};

use crate::fit::solve_least_squares;

/// Fit a bivariate polynomial f(x, y) = sum c_ij * x^i * y^j to a plane,
/// with x the column index and y the row index.
///
/// The coefficient vector always has length `(kx + 1) * (ky + 1)`, indexed
/// `i * (ky + 1) + j`. Terms with total degree above `order` stay in the
/// layout but their design-matrix columns are zeroed, so the solve drives
/// those coefficients to zero instead of shrinking the vector.
pub fn fit_surface(
    plane: &DMatrix<f64>,
    kx: usize,
    ky: usize,
    order: Option<usize>,
) -> Result<DVector<f64>> {
    let height = plane.nrows();
    let width = plane.ncols();
    let n_terms = (kx + 1) * (ky + 1);

    // One row per grid point (row-major), one column per basis term.
    let mut design = DMatrix::zeros(height * width, n_terms);
    for i in 0..=kx {
        for j in 0..=ky {
            if matches!(order, Some(bound) if i + j > bound) {
                continue; // column stays zero
            }
            let term = i * (ky + 1) + j;
            for row in 0..height {
                for col in 0..width {
                    design[(row * width + col, term)] =
                        (col as f64).powi(i as i32) * (row as f64).powi(j as i32);
                }
            }
        }
    }

    // Row-major flattening of the plane as the right-hand side.
    let values = DVector::from_fn(height * width, |p, _| plane[(p / width, p % width)]);

    // Residuals, rank and singular values from the solve are unused.
    solve_least_squares(design, &values)
}

/// Evaluate the fitted surface back onto a `height` x `width` pixel grid.
pub fn eval_surface(
    coeffs: &DVector<f64>,
    kx: usize,
    ky: usize,
    height: usize,
    width: usize,
) -> DMatrix<f64> {
    assert_eq!(
        coeffs.len(),
        (kx + 1) * (ky + 1),
        "coefficient layout mismatch"
    );

    DMatrix::from_fn(height, width, |row, col| {
        let (x, y) = (col as f64, row as f64);
        let mut value = 0.0;
        for i in 0..=kx {
            for j in 0..=ky {
                value += coeffs[i * (ky + 1) + j] * x.powi(i as i32) * y.powi(j as i32);
            }
        }
        value
    })
}

/// Fit a surface to the plane and re-evaluate it on the original grid.
/// Output shape equals input shape.
pub fn fit_plane_surface(
    plane: &DMatrix<f64>,
    kx: usize,
    ky: usize,
    order: Option<usize>,
) -> Result<DMatrix<f64>> {
    let coeffs = fit_surface(plane, kx, ky, order)?;
    Ok(eval_surface(&coeffs, kx, ky, plane.nrows(), plane.ncols()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bilinear_plane(height: usize, width: usize) -> DMatrix<f64> {
        // 2 + 0.5x - y + 0.25xy
        DMatrix::from_fn(height, width, |r, c| {
            let (x, y) = (c as f64, r as f64);
            2.0 + 0.5 * x - y + 0.25 * x * y
        })
    }

    #[test]
    fn test_coefficient_count_is_rectangular() {
        let plane = bilinear_plane(6, 7);
        for order in [None, Some(0), Some(1), Some(4)] {
            let coeffs = fit_surface(&plane, 3, 2, order).unwrap();
            assert_eq!(coeffs.len(), 4 * 3);
        }
    }

    #[test]
    fn test_recovers_bilinear_coefficients() {
        let plane = bilinear_plane(8, 9);
        let coeffs = fit_surface(&plane, 1, 1, None).unwrap();

        // layout: i * (ky + 1) + j for x^i y^j
        assert!((coeffs[0] - 2.0).abs() < 1e-7); // 1
        assert!((coeffs[1] + 1.0).abs() < 1e-7); // y
        assert!((coeffs[2] - 0.5).abs() < 1e-7); // x
        assert!((coeffs[3] - 0.25).abs() < 1e-7); // xy
    }

    #[test]
    fn test_order_bound_zeroes_high_terms() {
        let plane = bilinear_plane(8, 9);
        let coeffs = fit_surface(&plane, 1, 1, Some(1)).unwrap();
        // xy has total degree 2 and is excluded from the fit.
        assert!(coeffs[3].abs() < 1e-9);
    }

    #[test]
    fn test_reconstruction_shape_and_exactness() {
        let plane = bilinear_plane(5, 6);
        let fitted = fit_plane_surface(&plane, 2, 2, None).unwrap();

        assert_eq!(fitted.shape(), plane.shape());
        for row in 0..5 {
            for col in 0..6 {
                assert!((fitted[(row, col)] - plane[(row, col)]).abs() < 1e-6);
            }
        }
    }

    #[test]
    fn test_order_zero_fits_mean() {
        let plane = DMatrix::from_row_slice(2, 2, &[0.0, 10.0, 20.0, 30.0]);
        let fitted = fit_plane_surface(&plane, 1, 1, Some(0)).unwrap();
        for value in fitted.iter() {
            assert!((value - 15.0).abs() < 1e-8);
        }
    }
}
