use anyhow::{anyhow, Result};
use nalgebra::{DMatrix, DVector};

/// Which image axis a 1D fit runs along.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FitAxis {
    /// Fit each row against its column index.
    X,
    /// Fit each column against its row index.
    Y,
}

/// Solve a least-squares problem via SVD.
///
/// Rank-deficient systems (e.g. degree >= sample count) are not rejected;
/// the minimum-norm solution comes back instead.
pub(crate) fn solve_least_squares(a: DMatrix<f64>, b: &DVector<f64>) -> Result<DVector<f64>> {
    let svd = a.svd(true, true);
    svd.solve(b, 1e-12)
        .map_err(|e| anyhow!("least-squares solve failed: {}", e))
}

/// Fit a degree-`degree` polynomial to `(xs, ys)` by ordinary least squares.
///
/// Returns coefficients in ascending order: c0 + c1*x + c2*x^2 + ...
pub fn polyfit(xs: &[f64], ys: &[f64], degree: usize) -> Result<DVector<f64>> {
    if xs.len() != ys.len() {
        return Err(anyhow!(
            "polyfit: {} x samples but {} y samples",
            xs.len(),
            ys.len()
        ));
    }

    // Vandermonde design matrix: one column per power of x.
    let vandermonde = DMatrix::from_fn(xs.len(), degree + 1, |r, c| xs[r].powi(c as i32));
    solve_least_squares(vandermonde, &DVector::from_column_slice(ys))
}

/// Evaluate a polynomial with ascending coefficients via Horner's method.
pub fn polyval(coeffs: &DVector<f64>, x: f64) -> f64 {
    coeffs.iter().rev().fold(0.0, |acc, &c| acc * x + c)
}

/// Fit each row (or column) of a plane to a polynomial of its pixel index and
/// re-evaluate it on the same grid. Output shape equals input shape.
pub fn fit_plane_along(plane: &DMatrix<f64>, degree: usize, axis: FitAxis) -> Result<DMatrix<f64>> {
    match axis {
        FitAxis::X => fit_rows(plane, degree),
        FitAxis::Y => Ok(fit_rows(&plane.transpose(), degree)?.transpose()),
    }
}

fn fit_rows(plane: &DMatrix<f64>, degree: usize) -> Result<DMatrix<f64>> {
    let xs: Vec<f64> = (0..plane.ncols()).map(|x| x as f64).collect();
    let mut out = DMatrix::zeros(plane.nrows(), plane.ncols());

    for row in 0..plane.nrows() {
        let ys: Vec<f64> = plane.row(row).iter().copied().collect();
        let coeffs = polyfit(&xs, &ys, degree)?;
        for col in 0..plane.ncols() {
            out[(row, col)] = polyval(&coeffs, xs[col]);
        }
    }

    Ok(out)
}
