// =============================================================================
// ndarray <-> nalgebra Conversion and Reference Solves
// =============================================================================
//
// The fitting path works purely on ndarray types; nalgebra is used for the
// dense linear algebra behind the closed-form reference estimates that the
// validation suite compares fits against (Gaussian MLE with identity link is
// the normal-equations solution X'X beta = X'y).
//
// =============================================================================

use nalgebra::{DMatrix, DVector};
use ndarray::{Array1, Array2};

/// Convert an ndarray matrix to a nalgebra `DMatrix`.
///
/// Non-contiguous arrays are copied into standard layout first.
#[inline]
pub fn to_dmatrix(a: &Array2<f64>) -> DMatrix<f64> {
    let (nrows, ncols) = (a.nrows(), a.ncols());
    let contig = if a.is_standard_layout() {
        a.clone()
    } else {
        a.as_standard_layout().to_owned()
    };
    DMatrix::from_row_slice(nrows, ncols, contig.as_slice().unwrap())
}

/// Convert an ndarray vector to a nalgebra `DVector`.
#[inline]
pub fn to_dvector(v: &Array1<f64>) -> DVector<f64> {
    DVector::from_iterator(v.len(), v.iter().copied())
}

/// Convert a nalgebra `DVector` back to an ndarray vector.
#[inline]
pub fn to_array1(v: &DVector<f64>) -> Array1<f64> {
    Array1::from_vec(v.as_slice().to_vec())
}

/// Solve the symmetric positive-definite system `A x = b`.
///
/// Cholesky first, LU as fallback; `None` when the matrix is singular
/// (collinear predictors, typically).
pub fn solve_symmetric(a: &Array2<f64>, b: &Array1<f64>) -> Option<Array1<f64>> {
    let a = to_dmatrix(a);
    let b = to_dvector(b);

    if let Some(chol) = a.clone().cholesky() {
        Some(to_array1(&chol.solve(&b)))
    } else {
        a.lu().solve(&b).map(|x| to_array1(&x))
    }
}
