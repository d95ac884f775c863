//! Action on an invariant subspace and on the quotient.
//!
//! For an invariant subspace `S` held in reduced echelon form, the
//! subspace action is read off in the basis of `S`, and the quotient action
//! in the basis given by the unit vectors at the non-pivot columns of `S`.

use crate::echelon::EchelonBasis;
use crate::error::{MtxError, Result};
use crate::matrix::{vec_mul, Matrix};
use crate::spinup::check_generators;

/// Generators of a subspace and of the corresponding quotient.
#[derive(Clone, Debug)]
pub struct ModuleSplit {
    /// Action on the subspace, `dim S × dim S` each.
    pub sub: Vec<Matrix>,
    /// Action on the quotient, `(n - dim S) × (n - dim S)` each.
    pub quot: Vec<Matrix>,
}

/// Split the representation `gens` along the invariant subspace `subspace`.
///
/// # Errors
///
/// Returns an error if the generators are malformed, the subspace lives in
/// a different space, or it is not invariant.
pub fn split(subspace: &EchelonBasis, gens: &[Matrix]) -> Result<ModuleSplit> {
    let n = check_generators(gens)?;
    if subspace.cols() != n {
        return Err(MtxError::DimensionMismatch {
            op: "split",
            left: (subspace.dim(), subspace.cols()),
            right: (n, n),
        });
    }
    let field = gens[0].field().clone();
    let k = subspace.dim();
    let complement = subspace.non_pivots();
    let mut sub = Vec::with_capacity(gens.len());
    let mut quot = Vec::with_capacity(gens.len());
    for g in gens {
        let mut s = Matrix::zero(field.clone(), 0, k);
        for row in subspace.rows() {
            let mut image = vec_mul(&field, row, g);
            let coords = subspace.coordinates(&image);
            subspace.reduce(&mut image);
            if image.iter().any(|&x| x != 0) {
                return Err(MtxError::InvalidGenerators(
                    "subspace is not invariant".into(),
                ));
            }
            s.push_row(&coords);
        }
        let mut q = Matrix::zero(field.clone(), 0, n - k);
        for &c in &complement {
            q.push_row(&subspace.quotient_coordinates(g.row(c)));
        }
        sub.push(s);
        quot.push(q);
    }
    Ok(ModuleSplit { sub, quot })
}

/// Images of the rows of `vectors` in the quotient by `subspace`, with the
/// rows that vanish there dropped.
pub fn quotient_projection(subspace: &EchelonBasis, vectors: &Matrix) -> Matrix {
    let mut out = Matrix::zero(
        subspace.field().clone(),
        0,
        subspace.cols() - subspace.dim(),
    );
    for row in vectors.row_iter() {
        let image = subspace.quotient_coordinates(row);
        if image.iter().any(|&x| x != 0) {
            out.push_row(&image);
        }
    }
    out
}
