//! Isomorphism test and splitting-field check for irreducible modules.
//!
//! Both rest on the standard basis of [`crate::spinup`]. For an
//! irreducible module `V`, a module homomorphism is fixed by the image of
//! one vector, and the script of a standard basis spun from `v` turns any
//! candidate image `w` into the matrix `B_v⁻¹·B_w` of the only possible
//! homomorphism sending `v` to `w`.

use tracing::trace;

use crate::echelon::EchelonBasis;
use crate::error::Result;
use crate::matrix::Matrix;
use crate::poly::Poly;
use crate::spinup::{apply_script, check_generators, conjugate, standard_basis};
use crate::words::WordGenerator;

/// The canonical form of an irreducible representation with respect to an
/// identifying word: the generators conjugated into the standard basis
/// spun from the first kernel vector of `id_poly(word)`.
///
/// Returns `None` if the kernel is zero or the seed does not spin the whole
/// space.
///
/// # Errors
///
/// Propagates matrix errors.
pub fn canonical_form(
    gens: &[Matrix],
    id_word: u64,
    id_poly: &Poly,
) -> Result<Option<(Vec<Matrix>, Matrix)>> {
    let n = check_generators(gens)?;
    let mut words = WordGenerator::new(gens.to_vec())?;
    let w = words.make_word(id_word)?;
    let kernel = id_poly.eval_matrix(&w)?.null_space();
    let Some(seed) = kernel.rows().first() else {
        return Ok(None);
    };
    let sb = standard_basis(seed, gens)?;
    if sb.dim() < n {
        return Ok(None);
    }
    let canonical = conjugate(gens, &sb.basis)?;
    Ok(Some((canonical, sb.basis)))
}

/// Decide whether `other` is isomorphic to the irreducible representation
/// whose canonical generators are `canonical`. On success, returns the
/// basis `B` with `B·h·B⁻¹ = canonical` for every generator `h` of `other`.
///
/// # Errors
///
/// Propagates matrix errors.
pub fn is_isomorphic(
    canonical: &[Matrix],
    id_word: u64,
    id_poly: &Poly,
    other: &[Matrix],
) -> Result<Option<Matrix>> {
    if canonical.len() != other.len()
        || check_generators(canonical)? != check_generators(other)?
        || canonical[0].field() != other[0].field()
    {
        return Ok(None);
    }
    let found = match canonical_form(other, id_word, id_poly)? {
        Some((conj, basis)) if conj.as_slice() == canonical => Some(basis),
        _ => None,
    };
    trace!(id_word, isomorphic = found.is_some(), "isomorphism test");
    Ok(found)
}

/// True if every kernel vector is the image of the first one under a module
/// endomorphism, that is, if `dim kernel` equals the degree of the
/// splitting field over GF(q). Assumes `gens` is irreducible.
///
/// # Errors
///
/// Propagates matrix errors.
pub fn check_splitting_degree(gens: &[Matrix], kernel: &EchelonBasis) -> Result<bool> {
    let n = check_generators(gens)?;
    let Some((first, rest)) = kernel.rows().split_first() else {
        return Ok(false);
    };
    let sb = standard_basis(first, gens)?;
    if sb.dim() < n {
        return Ok(false);
    }
    let inv = sb.basis.inverse()?;
    for w in rest {
        let image = apply_script(w, gens, &sb.script)?;
        let endo = inv.mul(&image)?;
        for g in gens {
            if endo.mul(g)? != g.mul(&endo)? {
                trace!(kernel = kernel.dim(), "splitting check failed");
                return Ok(false);
            }
        }
    }
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::Field;
    use std::sync::Arc;

    fn gf(q: u32) -> Arc<Field> {
        Arc::new(Field::new(q).unwrap())
    }

    /// Companion matrix of x^3 + x + 1 and the elementary matrix E11:
    /// absolutely irreducible of dimension 3 over GF(2).
    fn irreducible3() -> Vec<Matrix> {
        let f = gf(2);
        let c = Matrix::from_rows(
            f.clone(),
            &[vec![0, 1, 0], vec![0, 0, 1], vec![1, 1, 0]],
        )
        .unwrap();
        let mut e = Matrix::zero(f, 3, 3);
        e.set(0, 0, 1);
        vec![c, e]
    }

    #[test]
    fn conjugates_are_isomorphic() {
        let gens = irreducible3();
        let f = gens[0].field().clone();
        let id_poly = Poly::new(f.clone(), vec![1, 1]);
        let (canonical, _) = canonical_form(&gens, 2, &id_poly).unwrap().unwrap();
        let t = Matrix::from_rows(f, &[vec![1, 1, 0], vec![0, 1, 1], vec![0, 0, 1]]).unwrap();
        let other = conjugate(&gens, &t).unwrap();
        let basis = is_isomorphic(&canonical, 2, &id_poly, &other)
            .unwrap()
            .unwrap();
        assert_eq!(conjugate(&other, &basis).unwrap(), canonical);
    }

    #[test]
    fn different_modules_are_not_isomorphic() {
        let gens = irreducible3();
        let f = gens[0].field().clone();
        let id_poly = Poly::new(f.clone(), vec![1, 1]);
        let (canonical, _) = canonical_form(&gens, 2, &id_poly).unwrap().unwrap();
        // Same first generator, second generator replaced by E22.
        let mut e = Matrix::zero(f, 3, 3);
        e.set(1, 1, 1);
        let other = vec![gens[0].clone(), e];
        assert!(is_isomorphic(&canonical, 2, &id_poly, &other)
            .unwrap()
            .is_none());
    }

    #[test]
    fn splitting_degree_of_absolutely_irreducible() {
        let gens = irreducible3();
        let f = gens[0].field().clone();
        // x + 1 on E11 has a one-dimensional kernel.
        let w = Poly::new(f.clone(), vec![1, 1]).eval_matrix(&gens[1]).unwrap();
        assert!(check_splitting_degree(&gens, &w.null_space()).unwrap());
        // The whole space is too big a kernel.
        let all = EchelonBasis::from_matrix(&Matrix::identity(f, 3));
        assert!(!check_splitting_degree(&gens, &all).unwrap());
    }

    #[test]
    fn splitting_degree_of_field_extension() {
        // GF(4) acting on itself over GF(2): multiplication by a root of
        // x^2 + x + 1. Endomorphism ring is GF(4), so the whole 2-dim space
        // is a valid kernel.
        let f = gf(2);
        let g = Matrix::from_rows(f.clone(), &[vec![0, 1], vec![1, 1]]).unwrap();
        let all = EchelonBasis::from_matrix(&Matrix::identity(f, 2));
        assert!(check_splitting_degree(&[g], &all).unwrap());
    }
}
