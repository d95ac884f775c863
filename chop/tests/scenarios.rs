//! End-to-end chops of small modules with known composition factors.

use std::sync::Arc;

use chop::{
    chop, ChopContext, ChopEngine, ChopError, ChopOptions, ChopReport, FileSink, KnownIdWord,
    MemorySink,
};
use mtx::{Field, Matrix};
use proptest::prelude::*;

fn gf(q: u32) -> Arc<Field> {
    Arc::new(Field::new(q).unwrap())
}

/// Companion matrix of the monic polynomial with low coefficients `low`:
/// row i is e_(i+1), the last row is `-low`. Over GF(2), `-low = low`.
fn companion(f: &Arc<Field>, low: &[u8]) -> Matrix {
    let n = low.len();
    let mut m = Matrix::zero(f.clone(), n, n);
    for i in 0..n - 1 {
        m.set(i, i + 1, 1);
    }
    for (j, &c) in low.iter().enumerate() {
        m.set(n - 1, j, f.neg(c));
    }
    m
}

/// The matrix unit E11 of size `n`.
fn e11(f: &Arc<Field>, n: usize) -> Matrix {
    let mut m = Matrix::zero(f.clone(), n, n);
    m.set(0, 0, 1);
    m
}

fn block_diag(f: &Arc<Field>, a: &Matrix, b: &Matrix) -> Matrix {
    let (n, k) = (a.rows(), b.rows());
    let mut m = Matrix::zero(f.clone(), n + k, n + k);
    for i in 0..n {
        for j in 0..n {
            m.set(i, j, a.get(i, j));
        }
    }
    for i in 0..k {
        for j in 0..k {
            m.set(n + i, n + j, b.get(i, j));
        }
    }
    m
}

/// The irreducible GF(2)-module of dimension 3 generated by the companion
/// of x^3+x+1 and E11.
fn irred3(f: &Arc<Field>) -> Vec<Matrix> {
    vec![companion(f, &[1, 1, 0]), e11(f, 3)]
}

/// Dimension 4, from x^4+x+1.
fn irred4(f: &Arc<Field>) -> Vec<Matrix> {
    vec![companion(f, &[1, 1, 0, 0]), e11(f, 4)]
}

fn direct_sum(f: &Arc<Field>, a: &[Matrix], b: &[Matrix]) -> Vec<Matrix> {
    a.iter().zip(b).map(|(x, y)| block_diag(f, x, y)).collect()
}

fn series_names(report: &ChopReport) -> Vec<&str> {
    report.series.iter().map(|s| s.constituent.as_str()).collect()
}

fn assert_consistent(report: &ChopReport) {
    let mut offset = 0;
    for entry in &report.series {
        assert_eq!(entry.base_dim, offset);
        offset += entry.dim;
    }
    assert_eq!(offset, report.dim);
    assert_eq!(report.total_dim(), report.dim);
    assert_eq!(report.stats.irreducibles as usize, report.series.len());
    assert_eq!(report.stats.nodes, 2 * report.stats.splits() + 1);
}

// =============================================================================
// Known modules
// =============================================================================

#[test]
fn identity_splits_into_trivial_factors() {
    let f = gf(2);
    let report = chop(vec![Matrix::identity(f, 2)], ChopOptions::default()).unwrap();
    assert_consistent(&report);
    assert_eq!(report.constituents.len(), 1);
    let c = &report.constituents[0];
    assert_eq!((c.name.as_str(), c.multiplicity, c.splitting_degree), ("1a", 2, 1));
    assert_eq!(series_names(&report), ["1a", "1a"]);
    assert_eq!(report.stats.saved_vector_splits, 1);
    assert_eq!(report.stats.words_tried, 0);
}

#[test]
fn identity_over_gf5_uses_a_word() {
    let f = gf(5);
    let mut engine = ChopEngine::new(ChopContext::new(ChopOptions::default(), MemorySink::new()));
    let report = engine.run(vec![Matrix::identity(f, 3)]).unwrap();
    assert_consistent(&report);
    assert_eq!(report.constituents.len(), 1);
    assert_eq!(report.constituents[0].multiplicity, 3);
    assert_eq!(report.stats.saved_vector_splits, 1);
    assert_eq!(report.stats.normal_splits, 1);
    assert!(engine.context().good_words().contains(1));
}

#[test]
fn irreducible_characteristic_polynomial() {
    let f = gf(2);
    let gens = vec![companion(&f, &[1, 0, 1, 0, 0]), e11(&f, 5)];
    let report = chop(gens, ChopOptions::default()).unwrap();
    assert_consistent(&report);
    assert_eq!(report.constituents.len(), 1);
    let c = &report.constituents[0];
    assert_eq!(c.name, "5a");
    assert_eq!(c.multiplicity, 1);
    assert_eq!(c.splitting_degree, 1);
    assert_eq!(c.id_word, 2);
    assert_eq!(c.id_word_name, "b");
    assert_eq!(c.id_poly_text, "x+1");
    assert_eq!(report.stats.charpoly_irreducible, 1);
    assert_eq!(report.stats.splits(), 0);
    assert_eq!(report.stats.words_tried, 1);
}

#[test]
fn direct_sum_of_distinct_irreducibles() {
    let f = gf(2);
    let gens = direct_sum(&f, &irred3(&f), &irred4(&f));
    let mut engine = ChopEngine::new(ChopContext::new(ChopOptions::default(), MemorySink::new()));
    let report = engine.run(gens).unwrap();
    assert_consistent(&report);
    let names: Vec<&str> = report.constituents.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, ["3a", "4a"]);
    assert_eq!(series_names(&report), ["3a", "4a"]);
    assert_eq!(report.series[1].base_dim, 3);
    assert_eq!(report.stats.saved_vector_splits, 1);
    // The quotient reuses the word that settled the submodule.
    assert_eq!(report.stats.words_tried, 2);
    assert!(engine.context().good_words().contains(1));

    let sink = engine.into_context().into_sink();
    assert_eq!(sink.generators("4a").unwrap().len(), 2);
    assert_eq!(sink.table.as_ref(), Some(&report));
}

#[test]
fn direct_sum_of_isomorphic_irreducibles() {
    let f = gf(2);
    let gens = direct_sum(&f, &irred3(&f), &irred3(&f));
    let report = chop(gens, ChopOptions::default()).unwrap();
    assert_consistent(&report);
    assert_eq!(report.constituents.len(), 1);
    assert_eq!(report.constituents[0].name, "3a");
    assert_eq!(report.constituents[0].multiplicity, 2);
    assert_eq!(series_names(&report), ["3a", "3a"]);
}

#[test]
fn undecided_word_is_marked_bad() {
    // GF(4) as a GF(2)-module: irreducible, splitting degree 2. With the
    // kernel search disabled the identity word cannot decide it.
    let f = gf(2);
    let gens = vec![Matrix::identity(f.clone(), 2), companion(&f, &[1, 1])];
    let options = ChopOptions {
        max_nullity: 1,
        ..ChopOptions::default()
    };
    let mut engine = ChopEngine::new(ChopContext::new(options, MemorySink::new()));
    let report = engine.run(gens).unwrap();
    assert_consistent(&report);
    assert!(engine.tree().is_bad(0, 1));
    assert!(engine.context().good_words().contains(2));
    assert!(!engine.context().good_words().contains(1));
    assert_eq!(report.stats.words_tried, 2);

    let c = &report.constituents[0];
    assert_eq!(c.name, "2a");
    assert_eq!(c.splitting_degree, 2);
    assert_eq!(c.id_word, 2);
    assert_eq!(c.id_poly_text, "x^2+x+1");
}

// =============================================================================
// Split paths
// =============================================================================

/// The unipotent block [[1,1],[0,1]].
fn unipotent(f: &Arc<Field>) -> Matrix {
    Matrix::from_rows(f.clone(), &[vec![1, 1], vec![0, 1]]).unwrap()
}

#[test]
fn dual_kernel_splits_when_kernel_vector_spins_full() {
    // Word 1 is E11. Its kernel vector e1 spins the whole module, but e1
    // spins a proper subspace under the transposed generators.
    let f = gf(2);
    let gens = vec![e11(&f, 2), unipotent(&f)];
    let mut engine = ChopEngine::new(ChopContext::new(ChopOptions::default(), MemorySink::new()));
    let report = engine.run(gens).unwrap();
    assert_consistent(&report);
    assert_eq!(report.stats.dual_splits, 1);
    assert_eq!(report.stats.normal_splits, 0);
    assert_eq!(report.stats.saved_vector_splits, 0);
    assert_eq!(report.stats.words_tried, 1);
    assert_eq!(series_names(&report), ["1a", "1b"]);
    assert_eq!(engine.tree().get(1).unwrap().dim, 1);
    assert_eq!(engine.tree().get(2).unwrap().base_dim, 1);
}

#[test]
fn whole_kernel_is_searched_within_max_nullity() {
    // Word 1 is the identity: x+1 has multiplicity 2, so the kernel is
    // the whole space and its points are spun one by one.
    let f = gf(2);
    let gens = vec![Matrix::identity(f.clone(), 2), unipotent(&f)];
    let report = chop(gens, ChopOptions::default()).unwrap();
    assert_consistent(&report);
    assert_eq!(report.stats.normal_splits, 1);
    assert_eq!(report.stats.dual_splits, 0);
    assert_eq!(report.stats.saved_vector_splits, 0);
    assert_eq!(report.stats.words_tried, 1);
    assert_eq!(report.constituents.len(), 1);
    assert_eq!(report.constituents[0].multiplicity, 2);
}

#[test]
fn large_kernel_falls_back_to_dual_seed() {
    let f = gf(2);
    let gens = vec![Matrix::identity(f.clone(), 2), unipotent(&f)];
    let options = ChopOptions {
        max_nullity: 1,
        ..ChopOptions::default()
    };
    let report = chop(gens, options).unwrap();
    assert_consistent(&report);
    assert_eq!(report.stats.dual_splits, 1);
    assert_eq!(report.stats.normal_splits, 0);
    assert_eq!(report.constituents[0].multiplicity, 2);
}

// =============================================================================
// Search bounds
// =============================================================================

#[test]
fn word_limit_ends_in_game_over() {
    let f = gf(2);
    let gens = vec![companion(&f, &[1, 0, 1, 0, 0]), e11(&f, 5)];
    let options = ChopOptions {
        word_limit: 0,
        ..ChopOptions::default()
    };
    let err = chop(gens, options).unwrap_err();
    assert!(matches!(err, ChopError::Exhausted { node: 0, dim: 5, tries: 0, .. }));
    assert!(err.to_string().starts_with("GAME OVER"));
}

#[test]
fn id_word_limit_is_enforced() {
    let f = gf(3);
    let options = ChopOptions {
        id_word_limit: 0,
        ..ChopOptions::default()
    };
    let err = chop(vec![Matrix::identity(f, 1)], options).unwrap_err();
    assert!(matches!(err, ChopError::IdWordNotFound { dim: 1, .. }));
}

#[test]
fn known_id_words_are_reused() {
    let f = gf(2);
    let gens = vec![companion(&f, &[1, 0, 1, 0, 0]), e11(&f, 5)];
    let first = chop(gens.clone(), ChopOptions::default()).unwrap();

    let options = ChopOptions {
        id_word_limit: 0,
        ..ChopOptions::default()
    };
    let ctx = ChopContext::new(options, MemorySink::new())
        .with_known_id_words(KnownIdWord::from_report(&first));
    let second = ChopEngine::new(ctx).run(gens).unwrap();
    assert_eq!(second.constituents, first.constituents);
}

#[test]
fn invalid_generators_are_rejected() {
    let f = gf(2);
    let gens = vec![Matrix::identity(f.clone(), 2), Matrix::identity(f, 3)];
    assert!(matches!(
        chop(gens, ChopOptions::default()),
        Err(ChopError::Mtx(_))
    ));
}

// =============================================================================
// Persistence
// =============================================================================

#[test]
fn file_sink_writes_constituents_and_table() {
    let dir = std::env::temp_dir().join(format!("chop-scenarios-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let f = gf(2);
    let gens = direct_sum(&f, &irred3(&f), &irred4(&f));

    let sink = FileSink::new(&dir, "m");
    let report = ChopEngine::new(ChopContext::new(ChopOptions::default(), sink.clone()))
        .run(gens)
        .unwrap();

    for name in ["3a", "4a"] {
        for i in 1..=2 {
            let text = std::fs::read_to_string(sink.generator_path(name, i)).unwrap();
            let m = mtx::parse_matrix(&text).unwrap();
            assert_eq!(m.rows(), name[..1].parse::<usize>().unwrap());
        }
    }
    let json = std::fs::read_to_string(sink.table_path()).unwrap();
    assert_eq!(ChopReport::from_json(&json).unwrap(), report);
    std::fs::remove_dir_all(&dir).unwrap();
}

// =============================================================================
// Random modules
// =============================================================================

prop_compose! {
    fn small_module()(n in 1..=4usize, k in 1..=2usize)
        (raw in prop::collection::vec(0..2u8, k * n * n), n in Just(n), k in Just(k))
        -> Vec<Matrix>
    {
        let f = gf(2);
        raw.chunks(n * n)
            .take(k)
            .map(|c| Matrix::from_vec(f.clone(), n, n, c.to_vec()).unwrap())
            .collect()
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Every small module over GF(2) is chopped, and the constituents
    /// written to the sink fill it exactly, in series order.
    #[test]
    fn prop_series_covers_module(gens in small_module()) {
        let dim = gens[0].rows();
        let options = ChopOptions { word_limit: 2_000, ..ChopOptions::default() };
        let mut engine = ChopEngine::new(ChopContext::new(options, MemorySink::new()));
        let result = engine.run(gens);
        prop_assert!(result.is_ok(), "chop failed: {:?}", result.as_ref().err());
        let report = result.unwrap();

        let mut offset = 0;
        for entry in &report.series {
            prop_assert_eq!(entry.base_dim, offset);
            offset += entry.dim;
        }
        prop_assert_eq!(offset, dim);
        prop_assert_eq!(report.stats.nodes, 2 * report.stats.splits() + 1);

        let sink = engine.into_context().into_sink();
        let table = sink.table.as_ref();
        prop_assert!(table.is_some());
        let covered: usize = table
            .map(|t| t.constituents.iter().map(|c| c.multiplicity * c.dim).sum())
            .unwrap_or(0);
        prop_assert_eq!(covered, dim);
    }
}
