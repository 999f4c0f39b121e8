// =========================================================================
// FALSIFY-GIBBS: collapsed Gibbs LDA contract
//
// Claims under test:
//   - count matrices stay consistent with the assignment after any sweep
//   - document-topic rows and topic-term columns are probability vectors
//   - identical inputs and seeds reproduce identical archives
//   - appending never rewrites samples that were already retained
//   - K = 1 assigns every token to topic 0
//
// References:
//   - Griffiths, T.L., & Steyvers, M. (2004). Finding scientific topics. PNAS.
//   - Blei, D.M., et al. (2003). Latent Dirichlet Allocation. JMLR.
// =========================================================================

use super::*;
use crate::sampler::{doc_topic_counts, CollapsedTopicTerms};

fn corpus_docs() -> Vec<Vec<&'static str>> {
    vec![
        vec!["gene", "dna", "cell", "gene", "protein"],
        vec!["vote", "party", "election", "vote"],
        vec!["cell", "protein", "dna"],
        vec!["party", "law", "vote", "court"],
        vec!["court", "law", "gene"],
    ]
}

/// FALSIFY-GIBBS-001: Count invariants hold for every retained sample
#[test]
fn falsify_gibbs_001_count_invariants() {
    let mut lda = LdaGibbs::new(&corpus_docs(), 3).expect("model");
    lda.sample(5, 2, 4, false).expect("sample");
    let corpus = lda.corpus();

    for (s, snapshot) in lda.archive().iter().enumerate() {
        let dt = doc_topic_counts(corpus, snapshot.topics(), 3);
        for (d, &len) in corpus.doc_lengths().iter().enumerate() {
            let sum: u32 = dt[d * 3..(d + 1) * 3].iter().sum();
            assert_eq!(
                sum as usize, len,
                "FALSIFIED GIBBS-001: sample {s} doc {d} has {sum} assigned tokens, expected {len}"
            );
        }

        let tt = CollapsedTopicTerms::from_assignment(corpus, snapshot.topics(), 3, 0.1);
        let total: u32 = tt.totals().iter().sum();
        assert_eq!(
            total as usize,
            corpus.n_tokens(),
            "FALSIFIED GIBBS-001: sample {s} topic totals sum to {total}"
        );
        for k in 0..3 {
            let row: u32 = (0..corpus.vocab_size()).map(|w| tt.count(k, w)).sum();
            assert_eq!(row, tt.total(k), "FALSIFIED GIBBS-001: topic {k} total drifted");
        }
    }
}

/// FALSIFY-GIBBS-002: θ rows and φ columns sum to one
#[test]
fn falsify_gibbs_002_normalization() {
    let mut lda = LdaGibbs::new(&corpus_docs(), 4)
        .expect("model")
        .with_priors(0.3, 0.05)
        .expect("priors");
    lda.sample(10, 1, 3, false).expect("sample");

    let dt = lda.doc_topic_mean().expect("dt");
    for (d, sum) in dt.row_sums().iter().enumerate() {
        assert!(
            (sum - 1.0).abs() < 1e-9,
            "FALSIFIED GIBBS-002: doc {d} topic mass = {sum}"
        );
    }

    let tt = lda.topic_term_mean().expect("tt");
    for (k, sum) in tt.col_sums().iter().enumerate() {
        assert!(
            (sum - 1.0).abs() < 1e-9,
            "FALSIFIED GIBBS-002: topic {k} term mass = {sum}"
        );
    }
}

/// FALSIFY-GIBBS-003: Same corpus, priors and seeds give the same archive
#[test]
fn falsify_gibbs_003_determinism() {
    let run = || {
        let mut lda = LdaGibbs::new(&corpus_docs(), 3).expect("model").with_random_seed(1234);
        lda.sample(7, 3, 3, false).expect("sample");
        lda
    };
    let a = run();
    let b = run();
    assert_eq!(
        a.archive(),
        b.archive(),
        "FALSIFIED GIBBS-003: identical runs diverged"
    );
}

/// FALSIFY-GIBBS-004: Appending keeps the first samples bit-identical
#[test]
fn falsify_gibbs_004_append_equivalence() {
    let mut single = LdaGibbs::new(&corpus_docs(), 2).expect("model");
    single.sample(4, 2, 3, false).expect("sample");

    let mut extended = LdaGibbs::new(&corpus_docs(), 2).expect("model");
    extended.sample(4, 2, 3, false).expect("sample");
    extended.sample(4, 2, 2, true).expect("append");

    assert_eq!(extended.n_samples(), 5);
    for s in 0..3 {
        assert_eq!(
            extended.archive().get(s),
            single.archive().get(s),
            "FALSIFIED GIBBS-004: sample {s} changed after append"
        );
    }
}

/// FALSIFY-GIBBS-005: K = 1 is degenerate
#[test]
fn falsify_gibbs_005_single_topic() {
    let mut lda = LdaGibbs::new(&corpus_docs(), 1).expect("model");
    lda.sample(3, 1, 2, false).expect("sample");

    for snapshot in lda.archive().iter() {
        assert!(
            snapshot.topics().iter().all(|&z| z == 0),
            "FALSIFIED GIBBS-005: token assigned outside topic 0"
        );
    }
    let dt = lda.doc_topic_mean().expect("dt");
    assert!(
        dt.as_slice().iter().all(|&p| (p - 1.0).abs() < 1e-12),
        "FALSIFIED GIBBS-005: document-topic column is not all ones"
    );
}

mod gibbs_proptest_falsify {
    use super::*;
    use proptest::prelude::*;

    fn docs_strategy() -> impl Strategy<Value = Vec<Vec<String>>> {
        prop::collection::vec(
            prop::collection::vec("[a-f]", 0..8),
            1..6,
        )
        .prop_filter("at least one token", |docs| docs.iter().any(|d| !d.is_empty()))
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(40))]

        /// FALSIFY-GIBBS-001-prop: invariants and normalization on random corpora
        #[test]
        fn falsify_gibbs_001_prop_random_corpora(
            docs in docs_strategy(),
            k in 1..5usize,
            seed in 0..1000u64,
            alpha in 0.01f64..5.0,
            beta in 0.01f64..5.0,
        ) {
            let mut lda = LdaGibbs::new(&docs, k)
                .expect("non-empty corpus")
                .with_random_seed(seed)
                .with_priors(alpha, beta)
                .expect("positive priors");
            lda.sample(2, 1, 2, false).expect("sample");

            let corpus = lda.corpus();
            for snapshot in lda.archive().iter() {
                prop_assert!(snapshot.topics().iter().all(|&z| z < k));
                let dt = doc_topic_counts(corpus, snapshot.topics(), k);
                for (d, &len) in corpus.doc_lengths().iter().enumerate() {
                    let sum: u32 = dt[d * k..(d + 1) * k].iter().sum();
                    prop_assert_eq!(sum as usize, len);
                }
                for sum in snapshot.doc_topic().row_sums() {
                    prop_assert!((sum - 1.0).abs() < 1e-9, "row mass {}", sum);
                }
                for sum in snapshot.topic_term().col_sums() {
                    prop_assert!((sum - 1.0).abs() < 1e-9, "column mass {}", sum);
                }
            }

            let ppl = lda.perplexity().expect("perplexity");
            prop_assert!(ppl.iter().all(|p| p.is_finite() && *p >= 1.0 - 1e-9));
        }
    }
}
