#![no_main]

use aprender_lda::corpus::Vocabulary;
use aprender_lda::primitives::Matrix;
use aprender_lda::query::{QueryGibbs, TopicTermModel};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Fuzz query encoding and seed validation with arbitrary token streams
    // Targets: out-of-vocabulary dropping, empty documents, seed shapes
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };

    let terms = vec!["alpha".to_string(), "beta".to_string(), "gamma".to_string()];
    let Ok(vocabulary) = Vocabulary::from_terms(terms) else {
        return;
    };
    let Ok(phi) = Matrix::from_vec(3, 2, vec![0.5, 0.2, 0.3, 0.2, 0.2, 0.6]) else {
        return;
    };
    let Ok(model) = TopicTermModel::new(vocabulary, vec![phi]) else {
        return;
    };

    let docs: Vec<Vec<&str>> = text.lines().map(|l| l.split_whitespace().collect()).collect();
    let Ok(mut query) = QueryGibbs::new(&docs, model) else {
        return;
    };

    // Seed rows derived from the input bytes; most are invalid
    let n_tokens = query.corpus().n_tokens();
    let row: Vec<usize> = data.iter().cycle().take(n_tokens).map(|&b| usize::from(b % 3)).collect();
    if query.set_seed(vec![row]).is_ok() {
        let _ = query.query(1);
    }
});
