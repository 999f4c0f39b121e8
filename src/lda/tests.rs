pub(crate) use super::*;

fn docs() -> Vec<Vec<&'static str>> {
    vec![
        vec!["stock", "market", "price", "stock", "trade"],
        vec!["team", "goal", "match", "goal"],
        vec!["price", "trade", "market"],
        vec!["match", "team", "coach", "goal"],
    ]
}

#[test]
fn test_lda_new_defaults() {
    let lda = LdaGibbs::new(&docs(), 4).expect("model");
    assert_eq!(lda.n_topics(), 4);
    assert_eq!(lda.vocabulary().len(), 8);
    assert_eq!(lda.corpus().n_tokens(), 16);
    assert!((lda.priors().alpha - 12.5).abs() < 1e-12);
    assert!((lda.priors().beta - 200.0 / 8.0).abs() < 1e-12);
    assert_eq!(lda.random_seed(), DEFAULT_RANDOM_SEED);
    assert_eq!(lda.n_samples(), 0);
}

#[test]
fn test_lda_zero_topics_rejected() {
    let err = LdaGibbs::new(&docs(), 0).unwrap_err();
    assert!(err.to_string().contains("n_topics"));
}

#[test]
fn test_lda_empty_corpus_rejected() {
    let docs: Vec<Vec<&str>> = vec![vec![]];
    assert!(LdaGibbs::new(&docs, 2).is_err());
}

#[test]
fn test_set_priors_validation() {
    let mut lda = LdaGibbs::new(&docs(), 2).expect("model");
    assert!(lda.set_priors(0.1, 0.01).is_ok());
    assert!((lda.priors().alpha - 0.1).abs() < 1e-12);
    assert!(lda.set_priors(-0.1, 0.01).is_err());
    assert!(lda.set_priors(0.1, 0.0).is_err());
    // failed updates leave the previous priors in place
    assert!((lda.priors().beta - 0.01).abs() < 1e-12);
}

#[test]
fn test_set_seed_validation() {
    let mut lda = LdaGibbs::new(&docs(), 2).expect("model");
    assert!(lda.set_seed(vec![0; 15]).is_err());
    assert!(lda.set_seed(vec![2; 16]).is_err());
    assert!(lda.set_seed(vec![1; 16]).is_ok());
}

#[test]
fn test_invalid_schedule_leaves_archive() {
    let mut lda = LdaGibbs::new(&docs(), 2).expect("model");
    lda.sample(0, 1, 2, false).expect("sample");
    let before = lda.archive().clone();
    assert!(lda.sample(0, 0, 2, true).is_err());
    assert!(lda.sample(0, 1, 0, false).is_err());
    assert_eq!(lda.archive(), &before);
}

#[test]
fn test_results_before_sampling() {
    let lda = LdaGibbs::new(&docs(), 2).expect("model");
    assert!(matches!(lda.doc_topic_mean(), Err(LdaError::NotSampled)));
    assert!(matches!(lda.topic_term_mean(), Err(LdaError::NotSampled)));
    assert!(matches!(lda.perplexity(), Err(LdaError::NotSampled)));
    assert!(matches!(lda.top_words(3), Err(LdaError::NotSampled)));
    assert!(matches!(lda.topic_term_model(), Err(LdaError::NotSampled)));
}

#[test]
fn test_sample_shapes() {
    let mut lda = LdaGibbs::new(&docs(), 3)
        .expect("model")
        .with_priors(0.5, 0.1)
        .expect("priors");
    lda.sample(10, 2, 3, false).expect("sample");

    assert_eq!(lda.n_samples(), 3);
    for snapshot in lda.archive().iter() {
        assert_eq!(snapshot.topics().len(), 16);
        assert_eq!(snapshot.doc_topic().shape(), (4, 3));
        assert_eq!(snapshot.topic_term().shape(), (8, 3));
    }
    assert_eq!(lda.doc_topic_mean().expect("dt").shape(), (4, 3));
    assert_eq!(lda.topic_term_mean().expect("tt").shape(), (8, 3));
}

#[test]
fn test_fresh_run_replaces_archive() {
    let mut lda = LdaGibbs::new(&docs(), 2).expect("model");
    lda.sample(0, 1, 4, false).expect("sample");
    lda.sample(0, 1, 2, false).expect("sample");
    assert_eq!(lda.n_samples(), 2);
}

#[test]
fn test_append_extends_archive() {
    let mut lda = LdaGibbs::new(&docs(), 2).expect("model");
    lda.sample(5, 1, 2, true).expect("first run starts fresh");
    assert_eq!(lda.n_samples(), 2);
    lda.sample(0, 2, 3, true).expect("append");
    assert_eq!(lda.n_samples(), 5);
}

#[test]
fn test_repeated_fresh_runs_identical() {
    let mut lda = LdaGibbs::new(&docs(), 3).expect("model").with_random_seed(5);
    lda.sample(3, 2, 2, false).expect("sample");
    let first = lda.archive().clone();
    lda.sample(3, 2, 2, false).expect("sample");
    assert_eq!(lda.archive(), &first);
}

#[test]
fn test_seed_override_is_used() {
    use crate::chain::run_chain;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    let seed: Vec<usize> = (0..16).map(|i| i % 2).collect();
    let mut lda = LdaGibbs::new(&docs(), 2).expect("model").with_random_seed(9);
    lda.set_seed(seed.clone()).expect("seed");
    lda.sample(2, 1, 1, false).expect("sample");

    // an explicit seed consumes no draws before the first sweep
    let mut rng = StdRng::seed_from_u64(9);
    let schedule = Schedule::new(2, 1, 1).expect("schedule");
    let expected = run_chain(lda.corpus(), 2, lda.priors(), schedule, seed, &mut rng).expect("run");
    assert_eq!(lda.archive().last().expect("sample").topics(), expected[0].as_slice());
}

#[test]
fn test_set_sampled_topics() {
    let mut lda = LdaGibbs::new(&docs(), 2).expect("model");
    let samples = vec![vec![0; 16], vec![1; 16]];
    lda.set_sampled_topics(samples.clone()).expect("valid samples");
    assert_eq!(lda.n_samples(), 2);
    assert_eq!(lda.archive().get(1).expect("second").topics(), samples[1].as_slice());

    let dt = lda.doc_topic_mean().expect("dt");
    assert!(dt.as_slice().iter().all(|&p| (p - 0.5).abs() < 1e-12));
}

#[test]
fn test_set_sampled_topics_validation() {
    let mut lda = LdaGibbs::new(&docs(), 2).expect("model");
    assert!(lda.set_sampled_topics(Vec::new()).is_err());
    assert!(lda.set_sampled_topics(vec![vec![0; 16], vec![0; 15]]).is_err());
    assert_eq!(lda.n_samples(), 0);
}

#[test]
fn test_append_after_set_sampled_topics_resumes_from_last() {
    let mut lda = LdaGibbs::new(&docs(), 2).expect("model");
    lda.set_sampled_topics(vec![vec![1; 16]]).expect("valid samples");
    lda.sample(0, 1, 1, true).expect("append");
    assert_eq!(lda.n_samples(), 2);
    assert_eq!(lda.archive().get(0).expect("installed").topics(), &[1; 16]);
}

#[test]
fn test_perplexity_one_per_sample() {
    let mut lda = LdaGibbs::new(&docs(), 2).expect("model");
    lda.sample(5, 1, 3, false).expect("sample");
    let ppl = lda.perplexity().expect("perplexity");
    assert_eq!(ppl.len(), 3);
    assert!(ppl.iter().all(|p| p.is_finite() && *p > 0.0));
}

#[test]
fn test_top_words() {
    let mut lda = LdaGibbs::new(&docs(), 2)
        .expect("model")
        .with_priors(0.1, 0.01)
        .expect("priors");
    lda.sample(50, 1, 1, false).expect("sample");

    let top = lda.top_words(3).expect("top words");
    assert_eq!(top.len(), 2);
    for words in &top {
        assert_eq!(words.len(), 3);
        assert!(words.windows(2).all(|w| w[0].1 >= w[1].1));
        assert!(words.iter().all(|(t, _)| lda.vocabulary().contains(t)));
    }

    let all = lda.top_words(100).expect("top words");
    assert_eq!(all[0].len(), 8);
}

#[test]
fn test_topic_term_model_export() {
    let mut lda = LdaGibbs::new(&docs(), 3).expect("model");
    lda.sample(0, 1, 2, false).expect("sample");
    let model = lda.topic_term_model().expect("export");
    assert_eq!(model.n_samples(), 2);
    assert_eq!(model.n_topics(), 3);
    assert_eq!(model.vocabulary(), lda.vocabulary());
    assert_eq!(&model.topic_terms()[1], lda.archive().get(1).expect("s").topic_term());
}

#[test]
fn test_from_config() {
    let config = SamplerConfig::from_json(
        r#"{"n_topics": 2, "alpha": 0.2, "random_seed": 3,
            "schedule": {"burnin": 4, "thinning": 2, "samples": 2}}"#,
    )
    .expect("config");
    let lda = LdaGibbs::from_config(&docs(), &config).expect("model");
    assert_eq!(lda.n_samples(), 2);
    assert_eq!(lda.random_seed(), 3);
    assert!((lda.priors().alpha - 0.2).abs() < 1e-12);
    assert!((lda.priors().beta - 200.0 / 8.0).abs() < 1e-12);

    let mut manual = LdaGibbs::new(&docs(), 2)
        .expect("model")
        .with_random_seed(3)
        .with_priors(0.2, 200.0 / 8.0)
        .expect("priors");
    manual.sample(4, 2, 2, false).expect("sample");
    assert_eq!(manual.archive(), lda.archive());
}

#[test]
fn test_lda_debug() {
    let lda = LdaGibbs::new(&docs(), 2).expect("model");
    let debug_str = format!("{lda:?}");
    assert!(debug_str.contains("LdaGibbs"));
    assert!(debug_str.contains("n_topics"));
}
