//! Topic discovery on a small news corpus.
//!
//! Trains a two-topic model, prints the top words of each topic, then
//! infers topic mixtures for unseen headlines.
//!
//! Run with `RUST_LOG=debug` to see chain progress.

use aprender_lda::prelude::*;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let corpus = [
        "stocks rally as bank earnings beat forecasts",
        "central bank holds interest rate steady",
        "market prices fall on trade worries",
        "striker scores twice as team wins the match",
        "coach praises defense after cup match",
        "team extends winning run to ten games",
        "investors watch bond market and rate outlook",
        "late goal sends team into cup final",
    ];
    let docs: Vec<Vec<&str>> = corpus.iter().map(|d| d.split_whitespace().collect()).collect();

    let mut lda = LdaGibbs::new(&docs, 2)?.with_random_seed(2024).with_priors(0.5, 0.05)?;
    lda.sample(500, 20, 10, false)?;

    println!("Topics:");
    for (k, words) in lda.top_words(5)?.iter().enumerate() {
        let terms: Vec<String> = words.iter().map(|(t, p)| format!("{t} ({p:.3})")).collect();
        println!("  topic {k}: {}", terms.join(", "));
    }

    let ppl = lda.perplexity()?;
    let mean_ppl = ppl.iter().sum::<f64>() / ppl.len() as f64;
    println!("Mean perplexity over {} samples: {mean_ppl:.2}", ppl.len());

    let headlines = [
        "bank cuts rate as market slides",
        "team wins cup final with late goal",
    ];
    let new_docs: Vec<Vec<&str>> = headlines.iter().map(|d| d.split_whitespace().collect()).collect();

    let mut query = QueryGibbs::new(&new_docs, lda.topic_term_model()?)?;
    query.set_priors(0.5)?;
    query.query(50)?;

    let theta = query.doc_topic_mean()?;
    println!("Query mixtures:");
    for (d, headline) in headlines.iter().enumerate() {
        println!("  {headline:<40} {:?}", theta.row(d));
    }

    Ok(())
}
