use std::path::Path;

use indicatif::{ProgressBar, ProgressStyle};
use larder_core::config::Config;
use larder_core::corpus::{build_corpus, load_eval_queries, load_recipes};
use larder_core::logging::init_tracing;
use larder_text::eval::evaluate_with;
use larder_text::TfidfIndex;

fn main() -> anyhow::Result<()> {
    let settings = Config::load().map_err(|e| { eprintln!("Error loading config: {}", e); e })?.settings()?;
    init_tracing(&settings.logging);
    let base = Path::new(".");

    let recipes = load_recipes(&settings.data.recipes_path(base))?;
    let (documents, metadata) = build_corpus(&recipes);
    let mut index = TfidfIndex::from_config(&settings.search);
    index.fit(documents, metadata)?;

    let queries = load_eval_queries(&settings.data.eval_queries_path(base))?;
    let k = settings.search.top_k;
    let pb = ProgressBar::new(queries.len() as u64);
    pb.set_style(ProgressStyle::default_bar().template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} queries")?.progress_chars("#>-"));
    let report = evaluate_with(&index, &queries, k, || pb.inc(1))?;
    pb.finish_and_clear();

    println!("Precision@{}: {:.3}", report.k, report.precision);
    println!("Recall@{}:    {:.3}", report.k, report.recall);
    Ok(())
}
