use std::path::Path;

use larder_agent::CookingAgent;
use larder_core::config::Config;
use larder_core::logging::init_tracing;
use larder_core::types::Constraints;

fn main() -> anyhow::Result<()> {
    let settings = Config::load().map_err(|e| { eprintln!("Error loading config: {}", e); e })?.settings()?;
    init_tracing(&settings.logging);

    let agent = CookingAgent::new(&settings, Path::new("."))?;

    let query = "I need a cheap vegan dinner under 20 minutes";
    let constraints = Constraints::new()
        .with("budget", "low")
        .with("diet", "vegan")
        .with("time_minutes_max", 20);
    tracing::info!(query, "running example recommendation");

    println!("{}", agent.recommend(query, &constraints, settings.search.top_k)?);
    Ok(())
}
