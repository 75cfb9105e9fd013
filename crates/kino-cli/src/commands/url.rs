use anyhow::{Context, Result};
use kino_router::{Config, Params};

pub fn execute(config: &Config, name: &str, params: Vec<(String, String)>) -> Result<()> {
    let table = config.build_table()?;
    let params: Params = params.into_iter().collect();

    let url = table
        .url_for(name, &params)
        .with_context(|| format!("Failed to build URL for route `{}`", name))?;
    println!("{}", url);

    Ok(())
}
