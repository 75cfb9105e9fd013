use anyhow::Result;
use colored::Colorize;
use kino_router::Config;

pub fn execute(config: &Config, location: &str) -> Result<()> {
    let table = config.build_table()?;
    let resolved = table.resolve(location);

    let name = if resolved.name() == table.not_found().name {
        resolved.name().yellow()
    } else {
        resolved.name().green()
    };

    println!("Route:  {}", name.bold());
    println!("Path:   {}", resolved.path().cyan());
    println!("Page:   {}", resolved.page());
    println!(
        "Title:  {}",
        resolved
            .title()
            .unwrap_or(config.router.default_title.as_str())
    );

    if !resolved.params().is_empty() {
        let mut params: Vec<_> = resolved.params().iter().collect();
        params.sort();
        println!("Params:");
        for (key, value) in params {
            println!("  {} = {}", key.cyan(), value);
        }
    }
    if let Some(query) = resolved.query() {
        println!("Query:  {}", query);
    }
    if let Some(hash) = resolved.hash() {
        println!("Hash:   {}", hash);
    }

    Ok(())
}
