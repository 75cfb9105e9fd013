use anyhow::Result;
use colored::Colorize;
use kino_router::Config;

pub fn execute(config: &Config) -> Result<()> {
    let table = config.build_table()?;

    println!("{}", "Route table".green().bold());
    println!();

    for route in table.routes() {
        println!(
            "  {:<20} {:<16} {:<14} {}",
            route.path.cyan(),
            route.name.bold(),
            route.page.as_str(),
            route.title().unwrap_or("-")
        );
    }

    println!();
    println!("Fallback: {}", table.not_found().name.yellow());

    Ok(())
}
