use std::cell::RefCell;
use std::rc::Rc;

use anyhow::{Context, Result};
use colored::Colorize;
use kino_router::{title_hook, Config, DocumentTitle};

pub fn execute(config: &Config, locations: &[String], back: usize) -> Result<()> {
    let router = config.build_router()?;
    let document = Rc::new(RefCell::new(DocumentTitle::new()));
    router.before_each(title_hook(document.clone()));

    println!("{}", "Navigating...".green().bold());
    println!();

    for location in locations {
        let resolved = router
            .navigate(location)
            .with_context(|| format!("Navigation to {} failed", location))?;
        print_step("→", &resolved.href(), resolved.name(), &document);
    }

    for _ in 0..back {
        let resolved = router.back().context("Cannot go back")?;
        print_step("←", &resolved.href(), resolved.name(), &document);
    }

    println!();
    println!(
        "Titles applied: {}",
        document.borrow().applied().len().to_string().bold()
    );

    Ok(())
}

fn print_step(arrow: &str, href: &str, name: &str, document: &Rc<RefCell<DocumentTitle>>) {
    println!(
        "  {} {:<24} {:<14} {}",
        arrow,
        href.cyan(),
        name,
        document.borrow().current().unwrap_or("-")
    );
}
