use std::time::Duration;

use console::style;
use router_config::SearchConfig;
use router_core::{Result, RouterError};
use router_hub::SearchClient;

use crate::progress::create_spinner;

const DEV_NOTE: &str = "Note: The search API is currently under development.\n\
                        Please use the \"add\" command directly with GitHub URLs.";

pub(super) async fn cmd_search(
    config: &SearchConfig,
    keyword: &str,
    page: u32,
    page_size: Option<u32>,
) -> Result<()> {
    let client = SearchClient::new(
        &config.endpoint,
        page_size.unwrap_or(config.page_size),
        Duration::from_secs(config.timeout_secs),
    )?;

    let spinner = create_spinner("Searching skills...");
    let searched = client.search(keyword, page).await;
    spinner.finish_and_clear();

    let page = match searched {
        Ok(page) => page,
        Err(e) => {
            if matches!(e, RouterError::Api { .. } | RouterError::Network(_)) {
                eprintln!("{}", style(DEV_NOTE).dim());
            }
            return Err(e);
        }
    };

    if page.malformed {
        eprintln!(
            "{}",
            style("The API returned an unexpected response format.").yellow()
        );
    }
    println!("{} Found {} skill(s)", style("✔").green(), page.total);

    if page.results.is_empty() {
        println!(
            "\n{}",
            style("No skills found matching your search.").yellow()
        );
        println!("\n{}", style(DEV_NOTE).dim());
        return Ok(());
    }

    println!("\n{} {keyword}\n", style("Search Results:").bold());
    for (i, skill) in page.results.iter().enumerate() {
        println!("{}", style(format!("{}. {}", i + 1, skill.name)).cyan());
        if !skill.description.is_empty() {
            println!("   {}", skill.description);
        }
        println!(
            "   {}",
            style(format!("Repository: {}", skill.repository)).dim()
        );
        println!(
            "   {}",
            style(format!("Author: {} | ⭐ {}", skill.author, skill.stars)).dim()
        );
        println!();
    }
    println!(
        "{}",
        style(format!("Page {} of {}", page.page, page.total_pages())).dim()
    );
    Ok(())
}
