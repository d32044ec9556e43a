use aqariy_price::adapters::HttpListingSource;
use aqariy_price::utils::{error::PriceError, logger, validation::Validate};
use aqariy_price::{config, LocalStorage, ScrapeEngine, ScrapePipeline};
use clap::Parser;

#[derive(Debug, Parser)]
#[command(name = "scrape_listings")]
#[command(about = "Scrape apartment listings into a CSV file")]
struct Args {
    #[arg(short, long, help = "Path to a TOML config file")]
    config: Option<String>,

    #[arg(long, help = "Number of listing pages to read")]
    pages: Option<u32>,

    #[arg(long, help = "Directory for the CSV output")]
    output_path: Option<String>,

    #[arg(short, long, help = "Enable verbose output")]
    verbose: bool,
}

async fn run(args: &Args) -> Result<String, PriceError> {
    let mut config = config::load_config(args.config.as_deref())?;
    if let Some(pages) = args.pages {
        config.scraper.pages = pages;
    }
    if let Some(output_path) = &args.output_path {
        config.scraper.output_path = output_path.clone();
    }
    config.validate()?;

    let scraper = config.scraper;
    let storage = LocalStorage::new(scraper.output_path.clone());
    let source = HttpListingSource::from_config(&scraper)?;
    let engine = ScrapeEngine::new(ScrapePipeline::new(storage, scraper, source));

    engine.run().await
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    logger::init_cli_logger(args.verbose);

    match run(&args).await {
        Ok(output_path) => {
            println!("✅ Scrape completed successfully!");
            println!("📁 Output saved to: {}", output_path);
        }
        Err(e) => {
            tracing::error!(
                "❌ Scrape failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());
            eprintln!("❌ {}", e.user_friendly_message());

            let exit_code = e.severity().exit_code();
            if exit_code > 0 {
                std::process::exit(exit_code);
            }
        }
    }

    Ok(())
}
