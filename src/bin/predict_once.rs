use aqariy_price::domain::model::{InputRecord, PredictResponse};
use aqariy_price::utils::{error::PriceError, logger};
use aqariy_price::{config, load_service};
use clap::Parser;
use std::io::Read;

#[derive(Debug, Parser)]
#[command(name = "predict_once")]
#[command(about = "Predict the price of one apartment described as JSON")]
struct Args {
    #[arg(short, long, help = "Path to a TOML config file")]
    config: Option<String>,

    #[arg(short, long, default_value = "-", help = "JSON input file, or - for stdin")]
    input: String,

    #[arg(short, long, help = "Enable verbose output")]
    verbose: bool,
}

fn read_input(path: &str) -> Result<String, PriceError> {
    if path == "-" {
        let mut buffer = String::new();
        std::io::stdin().read_to_string(&mut buffer)?;
        Ok(buffer)
    } else {
        Ok(std::fs::read_to_string(path)?)
    }
}

async fn run(args: &Args) -> Result<PredictResponse, PriceError> {
    let config = config::load_config(args.config.as_deref())?;
    let service = load_service(&config).await?;

    let record: InputRecord = serde_json::from_str(&read_input(&args.input)?)?;
    let predicted_price = service.predict(&record)?;

    Ok(PredictResponse { predicted_price })
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    logger::init_cli_logger(args.verbose);

    match run(&args).await {
        Ok(response) => {
            println!("{}", serde_json::to_string(&response)?);
            Ok(())
        }
        Err(e) => {
            tracing::error!("❌ Prediction failed: {} (Severity: {:?})", e, e.severity());
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 建議: {}", e.recovery_suggestion());
            std::process::exit(e.severity().exit_code().max(1));
        }
    }
}
