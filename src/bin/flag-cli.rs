use clap::{Parser, Subcommand};
use flag_sdk::{FlagClient, SubmitOutcome};

#[derive(Parser)]
#[command(name = "flag-cli")]
#[command(about = "Command-line client for the flag service", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:8787")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show how many flags are stored
    Count,
    /// List a page of flags, newest first
    List {
        #[arg(long, default_value_t = 0)]
        offset: i64,
        #[arg(long, default_value_t = 10)]
        limit: i64,
    },
    /// Submit a flag as an ordered list of colors
    Submit {
        #[arg(required = true)]
        colors: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = FlagClient::new(&cli.url);

    match cli.command {
        Commands::Count => {
            println!("{}", client.count().await?);
        }
        Commands::List { offset, limit } => {
            let page = client.list(offset, limit).await?;
            println!("{}", serde_json::to_string_pretty(&page)?);
        }
        Commands::Submit { colors } => match client.submit(&colors).await? {
            SubmitOutcome::Created => println!("Flag stored"),
            SubmitOutcome::Rejected => {
                eprintln!("Error: submission rejected (no six-digit hex color found)");
                std::process::exit(1);
            }
        },
    }

    Ok(())
}
