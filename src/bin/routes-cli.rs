use clap::{Parser, Subcommand};
use serde_json::Value;

#[derive(Parser)]
#[command(name = "routes-cli")]
#[command(about = "Inspect a running resource-router server", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:8080")]
    url: String,

    /// Path of the route listing endpoint
    #[arg(short, long, default_value = "/_routes")]
    routes_path: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List every compiled route
    Routes {
        /// Only routes owned by this resource
        #[arg(short, long)]
        resource: Option<String>,
    },
    /// GET a path and print the response
    Get { path: String },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();

    match cli.command {
        Commands::Routes { resource } => {
            let res = client
                .get(format!("{}{}", cli.url, cli.routes_path))
                .send()
                .await?;
            if !res.status().is_success() {
                eprintln!("Error: route listing returned status {}", res.status());
                std::process::exit(1);
            }

            let routes: Vec<Value> = res.json().await?;
            for route in routes {
                let owner = route["resource"].as_str().unwrap_or_default();
                if resource.as_deref().is_some_and(|r| r != owner) {
                    continue;
                }
                println!(
                    "{:<7} {:<55} {:<10} {}",
                    route["method"].as_str().unwrap_or_default(),
                    route["path"].as_str().unwrap_or_default(),
                    owner,
                    route["action"].as_str().unwrap_or_default(),
                );
            }
        }
        Commands::Get { path } => {
            let res = client.get(format!("{}{}", cli.url, path)).send().await?;
            print_response(res).await?;
        }
    }

    Ok(())
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    let text = res.text().await?;
    if !status.is_success() {
        eprintln!("Error: server returned status {}", status);
        eprintln!("{}", text);
        std::process::exit(1);
    }

    match serde_json::from_str::<Value>(&text) {
        Ok(json) => println!("{}", serde_json::to_string_pretty(&json)?),
        Err(_) => println!("{}", text),
    }
    Ok(())
}
