use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;

use anyhow::Result;
use chatbox_envoy::{config, ui, ApiClient, Config};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse args
    let args: Vec<String> = std::env::args().collect();
    let command = args.get(1).map(|s| s.as_str()).unwrap_or("chat");

    // The chat screen owns the terminal, so its logs go to a file
    if command == "chat" {
        init_logging(Some(&config::log_path()?))?;
    } else {
        init_logging(None)?;
    }

    let mut config = match Config::load() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load config: {}", e);
            return Err(e);
        }
    };

    let client = ApiClient::new(config.server_url.clone(), config.user_id.clone());

    match command {
        "chat" => {
            ui::interactive_chat(client).await?;
        }
        "config" => {
            if args.len() < 3 {
                println!("Current config:");
                println!("  Server URL: {}", config.server_url);
                println!("  User ID: {}", config.user_id);
            } else if args[2] == "set" && args.len() >= 5 {
                match args[3].as_str() {
                    "server" => {
                        config.server_url = args[4].clone();
                        config.save()?;
                        println!("Server URL updated to: {}", config.server_url);
                    }
                    "user" => {
                        config.user_id = args[4].clone();
                        config.save()?;
                        println!("User ID updated to: {}", config.user_id);
                    }
                    _ => print_usage(),
                }
            } else {
                print_usage();
            }
        }
        "help" | "--help" | "-h" => print_usage(),
        message => {
            // Treat any other argument as a message
            ui::single_message(client, message.to_string()).await?;
        }
    }

    Ok(())
}

fn init_logging(log_file: Option<&Path>) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    match log_file {
        Some(path) => {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            tracing_subscriber::registry()
                .with(filter)
                .with(
                    tracing_subscriber::fmt::layer()
                        .with_ansi(false)
                        .with_writer(Mutex::new(file)),
                )
                .init();
        }
        None => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
                .init();
        }
    }

    Ok(())
}

fn print_usage() {
    println!("Envoy - chat client for the Chatbox server");
    println!("\nUsage:");
    println!("  envoy chat                    Start interactive chat");
    println!("  envoy \"your message\"          Send a single message");
    println!("  envoy config                  Show current configuration");
    println!("  envoy config set server URL   Set server URL");
    println!("  envoy config set user ID      Set user ID sent with messages");
}
