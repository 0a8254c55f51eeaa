use clap::{Parser, Subcommand};
use colored::*;
use anyhow::Result;

mod app;
mod assistant;
mod chat;
mod config;
mod handler;
mod logging;
mod tui;
mod ui;

use app::App;
use assistant::AssistantClient;
use config::Config;

#[derive(Parser)]
#[command(name = "barberexpress")]
#[command(about = "Chat with the Barber Express booking assistant")]
struct Cli {
    /// Assistant base URL (overrides the config file)
    #[arg(short, long)]
    endpoint: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Open the interactive chat (default)
    Chat,
    /// Send a single question and print the reply
    Ask {
        /// Your question
        message: String,
    },
    /// Save the assistant endpoint to the config file
    SetEndpoint {
        /// Assistant base URL
        url: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = Config::load().unwrap_or_else(|_| Config::new());
    let endpoint = cli.endpoint.unwrap_or_else(|| config.endpoint().to_string());
    let assistant = AssistantClient::new(&endpoint);

    match cli.command.unwrap_or(Commands::Chat) {
        Commands::Chat => run_chat(assistant).await,
        Commands::Ask { message } => ask_once(&assistant, &message).await,
        Commands::SetEndpoint { url } => set_endpoint(config, &url),
    }
}

fn set_endpoint(mut config: Config, url: &str) -> Result<()> {
    config.endpoint = Some(url.trim_end_matches('/').to_string());
    config.save()?;
    println!("{} {}", "Endpoint saved:".green(), config.endpoint());
    Ok(())
}

async fn run_chat(assistant: AssistantClient) -> Result<()> {
    let _guard = logging::init_tracing()?;
    tracing::info!(endpoint = assistant.base_url(), "starting chat session");

    tui::install_panic_hook();
    let mut terminal = tui::init()?;
    let mut events = tui::EventHandler::new();
    let mut app = App::new(assistant);

    let result = run_loop(&mut terminal, &mut events, &mut app).await;

    tui::restore()?;
    result
}

async fn run_loop(
    terminal: &mut tui::Tui,
    events: &mut tui::EventHandler,
    app: &mut App,
) -> Result<()> {
    while !app.should_quit {
        // Render the user interface.
        terminal.draw(|frame| ui::render(app, frame))?;

        // Handle the next event.
        match events.next().await {
            Some(event) => handler::handle_event(app, event).await?,
            None => break,
        }
    }

    Ok(())
}

async fn ask_once(assistant: &AssistantClient, message: &str) -> Result<()> {
    let message = message.trim();
    if message.is_empty() {
        return Ok(());
    }

    println!("{} {}", "You:".bold().cyan(), message);

    match assistant.ask(message).await {
        Ok(reply) => {
            println!("{}", "Assistant:".bold().yellow());
            println!("{}", reply);
        }
        Err(e) => {
            println!("{}: {}", "Error talking to the assistant".red(), e);
            println!(
                "Make sure the assistant server is running at {}",
                assistant.base_url().bold()
            );
        }
    }

    Ok(())
}
