use anyhow::Result;

mod app;
mod chat;
mod config;
mod handler;
mod openai;
mod search;
mod tui;
mod ui;

use app::App;
use config::Config;
use openai::OpenAiClient;
use search::SearchClient;
use tui::EventHandler;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::load().unwrap_or_else(|_| Config::new());

    // Resolve the API key: env var first, then config file. Missing key is
    // fatal before any UI or turn logic runs.
    let api_key = std::env::var("OPENAI_API_KEY").ok()
        .or_else(|| config.openai_api_key.clone());

    let api_key = match api_key {
        Some(key) => key,
        None => {
            eprintln!("Please set the OPENAI_API_KEY environment variable (or add openai_api_key to the config file).");
            std::process::exit(1);
        }
    };

    let openai = OpenAiClient::new(&api_key);
    let search = SearchClient::new(&config.search_url());
    let mut app = App::new(openai, search, config.model());

    tui::install_panic_hook();
    let mut terminal = tui::init()?;
    let mut events = EventHandler::new();

    let result = run(&mut terminal, &mut events, &mut app).await;

    tui::restore()?;
    result
}

async fn run(terminal: &mut tui::Tui, events: &mut EventHandler, app: &mut App) -> Result<()> {
    while !app.should_quit {
        terminal.draw(|frame| ui::render(app, frame))?;

        if let Some(event) = events.next().await {
            handler::handle_event(app, event)?;
        }

        // Completion failures propagate from here and end the session.
        app.check_turn().await?;
    }

    Ok(())
}
