mod app;
mod handler;
mod logging;
mod tui;
mod ui;

use anyhow::Result;
use folio_core::Config;
use tokio::time::{sleep_until, Instant};
use tracing::{info, warn};

use app::App;
use tui::{EventHandler, Tui};

#[tokio::main]
async fn main() -> Result<()> {
    match logging::init() {
        Ok(path) => info!(path = %path.display(), "Logging to file"),
        Err(e) => eprintln!("Logging disabled: {}", e),
    }

    let config = Config::load().unwrap_or_else(|e| {
        warn!(error = %e, "Could not load config, using defaults");
        Config::new()
    });
    let app = App::new(config);

    tui::install_panic_hook();
    let mut terminal = tui::init()?;
    let result = run(&mut terminal, app).await;
    tui::restore()?;

    if let Err(e) = &result {
        tracing::error!(error = %e, "Exited with error");
    }
    result
}

async fn run(terminal: &mut Tui, mut app: App) -> Result<()> {
    let mut events = EventHandler::new();

    loop {
        // Collect replies, step tool batches and revert highlights before drawing
        let wake = app.controller.poll(Instant::now());
        app.follow_transcript();

        terminal.draw(|frame| ui::render(&mut app, frame))?;

        if app.should_quit {
            break;
        }

        let event = match wake {
            Some(deadline) => tokio::select! {
                event = events.next() => event,
                _ = sleep_until(deadline) => continue,
            },
            None => events.next().await,
        };

        match event {
            Some(event) => handler::handle_event(&mut app, event).await?,
            None => break,
        }
    }

    info!("Shutting down");
    Ok(())
}
