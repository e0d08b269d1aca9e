use anyhow::Context;
use crossterm::{
    event, execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use log::{error, info};
use ratatui::prelude::*;
use simplelog::{Config, LevelFilter, WriteLogger};
use snekboard::config::LOG_FILE;
use snekboard::session::Game;
use snekboard::store::{FileStore, Records};
use snekboard::{input, ui};
use std::fs::File;
use std::io::{self, Stdout};
use std::time::{Duration, Instant};

fn main() -> anyhow::Result<()> {
    // Set up logging before anything else
    WriteLogger::init(
        LevelFilter::Info,
        Config::default(),
        File::create(LOG_FILE).context("failed to create the log file")?,
    )?;

    info!("Starting Snekboard");

    let records = Records::open(FileStore::new("."))
        .context("failed to load the score and player records")?;
    let mut game = Game::new(records);

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let outcome = run(&mut terminal, &mut game);

    // Cleanup terminal, even when the game failed
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(e) = &outcome {
        error!("Snekboard stopped: {:#}", e);
    }
    outcome?;

    let standings = game
        .records()
        .leaderboard(game.config().final_leaderboard_len);
    if standings.is_empty() {
        println!("No scores recorded yet.");
    } else {
        println!("BEST SCORES");
        for (rank, standing) in standings.iter().enumerate() {
            println!(
                "{:>2}. {:<20} - Score: {:>4} (Games: {})",
                rank + 1,
                standing.name,
                standing.best,
                standing.games
            );
        }
    }
    println!("Thanks for playing!");
    info!("Exiting Snekboard");

    Ok(())
}

fn run(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    game: &mut Game<FileStore>,
) -> anyhow::Result<()> {
    while !game.is_finished() {
        terminal.draw(|f| ui::render(f, &*game, Instant::now()))?;

        // Drain everything that is pending before time moves on
        if event::poll(game.frame_budget(Instant::now()))? {
            loop {
                if let Some(input) = input::translate(event::read()?) {
                    game.handle_input(input, Instant::now())
                        .context("failed to save records")?;
                }
                if game.is_finished() || !event::poll(Duration::ZERO)? {
                    break;
                }
            }
        }

        game.update(Instant::now())
            .context("failed to save records")?;
    }

    Ok(())
}
