use crate::food::FoodSpawner;
use crate::palette::{Rgb, PALETTE};
use crate::session::{Countdown, Game, GameOverSummary, NameEntry, Screen, SessionState};
use crate::sim::{Crash, SnekHaus};
use crate::store::{RecordStore, Standing};
use rand::{rngs::StdRng, Rng, SeedableRng};
use ratatui::{
    prelude::*,
    style::{Style, Stylize},
    widgets::*,
};
use std::time::Instant;

const MORSEL_SYMBOL: &str = "●";
const GOLD: Color = Color::Rgb(255, 215, 0);
const SPARK_COUNT: usize = 50;

fn color(rgb: Rgb) -> Color {
    Color::Rgb(rgb.0, rgb.1, rgb.2)
}

pub fn render<S: RecordStore, F: FoodSpawner>(
    frame: &mut Frame,
    game: &Game<S, F>,
    now: Instant,
) {
    let area = frame.area();
    let standings = game
        .records()
        .leaderboard(game.config().menu_leaderboard_len);
    match game.screen() {
        Screen::Menu => render_menu(frame, area, &standings),
        Screen::NameEntry(entry) => render_name_entry(frame, area, entry, &standings),
        Screen::Countdown(countdown) => render_countdown(frame, area, countdown, now),
        Screen::Playing(session) => {
            render_session(frame, area, session, "Playing");
        }
        Screen::Paused(session) => {
            let inner = render_session(frame, area, session, "Paused");
            render_pause_overlay(frame, inner, session);
        }
        Screen::GameOver(summary) if summary.is_celebrating(now) => {
            let started = summary
                .celebrate_until
                .map(|until| until - game.config().celebration);
            render_celebration(frame, area, summary, started, now);
        }
        Screen::GameOver(summary) => render_game_over(frame, area, summary),
        Screen::Terminal => {}
    }
}

fn leaderboard_lines(standings: &[Standing]) -> Vec<Line<'static>> {
    if standings.is_empty() {
        return vec![Line::from("No scores yet".dark_gray())];
    }
    standings
        .iter()
        .enumerate()
        .map(|(rank, standing)| {
            Line::from(format!(
                "{:>2}. {:<20} {:>5}",
                rank + 1,
                standing.name,
                standing.best
            ))
        })
        .collect()
}

fn render_menu(frame: &mut Frame, area: Rect, standings: &[Standing]) {
    let mut lines = vec![
        Line::from("SNEK".green().bold()),
        Line::from(""),
        Line::from("BEST SCORES".light_blue()),
    ];
    lines.extend(leaderboard_lines(standings));
    lines.push(Line::from(""));
    lines.push(Line::from("Press ENTER to start, Q to quit".bold()));

    frame.render_widget(
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL)),
        area,
    );
}

fn render_name_entry(frame: &mut Frame, area: Rect, entry: &NameEntry, standings: &[Standing]) {
    let typed = Span::styled(entry.typed.clone(), Style::default().fg(Color::LightGreen));
    let name_line = match &entry.suggestion {
        Some(suggestion) => {
            let rest: String = suggestion.chars().skip(entry.typed.chars().count()).collect();
            Line::from(vec![typed, rest.dark_gray()])
        }
        None => Line::from(vec![typed, "_".light_green()]),
    };

    let mut swatches = Vec::new();
    for (i, swatch) in PALETTE.iter().enumerate() {
        let (open, close) = if i == entry.color { ("[", "]") } else { (" ", " ") };
        swatches.push(Span::raw(open));
        swatches.push(Span::styled("    ", Style::default().bg(color(swatch.rgb))));
        swatches.push(Span::raw(close));
    }

    let mut lines = vec![
        Line::from("WELCOME!".light_blue().bold()),
        Line::from(""),
        Line::from("What's your name?"),
        name_line,
    ];
    match &entry.suggestion {
        Some(suggestion) => lines.push(Line::from(
            format!("Press TAB to accept the suggestion: {}", suggestion).dark_gray(),
        )),
        None => lines.push(Line::from("")),
    }
    lines.extend([
        Line::from(""),
        Line::from("Pick your snek's colour:"),
        Line::from(swatches),
        Line::from(PALETTE[entry.color].name),
        Line::from(""),
        Line::from("<- -> to change colour | ENTER to confirm"),
        Line::from(""),
        Line::from("BEST SCORES".light_blue()),
    ]);
    lines.extend(leaderboard_lines(standings));

    frame.render_widget(
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL)),
        area,
    );
}

fn render_countdown(frame: &mut Frame, area: Rect, countdown: &Countdown, now: Instant) {
    let lines = vec![
        Line::from(countdown.title.clone().light_green().bold()),
        Line::from(""),
        Line::from("Get ready..."),
        Line::from(""),
        Line::from(Span::styled(
            countdown.seconds_left(now).to_string(),
            Style::default().fg(GOLD).bold(),
        )),
    ];

    frame.render_widget(
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL)),
        area,
    );
}

/// Draws the arena with its frame and returns the area inside the frame.
fn render_session(frame: &mut Frame, area: Rect, session: &SessionState, label: &str) -> Rect {
    let block = Block::default()
        .title(format!(
            "{}  Player: {}  Score: {}",
            label, session.player.name, session.haus.score
        ))
        .borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let arena = ArenaView {
        haus: &session.haus,
        rgb: PALETTE[session.player.color].rgb,
    };
    if arena.fits(inner) {
        frame.render_widget(arena, inner);
    } else {
        frame.render_widget(
            Paragraph::new("Terminal too small for the arena")
                .alignment(Alignment::Center),
            inner,
        );
    }
    inner
}

fn render_pause_overlay(frame: &mut Frame, area: Rect, session: &SessionState) {
    let lines = vec![
        Line::from("PAUSE".red().bold()),
        Line::from(""),
        Line::from(format!("Player: {}", session.player.name)),
        Line::from(format!("Score: {}", session.haus.score).light_blue()),
        Line::from(""),
        Line::from("SPACE to resume | ESC to quit".light_green()),
    ];
    let popup = centered(area, 40, lines.len() as u16 + 2);

    frame.render_widget(Clear, popup);
    frame.render_widget(
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL)),
        popup,
    );
}

fn render_game_over(frame: &mut Frame, area: Rect, summary: &GameOverSummary) {
    let cause = match summary.crash {
        Some(Crash::Wall) => "You hit a wall",
        Some(Crash::Itself) => "You bit yourself",
        None => "You gave up",
    };
    let best_line = if summary.is_new_record() {
        Line::from(Span::styled("NEW RECORD!", Style::default().fg(GOLD).bold()))
    } else {
        Line::from(format!("Best score: {}", summary.previous_best).light_green())
    };

    let lines = vec![
        Line::from("GAME OVER!".red().bold()),
        Line::from(cause),
        Line::from(""),
        Line::from(format!("Player: {}", summary.player.name)),
        Line::from(format!("Score: {}", summary.score).light_blue()),
        best_line,
        Line::from(""),
        Line::from("[R] Play again with the same name"),
        Line::from("[A] Another player"),
        Line::from("[Q] Quit"),
    ];

    frame.render_widget(
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL)),
        area,
    );
}

fn render_celebration(
    frame: &mut Frame,
    area: Rect,
    summary: &GameOverSummary,
    started: Option<Instant>,
    now: Instant,
) {
    let block = Block::default().borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let elapsed = started.map_or(0, |started| now.saturating_duration_since(started).as_millis());
    let fallen = (elapsed / 100) as u16;
    // Same seed every frame so each spark keeps its column and speed
    let mut rng = StdRng::seed_from_u64(u64::from(summary.score));
    let buf = frame.buffer_mut();
    for _ in 0..SPARK_COUNT {
        if inner.width == 0 || inner.height == 0 {
            break;
        }
        let x = inner.x + rng.gen_range(0..inner.width);
        let y = rng.gen_range(0..inner.height.div_ceil(2).max(1));
        let speed: u16 = rng.gen_range(1..=3);
        let rgb = PALETTE[rng.gen_range(0..PALETTE.len())].rgb;
        let y = y.saturating_add(fallen.saturating_mul(speed));
        if y < inner.height {
            buf[(x, inner.y + y)].set_symbol("■").set_fg(color(rgb));
        }
    }

    frame.render_widget(
        Paragraph::new(Line::from(Span::styled(
            format!("RECORD! {}", summary.score),
            Style::default().fg(GOLD).bold(),
        )))
        .alignment(Alignment::Center),
        Rect {
            y: inner.y + inner.height / 3,
            height: 1.min(inner.height),
            ..inner
        },
    );
}

fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

/// The arena, two terminal columns per cell
struct ArenaView<'a> {
    haus: &'a SnekHaus,
    rgb: Rgb,
}

impl ArenaView<'_> {
    fn fits(&self, area: Rect) -> bool {
        i32::from(area.width) >= self.haus.size.width * 2
            && i32::from(area.height) >= self.haus.size.height
    }
}

impl Widget for ArenaView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let mut paint = |x: i32, y: i32, symbol: &str, style: Style| {
            let col = area.x + (x * 2) as u16;
            let row = area.y + y as u16;
            buf[(col, row)].set_symbol(symbol).set_style(style);
            buf[(col + 1, row)].set_symbol(" ").set_style(style);
        };

        for morsel in &self.haus.morsels {
            paint(
                morsel.x,
                morsel.y,
                MORSEL_SYMBOL,
                Style::default().fg(Color::Red),
            );
        }

        let body = Style::default().bg(color(self.rgb));
        for pos in self.haus.snek.body.iter().skip(1) {
            paint(pos.x, pos.y, " ", body);
        }

        let head = self.haus.snek.head();
        paint(
            head.x,
            head.y,
            " ",
            Style::default().bg(color(self.rgb.brightened(100))),
        );
    }
}
