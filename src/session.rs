//! Screen-to-screen flow around a play session.
//!
//! [`Game`] owns the current [`Screen`] and moves between screens in
//! response to [`Input`] and to the passage of time. Each screen's data
//! travels inside its variant, so a transition consumes the old screen and
//! produces the next one.

use crate::config::GameConfig;
use crate::food::{FoodSpawner, RandomSpawner};
use crate::grid::Direction;
use crate::palette::{self, PALETTE};
use crate::sim::{Crash, SnekHaus, StepResult};
use crate::store::{RecordStore, Records};
use log::{debug, info};
use std::io;
use std::time::{Duration, Instant};

/// What the presentation layer reports, already stripped of key codes
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Input {
    Char(char),
    Backspace,
    Tab,
    Enter,
    Escape,
    Arrow(Direction),
    /// The window (or terminal) is going away
    Close,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Player {
    pub name: String,
    /// Index into [`PALETTE`]
    pub color: usize,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NameEntry {
    pub typed: String,
    pub color: usize,
    pub suggestion: Option<String>,
    color_picked: bool,
}

impl NameEntry {
    fn refresh_suggestion<'a>(&mut self, known: impl Iterator<Item = &'a str>) {
        self.suggestion = suggest(known, &self.typed).map(str::to_string);
    }
}

/// First of `known` that starts with `typed`, ignoring case.
pub fn suggest<'a>(mut known: impl Iterator<Item = &'a str>, typed: &str) -> Option<&'a str> {
    if typed.is_empty() {
        return None;
    }
    let typed = typed.to_lowercase();
    known.find(|name| name.to_lowercase().starts_with(&typed))
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Countdown {
    pub title: String,
    pub player: Player,
    pub ends_at: Instant,
}

impl Countdown {
    /// Whole seconds left, rounded up and never below one
    pub fn seconds_left(&self, now: Instant) -> u64 {
        let remaining = self.ends_at.saturating_duration_since(now).as_millis() as u64;
        remaining.div_ceil(1000).max(1)
    }
}

/// A session in progress
#[derive(Clone, Debug, PartialEq)]
pub struct SessionState {
    pub haus: SnekHaus,
    /// Latest accepted steering input since the last tick
    pub requested: Direction,
    pub player: Player,
    pub next_tick: Instant,
}

impl SessionState {
    fn new(
        player: Player,
        config: &GameConfig,
        spawner: &mut impl FoodSpawner,
        now: Instant,
    ) -> Self {
        let haus = SnekHaus::new(config, spawner);
        SessionState {
            requested: haus.snek.direction,
            haus,
            player,
            next_tick: now + config.tick_period,
        }
    }

    fn steer(&mut self, direction: Direction) {
        if !self.haus.snek.direction.is_opposite(direction) {
            self.requested = direction;
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GameOverSummary {
    pub player: Player,
    pub score: u32,
    pub previous_best: u32,
    pub crash: Option<Crash>,
    pub celebrate_until: Option<Instant>,
}

impl GameOverSummary {
    pub fn is_new_record(&self) -> bool {
        self.score > self.previous_best
    }

    pub fn is_celebrating(&self, now: Instant) -> bool {
        self.celebrate_until.is_some_and(|until| now < until)
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub enum Screen {
    #[default]
    Menu,
    NameEntry(NameEntry),
    Countdown(Countdown),
    Playing(SessionState),
    Paused(SessionState),
    GameOver(GameOverSummary),
    Terminal,
}

pub struct Game<S, F = RandomSpawner> {
    screen: Screen,
    records: Records<S>,
    spawner: F,
    config: GameConfig,
}

impl<S: RecordStore> Game<S, RandomSpawner> {
    pub fn new(records: Records<S>) -> Self {
        Self::with_parts(records, RandomSpawner::new(), GameConfig::default())
    }
}

impl<S: RecordStore, F: FoodSpawner> Game<S, F> {
    pub fn with_parts(records: Records<S>, spawner: F, config: GameConfig) -> Self {
        Game {
            screen: Screen::Menu,
            records,
            spawner,
            config,
        }
    }

    pub fn screen(&self) -> &Screen {
        &self.screen
    }

    pub fn records(&self) -> &Records<S> {
        &self.records
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn is_finished(&self) -> bool {
        matches!(self.screen, Screen::Terminal)
    }

    /// How long the frame loop may wait for input before calling [`Game::update`]
    pub fn frame_budget(&self, now: Instant) -> Duration {
        match &self.screen {
            Screen::Playing(session) => session
                .next_tick
                .saturating_duration_since(now)
                .min(self.config.tick_period),
            _ => self.config.frame_period,
        }
    }

    pub fn handle_input(&mut self, input: Input, now: Instant) -> io::Result<()> {
        let screen = std::mem::take(&mut self.screen);
        self.screen = match screen {
            Screen::Menu => self.menu_input(input),
            Screen::NameEntry(entry) => self.name_entry_input(entry, input, now)?,
            Screen::Countdown(countdown) => match input {
                Input::Close => Screen::Terminal,
                _ => Screen::Countdown(countdown),
            },
            Screen::Playing(session) => self.playing_input(session, input, now)?,
            Screen::Paused(session) => self.paused_input(session, input, now)?,
            Screen::GameOver(summary) => self.game_over_input(summary, input, now),
            Screen::Terminal => Screen::Terminal,
        };
        Ok(())
    }

    /// Lets time pass: ends countdowns and runs the simulation when a tick is due.
    pub fn update(&mut self, now: Instant) -> io::Result<()> {
        let screen = std::mem::take(&mut self.screen);
        self.screen = match screen {
            Screen::Countdown(countdown) if now >= countdown.ends_at => {
                info!("Go, {}!", countdown.player.name);
                Screen::Playing(SessionState::new(
                    countdown.player,
                    &self.config,
                    &mut self.spawner,
                    now,
                ))
            }
            Screen::Playing(session) if now >= session.next_tick => self.tick(session, now)?,
            other => other,
        };
        Ok(())
    }

    /// Puts `screen` back when `result` failed, so the caller can retry.
    fn restore<T>(&mut self, screen: Screen, result: io::Result<T>) -> io::Result<T> {
        if result.is_err() {
            self.screen = screen;
        }
        result
    }

    fn tick(&mut self, mut session: SessionState, now: Instant) -> io::Result<Screen> {
        match session.haus.slither_on(session.requested, &mut self.spawner) {
            StepResult::Collision(crash) => {
                let finished = self.finish_session(&session, Some(crash), now);
                self.restore(Screen::Playing(session), finished).map(Screen::GameOver)
            }
            StepResult::Nommed(_) | StepResult::Ongoing => {
                session.next_tick = now + self.config.tick_period;
                Ok(Screen::Playing(session))
            }
        }
    }

    /// Records the session's score, whatever it is, and builds the game-over summary.
    fn finish_session(
        &mut self,
        session: &SessionState,
        crash: Option<Crash>,
        now: Instant,
    ) -> io::Result<GameOverSummary> {
        let score = session.haus.score;
        let previous_best = self.records.best_score(&session.player.name);
        self.records.append_score(&session.player.name, score)?;

        let celebrate_until = if score > previous_best {
            info!(
                "New record for {}: {} (was {})",
                session.player.name, score, previous_best
            );
            Some(now + self.config.celebration)
        } else {
            None
        };

        Ok(GameOverSummary {
            player: session.player.clone(),
            score,
            previous_best,
            crash,
            celebrate_until,
        })
    }

    fn menu_input(&mut self, input: Input) -> Screen {
        match input {
            Input::Enter | Input::Char(' ') => Screen::NameEntry(NameEntry::default()),
            Input::Char('q') | Input::Escape | Input::Close => Screen::Terminal,
            _ => Screen::Menu,
        }
    }

    fn name_entry_input(
        &mut self,
        mut entry: NameEntry,
        input: Input,
        now: Instant,
    ) -> io::Result<Screen> {
        match input {
            Input::Close => return Ok(Screen::Terminal),
            Input::Enter if !entry.typed.trim().is_empty() => {
                let confirmed = self.confirm_player(&entry, now);
                return self
                    .restore(Screen::NameEntry(entry), confirmed)
                    .map(Screen::Countdown);
            }
            Input::Tab => {
                if let Some(suggestion) = entry.suggestion.take() {
                    entry.color = self.records.preferred_color_index(&suggestion, &PALETTE);
                    entry.color_picked = false;
                    entry.typed = suggestion;
                }
            }
            Input::Backspace => {
                entry.typed.pop();
            }
            Input::Arrow(Direction::West) => {
                entry.color = palette::previous_index(entry.color, PALETTE.len());
                entry.color_picked = true;
            }
            Input::Arrow(Direction::East) => {
                entry.color = palette::next_index(entry.color, PALETTE.len());
                entry.color_picked = true;
            }
            Input::Char(c) if c.is_alphanumeric() || c == ' ' => {
                if entry.typed.chars().count() < self.config.max_name_len {
                    entry.typed.push(c);
                }
            }
            _ => {}
        }

        entry.refresh_suggestion(self.records.known_names());
        Ok(Screen::NameEntry(entry))
    }

    /// Settles the name and colour, remembers the colour, and starts the countdown.
    fn confirm_player(&mut self, entry: &NameEntry, now: Instant) -> io::Result<Countdown> {
        let name = match entry.typed.trim() {
            "" => self.config.placeholder_name.clone(),
            trimmed => trimmed.to_string(),
        };
        let color = if entry.color_picked {
            entry.color
        } else {
            self.records.preferred_color_index(&name, &PALETTE)
        };
        self.records.set_preferred_color(&name, PALETTE[color].rgb)?;

        info!(
            "{} is playing in {}, previous best {}",
            name,
            PALETTE[color].name,
            self.records.best_score(&name)
        );

        Ok(Countdown {
            title: format!("Welcome {}!", name),
            player: Player { name, color },
            ends_at: now + self.config.countdown,
        })
    }

    fn playing_input(
        &mut self,
        mut session: SessionState,
        input: Input,
        now: Instant,
    ) -> io::Result<Screen> {
        let screen = match input {
            Input::Arrow(direction) => {
                session.steer(direction);
                Screen::Playing(session)
            }
            Input::Char(' ') => {
                debug!("Paused at score {}", session.haus.score);
                Screen::Paused(session)
            }
            Input::Escape => {
                let finished = self.finish_session(&session, None, now);
                Screen::GameOver(self.restore(Screen::Playing(session), finished)?)
            }
            Input::Close => {
                let finished = self.finish_session(&session, None, now);
                self.restore(Screen::Playing(session), finished)?;
                Screen::Terminal
            }
            _ => Screen::Playing(session),
        };
        Ok(screen)
    }

    fn paused_input(
        &mut self,
        mut session: SessionState,
        input: Input,
        now: Instant,
    ) -> io::Result<Screen> {
        let screen = match input {
            Input::Char(' ') => {
                session.next_tick = now + self.config.tick_period;
                Screen::Playing(session)
            }
            Input::Escape | Input::Close => {
                let finished = self.finish_session(&session, None, now);
                self.restore(Screen::Paused(session), finished)?;
                Screen::Terminal
            }
            _ => Screen::Paused(session),
        };
        Ok(screen)
    }

    fn game_over_input(&mut self, summary: GameOverSummary, input: Input, now: Instant) -> Screen {
        if input == Input::Close {
            return Screen::Terminal;
        }
        if summary.is_celebrating(now) {
            return Screen::GameOver(summary);
        }

        match input {
            Input::Char('r') | Input::Char('R') => Screen::Countdown(Countdown {
                title: format!("Good luck {}!", summary.player.name),
                player: summary.player,
                ends_at: now + self.config.countdown,
            }),
            Input::Char('a') | Input::Char('A') => {
                for (rank, standing) in self
                    .records
                    .leaderboard(self.config.final_leaderboard_len)
                    .iter()
                    .enumerate()
                {
                    info!(
                        "{}. {} - {} ({} games)",
                        rank + 1,
                        standing.name,
                        standing.best,
                        standing.games
                    );
                }
                Screen::NameEntry(NameEntry::default())
            }
            Input::Char('q') | Input::Char('Q') | Input::Escape => Screen::Terminal,
            _ => Screen::GameOver(summary),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::food::ScriptedSpawner;
    use crate::grid::Pos;
    use crate::palette::Rgb;
    use crate::store::MemoryStore;

    fn new_game(spawns: Vec<Pos>) -> Game<MemoryStore, ScriptedSpawner> {
        let records = Records::open(MemoryStore::default()).unwrap();
        Game::with_parts(
            records,
            ScriptedSpawner::new(spawns),
            GameConfig::with_grid(10, 10),
        )
    }

    fn type_text(game: &mut Game<MemoryStore, ScriptedSpawner>, text: &str, now: Instant) {
        for c in text.chars() {
            game.handle_input(Input::Char(c), now).unwrap();
        }
    }

    fn name_entry(game: &Game<MemoryStore, ScriptedSpawner>) -> &NameEntry {
        match game.screen() {
            Screen::NameEntry(entry) => entry,
            other => panic!("expected name entry, got {:?}", other),
        }
    }

    fn session(game: &Game<MemoryStore, ScriptedSpawner>) -> &SessionState {
        match game.screen() {
            Screen::Playing(session) | Screen::Paused(session) => session,
            other => panic!("expected a session, got {:?}", other),
        }
    }

    /// Menu -> name entry -> countdown -> playing, returns the time play started
    fn start_playing(
        game: &mut Game<MemoryStore, ScriptedSpawner>,
        name: &str,
        t0: Instant,
    ) -> Instant {
        game.handle_input(Input::Enter, t0).unwrap();
        type_text(game, name, t0);
        game.handle_input(Input::Enter, t0).unwrap();
        assert!(matches!(game.screen(), Screen::Countdown(_)));

        let start = t0 + game.config().countdown;
        game.update(start).unwrap();
        assert!(matches!(game.screen(), Screen::Playing(_)));
        start
    }

    /// Ticks until the session ends, returns the time of the last tick
    fn play_out(game: &mut Game<MemoryStore, ScriptedSpawner>, mut now: Instant) -> Instant {
        for _ in 0..100 {
            if !matches!(game.screen(), Screen::Playing(_)) {
                return now;
            }
            now += game.config().tick_period;
            game.update(now).unwrap();
        }
        panic!("session never ended");
    }

    #[test]
    fn test_menu_branches() {
        let t0 = Instant::now();
        let mut game = new_game(vec![]);
        assert_eq!(game.screen(), &Screen::Menu);

        game.handle_input(Input::Char('x'), t0).unwrap();
        assert_eq!(game.screen(), &Screen::Menu);

        game.handle_input(Input::Enter, t0).unwrap();
        assert!(matches!(game.screen(), Screen::NameEntry(_)));

        let mut game = new_game(vec![]);
        game.handle_input(Input::Char('q'), t0).unwrap();
        assert!(game.is_finished());
    }

    #[test]
    fn test_name_typing_rules() {
        let t0 = Instant::now();
        let mut game = new_game(vec![]);
        game.handle_input(Input::Enter, t0).unwrap();

        type_text(&mut game, "Jo-e!", t0);
        assert_eq!(name_entry(&game).typed, "Joe");

        game.handle_input(Input::Backspace, t0).unwrap();
        assert_eq!(name_entry(&game).typed, "Jo");

        type_text(&mut game, " 123456789012345678901", t0);
        assert_eq!(name_entry(&game).typed.chars().count(), 20);
        assert_eq!(name_entry(&game).typed, "Jo 12345678901234567");
    }

    #[test]
    fn test_blank_name_is_not_accepted() {
        let t0 = Instant::now();
        let mut game = new_game(vec![]);
        game.handle_input(Input::Enter, t0).unwrap();
        type_text(&mut game, "   ", t0);

        game.handle_input(Input::Enter, t0).unwrap();
        assert!(matches!(game.screen(), Screen::NameEntry(_)));
    }

    #[test]
    fn test_confirm_trims_name() {
        let t0 = Instant::now();
        let mut game = new_game(vec![]);
        game.handle_input(Input::Enter, t0).unwrap();
        type_text(&mut game, " Ann ", t0);
        game.handle_input(Input::Enter, t0).unwrap();

        match game.screen() {
            Screen::Countdown(countdown) => {
                assert_eq!(countdown.player.name, "Ann");
                assert_eq!(countdown.title, "Welcome Ann!");
            }
            other => panic!("expected countdown, got {:?}", other),
        }
        assert_eq!(game.records().preferred_color("Ann"), Some(PALETTE[0].rgb));
    }

    #[test]
    fn test_autocomplete_restores_color() {
        let t0 = Instant::now();
        let mut records = Records::open(MemoryStore::default()).unwrap();
        records.append_score("Alice", 50).unwrap();
        records.set_preferred_color("Alice", PALETTE[4].rgb).unwrap();
        let mut game = Game::with_parts(records, ScriptedSpawner::default(), GameConfig::default());

        game.handle_input(Input::Enter, t0).unwrap();
        type_text(&mut game, "Al", t0);
        assert_eq!(name_entry(&game).suggestion.as_deref(), Some("Alice"));

        game.handle_input(Input::Tab, t0).unwrap();
        assert_eq!(name_entry(&game).typed, "Alice");
        assert_eq!(name_entry(&game).color, 4);
    }

    #[test]
    fn test_suggestion_ignores_case() {
        let known = ["Bob", "alice", "Alicia"];
        assert_eq!(suggest(known.iter().copied(), "AL"), Some("alice"));
        assert_eq!(suggest(known.iter().copied(), "b"), Some("Bob"));
        assert_eq!(suggest(known.iter().copied(), "z"), None);
        assert_eq!(suggest(known.iter().copied(), ""), None);
    }

    #[test]
    fn test_tab_without_suggestion_does_nothing() {
        let t0 = Instant::now();
        let mut game = new_game(vec![]);
        game.handle_input(Input::Enter, t0).unwrap();
        type_text(&mut game, "Zed", t0);
        game.handle_input(Input::Tab, t0).unwrap();

        assert_eq!(name_entry(&game).typed, "Zed");
        assert_eq!(name_entry(&game).suggestion, None);
    }

    #[test]
    fn test_color_cycles_and_is_saved() {
        let t0 = Instant::now();
        let mut game = new_game(vec![]);
        game.handle_input(Input::Enter, t0).unwrap();
        game.handle_input(Input::Arrow(Direction::West), t0).unwrap();
        assert_eq!(name_entry(&game).color, PALETTE.len() - 1);
        game.handle_input(Input::Arrow(Direction::East), t0).unwrap();
        game.handle_input(Input::Arrow(Direction::East), t0).unwrap();
        assert_eq!(name_entry(&game).color, 1);

        type_text(&mut game, "Bea", t0);
        game.handle_input(Input::Enter, t0).unwrap();
        assert_eq!(game.records().preferred_color("Bea"), Some(Rgb(0, 100, 255)));
    }

    #[test]
    fn test_typed_known_name_loads_its_color() {
        let t0 = Instant::now();
        let mut records = Records::open(MemoryStore::default()).unwrap();
        records.set_preferred_color("Cy", PALETTE[5].rgb).unwrap();
        let mut game = Game::with_parts(records, ScriptedSpawner::default(), GameConfig::default());

        game.handle_input(Input::Enter, t0).unwrap();
        type_text(&mut game, "Cy", t0);
        game.handle_input(Input::Enter, t0).unwrap();

        match game.screen() {
            Screen::Countdown(countdown) => assert_eq!(countdown.player.color, 5),
            other => panic!("expected countdown, got {:?}", other),
        }
    }

    #[test]
    fn test_countdown_seconds() {
        let t0 = Instant::now();
        let countdown = Countdown {
            title: String::new(),
            player: Player {
                name: "Ann".to_string(),
                color: 0,
            },
            ends_at: t0 + Duration::from_secs(3),
        };

        assert_eq!(countdown.seconds_left(t0), 3);
        assert_eq!(countdown.seconds_left(t0 + Duration::from_millis(500)), 3);
        assert_eq!(countdown.seconds_left(t0 + Duration::from_secs(1)), 2);
        assert_eq!(countdown.seconds_left(t0 + Duration::from_millis(2900)), 1);
        assert_eq!(countdown.seconds_left(t0 + Duration::from_secs(5)), 1);
    }

    #[test]
    fn test_countdown_waits_and_can_be_closed() {
        let t0 = Instant::now();
        let mut game = new_game(vec![]);
        game.handle_input(Input::Enter, t0).unwrap();
        type_text(&mut game, "Ann", t0);
        game.handle_input(Input::Enter, t0).unwrap();

        game.handle_input(Input::Char(' '), t0).unwrap();
        game.update(t0 + Duration::from_secs(1)).unwrap();
        assert!(matches!(game.screen(), Screen::Countdown(_)));

        game.handle_input(Input::Close, t0).unwrap();
        assert!(game.is_finished());
    }

    #[test]
    fn test_ann_scores_thirty() {
        let t0 = Instant::now();
        // Morsels line up along row 5, straight ahead of the head at (5, 5)
        let mut game = new_game(vec![Pos::new(6, 5), Pos::new(7, 5), Pos::new(8, 5)]);
        assert_eq!(game.records().best_score("Ann"), 0);

        let start = start_playing(&mut game, "Ann", t0);
        let end = play_out(&mut game, start);

        match game.screen() {
            Screen::GameOver(summary) => {
                assert_eq!(summary.score, 30);
                assert_eq!(summary.previous_best, 0);
                assert_eq!(summary.crash, Some(Crash::Wall));
                assert!(summary.is_new_record());
                assert!(summary.is_celebrating(end));
            }
            other => panic!("expected game over, got {:?}", other),
        }
        assert_eq!(game.records().scores()["Ann"], vec![30]);
        assert_eq!(game.records().best_score("Ann"), 30);
    }

    #[test]
    fn test_zero_score_is_recorded() {
        let t0 = Instant::now();
        let mut game = new_game(vec![]);
        let start = start_playing(&mut game, "Ann", t0);
        play_out(&mut game, start);

        assert_eq!(game.records().scores()["Ann"], vec![0]);
        match game.screen() {
            Screen::GameOver(summary) => {
                assert!(!summary.is_new_record());
                assert_eq!(summary.celebrate_until, None);
            }
            other => panic!("expected game over, got {:?}", other),
        }
    }

    #[test]
    fn test_ticks_wait_for_tick_period() {
        let t0 = Instant::now();
        let mut game = new_game(vec![]);
        let start = start_playing(&mut game, "Ann", t0);
        let head = session(&game).haus.snek.head();

        game.update(start + Duration::from_millis(10)).unwrap();
        assert_eq!(session(&game).haus.snek.head(), head);

        game.update(start + game.config().tick_period).unwrap();
        assert_eq!(session(&game).haus.snek.head(), Pos::new(head.x + 1, head.y));
    }

    #[test]
    fn test_reverse_steering_is_ignored() {
        let t0 = Instant::now();
        let mut game = new_game(vec![]);
        let start = start_playing(&mut game, "Ann", t0);
        let tick = game.config().tick_period;

        game.handle_input(Input::Arrow(Direction::South), start).unwrap();
        game.update(start + tick).unwrap();
        assert_eq!(session(&game).haus.snek.direction, Direction::South);

        game.handle_input(Input::Arrow(Direction::North), start + tick).unwrap();
        assert_eq!(session(&game).requested, Direction::South);
        let head = session(&game).haus.snek.head();
        game.update(start + tick * 2).unwrap();
        assert_eq!(session(&game).haus.snek.head(), Pos::new(head.x, head.y + 1));
    }

    #[test]
    fn test_last_steering_input_wins() {
        let t0 = Instant::now();
        let mut game = new_game(vec![]);
        let start = start_playing(&mut game, "Ann", t0);

        game.handle_input(Input::Arrow(Direction::North), start).unwrap();
        game.handle_input(Input::Arrow(Direction::South), start).unwrap();
        assert_eq!(session(&game).requested, Direction::South);

        game.handle_input(Input::Arrow(Direction::West), start).unwrap();
        assert_eq!(session(&game).requested, Direction::South);
    }

    #[test]
    fn test_pause_blocks_ticks() {
        let t0 = Instant::now();
        let mut game = new_game(vec![]);
        let start = start_playing(&mut game, "Ann", t0);
        let head = session(&game).haus.snek.head();

        game.handle_input(Input::Char(' '), start).unwrap();
        assert!(matches!(game.screen(), Screen::Paused(_)));
        game.update(start + Duration::from_secs(10)).unwrap();
        assert_eq!(session(&game).haus.snek.head(), head);

        let resumed = start + Duration::from_secs(10);
        game.handle_input(Input::Char(' '), resumed).unwrap();
        assert!(matches!(game.screen(), Screen::Playing(_)));
        game.update(resumed).unwrap();
        assert_eq!(session(&game).haus.snek.head(), head);
    }

    #[test]
    fn test_quit_from_pause_records_score() {
        let t0 = Instant::now();
        let mut game = new_game(vec![]);
        let start = start_playing(&mut game, "Ann", t0);

        game.handle_input(Input::Char(' '), start).unwrap();
        game.handle_input(Input::Escape, start).unwrap();
        assert!(game.is_finished());
        assert_eq!(game.records().scores()["Ann"], vec![0]);
    }

    #[test]
    fn test_close_while_playing_records_score() {
        let t0 = Instant::now();
        let mut game = new_game(vec![]);
        let start = start_playing(&mut game, "Ann", t0);

        game.handle_input(Input::Close, start).unwrap();
        assert!(game.is_finished());
        assert_eq!(game.records().scores()["Ann"], vec![0]);
    }

    #[test]
    fn test_failed_write_keeps_session() {
        let t0 = Instant::now();
        let mut game = new_game(vec![]);
        let start = start_playing(&mut game, "Ann", t0);
        let before = session(&game).clone();
        game.records.store_mut().fail_writes = true;

        let err = game.handle_input(Input::Escape, start).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::Other);
        assert_eq!(game.screen(), &Screen::Playing(before.clone()));

        game.handle_input(Input::Char(' '), start).unwrap();
        assert!(game.handle_input(Input::Close, start).is_err());
        assert_eq!(game.screen(), &Screen::Paused(before));
        assert_eq!(game.records().games_played("Ann"), 0);

        game.records.store_mut().fail_writes = false;
        game.handle_input(Input::Escape, start).unwrap();
        assert!(game.is_finished());
        assert_eq!(game.records().scores()["Ann"], vec![0]);
    }

    #[test]
    fn test_failed_write_keeps_name_entry() {
        let t0 = Instant::now();
        let mut game = new_game(vec![]);
        game.handle_input(Input::Enter, t0).unwrap();
        type_text(&mut game, "Ann", t0);
        game.records.store_mut().fail_writes = true;

        assert!(game.handle_input(Input::Enter, t0).is_err());
        assert_eq!(name_entry(&game).typed, "Ann");
        assert_eq!(game.records().preferred_color("Ann"), None);
    }

    #[test]
    fn test_escape_ends_session() {
        let t0 = Instant::now();
        let mut game = new_game(vec![]);
        let start = start_playing(&mut game, "Ann", t0);

        game.handle_input(Input::Escape, start).unwrap();
        match game.screen() {
            Screen::GameOver(summary) => assert_eq!(summary.crash, None),
            other => panic!("expected game over, got {:?}", other),
        }
        assert_eq!(game.records().games_played("Ann"), 1);
    }

    #[test]
    fn test_replay_keeps_player() {
        let t0 = Instant::now();
        let mut game = new_game(vec![Pos::new(6, 5)]);
        let start = start_playing(&mut game, "Ann", t0);
        let end = play_out(&mut game, start);

        // Choices are ignored while celebrating
        game.handle_input(Input::Char('r'), end).unwrap();
        assert!(matches!(game.screen(), Screen::GameOver(_)));

        let later = end + game.config().celebration;
        game.handle_input(Input::Char('r'), later).unwrap();
        match game.screen() {
            Screen::Countdown(countdown) => {
                assert_eq!(countdown.player.name, "Ann");
                assert_eq!(countdown.title, "Good luck Ann!");
            }
            other => panic!("expected countdown, got {:?}", other),
        }

        game.update(later + game.config().countdown).unwrap();
        let fresh = session(&game);
        assert_eq!(fresh.haus.score, 0);
        assert_eq!(fresh.haus.snek.body.len(), 3);
        assert_eq!(fresh.player.name, "Ann");
    }

    #[test]
    fn test_switch_player_and_quit() {
        let t0 = Instant::now();
        let mut game = new_game(vec![]);
        let start = start_playing(&mut game, "Ann", t0);
        let end = play_out(&mut game, start);

        game.handle_input(Input::Char('a'), end).unwrap();
        assert_eq!(name_entry(&game), &NameEntry::default());

        type_text(&mut game, "a", end);
        assert_eq!(name_entry(&game).suggestion.as_deref(), Some("Ann"));

        let mut game = new_game(vec![]);
        let start = start_playing(&mut game, "Ann", t0);
        let end = play_out(&mut game, start);
        game.handle_input(Input::Char('q'), end).unwrap();
        assert!(game.is_finished());
    }

    #[test]
    fn test_frame_budget() {
        let t0 = Instant::now();
        let mut game = new_game(vec![]);
        assert_eq!(game.frame_budget(t0), game.config().frame_period);

        let start = start_playing(&mut game, "Ann", t0);
        assert_eq!(game.frame_budget(start), game.config().tick_period);
        assert_eq!(
            game.frame_budget(start + game.config().tick_period),
            Duration::ZERO
        );
    }
}
