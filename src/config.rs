use std::time::Duration;

pub const SCORES_RECORD: &str = "scores.json";
pub const PLAYERS_RECORD: &str = "players.json";
pub const LOG_FILE: &str = "snekboard.log";

/// Tunables for the arena and the screens around it
#[derive(Debug, Clone, PartialEq)]
pub struct GameConfig {
    /// Width of the arena in cells
    pub grid_width: i32,
    /// Height of the arena in cells
    pub grid_height: i32,
    /// Length of the snek at the start of every session
    pub initial_length: usize,
    /// Time between two simulation steps
    pub tick_period: Duration,
    /// Refresh period for screens that do not run the simulation
    pub frame_period: Duration,
    pub countdown: Duration,
    pub celebration: Duration,
    /// Score gained per morsel
    pub points_per_morsel: u32,
    /// Every this many points another morsel is kept on the arena
    pub points_per_extra_morsel: u32,
    pub max_name_len: usize,
    pub menu_leaderboard_len: usize,
    pub final_leaderboard_len: usize,
    /// Name used when the typed name is blank
    pub placeholder_name: String,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            grid_width: 40,
            grid_height: 20,
            initial_length: 3,
            tick_period: Duration::from_millis(100),
            frame_period: Duration::from_millis(33),
            countdown: Duration::from_secs(3),
            celebration: Duration::from_secs(2),
            points_per_morsel: 10,
            points_per_extra_morsel: 200,
            max_name_len: 20,
            menu_leaderboard_len: 10,
            final_leaderboard_len: 10,
            placeholder_name: "Player".to_string(),
        }
    }
}

impl GameConfig {
    /// Same defaults on a custom arena, handy for tests
    pub fn with_grid(width: i32, height: i32) -> Self {
        Self {
            grid_width: width,
            grid_height: height,
            ..Default::default()
        }
    }
}
