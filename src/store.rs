//! Score history and player preferences, kept as two JSON records.
//!
//! Both records are read once when [`Records::open`] is called and written
//! back in full after every change. A record that does not exist yet reads
//! as an empty map; a record that exists but does not parse is an
//! `InvalidData` error.

use crate::config::{PLAYERS_RECORD, SCORES_RECORD};
use crate::palette::{self, Rgb, Swatch};
use log::{debug, info};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::PathBuf;

/// Somewhere named text records can be kept
pub trait RecordStore {
    /// `Ok(None)` when the record has never been written
    fn read(&self, name: &str) -> io::Result<Option<String>>;
    fn write(&mut self, name: &str, contents: &str) -> io::Result<()>;
}

/// One file per record inside `dir`
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        FileStore { dir: dir.into() }
    }
}

impl RecordStore for FileStore {
    fn read(&self, name: &str) -> io::Result<Option<String>> {
        match fs::read_to_string(self.dir.join(name)) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    fn write(&mut self, name: &str, contents: &str) -> io::Result<()> {
        fs::write(self.dir.join(name), contents)
    }
}

#[cfg(test)]
#[derive(Debug, Default)]
pub(crate) struct MemoryStore {
    pub(crate) records: std::collections::HashMap<String, String>,
    pub(crate) writes: usize,
    pub(crate) fail_writes: bool,
}

#[cfg(test)]
impl RecordStore for MemoryStore {
    fn read(&self, name: &str) -> io::Result<Option<String>> {
        Ok(self.records.get(name).cloned())
    }

    fn write(&mut self, name: &str, contents: &str) -> io::Result<()> {
        if self.fail_writes {
            return Err(io::Error::new(io::ErrorKind::Other, "disk full"));
        }
        self.writes += 1;
        self.records.insert(name.to_string(), contents.to_string());
        Ok(())
    }
}

pub type ScoreBook = BTreeMap<String, Vec<u32>>;
pub type PlayerBook = BTreeMap<String, PlayerPrefs>;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlayerPrefs {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<Rgb>,
}

fn load_record<T: DeserializeOwned + Default>(
    store: &impl RecordStore,
    name: &str,
) -> io::Result<T> {
    match store.read(name)? {
        Some(contents) => serde_json::from_str(&contents)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e)),
        None => {
            debug!("Record {} not found, starting empty", name);
            Ok(T::default())
        }
    }
}

fn save_record<T: Serialize>(
    store: &mut impl RecordStore,
    name: &str,
    value: &T,
) -> io::Result<()> {
    let contents = serde_json::to_string_pretty(value)?;
    store.write(name, &contents)
}

pub fn load_scores(store: &impl RecordStore) -> io::Result<ScoreBook> {
    load_record(store, SCORES_RECORD)
}

pub fn save_scores(store: &mut impl RecordStore, scores: &ScoreBook) -> io::Result<()> {
    save_record(store, SCORES_RECORD, scores)
}

pub fn load_players(store: &impl RecordStore) -> io::Result<PlayerBook> {
    load_record(store, PLAYERS_RECORD)
}

pub fn save_players(store: &mut impl RecordStore, players: &PlayerBook) -> io::Result<()> {
    save_record(store, PLAYERS_RECORD, players)
}

/// A leaderboard row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Standing {
    pub name: String,
    pub best: u32,
    pub games: usize,
}

/// Both records, decoded, with the store they are written back to
#[derive(Debug)]
pub struct Records<S> {
    store: S,
    scores: ScoreBook,
    players: PlayerBook,
}

impl<S: RecordStore> Records<S> {
    pub fn open(store: S) -> io::Result<Self> {
        let scores = load_scores(&store)?;
        let players = load_players(&store)?;
        info!(
            "Loaded {} score histories and {} player profiles",
            scores.len(),
            players.len()
        );

        Ok(Records {
            store,
            scores,
            players,
        })
    }

    #[cfg(test)]
    pub(crate) fn store(&self) -> &S {
        &self.store
    }

    #[cfg(test)]
    pub(crate) fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn scores(&self) -> &ScoreBook {
        &self.scores
    }

    pub fn players(&self) -> &PlayerBook {
        &self.players
    }

    /// Names offered for autocompletion, in record order
    pub fn known_names(&self) -> impl Iterator<Item = &str> {
        self.scores.keys().map(String::as_str)
    }

    /// Nothing changes in memory unless the write succeeds.
    pub fn append_score(&mut self, name: &str, score: u32) -> io::Result<()> {
        let mut scores = self.scores.clone();
        scores.entry(name.to_string()).or_default().push(score);
        save_scores(&mut self.store, &scores)?;
        self.scores = scores;
        info!("Recorded score {} for {}", score, name);
        Ok(())
    }

    pub fn best_score(&self, name: &str) -> u32 {
        self.scores
            .get(name)
            .and_then(|history| history.iter().max().copied())
            .unwrap_or(0)
    }

    pub fn games_played(&self, name: &str) -> usize {
        self.scores.get(name).map_or(0, Vec::len)
    }

    pub fn set_preferred_color(&mut self, name: &str, rgb: Rgb) -> io::Result<()> {
        let mut players = self.players.clone();
        players.entry(name.to_string()).or_default().color = Some(rgb);
        save_players(&mut self.store, &players)?;
        self.players = players;
        Ok(())
    }

    pub fn preferred_color(&self, name: &str) -> Option<Rgb> {
        self.players.get(name).and_then(|prefs| prefs.color)
    }

    /// Saved colour of `name` as a position in `palette`, 0 if unknown
    pub fn preferred_color_index(&self, name: &str, palette: &[Swatch]) -> usize {
        palette::index_of(palette, self.preferred_color(name))
    }

    /// Best score per player, highest first, at most `limit` rows
    pub fn leaderboard(&self, limit: usize) -> Vec<Standing> {
        let mut standings: Vec<Standing> = self
            .scores
            .iter()
            .filter_map(|(name, history)| {
                history.iter().max().map(|best| Standing {
                    name: name.clone(),
                    best: *best,
                    games: history.len(),
                })
            })
            .collect();
        standings.sort_by(|a, b| b.best.cmp(&a.best).then_with(|| a.name.cmp(&b.name)));
        standings.truncate(limit);
        standings
    }
}
