use crate::grid::{Pos, Size};
use rand::Rng;

/// Source of morsel positions.
///
/// Spawned positions are not checked against the snek or other morsels, so
/// a morsel may land on the body or on top of another one.
pub trait FoodSpawner {
    fn spawn(&mut self, arena: Size) -> Pos;
}

/// Uniform draw over every cell of the arena
#[derive(Debug)]
pub struct RandomSpawner<R = rand::rngs::ThreadRng> {
    rng: R,
}

impl RandomSpawner<rand::rngs::ThreadRng> {
    pub fn new() -> Self {
        Self::with_rng(rand::thread_rng())
    }
}

impl Default for RandomSpawner<rand::rngs::ThreadRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Rng> RandomSpawner<R> {
    pub fn with_rng(rng: R) -> Self {
        RandomSpawner { rng }
    }
}

impl<R: Rng> FoodSpawner for RandomSpawner<R> {
    fn spawn(&mut self, arena: Size) -> Pos {
        Pos {
            x: self.rng.gen_range(0..arena.width),
            y: self.rng.gen_range(0..arena.height),
        }
    }
}

/// How many morsels should be on the arena for `score`.
///
/// One to start with, plus one more for every full `points_per_extra` points.
pub fn target_count(score: u32, points_per_extra: u32) -> usize {
    1 + (score / points_per_extra.max(1)) as usize
}

/// Hands out a fixed list of positions, then falls back to the origin.
#[cfg(test)]
#[derive(Debug, Default)]
pub(crate) struct ScriptedSpawner {
    queue: std::collections::VecDeque<Pos>,
    pub(crate) calls: usize,
}

#[cfg(test)]
impl ScriptedSpawner {
    pub(crate) fn new(positions: impl IntoIterator<Item = Pos>) -> Self {
        ScriptedSpawner {
            queue: positions.into_iter().collect(),
            calls: 0,
        }
    }
}

#[cfg(test)]
impl FoodSpawner for ScriptedSpawner {
    fn spawn(&mut self, _arena: Size) -> Pos {
        self.calls += 1;
        self.queue.pop_front().unwrap_or(Pos { x: 0, y: 0 })
    }
}
