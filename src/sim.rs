use crate::config::GameConfig;
use crate::food::{target_count, FoodSpawner};
use crate::grid::{Direction, Pos, PosDelta, Size};
use log::{debug, info};
use std::collections::VecDeque;

/// The player's creature, head at the front of `body`
#[derive(Clone, Debug, PartialEq)]
pub struct Snek {
    pub body: VecDeque<Pos>,
    pub direction: Direction,
}

impl Snek {
    /// Lays out `length` cells starting at `head` and trailing away from `direction`.
    pub fn new(head: Pos, direction: Direction, length: usize) -> Self {
        let back: PosDelta = direction.opposite().into();
        let mut body = VecDeque::with_capacity(length.max(1));
        let mut cell = head;
        for _ in 0..length.max(1) {
            body.push_back(cell);
            cell = cell.offset(back);
        }

        Snek { body, direction }
    }

    pub fn head(&self) -> Pos {
        self.body[0]
    }

    /// The heading the snek would take for `requested`: the current one if
    /// `requested` would fold the snek back onto itself.
    pub fn heading_for(&self, requested: Direction) -> Direction {
        if self.direction.is_opposite(requested) {
            self.direction
        } else {
            requested
        }
    }

    pub fn would_collide_with_body(&self, pos: Pos) -> bool {
        self.body.contains(&pos)
    }

    fn slither(&mut self, new_head: Pos, grow: bool) {
        self.body.push_front(new_head);
        if !grow {
            self.body.pop_back();
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Crash {
    Wall,
    Itself,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StepResult {
    Ongoing,     // Moved, nothing eaten
    Nommed(u32), // Ate a morsel, carries the new score
    Collision(Crash),
}

/// Everything on the arena during one session
#[derive(Clone, Debug, PartialEq)]
pub struct SnekHaus {
    pub size: Size,
    pub snek: Snek,
    pub morsels: Vec<Pos>,
    pub score: u32,
    points_per_morsel: u32,
    points_per_extra_morsel: u32,
}

impl SnekHaus {
    /// Fresh arena with the snek centred and heading east.
    pub fn new(config: &GameConfig, spawner: &mut impl FoodSpawner) -> Self {
        let size = Size {
            width: config.grid_width,
            height: config.grid_height,
        };
        let head = Pos::new(size.width / 2, size.height / 2);
        let mut haus = SnekHaus {
            size,
            snek: Snek::new(head, Direction::East, config.initial_length),
            morsels: Vec::new(),
            score: 0,
            points_per_morsel: config.points_per_morsel,
            points_per_extra_morsel: config.points_per_extra_morsel,
        };
        haus.top_up_morsels(spawner);
        haus
    }

    pub fn target_morsels(&self) -> usize {
        target_count(self.score, self.points_per_extra_morsel)
    }

    fn top_up_morsels(&mut self, spawner: &mut impl FoodSpawner) {
        while self.morsels.len() < self.target_morsels() {
            let morsel = spawner.spawn(self.size);
            debug!("Placed morsel at {:?}", morsel);
            self.morsels.push(morsel);
        }
    }

    /// Removes one morsel under `pos`, if any.
    fn check_nomming(&mut self, pos: Pos) -> bool {
        match self.morsels.iter().position(|m| *m == pos) {
            Some(index) => {
                self.morsels.remove(index);
                true
            }
            None => false,
        }
    }

    /// Advances the arena by one tick.
    ///
    /// `requested` steers the move unless it reverses the current heading.
    /// Walls are checked before the body, and the body is checked as it was
    /// before the move, tail included. A collision leaves the arena untouched,
    /// heading included.
    pub fn slither_on(
        &mut self,
        requested: Direction,
        spawner: &mut impl FoodSpawner,
    ) -> StepResult {
        let heading = self.snek.heading_for(requested);
        let new_head = self.snek.head().offset(heading.into());

        if !new_head.is_within(self.size) {
            info!("Hit the wall at {:?} with score {}", new_head, self.score);
            return StepResult::Collision(Crash::Wall);
        }
        if self.snek.would_collide_with_body(new_head) {
            info!("Bit itself at {:?} with score {}", new_head, self.score);
            return StepResult::Collision(Crash::Itself);
        }

        self.snek.direction = heading;
        let nommed = self.check_nomming(new_head);
        self.snek.slither(new_head, nommed);

        if !nommed {
            return StepResult::Ongoing;
        }

        self.score += self.points_per_morsel;
        self.morsels.push(spawner.spawn(self.size));
        self.top_up_morsels(spawner);
        info!(
            "Nom! Score {} with {} morsels out",
            self.score,
            self.morsels.len()
        );
        StepResult::Nommed(self.score)
    }
}
