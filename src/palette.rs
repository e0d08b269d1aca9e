use serde::{Deserialize, Serialize};

/// An 8-bit RGB triple, stored on disk as `[r, g, b]`
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    /// Every channel raised by `amount`, saturating at 255
    pub fn brightened(&self, amount: u8) -> Rgb {
        Rgb(
            self.0.saturating_add(amount),
            self.1.saturating_add(amount),
            self.2.saturating_add(amount),
        )
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Swatch {
    pub name: &'static str,
    pub rgb: Rgb,
}

/// Selectable snek colours, in the order the picker cycles through them
pub const PALETTE: [Swatch; 6] = [
    Swatch {
        name: "GREEN",
        rgb: Rgb(0, 255, 0),
    },
    Swatch {
        name: "BLUE",
        rgb: Rgb(0, 100, 255),
    },
    Swatch {
        name: "RED",
        rgb: Rgb(255, 50, 50),
    },
    Swatch {
        name: "YELLOW",
        rgb: Rgb(255, 255, 0),
    },
    Swatch {
        name: "MAGENTA",
        rgb: Rgb(255, 0, 255),
    },
    Swatch {
        name: "CYAN",
        rgb: Rgb(0, 255, 255),
    },
];

/// Position of `rgb` in `palette`, falling back to the first swatch.
pub fn index_of(palette: &[Swatch], rgb: Option<Rgb>) -> usize {
    rgb.and_then(|rgb| palette.iter().position(|swatch| swatch.rgb == rgb))
        .unwrap_or(0)
}

pub fn next_index(index: usize, len: usize) -> usize {
    (index + 1) % len
}

pub fn previous_index(index: usize, len: usize) -> usize {
    (index + len - 1) % len
}
