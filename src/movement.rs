use std::fmt;
use std::str::FromStr;
use rand::{
    distributions::{Distribution, Standard},
    Rng,
};

use crate::error::SimError;

// Action
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Movement {
    Up,
    Right,
    Down,
    Left,
}

impl Movement {
    /// Coordinate delta `(dx, dy)`; y grows downward, following the row order of a map.
    pub fn into_vector(self) -> (isize, isize)
    {
        match self {
            Movement::Up    => ( 0,-1),
            Movement::Down  => ( 0, 1),
            Movement::Left  => (-1, 0),
            Movement::Right => ( 1, 0),
        }
    }

    pub fn actions() -> Vec<Movement> {
        vec![Movement::Up, Movement::Down, Movement::Right, Movement::Left]
    }

    pub fn name(self) -> &'static str {
        match self {
            Movement::Up    => "up",
            Movement::Down  => "down",
            Movement::Left  => "left",
            Movement::Right => "right",
        }
    }
}

impl Distribution<Movement> for Standard {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Movement {
        match rng.gen_range(0, 4) {
            0 => Movement::Up,
            1 => Movement::Right,
            2 => Movement::Down,
            _ => Movement::Left,
        }
    }
}

impl FromStr for Movement {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "up"    => Ok(Movement::Up),
            "down"  => Ok(Movement::Down),
            "left"  => Ok(Movement::Left),
            "right" => Ok(Movement::Right),
            _ => Err(SimError::UnknownAction(s.to_string())),
        }
    }
}

impl fmt::Display for Movement {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}
