//! Grid worlds and the generators that produce them.
//!
//! A world is a rectangular grid of cell symbols. The simulation only talks to
//! it through [`Grid`], and obtains a fresh one per episode through
//! [`WorldGenerator`], so static maps and procedural layouts are interchangeable.

use std::fmt;
use std::fs;
use std::path::Path;
use log::debug;
use ndarray::Array2;
use rand::{
    rngs::StdRng,
    seq::SliceRandom,
    FromEntropy,
    Rng,
    SeedableRng,
};

use crate::error::WorldError;

pub const FLOOR: char = '.';
pub const TRAP: char = '^';
pub const GOAL: char = '$';
pub const START: char = '@';
pub const WALL: char = '#';

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Pos {
    pub x: usize,
    pub y: usize,
}

impl Pos {
    pub fn new(x: usize, y: usize) -> Self {
        Pos { x, y }
    }
}

impl From<(usize, usize)> for Pos {
    fn from((x, y): (usize, usize)) -> Self {
        Pos { x, y }
    }
}

/// Read-only view of a world: its size, its cells and where the agent starts.
pub trait Grid {
    /// Symbol at `pos`. Panics when `pos` lies outside the grid.
    fn at(&self, pos: Pos) -> char;
    fn w(&self) -> usize;
    fn h(&self) -> usize;
    fn init_state(&self) -> Pos;

    fn contains(&self, x: isize, y: isize) -> bool {
        0 <= x && (x as usize) < self.w() && 0 <= y && (y as usize) < self.h()
    }
}

/// Produces the world for a new episode.
pub trait WorldGenerator {
    type World: Grid;

    fn generate(&mut self) -> Self::World;
}

#[derive(Debug, Clone, PartialEq)]
pub struct World {
    // indexed [[y, x]]
    cells: Array2<char>,
    start: Pos,
}

impl World {
    /// Parses a text map, one row per line. The single `@` marks the start and
    /// is stored as floor. Blank lines around the map are ignored.
    pub fn parse(text: &str) -> Result<World, WorldError> {
        let mut rows: Vec<Vec<char>> = text
            .lines()
            .map(|line| line.trim_end_matches('\r').chars().collect::<Vec<char>>())
            .skip_while(|row| row.is_empty())
            .collect();
        while rows.last().map_or(false, |row| row.is_empty()) {
            rows.pop();
        }
        if rows.is_empty() {
            return Err(WorldError::Empty);
        }

        let w = rows[0].len();
        let h = rows.len();
        let mut start = None;
        let mut flat = Vec::with_capacity(w * h);
        for (y, row) in rows.into_iter().enumerate() {
            if row.len() != w {
                return Err(WorldError::RaggedRow { row: y, expected: w, found: row.len() });
            }
            for (x, ch) in row.into_iter().enumerate() {
                if ch == START {
                    if start.is_some() {
                        return Err(WorldError::DuplicateStart { x, y });
                    }
                    start = Some(Pos { x, y });
                    flat.push(FLOOR);
                } else {
                    flat.push(ch);
                }
            }
        }

        let start = start.ok_or(WorldError::MissingStart)?;
        let cells = Array2::from_shape_vec((h, w), flat)
            .map_err(|_| WorldError::InvalidDimensions { w, h })?;
        Ok(World { cells, start })
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<World, WorldError> {
        let text = fs::read_to_string(path)?;
        World::parse(&text)
    }
}

impl Grid for World {
    fn at(&self, pos: Pos) -> char {
        self.cells[[pos.y, pos.x]]
    }

    fn w(&self) -> usize {
        self.cells.cols()
    }

    fn h(&self) -> usize {
        self.cells.rows()
    }

    fn init_state(&self) -> Pos {
        self.start
    }
}

impl fmt::Display for World {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for (y, row) in self.cells.outer_iter().enumerate() {
            if y > 0 {
                writeln!(f)?;
            }
            for ch in row.iter() {
                write!(f, "{}", ch)?;
            }
        }
        Ok(())
    }
}

/// Hands out the same world every episode.
pub struct Static {
    world: World,
}

impl Static {
    pub fn new(world: World) -> Self {
        Static { world }
    }
}

impl WorldGenerator for Static {
    type World = World;

    fn generate(&mut self) -> World {
        self.world.clone()
    }
}

#[derive(Debug, Clone)]
pub struct RandomConfig {
    pub w: usize,
    pub h: usize,
    /// Probability that a cell starts out as a wall.
    pub wall_density: f64,
    pub traps: usize,
    pub seed: Option<u64>,
}

impl Default for RandomConfig {
    fn default() -> Self {
        RandomConfig {
            w: 8,
            h: 8,
            wall_density: 0.2,
            traps: 3,
            seed: None,
        }
    }
}

/// Procedural layouts: random walls and traps around a guaranteed floor
/// corridor from the start to the goal.
pub struct Random {
    config: RandomConfig,
    rng: StdRng,
}

impl Random {
    pub fn new(config: RandomConfig) -> Result<Self, WorldError> {
        let cells = config.w.checked_mul(config.h).unwrap_or(0);
        if cells < 2 {
            return Err(WorldError::InvalidDimensions { w: config.w, h: config.h });
        }
        if !(0.0..=1.0).contains(&config.wall_density) {
            return Err(WorldError::InvalidDensity(config.wall_density));
        }
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Ok(Random { config, rng })
    }

    fn random_pos(&mut self) -> Pos {
        Pos {
            x: self.rng.gen_range(0, self.config.w),
            y: self.rng.gen_range(0, self.config.h),
        }
    }
}

impl WorldGenerator for Random {
    type World = World;

    fn generate(&mut self) -> World {
        let (w, h) = (self.config.w, self.config.h);
        let mut cells = Array2::from_elem((h, w), FLOOR);
        for cell in cells.iter_mut() {
            if self.rng.gen_bool(self.config.wall_density) {
                *cell = WALL;
            }
        }

        let start = self.random_pos();
        let mut goal = self.random_pos();
        while goal == start {
            goal = self.random_pos();
        }

        // Horizontal leg first, then vertical; everything on it stays passable.
        let mut corridor = Array2::from_elem((h, w), false);
        let mut cur = start;
        loop {
            cells[[cur.y, cur.x]] = FLOOR;
            corridor[[cur.y, cur.x]] = true;
            if cur.x != goal.x {
                cur.x = if cur.x < goal.x { cur.x + 1 } else { cur.x - 1 };
            } else if cur.y != goal.y {
                cur.y = if cur.y < goal.y { cur.y + 1 } else { cur.y - 1 };
            } else {
                break;
            }
        }
        cells[[goal.y, goal.x]] = GOAL;

        let mut free: Vec<(usize, usize)> = cells
            .indexed_iter()
            .filter(|&((y, x), &ch)| ch == FLOOR && !corridor[[y, x]])
            .map(|(idx, _)| idx)
            .collect();
        free.shuffle(&mut self.rng);
        for &(y, x) in free.iter().take(self.config.traps) {
            cells[[y, x]] = TRAP;
        }

        debug!("Generated {}x{} world, start {:?}, goal {:?}", w, h, start, goal);
        World { cells, start }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_reads_dimensions_and_start() {
        let world = World::parse("#.$\n@^.\n").unwrap();
        assert_eq!(world.w(), 3);
        assert_eq!(world.h(), 2);
        assert_eq!(world.init_state(), Pos::new(0, 1));
        assert_eq!(world.at(Pos::new(2, 0)), GOAL);
        assert_eq!(world.at(Pos::new(1, 1)), TRAP);
        assert_eq!(world.at(Pos::new(0, 0)), '#');
    }

    #[test]
    fn start_marker_becomes_floor() {
        let world = World::parse("@.").unwrap();
        assert_eq!(world.at(world.init_state()), FLOOR);
        assert_eq!(world.to_string(), "..");
    }

    #[test]
    fn parse_rejects_bad_maps() {
        assert!(matches!(World::parse(""), Err(WorldError::Empty)));
        assert!(matches!(World::parse("..\n."), Err(WorldError::RaggedRow { row: 1, expected: 2, found: 1 })));
        assert!(matches!(World::parse("..$"), Err(WorldError::MissingStart)));
        assert!(matches!(World::parse("@.@"), Err(WorldError::DuplicateStart { x: 2, y: 0 })));
    }

    #[test]
    fn parse_skips_surrounding_blank_lines() {
        let world = World::parse("\n\n@.\n.$\n\n").unwrap();
        assert_eq!((world.w(), world.h()), (2, 2));
        assert_eq!(world.init_state(), Pos::new(0, 0));
        assert!(matches!(World::parse("\n\n"), Err(WorldError::Empty)));
        assert!(matches!(World::parse("@.\n\n.$"), Err(WorldError::RaggedRow { row: 1, expected: 2, found: 0 })));
    }

    #[test]
    fn parse_tolerates_crlf() {
        let world = World::parse("@.\r\n.$\r\n").unwrap();
        assert_eq!(world.w(), 2);
        assert_eq!(world.at(Pos::new(1, 1)), GOAL);
    }

    #[test]
    fn contains_checks_both_axes() {
        let world = World::parse("@..\n...").unwrap();
        assert!(world.contains(2, 1));
        assert!(!world.contains(3, 0));
        assert!(!world.contains(0, 2));
        assert!(!world.contains(-1, 0));
        assert!(!world.contains(0, -1));
    }

    #[test]
    fn static_generator_repeats_its_world() {
        let world = World::parse("@^").unwrap();
        let mut generator = Static::new(world.clone());
        assert_eq!(generator.generate(), world);
        assert_eq!(generator.generate(), world);
    }

    #[test]
    fn random_rejects_bad_config() {
        let tiny = RandomConfig { w: 1, h: 1, ..RandomConfig::default() };
        assert!(matches!(Random::new(tiny), Err(WorldError::InvalidDimensions { .. })));
        let huge = RandomConfig { w: usize::MAX, h: 3, ..RandomConfig::default() };
        assert!(matches!(Random::new(huge), Err(WorldError::InvalidDimensions { .. })));
        let empty = RandomConfig { w: 0, h: 5, ..RandomConfig::default() };
        assert!(matches!(Random::new(empty), Err(WorldError::InvalidDimensions { .. })));
        let dense = RandomConfig { wall_density: 1.5, ..RandomConfig::default() };
        assert!(matches!(Random::new(dense), Err(WorldError::InvalidDensity(_))));
    }

    #[test]
    fn random_world_has_passable_start_and_one_goal() {
        let config = RandomConfig { w: 10, h: 6, wall_density: 0.4, traps: 5, seed: Some(7) };
        let mut generator = Random::new(config).unwrap();
        for _ in 0..20 {
            let world = generator.generate();
            assert_eq!((world.w(), world.h()), (10, 6));
            assert_eq!(world.at(world.init_state()), FLOOR);
            let goals = world.to_string().chars().filter(|&c| c == GOAL).count();
            assert_eq!(goals, 1);
        }
    }

    #[test]
    fn random_world_goal_is_reachable() {
        let config = RandomConfig { w: 12, h: 9, wall_density: 0.9, traps: 0, seed: Some(42) };
        let mut generator = Random::new(config).unwrap();
        for _ in 0..10 {
            let world = generator.generate();
            // flood fill over floor from the start
            let mut seen = vec![false; world.w() * world.h()];
            let mut stack = vec![world.init_state()];
            let mut found = false;
            while let Some(p) = stack.pop() {
                if seen[p.y * world.w() + p.x] {
                    continue;
                }
                seen[p.y * world.w() + p.x] = true;
                match world.at(p) {
                    GOAL => { found = true; continue; }
                    FLOOR => {}
                    _ => continue,
                }
                for (dx, dy) in &[(-1isize, 0isize), (1, 0), (0, -1), (0, 1)] {
                    let (nx, ny) = (p.x as isize + dx, p.y as isize + dy);
                    if world.contains(nx, ny) {
                        stack.push(Pos::new(nx as usize, ny as usize));
                    }
                }
            }
            assert!(found, "goal unreachable in\n{}", world);
        }
    }

    #[test]
    fn seeded_generators_agree() {
        let config = RandomConfig { seed: Some(3), ..RandomConfig::default() };
        let mut a = Random::new(config.clone()).unwrap();
        let mut b = Random::new(config).unwrap();
        assert_eq!(a.generate(), b.generate());
    }
}
