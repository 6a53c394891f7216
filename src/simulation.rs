//! Tracks the agent in a world and applies the rules and rewards of an episode.

use log::{debug, trace};

use crate::error::Result;
use crate::movement::Movement;
use crate::world::{Grid, Pos, WorldGenerator, FLOOR, GOAL, TRAP};

/// Cost of every step.
pub const STEP_REWARD: i32 = -1;
/// Extra cost of a move that hits a wall or leaves the grid.
pub const WALL_PENALTY: i32 = 5;
pub const TRAP_REWARD: i32 = -10000;
pub const GOAL_REWARD: i32 = 10000;
/// Episodes end once the score drops below this.
pub const SCORE_FLOOR: i64 = -1000;

pub struct Simulation<G: WorldGenerator> {
    generator: G,
    world: G::World,
    state: Pos,
    score: i64,
}

impl<G: WorldGenerator> Simulation<G> {
    pub fn new(mut generator: G) -> Self
    {
        let world = generator.generate();
        let state = world.init_state();
        let mut sim = Self {
            generator,
            world,
            state,
            score: 0,
        };
        sim.reset();
        sim
    }

    /// Starts a new episode on a freshly generated world.
    pub fn reset(&mut self) {
        self.world = self.generator.generate();
        self.state = self.world.init_state();
        self.score = 0;
        debug!("Episode reset, start {:?}", self.state);
    }

    /// Performs `action` and returns the reward of that step.
    pub fn act(&mut self, action: Movement) -> i32
    {
        let mut reward = STEP_REWARD;

        let (dx, dy) = action.into_vector();
        let new_x = self.state.x as isize + dx;
        let new_y = self.state.y as isize + dy;

        if self.valid_move(new_x, new_y) {
            let new_state = Pos::new(new_x as usize, new_y as usize);
            match self.world.at(new_state) {
                TRAP => reward = TRAP_REWARD,
                GOAL => reward = GOAL_REWARD,
                _ => {}
            }
            self.state = new_state;
        } else {
            // Penalty for hitting the walls.
            reward -= WALL_PENALTY;
        }

        self.score = self.score.saturating_add(i64::from(reward));
        trace!("{} => {} {:?} score {}", action, reward, self.state, self.score);
        reward
    }

    /// Like [`act`](Self::act) but looks the action up by name.
    pub fn act_named(&mut self, action: &str) -> Result<i32> {
        let movement: Movement = action.parse()?;
        Ok(self.act(movement))
    }

    // Only checks the destination cell, not the cells crossed to reach it.
    fn valid_move(&self, x: isize, y: isize) -> bool {
        if !self.world.contains(x, y) {
            return false;
        }
        match self.world.at(Pos::new(x as usize, y as usize)) {
            FLOOR | TRAP | GOAL => true,
            _ => false,
        }
    }

    /// Whether the episode is over: the agent stands on a trap or the goal, or
    /// the score fell below [`SCORE_FLOOR`].
    pub fn in_terminal_state(&self) -> bool {
        match self.world.at(self.state) {
            TRAP | GOAL => true,
            _ => self.score < SCORE_FLOOR,
        }
    }

    pub fn x(&self) -> usize { self.state.x }

    pub fn y(&self) -> usize { self.state.y }

    pub fn state(&self) -> Pos { self.state }

    pub fn score(&self) -> i64 { self.score }

    pub fn world(&self) -> &G::World { &self.world }
}
