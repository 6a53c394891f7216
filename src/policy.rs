use std::collections::VecDeque;
use std::fmt;
use std::io::BufRead;
use log::{info, warn};
use rand::{rngs::StdRng, FromEntropy, Rng, SeedableRng};

use crate::movement::Movement;
use crate::simulation::{Simulation, SCORE_FLOOR};
use crate::world::{Grid, Pos, WorldGenerator, GOAL, TRAP};

/// Source of actions for an episode. `None` means it has nothing more to say.
pub trait Policy
{
    fn next_action(&mut self, state: Pos) -> Option<Movement>;
}

pub struct RandomPolicy {
    rng: StdRng,
}

impl RandomPolicy {
    pub fn new(seed: Option<u64>) -> Self
    {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self { rng }
    }
}

impl Policy for RandomPolicy
{
    fn next_action(&mut self, _state: Pos) -> Option<Movement> {
        Some(self.rng.gen())
    }
}

/// Replays a fixed list of actions.
pub struct ScriptedPolicy {
    actions: VecDeque<Movement>,
}

impl ScriptedPolicy {
    pub fn new<I: IntoIterator<Item = Movement>>(actions: I) -> Self {
        Self { actions: actions.into_iter().collect() }
    }
}

impl Policy for ScriptedPolicy
{
    fn next_action(&mut self, _state: Pos) -> Option<Movement> {
        self.actions.pop_front()
    }
}

/// Reads `w`/`a`/`s`/`d` or action names, one per line.
pub struct HumanControlPolicy<R: BufRead> {
    input: R,
}

impl<R: BufRead> HumanControlPolicy<R> {
    pub fn new(input: R) -> Self {
        Self { input }
    }
}

impl<R: BufRead> Policy for HumanControlPolicy<R>
{
    fn next_action(&mut self, _state: Pos) -> Option<Movement> {
        let mut line = String::new();
        loop {
            line.clear();
            match self.input.read_line(&mut line) {
                Ok(0) => return None,
                Ok(_) => {}
                Err(e) => {
                    warn!("Failed to read input: {}", e);
                    return None;
                }
            }
            let movement = match line.trim() {
                "w" => Ok(Movement::Up),
                "s" => Ok(Movement::Down),
                "a" => Ok(Movement::Left),
                "d" => Ok(Movement::Right),
                other => other.parse::<Movement>(),
            };
            match movement {
                Ok(movement) => return Some(movement),
                Err(e) => warn!("Ignoring input: {}", e),
            }
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Outcome {
    Goal,
    Trap,
    ScoreFloor,
    /// The policy ran out of actions.
    Exhausted,
    StepLimit,
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            Outcome::Goal => "goal",
            Outcome::Trap => "trap",
            Outcome::ScoreFloor => "score_floor",
            Outcome::Exhausted => "exhausted",
            Outcome::StepLimit => "step_limit",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Episode {
    pub steps: usize,
    pub score: i64,
    pub outcome: Outcome,
}

/// Runs one episode from the simulation's current state until it is terminal,
/// the policy gives up, or `max_steps` actions have been taken.
pub fn run_episode<G, P>(sim: &mut Simulation<G>, policy: &mut P, max_steps: usize) -> Episode
    where G: WorldGenerator,
          P: Policy + ?Sized,
{
    let mut steps = 0;
    let mut exhausted = false;
    while !sim.in_terminal_state() && steps < max_steps {
        match policy.next_action(sim.state()) {
            Some(movement) => {
                sim.act(movement);
                steps += 1;
            }
            None => {
                exhausted = true;
                break;
            }
        }
    }

    let outcome = match sim.world().at(sim.state()) {
        GOAL => Outcome::Goal,
        TRAP => Outcome::Trap,
        _ if sim.score() < SCORE_FLOOR => Outcome::ScoreFloor,
        _ if exhausted => Outcome::Exhausted,
        _ => Outcome::StepLimit,
    };
    info!("Episode finished: {} after {} steps, score {}", outcome, steps, sim.score());

    Episode { steps, score: sim.score(), outcome }
}
