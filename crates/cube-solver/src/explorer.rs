//! Bounded breadth-first exploration with resource ceilings.
//!
//! From a set of seed states, every state within the depth bound is recorded
//! once, on first discovery, together with a link to the state it was reached
//! from. Since the frontier is FIFO and every move costs one, the recorded path
//! is a shortest path from the nearest seed.

use std::collections::VecDeque;
use std::time::Instant;

use fxhash::FxHashMap;
use tracing::{debug, warn};

use crate::cube::CubeState;
use crate::error::{Limit, Result, SolveError};
use crate::moves::{Move, MoveTable, Path};

/// How many dequeued states between deadline checks.
const DEADLINE_CHECK_INTERVAL: usize = 1024;

/// Ceilings that abort a search with [`SolveError::ResourceExhausted`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SearchLimits {
    /// Maximum number of recorded states.
    pub max_states: Option<usize>,
    /// Wall-clock cutoff.
    pub deadline: Option<Instant>,
}

impl SearchLimits {
    pub fn unlimited() -> Self {
        Self::default()
    }
}

/// How a state was first reached.
#[derive(Debug, Clone, Copy)]
struct Visit {
    /// Packed predecessor; equal to the state's own key for seeds.
    parent: u64,
    /// Move taken from the predecessor, `None` for seeds.
    last: Option<Move>,
    depth: u32,
}

/// Result of one exploration: state -> shortest path from the nearest seed.
#[derive(Debug, Default)]
pub struct Explored {
    visits: FxHashMap<u64, Visit>,
    /// Packed keys in discovery order.
    order: Vec<u64>,
    /// State that satisfied the goal, if the run had one.
    goal: Option<u64>,
    /// Depth the ball was explored to; `None` for unbounded searches.
    bound: Option<usize>,
}

impl Explored {
    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn contains(&self, state: &CubeState) -> bool {
        self.visits.contains_key(&state.pack())
    }

    /// Shortest move sequence from the nearest seed to `state`.
    pub fn path(&self, state: &CubeState) -> Option<Path> {
        self.path_of_key(state.pack())
    }

    /// Length of the recorded path to `state`.
    pub fn depth(&self, state: &CubeState) -> Option<usize> {
        self.depth_of_key(state.pack())
    }

    /// Recorded states in discovery order (nondecreasing depth).
    pub fn states(&self) -> impl Iterator<Item = CubeState> + '_ {
        self.order.iter().map(|&key| CubeState::unpack(key))
    }

    /// Number of recorded states at each depth.
    pub fn depth_histogram(&self) -> Vec<usize> {
        let mut counts = Vec::new();
        for visit in self.visits.values() {
            let depth = visit.depth as usize;
            if counts.len() <= depth {
                counts.resize(depth + 1, 0);
            }
            counts[depth] += 1;
        }
        counts
    }

    /// Depth bound of the exploration, `None` for goal searches.
    pub fn bound(&self) -> Option<usize> {
        self.bound
    }

    /// The state that stopped a goal-directed search.
    pub fn goal(&self) -> Option<CubeState> {
        self.goal.map(CubeState::unpack)
    }

    /// Path to the goal state, if one was found.
    pub fn goal_path(&self) -> Option<Path> {
        self.goal.and_then(|key| self.path_of_key(key))
    }

    pub(crate) fn keys(&self) -> &[u64] {
        &self.order
    }

    pub(crate) fn depth_of_key(&self, key: u64) -> Option<usize> {
        self.visits.get(&key).map(|visit| visit.depth as usize)
    }

    pub(crate) fn path_of_key(&self, mut key: u64) -> Option<Path> {
        let mut visit = self.visits.get(&key)?;
        let mut path = Path::new();
        while let Some(mv) = visit.last {
            path.push(mv);
            key = visit.parent;
            visit = self.visits.get(&key)?;
        }
        path.reverse();
        Some(path)
    }

    fn record(&mut self, key: u64, visit: Visit) {
        self.visits.insert(key, visit);
        self.order.push(key);
    }
}

/// A queued state waiting to be expanded.
struct Frame {
    state: CubeState,
    depth: u32,
    last: Option<Move>,
}

/// Breadth-first explorer over the 18 face turns.
#[derive(Debug, Clone, Copy)]
pub struct Explorer<'a> {
    table: &'a MoveTable,
    limits: SearchLimits,
}

impl<'a> Explorer<'a> {
    pub fn new(table: &'a MoveTable) -> Self {
        Self {
            table,
            limits: SearchLimits::unlimited(),
        }
    }

    pub fn with_limits(table: &'a MoveTable, limits: SearchLimits) -> Self {
        Self { table, limits }
    }

    /// Record every state within `depth` moves of any seed.
    pub fn explore(&self, seeds: &[CubeState], depth: usize) -> Result<Explored> {
        let explored = self.run(seeds, Some(depth), |_| false)?;
        debug!(
            seeds = seeds.len(),
            depth,
            states = explored.len(),
            "bounded exploration finished"
        );
        Ok(explored)
    }

    /// Breadth-first search with no depth bound, stopping at the first state
    /// that satisfies `goal`. Only the limits bound the work.
    pub fn search<G>(&self, seeds: &[CubeState], goal: G) -> Result<Explored>
    where
        G: FnMut(&CubeState) -> bool,
    {
        let explored = self.run(seeds, None, goal)?;
        debug!(
            seeds = seeds.len(),
            states = explored.len(),
            found = explored.goal.is_some(),
            "goal search finished"
        );
        Ok(explored)
    }

    /// Grow a bounded exploration out to `depth`, one layer at a time. Only
    /// the outermost layer is expanded each round, so the result is the same
    /// as a fresh [`Explorer::explore`] to `depth`, discovery order included.
    /// Unbounded searches are left as they are.
    pub fn deepen(&self, explored: &mut Explored, depth: usize) -> Result<()> {
        while let Some(bound) = explored.bound.filter(|&bound| bound < depth) {
            let layer_start = explored.order.partition_point(|&key| {
                explored
                    .depth_of_key(key)
                    .is_some_and(|recorded| recorded < bound)
            });
            let layer = explored.order[layer_start..].to_vec();
            let next_depth = bound as u32 + 1;

            for (expanded, &parent) in layer.iter().enumerate() {
                if (expanded + 1) % DEADLINE_CHECK_INTERVAL == 0 {
                    self.check_deadline(explored)?;
                }
                let Some(last) = explored.visits.get(&parent).map(|visit| visit.last) else {
                    continue;
                };

                for (mv, next) in self.successors(CubeState::unpack(parent), last) {
                    let key = next.pack();
                    if explored.visits.contains_key(&key) {
                        continue;
                    }
                    self.check_capacity(explored)?;
                    explored.record(
                        key,
                        Visit {
                            parent,
                            last: Some(mv),
                            depth: next_depth,
                        },
                    );
                }
            }

            explored.bound = Some(bound + 1);
        }

        debug!(depth, states = explored.len(), "exploration deepened");
        Ok(())
    }

    fn run<G>(&self, seeds: &[CubeState], max_depth: Option<usize>, mut goal: G) -> Result<Explored>
    where
        G: FnMut(&CubeState) -> bool,
    {
        let mut explored = Explored {
            bound: max_depth,
            ..Explored::default()
        };
        let mut queue: VecDeque<Frame> = VecDeque::new();
        let expands = |depth: u32| max_depth.map_or(true, |max| (depth as usize) < max);

        for seed in seeds {
            let key = seed.pack();
            if explored.visits.contains_key(&key) {
                continue;
            }
            self.check_capacity(&explored)?;
            explored.record(
                key,
                Visit {
                    parent: key,
                    last: None,
                    depth: 0,
                },
            );
            if goal(seed) {
                explored.goal = Some(key);
                return Ok(explored);
            }
            if expands(0) {
                queue.push_back(Frame {
                    state: *seed,
                    depth: 0,
                    last: None,
                });
            }
        }

        let mut dequeued: usize = 0;
        while let Some(frame) = queue.pop_front() {
            dequeued += 1;
            if dequeued % DEADLINE_CHECK_INTERVAL == 0 {
                self.check_deadline(&explored)?;
            }

            let parent = frame.state.pack();
            let depth = frame.depth + 1;

            for (mv, next) in self.successors(frame.state, frame.last) {
                let key = next.pack();
                if explored.visits.contains_key(&key) {
                    continue;
                }

                self.check_capacity(&explored)?;
                explored.record(
                    key,
                    Visit {
                        parent,
                        last: Some(mv),
                        depth,
                    },
                );

                if goal(&next) {
                    explored.goal = Some(key);
                    return Ok(explored);
                }
                if expands(depth) {
                    queue.push_back(Frame {
                        state: next,
                        depth,
                        last: Some(mv),
                    });
                }
            }
        }

        Ok(explored)
    }

    /// Neighbours of `state`, skipping turns of the face `last` just turned.
    fn successors(
        &self,
        state: CubeState,
        last: Option<Move>,
    ) -> impl Iterator<Item = (Move, CubeState)> + 'a {
        let table = self.table;
        Move::ALL
            .into_iter()
            // Two turns of one face merge into one turn (or none).
            .filter(move |mv| last.map_or(true, |last| last.face != mv.face))
            .map(move |mv| (mv, table.apply(&state, mv)))
    }

    fn check_capacity(&self, explored: &Explored) -> Result<()> {
        match self.limits.max_states {
            Some(max) if explored.len() >= max => {
                warn!(explored = explored.len(), max, "state limit reached");
                Err(SolveError::ResourceExhausted {
                    explored: explored.len(),
                    limit: Limit::States(max),
                })
            }
            _ => Ok(()),
        }
    }

    fn check_deadline(&self, explored: &Explored) -> Result<()> {
        match self.limits.deadline {
            Some(deadline) if Instant::now() > deadline => {
                warn!(explored = explored.len(), "search deadline passed");
                Err(SolveError::ResourceExhausted {
                    explored: explored.len(),
                    limit: Limit::Timeout,
                })
            }
            _ => Ok(()),
        }
    }
}
