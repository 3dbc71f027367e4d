//! Game state module - the round controller
//!
//! Ties together the playfield, the active capsule, the match engine, RNG and
//! scoring. It handles fall timing, landing, pacing the match engine's phases
//! with animation waits, win/loss judgement and level progression.

use arrayvec::ArrayVec;

use crate::capsule::{self, Capsule};
use crate::level::populate;
use crate::playfield::Playfield;
use crate::resolve::{ClearedPiece, EngineConfig, MatchEngine, PhaseOutcome, ResolveStats};
use crate::rng::{CapsuleQueue, SimpleRng};
use crate::scoring::{calculate_score, get_drop_interval_ms};
use crate::types::*;

/// Where the round stands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameStatus {
    /// Created but not started
    Ready,
    Playing,
    /// Every pathogen cleared
    Won,
    /// Bottle neck blocked or spawn cell taken
    Lost,
}

/// Runtime knobs for a game
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameConfig {
    pub seed: u32,
    pub level: u32,
    pub speed: Speed,
    pub points_per_piece: u32,
    pub engine: EngineConfig,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            seed: 1,
            level: 0,
            speed: Speed::default(),
            points_per_piece: POINTS_PER_PIECE,
            engine: EngineConfig::default(),
        }
    }
}

impl GameConfig {
    pub fn with_seed(mut self, seed: u32) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_level(mut self, level: u32) -> Self {
        self.level = level.min(MAX_LEVEL);
        self
    }

    pub fn with_speed(mut self, speed: Speed) -> Self {
        self.speed = speed;
        self
    }

    pub fn with_points_per_piece(mut self, points: u32) -> Self {
        self.points_per_piece = points;
        self
    }

    pub fn with_engine(mut self, engine: EngineConfig) -> Self {
        self.engine = engine;
        self
    }
}

/// Complete game state
#[derive(Debug, Clone)]
pub struct GameState {
    config: GameConfig,
    field: Playfield,
    active: Option<Capsule>,
    queue: CapsuleQueue,
    rng: SimpleRng,
    engine: MatchEngine,
    status: GameStatus,
    level: u32,
    score: u32,
    capsules_spawned: u32,
    drop_timer_ms: u32,
    /// Remaining wait before the engine's next phase
    phase_wait_ms: u32,
    /// Pieces removed by the current clear phase (for the pop animation)
    clearing: ArrayVec<ClearedPiece, GRID_CELLS>,
    last_resolution: Option<ResolveStats>,
    paused: bool,
}

impl GameState {
    /// Create a new game with the given RNG seed and default settings
    pub fn new(seed: u32) -> Self {
        Self::with_config(GameConfig::default().with_seed(seed))
    }

    pub fn with_config(config: GameConfig) -> Self {
        Self {
            config,
            field: Playfield::new(),
            active: None,
            queue: CapsuleQueue::new(config.seed),
            rng: SimpleRng::new(config.seed ^ 0x5eed_ca95),
            engine: MatchEngine::new(config.engine),
            status: GameStatus::Ready,
            level: config.level,
            score: 0,
            capsules_spawned: 0,
            drop_timer_ms: 0,
            phase_wait_ms: 0,
            clearing: ArrayVec::new(),
            last_resolution: None,
            paused: false,
        }
    }

    /// Set up the level and spawn the first capsule
    pub fn start(&mut self) {
        if self.status != GameStatus::Ready {
            return;
        }
        self.setup_level();
        self.status = GameStatus::Playing;
        self.spawn_capsule();
    }

    /// Start over from the configured level with a fresh score
    pub fn restart(&mut self) {
        let seed = self.queue.seed();
        *self = Self::with_config(self.config.with_seed(seed));
        self.start();
    }

    /// Continue to the next level after a win, keeping the score
    pub fn next_level(&mut self) -> bool {
        if self.status != GameStatus::Won {
            return false;
        }
        self.level = (self.level + 1).min(MAX_LEVEL);
        self.status = GameStatus::Ready;
        self.start();
        true
    }

    fn setup_level(&mut self) {
        self.field.clear();
        self.active = None;
        self.clearing.clear();
        self.last_resolution = None;
        self.capsules_spawned = 0;
        self.drop_timer_ms = 0;
        self.phase_wait_ms = 0;
        populate(&mut self.field, &mut self.rng, self.level);
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn paused(&self) -> bool {
        self.paused
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn speed(&self) -> Speed {
        self.config.speed
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn active(&self) -> Option<Capsule> {
        self.active
    }

    pub fn next_colors(&self) -> (Color, Color) {
        self.queue.peek()
    }

    pub fn playfield(&self) -> &Playfield {
        &self.field
    }

    /// Direct access for setting up scenarios (puzzles, tests)
    pub fn playfield_mut(&mut self) -> &mut Playfield {
        &mut self.field
    }

    pub fn pathogens_remaining(&self) -> usize {
        self.field.grid.count_pathogens()
    }

    /// True while landed pieces are being matched and settled; input is ignored
    pub fn is_resolving(&self) -> bool {
        self.engine.is_processing()
    }

    /// Pieces popping in the current clear phase (empty outside one)
    pub fn clearing(&self) -> &[ClearedPiece] {
        &self.clearing
    }

    /// Chain depth reached so far in the running (or last) resolution
    pub fn chain(&self) -> u32 {
        self.engine.stats().chain_count
    }

    pub fn last_resolution(&self) -> Option<ResolveStats> {
        self.last_resolution
    }

    pub fn capsules_spawned(&self) -> u32 {
        self.capsules_spawned
    }

    /// Current fall interval
    pub fn drop_interval_ms(&self) -> u32 {
        get_drop_interval_ms(self.config.speed, self.capsules_spawned)
    }

    /// Spawn the next capsule at the top of the bottle.
    ///
    /// A taken spawn cell ends the round.
    pub fn spawn_capsule(&mut self) -> bool {
        let spawn_blocked = [(SPAWN_COL, SPAWN_ROW), (SPAWN_COL + 1, SPAWN_ROW)]
            .iter()
            .any(|&(c, r)| self.field.grid.is_occupied(c, r));
        if spawn_blocked {
            self.status = GameStatus::Lost;
            self.active = None;
            return false;
        }

        let colors = self.queue.draw();
        self.active = Some(self.field.spawn_capsule(colors));
        self.capsules_spawned = self.capsules_spawned.wrapping_add(1);
        self.drop_timer_ms = 0;
        true
    }

    fn can_act(&self) -> bool {
        self.status == GameStatus::Playing && !self.paused && !self.engine.is_processing()
    }

    pub fn try_move(&mut self, direction: Direction) -> bool {
        if !self.can_act() {
            return false;
        }
        let grid = &self.field.grid;
        match self.active.as_mut() {
            Some(active) => capsule::try_move(active, direction, |c, r| grid.is_occupied(c, r)),
            None => false,
        }
    }

    pub fn try_rotate(&mut self) -> bool {
        if !self.can_act() {
            return false;
        }
        let grid = &self.field.grid;
        match self.active.as_mut() {
            Some(active) => capsule::rotate(active, |c, r| grid.is_occupied(c, r)),
            None => false,
        }
    }

    /// Move down one row, landing the capsule if it is blocked
    fn soft_drop(&mut self) -> bool {
        if !self.can_act() || self.active.is_none() {
            return false;
        }
        if !self.try_move(Direction::Down) {
            self.land();
        }
        self.drop_timer_ms = 0;
        true
    }

    /// Write the active capsule into the grid and start resolving
    pub fn land(&mut self) {
        let Some(active) = self.active.take() else {
            return;
        };
        if !self.field.land(active) {
            // Only reachable if the capsule overlapped the grid, which movement
            // validation prevents.
            self.status = GameStatus::Lost;
            return;
        }
        if self.engine.begin() {
            self.step_resolution();
        }
    }

    /// Run the engine's next phase and arm the wait that paces it
    fn step_resolution(&mut self) {
        self.clearing.clear();
        let mut finished = None;
        let wait = match self.engine.advance(&mut self.field) {
            PhaseOutcome::Cleared(cleared) => {
                self.clearing.extend(cleared.iter().copied());
                CLEAR_ANIM_MS
            }
            PhaseOutcome::Dropped(moves) => {
                if moves.is_empty() {
                    0
                } else {
                    GRAVITY_STEP_MS
                }
            }
            PhaseOutcome::Settle => SETTLE_MS,
            PhaseOutcome::Finished(stats) => {
                finished = Some(stats);
                0
            }
        };
        self.phase_wait_ms = wait;
        if let Some(stats) = finished {
            self.finish_resolution(stats);
        }
    }

    fn finish_resolution(&mut self, stats: ResolveStats) {
        self.score = self
            .score
            .saturating_add(calculate_score(&stats, self.config.points_per_piece));
        self.last_resolution = Some(stats);

        if self.field.grid.count_pathogens() == 0 {
            self.status = GameStatus::Won;
        } else if !self.field.grid.is_bottleneck_clear() {
            self.status = GameStatus::Lost;
        } else {
            self.spawn_capsule();
        }
    }

    /// Apply a player action. Returns true if it changed anything.
    pub fn apply_action(&mut self, action: GameAction) -> bool {
        match action {
            GameAction::Restart => {
                if self.status == GameStatus::Won {
                    self.next_level()
                } else {
                    self.restart();
                    true
                }
            }
            GameAction::Pause => {
                if self.status != GameStatus::Playing {
                    return false;
                }
                self.paused = !self.paused;
                true
            }
            GameAction::MoveLeft => self.try_move(Direction::Left),
            GameAction::MoveRight => self.try_move(Direction::Right),
            GameAction::SoftDrop => self.soft_drop(),
            GameAction::RotateCw => self.try_rotate(),
        }
    }

    /// Advance timers by `elapsed_ms`. Returns true if the grid or capsule changed.
    ///
    /// While resolving, each expired wait runs the next engine phase. Otherwise
    /// the active capsule falls one row per drop interval (faster when
    /// `soft_drop` is held) and lands when it cannot fall.
    pub fn tick(&mut self, elapsed_ms: u32, soft_drop: bool) -> bool {
        if self.paused || self.status != GameStatus::Playing {
            return false;
        }

        if self.engine.is_processing() {
            self.phase_wait_ms = self.phase_wait_ms.saturating_sub(elapsed_ms);
            if self.phase_wait_ms > 0 {
                return false;
            }
            self.step_resolution();
            return true;
        }

        if self.active.is_none() {
            return false;
        }

        let interval = if soft_drop {
            SOFT_DROP_INTERVAL_MS.min(self.drop_interval_ms())
        } else {
            self.drop_interval_ms()
        };
        self.drop_timer_ms = self.drop_timer_ms.saturating_add(elapsed_ms);
        if self.drop_timer_ms < interval {
            return false;
        }
        self.drop_timer_ms = 0;

        if !self.try_move(Direction::Down) {
            self.land();
        }
        true
    }
}
