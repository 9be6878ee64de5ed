//! Game state and core simulation types
//!
//! Everything that affects gameplay lives here; cosmetic data (trail,
//! particles) is marked `#[serde(skip)]` and never feeds back into physics.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::rect::Aabb;
use crate::consts::*;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Ball attached to paddle, waiting for launch input
    Serve,
    /// Active gameplay
    Playing,
    /// Game is paused
    Paused,
    /// Out of lives
    GameOver,
    /// Every destructible brick cleared
    Won,
}

/// Ball state - attached to paddle or free-moving
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum BallState {
    /// Ball rides the paddle at the given horizontal offset from its center,
    /// normalized to [-1, 1]
    Attached { offset: f32 },
    /// Ball is free-moving
    Free,
}

/// Trail point for ball rendering
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TrailPoint {
    pub pos: Vec2,
    pub speed: f32,
}

/// Maximum number of trail points to store
pub const TRAIL_LENGTH: usize = 12;

/// The ball
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ball {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    pub state: BallState,
    /// Cooldown ticks before paddle can be hit again (prevents sticking)
    #[serde(default)]
    pub paddle_cooldown: u32,
    /// Trail history for rendering (newest first)
    #[serde(skip)]
    pub trail: Vec<TrailPoint>,
}

impl Ball {
    pub fn new() -> Self {
        Self {
            pos: Vec2::ZERO,
            vel: Vec2::ZERO,
            radius: BALL_RADIUS,
            state: BallState::Attached { offset: 0.0 },
            paddle_cooldown: 0,
            trail: Vec::with_capacity(TRAIL_LENGTH),
        }
    }

    /// Record current position to trail (call each tick when free)
    pub fn record_trail(&mut self) {
        let speed = self.vel.length();
        self.trail.insert(0, TrailPoint { pos: self.pos, speed });
        if self.trail.len() > TRAIL_LENGTH {
            self.trail.pop();
        }
    }

    /// Clear trail (on respawn/attach)
    pub fn clear_trail(&mut self) {
        self.trail.clear();
    }

    /// Update attached ball position based on paddle
    pub fn update_attached(&mut self, paddle: &Paddle) {
        if let BallState::Attached { offset } = self.state {
            let half = paddle.width / 2.0;
            self.pos = Vec2::new(
                paddle.center_x() + offset * half,
                PADDLE_Y - self.radius - 2.0,
            );
        }
    }

    /// Launch the ball from attached state
    ///
    /// The direction leans with paddle motion plus a small jitter so
    /// consecutive serves don't retrace the same path.
    pub fn launch(&mut self, paddle: &Paddle, speed: f32, jitter: f32) {
        if let BallState::Attached { offset } = self.state {
            let lean = (offset + paddle.vel / PADDLE_SPEED * 0.3 + jitter).clamp(-0.5, 0.5);
            self.vel = super::collision::paddle_deflect(lean, speed);
            self.state = BallState::Free;
        }
    }
}

impl Default for Ball {
    fn default() -> Self {
        Self::new()
    }
}

/// The player's paddle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Paddle {
    /// Left edge (pixels)
    pub x: f32,
    /// Current width (pixels)
    pub width: f32,
    /// Horizontal velocity from the last movement input (for launch lean)
    pub vel: f32,
}

impl Default for Paddle {
    fn default() -> Self {
        Self {
            x: (ARENA_WIDTH - PADDLE_WIDTH) / 2.0,
            width: PADDLE_WIDTH,
            vel: 0.0,
        }
    }
}

impl Paddle {
    /// Get the paddle as an Aabb for collision detection
    pub fn rect(&self) -> Aabb {
        Aabb::from_pos_size(
            Vec2::new(self.x, PADDLE_Y),
            Vec2::new(self.width, PADDLE_HEIGHT),
        )
    }

    #[inline]
    pub fn center_x(&self) -> f32 {
        self.x + self.width / 2.0
    }

    /// Move per input direction (-1, 0, +1), clamped to the playfield
    pub fn advance(&mut self, dir: f32, dt: f32) {
        self.vel = dir * PADDLE_SPEED;
        self.x = (self.x + self.vel * dt).clamp(0.0, ARENA_WIDTH - self.width);
    }
}

/// Brick types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BrickKind {
    /// One hit
    #[default]
    Normal,
    /// Two hits, dims when damaged
    Tough,
    /// Cannot be destroyed, doesn't count for clearing the field
    Solid,
}

/// A brick in the grid
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Brick {
    pub id: u32,
    pub kind: BrickKind,
    pub hp: u8,
    pub rect: Aabb,
    /// Grid row (0 = top), drives color and point value
    pub row: u32,
}

impl Brick {
    /// Returns true if this brick must be destroyed to win
    pub fn counts_for_clear(&self) -> bool {
        self.kind != BrickKind::Solid
    }

    /// Point value: top rows are worth more
    pub fn points(&self) -> u32 {
        (BRICK_ROWS - self.row) * 10
    }
}

/// A particle for visual effects
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Palette index for color lookup (brick row, or PADDLE_SPARK)
    pub color: u32,
    /// 0-1, decreases over time
    pub life: f32,
    pub size: f32,
}

/// Palette index for paddle impact sparks
pub const PADDLE_SPARK: u32 = 99;

/// Maximum particles
pub const MAX_PARTICLES: usize = 256;

/// RNG state wrapper for serialization
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RngState {
    pub seed: u64,
}

impl RngState {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    pub fn to_rng(&self) -> Pcg32 {
        Pcg32::seed_from_u64(self.seed)
    }
}

/// Complete game state (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    /// RNG state
    pub rng_state: RngState,
    /// Player lives
    pub lives: u8,
    /// Score
    pub score: u64,
    /// Current ball speed, ramps up as bricks fall
    pub ball_speed: f32,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Current phase
    pub phase: GamePhase,
    /// Player paddle
    pub paddle: Paddle,
    /// The ball
    pub ball: Ball,
    /// Remaining bricks (generation order, stable for determinism)
    pub bricks: Vec<Brick>,
    /// Visual particles (not gameplay-affecting)
    #[serde(skip)]
    pub particles: Vec<Particle>,
    /// Next entity ID
    next_id: u32,
}

impl GameState {
    /// Create a new game state with the given seed
    ///
    /// The brick field is generated separately (`generate_bricks`), matching
    /// how restarts re-roll the layout.
    pub fn new(seed: u64) -> Self {
        let mut state = Self {
            seed,
            rng_state: RngState::new(seed),
            lives: START_LIVES,
            score: 0,
            ball_speed: BALL_START_SPEED,
            time_ticks: 0,
            phase: GamePhase::Serve,
            paddle: Paddle::default(),
            ball: Ball::new(),
            bricks: Vec::new(),
            particles: Vec::new(),
            next_id: 1,
        };

        state.ball.update_attached(&state.paddle);
        state
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paddle_advance_clamps_to_walls() {
        let mut paddle = Paddle::default();
        // Drive hard left for far longer than the playfield is wide
        for _ in 0..1000 {
            paddle.advance(-1.0, SIM_DT);
        }
        assert_eq!(paddle.x, 0.0);

        for _ in 0..1000 {
            paddle.advance(1.0, SIM_DT);
        }
        assert_eq!(paddle.x, ARENA_WIDTH - paddle.width);
    }

    #[test]
    fn test_attached_ball_follows_paddle() {
        let mut state = GameState::new(1);
        state.paddle.advance(1.0, 0.5);
        state.ball.update_attached(&state.paddle);
        assert!((state.ball.pos.x - state.paddle.center_x()).abs() < 0.001);
        assert!(state.ball.pos.y < PADDLE_Y);
    }

    #[test]
    fn test_launch_goes_upward() {
        let mut state = GameState::new(1);
        state.ball.launch(&state.paddle, BALL_START_SPEED, 0.0);
        assert_eq!(state.ball.state, BallState::Free);
        assert!(state.ball.vel.y < 0.0);
        assert!((state.ball.vel.length() - BALL_START_SPEED).abs() < 0.01);
    }

    #[test]
    fn test_brick_points_by_row() {
        let brick = |row| Brick {
            id: 1,
            kind: BrickKind::Normal,
            hp: 1,
            rect: Aabb::from_pos_size(Vec2::ZERO, Vec2::new(BRICK_WIDTH, BRICK_HEIGHT)),
            row,
        };
        assert!(brick(0).points() > brick(BRICK_ROWS - 1).points());
        assert_eq!(brick(BRICK_ROWS - 1).points(), 10);
    }
}
