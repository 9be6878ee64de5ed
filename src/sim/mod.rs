//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order
//! - No rendering or platform dependencies

pub mod collision;
pub mod rect;
pub mod state;
pub mod tick;

pub use collision::{CollisionResult, ball_rect_collision, reflect_velocity};
pub use rect::Aabb;
pub use state::{Ball, BallState, Brick, BrickKind, GamePhase, GameState, Paddle};
pub use tick::{TickInput, generate_bricks, tick};
