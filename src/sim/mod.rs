//! Deterministic simulation module
//!
//! All pour logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - One defined mutation order per tick (shaker, then flow, then glass)
//! - No rendering or platform dependencies

pub mod collision;
pub mod state;
pub mod stream;
pub mod tick;
pub mod wall;

pub use collision::{StreamHit, WallSide, cast_pour_ray, ray_segment_intersection};
pub use state::{
    Droplet, DropletKind, DropletState, Glass, MAX_DROPLETS, PourFlow, Shaker, ShakerMode,
    SimState, Tuning,
};
pub use stream::{falling_stream, liquid_polygon, sliding_stream};
pub use tick::{PointerButton, PointerEvent, TickInput, tick};
pub use wall::{InnerTriangle, Rect, WallSlab, wall_slabs};
