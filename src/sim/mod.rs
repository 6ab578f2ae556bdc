//! Deterministic simulation module
//!
//! All driving logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Input arrives as a value snapshot per tick
//! - Track geometry is immutable once built
//! - No rendering or platform dependencies

pub mod bounds;
pub mod clock;
pub mod heading;
pub mod input;
pub mod speed;
pub mod state;
pub mod tick;
pub mod track;

pub use bounds::{
    Aabb, BoundaryOracle, BoundaryVerdict, BoundingSphere, BoundsCheck, BoundsError, RegionBounds,
};
pub use clock::FixedStep;
pub use heading::{next_heading, turn_step, yaw_delta};
pub use input::{ControlKey, ControlSet, InputSampler};
pub use speed::{decelerate, next_speed};
pub use state::{MotionPhase, Pose, PoseSource, SpeedState, VehicleState};
pub use tick::{Resolution, TickReport, tick};
pub use track::{Fillet, Profile, Region, RegionRole, Track, extrude};
