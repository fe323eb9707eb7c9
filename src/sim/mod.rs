//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - One tick per frame, no wall-clock time
//! - Seeded RNG only
//! - Stable iteration order (spawn order, by entity ID)
//! - No rendering or platform dependencies

pub mod collision;
pub mod snapshot;
pub mod state;
pub mod target;
pub mod tick;

pub use collision::{Contact, circle_contact, resolve_collisions, resolve_pair};
pub use snapshot::{SimEvent, SimulationSnapshot, TargetView};
pub use state::{SessionPhase, SimulationSession, Unlocks};
pub use target::{PlayArea, RemovalCause, Target};
pub use tick::{TickInput, apply_click, tick};
