//! Float Pop - A floating-target clicker arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (kinematics, collisions, scoring, levels)
//! - `settings`: Session parameters and play-area geometry
//! - `web`: JavaScript bindings for the browser build

pub mod settings;
pub mod sim;

#[cfg(target_arch = "wasm32")]
pub mod web;

pub use settings::{Settings, SettingsError};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Default play area dimensions
    pub const DEFAULT_WIDTH: f32 = 800.0;
    pub const DEFAULT_HEIGHT: f32 = 600.0;

    /// Target radius range (uniform)
    pub const TARGET_RADIUS_MIN: f32 = 16.0;
    pub const TARGET_RADIUS_MAX: f32 = 30.0;
    /// Horizontal padding between a freshly spawned circle and the side walls
    pub const SPAWN_SIDE_PADDING: f32 = 4.0;
    /// Extra distance below the floor a target is born at
    pub const SPAWN_DEPTH_MIN: f32 = 10.0;
    pub const SPAWN_DEPTH_MAX: f32 = 120.0;

    /// Base speeds (pixels per tick at level 1)
    pub const SPEED_UP_MIN: f32 = 0.55;
    pub const SPEED_UP_MAX: f32 = 1.05;
    pub const SPEED_SIDE_MIN: f32 = 0.25;
    pub const SPEED_SIDE_MAX: f32 = 0.95;

    /// Alpha lost per tick once a target starts fading
    pub const FADE_RATE: f32 = 0.02;

    /// Target-target restitution (slight energy loss)
    pub const RESTITUTION: f32 = 0.92;
    /// Extra separation added on each side of a resolved overlap
    pub const COLLISION_SLOP: f32 = 0.01;
    /// Distance substituted for (nearly) concentric circles
    pub const MIN_CONTACT_DISTANCE: f32 = 1e-4;
    /// Largest downward speed a collision may leave behind
    pub const MAX_DOWNWARD_SPEED: f32 = 0.35;
    /// Floor bounce restitution
    pub const FLOOR_RESTITUTION: f32 = 0.85;

    /// Per-level speed growth (geometric) and its ceiling
    pub const SPEED_GROWTH: f32 = 1.22;
    pub const SPEED_SCALE_CAP: f32 = 6.0;

    /// Default level cap for the capped variant
    pub const MAX_LEVELS: u32 = 10;
    /// Level that unlocks the mid-size group option
    pub const UNLOCK_MID_LEVEL: u32 = 5;

    /// Selectable session sizes
    pub const TARGET_TOTAL_OPTIONS: [u32; 4] = [50, 100, 150, 200];
    pub const GROUP_SIZE_OPTIONS: [u32; 3] = [10, 15, 20];
    pub const DEFAULT_TARGET_TOTAL: u32 = 100;
    pub const DEFAULT_GROUP_SIZE: u32 = 10;
}

/// Speed multiplier for a level: geometric growth, capped
#[inline]
pub fn speed_scale(level: u32) -> f32 {
    use consts::{SPEED_GROWTH, SPEED_SCALE_CAP};
    let exponent = level.saturating_sub(1).min(i32::MAX as u32) as i32;
    SPEED_GROWTH.powi(exponent).min(SPEED_SCALE_CAP)
}

/// Point-in-circle test (boundary inclusive)
#[inline]
pub fn circle_contains(center: Vec2, radius: f32, point: Vec2) -> bool {
    center.distance_squared(point) <= radius * radius
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_speed_scale_level_one_is_unity() {
        assert_eq!(speed_scale(1), 1.0);
    }

    #[test]
    fn test_speed_scale_grows_geometrically() {
        let s2 = speed_scale(2);
        let s3 = speed_scale(3);
        assert!((s2 - 1.22).abs() < 1e-5);
        assert!((s3 - 1.22 * 1.22).abs() < 1e-4);
    }

    #[test]
    fn test_speed_scale_is_capped() {
        assert_eq!(speed_scale(50), consts::SPEED_SCALE_CAP);
        assert_eq!(speed_scale(u32::MAX), consts::SPEED_SCALE_CAP);
    }

    #[test]
    fn test_circle_contains_boundary() {
        let c = Vec2::new(10.0, 10.0);
        assert!(circle_contains(c, 5.0, Vec2::new(15.0, 10.0)));
        assert!(!circle_contains(c, 5.0, Vec2::new(15.1, 10.0)));
    }
}
