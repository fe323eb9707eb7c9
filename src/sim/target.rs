//! Floating target entity and its per-tick kinematics

use glam::Vec2;
use rand::Rng;

use crate::circle_contains;
use crate::consts::*;

/// Rectangular play area, origin top-left, y pointing down
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlayArea {
    pub width: f32,
    pub height: f32,
    /// Targets reflect off the bottom edge after entering
    pub floor_bounce: bool,
}

/// Why a target left the play field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemovalCause {
    /// Clicked and fully faded out
    Faded,
    /// Drifted past the top edge
    Escaped,
}

/// A floating circular target
#[derive(Debug, Clone)]
pub struct Target {
    pub id: u32,
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    /// Opacity in [0, 1]
    pub alpha: f32,
    /// Set by a click, never cleared
    pub is_fading: bool,
    /// Pointer is over the target (cosmetic)
    pub is_hovered: bool,
    /// Bottom edge has been above the floor at least once
    pub entered: bool,
}

impl Target {
    /// Spawn a target below the visible area, drifting upward
    pub fn spawn<R: Rng>(id: u32, area: &PlayArea, rng: &mut R) -> Self {
        assert!(
            area.width > 2.0 * (TARGET_RADIUS_MAX + SPAWN_SIDE_PADDING),
            "play area width {} cannot fit a target",
            area.width
        );

        let radius = rng.random_range(TARGET_RADIUS_MIN..=TARGET_RADIUS_MAX);
        let x = rng.random_range(
            radius + SPAWN_SIDE_PADDING..=area.width - radius - SPAWN_SIDE_PADDING,
        );
        // Strictly below the floor so it is never visible at birth
        let y = area.height + radius + rng.random_range(SPAWN_DEPTH_MIN..=SPAWN_DEPTH_MAX);

        let side = rng.random_range(SPEED_SIDE_MIN..=SPEED_SIDE_MAX);
        let vx = if rng.random_bool(0.5) { -side } else { side };
        let vy = -rng.random_range(SPEED_UP_MIN..=SPEED_UP_MAX);

        Self {
            id,
            pos: Vec2::new(x, y),
            vel: Vec2::new(vx, vy),
            radius,
            alpha: 1.0,
            is_fading: false,
            is_hovered: false,
            entered: false,
        }
    }

    /// Point-in-circle test
    #[inline]
    pub fn hit_test(&self, point: Vec2) -> bool {
        circle_contains(self.pos, self.radius, point)
    }

    /// Start fading out. Idempotent.
    #[inline]
    pub fn mark_for_fade(&mut self) {
        self.is_fading = true;
    }

    /// Advance one tick: move, hover, wall/floor reflection, fade
    pub fn step(&mut self, speed_scale: f32, pointer: Option<Vec2>, area: &PlayArea) {
        self.pos += self.vel * speed_scale;
        self.is_hovered = pointer.is_some_and(|p| self.hit_test(p));

        // Side walls
        if self.pos.x - self.radius <= 0.0 {
            self.pos.x = self.radius;
            self.vel.x = self.vel.x.abs();
        } else if self.pos.x + self.radius >= area.width {
            self.pos.x = area.width - self.radius;
            self.vel.x = -self.vel.x.abs();
        }

        if self.pos.y + self.radius <= area.height {
            self.entered = true;
        }

        if area.floor_bounce
            && self.entered
            && self.vel.y > 0.0
            && self.pos.y + self.radius >= area.height
        {
            self.pos.y = area.height - self.radius;
            self.vel.y = -self.vel.y * FLOOR_RESTITUTION;
            // Keep the upward bias even after a weak bounce
            if self.vel.y > -SPEED_UP_MIN {
                self.vel.y = -SPEED_UP_MIN;
            }
        }

        if self.is_fading {
            self.alpha = (self.alpha - FADE_RATE).clamp(0.0, 1.0);
        }
    }

    /// Removal cause, if any. Fading wins over escaping.
    pub fn removal(&self) -> Option<RemovalCause> {
        if self.alpha <= 0.0 {
            Some(RemovalCause::Faded)
        } else if self.pos.y + self.radius < 0.0 {
            Some(RemovalCause::Escaped)
        } else {
            None
        }
    }

    #[inline]
    pub fn is_removable(&self) -> bool {
        self.removal().is_some()
    }
}
