//! Target-target collision detection and response
//!
//! Equal unit masses, one restitution constant. Pairs are checked brute force;
//! live counts stay in the tens.

use glam::Vec2;

use super::target::Target;
use crate::consts::*;

/// Overlap between two circles
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    /// Unit normal pointing from the first circle toward the second
    pub normal: Vec2,
    /// Sum of radii minus center distance (positive when overlapping)
    pub penetration: f32,
}

/// Check two circles for overlap
///
/// Concentric circles get a substitute distance and an arbitrary but finite
/// normal so the response never produces NaN.
pub fn circle_contact(a_pos: Vec2, a_radius: f32, b_pos: Vec2, b_radius: f32) -> Option<Contact> {
    let delta = b_pos - a_pos;
    let dist_sq = delta.length_squared();
    let sum = a_radius + b_radius;
    if dist_sq >= sum * sum {
        return None;
    }

    let dist = dist_sq.sqrt();
    let (normal, dist) = if dist < MIN_CONTACT_DISTANCE {
        (Vec2::X, MIN_CONTACT_DISTANCE)
    } else {
        (delta / dist, dist)
    };

    Some(Contact {
        normal,
        penetration: sum - dist,
    })
}

/// Resolve one overlapping pair in place. Returns true if they overlapped.
pub fn resolve_pair(a: &mut Target, b: &mut Target) -> bool {
    let Some(contact) = circle_contact(a.pos, a.radius, b.pos, b.radius) else {
        return false;
    };
    let n = contact.normal;

    // Split the overlap evenly, plus slop so rounding can't leave them touching
    let push = contact.penetration * 0.5 + COLLISION_SLOP;
    a.pos -= n * push;
    b.pos += n * push;

    let rel_vel = b.vel - a.vel;
    let vel_along_normal = rel_vel.dot(n);
    if vel_along_normal > 0.0 {
        // Already separating
        return true;
    }

    // Unit masses: inverse mass sum is 2
    let j = -(1.0 + RESTITUTION) * vel_along_normal / 2.0;
    a.vel -= n * j;
    b.vel += n * j;

    clamp_downward(&mut a.vel);
    clamp_downward(&mut b.vel);
    true
}

/// Resolve every overlapping pair of non-fading targets. Returns the pair count.
pub fn resolve_collisions(targets: &mut [Target]) -> usize {
    let mut resolved = 0;
    for i in 0..targets.len() {
        if targets[i].is_fading {
            continue;
        }
        // Split so both halves of the pair can be borrowed mutably
        let (head, tail) = targets.split_at_mut(i + 1);
        let a = &mut head[i];
        for b in tail.iter_mut() {
            if b.is_fading {
                continue;
            }
            if resolve_pair(a, b) {
                resolved += 1;
            }
        }
    }
    resolved
}

/// Collisions may slow the climb but never leave a target sinking fast
#[inline]
fn clamp_downward(vel: &mut Vec2) {
    if vel.y > MAX_DOWNWARD_SPEED {
        vel.y = MAX_DOWNWARD_SPEED;
    }
}
