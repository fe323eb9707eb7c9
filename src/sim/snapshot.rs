//! Read-only view of the simulation handed to rendering and HUD layers

use serde::{Deserialize, Serialize};

use super::state::{SessionPhase, SimulationSession};
use super::target::Target;

/// Something that happened during a tick, for audio/particle layers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SimEvent {
    /// A click landed and the target started fading
    Hit { id: u32 },
    /// A clicked target finished fading and was removed
    Popped { id: u32 },
    /// A target drifted off the top
    Escaped { id: u32 },
    /// A new level started
    LevelUp { level: u32 },
    /// The session reached its terminal state
    SessionComplete { level: u32 },
    /// A group size became selectable for later sessions
    Unlocked { group_size: u32 },
}

/// One live target as seen by the renderer
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TargetView {
    pub id: u32,
    pub x: f32,
    pub y: f32,
    pub radius: f32,
    pub alpha: f32,
    pub is_hovered: bool,
    pub is_fading: bool,
}

impl From<&Target> for TargetView {
    fn from(t: &Target) -> Self {
        Self {
            id: t.id,
            x: t.pos.x,
            y: t.pos.y,
            radius: t.radius,
            alpha: t.alpha,
            is_hovered: t.is_hovered,
            is_fading: t.is_fading,
        }
    }
}

/// Complete per-tick state for external consumers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationSnapshot {
    /// Live targets in spawn order (later entries draw on top)
    pub targets: Vec<TargetView>,
    pub level: u32,
    pub alive_count: u32,
    pub clicked_count: u32,
    pub escaped_count: u32,
    pub processed_this_level: u32,
    pub group_size: u32,
    pub target_total: u32,
    pub total_spawned: u32,
    pub running: bool,
    pub phase: SessionPhase,
    pub speed_scale: f32,
    /// Clicked plus escaped
    pub removed_total: u32,
    /// Removed as a percentage of spawned (0 before anything spawns)
    pub removed_percent: f32,
    /// Events raised by the tick that produced this snapshot
    pub events: Vec<SimEvent>,
}

impl SimulationSnapshot {
    pub fn capture(session: &SimulationSession, events: Vec<SimEvent>) -> Self {
        Self {
            targets: session.targets.iter().map(TargetView::from).collect(),
            level: session.level,
            alive_count: session.targets.len() as u32,
            clicked_count: session.clicked_count,
            escaped_count: session.escaped_count,
            processed_this_level: session.processed_this_level,
            group_size: session.group_size,
            target_total: session.target_total,
            total_spawned: session.total_spawned,
            running: session.is_running(),
            phase: session.phase,
            speed_scale: session.speed_scale(),
            removed_total: session.removed_total(),
            removed_percent: session.removed_percent(),
            events,
        }
    }
}
