//! Session state and core simulation types
//!
//! Everything a running session needs lives in `SimulationSession`; there is
//! no global state. The caller owns the session and passes it to `tick`.

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::snapshot::{SimEvent, SimulationSnapshot};
use super::target::{PlayArea, Target};
use crate::consts::*;
use crate::settings::{Settings, SettingsError};

/// Current phase of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionPhase {
    /// Targets are moving and the player is scoring
    Active,
    /// Quota exhausted or final level cleared; waits for a reset
    Complete,
    /// Halted from outside; waits for a reset
    Stopped,
}

/// Group sizes earned across sessions
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Unlocks {
    pub mid_group: bool,
    pub max_group: bool,
}

impl Unlocks {
    /// Group sizes currently selectable, smallest first
    pub fn group_sizes(&self) -> Vec<u32> {
        GROUP_SIZE_OPTIONS
            .iter()
            .copied()
            .filter(|&size| self.allows(size))
            .collect()
    }

    /// Whether a group size may be chosen for a new session
    pub fn allows(&self, group_size: u32) -> bool {
        match GROUP_SIZE_OPTIONS.iter().position(|&s| s == group_size) {
            Some(0) => true,
            Some(1) => self.mid_group,
            Some(_) => self.max_group,
            None => false,
        }
    }

    /// Record a finished session. Returns the group sizes it newly unlocked.
    pub fn record(&mut self, level: u32, level_cap: u32) -> Vec<u32> {
        let mut unlocked = Vec::new();
        if !self.mid_group && level >= UNLOCK_MID_LEVEL {
            self.mid_group = true;
            unlocked.push(GROUP_SIZE_OPTIONS[1]);
        }
        if !self.max_group && level >= level_cap {
            self.max_group = true;
            unlocked.push(GROUP_SIZE_OPTIONS[2]);
        }
        unlocked
    }
}

/// Complete simulation state for one player
#[derive(Debug, Clone)]
pub struct SimulationSession {
    /// Seed the RNG stream started from
    pub seed: u64,
    rng: Pcg32,
    /// Configuration applied at the next reset
    pub settings: Settings,
    pub area: PlayArea,
    /// Live targets in spawn order
    pub targets: Vec<Target>,
    /// Current level, starting at 1
    pub level: u32,
    /// Group size in effect for this session
    pub group_size: u32,
    /// Spawn quota in effect for this session
    pub target_total: u32,
    /// Level cap in effect for this session
    pub max_levels: Option<u32>,
    pub total_spawned: u32,
    pub clicked_count: u32,
    pub escaped_count: u32,
    pub processed_this_level: u32,
    pub phase: SessionPhase,
    /// Survives resets
    pub unlocks: Unlocks,
    /// Ticks simulated since the last reset
    pub time_ticks: u64,
    next_id: u32,
}

impl SimulationSession {
    /// Create a session and spawn the first batch
    pub fn new(settings: Settings, seed: u64) -> Self {
        assert_settings(&settings);
        let mut session = Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            area: play_area(&settings),
            targets: Vec::new(),
            level: 1,
            group_size: settings.group_size,
            target_total: settings.target_total,
            max_levels: settings.max_levels,
            total_spawned: 0,
            clicked_count: 0,
            escaped_count: 0,
            processed_this_level: 0,
            phase: SessionPhase::Active,
            unlocks: Unlocks::default(),
            time_ticks: 0,
            next_id: 1,
            settings,
        };
        session.reset(false);
        session
    }

    /// Replace the configuration. Takes effect on the next `reset`.
    pub fn configure(&mut self, settings: Settings) {
        assert_settings(&settings);
        self.settings = settings;
    }

    /// Restart at level 1 with a fresh batch.
    ///
    /// Group size, level cap and play area are re-read from the configuration.
    /// With `preserve_target_total` the current spawn quota is kept, otherwise
    /// it is re-read as well.
    pub fn reset(&mut self, preserve_target_total: bool) {
        if !preserve_target_total {
            self.target_total = self.settings.target_total;
        }
        self.group_size = self.settings.group_size;
        self.max_levels = self.settings.max_levels;
        self.area = play_area(&self.settings);

        self.targets.clear();
        self.level = 1;
        self.total_spawned = 0;
        self.clicked_count = 0;
        self.escaped_count = 0;
        self.processed_this_level = 0;
        self.time_ticks = 0;
        self.phase = SessionPhase::Active;

        let spawned = self.spawn_batch();
        log::info!(
            "Session reset: {} targets in groups of {}, first batch {}",
            self.target_total,
            self.group_size,
            spawned
        );
    }

    /// Begin a new session with an unlocked group size
    pub fn start_new_session(&mut self, group_size: u32) -> Result<(), SettingsError> {
        if !GROUP_SIZE_OPTIONS.contains(&group_size) {
            log::warn!("Rejected unknown group size {}", group_size);
            return Err(SettingsError::GroupSize(group_size));
        }
        if !self.unlocks.allows(group_size) {
            log::warn!("Rejected locked group size {}", group_size);
            return Err(SettingsError::GroupSizeLocked(group_size));
        }
        self.settings.group_size = group_size;
        self.reset(false);
        Ok(())
    }

    /// Halt ticking until the next reset
    pub fn stop(&mut self) {
        if self.phase == SessionPhase::Active {
            self.phase = SessionPhase::Stopped;
            log::info!("Session stopped at level {}", self.level);
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Spawn the next group, bounded by the remaining quota. Returns the count.
    pub fn spawn_batch(&mut self) -> u32 {
        let count = self.group_size.min(self.remaining_quota());
        for _ in 0..count {
            let id = self.next_entity_id();
            let target = Target::spawn(id, &self.area, &mut self.rng);
            self.targets.push(target);
        }
        self.total_spawned += count;
        log::debug!(
            "Spawned {} targets ({}/{})",
            count,
            self.total_spawned,
            self.target_total
        );
        count
    }

    /// Targets that may still be spawned this session
    pub fn remaining_quota(&self) -> u32 {
        self.target_total.saturating_sub(self.total_spawned)
    }

    /// Every target has been spawned and none are left alive
    pub fn quota_cleared(&self) -> bool {
        self.total_spawned >= self.target_total && self.targets.is_empty()
    }

    /// Current level is the last one
    pub fn at_max_level(&self) -> bool {
        self.max_levels.is_some_and(|max| self.level >= max)
    }

    pub fn is_running(&self) -> bool {
        self.phase == SessionPhase::Active
    }

    pub fn speed_scale(&self) -> f32 {
        crate::speed_scale(self.level)
    }

    pub fn removed_total(&self) -> u32 {
        self.clicked_count + self.escaped_count
    }

    pub fn removed_percent(&self) -> f32 {
        if self.total_spawned == 0 {
            0.0
        } else {
            self.removed_total() as f32 / self.total_spawned as f32 * 100.0
        }
    }

    /// Enter the terminal state and evaluate unlocks
    pub(crate) fn complete(&mut self, events: &mut Vec<SimEvent>) {
        self.phase = SessionPhase::Complete;
        events.push(SimEvent::SessionComplete { level: self.level });
        log::info!(
            "Session complete at level {}: {} clicked, {} escaped",
            self.level,
            self.clicked_count,
            self.escaped_count
        );

        let level_cap = self.max_levels.unwrap_or(MAX_LEVELS);
        for group_size in self.unlocks.record(self.level, level_cap) {
            log::info!("Unlocked group size {}", group_size);
            events.push(SimEvent::Unlocked { group_size });
        }
    }

    /// Snapshot without advancing (e.g. for the first frame)
    pub fn snapshot(&self) -> SimulationSnapshot {
        SimulationSnapshot::capture(self, Vec::new())
    }
}

fn play_area(settings: &Settings) -> PlayArea {
    PlayArea {
        width: settings.width,
        height: settings.height,
        floor_bounce: settings.floor_bounce,
    }
}

/// Zero sizes or an unusable play area mean a broken caller
fn assert_settings(settings: &Settings) {
    assert!(settings.group_size > 0, "group size must be positive");
    assert!(settings.target_total > 0, "target total must be positive");
    assert!(settings.max_levels != Some(0), "max levels must be positive");
    assert!(
        settings.has_valid_area(),
        "play area {}x{} cannot fit a target",
        settings.width,
        settings.height
    );
}
