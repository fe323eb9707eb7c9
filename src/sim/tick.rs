//! Per-frame simulation tick
//!
//! Core game loop that advances a session deterministically. Ordering within
//! a tick is fixed: pending click, kinematics, collisions, removals, level and
//! session transitions, snapshot.

use glam::Vec2;

use super::collision::resolve_collisions;
use super::snapshot::{SimEvent, SimulationSnapshot};
use super::state::SimulationSession;
use super::target::RemovalCause;

/// Input gathered since the previous tick
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TickInput {
    /// Pointer position in play-area space (`None` when outside the area)
    pub pointer: Option<Vec2>,
    /// Click awaiting resolution
    pub click: Option<Vec2>,
}

/// Advance the session by one frame
pub fn tick(session: &mut SimulationSession, input: &TickInput) -> SimulationSnapshot {
    let mut events = Vec::new();

    // Don't tick once complete or stopped
    if !session.is_running() {
        return SimulationSnapshot::capture(session, events);
    }

    session.time_ticks += 1;

    if let Some(id) = input.click.and_then(|point| apply_click(session, point)) {
        events.push(SimEvent::Hit { id });
    }

    let speed_scale = session.speed_scale();
    let area = session.area;
    for target in &mut session.targets {
        target.step(speed_scale, input.pointer, &area);
    }

    resolve_collisions(&mut session.targets);

    remove_finished(session, &mut events);
    advance_progress(session, &mut events);

    SimulationSnapshot::capture(session, events)
}

/// Fade the topmost target under `point`. Returns its id if it started fading.
///
/// Only the topmost target is considered, so a click on a target that is
/// already fading does not reach the one beneath it.
pub fn apply_click(session: &mut SimulationSession, point: Vec2) -> Option<u32> {
    let target = session
        .targets
        .iter_mut()
        .filter(|t| t.hit_test(point))
        .max_by_key(|t| t.id)?;
    if target.is_fading {
        return None;
    }
    target.mark_for_fade();
    Some(target.id)
}

/// Drop faded and escaped targets, crediting each to exactly one counter
fn remove_finished(session: &mut SimulationSession, events: &mut Vec<SimEvent>) {
    let mut popped = 0;
    let mut escaped = 0;

    session.targets.retain(|t| match t.removal() {
        Some(RemovalCause::Faded) => {
            popped += 1;
            events.push(SimEvent::Popped { id: t.id });
            false
        }
        Some(RemovalCause::Escaped) => {
            escaped += 1;
            events.push(SimEvent::Escaped { id: t.id });
            false
        }
        None => true,
    });

    let removed = popped + escaped;
    if removed > 0 {
        session.clicked_count += popped;
        session.escaped_count += escaped;
        session.processed_this_level += removed;
        log::debug!(
            "Removed {} ({} popped, {} escaped), level progress {}/{}",
            removed,
            popped,
            escaped,
            session.processed_this_level,
            session.group_size
        );
    }
}

/// Level up or finish the session when thresholds are crossed
fn advance_progress(session: &mut SimulationSession, events: &mut Vec<SimEvent>) {
    if session.processed_this_level >= session.group_size {
        // No next batch to play: finish on the level just cleared
        if session.at_max_level() || session.remaining_quota() == 0 {
            session.complete(events);
            return;
        }

        session.level += 1;
        session.processed_this_level = 0;
        events.push(SimEvent::LevelUp {
            level: session.level,
        });
        let spawned = session.spawn_batch();
        log::info!(
            "Level {} (speed x{:.2}), spawned {}",
            session.level,
            session.speed_scale(),
            spawned
        );
    }

    if session.quota_cleared() {
        session.complete(events);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;
    use crate::settings::Settings;
    use crate::sim::state::SessionPhase;
    use proptest::prelude::*;

    /// Move every live target past the top edge
    fn lift_all_out(session: &mut SimulationSession) {
        for t in &mut session.targets {
            t.pos.y = -t.radius - 100.0;
        }
    }

    /// Move a single live target past the top edge
    fn lift_out(session: &mut SimulationSession, index: usize) {
        let t = &mut session.targets[index];
        t.pos.y = -t.radius - 100.0;
    }

    fn spread_out(session: &mut SimulationSession) {
        // Park targets apart so collisions don't interfere
        for (i, t) in session.targets.iter_mut().enumerate() {
            t.pos = Vec2::new(40.0 + (i % 10) as f32 * 72.0, 300.0 + (i / 10) as f32 * 70.0);
            t.vel = Vec2::ZERO;
        }
    }

    #[test]
    fn test_click_on_empty_space_changes_nothing() {
        let mut session = SimulationSession::new(Settings::default(), 11);
        spread_out(&mut session);
        let input = TickInput {
            pointer: Some(Vec2::new(5.0, 5.0)),
            click: Some(Vec2::new(5.0, 5.0)),
        };
        let snap = tick(&mut session, &input);
        assert!(snap.targets.iter().all(|t| !t.is_fading));
        assert!(snap.events.is_empty());
    }

    #[test]
    fn test_click_fades_topmost() {
        let mut session = SimulationSession::new(Settings::default(), 11);
        spread_out(&mut session);
        // Stack the first and last targets on the same spot
        let spot = Vec2::new(400.0, 200.0);
        session.targets[0].pos = spot;
        let last = session.targets.len() - 1;
        session.targets[last].pos = spot;
        let top_id = session.targets[last].id;

        let snap = tick(
            &mut session,
            &TickInput {
                pointer: Some(spot),
                click: Some(spot),
            },
        );
        assert_eq!(snap.events, vec![SimEvent::Hit { id: top_id }]);
        let fading: Vec<u32> = snap
            .targets
            .iter()
            .filter(|t| t.is_fading)
            .map(|t| t.id)
            .collect();
        assert_eq!(fading, vec![top_id]);
    }

    #[test]
    fn test_clicked_target_counts_as_clicked() {
        let mut session = SimulationSession::new(Settings::default(), 12);
        spread_out(&mut session);
        let point = session.targets[3].pos;
        let id = session.targets[3].id;
        tick(
            &mut session,
            &TickInput {
                click: Some(point),
                ..Default::default()
            },
        );

        let mut popped = false;
        for _ in 0..100 {
            let snap = tick(&mut session, &TickInput::default());
            if snap.events.contains(&SimEvent::Popped { id }) {
                popped = true;
                break;
            }
        }
        assert!(popped);
        assert_eq!(session.clicked_count, 1);
        assert_eq!(session.escaped_count, 0);
        assert_eq!(session.processed_this_level, 1);
        assert!(session.targets.iter().all(|t| t.id != id));
    }

    #[test]
    fn test_level_up_after_group_processed() {
        let mut session = SimulationSession::new(Settings::default(), 13);
        spread_out(&mut session);

        // Nine escapes: still level 1
        for i in 0..9 {
            lift_out(&mut session, i);
        }
        let snap = tick(&mut session, &TickInput::default());
        assert_eq!(snap.level, 1);
        assert_eq!(snap.processed_this_level, 9);
        assert_eq!(snap.escaped_count, 9);

        // Tenth: level 2 and a fresh batch
        lift_all_out(&mut session);
        let snap = tick(&mut session, &TickInput::default());
        assert_eq!(snap.level, 2);
        assert_eq!(snap.processed_this_level, 0);
        assert_eq!(snap.alive_count, 10);
        assert_eq!(snap.total_spawned, 20);
        assert!(snap.events.contains(&SimEvent::LevelUp { level: 2 }));
        assert!((snap.speed_scale - 1.22).abs() < 1e-5);
    }

    #[test]
    fn test_max_level_completes_session() {
        let settings = Settings {
            target_total: 200,
            group_size: 10,
            max_levels: Some(MAX_LEVELS),
            ..Default::default()
        };
        let mut session = SimulationSession::new(settings, 14);
        for level in 1..=MAX_LEVELS {
            assert_eq!(session.level, level);
            lift_all_out(&mut session);
            tick(&mut session, &TickInput::default());
        }
        assert_eq!(session.phase, SessionPhase::Complete);
        assert!(!session.is_running());
        assert_eq!(session.level, MAX_LEVELS);
        assert_eq!(session.escaped_count, 100);
        // No batch spawned past the cap
        assert_eq!(session.total_spawned, 100);

        // Further ticks with pointer activity are ignored
        let before = session.time_ticks;
        let snap = tick(
            &mut session,
            &TickInput {
                pointer: Some(Vec2::new(100.0, 100.0)),
                click: Some(Vec2::new(100.0, 100.0)),
            },
        );
        assert!(!snap.running);
        assert_eq!(session.time_ticks, before);
        assert!(session.unlocks.mid_group && session.unlocks.max_group);
    }

    #[test]
    fn test_quota_exhaustion_completes_uncapped_session() {
        let settings = Settings {
            target_total: 50,
            group_size: 20,
            max_levels: None,
            ..Default::default()
        };
        let mut session = SimulationSession::new(settings, 15);
        lift_all_out(&mut session);
        tick(&mut session, &TickInput::default());
        lift_all_out(&mut session);
        tick(&mut session, &TickInput::default());
        assert_eq!(session.level, 3);
        assert_eq!(session.targets.len(), 10);
        assert!(session.is_running());

        lift_all_out(&mut session);
        let snap = tick(&mut session, &TickInput::default());
        assert_eq!(snap.phase, SessionPhase::Complete);
        assert_eq!(snap.total_spawned, 50);
        assert_eq!(snap.processed_this_level, 10);
        assert!(snap.events.contains(&SimEvent::SessionComplete { level: 3 }));
        assert!(!session.unlocks.mid_group);
    }

    #[test]
    fn test_quota_ending_on_level_boundary_keeps_level() {
        let settings = Settings {
            target_total: 50,
            group_size: 10,
            max_levels: None,
            ..Default::default()
        };
        let mut session = SimulationSession::new(settings, 18);
        for _ in 0..4 {
            lift_all_out(&mut session);
            tick(&mut session, &TickInput::default());
        }
        assert_eq!(session.level, 5);
        assert!(session.is_running());

        lift_all_out(&mut session);
        let snap = tick(&mut session, &TickInput::default());
        assert_eq!(snap.phase, SessionPhase::Complete);
        assert_eq!(snap.level, 5);
        assert_eq!(snap.alive_count, 0);
        assert_eq!(snap.total_spawned, 50);
        assert!(
            !snap
                .events
                .iter()
                .any(|e| matches!(e, SimEvent::LevelUp { .. }))
        );
        assert!(snap.events.contains(&SimEvent::SessionComplete { level: 5 }));
        assert!(snap.events.contains(&SimEvent::Unlocked { group_size: 15 }));
    }

    #[test]
    fn test_stop_halts_ticking() {
        let mut session = SimulationSession::new(Settings::default(), 16);
        session.stop();
        let positions: Vec<Vec2> = session.targets.iter().map(|t| t.pos).collect();
        let snap = tick(&mut session, &TickInput::default());
        assert!(!snap.running);
        assert_eq!(snap.phase, SessionPhase::Stopped);
        let after: Vec<Vec2> = session.targets.iter().map(|t| t.pos).collect();
        assert_eq!(positions, after);

        session.reset(true);
        assert!(tick(&mut session, &TickInput::default()).running);
    }

    #[test]
    fn test_snapshot_lists_spawn_order() {
        let mut session = SimulationSession::new(Settings::default(), 17);
        let snap = tick(&mut session, &TickInput::default());
        assert!(snap.targets.windows(2).all(|w| w[0].id < w[1].id));
        assert_eq!(snap.alive_count as usize, snap.targets.len());
    }

    #[test]
    fn test_determinism() {
        let mut s1 = SimulationSession::new(Settings::default(), 99999);
        let mut s2 = SimulationSession::new(Settings::default(), 99999);

        let inputs = [
            TickInput {
                pointer: Some(Vec2::new(300.0, 400.0)),
                ..Default::default()
            },
            TickInput {
                pointer: Some(Vec2::new(310.0, 390.0)),
                click: Some(Vec2::new(310.0, 390.0)),
            },
            TickInput::default(),
        ];

        for _ in 0..400 {
            for input in &inputs {
                let a = tick(&mut s1, input);
                let b = tick(&mut s2, input);
                assert_eq!(a, b);
            }
        }
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(24))]

        #[test]
        fn prop_counters_track_removals(seed in any::<u64>(), clicks in prop::collection::vec((0.0f32..800.0, 0.0f32..600.0), 1..40)) {
            let mut session = SimulationSession::new(Settings::default(), seed);
            let mut seen = std::collections::HashSet::new();
            let mut frame = 0usize;
            while session.is_running() && frame < 6000 {
                let click = if frame % 15 == 0 {
                    let (x, y) = clicks[(frame / 15) % clicks.len()];
                    Some(Vec2::new(x, y))
                } else {
                    None
                };
                let before = session.removed_total();
                let processed_before = session.processed_this_level;
                let level_before = session.level;
                let snap = tick(&mut session, &TickInput { pointer: click, click });

                let removed_ids: Vec<u32> = snap.events.iter().filter_map(|e| match e {
                    SimEvent::Popped { id } | SimEvent::Escaped { id } => Some(*id),
                    _ => None,
                }).collect();
                prop_assert_eq!(snap.removed_total - before, removed_ids.len() as u32);
                for id in removed_ids {
                    prop_assert!(seen.insert(id));
                }

                if snap.level > level_before {
                    prop_assert_eq!(processed_before + (snap.removed_total - before), session.group_size);
                    prop_assert_eq!(snap.processed_this_level, 0);
                } else if snap.running {
                    prop_assert!(snap.processed_this_level < session.group_size);
                }
                prop_assert!(snap.total_spawned <= snap.target_total);
                for t in &snap.targets {
                    prop_assert!((0.0..=1.0).contains(&t.alpha));
                }
                frame += 1;
            }
        }
    }
}
