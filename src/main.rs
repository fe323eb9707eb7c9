//! Float Pop entry point
//!
//! The browser build is driven from JavaScript through `float_pop::web`.
//! Natively this runs a headless autoplayed session and logs the result.
//!
//! Usage: `float-pop [settings.json] [seed]`

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use float_pop::Settings;

    env_logger::init();
    log::info!("Float Pop (native) starting...");

    let mut args = std::env::args().skip(1);
    let settings = match args.next() {
        Some(path) => match std::fs::read_to_string(&path) {
            Ok(json) => match Settings::from_json(&json) {
                Ok(settings) => settings,
                Err(e) => {
                    log::error!("{}: {}", path, e);
                    std::process::exit(2);
                }
            },
            Err(e) => {
                log::error!("Cannot read {}: {}", path, e);
                std::process::exit(2);
            }
        },
        None => Settings::default(),
    };
    let seed = args
        .next()
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or(12345);

    autoplay::run(settings, seed);
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is float_pop::web::wasm_start, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
mod autoplay {
    use float_pop::Settings;
    use float_pop::sim::{SimEvent, SimulationSession, SimulationSnapshot, TickInput, tick};
    use glam::Vec2;

    /// Frames between clicks (a human-ish reaction time at 60 fps)
    const CLICK_INTERVAL: u64 = 20;
    /// Safety cap on frames for one run
    const MAX_FRAMES: u64 = 200_000;

    /// Aim at the highest visible target that hasn't been clicked yet
    fn pick_target(snapshot: &SimulationSnapshot, height: f32) -> Option<Vec2> {
        snapshot
            .targets
            .iter()
            .filter(|t| !t.is_fading && t.y - t.radius < height && t.y + t.radius > 0.0)
            .min_by(|a, b| a.y.partial_cmp(&b.y).unwrap_or(std::cmp::Ordering::Equal))
            .map(|t| Vec2::new(t.x, t.y))
    }

    pub fn run(settings: Settings, seed: u64) {
        let height = settings.height;
        let mut session = SimulationSession::new(settings, seed);
        log::info!("Game initialized with seed: {}", seed);

        let mut snapshot = session.snapshot();
        let mut frame: u64 = 0;
        while snapshot.running && frame < MAX_FRAMES {
            frame += 1;
            let aim = pick_target(&snapshot, height);
            let input = TickInput {
                pointer: aim,
                click: aim.filter(|_| frame % CLICK_INTERVAL == 0),
            };
            snapshot = tick(&mut session, &input);

            for event in &snapshot.events {
                match event {
                    SimEvent::LevelUp { level } => {
                        log::info!("Frame {}: reached level {}", frame, level)
                    }
                    SimEvent::Unlocked { group_size } => {
                        log::info!("Frame {}: unlocked group size {}", frame, group_size)
                    }
                    _ => {}
                }
            }
        }

        if snapshot.running {
            log::warn!("Stopped after {} frames without finishing", frame);
            session.stop();
        }

        println!(
            "level {} | clicked {} | escaped {} | removed {:.1}% of {} spawned | {} frames",
            snapshot.level,
            snapshot.clicked_count,
            snapshot.escaped_count,
            snapshot.removed_percent,
            snapshot.total_spawned,
            frame
        );
        println!("selectable group sizes: {:?}", session.unlocks.group_sizes());
    }
}
