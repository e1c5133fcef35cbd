//! Chroma Lab entry point
//!
//! Runs a headless session for a fixed number of ticks and prints the final
//! snapshot as JSON.
//!
//! Usage: `chroma-lab [MODE | CONFIG.json] [TICKS] [SEED]`

#[cfg(not(target_arch = "wasm32"))]
fn main() -> std::process::ExitCode {
    env_logger::init();
    log::info!("Chroma Lab (headless) starting...");

    match native::run(std::env::args().skip(1).collect()) {
        Ok(()) => std::process::ExitCode::SUCCESS,
        Err(code) => code,
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // Embedders drive the library directly on wasm
}

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::process::ExitCode;

    use chroma_lab::consts::{CANVAS_HEIGHT, CANVAS_WIDTH, SIM_DT, TICK_HZ};
    use chroma_lab::sim::{Command, SimEvent, SimState, TickInput, WaveEvent, tick};
    use chroma_lab::{Color, ConfigError, GameMode, SimConfig};
    use glam::Vec2;

    const DEFAULT_SEED: u64 = 0xC0105;

    pub fn run(args: Vec<String>) -> Result<(), ExitCode> {
        let config = match resolve_config(args.first().map(String::as_str)) {
            Ok(config) => config,
            Err(e) => {
                log::error!("Failed to load configuration: {}", e);
                return Err(ExitCode::FAILURE);
            }
        };
        let ticks = parse_arg(args.get(1), 5 * TICK_HZ as u64, "tick count")?;
        let seed = parse_arg(args.get(2), DEFAULT_SEED, "seed")?;

        let mut state = SimState::new(seed, config);
        state.set_target(Color::from_hex(0xC06030), 0.85);

        let mut input = opening_moves(state.config.mode);
        for _ in 0..ticks {
            tick(&mut state, &input, SIM_DT);
            input.commands.clear();
            for event in state.drain_events() {
                log_event(state.time_ticks, &event);
            }
        }

        log::info!(
            "Finished {} ticks: mix #{:06X}, similarity {:?}",
            state.time_ticks,
            state.mixed_color.to_hex(),
            state.similarity
        );

        match state.snapshot().to_json() {
            Ok(json) => {
                println!("{}", json);
                Ok(())
            }
            Err(e) => {
                log::error!("Failed to serialize snapshot: {}", e);
                Err(ExitCode::FAILURE)
            }
        }
    }

    /// A mode name picks a preset; anything else is a config file path
    fn resolve_config(arg: Option<&str>) -> Result<SimConfig, ConfigError> {
        let Some(arg) = arg else {
            return Ok(SimConfig::default());
        };
        match arg.parse::<GameMode>() {
            Ok(mode) => Ok(SimConfig::for_mode(mode)),
            Err(_) if arg.ends_with(".json") => SimConfig::load(arg),
            Err(e) => Err(e),
        }
    }

    fn parse_arg(arg: Option<&String>, default: u64, what: &str) -> Result<u64, ExitCode> {
        match arg {
            None => Ok(default),
            Some(raw) => raw.parse().map_err(|e| {
                log::error!("Invalid {} {:?}: {}", what, raw, e);
                ExitCode::FAILURE
            }),
        }
    }

    /// First-tick commands that set up a small scene for the chosen mode
    fn opening_moves(mode: GameMode) -> TickInput {
        let center = Vec2::new(CANVAS_WIDTH / 2.0, CANVAS_HEIGHT / 2.0);
        let palette = [Color::RED, Color::YELLOW, Color::CYAN, Color::MAGENTA];

        match mode {
            GameMode::Waves => {
                let sources = palette.iter().enumerate().map(|(i, &color)| {
                    let angle = i as f32 * std::f32::consts::FRAC_PI_2;
                    Command::SpawnSource {
                        pos: center + Vec2::from_angle(angle) * 120.0,
                        color,
                        frequency: 1.5,
                        speed: 1.2,
                    }
                });
                let obstacle = Command::SpawnObstacle {
                    pos: center,
                    radius: 30.0,
                    color: Color::BLUE,
                    reflective: true,
                    absorptive: false,
                };
                TickInput::with(sources.chain(std::iter::once(obstacle)))
            }
            _ => TickInput::with(palette.iter().enumerate().map(|(i, &color)| {
                Command::SpawnBody {
                    pos: center + Vec2::new((i as f32 - 1.5) * 45.0, (i % 2) as f32 * 30.0),
                    radius: 25.0,
                    color,
                    grow: true,
                }
            })),
        }
    }

    fn log_event(at: u64, event: &SimEvent) {
        match event {
            SimEvent::Merged {
                consumed,
                merged,
                color,
                ..
            } => log::info!(
                "[{}] #{} + #{} merged into #{} (#{:06X})",
                at,
                consumed.0,
                consumed.1,
                merged,
                color.to_hex()
            ),
            SimEvent::Split { parent, children, .. } => log::info!(
                "[{}] #{} split into #{} + #{}",
                at,
                parent,
                children.0,
                children.1
            ),
            SimEvent::Wave(WaveEvent::Emitted { .. }) => log::trace!("[{}] {:?}", at, event),
            _ => log::debug!("[{}] {:?}", at, event),
        }
    }
}
