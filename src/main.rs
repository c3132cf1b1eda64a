//! Shinobi - headless combat demo
//!
//! Builds a small level, plays a scripted input timeline through the
//! simulation at a fixed timestep and logs what happens.

mod settings;

use std::path::PathBuf;

use anyhow::{Context, Result};
use glam::Vec2;
use shinobi_core::{GameTime, Tag};
use shinobi_game::{AnimationLog, GizmoBuffer, InputAction, InputState, Simulation, TickReport};
use tracing::{debug, info};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use settings::Settings;

/// Render frame length the demo pretends to run at
const FRAME_DELTA: f32 = 1.0 / 50.0;
const DEMO_TICKS: u64 = 300;

/// Held actions over a tick range. Ranges are half-open.
const SCRIPT: &[(u64, u64, &[InputAction])] = &[
    (30, 90, &[InputAction::MoveRight]),
    (90, 110, &[InputAction::MoveRight, InputAction::Run]),
    (112, 114, &[InputAction::AttackFast]),
    (120, 122, &[InputAction::Jump]),
    (150, 170, &[InputAction::Defend, InputAction::MoveLeft]),
    (180, 182, &[InputAction::Shoot]),
    (190, 192, &[InputAction::AttackStrong, InputAction::AttackSpecial]),
    (200, 240, &[InputAction::MoveLeft]),
    (240, 242, &[InputAction::Shoot]),
];

fn held_at(tick: u64) -> Vec<InputAction> {
    SCRIPT
        .iter()
        .filter(|(start, end, _)| (*start..*end).contains(&tick))
        .flat_map(|(_, _, actions)| actions.iter().copied())
        .collect()
}

/// Turn the held set for this tick into press/release edges
fn apply_script(input: &mut InputState, tick: u64) {
    let held = held_at(tick);
    for action in InputAction::ALL {
        match (held.contains(&action), input.is_held(action)) {
            (true, false) => input.press(action),
            (false, true) => input.release(action),
            _ => {}
        }
    }
}

fn build_level(sim: &mut Simulation, settings: &Settings) -> Result<()> {
    sim.set_projectile_template(settings.projectile_template())
        .context("Invalid projectile template")?;

    sim.add_ground(Vec2::new(0.0, -0.5), Vec2::new(50.0, 0.5));
    sim.add_ground(Vec2::new(-8.0, 2.0), Vec2::new(0.5, 2.0));

    sim.add_enemy(Vec2::new(7.4, 1.0), 0.3);
    sim.add_enemy(Vec2::new(14.0, 1.2), 0.3);
    sim.add_enemy(Vec2::new(-1.5, 1.2), 0.3);

    sim.spawn_character(settings.character.clone(), Vec2::new(0.0, 0.9))
        .context("Invalid character configuration")?;
    Ok(())
}

fn log_report(tick: u64, report: &TickReport) {
    if let Some(character) = &report.character {
        if character.jumped {
            info!(tick, "jump");
        }
        for attack in &character.attacks {
            info!(tick, ?attack, hits = character.kills.len(), "melee");
        }
    }
    for entity in &report.spawned {
        info!(tick, %entity, "projectile away");
    }
    for (entity, status) in &report.impacts {
        info!(tick, %entity, ?status, "projectile impact");
    }
    for entity in &report.expired {
        info!(tick, %entity, "projectile expired");
    }
    for entity in &report.killed {
        info!(tick, %entity, "enemy destroyed");
    }
}

fn main() -> Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber).context("Failed to set subscriber")?;

    info!("Starting Shinobi demo...");

    let path = std::env::args().nth(1).map(PathBuf::from);
    let settings = Settings::load(path.as_deref());
    settings.validate().context("Invalid time configuration")?;

    let mut sim = Simulation::new(settings.physics_config());
    build_level(&mut sim, &settings)?;
    info!(enemies = sim.count_tagged(Tag::Enemy), "level ready");

    let mut time = GameTime::new(settings.time.clone());
    let mut input = InputState::new();
    let mut animator = AnimationLog::new();
    let mut tick = 0;

    while tick < DEMO_TICKS {
        time.update(FRAME_DELTA);
        for _ in 0..time.fixed_steps() {
            apply_script(&mut input, tick);
            let report = sim.tick(&input, &mut animator);
            log_report(tick, &report);
            input.clear_frame();
            tick += 1;
        }

        let mut overlay = GizmoBuffer::default();
        sim.draw_debug(&mut overlay);
        debug!(frame = time.frame_count, gizmos = overlay.gizmos.len(), "frame");
    }

    if let Some(character) = sim.character() {
        let position = character.position();
        info!(
            x = position.x,
            y = position.y,
            facing = ?character.facing(),
            "character at rest"
        );
    }
    info!(
        ticks = tick,
        seconds = time.total_time,
        enemies_left = sim.count_tagged(Tag::Enemy),
        animation_triggers = animator.triggers().len(),
        "demo finished"
    );
    Ok(())
}
