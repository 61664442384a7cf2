//! Headless симуляция UMBRA
//!
//! Запускает Bevy App без рендера: один персонаж на уровне с платформой и
//! низким потолком, intent генерируется seeded RNG.
//!
//! Usage: umbra_simulation [tuning.json]

use std::time::Duration;

use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;
use rand::Rng;

use umbra_simulation::{
    create_headless_app, log, log_error, log_info, spawn_character_with_body, CharacterTuning, DeterministicRng,
    FlatGroundBody, Locomotion, LocomotionIntent, PhysicalResources, StealthSignals, Surface,
};

const SEED: u64 = 42;
const TICK_COUNT: u32 = 1000;

fn main() {
    let mut app = create_headless_app(SEED);
    log_info(&format!("Starting UMBRA headless simulation (seed: {})", SEED));

    let tuning = match std::env::args().nth(1) {
        Some(path) => match CharacterTuning::from_path(&path) {
            Ok(tuning) => {
                log_info(&format!("📄 Tuning loaded from {}", path));
                tuning
            }
            Err(err) => {
                log_error(&format!("❌ {} (using defaults)", err));
                CharacterTuning::default()
            }
        },
        None => CharacterTuning::default(),
    };

    for issue in tuning.validate() {
        log(&format!("⚠️ tuning: {}", issue));
    }

    // Ровно один fixed тик на app.update()
    app.insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_secs_f64(1.0 / 60.0)));
    app.insert_resource(tuning.clone());
    app.add_systems(FixedFirst, drive_random_intent);

    let body = FlatGroundBody::on_floor(Vec3::ZERO)
        .with_capsule_height(tuning.locomotion.standing_height)
        .with_floor(Surface::new(4.0, 8.0, 1.2))
        .with_ceiling(Surface::new(-6.0, -2.0, 2.4));
    let world = app.world_mut();
    spawn_character_with_body(&mut world.commands(), body, &tuning);
    world.flush();

    for tick in 0..TICK_COUNT {
        app.update();

        if tick % 100 == 0 {
            report(app.world_mut(), tick);
        }
    }

    log_info("Simulation complete!");
}

/// Случайный intent раз в тик (детерминированно от seed)
fn drive_random_intent(mut rng: ResMut<DeterministicRng>, mut intents: Query<&mut LocomotionIntent>) {
    for mut intent in intents.iter_mut() {
        // Меняем направление изредка, чтобы персонаж успевал разогнаться
        if rng.rng.gen_bool(0.02) {
            intent.move_axis = rng.rng.gen_range(-1.0..=1.0);
        }
        if rng.rng.gen_bool(0.01) {
            intent.sprint = !intent.sprint;
        }
        if rng.rng.gen_bool(0.01) {
            intent.crouch = !intent.crouch;
        }

        intent.jump_pressed = rng.rng.gen_bool(0.02);
        intent.jump_held = intent.jump_pressed || (intent.jump_held && rng.rng.gen_bool(0.9));
    }
}

fn report(world: &mut World, tick: u32) {
    let mut query = world.query::<(Entity, &Locomotion, &PhysicalResources, &StealthSignals, &Transform)>();

    for (entity, locomotion, resources, signals, transform) in query.iter(world) {
        log_info(&format!(
            "Tick {}: {:?} pos ({:.2}, {:.2}) speed {:.2} grounded {} crouch {} | stamina {:.1}/{:.1} | noise {:.2} (r {:.1}) vis {:.2}",
            tick,
            entity,
            transform.translation.x,
            transform.translation.y,
            locomotion.current_speed(),
            locomotion.is_grounded(),
            locomotion.is_crouching(),
            resources.current_stamina(),
            resources.max_stamina(),
            signals.current_noise(),
            signals.current_noise_radius(),
            signals.current_visibility(),
        ));
    }
}
