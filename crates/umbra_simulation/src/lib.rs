//! UMBRA Simulation Core
//!
//! ECS-симуляция персонажа 2.5D stealth-платформера на Bevy 0.16
//!
//! Три подсистемы, связанные явными зависимостями (без runtime lookup):
//! - physical — stamina + carry weight (leaf)
//! - movement — locomotion state machine (читает/тратит physical)
//! - stealth — noise/visibility (читает movement + physical)
//!
//! Коллизии — за CharacterBody seam (headless FlatGroundBody или Rapier KCC).

use std::time::Duration;

use bevy::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

// Публичные модули
pub mod actor;
pub mod config;
pub mod logger;
pub mod movement;
pub mod physical;
pub mod physics;
pub mod shared;
pub mod stealth;

// Re-export базовых типов для удобства
pub use actor::{character_bundle, spawn_character_with_body, spawn_headless_character, Character};
pub use config::{CharacterTuning, ConfigIssue, TuningError};
pub use logger::{init_logger, log, log_error, log_info, log_warning, set_log_level, LogLevel, LogPrinter};
pub use movement::{JumpStarted, Locomotion, LocomotionConfig, LocomotionIntent, MotionSnapshot, MovementPlugin};
pub use physical::{
    CarryWeightChanged, Exhausted, PhysicalConfig, PhysicalPlugin, PhysicalResources, StaminaDepleted,
};
pub use physics::{CapsuleGeometry, CharacterBody, FlatGroundBody, HeadlessBodyPlugin, RapierBodyPlugin, Surface, Wall};
pub use stealth::{LandingNoise, StealthConfig, StealthPlugin, StealthSignals};

/// Фазы тика персонажа (FixedUpdate, строго по порядку)
///
/// Resources → Contacts → Locomotion → Motion → Stealth
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CharacterSimSet {
    /// Weight changes + stamina regen (leaf первым)
    Resources,
    /// Ground/ceiling queries тел (Rapier)
    Contacts,
    /// drive_locomotion::<B>
    Locomotion,
    /// Применение displacement / sync Transform
    Motion,
    /// Stealth сигналы + exhaustion marker (видят итог тика)
    Stealth,
}

/// Главный plugin симуляции (объединяет все подсистемы)
///
/// Headless тела включены всегда; для Rapier добавить RapierPhysicsPlugin + RapierBodyPlugin.
pub struct SimulationPlugin;

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        app
            // Fixed timestep 60Hz для simulation tick
            .insert_resource(Time::<Fixed>::from_hz(60.0))
            .configure_sets(
                FixedUpdate,
                (
                    CharacterSimSet::Resources,
                    CharacterSimSet::Contacts,
                    CharacterSimSet::Locomotion,
                    CharacterSimSet::Motion,
                    CharacterSimSet::Stealth,
                )
                    .chain(),
            )
            .register_type::<Character>()
            .add_plugins((PhysicalPlugin, MovementPlugin, StealthPlugin, HeadlessBodyPlugin));

        // Seed мог быть задан хостом до plugin'а — не перезатираем
        if !app.world().contains_resource::<DeterministicRng>() {
            app.insert_resource(DeterministicRng::new(42));
        }
    }
}

/// Детерминистичный RNG resource (seeded)
#[derive(Resource)]
pub struct DeterministicRng {
    pub rng: ChaCha8Rng,
    pub seed: u64,
}

impl DeterministicRng {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }
}

/// Создаёт minimal Bevy App для headless симуляции
pub fn create_headless_app(seed: u64) -> App {
    let mut app = App::new();
    init_logger();
    app.add_plugins(MinimalPlugins)
        .insert_resource(DeterministicRng::new(seed))
        .add_plugins(SimulationPlugin);

    app
}

/// Один детерминированный fixed тик с заданным dt
///
/// Минует накопитель Time<Fixed> (реальное время не влияет на результат).
pub fn run_fixed_tick(app: &mut App, dt: Duration) {
    let world = app.world_mut();
    world.resource_mut::<Time<Fixed>>().advance_by(dt);
    world.run_schedule(FixedUpdate);
}

/// Snapshot мира для сравнения детерминизма
pub fn world_snapshot<T: Component>(world: &mut World) -> Vec<u8>
where
    T: std::fmt::Debug,
{
    let mut snapshot = Vec::new();

    let mut query = world.query::<(Entity, &T)>();
    let mut entities: Vec<_> = query.iter(world).collect();

    // Сортируем по Entity ID для детерминизма
    entities.sort_by_key(|(entity, _)| entity.index());

    // Сериализуем в байты через Debug (простейший способ)
    for (entity, component) in entities {
        snapshot.extend_from_slice(&entity.index().to_le_bytes());
        snapshot.extend_from_slice(format!("{:?}", component).as_bytes());
    }

    snapshot
}
