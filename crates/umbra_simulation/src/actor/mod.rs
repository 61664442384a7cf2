//! Actor domain — персонаж как набор компонентов
//!
//! Character через Required Components тянет за собой все три подсистемы:
//! PhysicalResources, Locomotion (+ LocomotionIntent), StealthSignals.
//! Тело (FlatGroundBody / RapierCharacterBody) добавляется отдельно.

use bevy::prelude::*;

use crate::config::CharacterTuning;
use crate::movement::{Locomotion, LocomotionIntent};
use crate::physical::PhysicalResources;
use crate::physics::FlatGroundBody;
use crate::stealth::StealthSignals;

/// Персонаж (игрок или NPC)
///
/// Автоматически добавляет PhysicalResources, Locomotion, LocomotionIntent,
/// StealthSignals (defaults) через Required Components.
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
#[require(PhysicalResources, Locomotion, LocomotionIntent, StealthSignals)]
pub struct Character;

/// Bundle персонажа из tuning (вместо defaults от Required Components)
pub fn character_bundle(tuning: &CharacterTuning) -> impl Bundle {
    (
        Character,
        PhysicalResources::new(tuning.physical.clone()),
        Locomotion::new(tuning.locomotion.clone()),
        LocomotionIntent::default(),
        StealthSignals::new(tuning.stealth.clone()),
    )
}

/// Spawn helper для headless персонажа (FlatGroundBody на бесконечном полу)
pub fn spawn_headless_character(commands: &mut Commands, feet: Vec3, tuning: &CharacterTuning) -> Entity {
    let body = FlatGroundBody::on_floor(feet).with_capsule_height(tuning.locomotion.standing_height);
    spawn_character_with_body(commands, body, tuning)
}

/// Spawn с произвольным headless телом (уровни с платформами/потолками)
pub fn spawn_character_with_body(commands: &mut Commands, body: FlatGroundBody, tuning: &CharacterTuning) -> Entity {
    let center = body.capsule_center();

    let entity = commands
        .spawn((
            character_bundle(tuning),
            body,
            Transform::from_translation(center),
        ))
        .id();

    crate::log(&format!("🧍 Spawned character {:?} at {:?}", entity, center));
    entity
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_components_added() {
        let mut world = World::new();
        let entity = world.spawn(Character).id();

        assert!(world.get::<PhysicalResources>(entity).is_some());
        assert!(world.get::<Locomotion>(entity).is_some());
        assert!(world.get::<LocomotionIntent>(entity).is_some());
        assert!(world.get::<StealthSignals>(entity).is_some());
    }

    #[test]
    fn test_bundle_uses_tuning() {
        let mut tuning = CharacterTuning::default();
        tuning.physical.max_stamina = 40.0;
        tuning.locomotion.walk_speed = 6.0;
        tuning.stealth.landing_noise = 0.5;

        let mut world = World::new();
        let entity = world.spawn(character_bundle(&tuning)).id();

        assert_eq!(world.get::<PhysicalResources>(entity).map(|r| r.max_stamina()), Some(40.0));
        assert_eq!(world.get::<Locomotion>(entity).map(|l| l.config().walk_speed), Some(6.0));
        assert_eq!(
            world.get::<StealthSignals>(entity).map(|s| s.config().landing_noise),
            Some(0.5)
        );
    }
}
