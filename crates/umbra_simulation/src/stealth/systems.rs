//! Stealth systems.

use bevy::prelude::*;

use super::components::StealthSignals;
use super::deriver::ResourceSignals;
use super::events::LandingNoise;
use crate::movement::Locomotion;
use crate::physical::PhysicalResources;

/// Система: пересчёт noise/visibility после locomotion
///
/// Запускается в CharacterSimSet::Stealth — видит состояние этого тика, не прошлого.
pub fn derive_stealth_signals(
    mut query: Query<(Entity, &Locomotion, Option<&PhysicalResources>, &mut StealthSignals)>,
    time: Res<Time<Fixed>>,
    mut landings: EventWriter<LandingNoise>,
) {
    let delta = time.delta_secs();

    for (entity, locomotion, resources, mut signals) in query.iter_mut() {
        let landed = signals.update(
            locomotion.snapshot(),
            ResourceSignals::from_resources(resources),
            delta,
        );

        if landed {
            landings.write(LandingNoise {
                entity,
                noise: signals.current_noise(),
                radius: signals.current_noise_radius(),
            });
        }
    }
}
