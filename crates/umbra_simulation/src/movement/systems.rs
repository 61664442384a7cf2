//! Locomotion systems.

use bevy::ecs::component::Mutable;
use bevy::prelude::*;

use super::components::{Locomotion, LocomotionIntent};
use super::events::JumpStarted;
use crate::config::ConfigIssue;
use crate::physical::PhysicalResources;
use crate::physics::CharacterBody;

/// Система: locomotion тик для всех персонажей с телом `B`
///
/// Регистрируется отдельно на каждый тип тела (FlatGroundBody, RapierCharacterBody).
/// PhysicalResources опционален: без него gating = "разрешено", warning один раз.
pub fn drive_locomotion<B>(
    mut query: Query<(
        Entity,
        &mut Locomotion,
        &mut LocomotionIntent,
        &mut B,
        Option<&mut PhysicalResources>,
    )>,
    time: Res<Time<Fixed>>,
    mut jumps: EventWriter<JumpStarted>,
) where
    B: Component<Mutability = Mutable> + CharacterBody,
{
    let delta = time.delta_secs();

    for (entity, mut locomotion, mut intent, mut body, mut resources) in query.iter_mut() {
        if resources.is_none() && !locomotion.missing_resources_reported {
            let issue = ConfigIssue::MissingCollaborator {
                component: "PhysicalResources",
                entity,
            };
            crate::log_warning(&format!("Locomotion: {}", issue));
            locomotion.missing_resources_reported = true;
        }

        let tick = locomotion.step(&intent, &mut *body, resources.as_deref_mut(), delta);

        // Edge прыжка потреблён — следующий тик без нового нажатия его не увидит
        intent.jump_pressed = false;

        if tick.jumped {
            jumps.write(JumpStarted {
                entity,
                vertical_velocity: tick.launch_velocity,
            });
            crate::log(&format!("🦘 {:?} jump (vy {:.2})", entity, tick.launch_velocity));
        }
    }
}
