//! Physical resource systems (regen, weight changes, exhaustion marker).

use bevy::prelude::*;

use super::components::{Exhausted, PhysicalResources};
use super::events::{CarryWeightChanged, StaminaDepleted};

/// Система: применение CarryWeightChanged событий
///
/// Multipliers пересчитываются внутри add_weight/remove_weight синхронно,
/// поэтому locomotion в этом же тике видит актуальные значения.
pub fn apply_carry_weight_changes(
    mut events: EventReader<CarryWeightChanged>,
    mut query: Query<&mut PhysicalResources>,
) {
    for event in events.read() {
        let Ok(mut resources) = query.get_mut(event.entity) else {
            crate::log_warning(&format!(
                "CarryWeightChanged: {:?} has no PhysicalResources (delta {:.2} dropped)",
                event.entity, event.delta
            ));
            continue;
        };

        if event.delta > 0.0 {
            resources.add_weight(event.delta);
        } else if event.delta < 0.0 {
            resources.remove_weight(-event.delta);
        }

        crate::log(&format!(
            "⚖️ {:?} carry weight {:.1}/{:.1} (movement ×{:.2})",
            event.entity,
            resources.current_carry_weight(),
            resources.max_carry_weight(),
            resources.movement_multiplier()
        ));
    }
}

/// Система: regenerate stamina для всех entities
///
/// Работает в FixedUpdate до locomotion (leaf компонент обновляется первым).
pub fn regenerate_stamina(mut query: Query<&mut PhysicalResources>, time: Res<Time<Fixed>>) {
    let delta = time.delta_secs();

    for mut resources in query.iter_mut() {
        resources.tick(delta);
    }
}

/// Система: Exhausted marker зеркалит is_exhausted()
///
/// Запускается после locomotion (расход stamina этого тика уже применён).
/// StaminaDepleted отправляется только на переходе в exhaustion.
pub fn detect_exhaustion(
    mut commands: Commands,
    query: Query<(Entity, &PhysicalResources, Has<Exhausted>)>,
    mut depleted: EventWriter<StaminaDepleted>,
) {
    for (entity, resources, marked) in query.iter() {
        if resources.is_exhausted() && !marked {
            commands.entity(entity).insert(Exhausted);
            depleted.write(StaminaDepleted { entity });
            crate::log(&format!("😮‍💨 {:?} exhausted (stamina 0)", entity));
        } else if !resources.is_exhausted() && marked {
            commands.entity(entity).remove::<Exhausted>();
        }
    }
}
