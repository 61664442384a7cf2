//! Physical domain — выносливость и переносимый вес
//!
//! Содержит:
//! - PhysicalResources (stamina pool + carry weight + cached multipliers)
//! - PhysicalConfig (tuning)
//! - Exhausted marker
//! - CarryWeightChanged / StaminaDepleted events

use bevy::prelude::*;

pub mod components;
pub mod events;
pub mod systems;


pub use components::*;
pub use events::*;
pub use systems::*;

use crate::CharacterSimSet;

/// Physical Plugin
///
/// Порядок выполнения:
/// 1. apply_carry_weight_changes — pickups/drops (пересчёт multipliers)
/// 2. regenerate_stamina — реген по timestamp последнего расхода
/// 3. detect_exhaustion — после locomotion (в Stealth фазе)
pub struct PhysicalPlugin;

impl Plugin for PhysicalPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<CarryWeightChanged>()
            .add_event::<StaminaDepleted>()
            .register_type::<PhysicalResources>()
            .register_type::<Exhausted>();

        app.add_systems(
            FixedUpdate,
            (apply_carry_weight_changes, regenerate_stamina)
                .chain()
                .in_set(CharacterSimSet::Resources),
        );
        app.add_systems(
            FixedUpdate,
            detect_exhaustion.in_set(CharacterSimSet::Stealth),
        );
    }
}
