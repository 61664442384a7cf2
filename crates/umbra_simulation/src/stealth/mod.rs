//! Stealth domain — noise и visibility для AI perception
//!
//! Содержит:
//! - StealthConfig (уровни шума, бонусы заметности, времена сглаживания)
//! - StealthSignals (сглаженные noise/visibility + noise radius)
//! - LandingNoise (event)

use bevy::prelude::*;

pub mod components;
pub mod deriver;
pub mod events;
pub mod systems;

pub use components::*;
pub use deriver::{noise_target, visibility_target, ResourceSignals};
pub use events::*;
pub use systems::*;

use crate::CharacterSimSet;

/// Stealth Plugin
///
/// derive_stealth_signals в последней фазе тика (после locomotion).
pub struct StealthPlugin;

impl Plugin for StealthPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<LandingNoise>()
            .register_type::<StealthSignals>();

        app.add_systems(
            FixedUpdate,
            derive_stealth_signals.in_set(CharacterSimSet::Stealth),
        );
    }
}
