//! Movement domain — locomotion state machine
//!
//! Содержит:
//! - LocomotionConfig (tuning скоростей, прыжка, капсулы)
//! - LocomotionIntent (per-tick input от внешнего input layer)
//! - Locomotion (MovementState + step())
//! - JumpStarted (event)

use bevy::prelude::*;

pub mod components;
pub mod controller;
pub mod events;
pub mod systems;


pub use components::*;
pub use controller::LocomotionTick;
pub use events::*;
pub use systems::*;

/// Movement Plugin
///
/// Регистрирует события и типы. Сама система drive_locomotion::<B>
/// добавляется plugin'ом тела (HeadlessBodyPlugin / RapierBodyPlugin).
pub struct MovementPlugin;

impl Plugin for MovementPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<JumpStarted>()
            .register_type::<Locomotion>()
            .register_type::<LocomotionIntent>();
    }
}
