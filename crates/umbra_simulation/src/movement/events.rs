//! Movement events

use bevy::prelude::*;

/// Event: прыжок начался (buffer + coyote + stamina сошлись в этом тике)
///
/// Обрабатывается:
/// - анимации/звук (внешние коллабораторы)
/// - AI perception (в будущем)
#[derive(Event, Debug, Clone, Copy)]
pub struct JumpStarted {
    pub entity: Entity,
    /// Стартовая скорость (до гравитации и jump-cut этого тика)
    pub vertical_velocity: f32,
}
