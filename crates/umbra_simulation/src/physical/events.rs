//! Physical resource events

use bevy::prelude::*;

/// Event: изменение переносимого веса (pickup/drop от inventory коллаборатора)
///
/// delta > 0 → add_weight, delta < 0 → remove_weight(|delta|), 0 → игнор.
#[derive(Event, Debug, Clone, Copy)]
pub struct CarryWeightChanged {
    pub entity: Entity,
    pub delta: f32,
}

/// Event: stamina упала до нуля (один раз на переход в exhaustion)
#[derive(Event, Debug, Clone, Copy)]
pub struct StaminaDepleted {
    pub entity: Entity,
}
