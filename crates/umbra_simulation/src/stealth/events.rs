//! Stealth events

use bevy::prelude::*;

/// Event: шум приземления (AI perception читает как точечный источник звука)
#[derive(Event, Debug, Clone, Copy)]
pub struct LandingNoise {
    pub entity: Entity,
    pub noise: f32,
    pub radius: f32,
}
