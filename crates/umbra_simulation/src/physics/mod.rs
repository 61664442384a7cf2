//! Physics module
//!
//! CharacterBody seam между locomotion и коллизиями:
//! - body: trait + headless FlatGroundBody
//! - rapier_body: bridge к bevy_rapier3d KinematicCharacterController

use bevy::prelude::*;

pub mod body;
pub mod rapier_body;

// Re-export основных типов
pub use body::{sync_body_transform, CapsuleGeometry, CharacterBody, FlatGroundBody, MotionOutcome, Surface, Wall};
pub use rapier_body::{spawn_rapier_character, RapierBodyPlugin, RapierCharacterBody};

use crate::CharacterSimSet;

/// Plugin для headless тел (без Rapier)
///
/// drive_locomotion::<FlatGroundBody> → sync_body_transform
pub struct HeadlessBodyPlugin;

impl Plugin for HeadlessBodyPlugin {
    fn build(&self, app: &mut App) {
        app.register_type::<FlatGroundBody>();

        app.add_systems(
            FixedUpdate,
            (
                crate::movement::drive_locomotion::<FlatGroundBody>.in_set(CharacterSimSet::Locomotion),
                sync_body_transform.in_set(CharacterSimSet::Motion),
            ),
        );
    }
}
