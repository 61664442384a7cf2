//! Rapier bridge для CharacterBody
//!
//! Архитектура:
//! - Rapier для коллизий (RigidBody::KinematicPositionBased + KinematicCharacterController)
//! - Locomotion считает velocity сам, Rapier только резолвит displacement
//! - Transform = центр капсулы; resize капсулы компенсируется сдвигом центра (ноги на месте)
//!
//! Порядок в FixedUpdate:
//! 1. read_rapier_contacts (Contacts) — grounded из KCC output, ceiling ray cast
//! 2. drive_locomotion::<RapierCharacterBody> (Locomotion) — копит pending displacement
//! 3. apply_rapier_motion (Motion) — displacement → KCC, resize Collider
//!
//! После Writeback (PostUpdate) — lock_rapier_depth_plane возвращает Z на плоскость.

use bevy::prelude::*;
use bevy_rapier3d::prelude::*;

use super::body::{CapsuleGeometry, CharacterBody, MotionOutcome};
use crate::actor::Character;
use crate::CharacterSimSet;

/// Дальность ceiling probe над головой (покрывает разницу standing/crouch)
const CEILING_PROBE_RANGE: f32 = 2.0;

/// Тело персонажа поверх Rapier KinematicCharacterController
///
/// Контакты читаются до locomotion, displacement применяется после —
/// сам KCC двигает тело в шаге физики.
#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component)]
pub struct RapierCharacterBody {
    pub capsule: CapsuleGeometry,
    grounded: bool,
    /// Расстояние от макушки до потолка (None — ничего в CEILING_PROBE_RANGE)
    ceiling_gap: Option<f32>,
    pending_translation: Vec3,
    /// Высота, под которую сейчас собран Collider
    collider_height: f32,
    depth_plane: Option<f32>,
}

impl Default for RapierCharacterBody {
    fn default() -> Self {
        Self::new(CapsuleGeometry::default())
    }
}

impl RapierCharacterBody {
    pub fn new(capsule: CapsuleGeometry) -> Self {
        Self {
            capsule,
            grounded: false,
            ceiling_gap: None,
            pending_translation: Vec3::ZERO,
            collider_height: capsule.height,
            depth_plane: None,
        }
    }

    pub fn pending_translation(&self) -> Vec3 {
        self.pending_translation
    }
}

impl CharacterBody for RapierCharacterBody {
    fn is_grounded(&self) -> bool {
        self.grounded
    }

    fn ceiling_blocked(&self, clearance: f32) -> bool {
        self.ceiling_gap.is_some_and(|gap| gap < clearance)
    }

    fn move_and_collide(&mut self, displacement: Vec3) -> MotionOutcome {
        // Резолв произойдёт в шаге Rapier; результат контакта увидим в следующем тике
        self.pending_translation += displacement;
        MotionOutcome::default()
    }

    fn resize_capsule(&mut self, height: f32) {
        self.capsule.height = height.max(0.0);
    }

    fn lock_depth(&mut self, plane: f32) {
        self.pending_translation.z = 0.0;
        self.depth_plane = Some(plane);
    }
}

/// Collider капсулы заданной высоты (capsule_y принимает половину сегмента)
pub fn capsule_collider(capsule: &CapsuleGeometry) -> Collider {
    let half_segment = (capsule.height * 0.5 - capsule.radius).max(0.0);
    Collider::capsule_y(half_segment, capsule.radius)
}

/// Система: grounded из KCC output + ray cast вверх от макушки
pub fn read_rapier_contacts(
    rapier_context: ReadRapierContext,
    mut query: Query<(
        Entity,
        &Transform,
        &mut RapierCharacterBody,
        Option<&KinematicCharacterControllerOutput>,
    )>,
) {
    // Без контекста (ещё не создан) grounded всё равно берём из output
    let context = rapier_context.single().ok();

    for (entity, transform, mut body, output) in query.iter_mut() {
        body.grounded = output.is_some_and(|output| output.grounded);

        let head = transform.translation + Vec3::Y * body.capsule.center_offset();
        let filter = QueryFilter::default().exclude_collider(entity);
        body.ceiling_gap = context.as_ref().and_then(|context| {
            context
                .cast_ray(head, Vec3::Y, CEILING_PROBE_RANGE, true, filter)
                .map(|(_, distance)| distance)
        });
    }
}

/// Система: pending displacement → KinematicCharacterController, resize Collider
pub fn apply_rapier_motion(
    mut query: Query<(
        &mut RapierCharacterBody,
        &mut KinematicCharacterController,
        &mut Collider,
        &mut Transform,
    )>,
) {
    for (mut body, mut controller, mut collider, mut transform) in query.iter_mut() {
        if (body.capsule.height - body.collider_height).abs() > f32::EPSILON {
            // Центр сдвигается на половину разницы высот — ноги остаются на месте
            transform.translation.y += (body.capsule.height - body.collider_height) * 0.5;
            *collider = capsule_collider(&body.capsule);
            body.collider_height = body.capsule.height;
        }

        // Накапливаем: несколько fixed тиков могут пройти до шага Rapier
        let queued = controller.translation.unwrap_or(Vec3::ZERO);
        controller.translation = Some(queued + body.pending_translation);
        body.pending_translation = Vec3::ZERO;
    }
}

/// Система: 2.5D constraint после writeback Rapier
pub fn lock_rapier_depth_plane(mut query: Query<(&RapierCharacterBody, &mut Transform)>) {
    for (body, mut transform) in query.iter_mut() {
        if let Some(plane) = body.depth_plane {
            transform.translation.z = plane;
        }
    }
}

/// Spawn helper для Rapier персонажа
///
/// Создает entity с полным набором компонентов:
/// - Transform (центр капсулы = feet + height/2)
/// - Character (Required: PhysicalResources, Locomotion, LocomotionIntent, StealthSignals)
/// - RapierCharacterBody
/// - Rapier: RigidBody + Collider (capsule) + KinematicCharacterController
pub fn spawn_rapier_character(commands: &mut Commands, feet: Vec3, capsule: CapsuleGeometry) -> Entity {
    commands
        .spawn((
            Transform::from_translation(feet + Vec3::Y * capsule.center_offset()),
            Character,
            RapierCharacterBody::new(capsule),
            RigidBody::KinematicPositionBased,
            capsule_collider(&capsule),
            KinematicCharacterController::default(),
        ))
        .id()
}

/// Plugin для Rapier тел персонажей
///
/// RapierPhysicsPlugin добавляет хост — здесь только bridge системы.
pub struct RapierBodyPlugin;

impl Plugin for RapierBodyPlugin {
    fn build(&self, app: &mut App) {
        app.register_type::<RapierCharacterBody>();

        app.add_systems(
            FixedUpdate,
            (
                read_rapier_contacts.in_set(CharacterSimSet::Contacts),
                crate::movement::drive_locomotion::<RapierCharacterBody>
                    .in_set(CharacterSimSet::Locomotion),
                apply_rapier_motion.in_set(CharacterSimSet::Motion),
            ),
        );
        app.add_systems(
            PostUpdate,
            lock_rapier_depth_plane.after(PhysicsSet::Writeback),
        );
    }
}
