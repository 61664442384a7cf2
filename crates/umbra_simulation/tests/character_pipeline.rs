//! Character pipeline integration test
//!
//! Полный тик через SimulationPlugin (headless тела):
//! resources → locomotion → motion → stealth
//!
//! Проверяем:
//! - Jump → JumpStarted → приземление → LandingNoise (один раз)
//! - Sprint до exhaustion → StaminaDepleted, sprint заблокирован
//! - Transform следует за телом

use std::time::Duration;

use approx::assert_abs_diff_eq;
use bevy::prelude::*;
use umbra_simulation::*;

const DT: Duration = Duration::from_nanos(16_666_667);

fn spawn_character(app: &mut App, tuning: &CharacterTuning) -> Entity {
    app.world_mut()
        .spawn((
            character_bundle(tuning),
            FlatGroundBody::on_floor(Vec3::ZERO),
            Transform::default(),
        ))
        .id()
}

fn set_intent(app: &mut App, entity: Entity, intent: LocomotionIntent) {
    if let Some(mut current) = app.world_mut().get_mut::<LocomotionIntent>(entity) {
        *current = intent;
    }
}

fn event_count<E: Event>(app: &App) -> usize {
    app.world().resource::<Events<E>>().iter_current_update_events().count()
}

#[test]
fn test_jump_and_landing_spike() {
    let mut app = create_headless_app(7);
    let tuning = CharacterTuning::default();
    let entity = spawn_character(&mut app, &tuning);

    // Пара тиков на земле — noise около idle
    for _ in 0..10 {
        run_fixed_tick(&mut app, DT);
    }
    assert_eq!(event_count::<LandingNoise>(&app), 0);

    set_intent(
        &mut app,
        entity,
        LocomotionIntent {
            jump_pressed: true,
            jump_held: true,
            ..default()
        },
    );
    run_fixed_tick(&mut app, DT);
    assert_eq!(event_count::<JumpStarted>(&app), 1);
    let jump = app
        .world()
        .resource::<Events<JumpStarted>>()
        .iter_current_update_events()
        .next()
        .copied()
        .expect("jump event");
    assert_eq!(jump.entity, entity);
    assert_abs_diff_eq!(jump.vertical_velocity, tuning.locomotion.jump_force, epsilon = 1e-6);

    // jump_pressed — edge, потреблён системой
    let intent = app.world().get::<LocomotionIntent>(entity).copied().unwrap_or_default();
    assert!(!intent.jump_pressed);
    assert!(intent.jump_held);

    let mut landed = false;
    for _ in 0..120 {
        run_fixed_tick(&mut app, DT);
        if event_count::<LandingNoise>(&app) > 0 {
            landed = true;
            break;
        }
    }
    assert!(landed, "character never landed");

    let signals = app.world().get::<StealthSignals>(entity).expect("signals");
    assert!(signals.just_landed());
    assert_abs_diff_eq!(signals.current_noise(), tuning.stealth.landing_noise, epsilon = 1e-6);

    let landing = app
        .world()
        .resource::<Events<LandingNoise>>()
        .iter_current_update_events()
        .next()
        .copied()
        .expect("landing event");
    assert_eq!(landing.entity, entity);
    assert_abs_diff_eq!(landing.radius, landing.noise * tuning.stealth.max_noise_radius, epsilon = 1e-5);

    // Следующий тик — spike уже не свежий, затухает
    run_fixed_tick(&mut app, DT);
    let signals = app.world().get::<StealthSignals>(entity).expect("signals");
    assert!(!signals.just_landed());
    assert!(signals.current_noise() < tuning.stealth.landing_noise);
    assert_eq!(event_count::<LandingNoise>(&app), 1);
}

#[test]
fn test_sprint_until_exhausted() {
    let mut app = create_headless_app(7);
    let tuning = CharacterTuning::default();
    let entity = spawn_character(&mut app, &tuning);

    set_intent(
        &mut app,
        entity,
        LocomotionIntent {
            move_axis: 1.0,
            sprint: true,
            ..default()
        },
    );

    for _ in 0..60 {
        run_fixed_tick(&mut app, DT);
    }
    let locomotion = app.world().get::<Locomotion>(entity).expect("locomotion");
    assert!(locomotion.is_sprinting());

    // 100 stamina / 20 в секунду ≈ 300 тиков
    for _ in 0..260 {
        run_fixed_tick(&mut app, DT);
    }

    assert!(app.world().get::<Exhausted>(entity).is_some());
    assert_eq!(event_count::<StaminaDepleted>(&app), 1);

    let locomotion = app.world().get::<Locomotion>(entity).expect("locomotion");
    assert!(!locomotion.is_sprinting());
    assert!(locomotion.is_moving());
    assert_abs_diff_eq!(locomotion.current_speed(), tuning.locomotion.walk_speed, epsilon = 1e-4);

    // Exhausted виден в visibility
    let signals = app.world().get::<StealthSignals>(entity).expect("signals");
    let walking_target = tuning.stealth.base_visibility + tuning.stealth.movement_visibility_bonus;
    assert!(signals.current_visibility() > walking_target);
}

#[test]
fn test_transform_tracks_capsule_center() {
    let mut app = create_headless_app(7);
    let tuning = CharacterTuning::default();
    let entity = spawn_character(&mut app, &tuning);

    set_intent(&mut app, entity, LocomotionIntent::walking(1.0));
    for _ in 0..30 {
        run_fixed_tick(&mut app, DT);
    }

    let body = app.world().get::<FlatGroundBody>(entity).expect("body").clone();
    let transform = app.world().get::<Transform>(entity).copied().expect("transform");

    assert!(body.feet.x > 0.0);
    assert_eq!(transform.translation, body.capsule_center());
    assert_eq!(transform.translation.z, tuning.locomotion.depth_plane);
}

#[test]
fn test_carry_weight_event_slows_character_same_tick() {
    let mut app = create_headless_app(7);
    let tuning = CharacterTuning::default();
    let entity = spawn_character(&mut app, &tuning);

    set_intent(&mut app, entity, LocomotionIntent::walking(1.0));
    for _ in 0..30 {
        run_fixed_tick(&mut app, DT);
    }

    app.world_mut().send_event(CarryWeightChanged { entity, delta: 50.0 });
    for _ in 0..30 {
        run_fixed_tick(&mut app, DT);
    }

    let locomotion = app.world().get::<Locomotion>(entity).expect("locomotion");
    assert_abs_diff_eq!(locomotion.current_speed(), tuning.locomotion.walk_speed * 0.4, epsilon = 1e-4);

    let resources = app.world().get::<PhysicalResources>(entity).expect("resources");
    assert!(resources.is_overburdened());
}
