//! Locomotion компоненты: config, state, per-tick intent

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::config::ConfigIssue;

/// Параметры движения персонажа
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Reflect)]
#[serde(default)]
pub struct LocomotionConfig {
    /// m/s
    pub walk_speed: f32,
    pub sprint_multiplier: f32,
    pub crouch_speed_multiplier: f32,
    /// m/s² (разгон к target speed)
    pub acceleration: f32,
    /// m/s² (торможение без input)
    pub deceleration: f32,
    /// Порог |input|/|target| ниже которого считаем "нет движения"
    pub input_deadband: f32,

    /// Начальная вертикальная скорость прыжка (m/s)
    pub jump_force: f32,
    /// m/s² (отрицательная — вниз)
    pub gravity: f32,
    /// Множитель гравитации при падении (падение быстрее подъёма)
    pub fall_multiplier: f32,
    pub max_fall_speed: f32,
    /// Прижимная скорость на земле (стабильный ground contact)
    pub ground_stick_velocity: f32,
    /// sec после схода с края, когда прыжок ещё разрешён
    pub coyote_time: f32,
    /// sec до приземления, когда ранний прыжок запоминается
    pub jump_buffer_time: f32,

    pub standing_height: f32,
    pub crouch_height: f32,
    /// Скорость интерполяции высоты капсулы (1/sec)
    pub crouch_transition_speed: f32,

    /// Z плоскости геймплея (2.5D)
    pub depth_plane: f32,
    /// Скорость выше которой персонаж считается движущимся
    pub moving_epsilon: f32,
}

impl Default for LocomotionConfig {
    fn default() -> Self {
        Self {
            walk_speed: 4.0,
            sprint_multiplier: 1.75,
            crouch_speed_multiplier: 0.5,
            acceleration: 40.0,
            deceleration: 50.0,
            input_deadband: 0.01,

            jump_force: 8.0,
            gravity: -25.0,
            fall_multiplier: 2.0,
            max_fall_speed: 30.0,
            ground_stick_velocity: -2.0,
            coyote_time: 0.12,
            jump_buffer_time: 0.15,

            standing_height: 1.8,
            crouch_height: 1.0,
            crouch_transition_speed: 12.0,

            depth_plane: 0.0,
            moving_epsilon: 0.05,
        }
    }
}

impl LocomotionConfig {
    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();

        if !(self.crouch_height > 0.0 && self.crouch_height < self.standing_height) {
            issues.push(ConfigIssue::InvalidCapsuleHeights {
                standing: self.standing_height,
                crouch: self.crouch_height,
            });
        }
        if !(self.crouch_transition_speed > 0.0) {
            issues.push(ConfigIssue::NonPositiveRate {
                name: "crouch_transition_speed",
                value: self.crouch_transition_speed,
            });
        }
        if self.ground_stick_velocity > 0.0 {
            issues.push(ConfigIssue::UpwardStickVelocity {
                value: self.ground_stick_velocity,
            });
        }

        issues
    }

    /// Копия с безопасными высотами капсулы и скоростями
    pub fn sanitized(&self) -> Self {
        let mut config = self.clone();

        if !(config.crouch_height > 0.0 && config.crouch_height < config.standing_height) {
            let defaults = Self::default();
            config.standing_height = defaults.standing_height;
            config.crouch_height = defaults.crouch_height;
        }
        if !(config.crouch_transition_speed > 0.0) {
            config.crouch_transition_speed = Self::default().crouch_transition_speed;
        }
        // Прижим только вниз
        config.ground_stick_velocity = -config.ground_stick_velocity.abs();
        config.max_fall_speed = config.max_fall_speed.abs();
        config.acceleration = config.acceleration.max(0.0);
        config.deceleration = config.deceleration.max(0.0);

        config
    }
}

/// Per-tick намерение игрока (пишет внешний input layer)
///
/// `jump_pressed` — edge текущего тика, сбрасывается после обработки.
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Reflect)]
#[reflect(Component)]
pub struct LocomotionIntent {
    /// [-1, 1], влево/вправо
    pub move_axis: f32,
    pub sprint: bool,
    pub crouch: bool,
    pub jump_pressed: bool,
    pub jump_held: bool,
}

impl LocomotionIntent {
    pub fn walking(move_axis: f32) -> Self {
        Self {
            move_axis,
            ..default()
        }
    }
}

/// Состояние движения (мутируется каждый тик)
#[derive(Debug, Clone, Copy, PartialEq, Reflect)]
pub struct MovementState {
    pub horizontal_velocity: f32,
    pub vertical_velocity: f32,
    /// <= 0 — истёк
    pub coyote_timer: f32,
    /// <= 0 — истёк
    pub jump_buffer_timer: f32,
    pub current_capsule_height: f32,
    /// Jump-cut уже применён к текущему прыжку (true до первого прыжка)
    pub jump_cut_applied: bool,

    pub is_grounded: bool,
    pub is_crouching: bool,
    pub is_moving: bool,
    pub is_sprinting: bool,
    pub current_speed: f32,
}

impl MovementState {
    pub fn new(standing_height: f32) -> Self {
        Self {
            horizontal_velocity: 0.0,
            vertical_velocity: 0.0,
            coyote_timer: 0.0,
            jump_buffer_timer: 0.0,
            current_capsule_height: standing_height,
            jump_cut_applied: true,
            is_grounded: false,
            is_crouching: false,
            is_moving: false,
            is_sprinting: false,
            current_speed: 0.0,
        }
    }
}

/// Опубликованное состояние движения (read-only снимок для stealth/AI/анимаций)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MotionSnapshot {
    pub is_grounded: bool,
    pub is_crouching: bool,
    pub is_moving: bool,
    pub is_sprinting: bool,
}

/// Locomotion State Machine персонажа
///
/// Состояния неявные: комбинация {grounded, crouching}.
/// Переходы выполняются в step() в фиксированном порядке (см. controller.rs).
#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component)]
pub struct Locomotion {
    pub(crate) config: LocomotionConfig,
    pub(crate) state: MovementState,
    /// Предупреждение об отсутствии PhysicalResources уже залогировано
    pub(crate) missing_resources_reported: bool,
}

impl Default for Locomotion {
    fn default() -> Self {
        Self::new(LocomotionConfig::default())
    }
}

impl Locomotion {
    pub fn new(config: LocomotionConfig) -> Self {
        for issue in config.validate() {
            crate::log_warning(&format!("Locomotion: {} (using fallback)", issue));
        }

        let config = config.sanitized();

        Self {
            state: MovementState::new(config.standing_height),
            config,
            missing_resources_reported: false,
        }
    }

    pub fn config(&self) -> &LocomotionConfig {
        &self.config
    }

    pub fn state(&self) -> &MovementState {
        &self.state
    }

    pub fn is_grounded(&self) -> bool {
        self.state.is_grounded
    }

    pub fn is_crouching(&self) -> bool {
        self.state.is_crouching
    }

    pub fn is_moving(&self) -> bool {
        self.state.is_moving
    }

    pub fn is_sprinting(&self) -> bool {
        self.state.is_sprinting
    }

    pub fn current_speed(&self) -> f32 {
        self.state.current_speed
    }

    pub fn horizontal_velocity(&self) -> f32 {
        self.state.horizontal_velocity
    }

    pub fn vertical_velocity(&self) -> f32 {
        self.state.vertical_velocity
    }

    pub fn capsule_height(&self) -> f32 {
        self.state.current_capsule_height
    }

    pub fn snapshot(&self) -> MotionSnapshot {
        MotionSnapshot {
            is_grounded: self.state.is_grounded,
            is_crouching: self.state.is_crouching,
            is_moving: self.state.is_moving,
            is_sprinting: self.state.is_sprinting,
        }
    }
}
