//! Stealth компоненты: config + сглаженные noise/visibility

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::config::ConfigIssue;
use crate::shared::MIN_SMOOTH_TIME;

/// Вклад weight fraction в шум: target × (1 + wf × WEIGHT_NOISE_SCALE)
pub const WEIGHT_NOISE_SCALE: f32 = 0.5;
/// Вклад weight fraction в заметность: + wf × WEIGHT_VISIBILITY_SCALE
pub const WEIGHT_VISIBILITY_SCALE: f32 = 0.1;

/// Параметры stealth сигналов
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Reflect)]
#[serde(default)]
pub struct StealthConfig {
    pub idle_noise: f32,
    pub crouch_noise: f32,
    pub walk_noise: f32,
    pub sprint_noise: f32,
    /// В воздухе шум = idle_noise × factor
    pub airborne_noise_factor: f32,
    /// Мгновенный spike при приземлении
    pub landing_noise: f32,
    pub noise_smooth_time: f32,
    /// Радиус слышимости при noise = 1.0 (метры)
    pub max_noise_radius: f32,

    pub base_visibility: f32,
    pub movement_visibility_bonus: f32,
    pub sprint_visibility_bonus: f32,
    pub exhaustion_visibility_bonus: f32,
    /// Множитель итоговой заметности в приседе
    pub crouch_visibility_multiplier: f32,
    pub visibility_smooth_time: f32,
}

impl Default for StealthConfig {
    fn default() -> Self {
        Self {
            idle_noise: 0.05,
            crouch_noise: 0.1,
            walk_noise: 0.3,
            sprint_noise: 0.7,
            airborne_noise_factor: 0.5,
            landing_noise: 0.9,
            noise_smooth_time: 0.25,
            max_noise_radius: 15.0,

            base_visibility: 0.3,
            movement_visibility_bonus: 0.15,
            sprint_visibility_bonus: 0.3,
            exhaustion_visibility_bonus: 0.1,
            crouch_visibility_multiplier: 0.5,
            visibility_smooth_time: 0.4,
        }
    }
}

impl StealthConfig {
    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();

        for (name, value) in [
            ("noise_smooth_time", self.noise_smooth_time),
            ("visibility_smooth_time", self.visibility_smooth_time),
        ] {
            if !(value > 0.0) {
                issues.push(ConfigIssue::NonPositiveSmoothTime { name, value });
            }
        }

        issues
    }

    pub fn sanitized(&self) -> Self {
        let mut config = self.clone();
        config.noise_smooth_time = config.noise_smooth_time.max(MIN_SMOOTH_TIME);
        config.visibility_smooth_time = config.visibility_smooth_time.max(MIN_SMOOTH_TIME);
        config.max_noise_radius = config.max_noise_radius.max(0.0);
        config
    }
}

/// Stealth сигналы персонажа (derived, пересчитываются каждый тик)
///
/// Инвариант: noise, visibility ∈ [0, 1] после каждого update.
/// Noise может прыгнуть вверх мгновенно (приземление), вниз — только сглаженно.
#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component)]
pub struct StealthSignals {
    pub(crate) config: StealthConfig,
    pub(crate) noise: f32,
    pub(crate) noise_velocity: f32,
    pub(crate) visibility: f32,
    pub(crate) visibility_velocity: f32,
    /// Edge detection memory (true на спавне — персонаж спавнится на земле)
    pub(crate) was_grounded_last_tick: bool,
    pub(crate) just_landed: bool,
}

impl Default for StealthSignals {
    fn default() -> Self {
        Self::new(StealthConfig::default())
    }
}

impl StealthSignals {
    pub fn new(config: StealthConfig) -> Self {
        for issue in config.validate() {
            crate::log_warning(&format!("StealthSignals: {} (using fallback)", issue));
        }

        Self {
            config: config.sanitized(),
            noise: 0.0,
            noise_velocity: 0.0,
            visibility: 0.0,
            visibility_velocity: 0.0,
            was_grounded_last_tick: true,
            just_landed: false,
        }
    }

    pub fn config(&self) -> &StealthConfig {
        &self.config
    }

    pub fn current_noise(&self) -> f32 {
        self.noise
    }

    pub fn current_visibility(&self) -> f32 {
        self.visibility
    }

    /// Радиус слышимости — чистая производная, считается на чтении
    pub fn current_noise_radius(&self) -> f32 {
        self.noise * self.config.max_noise_radius
    }

    /// Приземление произошло в последнем update
    pub fn just_landed(&self) -> bool {
        self.just_landed
    }
}
