//! Stealth Signal Deriver — noise/visibility из опубликованного состояния
//!
//! Коллабораторы передаются явно на каждый тик (MotionSnapshot + ResourceSignals),
//! никакого runtime lookup. Единственный state — аккумуляторы сглаживания и
//! два bool для edge detection приземления.

use super::components::{StealthConfig, StealthSignals, WEIGHT_NOISE_SCALE, WEIGHT_VISIBILITY_SCALE};
use crate::movement::MotionSnapshot;
use crate::physical::PhysicalResources;
use crate::shared::smooth_damp;

/// Сигналы от Physical Resource Model, нужные stealth
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ResourceSignals {
    pub weight_fraction: f32,
    pub is_exhausted: bool,
}

impl ResourceSignals {
    /// Без PhysicalResources — нейтральные значения (вес 0, не exhausted)
    pub fn from_resources(resources: Option<&PhysicalResources>) -> Self {
        resources.map_or_else(Self::default, |resources| Self {
            weight_fraction: resources.weight_fraction(),
            is_exhausted: resources.is_exhausted(),
        })
    }
}

/// Целевой шум: airborne → доля idle; на земле crouch > sprint > walk > idle, × вес
pub fn noise_target(config: &StealthConfig, motion: MotionSnapshot, weight_fraction: f32) -> f32 {
    if !motion.is_grounded {
        return config.idle_noise * config.airborne_noise_factor;
    }

    let base = if motion.is_crouching {
        config.crouch_noise
    } else if motion.is_sprinting {
        config.sprint_noise
    } else if motion.is_moving {
        config.walk_noise
    } else {
        config.idle_noise
    };

    base * (1.0 + weight_fraction * WEIGHT_NOISE_SCALE)
}

/// Целевая заметность: сумма вкладов, затем × crouch multiplier
pub fn visibility_target(config: &StealthConfig, motion: MotionSnapshot, resources: ResourceSignals) -> f32 {
    let mut visibility = config.base_visibility;

    if motion.is_sprinting {
        visibility += config.sprint_visibility_bonus;
    } else if motion.is_moving {
        visibility += config.movement_visibility_bonus;
    }

    visibility += resources.weight_fraction * WEIGHT_VISIBILITY_SCALE;

    if resources.is_exhausted {
        visibility += config.exhaustion_visibility_bonus;
    }

    if motion.is_crouching {
        visibility *= config.crouch_visibility_multiplier;
    }

    visibility
}

impl StealthSignals {
    /// Пересчёт сигналов за тик; возвращает true на тике приземления
    pub fn update(&mut self, motion: MotionSnapshot, resources: ResourceSignals, dt: f32) -> bool {
        let just_landed = motion.is_grounded && !self.was_grounded_last_tick;
        self.was_grounded_last_tick = motion.is_grounded;
        self.just_landed = just_landed;

        let noise_goal = noise_target(&self.config, motion, resources.weight_fraction).clamp(0.0, 1.0);

        if just_landed {
            // Spike мгновенный: без сглаживания в этом тике, аккумулятор сброшен
            self.noise = self.noise.max(self.config.landing_noise);
            self.noise_velocity = 0.0;
        } else {
            self.noise = smooth_damp(
                self.noise,
                noise_goal,
                &mut self.noise_velocity,
                self.config.noise_smooth_time,
                dt,
            );
        }

        let visibility_goal = visibility_target(&self.config, motion, resources).clamp(0.0, 1.0);
        self.visibility = smooth_damp(
            self.visibility,
            visibility_goal,
            &mut self.visibility_velocity,
            self.config.visibility_smooth_time,
            dt,
        );

        self.noise = self.noise.clamp(0.0, 1.0);
        self.visibility = self.visibility.clamp(0.0, 1.0);

        just_landed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f32 = 1.0 / 60.0;

    fn grounded() -> MotionSnapshot {
        MotionSnapshot {
            is_grounded: true,
            ..Default::default()
        }
    }

    fn walking() -> MotionSnapshot {
        MotionSnapshot {
            is_moving: true,
            ..grounded()
        }
    }

    fn airborne() -> MotionSnapshot {
        MotionSnapshot::default()
    }

    #[test]
    fn test_landing_fires_once_per_transition() {
        let mut signals = StealthSignals::default();
        let mut landings = Vec::new();

        for _ in 0..5 {
            landings.push(signals.update(airborne(), ResourceSignals::default(), DT));
        }
        for _ in 0..7 {
            landings.push(signals.update(grounded(), ResourceSignals::default(), DT));
        }

        let fired: Vec<usize> = landings
            .iter()
            .enumerate()
            .filter_map(|(tick, landed)| landed.then_some(tick))
            .collect();
        assert_eq!(fired, vec![5]);
    }

    #[test]
    fn test_no_landing_on_spawn_grounded() {
        let mut signals = StealthSignals::default();
        assert!(!signals.update(grounded(), ResourceSignals::default(), DT));
    }

    #[test]
    fn test_landing_spike_is_immediate() {
        let mut signals = StealthSignals::new(StealthConfig {
            landing_noise: 0.9,
            ..Default::default()
        });
        signals.update(airborne(), ResourceSignals::default(), DT);
        signals.noise = 0.2;

        let landed = signals.update(grounded(), ResourceSignals::default(), DT);

        assert!(landed);
        assert_eq!(signals.current_noise(), 0.9);
        assert_eq!(signals.noise_velocity, 0.0);
    }

    #[test]
    fn test_landing_never_lowers_noise() {
        let mut signals = StealthSignals::new(StealthConfig {
            landing_noise: 0.4,
            ..Default::default()
        });
        signals.update(airborne(), ResourceSignals::default(), DT);
        signals.noise = 0.8;

        signals.update(grounded(), ResourceSignals::default(), DT);

        assert_eq!(signals.current_noise(), 0.8);
    }

    #[test]
    fn test_noise_decays_smoothly_after_landing() {
        let mut signals = StealthSignals::default();
        signals.update(airborne(), ResourceSignals::default(), DT);
        signals.update(grounded(), ResourceSignals::default(), DT);
        let spike = signals.current_noise();

        signals.update(grounded(), ResourceSignals::default(), DT);

        // Вниз — только сглаженно
        assert!(signals.current_noise() < spike);
        assert!(signals.current_noise() > 0.5);
    }

    #[test]
    fn test_walking_noise_converges_without_overshoot() {
        let mut signals = StealthSignals::new(StealthConfig {
            idle_noise: 0.05,
            walk_noise: 0.3,
            noise_smooth_time: 0.25,
            ..Default::default()
        });

        assert!((noise_target(signals.config(), walking(), 0.0) - 0.3).abs() < 1e-6);

        for _ in 0..300 {
            signals.update(walking(), ResourceSignals::default(), DT);
            assert!(signals.current_noise() <= 0.3, "overshoot {}", signals.current_noise());
        }

        assert!((signals.current_noise() - 0.3).abs() < 1e-3);
    }

    #[test]
    fn test_outputs_clamped_with_extreme_config() {
        let mut signals = StealthSignals::new(StealthConfig {
            idle_noise: 3.0,
            walk_noise: 5.0,
            sprint_noise: 9.0,
            landing_noise: 4.0,
            base_visibility: 2.5,
            movement_visibility_bonus: 3.0,
            ..Default::default()
        });
        let heavy = ResourceSignals {
            weight_fraction: 1.0,
            is_exhausted: true,
        };

        signals.update(airborne(), heavy, DT);
        signals.update(walking(), heavy, DT);
        for _ in 0..120 {
            signals.update(walking(), heavy, DT);
            assert!((0.0..=1.0).contains(&signals.current_noise()));
            assert!((0.0..=1.0).contains(&signals.current_visibility()));
        }

        assert!((signals.current_visibility() - 1.0).abs() < 1e-2);
    }

    #[test]
    fn test_airborne_noise_is_fraction_of_idle() {
        let config = StealthConfig::default();
        let target = noise_target(&config, airborne(), 1.0);

        // В воздухе вес не влияет
        assert!((target - config.idle_noise * config.airborne_noise_factor).abs() < 1e-6);
    }

    #[test]
    fn test_noise_priority_crouch_over_sprint() {
        let config = StealthConfig::default();
        let crouch_sprint = MotionSnapshot {
            is_grounded: true,
            is_crouching: true,
            is_moving: true,
            is_sprinting: true,
        };
        let sprint = MotionSnapshot {
            is_crouching: false,
            ..crouch_sprint
        };

        assert_eq!(noise_target(&config, crouch_sprint, 0.0), config.crouch_noise);
        assert_eq!(noise_target(&config, sprint, 0.0), config.sprint_noise);
        assert_eq!(noise_target(&config, grounded(), 0.0), config.idle_noise);
    }

    #[test]
    fn test_weight_scales_noise() {
        let config = StealthConfig::default();
        let target = noise_target(&config, walking(), 1.0);

        assert!((target - config.walk_noise * 1.5).abs() < 1e-6);
    }

    #[test]
    fn test_visibility_crouch_multiplies_total() {
        let config = StealthConfig::default();
        let resources = ResourceSignals {
            weight_fraction: 0.5,
            is_exhausted: true,
        };
        let standing = visibility_target(&config, walking(), resources);
        let crouched = visibility_target(
            &config,
            MotionSnapshot {
                is_crouching: true,
                ..walking()
            },
            resources,
        );

        let expected = config.base_visibility + config.movement_visibility_bonus + 0.05 + config.exhaustion_visibility_bonus;
        assert!((standing - expected).abs() < 1e-6);
        assert!((crouched - expected * config.crouch_visibility_multiplier).abs() < 1e-6);
    }

    #[test]
    fn test_sprint_bonus_replaces_movement_bonus() {
        let config = StealthConfig::default();
        let sprinting = MotionSnapshot {
            is_sprinting: true,
            ..walking()
        };

        let target = visibility_target(&config, sprinting, ResourceSignals::default());
        assert!((target - (config.base_visibility + config.sprint_visibility_bonus)).abs() < 1e-6);
    }

    #[test]
    fn test_noise_radius_is_derived() {
        let mut signals = StealthSignals::default();
        signals.noise = 0.4;

        assert!((signals.current_noise_radius() - 0.4 * signals.config().max_noise_radius).abs() < 1e-6);
    }

    #[test]
    fn test_missing_resources_are_neutral() {
        assert_eq!(ResourceSignals::from_resources(None), ResourceSignals::default());

        let mut resources = PhysicalResources::default();
        resources.add_weight(25.0);
        let signals = ResourceSignals::from_resources(Some(&resources));
        assert!((signals.weight_fraction - 0.5).abs() < 1e-6);
        assert!(!signals.is_exhausted);
    }
}
