//! Physical Resource Model: stamina + carry weight
//!
//! Leaf компонент — не зависит от locomotion/stealth.
//! Locomotion вызывает consume_* (sprint drain, jump cost),
//! inventory коллаборатор вызывает add_weight/remove_weight.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::config::ConfigIssue;
use crate::shared::ResponseCurve;

/// Параметры выносливости и веса
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Reflect)]
#[serde(default)]
pub struct PhysicalConfig {
    pub max_stamina: f32,
    /// units/sec
    pub stamina_regen_rate: f32,
    /// Пауза (sec) после последнего расхода перед регеном
    pub stamina_regen_delay: f32,
    pub jump_stamina_cost: f32,
    /// units/sec при sprint (до multiplier от веса)
    pub sprint_drain_rate: f32,
    pub max_carry_weight: f32,
    /// weight fraction → movement multiplier
    pub movement_curve: ResponseCurve,
    /// weight fraction → jump multiplier
    pub jump_curve: ResponseCurve,
    /// weight fraction → stamina drain multiplier
    pub stamina_drain_curve: ResponseCurve,
    /// Нижняя граница movement multiplier (персонаж никогда не обездвижен весом)
    pub min_movement_multiplier: f32,
}

impl Default for PhysicalConfig {
    fn default() -> Self {
        Self {
            max_stamina: 100.0,
            stamina_regen_rate: 15.0,
            stamina_regen_delay: 1.0,
            jump_stamina_cost: 12.0,
            sprint_drain_rate: 20.0,
            max_carry_weight: 50.0,
            movement_curve: ResponseCurve::linear(1.0, 0.4),
            jump_curve: ResponseCurve::linear(1.0, 0.6),
            stamina_drain_curve: ResponseCurve::linear(1.0, 2.0),
            min_movement_multiplier: 0.1,
        }
    }
}

impl PhysicalConfig {
    /// Проверка конфигурации (не фатально — только предупреждения)
    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();

        if !(self.max_stamina > 0.0) {
            issues.push(ConfigIssue::NonPositivePool {
                name: "max_stamina",
                value: self.max_stamina,
            });
        }
        if !(self.max_carry_weight > 0.0) {
            issues.push(ConfigIssue::NonPositivePool {
                name: "max_carry_weight",
                value: self.max_carry_weight,
            });
        }

        for (name, curve) in [
            ("movement_curve", &self.movement_curve),
            ("jump_curve", &self.jump_curve),
            ("stamina_drain_curve", &self.stamina_drain_curve),
        ] {
            if !curve.is_monotonic() {
                issues.push(ConfigIssue::NonMonotonicCurve { name });
            }
        }

        issues
    }

    /// Копия с безопасными fallback значениями вместо невалидных
    pub fn sanitized(&self) -> Self {
        let defaults = Self::default();
        let mut config = self.clone();

        if !(config.max_stamina > 0.0) {
            config.max_stamina = defaults.max_stamina;
        }
        if !(config.max_carry_weight > 0.0) {
            config.max_carry_weight = defaults.max_carry_weight;
        }
        config.stamina_regen_rate = config.stamina_regen_rate.max(0.0);
        config.stamina_regen_delay = config.stamina_regen_delay.max(0.0);
        config.jump_stamina_cost = config.jump_stamina_cost.max(0.0);
        config.sprint_drain_rate = config.sprint_drain_rate.max(0.0);
        config.min_movement_multiplier = config.min_movement_multiplier.max(0.0);

        config
    }
}

/// Кэш multipliers от веса
///
/// Пересчитывается синхронно внутри add_weight/remove_weight, никогда лениво.
#[derive(Debug, Clone, Copy, PartialEq, Reflect)]
pub struct WeightMultipliers {
    pub movement: f32,
    pub jump: f32,
    pub stamina_drain: f32,
}

impl WeightMultipliers {
    /// Чистая функция: config + weight fraction → multipliers
    pub fn compute(config: &PhysicalConfig, weight_fraction: f32) -> Self {
        Self {
            movement: config
                .movement_curve
                .evaluate(weight_fraction)
                .max(config.min_movement_multiplier),
            jump: config.jump_curve.evaluate(weight_fraction).max(0.0),
            stamina_drain: config.stamina_drain_curve.evaluate(weight_fraction).max(0.0),
        }
    }
}

/// Выносливость + переносимый вес персонажа
///
/// Инварианты:
/// - 0.0 ≤ current_stamina ≤ max_stamina
/// - 0.0 ≤ current_carry_weight ≤ max_carry_weight
/// - multipliers всегда соответствуют текущему весу
#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component)]
pub struct PhysicalResources {
    config: PhysicalConfig,
    current_stamina: f32,
    current_carry_weight: f32,
    /// Монотонные часы ресурса (sec), двигаются в tick()
    clock: f64,
    last_stamina_use: Option<f64>,
    multipliers: WeightMultipliers,
}

impl Default for PhysicalResources {
    fn default() -> Self {
        Self::new(PhysicalConfig::default())
    }
}

impl PhysicalResources {
    pub fn new(config: PhysicalConfig) -> Self {
        for issue in config.validate() {
            crate::log_warning(&format!("PhysicalResources: {} (using fallback)", issue));
        }

        let config = config.sanitized();
        let multipliers = WeightMultipliers::compute(&config, 0.0);

        Self {
            current_stamina: config.max_stamina,
            current_carry_weight: 0.0,
            clock: 0.0,
            last_stamina_use: None,
            multipliers,
            config,
        }
    }

    pub fn config(&self) -> &PhysicalConfig {
        &self.config
    }

    // ------------------------------------------------------------------
    // Stamina
    // ------------------------------------------------------------------

    pub fn current_stamina(&self) -> f32 {
        self.current_stamina
    }

    pub fn max_stamina(&self) -> f32 {
        self.config.max_stamina
    }

    pub fn normalized_stamina(&self) -> f32 {
        self.current_stamina / self.config.max_stamina
    }

    /// Sprint drain за тик: dt × base rate × weight multiplier
    pub fn consume_sprint_stamina(&mut self, dt: f32) {
        let drain = dt.max(0.0) * self.config.sprint_drain_rate * self.multipliers.stamina_drain;
        self.current_stamina = (self.current_stamina - drain).max(0.0);
        self.last_stamina_use = Some(self.clock);
    }

    pub fn consume_jump_stamina(&mut self) {
        self.current_stamina = (self.current_stamina - self.config.jump_stamina_cost).max(0.0);
        self.last_stamina_use = Some(self.clock);
    }

    /// Регенерация (вызывается раз в тик до locomotion)
    ///
    /// Delay считается по timestamp последнего расхода: серия расходов
    /// продлевает паузу, а не сбрасывает отдельный таймер.
    pub fn tick(&mut self, dt: f32) {
        let dt = dt.max(0.0);
        self.clock += f64::from(dt);

        if self.current_stamina >= self.config.max_stamina {
            self.current_stamina = self.config.max_stamina;
            return;
        }

        if let Some(last_use) = self.last_stamina_use {
            if self.clock - last_use < f64::from(self.config.stamina_regen_delay) {
                return;
            }
        }

        self.current_stamina =
            (self.current_stamina + self.config.stamina_regen_rate * dt).min(self.config.max_stamina);
    }

    pub fn has_stamina_for_sprint(&self) -> bool {
        self.current_stamina > 0.0
    }

    pub fn has_stamina_for_jump(&self) -> bool {
        self.current_stamina >= self.config.jump_stamina_cost
    }

    pub fn is_exhausted(&self) -> bool {
        self.current_stamina <= 0.0
    }

    /// Секунды с последнего расхода (None — расхода ещё не было)
    pub fn time_since_stamina_use(&self) -> Option<f32> {
        self.last_stamina_use.map(|last| (self.clock - last) as f32)
    }

    // ------------------------------------------------------------------
    // Carry weight
    // ------------------------------------------------------------------

    pub fn current_carry_weight(&self) -> f32 {
        self.current_carry_weight
    }

    pub fn max_carry_weight(&self) -> f32 {
        self.config.max_carry_weight
    }

    pub fn weight_fraction(&self) -> f32 {
        self.current_carry_weight / self.config.max_carry_weight
    }

    pub fn is_overburdened(&self) -> bool {
        self.weight_fraction() >= 1.0
    }

    pub fn add_weight(&mut self, amount: f32) {
        if !(amount > 0.0) {
            return;
        }
        self.current_carry_weight =
            (self.current_carry_weight + amount).clamp(0.0, self.config.max_carry_weight);
        self.recompute_multipliers();
    }

    pub fn remove_weight(&mut self, amount: f32) {
        if !(amount > 0.0) {
            return;
        }
        self.current_carry_weight =
            (self.current_carry_weight - amount).clamp(0.0, self.config.max_carry_weight);
        self.recompute_multipliers();
    }

    fn recompute_multipliers(&mut self) {
        self.multipliers = WeightMultipliers::compute(&self.config, self.weight_fraction());
    }

    pub fn multipliers(&self) -> WeightMultipliers {
        self.multipliers
    }

    pub fn movement_multiplier(&self) -> f32 {
        self.multipliers.movement
    }

    pub fn jump_multiplier(&self) -> f32 {
        self.multipliers.jump
    }

    pub fn stamina_drain_multiplier(&self) -> f32 {
        self.multipliers.stamina_drain
    }
}

/// Marker: stamina на нуле
///
/// Вешается/снимается системой detect_exhaustion, зеркалит is_exhausted().
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
pub struct Exhausted;

#[cfg(test)]
mod tests {
    use super::*;

    fn config_with_cost(jump_cost: f32) -> PhysicalConfig {
        PhysicalConfig {
            jump_stamina_cost: jump_cost,
            ..default()
        }
    }

    #[test]
    fn test_spawns_full_and_unburdened() {
        let resources = PhysicalResources::default();

        assert_eq!(resources.current_stamina(), 100.0);
        assert_eq!(resources.normalized_stamina(), 1.0);
        assert_eq!(resources.current_carry_weight(), 0.0);
        assert_eq!(resources.movement_multiplier(), 1.0);
        assert!(!resources.is_exhausted());
        assert!(!resources.is_overburdened());
    }

    #[test]
    fn test_sprint_drain_uses_weight_multiplier() {
        let mut resources = PhysicalResources::default();
        resources.add_weight(25.0); // fraction 0.5 → drain ×1.5

        resources.consume_sprint_stamina(1.0);

        assert!((resources.current_stamina() - 70.0).abs() < 1e-4);
    }

    #[test]
    fn test_jump_cost_clamps_at_zero() {
        let mut resources = PhysicalResources::new(config_with_cost(60.0));

        resources.consume_jump_stamina();
        assert_eq!(resources.current_stamina(), 40.0);
        assert!(!resources.has_stamina_for_jump());

        resources.consume_jump_stamina();
        assert_eq!(resources.current_stamina(), 0.0);
        assert!(resources.is_exhausted());
        assert!(!resources.has_stamina_for_sprint());
    }

    #[test]
    fn test_sprint_allowed_down_to_last_unit_jump_is_not() {
        let mut resources = PhysicalResources::new(config_with_cost(12.0));
        resources.consume_sprint_stamina(4.95); // 100 - 99 = 1

        assert!(resources.has_stamina_for_sprint());
        assert!(!resources.has_stamina_for_jump());
    }

    #[test]
    fn test_regen_waits_for_delay() {
        let mut resources = PhysicalResources::default();
        resources.consume_jump_stamina(); // 88

        resources.tick(0.5);
        assert_eq!(resources.current_stamina(), 88.0);

        resources.tick(0.5); // 1.0 sec с последнего расхода → реген
        assert!((resources.current_stamina() - 95.5).abs() < 1e-4);
    }

    #[test]
    fn test_repeated_use_extends_quiet_period() {
        let mut resources = PhysicalResources::default();

        resources.consume_jump_stamina();
        resources.tick(0.8);
        resources.consume_jump_stamina(); // timestamp сдвинулся
        resources.tick(0.8);

        // 0.8 sec после второго расхода — всё ещё пауза
        assert_eq!(resources.current_stamina(), 76.0);
        assert!((resources.time_since_stamina_use().unwrap_or_default() - 0.8).abs() < 1e-4);
    }

    #[test]
    fn test_regen_clamps_to_max() {
        let mut resources = PhysicalResources::default();
        resources.consume_sprint_stamina(0.1); // -2

        resources.tick(1.0);
        resources.tick(10.0);

        assert_eq!(resources.current_stamina(), 100.0);
    }

    #[test]
    fn test_weight_clamped_and_non_positive_ignored() {
        let mut resources = PhysicalResources::default();

        resources.add_weight(-5.0);
        resources.add_weight(0.0);
        assert_eq!(resources.current_carry_weight(), 0.0);

        resources.add_weight(500.0);
        assert_eq!(resources.current_carry_weight(), 50.0);
        assert!(resources.is_overburdened());

        resources.remove_weight(f32::NAN);
        assert_eq!(resources.current_carry_weight(), 50.0);

        resources.remove_weight(80.0);
        assert_eq!(resources.current_carry_weight(), 0.0);
    }

    #[test]
    fn test_full_weight_uses_curve_endpoint_above_floor() {
        let mut resources = PhysicalResources::new(PhysicalConfig {
            movement_curve: ResponseCurve::linear(1.0, 0.4),
            min_movement_multiplier: 0.1,
            ..default()
        });

        resources.add_weight(resources.max_carry_weight());

        assert_eq!(resources.weight_fraction(), 1.0);
        assert!((resources.movement_multiplier() - 0.4).abs() < 1e-6);
    }

    #[test]
    fn test_movement_floor_applies() {
        let mut resources = PhysicalResources::new(PhysicalConfig {
            movement_curve: ResponseCurve::linear(1.0, 0.0),
            min_movement_multiplier: 0.1,
            ..default()
        });

        resources.add_weight(1000.0);

        assert_eq!(resources.movement_multiplier(), 0.1);
    }

    #[test]
    fn test_add_then_remove_restores_multipliers() {
        let mut resources = PhysicalResources::default();
        resources.add_weight(7.5);
        let before = resources.multipliers();

        resources.add_weight(13.25);
        assert_ne!(resources.multipliers(), before);

        resources.remove_weight(13.25);
        assert_eq!(resources.multipliers(), before);
    }

    #[test]
    fn test_invalid_pool_sizes_fall_back() {
        let resources = PhysicalResources::new(PhysicalConfig {
            max_stamina: 0.0,
            max_carry_weight: -3.0,
            ..default()
        });

        assert_eq!(resources.max_stamina(), 100.0);
        assert_eq!(resources.max_carry_weight(), 50.0);
        assert_eq!(resources.weight_fraction(), 0.0);
    }

    #[test]
    fn test_validate_reports_issues() {
        let config = PhysicalConfig {
            max_stamina: -1.0,
            jump_curve: ResponseCurve::from_points([(0.0, 1.0), (0.5, 0.1), (1.0, 0.9)]),
            ..default()
        };

        let issues = config.validate();
        assert_eq!(issues.len(), 2);
    }

    #[derive(Debug, Clone)]
    enum Op {
        Tick(f32),
        Sprint(f32),
        Jump,
        AddWeight(f32),
        RemoveWeight(f32),
    }

    fn op_strategy() -> impl proptest::strategy::Strategy<Value = Op> {
        use proptest::prelude::*;

        prop_oneof![
            (0.0f32..0.5).prop_map(Op::Tick),
            (0.0f32..0.5).prop_map(Op::Sprint),
            Just(Op::Jump),
            (-10.0f32..80.0).prop_map(Op::AddWeight),
            (-10.0f32..80.0).prop_map(Op::RemoveWeight),
        ]
    }

    proptest::proptest! {
        #[test]
        fn prop_pools_stay_in_bounds(ops in proptest::collection::vec(op_strategy(), 1..200)) {
            let mut resources = PhysicalResources::default();

            for op in ops {
                match op {
                    Op::Tick(dt) => resources.tick(dt),
                    Op::Sprint(dt) => resources.consume_sprint_stamina(dt),
                    Op::Jump => resources.consume_jump_stamina(),
                    Op::AddWeight(amount) => resources.add_weight(amount),
                    Op::RemoveWeight(amount) => resources.remove_weight(amount),
                }

                proptest::prop_assert!(resources.current_stamina() >= 0.0);
                proptest::prop_assert!(resources.current_stamina() <= resources.max_stamina());
                proptest::prop_assert!(resources.current_carry_weight() >= 0.0);
                proptest::prop_assert!(resources.current_carry_weight() <= resources.max_carry_weight());
                proptest::prop_assert_eq!(
                    resources.multipliers(),
                    WeightMultipliers::compute(resources.config(), resources.weight_fraction())
                );
                proptest::prop_assert!(resources.movement_multiplier() >= resources.config().min_movement_multiplier);
            }
        }
    }
}
