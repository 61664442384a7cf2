//! Scalar smoothing helpers: линейный `move_towards` и critically-damped `smooth_damp`.

/// Минимальное время сглаживания (деление на ноль в omega)
pub const MIN_SMOOTH_TIME: f32 = 1e-4;

/// Линейное приближение к target не больше чем на `max_delta` (без overshoot)
pub fn move_towards(current: f32, target: f32, max_delta: f32) -> f32 {
    let diff = target - current;
    if diff.abs() <= max_delta.max(0.0) {
        target
    } else {
        current + diff.signum() * max_delta.max(0.0)
    }
}

/// Critically-damped экспоненциальное приближение к target
///
/// `velocity` — аккумулятор скорости сглаживания (state между тиками).
/// Полиномиальная аппроксимация exp(-omega·dt); результат никогда не перескакивает target.
/// `dt <= 0` → значение не меняется.
pub fn smooth_damp(current: f32, target: f32, velocity: &mut f32, smooth_time: f32, dt: f32) -> f32 {
    if dt <= 0.0 {
        return current;
    }

    let smooth_time = smooth_time.max(MIN_SMOOTH_TIME);
    let omega = 2.0 / smooth_time;
    let x = omega * dt;
    let decay = 1.0 / (1.0 + x + 0.48 * x * x + 0.235 * x * x * x);

    let change = current - target;
    let temp = (*velocity + omega * change) * dt;
    *velocity = (*velocity - omega * temp) * decay;

    let output = target + (change + temp) * decay;

    // Overshoot guard: если прошли через target — фиксируемся на нём
    if (target - current > 0.0) == (output > target) {
        *velocity = 0.0;
        return target;
    }

    output
}
