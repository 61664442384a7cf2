//! Response curves — designer-tunable функции normalized input → multiplier
//!
//! Piecewise-linear интерполяция между ключами. Используется для
//! weight fraction → movement/jump/stamina-drain multipliers.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Ключ кривой: (input, output)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Reflect)]
pub struct CurveKey {
    pub input: f32,
    pub output: f32,
}

/// Piecewise-linear кривая
///
/// Инвариант: ключи отсортированы по `input`, без NaN.
/// Вне диапазона ключей — значение крайнего ключа (clamp, без экстраполяции).
/// Пустая кривая → 1.0 (нейтральный multiplier).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Reflect)]
#[serde(from = "RawCurve")]
pub struct ResponseCurve {
    keys: Vec<CurveKey>,
}

/// Формат кривой в tuning файле; ключи могут идти в любом порядке
#[derive(Deserialize)]
struct RawCurve {
    keys: Vec<CurveKey>,
}

impl From<RawCurve> for ResponseCurve {
    fn from(raw: RawCurve) -> Self {
        Self::from_points(raw.keys.into_iter().map(|key| (key.input, key.output)))
    }
}

impl Default for ResponseCurve {
    fn default() -> Self {
        Self::constant(1.0)
    }
}

impl ResponseCurve {
    /// Кривая из произвольного набора точек (сортирует, отбрасывает NaN)
    pub fn from_points(points: impl IntoIterator<Item = (f32, f32)>) -> Self {
        let mut keys: Vec<CurveKey> = points
            .into_iter()
            .filter(|(input, output)| input.is_finite() && output.is_finite())
            .map(|(input, output)| CurveKey { input, output })
            .collect();

        keys.sort_by(|a, b| a.input.total_cmp(&b.input));

        Self { keys }
    }

    /// Прямая (0, from) → (1, to)
    pub fn linear(from: f32, to: f32) -> Self {
        Self::from_points([(0.0, from), (1.0, to)])
    }

    pub fn constant(value: f32) -> Self {
        Self::from_points([(0.0, value)])
    }

    pub fn keys(&self) -> &[CurveKey] {
        &self.keys
    }

    pub fn evaluate(&self, input: f32) -> f32 {
        let (Some(first), Some(last)) = (self.keys.first(), self.keys.last()) else {
            return 1.0;
        };

        if input.is_nan() || input <= first.input {
            return first.output;
        }
        if input >= last.input {
            return last.output;
        }

        for pair in self.keys.windows(2) {
            let [a, b] = pair else {
                continue;
            };

            if input <= b.input {
                let span = b.input - a.input;
                if span <= f32::EPSILON {
                    return b.output;
                }
                let t = (input - a.input) / span;
                return a.output + (b.output - a.output) * t;
            }
        }

        last.output
    }

    /// Монотонна ли кривая (non-increasing или non-decreasing)
    pub fn is_monotonic(&self) -> bool {
        let outputs: Vec<f32> = self.keys.iter().map(|k| k.output).collect();
        let non_decreasing = outputs.windows(2).all(|w| w[0] <= w[1]);
        let non_increasing = outputs.windows(2).all(|w| w[0] >= w[1]);
        non_decreasing || non_increasing
    }
}
