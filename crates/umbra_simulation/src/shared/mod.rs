//! Shared — математика, общая для доменов
//!
//! Содержит:
//! - ResponseCurve (piecewise-linear кривые tuning'а)
//! - smooth_damp / move_towards (сглаживание сигналов и скоростей)

pub mod curve;
pub mod smoothing;

pub use curve::{CurveKey, ResponseCurve};
pub use smoothing::{move_towards, smooth_damp, MIN_SMOOTH_TIME};
