//! Tuning персонажа: агрегат трёх конфигов + загрузка из JSON
//!
//! Ошибки конфигурации не фатальны: `validate()` возвращает список ConfigIssue,
//! компоненты логируют их один раз при создании и берут fallback значения.

use std::path::Path;

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::movement::LocomotionConfig;
use crate::physical::PhysicalConfig;
use crate::stealth::StealthConfig;

/// Предупреждение конфигурации (логируется, симуляция продолжается)
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigIssue {
    #[error("pool `{name}` must be positive, got {value}")]
    NonPositivePool { name: &'static str, value: f32 },

    #[error("curve `{name}` is not monotonic")]
    NonMonotonicCurve { name: &'static str },

    #[error("smoothing time `{name}` must be positive, got {value}")]
    NonPositiveSmoothTime { name: &'static str, value: f32 },

    #[error("rate `{name}` must be positive, got {value}")]
    NonPositiveRate { name: &'static str, value: f32 },

    #[error("ground stick velocity must point down, got {value}")]
    UpwardStickVelocity { value: f32 },

    #[error("crouch height {crouch} must be positive and below standing height {standing}")]
    InvalidCapsuleHeights { standing: f32, crouch: f32 },

    #[error("collaborator `{component}` missing on {entity:?}, gating defaults to permit")]
    MissingCollaborator {
        component: &'static str,
        entity: Entity,
    },
}

/// Ошибка загрузки tuning файла (вне core — только для хоста/бинаря)
#[derive(Debug, Error)]
pub enum TuningError {
    #[error("failed to read tuning file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse tuning: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Полный tuning персонажа
#[derive(Resource, Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CharacterTuning {
    pub physical: PhysicalConfig,
    pub locomotion: LocomotionConfig,
    pub stealth: StealthConfig,
}

impl CharacterTuning {
    pub fn from_json_str(json: &str) -> Result<Self, TuningError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, TuningError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    pub fn to_json_pretty(&self) -> Result<String, TuningError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = self.physical.validate();
        issues.extend(self.locomotion.validate());
        issues.extend(self.stealth.validate());
        issues
    }
}
