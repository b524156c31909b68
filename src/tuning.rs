//! Data-driven game balance
//!
//! Both shipped variants run on the same core; everything that differs between
//! them lives in a [`TuningProfile`]. Profiles can also be read from JSON so
//! balance tweaks don't need a rebuild.

use serde::{Deserialize, Serialize};

use crate::Millis;
use crate::consts::*;

/// How the craft responds to input
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum ControlScheme {
    /// Craft falls under gravity; the action signal sets an upward velocity
    Gravity { gravity: f32, flap_impulse: f32 },
    /// Craft follows the pointer directly (no velocity state)
    Tracking,
}

/// Spawn timing for one entity kind
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpawnCadence {
    /// Starting interval between spawns
    pub interval_ms: Millis,
    /// Interval never decays below this
    pub floor_ms: Millis,
    /// Decay applied after each spawn (0 = no ramp)
    pub step_ms: Millis,
}

impl SpawnCadence {
    pub const fn fixed(interval_ms: Millis) -> Self {
        Self {
            interval_ms,
            floor_ms: interval_ms,
            step_ms: 0,
        }
    }

    /// Interval after one more spawn
    pub fn decayed(&self, current: Millis) -> Millis {
        current.saturating_sub(self.step_ms).max(self.floor_ms)
    }
}

/// Collision radii per kind (empirical, not derived from sprite sizes)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CollisionRadii {
    pub craft: f32,
    pub obstacle: f32,
    pub asteroid: f32,
    pub bonus: f32,
    pub final_target: f32,
}

impl Default for CollisionRadii {
    fn default() -> Self {
        Self {
            craft: 20.0,
            obstacle: 30.0,
            asteroid: 25.0,
            bonus: 25.0,
            final_target: 40.0,
        }
    }
}

/// Horizontal positions where off-field entities are culled
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CullThresholds {
    pub obstacle: f32,
    pub asteroid: f32,
    pub bonus: f32,
    pub final_target: f32,
}

impl Default for CullThresholds {
    fn default() -> Self {
        Self {
            obstacle: -60.0,
            asteroid: -100.0,
            bonus: -60.0,
            final_target: -80.0,
        }
    }
}

/// Point values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreValues {
    pub evade: u64,
    pub bonus: u64,
    pub final_target: u64,
}

impl Default for ScoreValues {
    fn default() -> Self {
        Self {
            evade: EVADE_SCORE,
            bonus: BONUS_SCORE,
            final_target: FINAL_TARGET_SCORE,
        }
    }
}

/// Deferred-effect delays
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EffectDelays {
    pub bonus_removal_ms: Millis,
    pub final_target_removal_ms: Millis,
    /// Must exceed `final_target_removal_ms` so the explosion plays before the win screen
    pub outcome_display_ms: Millis,
}

impl Default for EffectDelays {
    fn default() -> Self {
        Self {
            bonus_removal_ms: BONUS_REMOVAL_DELAY_MS,
            final_target_removal_ms: FINAL_TARGET_REMOVAL_DELAY_MS,
            outcome_display_ms: OUTCOME_DISPLAY_DELAY_MS,
        }
    }
}

/// Complete tuning for one game variant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TuningProfile {
    pub name: String,
    pub control: ControlScheme,

    // === Field ===
    pub field_width: f32,
    pub field_height: f32,
    /// Craft vertical bounds
    pub craft_min_y: f32,
    pub craft_max_y: f32,
    /// Craft y at game start
    pub craft_start_y: f32,
    /// Entities spawn at least this far from the top and bottom edges
    pub spawn_margin: f32,
    /// Entities enter this far beyond the right edge
    pub spawn_offset_x: f32,

    // === Pacing ===
    /// Horizontal distance per reference frame
    pub base_speed: f32,
    /// Speed multiplier for the final target
    pub final_target_speed_factor: f32,
    pub obstacle: SpawnCadence,
    pub bonus: SpawnCadence,
    pub asteroid: SpawnCadence,
    /// Bonus hits needed for the final phase
    pub bonus_target: u32,

    #[serde(default)]
    pub radii: CollisionRadii,
    #[serde(default)]
    pub cull: CullThresholds,
    #[serde(default)]
    pub scores: ScoreValues,
    #[serde(default)]
    pub delays: EffectDelays,
}

impl TuningProfile {
    /// Pointer-tracked craft with a slow, forgiving spawn cadence
    pub fn tracking() -> Self {
        Self {
            name: "tracking".to_string(),
            control: ControlScheme::Tracking,
            craft_min_y: 25.0,
            craft_max_y: 325.0,
            obstacle: SpawnCadence {
                interval_ms: 4000,
                floor_ms: 2000,
                step_ms: 100,
            },
            bonus: SpawnCadence::fixed(3000),
            asteroid: SpawnCadence {
                interval_ms: 3000,
                floor_ms: 800,
                step_ms: 50,
            },
            ..Self::base()
        }
    }

    /// Flap-and-fall craft with a fast spawn cadence
    pub fn gravity() -> Self {
        Self {
            name: "gravity".to_string(),
            control: ControlScheme::Gravity {
                gravity: 0.08,
                flap_impulse: -3.0,
            },
            craft_min_y: 0.0,
            craft_max_y: 350.0,
            obstacle: SpawnCadence {
                interval_ms: 2500,
                floor_ms: 2000,
                step_ms: 100,
            },
            bonus: SpawnCadence::fixed(2000),
            asteroid: SpawnCadence {
                interval_ms: 1500,
                floor_ms: 800,
                step_ms: 50,
            },
            ..Self::base()
        }
    }

    fn base() -> Self {
        Self {
            name: String::new(),
            control: ControlScheme::Tracking,
            field_width: 800.0,
            field_height: 400.0,
            craft_min_y: 0.0,
            craft_max_y: 400.0,
            craft_start_y: 200.0,
            spawn_margin: 60.0,
            spawn_offset_x: 60.0,
            base_speed: 2.0,
            final_target_speed_factor: 0.5,
            obstacle: SpawnCadence::fixed(4000),
            bonus: SpawnCadence::fixed(3000),
            asteroid: SpawnCadence::fixed(3000),
            bonus_target: BONUS_TARGET,
            radii: CollisionRadii::default(),
            cull: CullThresholds::default(),
            scores: ScoreValues::default(),
            delays: EffectDelays::default(),
        }
    }

    /// Horizontal position of the craft (it sits mid-field)
    pub fn craft_x(&self) -> f32 {
        self.field_width / 2.0
    }

    /// Parse a profile from JSON. Profiles that fail [`TuningProfile::validate`]
    /// are rejected.
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        let profile: Self = serde_json::from_str(json)?;
        profile
            .validate()
            .map_err(<serde_json::Error as serde::de::Error>::custom)?;
        Ok(profile)
    }

    /// Check that the profile describes a playable game
    pub fn validate(&self) -> Result<(), String> {
        let positive = [
            ("field_width", self.field_width),
            ("field_height", self.field_height),
            ("base_speed", self.base_speed),
            ("final_target_speed_factor", self.final_target_speed_factor),
            ("radii.craft", self.radii.craft),
            ("radii.obstacle", self.radii.obstacle),
            ("radii.asteroid", self.radii.asteroid),
            ("radii.bonus", self.radii.bonus),
            ("radii.final_target", self.radii.final_target),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(format!("{name} must be a positive number, got {value}"));
            }
        }

        let finite = [
            ("craft_min_y", self.craft_min_y),
            ("craft_max_y", self.craft_max_y),
            ("craft_start_y", self.craft_start_y),
            ("spawn_margin", self.spawn_margin),
            ("spawn_offset_x", self.spawn_offset_x),
            ("cull.obstacle", self.cull.obstacle),
            ("cull.asteroid", self.cull.asteroid),
            ("cull.bonus", self.cull.bonus),
            ("cull.final_target", self.cull.final_target),
        ];
        for (name, value) in finite {
            if !value.is_finite() {
                return Err(format!("{name} must be finite, got {value}"));
            }
        }

        if self.craft_min_y > self.craft_max_y {
            return Err(format!(
                "craft_min_y ({}) is above craft_max_y ({})",
                self.craft_min_y, self.craft_max_y
            ));
        }
        if let ControlScheme::Gravity {
            gravity,
            flap_impulse,
        } = self.control
        {
            if !(gravity.is_finite() && flap_impulse.is_finite()) {
                return Err("gravity and flap_impulse must be finite".to_string());
            }
        }
        for (name, cadence) in [
            ("obstacle", &self.obstacle),
            ("bonus", &self.bonus),
            ("asteroid", &self.asteroid),
        ] {
            if cadence.floor_ms > cadence.interval_ms {
                return Err(format!(
                    "{name} cadence floor ({} ms) exceeds its interval ({} ms)",
                    cadence.floor_ms, cadence.interval_ms
                ));
            }
        }
        if self.bonus_target == 0 {
            return Err("bonus_target must be at least 1".to_string());
        }
        if self.delays.outcome_display_ms <= self.delays.final_target_removal_ms {
            return Err(format!(
                "outcome_display_ms ({}) must exceed final_target_removal_ms ({})",
                self.delays.outcome_display_ms, self.delays.final_target_removal_ms
            ));
        }
        Ok(())
    }
}

impl Default for TuningProfile {
    fn default() -> Self {
        Self::tracking()
    }
}

/// Named presets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Preset {
    #[default]
    Tracking,
    Gravity,
}

impl Preset {
    pub fn as_str(&self) -> &'static str {
        match self {
            Preset::Tracking => "tracking",
            Preset::Gravity => "gravity",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "tracking" | "pointer" | "rocket" => Some(Preset::Tracking),
            "gravity" | "flap" | "wave" => Some(Preset::Gravity),
            _ => None,
        }
    }

    pub fn profile(&self) -> TuningProfile {
        match self {
            Preset::Tracking => TuningProfile::tracking(),
            Preset::Gravity => TuningProfile::gravity(),
        }
    }
}
