//! Daily calorie estimation (revised Harris-Benedict).

use thiserror::Error;

use crate::models::{ActivityLevel, Goal, Sex, User};

/// Age used for the estimate unless reported ages are enabled.
pub const ASSUMED_AGE: u32 = 30;

/// Target used when no estimate has been stored for a user.
pub const DEFAULT_DAILY_CALORIES: i64 = 2000;

/// Deficit or surplus applied for weight goals.
pub const GOAL_ADJUSTMENT: i64 = 500;

/// Errors from the estimator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CalorieError {
    #[error("invalid activity level: '{0}'")]
    InvalidActivityLevel(String),

    #[error("profile is missing {0}")]
    MissingField(&'static str),
}

/// Maintenance, loss and gain targets in kcal/day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalorieEstimate {
    pub maintenance: i64,
    pub weight_loss: i64,
    pub weight_gain: i64,
}

impl CalorieEstimate {
    /// Pick the single target that applies to a goal list.
    ///
    /// Losing weight wins over gaining; anything else is maintenance.
    pub fn target_for(&self, goals: &[Goal]) -> i64 {
        if goals.contains(&Goal::LoseWeight) {
            self.weight_loss
        } else if goals.contains(&Goal::GainWeight) {
            self.weight_gain
        } else {
            self.maintenance
        }
    }
}

/// Basal metabolic rate.
pub fn basal_metabolic_rate(weight_kg: f64, height_cm: f64, sex: Sex, age: u32) -> f64 {
    let age = age as f64;
    match sex {
        Sex::Male => 88.36 + 13.4 * weight_kg + 4.8 * height_cm - 5.7 * age,
        Sex::Female | Sex::Other => 447.6 + 9.2 * weight_kg + 3.1 * height_cm - 4.3 * age,
    }
}

/// Estimate daily calories from raw profile attributes.
pub fn estimate(
    weight_kg: f64,
    height_cm: f64,
    sex: Sex,
    activity_level: &str,
    age: u32,
) -> Result<CalorieEstimate, CalorieError> {
    let level: ActivityLevel = activity_level
        .parse()
        .map_err(|_| CalorieError::InvalidActivityLevel(activity_level.to_string()))?;

    let maintenance =
        (basal_metabolic_rate(weight_kg, height_cm, sex, age) * level.multiplier()).round() as i64;

    Ok(CalorieEstimate {
        maintenance,
        weight_loss: maintenance - GOAL_ADJUSTMENT,
        weight_gain: maintenance + GOAL_ADJUSTMENT,
    })
}

/// Estimate for a stored user.
///
/// Uses [`ASSUMED_AGE`] unless `use_reported_age` is set.
pub fn estimate_for_user(user: &User, use_reported_age: bool) -> Result<CalorieEstimate, CalorieError> {
    let weight = user.weight.ok_or(CalorieError::MissingField("weight"))?;
    let height = user.height.ok_or(CalorieError::MissingField("height"))?;
    let sex = user.sex.ok_or(CalorieError::MissingField("sex"))?;
    let level = user
        .physical_activity_level
        .ok_or(CalorieError::MissingField("physicalActivityLevel"))?;

    let age = if use_reported_age {
        user.age.ok_or(CalorieError::MissingField("age"))?
    } else {
        ASSUMED_AGE
    };

    estimate(weight, height, sex, level.as_str(), age)
}
