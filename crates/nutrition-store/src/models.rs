//! Store models.

use std::fmt;
use std::ops::{Add, AddAssign};
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::nutrients::aggregate_micros;
use crate::validation::{ValidationError, Validator};

/// A string did not name a known enum variant.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {kind}: '{value}'")]
pub struct ParseEnumError {
    pub kind: &'static str,
    pub value: String,
}

fn normalize_variant(s: &str) -> String {
    s.trim()
        .chars()
        .filter(|c| *c != '_' && *c != '-' && *c != ' ')
        .flat_map(char::to_lowercase)
        .collect()
}

/// Nutrition goal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Goal {
    LoseWeight,
    GainWeight,
    MaintainWeight,
    EatWholeFoods,
    EatBalanced,
}

impl Goal {
    pub fn as_str(&self) -> &'static str {
        match self {
            Goal::LoseWeight => "loseWeight",
            Goal::GainWeight => "gainWeight",
            Goal::MaintainWeight => "maintainWeight",
            Goal::EatWholeFoods => "eatWholeFoods",
            Goal::EatBalanced => "eatBalanced",
        }
    }
}

impl FromStr for Goal {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize_variant(s).as_str() {
            "loseweight" => Ok(Goal::LoseWeight),
            "gainweight" => Ok(Goal::GainWeight),
            "maintainweight" => Ok(Goal::MaintainWeight),
            "eatwholefoods" => Ok(Goal::EatWholeFoods),
            "eatbalanced" => Ok(Goal::EatBalanced),
            _ => Err(ParseEnumError {
                kind: "goal",
                value: s.to_string(),
            }),
        }
    }
}

/// Sex used by the calorie formulas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Sex {
    Male,
    Female,
    Other,
}

impl Sex {
    pub fn as_str(&self) -> &'static str {
        match self {
            Sex::Male => "male",
            Sex::Female => "female",
            Sex::Other => "other",
        }
    }
}

impl FromStr for Sex {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize_variant(s).as_str() {
            "male" | "masculino" | "hombre" => Ok(Sex::Male),
            "female" | "femenino" | "mujer" => Ok(Sex::Female),
            "other" | "otro" => Ok(Sex::Other),
            _ => Err(ParseEnumError {
                kind: "sex",
                value: s.to_string(),
            }),
        }
    }
}

/// Physical activity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ActivityLevel {
    Sedentary,
    Light,
    Moderate,
    Active,
    VeryActive,
}

impl ActivityLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityLevel::Sedentary => "sedentary",
            ActivityLevel::Light => "light",
            ActivityLevel::Moderate => "moderate",
            ActivityLevel::Active => "active",
            ActivityLevel::VeryActive => "veryActive",
        }
    }

    /// Multiplier applied to basal metabolic rate.
    pub fn multiplier(&self) -> f64 {
        match self {
            ActivityLevel::Sedentary => 1.2,
            ActivityLevel::Light => 1.375,
            ActivityLevel::Moderate => 1.55,
            ActivityLevel::Active => 1.725,
            ActivityLevel::VeryActive => 1.9,
        }
    }
}

impl FromStr for ActivityLevel {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize_variant(s).as_str() {
            "sedentary" => Ok(ActivityLevel::Sedentary),
            "light" => Ok(ActivityLevel::Light),
            "moderate" => Ok(ActivityLevel::Moderate),
            "active" => Ok(ActivityLevel::Active),
            "veryactive" => Ok(ActivityLevel::VeryActive),
            _ => Err(ParseEnumError {
                kind: "activity level",
                value: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for ActivityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A user, keyed by phone number.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub phone_number: String,
    pub age: Option<u32>,
    pub name: Option<String>,
    pub goal: Option<Vec<Goal>>,
    pub sex: Option<Sex>,
    pub height: Option<f64>,
    pub weight: Option<f64>,
    pub physical_activity_level: Option<ActivityLevel>,
    pub dietary_restrictions: Option<Vec<String>>,
    pub diseases: Option<Vec<String>>,
    #[serde(default)]
    pub conversation: Vec<Message>,
    #[serde(default)]
    pub food_logs: Vec<FoodLog>,
}

impl User {
    /// A user with no profile data.
    pub fn new(phone_number: impl Into<String>) -> Self {
        Self {
            phone_number: phone_number.into(),
            age: None,
            name: None,
            goal: None,
            sex: None,
            height: None,
            weight: None,
            physical_activity_level: None,
            dietary_restrictions: None,
            diseases: None,
            conversation: Vec::new(),
            food_logs: Vec::new(),
        }
    }

    /// Goals as a slice (empty when unset).
    pub fn goals(&self) -> &[Goal] {
        self.goal.as_deref().unwrap_or(&[])
    }

    /// Shallow field-level merge. Arrays are replaced wholesale.
    pub(crate) fn apply(&mut self, update: &ProfileUpdate) {
        if let Some(age) = update.age {
            self.age = Some(age);
        }
        if let Some(ref name) = update.name {
            self.name = Some(name.trim().to_string());
        }
        if let Some(ref goal) = update.goal {
            self.goal = Some(dedup_goals(goal));
        }
        if let Some(sex) = update.sex {
            self.sex = Some(sex);
        }
        if let Some(height) = update.height {
            self.height = Some(height);
        }
        if let Some(weight) = update.weight {
            self.weight = Some(weight);
        }
        if let Some(level) = update.physical_activity_level {
            self.physical_activity_level = Some(level);
        }
        if let Some(ref restrictions) = update.dietary_restrictions {
            self.dietary_restrictions = Some(trimmed(restrictions));
        }
        if let Some(ref diseases) = update.diseases {
            self.diseases = Some(trimmed(diseases));
        }
    }
}

fn dedup_goals(goals: &[Goal]) -> Vec<Goal> {
    let mut out: Vec<Goal> = Vec::with_capacity(goals.len());
    for goal in goals {
        if !out.contains(goal) {
            out.push(*goal);
        }
    }
    out
}

fn trimmed(values: &[String]) -> Vec<String> {
    values.iter().map(|v| v.trim().to_string()).collect()
}

/// Oldest age accepted in a profile.
pub const MAX_AGE: u32 = 150;

/// Partial profile, used both for creation and for updates.
///
/// `None` means "not supplied". For list fields `Some(vec![])` is a real value
/// (the user has none).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    pub age: Option<u32>,
    pub name: Option<String>,
    pub goal: Option<Vec<Goal>>,
    pub sex: Option<Sex>,
    pub height: Option<f64>,
    pub weight: Option<f64>,
    pub physical_activity_level: Option<ActivityLevel>,
    pub dietary_restrictions: Option<Vec<String>>,
    pub diseases: Option<Vec<String>>,
}

impl ProfileUpdate {
    /// Whether no field is supplied.
    pub fn is_empty(&self) -> bool {
        self == &ProfileUpdate::default()
    }

    /// Validate only the supplied fields.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut v = Validator::new();
        self.check(&mut v);
        v.finish()
    }

    pub(crate) fn check(&self, v: &mut Validator) {
        if let Some(age) = self.age {
            if age == 0 || age > MAX_AGE {
                v.push("age", format!("must be between 1 and {}", MAX_AGE));
            }
        }
        if let Some(ref name) = self.name {
            v.non_blank("name", name);
        }
        if let Some(ref goal) = self.goal {
            if goal.is_empty() {
                v.push("goal", "must contain at least one goal");
            }
        }
        if let Some(height) = self.height {
            v.positive("height", height);
        }
        if let Some(weight) = self.weight {
            v.positive("weight", weight);
        }
        if let Some(ref restrictions) = self.dietary_restrictions {
            v.strings("dietaryRestrictions", restrictions);
        }
        if let Some(ref diseases) = self.diseases {
            v.strings("diseases", diseases);
        }
    }
}

/// Input for `create_user`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewUser {
    pub phone_number: String,
    #[serde(flatten)]
    pub profile: ProfileUpdate,
}

impl NewUser {
    pub fn new(phone_number: impl Into<String>) -> Self {
        Self {
            phone_number: phone_number.into(),
            profile: ProfileUpdate::default(),
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut v = Validator::new();
        v.phone_number("phoneNumber", &self.phone_number);
        self.profile.check(&mut v);
        v.finish()
    }
}

/// Who wrote a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Assistant,
}

/// Reference to a media attachment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaRef {
    pub url: String,
    #[serde(rename = "type")]
    pub media_type: String,
    pub mime_type: String,
}

impl MediaRef {
    pub fn is_image(&self) -> bool {
        self.media_type == "image" || self.mime_type.starts_with("image/")
    }
}

/// Message body: text and/or media.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageContent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub media: Option<MediaRef>,
}

impl MessageContent {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            media: None,
        }
    }

    pub fn with_media(mut self, media: MediaRef) -> Self {
        self.media = Some(media);
        self
    }

    /// Whether the content carries neither text nor media.
    pub fn is_empty(&self) -> bool {
        let no_text = self
            .text
            .as_deref()
            .map(|t| t.trim().is_empty())
            .unwrap_or(true);
        no_text && self.media.is_none()
    }

    /// Text followed by the media URL on its own line, for prompt context.
    pub fn as_prompt_text(&self) -> String {
        let mut out = self.text.clone().unwrap_or_default();
        if let Some(ref media) = self.media {
            if !out.is_empty() {
                out.push('\n');
            }
            out.push_str(&media.url);
        }
        out
    }
}

/// Input for `add_message`; the store stamps the timestamp.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMessage {
    pub content: MessageContent,
    pub sender: Sender,
}

impl NewMessage {
    pub fn from_user(content: MessageContent) -> Self {
        Self {
            content,
            sender: Sender::User,
        }
    }

    pub fn from_assistant(text: impl Into<String>) -> Self {
        Self {
            content: MessageContent::text(text),
            sender: Sender::Assistant,
        }
    }
}

/// A stored conversation message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub content: MessageContent,
    pub timestamp: DateTime<Utc>,
    pub sender: Sender,
}

impl Message {
    pub fn is_from_user(&self) -> bool {
        self.sender == Sender::User
    }
}

/// Macronutrients in grams.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Macros {
    pub protein: f64,
    pub carbs: f64,
    pub fats: f64,
}

impl Macros {
    pub fn new(protein: f64, carbs: f64, fats: f64) -> Self {
        Self {
            protein,
            carbs,
            fats,
        }
    }

    /// Estimated kilocalories (4/4/9).
    pub fn calories(&self) -> f64 {
        self.protein * 4.0 + self.carbs * 4.0 + self.fats * 9.0
    }

    /// Each component divided by `n`; zero when `n` is zero.
    pub fn divided_by(&self, n: usize) -> Macros {
        if n == 0 {
            return Macros::default();
        }
        let n = n as f64;
        Macros::new(self.protein / n, self.carbs / n, self.fats / n)
    }

    fn check(&self, path: &str, v: &mut Validator) {
        v.non_negative(&format!("{}.protein", path), self.protein);
        v.non_negative(&format!("{}.carbs", path), self.carbs);
        v.non_negative(&format!("{}.fats", path), self.fats);
    }
}

impl Add for Macros {
    type Output = Macros;

    fn add(self, other: Macros) -> Macros {
        Macros::new(
            self.protein + other.protein,
            self.carbs + other.carbs,
            self.fats + other.fats,
        )
    }
}

impl AddAssign for Macros {
    fn add_assign(&mut self, other: Macros) {
        *self = *self + other;
    }
}

/// A micronutrient amount.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Micro {
    pub name: String,
    pub amount: f64,
}

impl Micro {
    pub fn new(name: impl Into<String>, amount: f64) -> Self {
        Self {
            name: name.into(),
            amount,
        }
    }
}

fn check_micros(path: &str, micros: &[Micro], v: &mut Validator) {
    for (i, micro) in micros.iter().enumerate() {
        v.non_blank(&format!("{}.{}.name", path, i), &micro.name);
        v.non_negative(&format!("{}.{}.amount", path, i), micro.amount);
    }
}

/// One food inside a log entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Food {
    pub description: String,
    pub macros: Macros,
    #[serde(default)]
    pub micros: Vec<Micro>,
}

impl Food {
    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut v = Validator::new();
        self.check("", &mut v);
        v.finish()
    }

    fn check(&self, prefix: &str, v: &mut Validator) {
        v.non_blank(&format!("{}description", prefix), &self.description);
        self.macros.check(&format!("{}macros", prefix), v);
        check_micros(&format!("{}micros", prefix), &self.micros, v);
    }
}

/// Lifecycle of a food-log entry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FoodLogStatus {
    #[default]
    Pending,
    Validated,
}

/// A food-log entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FoodLog {
    pub id: String,
    pub description: String,
    pub total_macros: Macros,
    pub total_micros: Vec<Micro>,
    pub foods: Vec<Food>,
    pub date: DateTime<Utc>,
    pub status: FoodLogStatus,
}

impl FoodLog {
    pub fn is_pending(&self) -> bool {
        self.status == FoodLogStatus::Pending
    }

    /// Recompute totals from `foods`.
    pub(crate) fn recompute_totals(&mut self) {
        self.total_macros = self
            .foods
            .iter()
            .fold(Macros::default(), |acc, food| acc + food.macros);
        self.total_micros = aggregate_micros(self.foods.iter().flat_map(|f| f.micros.iter()));
    }
}

/// Input for `add_food_log`; the store assigns id and date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewFoodLog {
    pub description: String,
    pub total_macros: Macros,
    #[serde(default)]
    pub total_micros: Vec<Micro>,
    #[serde(default)]
    pub foods: Vec<Food>,
    #[serde(default)]
    pub status: FoodLogStatus,
}

impl NewFoodLog {
    /// A pending entry with no foods.
    pub fn pending(description: impl Into<String>, total_macros: Macros) -> Self {
        Self {
            description: description.into(),
            total_macros,
            total_micros: Vec::new(),
            foods: Vec::new(),
            status: FoodLogStatus::Pending,
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut v = Validator::new();
        v.non_blank("description", &self.description);
        self.total_macros.check("totalMacros", &mut v);
        check_micros("totalMicros", &self.total_micros, &mut v);
        for (i, food) in self.foods.iter().enumerate() {
            food.check(&format!("foods.{}.", i), &mut v);
        }
        v.finish()
    }
}

/// Partial update for `update_food_log`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FoodLogUpdate {
    pub description: Option<String>,
    pub total_macros: Option<Macros>,
    pub total_micros: Option<Vec<Micro>>,
    pub foods: Option<Vec<Food>>,
    pub status: Option<FoodLogStatus>,
}

impl FoodLogUpdate {
    /// Update that only marks the entry as validated.
    pub fn validate_entry() -> Self {
        Self {
            status: Some(FoodLogStatus::Validated),
            ..Default::default()
        }
    }

    pub(crate) fn check(&self, current: &FoodLog) -> Result<(), ValidationError> {
        let mut v = Validator::new();
        if let Some(ref description) = self.description {
            v.non_blank("description", description);
        }
        if let Some(ref macros) = self.total_macros {
            macros.check("totalMacros", &mut v);
        }
        if let Some(ref micros) = self.total_micros {
            check_micros("totalMicros", micros, &mut v);
        }
        if let Some(ref foods) = self.foods {
            for (i, food) in foods.iter().enumerate() {
                food.check(&format!("foods.{}.", i), &mut v);
            }
        }
        if current.status == FoodLogStatus::Validated && self.status == Some(FoodLogStatus::Pending)
        {
            v.push("status", "a validated entry cannot return to pending");
        }
        v.finish()
    }

    pub(crate) fn apply(self, log: &mut FoodLog) {
        if let Some(description) = self.description {
            log.description = description;
        }
        if let Some(macros) = self.total_macros {
            log.total_macros = macros;
        }
        if let Some(micros) = self.total_micros {
            log.total_micros = aggregate_micros(micros.iter());
        }
        if let Some(foods) = self.foods {
            log.foods = foods;
        }
        if let Some(status) = self.status {
            log.status = status;
        }
    }
}

/// Derived daily calorie target for a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyCalorieTarget {
    pub phone_number: String,
    pub daily_calories: i64,
}
