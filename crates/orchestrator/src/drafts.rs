//! Lenient decoding of model output into store inputs.
//!
//! Models fill optional fields with placeholders ("", 0, "N/A") and send
//! numbers as strings. The drafts here absorb that so the store only sees
//! values the user actually supplied.

use nutrition_store::{
    aggregate_micros, ActivityLevel, Food, FoodLogStatus, Goal, Macros, Micro, NewFoodLog,
    ProfileUpdate, Sex, MAX_AGE,
};
use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::warn;

use crate::error::OrchestratorError;

/// Strings that mean "I have none" for list fields.
const NONE_WORDS: [&str; 8] = [
    "ninguna", "ninguno", "ningunas", "ningunos", "no", "none", "nada", "n/a",
];

/// Profile fields extracted by the model, already normalized.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProfileDraft {
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

impl ProfileDraft {
    /// Decode tool arguments. Accepts the fields at the top level or nested
    /// under `user`.
    pub fn from_arguments(arguments: &Value) -> Result<Self, OrchestratorError> {
        let object = match arguments {
            Value::Object(map) => match map.get("user") {
                Some(Value::Object(inner)) => inner,
                _ => map,
            },
            Value::Null => return Ok(Self::default()),
            other => {
                return Err(OrchestratorError::InvalidToolCall(format!(
                    "save_profile_data expects an object, got {}",
                    other
                )))
            }
        };

        Ok(Self {
            age: field(object, &["age"]).and_then(age),
            name: field(object, &["name"]).and_then(text),
            goal: field(object, &["goal", "goals"]).and_then(goals),
            sex: field(object, &["sex"]).and_then(|v| parse_enum::<Sex>(v, "sex")),
            height: field(object, &["height"]).and_then(height),
            weight: field(object, &["weight"]).and_then(number),
            physical_activity_level: field(
                object,
                &["physicalActivityLevel", "physical_activity_level", "activityLevel"],
            )
            .and_then(|v| parse_enum::<ActivityLevel>(v, "physicalActivityLevel")),
            dietary_restrictions: field(
                object,
                &["dietaryRestrictions", "dietary_restrictions"],
            )
            .and_then(list),
            diseases: field(object, &["diseases"]).and_then(list),
        })
    }

    /// Whether nothing was supplied.
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    pub fn into_update(self) -> ProfileUpdate {
        ProfileUpdate {
            age: self.age,
            name: self.name,
            goal: self.goal,
            sex: self.sex,
            height: self.height,
            weight: self.weight,
            physical_activity_level: self.physical_activity_level,
            dietary_restrictions: self.dietary_restrictions,
            diseases: self.diseases,
        }
    }
}

fn field<'a>(object: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a Value> {
    keys.iter()
        .filter_map(|key| object.get(*key))
        .find(|value| !value.is_null())
}

fn text(value: &Value) -> Option<String> {
    value
        .as_str()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// A number or numeric string. Zero counts as not supplied; negatives are
/// kept so validation can reject them.
fn number(value: &Value) -> Option<f64> {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => leading_number(s),
        _ => None,
    }?;
    (parsed != 0.0 && parsed.is_finite()).then_some(parsed)
}

/// Parse the numeric prefix of strings like "70 kg" or "1,75".
fn leading_number(raw: &str) -> Option<f64> {
    let raw = raw.trim().replace(',', ".");
    let end = raw
        .char_indices()
        .find(|(i, c)| !(c.is_ascii_digit() || *c == '.' || (*i == 0 && *c == '-')))
        .map(|(i, _)| i)
        .unwrap_or(raw.len());
    raw[..end].parse().ok()
}

fn age(value: &Value) -> Option<u32> {
    let years = number(value)?;
    if !(0.0..=f64::from(MAX_AGE)).contains(&years) {
        warn!("Dropping out-of-range age {}", years);
        return None;
    }
    Some(years.round() as u32).filter(|age| *age > 0)
}

/// Height in cm. Values under three are metres ("1,75").
fn height(value: &Value) -> Option<f64> {
    let height = number(value)?;
    if height > 0.0 && height < 3.0 {
        return Some((height * 1000.0).round() / 10.0);
    }
    Some(height)
}

fn parse_enum<T: std::str::FromStr>(value: &Value, field: &str) -> Option<T> {
    let raw = text(value)?;
    match raw.parse::<T>() {
        Ok(parsed) => Some(parsed),
        Err(_) => {
            warn!("Dropping unrecognized {} value '{}'", field, raw);
            None
        }
    }
}

fn goals(value: &Value) -> Option<Vec<Goal>> {
    let parsed: Vec<Goal> = match value {
        Value::Array(items) => items
            .iter()
            .filter_map(|item| parse_enum::<Goal>(item, "goal"))
            .collect(),
        Value::String(_) => parse_enum::<Goal>(value, "goal").into_iter().collect(),
        _ => Vec::new(),
    };
    (!parsed.is_empty()).then_some(parsed)
}

fn list(value: &Value) -> Option<Vec<String>> {
    match value {
        Value::Array(items) => Some(
            items
                .iter()
                .filter_map(text)
                .filter(|item| !is_none_word(item))
                .collect(),
        ),
        Value::String(s) => {
            let s = s.trim();
            if s.is_empty() {
                None
            } else if is_none_word(s) {
                Some(Vec::new())
            } else {
                Some(
                    s.split(',')
                        .map(str::trim)
                        .filter(|item| !item.is_empty())
                        .map(str::to_string)
                        .collect(),
                )
            }
        }
        _ => None,
    }
}

fn is_none_word(s: &str) -> bool {
    let lowered = s.trim().to_lowercase();
    NONE_WORDS.contains(&lowered.as_str())
}

/// Structured output of the food extraction call.
///
/// A missing or null `food` means the model found nothing to log.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FoodLogDraft {
    #[serde(default)]
    pub food: Option<ExtractedFood>,
}

/// A food-log entry as the model described it.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractedFood {
    pub description: String,
    pub total_macros: Macros,
    #[serde(default)]
    pub total_micros: Vec<Micro>,
    #[serde(default)]
    pub foods: Vec<Food>,
}

impl FoodLogDraft {
    /// Turn the draft into a validated pending entry.
    ///
    /// No food (or a blank description) is [`OrchestratorError::ExtractionAmbiguous`];
    /// negative amounts fail store validation.
    pub fn into_new_log(self) -> Result<NewFoodLog, OrchestratorError> {
        let food = self
            .food
            .filter(|food| !food.description.trim().is_empty())
            .ok_or(OrchestratorError::ExtractionAmbiguous)?;

        let log = NewFoodLog {
            description: food.description.trim().to_string(),
            total_macros: food.total_macros,
            total_micros: aggregate_micros(food.total_micros.iter()),
            foods: food.foods,
            status: FoodLogStatus::Pending,
        };
        log.validate()
            .map_err(|e| OrchestratorError::Store(e.into()))?;
        Ok(log)
    }
}

/// Free-text answer wrapped in `{"description": ...}`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Narrative {
    #[serde(default)]
    pub description: String,
}

impl Narrative {
    /// The description trimmed, or `None` when blank.
    pub fn text(&self) -> Option<&str> {
        Some(self.description.trim()).filter(|text| !text.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_placeholders_are_not_supplied() {
        let draft = ProfileDraft::from_arguments(&json!({
            "age": 0,
            "name": "  ",
            "goal": [],
            "sex": "",
            "height": "0",
            "weight": null,
            "physicalActivityLevel": "",
            "dietaryRestrictions": null,
            "diseases": ""
        }))
        .unwrap();
        assert!(draft.is_empty());
    }

    #[test]
    fn test_numbers_as_strings() {
        let draft = ProfileDraft::from_arguments(&json!({
            "age": "34",
            "height": "1,75",
            "weight": "70 kg"
        }))
        .unwrap();
        assert_eq!(draft.age, Some(34));
        assert_eq!(draft.height, Some(175.0));
        assert_eq!(draft.weight, Some(70.0));
    }

    #[test]
    fn test_height_in_centimetres_kept() {
        let draft = ProfileDraft::from_arguments(&json!({"height": 168})).unwrap();
        assert_eq!(draft.height, Some(168.0));

        let draft = ProfileDraft::from_arguments(&json!({"height": 1.6})).unwrap();
        assert_eq!(draft.height, Some(160.0));
    }

    #[test]
    fn test_implausible_age_dropped() {
        let draft = ProfileDraft::from_arguments(&json!({"age": 4_294_967_296u64, "name": "Ana"}))
            .unwrap();
        assert_eq!(draft.age, None);
        assert_eq!(draft.name.as_deref(), Some("Ana"));

        let draft = ProfileDraft::from_arguments(&json!({"age": "151 años"})).unwrap();
        assert_eq!(draft.age, None);
    }

    #[test]
    fn test_none_words_mean_empty_lists() {
        let draft = ProfileDraft::from_arguments(&json!({
            "dietaryRestrictions": "Ninguna",
            "diseases": ["diabetes", " ", "no"]
        }))
        .unwrap();
        assert_eq!(draft.dietary_restrictions, Some(vec![]));
        assert_eq!(draft.diseases, Some(vec!["diabetes".to_string()]));
    }

    #[test]
    fn test_unknown_enums_dropped_rest_kept() {
        let draft = ProfileDraft::from_arguments(&json!({
            "user": {
                "name": "Ana",
                "sex": "robot",
                "goal": ["loseWeight", "getRich"],
                "physical_activity_level": "very active"
            }
        }))
        .unwrap();
        assert_eq!(draft.name.as_deref(), Some("Ana"));
        assert_eq!(draft.sex, None);
        assert_eq!(draft.goal, Some(vec![Goal::LoseWeight]));
        assert_eq!(
            draft.physical_activity_level,
            Some(ActivityLevel::VeryActive)
        );
    }

    #[test]
    fn test_negative_weight_kept_for_validation() {
        let draft = ProfileDraft::from_arguments(&json!({"weight": -3, "age": -5})).unwrap();
        assert_eq!(draft.weight, Some(-3.0));
        assert_eq!(draft.age, None);
        assert!(draft.into_update().validate().is_err());
    }

    #[test]
    fn test_non_object_arguments_rejected() {
        assert!(ProfileDraft::from_arguments(&json!("not json")).is_err());
        assert!(ProfileDraft::from_arguments(&json!(null)).unwrap().is_empty());
    }

    #[test]
    fn test_blank_narrative() {
        let narrative: Narrative = serde_json::from_value(json!({"description": "  "})).unwrap();
        assert_eq!(narrative.text(), None);
        let narrative: Narrative = serde_json::from_value(json!({})).unwrap();
        assert_eq!(narrative.text(), None);
    }

    #[test]
    fn test_food_draft_null_is_ambiguous() {
        let draft: FoodLogDraft = serde_json::from_value(json!({"food": null})).unwrap();
        assert!(matches!(
            draft.into_new_log(),
            Err(OrchestratorError::ExtractionAmbiguous)
        ));
    }

    #[test]
    fn test_food_draft_aggregates_micros() {
        let draft: FoodLogDraft = serde_json::from_value(json!({
            "food": {
                "description": " Ensalada de tomate ",
                "totalMacros": {"protein": 1.0, "carbs": 8.0, "fats": 0.5},
                "totalMicros": [
                    {"name": "Calcio", "amount": 100.0},
                    {"name": "Calcio", "amount": 50.0},
                    {"name": "Vitamina C", "amount": 20.0}
                ],
                "foods": [{
                    "description": "tomate",
                    "macros": {"protein": 1.0, "carbs": 8.0, "fats": 0.5},
                    "micros": []
                }]
            }
        }))
        .unwrap();

        let log = draft.into_new_log().unwrap();
        assert_eq!(log.description, "Ensalada de tomate");
        assert_eq!(log.status, FoodLogStatus::Pending);
        assert_eq!(
            log.total_micros,
            vec![Micro::new("Calcio", 150.0), Micro::new("Vitamina C", 20.0)]
        );
    }

    #[test]
    fn test_food_draft_negative_is_validation_error() {
        let draft: FoodLogDraft = serde_json::from_value(json!({
            "food": {
                "description": "Pan",
                "totalMacros": {"protein": -1.0, "carbs": 20.0, "fats": 1.0}
            }
        }))
        .unwrap();

        match draft.into_new_log() {
            Err(OrchestratorError::Store(nutrition_store::StoreError::Validation(e))) => {
                assert!(e.has_path("totalMacros.protein"));
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }
}
