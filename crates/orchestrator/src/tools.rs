//! Tool and response schemas offered to the model.

use brain_core::{ResponseFormat, ToolDefinition};
use serde_json::{json, Value};

use crate::actions::ActionKind;

fn definition(kind: ActionKind, description: &str, parameters: Value) -> ToolDefinition {
    ToolDefinition::function(kind.tool_name(), description, parameters)
}

fn no_arguments() -> Value {
    json!({"type": "object", "properties": {}, "additionalProperties": false})
}

/// Tools available while the profile is incomplete.
pub fn onboarding_tools() -> Vec<ToolDefinition> {
    vec![
        definition(
            ActionKind::RequestMissingInformation,
            "Pide al usuario los datos de perfil que todavía faltan.",
            no_arguments(),
        ),
        definition(
            ActionKind::SaveProfileData,
            "Guarda los datos de perfil que el usuario acaba de dar. Deja en null lo que no mencionó.",
            profile_schema(),
        ),
    ]
}

fn profile_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "age": {"type": ["integer", "null"], "description": "Edad en años"},
            "name": {"type": ["string", "null"]},
            "goal": {
                "type": ["array", "null"],
                "items": {
                    "type": "string",
                    "enum": ["loseWeight", "gainWeight", "maintainWeight", "eatWholeFoods", "eatBalanced"]
                }
            },
            "sex": {"type": ["string", "null"], "enum": ["male", "female", "other", null]},
            "height": {"type": ["number", "null"], "description": "Altura en centímetros"},
            "weight": {"type": ["number", "null"], "description": "Peso en kilogramos"},
            "physicalActivityLevel": {
                "type": ["string", "null"],
                "enum": ["sedentary", "light", "moderate", "active", "veryActive", null]
            },
            "dietaryRestrictions": {
                "type": ["array", "null"],
                "items": {"type": "string"},
                "description": "Lista vacía si el usuario dice que no tiene"
            },
            "diseases": {
                "type": ["array", "null"],
                "items": {"type": "string"},
                "description": "Lista vacía si el usuario dice que no tiene"
            }
        },
        "required": [
            "age", "name", "goal", "sex", "height", "weight",
            "physicalActivityLevel", "dietaryRestrictions", "diseases"
        ],
        "additionalProperties": false
    })
}

/// Tools available once the profile is complete.
pub fn food_logging_tools() -> Vec<ToolDefinition> {
    vec![
        definition(
            ActionKind::NewPendingFoodLogEntry,
            "Registra un alimento nuevo que el usuario comió (texto, audio o foto).",
            no_arguments(),
        ),
        definition(
            ActionKind::PendingFoodLogEntryCorrection,
            "El usuario corrige el último alimento registrado que todavía no confirmó.",
            no_arguments(),
        ),
        definition(
            ActionKind::FoodLogEntryConfirmation,
            "El usuario confirma que el último alimento registrado está bien.",
            no_arguments(),
        ),
        definition(
            ActionKind::GenerateReport,
            "Genera un reporte de lo que comió el usuario entre dos fechas.",
            json!({
                "type": "object",
                "properties": {
                    "startDate": {"type": "string", "description": "Fecha de inicio, YYYY-MM-DD"},
                    "endDate": {"type": "string", "description": "Fecha de fin, YYYY-MM-DD"}
                },
                "required": ["startDate", "endDate"],
                "additionalProperties": false
            }),
        ),
    ]
}

fn macros_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "protein": {"type": "number"},
            "carbs": {"type": "number"},
            "fats": {"type": "number"}
        },
        "required": ["protein", "carbs", "fats"],
        "additionalProperties": false
    })
}

fn micros_schema() -> Value {
    json!({
        "type": "array",
        "items": {
            "type": "object",
            "properties": {
                "name": {"type": "string"},
                "amount": {"type": "number"}
            },
            "required": ["name", "amount"],
            "additionalProperties": false
        }
    })
}

/// Output schema for food extraction. `food` is null when nothing was found.
pub fn food_log_format() -> ResponseFormat {
    let food = json!({
        "type": "object",
        "properties": {
            "description": {"type": "string"},
            "totalMacros": macros_schema(),
            "totalMicros": micros_schema(),
            "foods": {
                "type": "array",
                "items": {
                    "type": "object",
                    "properties": {
                        "description": {"type": "string"},
                        "macros": macros_schema(),
                        "micros": micros_schema()
                    },
                    "required": ["description", "macros", "micros"],
                    "additionalProperties": false
                }
            }
        },
        "required": ["description", "totalMacros", "totalMicros", "foods"],
        "additionalProperties": false
    });

    ResponseFormat::json_schema(
        "food_log",
        json!({
            "type": "object",
            "properties": {"food": {"anyOf": [food, {"type": "null"}]}},
            "required": ["food"],
            "additionalProperties": false
        }),
    )
}

/// Output schema for free-text answers (insights and reports).
pub fn description_format() -> ResponseFormat {
    ResponseFormat::json_schema(
        "description",
        json!({
            "type": "object",
            "properties": {"description": {"type": "string"}},
            "required": ["description"],
            "additionalProperties": false
        }),
    )
}
