//! User-facing copy (Spanish).

use nutrition_store::{FoodLog, ProfileField};

/// Sent on first contact, before anything else.
pub fn intro_message() -> String {
    let fields: Vec<String> = ProfileField::ALL
        .iter()
        .map(|field| format!("* {}", field.display_name()))
        .collect();
    format!(
        "¡Hola! 👋 Soy tu asistente de nutrición. Te voy a ayudar a registrar lo que comés \
         y a darte consejos para alcanzar tus objetivos.\n\n\
         Para empezar necesito conocerte un poco. Contame:\n{}\n\n\
         Podés mandarme todo junto o de a poco 🙂",
        fields.join("\n")
    )
}

/// Asks for the fields still missing from the profile.
pub fn missing_fields_message(missing: &[ProfileField]) -> String {
    let names: Vec<&str> = missing.iter().map(|field| field.display_name()).collect();
    format!(
        "¡Hola! Para poder ayudarte mejor, necesito algunos datos más: {}. ¿Me los podrías proporcionar? 😊",
        names.join(", ")
    )
}

/// Sent when onboarding is already complete.
pub const INSTRUCTIONS: &str =
    "¡Gracias! Me podés ir pasando fotos, audio o texto con la comida que vayas comiendo :)";

/// Sent once the profile becomes complete.
pub const WELCOME: &str = "¡Gracias por completar tu perfil 🙂!

Te comentamos *cómo registrar tus alimentos* de la forma más sencilla!

Primero, envíame el alimento que desees registrar, puedes hacerlo mediante texto, audio o imagen!

Luego validaré el alimento y te daré un feedback sobre su calidad, además de darte resumen o reporte si me los pides!

¡A comer rico! Pero sanito 🥑";

/// Saving extracted profile data failed validation.
pub const PROFILE_SAVE_FAILED: &str =
    "No pude guardar algunos datos porque no parecen correctos. ¿Me los podrías confirmar? 🙏";

pub const PROCESSING_FOOD: &str = "🧐 Estoy procesando tu mensaje para analizar los alimentos y su información nutricional. Dame un momento y te compartiré los resultados. ⏳🥩";

pub const PROCESSING_IMAGE: &str = "📸 Estoy analizando la foto para identificar los alimentos y su información nutricional. Dame un momento y te compartiré los resultados. ⏳🥗";

pub const NO_FOOD_FOUND: &str =
    "No pude identificar un alimento en el mensaje. Por favor, intenta de nuevo.";

pub const FOOD_PROCESSING_ERROR: &str =
    "Hubo un error al procesar tu alimento. Por favor, intenta de nuevo con más detalles.";

pub const NO_PENDING_ENTRY: &str =
    "No tengo ningún registro pendiente para confirmar. Contame qué comiste y lo registro 🙂";

pub const NO_RECORDS: &str =
    "No se encontraron registros de alimentos para las fechas seleccionadas.";

pub const REPORT_DATES_INVALID: &str = "No pude entender las fechas del reporte. ¿Me las podrías mandar de nuevo? Por ejemplo: del 2024-05-01 al 2024-05-07.";

pub const REPORT_FAILED: &str = "No pude generar un reporte de alimentos para las fechas seleccionadas. Por favor, intenta de nuevo.";

/// Generic apology for failures the user cannot fix.
pub const GENERIC_APOLOGY: &str =
    "Perdón, tuve un problema procesando tu mensaje. ¿Podés intentar de nuevo?";

pub fn thanks_message(description: &str) -> String {
    format!("Gracias por registrar tu consumo de {}", description)
}

pub fn report_notice(start: &str, end: &str) -> String {
    format!(
        "📊 Estoy generando un reporte de alimentos consumidos entre las fechas {} y {}. Dame un momento y te compartiré los resultados. ⏳🍽️📅",
        start, end
    )
}

pub fn report_message(start: &str, end: &str, body: &str) -> String {
    format!(
        "El reporte de alimentos consumidos entre las fechas {} y {} es el siguiente: {}",
        start, end, body
    )
}

/// Summary of a freshly logged entry, asking the user to confirm it.
pub fn food_log_summary(log: &FoodLog) -> String {
    let mut out = format!("Registraste: {}\n", log.description);
    out.push_str("Contenido nutricional aproximado:\n");
    out.push_str(&format!("* {}g de proteínas\n", amount(log.total_macros.protein)));
    out.push_str(&format!("* {}g de carbohidratos\n", amount(log.total_macros.carbs)));
    out.push_str(&format!("* {}g de grasas\n", amount(log.total_macros.fats)));

    if !log.foods.is_empty() {
        out.push_str("\nAlimentos registrados:\n");
        for food in &log.foods {
            out.push_str(&format!("* {}\n", food.description));
        }
    }

    out.push_str("\nMicronutrientes:\n");
    if log.total_micros.is_empty() {
        out.push_str("* No se registraron micronutrientes\n");
    } else {
        for micro in &log.total_micros {
            out.push_str(&format!("* {}: {}g\n", micro.name, amount(micro.amount)));
        }
    }

    out.push_str("\n¿Está bien así?");
    out
}

/// Format an amount with at most one decimal, dropping a trailing ".0".
pub(crate) fn amount(value: f64) -> String {
    let rounded = (value * 10.0).round() / 10.0;
    if rounded.fract() == 0.0 {
        format!("{}", rounded as i64)
    } else {
        format!("{:.1}", rounded)
    }
}
