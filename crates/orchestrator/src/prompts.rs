//! System prompts for each model call.

use chrono::NaiveDate;
use nutrition_store::{FoodLog, Goal, NutrientAverages, User};

use crate::messages::amount;

fn profile_json(user: &User) -> String {
    serde_json::json!({
        "age": user.age,
        "name": user.name,
        "goal": user.goal,
        "sex": user.sex,
        "height": user.height,
        "weight": user.weight,
        "physicalActivityLevel": user.physical_activity_level,
        "dietaryRestrictions": user.dietary_restrictions,
        "diseases": user.diseases,
    })
    .to_string()
}

fn goals_text(goals: &[Goal]) -> String {
    if goals.is_empty() {
        return "comer mejor".to_string();
    }
    goals.iter().map(Goal::as_str).collect::<Vec<_>>().join(", ")
}

/// Decision prompt while the profile is incomplete.
pub fn onboarding_system(user: &User) -> String {
    let missing: Vec<&str> = user.missing_fields().iter().map(|f| f.key()).collect();
    format!(
        "Sos un asistente de nutrición que habla por WhatsApp. Todavía estás armando el perfil del usuario.\n\
         Perfil actual: {}\n\
         Campos faltantes: {}\n\n\
         Si el último mensaje del usuario trae alguno de estos datos, llamá a save_profile_data con \
         los valores que dio y null en el resto. Convertí la altura a centímetros y el peso a kilogramos. \
         Si dice que no tiene restricciones o enfermedades, mandá una lista vacía.\n\
         Si no trae datos nuevos, llamá a request_missing_information.\n\
         Llamá a una sola tool.",
        profile_json(user),
        missing.join(", ")
    )
}

/// Decision prompt once the profile is complete.
pub fn food_logging_system(user: &User, today: NaiveDate, pending: Option<&FoodLog>) -> String {
    let pending = match pending {
        Some(log) => format!("El último registro pendiente de confirmación es: \"{}\".", log.description),
        None => "No hay registros pendientes de confirmación.".to_string(),
    };
    format!(
        "Sos un asistente de nutrición que habla por WhatsApp con {name}. Su objetivo es {goals}.\n\
         Hoy es {today}. {pending}\n\n\
         Elegí qué hacer con los mensajes de los últimos minutos:\n\
         - Si el usuario cuenta algo que comió o manda una foto o audio de comida, llamá a new_pending_food_log_entry.\n\
         - Si corrige el registro pendiente (\"no, eran dos\", \"sin azúcar\"), llamá a pending_food_log_entry_correction.\n\
         - Si confirma el registro pendiente (\"sí\", \"está bien\"), llamá a food_log_entry_confirmation.\n\
         - Si pide un reporte o resumen, llamá a generate_report con las fechas en formato YYYY-MM-DD.\n\
         - Si no es nada de eso, respondé en una o dos oraciones, con tono amigable, sin llamar tools.\n\
         Nunca llames dos veces a la misma tool. Si una tool dice que no llames más tools, terminá.",
        name = user.name.as_deref().unwrap_or("el usuario"),
        goals = goals_text(user.goals()),
        today = today.format("%Y-%m-%d"),
        pending = pending,
    )
}

const EXTRACTION_RULES: &str = "Analizá sus macro y micronutrientes. Los nombres de los micronutrientes \
van en el idioma del usuario y las cantidades en gramos.\n\
La descripción tiene que ser sencilla y concisa, teniendo en cuenta todos los ingredientes \
mencionados, por ejemplo \"Ensalada de lechuga, tomate y cebolla\" o \"Tostada de jamón y queso\". \
Si hay un error de tipeo, corregilo.\n\
Respondé solo con un objeto JSON con el campo \"food\". Si no se identifica ningún alimento, \
\"food\" es null.";

/// Extraction prompt for a new entry.
pub fn extraction_system(conversation: &str) -> String {
    format!(
        "Extraé del mensaje del usuario un posible alimento y generá un título que lo describa. \
         Si el mensaje es ambiguo pero menciona un alimento, inferí su descripción de manera general. \
         Si hay una foto, identificá los alimentos que se ven.\n{}\n\n\
         Conversación de los últimos 5 minutos:\n{}",
        EXTRACTION_RULES, conversation
    )
}

/// Extraction prompt for a correction of the pending entry.
pub fn correction_system(conversation: &str, previous: Option<&str>) -> String {
    let previous = previous
        .map(|d| format!("El registro que el usuario está corrigiendo es: \"{}\".\n", d))
        .unwrap_or_default();
    format!(
        "El usuario hizo una corrección al último alimento registrado. {}\
         Extraé de sus últimos mensajes el alimento corregido y asegurate de que la corrección \
         esté presente en la nueva descripción.\n{}\n\n\
         Conversación de los últimos 5 minutos:\n{}",
        previous, EXTRACTION_RULES, conversation
    )
}

/// Prompt for the short message sent after a confirmation.
pub fn insight_prompt(
    description: &str,
    goals: &[Goal],
    target: i64,
    consumed: f64,
    today_entries: &[FoodLog],
) -> String {
    let entries: Vec<String> = today_entries
        .iter()
        .map(|log| format!("- {} ({} kcal)", log.description, amount(log.total_macros.calories())))
        .collect();
    format!(
        "Un usuario acaba de comer: {description}.\n\
         Sos un chatbot que da recomendaciones de alimentos. Su objetivo es {goals} y sus necesidades \
         calóricas son de {target} kcal por día. Hoy lleva aproximadamente {consumed} kcal:\n{entries}\n\n\
         Dale un insight muy breve sobre lo que comió y una sugerencia para el resto del día, en dos \
         párrafos muy cortos: uno sobre la comida y otro sobre cómo viene con su objetivo de calorías. \
         Poné en negrita los valores de calorías. Usá un tono muy humano, como un amigo.\n\
         Respondé con un objeto JSON con el campo \"description\".",
        description = description,
        goals = goals_text(goals),
        target = target,
        consumed = amount(consumed),
        entries = entries.join("\n"),
    )
}

/// Prompt for the narrative of a date-range report.
pub fn report_prompt(
    start: &str,
    end: &str,
    user: &User,
    averages: &NutrientAverages,
    logs: &[FoodLog],
) -> String {
    let micros: Vec<String> = averages
        .micros
        .iter()
        .map(|m| format!("  - {}: {}g", m.name, amount(m.amount)))
        .collect();
    let entries: Vec<String> = logs
        .iter()
        .map(|log| format!("- {} {}", log.date.format("%Y-%m-%d %H:%M"), log.description))
        .collect();
    format!(
        "Analizá los alimentos consumidos por el usuario entre {start} y {end} y generá un reporte \
         amigable y personalizado, con párrafos de no más de 2-3 oraciones:\n\
         1. Patrones de alimentación en este período.\n\
         2. Promedios por registro ({count} registros):\n\
         - Proteínas: {protein}g\n- Carbohidratos: {carbs}g\n- Grasas: {fats}g\n\
         - Micronutrientes:\n{micros}\n\
         3. Recomendaciones concretas para acercarse a sus objetivos, con tono positivo.\n\n\
         Perfil del usuario: {profile}\n\
         Registros:\n{entries}\n\n\
         Respondé con un objeto JSON con el campo \"description\".",
        start = start,
        end = end,
        count = averages.entries,
        protein = amount(averages.macros.protein),
        carbs = amount(averages.macros.carbs),
        fats = amount(averages.macros.fats),
        micros = micros.join("\n"),
        profile = profile_json(user),
        entries = entries.join("\n"),
    )
}
