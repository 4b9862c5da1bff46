//! Manual check of structured extraction against the live API.
//!
//! Run with: cargo run -p openai-brain --example extract_food
//! Or with a custom message: cargo run -p openai-brain --example extract_food -- "comí una pizza"
//!
//! Make sure to set environment variables in .env:
//!   OPENAI_API_KEY - OpenAI API key for authentication

use brain_core::{ChatMessage, GenerationRequest, ResponseFormat};
use openai_brain::{Brain, OpenAiBrain};
use serde_json::json;
use std::env;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt::init();

    let args: Vec<String> = env::args().collect();
    let message_text = if args.len() > 1 {
        args[1..].join(" ")
    } else {
        "Almorcé una milanesa con puré".to_string()
    };

    let brain = OpenAiBrain::from_env()?;
    println!("Brain initialized: {} ({})", brain.name(), brain.config().model);

    let request = GenerationRequest::new(
        "Extraé el alimento del mensaje y estimá proteínas, carbohidratos y grasas en gramos.",
    )
    .with_message(ChatMessage::user(message_text.clone()))
    .with_response_format(ResponseFormat::json_schema(
        "food",
        json!({
            "type": "object",
            "properties": {
                "description": {"type": "string"},
                "protein": {"type": "number"},
                "carbs": {"type": "number"},
                "fats": {"type": "number"}
            },
            "required": ["description", "protein", "carbs", "fats"]
        }),
    ));

    println!("Sending: \"{}\"", message_text);
    let generation = brain.generate(request).await?;

    println!("=== Response ===");
    println!("{}", generation.text.unwrap_or_default());
    println!("================");

    Ok(())
}
