//! End-to-end conversation flows.
//!
//! Each test drives the orchestrator with a mock brain, the in-memory store
//! and a recording sender, so nothing leaves the process.

use std::sync::Arc;
use std::time::Duration as StdDuration;

use chrono::{Duration, Utc};
use mock_brain::{DelayedBrain, EchoBrain, ScriptedBrain};
use nutrition_store::{
    ActivityLevel, FoodLogStatus, Goal, Macros, NewFoodLog, ProfileUpdate, Sex, UserRepository,
    UserStore,
};
use orchestrator::{
    food_logging, messages, ActionKind, BackgroundTasks, Orchestrator, OrchestratorConfig,
    OrchestratorError, RecordingSender, TurnStage,
};
use serde_json::json;
use twochat::InboundEnvelope;

const PHONE: &str = "+5491187654321";

struct Harness {
    orchestrator: Orchestrator,
    store: Arc<UserStore>,
    brain: Arc<ScriptedBrain>,
    sender: Arc<RecordingSender>,
}

fn harness(brain: ScriptedBrain) -> Harness {
    let store = Arc::new(UserStore::new());
    let brain = Arc::new(brain);
    let sender = Arc::new(RecordingSender::new());
    let orchestrator = Orchestrator::with_config(
        store.clone(),
        brain.clone(),
        sender.clone(),
        OrchestratorConfig::default(),
    );
    Harness {
        orchestrator,
        store,
        brain,
        sender,
    }
}

async fn complete_user(store: &UserStore) {
    store.create_user_from_number(PHONE).await.unwrap();
    let profile = ProfileUpdate {
        age: Some(30),
        name: Some("Ana".to_string()),
        goal: Some(vec![Goal::LoseWeight]),
        sex: Some(Sex::Female),
        height: Some(165.0),
        weight: Some(62.0),
        physical_activity_level: Some(ActivityLevel::Moderate),
        dietary_restrictions: Some(vec![]),
        diseases: Some(vec![]),
    };
    store.update_user(PHONE, profile).await.unwrap();
}

fn apple() -> serde_json::Value {
    json!({
        "food": {
            "description": "Una manzana",
            "totalMacros": {"protein": 0.5, "carbs": 25.0, "fats": 0.3},
            "totalMicros": [{"name": "Vitamina C", "amount": 8.4}],
            "foods": [{
                "description": "manzana",
                "macros": {"protein": 0.5, "carbs": 25.0, "fats": 0.3},
                "micros": [{"name": "Vitamina C", "amount": 8.4}]
            }]
        }
    })
}

#[tokio::test]
async fn first_contact_gets_intro_without_model_call() {
    let h = harness(ScriptedBrain::new());

    let turn = h
        .orchestrator
        .process(InboundEnvelope::text(PHONE, "Hola"))
        .await
        .unwrap();

    assert_eq!(turn.stage, TurnStage::FirstContact);
    assert!(turn.actions.is_empty());
    assert_eq!(h.brain.call_count().await, 0);

    let user = h.store.get_user(PHONE).await.unwrap();
    assert_eq!(user.missing_fields().len(), 9);
    // Inbound message plus the intro reply.
    assert_eq!(user.conversation.len(), 2);

    assert_eq!(h.sender.texts_to(PHONE), vec![messages::intro_message()]);
}

#[tokio::test]
async fn onboarding_completes_profile() {
    let brain = ScriptedBrain::new().then_tool_call(
        "save_profile_data",
        json!({
            "age": 30,
            "name": "Ana",
            "goal": ["loseWeight"],
            "sex": "female",
            "height": 165,
            "weight": 62,
            "physicalActivityLevel": "moderate",
            "dietaryRestrictions": [],
            "diseases": []
        }),
    );
    let h = harness(brain);
    h.store.create_user_from_number(PHONE).await.unwrap();

    let turn = h
        .orchestrator
        .process(InboundEnvelope::text(
            PHONE,
            "Soy Ana, 30 años, mujer, 1,65 m, 62 kg, actividad moderada, quiero bajar de peso, sin restricciones ni enfermedades",
        ))
        .await
        .unwrap();

    assert_eq!(turn.stage, TurnStage::Onboarding);
    assert_eq!(turn.actions, vec![ActionKind::SaveProfileData]);
    assert_eq!(h.brain.call_count().await, 1);

    let user = h.store.get_user(PHONE).await.unwrap();
    assert!(user.is_complete());
    let target = h.store.daily_target(PHONE).await.unwrap();
    assert!(target.daily_calories > 0);

    assert_eq!(h.sender.texts_to(PHONE), vec![messages::WELCOME.to_string()]);
}

#[tokio::test]
async fn partial_profile_asks_for_the_rest() {
    let brain = ScriptedBrain::new()
        .then_tool_call("save_profile_data", json!({"name": "Ana", "age": 30}));
    let h = harness(brain);
    h.store.create_user_from_number(PHONE).await.unwrap();

    let turn = h
        .orchestrator
        .process(InboundEnvelope::text(PHONE, "Me llamo Ana y tengo 30"))
        .await
        .unwrap();

    assert_eq!(
        turn.actions,
        vec![
            ActionKind::SaveProfileData,
            ActionKind::RequestMissingInformation
        ]
    );

    let user = h.store.get_user(PHONE).await.unwrap();
    assert_eq!(user.name.as_deref(), Some("Ana"));
    assert_eq!(user.age, Some(30));
    assert!(h.store.daily_target(PHONE).await.is_none());

    let sent = h.sender.texts_to(PHONE);
    assert_eq!(sent.len(), 1);
    assert!(sent[0].contains("necesito algunos datos más"));
    assert!(sent[0].contains("objetivo"));
    assert!(!sent[0].contains("nombre"));
}

#[tokio::test]
async fn food_mention_creates_pending_entry() {
    let brain = ScriptedBrain::new()
        .then_tool_call("new_pending_food_log_entry", json!({}))
        .then_json(apple());
    let h = harness(brain);
    complete_user(&h.store).await;

    let turn = h
        .orchestrator
        .process(InboundEnvelope::text(PHONE, "comí una manzana"))
        .await
        .unwrap();

    assert_eq!(turn.stage, TurnStage::FoodLogging);
    assert_eq!(turn.actions, vec![ActionKind::NewPendingFoodLogEntry]);
    assert_eq!(h.brain.call_count().await, 2);

    let logs = h.store.food_logs(PHONE).await;
    assert_eq!(logs.len(), 1);
    assert_eq!(logs[0].status, FoodLogStatus::Pending);
    assert!(logs[0].description.to_lowercase().contains("manzana"));

    let sent = h.sender.texts_to(PHONE);
    assert_eq!(sent.len(), 2);
    assert_eq!(sent[0], messages::PROCESSING_FOOD);
    assert!(sent[1].starts_with("Registraste: Una manzana"));
    assert!(sent[1].contains("Vitamina C"));
    assert!(sent[1].ends_with("¿Está bien así?"));
}

#[tokio::test]
async fn nothing_edible_is_not_logged() {
    let brain = ScriptedBrain::new()
        .then_tool_call("new_pending_food_log_entry", json!({}))
        .then_json(json!({"food": null}));
    let h = harness(brain);
    complete_user(&h.store).await;

    h.orchestrator
        .process(InboundEnvelope::text(PHONE, "comí algo"))
        .await
        .unwrap();

    assert!(h.store.food_logs(PHONE).await.is_empty());
    assert!(h.sender.contains(messages::NO_FOOD_FOUND));
}

#[tokio::test]
async fn confirmation_validates_latest_pending_entry() {
    let brain = ScriptedBrain::new()
        .then_tool_call("food_log_entry_confirmation", json!({}))
        .then_json(json!({"description": "¡Buena elección! La manzana suma fibra."}));
    let h = harness(brain);
    complete_user(&h.store).await;

    let older = h
        .store
        .add_food_log(PHONE, NewFoodLog::pending("Pan", Macros::new(4.0, 25.0, 1.0)))
        .await
        .unwrap();
    let latest = h
        .store
        .add_food_log(
            PHONE,
            NewFoodLog::pending("Una manzana", Macros::new(0.5, 25.0, 0.3)),
        )
        .await
        .unwrap();

    let turn = h
        .orchestrator
        .process(InboundEnvelope::text(PHONE, "sí, está bien"))
        .await
        .unwrap();
    h.orchestrator.wait_idle().await;

    assert_eq!(turn.actions, vec![ActionKind::FoodLogEntryConfirmation]);

    let logs = h.store.food_logs(PHONE).await;
    let status_of = |id: &str| logs.iter().find(|l| l.id == id).unwrap().status;
    assert_eq!(status_of(&latest.id), FoodLogStatus::Validated);
    assert_eq!(status_of(&older.id), FoodLogStatus::Pending);

    let sent = h.sender.texts_to(PHONE);
    assert_eq!(sent[0], messages::thanks_message("Una manzana"));
    assert!(h.sender.contains("suma fibra"));
    assert_eq!(h.brain.call_count().await, 2);
}

#[tokio::test]
async fn correction_adds_new_pending_entry() {
    let brain = ScriptedBrain::new()
        .then_tool_call("pending_food_log_entry_correction", json!({}))
        .then_json(json!({
            "food": {
                "description": "Café sin azúcar",
                "totalMacros": {"protein": 0.3, "carbs": 0.0, "fats": 0.0},
                "totalMicros": [],
                "foods": [{
                    "description": "café",
                    "macros": {"protein": 0.3, "carbs": 0.0, "fats": 0.0},
                    "micros": []
                }]
            }
        }));
    let h = harness(brain);
    complete_user(&h.store).await;

    let original = h
        .store
        .add_food_log(
            PHONE,
            NewFoodLog::pending("Café con azúcar", Macros::new(0.3, 10.0, 0.0)),
        )
        .await
        .unwrap();

    let turn = h
        .orchestrator
        .process(InboundEnvelope::text(PHONE, "no, era sin azúcar"))
        .await
        .unwrap();

    assert_eq!(turn.stage, TurnStage::FoodLogging);
    assert_eq!(turn.actions, vec![ActionKind::PendingFoodLogEntryCorrection]);
    assert_eq!(h.brain.call_count().await, 2);

    let requests = h.brain.requests().await;
    let extraction = requests[1].system.as_deref().unwrap_or_default();
    assert!(extraction.contains("Café con azúcar"));

    // The corrected entry is added; the previous one stays as it was.
    let logs = h.store.food_logs(PHONE).await;
    assert_eq!(logs.len(), 2);
    let kept = logs.iter().find(|l| l.id == original.id).unwrap();
    assert_eq!(kept, &original);

    let latest = h.store.last_pending_food_log(PHONE).await.unwrap();
    assert_ne!(latest.id, original.id);
    assert_eq!(latest.description, "Café sin azúcar");
    assert_eq!(latest.status, FoodLogStatus::Pending);

    let sent = h.sender.texts_to(PHONE);
    assert_eq!(sent[0], messages::PROCESSING_FOOD);
    assert!(sent[1].starts_with("Registraste: Café sin azúcar"));
}

#[tokio::test]
async fn duplicate_confirmation_in_one_batch_runs_once() {
    let brain = ScriptedBrain::new()
        .then_tool_calls(vec![
            ("food_log_entry_confirmation".to_string(), json!({})),
            ("food_log_entry_confirmation".to_string(), json!({})),
        ])
        .then_json(json!({"description": ""}));
    let h = harness(brain);
    complete_user(&h.store).await;

    for description in ["Pan", "Yogur"] {
        h.store
            .add_food_log(PHONE, NewFoodLog::pending(description, Macros::new(4.0, 10.0, 1.0)))
            .await
            .unwrap();
    }

    let turn = h
        .orchestrator
        .process(InboundEnvelope::text(PHONE, "sí"))
        .await
        .unwrap();
    h.orchestrator.wait_idle().await;

    assert_eq!(turn.actions, vec![ActionKind::FoodLogEntryConfirmation]);

    let logs = h.store.food_logs(PHONE).await;
    let validated: Vec<&str> = logs
        .iter()
        .filter(|l| l.status == FoodLogStatus::Validated)
        .map(|l| l.description.as_str())
        .collect();
    assert_eq!(validated, vec!["Yogur"]);

    let thanks: Vec<String> = h
        .sender
        .texts_to(PHONE)
        .into_iter()
        .filter(|t| t.starts_with("Gracias por registrar"))
        .collect();
    assert_eq!(thanks.len(), 1);
}

#[tokio::test]
async fn confirmation_after_new_entry_is_blocked() {
    let brain = ScriptedBrain::new()
        .then_tool_calls(vec![
            ("new_pending_food_log_entry".to_string(), json!({})),
            ("food_log_entry_confirmation".to_string(), json!({})),
        ])
        .then_json(apple());
    let h = harness(brain);
    complete_user(&h.store).await;

    let turn = h
        .orchestrator
        .process(InboundEnvelope::text(PHONE, "comí una manzana, anotala"))
        .await
        .unwrap();

    assert_eq!(turn.actions, vec![ActionKind::NewPendingFoodLogEntry]);
    let logs = h.store.food_logs(PHONE).await;
    assert_eq!(logs.len(), 1);
    assert!(logs[0].is_pending());
    assert!(!h.sender.contains("Gracias por registrar"));
}

#[tokio::test]
async fn confirm_without_pending_entry() {
    let h = harness(ScriptedBrain::new());
    complete_user(&h.store).await;

    let services = h.orchestrator.services().clone();
    let background = BackgroundTasks::new();
    let result = food_logging::confirm_entry(&services, &background, PHONE).await;

    assert!(matches!(result, Err(OrchestratorError::NoPendingEntry)));
    assert!(h.sender.sent().is_empty());
    assert!(background.is_empty().await);
}

#[tokio::test]
async fn confirmation_tool_with_nothing_pending_tells_user() {
    let brain = ScriptedBrain::new().then_tool_call("food_log_entry_confirmation", json!({}));
    let h = harness(brain);
    complete_user(&h.store).await;

    h.orchestrator
        .process(InboundEnvelope::text(PHONE, "sí"))
        .await
        .unwrap();

    assert_eq!(
        h.sender.texts_to(PHONE),
        vec![messages::NO_PENDING_ENTRY.to_string()]
    );
    assert_eq!(h.brain.call_count().await, 1);
}

#[tokio::test]
async fn report_over_empty_range() {
    let brain = ScriptedBrain::new().then_tool_call(
        "generate_report",
        json!({"startDate": "2020-01-01", "endDate": "2020-01-07"}),
    );
    let h = harness(brain);
    complete_user(&h.store).await;
    h.store
        .add_food_log(PHONE, NewFoodLog::pending("Pan", Macros::new(4.0, 25.0, 1.0)))
        .await
        .unwrap();

    let turn = h
        .orchestrator
        .process(InboundEnvelope::text(PHONE, "reporte de la primera semana de 2020"))
        .await
        .unwrap();

    assert_eq!(turn.actions, vec![ActionKind::GenerateReport]);
    assert_eq!(h.brain.call_count().await, 1);
    assert_eq!(
        h.sender.texts_to(PHONE),
        vec![messages::NO_RECORDS.to_string()]
    );
}

#[tokio::test]
async fn report_with_entries() {
    let today = Utc::now().date_naive();
    let start = (today - Duration::days(1)).format("%Y-%m-%d").to_string();
    let end = (today + Duration::days(1)).format("%Y-%m-%d").to_string();

    let brain = ScriptedBrain::new()
        .then_tool_call("generate_report", json!({"startDate": start, "endDate": end}))
        .then_json(json!({"description": "Comiste de forma equilibrada."}));
    let h = harness(brain);
    complete_user(&h.store).await;
    h.store
        .add_food_log(PHONE, NewFoodLog::pending("Pan", Macros::new(4.0, 25.0, 1.0)))
        .await
        .unwrap();

    h.orchestrator
        .process(InboundEnvelope::text(PHONE, "pasame un reporte"))
        .await
        .unwrap();

    let sent = h.sender.texts_to(PHONE);
    assert_eq!(sent.len(), 2);
    assert!(sent[0].starts_with("📊"));
    assert!(sent[1].contains("Comiste de forma equilibrada."));
    assert_eq!(h.brain.call_count().await, 2);
}

#[tokio::test]
async fn plain_text_answer_is_relayed() {
    let store = Arc::new(UserStore::new());
    let sender = Arc::new(RecordingSender::new());
    let orchestrator = Orchestrator::new(
        store.clone(),
        Arc::new(EchoBrain::with_prefix("Dijiste: ")),
        sender.clone(),
    );
    complete_user(&store).await;

    let turn = orchestrator
        .process(InboundEnvelope::text(PHONE, "gracias"))
        .await
        .unwrap();

    assert_eq!(turn.stage, TurnStage::FoodLogging);
    assert!(turn.actions.is_empty());
    assert_eq!(sender.texts_to(PHONE), vec!["Dijiste: gracias".to_string()]);
    assert!(store.food_logs(PHONE).await.is_empty());
}

#[tokio::test]
async fn slow_model_times_out() {
    let store = Arc::new(UserStore::new());
    let sender = Arc::new(RecordingSender::new());
    let brain = DelayedBrain::with_millis(ScriptedBrain::new().then_text("tarde"), 500);
    let config = OrchestratorConfig::builder()
        .llm_timeout(StdDuration::from_millis(50))
        .build();
    let orchestrator = Orchestrator::with_config(store.clone(), Arc::new(brain), sender.clone(), config);
    complete_user(&store).await;

    let result = orchestrator
        .process(InboundEnvelope::text(PHONE, "comí pizza"))
        .await;

    assert!(matches!(
        result,
        Err(OrchestratorError::Brain(brain_core::BrainError::Timeout))
    ));
    assert_eq!(
        sender.texts_to(PHONE),
        vec![messages::GENERIC_APOLOGY.to_string()]
    );
}

#[tokio::test]
async fn model_failure_sends_apology() {
    let h = harness(ScriptedBrain::new());
    complete_user(&h.store).await;

    let result = h
        .orchestrator
        .process(InboundEnvelope::text(PHONE, "comí pizza"))
        .await;

    assert!(matches!(result, Err(OrchestratorError::Brain(_))));
    assert_eq!(
        h.sender.texts_to(PHONE),
        vec![messages::GENERIC_APOLOGY.to_string()]
    );
}

#[tokio::test]
async fn empty_message_from_known_user_is_skipped() {
    let h = harness(ScriptedBrain::new());
    complete_user(&h.store).await;

    let turn = h
        .orchestrator
        .process(InboundEnvelope::text(PHONE, "   "))
        .await
        .unwrap();

    assert_eq!(turn.stage, TurnStage::Skipped);
    assert_eq!(h.brain.call_count().await, 0);
    assert!(h.sender.sent().is_empty());
    assert!(h.store.conversation(PHONE).await.is_empty());
}
