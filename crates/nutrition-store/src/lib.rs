//! In-memory persistence layer for the nutrition assistant.
//!
//! This crate owns users, their conversation history, food-log entries and
//! derived daily calorie targets. All mutation goes through [`UserStore`]
//! (or the [`UserRepository`] trait it implements), which validates input
//! and stamps timestamps from an injectable [`Clock`].
//!
//! # Example
//!
//! ```no_run
//! use nutrition_store::{Macros, NewFoodLog, UserRepository, UserStore};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = UserStore::new();
//!     store.create_user_from_number("5491112345678").await?;
//!
//!     let log = NewFoodLog::pending("Una manzana", Macros::new(0.5, 25.0, 0.3));
//!     store.add_food_log("5491112345678", log).await?;
//!
//!     Ok(())
//! }
//! ```

pub mod calories;
pub mod error;
pub mod models;
pub mod nutrients;
pub mod store;
pub mod user_profile;
pub mod validation;
pub mod window;

pub use calories::{
    estimate, estimate_for_user, CalorieError, CalorieEstimate, ASSUMED_AGE,
    DEFAULT_DAILY_CALORIES,
};
pub use error::{Result, StoreError};
pub use models::{
    ActivityLevel, DailyCalorieTarget, Food, FoodLog, FoodLogStatus, FoodLogUpdate, Goal, Macros,
    MediaRef, Message, MessageContent, Micro, NewFoodLog, NewMessage, NewUser, ParseEnumError,
    ProfileUpdate, Sender, Sex, User, MAX_AGE,
};
pub use nutrients::{aggregate_micros, average_per_entry, total_calories, NutrientAverages};
pub use store::{Clock, FixedClock, SystemClock, UserRepository, UserStore};
pub use user_profile::ProfileField;
pub use validation::{FieldIssue, ValidationError};
pub use window::{recent_messages, recent_messages_within, CONVERSATION_WINDOW};
