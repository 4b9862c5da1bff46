//! In-memory user store.

use std::collections::HashMap;
use std::sync::{Arc, Mutex as StdMutex};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::{Result, StoreError};
use crate::models::{
    DailyCalorieTarget, Food, FoodLog, FoodLogUpdate, Message, NewFoodLog, NewMessage, NewUser,
    ProfileUpdate, User,
};
use crate::nutrients::aggregate_micros;
use crate::validation::ValidationError;

/// Source of timestamps for messages and food logs.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A settable clock for tests.
#[derive(Debug)]
pub struct FixedClock {
    now: StdMutex<DateTime<Utc>>,
}

impl FixedClock {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            now: StdMutex::new(now),
        }
    }

    pub fn set(&self, now: DateTime<Utc>) {
        *self.now.lock().unwrap_or_else(|e| e.into_inner()) = now;
    }

    pub fn advance(&self, by: chrono::Duration) {
        let mut guard = self.now.lock().unwrap_or_else(|e| e.into_inner());
        *guard += by;
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// Operations the flows need from user storage.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Current time according to the store clock.
    fn now(&self) -> DateTime<Utc>;

    async fn create_user(&self, new_user: NewUser) -> Result<User>;

    /// Create a user with an empty profile.
    async fn create_user_from_number(&self, phone: &str) -> Result<User> {
        self.create_user(NewUser::new(phone)).await
    }

    /// Look up the user record, creating an empty one if missing.
    ///
    /// Returns a snapshot and whether it was created by this call.
    async fn ensure_user(&self, phone: &str) -> Result<(User, bool)>;

    async fn get_user(&self, phone: &str) -> Option<User>;

    async fn update_user(&self, phone: &str, update: ProfileUpdate) -> Result<User>;

    async fn delete_user(&self, phone: &str) -> Result<()>;

    async fn all_users(&self) -> Vec<User>;

    async fn add_message(&self, phone: &str, message: NewMessage) -> Result<Message>;

    async fn conversation(&self, phone: &str) -> Vec<Message>;

    async fn add_food_log(&self, phone: &str, log: NewFoodLog) -> Result<FoodLog>;

    async fn food_logs(&self, phone: &str) -> Vec<FoodLog>;

    async fn update_food_log(&self, phone: &str, id: &str, update: FoodLogUpdate)
        -> Result<FoodLog>;

    async fn delete_food_log(&self, phone: &str, id: &str) -> Result<()>;

    async fn food_logs_by_date_range(
        &self,
        phone: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Vec<FoodLog>;

    /// The pending entry with the greatest date.
    async fn last_pending_food_log(&self, phone: &str) -> Option<FoodLog>;

    async fn add_food_to_food_log(&self, phone: &str, id: &str, food: Food) -> Result<FoodLog>;

    async fn set_daily_target(&self, phone: &str, daily_calories: i64) -> DailyCalorieTarget;

    async fn daily_target(&self, phone: &str) -> Option<DailyCalorieTarget>;
}

type UserCell = Arc<Mutex<User>>;

/// In-memory store keyed by phone number.
///
/// The outer map lock is only held for lookup and insertion; each user
/// record has its own mutex so work on different phones does not contend.
pub struct UserStore {
    users: RwLock<HashMap<String, UserCell>>,
    targets: RwLock<HashMap<String, DailyCalorieTarget>>,
    clock: Arc<dyn Clock>,
}

impl Default for UserStore {
    fn default() -> Self {
        Self::new()
    }
}

impl UserStore {
    /// Create an empty store using the system clock.
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    /// Create an empty store with a custom clock.
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            users: RwLock::new(HashMap::new()),
            targets: RwLock::new(HashMap::new()),
            clock,
        }
    }

    /// Number of stored users.
    pub async fn user_count(&self) -> usize {
        self.users.read().await.len()
    }

    /// Remove every user and target.
    pub async fn clear(&self) {
        self.users.write().await.clear();
        self.targets.write().await.clear();
    }

    async fn cell(&self, phone: &str) -> Option<UserCell> {
        self.users.read().await.get(phone).cloned()
    }

    async fn require_cell(&self, phone: &str) -> Result<UserCell> {
        self.cell(phone)
            .await
            .ok_or_else(|| StoreError::user_not_found(phone))
    }
}

#[async_trait]
impl UserRepository for UserStore {
    fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    async fn create_user(&self, new_user: NewUser) -> Result<User> {
        new_user.validate()?;

        let mut user = User::new(new_user.phone_number.trim());
        user.apply(&new_user.profile);

        self.users
            .write()
            .await
            .insert(user.phone_number.clone(), Arc::new(Mutex::new(user.clone())));
        debug!("Stored user {}", user.phone_number);
        Ok(user)
    }

    async fn ensure_user(&self, phone: &str) -> Result<(User, bool)> {
        if let Some(cell) = self.cell(phone).await {
            return Ok((cell.lock().await.clone(), false));
        }

        let new_user = NewUser::new(phone);
        new_user.validate()?;

        let mut users = self.users.write().await;
        if let Some(cell) = users.get(phone) {
            let cell = cell.clone();
            drop(users);
            return Ok((cell.lock().await.clone(), false));
        }
        let user = User::new(phone);
        users.insert(phone.to_string(), Arc::new(Mutex::new(user.clone())));
        info!(phone = %phone, "Created user on first contact");
        Ok((user, true))
    }

    async fn get_user(&self, phone: &str) -> Option<User> {
        let cell = self.cell(phone).await?;
        let user = cell.lock().await.clone();
        Some(user)
    }

    async fn update_user(&self, phone: &str, update: ProfileUpdate) -> Result<User> {
        let cell = self.require_cell(phone).await?;
        update.validate()?;

        let mut user = cell.lock().await;
        user.apply(&update);
        Ok(user.clone())
    }

    async fn delete_user(&self, phone: &str) -> Result<()> {
        let removed = self.users.write().await.remove(phone);
        if removed.is_none() {
            return Err(StoreError::user_not_found(phone));
        }
        self.targets.write().await.remove(phone);
        info!(phone = %phone, "Deleted user");
        Ok(())
    }

    async fn all_users(&self) -> Vec<User> {
        let cells: Vec<UserCell> = self.users.read().await.values().cloned().collect();
        let mut users = Vec::with_capacity(cells.len());
        for cell in cells {
            users.push(cell.lock().await.clone());
        }
        users.sort_by(|a, b| a.phone_number.cmp(&b.phone_number));
        users
    }

    async fn add_message(&self, phone: &str, message: NewMessage) -> Result<Message> {
        let cell = self.require_cell(phone).await?;
        if message.content.is_empty() {
            return Err(ValidationError::single("content", "must carry text or media").into());
        }

        let stored = Message {
            content: message.content,
            timestamp: self.clock.now(),
            sender: message.sender,
        };
        cell.lock().await.conversation.push(stored.clone());
        Ok(stored)
    }

    async fn conversation(&self, phone: &str) -> Vec<Message> {
        match self.cell(phone).await {
            Some(cell) => cell.lock().await.conversation.clone(),
            None => Vec::new(),
        }
    }

    async fn add_food_log(&self, phone: &str, log: NewFoodLog) -> Result<FoodLog> {
        let cell = self.require_cell(phone).await?;
        log.validate()?;

        let stored = FoodLog {
            id: Uuid::new_v4().to_string(),
            description: log.description.trim().to_string(),
            total_macros: log.total_macros,
            total_micros: aggregate_micros(log.total_micros.iter()),
            foods: log.foods,
            date: self.clock.now(),
            status: log.status,
        };
        cell.lock().await.food_logs.push(stored.clone());
        debug!("Added food log {} for {}", stored.id, phone);
        Ok(stored)
    }

    async fn food_logs(&self, phone: &str) -> Vec<FoodLog> {
        match self.cell(phone).await {
            Some(cell) => cell.lock().await.food_logs.clone(),
            None => Vec::new(),
        }
    }

    async fn update_food_log(
        &self,
        phone: &str,
        id: &str,
        update: FoodLogUpdate,
    ) -> Result<FoodLog> {
        let cell = self.require_cell(phone).await?;
        let mut user = cell.lock().await;
        let log = user
            .food_logs
            .iter_mut()
            .find(|log| log.id == id)
            .ok_or_else(|| StoreError::food_log_not_found(id))?;

        update.check(log)?;
        update.apply(log);
        Ok(log.clone())
    }

    async fn delete_food_log(&self, phone: &str, id: &str) -> Result<()> {
        let cell = self.require_cell(phone).await?;
        let mut user = cell.lock().await;
        let index = user
            .food_logs
            .iter()
            .position(|log| log.id == id)
            .ok_or_else(|| StoreError::food_log_not_found(id))?;
        user.food_logs.remove(index);
        Ok(())
    }

    async fn food_logs_by_date_range(
        &self,
        phone: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Vec<FoodLog> {
        if start > end {
            return Vec::new();
        }
        self.food_logs(phone)
            .await
            .into_iter()
            .filter(|log| log.date >= start && log.date <= end)
            .collect()
    }

    async fn last_pending_food_log(&self, phone: &str) -> Option<FoodLog> {
        let cell = self.cell(phone).await?;
        let user = cell.lock().await;
        // Ties on date go to the later insertion.
        user.food_logs
            .iter()
            .filter(|log| log.is_pending())
            .max_by_key(|log| log.date)
            .cloned()
    }

    async fn add_food_to_food_log(&self, phone: &str, id: &str, food: Food) -> Result<FoodLog> {
        let cell = self.require_cell(phone).await?;
        food.validate()?;

        let mut user = cell.lock().await;
        let log = user
            .food_logs
            .iter_mut()
            .find(|log| log.id == id)
            .ok_or_else(|| StoreError::food_log_not_found(id))?;
        log.foods.push(food);
        log.recompute_totals();
        Ok(log.clone())
    }

    async fn set_daily_target(&self, phone: &str, daily_calories: i64) -> DailyCalorieTarget {
        let target = DailyCalorieTarget {
            phone_number: phone.to_string(),
            daily_calories,
        };
        self.targets
            .write()
            .await
            .insert(phone.to_string(), target.clone());
        info!(phone = %phone, daily_calories, "Stored daily calorie target");
        target
    }

    async fn daily_target(&self, phone: &str) -> Option<DailyCalorieTarget> {
        self.targets.read().await.get(phone).cloned()
    }
}
