//! Short motivational message sent after a confirmation.

use brain_core::GenerationRequest;
use chrono::{DateTime, Duration, Local, NaiveDate, NaiveTime, TimeZone, Utc};
use nutrition_store::{total_calories, DEFAULT_DAILY_CALORIES};
use tracing::{info, warn};

use crate::drafts::Narrative;
use crate::error::Result;
use crate::prompts;
use crate::services::Services;
use crate::tools;

/// Build and send the insight. Errors are logged, never surfaced.
pub async fn send_insight(services: Services, phone: String, description: String) {
    if let Err(e) = try_send_insight(&services, &phone, &description).await {
        warn!("Insight for {} failed: {}", phone, e);
    }
}

async fn try_send_insight(services: &Services, phone: &str, description: &str) -> Result<()> {
    let user = services.require_user(phone).await?;
    let (start, end) = day_window(Local::now().date_naive());
    let today = services
        .store
        .food_logs_by_date_range(phone, start, end)
        .await;
    let consumed = total_calories(&today);
    let target = services
        .store
        .daily_target(phone)
        .await
        .map(|t| t.daily_calories)
        .unwrap_or(DEFAULT_DAILY_CALORIES);

    let prompt = prompts::insight_prompt(description, user.goals(), target, consumed, &today);
    let request = GenerationRequest::new(prompt).with_response_format(tools::description_format());
    let narrative: Narrative = services.generate_object(request).await?;

    match narrative.text() {
        Some(text) => services.reply(phone, text).await,
        None => info!("No insight generated for {}", phone),
    }
    Ok(())
}

/// The eating day: 1:00 AM local on `date` to 1:00 AM local the next day.
pub fn day_window(date: NaiveDate) -> (DateTime<Utc>, DateTime<Utc>) {
    let start = one_am(date);
    let end = date
        .succ_opt()
        .map(one_am)
        .unwrap_or_else(|| start + Duration::days(1));
    (start, end)
}

fn one_am(date: NaiveDate) -> DateTime<Utc> {
    let naive = date
        .and_hms_opt(1, 0, 0)
        .unwrap_or_else(|| date.and_time(NaiveTime::default()));
    Local
        .from_local_datetime(&naive)
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|| naive.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_day_window_spans_a_day() {
        let date = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        let (start, end) = day_window(date);
        assert!(start < end);
        let hours = (end - start).num_hours();
        assert!((23..=25).contains(&hours));
        assert_eq!(start.with_timezone(&Local).date_naive(), date);
    }
}
