//! Date-range reports.

use brain_core::GenerationRequest;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use nutrition_store::{average_per_entry, User};
use tracing::{info, warn};

use crate::actions::{ActionResult, ReportRange};
use crate::drafts::Narrative;
use crate::error::Result;
use crate::messages;
use crate::prompts;
use crate::services::Services;
use crate::tools;

const ANSWERED: &str = "Se respondió al usuario correctamente.";

/// Parse report bounds.
///
/// Accepts RFC 3339, naive date-times (UTC) and `YYYY-MM-DD`. A date-only
/// start is midnight UTC; a date-only end is the last millisecond of that day.
/// Returns `None` when either bound is unparseable or the range is reversed.
pub fn parse_report_range(start: &str, end: &str) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
    let start = parse_bound(start, false)?;
    let end = parse_bound(end, true)?;
    (start <= end).then_some((start, end))
}

fn parse_bound(raw: &str, end_of_day: bool) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(naive.and_utc());
    }
    let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()?;
    let naive = if end_of_day {
        date.and_hms_milli_opt(23, 59, 59, 999)?
    } else {
        date.and_hms_opt(0, 0, 0)?
    };
    Some(naive.and_utc())
}

/// Send a report for the requested range.
///
/// The report itself only reaches the user as a message; the returned result
/// is a short acknowledgement for the model.
pub async fn generate_report(
    services: &Services,
    user: &User,
    range: &ReportRange,
) -> Result<ActionResult> {
    let phone = user.phone_number.as_str();
    let Some((start, end)) = parse_report_range(&range.start_date, &range.end_date) else {
        warn!(
            "Unparseable report range from {}: {} to {}",
            phone, range.start_date, range.end_date
        );
        services.reply(phone, messages::REPORT_DATES_INVALID).await;
        return Ok(ActionResult::end(
            "Fechas inválidas, se le pidió al usuario que las repita.",
        ));
    };

    let logs = services
        .store
        .food_logs_by_date_range(phone, start, end)
        .await;
    if logs.is_empty() {
        info!("No food logs for {} between {} and {}", phone, start, end);
        services.reply(phone, messages::NO_RECORDS).await;
        return Ok(ActionResult::end(ANSWERED));
    }

    let averages = average_per_entry(&logs);
    services
        .reply(
            phone,
            &messages::report_notice(&range.start_date, &range.end_date),
        )
        .await;

    let prompt = prompts::report_prompt(&range.start_date, &range.end_date, user, &averages, &logs);
    let request = GenerationRequest::new(prompt).with_response_format(tools::description_format());
    let text = match services.generate_object::<Narrative>(request).await {
        Ok(narrative) => narrative.text().map(|body| {
            messages::report_message(&range.start_date, &range.end_date, body)
        }),
        Err(e) => {
            warn!("Report generation failed for {}: {}", phone, e);
            None
        }
    };

    services
        .reply(phone, text.as_deref().unwrap_or(messages::REPORT_FAILED))
        .await;
    Ok(ActionResult::end(ANSWERED))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    #[test]
    fn test_date_only_bounds() {
        let (start, end) = parse_report_range("2024-05-01", "2024-05-07").unwrap();
        assert_eq!(start.to_rfc3339(), "2024-05-01T00:00:00+00:00");
        assert_eq!(end.hour(), 23);
        assert_eq!(end.nanosecond(), 999_000_000);
    }

    #[test]
    fn test_same_day_is_valid() {
        assert!(parse_report_range("2024-05-01", "2024-05-01").is_some());
    }

    #[test]
    fn test_rfc3339_bounds() {
        let (start, end) =
            parse_report_range("2024-05-01T10:00:00-03:00", "2024-05-01T18:00:00Z").unwrap();
        assert_eq!(start.hour(), 13);
        assert_eq!(end.hour(), 18);
        assert!(parse_report_range("2024-05-01T12:00:00Z", "2024-05-01T10:00:00Z").is_none());
    }

    #[test]
    fn test_invalid_or_reversed() {
        assert!(parse_report_range("ayer", "hoy").is_none());
        assert!(parse_report_range("2024-05-07", "2024-05-01").is_none());
        assert!(parse_report_range("2024-13-01", "2024-13-02").is_none());
    }
}
