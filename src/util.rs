use std::sync::LazyLock;

use chrono::{SecondsFormat, Utc};
use regex::Regex;

static JA_DATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d{4})年(\d{1,2})月(\d{1,2})日").unwrap());

/// Finds the first `YYYY年M月D日` in `text` and renders it as `YYYY-MM-DD`.
///
/// No calendar validation is done, `2024年13月1日` becomes `2024-13-01`.
pub fn ja_date_to_iso(text: &str) -> Option<String> {
    let cap = JA_DATE.captures(text)?;
    let year: u32 = cap.get(1)?.as_str().parse().ok()?;
    let month: u32 = cap.get(2)?.as_str().parse().ok()?;
    let day: u32 = cap.get(3)?.as_str().parse().ok()?;

    let iso = format!("{year:04}-{month:02}-{day:02}");
    tracing::debug!(target: "time-converter", "{:?} -> {iso:?}", cap.get(0)?.as_str());

    Some(iso)
}

/// Current UTC time as ISO-8601 with millisecond precision, e.g. `2024-03-05T09:30:00.000Z`.
pub fn now_iso() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}
