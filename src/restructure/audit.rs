use chrono::{NaiveDate, NaiveDateTime};

use super::text;
use crate::diagnostics::Messages;
use crate::value::RawRecord;

/// The most recent audit date: `(date, date_type)`.
///
/// Dates are ordered chronologically; entries whose date cannot be parsed are
/// skipped with a warning. Ties keep document order, so the later entry wins.
pub(super) fn latest_audit_date(
    records: &[RawRecord],
    messages: &mut Messages,
) -> Option<(NaiveDate, Option<String>)> {
    let mut dated: Vec<(NaiveDate, Option<String>)> = Vec::with_capacity(records.len());
    for record in records {
        let Some(raw) = text(record, "date") else {
            continue;
        };
        match parse_date(&raw) {
            Some(date) => dated.push((date, text(record, "date_type"))),
            None => messages.warn(format!("Skipping audit date '{raw}': not a valid date")),
        }
    }
    dated.sort_by_key(|(date, _)| *date);
    dated.pop()
}

fn parse_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .or_else(|| {
            NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S")
                .ok()
                .map(|dt| dt.date())
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::{RawValue, Value};
    use rstest::rstest;

    fn audit(date: &str, date_type: &str) -> RawRecord {
        [("date", date), ("date_type", date_type)]
            .into_iter()
            .map(|(k, v)| (k.to_string(), RawValue::Scalar(Value::from(v))))
            .collect()
    }

    #[test]
    fn test_latest_date_wins_regardless_of_order() {
        let records = vec![
            audit("2019-07-01", "Level 1: Walk-through"),
            audit("2018-01-01", "Custom"),
        ];
        let mut messages = Messages::new();
        let (date, date_type) = latest_audit_date(&records, &mut messages).unwrap();
        assert_eq!(date.to_string(), "2019-07-01");
        assert_eq!(date_type.as_deref(), Some("Level 1: Walk-through"));
        assert!(messages.is_empty());
    }

    #[test]
    fn test_unparseable_dates_are_skipped() {
        let records = vec![audit("July 2019", "Custom"), audit("2017-03-04T10:00:00", "Other")];
        let mut messages = Messages::new();
        let (date, _) = latest_audit_date(&records, &mut messages).unwrap();
        assert_eq!(date.to_string(), "2017-03-04");
        assert_eq!(messages.warnings, vec!["Skipping audit date 'July 2019': not a valid date"]);
    }

    #[rstest]
    #[case("2019-07-01", true)]
    #[case("2019-07-01T12:30:00", true)]
    #[case("2019-13-01", false)]
    #[case("", false)]
    fn test_parse_date(#[case] raw: &str, #[case] ok: bool) {
        assert_eq!(parse_date(raw).is_some(), ok);
    }

    #[test]
    fn test_no_dates() {
        let mut messages = Messages::new();
        assert!(latest_audit_date(&[], &mut messages).is_none());
    }
}
