//! Workout log book: newest entry first, never re-sorted.

use crate::{DayId, WorkoutLog};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Short random id for a log entry. Uniqueness is best-effort.
pub fn new_log_id() -> String {
    let mut id = Uuid::new_v4().simple().to_string();
    id.truncate(8);
    id
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WorkoutLogBook {
    logs: Vec<WorkoutLog>,
}

impl WorkoutLogBook {
    pub fn from_logs(logs: Vec<WorkoutLog>) -> Self {
        Self { logs }
    }

    /// Prepend a log
    pub fn append(&self, log: WorkoutLog) -> Self {
        let mut logs = Vec::with_capacity(self.logs.len() + 1);
        logs.push(log);
        logs.extend(self.logs.iter().cloned());
        Self { logs }
    }

    pub fn entries(&self) -> &[WorkoutLog] {
        &self.logs
    }

    pub fn latest(&self) -> Option<&WorkoutLog> {
        self.logs.first()
    }

    /// Logs recorded against a plan day, newest first
    pub fn for_day(&self, day: DayId) -> impl Iterator<Item = &WorkoutLog> {
        self.logs.iter().filter(move |l| l.day_id == Some(day))
    }

    pub fn total_minutes(&self) -> u64 {
        self.logs.iter().map(|l| u64::from(l.duration)).sum()
    }

    pub fn total_calories(&self) -> u64 {
        self.logs
            .iter()
            .filter_map(|l| l.calories)
            .map(u64::from)
            .sum()
    }

    pub fn len(&self) -> usize {
        self.logs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.logs.is_empty()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use chrono::NaiveDate;

    pub(crate) fn log(date: &str, name: &str, duration: u32) -> WorkoutLog {
        WorkoutLog {
            id: new_log_id(),
            date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
            day_id: None,
            day_name: name.into(),
            focus: "Strength".into(),
            duration,
            notes: None,
            image_url: None,
            calories: None,
        }
    }

    #[test]
    fn test_append_prepends_without_sorting() {
        let book = WorkoutLogBook::default()
            .append(log("2024-01-10", "first", 30))
            .append(log("2024-01-01", "second", 45));

        let names: Vec<&str> = book.entries().iter().map(|l| l.day_name.as_str()).collect();
        // Newest insertion first even though its date is older
        assert_eq!(names, vec!["second", "first"]);
        assert_eq!(book.latest().unwrap().day_name, "second");
    }

    #[test]
    fn test_log_id_shape() {
        let id = new_log_id();
        assert_eq!(id.len(), 8);
        assert!(id.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(new_log_id(), new_log_id());
    }

    #[test]
    fn test_totals_and_day_lookup() {
        let monday = DayId::new(0, 0);
        let mut planned = log("2024-01-02", "Monday", 40);
        planned.day_id = Some(monday);
        planned.calories = Some(300);

        let book = WorkoutLogBook::default()
            .append(planned)
            .append(log("2024-01-03", "Run", 25));

        assert_eq!(book.total_minutes(), 65);
        assert_eq!(book.total_calories(), 300);
        assert_eq!(book.for_day(monday).count(), 1);
        assert_eq!(book.for_day(DayId::new(0, 1)).count(), 0);
    }

    #[test]
    fn test_serializes_with_camel_case_fields() {
        let mut entry = log("2024-01-02", "Monday", 40);
        entry.day_id = Some(DayId::new(1, 2));
        let json = serde_json::to_value(WorkoutLogBook::from_logs(vec![entry])).unwrap();
        assert_eq!(json[0]["dayId"], "w1-d2");
        assert_eq!(json[0]["dayName"], "Monday");
        assert!(json[0].get("calories").is_none());
    }
}
