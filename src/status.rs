use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::error::ParseError;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum JobStatus {
    #[default]
    #[serde(rename = "Not Applied")]
    NotApplied,
    Applied,
    Rejected,
    Selected,
}

impl JobStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::NotApplied => "Not Applied",
            JobStatus::Applied => "Applied",
            JobStatus::Rejected => "Rejected",
            JobStatus::Selected => "Selected",
        }
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for JobStatus {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .trim()
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect::<String>()
            .to_lowercase();
        match key.as_str() {
            "notapplied" | "none" => Ok(JobStatus::NotApplied),
            "applied" => Ok(JobStatus::Applied),
            "rejected" => Ok(JobStatus::Rejected),
            "selected" => Ok(JobStatus::Selected),
            _ => Err(ParseError::Status(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusRecord {
    pub status: JobStatus,
    pub date: NaiveDate,
}

/// Latest application status per job. A job without a record is "Not Applied".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StatusTracker {
    records: BTreeMap<String, StatusRecord>,
}

impl StatusTracker {
    pub fn record(&self, job_id: &str) -> Option<&StatusRecord> {
        self.records.get(job_id)
    }

    pub fn status_of(&self, job_id: &str) -> JobStatus {
        self.record(job_id).map(|r| r.status).unwrap_or_default()
    }

    /// Not Applied drops the record; anything else overwrites it with `today`.
    pub fn set_status(&mut self, job_id: &str, status: JobStatus, today: NaiveDate) {
        match status {
            JobStatus::NotApplied => {
                self.records.remove(job_id);
            }
            _ => {
                self.records.insert(
                    job_id.to_string(),
                    StatusRecord { status, date: today },
                );
            }
        }
    }

    /// Records ordered newest first; same-day entries fall back to job id order.
    pub fn recent_updates(&self) -> Vec<(&str, &StatusRecord)> {
        let mut updates: Vec<(&str, &StatusRecord)> = self
            .records
            .iter()
            .map(|(id, record)| (id.as_str(), record))
            .collect();
        updates.sort_by(|a, b| b.1.date.cmp(&a.1.date));
        updates
    }

    /// Forget every record, returning how many were dropped.
    pub fn clear(&mut self) -> usize {
        let dropped = self.records.len();
        self.records.clear();
        dropped
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, d).unwrap()
    }

    #[test]
    fn test_missing_record_defaults_to_not_applied() {
        let tracker = StatusTracker::default();
        assert_eq!(tracker.status_of("job-1"), JobStatus::NotApplied);
        assert!(tracker.record("job-1").is_none());
    }

    #[test]
    fn test_set_status_overwrites_previous_record() {
        let mut tracker = StatusTracker::default();
        tracker.set_status("job-1", JobStatus::Applied, day(1));
        tracker.set_status("job-1", JobStatus::Rejected, day(4));
        let record = tracker.record("job-1").unwrap();
        assert_eq!(record.status, JobStatus::Rejected);
        assert_eq!(record.date, day(4));
        assert_eq!(tracker.recent_updates().len(), 1);
    }

    #[test]
    fn test_not_applied_removes_record() {
        let mut tracker = StatusTracker::default();
        tracker.set_status("job-1", JobStatus::Selected, day(2));
        tracker.set_status("job-1", JobStatus::NotApplied, day(3));
        assert!(tracker.record("job-1").is_none());
        assert_eq!(tracker.status_of("job-1"), JobStatus::NotApplied);
        assert!(tracker.recent_updates().is_empty());
    }

    #[test]
    fn test_not_applied_on_unknown_job_is_noop() {
        let mut tracker = StatusTracker::default();
        tracker.set_status("job-9", JobStatus::NotApplied, day(3));
        assert!(tracker.recent_updates().is_empty());
    }

    #[test]
    fn test_recent_updates_newest_first() {
        let mut tracker = StatusTracker::default();
        tracker.set_status("job-3", JobStatus::Applied, day(1));
        tracker.set_status("job-1", JobStatus::Applied, day(5));
        tracker.set_status("job-2", JobStatus::Rejected, day(5));
        let ids: Vec<&str> = tracker.recent_updates().into_iter().map(|(id, _)| id).collect();
        assert_eq!(ids, vec!["job-1", "job-2", "job-3"]);
    }

    #[test]
    fn test_parse_status_labels() {
        assert_eq!("Not Applied".parse::<JobStatus>().unwrap(), JobStatus::NotApplied);
        assert_eq!("not-applied".parse::<JobStatus>().unwrap(), JobStatus::NotApplied);
        assert_eq!("APPLIED".parse::<JobStatus>().unwrap(), JobStatus::Applied);
        assert!("ghosted".parse::<JobStatus>().is_err());
    }

    #[test]
    fn test_serialized_shape() {
        let mut tracker = StatusTracker::default();
        tracker.set_status("job-1", JobStatus::Applied, day(2));
        let json = serde_json::to_string(&tracker).unwrap();
        assert_eq!(json, r#"{"job-1":{"status":"Applied","date":"2026-03-02"}}"#);
    }
}
