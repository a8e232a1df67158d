use regex::Regex;
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use crate::error::ParseError;
use crate::models::{Job, Source, WorkMode};
use crate::status::{JobStatus, StatusTracker};

static FIRST_INTEGER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+").expect("valid integer pattern"));

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortKey {
    #[default]
    Latest,
    Match,
    Salary,
}

impl SortKey {
    pub const ALL: [SortKey; 3] = [SortKey::Latest, SortKey::Match, SortKey::Salary];

    pub fn as_str(&self) -> &'static str {
        match self {
            SortKey::Latest => "latest",
            SortKey::Match => "match",
            SortKey::Salary => "salary",
        }
    }

    /// Next key in display order, wrapping around.
    pub fn cycle(self) -> SortKey {
        match self {
            SortKey::Latest => SortKey::Match,
            SortKey::Match => SortKey::Salary,
            SortKey::Salary => SortKey::Latest,
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortKey {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SortKey::ALL
            .into_iter()
            .find(|key| key.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ParseError::SortKey(s.to_string()))
    }
}

/// Ephemeral dashboard filters. Never persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterState {
    pub search: String,
    pub location: Option<String>,
    pub mode: Option<WorkMode>,
    pub source: Option<Source>,
    pub status: Option<JobStatus>,
    pub sort: SortKey,
    pub match_only: bool,
}

/// One field of a partial filter update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterChange {
    Search(String),
    Location(Option<String>),
    Mode(Option<WorkMode>),
    Source(Option<Source>),
    Status(Option<JobStatus>),
    Sort(SortKey),
    MatchOnly(bool),
}

impl FilterState {
    pub fn apply(&mut self, change: FilterChange) {
        match change {
            FilterChange::Search(text) => self.search = text,
            FilterChange::Location(location) => self.location = location,
            FilterChange::Mode(mode) => self.mode = mode,
            FilterChange::Source(source) => self.source = source,
            FilterChange::Status(status) => self.status = status,
            FilterChange::Sort(sort) => self.sort = sort,
            FilterChange::MatchOnly(on) => self.match_only = on,
        }
    }

    fn matches(&self, job: &Job, statuses: &StatusTracker, min_match_score: u8) -> bool {
        let needle = self.search.trim().to_lowercase();
        if !needle.is_empty()
            && !job.title.to_lowercase().contains(&needle)
            && !job.company.to_lowercase().contains(&needle)
        {
            return false;
        }
        if self.location.as_ref().is_some_and(|l| *l != job.location) {
            return false;
        }
        if self.mode.is_some_and(|m| m != job.mode) {
            return false;
        }
        if self.source.is_some_and(|s| s != job.source) {
            return false;
        }
        if self.status.is_some_and(|s| s != statuses.status_of(&job.id)) {
            return false;
        }
        if self.match_only && job.match_score < min_match_score {
            return false;
        }
        true
    }
}

/// Result of filtering, keeping "nothing to show" apart from "nothing matched".
#[derive(Debug, PartialEq, Eq)]
pub enum Visible<'a> {
    NoJobs,
    NoMatches { total: usize },
    Jobs(Vec<&'a Job>),
}

impl<'a> Visible<'a> {
    pub fn jobs(&self) -> &[&'a Job] {
        match self {
            Visible::Jobs(jobs) => jobs,
            _ => &[],
        }
    }
}

/// First integer literal in a salary label, e.g. 3 for "3-5 LPA" and 15 for
/// "15k-25k/month". Labels without digits sort as 0.
pub fn salary_figure(label: &str) -> u32 {
    FIRST_INTEGER
        .find(label)
        .and_then(|m| m.as_str().parse().ok())
        .unwrap_or(0)
}

/// Filter and order `jobs` without touching the collection itself.
pub fn visible_jobs<'a>(
    jobs: &'a [Job],
    filter: &FilterState,
    statuses: &StatusTracker,
    min_match_score: u8,
) -> Visible<'a> {
    if jobs.is_empty() {
        return Visible::NoJobs;
    }

    let mut selected: Vec<&Job> = jobs
        .iter()
        .filter(|job| filter.matches(job, statuses, min_match_score))
        .collect();

    match filter.sort {
        SortKey::Latest => selected.sort_by_key(|job| job.posted_days_ago),
        SortKey::Match => selected.sort_by(|a, b| b.match_score.cmp(&a.match_score)),
        SortKey::Salary => selected.sort_by(|a, b| {
            salary_figure(&b.salary_range).cmp(&salary_figure(&a.salary_range))
        }),
    }

    if selected.is_empty() {
        Visible::NoMatches { total: jobs.len() }
    } else {
        Visible::Jobs(selected)
    }
}

/// Saved jobs in collection order. Ids without a matching job are skipped.
pub fn saved_jobs<'a>(jobs: &'a [Job], saved: &BTreeSet<String>) -> Vec<&'a Job> {
    jobs.iter().filter(|job| saved.contains(&job.id)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::generate_jobs;
    use crate::models::Experience;
    use chrono::NaiveDate;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn job(id: &str, days: u8, score: u8, salary: &str) -> Job {
        Job {
            id: id.to_string(),
            title: "React Developer".to_string(),
            company: "Zoho".to_string(),
            location: "Pune".to_string(),
            mode: WorkMode::Hybrid,
            experience: Experience::OneToThree,
            skills: vec!["React".to_string()],
            source: Source::Indeed,
            posted_days_ago: days,
            salary_range: salary.to_string(),
            apply_url: String::new(),
            description: String::new(),
            match_score: score,
        }
    }

    fn ids<'a>(visible: &Visible<'a>) -> Vec<&'a str> {
        visible.jobs().iter().map(|j| j.id.as_str()).collect()
    }

    #[test]
    fn test_empty_collection_is_no_jobs() {
        let filter = FilterState {
            search: "anything".to_string(),
            ..FilterState::default()
        };
        let visible = visible_jobs(&[], &filter, &StatusTracker::default(), 40);
        assert_eq!(visible, Visible::NoJobs);
    }

    #[test]
    fn test_zero_matches_reports_total() {
        let jobs = vec![job("job-1", 0, 10, "3-5 LPA"), job("job-2", 1, 20, "4-6 LPA")];
        let filter = FilterState {
            search: "kotlin".to_string(),
            ..FilterState::default()
        };
        let visible = visible_jobs(&jobs, &filter, &StatusTracker::default(), 40);
        assert_eq!(visible, Visible::NoMatches { total: 2 });
        assert!(visible.jobs().is_empty());
    }

    #[test]
    fn test_search_checks_title_or_company() {
        let mut other = job("job-2", 0, 0, "3-5 LPA");
        other.title = "QA Intern".to_string();
        other.company = "Swiggy".to_string();
        let jobs = vec![job("job-1", 0, 0, "3-5 LPA"), other];

        let by_company = FilterState { search: "SWIG".to_string(), ..FilterState::default() };
        assert_eq!(ids(&visible_jobs(&jobs, &by_company, &StatusTracker::default(), 40)), vec!["job-2"]);

        let by_title = FilterState { search: "react".to_string(), ..FilterState::default() };
        assert_eq!(ids(&visible_jobs(&jobs, &by_title, &StatusTracker::default(), 40)), vec!["job-1"]);
    }

    #[test]
    fn test_location_and_mode_filters_intersect() {
        let mut rng = StdRng::seed_from_u64(21);
        let jobs = generate_jobs(&mut rng, 60);
        let statuses = StatusTracker::default();

        let by_location = FilterState {
            location: Some("Remote".to_string()),
            ..FilterState::default()
        };
        let visible = visible_jobs(&jobs, &by_location, &statuses, 40);
        assert!(visible.jobs().iter().all(|j| j.location == "Remote"));

        let by_both = FilterState {
            location: Some("Pune".to_string()),
            mode: Some(WorkMode::Hybrid),
            ..FilterState::default()
        };
        let visible = visible_jobs(&jobs, &by_both, &statuses, 40);
        assert!(visible.jobs().iter().all(|j| j.location == "Pune" && j.mode == WorkMode::Hybrid));
        let expected = jobs
            .iter()
            .filter(|j| j.location == "Pune" && j.mode == WorkMode::Hybrid)
            .count();
        assert_eq!(visible.jobs().len(), expected);
    }

    #[test]
    fn test_status_filter_treats_missing_as_not_applied() {
        let jobs = vec![job("job-1", 0, 0, "3-5 LPA"), job("job-2", 1, 0, "3-5 LPA")];
        let mut statuses = StatusTracker::default();
        let today = NaiveDate::from_ymd_opt(2026, 1, 5).unwrap();
        statuses.set_status("job-2", JobStatus::Applied, today);

        let not_applied = FilterState { status: Some(JobStatus::NotApplied), ..FilterState::default() };
        assert_eq!(ids(&visible_jobs(&jobs, &not_applied, &statuses, 40)), vec!["job-1"]);

        let applied = FilterState { status: Some(JobStatus::Applied), ..FilterState::default() };
        assert_eq!(ids(&visible_jobs(&jobs, &applied, &statuses, 40)), vec!["job-2"]);
    }

    #[test]
    fn test_match_only_uses_threshold() {
        let jobs = vec![job("job-1", 0, 39, "3-5 LPA"), job("job-2", 0, 40, "3-5 LPA")];
        let filter = FilterState { match_only: true, ..FilterState::default() };
        assert_eq!(ids(&visible_jobs(&jobs, &filter, &StatusTracker::default(), 40)), vec!["job-2"]);
        assert_eq!(visible_jobs(&jobs, &filter, &StatusTracker::default(), 30).jobs().len(), 2);
    }

    #[test]
    fn test_sort_by_match_descending_is_stable() {
        let jobs = vec![
            job("job-1", 0, 20, "3-5 LPA"),
            job("job-2", 1, 60, "3-5 LPA"),
            job("job-3", 2, 20, "3-5 LPA"),
        ];
        let filter = FilterState { sort: SortKey::Match, ..FilterState::default() };
        assert_eq!(
            ids(&visible_jobs(&jobs, &filter, &StatusTracker::default(), 40)),
            vec!["job-2", "job-1", "job-3"]
        );
    }

    #[test]
    fn test_sort_by_latest_ascending() {
        let jobs = vec![job("job-1", 4, 0, "3-5 LPA"), job("job-2", 0, 0, "3-5 LPA")];
        let filter = FilterState::default();
        assert_eq!(ids(&visible_jobs(&jobs, &filter, &StatusTracker::default(), 40)), vec!["job-2", "job-1"]);
    }

    #[test]
    fn test_sort_by_salary_uses_first_integer() {
        let jobs = vec![
            job("job-1", 0, 0, "3-5 LPA"),
            job("job-2", 0, 0, "15k-25k/month"),
            job("job-3", 0, 0, "8-12 LPA"),
            job("job-4", 0, 0, "Best in Industry"),
        ];
        let filter = FilterState { sort: SortKey::Salary, ..FilterState::default() };
        assert_eq!(
            ids(&visible_jobs(&jobs, &filter, &StatusTracker::default(), 40)),
            vec!["job-2", "job-3", "job-1", "job-4"]
        );
    }

    #[test]
    fn test_filtering_leaves_collection_untouched() {
        let jobs = vec![job("job-1", 4, 10, "3-5 LPA"), job("job-2", 0, 90, "8-12 LPA")];
        let before = jobs.clone();
        let filter = FilterState { sort: SortKey::Match, match_only: true, ..FilterState::default() };
        let _ = visible_jobs(&jobs, &filter, &StatusTracker::default(), 40);
        assert_eq!(jobs, before);
    }

    #[test]
    fn test_salary_figure() {
        assert_eq!(salary_figure("3.6-5 LPA"), 3);
        assert_eq!(salary_figure("20k-40k/month"), 20);
        assert_eq!(salary_figure("Best in Industry"), 0);
    }

    #[test]
    fn test_apply_change_and_cycle_sort() {
        let mut filter = FilterState::default();
        filter.apply(FilterChange::Mode(Some(WorkMode::Remote)));
        filter.apply(FilterChange::Sort(filter.sort.cycle()));
        assert_eq!(filter.mode, Some(WorkMode::Remote));
        assert_eq!(filter.sort, SortKey::Match);
        assert_eq!("SALARY".parse::<SortKey>().unwrap(), SortKey::Salary);
    }

    #[test]
    fn test_saved_jobs_keeps_collection_order() {
        let jobs = vec![job("job-1", 0, 0, "3-5 LPA"), job("job-2", 0, 0, "3-5 LPA")];
        let saved: BTreeSet<String> = ["job-2", "job-9"].iter().map(|s| s.to_string()).collect();
        let found: Vec<&str> = saved_jobs(&jobs, &saved).iter().map(|j| j.id.as_str()).collect();
        assert_eq!(found, vec!["job-2"]);
    }
}
