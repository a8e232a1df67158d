use crate::models::{Job, Preferences, Source};

const TITLE_KEYWORD: u32 = 25;
const DESCRIPTION_KEYWORD: u32 = 15;
const LOCATION: u32 = 15;
const MODE: u32 = 10;
const EXPERIENCE: u32 = 10;
const SKILL: u32 = 15;
const RECENT: u32 = 5;
const PREFERRED_SOURCE: u32 = 5;

const RECENT_DAYS: u8 = 2;
pub const MAX_SCORE: u8 = 100;

fn normalized(list: &[String]) -> Vec<String> {
    list.iter()
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty())
        .collect()
}

/// Rubric score of `job` against `prefs`, in 0..=100.
///
/// Without role keywords and preferred locations there is no ranking signal
/// and every job scores zero.
pub fn score(job: &Job, prefs: &Preferences) -> u8 {
    let keywords = normalized(&prefs.role_keywords);
    let locations = normalized(&prefs.preferred_locations);
    if keywords.is_empty() && locations.is_empty() {
        return 0;
    }

    let mut total = 0;

    let title = job.title.to_lowercase();
    if keywords.iter().any(|k| title.contains(k.as_str())) {
        total += TITLE_KEYWORD;
    }

    let description = job.description.to_lowercase();
    if keywords.iter().any(|k| description.contains(k.as_str())) {
        total += DESCRIPTION_KEYWORD;
    }

    let location = job.location.to_lowercase();
    if locations.iter().any(|l| *l == location) {
        total += LOCATION;
    }

    let mode = job.mode.as_str().to_lowercase();
    if normalized(&prefs.preferred_mode).iter().any(|m| *m == mode) {
        total += MODE;
    }

    if !prefs.experience_level.is_empty() && prefs.experience_level == job.experience.as_str() {
        total += EXPERIENCE;
    }

    let skills = normalized(&prefs.skills);
    if job.skills.iter().any(|s| skills.contains(&s.to_lowercase())) {
        total += SKILL;
    }

    if job.posted_days_ago <= RECENT_DAYS {
        total += RECENT;
    }

    if job.source == Source::LinkedIn {
        total += PREFERRED_SOURCE;
    }

    total.min(MAX_SCORE as u32) as u8
}

/// Refresh the stored match score of every job.
pub fn rescore_all(jobs: &mut [Job], prefs: &Preferences) {
    for job in jobs.iter_mut() {
        job.match_score = score(job, prefs);
    }
    tracing::debug!(jobs = jobs.len(), "recomputed match scores");
}
