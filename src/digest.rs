use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::Job;

pub const DEFAULT_DIGEST_SIZE: usize = 10;

/// A dated, frozen top-N ranking. Scores inside are the ones at generation time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DigestSnapshot {
    pub date: NaiveDate,
    pub jobs: Vec<Job>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DigestOutcome {
    /// A snapshot for the date already existed and was returned untouched.
    Existing(DigestSnapshot),
    Generated(DigestSnapshot),
    /// No keywords and no locations: every score would be zero.
    PreferencesRequired,
}

impl DigestOutcome {
    pub fn snapshot(&self) -> Option<&DigestSnapshot> {
        match self {
            DigestOutcome::Existing(s) | DigestOutcome::Generated(s) => Some(s),
            DigestOutcome::PreferencesRequired => None,
        }
    }
}

/// Highest score first; equal scores favour the fresher posting.
pub fn rank(jobs: &[Job], size: usize) -> Vec<Job> {
    let mut ranked: Vec<Job> = jobs.to_vec();
    ranked.sort_by(|a, b| {
        b.match_score
            .cmp(&a.match_score)
            .then(a.posted_days_ago.cmp(&b.posted_days_ago))
    });
    ranked.truncate(size);
    ranked
}

impl DigestSnapshot {
    pub fn build(date: NaiveDate, jobs: &[Job], size: usize) -> Self {
        Self {
            date,
            jobs: rank(jobs, size),
        }
    }

    /// Plain-text body suitable for pasting into an email.
    pub fn to_plain_text(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!("Top {} Jobs For You - 9AM Digest\n", self.jobs.len()));
        out.push_str(&format!("{}\n\n", self.date.format("%A, %B %-d, %Y")));
        for (i, job) in self.jobs.iter().enumerate() {
            out.push_str(&format!("{}. {} - {}\n", i + 1, job.title, job.company));
            out.push_str(&format!(
                "   {} | {} | Match: {}%\n",
                job.location, job.experience, job.match_score
            ));
            out.push_str(&format!("   Apply: {}\n\n", job.apply_url));
        }
        out.push_str("This digest was generated based on your preferences.\n");
        out
    }
}
