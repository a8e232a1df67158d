use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use rand::seq::SliceRandom;
use rand::Rng;

use crate::models::{Experience, Job, WorkMode, Source};

pub const DEFAULT_JOB_COUNT: usize = 60;

const COMPANIES: [&str; 30] = [
    "Infosys", "TCS", "Wipro", "Accenture", "Capgemini", "Cognizant", "IBM", "Oracle", "SAP", "Dell",
    "Amazon", "Flipkart", "Swiggy", "Razorpay", "PhonePe", "Paytm", "Zoho", "Freshworks", "Juspay", "CRED",
    "Zerodha", "Groww", "HDFC Bank", "ICICI Bank", "Jio Platforms", "Reliance Retail", "MakeMyTrip", "Zomato",
    "Urban Company", "Meesho",
];

const ROLES: [(&str, Experience); 12] = [
    ("SDE Intern", Experience::Fresher),
    ("Graduate Engineer Trainee", Experience::Fresher),
    ("Junior Backend Developer", Experience::ZeroToOne),
    ("Frontend Intern", Experience::Fresher),
    ("QA Intern", Experience::Fresher),
    ("Data Analyst Intern", Experience::Fresher),
    ("Java Developer", Experience::ZeroToOne),
    ("Python Developer", Experience::Fresher),
    ("React Developer", Experience::OneToThree),
    ("Full Stack Developer", Experience::OneToThree),
    ("DevOps Engineer", Experience::OneToThree),
    ("Product Designer", Experience::ZeroToOne),
];

pub const LOCATIONS: [&str; 8] = [
    "Bangalore", "Hyderabad", "Pune", "Chennai", "Gurgaon", "Noida", "Mumbai", "Remote",
];

pub const SKILL_POOL: [&str; 5] = ["Java", "Python", "React", "SQL", "AWS"];

const SKILLS_PER_JOB: usize = 3;
const MAX_POSTED_DAYS_AGO: u8 = 9;

fn salaries_for(experience: Experience) -> &'static [&'static str] {
    match experience {
        Experience::Fresher => &["3-5 LPA", "4-6 LPA", "15k-25k/month", "20k-40k/month", "3.6-5 LPA"],
        Experience::ZeroToOne => &["4-7 LPA", "5-8 LPA", "6-10 LPA", "5-9 LPA"],
        Experience::OneToThree => &["8-12 LPA", "10-15 LPA", "12-18 LPA", "10-20 LPA", "7-11 LPA"],
    }
}

fn pick<'a, T, R: Rng + ?Sized>(rng: &mut R, items: &'a [T]) -> &'a T {
    &items[rng.gen_range(0..items.len())]
}

fn describe(title: &str, company: &str) -> String {
    format!(
        "{company} is looking for a talented {title} to join our dynamic team. \
         You will work on cutting-edge technologies and contribute to scalable products. \
         Key responsibilities include designing, developing, and deploying software solutions. \
         Strong problem-solving skills and a passion for technology are must-haves. \
         This is an excellent opportunity to grow your career in a fast-paced environment."
    )
}

/// Characters left as-is inside a URI component.
const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

fn search_url(title: &str, company: &str) -> String {
    let query = format!("{} {} jobs", title, company);
    format!(
        "https://www.google.com/search?q={}",
        utf8_percent_encode(&query, COMPONENT)
    )
}

/// Build one posting. Remote locations always yield Remote work mode.
fn generate_job<R: Rng + ?Sized>(rng: &mut R, index: usize) -> Job {
    let (title, experience) = *pick(rng, &ROLES);
    let company = *pick(rng, &COMPANIES);
    let location = *pick(rng, &LOCATIONS);
    let sampled_mode = *pick(rng, &WorkMode::ALL);
    let mode = if location == "Remote" { WorkMode::Remote } else { sampled_mode };
    let salary = *pick(rng, salaries_for(experience));

    let mut skills: Vec<String> = SKILL_POOL.iter().map(|s| s.to_string()).collect();
    skills.shuffle(rng);
    skills.truncate(SKILLS_PER_JOB);

    Job {
        id: format!("job-{}", index),
        title: title.to_string(),
        company: company.to_string(),
        location: location.to_string(),
        mode,
        experience,
        skills,
        source: *pick(rng, &Source::ALL),
        posted_days_ago: rng.gen_range(0..=MAX_POSTED_DAYS_AGO),
        salary_range: salary.to_string(),
        apply_url: search_url(title, company),
        description: describe(title, company),
        match_score: 0,
    }
}

/// Generate `count` postings, freshest first.
pub fn generate_jobs<R: Rng + ?Sized>(rng: &mut R, count: usize) -> Vec<Job> {
    let mut jobs: Vec<Job> = (1..=count).map(|i| generate_job(rng, i)).collect();
    jobs.sort_by_key(|job| job.posted_days_ago);
    tracing::debug!(count = jobs.len(), "generated synthetic job dataset");
    jobs
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    fn sample(seed: u64) -> Vec<Job> {
        let mut rng = StdRng::seed_from_u64(seed);
        generate_jobs(&mut rng, DEFAULT_JOB_COUNT)
    }

    #[test]
    fn test_generates_requested_count_with_unique_ids() {
        let jobs = sample(7);
        assert_eq!(jobs.len(), 60);
        let ids: HashSet<&str> = jobs.iter().map(|j| j.id.as_str()).collect();
        assert_eq!(ids.len(), 60);
    }

    #[test]
    fn test_sorted_freshest_first() {
        let jobs = sample(11);
        assert!(jobs.windows(2).all(|w| w[0].posted_days_ago <= w[1].posted_days_ago));
        assert!(jobs.iter().all(|j| j.posted_days_ago <= 9));
    }

    #[test]
    fn test_remote_location_forces_remote_mode() {
        for seed in 0..20 {
            for job in sample(seed) {
                if job.location == "Remote" {
                    assert_eq!(job.mode, WorkMode::Remote, "{} at {}", job.id, job.location);
                }
            }
        }
    }

    #[test]
    fn test_three_distinct_skills_from_pool() {
        for job in sample(3) {
            assert_eq!(job.skills.len(), 3);
            let unique: HashSet<&String> = job.skills.iter().collect();
            assert_eq!(unique.len(), 3);
            assert!(job.skills.iter().all(|s| SKILL_POOL.contains(&s.as_str())));
        }
    }

    #[test]
    fn test_salary_matches_experience_tier() {
        for job in sample(5) {
            assert!(salaries_for(job.experience).contains(&job.salary_range.as_str()));
        }
    }

    #[test]
    fn test_same_seed_reproduces_dataset() {
        assert_eq!(sample(42), sample(42));
    }

    #[test]
    fn test_search_url_is_encoded() {
        let url = search_url("SDE Intern", "HDFC Bank");
        assert_eq!(url, "https://www.google.com/search?q=SDE%20Intern%20HDFC%20Bank%20jobs");

        let url = search_url("C++ Dev (Backend)", "Café & Co");
        assert_eq!(
            url,
            "https://www.google.com/search?q=C%2B%2B%20Dev%20(Backend)%20Caf%C3%A9%20%26%20Co%20jobs"
        );
    }

    #[test]
    fn test_description_mentions_company_and_role() {
        let text = describe("QA Intern", "Zoho");
        assert!(text.starts_with("Zoho is looking for a talented QA Intern"));
    }
}
