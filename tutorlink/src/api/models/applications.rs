//! API models and eligibility rules for the tutor application workflow.

use crate::config::CoinsConfig;
use crate::db::models::applications::{ApplicationDBResponse, ApplicationStatus};
use crate::db::models::posts::PostSubject;
use crate::db::models::teachers::TeacherSubject;
use crate::types::{ApplicationId, PostId, TeacherId, level_index};
use chrono::{DateTime, Datelike, Duration, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// An application record
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ApplicationResponse {
    #[schema(value_type = uuid::Uuid)]
    pub id: ApplicationId,
    #[schema(value_type = uuid::Uuid)]
    pub teacher_id: TeacherId,
    #[schema(value_type = uuid::Uuid)]
    pub post_id: PostId,
    pub status: ApplicationStatus,
    pub application_cost: i64,
    pub applied_at: DateTime<Utc>,
    pub contacted_at: Option<DateTime<Utc>>,
}

impl From<ApplicationDBResponse> for ApplicationResponse {
    fn from(application: ApplicationDBResponse) -> Self {
        Self {
            id: application.id,
            teacher_id: application.teacher_id,
            post_id: application.post_id,
            status: application.status,
            application_cost: application.application_cost,
            applied_at: application.applied_at,
            contacted_at: application.contacted_at,
        }
    }
}

/// The student contact details revealed to the owning tutor
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ContactInformationResponse {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
}

/// Moderation request body
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct ApplicationStatusUpdate {
    pub status: ApplicationStatus,
}

/// Derived statistics over a tutor's applications
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ApplicationStats {
    pub total: usize,
    pub accepted: usize,
    pub rejected: usize,
    pub contacted: usize,
    pub total_coins_spent: i64,
    pub this_week: usize,
    pub this_month: usize,
}

/// A tutor's applications plus their derived statistics
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ApplicationListResponse {
    pub applications: Vec<ApplicationResponse>,
    pub stats: ApplicationStats,
}

impl ApplicationStats {
    /// Pure aggregation over the stored collection, relative to `now`
    pub fn compute(applications: &[ApplicationDBResponse], now: DateTime<Utc>) -> Self {
        let week_ago = now - Duration::days(7);
        let month_start = now
            .date_naive()
            .with_day(1)
            .map(|d| d.and_hms_opt(0, 0, 0).expect("midnight exists").and_utc())
            .unwrap_or(now);

        Self {
            total: applications.len(),
            accepted: applications.iter().filter(|a| a.status == ApplicationStatus::Accepted).count(),
            rejected: applications.iter().filter(|a| a.status == ApplicationStatus::Rejected).count(),
            contacted: applications.iter().filter(|a| a.status == ApplicationStatus::Contacted).count(),
            total_coins_spent: applications.iter().map(|a| a.application_cost).sum(),
            this_week: applications.iter().filter(|a| a.applied_at >= week_ago).count(),
            this_month: applications.iter().filter(|a| a.applied_at >= month_start).count(),
        }
    }
}

/// Application cost as a function of post complexity, bounded to
/// [base, cap].
///
/// An earlier revision capped this at the base cost, collapsing the whole
/// formula to a constant 40 despite advertising a 40-70 range; the cap now
/// lives in `application_cost_cap` (70 by default).
pub fn application_cost(coins: &CoinsConfig, subjects_on_post: usize) -> i64 {
    let billable = subjects_on_post.min(coins.application_max_billable_subjects) as i64;
    (coins.application_base_cost + billable * coins.application_per_subject_cost).min(coins.application_cost_cap)
}

/// Does the tutor's level interval cover the post's required level?
///
/// Both endpoints and the required level are positions on the fixed ordered
/// scale; unknown level names never match.
pub fn level_covers(subject: &TeacherSubject, post_level: &str) -> bool {
    let (Some(from), Some(to), Some(level)) = (
        level_index(&subject.from_level),
        level_index(&subject.to_level),
        level_index(post_level),
    ) else {
        return false;
    };
    from <= level && level <= to
}

/// At least one tutor subject whose name matches a post subject
/// (case-insensitive) and whose level interval covers the post's level
pub fn subjects_match(teacher_subjects: &[TeacherSubject], post_subjects: &[PostSubject]) -> bool {
    teacher_subjects.iter().any(|ts| {
        post_subjects
            .iter()
            .any(|ps| ts.name.eq_ignore_ascii_case(&ps.name) && level_covers(ts, &ps.level))
    })
}

/// At least one language in common (case-insensitive)
pub fn languages_intersect(teacher_languages: &[String], post_languages: &[String]) -> bool {
    teacher_languages
        .iter()
        .any(|tl| post_languages.iter().any(|pl| tl.eq_ignore_ascii_case(pl)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn subject(name: &str, from: &str, to: &str) -> TeacherSubject {
        TeacherSubject {
            name: name.to_string(),
            from_level: from.to_string(),
            to_level: to.to_string(),
        }
    }

    fn post_subject(name: &str, level: &str) -> PostSubject {
        PostSubject {
            name: name.to_string(),
            level: level.to_string(),
        }
    }

    #[test]
    fn cost_scales_with_subject_count_up_to_three() {
        let coins = CoinsConfig::default();
        assert_eq!(application_cost(&coins, 0), 40);
        assert_eq!(application_cost(&coins, 1), 50);
        assert_eq!(application_cost(&coins, 2), 60);
        assert_eq!(application_cost(&coins, 3), 70);
        // Additional subjects beyond three don't raise the price
        assert_eq!(application_cost(&coins, 10), 70);
    }

    #[test]
    fn cost_stays_within_the_advertised_bounds() {
        // An earlier revision capped at the base cost, making every post
        // cost a flat 40; this pins the corrected 40-70 range.
        let coins = CoinsConfig::default();
        for n in 0..20 {
            let cost = application_cost(&coins, n);
            assert!((40..=70).contains(&cost), "cost {cost} out of bounds for {n} subjects");
        }
    }

    #[test]
    fn level_interval_must_contain_the_post_level() {
        let s = subject("Physics", "Grade 5", "Grade 10");
        assert!(level_covers(&s, "Grade 5"));
        assert!(level_covers(&s, "Grade 7"));
        assert!(level_covers(&s, "Grade 10"));
        assert!(!level_covers(&s, "Grade 4"));
        assert!(!level_covers(&s, "Grade 11"));
        assert!(!level_covers(&s, "Nursery"));
    }

    #[test]
    fn subject_match_is_case_insensitive_and_level_aware() {
        let teacher = vec![subject("physics", "Grade 5", "Grade 10")];

        assert!(subjects_match(&teacher, &[post_subject("Physics", "Grade 8")]));
        // Name matches but the level is outside the interval
        assert!(!subjects_match(&teacher, &[post_subject("Physics", "Grade 12")]));
        // Level fits but the subject differs
        assert!(!subjects_match(&teacher, &[post_subject("Chemistry", "Grade 8")]));
        // One of several post subjects is enough
        assert!(subjects_match(
            &teacher,
            &[post_subject("Chemistry", "Grade 8"), post_subject("PHYSICS", "Grade 9")]
        ));
    }

    #[test]
    fn language_intersection() {
        let teacher = vec!["English".to_string(), "Urdu".to_string()];
        assert!(languages_intersect(&teacher, &["urdu".to_string()]));
        assert!(!languages_intersect(&teacher, &["French".to_string()]));
        assert!(!languages_intersect(&teacher, &[]));
    }

    #[test]
    fn stats_aggregate_counts_and_spend() {
        let now = Utc::now();
        let mk = |status, cost, days_ago| ApplicationDBResponse {
            id: Uuid::new_v4(),
            teacher_id: Uuid::new_v4(),
            post_id: Uuid::new_v4(),
            status,
            application_cost: cost,
            applied_at: now - Duration::days(days_ago),
            contacted_at: None,
        };

        let applications = vec![
            mk(ApplicationStatus::Accepted, 40, 1),
            mk(ApplicationStatus::Contacted, 70, 3),
            mk(ApplicationStatus::Rejected, 50, 100),
        ];

        let stats = ApplicationStats::compute(&applications, now);
        assert_eq!(stats.total, 3);
        assert_eq!(stats.accepted, 1);
        assert_eq!(stats.contacted, 1);
        assert_eq!(stats.rejected, 1);
        assert_eq!(stats.total_coins_spent, 160);
        assert_eq!(stats.this_week, 2);
        // The 100-day-old application is in no recent bucket
        assert!(stats.this_month >= 2);
    }
}
