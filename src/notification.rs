//! Deadline notifications
//!
//! Compares a fixed compliance calendar against the current time. Each
//! deadline falls due at the start of the last day of its month:
//! - past due: "OVERDUE" urgent notification
//! - within 30 days: urgent
//! - within 60 days: warning
//! - otherwise nothing

use chrono::{Duration, Local, NaiveDate, NaiveDateTime};

use crate::types::{Notification, Severity};

const URGENT_WITHIN_DAYS: i64 = 30;
const WARNING_WITHIN_DAYS: i64 = 60;
const NOTIFICATION_HREF: &str = "/compliance";

const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

#[derive(Debug, Clone, Copy)]
pub struct Deadline {
    pub task: &'static str,
    pub month: u32,
    pub year: i32,
    pub category: &'static str,
}

impl Deadline {
    const fn new(task: &'static str, month: u32, year: i32, category: &'static str) -> Self {
        Self {
            task,
            month,
            year,
            category,
        }
    }

    /// "June 2026"
    pub fn label(&self) -> String {
        let month = MONTH_NAMES
            .get(self.month.saturating_sub(1) as usize)
            .copied()
            .unwrap_or("");
        format!("{} {}", month, self.year)
    }

    /// Midnight at the start of the month's last day.
    pub fn due(&self) -> Option<NaiveDateTime> {
        let (next_year, next_month) = if self.month == 12 {
            (self.year + 1, 1)
        } else {
            (self.year, self.month + 1)
        };
        let last_day = NaiveDate::from_ymd_opt(next_year, next_month, 1)? - Duration::days(1);
        last_day.and_hms_opt(0, 0, 0)
    }
}

pub const DEADLINES: [Deadline; 6] = [
    Deadline::new("Annual Financial Review/Audit", 6, 2026, "Financial"),
    Deadline::new("Officer Elections at Annual Meeting", 6, 2026, "Governance"),
    Deadline::new("Budget Approval by Membership", 7, 2026, "Financial"),
    Deadline::new("WA SOS Annual Report Filing", 9, 2026, "State"),
    Deadline::new("IRS 990N (e-Postcard) Filing", 11, 2026, "IRS"),
    Deadline::new("Insurance Policy Renewal", 1, 2027, "Insurance"),
];

/// Whole days until `due`, rounded up.
fn days_until(due: NaiveDateTime, now: NaiveDateTime) -> i64 {
    let seconds = (due - now).num_seconds() as f64;
    (seconds / 86_400.0).ceil() as i64
}

fn notify(deadline: &Deadline, now: NaiveDateTime) -> Option<Notification> {
    let days = days_until(deadline.due()?, now);
    let label = deadline.label();

    let (id_prefix, title, description, severity) = if days < 0 {
        (
            "overdue",
            format!("OVERDUE: {}", deadline.task),
            format!("Was due {} - {} days overdue", label, days.abs()),
            Severity::Urgent,
        )
    } else if days <= URGENT_WITHIN_DAYS {
        (
            "urgent",
            deadline.task.to_string(),
            format!("Due {} - {} days remaining", label, days),
            Severity::Urgent,
        )
    } else if days <= WARNING_WITHIN_DAYS {
        (
            "warning",
            deadline.task.to_string(),
            format!("Due {} - {} days remaining", label, days),
            Severity::Warning,
        )
    } else {
        return None;
    };

    Some(Notification {
        id: format!("{}-{}", id_prefix, deadline.task),
        title,
        description,
        category: deadline.category.to_string(),
        severity,
        href: NOTIFICATION_HREF.to_string(),
    })
}

/// Notifications for a calendar as of `now`.
pub fn notifications_for(deadlines: &[Deadline], now: NaiveDateTime) -> Vec<Notification> {
    deadlines.iter().filter_map(|d| notify(d, now)).collect()
}

pub fn notifications_at(now: NaiveDateTime) -> Vec<Notification> {
    notifications_for(&DEADLINES, now)
}

/// Notifications as of the local wall clock.
pub fn notifications() -> Vec<Notification> {
    notifications_at(Local::now().naive_local())
}
