// Dashboard statistics - single-pass counters over the ticket collection
use super::ticket::{Ticket, TicketStatus};
use chrono::{DateTime, Datelike, Duration, Local, NaiveDateTime, NaiveTime};
use serde::Serialize;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DashboardStats {
    pub open_tickets: usize,
    pub new_tickets_this_week: usize,
    pub osw_count: usize,
    pub staffmark_count: usize,
    pub closed_tickets: usize,
}

/// Start of the current week: the most recent Sunday at 00:00:00 local time.
pub fn week_start(now: DateTime<Local>) -> NaiveDateTime {
    let days_since_sunday = now.weekday().num_days_from_sunday() as i64;
    let sunday = now.date_naive() - Duration::days(days_since_sunday);
    sunday.and_time(NaiveTime::MIN)
}

/// Compute the five dashboard counters in one pass. Tickets whose status is
/// neither open nor closed (UNKNOWN, STAGE_*) count toward neither total;
/// tickets without a usable `created_at` are excluded from the weekly count.
pub fn aggregate(tickets: &[Ticket], week_start: NaiveDateTime) -> DashboardStats {
    let mut stats = DashboardStats::default();

    for ticket in tickets {
        if ticket.status.is_open() {
            stats.open_tickets += 1;
        } else if ticket.status.is_closed() {
            stats.closed_tickets += 1;
        }

        match ticket.status {
            TicketStatus::InProcessOsw => stats.osw_count += 1,
            TicketStatus::InProcessStaffmark => stats.staffmark_count += 1,
            _ => {}
        }

        if let Some(created_at) = ticket.created_at {
            if created_at.with_timezone(&Local).naive_local() >= week_start {
                stats.new_tickets_this_week += 1;
            }
        }
    }

    stats
}
