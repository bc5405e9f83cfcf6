// Chart data builders - shape the ticket collection into render-ready payloads
//
// Each builder derives one self-contained document of the form
// `{"data": [...traces...], "layout": {...}}`, serialized to a string for the
// rendering layer. The four builders are independent and share no state.
use crate::domain::dashboard::DashboardCharts;
use crate::domain::ticket::{Ticket, TicketStatus};
use chrono::{DateTime, Local, NaiveDate, Utc};
use serde_json::json;

const AGE_BUCKETS: [(&str, i64, i64); 7] = [
    ("0-17", 0, 17),
    ("18-24", 18, 24),
    ("25-34", 25, 34),
    ("35-44", 35, 44),
    ("45-54", 45, 54),
    ("55-64", 55, 64),
    ("65+", 65, 120),
];

/// Build all four chart payloads over the same collection.
pub fn build_charts(tickets: &[Ticket]) -> anyhow::Result<DashboardCharts> {
    let today = Local::now().date_naive();
    Ok(DashboardCharts {
        resource_support: resource_support_chart(tickets)?,
        service_distribution: service_distribution_chart(tickets)?,
        crisis_wish: crisis_wish_chart(tickets)?,
        age_histogram: age_histogram_chart(tickets, today)?,
    })
}

/// Two-bar snapshot of the resource-support queue, each bar labeled with its
/// literal count.
pub fn resource_support_chart(tickets: &[Ticket]) -> anyhow::Result<String> {
    let resource = tickets
        .iter()
        .filter(|t| t.status == TicketStatus::ResourceSupport)
        .count();
    let waiting = tickets
        .iter()
        .filter(|t| t.status == TicketStatus::WaitingForResponse)
        .count();

    let document = json!({
        "data": [{
            "type": "bar",
            "x": ["Resource Support", "Waiting for Response"],
            "y": [resource, waiting],
            "text": [resource.to_string(), waiting.to_string()],
            "textposition": "auto",
        }],
        "layout": {
            "title": "Resource Support Snapshot",
            "yaxis": {"title": "Tickets"},
        },
    });
    Ok(serde_json::to_string(&document)?)
}

/// Pie of tickets grouped by `service_provided`. Records with a missing,
/// empty, or literal `"null"` value contribute to no slice. Slice order is
/// first-seen order, so the trace disables renderer-side sorting.
pub fn service_distribution_chart(tickets: &[Ticket]) -> anyhow::Result<String> {
    let mut slices: Vec<(String, u64)> = Vec::new();
    for ticket in tickets {
        let Some(service) = ticket.service_provided.as_deref() else {
            continue;
        };
        if service.is_empty() || service == "null" {
            continue;
        }
        match slices.iter_mut().find(|(name, _)| name == service) {
            Some((_, count)) => *count += 1,
            None => slices.push((service.to_string(), 1)),
        }
    }

    let labels: Vec<&str> = slices.iter().map(|(name, _)| name.as_str()).collect();
    let values: Vec<u64> = slices.iter().map(|(_, count)| *count).collect();

    let document = json!({
        "data": [{
            "type": "pie",
            "labels": labels,
            "values": values,
            "sort": false,
        }],
        "layout": {
            "title": "Services Provided",
        },
    });
    Ok(serde_json::to_string(&document)?)
}

/// Running tally of granted crisis wishes: ticket count and cumulative amount
/// over time, on independent y-scales. Only tickets with both a parsable
/// amount and a creation timestamp participate; the rest are skipped.
pub fn crisis_wish_chart(tickets: &[Ticket]) -> anyhow::Result<String> {
    let mut entries: Vec<(DateTime<Utc>, f64)> = tickets
        .iter()
        .filter_map(|t| {
            let amount = t.crisis_wish.as_deref()?.trim().parse::<f64>().ok()?;
            Some((t.created_at?, amount))
        })
        .collect();
    entries.sort_by_key(|(created_at, _)| *created_at);

    let mut dates = Vec::with_capacity(entries.len());
    let mut counts = Vec::with_capacity(entries.len());
    let mut totals = Vec::with_capacity(entries.len());
    let mut running_total = 0.0;
    for (index, (created_at, amount)) in entries.iter().enumerate() {
        running_total += amount;
        dates.push(
            created_at
                .with_timezone(&Local)
                .date_naive()
                .format("%Y-%m-%d")
                .to_string(),
        );
        counts.push(index + 1);
        totals.push(running_total);
    }

    let document = json!({
        "data": [
            {
                "type": "scatter",
                "mode": "lines+markers",
                "name": "Wishes Granted",
                "x": dates,
                "y": counts,
            },
            {
                "type": "scatter",
                "mode": "lines+markers",
                "name": "Cumulative Amount",
                "x": dates,
                "y": totals,
                "yaxis": "y2",
            },
        ],
        "layout": {
            "title": "Crisis Wish Running Tally",
            "yaxis": {"title": "Wish Count"},
            "yaxis2": {"title": "Amount", "overlaying": "y", "side": "right"},
        },
    });
    Ok(serde_json::to_string(&document)?)
}

/// Horizontal histogram of ticket-holder ages in seven fixed ranges. Ages are
/// whole years on a 365.25-day basis; values outside [0, 120] and malformed
/// birthdays are discarded. Empty buckets are omitted; with no valid ages at
/// all the payload carries an explicit empty marker instead of zero bars.
pub fn age_histogram_chart(tickets: &[Ticket], today: NaiveDate) -> anyhow::Result<String> {
    let mut bucket_counts = [0u64; AGE_BUCKETS.len()];
    for ticket in tickets {
        let Some(age) = ticket
            .birthday
            .as_deref()
            .and_then(|raw| age_in_years(raw, today))
        else {
            continue;
        };
        if let Some(index) = AGE_BUCKETS
            .iter()
            .position(|(_, low, high)| (*low..=*high).contains(&age))
        {
            bucket_counts[index] += 1;
        }
    }

    let labels: Vec<&str> = AGE_BUCKETS
        .iter()
        .zip(bucket_counts)
        .filter(|(_, count)| *count > 0)
        .map(|((label, _, _), _)| *label)
        .collect();
    let counts: Vec<u64> = bucket_counts.into_iter().filter(|c| *c > 0).collect();

    let document = if counts.is_empty() {
        json!({
            "data": [],
            "layout": {
                "title": "Age Distribution",
                "annotations": [{
                    "text": "No age data available",
                    "showarrow": false,
                    "xref": "paper",
                    "yref": "paper",
                }],
            },
        })
    } else {
        json!({
            "data": [{
                "type": "bar",
                "orientation": "h",
                "y": labels,
                "x": counts,
            }],
            "layout": {
                "title": "Age Distribution",
                "xaxis": {"title": "Tickets"},
            },
        })
    };
    Ok(serde_json::to_string(&document)?)
}

fn age_in_years(birthday: &str, today: NaiveDate) -> Option<i64> {
    let birthday = NaiveDate::parse_from_str(birthday.trim(), "%Y-%m-%d").ok()?;
    let days = (today - birthday).num_days();
    Some((days as f64 / 365.25).floor() as i64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use serde_json::Value;

    fn ticket(id: &str, status: TicketStatus) -> Ticket {
        Ticket::new(id.to_string(), status)
    }

    fn parse(payload: &str) -> Value {
        serde_json::from_str(payload).expect("chart payload is valid JSON")
    }

    /// Birthday string that yields exactly `years` whole years as of `today`.
    fn birthday_for_age(today: NaiveDate, years: i64) -> String {
        let days = (years as f64 * 365.25).ceil() as i64;
        (today - Duration::days(days)).format("%Y-%m-%d").to_string()
    }

    #[test]
    fn test_resource_support_counts_and_text_labels() {
        let tickets = vec![
            ticket("1", TicketStatus::ResourceSupport),
            ticket("2", TicketStatus::ResourceSupport),
            ticket("3", TicketStatus::WaitingForResponse),
            ticket("4", TicketStatus::New),
        ];
        let doc = parse(&resource_support_chart(&tickets).unwrap());
        let trace = &doc["data"][0];
        assert_eq!(trace["x"], json!(["Resource Support", "Waiting for Response"]));
        assert_eq!(trace["y"], json!([2, 1]));
        assert_eq!(trace["text"], json!(["2", "1"]));
    }

    #[test]
    fn test_service_distribution_excludes_blank_and_null() {
        let mut a = ticket("1", TicketStatus::New);
        a.service_provided = Some("Housing".to_string());
        let mut b = ticket("2", TicketStatus::New);
        b.service_provided = Some("Food".to_string());
        let mut c = ticket("3", TicketStatus::New);
        c.service_provided = Some("Housing".to_string());
        let mut blank = ticket("4", TicketStatus::New);
        blank.service_provided = Some("".to_string());
        let mut null_text = ticket("5", TicketStatus::New);
        null_text.service_provided = Some("null".to_string());
        let absent = ticket("6", TicketStatus::New);

        let doc = parse(
            &service_distribution_chart(&[a, b, c, blank, null_text, absent]).unwrap(),
        );
        let trace = &doc["data"][0];
        // First-seen order, renderer sorting disabled
        assert_eq!(trace["labels"], json!(["Housing", "Food"]));
        assert_eq!(trace["values"], json!([2, 1]));
        assert_eq!(trace["sort"], json!(false));
    }

    #[test]
    fn test_crisis_wish_running_tally_is_sorted_and_cumulative() {
        let base = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        let mut late = ticket("1", TicketStatus::New);
        late.created_at = Some(base + Duration::days(10));
        late.crisis_wish = Some("250.50".to_string());
        let mut early = ticket("2", TicketStatus::New);
        early.created_at = Some(base);
        early.crisis_wish = Some("100".to_string());
        let mut middle = ticket("3", TicketStatus::New);
        middle.created_at = Some(base + Duration::days(5));
        middle.crisis_wish = Some("50".to_string());
        let mut unparsable = ticket("4", TicketStatus::New);
        unparsable.created_at = Some(base + Duration::days(1));
        unparsable.crisis_wish = Some("a lot".to_string());
        let mut no_date = ticket("5", TicketStatus::New);
        no_date.crisis_wish = Some("75".to_string());

        let doc = parse(
            &crisis_wish_chart(&[late, early, middle, unparsable, no_date]).unwrap(),
        );
        let counts = doc["data"][0]["y"].as_array().unwrap();
        let totals = doc["data"][1]["y"].as_array().unwrap();

        // Strictly increasing tally, one per included record
        assert_eq!(counts, &vec![json!(1), json!(2), json!(3)]);
        // Cumulative sum in chronological order, monotonically non-decreasing
        let totals: Vec<f64> = totals.iter().map(|v| v.as_f64().unwrap()).collect();
        assert_eq!(totals, vec![100.0, 150.0, 400.5]);
        assert!(totals.windows(2).all(|w| w[0] <= w[1]));
        // Secondary axis for the monetary series
        assert_eq!(doc["data"][1]["yaxis"], json!("y2"));
        assert_eq!(doc["layout"]["yaxis2"]["overlaying"], json!("y"));
    }

    #[test]
    fn test_crisis_wish_x_axis_is_calendar_days() {
        let mut t = ticket("1", TicketStatus::New);
        t.created_at = Some(Utc.with_ymd_and_hms(2024, 6, 15, 9, 30, 0).unwrap());
        t.crisis_wish = Some("10".to_string());

        let doc = parse(&crisis_wish_chart(&[t]).unwrap());
        let day = doc["data"][0]["x"][0].as_str().unwrap();
        assert_eq!(day.len(), 10);
        assert!(NaiveDate::parse_from_str(day, "%Y-%m-%d").is_ok());
    }

    #[test]
    fn test_age_bucket_edges() {
        let today = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        let mut seventeen = ticket("1", TicketStatus::New);
        seventeen.birthday = Some(birthday_for_age(today, 17));
        let mut eighteen = ticket("2", TicketStatus::New);
        eighteen.birthday = Some(birthday_for_age(today, 18));
        let mut oldest = ticket("3", TicketStatus::New);
        oldest.birthday = Some(birthday_for_age(today, 120));
        let mut too_old = ticket("4", TicketStatus::New);
        too_old.birthday = Some(birthday_for_age(today, 121));
        let mut malformed = ticket("5", TicketStatus::New);
        malformed.birthday = Some("06/01/1990".to_string());

        let doc = parse(
            &age_histogram_chart(&[seventeen, eighteen, oldest, too_old, malformed], today)
                .unwrap(),
        );
        let trace = &doc["data"][0];
        // Empty buckets omitted, ascending order preserved
        assert_eq!(trace["y"], json!(["0-17", "18-24", "65+"]));
        assert_eq!(trace["x"], json!([1, 1, 1]));
        assert_eq!(trace["orientation"], json!("h"));
    }

    #[test]
    fn test_age_histogram_empty_marker() {
        let today = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        let doc = parse(&age_histogram_chart(&[], today).unwrap());
        assert_eq!(doc["data"], json!([]));
        assert_eq!(
            doc["layout"]["annotations"][0]["text"],
            json!("No age data available")
        );
    }

    #[test]
    fn test_build_charts_produces_all_four_payloads() {
        let charts = build_charts(&[]).unwrap();
        for payload in [
            &charts.resource_support,
            &charts.service_distribution,
            &charts.crisis_wish,
            &charts.age_histogram,
        ] {
            let doc = parse(payload);
            assert!(doc.get("data").is_some());
            assert!(doc.get("layout").is_some());
        }
    }
}
