// Dashboard service - Use case for building the reporting dashboard
use crate::application::chart_service::build_charts;
use crate::application::ticket_repository::TicketRepository;
use crate::domain::dashboard::Dashboard;
use crate::domain::stats::{aggregate, week_start};
use chrono::Local;
use std::sync::Arc;

#[derive(Clone)]
pub struct DashboardService {
    repository: Arc<dyn TicketRepository>,
}

impl DashboardService {
    pub fn new(repository: Arc<dyn TicketRepository>) -> Self {
        Self { repository }
    }

    /// One full re-fetch and re-aggregation per call: pull the collection,
    /// compute the five counters, then derive the four chart payloads over
    /// the same in-memory tickets.
    pub async fn get_dashboard(&self) -> anyhow::Result<Dashboard> {
        let tickets = self.repository.fetch_all_tickets().await?;
        tracing::debug!("Fetched {} tickets from CRM", tickets.len());

        let stats = aggregate(&tickets, week_start(Local::now()));
        let charts = build_charts(&tickets)?;

        Ok(Dashboard::new(stats, charts))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ticket::{Ticket, TicketStatus};
    use async_trait::async_trait;

    struct StubRepository {
        tickets: Vec<Ticket>,
    }

    #[async_trait]
    impl TicketRepository for StubRepository {
        async fn fetch_all_tickets(&self) -> anyhow::Result<Vec<Ticket>> {
            Ok(self.tickets.clone())
        }
    }

    struct FailingRepository;

    #[async_trait]
    impl TicketRepository for FailingRepository {
        async fn fetch_all_tickets(&self) -> anyhow::Result<Vec<Ticket>> {
            anyhow::bail!("CRM request failed with status 401")
        }
    }

    #[tokio::test]
    async fn test_dashboard_from_stub_collection() {
        let tickets = vec![
            Ticket::new("1".to_string(), TicketStatus::ResourceSupport),
            Ticket::new("2".to_string(), TicketStatus::Completed),
            Ticket::new("3".to_string(), TicketStatus::Unknown),
        ];
        let service = DashboardService::new(Arc::new(StubRepository { tickets }));

        let dashboard = service.get_dashboard().await.unwrap();
        assert_eq!(dashboard.stats.open_tickets, 1);
        assert_eq!(dashboard.stats.closed_tickets, 1);
        assert!(dashboard.charts.resource_support.contains("\"data\""));
    }

    #[tokio::test]
    async fn test_fetch_failure_propagates() {
        let service = DashboardService::new(Arc::new(FailingRepository));
        let err = service.get_dashboard().await.unwrap_err();
        assert!(err.to_string().contains("401"));
    }
}
