// Repository trait for ticket data access
use crate::domain::ticket::Ticket;
use async_trait::async_trait;

#[async_trait]
pub trait TicketRepository: Send + Sync {
    /// Fetch the full, already-flattened ticket collection from the CRM,
    /// following pagination internally. Either the whole collection is
    /// returned or the fetch fails; no partial results.
    async fn fetch_all_tickets(&self) -> anyhow::Result<Vec<Ticket>>;
}
