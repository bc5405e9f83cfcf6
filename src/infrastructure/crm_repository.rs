// CRM repository implementation - paginated ticket fetch over HTTP
use crate::application::ticket_repository::TicketRepository;
use crate::domain::ticket::{Ticket, TicketStatus};
use crate::infrastructure::config::CrmSettings;
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::collections::HashMap;
use thiserror::Error;

/// Only the properties the aggregation pipeline consumes.
const TICKET_PROPERTIES: &str =
    "hs_pipeline_stage,createdate,service_provided,crisis_wish,birthday";

#[derive(Debug, Error)]
pub enum CrmError {
    #[error("CRM API key is not configured")]
    MissingApiKey,
    #[error("CRM request failed with status {status}: {body}")]
    Api {
        status: reqwest::StatusCode,
        body: String,
    },
}

#[derive(Debug, Clone)]
pub struct CrmRepository {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    page_limit: u32,
}

#[derive(Debug, Deserialize)]
struct TicketPage {
    #[serde(default)]
    results: Vec<RawTicket>,
    paging: Option<Paging>,
}

#[derive(Debug, Deserialize)]
struct Paging {
    next: Option<PageCursor>,
}

#[derive(Debug, Deserialize)]
struct PageCursor {
    after: String,
}

/// One ticket as returned by the CRM: an id plus an open-ended bag of
/// nullable string properties. Unused properties are carried and ignored.
#[derive(Debug, Deserialize)]
struct RawTicket {
    id: String,
    #[serde(default)]
    properties: HashMap<String, Option<String>>,
}

impl RawTicket {
    fn property(&self, name: &str) -> Option<&str> {
        self.properties.get(name)?.as_deref()
    }

    fn take_property(&mut self, name: &str) -> Option<String> {
        self.properties.remove(name).flatten()
    }

    fn into_ticket(mut self) -> Ticket {
        let status = TicketStatus::from_stage_code(self.property("hs_pipeline_stage"));
        if let TicketStatus::Stage(_) = &status {
            tracing::debug!("Ticket {} has unmapped pipeline stage {}", self.id, status);
        }
        let created_at = self
            .property("createdate")
            .and_then(|raw| DateTime::parse_from_rfc3339(raw).ok())
            .map(|parsed| parsed.with_timezone(&Utc));

        Ticket {
            status,
            created_at,
            service_provided: self.take_property("service_provided"),
            crisis_wish: self.take_property("crisis_wish"),
            birthday: self.take_property("birthday"),
            id: self.id,
        }
    }
}

impl CrmRepository {
    pub fn new(settings: CrmSettings) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            api_key: settings.api_key,
            page_limit: settings.page_limit,
        }
    }

    async fn fetch_page(&self, after: Option<&str>) -> Result<TicketPage> {
        let url = format!("{}/crm/v3/objects/tickets", self.base_url);
        let mut request = self
            .client
            .get(&url)
            .bearer_auth(&self.api_key)
            .query(&[
                ("limit", self.page_limit.to_string().as_str()),
                ("properties", TICKET_PROPERTIES),
            ]);
        if let Some(after) = after {
            request = request.query(&[("after", after)]);
        }

        let response = request
            .send()
            .await
            .context("Failed to send request to CRM")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(CrmError::Api { status, body }.into());
        }

        response
            .json::<TicketPage>()
            .await
            .context("Failed to parse CRM response")
    }
}

#[async_trait]
impl TicketRepository for CrmRepository {
    async fn fetch_all_tickets(&self) -> Result<Vec<Ticket>> {
        if self.api_key.is_empty() {
            return Err(CrmError::MissingApiKey.into());
        }

        let mut tickets = Vec::new();
        let mut after: Option<String> = None;

        // Follow the opaque cursor until the CRM stops returning one
        loop {
            let page = self.fetch_page(after.as_deref()).await?;
            tracing::debug!("Fetched CRM page with {} tickets", page.results.len());
            tickets.extend(page.results.into_iter().map(RawTicket::into_ticket));

            match page.paging.and_then(|paging| paging.next) {
                Some(cursor) => after = Some(cursor.after),
                None => break,
            }
        }

        tracing::debug!("Fetched {} tickets in total", tickets.len());
        Ok(tickets)
    }
}
