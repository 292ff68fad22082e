//! Tickets service.

use async_trait::async_trait;
use mockall::automock;

use crate::{
    database::Db,
    domain::tickets::{
        errors::TicketsServiceError,
        records::{TicketRecord, TicketUuid},
        repository::PgTicketsRepository,
    },
};

#[derive(Debug, Clone)]
pub struct PgTicketsService {
    db: Db,
    repository: PgTicketsRepository,
}

impl PgTicketsService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgTicketsRepository::new(),
        }
    }
}

#[async_trait]
impl TicketsService for PgTicketsService {
    async fn get_ticket(&self, ticket: TicketUuid) -> Result<TicketRecord, TicketsServiceError> {
        let mut tx = self.db.begin().await?;

        let ticket = self.repository.get_ticket(&mut tx, ticket).await?;

        tx.commit().await?;

        Ok(ticket)
    }

    async fn list_tickets(&self, purchaser: &str) -> Result<Vec<TicketRecord>, TicketsServiceError> {
        let mut tx = self.db.begin().await?;

        let tickets = self.repository.list_by_purchaser(&mut tx, purchaser).await?;

        tx.commit().await?;

        Ok(tickets)
    }
}

#[automock]
#[async_trait]
pub trait TicketsService: Send + Sync {
    /// Retrieve a single ticket.
    async fn get_ticket(&self, ticket: TicketUuid) -> Result<TicketRecord, TicketsServiceError>;

    /// List tickets issued to `purchaser`, newest first.
    async fn list_tickets(&self, purchaser: &str) -> Result<Vec<TicketRecord>, TicketsServiceError>;
}
