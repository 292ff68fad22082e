//! Tickets Repository

use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query_as};

use crate::{
    database::{bind_amount, try_get_amount},
    domain::tickets::records::{TicketRecord, TicketUuid},
};

const CREATE_TICKET_SQL: &str = include_str!("sql/create_ticket.sql");
const GET_TICKET_SQL: &str = include_str!("sql/get_ticket.sql");
const LIST_TICKETS_BY_PURCHASER_SQL: &str = include_str!("sql/list_tickets_by_purchaser.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgTicketsRepository;

impl PgTicketsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn create_ticket(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        uuid: TicketUuid,
        amount: u64,
        purchaser: &str,
    ) -> Result<TicketRecord, sqlx::Error> {
        query_as::<Postgres, TicketRecord>(CREATE_TICKET_SQL)
            .bind(uuid.into_uuid())
            .bind(bind_amount(amount)?)
            .bind(purchaser)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn get_ticket(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        ticket: TicketUuid,
    ) -> Result<TicketRecord, sqlx::Error> {
        query_as::<Postgres, TicketRecord>(GET_TICKET_SQL)
            .bind(ticket.into_uuid())
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn list_by_purchaser(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        purchaser: &str,
    ) -> Result<Vec<TicketRecord>, sqlx::Error> {
        query_as::<Postgres, TicketRecord>(LIST_TICKETS_BY_PURCHASER_SQL)
            .bind(purchaser)
            .fetch_all(&mut **tx)
            .await
    }
}

impl<'r> FromRow<'r, PgRow> for TicketRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: TicketUuid::from_uuid(row.try_get("uuid")?),
            amount: try_get_amount(row, "amount")?,
            purchaser: row.try_get("purchaser")?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
        })
    }
}
