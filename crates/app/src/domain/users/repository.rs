//! Users Repository

use std::{collections::HashMap, str::FromStr};

use jiff::Timestamp;
use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query, query_as};
use uuid::Uuid;

use crate::domain::{
    carts::records::CartUuid,
    users::records::{DocumentRecord, Role, UserRecord, UserStatus, UserUuid},
};

const CREATE_USER_SQL: &str = include_str!("sql/create_user.sql");
const GET_USER_SQL: &str = include_str!("sql/get_user.sql");
const LOCK_USER_SQL: &str = include_str!("sql/lock_user.sql");
const FIND_CREDENTIALS_SQL: &str = include_str!("sql/find_credentials.sql");
const LIST_USERS_SQL: &str = include_str!("sql/list_users.sql");
const UPDATE_ROLE_SQL: &str = include_str!("sql/update_role.sql");
const ACTIVATE_USER_SQL: &str = include_str!("sql/activate_user.sql");
const TOUCH_LAST_CONNECTION_SQL: &str = include_str!("sql/touch_last_connection.sql");
const LIST_INACTIVE_USERS_SQL: &str = include_str!("sql/list_inactive_users.sql");
const DELETE_USERS_SQL: &str = include_str!("sql/delete_users.sql");
const LIST_DOCUMENTS_SQL: &str = include_str!("sql/list_documents.sql");
const INSERT_DOCUMENTS_SQL: &str = include_str!("sql/insert_documents.sql");

/// Row fields for a new user; the password is already hashed.
#[derive(Debug, Clone)]
pub(crate) struct UserRow<'a> {
    pub(crate) uuid: UserUuid,
    pub(crate) first_name: &'a str,
    pub(crate) last_name: &'a str,
    pub(crate) email: &'a str,
    pub(crate) age: u32,
    pub(crate) password_hash: &'a str,
    pub(crate) role: Role,
    pub(crate) cart_uuid: CartUuid,
}

/// A user together with its stored password hash.
#[derive(Debug, Clone)]
pub(crate) struct UserCredentials {
    pub(crate) user: UserRecord,
    pub(crate) password_hash: String,
}

#[derive(Debug, Clone)]
struct OwnedDocument {
    user_uuid: UserUuid,
    document: DocumentRecord,
}

#[derive(Debug, Clone, Default)]
pub(crate) struct PgUsersRepository;

impl PgUsersRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn create_user(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: &UserRow<'_>,
    ) -> Result<UserRecord, sqlx::Error> {
        query_as::<Postgres, UserRecord>(CREATE_USER_SQL)
            .bind(user.uuid.into_uuid())
            .bind(user.first_name)
            .bind(user.last_name)
            .bind(user.email)
            .bind(bind_age(user.age)?)
            .bind(user.password_hash)
            .bind(user.role.as_str())
            .bind(user.cart_uuid.into_uuid())
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn get_user(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
    ) -> Result<UserRecord, sqlx::Error> {
        query_as::<Postgres, UserRecord>(GET_USER_SQL)
            .bind(user.into_uuid())
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn lock_user(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
    ) -> Result<UserRecord, sqlx::Error> {
        query_as::<Postgres, UserRecord>(LOCK_USER_SQL)
            .bind(user.into_uuid())
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn find_credentials(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        email: &str,
    ) -> Result<Option<UserCredentials>, sqlx::Error> {
        query_as::<Postgres, UserCredentials>(FIND_CREDENTIALS_SQL)
            .bind(email)
            .fetch_optional(&mut **tx)
            .await
    }

    pub(crate) async fn list_users(
        &self,
        tx: &mut Transaction<'_, Postgres>,
    ) -> Result<Vec<UserRecord>, sqlx::Error> {
        query_as::<Postgres, UserRecord>(LIST_USERS_SQL)
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn update_role(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
        role: Role,
    ) -> Result<UserRecord, sqlx::Error> {
        query_as::<Postgres, UserRecord>(UPDATE_ROLE_SQL)
            .bind(user.into_uuid())
            .bind(role.as_str())
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn activate_user(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
    ) -> Result<UserRecord, sqlx::Error> {
        query_as::<Postgres, UserRecord>(ACTIVATE_USER_SQL)
            .bind(user.into_uuid())
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn touch_last_connection(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
        at: Timestamp,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(TOUCH_LAST_CONNECTION_SQL)
            .bind(user.into_uuid())
            .bind(SqlxTimestamp::from(at))
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }

    pub(crate) async fn list_inactive_users(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        cutoff: Timestamp,
        excluded_email: &str,
    ) -> Result<Vec<UserRecord>, sqlx::Error> {
        query_as::<Postgres, UserRecord>(LIST_INACTIVE_USERS_SQL)
            .bind(SqlxTimestamp::from(cutoff))
            .bind(excluded_email)
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn delete_users(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        users: &[UserUuid],
    ) -> Result<u64, sqlx::Error> {
        let uuids: Vec<Uuid> = users.iter().map(|user| user.into_uuid()).collect();

        let rows_affected = query(DELETE_USERS_SQL)
            .bind(uuids)
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }

    /// Documents of each user in `users`, in upload order.
    pub(crate) async fn list_documents(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        users: &[UserUuid],
    ) -> Result<HashMap<UserUuid, Vec<DocumentRecord>>, sqlx::Error> {
        let uuids: Vec<Uuid> = users.iter().map(|user| user.into_uuid()).collect();

        let rows = query_as::<Postgres, OwnedDocument>(LIST_DOCUMENTS_SQL)
            .bind(uuids)
            .fetch_all(&mut **tx)
            .await?;

        let mut documents: HashMap<UserUuid, Vec<DocumentRecord>> = HashMap::new();

        for row in rows {
            documents.entry(row.user_uuid).or_default().push(row.document);
        }

        Ok(documents)
    }

    pub(crate) async fn insert_documents(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
        documents: &[DocumentRecord],
    ) -> Result<(), sqlx::Error> {
        if documents.is_empty() {
            return Ok(());
        }

        let uuids: Vec<Uuid> = documents.iter().map(|_| Uuid::now_v7()).collect();
        let names: Vec<&str> = documents.iter().map(|doc| doc.name.as_str()).collect();
        let references: Vec<&str> = documents.iter().map(|doc| doc.reference.as_str()).collect();

        query(INSERT_DOCUMENTS_SQL)
            .bind(user.into_uuid())
            .bind(uuids)
            .bind(names)
            .bind(references)
            .execute(&mut **tx)
            .await?;

        Ok(())
    }
}

fn bind_age(age: u32) -> Result<i32, sqlx::Error> {
    i32::try_from(age).map_err(|source| sqlx::Error::Encode(Box::new(source)))
}

fn try_get_parsed<T>(row: &PgRow, col: &str) -> Result<T, sqlx::Error>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let value: String = row.try_get(col)?;

    value.parse().map_err(|e| sqlx::Error::ColumnDecode {
        index: col.to_string(),
        source: Box::new(e),
    })
}

impl<'r> FromRow<'r, PgRow> for UserRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let age: i32 = row.try_get("age")?;

        Ok(Self {
            uuid: UserUuid::from_uuid(row.try_get("uuid")?),
            first_name: row.try_get("first_name")?,
            last_name: row.try_get("last_name")?,
            email: row.try_get("email")?,
            age: u32::try_from(age).map_err(|e| sqlx::Error::ColumnDecode {
                index: "age".to_string(),
                source: Box::new(e),
            })?,
            role: try_get_parsed::<Role>(row, "role")?,
            status: try_get_parsed::<UserStatus>(row, "status")?,
            cart_uuid: row
                .try_get::<Option<Uuid>, _>("cart_uuid")?
                .map(CartUuid::from_uuid),
            documents: Vec::new(),
            last_connection: row
                .try_get::<Option<SqlxTimestamp>, _>("last_connection")?
                .map(SqlxTimestamp::to_jiff),
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
        })
    }
}

impl<'r> FromRow<'r, PgRow> for UserCredentials {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            user: UserRecord::from_row(row)?,
            password_hash: row.try_get("password_hash")?,
        })
    }
}

impl<'r> FromRow<'r, PgRow> for OwnedDocument {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            user_uuid: UserUuid::from_uuid(row.try_get("user_uuid")?),
            document: DocumentRecord {
                name: row.try_get("name")?,
                reference: row.try_get("reference")?,
            },
        })
    }
}
