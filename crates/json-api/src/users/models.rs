//! User Models

use salvo::oapi::ToSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use storefront_app::domain::users::records::{DocumentRecord, UserRecord};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct DocumentResponse {
    /// File name without its extension
    pub name: String,

    /// Storage reference of the upload
    pub reference: String,
}

impl From<DocumentRecord> for DocumentResponse {
    fn from(document: DocumentRecord) -> Self {
        DocumentResponse {
            name: document.name,
            reference: document.reference,
        }
    }
}

/// Public user profile
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct UserResponse {
    pub uuid: Uuid,

    pub first_name: String,

    pub last_name: String,

    pub email: String,

    pub age: u32,

    /// One of `regular`, `premium` or `admin`
    pub role: String,

    /// `pending` until every required document is uploaded, then `active`
    pub status: String,

    /// The user's cart
    pub cart: Option<Uuid>,

    pub documents: Vec<DocumentResponse>,

    pub last_connection: Option<String>,

    pub created_at: String,

    pub updated_at: String,
}

impl From<UserRecord> for UserResponse {
    fn from(user: UserRecord) -> Self {
        UserResponse {
            uuid: user.uuid.into_uuid(),
            first_name: user.first_name,
            last_name: user.last_name,
            email: user.email,
            age: user.age,
            role: user.role.as_str().to_string(),
            status: user.status.as_str().to_string(),
            cart: user.cart_uuid.map(|cart| cart.into_uuid()),
            documents: user.documents.into_iter().map(Into::into).collect(),
            last_connection: user.last_connection.map(|at| at.to_string()),
            created_at: user.created_at.to_string(),
            updated_at: user.updated_at.to_string(),
        }
    }
}
