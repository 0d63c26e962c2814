use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Cat
///
/// The single persisted entity of the application: a named cat. The unique
/// identifier is assigned by the repository on creation; records are never
/// mutated after that.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema, Default)]
pub struct Cat {
    pub id: Uuid,
    pub name: String,
}

/// CatPage
///
/// Output schema of `GET /cats`: one page of the cat collection with
/// explicit page metadata. `total_elements` is the collection size across
/// all pages, exposed as a structured field.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, Default)]
pub struct CatPage {
    pub cats: Vec<Cat>,
    /// Zero-based page index that was served.
    pub page: usize,
    /// Requested page size.
    pub size: usize,
    /// Total number of cats in the repository, across all pages.
    pub total_elements: usize,
    pub total_pages: usize,
}

/// PageFilter
///
/// Accepted query parameters of the listing endpoint (GET /cats).
#[derive(Debug, Clone, Deserialize, utoipa::IntoParams)]
pub struct PageFilter {
    /// Zero-based page index. Defaults to 0.
    pub page: Option<usize>,
    /// Page size. Defaults to 20.
    pub size: Option<usize>,
}

/// LoginForm
///
/// Input payload of the form-login endpoint (POST /login). The password is
/// checked against the configured accounts and never persisted or logged.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

/// TreatsResponse
///
/// Output schema of the role-restricted demonstration endpoint
/// (GET /privileged/treats).
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TreatsResponse {
    pub message: String,
    /// Username of the caller the treats were served to.
    pub served_to: String,
}
