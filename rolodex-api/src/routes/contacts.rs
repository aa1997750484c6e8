/// Contact endpoints
///
/// CRUD, search, and upcoming-birthday lookups over the authenticated
/// user's contacts. Every handler reads the caller's identity from the
/// `AuthContext` extension injected by the JWT middleware and threads it
/// into the model call, so results are always owner-scoped.
///
/// # Endpoints
///
/// - `GET    /contacts/?offset=&limit=` - List (limit defaults to 100)
/// - `GET    /contacts/search?query=&offset=&limit=` - Substring search
/// - `GET    /contacts/birthday?offset=&limit=` - Upcoming birthdays
/// - `GET    /contacts/:contact_id` - Get by id
/// - `POST   /contacts/` - Create (201)
/// - `PUT    /contacts/:contact_id` - Full replacement
/// - `DELETE /contacts/:contact_id` - Delete, returns the prior state

use crate::{
    app::AppState,
    error::{ApiError, ApiResult, ValidationErrorDetail},
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use chrono::NaiveDate;
use rolodex_shared::{
    auth::middleware::AuthContext,
    models::contact::{Contact, ContactData},
};
use serde::Deserialize;
use validator::Validate;

const CONTACT_NOT_FOUND: &str = "Contact not found";

fn default_list_limit() -> i64 {
    100
}

fn default_search_limit() -> i64 {
    10
}

/// Query parameters for the list endpoint
#[derive(Debug, Deserialize)]
pub struct ListParams {
    /// Rows to skip
    #[serde(default)]
    pub offset: i64,

    /// Page size
    #[serde(default = "default_list_limit")]
    pub limit: i64,
}

/// Query parameters for the search endpoint
#[derive(Debug, Deserialize)]
pub struct SearchParams {
    /// Substring matched against first name, last name, and email
    pub query: String,

    /// Rows to skip
    #[serde(default)]
    pub offset: i64,

    /// Page size
    #[serde(default = "default_search_limit")]
    pub limit: i64,
}

/// Query parameters for the birthday endpoint
#[derive(Debug, Deserialize)]
pub struct BirthdayParams {
    /// Rows to skip
    #[serde(default)]
    pub offset: i64,

    /// Page size
    #[serde(default = "default_search_limit")]
    pub limit: i64,
}

/// Contact create/update payload
#[derive(Debug, Deserialize, Validate)]
pub struct ContactRequest {
    /// First name
    #[validate(length(min = 1, max = 100, message = "First name must be 1-100 characters"))]
    pub first_name: String,

    /// Last name
    #[validate(length(min = 1, max = 100, message = "Last name must be 1-100 characters"))]
    pub last_name: String,

    /// Email address
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    /// Phone number
    #[validate(length(min = 1, max = 50, message = "Phone must be 1-50 characters"))]
    pub phone: String,

    /// Date of birth (ISO 8601, e.g. "1990-06-15")
    pub birthday: NaiveDate,

    /// Optional free-form notes
    pub notes: Option<String>,
}

impl ContactRequest {
    fn into_data(self) -> ContactData {
        ContactData {
            first_name: self.first_name,
            last_name: self.last_name,
            email: self.email,
            phone: self.phone,
            birthday: self.birthday,
            notes: self.notes,
        }
    }
}

fn validation_errors(e: validator::ValidationErrors) -> ApiError {
    let errors: Vec<ValidationErrorDetail> = e
        .field_errors()
        .iter()
        .flat_map(|(field, errors)| {
            errors.iter().map(move |error| ValidationErrorDetail {
                field: field.to_string(),
                message: error
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| "Validation failed".to_string()),
            })
        })
        .collect();
    ApiError::ValidationError(errors)
}

/// List contacts
///
/// Returns the caller's contacts in stored order, page-bounded. An empty
/// page is a 200 with an empty array, not an error.
///
/// # Endpoint
///
/// ```text
/// GET /contacts/?offset=0&limit=100
/// Authorization: Bearer <access_token>
/// ```
pub async fn list_contacts(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Query(params): Query<ListParams>,
) -> ApiResult<Json<Vec<Contact>>> {
    let contacts = Contact::list(&state.db, auth.user_id, params.offset, params.limit).await?;
    Ok(Json(contacts))
}

/// Search contacts
///
/// Case-insensitive substring match over first name, last name, and email.
///
/// # Endpoint
///
/// ```text
/// GET /contacts/search?query=ada&offset=0&limit=10
/// Authorization: Bearer <access_token>
/// ```
pub async fn search_contacts(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Query(params): Query<SearchParams>,
) -> ApiResult<Json<Vec<Contact>>> {
    let contacts = Contact::search(
        &state.db,
        auth.user_id,
        &params.query,
        params.offset,
        params.limit,
    )
    .await?;
    Ok(Json(contacts))
}

/// Upcoming birthdays
///
/// Returns the caller's contacts whose next birthday falls within the
/// configured window (default 7 days), ordered by upcoming date.
///
/// # Endpoint
///
/// ```text
/// GET /contacts/birthday?offset=0&limit=10
/// Authorization: Bearer <access_token>
/// ```
pub async fn upcoming_birthdays(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Query(params): Query<BirthdayParams>,
) -> ApiResult<Json<Vec<Contact>>> {
    let contacts = Contact::find_upcoming_birthdays(
        &state.db,
        auth.user_id,
        state.birthday_window_days(),
        params.offset,
        params.limit,
    )
    .await?;
    Ok(Json(contacts))
}

/// Get a contact by id
///
/// # Errors
///
/// - `404 Not Found`: No contact with that id is owned by the caller
pub async fn get_contact(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(contact_id): Path<i64>,
) -> ApiResult<Json<Contact>> {
    let contact = Contact::find_by_id(&state.db, contact_id, auth.user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(CONTACT_NOT_FOUND.to_string()))?;

    Ok(Json(contact))
}

/// Create a contact
///
/// # Endpoint
///
/// ```text
/// POST /contacts/
/// Authorization: Bearer <access_token>
/// Content-Type: application/json
///
/// {
///   "first_name": "Ada",
///   "last_name": "Lovelace",
///   "email": "ada@example.com",
///   "phone": "+44 20 7946 0001",
///   "birthday": "1815-12-10",
///   "notes": null
/// }
/// ```
///
/// # Errors
///
/// - `422 Unprocessable Entity`: Validation failed
pub async fn create_contact(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(req): Json<ContactRequest>,
) -> ApiResult<(StatusCode, Json<Contact>)> {
    req.validate().map_err(validation_errors)?;

    let contact = Contact::create(&state.db, auth.user_id, req.into_data()).await?;

    Ok((StatusCode::CREATED, Json(contact)))
}

/// Update a contact (full replacement)
///
/// # Errors
///
/// - `404 Not Found`: No contact with that id is owned by the caller
/// - `422 Unprocessable Entity`: Validation failed
pub async fn update_contact(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(contact_id): Path<i64>,
    Json(req): Json<ContactRequest>,
) -> ApiResult<Json<Contact>> {
    req.validate().map_err(validation_errors)?;

    let contact = Contact::update(&state.db, contact_id, auth.user_id, req.into_data())
        .await?
        .ok_or_else(|| ApiError::NotFound(CONTACT_NOT_FOUND.to_string()))?;

    Ok(Json(contact))
}

/// Delete a contact
///
/// Returns the deleted contact's prior state.
///
/// # Errors
///
/// - `404 Not Found`: No contact with that id is owned by the caller
pub async fn remove_contact(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(contact_id): Path<i64>,
) -> ApiResult<Json<Contact>> {
    let contact = Contact::delete(&state.db, contact_id, auth.user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(CONTACT_NOT_FOUND.to_string()))?;

    Ok(Json(contact))
}
