/// Contact model and database operations
///
/// This module provides the Contact model, the core entity of the system.
/// Every operation is scoped by the owner's user id in addition to the
/// foreign key, so no code path can reach another user's contacts.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE contacts (
///     id         BIGSERIAL PRIMARY KEY,
///     owner_id   BIGINT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     first_name VARCHAR(100) NOT NULL,
///     last_name  VARCHAR(100) NOT NULL,
///     email      VARCHAR(250) NOT NULL,
///     phone      VARCHAR(50) NOT NULL,
///     birthday   DATE NOT NULL,
///     notes      TEXT,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```
///
/// # Example
///
/// ```no_run
/// use chrono::NaiveDate;
/// use rolodex_shared::models::contact::{Contact, ContactData};
/// use rolodex_shared::db::pool::{create_pool, DatabaseConfig};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig::default()).await?;
/// let owner_id = 1;
///
/// let contact = Contact::create(&pool, owner_id, ContactData {
///     first_name: "Ada".to_string(),
///     last_name: "Lovelace".to_string(),
///     email: "ada@example.com".to_string(),
///     phone: "+44 20 7946 0001".to_string(),
///     birthday: NaiveDate::from_ymd_opt(1815, 12, 10).unwrap(),
///     notes: None,
/// }).await?;
///
/// let page = Contact::list(&pool, owner_id, 0, 100).await?;
/// assert!(page.iter().any(|c| c.id == contact.id));
/// # Ok(())
/// # }
/// ```

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

const CONTACT_COLUMNS: &str =
    "id, owner_id, first_name, last_name, email, phone, birthday, notes, created_at, updated_at";

/// Builds a `%query%` pattern with ILIKE metacharacters escaped, so the
/// search matches the query text literally
fn like_pattern(query: &str) -> String {
    let escaped = query
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{}%", escaped)
}

/// Contact model representing one person in a user's address book
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Contact {
    /// Unique contact ID
    pub id: i64,

    /// Owning user's ID
    pub owner_id: i64,

    /// First name
    pub first_name: String,

    /// Last name
    pub last_name: String,

    /// Contact's email address (not unique; two users may know the same person)
    pub email: String,

    /// Phone number, stored verbatim
    pub phone: String,

    /// Date of birth
    pub birthday: NaiveDate,

    /// Optional free-form notes
    pub notes: Option<String>,

    /// When the contact was created
    pub created_at: DateTime<Utc>,

    /// When the contact was last updated
    pub updated_at: DateTime<Utc>,
}

/// Mutable contact fields
///
/// Used both for creation and for full replacement on update; the PUT
/// endpoint takes the complete payload rather than a partial patch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContactData {
    /// First name
    pub first_name: String,

    /// Last name
    pub last_name: String,

    /// Email address
    pub email: String,

    /// Phone number
    pub phone: String,

    /// Date of birth
    pub birthday: NaiveDate,

    /// Optional free-form notes
    pub notes: Option<String>,
}

impl Contact {
    /// Lists the owner's contacts in stored order with pagination
    ///
    /// Returns an empty vector when the page is out of range; that is not an
    /// error.
    pub async fn list(
        pool: &PgPool,
        owner_id: i64,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let contacts = sqlx::query_as::<_, Contact>(&format!(
            r#"
            SELECT {CONTACT_COLUMNS}
            FROM contacts
            WHERE owner_id = $1
            ORDER BY id
            LIMIT $2 OFFSET $3
            "#,
        ))
        .bind(owner_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await?;

        Ok(contacts)
    }

    /// Searches the owner's contacts by substring
    ///
    /// Matches case-insensitively against first name, last name, and email.
    pub async fn search(
        pool: &PgPool,
        owner_id: i64,
        query: &str,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let pattern = like_pattern(query);

        let contacts = sqlx::query_as::<_, Contact>(&format!(
            r#"
            SELECT {CONTACT_COLUMNS}
            FROM contacts
            WHERE owner_id = $1
              AND (first_name ILIKE $2 OR last_name ILIKE $2 OR email ILIKE $2)
            ORDER BY id
            LIMIT $3 OFFSET $4
            "#,
        ))
        .bind(owner_id)
        .bind(pattern)
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await?;

        Ok(contacts)
    }

    /// Finds the owner's contacts whose birthday falls within the next
    /// `window_days` days
    ///
    /// The next occurrence of each birthday is computed from the stored date
    /// of birth: the anniversary this year if it has not passed yet,
    /// otherwise next year's. Feb 29 birthdays resolve to Feb 28 in
    /// non-leap years. Results are ordered by upcoming date.
    pub async fn find_upcoming_birthdays(
        pool: &PgPool,
        owner_id: i64,
        window_days: i32,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<Self>, sqlx::Error> {
        // age() truncates to completed years, so birthday + that many years
        // is the most recent anniversary on or before today.
        let contacts = sqlx::query_as::<_, Contact>(&format!(
            r#"
            SELECT {CONTACT_COLUMNS}
            FROM (
                SELECT c.*,
                       CASE
                           WHEN c.birthday
                                + make_interval(years => date_part('year', age(c.birthday))::int)
                                >= CURRENT_DATE
                           THEN c.birthday
                                + make_interval(years => date_part('year', age(c.birthday))::int)
                           ELSE c.birthday
                                + make_interval(years => date_part('year', age(c.birthday))::int + 1)
                       END AS next_birthday
                FROM contacts c
                WHERE c.owner_id = $1
            ) scoped
            WHERE next_birthday <= CURRENT_DATE + $2
            ORDER BY next_birthday, id
            LIMIT $3 OFFSET $4
            "#,
        ))
        .bind(owner_id)
        .bind(window_days)
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await?;

        Ok(contacts)
    }

    /// Finds a contact by ID, scoped to the owner
    ///
    /// Returns None when the contact does not exist or belongs to another
    /// user; callers cannot distinguish the two cases.
    pub async fn find_by_id(
        pool: &PgPool,
        id: i64,
        owner_id: i64,
    ) -> Result<Option<Self>, sqlx::Error> {
        let contact = sqlx::query_as::<_, Contact>(&format!(
            r#"
            SELECT {CONTACT_COLUMNS}
            FROM contacts
            WHERE id = $1 AND owner_id = $2
            "#,
        ))
        .bind(id)
        .bind(owner_id)
        .fetch_optional(pool)
        .await?;

        Ok(contact)
    }

    /// Creates a new contact owned by `owner_id`
    ///
    /// # Errors
    ///
    /// Returns an error if the owner does not exist (foreign key violation)
    /// or the database connection fails.
    pub async fn create(
        pool: &PgPool,
        owner_id: i64,
        data: ContactData,
    ) -> Result<Self, sqlx::Error> {
        let contact = sqlx::query_as::<_, Contact>(&format!(
            r#"
            INSERT INTO contacts (owner_id, first_name, last_name, email, phone, birthday, notes)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {CONTACT_COLUMNS}
            "#,
        ))
        .bind(owner_id)
        .bind(data.first_name)
        .bind(data.last_name)
        .bind(data.email)
        .bind(data.phone)
        .bind(data.birthday)
        .bind(data.notes)
        .fetch_one(pool)
        .await?;

        Ok(contact)
    }

    /// Replaces a contact's mutable fields, scoped to the owner
    ///
    /// Returns the updated contact, or None when no owned row matched.
    pub async fn update(
        pool: &PgPool,
        id: i64,
        owner_id: i64,
        data: ContactData,
    ) -> Result<Option<Self>, sqlx::Error> {
        let contact = sqlx::query_as::<_, Contact>(&format!(
            r#"
            UPDATE contacts
            SET first_name = $3,
                last_name = $4,
                email = $5,
                phone = $6,
                birthday = $7,
                notes = $8,
                updated_at = NOW()
            WHERE id = $1 AND owner_id = $2
            RETURNING {CONTACT_COLUMNS}
            "#,
        ))
        .bind(id)
        .bind(owner_id)
        .bind(data.first_name)
        .bind(data.last_name)
        .bind(data.email)
        .bind(data.phone)
        .bind(data.birthday)
        .bind(data.notes)
        .fetch_optional(pool)
        .await?;

        Ok(contact)
    }

    /// Deletes a contact, scoped to the owner
    ///
    /// Returns the deleted row's prior state, or None when no owned row
    /// matched.
    pub async fn delete(
        pool: &PgPool,
        id: i64,
        owner_id: i64,
    ) -> Result<Option<Self>, sqlx::Error> {
        let contact = sqlx::query_as::<_, Contact>(&format!(
            r#"
            DELETE FROM contacts
            WHERE id = $1 AND owner_id = $2
            RETURNING {CONTACT_COLUMNS}
            "#,
        ))
        .bind(id)
        .bind(owner_id)
        .fetch_optional(pool)
        .await?;

        Ok(contact)
    }
}
