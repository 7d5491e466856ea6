//! # Application State
//!
//! Shared state for the Axum application, passed to all route handlers
//! via the `State` extractor.
//!
//! ## Architecture
//!
//! AppState holds the platform-owned stores:
//! - **Companies** — registered company accounts and their lifecycle status
//! - **Profiles** — onboarding profiles, keyed by the owning company
//! - **Sessions** — hashed session credentials backing API authentication
//!
//! Stores are in-memory and rebuilt from Postgres on startup when a
//! `DATABASE_URL` is configured. Writes go to the database first; the
//! stores mirror the durable rows.

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use company_core::{CompanyId, SessionId};
use parking_lot::RwLock;
use rand_core::{OsRng, RngCore};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use utoipa::ToSchema;
use uuid::Uuid;

// -- Generic In-Memory Store --------------------------------------------------

/// Thread-safe, cloneable in-memory key-value store.
///
/// Generic over the key type so each store is keyed by its own identifier
/// newtype (a session store cannot be queried with a company id by accident).
///
/// All operations are synchronous (the RwLock is `parking_lot`, not `tokio::sync`)
/// because we never hold the lock across `.await` points. `parking_lot::RwLock`
/// is non-poisonable — a panicking writer does not permanently corrupt the store.
#[derive(Debug)]
pub struct Store<K, T>
where
    K: Copy + Eq + Hash + Send + Sync,
    T: Clone + Send + Sync,
{
    data: Arc<RwLock<HashMap<K, T>>>,
}

impl<K, T> Clone for Store<K, T>
where
    K: Copy + Eq + Hash + Send + Sync,
    T: Clone + Send + Sync,
{
    fn clone(&self) -> Self {
        Self {
            data: Arc::clone(&self.data),
        }
    }
}

impl<K, T> Store<K, T>
where
    K: Copy + Eq + Hash + Send + Sync,
    T: Clone + Send + Sync,
{
    /// Create an empty store.
    pub fn new() -> Self {
        Self {
            data: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Insert a record, returning the previous value if the key existed.
    pub fn insert(&self, id: K, value: T) -> Option<T> {
        self.data.write().insert(id, value)
    }

    /// Retrieve a record by ID.
    pub fn get(&self, id: &K) -> Option<T> {
        self.data.read().get(id).cloned()
    }

    /// Update a record in place. Returns the updated record, or `None` if not found.
    pub fn update(&self, id: &K, f: impl FnOnce(&mut T)) -> Option<T> {
        let mut guard = self.data.write();
        if let Some(entry) = guard.get_mut(id) {
            f(entry);
            Some(entry.clone())
        } else {
            None
        }
    }

    /// Remove a record by ID.
    #[allow(dead_code)]
    pub fn remove(&self, id: &K) -> Option<T> {
        self.data.write().remove(id)
    }

    /// Check if a record exists.
    #[allow(dead_code)]
    pub fn contains(&self, id: &K) -> bool {
        self.data.read().contains_key(id)
    }

    /// Return the number of records.
    #[allow(dead_code)]
    pub fn len(&self) -> usize {
        self.data.read().len()
    }

    /// Whether the store is empty.
    #[allow(dead_code)]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<K, T> Default for Store<K, T>
where
    K: Copy + Eq + Hash + Send + Sync,
    T: Clone + Send + Sync,
{
    fn default() -> Self {
        Self::new()
    }
}

// -- Platform Record Types ----------------------------------------------------

/// Company account lifecycle status.
///
/// Uses `SCREAMING_CASE` for serialization to match the API contract and
/// prevent defective string values from being stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CompanyStatus {
    /// Registered but has not completed onboarding yet.
    PendingOnboarding,
    /// Onboarding complete; full API access.
    Active,
    /// Access withdrawn by an operator.
    Suspended,
}

impl CompanyStatus {
    /// Return the string representation of this status.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PendingOnboarding => "PENDING_ONBOARDING",
            Self::Active => "ACTIVE",
            Self::Suspended => "SUSPENDED",
        }
    }
}

impl std::fmt::Display for CompanyStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Company account record.
///
/// Holds the registration identity only; everything collected during
/// onboarding lives in [`CompanyProfileRecord`].
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CompanyRecord {
    #[schema(value_type = Uuid)]
    pub id: CompanyId,
    pub name: String,
    pub email: String,
    pub status: CompanyStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Self-declared company size band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum CompanySize {
    /// Fewer than 10 employees.
    Micro,
    /// 10–49 employees.
    Small,
    /// 50–249 employees.
    Medium,
    /// 250–999 employees.
    Large,
    /// 1000+ employees.
    Enterprise,
}

impl CompanySize {
    /// Return the string representation of this size band.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Micro => "micro",
            Self::Small => "small",
            Self::Medium => "medium",
            Self::Large => "large",
            Self::Enterprise => "enterprise",
        }
    }
}

impl std::fmt::Display for CompanySize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Onboarding profile for a company.
///
/// One profile per company; the profile store is keyed by the owning
/// [`CompanyId`]. The record keeps its own `id` for database identity.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CompanyProfileRecord {
    pub id: Uuid,
    #[schema(value_type = Uuid)]
    pub company_id: CompanyId,
    pub industry: String,
    pub location: String,
    pub company_size: CompanySize,
    pub website: Option<String>,
    pub logo_url: Option<String>,
    pub description: Option<String>,
    pub phone: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Session credential record.
///
/// Only the SHA-256 hash of the session secret is stored; the plaintext
/// token exists solely in the tuple returned by [`SessionRecord::issue`].
/// Deliberately not `Serialize` — session rows never leave the process as JSON.
#[derive(Clone)]
pub struct SessionRecord {
    pub id: SessionId,
    pub company_id: CompanyId,
    /// Hex-encoded SHA-256 digest of the session secret.
    pub secret_hash: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub revoked: bool,
}

impl std::fmt::Debug for SessionRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionRecord")
            .field("id", &self.id)
            .field("company_id", &self.company_id)
            .field("secret_hash", &"[REDACTED]")
            .field("created_at", &self.created_at)
            .field("expires_at", &self.expires_at)
            .field("revoked", &self.revoked)
            .finish()
    }
}

impl SessionRecord {
    /// Issue a new session for a company.
    ///
    /// Returns the record together with the plaintext bearer token
    /// (`"<session-id>:<secret>"`). The token is shown exactly once;
    /// afterwards only the hash can be checked against it.
    pub fn issue(company_id: CompanyId, ttl: Duration) -> (Self, String) {
        let id = SessionId::new();
        let mut secret = [0u8; 32];
        OsRng.fill_bytes(&mut secret);
        let secret_hex = crate::auth::hex_encode(&secret);
        let now = Utc::now();
        let record = Self {
            id,
            company_id,
            secret_hash: crate::auth::hash_secret(&secret_hex),
            created_at: now,
            expires_at: now + ttl,
            revoked: false,
        };
        (record, format!("{id}:{secret_hex}"))
    }

    /// Whether the session has passed its expiry instant.
    pub fn is_expired(&self) -> bool {
        self.expires_at <= Utc::now()
    }
}

// -- Application State --------------------------------------------------------

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Port to bind the HTTP server to.
    pub port: u16,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self { port: 8080 }
    }
}

/// Shared application state accessible to all route handlers.
///
/// Contains the company, profile, and session stores plus the optional
/// Postgres pool. Clone-friendly via `Arc` internals in each `Store`.
#[derive(Debug, Clone)]
pub struct AppState {
    pub companies: Store<CompanyId, CompanyRecord>,
    pub profiles: Store<CompanyId, CompanyProfileRecord>,
    pub sessions: Store<SessionId, SessionRecord>,

    /// PostgreSQL connection pool for durable state persistence.
    /// When `Some`, company, profile, and session data is persisted to
    /// Postgres in addition to the in-memory stores.
    /// When `None`, the API operates in in-memory-only mode.
    pub db_pool: Option<PgPool>,

    pub config: AppConfig,
}

impl AppState {
    /// Create a new application state with default configuration and no database.
    pub fn new() -> Self {
        Self::with_config(AppConfig::default(), None)
    }

    /// Create a new application state with the given configuration and
    /// optional database pool.
    pub fn with_config(config: AppConfig, db_pool: Option<PgPool>) -> Self {
        Self {
            companies: Store::new(),
            profiles: Store::new(),
            sessions: Store::new(),
            db_pool,
            config,
        }
    }

    /// Hydrate in-memory stores from the database.
    ///
    /// Called once on startup when a database pool is available. Loads all
    /// persisted companies, profiles, and sessions into the in-memory stores
    /// so that read operations remain fast and synchronous.
    pub async fn hydrate_from_db(&self) -> Result<(), String> {
        let pool = match &self.db_pool {
            Some(pool) => pool,
            None => return Ok(()),
        };

        // Load companies
        let companies = crate::db::companies::load_all(pool)
            .await
            .map_err(|e| format!("failed to load companies: {e}"))?;
        let company_count = companies.len();
        for record in companies {
            self.companies.insert(record.id, record);
        }

        // Load profiles
        let profiles = crate::db::profiles::load_all(pool)
            .await
            .map_err(|e| format!("failed to load company profiles: {e}"))?;
        let profile_count = profiles.len();
        for record in profiles {
            self.profiles.insert(record.company_id, record);
        }

        // Load sessions
        let sessions = crate::db::sessions::load_all(pool)
            .await
            .map_err(|e| format!("failed to load sessions: {e}"))?;
        let session_count = sessions.len();
        for record in sessions {
            self.sessions.insert(record.id, record);
        }

        tracing::info!(
            companies = company_count,
            profiles = profile_count,
            sessions = session_count,
            "Hydrated in-memory stores from database"
        );

        Ok(())
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}
