// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Persistence layer for the Fotoexpres order backend.
//!
//! Stores orders, the store configuration documents (`prices`, `discounts`,
//! `promotion`, `settings`), admin operators and their sessions in `SQLite`
//! through Diesel. Migrations are embedded and applied on open.
//!
//! ## Testing
//!
//! Every call to [`Persistence::new_in_memory`] gets its own shared-cache
//! in-memory database, so tests never observe each other's rows.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(clippy::multiple_crate_versions)]

use diesel::SqliteConnection;
use fotoexpres::Order;
use fotoexpres_domain::{OrderNumber, OrderStatus};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};

/// Atomic counter for generating unique in-memory database names.
///
/// Each call to `new_in_memory()` receives a unique sequential ID.
static DB_COUNTER: AtomicU64 = AtomicU64::new(0);

mod backend;
mod data_models;
mod diesel_schema;
mod error;
mod mutations;
mod queries;

#[cfg(test)]
mod tests;

pub use data_models::{OperatorData, SessionData, StoreDocument};
pub use error::PersistenceError;

/// Persistence adapter over a single `SQLite` connection.
pub struct Persistence {
    conn: SqliteConnection,
}

impl Persistence {
    /// Creates a new persistence adapter with an in-memory `SQLite` database.
    ///
    /// Each call receives a unique database instance via atomic counter.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be initialized.
    pub fn new_in_memory() -> Result<Self, PersistenceError> {
        let db_id: u64 = DB_COUNTER.fetch_add(1, Ordering::SeqCst);
        let shared_memory_url: String = format!("file:memdb_test_{db_id}?mode=memory&cache=shared");

        let mut conn: SqliteConnection = backend::sqlite::initialize_database(&shared_memory_url)?;
        backend::sqlite::verify_foreign_key_enforcement(&mut conn)?;

        Ok(Self { conn })
    }

    /// Creates a new persistence adapter with a file-based `SQLite` database.
    ///
    /// # Arguments
    ///
    /// * `path` - The path to the `SQLite` database file
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or initialized.
    pub fn new_with_file<P: AsRef<Path>>(path: P) -> Result<Self, PersistenceError> {
        let path_str: &str = path.as_ref().to_str().ok_or_else(|| {
            PersistenceError::InitializationError("Invalid database path".to_string())
        })?;

        let mut conn: SqliteConnection = backend::sqlite::initialize_database(path_str)?;

        // WAL lets readers proceed while an order is being written
        backend::sqlite::enable_wal_mode(&mut conn)?;
        backend::sqlite::verify_foreign_key_enforcement(&mut conn)?;

        Ok(Self { conn })
    }

    /// Verifies that foreign key enforcement is enabled.
    ///
    /// # Errors
    ///
    /// Returns an error if foreign key enforcement is not enabled.
    pub fn verify_foreign_key_enforcement(&mut self) -> Result<(), PersistenceError> {
        backend::sqlite::verify_foreign_key_enforcement(&mut self.conn)
    }

    // ========================================================================
    // Orders
    // ========================================================================

    /// Inserts a new order.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::DuplicateOrderNumber` if the number is taken.
    pub fn insert_order(&mut self, order: &Order) -> Result<i64, PersistenceError> {
        mutations::orders::insert_order(&mut self.conn, order)
    }

    /// Retrieves an order by number.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or the stored row is invalid.
    pub fn get_order(&mut self, order_number: &OrderNumber) -> Result<Option<Order>, PersistenceError> {
        queries::orders::get_order(&mut self.conn, order_number)
    }

    /// Checks whether an order with this number exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn order_exists(&mut self, order_number: &OrderNumber) -> Result<bool, PersistenceError> {
        queries::orders::order_exists(&mut self.conn, order_number)
    }

    /// Lists all orders, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or a stored row is invalid.
    pub fn list_orders(&mut self) -> Result<Vec<Order>, PersistenceError> {
        queries::orders::list_orders(&mut self.conn)
    }

    /// Updates an order's status.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::OrderNotFound` if the order does not exist.
    pub fn update_order_status(
        &mut self,
        order_number: &OrderNumber,
        status: OrderStatus,
    ) -> Result<(), PersistenceError> {
        mutations::orders::update_order_status(&mut self.conn, order_number, status)
    }

    /// Deletes an order record.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::OrderNotFound` if the order does not exist.
    pub fn delete_order(&mut self, order_number: &OrderNumber) -> Result<(), PersistenceError> {
        mutations::orders::delete_order(&mut self.conn, order_number)
    }

    // ========================================================================
    // Store Configuration
    // ========================================================================

    /// Loads a store configuration document, or its default when unset.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or the stored JSON does not match `T`.
    pub fn get_document<T>(&mut self, document: StoreDocument) -> Result<T, PersistenceError>
    where
        T: DeserializeOwned + Default,
    {
        queries::settings::get_document(&mut self.conn, document)
    }

    /// Stores a configuration document, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the write fails.
    pub fn put_document<T>(&mut self, document: StoreDocument, value: &T) -> Result<(), PersistenceError>
    where
        T: Serialize,
    {
        mutations::settings::put_document(&mut self.conn, document, value)
    }

    // ========================================================================
    // Operator Queries
    // ========================================================================

    /// Creates a new operator.
    ///
    /// # Arguments
    ///
    /// * `login_name` - The login name (normalized to lowercase)
    /// * `display_name` - The display name
    /// * `password` - The plain-text password (will be hashed)
    /// * `role` - The role (`admin` or `viewer`)
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::DuplicateLoginName` if the login name exists.
    pub fn create_operator(
        &mut self,
        login_name: &str,
        display_name: &str,
        password: &str,
        role: &str,
    ) -> Result<i64, PersistenceError> {
        mutations::operators::create_operator(&mut self.conn, login_name, display_name, password, role)
    }

    /// Retrieves an operator by login name.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_operator_by_login(
        &mut self,
        login_name: &str,
    ) -> Result<Option<OperatorData>, PersistenceError> {
        queries::operators::get_operator_by_login(&mut self.conn, login_name)
    }

    /// Retrieves an operator by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_operator_by_id(
        &mut self,
        operator_id: i64,
    ) -> Result<Option<OperatorData>, PersistenceError> {
        queries::operators::get_operator_by_id(&mut self.conn, operator_id)
    }

    /// Counts stored operators.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn count_operators(&mut self) -> Result<i64, PersistenceError> {
        queries::operators::count_operators(&mut self.conn)
    }

    /// Updates the last login timestamp for an operator.
    ///
    /// # Errors
    ///
    /// Returns an error if the update fails.
    pub fn update_last_login(&mut self, operator_id: i64) -> Result<(), PersistenceError> {
        mutations::operators::update_last_login(&mut self.conn, operator_id)
    }

    /// Verifies a password against a stored hash.
    ///
    /// # Errors
    ///
    /// Returns an error if the hash is malformed.
    pub fn verify_password(
        &self,
        password: &str,
        password_hash: &str,
    ) -> Result<bool, PersistenceError> {
        queries::operators::verify_password(password, password_hash)
    }

    /// Updates an operator's password.
    ///
    /// # Errors
    ///
    /// Returns an error if the update fails.
    pub fn update_password(
        &mut self,
        operator_id: i64,
        new_password: &str,
    ) -> Result<(), PersistenceError> {
        mutations::operators::update_password(&mut self.conn, operator_id, new_password)
    }

    /// Renames an operator's login.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::DuplicateLoginName` if the name is taken.
    pub fn update_login_name(
        &mut self,
        operator_id: i64,
        new_login_name: &str,
    ) -> Result<(), PersistenceError> {
        mutations::operators::update_login_name(&mut self.conn, operator_id, new_login_name)
    }

    // ========================================================================
    // Session Management
    // ========================================================================

    /// Creates a new session.
    ///
    /// # Errors
    ///
    /// Returns an error if the session cannot be created.
    pub fn create_session(
        &mut self,
        session_token: &str,
        operator_id: i64,
        expires_at: &str,
    ) -> Result<i64, PersistenceError> {
        mutations::operators::create_session(&mut self.conn, session_token, operator_id, expires_at)
    }

    /// Retrieves a session by token.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_session_by_token(
        &mut self,
        session_token: &str,
    ) -> Result<Option<SessionData>, PersistenceError> {
        queries::operators::get_session_by_token(&mut self.conn, session_token)
    }

    /// Updates the last activity timestamp for a session.
    ///
    /// # Errors
    ///
    /// Returns an error if the update fails.
    pub fn update_session_activity(&mut self, session_id: i64) -> Result<(), PersistenceError> {
        mutations::operators::update_session_activity(&mut self.conn, session_id)
    }

    /// Deletes a session by token.
    ///
    /// # Errors
    ///
    /// Returns an error if the delete fails.
    pub fn delete_session(&mut self, session_token: &str) -> Result<(), PersistenceError> {
        mutations::operators::delete_session(&mut self.conn, session_token)
    }

    /// Deletes every session of an operator.
    ///
    /// # Errors
    ///
    /// Returns an error if the delete fails.
    pub fn delete_sessions_for_operator(
        &mut self,
        operator_id: i64,
    ) -> Result<usize, PersistenceError> {
        mutations::operators::delete_sessions_for_operator(&mut self.conn, operator_id)
    }

    /// Deletes all sessions that expired before `now`.
    ///
    /// # Errors
    ///
    /// Returns an error if the delete fails.
    pub fn delete_expired_sessions(&mut self, now: &str) -> Result<usize, PersistenceError> {
        mutations::operators::delete_expired_sessions(&mut self.conn, now)
    }
}
