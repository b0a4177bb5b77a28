// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Store configuration document queries.

use diesel::prelude::*;
use diesel::SqliteConnection;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::data_models::StoreDocument;
use crate::diesel_schema::store_settings;
use crate::error::PersistenceError;

/// Loads a store configuration document.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `document` - Which document to load
///
/// # Returns
///
/// The stored document, or `T::default()` if none has been saved.
///
/// # Errors
///
/// Returns an error if the query fails or the stored JSON does not match `T`.
pub fn get_document<T>(
    conn: &mut SqliteConnection,
    document: StoreDocument,
) -> Result<T, PersistenceError>
where
    T: DeserializeOwned + Default,
{
    let result: Result<String, diesel::result::Error> = store_settings::table
        .filter(store_settings::setting_key.eq(document.key()))
        .select(store_settings::setting_value)
        .first(conn);

    match result {
        Ok(json) => Ok(serde_json::from_str(&json)?),
        Err(diesel::result::Error::NotFound) => {
            debug!(key = document.key(), "No stored document, using default");
            Ok(T::default())
        }
        Err(e) => Err(PersistenceError::from(e)),
    }
}
