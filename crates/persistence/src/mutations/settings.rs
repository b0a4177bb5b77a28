// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Store configuration document mutations.

use diesel::SqliteConnection;
use diesel::prelude::*;
use serde::Serialize;
use tracing::info;

use crate::data_models::StoreDocument;
use crate::diesel_schema::store_settings;
use crate::error::PersistenceError;

/// Stores a configuration document, replacing any previous value.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `document` - Which document to store
/// * `value` - The new value
///
/// # Errors
///
/// Returns an error if serialization or the write fails.
pub fn put_document<T>(
    conn: &mut SqliteConnection,
    document: StoreDocument,
    value: &T,
) -> Result<(), PersistenceError>
where
    T: Serialize,
{
    let json: String = serde_json::to_string(value)?;

    diesel::replace_into(store_settings::table)
        .values((
            store_settings::setting_key.eq(document.key()),
            store_settings::setting_value.eq(&json),
            store_settings::updated_at.eq(diesel::dsl::sql::<diesel::sql_types::Text>(
                "CURRENT_TIMESTAMP",
            )),
        ))
        .execute(conn)?;

    info!(key = document.key(), "Store document saved");
    Ok(())
}
