// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Order mutations.

use diesel::SqliteConnection;
use diesel::prelude::*;
use diesel::result::DatabaseErrorKind;
use fotoexpres::Order;
use fotoexpres_domain::{OrderNumber, OrderStatus};
use time::format_description::well_known::Rfc3339;
use tracing::info;

use crate::backend::sqlite::get_last_insert_rowid;
use crate::diesel_schema::orders;
use crate::error::PersistenceError;

/// Inserts a new order.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `order` - The assembled order
///
/// # Returns
///
/// The row ID of the inserted order.
///
/// # Errors
///
/// Returns `PersistenceError::DuplicateOrderNumber` if the number is taken,
/// or another error if serialization or the insert fails.
pub fn insert_order(conn: &mut SqliteConnection, order: &Order) -> Result<i64, PersistenceError> {
    let contact_json: String = serde_json::to_string(order.contact_info())?;
    let photo_specs_json: String = serde_json::to_string(order.photo_specs())?;
    let created_at: String = order
        .created_at()
        .format(&Rfc3339)
        .map_err(|e| PersistenceError::SerializationError(e.to_string()))?;
    let total_photos: i32 = i32::try_from(order.total_photos()).map_err(|_| {
        PersistenceError::SerializationError(format!(
            "total_photos {} out of range",
            order.total_photos()
        ))
    })?;

    let result: Result<usize, diesel::result::Error> = diesel::insert_into(orders::table)
        .values((
            orders::order_number.eq(order.order_number().as_str()),
            orders::status.eq(order.status().as_str()),
            orders::created_at.eq(&created_at),
            orders::contact_json.eq(&contact_json),
            orders::photo_specs_json.eq(&photo_specs_json),
            orders::archive_path.eq(order.archive_path()),
            orders::total_photos.eq(total_photos),
        ))
        .execute(conn);

    match result {
        Ok(_) => {}
        Err(diesel::result::Error::DatabaseError(DatabaseErrorKind::UniqueViolation, _)) => {
            return Err(PersistenceError::DuplicateOrderNumber(
                order.order_number().to_string(),
            ));
        }
        Err(e) => return Err(PersistenceError::from(e)),
    }

    let order_id: i64 = get_last_insert_rowid(conn)?;

    info!(
        order_id,
        order_number = %order.order_number(),
        total_photos = order.total_photos(),
        "Order persisted"
    );

    Ok(order_id)
}

/// Updates an order's status.
///
/// # Errors
///
/// Returns `PersistenceError::OrderNotFound` if no order has this number.
pub fn update_order_status(
    conn: &mut SqliteConnection,
    order_number: &OrderNumber,
    status: OrderStatus,
) -> Result<(), PersistenceError> {
    let updated: usize = diesel::update(orders::table)
        .filter(orders::order_number.eq(order_number.as_str()))
        .set(orders::status.eq(status.as_str()))
        .execute(conn)?;

    if updated == 0 {
        return Err(PersistenceError::OrderNotFound(order_number.to_string()));
    }

    info!(order_number = %order_number, status = %status, "Order status updated");
    Ok(())
}

/// Deletes an order record.
///
/// # Errors
///
/// Returns `PersistenceError::OrderNotFound` if no order has this number.
pub fn delete_order(
    conn: &mut SqliteConnection,
    order_number: &OrderNumber,
) -> Result<(), PersistenceError> {
    let deleted: usize = diesel::delete(orders::table)
        .filter(orders::order_number.eq(order_number.as_str()))
        .execute(conn)?;

    if deleted == 0 {
        return Err(PersistenceError::OrderNotFound(order_number.to_string()));
    }

    info!(order_number = %order_number, "Order record deleted");
    Ok(())
}
