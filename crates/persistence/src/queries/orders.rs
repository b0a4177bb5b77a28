// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Order queries.

use diesel::prelude::*;
use diesel::SqliteConnection;
use fotoexpres::Order;
use fotoexpres_domain::{ContactInfo, OrderNumber, OrderStatus, PhotoSpec};
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;
use tracing::debug;

use crate::diesel_schema::orders;
use crate::error::PersistenceError;

/// Diesel Queryable struct for order rows.
#[derive(Queryable, Selectable)]
#[diesel(table_name = orders)]
struct OrderRow {
    order_number: String,
    status: String,
    created_at: String,
    contact_json: String,
    photo_specs_json: String,
    archive_path: String,
    total_photos: i32,
}

impl TryFrom<OrderRow> for Order {
    type Error = PersistenceError;

    fn try_from(row: OrderRow) -> Result<Self, Self::Error> {
        let order_number: OrderNumber = OrderNumber::parse(&row.order_number)
            .map_err(|e| PersistenceError::ReconstructionError(e.to_string()))?;
        let status: OrderStatus = row
            .status
            .parse()
            .map_err(|e: fotoexpres_domain::DomainError| {
                PersistenceError::ReconstructionError(e.to_string())
            })?;
        let created_at: OffsetDateTime = OffsetDateTime::parse(&row.created_at, &Rfc3339)
            .map_err(|e| {
                PersistenceError::ReconstructionError(format!(
                    "Invalid created_at '{}': {e}",
                    row.created_at
                ))
            })?;
        let contact_info: ContactInfo = serde_json::from_str(&row.contact_json)?;
        let photo_specs: Vec<PhotoSpec> = serde_json::from_str(&row.photo_specs_json)?;
        let total_photos: u32 = u32::try_from(row.total_photos).map_err(|_| {
            PersistenceError::ReconstructionError(format!(
                "Negative total_photos {} for {}",
                row.total_photos, row.order_number
            ))
        })?;

        Ok(Self::restore(
            order_number,
            status,
            created_at,
            contact_info,
            photo_specs,
            row.archive_path,
            total_photos,
        ))
    }
}

/// Retrieves an order by number.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `order_number` - The order number
///
/// # Errors
///
/// Returns an error if the query fails or the stored row is invalid.
/// Returns `Ok(None)` if the order does not exist.
pub fn get_order(
    conn: &mut SqliteConnection,
    order_number: &OrderNumber,
) -> Result<Option<Order>, PersistenceError> {
    debug!(order_number = %order_number, "Looking up order");

    let result: Result<OrderRow, diesel::result::Error> = orders::table
        .filter(orders::order_number.eq(order_number.as_str()))
        .select(OrderRow::as_select())
        .first(conn);

    match result {
        Ok(row) => Ok(Some(Order::try_from(row)?)),
        Err(diesel::result::Error::NotFound) => Ok(None),
        Err(e) => Err(PersistenceError::from(e)),
    }
}

/// Checks whether an order with this number exists.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn order_exists(
    conn: &mut SqliteConnection,
    order_number: &OrderNumber,
) -> Result<bool, PersistenceError> {
    let count: i64 = orders::table
        .filter(orders::order_number.eq(order_number.as_str()))
        .count()
        .get_result(conn)?;
    Ok(count > 0)
}

/// Lists all orders, newest first.
///
/// Orders created in the same second are ordered by insertion, newest first.
///
/// # Errors
///
/// Returns an error if the query fails or a stored row is invalid.
pub fn list_orders(conn: &mut SqliteConnection) -> Result<Vec<Order>, PersistenceError> {
    let rows: Vec<OrderRow> = orders::table
        .order((orders::created_at.desc(), orders::order_id.desc()))
        .select(OrderRow::as_select())
        .load(conn)?;

    debug!(count = rows.len(), "Loaded orders");

    rows.into_iter().map(Order::try_from).collect()
}
