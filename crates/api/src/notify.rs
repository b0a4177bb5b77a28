// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Staff notification about new orders.
//!
//! Notification is best-effort: it runs after the order is persisted, in a
//! detached task, and its failures are logged and dropped.

use fotoexpres::Order;
use fotoexpres_domain::{ContactInfo, OrderNumber, PhotoSpec};
use std::sync::Arc;
use thiserror::Error;
use tracing::{error, info};

/// Notification delivery errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum NotifyError {
    /// The notification could not be delivered.
    #[error("Failed to deliver notification for {order_number}: {reason}")]
    DeliveryFailed {
        order_number: String,
        reason: String,
    },
}

/// What staff are told about a new order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderNotification {
    /// The order number.
    pub order_number: OrderNumber,
    /// The customer's contact information.
    pub contact_info: ContactInfo,
    /// The order's photo specifications.
    pub photo_specs: Vec<PhotoSpec>,
    /// Total physical prints.
    pub total_photos: u32,
    /// The archive file name.
    pub archive_path: String,
}

impl From<&Order> for OrderNotification {
    fn from(order: &Order) -> Self {
        Self {
            order_number: order.order_number().clone(),
            contact_info: order.contact_info().clone(),
            photo_specs: order.photo_specs().to_vec(),
            total_photos: order.total_photos(),
            archive_path: order.archive_path().to_string(),
        }
    }
}

/// A channel that tells staff about new orders.
pub trait Notifier: Send + Sync {
    /// Delivers one notification. May block.
    ///
    /// # Errors
    ///
    /// Returns an error if delivery fails.
    fn notify(&self, notification: &OrderNotification) -> Result<(), NotifyError>;
}

/// Records notifications through tracing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogNotifier {
    recipient: String,
    sender: String,
}

impl LogNotifier {
    /// Creates a notifier when both addresses are configured.
    ///
    /// Missing configuration is normal and yields `None`.
    #[must_use]
    pub fn from_config(recipient: Option<String>, sender: Option<String>) -> Option<Self> {
        match (recipient, sender) {
            (Some(recipient), Some(sender)) if !recipient.is_empty() && !sender.is_empty() => {
                Some(Self { recipient, sender })
            }
            _ => {
                info!("Order notifications are not configured");
                None
            }
        }
    }
}

impl Notifier for LogNotifier {
    fn notify(&self, notification: &OrderNotification) -> Result<(), NotifyError> {
        info!(
            from = %self.sender,
            to = %self.recipient,
            order_number = %notification.order_number,
            customer = %notification.contact_info.full_name,
            email = %notification.contact_info.email,
            photos = notification.photo_specs.len(),
            total_photos = notification.total_photos,
            archive = %notification.archive_path,
            "New order notification"
        );
        Ok(())
    }
}

/// Sends a notification in a detached blocking task.
///
/// Does nothing when no notifier is configured. Errors are logged only.
pub fn dispatch(notifier: Option<Arc<dyn Notifier>>, notification: OrderNotification) {
    let Some(notifier) = notifier else {
        return;
    };

    tokio::task::spawn_blocking(move || {
        if let Err(e) = notifier.notify(&notification) {
            error!(
                order_number = %notification.order_number,
                error = %e,
                "Order notification failed"
            );
        }
    });
}
