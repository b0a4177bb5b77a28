// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Test helper functions and fixtures.

use fotoexpres::OrderRequest;
use fotoexpres_domain::{ContactInfo, PhotoSpec, ProcessingOptions};
use fotoexpres_persistence::Persistence;
use std::sync::mpsc::{Receiver, Sender, channel};
use std::sync::{Arc, Mutex as StdMutex};
use tempfile::TempDir;
use tokio::sync::Mutex;

use crate::notify::{Notifier, NotifyError, OrderNotification};
use crate::orders::OrderService;
use crate::request_response::UploadedFile;
use crate::storage::OrderStorage;
use crate::{AuthenticatedActor, Role};

pub fn create_test_admin() -> AuthenticatedActor {
    AuthenticatedActor::new(String::from("admin"), Role::Admin)
}

pub fn create_test_viewer() -> AuthenticatedActor {
    AuthenticatedActor::new(String::from("pregled"), Role::Viewer)
}

pub fn create_test_contact() -> ContactInfo {
    ContactInfo::new(
        "Ana Nikolić",
        "ana@example.com",
        "+381 62 222 3344",
        "Cara Dušana 7",
        "18000",
        "Niš",
        Some("Ostaviti kod komšije"),
    )
}

pub fn create_test_specs() -> Vec<PhotoSpec> {
    vec![
        PhotoSpec::new("plaza.jpg", "9x13", "sjajni", 2),
        PhotoSpec::new("planina.jpg", "10x15", "mat", 3),
    ]
}

pub fn create_test_request() -> OrderRequest {
    OrderRequest {
        contact_info: create_test_contact(),
        photo_specs: create_test_specs(),
        processing_options: ProcessingOptions::default(),
    }
}

pub fn create_test_uploads() -> Vec<UploadedFile> {
    vec![
        UploadedFile {
            file_name: String::from("plaza.jpg"),
            bytes: b"plaza-bytes".to_vec(),
        },
        UploadedFile {
            file_name: String::from("planina.jpg"),
            bytes: b"planina-bytes".to_vec(),
        },
    ]
}

/// An order service over a fresh in-memory database and a temporary data
/// directory. Keep the `TempDir` alive for the duration of the test.
pub fn create_test_service(
    notifier: Option<Arc<dyn Notifier>>,
) -> (OrderService, Arc<Mutex<Persistence>>, TempDir) {
    let data_dir: TempDir = tempfile::tempdir().unwrap();
    let persistence: Arc<Mutex<Persistence>> =
        Arc::new(Mutex::new(Persistence::new_in_memory().unwrap()));
    let storage: OrderStorage = OrderStorage::open(data_dir.path()).unwrap();
    let service: OrderService = OrderService::new(Arc::clone(&persistence), storage, notifier);
    (service, persistence, data_dir)
}

/// A notifier that forwards every notification to a channel.
pub struct RecordingNotifier {
    sender: StdMutex<Sender<OrderNotification>>,
}

impl RecordingNotifier {
    pub fn new() -> (Self, Receiver<OrderNotification>) {
        let (sender, receiver): (Sender<OrderNotification>, Receiver<OrderNotification>) =
            channel();
        (
            Self {
                sender: StdMutex::new(sender),
            },
            receiver,
        )
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notification: &OrderNotification) -> Result<(), NotifyError> {
        self.sender
            .lock()
            .unwrap()
            .send(notification.clone())
            .unwrap();
        Ok(())
    }
}

/// A notifier that always fails.
pub struct FailingNotifier;

impl Notifier for FailingNotifier {
    fn notify(&self, notification: &OrderNotification) -> Result<(), NotifyError> {
        Err(NotifyError::DeliveryFailed {
            order_number: notification.order_number.to_string(),
            reason: String::from("smtp unavailable"),
        })
    }
}
