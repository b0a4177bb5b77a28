// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Order creation, chunked-upload finalize and order administration.
//!
//! Archive assembly and all file I/O run on the blocking pool. An order is
//! persisted only after its archive is published, so a stored order always
//! has a complete archive behind it.
//!
//! Every operation that writes under one order number holds that number's
//! claim, so creating, staging, finalizing, deleting and purging the same
//! number never overlap.

use fotoexpres::{
    ArchiveManifest, Order, OrderRequest, PricingResult, SummaryInput, assemble_order,
    build_manifest, compute_pricing, format_order_summary, generate_order_number,
};
use fotoexpres_domain::{
    OrderNumber, OrderStatus, PhotoSpec, PriceTable, Promotion, QuantityDiscountTable,
    StoreSettings, validate_file_name, validate_photo_specs,
};
use fotoexpres_persistence::{Persistence, PersistenceError, StoreDocument};
use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;
use time::{Duration, OffsetDateTime};
use tokio::sync::{Mutex, OwnedMutexGuard};
use tracing::{error, info, warn};

use crate::auth::{AuthenticatedActor, AuthorizationService};
use crate::error::{ApiError, translate_core_error, translate_domain_error};
use crate::notify::{Notifier, OrderNotification, dispatch};
use crate::request_response::{CreateOrderResponse, FinalizeOutcome, UploadResponse, UploadedFile};
use crate::storage::{OrderStorage, PendingArchive};

/// Attempts at drawing an unused order number before giving up.
const MAX_ORDER_NUMBER_ATTEMPTS: usize = 20;

/// The store configuration documents used to price one order.
///
/// Loaded fresh for every request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfiguration {
    /// Unit prices per format.
    pub prices: PriceTable,
    /// Quantity discount tiers.
    pub discounts: QuantityDiscountTable,
    /// The promotion.
    pub promotion: Promotion,
    /// General settings, including delivery.
    pub settings: StoreSettings,
}

impl StoreConfiguration {
    /// Loads every document, falling back to defaults for unset ones.
    ///
    /// # Errors
    ///
    /// Returns an error if a stored document cannot be read.
    pub fn load(persistence: &mut Persistence) -> Result<Self, ApiError> {
        Ok(Self {
            prices: persistence.get_document(StoreDocument::Prices)?,
            discounts: persistence.get_document(StoreDocument::Discounts)?,
            promotion: persistence.get_document(StoreDocument::Promotion)?,
            settings: persistence.get_document(StoreDocument::Settings)?,
        })
    }

    /// Prices photo specifications under this configuration.
    #[must_use]
    pub fn price(&self, specs: &[PhotoSpec], evaluated_at: OffsetDateTime) -> PricingResult {
        compute_pricing(
            specs,
            &self.prices,
            &self.discounts,
            Some(&self.promotion),
            &self.settings.delivery(),
            evaluated_at,
        )
    }
}

/// Orchestrates order creation and administration.
pub struct OrderService {
    persistence: Arc<Mutex<Persistence>>,
    storage: OrderStorage,
    notifier: Option<Arc<dyn Notifier>>,
    number_locks: Mutex<HashMap<OrderNumber, Arc<Mutex<()>>>>,
}

/// Exclusive hold on one order number.
pub struct NumberClaim {
    pub(crate) order_number: OrderNumber,
    lock: Arc<Mutex<()>>,
    guard: OwnedMutexGuard<()>,
}

impl OrderService {
    /// Creates the service.
    ///
    /// # Arguments
    ///
    /// * `persistence` - The shared persistence layer
    /// * `storage` - Upload and archive storage
    /// * `notifier` - Staff notification channel, if configured
    #[must_use]
    pub fn new(
        persistence: Arc<Mutex<Persistence>>,
        storage: OrderStorage,
        notifier: Option<Arc<dyn Notifier>>,
    ) -> Self {
        Self {
            persistence,
            storage,
            notifier,
            number_locks: Mutex::new(HashMap::new()),
        }
    }

    /// Returns the upload and archive storage.
    #[must_use]
    pub const fn storage(&self) -> &OrderStorage {
        &self.storage
    }

    /// Prices photo specifications without creating anything.
    ///
    /// # Errors
    ///
    /// Returns an error if a specification is invalid or the configuration
    /// cannot be loaded.
    pub async fn quote(&self, specs: &[PhotoSpec]) -> Result<PricingResult, ApiError> {
        validate_photo_specs(specs).map_err(translate_domain_error)?;
        let config: StoreConfiguration = self.load_configuration().await?;
        Ok(config.price(specs, OffsetDateTime::now_utc()))
    }

    /// Creates an order from one request carrying both the order description
    /// and every photo.
    ///
    /// The order number stays claimed until the order is persisted or its
    /// staged photos are removed after a failure.
    ///
    /// # Errors
    ///
    /// Returns a client error if the request is invalid or references a photo
    /// that was not uploaded, or a retryable storage failure if files cannot
    /// be written.
    pub async fn create_order(
        &self,
        request: OrderRequest,
        uploads: Vec<UploadedFile>,
    ) -> Result<CreateOrderResponse, ApiError> {
        request.validate().map_err(translate_core_error)?;
        check_uploads_cover_specs(&request.photo_specs, &uploads)?;

        let claim: NumberClaim = self.allocate_order_number().await?;
        let order_number: OrderNumber = claim.order_number.clone();

        let result: Result<CreateOrderResponse, ApiError> = async {
            self.stage_files(&order_number, uploads).await?;
            self.finalize_staged(&order_number, request).await
        }
        .await;

        if let Err(e) = &result {
            warn!(order_number = %order_number, error = %e, "Order creation failed");
            // The staging directory was reserved by this request
            self.remove_staging(&order_number).await;
        }
        self.release(claim).await;
        result
    }

    /// Stages photos for a client-chosen order number.
    ///
    /// Waits while another request holds the number, so photos never land in
    /// a number that is being created or finalized.
    ///
    /// # Errors
    ///
    /// Returns an error if the order number is malformed, the order was
    /// already finalized, no files were sent, or a file cannot be stored.
    pub async fn stage_upload(
        &self,
        order_number: &str,
        uploads: Vec<UploadedFile>,
    ) -> Result<UploadResponse, ApiError> {
        let order_number: OrderNumber =
            OrderNumber::parse(order_number).map_err(translate_domain_error)?;

        if uploads.is_empty() {
            return Err(ApiError::InvalidInput {
                field: String::from("photos"),
                message: String::from("No files were uploaded"),
            });
        }
        let uploaded: usize = uploads.len();
        let claim: NumberClaim = self.claim(&order_number).await;
        let result: Result<(), ApiError> = async {
            if self.persistence.lock().await.order_exists(&order_number)? {
                return Err(ApiError::DomainRuleViolation {
                    rule: String::from("order_already_finalized"),
                    message: format!("Order {order_number} is already finalized"),
                });
            }
            self.stage_files(&order_number, uploads).await
        }
        .await;
        self.release(claim).await;
        result?;

        Ok(UploadResponse {
            success: true,
            order_number: order_number.to_string(),
            uploaded,
        })
    }

    /// Builds and persists an order from previously staged photos.
    ///
    /// Finalizations of the same order number are serialized; a finalize for
    /// an order that already exists is a successful no-op.
    ///
    /// # Errors
    ///
    /// Returns a client error if the request is invalid or a referenced photo
    /// was not staged, or a retryable storage failure. Staged files are kept
    /// so the client can retry.
    pub async fn finalize_upload(
        &self,
        order_number: &str,
        request: OrderRequest,
    ) -> Result<FinalizeOutcome, ApiError> {
        let order_number: OrderNumber =
            OrderNumber::parse(order_number).map_err(translate_domain_error)?;
        request.validate().map_err(translate_core_error)?;

        let claim: NumberClaim = self.claim(&order_number).await;

        let result: Result<FinalizeOutcome, ApiError> = async {
            let existing: Option<Order> = self.persistence.lock().await.get_order(&order_number)?;
            match existing {
                Some(order) => {
                    info!(order_number = %order_number, "Duplicate finalize ignored");
                    Ok(FinalizeOutcome::AlreadyFinalized(order))
                }
                None => Ok(FinalizeOutcome::Created(
                    self.finalize_staged(&order_number, request).await?,
                )),
            }
        }
        .await;

        self.release(claim).await;
        result
    }

    /// Looks up one order.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::ResourceNotFound` if the order does not exist.
    pub async fn get_order(&self, order_number: &str) -> Result<Order, ApiError> {
        let order_number: OrderNumber =
            OrderNumber::parse(order_number).map_err(translate_domain_error)?;
        self.persistence
            .lock()
            .await
            .get_order(&order_number)?
            .ok_or_else(|| order_not_found(&order_number))
    }

    /// Lists all orders, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the orders cannot be loaded.
    pub async fn list_orders(&self) -> Result<Vec<Order>, ApiError> {
        Ok(self.persistence.lock().await.list_orders()?)
    }

    /// Changes an order's status.
    ///
    /// # Errors
    ///
    /// Returns an error if the actor is not an admin, the status is not one
    /// of `pending`, `processing`, `completed`, or the order does not exist.
    pub async fn update_status(
        &self,
        actor: &AuthenticatedActor,
        order_number: &str,
        status: &str,
    ) -> Result<Order, ApiError> {
        AuthorizationService::authorize_mutation(actor, "update_order_status")?;
        let order_number: OrderNumber =
            OrderNumber::parse(order_number).map_err(translate_domain_error)?;
        let status: OrderStatus = status.parse().map_err(translate_domain_error)?;

        let order: Order = {
            let mut persistence: tokio::sync::MutexGuard<'_, Persistence> =
                self.persistence.lock().await;
            let order: Order = persistence
                .get_order(&order_number)?
                .ok_or_else(|| order_not_found(&order_number))?;
            persistence.update_order_status(&order_number, status)?;
            order.with_status(status)
        };

        info!(order_number = %order_number, status = %status, actor = %actor.id, "Order status changed");
        Ok(order)
    }

    /// Deletes an order together with its archive and staged photos.
    ///
    /// # Errors
    ///
    /// Returns an error if the actor is not an admin or the order does not
    /// exist.
    pub async fn delete_order(
        &self,
        actor: &AuthenticatedActor,
        order_number: &str,
    ) -> Result<(), ApiError> {
        AuthorizationService::authorize_mutation(actor, "delete_order")?;
        let order_number: OrderNumber =
            OrderNumber::parse(order_number).map_err(translate_domain_error)?;

        let claim: NumberClaim = self.claim(&order_number).await;
        let deleted: Result<(), PersistenceError> =
            self.persistence.lock().await.delete_order(&order_number);
        if deleted.is_ok() {
            self.discard(&order_number).await;
        }
        self.release(claim).await;
        deleted?;

        info!(order_number = %order_number, actor = %actor.id, "Order deleted");
        Ok(())
    }

    /// Reads an order's archive.
    ///
    /// # Returns
    ///
    /// The archive file name and its bytes.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::ResourceNotFound` if the order or its archive does
    /// not exist.
    pub async fn read_archive(&self, order_number: &str) -> Result<(String, Vec<u8>), ApiError> {
        let order: Order = self.get_order(order_number).await?;
        let storage: OrderStorage = self.storage.clone();
        let number: OrderNumber = order.order_number().clone();
        let bytes: Vec<u8> = tokio::task::spawn_blocking(move || storage.read_archive(&number))
            .await
            .map_err(join_error)??;
        Ok((order.archive_path().to_string(), bytes))
    }

    /// Removes staged photos that were never finalized and have been idle
    /// for longer than `max_age`.
    ///
    /// # Returns
    ///
    /// The number of staging directories removed.
    ///
    /// # Errors
    ///
    /// Returns an error if the staging root cannot be listed or a directory
    /// cannot be removed.
    pub async fn purge_abandoned_uploads(&self, max_age: Duration) -> Result<usize, ApiError> {
        let cutoff: OffsetDateTime = OffsetDateTime::now_utc() - max_age;
        let storage: OrderStorage = self.storage.clone();
        let candidates: Vec<OrderNumber> =
            tokio::task::spawn_blocking(move || storage.idle_staging(cutoff))
                .await
                .map_err(join_error)??;

        let mut purged: usize = 0;
        for order_number in candidates {
            let claim: NumberClaim = self.claim(&order_number).await;
            let result: Result<bool, ApiError> = async {
                // Finalized orders keep their photos until the order is deleted
                if self.persistence.lock().await.order_exists(&order_number)?
                    || !self.storage.is_staging_idle(&order_number, cutoff)
                {
                    return Ok(false);
                }
                self.storage.remove_staging(&order_number)?;
                Ok(true)
            }
            .await;
            self.release(claim).await;

            if result? {
                info!(order_number = %order_number, "Abandoned upload removed");
                purged += 1;
            }
        }
        Ok(purged)
    }

    async fn load_configuration(&self) -> Result<StoreConfiguration, ApiError> {
        let mut persistence: tokio::sync::MutexGuard<'_, Persistence> =
            self.persistence.lock().await;
        StoreConfiguration::load(&mut persistence)
    }

    /// Draws random order numbers until one is neither stored nor staged,
    /// and reserves it.
    ///
    /// The returned claim must be released once the order is persisted or
    /// abandoned.
    pub(crate) async fn allocate_order_number(&self) -> Result<NumberClaim, ApiError> {
        for _ in 0..MAX_ORDER_NUMBER_ATTEMPTS {
            let candidate: OrderNumber = generate_order_number().map_err(translate_core_error)?;
            let claim: NumberClaim = self.claim(&candidate).await;
            match self.reserve_claimed(&candidate).await {
                Ok(true) => return Ok(claim),
                Ok(false) => self.release(claim).await,
                Err(e) => {
                    self.release(claim).await;
                    return Err(e);
                }
            }
        }

        error!("Could not allocate an unused order number");
        Err(ApiError::storage("Could not allocate an order number"))
    }

    async fn reserve_claimed(&self, order_number: &OrderNumber) -> Result<bool, ApiError> {
        let stored: bool = self.persistence.lock().await.order_exists(order_number)?;
        if stored {
            return Ok(false);
        }
        self.storage.reserve(order_number)
    }

    async fn stage_files(
        &self,
        order_number: &OrderNumber,
        uploads: Vec<UploadedFile>,
    ) -> Result<(), ApiError> {
        let storage: OrderStorage = self.storage.clone();
        let number: OrderNumber = order_number.clone();
        tokio::task::spawn_blocking(move || {
            uploads
                .iter()
                .try_for_each(|upload| storage.stage_file(&number, &upload.file_name, &upload.bytes))
        })
        .await
        .map_err(join_error)?
    }

    /// Prices, summarizes, archives and persists an order whose photos are
    /// staged.
    ///
    /// Callers hold the number's claim. The archive is published only after
    /// the number is confirmed unused, and removed again only if this call
    /// published it, so an existing order's archive is never touched.
    pub(crate) async fn finalize_staged(
        &self,
        order_number: &OrderNumber,
        request: OrderRequest,
    ) -> Result<CreateOrderResponse, ApiError> {
        // Whole seconds keep stored timestamps lexically sortable
        let now: OffsetDateTime = OffsetDateTime::now_utc();
        let created_at: OffsetDateTime = now.replace_nanosecond(0).unwrap_or(now);
        let config: StoreConfiguration = self.load_configuration().await?;
        let pricing: PricingResult = config.price(&request.photo_specs, created_at);

        if !pricing.missing_price_formats.is_empty() {
            warn!(
                order_number = %order_number,
                formats = ?pricing.missing_price_formats,
                "No price configured for format; charged as 0"
            );
        }

        let summary: String = format_order_summary(&SummaryInput {
            order_number,
            contact: &request.contact_info,
            photo_specs: &request.photo_specs,
            pricing: &pricing,
            options: request.processing_options,
            timestamp: created_at,
            settings: &config.settings,
        });
        let manifest: ArchiveManifest = build_manifest(&request.photo_specs, summary);

        let storage: OrderStorage = self.storage.clone();
        let number: OrderNumber = order_number.clone();
        let pending: PendingArchive =
            tokio::task::spawn_blocking(move || storage.build_archive(&number, &manifest))
                .await
                .map_err(join_error)??;

        let order: Order = assemble_order(
            order_number.clone(),
            request.contact_info,
            request.photo_specs,
            pending.file_name().to_string(),
            OrderStatus::Pending,
            created_at,
        );

        {
            let mut persistence: tokio::sync::MutexGuard<'_, Persistence> =
                self.persistence.lock().await;
            if persistence.order_exists(order_number)? {
                // Dropping the pending archive deletes it
                return Err(ApiError::DomainRuleViolation {
                    rule: String::from("unique_order_number"),
                    message: format!("Order {order_number} already exists"),
                });
            }
            pending.publish()?;
            if let Err(e) = persistence.insert_order(&order) {
                drop(persistence);
                if let Err(cleanup) = self.storage.remove_archive(order_number) {
                    warn!(order_number = %order_number, error = %cleanup, "Cleanup of archive failed");
                }
                return Err(ApiError::from(e));
            }
        }

        info!(
            order_number = %order_number,
            total_photos = order.total_photos(),
            grand_total = pricing.grand_total,
            "Order created"
        );

        dispatch(self.notifier.clone(), OrderNotification::from(&order));

        Ok(CreateOrderResponse {
            success: true,
            order_number: order_number.to_string(),
            message: String::from("Order created successfully"),
            zip_file_path: order.archive_path().to_string(),
            pricing,
        })
    }

    async fn discard(&self, order_number: &OrderNumber) {
        let storage: OrderStorage = self.storage.clone();
        let number: OrderNumber = order_number.clone();
        if let Err(e) = tokio::task::spawn_blocking(move || storage.discard(&number)).await {
            warn!(order_number = %order_number, error = %e, "Cleanup task failed");
        }
    }

    async fn remove_staging(&self, order_number: &OrderNumber) {
        let storage: OrderStorage = self.storage.clone();
        let number: OrderNumber = order_number.clone();
        match tokio::task::spawn_blocking(move || storage.remove_staging(&number)).await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => {
                warn!(order_number = %order_number, error = %e, "Cleanup of staged files failed");
            }
            Err(e) => warn!(order_number = %order_number, error = %e, "Cleanup task failed"),
        }
    }

    /// Waits for exclusive hold on an order number.
    pub(crate) async fn claim(&self, order_number: &OrderNumber) -> NumberClaim {
        let lock: Arc<Mutex<()>> = {
            let mut locks: tokio::sync::MutexGuard<'_, HashMap<OrderNumber, Arc<Mutex<()>>>> =
                self.number_locks.lock().await;
            Arc::clone(locks.entry(order_number.clone()).or_default())
        };
        let guard: OwnedMutexGuard<()> = Arc::clone(&lock).lock_owned().await;
        NumberClaim {
            order_number: order_number.clone(),
            lock,
            guard,
        }
    }

    /// Releases a claim, dropping the lock entry unless another task holds or
    /// awaits it.
    pub(crate) async fn release(&self, claim: NumberClaim) {
        let NumberClaim {
            order_number,
            lock,
            guard,
        } = claim;
        drop(guard);

        let mut locks: tokio::sync::MutexGuard<'_, HashMap<OrderNumber, Arc<Mutex<()>>>> =
            self.number_locks.lock().await;
        // One reference in the map, one held here
        if Arc::strong_count(&lock) <= 2 {
            locks.remove(&order_number);
        }
    }
}

/// Rejects an order whose specifications reference a photo that is not
/// among the uploads, before anything is written.
fn check_uploads_cover_specs(specs: &[PhotoSpec], uploads: &[UploadedFile]) -> Result<(), ApiError> {
    let mut uploaded: BTreeSet<&str> = BTreeSet::new();
    for upload in uploads {
        validate_file_name(&upload.file_name).map_err(translate_domain_error)?;
        uploaded.insert(upload.file_name.as_str());
    }

    match specs
        .iter()
        .find(|spec| !uploaded.contains(spec.file_name.as_str()))
    {
        Some(spec) => Err(ApiError::InvalidInput {
            field: String::from("photos"),
            message: format!(
                "Photo '{}' is referenced by the order but was not uploaded",
                spec.file_name
            ),
        }),
        None => Ok(()),
    }
}

fn order_not_found(order_number: &OrderNumber) -> ApiError {
    ApiError::ResourceNotFound {
        resource_type: String::from("Order"),
        message: format!("Order {order_number} does not exist"),
    }
}

fn join_error(err: tokio::task::JoinError) -> ApiError {
    ApiError::Internal {
        message: format!("Background task failed: {err}"),
    }
}
