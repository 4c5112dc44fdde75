//! Wizard Session
//!
//! One configuration session for one product: the loaded catalog, the
//! selection machine, step navigation, recognition lifecycle and submission.
//! Opening the wizard or switching product starts from an empty state; nothing
//! is shared between sessions.
//!
//! # 识别流程
//!
//! ```text
//! begin_recognition ──► PendingRecognition::run ──► apply_recognition
//!   (票据 + 清理旧状态)     (识别 ∥ 上传, 不借用会话)     (过期结果丢弃)
//! ```

use crate::catalog::{self, Catalog, CatalogCache, CatalogSource};
use crate::core::{Config, EngineRules};
use crate::media::{ImageLimits, prepare_reference_image};
use crate::pricing::{PriceBreakdown, calculate_price};
use crate::recognition::{
    CaseMismatch, HighlightTimer, MismatchResolution, RecognitionTicket, RecognitionTracker,
    ReconcileReport, reconcile,
};
use crate::services::{
    AssetStorage, ImagePayload, RecognitionService, ServiceResult, SubmissionSink,
};
use crate::submission::build_submission;
use crate::wizard::{
    SelectOutcome, SelectionMachine, SelectionState, StepPlan, valid_groups, validate_step,
};
use serde::Serialize;
use shared::SelectionKey;
use shared::error::{AppError, AppResult, ErrorCode};
use shared::models::{OptionItem, RecognitionResult, Submission};

/// Catalog availability as shown to the user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CatalogStatus {
    /// Nothing loaded yet
    Loading,
    Ready,
    /// Loaded but empty: "cannot load options"
    Unavailable,
}

/// Recognition section of the wizard
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RecognitionView {
    /// Preview of the uploaded photo (data URI)
    pub preview_url: Option<String>,
    /// Advanced (spec field) section shown
    pub advanced_visible: bool,
    pub in_progress: bool,
    /// Inline error of the last attempt
    pub error: Option<String>,
    /// Pending mismatch awaiting a [`MismatchResolution`]
    pub mismatch: Option<CaseMismatch>,
    pub unmatched_specs: Vec<String>,
}

/// A started recognition, run without borrowing the session
#[derive(Debug, Clone)]
pub struct PendingRecognition {
    pub ticket: RecognitionTicket,
    /// Group drilled into when the photo was uploaded
    pub group_key: String,
    pub payload: ImagePayload,
    /// Storage bucket for the reference photo
    pub bucket: String,
}

/// Completed recognition call, to hand back to [`WizardSession::apply_recognition`]
#[derive(Debug)]
pub struct RecognitionOutcome {
    pub ticket: RecognitionTicket,
    pub group_key: String,
    pub result: ServiceResult<RecognitionResult>,
    /// Public URL of the uploaded photo (best-effort)
    pub uploaded_url: Option<String>,
}

impl PendingRecognition {
    /// Run recognition and the best-effort reference upload concurrently
    pub async fn run(
        self,
        recognizer: &dyn RecognitionService,
        storage: &dyn AssetStorage,
    ) -> RecognitionOutcome {
        let (result, upload) = tokio::join!(
            recognizer.recognize(&self.payload),
            storage.upload(&self.payload, &self.bucket),
        );
        let uploaded_url = match upload {
            Ok(url) => Some(url),
            Err(e) => {
                tracing::warn!(file = %self.payload.file_name, error = %e, "Reference image upload failed");
                None
            }
        };
        RecognitionOutcome {
            ticket: self.ticket,
            group_key: self.group_key,
            result,
            uploaded_url,
        }
    }
}

pub struct WizardSession {
    config: Config,
    rules: EngineRules,
    product_id: Option<String>,
    product_name: Option<String>,
    catalog: Catalog,
    status: CatalogStatus,
    machine: SelectionMachine,
    current_step: u32,
    tracker: RecognitionTracker,
    highlights: HighlightTimer,
    recognition: RecognitionView,
    reference_image_url: Option<String>,
}

impl WizardSession {
    pub fn new(config: Config) -> Self {
        let rules = EngineRules::from_config(&config);
        let highlights = HighlightTimer::new(config.highlight_delay());
        Self {
            config,
            rules,
            product_id: None,
            product_name: None,
            catalog: Catalog::empty(),
            status: CatalogStatus::Loading,
            machine: SelectionMachine::new(),
            current_step: 1,
            tracker: RecognitionTracker::new(),
            highlights,
            recognition: RecognitionView::default(),
            reference_image_url: None,
        }
    }

    /// Replace the engine rules (marker word lists, group keys, policy)
    pub fn with_rules(mut self, rules: EngineRules) -> Self {
        self.rules = rules;
        self
    }

    // ==================== Lifecycle ====================

    /// Open the wizard for a product, loading the catalog from its sources
    pub async fn open(
        &mut self,
        source: &dyn CatalogSource,
        cache: &dyn CatalogCache,
        product_id: Option<&str>,
        product_name: Option<&str>,
    ) -> CatalogStatus {
        let catalog = catalog::load_catalog(
            source,
            cache,
            product_id,
            self.config.cache_read_timeout(),
        )
        .await;
        self.open_with_catalog(catalog, product_id, product_name)
    }

    /// Open the wizard on an already-loaded catalog
    pub fn open_with_catalog(
        &mut self,
        catalog: Catalog,
        product_id: Option<&str>,
        product_name: Option<&str>,
    ) -> CatalogStatus {
        self.reset();
        self.product_id = product_id.map(String::from);
        self.product_name = product_name.map(String::from);
        self.status = if catalog.is_empty() {
            CatalogStatus::Unavailable
        } else {
            CatalogStatus::Ready
        };
        self.catalog = catalog;
        tracing::info!(
            product_id = ?self.product_id,
            groups = self.catalog.groups().len(),
            status = ?self.status,
            "Wizard opened"
        );
        self.status
    }

    /// Back to an empty selection on the first step
    pub fn reset(&mut self) {
        self.machine.reset();
        self.tracker.cancel();
        self.highlights.cancel();
        self.recognition = RecognitionView::default();
        self.reference_image_url = None;
        self.current_step = 1;
    }

    // ==================== Accessors ====================

    pub fn status(&self) -> CatalogStatus {
        self.status
    }

    /// Error to show instead of the wizard, if any
    pub fn status_error(&self) -> Option<AppError> {
        (self.status == CatalogStatus::Unavailable).then(|| AppError::new(ErrorCode::CatalogUnavailable))
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn rules(&self) -> &EngineRules {
        &self.rules
    }

    pub fn selection(&self) -> &SelectionState {
        self.machine.state()
    }

    pub fn machine(&self) -> &SelectionMachine {
        &self.machine
    }

    pub fn product_id(&self) -> Option<&str> {
        self.product_id.as_deref()
    }

    pub fn recognition_view(&self) -> &RecognitionView {
        &self.recognition
    }

    pub fn reference_image_url(&self) -> Option<&str> {
        self.reference_image_url.as_deref()
    }

    /// Keys currently highlighted as freshly matched
    pub fn fresh_matches(&self) -> Vec<SelectionKey> {
        self.highlights.snapshot()
    }

    pub fn is_fresh(&self, key: &SelectionKey) -> bool {
        self.highlights.is_fresh(key)
    }

    // ==================== Steps ====================

    /// Current step plan over the eligible groups
    pub fn steps(&self) -> StepPlan<'_> {
        StepPlan::partition(valid_groups(&self.catalog, self.machine.state()))
    }

    pub fn current_step(&self) -> u32 {
        self.current_step
    }

    /// Validate the current step and move to the next one
    ///
    /// Returns the step now shown (unchanged on the last step).
    pub fn advance(&mut self) -> AppResult<u32> {
        validate_step(&self.catalog, &self.machine, self.current_step)?;
        let next = self.steps().next_step(self.current_step);
        if let Some(next) = next {
            self.current_step = next;
        }
        Ok(self.current_step)
    }

    pub fn back(&mut self) -> u32 {
        let previous = self.steps().previous_step(self.current_step);
        if let Some(previous) = previous {
            self.current_step = previous;
        }
        self.current_step
    }

    /// Keep the current step pointing at a step that still exists
    fn clamp_step(&mut self) {
        if self.current_step == 1 {
            return;
        }
        let plan = self.steps();
        let fallback = plan
            .groups(self.current_step)
            .is_empty()
            .then(|| plan.previous_step(self.current_step).unwrap_or(1));
        drop(plan);
        if let Some(step) = fallback {
            self.current_step = step;
        }
    }

    /// Items of a group permitted for the current product
    pub fn items(&self, group_key: &str) -> AppResult<Vec<&OptionItem>> {
        let group = self
            .catalog
            .group(group_key)
            .ok_or_else(|| AppError::group_not_found(group_key))?;
        Ok(catalog::filtered_items(
            &self.catalog,
            &group.id,
            self.product_id.as_deref(),
        ))
    }

    // ==================== Selection ====================

    pub fn select(&mut self, group_key: &str, item_id: &str) -> AppResult<SelectOutcome> {
        let group = self
            .catalog
            .group(group_key)
            .ok_or_else(|| AppError::group_not_found(group_key))?;
        if item_id != group.id
            && !catalog::is_item_available(&self.catalog, self.product_id.as_deref(), item_id)
        {
            return Err(AppError::with_message(
                ErrorCode::ItemNotAvailable,
                format!("Option {} is not available for this product", item_id),
            )
            .with_detail("item", item_id));
        }
        let outcome = self
            .machine
            .select(&self.catalog, &self.rules, group_key, item_id)?;
        self.clamp_step();
        Ok(outcome)
    }

    /// Write a sub-attribute; editing drops its fresh-match highlight at once
    pub fn set_sub_attribute(
        &mut self,
        group_key: &str,
        attr_id: &str,
        value: &str,
    ) -> AppResult<SelectionKey> {
        let key = self
            .machine
            .set_sub_attribute(&self.catalog, group_key, attr_id, value)?;
        self.highlights.clear_key(&key);
        Ok(key)
    }

    pub fn accept_fallback_text(&mut self, key: &SelectionKey) -> AppResult<()> {
        self.machine.accept_fallback_text(key)?;
        self.highlights.clear_key(key);
        Ok(())
    }

    pub fn drill_into(&mut self, group_key: &str) -> AppResult<()> {
        self.machine.drill_into(&self.catalog, group_key)
    }

    pub fn leave_drill(&mut self) {
        self.machine.leave_drill();
    }

    pub fn price(&self) -> PriceBreakdown {
        calculate_price(
            &self.catalog,
            self.machine.state(),
            self.machine.sticky_case_group(),
            self.rules.spec_price_policy,
        )
    }

    // ==================== Recognition ====================

    /// Start recognizing an uploaded reference photo
    ///
    /// Supersedes any recognition in flight and clears the previous attempt's
    /// mismatch, fallbacks and highlights.
    pub fn begin_recognition(&mut self, data: &[u8], file_name: &str) -> AppResult<PendingRecognition> {
        let group_key = self
            .machine
            .drilled_group()
            .ok_or_else(|| AppError::new(ErrorCode::NoActiveGroup))?
            .to_string();
        let limits = ImageLimits {
            max_bytes: self.config.max_upload_bytes,
            max_dimension: self.config.max_image_dimension,
        };
        let payload = prepare_reference_image(data, file_name, &limits)?;

        let ticket = self.tracker.issue();
        self.machine.state_mut().clear_pending_fallbacks();
        self.highlights.cancel();
        self.reference_image_url = None;
        self.recognition = RecognitionView {
            preview_url: Some(payload.data_uri.clone()),
            in_progress: true,
            ..Default::default()
        };
        tracing::info!(ticket = ticket.id(), group = %group_key, file = %payload.file_name, "Recognition started");

        Ok(PendingRecognition {
            ticket,
            group_key,
            payload,
            bucket: self.config.reference_image_bucket.clone(),
        })
    }

    /// Apply a finished recognition
    ///
    /// `Ok(None)` means the result was stale and ignored: a newer upload exists,
    /// or the user left the group the photo was uploaded for. A failed call
    /// reverts the recognition view and leaves the selection untouched.
    pub fn apply_recognition(
        &mut self,
        outcome: RecognitionOutcome,
    ) -> AppResult<Option<ReconcileReport>> {
        if !self.tracker.finish(outcome.ticket) {
            return Ok(None);
        }
        if self.machine.drilled_group() != Some(outcome.group_key.as_str()) {
            tracing::warn!(
                ticket = outcome.ticket.id(),
                group = %outcome.group_key,
                drilled = ?self.machine.drilled_group(),
                "Recognition result belongs to a group no longer active, ignoring"
            );
            self.recognition = RecognitionView::default();
            self.reference_image_url = None;
            return Ok(None);
        }

        let result = match outcome.result {
            Ok(result) => result,
            Err(e) => {
                tracing::warn!(ticket = outcome.ticket.id(), error = %e, "Recognition failed");
                return Err(self.fail_recognition(AppError::recognition(format!(
                    "Recognition failed: {}",
                    e
                ))));
            }
        };

        let report = match reconcile(
            &mut self.machine,
            &self.catalog,
            &self.rules,
            self.product_name.as_deref(),
            &result,
        ) {
            Ok(report) => report,
            Err(e) => return Err(self.fail_recognition(e)),
        };

        self.highlights.start(report.matched.iter().cloned());
        self.reference_image_url = outcome.uploaded_url;
        self.recognition.in_progress = false;
        self.recognition.advanced_visible = true;
        self.recognition.error = None;
        self.recognition.mismatch = report.mismatch.clone();
        self.recognition.unmatched_specs = report.unmatched_specs.clone();
        self.clamp_step();
        Ok(Some(report))
    }

    /// Revert to the pre-upload view and record the inline error
    fn fail_recognition(&mut self, err: AppError) -> AppError {
        self.recognition = RecognitionView {
            error: Some(err.message.clone()),
            ..Default::default()
        };
        self.reference_image_url = None;
        err
    }

    /// Upload, recognize and apply in one go
    pub async fn recognize(
        &mut self,
        recognizer: &dyn RecognitionService,
        storage: &dyn AssetStorage,
        data: &[u8],
        file_name: &str,
    ) -> AppResult<Option<ReconcileReport>> {
        let pending = self.begin_recognition(data, file_name)?;
        let outcome = pending.run(recognizer, storage).await;
        self.apply_recognition(outcome)
    }

    /// Resolve a pending mismatch warning
    pub fn resolve_mismatch(&mut self, resolution: MismatchResolution) -> AppResult<()> {
        if self.recognition.mismatch.is_none() {
            return Err(AppError::invalid_request("No recognition mismatch to resolve"));
        }
        let active = self.machine.drilled_group().map(String::from);

        self.tracker.cancel();
        self.highlights.cancel();
        self.machine.state_mut().clear_pending_fallbacks();
        self.reference_image_url = None;
        self.recognition = RecognitionView::default();

        if let Some(active) = active {
            match resolution {
                MismatchResolution::Retry => {
                    self.machine.state_mut().remove_attributes(&active);
                }
                MismatchResolution::RepickSpecification => {
                    self.machine.clear_group(&self.catalog, &active);
                    self.machine.leave_drill();
                }
            }
        }
        tracing::info!(?resolution, "Recognition mismatch resolved");
        self.clamp_step();
        Ok(())
    }

    // ==================== Submission ====================

    /// Build the order record without sending it
    pub fn submission(&self) -> AppResult<Submission> {
        build_submission(
            &self.catalog,
            &self.machine,
            self.rules.spec_price_policy,
            self.reference_image_url.as_deref(),
        )
    }

    /// Send the order to the sink
    pub async fn submit(&self, sink: &dyn SubmissionSink) -> AppResult<Submission> {
        let submission = self.submission()?;
        sink.submit(&submission).await.map_err(|e| {
            tracing::error!(error = %e, "Order submission failed");
            AppError::with_message(ErrorCode::SubmissionFailed, format!("Submission failed: {}", e))
        })?;
        tracing::info!(
            total = submission.total,
            fields = submission.options.len(),
            "Order submitted"
        );
        Ok(submission)
    }
}
