//! Calculation lifecycle controller
//!
//! Owns the working design and the result computed from it. Every edit
//! that changes the calculation inputs discards the current result and
//! bumps a sequence number; async completions carry the sequence number
//! they were issued under and are dropped when it no longer matches.
//!
//! Hosts that need to keep editing while a request is in flight use the
//! split `begin_*` / `complete_*` operations. The `calculate`,
//! `refresh_films` and `hydrate_from_share` helpers drive a whole round
//! trip against an [`EnvelopeService`].

use crate::context::SessionContext;
use serde::Serialize;
use std::sync::Arc;
use uvalue_core::assembly::{AssemblyDesign, ValidationIssue};
use uvalue_core::cancel::CancelFlag;
use uvalue_core::error::{Result, UvalueError};
use uvalue_core::models::{
    AssemblyType, CalculationRequest, CalculationResult, FilmCoefficients, Layer, LayerId,
    LayerPayload, ResistanceOverrides, SaveDesignRequest, SavedDesign, SavedDesignRef,
};
use uvalue_core::ports::{DraftStore, EnvelopeService};

/// Lifecycle of the result for the current inputs
#[derive(Debug, Clone, PartialEq)]
pub enum CalcState {
    /// No result for the current inputs
    Idle,
    Submitting { seq: u64 },
    Ready(Box<CalculationResult>),
    Failed { message: String },
}

impl CalcState {
    pub fn label(&self) -> &'static str {
        match self {
            CalcState::Idle => "idle",
            CalcState::Submitting { .. } => "submitting",
            CalcState::Ready(_) => "ready",
            CalcState::Failed { .. } => "failed",
        }
    }
}

/// Whether an async completion was applied or discarded
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    Applied,
    Stale,
}

/// A calculation that has been issued but not answered
#[derive(Debug, Clone)]
pub struct PendingCalculation {
    pub seq: u64,
    pub request: CalculationRequest,
}

/// An autosave that has been issued but not answered
#[derive(Debug, Clone)]
pub struct PendingSave {
    pub seq: u64,
    pub request: SaveDesignRequest,
}

/// A film coefficient lookup for the current city and assembly
#[derive(Debug, Clone, PartialEq)]
pub struct FilmsQuery {
    pub seq: u64,
    pub city: String,
    pub assembly: AssemblyType,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SaveOutcome {
    Saved(SavedDesignRef),
    /// Autosave failed; the result stays on screen without a link
    Failed { message: String },
    /// The inputs changed while the save was in flight
    Stale,
}

/// Everything a finished round trip produced
#[derive(Debug, Clone)]
pub struct CalculationReport {
    pub result: CalculationResult,
    pub save: SaveOutcome,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HydrationOutcome {
    Hydrated,
    /// The same id was already applied this session
    AlreadyHydrated,
    /// A result computed this session takes priority over the shared link
    SkippedExistingResult,
    NotFound,
    Cancelled,
}

pub struct DesignController {
    design: AssemblyDesign,
    overrides: ResistanceOverrides,
    state: CalcState,
    seq: u64,
    films: FilmCoefficients,
    films_seq: u64,
    share: Option<SavedDesignRef>,
    context: SessionContext,
    drafts: Arc<dyn DraftStore>,
    teardown: CancelFlag,
}

impl DesignController {
    /// Start with an empty design
    pub fn new(drafts: Arc<dyn DraftStore>) -> Self {
        Self::with_design(AssemblyDesign::new(), drafts)
    }

    /// Start from the stored draft, or empty when there is none or it is unreadable
    pub fn restore(drafts: Arc<dyn DraftStore>) -> Self {
        let design = match drafts.load() {
            Ok(Some(design)) => {
                tracing::debug!("Restored draft with {} layers", design.layers.len());
                design
            }
            Ok(None) => AssemblyDesign::new(),
            Err(e) => {
                tracing::warn!("Ignoring unreadable draft: {}", e);
                AssemblyDesign::new()
            }
        };
        Self::with_design(design, drafts)
    }

    fn with_design(design: AssemblyDesign, drafts: Arc<dyn DraftStore>) -> Self {
        Self {
            design,
            overrides: ResistanceOverrides::default(),
            state: CalcState::Idle,
            seq: 0,
            films: FilmCoefficients::default(),
            films_seq: 0,
            share: None,
            context: SessionContext::new(),
            drafts,
            teardown: CancelFlag::new(),
        }
    }

    pub fn design(&self) -> &AssemblyDesign {
        &self.design
    }

    pub fn overrides(&self) -> ResistanceOverrides {
        self.overrides
    }

    pub fn state(&self) -> &CalcState {
        &self.state
    }

    /// The result for the current inputs, if one is ready
    pub fn result(&self) -> Option<&CalculationResult> {
        match &self.state {
            CalcState::Ready(result) => Some(result.as_ref()),
            _ => None,
        }
    }

    pub fn seq(&self) -> u64 {
        self.seq
    }

    pub fn films(&self) -> FilmCoefficients {
        self.films
    }

    /// Saved design the current result can be reopened from
    pub fn share_ref(&self) -> Option<&SavedDesignRef> {
        self.share.as_ref()
    }

    pub fn context(&self) -> &SessionContext {
        &self.context
    }

    pub fn context_mut(&mut self) -> &mut SessionContext {
        &mut self.context
    }

    pub fn validation(&self) -> Vec<ValidationIssue> {
        self.design.validate()
    }

    pub fn is_calculable(&self) -> bool {
        self.design.is_calculable()
    }

    /// Flag shared with background work that must stop once the owner is gone
    pub fn cancel_flag(&self) -> CancelFlag {
        self.teardown.clone()
    }

    pub fn is_torn_down(&self) -> bool {
        self.teardown.is_cancelled()
    }

    /// Stop accepting async completions
    pub fn teardown(&self) {
        self.teardown.cancel();
        tracing::debug!("Design controller torn down at seq {}", self.seq);
    }

    // Edits

    pub fn set_city(&mut self, city: impl Into<String>) -> bool {
        let city = city.into();
        if self.design.city == city {
            return false;
        }
        self.design.city = city;
        self.films_changed();
        self.inputs_changed();
        true
    }

    pub fn set_assembly(&mut self, assembly: AssemblyType) -> bool {
        if self.design.assembly == assembly {
            return false;
        }
        self.design.assembly = assembly;
        self.films_changed();
        self.inputs_changed();
        true
    }

    pub fn set_overrides(&mut self, overrides: ResistanceOverrides) -> bool {
        if self.overrides == overrides {
            return false;
        }
        self.overrides = overrides;
        self.inputs_changed();
        true
    }

    /// Append a placeholder layer
    pub fn add_layer(&mut self) -> LayerId {
        let id = self.design.add_layer();
        self.inputs_changed();
        id
    }

    /// Append a prepared layer; its id must not already be present
    pub fn push_layer(&mut self, layer: Layer) -> Result<LayerId> {
        let id = layer.id;
        self.design.push_layer(layer)?;
        self.inputs_changed();
        Ok(id)
    }

    /// Replace the layer with the same id; returns whether anything changed
    pub fn update_layer(&mut self, layer: Layer) -> Result<bool> {
        let changed = self.design.update_layer(layer)?;
        if changed {
            self.inputs_changed();
        }
        Ok(changed)
    }

    pub fn remove_layer(&mut self, id: LayerId) -> Result<Layer> {
        let removed = self.design.remove_layer(id)?;
        self.inputs_changed();
        Ok(removed)
    }

    fn inputs_changed(&mut self) {
        self.seq += 1;
        if self.state != CalcState::Idle {
            tracing::debug!("Inputs changed; discarding {} state", self.state.label());
        }
        self.state = CalcState::Idle;
        self.share = None;
        self.mirror_draft();
    }

    fn films_changed(&mut self) {
        self.films_seq += 1;
        self.films = FilmCoefficients::default();
    }

    fn mirror_draft(&self) {
        if let Err(e) = self.drafts.save(&self.design) {
            tracing::warn!("Failed to store local draft: {}", e);
        }
    }

    // Calculation

    /// Snapshot the design for submission
    ///
    /// Fails with `Validation` and sends nothing when the design is incomplete.
    pub fn begin_calculation(&mut self) -> Result<PendingCalculation> {
        self.design.ensure_calculable()?;

        self.seq += 1;
        self.state = CalcState::Submitting { seq: self.seq };
        self.share = None;

        Ok(PendingCalculation {
            seq: self.seq,
            request: self.design.to_request(self.overrides),
        })
    }

    fn accepts(&self, seq: u64) -> bool {
        !self.is_torn_down() && self.state == CalcState::Submitting { seq } && self.seq == seq
    }

    pub fn complete_calculation(&mut self, seq: u64, result: CalculationResult) -> Completion {
        if !self.accepts(seq) {
            tracing::warn!("Discarding stale calculation response (seq {} != {})", seq, self.seq);
            return Completion::Stale;
        }

        tracing::info!(
            "Calculation complete: U_overall {} (static) / {} (dynamic)",
            result.static_branch.u_overall,
            result.dynamic.u_overall
        );
        self.state = CalcState::Ready(Box::new(result));
        self.context.mark_computed();
        Completion::Applied
    }

    pub fn fail_calculation(&mut self, seq: u64, error: &UvalueError) -> Completion {
        if !self.accepts(seq) {
            tracing::debug!("Discarding stale calculation failure: {}", error);
            return Completion::Stale;
        }

        tracing::warn!("Calculation failed: {}", error);
        self.state = CalcState::Failed { message: error.to_string() };
        Completion::Applied
    }

    /// Autosave body for the current result, if there is one
    pub fn begin_save(&self) -> Option<PendingSave> {
        let result = self.result()?;
        let request = self.design.to_request(self.overrides).to_save_request(result);
        Some(PendingSave { seq: self.seq, request })
    }

    /// Record the autosave outcome; never touches the result
    pub fn complete_save(&mut self, seq: u64, outcome: Result<SavedDesignRef>) -> SaveOutcome {
        match outcome {
            Ok(saved) => {
                if self.is_torn_down() || seq != self.seq || self.result().is_none() {
                    tracing::debug!("Design {} saved for superseded inputs", saved.public_id);
                    return SaveOutcome::Stale;
                }
                self.context.set_last_saved(saved.clone());
                self.share = Some(saved.clone());
                SaveOutcome::Saved(saved)
            }
            Err(e) => {
                tracing::warn!("Autosave failed: {}", e);
                SaveOutcome::Failed { message: e.to_string() }
            }
        }
    }

    /// Validate, submit, and autosave on success
    ///
    /// Returns `Ok(None)` when the controller was torn down before the response arrived.
    pub async fn calculate(
        &mut self,
        service: &dyn EnvelopeService,
    ) -> Result<Option<CalculationReport>> {
        let pending = self.begin_calculation()?;

        let result = match service.calculate(&pending.request).await {
            Ok(result) => result,
            Err(e) => {
                self.fail_calculation(pending.seq, &e);
                return Err(e);
            }
        };

        if self.complete_calculation(pending.seq, result.clone()) == Completion::Stale {
            return Ok(None);
        }

        let save = match self.begin_save() {
            Some(save) => {
                let outcome = service.save_design(&save.request).await;
                self.complete_save(save.seq, outcome)
            }
            None => SaveOutcome::Stale,
        };

        Ok(Some(CalculationReport { result, save }))
    }

    // Films

    /// Lookup for the current city and assembly; `None` while no city is set
    pub fn films_query(&self) -> Option<FilmsQuery> {
        if !self.design.has_city() {
            return None;
        }
        Some(FilmsQuery {
            seq: self.films_seq,
            city: self.design.city.clone(),
            assembly: self.design.assembly,
        })
    }

    pub fn apply_films(&mut self, seq: u64, films: FilmCoefficients) -> Completion {
        if self.is_torn_down() || seq != self.films_seq {
            tracing::debug!("Discarding film coefficients for superseded inputs");
            return Completion::Stale;
        }
        self.films = films;
        Completion::Applied
    }

    /// Fetch film coefficients for the current inputs; zeros when unknown
    pub async fn refresh_films(&mut self, service: &dyn EnvelopeService) -> FilmCoefficients {
        if let Some(query) = self.films_query() {
            let films = service.films(&query.city, query.assembly).await;
            self.apply_films(query.seq, films);
        }
        self.films
    }

    // Shared links

    /// Whether a shared design may replace the current state
    pub fn hydration_guard(&self, public_id: &str) -> Option<HydrationOutcome> {
        if self.context.hydrated_from() == Some(public_id) {
            return Some(HydrationOutcome::AlreadyHydrated);
        }
        if self.result().is_some() || self.context.computed_this_session() {
            return Some(HydrationOutcome::SkippedExistingResult);
        }
        None
    }

    /// Replace design and result with a saved snapshot
    pub fn apply_shared_design(&mut self, public_id: &str, saved: SavedDesign) -> HydrationOutcome {
        if self.is_torn_down() {
            return HydrationOutcome::Cancelled;
        }
        if let Some(skip) = self.hydration_guard(public_id) {
            return skip;
        }

        self.design = AssemblyDesign {
            city: saved.city,
            assembly: saved.assembly,
            layers: saved.layers.into_iter().map(LayerPayload::into_layer).collect(),
        };
        self.overrides = ResistanceOverrides::default();
        self.seq += 1;
        self.films_changed();
        self.state = CalcState::Ready(Box::new(saved.result));
        self.share = Some(SavedDesignRef { public_id: public_id.to_string(), url: None });
        self.context.set_hydrated_from(public_id);
        self.mirror_draft();

        tracing::info!("Hydrated design from shared link {}", public_id);
        HydrationOutcome::Hydrated
    }

    /// Load a shared design and apply it unless this session already has a result
    pub async fn hydrate_from_share(
        &mut self,
        service: &dyn EnvelopeService,
        public_id: &str,
    ) -> Result<HydrationOutcome> {
        if let Some(skip) = self.hydration_guard(public_id) {
            tracing::debug!("Skipping shared design {}: {:?}", public_id, skip);
            return Ok(skip);
        }

        match service.load_design(public_id).await? {
            Some(saved) => Ok(self.apply_shared_design(public_id, saved)),
            None => {
                tracing::info!("Shared design {} does not exist", public_id);
                Ok(HydrationOutcome::NotFound)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uvalue_core::draft::MemoryDraftStore;

    fn controller() -> DesignController {
        DesignController::new(Arc::new(MemoryDraftStore::new()))
    }

    fn filled() -> DesignController {
        let mut controller = controller();
        controller.set_city("Ahmedabad");
        controller.push_layer(Layer::new("Brick", 110.0)).unwrap();
        controller
    }

    #[test]
    fn test_unchanged_edits_keep_seq() {
        let mut controller = filled();
        let seq = controller.seq();

        assert!(!controller.set_city("Ahmedabad"));
        assert!(!controller.set_assembly(AssemblyType::Wall));
        let layer = controller.design().layers[0].clone();
        assert!(!controller.update_layer(layer).unwrap());

        assert_eq!(controller.seq(), seq);
    }

    #[test]
    fn test_begin_rejects_incomplete_design() {
        let mut controller = controller();
        controller.add_layer();

        let err = controller.begin_calculation().unwrap_err();
        match err {
            UvalueError::Validation { problems } => {
                assert_eq!(problems[0], "Please select a city.");
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(controller.state(), &CalcState::Idle);
    }

    #[test]
    fn test_begin_snapshots_request() {
        let mut controller = filled();
        let pending = controller.begin_calculation().unwrap();

        assert_eq!(controller.state(), &CalcState::Submitting { seq: pending.seq });
        assert_eq!(pending.request.city, "Ahmedabad");
        assert_eq!(pending.request.layers.len(), 1);
        assert!(pending.request.dynamic_coefficients);
    }

    #[test]
    fn test_overrides_flow_into_request() {
        let mut controller = filled();
        assert!(controller.set_overrides(ResistanceOverrides { rsi: Some(0.13), rse: None }));

        let pending = controller.begin_calculation().unwrap();
        assert_eq!(pending.request.override_rsi, Some(0.13));
        assert_eq!(pending.request.override_rse, None);
    }

    #[test]
    fn test_films_query_needs_city() {
        let mut controller = controller();
        assert!(controller.films_query().is_none());

        controller.set_city("Pune");
        let query = controller.films_query().unwrap();
        assert_eq!(query.city, "Pune");

        controller.set_assembly(AssemblyType::RoofUp);
        assert_eq!(controller.apply_films(query.seq, FilmCoefficients::new(8.0, 23.0)), Completion::Stale);
        assert!(!controller.films().is_known());
    }

    #[test]
    fn test_layer_edits_keep_films() {
        let mut controller = filled();
        let query = controller.films_query().unwrap();
        controller.add_layer();

        assert_eq!(controller.apply_films(query.seq, FilmCoefficients::new(8.0, 23.0)), Completion::Applied);
        assert!(controller.films().is_known());
    }

    #[test]
    fn test_calc_state_labels() {
        assert_eq!(CalcState::Idle.label(), "idle");
        assert_eq!(CalcState::Submitting { seq: 3 }.label(), "submitting");
        assert_eq!(CalcState::Failed { message: String::new() }.label(), "failed");
    }
}
