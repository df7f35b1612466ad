use crate::{
    credentials::CredentialSelector,
    error::{Result, StudioError},
    gemini::StudioBackend,
    models::{EditRequest, FittingConfig, GeneratedShot, ShotRequest, SourceImage, StudioTier},
};

/// Snapshot of the interaction state.
///
/// `generating` and `editing` are never both true; the effective phase is
/// exactly one of idle, generating, editing, error, success.
#[derive(Debug, Clone, Default)]
pub struct SessionState {
    pub source_image: Option<SourceImage>,
    pub result: Option<GeneratedShot>,
    pub error: Option<StudioError>,
    pub generating: bool,
    pub editing: bool,
    pub tier: StudioTier,
    pub has_personal_credential: bool,
    /// The pending refinement instruction, cleared when an edit lands.
    pub instruction: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    Idle,
    Generating,
    Editing,
    Error,
    Success,
}

/// An observed outcome or user action, applied to the state as a pure
/// transition.
#[derive(Debug, Clone)]
pub enum SessionEvent {
    SourceSelected(SourceImage),
    InstructionChanged(String),
    GenerateStarted,
    EditStarted,
    /// A generate call produced a shot.
    ShotReady(GeneratedShot),
    /// An edit call produced a shot; also clears the instruction.
    EditApplied(GeneratedShot),
    Failed(StudioError),
    TierChanged(StudioTier),
    CredentialInstalled,
    Reset,
}

impl SessionState {
    /// Pure transition: consumes the current state and an event, returns
    /// the next state. No I/O, no clock, fully table-testable.
    pub fn apply(mut self, event: SessionEvent) -> SessionState {
        match event {
            SessionEvent::SourceSelected(image) => {
                self.source_image = Some(image);
                self.error = None;
                self
            }
            SessionEvent::InstructionChanged(text) => {
                self.instruction = text;
                self
            }
            SessionEvent::GenerateStarted => {
                self.generating = true;
                self.editing = false;
                self.error = None;
                self.result = None;
                self
            }
            SessionEvent::EditStarted => {
                self.editing = true;
                self.generating = false;
                self.error = None;
                self
            }
            SessionEvent::ShotReady(shot) => {
                self.generating = false;
                self.editing = false;
                self.error = None;
                self.result = Some(shot);
                self
            }
            SessionEvent::EditApplied(shot) => {
                self.generating = false;
                self.editing = false;
                self.error = None;
                self.result = Some(shot);
                self.instruction.clear();
                self
            }
            SessionEvent::Failed(error) => {
                self.generating = false;
                self.editing = false;
                // A credential or quota rejection on the pro tier means the
                // personal credential is stale, revoked, or out of budget; a
                // stale credential is indistinguishable from an absent one
                // at this layer, so the cached flag is invalidated.
                if self.tier == StudioTier::Pro
                    && (error.is_credential_failure() || error.is_quota_failure())
                {
                    self.tier = StudioTier::Free;
                    self.has_personal_credential = false;
                }
                self.error = Some(error);
                self
            }
            SessionEvent::TierChanged(tier) => {
                self.tier = tier;
                self
            }
            SessionEvent::CredentialInstalled => {
                self.has_personal_credential = true;
                self
            }
            SessionEvent::Reset => {
                // Tier and credential survive a reset; everything tied to the
                // current photoshoot is dropped.
                self.source_image = None;
                self.result = None;
                self.error = None;
                self.generating = false;
                self.editing = false;
                self.instruction.clear();
                self
            }
        }
    }

    pub fn phase(&self) -> SessionPhase {
        if self.generating {
            SessionPhase::Generating
        } else if self.editing {
            SessionPhase::Editing
        } else if self.error.is_some() {
            SessionPhase::Error
        } else if self.result.is_some() {
            SessionPhase::Success
        } else {
            SessionPhase::Idle
        }
    }

    pub fn busy(&self) -> bool {
        self.generating || self.editing
    }
}

/// Sequences generate/edit/tier/reset actions over the session state.
///
/// At most one operation is semantically active: a second trigger while one
/// is in flight is rejected outright rather than relying on the caller to
/// disable its triggers. Completions carry the operation sequence number
/// they belong to; a completion from a superseded operation (the caller
/// abandoned the future, then reset) is discarded instead of resurrecting
/// cleared state.
pub struct StudioSession<B: StudioBackend, C: CredentialSelector> {
    backend: B,
    credentials: C,
    fitting: FittingConfig,
    state: SessionState,
    op_seq: u64,
}

impl<B: StudioBackend, C: CredentialSelector> StudioSession<B, C> {
    pub fn new(backend: B, credentials: C) -> Self {
        let has_personal_credential = backend.has_personal_credential();
        Self {
            backend,
            credentials,
            fitting: FittingConfig::default(),
            state: SessionState {
                has_personal_credential,
                ..SessionState::default()
            },
            op_seq: 0,
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn fitting_config(&self) -> &FittingConfig {
        &self.fitting
    }

    pub fn set_fitting_config(&mut self, config: FittingConfig) {
        self.fitting = config;
    }

    pub fn select_source(&mut self, image: SourceImage) {
        self.state = self.take_state().apply(SessionEvent::SourceSelected(image));
    }

    /// Parses and selects an uploaded image. Malformed input is rejected
    /// here, before any request exists.
    pub fn select_source_data_uri(&mut self, uri: &str) -> Result<()> {
        let image = SourceImage::from_data_uri(uri)?;
        self.select_source(image);
        Ok(())
    }

    pub fn set_instruction(&mut self, instruction: impl Into<String>) {
        self.state = self
            .take_state()
            .apply(SessionEvent::InstructionChanged(instruction.into()));
    }

    /// Runs one photoshoot generation against the selected source image.
    ///
    /// Preconditions (checked before any state changes): a source image is
    /// selected and no operation is in flight.
    pub async fn generate(&mut self) -> Result<GeneratedShot> {
        if self.state.busy() {
            return Err(StudioError::RequestError(
                "another operation is already in flight".into(),
            ));
        }
        let image = self.state.source_image.clone().ok_or_else(|| {
            StudioError::RequestError("no source image selected".into())
        })?;

        let request = ShotRequest::new(image, self.fitting.clone(), self.state.tier);
        let op = self.begin(SessionEvent::GenerateStarted);
        log::info!("Generating photoshoot on the {} tier", request.tier);

        let outcome = self.backend.generate(&request).await;
        self.complete(op, outcome, SessionEvent::ShotReady)
    }

    /// Applies the pending refinement instruction to the most recent shot.
    ///
    /// Edits always operate on the latest result, never the original upload.
    pub async fn edit(&mut self) -> Result<GeneratedShot> {
        if self.state.busy() {
            return Err(StudioError::RequestError(
                "another operation is already in flight".into(),
            ));
        }
        let instruction = self.state.instruction.trim().to_string();
        if instruction.is_empty() {
            return Err(StudioError::RequestError(
                "refinement instruction is empty".into(),
            ));
        }
        let base = self
            .state
            .result
            .as_ref()
            .map(GeneratedShot::as_source)
            .ok_or_else(|| StudioError::RequestError("no shot to refine yet".into()))?;

        let request = EditRequest::new(base, instruction, self.state.tier);
        let op = self.begin(SessionEvent::EditStarted);
        log::info!("Refining shot: {:?}", request.instruction);

        let outcome = self.backend.edit(&request).await;
        self.complete(op, outcome, SessionEvent::EditApplied)
    }

    /// Stores an instruction and immediately applies it.
    pub async fn refine(&mut self, instruction: impl Into<String>) -> Result<GeneratedShot> {
        self.set_instruction(instruction);
        self.edit().await
    }

    /// Switches tier. Free is unconditional. Pro without a known personal
    /// credential first runs the credential-selection flow; if the flow
    /// succeeds the credential is assumed valid without re-verification,
    /// and a later credential rejection demotes back to free.
    pub async fn select_tier(&mut self, target: StudioTier) -> Result<()> {
        if self.state.busy() {
            return Err(StudioError::RequestError(
                "cannot switch tier while an operation is in flight".into(),
            ));
        }

        if target.requires_personal_credential() && !self.state.has_personal_credential {
            log::info!("Pro tier requested; running credential selection");
            match self.credentials.select().await {
                Ok(credential) => {
                    self.backend.install_personal_credential(credential);
                    self.state = self.take_state().apply(SessionEvent::CredentialInstalled);
                }
                Err(error) => {
                    log::warn!("Credential selection failed; staying on free tier");
                    self.state = self
                        .take_state()
                        .apply(SessionEvent::TierChanged(StudioTier::Free))
                        .apply(SessionEvent::Failed(error.clone()));
                    return Err(error);
                }
            }
        }

        self.state = self.take_state().apply(SessionEvent::TierChanged(target));
        Ok(())
    }

    /// Clears the photoshoot state unconditionally; safe in any phase.
    /// Also supersedes any abandoned in-flight operation.
    pub fn reset(&mut self) {
        self.op_seq += 1;
        self.state = self.take_state().apply(SessionEvent::Reset);
        log::debug!("Session reset");
    }

    fn take_state(&mut self) -> SessionState {
        std::mem::take(&mut self.state)
    }

    fn begin(&mut self, event: SessionEvent) -> u64 {
        self.op_seq += 1;
        self.state = self.take_state().apply(event);
        self.op_seq
    }

    fn complete(
        &mut self,
        op: u64,
        outcome: Result<GeneratedShot>,
        on_success: fn(GeneratedShot) -> SessionEvent,
    ) -> Result<GeneratedShot> {
        if op != self.op_seq {
            log::warn!("Discarding completion of superseded operation {}", op);
            return Err(StudioError::RequestError("operation superseded".into()));
        }
        match outcome {
            Ok(shot) => {
                self.state = self.take_state().apply(on_success(shot.clone()));
                Ok(shot)
            }
            Err(error) => {
                self.state = self.take_state().apply(SessionEvent::Failed(error.clone()));
                Err(error)
            }
        }
    }
}
