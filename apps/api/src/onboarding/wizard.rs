//! Wizard Controller — step index, accumulated record, and the guarded
//! final submission.
//!
//! Steps advance one at a time (no skipping). Each "continue" validates the
//! step's values and merges them into the record; `submit` merges the final
//! step, checks the whole record, then calls the gateway. A second submit
//! while one is outstanding is ignored.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

use super::form::StepValues;
use super::gateway::{SubmissionError, SubmissionGateway};
use super::record::{CandidateRecord, PersonalData, ProfessionalData, ProfessionalInterests};
use super::validation::FieldErrors;

pub const INCOMPLETE_MESSAGE: &str = "Preencha todos os campos obrigatórios antes de finalizar.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WizardStep {
    Personal,
    Professional,
    /// CV upload placeholder; collects nothing.
    Curriculum,
    Interests,
}

/// Whether the CV step is part of the flow is a product decision.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepLayout {
    #[default]
    Compact,
    WithCurriculum,
}

impl StepLayout {
    pub fn steps(&self) -> &'static [WizardStep] {
        match self {
            Self::Compact => &[
                WizardStep::Personal,
                WizardStep::Professional,
                WizardStep::Interests,
            ],
            Self::WithCurriculum => &[
                WizardStep::Personal,
                WizardStep::Professional,
                WizardStep::Curriculum,
                WizardStep::Interests,
            ],
        }
    }

    pub fn total_steps(&self) -> usize {
        self.steps().len()
    }
}

/// Values handed over by a non-final step's "continue".
#[derive(Debug, Clone, PartialEq)]
pub enum StepInput {
    Personal(PersonalData),
    Professional(ProfessionalData),
    Curriculum,
}

impl StepInput {
    fn step(&self) -> WizardStep {
        match self {
            Self::Personal(_) => WizardStep::Personal,
            Self::Professional(_) => WizardStep::Professional,
            Self::Curriculum => WizardStep::Curriculum,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WizardError {
    #[error("Step {expected:?} is active, got values for {got:?}")]
    WrongStep { expected: WizardStep, got: WizardStep },

    #[error("Step has invalid fields: {}", .0.summary())]
    StepInvalid(FieldErrors),

    #[error("{message}")]
    Incomplete { message: String, errors: FieldErrors },

    #[error(transparent)]
    Submission(#[from] SubmissionError),
}

impl WizardError {
    /// The one-shot message a toast/modal should display.
    pub fn user_message(&self) -> String {
        match self {
            Self::WrongStep { .. } => INCOMPLETE_MESSAGE.to_string(),
            Self::StepInvalid(errors) => errors.summary(),
            Self::Incomplete { message, .. } => message.clone(),
            Self::Submission(e) => e.message.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    Submitted,
    /// Another submission was already in flight.
    Ignored,
}

#[derive(Debug, Clone, Default)]
struct WizardState {
    /// 1-based.
    step: usize,
    record: CandidateRecord,
}

/// Clears the in-flight flag however the submission ends.
struct InFlight<'a>(&'a AtomicBool);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

pub struct WizardController<G> {
    gateway: G,
    layout: StepLayout,
    state: Mutex<WizardState>,
    submitting: AtomicBool,
}

impl<G: SubmissionGateway> WizardController<G> {
    pub fn new(gateway: G, layout: StepLayout) -> Self {
        Self {
            gateway,
            layout,
            state: Mutex::new(WizardState {
                step: 1,
                record: CandidateRecord::default(),
            }),
            submitting: AtomicBool::new(false),
        }
    }

    fn lock(&self) -> MutexGuard<'_, WizardState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn layout(&self) -> StepLayout {
        self.layout
    }

    pub fn current_index(&self) -> usize {
        self.lock().step
    }

    pub fn current_step(&self) -> WizardStep {
        self.layout.steps()[self.current_index() - 1]
    }

    pub fn total_steps(&self) -> usize {
        self.layout.total_steps()
    }

    /// Snapshot of everything merged so far, for re-populating step forms.
    pub fn record(&self) -> CandidateRecord {
        self.lock().record.clone()
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting.load(Ordering::Acquire)
    }

    /// Moves forward one step; stays put on the last one.
    pub fn next(&self) -> usize {
        let mut state = self.lock();
        if state.step < self.layout.total_steps() {
            state.step += 1;
        }
        state.step
    }

    /// Moves back one step; stays put on the first. Keeps the record intact.
    pub fn back(&self) -> usize {
        let mut state = self.lock();
        if state.step > 1 {
            state.step -= 1;
        }
        state.step
    }

    /// The "continue" action of a non-final step.
    pub fn continue_step(&self, input: StepInput) -> Result<usize, WizardError> {
        let expected = self.current_step();
        let got = input.step();
        if expected != got {
            return Err(WizardError::WrongStep { expected, got });
        }

        let errors = match &input {
            StepInput::Personal(values) => values.validate(),
            StepInput::Professional(values) => values.validate(),
            StepInput::Curriculum => FieldErrors::new(),
        };
        if !errors.is_clean() {
            debug!("Step {got:?} blocked: {}", errors.summary());
            return Err(WizardError::StepInvalid(errors));
        }

        {
            let mut state = self.lock();
            match input {
                StepInput::Personal(values) => state.record.personal = Some(values),
                StepInput::Professional(values) => state.record.professional = Some(values),
                StepInput::Curriculum => {}
            }
        }
        Ok(self.next())
    }

    /// The final step's action. Merges `interests`, checks the whole record
    /// and hands it to the gateway. On success the wizard resets; on failure
    /// everything entered stays for a retry.
    pub async fn submit(
        &self,
        interests: ProfessionalInterests,
    ) -> Result<SubmitOutcome, WizardError> {
        if self.submitting.swap(true, Ordering::AcqRel) {
            debug!("Submit ignored: a submission is already in flight");
            return Ok(SubmitOutcome::Ignored);
        }
        let _in_flight = InFlight(&self.submitting);

        let expected = self.current_step();
        if expected != WizardStep::Interests {
            return Err(WizardError::WrongStep {
                expected,
                got: WizardStep::Interests,
            });
        }

        let step_errors = interests.validate();
        if !step_errors.is_clean() {
            return Err(WizardError::StepInvalid(step_errors));
        }

        let submission = {
            let mut state = self.lock();
            state.record.interests = Some(interests);
            state.record.to_submission()
        }
        .map_err(|errors| {
            warn!("Submission blocked, record incomplete: {}", errors.summary());
            WizardError::Incomplete {
                message: INCOMPLETE_MESSAGE.to_string(),
                errors,
            }
        })?;

        self.gateway.submit(&submission).await?;

        info!("Candidate onboarding submitted");
        self.reset();
        Ok(SubmitOutcome::Submitted)
    }

    /// Discards the record and returns to step 1.
    pub fn reset(&self) {
        let mut state = self.lock();
        state.step = 1;
        state.record = CandidateRecord::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;
    use std::sync::Arc;
    use std::time::Duration;

    use async_trait::async_trait;

    use crate::onboarding::record::fixtures::{interests, personal, professional};
    use crate::onboarding::record::CandidateSubmission;
    use crate::onboarding::validation::Field;

    #[derive(Clone, Default)]
    struct RecordingGateway {
        calls: Arc<AtomicUsize>,
        received: Arc<Mutex<Vec<CandidateSubmission>>>,
        fail_with: Option<String>,
        delay: Duration,
    }

    #[async_trait]
    impl SubmissionGateway for RecordingGateway {
        async fn submit(&self, candidate: &CandidateSubmission) -> Result<(), SubmissionError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(self.delay).await;
            self.received.lock().unwrap().push(candidate.clone());
            match &self.fail_with {
                Some(message) => Err(SubmissionError::new(message.clone())),
                None => Ok(()),
            }
        }
    }

    fn walk_to_final(wizard: &WizardController<RecordingGateway>) {
        wizard
            .continue_step(StepInput::Personal(personal()))
            .unwrap();
        wizard
            .continue_step(StepInput::Professional(professional()))
            .unwrap();
    }

    #[test]
    fn test_next_and_back_are_clamped() {
        let wizard = WizardController::new(RecordingGateway::default(), StepLayout::Compact);
        assert_eq!(wizard.back(), 1);
        assert_eq!(wizard.next(), 2);
        assert_eq!(wizard.next(), 3);
        assert_eq!(wizard.next(), 3);
        assert_eq!(wizard.back(), 2);
        assert_eq!(wizard.current_step(), WizardStep::Professional);
    }

    #[test]
    fn test_layout_step_counts() {
        assert_eq!(StepLayout::Compact.total_steps(), 3);
        assert_eq!(StepLayout::WithCurriculum.total_steps(), 4);
        assert_eq!(StepLayout::WithCurriculum.steps()[2], WizardStep::Curriculum);
    }

    #[test]
    fn test_invalid_step_blocks_advance() {
        let wizard = WizardController::new(RecordingGateway::default(), StepLayout::Compact);
        let mut data = personal();
        data.email = "sem-arroba".to_string();

        match wizard.continue_step(StepInput::Personal(data)) {
            Err(WizardError::StepInvalid(errors)) => {
                assert_eq!(errors.get(Field::Email), "Digite um e-mail válido.");
            }
            other => panic!("unexpected: {other:?}"),
        }
        assert_eq!(wizard.current_index(), 1);
        assert!(wizard.record().personal.is_none());
    }

    #[test]
    fn test_values_for_wrong_step_rejected() {
        let wizard = WizardController::new(RecordingGateway::default(), StepLayout::Compact);
        let err = wizard
            .continue_step(StepInput::Professional(professional()))
            .unwrap_err();
        assert_eq!(
            err,
            WizardError::WrongStep {
                expected: WizardStep::Personal,
                got: WizardStep::Professional
            }
        );
    }

    #[test]
    fn test_back_and_forward_keeps_values() {
        let wizard = WizardController::new(RecordingGateway::default(), StepLayout::Compact);
        walk_to_final(&wizard);

        assert_eq!(wizard.back(), 2);
        assert_eq!(wizard.back(), 1);
        let record = wizard.record();
        assert_eq!(record.personal, Some(personal()));
        assert_eq!(record.professional, Some(professional()));

        assert_eq!(wizard.next(), 2);
        assert_eq!(wizard.next(), 3);
        assert_eq!(wizard.record(), record);
    }

    #[tokio::test]
    async fn test_all_steps_reach_gateway_and_wizard_resets() {
        let gateway = RecordingGateway::default();
        let wizard = WizardController::new(gateway.clone(), StepLayout::WithCurriculum);

        wizard.continue_step(StepInput::Personal(personal())).unwrap();
        wizard
            .continue_step(StepInput::Professional(professional()))
            .unwrap();
        assert_eq!(wizard.continue_step(StepInput::Curriculum).unwrap(), 4);

        let outcome = wizard.submit(interests()).await.unwrap();
        assert_eq!(outcome, SubmitOutcome::Submitted);

        let received = gateway.received.lock().unwrap();
        assert_eq!(received.len(), 1);
        assert_eq!(received[0].personal, personal());
        assert_eq!(received[0].professional.salary, 8500.0);
        assert_eq!(received[0].interests, interests());

        assert_eq!(wizard.current_index(), 1);
        assert_eq!(wizard.record(), CandidateRecord::default());
    }

    #[tokio::test]
    async fn test_incomplete_record_blocks_submission() {
        let gateway = RecordingGateway::default();
        let wizard = WizardController::new(gateway.clone(), StepLayout::Compact);
        // Jump without continuing through the earlier steps.
        wizard.next();
        wizard.next();

        let err = wizard.submit(interests()).await.unwrap_err();
        assert_eq!(err.user_message(), INCOMPLETE_MESSAGE);
        assert_eq!(gateway.calls.load(Ordering::SeqCst), 0);
        assert_eq!(wizard.current_index(), 3);
        assert_eq!(wizard.record().interests, Some(interests()));
    }

    #[tokio::test]
    async fn test_submission_failure_keeps_data_for_retry() {
        let gateway = RecordingGateway {
            fail_with: Some("Serviço indisponível.".to_string()),
            ..Default::default()
        };
        let wizard = WizardController::new(gateway.clone(), StepLayout::Compact);
        walk_to_final(&wizard);

        let err = wizard.submit(interests()).await.unwrap_err();
        assert_eq!(err.user_message(), "Serviço indisponível.");
        assert_eq!(wizard.current_index(), 3);
        assert!(wizard.record().is_complete());
        assert!(!wizard.is_submitting());
    }

    #[tokio::test(start_paused = true)]
    async fn test_double_submit_makes_one_call() {
        let gateway = RecordingGateway {
            delay: Duration::from_millis(200),
            ..Default::default()
        };
        let wizard = WizardController::new(gateway.clone(), StepLayout::Compact);
        walk_to_final(&wizard);

        let (first, second) = tokio::join!(wizard.submit(interests()), wizard.submit(interests()));

        let mut outcomes = vec![first.unwrap(), second.unwrap()];
        outcomes.sort_by_key(|o| *o == SubmitOutcome::Ignored);
        assert_eq!(outcomes, vec![SubmitOutcome::Submitted, SubmitOutcome::Ignored]);
        assert_eq!(gateway.calls.load(Ordering::SeqCst), 1);
    }
}
