//! Candidate onboarding: the step wizard, its validators, the zip resolver,
//! option lists and the submission gateway, plus the proxy routes the wizard
//! talks to.

pub mod currency;
pub mod form;
pub mod gateway;
pub mod handlers;
pub mod options;
pub mod record;
pub mod resolver;
pub mod validation;
pub mod wizard;
pub mod zip;

pub use form::{StepForm, StepValues};
pub use gateway::{HttpSubmissionGateway, SubmissionError, SubmissionGateway};
pub use options::{OnboardingOption, OptionCategory, OptionProvider, OptionSet};
pub use record::{
    CandidateProfile, CandidateRecord, CandidateSubmission, PersonalData, ProfessionalData,
    ProfessionalInterests,
};
pub use resolver::{HttpZipLookup, ZipLookup, ZipLookupError, ZipLookupState, ZipResolver};
pub use validation::{Field, FieldErrors};
pub use wizard::{StepInput, StepLayout, SubmitOutcome, WizardController, WizardError, WizardStep};
pub use zip::ZipLookupResult;
