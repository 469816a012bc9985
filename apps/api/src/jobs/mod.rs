//! Company side of the board: job creation, public listings and the hiring
//! pipeline.

pub mod draft;
pub mod handlers;
pub mod listings;
pub mod pipeline;

pub use draft::{JobDraft, JobDraftError, JobPayload};
pub use listings::{JobOpening, FEATURED_OPENINGS};
pub use pipeline::{group_into_board, move_application, CompanyApplication, PipelineBoard};
