pub mod api;
pub mod models;

pub use models::{
    Comment, InvalidValue, ListFilter, NewSubmission, SortKey, Submission, SubmissionKind,
    SubmissionStatus, SubmissionSummary,
};
