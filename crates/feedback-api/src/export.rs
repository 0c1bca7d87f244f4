//! CSV export of the admin view.

use csv::Writer;
use feedback_types::SubmissionSummary;

pub const EXPORT_FILENAME: &str = "feedback-export.csv";

const HEADERS: [&str; 9] = [
    "Title",
    "Type",
    "Status",
    "Votes",
    "Comments",
    "Submitter",
    "Email",
    "Date",
    "Description",
];

/// Render submissions in the given order, one row each, with a header row.
pub fn render_csv(submissions: &[SubmissionSummary]) -> Result<Vec<u8>, csv::Error> {
    let mut writer = Writer::from_writer(Vec::new());
    writer.write_record(HEADERS)?;

    for entry in submissions {
        let s = &entry.submission;
        let votes = entry.votes.to_string();
        let comments = entry.comments.to_string();
        writer.write_record([
            s.title.as_str(),
            s.kind.as_str(),
            s.status.as_str(),
            votes.as_str(),
            comments.as_str(),
            s.submitter_name.as_str(),
            s.submitter_email.as_deref().unwrap_or(""),
            s.date.as_str(),
            s.description.as_str(),
        ])?;
    }

    writer.into_inner().map_err(|e| e.into_error().into())
}
