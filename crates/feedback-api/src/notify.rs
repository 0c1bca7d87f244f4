//! Outbound notification when a new submission arrives.
//!
//! Delivery is best effort: notifiers never fail the request that triggered
//! them.

use feedback_types::Submission;
use tracing::{info, warn};

pub trait SubmissionNotifier: Send + Sync {
    fn submission_created(&self, submission: &Submission);
}

/// Writes new submissions to the log only.
pub struct LogNotifier;

impl SubmissionNotifier for LogNotifier {
    fn submission_created(&self, submission: &Submission) {
        info!(
            "New {} submission {}: {:?} from {}",
            submission.kind, submission.id, submission.title, submission.submitter_name
        );
    }
}

/// POSTs the submission as JSON to a configured URL on a background task.
pub struct WebhookNotifier {
    client: reqwest::Client,
    url: String,
}

impl WebhookNotifier {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: url.into(),
        }
    }
}

impl SubmissionNotifier for WebhookNotifier {
    fn submission_created(&self, submission: &Submission) {
        let client = self.client.clone();
        let url = self.url.clone();
        let submission = submission.clone();

        tokio::spawn(async move {
            let result = client
                .post(&url)
                .json(&submission)
                .send()
                .await
                .and_then(|resp| resp.error_for_status());

            match result {
                Ok(_) => info!("Webhook notified for submission {}", submission.id),
                Err(e) => warn!("Webhook for submission {} failed: {}", submission.id, e),
            }
        });
    }
}
