//! The quiz submission request handler

use crate::response;
use aws_lambda_events::encodings::Body;
use http::{Method, Request, Response};
use quiz_lead::{
    Config, Dispatcher, EmailSender, LeadId, LeadRecord, NormalizedContent, QuizSubmission, Renderer,
    SubmissionError, ValidSubmission,
};
use std::sync::Arc;
use tracing::{error, info, warn};

/// Handles quiz form posts and their CORS preflights.
///
/// Holds only immutable deployment settings and the shared email capability,
/// so one instance serves every invocation.
#[derive(Debug, Clone)]
pub struct QuizHandler {
    renderer: Renderer,
    dispatcher: Dispatcher,
    from_email: String,
    admin_email: String,
}

fn body_bytes(body: &Body) -> &[u8] {
    match body {
        Body::Empty => &[],
        Body::Text(text) => text.as_bytes(),
        Body::Binary(bytes) => bytes,
    }
}

impl QuizHandler {
    /// Create a handler sending through `sender`
    pub fn new(config: &Config, sender: Arc<dyn EmailSender>) -> Self {
        QuizHandler {
            renderer: config.renderer(),
            dispatcher: Dispatcher::new(sender, config.send_timeout()),
            from_email: config.from_email.clone(),
            admin_email: config.admin_email.clone(),
        }
    }

    /// Produce exactly one response for `request`
    pub async fn handle(&self, request: Request<Body>) -> Response<Body> {
        if request.method() == Method::OPTIONS {
            return response::preflight();
        }

        match self.submit(request.body()).await {
            Ok(lead_id) => response::lead_captured(&lead_id),
            Err(SubmissionError::MissingFields) => {
                warn!("rejected quiz submission with missing required fields");
                response::missing_fields()
            }
            Err(err) => {
                error!(error = %err, "error processing quiz submission");
                response::internal_error()
            }
        }
    }

    async fn submit(&self, body: &Body) -> Result<LeadId, SubmissionError> {
        let submission = QuizSubmission::from_slice(body_bytes(body))?.validate()?;
        self.capture(submission).await;
        Ok(LeadId::generate())
    }

    /// Record the lead and send both notifications. Delivery failures are
    /// logged by the dispatcher and do not surface here.
    async fn capture(&self, submission: ValidSubmission) {
        let record = LeadRecord::capture(submission);
        info!(
            first_name = record.first_name(),
            email = record.email(),
            target_band = ?record.target_band(),
            timeline = ?record.timeline(),
            weak_section = ?record.weak_section(),
            experience = ?record.experience(),
            study_time = ?record.study_time(),
            challenge = ?record.challenge(),
            timestamp = %record.timestamp_iso(),
            "new lead captured"
        );

        let content = NormalizedContent::from_record(&record);
        let notifications = self.renderer.render(&record, &content);
        let user = notifications
            .user
            .addressed(self.from_email.as_str(), record.email());
        let admin = notifications
            .admin
            .addressed(self.from_email.as_str(), self.admin_email.as_str());

        self.dispatcher.dispatch_pair(&user, &admin).await;
    }
}
