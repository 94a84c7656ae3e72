//! Backend commands queued from UI to backend worker.

use client_core::SubmissionPayload;
use uuid::Uuid;

pub enum BackendCommand {
    GeneratePoster {
        submission_id: Uuid,
        payload: SubmissionPayload,
    },
}

impl BackendCommand {
    pub fn name(&self) -> &'static str {
        match self {
            BackendCommand::GeneratePoster { .. } => "generate_poster",
        }
    }
}
