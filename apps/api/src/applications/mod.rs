// Application intake: JSON and multipart submissions, persistence, re-scoring.
// Scoring is delegated to scoring::pipeline; notifications to notify.

pub mod handlers;
pub mod intake;
pub mod uploads;
