//! Notifications — HR review notices and applicant confirmations.
//!
//! Best-effort: every message is sent concurrently with its own timeout, and a
//! failed send is logged, never propagated to the submission.

pub mod report;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use futures::future::join_all;
use serde::Serialize;
use thiserror::Error;
use tracing::{info, warn};
use uuid::Uuid;

use crate::models::application::ApplicationRecord;
use crate::notify::report::render_report;
use crate::scoring::pipeline::ScoringReport;

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("webhook returned status {0}")]
    Status(u16),

    #[error("timed out after {0}s")]
    Timeout(u64),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    HrReview,
    ApplicantConfirmation,
}

/// One outbound message.
#[derive(Debug, Clone, Serialize)]
pub struct Notification {
    pub application_id: Uuid,
    pub kind: NotificationKind,
    pub to: String,
    pub subject: String,
    pub body: String,
}

/// Delivery transport. `WebhookSink` in production, `TracingSink` when no
/// transport is configured.
#[async_trait]
pub trait NotificationSink: Send + Sync {
    async fn send(&self, notification: &Notification) -> Result<(), NotifyError>;
}

/// Logs notifications instead of delivering them.
pub struct TracingSink;

#[async_trait]
impl NotificationSink for TracingSink {
    async fn send(&self, notification: &Notification) -> Result<(), NotifyError> {
        info!(
            application_id = %notification.application_id,
            to = %notification.to,
            subject = %notification.subject,
            "Notification not delivered (no webhook configured)"
        );
        Ok(())
    }
}

/// POSTs each notification as JSON to a mail relay webhook.
pub struct WebhookSink {
    client: reqwest::Client,
    url: String,
}

impl WebhookSink {
    pub fn new(url: String, timeout: Duration) -> Result<Self, NotifyError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client, url })
    }
}

#[async_trait]
impl NotificationSink for WebhookSink {
    async fn send(&self, notification: &Notification) -> Result<(), NotifyError> {
        let response = self.client.post(&self.url).json(notification).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(NotifyError::Status(status.as_u16()));
        }
        Ok(())
    }
}

/// Outcome counts for one dispatch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DispatchSummary {
    pub sent: usize,
    pub failed: usize,
}

pub struct Notifier {
    sink: Arc<dyn NotificationSink>,
    hr_recipients: Vec<String>,
    timeout: Duration,
}

impl Notifier {
    pub fn new(
        sink: Arc<dyn NotificationSink>,
        hr_recipients: Vec<String>,
        timeout: Duration,
    ) -> Self {
        Self {
            sink,
            hr_recipients,
            timeout,
        }
    }

    /// One HR review notice per configured recipient plus one confirmation to
    /// the applicant. The confirmation never carries scoring details.
    pub fn build_notifications(
        &self,
        application_id: Uuid,
        record: &ApplicationRecord,
        report: &ScoringReport,
    ) -> Vec<Notification> {
        let candidate = record.candidate_name();
        let position = record.personal.position_applied.trim();
        let hr_body = render_report(&candidate, position, report);
        let hr_subject = format!("New application: {candidate} for {position}");

        let mut notifications: Vec<Notification> = self
            .hr_recipients
            .iter()
            .map(|to| Notification {
                application_id,
                kind: NotificationKind::HrReview,
                to: to.clone(),
                subject: hr_subject.clone(),
                body: hr_body.clone(),
            })
            .collect();

        let applicant_email = record.personal.email.trim();
        if !applicant_email.is_empty() {
            notifications.push(Notification {
                application_id,
                kind: NotificationKind::ApplicantConfirmation,
                to: applicant_email.to_string(),
                subject: format!("We received your application for {position}"),
                body: format!(
                    "Hi {},\n\nThank you for applying for the {position} position. \
                    Our team will review your application and contact you about next steps.\n\n\
                    Reference: {application_id}\n",
                    record.personal.first_name.trim()
                ),
            });
        }

        notifications
    }

    /// Sends every notification concurrently and waits for all of them.
    pub async fn dispatch(
        &self,
        application_id: Uuid,
        record: &ApplicationRecord,
        report: &ScoringReport,
    ) -> DispatchSummary {
        let notifications = self.build_notifications(application_id, record, report);

        let sends = notifications.iter().map(|n| async move {
            let result = tokio::time::timeout(self.timeout, self.sink.send(n))
                .await
                .map_err(|_| NotifyError::Timeout(self.timeout.as_secs()))
                .and_then(|inner| inner);
            (n, result)
        });

        let mut summary = DispatchSummary::default();
        for (n, result) in join_all(sends).await {
            match result {
                Ok(()) => summary.sent += 1,
                Err(e) => {
                    summary.failed += 1;
                    warn!(
                        %application_id,
                        kind = ?n.kind,
                        to = %n.to,
                        "Notification failed: {e}"
                    );
                }
            }
        }

        info!(
            %application_id,
            sent = summary.sent,
            failed = summary.failed,
            "Notifications dispatched"
        );
        summary
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::models::application::PersonalInfo;

    struct RecordingSink {
        sent: Mutex<Vec<Notification>>,
        fail_for: Option<&'static str>,
        hang_for: Option<&'static str>,
    }

    impl RecordingSink {
        fn new() -> Self {
            Self {
                sent: Mutex::new(Vec::new()),
                fail_for: None,
                hang_for: None,
            }
        }
    }

    #[async_trait]
    impl NotificationSink for RecordingSink {
        async fn send(&self, notification: &Notification) -> Result<(), NotifyError> {
            if self.hang_for == Some(notification.to.as_str()) {
                tokio::time::sleep(Duration::from_secs(3600)).await;
            }
            if self.fail_for == Some(notification.to.as_str()) {
                return Err(NotifyError::Status(502));
            }
            self.sent.lock().unwrap().push(notification.clone());
            Ok(())
        }
    }

    fn record() -> ApplicationRecord {
        ApplicationRecord {
            personal: PersonalInfo {
                first_name: "Ada".to_string(),
                last_name: "Lovelace".to_string(),
                email: "ada@example.com".to_string(),
                position_applied: "Systems Engineer".to_string(),
                ..Default::default()
            },
            ..Default::default()
        }
    }

    fn hr() -> Vec<String> {
        vec!["hr@example.com".to_string(), "ops@example.com".to_string()]
    }

    #[test]
    fn test_builds_hr_notices_and_applicant_confirmation() {
        let notifier = Notifier::new(Arc::new(TracingSink), hr(), Duration::from_secs(5));
        let report = ScoringReport::failure("panel offline");
        let notifications = notifier.build_notifications(Uuid::new_v4(), &record(), &report);

        assert_eq!(notifications.len(), 3);
        let hr_notices: Vec<_> = notifications
            .iter()
            .filter(|n| n.kind == NotificationKind::HrReview)
            .collect();
        assert_eq!(hr_notices.len(), 2);
        assert_eq!(
            hr_notices[0].subject,
            "New application: Ada Lovelace for Systems Engineer"
        );
        assert!(hr_notices[0].body.contains("manual review required"));

        let confirmation = notifications
            .iter()
            .find(|n| n.kind == NotificationKind::ApplicantConfirmation)
            .unwrap();
        assert_eq!(confirmation.to, "ada@example.com");
        assert!(confirmation.body.starts_with("Hi Ada,"));
        assert!(!confirmation.body.contains("manual review"));
    }

    #[tokio::test]
    async fn test_dispatch_counts_failures_without_stopping_others() {
        let mut sink = RecordingSink::new();
        sink.fail_for = Some("ops@example.com");
        let sink = Arc::new(sink);
        let notifier = Notifier::new(sink.clone(), hr(), Duration::from_secs(5));

        let summary = notifier
            .dispatch(Uuid::new_v4(), &record(), &ScoringReport::failure("x"))
            .await;

        assert_eq!(summary, DispatchSummary { sent: 2, failed: 1 });
        assert_eq!(sink.sent.lock().unwrap().len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_dispatch_times_out_slow_sends() {
        let mut sink = RecordingSink::new();
        sink.hang_for = Some("hr@example.com");
        let notifier = Notifier::new(Arc::new(sink), hr(), Duration::from_secs(5));

        let summary = notifier
            .dispatch(Uuid::new_v4(), &record(), &ScoringReport::failure("x"))
            .await;

        assert_eq!(summary, DispatchSummary { sent: 2, failed: 1 });
    }

    #[tokio::test]
    async fn test_no_hr_recipients_still_confirms_applicant() {
        let sink = Arc::new(RecordingSink::new());
        let notifier = Notifier::new(sink.clone(), Vec::new(), Duration::from_secs(5));
        let summary = notifier
            .dispatch(Uuid::new_v4(), &record(), &ScoringReport::failure("x"))
            .await;
        assert_eq!(summary.sent, 1);
        assert_eq!(
            sink.sent.lock().unwrap()[0].kind,
            NotificationKind::ApplicantConfirmation
        );
    }

    #[test]
    fn test_webhook_sink_builds() {
        assert!(WebhookSink::new(
            "http://localhost:9/notify".to_string(),
            Duration::from_secs(1)
        )
        .is_ok());
    }
}
