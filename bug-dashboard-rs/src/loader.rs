//! Loading and submitting bug reports
//!
//! Glue between the service client and the dashboard state. Everything here
//! is generic over `BugService`, so any implementation can stand in.

use bug_sdk::{BugId, BugRecord, BugService, Prediction, Priority, ServiceError};
use log::{error, info, warn};
use thiserror::Error;

use crate::form::{BugForm, ValidationError};
use crate::state::DataSource;

/// Notice shown when demo records stand in for the service
pub const DEMO_NOTICE: &str = "Using demo data - API connection failed";

/// Warning shown after a submission is predicted critical
pub const CRITICAL_ALERT: &str = "Critical priority detected! This issue needs immediate attention.";

/// What to do when the bug list cannot be fetched
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadPolicy {
    /// Surface every failure
    #[default]
    Strict,

    /// Substitute the demo records when the service is unreachable.
    /// HTTP errors from a reachable service are still surfaced.
    DemoOnUnreachable,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LoadOutcome {
    pub bugs: Vec<BugRecord>,
    pub source: DataSource,
    /// Set when the caller should tell the user something about the data
    pub notice: Option<&'static str>,
}

/// Fetch the bug list under the given policy
pub async fn load_bugs<S>(service: &S, policy: LoadPolicy) -> Result<LoadOutcome, ServiceError>
where
    S: BugService + ?Sized,
{
    match service.list_bugs().await {
        Ok(bugs) => {
            info!("Loaded {} bug reports", bugs.len());
            Ok(LoadOutcome {
                bugs,
                source: DataSource::Live,
                notice: None,
            })
        }
        Err(e) if policy == LoadPolicy::DemoOnUnreachable && e.is_transport() => {
            warn!("Bug service unreachable, falling back to demo data: {}", e);
            Ok(LoadOutcome {
                bugs: demo_bugs(),
                source: DataSource::Demo,
                notice: Some(DEMO_NOTICE),
            })
        }
        Err(e) => {
            error!("Error loading bugs: {}", e);
            Err(e)
        }
    }
}

#[derive(Error, Debug)]
pub enum SubmitError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Service(#[from] ServiceError),
}

/// A submitted report annotated with its prediction
#[derive(Debug, Clone, PartialEq)]
pub struct SubmissionOutcome {
    pub record: BugRecord,
    pub prediction: Prediction,
}

impl SubmissionOutcome {
    pub fn is_critical(&self) -> bool {
        self.prediction.tier() == Some(Priority::Critical)
    }

    pub fn alert(&self) -> Option<&'static str> {
        self.is_critical().then_some(CRITICAL_ALERT)
    }
}

/// Validate the form, then ask the service for a prediction.
///
/// An invalid form fails without any request being made.
pub async fn submit_report<S>(service: &S, form: &BugForm) -> Result<SubmissionOutcome, SubmitError>
where
    S: BugService + ?Sized,
{
    let submission = form.validate()?;

    let prediction = service.predict(&submission).await.map_err(|e| {
        error!("Error submitting bug: {}", e);
        e
    })?;

    info!(
        "Predicted priority {} for \"{}\"",
        prediction.priority, submission.title
    );

    Ok(SubmissionOutcome {
        record: submission.into_record(prediction.clone()),
        prediction,
    })
}

/// Canned records for offline demos
pub fn demo_bugs() -> Vec<BugRecord> {
    vec![
        BugRecord {
            id: Some(BugId::Number(1)),
            title: "Login button not responding on mobile".to_string(),
            description: "Users are unable to tap the login button on iOS Safari. The button appears to be unresponsive to touch events.".to_string(),
            module: "Authentication".to_string(),
            frequency: "Often".to_string(),
            user_type: "End User".to_string(),
            logs: Some("TypeError: Cannot read property 'addEventListener' of null".to_string()),
            priority: Some("high".to_string()),
            confidence: None,
        },
        BugRecord {
            id: Some(BugId::Number(2)),
            title: "Database connection timeout".to_string(),
            description: "Random database connection timeouts causing 500 errors during peak hours. Affects approximately 15% of requests.".to_string(),
            module: "Database".to_string(),
            frequency: "Sometimes".to_string(),
            user_type: "Developer".to_string(),
            logs: Some("Connection timeout after 30s".to_string()),
            priority: Some("critical".to_string()),
            confidence: None,
        },
        BugRecord {
            id: Some(BugId::Number(3)),
            title: "Minor UI alignment issue in sidebar".to_string(),
            description: "The sidebar navigation menu has a slight alignment issue on screens smaller than 1024px width.".to_string(),
            module: "Frontend".to_string(),
            frequency: "Always".to_string(),
            user_type: "End User".to_string(),
            logs: None,
            priority: Some("low".to_string()),
            confidence: None,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use bug_sdk::{BugSubmission, HealthStatus};
    use mockall::{mock, predicate};

    use crate::form::FormField;

    mock! {
        pub Service {}

        #[async_trait]
        impl BugService for Service {
            async fn predict(&self, submission: &BugSubmission) -> bug_sdk::Result<Prediction>;
            async fn list_bugs(&self) -> bug_sdk::Result<Vec<BugRecord>>;
            async fn get_bug(&self, id: &BugId) -> bug_sdk::Result<BugRecord>;
            async fn health_check(&self) -> bug_sdk::Result<HealthStatus>;
        }
    }

    fn valid_form() -> BugForm {
        BugForm::new()
            .with(FormField::Title, "Checkout double charge")
            .with(FormField::Description, "Card is charged twice on retry")
            .with(FormField::Module, "Payment")
            .with(FormField::Frequency, "Sometimes")
            .with(FormField::UserType, "End User")
    }

    #[tokio::test]
    async fn test_load_live_records() {
        let mut service = MockService::new();
        service
            .expect_list_bugs()
            .times(1)
            .returning(|| Ok(vec![BugRecord { title: "Live".to_string(), ..BugRecord::default() }]));

        let outcome = load_bugs(&service, LoadPolicy::DemoOnUnreachable).await.unwrap();
        assert_eq!(outcome.source, DataSource::Live);
        assert_eq!(outcome.bugs.len(), 1);
        assert!(outcome.notice.is_none());
    }

    #[tokio::test]
    async fn test_demo_fallback_on_network_error() {
        let mut service = MockService::new();
        service
            .expect_list_bugs()
            .returning(|| Err(ServiceError::network("Failed to fetch bug reports")));

        let outcome = load_bugs(&service, LoadPolicy::DemoOnUnreachable).await.unwrap();
        assert_eq!(outcome.source, DataSource::Demo);
        assert_eq!(outcome.bugs, demo_bugs());
        assert_eq!(outcome.notice, Some(DEMO_NOTICE));
    }

    #[tokio::test]
    async fn test_demo_fallback_on_timeout() {
        let mut service = MockService::new();
        service
            .expect_list_bugs()
            .returning(|| Err(ServiceError::timeout("Failed to fetch bug reports")));

        let outcome = load_bugs(&service, LoadPolicy::DemoOnUnreachable).await.unwrap();
        assert_eq!(outcome.source, DataSource::Demo);
    }

    #[tokio::test]
    async fn test_http_error_is_not_masked_by_demo_data() {
        let mut service = MockService::new();
        service
            .expect_list_bugs()
            .returning(|| Err(ServiceError::service("Database unavailable")));

        let err = load_bugs(&service, LoadPolicy::DemoOnUnreachable).await.unwrap_err();
        assert_eq!(err.message(), "Database unavailable");
    }

    #[tokio::test]
    async fn test_strict_policy_surfaces_network_error() {
        let mut service = MockService::new();
        service
            .expect_list_bugs()
            .returning(|| Err(ServiceError::network("Failed to fetch bug reports")));

        let err = load_bugs(&service, LoadPolicy::Strict).await.unwrap_err();
        assert!(err.is_transport());
        assert_eq!(err.message(), "Failed to fetch bug reports");
    }

    #[tokio::test]
    async fn test_invalid_form_makes_no_request() {
        let mut service = MockService::new();
        service.expect_predict().times(0);

        let form = valid_form().with(FormField::Title, "");
        let err = submit_report(&service, &form).await.unwrap_err();

        match err {
            SubmitError::Validation(e) => {
                assert_eq!(e.message_for(FormField::Title), Some("Title is required"))
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_submit_annotates_record() {
        let mut service = MockService::new();
        service
            .expect_predict()
            .with(predicate::function(|s: &BugSubmission| {
                s.title == "Checkout double charge" && s.logs.is_empty()
            }))
            .times(1)
            .returning(|_| {
                Ok(Prediction {
                    priority: "critical".to_string(),
                    confidence: Some(0.87),
                })
            });

        let outcome = submit_report(&service, &valid_form()).await.unwrap();
        assert!(outcome.is_critical());
        assert_eq!(outcome.alert(), Some(CRITICAL_ALERT));
        assert_eq!(outcome.record.priority.as_deref(), Some("critical"));
        assert_eq!(outcome.record.confidence, Some(0.87));
        assert_eq!(outcome.record.module, "Payment");
        assert_eq!(outcome.record.user_type, "End User");
    }

    #[tokio::test]
    async fn test_non_critical_submission_has_no_alert() {
        let mut service = MockService::new();
        service.expect_predict().returning(|_| {
            Ok(Prediction {
                priority: "medium".to_string(),
                confidence: None,
            })
        });

        let outcome = submit_report(&service, &valid_form()).await.unwrap();
        assert!(!outcome.is_critical());
        assert_eq!(outcome.alert(), None);
    }

    #[tokio::test]
    async fn test_submit_surfaces_service_error() {
        let mut service = MockService::new();
        service
            .expect_predict()
            .returning(|_| Err(ServiceError::validation("title must not be blank")));

        let err = submit_report(&service, &valid_form()).await.unwrap_err();
        match err {
            SubmitError::Service(e) => assert_eq!(e.message(), "title must not be blank"),
            other => panic!("expected service error, got {:?}", other),
        }
    }

    #[test]
    fn test_demo_bugs_cover_three_tiers() {
        let bugs = demo_bugs();
        assert_eq!(bugs.len(), 3);
        let tiers: Vec<_> = bugs.iter().map(|b| b.priority_tier()).collect();
        assert_eq!(tiers, vec![Some(Priority::High), Some(Priority::Critical), Some(Priority::Low)]);
    }
}
