use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Local;
use tokio::task::JoinHandle;
use tracing::{error, info, instrument, warn};

use crate::config::RelayConfig;
use crate::model::quote::{DeliveryOutcome, QuoteSubmission, SheetDestination};
use crate::service::notification_composer::compose_notification;
use crate::service::row_normalizer::normalize;
use crate::util::email::NotificationTransport;
use crate::util::error::{DependencyError, ServiceError};
use crate::util::sheets::RowRecorder;

#[async_trait]
pub trait QuoteService: Send + Sync {
	/// Validates the submission, then records and announces it.
	async fn submit_quote(&self, submission: QuoteSubmission) -> Result<DeliveryOutcome, ServiceError>;
}

pub struct QuoteServiceImpl {
	pub recorder: Option<Arc<dyn RowRecorder>>,
	pub notifier: Option<Arc<dyn NotificationTransport>>,
	pub relay_config: RelayConfig,
}

impl QuoteServiceImpl {
	pub fn new(
		recorder: Option<Arc<dyn RowRecorder>>,
		notifier: Option<Arc<dyn NotificationTransport>>,
		relay_config: RelayConfig,
	) -> Self {
		QuoteServiceImpl { recorder, notifier, relay_config }
	}

	/// Name of the active email transport, `"disabled"` when none.
	pub fn email_transport_name(&self) -> &'static str {
		self.notifier.as_ref().map(|n| n.name()).unwrap_or("disabled")
	}

	pub fn sheets_enabled(&self) -> bool {
		self.recorder.is_some()
	}

	fn spawn_sheet_append(&self, submission: &QuoteSubmission) -> JoinHandle<Result<bool, DependencyError>> {
		let recorder = self.recorder.clone();
		let destination = SheetDestination::for_form_type(submission.form_type());
		let row = normalize(submission, Local::now().naive_local());
		let timeout = self.relay_config.side_effect_timeout();

		tokio::spawn(async move {
			match recorder {
				Some(recorder) => bounded("sheets", timeout, recorder.append_row(destination, row)).await,
				None => Ok(false),
			}
		})
	}

	fn spawn_notification(&self, submission: &QuoteSubmission) -> JoinHandle<Result<bool, DependencyError>> {
		let notifier = self.notifier.clone();
		let timeout = self.relay_config.side_effect_timeout();
		let submission = submission.clone();

		tokio::spawn(async move {
			match notifier {
				Some(notifier) => {
					let message = compose_notification(&submission, notifier.recipient());
					let send = async move {
						notifier.send(message).await?;
						Ok::<bool, DependencyError>(true)
					};
					bounded("email", timeout, send).await
				}
				None => Ok(false),
			}
		})
	}
}

/// Fails with [`DependencyError::Timeout`] when `operation` outlives `limit`.
async fn bounded<F>(dependency: &'static str, limit: Duration, operation: F) -> Result<bool, DependencyError>
where
	F: Future<Output = Result<bool, DependencyError>>,
{
	tokio::time::timeout(limit, operation)
		.await
		.map_err(|_| DependencyError::Timeout { dependency, secs: limit.as_secs() })?
}

/// Collapses a joined side effect into its outcome flag, logging failures.
fn settle(
	dependency: &'static str,
	joined: Result<Result<bool, DependencyError>, tokio::task::JoinError>,
) -> bool {
	let result = joined.unwrap_or_else(|join_err| {
		Err(DependencyError::TaskFailed { dependency, reason: join_err.to_string() })
	});
	match result {
		Ok(true) => true,
		Ok(false) => {
			warn!("{} not configured, skipped", dependency);
			false
		}
		Err(err) => {
			error!("{} failed: {}", dependency, err);
			false
		}
	}
}

/// Message for a missing required field set, e.g. `Name and Email are required`.
pub fn required_fields_message(required_fields: &[String]) -> String {
	let labels: Vec<String> = required_fields
		.iter()
		.map(|field| {
			let mut chars = field.chars();
			match chars.next() {
				Some(first) => first.to_uppercase().chain(chars).collect(),
				None => String::new(),
			}
		})
		.collect();

	let joined = match labels.split_last() {
		Some((last, [])) => last.clone(),
		Some((last, rest)) => format!("{} and {}", rest.join(", "), last),
		None => String::new(),
	};
	let verb = if labels.len() == 1 { "is" } else { "are" };
	format!("{} {} required", joined, verb)
}

/// Rejects submissions missing any required field. No format checks.
pub fn validate_submission(
	submission: &QuoteSubmission,
	required_fields: &[String],
) -> Result<(), ServiceError> {
	if required_fields.iter().all(|field| submission.has_field(field)) {
		Ok(())
	} else {
		Err(ServiceError::InvalidInput(required_fields_message(required_fields)))
	}
}

#[async_trait]
impl QuoteService for QuoteServiceImpl {
	#[instrument(skip(self, submission), fields(form_type = submission.form_type().as_tag()))]
	async fn submit_quote(&self, submission: QuoteSubmission) -> Result<DeliveryOutcome, ServiceError> {
		if let Err(err) = validate_submission(&submission, &self.relay_config.required_fields) {
			warn!("Rejected quote submission: {}", err);
			return Err(err);
		}

		info!(
			"Quote from {} ({}) - {}",
			submission.name().unwrap_or_default(),
			submission.email().unwrap_or_default(),
			submission.form_type().as_tag()
		);

		// Spawned so a dropped request does not cancel work already started.
		let sheet_task = self.spawn_sheet_append(&submission);
		let email_task = self.spawn_notification(&submission);
		let (sheet, email) = tokio::join!(sheet_task, email_task);

		let outcome = DeliveryOutcome {
			sheet_recorded: settle("sheets", sheet),
			email_sent: settle("email", email),
		};
		info!(
			"Quote processed: sheet_recorded={}, email_sent={}",
			outcome.sheet_recorded, outcome.email_sent
		);
		Ok(outcome)
	}
}
