use std::sync::Arc;

use serde_json::json;
use tracing::Instrument;
use uuid::Uuid;

use crate::config::BookingSettings;
use crate::errors::ToolError;
use crate::models::{BookingArgs, BookingPayload, ToolSchema};
use crate::services::session::InterruptionGate;
use crate::services::submitter::{
    appointments_url, BookingSubmitter, ReqwestTransport, RetryPolicy, Sleeper, TokioSleeper,
    Transport,
};
use crate::services::timezone::normalize_to_utc;
use crate::services::validation::validate_args;

pub const TOOL_NAME: &str = "book_appointment";

const TOOL_DESCRIPTION: &str = "Book an appointment once first name, last name, phone and date \
have been gathered and confirmed with the caller. Ask for missing details one at a time and read \
the full booking back before calling, since speech is easily misheard. Resolve relative dates \
such as 'tomorrow' to a concrete date first. Only tell the caller the appointment is booked \
after this tool has returned.";

/// The `book_appointment` tool. Holds no per-call state, so one instance can
/// serve concurrent invocations.
pub struct BookingTool {
    settings: BookingSettings,
    submitter: BookingSubmitter,
}

impl BookingTool {
    pub fn new(
        settings: BookingSettings,
        transport: Arc<dyn Transport>,
        sleeper: Arc<dyn Sleeper>,
    ) -> Self {
        let policy = RetryPolicy::from_settings(&settings);
        Self {
            settings,
            submitter: BookingSubmitter::new(transport, sleeper, policy),
        }
    }

    pub fn with_client(settings: BookingSettings, client: reqwest::Client) -> Self {
        Self::new(
            settings,
            Arc::new(ReqwestTransport::with_client(client)),
            Arc::new(TokioSleeper),
        )
    }

    pub fn settings(&self) -> &BookingSettings {
        &self.settings
    }

    pub fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: TOOL_NAME.to_string(),
            description: TOOL_DESCRIPTION.to_string(),
            parameters: json!({
                "type": "object",
                "properties": {
                    "first_name": {
                        "type": "string",
                        "description": "The customer's first name, e.g. 'John'. Must not be empty."
                    },
                    "last_name": {
                        "type": "string",
                        "description": "The customer's last name, e.g. 'Doe'. Must not be empty."
                    },
                    "date": {
                        "type": "string",
                        "description": format!(
                            "Appointment date and time in ISO format, e.g. '2025-12-01T10:00:00'. \
                             Times without an offset are read as {} local time.",
                            self.settings.timezone.name()
                        )
                    },
                    "phone": {
                        "type": "string",
                        "description": "The customer's phone number, exactly 10 digits, e.g. '1234567890'."
                    }
                },
                "required": ["first_name", "last_name", "date", "phone"],
                "additionalProperties": false
            }),
            disallow_interruptions: true,
        }
    }

    /// Runs one tool invocation and returns the scheduling API's response body
    /// verbatim.
    pub async fn book_appointment(
        &self,
        gate: &dyn InterruptionGate,
        args: &BookingArgs,
    ) -> Result<String, ToolError> {
        let span = tracing::info_span!(
            "book_appointment",
            invocation_id = %Uuid::new_v4(),
            phone = %mask_phone(&args.phone),
        );
        self.run(gate, args).instrument(span).await
    }

    async fn run(&self, gate: &dyn InterruptionGate, args: &BookingArgs) -> Result<String, ToolError> {
        gate.disallow_interruptions();

        let request = validate_args(args).map_err(|e| {
            tracing::info!(reason = %e, "rejected booking arguments");
            e
        })?;

        let utc_date = normalize_to_utc(&request.date, self.settings.timezone).map_err(|e| {
            tracing::info!(date = %request.date, "could not parse booking date");
            e
        })?;

        let base_url = self.settings.base_url.resolve();
        let url = appointments_url(base_url.as_deref()).map_err(|e| {
            tracing::error!(error = %e, "booking endpoint not configured");
            e
        })?;

        let payload = BookingPayload::new(request, utc_date);
        tracing::debug!(date = %payload.date, "submitting booking");

        self.submitter.submit(&url, &payload).await
    }
}

/// Keeps only the last four characters.
fn mask_phone(phone: &str) -> String {
    let count = phone.chars().count();
    phone
        .chars()
        .enumerate()
        .map(|(i, c)| if i + 4 < count { '*' } else { c })
        .collect()
}
