//! Executes automation actions against a booking.
//!
//! Every effect is mocked: emails land in the outbox, alerts and payment
//! requests land in the automation log. Missing references (an unknown
//! template id, an unknown action kind) are logged and otherwise ignored.

use std::sync::Arc;

use vfo_core::automation::AutomationAction;
use vfo_core::booking::Booking;
use vfo_core::error::Result;
use vfo_core::records::OutboxEmail;
use vfo_core::template::resolve;

use crate::activity_log::ActivityLog;
use crate::lifecycle::LifecycleHooks;
use crate::site_settings::SiteConfigService;
use crate::template_catalog::EmailTemplateCatalog;

/// What the caller still has to do after an action ran.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionOutcome {
    Done,
    /// The action asked for the booking to move to another stage.
    MoveStage(String),
}

pub struct AutomationRunner {
    templates: Arc<EmailTemplateCatalog>,
    activity: Arc<ActivityLog>,
    lifecycle: Arc<LifecycleHooks>,
    site: Arc<SiteConfigService>,
}

impl AutomationRunner {
    pub fn new(
        templates: Arc<EmailTemplateCatalog>,
        activity: Arc<ActivityLog>,
        lifecycle: Arc<LifecycleHooks>,
        site: Arc<SiteConfigService>,
    ) -> Self {
        Self {
            templates,
            activity,
            lifecycle,
            site,
        }
    }

    pub fn run(&self, action: &AutomationAction, booking: &Booking) -> Result<ActionOutcome> {
        match action {
            AutomationAction::SendEmailTemplate { template_id } => {
                self.send_template(template_id, booking)?;
            }
            AutomationAction::AlertAdvisor { message } => {
                let message = resolve(message, &booking.merge_vars());
                tracing::info!("[Automation] Advisor alert for {}: {}", booking.id, message);
                self.activity.log("alert_advisor", Some(message))?;
            }
            AutomationAction::ScheduleTask { task, delay_days } => {
                let scheduled = self.lifecycle.schedule_task(&booking.id, task, *delay_days)?;
                self.activity.log(
                    "schedule_task",
                    Some(format!("{} for {} (due {})", task, booking.id, scheduled.due.unwrap_or_default())),
                )?;
            }
            AutomationAction::Log { message } => {
                self.activity.log("rule_log", Some(message.clone()))?;
            }
            AutomationAction::MoveStage { stage } => {
                return Ok(ActionOutcome::MoveStage(stage.clone()));
            }
            AutomationAction::RequestPayment { amount, currency } => {
                let detail = format!(
                    "{} {} for {}",
                    amount.map(|a| format!("{:.2}", a)).unwrap_or_else(|| "-".to_string()),
                    currency.as_deref().unwrap_or(""),
                    booking.id
                );
                if self.site.get().paywall_active() {
                    self.activity.log("payment_requested", Some(detail))?;
                } else {
                    tracing::debug!("[Automation] Paywall disabled, skipping payment request");
                    self.activity.log("payment_skipped", Some(detail))?;
                }
            }
            AutomationAction::Unknown { kind, .. } => {
                tracing::warn!("[Automation] Ignoring unknown action kind '{}'", kind);
                self.activity.log("unknown_action", Some(kind.clone()))?;
            }
        }
        Ok(ActionOutcome::Done)
    }

    /// Renders the template for `booking` and puts it in the outbox.
    ///
    /// Returns `false` when the template does not exist.
    pub fn send_template(&self, template_id: &str, booking: &Booking) -> Result<bool> {
        let Some(rendered) = self.templates.render(template_id, &booking.merge_vars())? else {
            tracing::warn!(
                "[Automation] Template '{}' not found, nothing sent to {}",
                template_id,
                booking.id
            );
            self.activity.log(
                "missing_template",
                Some(format!("{} for {}", template_id, booking.id)),
            )?;
            return Ok(false);
        };

        self.activity.push_outbox(OutboxEmail {
            id: format!("ob-{}", uuid::Uuid::new_v4().simple()),
            booking_id: booking.id.clone(),
            template_id: rendered.template_id.clone(),
            subject: rendered.subject,
            html: rendered.html,
            created_at: chrono::Utc::now().to_rfc3339(),
        })?;
        self.activity.log(
            "send_email_template",
            Some(format!("{} -> {}", rendered.template_id, booking.id)),
        )?;
        Ok(true)
    }
}
