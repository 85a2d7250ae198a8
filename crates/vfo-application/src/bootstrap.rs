//! Seeds a fresh workspace with demo bookings and default content.
//!
//! Every default record is inserted only when its id is absent, so running
//! the seed again never overwrites user edits or duplicates records.

use chrono::{Duration, Utc};
use serde::Serialize;
use serde_json::{Map, Value};
use vfo_core::automation::{AutomationAction, AutomationEvent, AutomationRule};
use vfo_core::booking::{Booking, BookingDocument, IntakeAnswers, Price};
use vfo_core::error::Result;
use vfo_core::nurture::default_sequences;
use vfo_core::template::EmailTemplate;

use crate::client_records::ClientRecordStore;
use crate::nurture_engine::NurtureSequenceEngine;
use crate::rule_store::AutomationRuleStore;
use crate::site_settings::{CatalogService, SiteConfigService};
use crate::template_catalog::EmailTemplateCatalog;

/// Logo shipped with the demo data.
pub const DEMO_LOGO_PATH: &str = "/wy-apt-logo.png";

/// How many records each seed step inserted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SeedReport {
    pub bookings: usize,
    pub templates: usize,
    pub sequences: usize,
    pub rules: usize,
    pub catalog_ready: bool,
}

impl SeedReport {
    pub fn inserted(&self) -> usize {
        self.bookings + self.templates + self.sequences + self.rules
    }
}

pub struct Seeder<'a> {
    pub records: &'a ClientRecordStore,
    pub templates: &'a EmailTemplateCatalog,
    pub sequences: &'a NurtureSequenceEngine,
    pub rules: &'a AutomationRuleStore,
    pub site: &'a SiteConfigService,
    pub catalog: &'a CatalogService,
}

impl Seeder<'_> {
    pub fn run(&self) -> Result<SeedReport> {
        let mut report = SeedReport::default();

        if self.records.list()?.is_empty() {
            for booking in demo_bookings() {
                self.records.add(booking)?;
                report.bookings += 1;
            }
            let mut patch = Map::new();
            patch.insert("logoPath".to_string(), Value::String(DEMO_LOGO_PATH.to_string()));
            self.site.save(&patch)?;
        }

        for template in default_templates() {
            if self.templates.insert_if_absent(template)? {
                report.templates += 1;
            }
        }
        for sequence in default_sequences() {
            if self.sequences.insert_if_absent(sequence)? {
                report.sequences += 1;
            }
        }
        for rule in default_rules() {
            if self.rules.insert_if_absent(rule)? {
                report.rules += 1;
            }
        }
        self.catalog.get()?;
        report.catalog_ready = true;

        tracing::info!(
            "[Bootstrap] Seeded {} bookings, {} templates, {} sequences, {} rules",
            report.bookings,
            report.templates,
            report.sequences,
            report.rules
        );
        Ok(report)
    }
}

/// Three demo clients at different points of the primary track.
pub fn demo_bookings() -> Vec<Booking> {
    let now = Utc::now();
    let at = |hours: i64| (now + Duration::hours(hours)).to_rfc3339();
    let usd = || Some(Price {
        amount: 375.0,
        currency: "USD".to_string(),
    });

    let mut jane = Booking::new("seed-1", "Jane Smith", "jane@example.com");
    jane.created_at = at(-48);
    jane.appointment_at = Some(at(6));
    jane.guests = vec!["paul@example.com".to_string()];
    jane.pkg = "consult-30".to_string();
    jane.slot = "Wed 11:30 AM MT".to_string();
    jane.phone = Some("+1 (555) 234-5678".to_string());
    jane.price = usd();
    jane.stage = "Booked".to_string();
    jane.intake = IntakeAnswers {
        referral_source: Some("Google / Search".to_string()),
        state_of_residence: Some("Colorado".to_string()),
        citizenship: Some("yes".to_string()),
        marital_status: Some("Married".to_string()),
        priority: vec!["Asset protection".to_string()],
        asset_types: vec![
            "Real estate".to_string(),
            "Investments (stocks, bonds, funds)".to_string(),
        ],
        urgency: Some("Within 1-2 weeks".to_string()),
        asset_value_range: Some("$1M - $5M".to_string()),
        ..IntakeAnswers::default()
    };

    let mut michael = Booking::new("seed-2", "Michael Johnson", "michael@example.com");
    michael.created_at = at(-120);
    michael.appointment_at = Some(at(20));
    michael.pkg = "wy-apt-assess".to_string();
    michael.slot = "Thu 9:00 AM MT".to_string();
    michael.phone = Some("+1 (555) 345-6789".to_string());
    michael.price = usd();
    michael.stage = "Signed".to_string();
    michael.intake = IntakeAnswers {
        referral_source: Some("Referral".to_string()),
        state_of_residence: Some("Wyoming".to_string()),
        citizenship: Some("yes".to_string()),
        marital_status: Some("Single".to_string()),
        priority: vec!["Tax efficiency".to_string(), "Legacy planning".to_string()],
        asset_types: vec![
            "Business interests".to_string(),
            "Cash or cash equivalents".to_string(),
        ],
        urgency: Some("Immediately".to_string()),
        asset_value_range: Some("$5M - $10M".to_string()),
        ..IntakeAnswers::default()
    };
    michael.docs.push(BookingDocument {
        id: "doc-1".to_string(),
        title: "Engagement Letter (Signed).pdf".to_string(),
        doc_type: "pdf".to_string(),
        created_at: at(-72),
        url: Some("#".to_string()),
    });

    let mut ava = Booking::new("seed-3", "Ava Martinez", "ava@example.com");
    ava.created_at = at(-216);
    ava.appointment_at = Some(at(50));
    ava.pkg = "consult-60".to_string();
    ava.slot = "Fri 1:00 PM MT".to_string();
    ava.phone = Some("+1 (555) 987-6543".to_string());
    ava.price = usd();
    ava.intake = IntakeAnswers {
        referral_source: Some("YouTube".to_string()),
        state_of_residence: Some("California".to_string()),
        citizenship: Some("other".to_string()),
        citizenship_other: Some("Green card holder".to_string()),
        marital_status: Some("Divorced".to_string()),
        priority: vec!["Asset protection".to_string()],
        asset_types: vec![
            "Bitcoin and Cryptocurrency holdings".to_string(),
            "Intellectual Property".to_string(),
        ],
        urgency: Some("Exploring options".to_string()),
        asset_value_range: Some("$500k - $1M".to_string()),
        ..IntakeAnswers::default()
    };

    vec![jane, michael, ava]
}

pub fn default_templates() -> Vec<EmailTemplate> {
    vec![
        EmailTemplate::new(
            "Welcome",
            "Welcome, {{first_name}}",
            "<p>Hi {{first_name}},</p><p>Thanks for booking your {{pkg}} consultation. \
             We will see you on {{slot}}.</p>",
        )
        .with_id("welcome"),
        EmailTemplate::new(
            "Consult Reminder",
            "Reminder: your consultation on {{slot}}",
            "<p>Hi {{first_name}},</p><p>A quick reminder about your consultation on {{slot}}.</p>",
        )
        .with_id("consult-reminder"),
        EmailTemplate::new(
            "Engagement Confirmed",
            "Your engagement is confirmed",
            "<p>Hi {{first_name}},</p><p>Your signed engagement letter has been received. \
             Next up is the intake questionnaire.</p>",
        )
        .with_id("engagement-confirmed"),
    ]
}

pub fn default_rules() -> Vec<AutomationRule> {
    vec![
        AutomationRule::new("rule-booked-welcome", "Welcome new bookings", AutomationEvent::StageChange)
            .with_condition("stage_to", "Booked")
            .with_action(AutomationAction::send_email_template("welcome")),
        AutomationRule::new("rule-signed-confirm", "Confirm signed engagements", AutomationEvent::StageChange)
            .with_condition("stage_to", "Signed")
            .with_action(AutomationAction::send_email_template("engagement-confirmed"))
            .with_action(AutomationAction::AlertAdvisor {
                message: "{{name}} signed the engagement letter".to_string(),
            }),
    ]
}
