//! Transactional email templates and delivery.
//!
//! Templates are plain strings with HTML-escaped interpolations. Emails sent while
//! handling a request are best effort: failures are logged and never fail the request.
//! Background jobs use [`Notifier::send`] so a failed delivery can be retried.

use crate::server::{
    error::Error,
    model::{
        app::SiteSettings,
        db::{ListingModel, ProfileModel},
    },
    provider::email::{EmailMessage, Mailer},
    service::retry::RetryContext,
    util::{escape::escape, path::listing_path},
};

/// Sends transactional emails for listing and billing events.
pub struct Notifier<'a> {
    mailer: &'a Mailer,
    settings: &'a SiteSettings,
}

impl<'a> Notifier<'a> {
    /// Creates a new instance of [`Notifier`]
    pub fn new(mailer: &'a Mailer, settings: &'a SiteSettings) -> Self {
        Self { mailer, settings }
    }

    /// Sends `message`, retrying transient failures.
    pub async fn send(&self, message: EmailMessage) -> Result<(), Error> {
        let mut ctx: RetryContext<()> = RetryContext::new();
        let description = format!("email {:?} to {}", message.subject, message.to);

        ctx.execute_with_retry(&description, |_| {
            let mailer = self.mailer.clone();
            let message = message.clone();

            Box::pin(async move { mailer.send(&message).await })
        })
        .await
    }

    /// Sends `message` once, logging instead of returning failures.
    pub async fn send_logged(&self, message: EmailMessage) {
        if let Err(e) = self.mailer.send(&message).await {
            tracing::error!(
                to = %message.to,
                subject = %message.subject,
                "Failed to send email: {}",
                e
            );
        }
    }

    /// Tells the owner their submission is awaiting moderation.
    pub async fn submission_received(&self, owner: &ProfileModel, listing: &ListingModel) {
        self.send_logged(submission_received(self.settings, owner, listing))
            .await
    }

    /// Tells the admin address about a new submission.
    pub async fn new_submission(&self, owner: &ProfileModel, listing: &ListingModel) {
        self.send_logged(new_submission(self.settings, owner, listing))
            .await
    }

    /// Tells the owner their listing is live.
    pub async fn listing_approved(&self, owner: &ProfileModel, listing: &ListingModel) {
        self.send_logged(listing_approved(self.settings, owner, listing))
            .await
    }

    /// Tells the owner their listing was rejected and why.
    pub async fn listing_rejected(&self, owner: &ProfileModel, listing: &ListingModel) {
        self.send_logged(listing_rejected(self.settings, owner, listing))
            .await
    }

    /// Tells the customer a subscription payment failed.
    pub async fn payment_failed(&self, profile: &ProfileModel) {
        self.send_logged(payment_failed(self.settings, profile)).await
    }

    /// Tells the owner their subscription ended and the listing fell back to the free plan.
    pub async fn subscription_ended(&self, owner: &ProfileModel, listing: Option<&ListingModel>) {
        self.send_logged(subscription_ended(self.settings, owner, listing))
            .await
    }
}

/// Wraps a list of HTML paragraphs into a message with a plain text alternative.
fn compose(to: &str, subject: String, paragraphs: Vec<(String, String)>) -> EmailMessage {
    let html = paragraphs
        .iter()
        .map(|(html, _)| format!("<p>{}</p>", html))
        .collect::<Vec<_>>()
        .join("\n");
    let text = paragraphs
        .into_iter()
        .map(|(_, text)| text)
        .collect::<Vec<_>>()
        .join("\n\n");

    EmailMessage {
        to: to.to_string(),
        subject,
        html,
        text,
    }
}

/// Paragraph with a trailing link.
fn link(label: &str, url: &str) -> (String, String) {
    (
        format!("<a href=\"{}\">{}</a>", escape(url), escape(label)),
        format!("{}: {}", label, url),
    )
}

fn plain(text: String) -> (String, String) {
    (escape(&text), text)
}

/// Confirmation sent to the owner after submitting.
pub fn submission_received(
    settings: &SiteSettings,
    owner: &ProfileModel,
    listing: &ListingModel,
) -> EmailMessage {
    compose(
        &owner.email,
        format!("We received {}", listing.name),
        vec![
            plain(format!(
                "Thanks for submitting {} to {}. We review every listing before it goes live and will email you once it has been checked.",
                listing.name, settings.site_name
            )),
            link("View your listings", &settings.url("/dashboard")),
        ],
    )
}

/// Notification sent to the admin address for a new submission.
pub fn new_submission(
    settings: &SiteSettings,
    owner: &ProfileModel,
    listing: &ListingModel,
) -> EmailMessage {
    compose(
        &settings.admin_email,
        format!("New submission: {}", listing.name),
        vec![
            plain(format!("{} submitted {} ({}).", owner.email, listing.name, listing.url)),
            plain(listing.description.clone()),
            link("Open the moderation queue", &settings.url("/admin/listings")),
        ],
    )
}

/// Sent to the owner once the listing is approved.
pub fn listing_approved(
    settings: &SiteSettings,
    owner: &ProfileModel,
    listing: &ListingModel,
) -> EmailMessage {
    compose(
        &owner.email,
        format!("{} is now live", listing.name),
        vec![
            plain(format!(
                "Good news! {} has been approved and is now listed on {}.",
                listing.name, settings.site_name
            )),
            link("See your listing", &settings.url(&listing_path(&listing.slug))),
        ],
    )
}

/// Sent to the owner when the listing is rejected.
pub fn listing_rejected(
    settings: &SiteSettings,
    owner: &ProfileModel,
    listing: &ListingModel,
) -> EmailMessage {
    let reason = listing
        .rejection_reason
        .clone()
        .unwrap_or_else(|| "No reason was given.".to_string());

    compose(
        &owner.email,
        format!("{} was not approved", listing.name),
        vec![
            plain(format!(
                "Unfortunately {} was not approved for {}.",
                listing.name, settings.site_name
            )),
            plain(format!("Reason: {}", reason)),
            plain("You can edit the listing and it will be reviewed again.".to_string()),
            link("Edit your listing", &settings.url("/dashboard")),
        ],
    )
}

/// Reminder sent to the owner before a listing stops being visible.
pub fn expiry_reminder(
    settings: &SiteSettings,
    owner: &ProfileModel,
    listing: &ListingModel,
) -> EmailMessage {
    let until = listing
        .visible_until
        .map(|until| until.format("%Y-%m-%d").to_string())
        .unwrap_or_default();

    compose(
        &owner.email,
        format!("{} will stop being listed on {}", listing.name, until),
        vec![
            plain(format!(
                "Your listing {} on {} is visible until {}.",
                listing.name, settings.site_name, until
            )),
            plain("Upgrade or renew your plan to keep it listed.".to_string()),
            link("See plans", &settings.url("/pricing")),
        ],
    )
}

/// Sent to the customer when a subscription payment fails.
pub fn payment_failed(settings: &SiteSettings, profile: &ProfileModel) -> EmailMessage {
    compose(
        &profile.email,
        format!("Your {} payment failed", settings.site_name),
        vec![
            plain(
                "We could not collect your latest subscription payment. Please update your payment method to keep your listing's plan."
                    .to_string(),
            ),
            link("Manage billing", &settings.url("/dashboard")),
        ],
    )
}

/// Sent to the owner when a subscription ends.
pub fn subscription_ended(
    settings: &SiteSettings,
    owner: &ProfileModel,
    listing: Option<&ListingModel>,
) -> EmailMessage {
    let subject = match listing {
        Some(listing) => format!("Your plan for {} has ended", listing.name),
        None => format!("Your {} subscription has ended", settings.site_name),
    };

    compose(
        &owner.email,
        subject,
        vec![
            plain(
                "Your subscription has ended and your listing is back on the free plan."
                    .to_string(),
            ),
            link("See plans", &settings.url("/pricing")),
        ],
    )
}
