//! Payment webhook handling.
//!
//! Events are verified, de-duplicated by event ID and applied in a single database
//! transaction together with the record of the processed event. Emails are sent only
//! after the transaction commits.

use chrono::Utc;
use sea_orm::{ConnectionTrait, DatabaseTransaction, SqlErr, TransactionTrait};

use crate::{
    model::billing::WebhookAckDto,
    server::{
        data::{profile::ProfileRepository, stripe_event::StripeEventRepository},
        error::{billing::BillingError, Error},
        model::db::{ListingModel, ProfileModel},
        provider::stripe::model::{
            StripeCheckoutSession, StripeEvent, StripeInvoice, StripeSubscription,
        },
        service::{
            billing::{
                sync::{sync_subscription, SyncOutcome},
                BillingService,
            },
            notification::Notifier,
        },
    },
};

/// Email to send once the event's changes are committed.
enum WebhookNotice {
    PaymentFailed(ProfileModel),
    SubscriptionEnded {
        owner: ProfileModel,
        listing: Option<ListingModel>,
    },
}

impl<'a> BillingService<'a> {
    /// Verifies and applies a payment webhook.
    ///
    /// # Arguments
    /// - `payload` - Raw request body, exactly as signed
    /// - `signature` - Value of the `Stripe-Signature` header
    ///
    /// # Returns
    /// - `Ok(WebhookAckDto)` - Event applied, ignored or already processed
    /// - `Err(Error::BillingError(_))` - Signature missing, malformed, wrong or stale
    /// - `Err(Error::BillingError(BillingError::MalformedEvent))` - Payload is not an event
    pub async fn handle_webhook(
        &self,
        payload: &str,
        signature: Option<&str>,
        notifier: &Notifier<'_>,
    ) -> Result<WebhookAckDto, Error> {
        self.stripe
            .verify_webhook(payload, signature, Utc::now().timestamp())?;

        let event: StripeEvent = serde_json::from_str(payload)
            .map_err(|e| BillingError::MalformedEvent(e.to_string()))?;

        if StripeEventRepository::new(self.db).exists(&event.id).await? {
            tracing::debug!(event_id = %event.id, "Skipping already processed webhook event");

            return Ok(WebhookAckDto {
                received: true,
                duplicate: true,
            });
        }

        let txn = self.db.begin().await?;

        let notices = self.dispatch(&txn, &event).await?;

        let recorded = StripeEventRepository::new(&txn)
            .record(&event.id, &event.event_type, Utc::now().naive_utc())
            .await;

        match recorded {
            Ok(_) => txn.commit().await?,
            // A concurrent delivery of the same event committed first
            Err(e) if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => {
                txn.rollback().await?;

                return Ok(WebhookAckDto {
                    received: true,
                    duplicate: true,
                });
            }
            Err(e) => return Err(e.into()),
        }

        tracing::info!(
            event_id = %event.id,
            "Processed {} webhook event",
            event.event_type
        );

        for notice in notices {
            match notice {
                WebhookNotice::PaymentFailed(profile) => notifier.payment_failed(&profile).await,
                WebhookNotice::SubscriptionEnded { owner, listing } => {
                    notifier.subscription_ended(&owner, listing.as_ref()).await
                }
            }
        }

        Ok(WebhookAckDto {
            received: true,
            duplicate: false,
        })
    }

    async fn dispatch(
        &self,
        txn: &DatabaseTransaction,
        event: &StripeEvent,
    ) -> Result<Vec<WebhookNotice>, Error> {
        let object = event.data.object.clone();

        match event.event_type.as_str() {
            "checkout.session.completed" => {
                let session: StripeCheckoutSession = serde_json::from_value(object)?;
                self.checkout_completed(txn, &session).await?;

                Ok(Vec::new())
            }
            "customer.subscription.created" | "customer.subscription.updated" => {
                let subscription: StripeSubscription = serde_json::from_value(object)?;
                sync_subscription(txn, self.stripe, self.settings, &subscription).await?;

                Ok(Vec::new())
            }
            "customer.subscription.deleted" => {
                let subscription: StripeSubscription = serde_json::from_value(object)?;

                match sync_subscription(txn, self.stripe, self.settings, &subscription).await? {
                    SyncOutcome::Synced {
                        profile, listing, ..
                    } => Ok(vec![WebhookNotice::SubscriptionEnded {
                        owner: profile,
                        listing,
                    }]),
                    SyncOutcome::Ignored => Ok(Vec::new()),
                }
            }
            "invoice.payment_failed" => {
                let invoice: StripeInvoice = serde_json::from_value(object)?;

                let profile = match &invoice.customer {
                    Some(customer_id) => {
                        ProfileRepository::new(txn)
                            .find_by_customer_id(customer_id)
                            .await?
                    }
                    None => None,
                };

                match profile {
                    Some(profile) => Ok(vec![WebhookNotice::PaymentFailed(profile)]),
                    None => {
                        tracing::warn!(
                            invoice_id = %invoice.id,
                            "No profile found for failed invoice"
                        );

                        Ok(Vec::new())
                    }
                }
            }
            other => {
                tracing::debug!(event_id = %event.id, "Ignoring {} webhook event", other);

                Ok(Vec::new())
            }
        }
    }

    async fn checkout_completed<C: ConnectionTrait>(
        &self,
        db: &C,
        session: &StripeCheckoutSession,
    ) -> Result<(), Error> {
        let profile_repo = ProfileRepository::new(db);

        if let (Some(profile_id), Some(customer_id)) = (session.profile_id(), &session.customer) {
            if let Some(profile) = profile_repo.find_by_id(profile_id).await? {
                if profile.stripe_customer_id.is_none() {
                    profile_repo
                        .set_stripe_customer_id(profile.id, customer_id)
                        .await?;
                }
            }
        }

        let Some(subscription_id) = &session.subscription else {
            tracing::warn!(
                session_id = %session.id,
                "Completed checkout session has no subscription"
            );
            return Ok(());
        };

        let subscription = self.stripe.retrieve_subscription(subscription_id).await?;
        sync_subscription(db, self.stripe, self.settings, &subscription).await?;

        Ok(())
    }
}
