//! Periodic notification service
//!
//! Scans every subscription, renders and dispatches a weather update for
//! the due ones, and stamps the last-notified timestamp only when the
//! mail collaborator confirms the send. Failures are logged and skipped.

use std::sync::Arc;

use chrono::Utc;
use domain::{City, FrequencyUnit, WeatherReading};
use tracing::{debug, info, instrument, warn};

use crate::error::ApplicationError;
use crate::ports::{
    CityRegistry, MailMessage, MailPort, SnapshotStore, SubscriptionLedger, UserDirectory,
};

/// Counters from one notification sweep
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NotificationOutcome {
    /// Notifications confirmed sent
    pub sent: usize,
    /// Due subscriptions whose dispatch failed; retried next sweep
    pub failed: usize,
}

/// Due-notification scan and dispatch
pub struct NotificationService {
    ledger: Arc<dyn SubscriptionLedger>,
    cities: Arc<dyn CityRegistry>,
    snapshots: Arc<dyn SnapshotStore>,
    users: Arc<dyn UserDirectory>,
    mail: Arc<dyn MailPort>,
    unit: FrequencyUnit,
}

impl std::fmt::Debug for NotificationService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NotificationService")
            .field("unit", &self.unit)
            .finish_non_exhaustive()
    }
}

impl NotificationService {
    /// Create the service over its ports with the global frequency unit
    pub fn new(
        ledger: Arc<dyn SubscriptionLedger>,
        cities: Arc<dyn CityRegistry>,
        snapshots: Arc<dyn SnapshotStore>,
        users: Arc<dyn UserDirectory>,
        mail: Arc<dyn MailPort>,
        unit: FrequencyUnit,
    ) -> Self {
        Self {
            ledger,
            cities,
            snapshots,
            users,
            mail,
            unit,
        }
    }

    /// Dispatch a weather update for every due subscription.
    ///
    /// The timestamp advances only on confirmed send, so a failed
    /// dispatch leaves the subscription due for the next sweep.
    #[instrument(skip(self))]
    pub async fn process_due(&self) -> Result<NotificationOutcome, ApplicationError> {
        let now = Utc::now();
        let subscriptions = self.ledger.list_all().await?;
        debug!(
            subscription_count = subscriptions.len(),
            "Starting notification sweep"
        );

        let mut outcome = NotificationOutcome::default();
        for subscription in subscriptions {
            if !subscription.is_due(now, self.unit) {
                continue;
            }

            let Some(city) = self.cities.get(subscription.city_id).await? else {
                warn!(subscription_id = %subscription.id, "Due subscription references a missing city");
                continue;
            };
            let Some(snapshot) = self.snapshots.get(subscription.city_id).await? else {
                warn!(subscription_id = %subscription.id, city = %city.key, "City has no weather snapshot yet");
                continue;
            };
            let Some(recipient) = self.users.email_for(subscription.user_id).await? else {
                warn!(user_id = %subscription.user_id, "No email address known for user");
                continue;
            };

            let message = MailMessage::new(
                recipient,
                render_subject(&city),
                render_body(&city, snapshot.public_view()),
            );

            match self.mail.send(&message).await {
                Ok(()) => {
                    self.ledger.mark_notified(subscription.id, now).await?;
                    outcome.sent += 1;
                },
                Err(e) => {
                    warn!(
                        subscription_id = %subscription.id,
                        error = %e,
                        "Notification dispatch failed, will retry next sweep"
                    );
                    outcome.failed += 1;
                },
            }
        }

        info!(
            sent = outcome.sent,
            failed = outcome.failed,
            "Notification sweep finished"
        );
        Ok(outcome)
    }
}

fn render_subject(city: &City) -> String {
    format!("Weather update for {}", city.key)
}

fn render_body(city: &City, reading: &WeatherReading) -> String {
    format!(
        "Current weather in {city}:\n\
         \n\
         Conditions: {description}\n\
         Temperature: {temperature:.1} C (feels like {feels_like:.1} C)\n\
         Humidity: {humidity:.0}%\n\
         Pressure: {pressure:.0} hPa\n\
         Visibility: {visibility:.0} m\n\
         Wind speed: {wind_speed:.1} m/s\n\
         Cloud cover: {clouds:.0}%\n\
         Rain (1h): {rain:.1} mm\n\
         Snow (1h): {snow:.1} mm\n",
        city = city.key,
        description = reading.description,
        temperature = reading.temperature,
        feels_like = reading.feels_like,
        humidity = reading.humidity,
        pressure = reading.pressure,
        visibility = reading.visibility,
        wind_speed = reading.wind_speed,
        clouds = reading.clouds,
        rain = reading.rain,
        snow = reading.snow,
    )
}
