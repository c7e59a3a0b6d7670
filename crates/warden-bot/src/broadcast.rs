use std::time::Instant;

use teloxide::types::ChatId;
use tracing::{error, info, warn};
use warden_types::{BroadcastTally, Delivery};

use crate::api::{ChatApi, MessageRef, notify};
use crate::error::PlatformError;
use crate::state::{Warden, or_default};
use crate::texts;

/// Edit the status message after this many processed recipients.
pub const PROGRESS_EVERY: usize = 20;

impl<A: ChatApi> Warden<A> {
    /// Copy `source` to every known user, one at a time, reporting progress
    /// and a final summary into `invoker_chat`.
    pub async fn broadcast(&self, invoker_chat: ChatId, source: MessageRef) -> BroadcastTally {
        let recipients = or_default(self.db.user_ids(), "user_ids");
        if recipients.is_empty() {
            notify(&self.api, invoker_chat, texts::BROADCAST_NO_USERS, None).await;
            return BroadcastTally::default();
        }

        let status = match self
            .api
            .send_message(invoker_chat, texts::BROADCAST_STARTED, None)
            .await
        {
            Ok(status) => Some(status),
            Err(e) => {
                warn!(error = %e, "Could not post broadcast status message");
                None
            }
        };

        let started = Instant::now();
        let mut tally = BroadcastTally::new(recipients.len());
        info!(recipients = tally.total, "Broadcast started");

        for user_id in recipients {
            let outcome = deliver(&self.api, ChatId(user_id as i64), source).await;
            tally.record(outcome);

            if tally.processed() % PROGRESS_EVERY == 0 {
                if let Some(status) = status {
                    // Progress edits are cosmetic; a failure here changes nothing.
                    let _ = self
                        .api
                        .edit_message(status, &texts::broadcast_progress(&tally), None)
                        .await;
                }
            }

            tokio::time::sleep(self.settings.broadcast_delay).await;
        }

        if let Some(status) = status {
            let _ = self.api.delete_message(status).await;
        }

        let elapsed = started.elapsed();
        notify(
            &self.api,
            invoker_chat,
            &texts::broadcast_summary(&tally, elapsed),
            None,
        )
        .await;

        info!(
            delivered = tally.delivered,
            failed = tally.failed,
            blocked = tally.blocked,
            gone = tally.gone,
            total = tally.total,
            ?elapsed,
            "Broadcast completed"
        );
        tally
    }
}

/// Copy one message, riding out a single flood-control wait.
///
/// The retry's own failure is always [`Delivery::Failed`], whatever its kind.
pub async fn deliver<A: ChatApi + ?Sized>(api: &A, to: ChatId, source: MessageRef) -> Delivery {
    match api.copy_message(to, source).await {
        Ok(()) => Delivery::Delivered,
        Err(PlatformError::RateLimited(wait)) => {
            warn!(?wait, chat_id = to.0, "Flood control during broadcast, retrying once");
            tokio::time::sleep(wait).await;
            match api.copy_message(to, source).await {
                Ok(()) => Delivery::Delivered,
                Err(e) => {
                    warn!(chat_id = to.0, error = %e, "Broadcast retry failed");
                    Delivery::Failed
                }
            }
        }
        Err(PlatformError::Blocked) => Delivery::Blocked,
        Err(PlatformError::RecipientGone) => Delivery::Gone,
        Err(e) => {
            error!(chat_id = to.0, error = %e, "Broadcast error");
            Delivery::Failed
        }
    }
}
