use super::discord::Notifies;
use super::state::StoresState;
use super::tiktok::FetchesPosts;
use log::*;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::MissedTickBehavior;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TickOutcome {
    /// The previous tick was still running.
    Busy,
    NoPost,
    FetchFailed,
    Unchanged,
    Notified(String),
    /// Nothing persisted, the same post is tried again next tick.
    NotifyFailed,
    /// Notified but not persisted, the post will be sent again next tick.
    PersistFailed,
}

pub struct Poller {
    fetcher: Box<dyn FetchesPosts + Send + Sync>,
    notifier: Box<dyn Notifies + Send + Sync>,
    state: Box<dyn StoresState + Send + Sync>,
    in_flight: Mutex<()>,
}

impl Poller {
    pub fn new(
        fetcher: Box<dyn FetchesPosts + Send + Sync>,
        notifier: Box<dyn Notifies + Send + Sync>,
        state: Box<dyn StoresState + Send + Sync>,
    ) -> Self {
        Self {
            fetcher,
            notifier,
            state,
            in_flight: Mutex::new(()),
        }
    }

    pub async fn tick(&self) -> TickOutcome {
        let Ok(_guard) = self.in_flight.try_lock() else {
            warn!("Previous check is still running, skipping.");
            return TickOutcome::Busy;
        };
        let latest = match self.fetcher.fetch_latest().await {
            Ok(Some(post)) => post,
            Ok(None) => {
                debug!("No video found on profile page.");
                return TickOutcome::NoPost;
            }
            Err(err) => {
                error!("Error checking TikTok: {err}");
                return TickOutcome::FetchFailed;
            }
        };
        let last_video_id = self.state.read().await;
        if last_video_id.as_deref() == Some(latest.id.as_str()) {
            debug!("Latest video {} already notified.", latest.id);
            return TickOutcome::Unchanged;
        }
        info!("New video detected: {}", latest.id);
        if let Err(err) = self.notifier.notify(&latest).await {
            error!("Error notifying video {}: {err}", latest.id);
            return TickOutcome::NotifyFailed;
        }
        if let Err(err) = self.state.write(&latest.id).await {
            error!("Error saving last video id {}: {err}", latest.id);
            return TickOutcome::PersistFailed;
        }
        TickOutcome::Notified(latest.id)
    }
}

/// Ticks right away, then once per `period`. Every tick gets its own task so a
/// slow one shows up as `Busy` ticks instead of delaying the timer.
pub async fn run(poller: Arc<Poller>, period: Duration) {
    let mut interval = tokio::time::interval(period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
    loop {
        interval.tick().await;
        let poller = poller.clone();
        tokio::spawn(async move {
            let outcome = poller.tick().await;
            debug!("Tick finished: {:?}", outcome);
        });
    }
}
