//! Typed publish/subscribe bus for cross-component notifications.
//!
//! Components receive a [`NotificationBus`] handle at construction and
//! register a named subscription for the kinds they care about. Delivery goes
//! through an unbounded channel per subscription, so publishing never blocks
//! and each component drains its own queue on the UI loop.

use crate::backend::Group;
use log::debug;
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;

/// Notifications exchanged between otherwise independent components.
#[derive(Debug, Clone, PartialEq)]
pub enum Notification {
    /// A group was created; open selectors append it and add their selection to it.
    GroupCreated { group: Group },
    /// Clear every checkbox of the inline roster selector.
    ResetCuratedCohortSelector,
    /// Clear every checkbox of the list-view selector.
    ResetStudentGroupsSelector,
    /// A development login attempt was rejected.
    DevAuthFailure,
    /// A student was removed from the advisor's watchlist.
    WatchlistRemoval { sid: String },
}

/// Payload-free discriminant of [`Notification`], used to filter subscriptions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NotificationKind {
    GroupCreated,
    ResetCuratedCohortSelector,
    ResetStudentGroupsSelector,
    DevAuthFailure,
    WatchlistRemoval,
}

impl Notification {
    pub fn kind(&self) -> NotificationKind {
        match self {
            Notification::GroupCreated { .. } => NotificationKind::GroupCreated,
            Notification::ResetCuratedCohortSelector => NotificationKind::ResetCuratedCohortSelector,
            Notification::ResetStudentGroupsSelector => NotificationKind::ResetStudentGroupsSelector,
            Notification::DevAuthFailure => NotificationKind::DevAuthFailure,
            Notification::WatchlistRemoval { .. } => NotificationKind::WatchlistRemoval,
        }
    }
}

/// Description of one registered subscription.
#[derive(Debug, Clone, PartialEq)]
pub struct SubscriptionInfo {
    pub subscriber: String,
    pub kinds: Vec<NotificationKind>,
}

struct Subscription {
    info: SubscriptionInfo,
    sender: mpsc::UnboundedSender<Notification>,
}

/// Cloneable handle to the shared subscription table.
#[derive(Clone, Default)]
pub struct NotificationBus {
    subscriptions: Arc<Mutex<Vec<Subscription>>>,
}

impl NotificationBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `subscriber` for `kinds` and return its delivery queue.
    pub fn subscribe(
        &self,
        subscriber: impl Into<String>,
        kinds: &[NotificationKind],
    ) -> mpsc::UnboundedReceiver<Notification> {
        let (tx, rx) = mpsc::unbounded_channel();
        let info = SubscriptionInfo {
            subscriber: subscriber.into(),
            kinds: kinds.to_vec(),
        };
        debug!("NotificationBus: '{}' subscribed to {:?}", info.subscriber, info.kinds);
        if let Ok(mut subscriptions) = self.subscriptions.lock() {
            subscriptions.push(Subscription { info, sender: tx });
        }
        rx
    }

    /// Deliver `notification` to every matching live subscription.
    ///
    /// Returns the number of subscriptions it reached. Subscriptions whose
    /// receiver has been dropped are removed.
    pub fn publish(&self, notification: Notification) -> usize {
        let kind = notification.kind();
        let Ok(mut subscriptions) = self.subscriptions.lock() else {
            return 0;
        };

        subscriptions.retain(|s| !s.sender.is_closed());

        let mut delivered = 0;
        for subscription in subscriptions.iter().filter(|s| s.info.kinds.contains(&kind)) {
            if subscription.sender.send(notification.clone()).is_ok() {
                delivered += 1;
            }
        }
        debug!("NotificationBus: {:?} delivered to {} subscribers", kind, delivered);
        delivered
    }

    /// Enumerate live subscriptions in registration order.
    pub fn subscriptions(&self) -> Vec<SubscriptionInfo> {
        self.subscriptions
            .lock()
            .map(|subscriptions| {
                subscriptions
                    .iter()
                    .filter(|s| !s.sender.is_closed())
                    .map(|s| s.info.clone())
                    .collect()
            })
            .unwrap_or_default()
    }
}
