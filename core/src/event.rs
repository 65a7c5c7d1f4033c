use futures_channel::mpsc::{UnboundedReceiver, UnboundedSender, unbounded};
use serde::{Deserialize, Serialize};

use crate::*;

/// Notifications emitted by the engine for the presentation layer.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    Blocked(BlockReason),
    TrapTriggered { tile: TileId, damage: Health },
    Eliminated,
    TreasureFound { tile: TileId, tier: TreasureTier, value: Points },
    EnergyRegenerated { energy: Energy },
    Reset,
}

/// Subscription handle returned by [`ExcavationEngine::subscribe`].
pub type EventReceiver = UnboundedReceiver<GameEvent>;

/// Fan-out of events to every live subscriber.
#[derive(Debug, Default)]
pub(crate) struct EventBus {
    subscribers: Vec<UnboundedSender<GameEvent>>,
}

impl EventBus {
    pub(crate) fn subscribe(&mut self) -> EventReceiver {
        let (sender, receiver) = unbounded();
        self.subscribers.push(sender);
        receiver
    }

    pub(crate) fn emit(&mut self, event: GameEvent) {
        log::trace!("Emit {:?} to {} subscribers", event, self.subscribers.len());
        // a failed send means the receiver is gone
        self.subscribers
            .retain(|subscriber| subscriber.unbounded_send(event).is_ok());
    }

    pub(crate) fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }
}
