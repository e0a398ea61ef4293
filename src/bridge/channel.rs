//! In-process command bridge over `embassy-sync` channels.
//!
//! ```text
//! ┌───────────────┐  BridgeRequest  ┌────────────────┐
//! │ ChannelBridge │───────────────▶│ BridgeEndpoint │
//! │ (controller)  │◀───────────────│ (dispatcher)   │
//! └───────────────┘  BridgeReply    └────────────────┘
//! ```
//!
//! Each request carries a sequence id that the reply must echo.  Replies
//! to older ids (a caller gave up before its answer arrived) are skipped.
//! A reply to a newer id surfaces as [`BridgeError::Desync`] and flushes
//! the reply queue.  Clones of one [`ChannelBridge`] share a lock so their
//! round-trips never interleave.

use core::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::Arc;

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use embassy_sync::mutex::Mutex;
use log::{debug, warn};

use super::command::{BridgeCommand, BridgeResponse};
use crate::app::ports::CommandBridge;
use crate::error::BridgeError;

/// Requests in flight before `send` waits.
const REQUEST_DEPTH: usize = 4;
const REPLY_DEPTH: usize = 4;

#[derive(Debug, Clone, PartialEq)]
pub struct BridgeRequest {
    pub id: u32,
    pub command: BridgeCommand,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BridgeReply {
    pub id: u32,
    pub outcome: Result<BridgeResponse, BridgeError>,
}

struct Shared {
    requests: Channel<CriticalSectionRawMutex, BridgeRequest, REQUEST_DEPTH>,
    replies: Channel<CriticalSectionRawMutex, BridgeReply, REPLY_DEPTH>,
    round_trip: Mutex<CriticalSectionRawMutex, ()>,
    next_id: AtomicU32,
    closed: AtomicBool,
}

/// Create a connected client/endpoint pair.
pub fn channel_bridge() -> (ChannelBridge, BridgeEndpoint) {
    let shared = Arc::new(Shared {
        requests: Channel::new(),
        replies: Channel::new(),
        round_trip: Mutex::new(()),
        next_id: AtomicU32::new(1),
        closed: AtomicBool::new(false),
    });
    (
        ChannelBridge {
            shared: shared.clone(),
        },
        BridgeEndpoint { shared },
    )
}

// ───────────────────────────────────────────────────────────────
// Client side
// ───────────────────────────────────────────────────────────────

/// [`CommandBridge`] that talks to a [`BridgeEndpoint`] in the same process.
#[derive(Clone)]
pub struct ChannelBridge {
    shared: Arc<Shared>,
}

impl ChannelBridge {
    pub fn is_connected(&self) -> bool {
        !self.shared.closed.load(Ordering::Acquire)
    }
}

impl CommandBridge for ChannelBridge {
    async fn send(&mut self, command: BridgeCommand) -> Result<BridgeResponse, BridgeError> {
        if !self.is_connected() {
            return Err(BridgeError::Disconnected);
        }
        let _guard = self.shared.round_trip.lock().await;
        let id = self.shared.next_id.fetch_add(1, Ordering::Relaxed);
        debug!("bridge -> #{} {}", id, command.name());

        self.shared.requests.send(BridgeRequest { id, command }).await;
        // The endpoint may have gone between the check above and the send,
        // leaving nobody to answer.
        if !self.is_connected() {
            return Err(BridgeError::Disconnected);
        }
        loop {
            let reply = self.shared.replies.receive().await;
            if reply.id == id {
                return reply.outcome;
            }
            if reply.id < id {
                debug!("bridge: skipping stale reply #{}", reply.id);
                continue;
            }
            warn!("bridge desync: sent #{}, got reply #{}", id, reply.id);
            while self.shared.replies.try_receive().is_ok() {}
            return Err(BridgeError::Desync {
                expected: id,
                got: reply.id,
            });
        }
    }
}

// ───────────────────────────────────────────────────────────────
// Dispatcher side
// ───────────────────────────────────────────────────────────────

/// Receiving half of the bridge.  Dropping it disconnects every client,
/// fails any request still queued and wakes a client waiting on a request
/// the endpoint had already taken.
pub struct BridgeEndpoint {
    shared: Arc<Shared>,
}

impl BridgeEndpoint {
    /// Wait for the next request.
    pub async fn receive(&self) -> BridgeRequest {
        self.shared.requests.receive().await
    }

    /// Answer request `id`.
    pub async fn reply(&self, id: u32, response: BridgeResponse) {
        self.shared
            .replies
            .send(BridgeReply {
                id,
                outcome: Ok(response),
            })
            .await;
    }

    /// Receive one request, answer it with `handler`, return its id.
    pub async fn serve_one(&self, handler: impl FnOnce(BridgeCommand) -> BridgeResponse) -> u32 {
        let request = self.receive().await;
        let response = handler(request.command);
        self.reply(request.id, response).await;
        request.id
    }
}

impl Drop for BridgeEndpoint {
    fn drop(&mut self) {
        self.shared.closed.store(true, Ordering::Release);
        let last = self.shared.next_id.load(Ordering::Relaxed).wrapping_sub(1);
        let mut last_answered = last == 0;
        while let Ok(request) = self.shared.requests.try_receive() {
            last_answered |= request.id == last;
            self.hang_up(request.id);
        }
        if !last_answered {
            self.hang_up(last);
        }
    }
}

impl BridgeEndpoint {
    fn hang_up(&self, id: u32) {
        // Best effort: a full reply queue means the client is gone too.
        let _ = self.shared.replies.try_send(BridgeReply {
            id,
            outcome: Err(BridgeError::Disconnected),
        });
    }
}
