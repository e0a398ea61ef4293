//! Command bridge: the request/response path to the external dispatcher.
//!
//! The core only ever sees the [`CommandBridge`](crate::app::ports::CommandBridge)
//! port.  This module holds the typed payloads that cross it and an
//! in-process transport used by the simulator, the demo and the tests.

pub mod channel;
pub mod command;

pub use channel::{BridgeEndpoint, BridgeReply, BridgeRequest, ChannelBridge, channel_bridge};
pub use command::{BridgeCommand, BridgeResponse, Colour, ResponseStatus};
