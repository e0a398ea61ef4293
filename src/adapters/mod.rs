//! Adapters: concrete implementations of the hexagonal port traits.
//!
//! | Adapter          | Implements     | Connects to                     |
//! |------------------|----------------|---------------------------------|
//! | `bridge_display` | DisplaySink    | Any CommandBridge               |
//! | `framebuffer`    | DisplaySink    | In-memory 64×64 matrix          |
//! | `log_sink`       | EventSink      | `log` facade                    |
//! | `simulator`      | (bridge peer)  | BridgeEndpoint → framebuffer    |
//! | `timer`          | Delay          | `async-io-mini` timers          |

pub mod bridge_display;
pub mod framebuffer;
pub mod log_sink;
pub mod simulator;
pub mod timer;

pub use bridge_display::BridgeDisplay;
pub use framebuffer::{Framebuffer, SharedFramebuffer, TextMark};
pub use log_sink::LogEventSink;
pub use simulator::MatrixSimulator;
pub use timer::TimerDelay;
