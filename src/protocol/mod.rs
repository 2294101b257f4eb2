//! Console wire protocol: framing, tokenizing, replies and the byte channel.
//!
//! ```text
//!  Transport ──▶ FrameParser ──▶ tokenizer ──▶ Scheduler ──▶ Reply ──▶ Transport
//! ```

pub mod channels;
pub mod codec;
pub mod tokenizer;
pub mod transport;

pub use codec::{FrameParser, Reply};
pub use tokenizer::CommandLine;
pub use transport::Transport;
