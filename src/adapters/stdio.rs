//! Console transport over the process's stdin/stdout.
//!
//! Reading stdin blocks, so a dedicated thread does it and forwards each
//! line in chunks through [`INPUT_CHANNEL`]. The serve loop only ever calls
//! the non-blocking [`Transport::read`], which drains that channel.
//!
//! On ESP-IDF stdin/stdout are the USB CDC console; on the host they are
//! the terminal the simulator was started from.

use std::io::{self, BufRead, Write};
use std::thread;
use std::time::Duration;

use futures_lite::future;
use log::{info, warn};

use crate::protocol::channels::{InputChannel, InputChunk, INPUT_CHANNEL, INPUT_CHUNK};
use crate::protocol::transport::Transport;

const READER_STACK: usize = 4 * 1024;
const RETRY_MS: u64 = 10;

pub struct StdioTransport {
    input: &'static InputChannel,
    pending: InputChunk,
    offset: usize,
    out: io::Stdout,
}

impl StdioTransport {
    /// Start the stdin reader thread and attach to its channel.
    pub fn spawn() -> io::Result<Self> {
        thread::Builder::new()
            .name("stdin-reader".into())
            .stack_size(READER_STACK)
            .spawn(|| read_stdin(&INPUT_CHANNEL))?;
        info!("Stdio: reader thread started");
        Ok(Self::attach(&INPUT_CHANNEL))
    }

    /// Read from `input` without starting a reader.
    pub fn attach(input: &'static InputChannel) -> Self {
        Self {
            input,
            pending: InputChunk::new(),
            offset: 0,
            out: io::stdout(),
        }
    }
}

impl Transport for StdioTransport {
    type Error = io::Error;

    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if self.offset >= self.pending.len() {
            match self.input.try_receive() {
                Ok(chunk) => {
                    self.pending = chunk;
                    self.offset = 0;
                }
                Err(_) => return Ok(0),
            }
        }
        let rest = &self.pending[self.offset..];
        let n = rest.len().min(buf.len());
        buf[..n].copy_from_slice(&rest[..n]);
        self.offset += n;
        Ok(n)
    }

    fn write(&mut self, data: &[u8]) -> io::Result<usize> {
        self.out.write(data)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.out.flush()
    }
}

/// Blocking reader loop: one stdin line at a time, forwarded in chunks.
fn read_stdin(channel: &'static InputChannel) {
    let stdin = io::stdin();
    let mut lock = stdin.lock();
    let mut line = Vec::new();
    loop {
        line.clear();
        match lock.read_until(b'\n', &mut line) {
            Ok(0) => {
                info!("Stdio: stdin closed");
                return;
            }
            Ok(_) => forward(channel, &line),
            Err(e) if matches!(e.kind(), io::ErrorKind::WouldBlock | io::ErrorKind::Interrupted) => {
                forward(channel, &line);
                thread::sleep(Duration::from_millis(RETRY_MS));
            }
            Err(e) => {
                warn!("Stdio: read failed ({}), reader stopped", e);
                return;
            }
        }
    }
}

fn forward(channel: &InputChannel, bytes: &[u8]) {
    for part in bytes.chunks(INPUT_CHUNK) {
        if let Ok(chunk) = InputChunk::from_slice(part) {
            future::block_on(channel.send(chunk));
        }
    }
}
