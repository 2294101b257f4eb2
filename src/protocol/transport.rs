//! Byte channel the controller reads commands from and writes replies to.
//!
//! On the device this is the USB CDC console (stdin/stdout); on the host it
//! is the terminal, and integration tests script it in memory. The
//! controller is generic over it, so none of the dispatch code knows which
//! one is attached.

/// Console byte channel. Reads never block.
pub trait Transport {
    type Error: core::fmt::Debug;

    /// Copy whatever input is pending into `buf`, up to its length.
    /// `Ok(0)` means nothing arrived since the last call.
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error>;

    /// Queue `data` for output; returns how much was accepted.
    fn write(&mut self, data: &[u8]) -> Result<usize, Self::Error>;

    /// Push queued output to the other end.
    fn flush(&mut self) -> Result<(), Self::Error>;

    /// Write all of `data`, retrying short writes.
    ///
    /// A write that accepts zero bytes ends the attempt so a stalled console
    /// never wedges the dispatch loop; the rest of the line is dropped.
    fn write_all(&mut self, mut data: &[u8]) -> Result<(), Self::Error> {
        while !data.is_empty() {
            let n = self.write(data)?;
            if n == 0 {
                break;
            }
            data = &data[n.min(data.len())..];
        }
        Ok(())
    }
}

/// Transport with no peer: reads are always empty, writes vanish.
///
/// Used when a [`Controller`](crate::controller::Controller) is driven
/// purely through [`Controller::submit`](crate::controller::Controller::submit).
#[derive(Debug, Default, Clone, Copy)]
pub struct NullTransport;

impl Transport for NullTransport {
    type Error = core::convert::Infallible;

    fn read(&mut self, _buf: &mut [u8]) -> Result<usize, Self::Error> {
        Ok(0)
    }

    fn write(&mut self, data: &[u8]) -> Result<usize, Self::Error> {
        Ok(data.len())
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}
