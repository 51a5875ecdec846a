//! # Printer Transport Layer
//!
//! The device is a single local byte sink. A transport answers two
//! questions: can the device be written right now, and please write these
//! bytes. It never queues, retries or discovers devices.
//!
//! ## Available Transports
//!
//! - [`device`]: Local character device such as `/dev/usb/lp0`
//! - [`MemoryTransport`]: In-memory sink for tests and dry runs

pub mod device;

pub use device::DeviceTransport;

use crate::error::PapelitoError;

/// A blocking byte sink for one printer.
pub trait Transport {
    /// Human-readable device name used in error messages.
    fn name(&self) -> String;

    /// Whether the device can be written right now.
    fn is_available(&self) -> bool;

    /// Write all bytes to the device, blocking until done.
    ///
    /// Failures are reported as [`PapelitoError::DeviceUnavailable`].
    fn write_all(&mut self, data: &[u8]) -> Result<(), PapelitoError>;
}

/// # In-Memory Transport
///
/// Records every successful write. Availability can be toggled to simulate
/// an unplugged printer.
///
/// ```
/// use papelito::transport::{MemoryTransport, Transport};
///
/// let mut sink = MemoryTransport::new();
/// sink.write_all(b"hello")?;
/// assert_eq!(sink.bytes(), b"hello");
/// # Ok::<(), papelito::PapelitoError>(())
/// ```
#[derive(Debug, Clone)]
pub struct MemoryTransport {
    available: bool,
    writes: Vec<Vec<u8>>,
}

impl MemoryTransport {
    /// An available, empty sink.
    pub fn new() -> Self {
        Self {
            available: true,
            writes: Vec::new(),
        }
    }

    /// A sink that refuses every write.
    pub fn unavailable() -> Self {
        Self {
            available: false,
            writes: Vec::new(),
        }
    }

    pub fn set_available(&mut self, available: bool) {
        self.available = available;
    }

    /// Each write call, in order.
    pub fn writes(&self) -> &[Vec<u8>] {
        &self.writes
    }

    /// All written bytes concatenated.
    pub fn bytes(&self) -> Vec<u8> {
        self.writes.concat()
    }
}

impl Default for MemoryTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl Transport for MemoryTransport {
    fn name(&self) -> String {
        "memory".to_string()
    }

    fn is_available(&self) -> bool {
        self.available
    }

    fn write_all(&mut self, data: &[u8]) -> Result<(), PapelitoError> {
        if !self.available {
            return Err(PapelitoError::DeviceUnavailable {
                device: self.name(),
                reason: "device unplugged".to_string(),
            });
        }
        self.writes.push(data.to_vec());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_records_writes_in_order() {
        let mut sink = MemoryTransport::new();
        sink.write_all(b"ab").unwrap();
        sink.write_all(b"cd").unwrap();

        assert_eq!(sink.writes().len(), 2);
        assert_eq!(sink.bytes(), b"abcd");
    }

    #[test]
    fn test_memory_unavailable_rejects_write() {
        let mut sink = MemoryTransport::unavailable();
        assert!(!sink.is_available());

        let err = sink.write_all(b"x").unwrap_err();
        assert!(matches!(err, PapelitoError::DeviceUnavailable { .. }));
        assert!(sink.writes().is_empty());
    }
}
