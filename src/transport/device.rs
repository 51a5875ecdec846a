//! # Local Device Transport
//!
//! Writes to a printer exposed as a character device by the kernel's USB
//! line printer driver (`usblp`), usually `/dev/usb/lp0`.
//!
//! ## Device Setup (Linux)
//!
//! ```bash
//! # The node appears when the printer is plugged in
//! $ ls -l /dev/usb/lp0
//! crw-rw---- 1 root lp 180, 0 ... /dev/usb/lp0
//!
//! # Let the current user write to it
//! $ sudo usermod -aG lp $USER
//! ```
//!
//! Each write opens the node, sends the whole job and closes it again, so a
//! printer that is unplugged between jobs is picked up again on the next
//! flush without reconnect logic.

use std::ffi::CString;
use std::fs::OpenOptions;
use std::io::Write;
use std::os::unix::ffi::OsStrExt;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use super::Transport;
use crate::error::PapelitoError;
use crate::printer::PrinterConfig;

/// Default USB line printer device path
pub const DEFAULT_DEVICE: &str = PrinterConfig::USB_80MM.device_path;

/// # Character Device Transport
///
/// ```no_run
/// use papelito::transport::{DeviceTransport, Transport};
/// use papelito::protocol::commands;
///
/// let mut transport = DeviceTransport::new("/dev/usb/lp0");
/// if transport.is_available() {
///     transport.write_all(&commands::startup())?;
/// }
/// # Ok::<(), papelito::PapelitoError>(())
/// ```
#[derive(Debug, Clone)]
pub struct DeviceTransport {
    path: PathBuf,
}

impl DeviceTransport {
    pub fn new<P: AsRef<Path>>(device: P) -> Self {
        Self {
            path: device.as_ref().to_path_buf(),
        }
    }

    /// Transport for [`DEFAULT_DEVICE`]
    pub fn open_default() -> Self {
        Self::new(DEFAULT_DEVICE)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn unavailable(&self, reason: impl Into<String>) -> PapelitoError {
        PapelitoError::DeviceUnavailable {
            device: self.name(),
            reason: reason.into(),
        }
    }
}

impl Transport for DeviceTransport {
    fn name(&self) -> String {
        self.path.display().to_string()
    }

    /// The path exists and the current process may write to it.
    fn is_available(&self) -> bool {
        self.path.exists() && is_writable(&self.path)
    }

    fn write_all(&mut self, data: &[u8]) -> Result<(), PapelitoError> {
        let mut file = OpenOptions::new()
            .write(true)
            .truncate(true)
            .open(&self.path)
            .map_err(|e| self.unavailable(format!("open failed: {}", e)))?;

        debug!(device = %self.path.display(), bytes = data.len(), "writing job");

        file.write_all(data)
            .map_err(|e| self.unavailable(format!("write failed: {}", e)))?;
        file.flush()
            .map_err(|e| self.unavailable(format!("flush failed: {}", e)))?;

        info!(device = %self.path.display(), bytes = data.len(), "job written");
        Ok(())
    }
}

/// `access(2)` with `W_OK`: checks permissions for the real user without
/// opening the device.
fn is_writable(path: &Path) -> bool {
    let Ok(c_path) = CString::new(path.as_os_str().as_bytes()) else {
        return false;
    };
    // SAFETY: c_path is a valid NUL-terminated string for the call duration.
    unsafe { libc::access(c_path.as_ptr(), libc::W_OK) == 0 }
}
