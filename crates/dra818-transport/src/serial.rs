//! Serial port transport for the module's UART.
//!
//! The DRA818 talks 9600 baud, 8 data bits, no parity, one stop bit, with
//! no flow control. [`SerialTransport::open`] applies exactly that. The
//! port is opened non-blocking without becoming the controlling terminal,
//! modem control lines are ignored, the receiver is enabled, and the line
//! runs raw (no canonical mode, echo, or output post-processing); this is
//! what `tokio-serial` does on open. Pending input is discarded before the
//! first exchange so stale bytes cannot be mistaken for a response.

use async_trait::async_trait;
use dra818_core::error::{Error, Result};
use dra818_core::transport::Transport;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio_serial::{
    ClearBuffer, DataBits, FlowControl, Parity, SerialPort, SerialPortBuilder,
    SerialPortBuilderExt, SerialStream, StopBits,
};

/// Baud rate the module ships with.
pub const MODULE_BAUD_RATE: u32 = 9600;

/// Port builder with the module's fixed line settings: 9600 baud, 8 data
/// bits, no parity, one stop bit, no flow control.
fn module_port(path: &str) -> SerialPortBuilder {
    tokio_serial::new(path, MODULE_BAUD_RATE)
        .data_bits(DataBits::Eight)
        .stop_bits(StopBits::One)
        .parity(Parity::None)
        .flow_control(FlowControl::None)
}

/// UART transport to the module.
pub struct SerialTransport {
    port: Option<SerialStream>,
    /// Device path for logging.
    port_name: String,
}

impl SerialTransport {
    /// Open `path` at 9600-8N1.
    ///
    /// Fails with [`Error::Open`] if the device cannot be opened or
    /// configured.
    pub async fn open(path: &str) -> Result<Self> {
        tracing::debug!(port = %path, baud_rate = MODULE_BAUD_RATE, "Opening serial port");

        let serial_stream = module_port(path)
            .open_native_async()
            .map_err(|e| {
                tracing::error!(port = %path, error = %e, "Failed to open serial port");
                Error::Open(format!(
                    "{path}: {e} (ensure it is not in use by another application)"
                ))
            })?;

        serial_stream.clear(ClearBuffer::Input).map_err(|e| {
            tracing::error!(port = %path, error = %e, "Failed to flush serial input");
            Error::Open(format!("{path}: failed to flush input: {e}"))
        })?;

        tracing::info!(port = %path, baud_rate = MODULE_BAUD_RATE, "Serial port opened");

        Ok(Self {
            port: Some(serial_stream),
            port_name: path.to_string(),
        })
    }

    /// Device path this transport was opened on.
    pub fn port_name(&self) -> &str {
        &self.port_name
    }
}

#[async_trait]
impl Transport for SerialTransport {
    async fn send(&mut self, data: &[u8]) -> Result<()> {
        let port = self.port.as_mut().ok_or(Error::NotConnected)?;

        tracing::trace!(port = %self.port_name, bytes = data.len(), "Sending data");

        // write_all loops over short writes.
        port.write_all(data).await.map_err(|e| {
            tracing::error!(port = %self.port_name, error = %e, "UART TX error");
            Error::Write(format!("{}: {e}", self.port_name))
        })?;
        port.flush().await.map_err(|e| {
            tracing::error!(port = %self.port_name, error = %e, "Failed to flush serial port");
            Error::Write(format!("{}: flush failed: {e}", self.port_name))
        })?;

        Ok(())
    }

    async fn receive(&mut self, buf: &mut [u8], timeout: Duration) -> Result<usize> {
        let port = self.port.as_mut().ok_or(Error::NotConnected)?;

        match tokio::time::timeout(timeout, port.read(buf)).await {
            Ok(Ok(n)) => {
                tracing::trace!(
                    port = %self.port_name,
                    bytes = n,
                    data = ?String::from_utf8_lossy(&buf[..n]),
                    "Received data"
                );
                Ok(n)
            }
            Ok(Err(e)) => {
                if e.kind() != std::io::ErrorKind::Interrupted {
                    tracing::error!(port = %self.port_name, error = %e, "Failed to receive data");
                }
                Err(Error::Io(e))
            }
            Err(_) => {
                tracing::trace!(
                    port = %self.port_name,
                    timeout_ms = timeout.as_millis(),
                    "Timeout waiting for data"
                );
                Err(Error::Timeout)
            }
        }
    }

    async fn close(&mut self) -> Result<()> {
        if let Some(mut port) = self.port.take() {
            if let Err(e) = port.flush().await {
                tracing::warn!(
                    port = %self.port_name,
                    error = %e,
                    "Failed to flush before closing (continuing anyway)"
                );
            }
            tracing::info!(port = %self.port_name, "Serial port closed");
        }
        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.port.is_some()
    }
}
