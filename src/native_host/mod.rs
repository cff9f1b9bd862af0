//! Chrome native messaging bridge between the extension and the tracker.

mod browser;
pub mod protocol;

pub use browser::NativeBrowser;
pub use protocol::{IncomingMessage, OutgoingMessage};

use crate::constants::MAX_MESSAGE_SIZE;
use crate::error::AppError;
use crate::report::ActivityReport;
use crate::tracker::TrackerHandle;
use log::{debug, error, warn};
use std::io;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

/// Read one length-prefixed JSON frame.
pub async fn read_message<R: AsyncRead + Unpin>(reader: &mut R) -> io::Result<IncomingMessage> {
    // Chrome Native Messaging protocol specifies little-endian byte order
    let mut len_bytes = [0u8; 4];
    reader.read_exact(&mut len_bytes).await?;
    let len = usize::try_from(u32::from_le_bytes(len_bytes))
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;

    if len > MAX_MESSAGE_SIZE {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!("Message too large: {len} bytes (max: {MAX_MESSAGE_SIZE} bytes)"),
        ));
    }

    let mut buffer = vec![0u8; len];
    reader.read_exact(&mut buffer).await?;

    serde_json::from_slice(&buffer).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
}

/// Write one length-prefixed JSON frame.
pub async fn write_message<W: AsyncWrite + Unpin>(
    writer: &mut W,
    message: &OutgoingMessage,
) -> io::Result<()> {
    let json = serde_json::to_vec(message)?;
    let len =
        u32::try_from(json.len()).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;

    writer.write_all(&len.to_le_bytes()).await?;
    writer.write_all(&json).await?;
    writer.flush().await?;

    Ok(())
}

pub struct NativeHost<R, W> {
    reader: R,
    writer: W,
    browser: NativeBrowser,
    tracker: TrackerHandle,
    pending: Option<IncomingMessage>,
}

impl<R: AsyncRead + Unpin, W: AsyncWrite + Unpin> NativeHost<R, W> {
    pub fn new(reader: R, writer: W, browser: NativeBrowser, tracker: TrackerHandle) -> Self {
        Self {
            reader,
            writer,
            browser,
            tracker,
            pending: None,
        }
    }

    /// Read the extension's opening message so the tracker starts from real state.
    ///
    /// Returns `false` if the extension disconnected before saying anything.
    pub async fn handshake(&mut self) -> Result<bool, AppError> {
        match read_message(&mut self.reader).await {
            Ok(message @ IncomingMessage::Hello { .. }) => {
                self.browser.apply(&message);
                Ok(true)
            }
            Ok(message) => {
                warn!("Expected hello as first message, got {message:?}");
                self.pending = Some(message);
                Ok(true)
            }
            Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    /// Serve messages until the extension disconnects, then stop the tracker.
    pub async fn run(mut self) -> Result<(), AppError> {
        let result = self.serve().await;
        // Ignore a tracker that already stopped on its own
        let _ = self.tracker.shutdown().await;
        result
    }

    async fn serve(&mut self) -> Result<(), AppError> {
        if let Some(message) = self.pending.take() {
            self.handle_message(message).await?;
        }

        loop {
            let message = match read_message(&mut self.reader).await {
                Ok(message) => message,
                // EOF is expected when Chrome closes the connection
                Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => return Ok(()),
                Err(e) => return Err(e.into()),
            };
            self.handle_message(message).await?;
        }
    }

    async fn handle_message(&mut self, message: IncomingMessage) -> Result<(), AppError> {
        debug!("Received {message:?}");
        match message {
            IncomingMessage::GetActivity => {
                let response = match self.tracker.load_activity().await {
                    Ok(activity) => OutgoingMessage::Activity {
                        report: ActivityReport::from_activity(&activity),
                        website_activity: activity,
                    },
                    Err(e) => {
                        error!("Failed to load website activity: {e}");
                        OutgoingMessage::Error { message: e.to_string() }
                    }
                };
                write_message(&mut self.writer, &response).await?;
            }
            IncomingMessage::ResetActivity => {
                let response = match self.tracker.reset_ledger().await {
                    Ok(()) => OutgoingMessage::ResetDone,
                    Err(e) => OutgoingMessage::Error { message: e.to_string() },
                };
                write_message(&mut self.writer, &response).await?;
            }
            IncomingMessage::Hello { .. }
            | IncomingMessage::TabActivated { .. }
            | IncomingMessage::TabUpdated { .. }
            | IncomingMessage::TabRemoved { .. }
            | IncomingMessage::WindowFocusChanged { .. }
            | IncomingMessage::IdleStateChanged { .. }
            | IncomingMessage::MediaPlaybackState { .. } => {
                if let Some(event) = self.browser.apply(&message) {
                    self.tracker.dispatch(event).await?;
                }
            }
        }
        Ok(())
    }
}
