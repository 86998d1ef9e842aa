//! CLI channel: interactive terminal input.
//!
//! Lines are read on a background reader and forwarded over an mpsc
//! channel, so the session can wait for the next line while Ctrl+C is still
//! observed. End of input closes the channel; Ctrl+C sends
//! [`ChannelError::Interrupted`].

use std::io::BufRead;

use groundrag_core::error::ChannelError;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::sync::{mpsc, oneshot};
use tracing::debug;

/// One item delivered by the channel.
pub type InputLine = Result<String, ChannelError>;

/// Interactive CLI channel for terminal-based chat.
pub struct CliChannel {
    buffer: usize,
}

impl CliChannel {
    pub fn new() -> Self {
        Self { buffer: 32 }
    }

    pub fn name(&self) -> &str {
        "cli"
    }

    /// Start reading the terminal. Ctrl+C is reported as `Interrupted`.
    ///
    /// Stdin is read on a plain thread: a blocking read cannot be
    /// cancelled, and a detached thread does not hold up runtime shutdown.
    pub fn start(&self) -> mpsc::Receiver<InputLine> {
        let (tx, rx) = mpsc::channel(self.buffer);
        let (done_tx, done_rx) = oneshot::channel::<()>();

        let stdin_tx = tx.clone();
        std::thread::spawn(move || {
            let _done = done_tx;
            forward_blocking_lines(std::io::stdin().lock(), stdin_tx);
        });

        tokio::spawn(async move {
            tokio::select! {
                _ = done_rx => {}
                _ = tokio::signal::ctrl_c() => {
                    debug!("Interrupt received on CLI channel");
                    let _ = tx.send(Err(ChannelError::Interrupted)).await;
                }
            }
        });

        rx
    }

    /// Start reading from an async line source (piped input, tests).
    /// No interrupt handling.
    pub fn start_with<R>(&self, reader: R) -> mpsc::Receiver<InputLine>
    where
        R: AsyncBufRead + Unpin + Send + 'static,
    {
        let (tx, rx) = mpsc::channel(self.buffer);
        tokio::spawn(forward_lines(reader, tx));
        rx
    }
}

impl Default for CliChannel {
    fn default() -> Self {
        Self::new()
    }
}

async fn forward_lines<R>(reader: R, tx: mpsc::Sender<InputLine>)
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = reader.lines();
    loop {
        match lines.next_line().await {
            Ok(Some(line)) => {
                if tx.send(Ok(line)).await.is_err() {
                    break; // receiver dropped
                }
            }
            Ok(None) => break, // EOF (Ctrl+D)
            Err(e) => {
                let _ = tx.send(Err(ChannelError::ConnectionLost(e.to_string()))).await;
                break;
            }
        }
    }
}

/// Blocking counterpart of [`forward_lines`]. Must not run on a runtime thread.
fn forward_blocking_lines<R: BufRead>(reader: R, tx: mpsc::Sender<InputLine>) {
    for line in reader.lines() {
        let item = line.map_err(|e| ChannelError::ConnectionLost(e.to_string()));
        let failed = item.is_err();
        if tx.blocking_send(item).is_err() || failed {
            break;
        }
    }
}
