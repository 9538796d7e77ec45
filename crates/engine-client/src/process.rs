//! Child-process transport for a UCI engine (async stdio bridged to channels)

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::process::{Child, Command};
use tokio::sync::mpsc;

use crate::error::EngineError;

/// Handle to a spawned engine process.
pub struct EngineProcess {
    child: Child,
}

impl EngineProcess {
    /// Spawn the engine binary and bridge its stdio to channel endpoints.
    /// Returns the process handle, the command sender, and the output-line
    /// receiver.
    pub async fn spawn(
        path: &str,
    ) -> Result<
        (
            Self,
            mpsc::UnboundedSender<String>,
            mpsc::UnboundedReceiver<String>,
        ),
        EngineError,
    > {
        let mut child = Command::new(path)
            .stdin(std::process::Stdio::piped())
            .stdout(std::process::Stdio::piped())
            .stderr(std::process::Stdio::null())
            .spawn()
            .map_err(|e| EngineError::Process(format!("Failed to spawn engine: {e}")))?;

        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| EngineError::Process("Engine stdin unavailable".into()))?;
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| EngineError::Process("Engine stdout unavailable".into()))?;

        let (command_tx, mut command_rx) = mpsc::unbounded_channel::<String>();
        let (line_tx, line_rx) = mpsc::unbounded_channel();

        // Writer: drain command strings into the engine's stdin.
        tokio::spawn(async move {
            while let Some(command) = command_rx.recv().await {
                if stdin
                    .write_all(format!("{command}\n").as_bytes())
                    .await
                    .is_err()
                {
                    break;
                }
                if stdin.flush().await.is_err() {
                    break;
                }
            }
        });

        // Reader: forward trimmed stdout lines until EOF.
        tokio::spawn(async move {
            let mut reader = BufReader::new(stdout);
            let mut line = String::new();
            loop {
                line.clear();
                match reader.read_line(&mut line).await {
                    Ok(0) | Err(_) => break,
                    Ok(_) => {
                        if line_tx.send(line.trim().to_string()).is_err() {
                            break;
                        }
                    }
                }
            }
        });

        Ok((Self { child }, command_tx, line_rx))
    }

    /// Wait for the process to exit (after `quit` has been sent).
    pub async fn wait(&mut self) {
        let _ = self.child.wait().await;
    }
}

impl Drop for EngineProcess {
    fn drop(&mut self) {
        // Best-effort synchronous kill in drop
        let _ = self.child.start_kill();
    }
}
