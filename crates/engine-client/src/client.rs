//! Engine client: serializes analysis requests to a single UCI engine and
//! turns its streamed output into ranked evaluation snapshots.
//!
//! Exactly one position is in flight at a time. Further requests queue FIFO
//! behind it; their commands are only sent once the in-flight search reports
//! a terminal message. All mutable state lives in one actor task that drains
//! the caller mailbox and the engine's line stream one message at a time, so
//! no locks are needed.

use std::collections::VecDeque;

use shakmaty::Color;
use tokio::sync::{broadcast, mpsc, oneshot};
use tracing::{debug, warn};

use engine_core::board;
use engine_core::eval::{EvaluatedPosition, MoveAndEvaluation};
use engine_core::ranking::select_best_moves;
use engine_core::uci::{self, EngineMessage};

use crate::config::EngineConfig;
use crate::error::EngineError;
use crate::process::EngineProcess;

/// Progress channel capacity. Lagging subscribers lose the oldest snapshots
/// rather than exerting backpressure on the message loop.
const PROGRESS_CAPACITY: usize = 64;

enum ClientRequest {
    Evaluate {
        fen: String,
        color: Color,
        reply: oneshot::Sender<Result<EvaluatedPosition, EngineError>>,
    },
    Cancel,
    Quit,
}

struct PendingEvaluation {
    fen: String,
    color: Color,
    reply: oneshot::Sender<Result<EvaluatedPosition, EngineError>>,
}

/// Cheap cloneable handle to the engine actor.
#[derive(Clone)]
pub struct EngineClient {
    requests: mpsc::UnboundedSender<ClientRequest>,
    progress: broadcast::Sender<EvaluatedPosition>,
}

impl EngineClient {
    /// Spawn the configured engine binary and wire a client to it.
    pub async fn spawn(config: &EngineConfig) -> Result<(Self, EngineProcess), EngineError> {
        let (process, commands, lines) = EngineProcess::spawn(&config.engine_path).await?;
        Ok((
            Self::from_channels(commands, lines, config.clone()),
            process,
        ))
    }

    /// Wire a client onto an existing command/line channel pair and start
    /// its actor task. The caller owns the transport behind the channels;
    /// tests drive this with in-memory channels.
    pub fn from_channels(
        commands: mpsc::UnboundedSender<String>,
        lines: mpsc::UnboundedReceiver<String>,
        config: EngineConfig,
    ) -> Self {
        let (request_tx, request_rx) = mpsc::unbounded_channel();
        let (progress_tx, _) = broadcast::channel(PROGRESS_CAPACITY);

        let actor = EngineActor {
            commands,
            lines,
            requests: request_rx,
            queue: VecDeque::new(),
            buffer: Vec::new(),
            progress: progress_tx.clone(),
            config,
        };
        tokio::spawn(actor.run());

        Self {
            requests: request_tx,
            progress: progress_tx,
        }
    }

    /// Queue a position for analysis and wait for the final ranked snapshot.
    ///
    /// Requests are served strictly in arrival order; a request only reaches
    /// the engine once every earlier request has settled.
    pub async fn evaluate_position(&self, fen: &str) -> Result<EvaluatedPosition, EngineError> {
        let color =
            board::side_to_move(fen).map_err(|_| EngineError::InvalidFen(fen.to_string()))?;
        let (reply_tx, reply_rx) = oneshot::channel();
        self.requests
            .send(ClientRequest::Evaluate {
                fen: fen.to_string(),
                color,
                reply: reply_tx,
            })
            .map_err(|_| EngineError::Shutdown)?;
        reply_rx.await.map_err(|_| EngineError::Shutdown)?
    }

    /// Reject queued requests that have not started and ask the engine to
    /// wind down the in-flight search. The in-flight request still settles
    /// normally. No-op when idle.
    pub fn cancel(&self) {
        let _ = self.requests.send(ClientRequest::Cancel);
    }

    /// Subscribe to incremental snapshots of the in-flight analysis.
    ///
    /// Best-effort: snapshots for every intermediate depth are not
    /// guaranteed, only that depth never decreases within one request.
    pub fn subscribe(&self) -> broadcast::Receiver<EvaluatedPosition> {
        self.progress.subscribe()
    }

    /// Ask the engine process to exit.
    pub fn quit(&self) {
        let _ = self.requests.send(ClientRequest::Quit);
    }
}

struct EngineActor {
    commands: mpsc::UnboundedSender<String>,
    lines: mpsc::UnboundedReceiver<String>,
    requests: mpsc::UnboundedReceiver<ClientRequest>,
    /// Head is the in-flight request; the rest have not been sent yet.
    queue: VecDeque<PendingEvaluation>,
    /// Candidates streamed for the in-flight request.
    buffer: Vec<MoveAndEvaluation>,
    progress: broadcast::Sender<EvaluatedPosition>,
    config: EngineConfig,
}

impl EngineActor {
    async fn run(mut self) {
        self.send_command("uci");
        self.send_command(&format!(
            "setoption name Threads value {}",
            self.config.threads
        ));
        self.send_command(&format!(
            "setoption name Hash value {}",
            self.config.hash_mb
        ));
        self.send_command(&format!(
            "setoption name MultiPV value {}",
            self.config.multi_pv
        ));

        loop {
            tokio::select! {
                request = self.requests.recv() => match request {
                    Some(request) => self.handle_request(request),
                    // every handle dropped
                    None => break,
                },
                line = self.lines.recv() => match line {
                    Some(line) => self.handle_line(&line),
                    None => {
                        self.fail_pending("engine closed its output stream");
                        break;
                    }
                },
            }
        }
    }

    fn handle_request(&mut self, request: ClientRequest) {
        match request {
            ClientRequest::Evaluate { fen, color, reply } => {
                let was_idle = self.queue.is_empty();
                self.queue.push_back(PendingEvaluation { fen, color, reply });
                if was_idle {
                    let fen = self.queue[0].fen.clone();
                    self.send_analysis_commands(&fen);
                }
            }
            ClientRequest::Cancel => {
                if self.queue.is_empty() {
                    return;
                }
                for dropped in self.queue.drain(1..) {
                    let _ = dropped.reply.send(Err(EngineError::Cancelled));
                }
                self.send_command("stop");
            }
            ClientRequest::Quit => self.send_command("quit"),
        }
    }

    fn handle_line(&mut self, line: &str) {
        if self.config.debug {
            debug!(line, "engine >");
        }
        match uci::parse(line) {
            EngineMessage::Info(info) => {
                let (fen, color) = match self.queue.front() {
                    Some(pending) => (pending.fen.clone(), pending.color),
                    None => {
                        panic!("engine sent analysis output with no request in flight: {line}")
                    }
                };
                if let Some(candidate) = MoveAndEvaluation::from_info(&info, color) {
                    self.buffer.push(candidate);
                    if self.progress.receiver_count() > 0 {
                        let snapshot = EvaluatedPosition {
                            fen,
                            color,
                            best_moves: select_best_moves(color, &self.buffer),
                        };
                        let _ = self.progress.send(snapshot);
                    }
                }
            }
            EngineMessage::BestMove { .. } | EngineMessage::NoMove | EngineMessage::Mated => {
                self.finish_in_flight(line);
            }
            EngineMessage::Ready | EngineMessage::EngineLoaded => {}
            EngineMessage::Unknown => {
                if self.config.debug {
                    debug!(line, "ignoring unrecognized engine output");
                }
            }
        }
    }

    /// Settle the in-flight request and hand the engine the next queued fen.
    fn finish_in_flight(&mut self, line: &str) {
        let pending = self
            .queue
            .pop_front()
            .unwrap_or_else(|| panic!("engine reported a result with no request in flight: {line}"));

        if let Some(next) = self.queue.front() {
            let fen = next.fen.clone();
            self.send_analysis_commands(&fen);
        }

        let mut best_moves = select_best_moves(pending.color, &self.buffer);
        self.buffer.clear();
        if let Err(e) = board::decorate_moves(&pending.fen, &mut best_moves) {
            panic!("engine returned a move that is illegal in the evaluated position: {e}");
        }
        let snapshot = EvaluatedPosition {
            fen: pending.fen,
            color: pending.color,
            best_moves,
        };
        let _ = pending.reply.send(Ok(snapshot));
    }

    fn send_analysis_commands(&self, fen: &str) {
        self.send_command("isready");
        self.send_command(&format!("position fen {fen}"));
        self.send_command(&format!("go depth {}", self.config.depth));
    }

    fn send_command(&self, command: &str) {
        if self.config.debug {
            debug!(command, "engine <");
        }
        let _ = self.commands.send(command.to_string());
    }

    fn fail_pending(&mut self, reason: &str) {
        if !self.queue.is_empty() {
            warn!(
                reason,
                pending = self.queue.len(),
                "failing pending evaluations"
            );
        }
        for pending in self.queue.drain(..) {
            let _ = pending.reply.send(Err(EngineError::Process(reason.to_string())));
        }
    }
}
