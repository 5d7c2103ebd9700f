//! Background TCP receiver for controller commands.
//!
//! # Protocol
//!
//! The receiver connects out to the controller, writes one identification
//! line (`{"client_type": "..."}`) and then reads newline-delimited messages
//! until the peer closes.  Each non-empty line is pushed, undecoded, onto the
//! owning agent's [`CommandQueue`](crate::CommandQueue).  Lines longer than
//! [`MAX_LINE_BYTES`] are discarded up to the next newline.
//!
//! # Reconnect policy
//!
//! Any connect failure, read error or EOF schedules another attempt after a
//! fixed delay.  There is no backoff and no retry cap.  The delay is a
//! `recv_timeout` on a stop channel, so shutdown interrupts it immediately.
//!
//! # Shutdown
//!
//! [`CommandChannel::shutdown`] (also run on drop) clears the running flag,
//! wakes the reconnect wait, shuts the live socket down to unblock the read,
//! and waits at most `join_timeout` for the thread.  A thread that does not
//! stop in time is detached.

use std::io::{BufRead, BufReader, Read, Write};
use std::net::{Shutdown, SocketAddr, TcpStream, ToSocketAddrs};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossbeam_channel::{Receiver, RecvTimeoutError, Sender, bounded};
use tracing::{debug, info, warn};

use pm_core::ChannelConfig;

use crate::{CommandError, CommandResult, CommandSender};

/// Longest accepted message line, excluding the newline.
pub const MAX_LINE_BYTES: usize = 64 * 1024;

// ── ChannelStats ──────────────────────────────────────────────────────────────

/// Counters updated by the receiver thread.
#[derive(Debug, Default)]
pub struct ChannelStats {
    attempts:    AtomicU64,
    failures:    AtomicU64,
    connections: AtomicU64,
    lines:       AtomicU64,
    oversized:   AtomicU64,
}

/// Point-in-time copy of [`ChannelStats`].
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct StatsSnapshot {
    pub attempts:    u64,
    pub failures:    u64,
    pub connections: u64,
    pub lines:       u64,
    /// Lines dropped for exceeding [`MAX_LINE_BYTES`].
    pub oversized:   u64,
}

impl ChannelStats {
    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            attempts:    self.attempts.load(Ordering::Relaxed),
            failures:    self.failures.load(Ordering::Relaxed),
            connections: self.connections.load(Ordering::Relaxed),
            lines:       self.lines.load(Ordering::Relaxed),
            oversized:   self.oversized.load(Ordering::Relaxed),
        }
    }

    #[inline]
    fn bump(counter: &AtomicU64) {
        counter.fetch_add(1, Ordering::Relaxed);
    }
}

// ── CommandChannel ────────────────────────────────────────────────────────────

type StreamSlot = Arc<Mutex<Option<TcpStream>>>;

pub struct CommandChannel {
    running:      Arc<AtomicBool>,
    stream:       StreamSlot,
    stats:        Arc<ChannelStats>,
    stop_tx:      Option<Sender<()>>,
    done_rx:      Receiver<()>,
    handle:       Option<JoinHandle<()>>,
    join_timeout: Duration,
}

impl CommandChannel {
    /// Start the receiver thread.  Lines go to `sink`.
    ///
    /// Fails only if the OS refuses to create the thread; an unreachable
    /// controller is handled by the reconnect loop.
    pub fn spawn(cfg: ChannelConfig, sink: CommandSender) -> CommandResult<Self> {
        if let Err(e) = cfg.validate() {
            warn!(error = %e, "channel config out of range, using fallbacks");
        }
        let running = Arc::new(AtomicBool::new(true));
        let stream: StreamSlot = Arc::new(Mutex::new(None));
        let stats = Arc::new(ChannelStats::default());
        let (stop_tx, stop_rx) = bounded::<()>(1);
        let (done_tx, done_rx) = bounded::<()>(1);
        let join_timeout = cfg.join_timeout();

        let worker = Worker {
            cfg,
            sink,
            running: Arc::clone(&running),
            stream: Arc::clone(&stream),
            stats: Arc::clone(&stats),
            stop_rx,
        };
        let handle = thread::Builder::new()
            .name("pm-command-rx".to_owned())
            .spawn(move || {
                // Dropped when the worker returns; the disconnect wakes `shutdown`.
                let _done = done_tx;
                worker.run();
            })?;

        Ok(Self {
            running,
            stream,
            stats,
            stop_tx: Some(stop_tx),
            done_rx,
            handle: Some(handle),
            join_timeout,
        })
    }

    pub fn stats(&self) -> StatsSnapshot {
        self.stats.snapshot()
    }

    /// `true` while a controller connection is open.
    pub fn is_connected(&self) -> bool {
        lock_slot(&self.stream).is_some()
    }

    /// Stop the receiver thread.  Idempotent.
    pub fn shutdown(&mut self) {
        let Some(handle) = self.handle.take() else {
            return;
        };
        self.running.store(false, Ordering::SeqCst);
        self.stop_tx.take();
        if let Some(stream) = lock_slot(&self.stream).as_ref() {
            let _ = stream.shutdown(Shutdown::Both);
        }

        match self.done_rx.recv_timeout(self.join_timeout) {
            Err(RecvTimeoutError::Timeout) => {
                warn!(timeout_ms = self.join_timeout.as_millis() as u64, "command receiver did not stop in time, detaching");
            }
            _ => {
                if handle.join().is_err() {
                    warn!("command receiver thread panicked");
                }
                info!("command receiver stopped");
            }
        }
    }
}

impl Drop for CommandChannel {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn lock_slot(slot: &StreamSlot) -> std::sync::MutexGuard<'_, Option<TcpStream>> {
    slot.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

// ── Worker ────────────────────────────────────────────────────────────────────

struct Worker {
    cfg:     ChannelConfig,
    sink:    CommandSender,
    running: Arc<AtomicBool>,
    stream:  StreamSlot,
    stats:   Arc<ChannelStats>,
    stop_rx: Receiver<()>,
}

/// Why a read session ended.
enum SessionEnd {
    /// Peer closed or the socket failed; reconnect.
    Disconnected,
    /// The queue is gone; nobody is listening any more.
    SinkClosed,
}

impl Worker {
    fn run(self) {
        while self.running.load(Ordering::SeqCst) {
            ChannelStats::bump(&self.stats.attempts);

            match self.connect() {
                Ok(stream) => {
                    ChannelStats::bump(&self.stats.connections);
                    info!(addr = %self.cfg.server_addr, "connected to controller");
                    if let SessionEnd::SinkClosed = self.session(stream) {
                        warn!("command queue dropped, stopping receiver");
                        return;
                    }
                    info!(addr = %self.cfg.server_addr, "controller connection closed");
                }
                Err(e) => {
                    ChannelStats::bump(&self.stats.failures);
                    warn!(addr = %self.cfg.server_addr, error = %e, "controller connection failed");
                }
            }

            if !self.running.load(Ordering::SeqCst) {
                break;
            }
            let delay = self.cfg.reconnect_delay();
            info!(delay_secs = delay.as_secs_f32(), "reconnect scheduled");
            match self.stop_rx.recv_timeout(delay) {
                Err(RecvTimeoutError::Timeout) => {}
                // Sender dropped or signalled: shutting down.
                _ => break,
            }
        }
        debug!("command receiver loop exited");
    }

    fn connect(&self) -> CommandResult<TcpStream> {
        let addrs: Vec<SocketAddr> = self
            .cfg
            .server_addr
            .to_socket_addrs()
            .map_err(|_| CommandError::Address(self.cfg.server_addr.clone()))?
            .collect();

        let mut last_err = None;
        for addr in addrs {
            match TcpStream::connect_timeout(&addr, self.cfg.connect_timeout()) {
                Ok(mut stream) => {
                    let handshake = serde_json::json!({ "client_type": self.cfg.client_type });
                    stream.write_all(format!("{handshake}\n").as_bytes())?;
                    stream.flush()?;
                    return Ok(stream);
                }
                Err(e) => last_err = Some(e),
            }
        }
        Err(match last_err {
            Some(e) => CommandError::Io(e),
            None => CommandError::Address(self.cfg.server_addr.clone()),
        })
    }

    /// Read lines until the connection ends.
    fn session(&self, stream: TcpStream) -> SessionEnd {
        {
            let mut slot = lock_slot(&self.stream);
            // `shutdown` may have run between connect and here.
            if !self.running.load(Ordering::SeqCst) {
                return SessionEnd::Disconnected;
            }
            match stream.try_clone() {
                Ok(clone) => *slot = Some(clone),
                Err(e) => {
                    warn!(error = %e, "cannot clone controller socket");
                    return SessionEnd::Disconnected;
                }
            }
        }

        let end = self.read_lines(stream);
        lock_slot(&self.stream).take();
        end
    }

    fn read_lines(&self, stream: TcpStream) -> SessionEnd {
        let mut reader = BufReader::new(stream);
        let mut line = Vec::new();
        loop {
            line.clear();
            match read_capped(&mut reader, &mut line) {
                Ok(Some(0)) => return SessionEnd::Disconnected,
                Ok(Some(_)) => {
                    let Ok(text) = std::str::from_utf8(&line) else {
                        warn!(bytes = line.len(), "dropping non-UTF-8 controller line");
                        continue;
                    };
                    let trimmed = text.trim();
                    if trimmed.is_empty() {
                        continue;
                    }
                    ChannelStats::bump(&self.stats.lines);
                    if !self.sink.send_raw(trimmed) {
                        return SessionEnd::SinkClosed;
                    }
                }
                Ok(None) => {
                    ChannelStats::bump(&self.stats.oversized);
                    warn!(max = MAX_LINE_BYTES, "dropping oversized controller line");
                }
                Err(e) => {
                    if self.running.load(Ordering::SeqCst) {
                        warn!(error = %e, "controller read error");
                    }
                    return SessionEnd::Disconnected;
                }
            }
        }
    }
}

/// Read one line of at most [`MAX_LINE_BYTES`] into `line`.
///
/// `Ok(None)` means the line was longer and has been skipped.
fn read_capped<R: BufRead>(reader: &mut R, line: &mut Vec<u8>) -> std::io::Result<Option<usize>> {
    let n = reader.by_ref().take(MAX_LINE_BYTES as u64 + 1).read_until(b'\n', line)?;
    if line.len() > MAX_LINE_BYTES && line.last() != Some(&b'\n') {
        discard_line(reader)?;
        return Ok(None);
    }
    Ok(Some(n))
}

/// Skip input up to and including the next newline, or to EOF.
fn discard_line<R: BufRead>(reader: &mut R) -> std::io::Result<()> {
    loop {
        let buf = reader.fill_buf()?;
        if buf.is_empty() {
            return Ok(());
        }
        match buf.iter().position(|&b| b == b'\n') {
            Some(i) => {
                reader.consume(i + 1);
                return Ok(());
            }
            None => {
                let n = buf.len();
                reader.consume(n);
            }
        }
    }
}
