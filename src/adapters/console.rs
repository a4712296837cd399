//! Line-oriented operator console.
//!
//! A helper thread blocks on the reader and forwards each line through an
//! `mpsc` channel; the polling loop only ever calls the non-blocking
//! [`CommandChannel::try_receive_line`].  Responses are written straight
//! to the writer, one per line.
//!
//! ```text
//!  stdin ──▶ [console thread] ──mpsc──▶ try_receive_line() ──▶ AppService
//!  stdout ◀────────────────────────────── send() ◀──────────────┘
//! ```

use std::io::{self, BufRead, Write};
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;

use log::{info, warn};

use crate::app::ports::{CommandChannel, CommandLine};

pub struct ConsoleChannel<W: Write> {
    lines: Receiver<String>,
    writer: W,
    closed: bool,
}

impl ConsoleChannel<io::Stdout> {
    /// Console on the process's stdin/stdout.
    pub fn stdio() -> io::Result<Self> {
        Self::spawn(io::BufReader::new(io::stdin()), io::stdout())
    }
}

impl<W: Write> ConsoleChannel<W> {
    /// Start the reader thread.
    pub fn spawn<R>(reader: R, writer: W) -> io::Result<Self>
    where
        R: BufRead + Send + 'static,
    {
        let (tx, rx) = mpsc::channel();
        thread::Builder::new()
            .name("console".into())
            .spawn(move || {
                for line in reader.lines() {
                    match line {
                        Ok(line) => {
                            if tx.send(line).is_err() {
                                break;
                            }
                        }
                        Err(e) => {
                            warn!("Console read error: {e}");
                            break;
                        }
                    }
                }
                info!("Console input closed");
            })?;

        Ok(Self {
            lines: rx,
            writer,
            closed: false,
        })
    }

    /// The reader hit end of input and every line has been consumed.
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub fn writer(&self) -> &W {
        &self.writer
    }
}

impl<W: Write> CommandChannel for ConsoleChannel<W> {
    fn try_receive_line(&mut self) -> Option<CommandLine> {
        match self.lines.try_recv() {
            Ok(line) => Some(CommandLine::bounded(&line)),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => {
                self.closed = true;
                None
            }
        }
    }

    fn send(&mut self, line: &str) {
        if let Err(e) = writeln!(self.writer, "{line}").and_then(|()| self.writer.flush()) {
            warn!("Console write failed: {e}");
        }
    }
}
