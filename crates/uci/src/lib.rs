//! UCI (Universal Chess Interface) protocol plumbing.
//!
//! This crate provides parsing for the GUI-to-engine commands the engine
//! understands, formatting for engine-to-GUI replies, and a small IO
//! wrapper generic over `BufRead`/`Write` so a command loop can be tested
//! against in-memory buffers.
//!
//! # Supported commands
//!
//! - `uci` - initialize, reply with identity and `uciok`
//! - `isready` / `readyok` - synchronization
//! - `position [startpos | fen <fen>] [moves <move>...]` - set up a position
//! - `go perft <depth>` - run divide-perft
//! - `quit` - exit the engine

mod command;

pub use command::{GoOptions, GuiCommand};

use std::io::{BufRead, Write};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum UciError {
    #[error("parse error: {0}")]
    Parse(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Messages sent from the engine to the GUI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineMessage {
    /// Engine identification.
    Id { name: String, author: String },
    /// UCI initialization complete.
    UciOk,
    /// Engine is ready.
    ReadyOk,
}

impl EngineMessage {
    /// Formats the message for the wire.
    pub fn to_uci(&self) -> String {
        match self {
            EngineMessage::Id { name, author } => {
                format!("id name {}\nid author {}", name, author)
            }
            EngineMessage::UciOk => "uciok".to_string(),
            EngineMessage::ReadyOk => "readyok".to_string(),
        }
    }
}

/// Reader/writer pair speaking the UCI protocol.
pub struct UciEngine<R: BufRead, W: Write> {
    reader: R,
    writer: W,
}

impl<R: BufRead, W: Write> UciEngine<R, W> {
    pub fn new(reader: R, writer: W) -> Self {
        Self { reader, writer }
    }

    /// Reads and parses the next command. End of input reads as `quit`.
    pub fn read_command(&mut self) -> Result<GuiCommand, UciError> {
        let mut line = String::new();
        if self.reader.read_line(&mut line)? == 0 {
            return Ok(GuiCommand::Quit);
        }
        GuiCommand::parse(&line)
    }

    /// Sends a protocol message.
    pub fn send(&mut self, msg: &EngineMessage) -> Result<(), UciError> {
        self.send_line(&msg.to_uci())
    }

    /// Sends a raw output line (perft results, diagnostics).
    pub fn send_line(&mut self, line: &str) -> Result<(), UciError> {
        writeln!(self.writer, "{}", line)?;
        self.writer.flush()?;
        Ok(())
    }

    /// Sends the engine identification block.
    pub fn send_id(&mut self, name: &str, author: &str) -> Result<(), UciError> {
        self.send(&EngineMessage::Id {
            name: name.to_string(),
            author: author.to_string(),
        })
    }

    /// Sends `uciok`.
    pub fn send_uciok(&mut self) -> Result<(), UciError> {
        self.send(&EngineMessage::UciOk)
    }

    /// Sends `readyok`.
    pub fn send_readyok(&mut self) -> Result<(), UciError> {
        self.send(&EngineMessage::ReadyOk)
    }
}

/// Creates a UCI engine over stdin/stdout.
pub fn stdio_engine() -> UciEngine<std::io::BufReader<std::io::Stdin>, std::io::Stdout> {
    UciEngine::new(std::io::BufReader::new(std::io::stdin()), std::io::stdout())
}
