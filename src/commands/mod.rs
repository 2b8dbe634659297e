pub mod config;
pub mod discard;
pub mod echo;
pub mod exec;
pub mod executable;
pub mod get;
pub mod incr;
pub mod multi;
pub mod ping;
pub mod set;

use bytes::Bytes;
use std::{str, vec};
use strum_macros::IntoStaticStr;
use thiserror::Error as ThisError;

use crate::commands::executable::Executable;
use crate::context::Context;
use crate::frame::Frame;

use config::Config;
use discard::Discard;
use echo::Echo;
use exec::Exec;
use get::Get;
use incr::Incr;
use multi::Multi;
use ping::Ping;
use set::Set;

#[derive(Debug, PartialEq, IntoStaticStr)]
#[strum(serialize_all = "UPPERCASE")]
pub enum Command {
    Get(Get),
    Incr(Incr),
    Set(Set),

    Discard(Discard),
    Exec(Exec),
    Multi(Multi),

    Config(Config),
    Echo(Echo),
    Ping(Ping),
}

impl Command {
    /// The command verb, for logging.
    pub fn name(&self) -> &'static str {
        self.into()
    }
}

impl Executable for Command {
    fn exec(self, ctx: &Context) -> Frame {
        match self {
            Command::Config(cmd) => cmd.exec(ctx),
            Command::Discard(cmd) => cmd.exec(ctx),
            Command::Echo(cmd) => cmd.exec(ctx),
            Command::Exec(cmd) => cmd.exec(ctx),
            Command::Get(cmd) => cmd.exec(ctx),
            Command::Incr(cmd) => cmd.exec(ctx),
            Command::Multi(cmd) => cmd.exec(ctx),
            Command::Ping(cmd) => cmd.exec(ctx),
            Command::Set(cmd) => cmd.exec(ctx),
        }
    }
}

impl TryFrom<Frame> for Command {
    type Error = CommandParserError;

    fn try_from(frame: Frame) -> Result<Self, Self::Error> {
        // Clients send commands to the Redis server as RESP arrays.
        let frames = match frame {
            Frame::Array(array) => array,
            Frame::NullArray => return Err(CommandParserError::NullCommand),
            frame => {
                return Err(CommandParserError::InvalidFrame {
                    expected: "array".to_string(),
                    actual: frame,
                })
            }
        };

        let parser = &mut CommandParser::new(frames)?;
        let command_name = parser.command.clone();

        let command = match &command_name[..] {
            "config" => Config::try_from(&mut *parser).map(Command::Config),
            "discard" => Discard::try_from(&mut *parser).map(Command::Discard),
            "echo" => Echo::try_from(&mut *parser).map(Command::Echo),
            "exec" => Exec::try_from(&mut *parser).map(Command::Exec),
            "get" => Get::try_from(&mut *parser).map(Command::Get),
            "incr" => Incr::try_from(&mut *parser).map(Command::Incr),
            "multi" => Multi::try_from(&mut *parser).map(Command::Multi),
            "ping" => Ping::try_from(&mut *parser).map(Command::Ping),
            "set" => Set::try_from(&mut *parser).map(Command::Set),
            _ => {
                return Err(CommandParserError::UnknownCommand {
                    command: command_name.clone(),
                })
            }
        };

        command
            .and_then(|command| parser.finish().map(|_| command))
            .map_err(|err| match err {
                // Running out of arguments means the command was sent with too few of them.
                CommandParserError::EndOfStream => CommandParserError::WrongArity {
                    command: command_name,
                },
                err => err,
            })
    }
}

pub struct CommandParser {
    /// Lowercased command name.
    command: String,
    parts: vec::IntoIter<Frame>,
}

impl CommandParser {
    fn new(frames: Vec<Frame>) -> Result<CommandParser, CommandParserError> {
        let mut parts = frames.into_iter();

        let command = match parts.next() {
            None => return Err(CommandParserError::EmptyCommand),
            Some(Frame::Bulk(bytes)) => str::from_utf8(&bytes[..])
                .map(|s| s.to_lowercase())
                .map_err(CommandParserError::InvalidUTF8String)?,
            Some(frame) => {
                return Err(CommandParserError::InvalidFrame {
                    expected: "bulk string".to_string(),
                    actual: frame,
                })
            }
        };

        Ok(CommandParser { command, parts })
    }

    fn next_string(&mut self) -> Result<String, CommandParserError> {
        let bytes = self.next_bytes()?;

        str::from_utf8(&bytes[..])
            .map(|s| s.to_string())
            .map_err(CommandParserError::InvalidUTF8String)
    }

    fn next_bytes(&mut self) -> Result<Bytes, CommandParserError> {
        let frame = self
            .parts
            .next()
            .ok_or(CommandParserError::EndOfStream)?;

        match frame {
            Frame::Bulk(bytes) => Ok(bytes),
            frame => Err(CommandParserError::InvalidFrame {
                expected: "bulk string".to_string(),
                actual: frame,
            }),
        }
    }

    /// Fails when arguments are left over after the command took what it needs.
    fn finish(&mut self) -> Result<(), CommandParserError> {
        match self.parts.next() {
            None => Ok(()),
            Some(_) => Err(CommandParserError::WrongArity {
                command: self.command.clone(),
            }),
        }
    }
}

#[derive(Debug, ThisError, PartialEq)]
pub enum CommandParserError {
    #[error("empty command")]
    EmptyCommand,
    #[error("null command")]
    NullCommand,
    #[error("invalid frame, expected {expected}, got {actual}")]
    InvalidFrame { expected: String, actual: Frame },
    #[error("unknown command '{command}'")]
    UnknownCommand { command: String },
    #[error("wrong number of arguments for '{command}' command")]
    WrongArity { command: String },
    #[error("invalid expiration value: {0}")]
    InvalidExpirationValue(String),
    #[error("invalid expiration unit: {0}")]
    InvalidExpirationUnit(String),
    #[error("unknown subcommand '{subcommand}' for '{command}'")]
    UnknownSubcommand { command: String, subcommand: String },
    #[error("unsupported CONFIG parameter: {0}")]
    UnsupportedConfigParameter(String),
    #[error("invalid UTF-8 string")]
    InvalidUTF8String(#[from] str::Utf8Error),
    #[error("attempting to extract a value failed due to the frame being fully consumed")]
    EndOfStream,
}
