use thiserror::Error as ThisError;
use tracing::debug;

use crate::commands::executable::Executable;
use crate::commands::Command;
use crate::context::Context;
use crate::frame::Frame;

#[derive(Debug, ThisError, PartialEq)]
pub enum TransactionError {
    #[error("EXEC without MULTI")]
    ExecWithoutMulti,
    #[error("DISCARD without MULTI")]
    DiscardWithoutMulti,
    #[error("nested multi commands are not allowed")]
    NestedMulti,
}

/// Per-connection MULTI/EXEC/DISCARD state machine.
///
/// Commands are queued between `MULTI` and `EXEC` and then run one after the other. Each queued
/// command takes the store lock on its own, so commands from other connections may interleave
/// with the ones of a transaction.
#[derive(Debug, Default)]
pub struct Transaction {
    state: State,
}

#[derive(Debug, Default)]
enum State {
    #[default]
    Idle,
    Queuing(Vec<Command>),
}

impl Transaction {
    pub fn new() -> Transaction {
        Self::default()
    }

    pub fn is_queuing(&self) -> bool {
        matches!(self.state, State::Queuing(_))
    }

    /// Number of commands waiting for `EXEC`.
    pub fn queued(&self) -> usize {
        match &self.state {
            State::Idle => 0,
            State::Queuing(queue) => queue.len(),
        }
    }

    /// Feeds the next command of the connection and returns the reply to send back.
    pub fn handle(&mut self, command: Command, ctx: &Context) -> Frame {
        let queue = match &mut self.state {
            State::Idle => return self.handle_idle(command, ctx),
            State::Queuing(queue) => queue,
        };

        match command {
            Command::Multi(_) => Frame::generic_error(TransactionError::NestedMulti),
            Command::Discard(_) => {
                self.state = State::Idle;
                Frame::Simple("OK".to_string())
            }
            Command::Exec(_) => {
                let queue = std::mem::take(queue);
                self.state = State::Idle;

                debug!(commands = queue.len(), "Executing transaction");

                let replies = queue
                    .into_iter()
                    .map(|command| command.exec(ctx))
                    .collect();

                Frame::Array(replies)
            }
            command => {
                queue.push(command);
                Frame::Simple("QUEUED".to_string())
            }
        }
    }

    fn handle_idle(&mut self, command: Command, ctx: &Context) -> Frame {
        match command {
            Command::Multi(_) => {
                self.state = State::Queuing(Vec::new());
                Frame::Simple("OK".to_string())
            }
            command => command.exec(ctx),
        }
    }
}
