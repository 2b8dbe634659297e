use crate::commands::executable::Executable;
use crate::commands::{CommandParser, CommandParserError};
use crate::context::Context;
use crate::frame::Frame;
use crate::transaction::TransactionError;

/// Executes all previously queued commands in a transaction.
///
/// Ref: <https://redis.io/docs/latest/commands/exec/>
#[derive(Debug, PartialEq)]
pub struct Exec;

impl Executable for Exec {
    // Only reached outside of a transaction block.
    fn exec(self, _ctx: &Context) -> Frame {
        Frame::generic_error(TransactionError::ExecWithoutMulti)
    }
}

impl TryFrom<&mut CommandParser> for Exec {
    type Error = CommandParserError;

    fn try_from(_parser: &mut CommandParser) -> Result<Self, Self::Error> {
        Ok(Self)
    }
}
