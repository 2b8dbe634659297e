use crate::commands::executable::Executable;
use crate::commands::{CommandParser, CommandParserError};
use crate::context::Context;
use crate::frame::Frame;
use crate::transaction::TransactionError;

/// Flushes all previously queued commands in a transaction.
///
/// Ref: <https://redis.io/docs/latest/commands/discard/>
#[derive(Debug, PartialEq)]
pub struct Discard;

impl Executable for Discard {
    // Only reached outside of a transaction block.
    fn exec(self, _ctx: &Context) -> Frame {
        Frame::generic_error(TransactionError::DiscardWithoutMulti)
    }
}

impl TryFrom<&mut CommandParser> for Discard {
    type Error = CommandParserError;

    fn try_from(_parser: &mut CommandParser) -> Result<Self, Self::Error> {
        Ok(Self)
    }
}
