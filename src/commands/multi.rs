use crate::commands::executable::Executable;
use crate::commands::{CommandParser, CommandParserError};
use crate::context::Context;
use crate::frame::Frame;
use crate::transaction::TransactionError;

/// Marks the start of a transaction block. Opening a block is handled by the connection's
/// [`Transaction`](crate::transaction::Transaction); executing `MULTI` directly only happens
/// from inside a block, where it is refused.
///
/// Ref: <https://redis.io/docs/latest/commands/multi/>
#[derive(Debug, PartialEq)]
pub struct Multi;

impl Executable for Multi {
    fn exec(self, _ctx: &Context) -> Frame {
        Frame::generic_error(TransactionError::NestedMulti)
    }
}

impl TryFrom<&mut CommandParser> for Multi {
    type Error = CommandParserError;

    fn try_from(_parser: &mut CommandParser) -> Result<Self, Self::Error> {
        Ok(Self)
    }
}
