use bytes::Bytes;

use crate::commands::executable::Executable;
use crate::commands::{CommandParser, CommandParserError};
use crate::context::Context;
use crate::frame::Frame;

/// Get the value of `key` as a simple string. If the key does not exist, or has expired, the
/// special value `nil` is returned.
///
/// A value that cannot travel as a simple string, because it is not UTF-8 or holds a CR or LF,
/// is replied as a bulk string instead.
///
/// Ref: <https://redis.io/docs/latest/commands/get/>
#[derive(Debug, PartialEq)]
pub struct Get {
    pub key: String,
}

impl Executable for Get {
    fn exec(self, ctx: &Context) -> Frame {
        match ctx.store.get(&self.key) {
            Some(value) => reply(value),
            None => Frame::Null,
        }
    }
}

fn reply(value: Bytes) -> Frame {
    match std::str::from_utf8(&value) {
        Ok(s) if !s.contains(['\r', '\n']) => Frame::Simple(s.to_string()),
        _ => Frame::Bulk(value),
    }
}

impl TryFrom<&mut CommandParser> for Get {
    type Error = CommandParserError;

    fn try_from(parser: &mut CommandParser) -> Result<Self, Self::Error> {
        let key = parser.next_string()?;
        Ok(Self { key })
    }
}
