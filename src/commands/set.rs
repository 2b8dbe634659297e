use bytes::Bytes;
use tokio::time::Duration;

use crate::commands::executable::Executable;
use crate::commands::{CommandParser, CommandParserError};
use crate::context::Context;
use crate::frame::Frame;

/// Set `key` to hold the string `value`, optionally expiring after a number of seconds (`EX`) or
/// milliseconds (`PX`).
///
/// Ref: <https://redis.io/docs/latest/commands/set/>
#[derive(Debug, PartialEq)]
pub struct Set {
    pub key: String,
    pub value: Bytes,
    pub ttl: Option<Ttl>,
}

#[derive(Debug, PartialEq)]
pub enum Ttl {
    Ex(u32),
    Px(u32),
}

impl Ttl {
    pub fn duration(&self) -> Duration {
        match self {
            Ttl::Ex(seconds) => Duration::from_secs(u64::from(*seconds)),
            Ttl::Px(millis) => Duration::from_millis(u64::from(*millis)),
        }
    }

    fn parse(unit: String, amount: String) -> Result<Ttl, CommandParserError> {
        let amount = match amount.parse::<u32>() {
            Ok(amount) if amount > 0 => amount,
            _ => return Err(CommandParserError::InvalidExpirationValue(amount)),
        };

        // Units are matched case-sensitively.
        match &unit[..] {
            "EX" => Ok(Ttl::Ex(amount)),
            "PX" => Ok(Ttl::Px(amount)),
            _ => Err(CommandParserError::InvalidExpirationUnit(unit)),
        }
    }
}

impl Executable for Set {
    fn exec(self, ctx: &Context) -> Frame {
        let ttl = self.ttl.map(|ttl| ttl.duration());
        ctx.store.set(self.key, self.value, ttl);

        Frame::Simple("OK".to_string())
    }
}

impl TryFrom<&mut CommandParser> for Set {
    type Error = CommandParserError;

    fn try_from(parser: &mut CommandParser) -> Result<Self, Self::Error> {
        let key = parser.next_string()?;
        let value = parser.next_bytes()?;

        let ttl = match parser.next_string() {
            Ok(unit) => {
                let amount = parser.next_string()?;
                Some(Ttl::parse(unit, amount)?)
            }
            Err(CommandParserError::EndOfStream) => None,
            Err(err) => return Err(err),
        };

        Ok(Self { key, value, ttl })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::Command;
    use tokio::time;

    fn request(parts: &[&str]) -> Frame {
        Frame::Array(
            parts
                .iter()
                .map(|part| Frame::Bulk(Bytes::copy_from_slice(part.as_bytes())))
                .collect(),
        )
    }

    #[test]
    fn set() {
        let cmd = Command::try_from(request(&["SET", "foo", "baz"])).unwrap();

        assert_eq!(
            cmd,
            Command::Set(Set {
                key: String::from("foo"),
                value: Bytes::from("baz"),
                ttl: None,
            })
        );

        let ctx = Context::default();
        let result = cmd.exec(&ctx);

        assert_eq!(result, Frame::Simple("OK".to_string()));
        assert_eq!(ctx.store.get("foo"), Some(Bytes::from("baz")));
    }

    #[test]
    fn parse_ttl() {
        let cmd = Command::try_from(request(&["set", "foo", "baz", "EX", "10"])).unwrap();
        assert_eq!(
            cmd,
            Command::Set(Set {
                key: String::from("foo"),
                value: Bytes::from("baz"),
                ttl: Some(Ttl::Ex(10)),
            })
        );

        let cmd = Command::try_from(request(&["SET", "foo", "baz", "PX", "1500"])).unwrap();
        assert_eq!(
            cmd,
            Command::Set(Set {
                key: String::from("foo"),
                value: Bytes::from("baz"),
                ttl: Some(Ttl::Px(1500)),
            })
        );
    }

    #[test]
    fn ttl_duration() {
        assert_eq!(Ttl::Ex(10).duration(), Duration::from_secs(10));
        assert_eq!(Ttl::Px(1500).duration(), Duration::from_millis(1500));
    }

    #[test]
    fn invalid_ttl_value() {
        for amount in ["0", "-1", "abc", "1.5", "4294967296"] {
            assert_eq!(
                Command::try_from(request(&["SET", "k", "v", "EX", amount])),
                Err(CommandParserError::InvalidExpirationValue(
                    amount.to_string()
                ))
            );
        }
    }

    #[test]
    fn invalid_ttl_unit() {
        for unit in ["ex", "px", "KEEPTTL", "EXAT"] {
            assert_eq!(
                Command::try_from(request(&["SET", "k", "v", unit, "10"])),
                Err(CommandParserError::InvalidExpirationUnit(unit.to_string()))
            );
        }
    }

    #[tokio::test]
    async fn set_with_ttl_expires() {
        time::pause();

        let ctx = Context::default();
        let cmd = Command::try_from(request(&["SET", "foo", "baz", "PX", "100"])).unwrap();

        assert_eq!(cmd.exec(&ctx), Frame::Simple("OK".to_string()));
        assert_eq!(ctx.store.get("foo"), Some(Bytes::from("baz")));

        time::advance(Duration::from_millis(101)).await;

        assert_eq!(ctx.store.get("foo"), None);
    }
}
