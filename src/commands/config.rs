use bytes::Bytes;
use std::str::FromStr;
use strum_macros::{AsRefStr, EnumString};

use crate::commands::executable::Executable;
use crate::commands::{CommandParser, CommandParserError};
use crate::context::Context;
use crate::frame::Frame;

/// Reads a configuration parameter. Only `GET` of the snapshot location is supported.
///
/// Ref: <https://redis.io/docs/latest/commands/config-get/>
#[derive(Debug, PartialEq)]
pub struct Config {
    pub option: ConfigOption,
}

#[derive(Debug, Clone, Copy, PartialEq, EnumString, AsRefStr)]
#[strum(serialize_all = "lowercase")]
pub enum ConfigOption {
    Dir,
    DbFilename,
}

impl Executable for Config {
    fn exec(self, ctx: &Context) -> Frame {
        let value = match self.option {
            ConfigOption::Dir => ctx.snapshot.dir(),
            ConfigOption::DbFilename => ctx.snapshot.dbfilename(),
        };

        Frame::Array(vec![
            Frame::Bulk(Bytes::copy_from_slice(self.option.as_ref().as_bytes())),
            Frame::Bulk(Bytes::copy_from_slice(value.as_bytes())),
        ])
    }
}

impl TryFrom<&mut CommandParser> for Config {
    type Error = CommandParserError;

    fn try_from(parser: &mut CommandParser) -> Result<Self, Self::Error> {
        let subcommand = parser.next_string()?;
        if !subcommand.eq_ignore_ascii_case("get") {
            return Err(CommandParserError::UnknownSubcommand {
                command: parser.command.clone(),
                subcommand,
            });
        }

        let option = parser.next_string()?;
        let option = ConfigOption::from_str(&option)
            .map_err(|_| CommandParserError::UnsupportedConfigParameter(option))?;

        Ok(Self { option })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::Command;
    use crate::snapshot::SnapshotPath;
    use crate::store::Store;

    fn request(parts: &[&str]) -> Frame {
        Frame::Array(
            parts
                .iter()
                .map(|part| Frame::Bulk(Bytes::copy_from_slice(part.as_bytes())))
                .collect(),
        )
    }

    fn context() -> Context {
        Context::new(Store::new(), SnapshotPath::new("/var/lib/kvcache", "cache.rdb"))
    }

    #[test]
    fn get_dir() {
        let cmd = Command::try_from(request(&["CONFIG", "GET", "dir"])).unwrap();

        assert_eq!(
            cmd,
            Command::Config(Config {
                option: ConfigOption::Dir
            })
        );

        assert_eq!(
            cmd.exec(&context()),
            Frame::Array(vec![
                Frame::Bulk(Bytes::from("dir")),
                Frame::Bulk(Bytes::from("/var/lib/kvcache")),
            ])
        );
    }

    #[test]
    fn get_dbfilename() {
        let cmd = Command::try_from(request(&["config", "get", "dbfilename"])).unwrap();

        assert_eq!(
            cmd.exec(&context()),
            Frame::Array(vec![
                Frame::Bulk(Bytes::from("dbfilename")),
                Frame::Bulk(Bytes::from("cache.rdb")),
            ])
        );
    }

    #[test]
    fn unsupported_parameter() {
        for option in ["maxmemory", "DIR", "*"] {
            assert_eq!(
                Command::try_from(request(&["CONFIG", "GET", option])),
                Err(CommandParserError::UnsupportedConfigParameter(
                    option.to_string()
                ))
            );
        }
    }

    #[test]
    fn unknown_subcommand() {
        assert_eq!(
            Command::try_from(request(&["CONFIG", "SET", "dir", "/tmp"])),
            Err(CommandParserError::UnknownSubcommand {
                command: "config".to_string(),
                subcommand: "SET".to_string(),
            })
        );
    }
}
