use clap::Parser;

use crate::codec::DEFAULT_MAX_FRAME_SIZE;
use crate::snapshot::SnapshotPath;

pub const PORT: u16 = 6379;

#[derive(Parser, Debug, Clone)]
#[command(version, about)]
pub struct Config {
    /// The address to bind to
    #[arg(long, env = "KVCACHE_HOST", default_value = "127.0.0.1")]
    pub host: String,

    /// The port to listen on
    #[arg(short, long, env = "KVCACHE_PORT", default_value_t = PORT)]
    pub port: u16,

    /// Directory holding the snapshot file
    #[arg(long, env = "KVCACHE_DIR", default_value = ".")]
    pub dir: String,

    /// Name of the snapshot file
    #[arg(long, env = "KVCACHE_DBFILENAME", default_value = "dump.rdb")]
    pub dbfilename: String,

    /// Largest amount of buffered request data accepted from a client, in bytes
    #[arg(long, env = "MAX_FRAME_SIZE", default_value_t = DEFAULT_MAX_FRAME_SIZE)]
    pub max_frame_size: usize,
}

impl Config {
    pub fn snapshot(&self) -> SnapshotPath {
        SnapshotPath::new(&self.dir, &self.dbfilename)
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            host: "127.0.0.1".to_string(),
            port: PORT,
            dir: ".".to_string(),
            dbfilename: "dump.rdb".to_string(),
            max_frame_size: DEFAULT_MAX_FRAME_SIZE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = Config::try_parse_from(["kvcache"]).unwrap();

        assert_eq!(config.port, 6379);
        assert_eq!(config.snapshot(), SnapshotPath::new(".", "dump.rdb"));
    }

    #[test]
    fn flags() {
        let config = Config::try_parse_from([
            "kvcache",
            "--port",
            "7000",
            "--dir",
            "/tmp/kvcache",
            "--dbfilename",
            "cache.rdb",
        ])
        .unwrap();

        assert_eq!(config.port, 7000);
        assert_eq!(config.dir, "/tmp/kvcache");
        assert_eq!(config.dbfilename, "cache.rdb");
    }
}
