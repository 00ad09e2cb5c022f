use glyphmatch::{PreprocessConfig, RecognizerConfig, SegmentConfig, StoreConfig};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

/// Server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    /// Server bind address
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Maximum request body size in MB
    #[serde(default = "default_max_body_size_mb")]
    pub max_body_size_mb: usize,

    /// Log level or filter directive
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Directory holding `<label>_<index>.png` templates
    #[serde(default = "default_template_dir")]
    pub template_dir: PathBuf,

    /// Characters per captcha
    #[serde(default = "default_num_chars")]
    pub num_chars: usize,

    /// Normalized glyph width
    #[serde(default = "default_glyph_width")]
    pub glyph_width: usize,

    /// Normalized glyph height
    #[serde(default = "default_glyph_height")]
    pub glyph_height: usize,

    /// Where to dump raw segmented cells, if anywhere
    #[serde(default)]
    pub debug_dir: Option<PathBuf>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            port: default_port(),
            timeout_secs: default_timeout_secs(),
            max_body_size_mb: default_max_body_size_mb(),
            log_level: default_log_level(),
            template_dir: default_template_dir(),
            num_chars: default_num_chars(),
            glyph_width: default_glyph_width(),
            glyph_height: default_glyph_height(),
            debug_dir: None,
        }
    }
}

impl ServerConfig {
    /// Load configuration from an optional `server.*` file and
    /// `GLYPHMATCH_SERVER__*` environment variables
    pub fn load() -> anyhow::Result<Self> {
        let builder = config::Config::builder()
            .add_source(config::File::with_name("server").required(false))
            .add_source(
                config::Environment::with_prefix("GLYPHMATCH_SERVER")
                    .separator("__")
                    .try_parsing(true),
            );

        Ok(builder.build()?.try_deserialize()?)
    }

    /// Get the socket address to bind to
    pub fn socket_addr(&self) -> anyhow::Result<SocketAddr> {
        let addr_str = format!("{}:{}", self.bind_addr, self.port);
        Ok(addr_str.parse()?)
    }

    /// Get request timeout as Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Get max body size in bytes
    pub fn max_body_size(&self) -> usize {
        self.max_body_size_mb * 1024 * 1024
    }

    /// Pipeline configuration for the recognizer
    pub fn recognizer_config(&self) -> RecognizerConfig {
        RecognizerConfig {
            preprocess: PreprocessConfig {
                width: self.glyph_width,
                height: self.glyph_height,
            },
            segment: SegmentConfig {
                num_chars: self.num_chars,
                debug_dir: self.debug_dir.clone(),
            },
            store: StoreConfig {
                template_dir: self.template_dir.clone(),
                ..StoreConfig::default()
            },
            ..RecognizerConfig::default()
        }
    }
}

fn default_bind_addr() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_max_body_size_mb() -> usize {
    10
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_template_dir() -> PathBuf {
    StoreConfig::default().template_dir
}

fn default_num_chars() -> usize {
    SegmentConfig::default().num_chars
}

fn default_glyph_width() -> usize {
    PreprocessConfig::default().width
}

fn default_glyph_height() -> usize {
    PreprocessConfig::default().height
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let cfg = ServerConfig::default();
        assert_eq!(cfg.port, 8000);
        assert_eq!(cfg.timeout_secs, 30);
        assert_eq!(cfg.max_body_size(), 10 * 1024 * 1024);
        assert_eq!(cfg.template_dir, PathBuf::from("captcha_templates"));
        assert_eq!(cfg.num_chars, 4);
        assert_eq!((cfg.glyph_width, cfg.glyph_height), (30, 50));
    }

    #[test]
    fn test_socket_addr() {
        let cfg = ServerConfig::default();
        let addr = cfg.socket_addr().unwrap();
        assert_eq!(addr.port(), 8000);
    }

    #[test]
    fn test_recognizer_config_follows_server_config() {
        let cfg = ServerConfig {
            template_dir: PathBuf::from("/tmp/tpl"),
            num_chars: 6,
            ..ServerConfig::default()
        };
        let rc = cfg.recognizer_config();
        assert_eq!(rc.segment.num_chars, 6);
        assert_eq!(rc.store.template_dir, PathBuf::from("/tmp/tpl"));
        assert_eq!(rc.store.extension, "png");
    }
}
