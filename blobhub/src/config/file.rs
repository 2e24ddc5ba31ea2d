//! Loading and saving `config.ini`.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use ini::{Ini, Properties};

use super::error::ConfigError;

const CONFIG_DIR_NAME: &str = ".blobhub";
const CONFIG_FILE_NAME: &str = "config.ini";

/// `~/.blobhub`, or `./.blobhub` when no home directory is known.
pub fn config_directory() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(CONFIG_DIR_NAME)
}

/// Default configuration file location.
pub fn config_file_path() -> PathBuf {
    config_directory().join(CONFIG_FILE_NAME)
}

fn expand_home(raw: &str) -> PathBuf {
    match raw.strip_prefix("~/") {
        Some(rest) => dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(rest),
        None => PathBuf::from(raw),
    }
}

// =============================================================================
// Sections
// =============================================================================

/// `[sender]`: telemetry forwarding of raw batches.
#[derive(Debug, Clone, PartialEq)]
pub struct SenderConfig {
    pub enabled: bool,
    pub host: String,
    pub port: u16,
}

impl Default for SenderConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            host: "127.0.0.1".to_string(),
            port: 3334,
        }
    }
}

/// `[receiver]`: remote raw batches as an extra detection source.
#[derive(Debug, Clone, PartialEq)]
pub struct ReceiverConfig {
    pub enabled: bool,
    pub port: u16,
}

impl Default for ReceiverConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            port: 3334,
        }
    }
}

/// One `host:port` broadcast destination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BroadcastTarget {
    pub host: String,
    pub port: u16,
}

impl BroadcastTarget {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }
}

impl fmt::Display for BroadcastTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}

impl FromStr for BroadcastTarget {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (host, port) = s.trim().rsplit_once(':').ok_or(())?;
        let host = host.trim();
        if host.is_empty() {
            return Err(());
        }
        let port = port.trim().parse().map_err(|_| ())?;
        Ok(Self::new(host, port))
    }
}

/// `[broadcast]`: track record set broadcasting.
#[derive(Debug, Clone, PartialEq)]
pub struct BroadcastConfig {
    pub enabled: bool,
    pub targets: Vec<BroadcastTarget>,
    pub left_margin: f32,
    pub right_margin: f32,
    pub queued: bool,
    pub queue_capacity: usize,
}

impl Default for BroadcastConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            targets: vec![BroadcastTarget::new("127.0.0.1", 3333)],
            left_margin: 0.0,
            right_margin: 0.0,
            queued: false,
            queue_capacity: 4,
        }
    }
}

/// `[tracking]`: interpretation engine parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackingConfig {
    pub person_tracking: bool,
    pub correlation_point: f32,
    pub correlation_region: f32,
    pub region_correlation: bool,
    pub smoothing: f32,
    pub radius_click: f32,
    pub radius_drag: f32,
    /// Horizontal sensor slots; 0 uses the number of registered sources.
    pub source_slots: usize,
}

impl Default for TrackingConfig {
    fn default() -> Self {
        Self {
            person_tracking: false,
            correlation_point: 0.05,
            correlation_region: 0.1,
            region_correlation: true,
            smoothing: 0.5,
            radius_click: 0.0,
            radius_drag: 0.0,
            source_slots: 0,
        }
    }
}

/// `[sources]`: simulated detection sources.
#[derive(Debug, Clone, PartialEq)]
pub struct SourcesConfig {
    pub simulated: usize,
    pub tick_ms: u64,
    pub blobs_per_source: usize,
}

impl Default for SourcesConfig {
    fn default() -> Self {
        Self {
            simulated: 2,
            tick_ms: 33,
            blobs_per_source: 3,
        }
    }
}

/// `[display]`: initial viewport size.
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayConfig {
    pub width: f32,
    pub height: f32,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            width: 1920.0,
            height: 480.0,
        }
    }
}

/// `[logging]`
#[derive(Debug, Clone, PartialEq)]
pub struct LoggingConfig {
    pub level: String,
    pub directory: PathBuf,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            directory: config_directory().join("logs"),
        }
    }
}

// =============================================================================
// ConfigFile
// =============================================================================

/// The complete configuration file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigFile {
    pub sender: SenderConfig,
    pub receiver: ReceiverConfig,
    pub broadcast: BroadcastConfig,
    pub tracking: TrackingConfig,
    pub sources: SourcesConfig,
    pub display: DisplayConfig,
    pub logging: LoggingConfig,
}

impl ConfigFile {
    /// Load from `path`, falling back to defaults when the file does not exist.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let ini = Ini::load_from_file(path).map_err(|e| match e {
            ini::Error::Io(source) => ConfigError::Io {
                path: path.to_path_buf(),
                source,
            },
            ini::Error::Parse(parse) => ConfigError::Parse {
                path: path.to_path_buf(),
                message: parse.to_string(),
            },
        })?;
        Self::from_ini(&ini)
    }

    /// Load from the default location.
    pub fn load_default() -> Result<Self, ConfigError> {
        Self::load(&config_file_path())
    }

    /// Parse configuration text.
    pub fn parse(text: &str) -> Result<Self, ConfigError> {
        let ini = Ini::load_from_str(text).map_err(|e| ConfigError::Parse {
            path: PathBuf::from("<string>"),
            message: e.to_string(),
        })?;
        Self::from_ini(&ini)
    }

    fn from_ini(ini: &Ini) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let s = Section::new(ini, "sender");
        let sender = SenderConfig {
            enabled: s.bool("enabled", defaults.sender.enabled)?,
            host: s.string("host", &defaults.sender.host),
            port: s.parse("port", defaults.sender.port)?,
        };

        let s = Section::new(ini, "receiver");
        let receiver = ReceiverConfig {
            enabled: s.bool("enabled", defaults.receiver.enabled)?,
            port: s.parse("port", defaults.receiver.port)?,
        };

        let s = Section::new(ini, "broadcast");
        let broadcast = BroadcastConfig {
            enabled: s.bool("enabled", defaults.broadcast.enabled)?,
            targets: s.targets("targets", defaults.broadcast.targets)?,
            left_margin: s.parse("left_margin", defaults.broadcast.left_margin)?,
            right_margin: s.parse("right_margin", defaults.broadcast.right_margin)?,
            queued: s.bool("queued", defaults.broadcast.queued)?,
            queue_capacity: s.parse("queue_capacity", defaults.broadcast.queue_capacity)?,
        };

        let s = Section::new(ini, "tracking");
        let d = &defaults.tracking;
        let tracking = TrackingConfig {
            person_tracking: s.bool("person_tracking", d.person_tracking)?,
            correlation_point: s.parse("correlation_point", d.correlation_point)?,
            correlation_region: s.parse("correlation_region", d.correlation_region)?,
            region_correlation: s.bool("region_correlation", d.region_correlation)?,
            smoothing: s.parse("smoothing", d.smoothing)?,
            radius_click: s.parse("radius_click", d.radius_click)?,
            radius_drag: s.parse("radius_drag", d.radius_drag)?,
            source_slots: s.parse("source_slots", d.source_slots)?,
        };

        let s = Section::new(ini, "sources");
        let sources = SourcesConfig {
            simulated: s.parse("simulated", defaults.sources.simulated)?,
            tick_ms: s.parse("tick_ms", defaults.sources.tick_ms)?,
            blobs_per_source: s.parse("blobs_per_source", defaults.sources.blobs_per_source)?,
        };

        let s = Section::new(ini, "display");
        let display = DisplayConfig {
            width: s.parse("width", defaults.display.width)?,
            height: s.parse("height", defaults.display.height)?,
        };

        let s = Section::new(ini, "logging");
        let logging = LoggingConfig {
            level: s.string("level", &defaults.logging.level),
            directory: s
                .get("directory")
                .map(expand_home)
                .unwrap_or(defaults.logging.directory),
        };

        Ok(Self {
            sender,
            receiver,
            broadcast,
            tracking,
            sources,
            display,
            logging,
        })
    }

    fn to_ini(&self) -> Ini {
        let mut ini = Ini::new();

        ini.with_section(Some("sender"))
            .set("enabled", self.sender.enabled.to_string())
            .set("host", self.sender.host.as_str())
            .set("port", self.sender.port.to_string());

        ini.with_section(Some("receiver"))
            .set("enabled", self.receiver.enabled.to_string())
            .set("port", self.receiver.port.to_string());

        let targets = self
            .broadcast
            .targets
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(",");
        ini.with_section(Some("broadcast"))
            .set("enabled", self.broadcast.enabled.to_string())
            .set("targets", targets)
            .set("left_margin", self.broadcast.left_margin.to_string())
            .set("right_margin", self.broadcast.right_margin.to_string())
            .set("queued", self.broadcast.queued.to_string())
            .set("queue_capacity", self.broadcast.queue_capacity.to_string());

        let t = &self.tracking;
        ini.with_section(Some("tracking"))
            .set("person_tracking", t.person_tracking.to_string())
            .set("correlation_point", t.correlation_point.to_string())
            .set("correlation_region", t.correlation_region.to_string())
            .set("region_correlation", t.region_correlation.to_string())
            .set("smoothing", t.smoothing.to_string())
            .set("radius_click", t.radius_click.to_string())
            .set("radius_drag", t.radius_drag.to_string())
            .set("source_slots", t.source_slots.to_string());

        ini.with_section(Some("sources"))
            .set("simulated", self.sources.simulated.to_string())
            .set("tick_ms", self.sources.tick_ms.to_string())
            .set("blobs_per_source", self.sources.blobs_per_source.to_string());

        ini.with_section(Some("display"))
            .set("width", self.display.width.to_string())
            .set("height", self.display.height.to_string());

        ini.with_section(Some("logging"))
            .set("level", self.logging.level.as_str())
            .set("directory", self.logging.directory.display().to_string());

        ini
    }

    /// Write the complete configuration to `path`, creating parent directories.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let io_error = |source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(io_error)?;
        }
        self.to_ini().write_to_file(path).map_err(io_error)
    }
}

/// Typed reads from one INI section.
struct Section<'a> {
    name: &'static str,
    properties: Option<&'a Properties>,
}

impl<'a> Section<'a> {
    fn new(ini: &'a Ini, name: &'static str) -> Self {
        Self {
            name,
            properties: ini.section(Some(name)),
        }
    }

    fn get(&self, key: &str) -> Option<&'a str> {
        self.properties
            .and_then(|p| p.get(key))
            .map(str::trim)
            .filter(|v| !v.is_empty())
    }

    fn invalid(&self, key: &str, value: &str) -> ConfigError {
        ConfigError::InvalidValue {
            section: self.name.to_string(),
            key: key.to_string(),
            value: value.to_string(),
        }
    }

    fn string(&self, key: &str, default: &str) -> String {
        self.get(key).unwrap_or(default).to_string()
    }

    fn parse<T: FromStr>(&self, key: &str, default: T) -> Result<T, ConfigError> {
        match self.get(key) {
            Some(raw) => raw.parse().map_err(|_| self.invalid(key, raw)),
            None => Ok(default),
        }
    }

    fn bool(&self, key: &str, default: bool) -> Result<bool, ConfigError> {
        match self.get(key) {
            Some(raw) => match raw.to_ascii_lowercase().as_str() {
                "true" | "yes" | "on" | "1" => Ok(true),
                "false" | "no" | "off" | "0" => Ok(false),
                _ => Err(self.invalid(key, raw)),
            },
            None => Ok(default),
        }
    }

    fn targets(
        &self,
        key: &str,
        default: Vec<BroadcastTarget>,
    ) -> Result<Vec<BroadcastTarget>, ConfigError> {
        match self.get(key) {
            Some(raw) => raw
                .split(',')
                .filter(|part| !part.trim().is_empty())
                .map(|part| part.parse().map_err(|_| self.invalid(key, part.trim())))
                .collect(),
            None => Ok(default),
        }
    }
}
