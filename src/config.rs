//! Controller configuration
//!
//! Which strips are wired where, which pattern commands exist at boot, and
//! how the console loop is paced. Nothing here is persisted; the device
//! starts from [`ControllerConfig::default`] on every boot and the host
//! simulator may load a JSON file instead.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::patterns::PatternKind;
use crate::strip::ColorOrder;

/// One physical strip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StripConfig {
    /// GPIO carrying the WS2812 data signal.
    pub pin: u8,
    pub num_pixels: u16,
    #[serde(default)]
    pub order: ColorOrder,
}

/// A pattern command registered at start-up.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandSpec {
    /// Name typed on the console (exact match).
    pub name: String,
    pub kind: PatternKind,
    /// Index into [`ControllerConfig::strips`].
    #[serde(default)]
    pub strip: usize,
}

impl CommandSpec {
    pub fn new(name: &str, kind: PatternKind, strip: usize) -> Self {
        Self {
            name: name.to_owned(),
            kind,
            strip,
        }
    }
}

/// Top-level controller configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControllerConfig {
    pub strips: Vec<StripConfig>,
    pub commands: Vec<CommandSpec>,
    /// Serve loop period (milliseconds)
    pub poll_interval_ms: u32,
    /// Write received bytes back to the console
    pub echo_input: bool,
    /// Seed for the random patterns; `None` seeds from uptime
    pub rng_seed: Option<u32>,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            // Two 144-pixel WS2812 strips
            strips: vec![
                StripConfig {
                    pin: 16,
                    num_pixels: 144,
                    order: ColorOrder::Grb,
                },
                StripConfig {
                    pin: 19,
                    num_pixels: 144,
                    order: ColorOrder::Grb,
                },
            ],
            commands: vec![
                CommandSpec::new("range0", PatternKind::Range, 0),
                CommandSpec::new("range1", PatternKind::Range, 1),
                CommandSpec::new("random", PatternKind::Random, 0),
                CommandSpec::new("randomog", PatternKind::RandomOg, 1),
                CommandSpec::new("left", PatternKind::Turn, 0),
                CommandSpec::new("right", PatternKind::Turn, 1),
                CommandSpec::new("meter", PatternKind::Meter, 0),
            ],
            poll_interval_ms: 1,
            echo_input: false,
            rng_seed: None,
        }
    }
}

impl ControllerConfig {
    /// Reject configurations the controller cannot start with.
    pub fn validate(&self) -> Result<()> {
        if self.strips.is_empty() {
            return Err(Error::Config("no strips configured"));
        }
        if self.strips.iter().any(|s| s.num_pixels == 0) {
            return Err(Error::Config("strip with zero pixels"));
        }
        if self.poll_interval_ms == 0 {
            return Err(Error::Config("poll interval must be at least 1 ms"));
        }
        for cmd in &self.commands {
            if cmd.name.is_empty() {
                return Err(Error::Config("empty command name"));
            }
            if cmd.strip >= self.strips.len() {
                return Err(Error::Config("command refers to unknown strip"));
            }
        }
        Ok(())
    }

    /// Parse and validate a JSON document.
    pub fn from_json(text: &str) -> anyhow::Result<Self> {
        let cfg: Self = serde_json::from_str(text)?;
        cfg.validate()?;
        Ok(cfg)
    }
}
