/*
 * Severity levels and level masks
 *
 * This module handles:
 * - The six independent severities (Trace, Info, Debug, Warning, Error, Fatal)
 * - LevelMask, a bit set selecting which severities a sink accepts
 * - LevelRegistry, the pair of masks for console display and file persistence
 *
 * Levels are not ordered: enabling Error says nothing about Warning. Each level
 * owns one bit of a 6-bit mask and a sink shows a record iff its bit is set.
 */

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{BitOr, BitOrAssign};
use std::str::FromStr;

use crate::error::LogError;

/// Log severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum LogLevel {
    Trace,
    Info,
    Debug,
    Warning,
    Error,
    Fatal,
}

impl LogLevel {
    /// Every level, in bit order
    pub const ALL: [LogLevel; 6] = [
        LogLevel::Trace,
        LogLevel::Info,
        LogLevel::Debug,
        LogLevel::Warning,
        LogLevel::Error,
        LogLevel::Fatal,
    ];

    /// The single mask bit owned by this level
    pub const fn bit(self) -> u32 {
        match self {
            LogLevel::Trace => 1,
            LogLevel::Info => 1 << 1,
            LogLevel::Debug => 1 << 2,
            LogLevel::Warning => 1 << 3,
            LogLevel::Error => 1 << 4,
            LogLevel::Fatal => 1 << 5,
        }
    }

    /// Name written into record headers
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "Trace",
            LogLevel::Info => "Info",
            LogLevel::Debug => "Debug",
            LogLevel::Warning => "Warning",
            LogLevel::Error => "Error",
            LogLevel::Fatal => "Fatal",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LogLevel {
    type Err = LogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "trace" => Ok(LogLevel::Trace),
            "info" => Ok(LogLevel::Info),
            "debug" => Ok(LogLevel::Debug),
            "warn" | "warning" => Ok(LogLevel::Warning),
            "error" => Ok(LogLevel::Error),
            "fatal" => Ok(LogLevel::Fatal),
            _ => Err(LogError::UnknownLevel(s.to_string())),
        }
    }
}

// Separate implementation of Deserialize to handle case-insensitive values
impl<'de> Deserialize<'de> for LogLevel {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(|_| {
            serde::de::Error::unknown_variant(
                &s,
                &["trace", "info", "debug", "warn", "warning", "error", "fatal"],
            )
        })
    }
}

/// Bit set of enabled levels.
///
/// Any `u32` is accepted. Bits outside the six known levels are kept as-is
/// and have no effect, since no call site emits those levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "MaskRepr", into = "u32")]
pub struct LevelMask(u32);

impl LevelMask {
    pub const NONE: LevelMask = LevelMask(0);
    pub const TRACE: LevelMask = LevelMask(LogLevel::Trace.bit());
    pub const INFO: LevelMask = LevelMask(LogLevel::Info.bit());
    pub const DEBUG: LevelMask = LevelMask(LogLevel::Debug.bit());
    pub const WARNING: LevelMask = LevelMask(LogLevel::Warning.bit());
    pub const ERROR: LevelMask = LevelMask(LogLevel::Error.bit());
    pub const FATAL: LevelMask = LevelMask(LogLevel::Fatal.bit());
    pub const ALL: LevelMask = LevelMask(63);

    pub const fn from_bits(bits: u32) -> Self {
        LevelMask(bits)
    }

    pub const fn bits(self) -> u32 {
        self.0
    }

    pub const fn contains(self, level: LogLevel) -> bool {
        self.0 & level.bit() != 0
    }
}

impl From<LogLevel> for LevelMask {
    fn from(level: LogLevel) -> Self {
        LevelMask(level.bit())
    }
}

impl From<u32> for LevelMask {
    fn from(bits: u32) -> Self {
        LevelMask(bits)
    }
}

impl From<LevelMask> for u32 {
    fn from(mask: LevelMask) -> Self {
        mask.0
    }
}

impl BitOr for LevelMask {
    type Output = LevelMask;

    fn bitor(self, rhs: LevelMask) -> LevelMask {
        LevelMask(self.0 | rhs.0)
    }
}

impl BitOr<LogLevel> for LevelMask {
    type Output = LevelMask;

    fn bitor(self, rhs: LogLevel) -> LevelMask {
        LevelMask(self.0 | rhs.bit())
    }
}

impl BitOrAssign for LevelMask {
    fn bitor_assign(&mut self, rhs: LevelMask) {
        self.0 |= rhs.0;
    }
}

impl FromStr for LevelMask {
    type Err = LogError;

    /// Parses `all`, `none`, or a single level name.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "all" => Ok(LevelMask::ALL),
            "none" => Ok(LevelMask::NONE),
            _ => s.parse::<LogLevel>().map(LevelMask::from),
        }
    }
}

// Accepted config shapes: `24`, `"all"`, `["warning", "error"]`
#[derive(Deserialize)]
#[serde(untagged)]
enum MaskRepr {
    Bits(u32),
    Name(String),
    Names(Vec<String>),
}

impl TryFrom<MaskRepr> for LevelMask {
    type Error = LogError;

    fn try_from(repr: MaskRepr) -> Result<Self, Self::Error> {
        match repr {
            MaskRepr::Bits(bits) => Ok(LevelMask(bits)),
            MaskRepr::Name(name) => name.parse(),
            MaskRepr::Names(names) => names
                .iter()
                .try_fold(LevelMask::NONE, |mask, name| -> Result<LevelMask, LogError> {
                    Ok(mask | name.parse::<LevelMask>()?)
                }),
        }
    }
}

/// Which levels go to the console and which go to the session file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelRegistry {
    display: LevelMask,
    persist: LevelMask,
}

impl Default for LevelRegistry {
    fn default() -> Self {
        LevelRegistry {
            display: LevelMask::ALL,
            persist: LevelMask::ALL,
        }
    }
}

impl LevelRegistry {
    pub fn new(display: LevelMask, persist: LevelMask) -> Self {
        LevelRegistry { display, persist }
    }

    pub fn set_display_levels(&mut self, mask: LevelMask) {
        self.display = mask;
    }

    pub fn set_persist_levels(&mut self, mask: LevelMask) {
        self.persist = mask;
    }

    pub fn display_levels(&self) -> LevelMask {
        self.display
    }

    pub fn persist_levels(&self) -> LevelMask {
        self.persist
    }

    pub fn is_displayed(&self, level: LogLevel) -> bool {
        self.display.contains(level)
    }

    pub fn is_persisted(&self, level: LogLevel) -> bool {
        self.persist.contains(level)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_mask_matches_bitwise_and() {
        for bits in 0..64u32 {
            let registry = LevelRegistry::new(LevelMask::from_bits(bits), LevelMask::from_bits(63 ^ bits));
            for level in LogLevel::ALL {
                let set = bits & level.bit() != 0;
                assert_eq!(registry.is_displayed(level), set, "display {bits:#b} {level}");
                assert_eq!(registry.is_persisted(level), !set, "persist {bits:#b} {level}");
            }
        }
    }

    #[test]
    fn test_levels_are_independent() {
        let mut registry = LevelRegistry::default();
        registry.set_display_levels(LevelMask::ERROR);
        assert!(registry.is_displayed(LogLevel::Error));
        assert!(!registry.is_displayed(LogLevel::Warning));
        assert!(!registry.is_displayed(LogLevel::Fatal));
    }

    #[test]
    fn test_default_enables_everything() {
        let registry = LevelRegistry::default();
        assert!(LogLevel::ALL.iter().all(|l| registry.is_displayed(*l) && registry.is_persisted(*l)));
    }

    #[test]
    fn test_unknown_bits_are_inert() {
        let mask = LevelMask::from_bits(0b1100_0000);
        assert!(LogLevel::ALL.iter().all(|l| !mask.contains(*l)));
        assert_eq!(mask.bits(), 0b1100_0000);
    }

    #[test]
    fn test_setter_overwrites_instead_of_accumulating() {
        let mut registry = LevelRegistry::default();
        registry.set_display_levels(LevelMask::INFO);
        registry.set_display_levels(LevelMask::INFO);
        assert_eq!(registry.display_levels(), LevelMask::INFO);
        registry.set_display_levels(LevelMask::FATAL);
        assert!(!registry.is_displayed(LogLevel::Info));
    }

    #[test]
    fn test_all_is_union_of_levels() {
        let union = LogLevel::ALL.iter().fold(LevelMask::NONE, |m, l| m | *l);
        assert_eq!(union, LevelMask::ALL);
    }

    #[test]
    fn test_parse_names() {
        assert_eq!("WARN".parse::<LogLevel>().unwrap(), LogLevel::Warning);
        assert_eq!(" all ".parse::<LevelMask>().unwrap(), LevelMask::ALL);
        assert_eq!("none".parse::<LevelMask>().unwrap(), LevelMask::NONE);
        assert!("verbose".parse::<LevelMask>().is_err());
    }
}
