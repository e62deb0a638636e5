//! Symbolic tag names for per-channel attribute storage
//!
//! Each channel's dynamic-variable fields are backed by attributes that
//! are addressed through symbolic dotted tags of the form
//! `HART_<channel>_Data.<field>`, where `<channel>` is the zero-based
//! channel number (instance identifier minus one). The tag for channel
//! instance 4's primary variable is therefore `HART_3_Data.PV`.

use crate::error::{HartError, HartResult};
use regex::Regex;
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

fn tag_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        // Compile-checked by tests; the literal never fails to parse.
        Regex::new(r"^HART_(\d+)_Data\.([A-Za-z_][A-Za-z0-9_]*)$")
            .unwrap_or_else(|e| panic!("invalid tag pattern: {e}"))
    })
}

/// Symbolic dotted tag naming one field of a channel's data object
///
/// Instance identifiers start at 1; callers are responsible for keeping
/// them within the channel range of the device (1..=16 for a 16-channel
/// interface). Out-of-range instances are representable and resolvable.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TagName {
    instance: u32,
    field: String,
}

impl TagName {
    /// Tag for `field` of the channel with the given instance identifier
    pub fn new(instance: u32, field: impl Into<String>) -> Self {
        debug_assert!(instance >= 1, "channel instances are numbered from 1");
        Self {
            instance,
            field: field.into(),
        }
    }

    pub fn instance_id(&self) -> u32 {
        self.instance
    }

    /// Zero-based channel number (instance identifier minus one)
    pub fn channel(&self) -> u32 {
        self.instance.saturating_sub(1)
    }

    pub fn field(&self) -> &str {
        &self.field
    }

    /// Name of the backing data object, without the field part
    pub fn data_name(&self) -> String {
        format!("HART_{}_Data", self.channel())
    }
}

impl fmt::Display for TagName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HART_{}_Data.{}", self.channel(), self.field)
    }
}

impl FromStr for TagName {
    type Err = HartError;

    fn from_str(s: &str) -> HartResult<Self> {
        let captures = tag_pattern()
            .captures(s)
            .ok_or_else(|| HartError::InvalidTag(format!("unrecognized tag format: {s}")))?;
        let channel: u32 = captures[1]
            .parse()
            .map_err(|_| HartError::InvalidTag(format!("channel number out of range: {s}")))?;
        Ok(Self {
            instance: channel + 1,
            field: captures[2].to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_format() {
        let tag = TagName::new(4, "PV");
        assert_eq!(tag.to_string(), "HART_3_Data.PV");
        assert_eq!(tag.channel(), 3);
        assert_eq!(tag.data_name(), "HART_3_Data");
    }

    #[test]
    fn test_tag_parse_round_trip() {
        let tag: TagName = "HART_0_Data.loop_current".parse().unwrap();
        assert_eq!(tag.instance_id(), 1);
        assert_eq!(tag.field(), "loop_current");
        assert_eq!(tag.to_string(), "HART_0_Data.loop_current");
    }

    #[test]
    fn test_tag_parse_rejects_malformed() {
        assert!("HART_x_Data.PV".parse::<TagName>().is_err());
        assert!("HART_3_Data".parse::<TagName>().is_err());
        assert!("Other_3_Data.PV".parse::<TagName>().is_err());
        assert!("HART_3_Data.".parse::<TagName>().is_err());
    }
}
