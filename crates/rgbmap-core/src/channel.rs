//! Channel identifiers and channel orders.
//!
//! A channel order describes the memory layout of interleaved output pixels,
//! e.g. `"RGBA"` for Cairo-like surfaces or `"BGRA"`/`"ARGB"` for toolkits
//! that store pixels the other way around. Orders are parsed
//! case-insensitively from strings drawn from `{R, G, B, A}`.
//!
//! ```rust
//! use rgbmap_core::{Channel, ChannelOrder};
//!
//! let order: ChannelOrder = "bgra".parse().unwrap();
//! assert_eq!(order.to_string(), "BGRA");
//! assert_eq!(order.position(Channel::R), Some(2));
//! assert!(order.has_alpha());
//! ```

use std::fmt;
use std::str::FromStr;

use crate::{Error, Result};

/// Maximum number of channels in an order.
pub const MAX_CHANNELS: usize = 4;

/// A single color channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    /// Red
    R,
    /// Green
    G,
    /// Blue
    B,
    /// Alpha (opacity)
    A,
}

impl Channel {
    /// The three color channels in canonical order.
    pub const RGB: [Channel; 3] = [Channel::R, Channel::G, Channel::B];

    /// Parses a case-insensitive channel identifier.
    pub fn from_char(c: char) -> Option<Self> {
        match c.to_ascii_uppercase() {
            'R' => Some(Self::R),
            'G' => Some(Self::G),
            'B' => Some(Self::B),
            'A' => Some(Self::A),
            _ => None,
        }
    }

    /// Returns the upper-case identifier.
    pub fn as_char(self) -> char {
        match self {
            Self::R => 'R',
            Self::G => 'G',
            Self::B => 'B',
            Self::A => 'A',
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

impl TryFrom<char> for Channel {
    type Error = Error;

    fn try_from(c: char) -> Result<Self> {
        Self::from_char(c)
            .ok_or_else(|| Error::invalid_order(c.to_string(), format!("unknown channel '{c}'")))
    }
}

/// Ordered list of 1 to 4 distinct channels.
///
/// Unused slots are always padded with [`Channel::R`] so derived equality
/// only depends on the active prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChannelOrder {
    slots: [Channel; MAX_CHANNELS],
    len: u8,
}

impl ChannelOrder {
    /// `RGB`
    pub const RGB: Self = Self::from_slots([Channel::R, Channel::G, Channel::B, Channel::R], 3);
    /// `BGR`
    pub const BGR: Self = Self::from_slots([Channel::B, Channel::G, Channel::R, Channel::R], 3);
    /// `RGBA`
    pub const RGBA: Self = Self::from_slots([Channel::R, Channel::G, Channel::B, Channel::A], 4);
    /// `BGRA`
    pub const BGRA: Self = Self::from_slots([Channel::B, Channel::G, Channel::R, Channel::A], 4);
    /// `ARGB`
    pub const ARGB: Self = Self::from_slots([Channel::A, Channel::R, Channel::G, Channel::B], 4);

    const fn from_slots(slots: [Channel; MAX_CHANNELS], len: u8) -> Self {
        Self { slots, len }
    }

    /// Parses an order string such as `"RGBA"` (case-insensitive).
    ///
    /// # Errors
    ///
    /// [`Error::InvalidChannelOrder`] if the string is empty, longer than
    /// four characters, repeats a channel, or contains a character outside
    /// `{R, G, B, A}`.
    pub fn parse(order: &str) -> Result<Self> {
        let mut slots = [Channel::R; MAX_CHANNELS];
        let mut len = 0usize;
        for c in order.chars() {
            let ch = Channel::from_char(c)
                .ok_or_else(|| Error::invalid_order(order, format!("unknown channel '{c}'")))?;
            if len == MAX_CHANNELS {
                return Err(Error::invalid_order(order, "more than 4 channels"));
            }
            if slots[..len].contains(&ch) {
                return Err(Error::invalid_order(order, format!("channel '{ch}' repeated")));
            }
            slots[len] = ch;
            len += 1;
        }
        if len == 0 {
            return Err(Error::invalid_order(order, "empty channel order"));
        }
        Ok(Self::from_slots(slots, len as u8))
    }

    /// Number of channels (pixel depth).
    #[inline]
    pub fn len(&self) -> usize {
        self.len as usize
    }

    /// Always `false`; orders hold at least one channel.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Channels in memory order.
    #[inline]
    pub fn channels(&self) -> &[Channel] {
        &self.slots[..self.len()]
    }

    /// Position of `channel` within a pixel, if present.
    #[inline]
    pub fn position(&self, channel: Channel) -> Option<usize> {
        self.channels().iter().position(|&c| c == channel)
    }

    /// Position of `channel`, or [`Error::ChannelNotFound`].
    pub fn index_of(&self, channel: Channel) -> Result<usize> {
        self.position(channel).ok_or_else(|| Error::ChannelNotFound {
            channel: channel.as_char(),
            order: self.to_string(),
        })
    }

    /// Returns `true` if the order includes an alpha channel.
    #[inline]
    pub fn has_alpha(&self) -> bool {
        self.position(Channel::A).is_some()
    }

    /// Positions of each channel of `wanted` within this order.
    pub fn indexes_of(&self, wanted: &ChannelOrder) -> Result<Vec<usize>> {
        wanted.channels().iter().map(|&c| self.index_of(c)).collect()
    }

    /// Positions of R, G and B within this order.
    pub fn rgb_indexes(&self) -> Result<[usize; 3]> {
        Ok([
            self.index_of(Channel::R)?,
            self.index_of(Channel::G)?,
            self.index_of(Channel::B)?,
        ])
    }
}

impl Default for ChannelOrder {
    fn default() -> Self {
        Self::RGB
    }
}

impl FromStr for ChannelOrder {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<&str> for ChannelOrder {
    type Error = Error;

    fn try_from(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for ChannelOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for c in self.channels() {
            write!(f, "{c}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_case_insensitive() {
        assert_eq!(ChannelOrder::parse("rgba").unwrap(), ChannelOrder::RGBA);
        assert_eq!(ChannelOrder::parse("BgR").unwrap(), ChannelOrder::BGR);
        assert_eq!("argb".parse::<ChannelOrder>().unwrap(), ChannelOrder::ARGB);
    }

    #[test]
    fn test_parse_rejects_bad_orders() {
        for bad in ["", "RGBX", "RRG", "RGBAR", "rgb "] {
            let err = ChannelOrder::parse(bad).unwrap_err();
            assert!(err.is_configuration(), "{bad:?} should be rejected");
        }
    }

    #[test]
    fn test_positions() {
        let order = ChannelOrder::ARGB;
        assert_eq!(order.rgb_indexes().unwrap(), [1, 2, 3]);
        assert_eq!(order.index_of(Channel::A).unwrap(), 0);
        assert!(order.has_alpha());
        assert!(!ChannelOrder::RGB.has_alpha());
        assert!(matches!(
            ChannelOrder::RGB.index_of(Channel::A),
            Err(Error::ChannelNotFound { channel: 'A', .. })
        ));
    }

    #[test]
    fn test_indexes_of() {
        let order = ChannelOrder::BGRA;
        assert_eq!(order.indexes_of(&ChannelOrder::RGB).unwrap(), vec![2, 1, 0]);
    }

    #[test]
    fn test_display_roundtrip() {
        for s in ["R", "GA", "BGR", "ARGB"] {
            assert_eq!(ChannelOrder::parse(s).unwrap().to_string(), s);
        }
    }
}
