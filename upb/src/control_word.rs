/*!
Control word (16-bit) packing and unpacking.

The control word leads every UPB packet, big-endian:

```text
 15 | 14-13 | 12-8   | 7        | 6      | 5     | 4        | 3-2   | 1-0
 LNK| REPRQ | LEN    | reserved | ACKMSG | ACKID | ACKPULSE | CNT   | SEQ
```
*/

use crate::error::{Result, UpbError};
use serde::{Deserialize, Serialize};

/// Request an acknowledgement message from the receiver
pub const ACK_MESSAGE: u8 = 0x40;
/// Request an ID pulse from the receiver
pub const ACK_ID: u8 = 0x20;
/// Request an acknowledgement pulse from the receiver
pub const ACK_PULSE: u8 = 0x10;
/// All acknowledgement request bits
pub const ACK_MASK: u8 = ACK_MESSAGE | ACK_ID | ACK_PULSE;

const LINK_BIT: u16 = 0x8000;
const REPEATER_SHIFT: u16 = 13;
const LENGTH_SHIFT: u16 = 8;
const LENGTH_MASK: u16 = 0x1F00;
const RESERVED_BIT: u16 = 0x0080;
const COUNT_SHIFT: u16 = 2;

/// Addressing mode selected by the link bit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[repr(u8)]
pub enum LinkType {
    /// Destination id is a device id
    Direct = 0,
    /// Destination id is a link (scene) id
    Link = 1,
}

impl LinkType {
    /// Parse the link bit from a u8 value
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::Direct),
            1 => Some(Self::Link),
            _ => None,
        }
    }

    /// Check if this addresses a link
    pub fn is_link(self) -> bool {
        matches!(self, Self::Link)
    }
}

/// Decomposed view of a 16-bit control word
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControlWord {
    pub link: LinkType,
    pub repeater_request: u8,
    /// Total packet length in bytes, checksum included
    pub length: u8,
    pub reserved: bool,
    pub ack_message: bool,
    pub ack_id: bool,
    pub ack_pulse: bool,
    pub transmit_count: u8,
    pub transmit_sequence: u8,
}

impl ControlWord {
    /// Split a raw control word into its fields. Never fails.
    pub fn decode(word: u16) -> Self {
        let low = (word & 0xFF) as u8;
        let link = if word & LINK_BIT != 0 {
            LinkType::Link
        } else {
            LinkType::Direct
        };

        Self {
            link,
            repeater_request: ((word >> REPEATER_SHIFT) & 0x3) as u8,
            length: ((word & LENGTH_MASK) >> LENGTH_SHIFT) as u8,
            reserved: word & RESERVED_BIT != 0,
            ack_message: low & ACK_MESSAGE != 0,
            ack_id: low & ACK_ID != 0,
            ack_pulse: low & ACK_PULSE != 0,
            transmit_count: (low >> COUNT_SHIFT) & 0x3,
            transmit_sequence: low & 0x3,
        }
    }

    /// Pack the fields back into the raw 16-bit value.
    ///
    /// Out-of-width field values are masked to their bit width.
    pub fn to_u16(&self) -> u16 {
        let mut word = 0u16;
        if self.link.is_link() {
            word |= LINK_BIT;
        }
        word |= ((self.repeater_request & 0x3) as u16) << REPEATER_SHIFT;
        word |= ((self.length & 0x1F) as u16) << LENGTH_SHIFT;
        if self.reserved {
            word |= RESERVED_BIT;
        }
        word | self.ack_flags() as u16
            | (((self.transmit_count & 0x3) as u16) << COUNT_SHIFT)
            | (self.transmit_sequence & 0x3) as u16
    }

    /// The acknowledgement request bits as a subset of [`ACK_MASK`]
    pub fn ack_flags(&self) -> u8 {
        let mut flags = 0;
        if self.ack_message {
            flags |= ACK_MESSAGE;
        }
        if self.ack_id {
            flags |= ACK_ID;
        }
        if self.ack_pulse {
            flags |= ACK_PULSE;
        }
        flags
    }
}

/// Build a control word with the length field left at zero.
///
/// The packet builder fills in the length once the packet size is known.
pub fn encode(
    link: u8,
    repeater_request: u8,
    ack_flags: u8,
    transmit_count: u8,
    transmit_sequence: u8,
) -> Result<u16> {
    let link = LinkType::from_u8(link).ok_or_else(|| UpbError::range("link", link))?;
    if repeater_request > 3 {
        return Err(UpbError::range("repeater request", repeater_request));
    }
    if ack_flags & !ACK_MASK != 0 {
        return Err(UpbError::range("ack flags", ack_flags));
    }
    if transmit_count > 3 {
        return Err(UpbError::range("transmit count", transmit_count));
    }
    if transmit_sequence > 3 {
        return Err(UpbError::range("transmit sequence", transmit_sequence));
    }

    let mut word = (repeater_request as u16) << REPEATER_SHIFT;
    if link.is_link() {
        word |= LINK_BIT;
    }
    word |= ack_flags as u16;
    word |= (transmit_count as u16) << COUNT_SHIFT;
    word |= transmit_sequence as u16;

    Ok(word)
}

/// Replace the length bits of `word`, leaving every other bit untouched
pub fn with_length(word: u16, length: usize) -> u16 {
    (word & !LENGTH_MASK) | (((length as u16) & 0x1F) << LENGTH_SHIFT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_link_type_parsing() {
        assert_eq!(LinkType::from_u8(0), Some(LinkType::Direct));
        assert_eq!(LinkType::from_u8(1), Some(LinkType::Link));
        assert_eq!(LinkType::from_u8(2), None);
        assert!(LinkType::Link.is_link());
        assert!(!LinkType::Direct.is_link());
    }

    #[test]
    fn test_decode_every_field() {
        // LNK=1 REPRQ=2 LEN=0x0F reserved=1 ACKMSG ACKPULSE CNT=3 SEQ=1
        let cw = ControlWord::decode(0b1_10_01111_1_1_0_1_11_01);
        assert_eq!(cw.link, LinkType::Link);
        assert_eq!(cw.repeater_request, 2);
        assert_eq!(cw.length, 0x0F);
        assert!(cw.reserved);
        assert!(cw.ack_message);
        assert!(!cw.ack_id);
        assert!(cw.ack_pulse);
        assert_eq!(cw.transmit_count, 3);
        assert_eq!(cw.transmit_sequence, 1);
    }

    #[test]
    fn test_decode_to_u16_is_bit_exact() {
        for word in [0x0000u16, 0xFFFF, 0x8704, 0x0A10, 0x1F80, 0x6055] {
            assert_eq!(ControlWord::decode(word).to_u16(), word);
        }
    }

    #[test]
    fn test_encode_decode_roundtrip() {
        for link in 0..=1u8 {
            for repeater in 0..=3u8 {
                for ack in [0, ACK_MESSAGE, ACK_ID | ACK_PULSE, ACK_MASK] {
                    for count in 0..=3u8 {
                        for seq in 0..=3u8 {
                            let word = encode(link, repeater, ack, count, seq).unwrap();
                            let cw = ControlWord::decode(word);
                            assert_eq!(cw.link as u8, link);
                            assert_eq!(cw.repeater_request, repeater);
                            assert_eq!(cw.ack_flags(), ack);
                            assert_eq!(cw.transmit_count, count);
                            assert_eq!(cw.transmit_sequence, seq);
                            assert_eq!(cw.length, 0);
                            assert!(!cw.reserved);
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn test_encode_rejects_out_of_range() {
        assert!(matches!(encode(2, 0, 0, 0, 0), Err(UpbError::Range { field: "link", .. })));
        assert!(matches!(
            encode(0, 4, 0, 0, 0),
            Err(UpbError::Range { field: "repeater request", value: 4 })
        ));
        assert!(matches!(encode(0, 0, 0x01, 0, 0), Err(UpbError::Range { .. })));
        assert!(matches!(encode(0, 0, 0x80, 0, 0), Err(UpbError::Range { .. })));
        assert!(matches!(
            encode(0, 0, 0, 4, 0),
            Err(UpbError::Range { field: "transmit count", .. })
        ));
        assert!(matches!(
            encode(0, 0, 0, 255, 0),
            Err(UpbError::Range { field: "transmit count", .. })
        ));
        assert!(matches!(
            encode(0, 0, 0, 0, 4),
            Err(UpbError::Range { field: "transmit sequence", .. })
        ));
    }

    #[test]
    fn test_with_length_preserves_other_bits() {
        let word = 0xE0FF;
        let updated = with_length(word, 24);
        assert_eq!(updated, 0xF8FF);
        assert_eq!(ControlWord::decode(updated).length, 24);
        assert_eq!(with_length(0xFFFF, 7), 0xE7FF);
    }
}
