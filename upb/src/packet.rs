/*!
UPB packet building and parsing.

Every outbound packet goes through [`build`], including the convenience
constructors on [`Packet`], so length and checksum handling live in one place.

```text
+------+------+-----+------+-----+------+----------------+----------+
| CW hi| CW lo| NID | DID  | SID | MDID | args (0..=17)  | checksum |
+------+------+-----+------+-----+------+----------------+----------+
```
*/

use crate::catalog;
use crate::checksum;
use crate::control_word::{self, ControlWord};
use crate::error::{Result, UpbError};
use crate::protocol::{HEADER_LEN, MAX_PACKET_LEN, MIN_PACKET_LEN};
use crate::register_report::RegisterReport;
use serde::{Deserialize, Serialize};

/// Compose a complete packet.
///
/// The length bits of `control_word` are overwritten with the actual packet
/// size; all other bits are kept as given.
pub fn build(
    control_word: u16,
    network_id: u8,
    destination_id: u8,
    source_id: u8,
    message_data_id: u8,
    message_arguments: &[u8],
) -> Result<Vec<u8>> {
    let total_length = HEADER_LEN + message_arguments.len() + 1;
    if total_length > MAX_PACKET_LEN {
        return Err(UpbError::Length {
            length: total_length,
            max: MAX_PACKET_LEN,
        });
    }

    let word = control_word::with_length(control_word, total_length);

    let mut bytes = Vec::with_capacity(total_length);
    bytes.extend_from_slice(&word.to_be_bytes());
    bytes.push(network_id);
    bytes.push(destination_id);
    bytes.push(source_id);
    bytes.push(message_data_id);
    bytes.extend_from_slice(message_arguments);
    bytes.push(checksum::checksum(&bytes));

    Ok(bytes)
}

/// Decompose and validate a received packet.
///
/// The length field inside the control word is not cross-checked against
/// `data.len()`; a zero byte sum is the integrity guarantee.
pub fn parse(data: &[u8]) -> Result<Packet> {
    if data.len() < MIN_PACKET_LEN {
        return Err(UpbError::format(format!(
            "packet too short: expected at least {} bytes, got {}",
            MIN_PACKET_LEN,
            data.len()
        )));
    }

    let sum = checksum::sum(data);
    if sum != 0 {
        return Err(UpbError::Checksum { sum });
    }

    let message_arguments = data
        .get(HEADER_LEN..data.len() - 1)
        .unwrap_or(&[])
        .to_vec();

    Ok(Packet {
        control_word: ControlWord::decode(u16::from_be_bytes([data[0], data[1]])),
        network_id: data[2],
        destination_id: data[3],
        source_id: data[4],
        message_data_id: data[5],
        message_arguments,
        checksum: data[data.len() - 1],
    })
}

/// Control-word fields other than addressing mode and length
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TransmitOptions {
    pub repeater_request: u8,
    /// Subset of [`control_word::ACK_MASK`]
    pub ack_flags: u8,
    pub transmit_count: u8,
    pub transmit_sequence: u8,
}

/// Decoded view of a UPB packet
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Packet {
    pub control_word: ControlWord,
    pub network_id: u8,
    pub destination_id: u8,
    pub source_id: u8,
    pub message_data_id: u8,
    pub message_arguments: Vec<u8>,
    pub checksum: u8,
}

impl Packet {
    /// Build a packet addressed to a link (scene)
    pub fn link_command(
        network_id: u8,
        link_id: u8,
        source_id: u8,
        message_data_id: u8,
        arguments: &[u8],
        options: TransmitOptions,
    ) -> Result<Vec<u8>> {
        Self::command(1, network_id, link_id, source_id, message_data_id, arguments, options)
    }

    /// Build a packet addressed to a single device
    pub fn direct_command(
        network_id: u8,
        destination_id: u8,
        source_id: u8,
        message_data_id: u8,
        arguments: &[u8],
        options: TransmitOptions,
    ) -> Result<Vec<u8>> {
        Self::command(0, network_id, destination_id, source_id, message_data_id, arguments, options)
    }

    fn command(
        link: u8,
        network_id: u8,
        destination_id: u8,
        source_id: u8,
        message_data_id: u8,
        arguments: &[u8],
        options: TransmitOptions,
    ) -> Result<Vec<u8>> {
        let word = control_word::encode(
            link,
            options.repeater_request,
            options.ack_flags,
            options.transmit_count,
            options.transmit_sequence,
        )?;
        build(word, network_id, destination_id, source_id, message_data_id, arguments)
    }

    /// Re-emit this packet; the length field and checksum are recomputed
    pub fn encode(&self) -> Result<Vec<u8>> {
        build(
            self.control_word.to_u16(),
            self.network_id,
            self.destination_id,
            self.source_id,
            self.message_data_id,
            &self.message_arguments,
        )
    }

    /// Top 3 bits of the message data id
    pub fn message_set_id(&self) -> u8 {
        self.message_data_id >> 5
    }

    /// Low 5 bits of the message data id
    pub fn message_id(&self) -> u8 {
        self.message_data_id & 0x1F
    }

    pub fn message_set_name(&self) -> &'static str {
        catalog::message_set_name(self.message_set_id())
    }

    pub fn message_name(&self) -> &'static str {
        catalog::message_name(self.message_data_id)
    }

    /// Total wire length of this packet
    pub fn wire_len(&self) -> usize {
        HEADER_LEN + self.message_arguments.len() + 1
    }

    /// Decode the arguments as a register report.
    ///
    /// Returns `None` unless this is a Register Values Report.
    pub fn register_report(&self) -> Option<Result<RegisterReport>> {
        if self.message_data_id != catalog::REGISTER_VALUES_REPORT {
            return None;
        }
        Some(RegisterReport::decode(&self.message_arguments))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::control_word::{LinkType, ACK_ID, ACK_MESSAGE};

    #[test]
    fn test_build_activate_link() {
        let word = control_word::encode(1, 0, 0, 0, 0).unwrap();
        let bytes = build(word, 0x01, 0x01, 0xFF, 0x20, &[]).unwrap();
        assert_eq!(bytes, vec![0x87, 0x00, 0x01, 0x01, 0xFF, 0x20, 0x58]);
        assert!(checksum::verify(&bytes));
    }

    #[test]
    fn test_build_parse_roundtrip() {
        let word = control_word::encode(0, 2, ACK_MESSAGE | ACK_ID, 1, 3).unwrap();
        let args = [0x64, 0x05, 0x10];
        let bytes = build(word, 0xC3, 0x22, 0xFE, 0x22, &args).unwrap();
        assert_eq!(bytes.len(), 10);

        let packet = parse(&bytes).unwrap();
        assert_eq!(packet.network_id, 0xC3);
        assert_eq!(packet.destination_id, 0x22);
        assert_eq!(packet.source_id, 0xFE);
        assert_eq!(packet.message_data_id, 0x22);
        assert_eq!(packet.message_arguments, args);
        assert_eq!(packet.control_word.link, LinkType::Direct);
        assert_eq!(packet.control_word.repeater_request, 2);
        assert_eq!(packet.control_word.length, 10);
        assert!(packet.control_word.ack_message);
        assert!(packet.control_word.ack_id);
        assert!(!packet.control_word.ack_pulse);
        assert_eq!(packet.control_word.transmit_count, 1);
        assert_eq!(packet.control_word.transmit_sequence, 3);
        assert_eq!(packet.wire_len(), 10);
    }

    #[test]
    fn test_length_bits_overwritten() {
        // Caller-supplied length bits are ignored
        let bytes = build(0x1F00, 1, 2, 3, 0x00, &[]).unwrap();
        assert_eq!(bytes[0], 0x07);
        assert_eq!(bytes[1], 0x00);
    }

    #[test]
    fn test_build_length_limit() {
        let max_args = [0u8; crate::protocol::MAX_ARGUMENTS];
        let bytes = build(0, 1, 2, 3, 0x11, &max_args).unwrap();
        assert_eq!(bytes.len(), 24);
        assert_eq!(ControlWord::decode(u16::from_be_bytes([bytes[0], bytes[1]])).length, 24);

        let too_many = [0u8; crate::protocol::MAX_ARGUMENTS + 1];
        assert!(matches!(
            build(0, 1, 2, 3, 0x11, &too_many),
            Err(UpbError::Length { length: 25, max: 24 })
        ));
        assert!(matches!(
            build(0, 1, 2, 3, 0x11, &[0u8; 19]),
            Err(UpbError::Length { .. })
        ));
    }

    #[test]
    fn test_parse_too_short() {
        assert!(matches!(parse(&[]), Err(UpbError::Format(_))));
        assert!(matches!(parse(&[0x00; 5]), Err(UpbError::Format(_))));
    }

    #[test]
    fn test_parse_six_bytes_has_no_arguments() {
        let data = [0x06, 0x00, 0x01, 0x02, 0x03, 0xF4];
        let packet = parse(&data).unwrap();
        assert!(packet.message_arguments.is_empty());
        assert_eq!(packet.checksum, 0xF4);
    }

    #[test]
    fn test_parse_rejects_corrupted_byte() {
        let word = control_word::encode(0, 0, 0, 0, 0).unwrap();
        let bytes = build(word, 1, 10, 255, 0x22, &[0x32, 0x00]).unwrap();

        for i in 0..bytes.len() {
            let mut corrupted = bytes.clone();
            corrupted[i] = corrupted[i].wrapping_add(1);
            assert!(matches!(parse(&corrupted), Err(UpbError::Checksum { sum: 1 })));
        }
    }

    #[test]
    fn test_message_set_and_id() {
        let word = control_word::encode(0, 0, 0, 0, 0).unwrap();
        let bytes = build(word, 1, 2, 3, 0x86, &[0x64]).unwrap();
        let packet = parse(&bytes).unwrap();
        assert_eq!(packet.message_set_id(), 4);
        assert_eq!(packet.message_id(), 6);
        assert_eq!(packet.message_set_name(), "UPB Core Report");
        assert_eq!(packet.message_name(), "Device State Report");
    }

    #[test]
    fn test_encode_reproduces_wire_bytes() {
        let mut bytes = vec![0x89, 0x90, 0x01, 0x05, 0xFF, 0x22, 0x64, 0x00];
        bytes.push(checksum::checksum(&bytes));

        let packet = parse(&bytes).unwrap();
        assert!(packet.control_word.reserved);
        assert_eq!(packet.encode().unwrap(), bytes);
    }

    #[test]
    fn test_link_and_direct_commands() {
        let options = TransmitOptions {
            transmit_count: 2,
            ..Default::default()
        };
        let link = parse(&Packet::link_command(1, 7, 255, 0x20, &[], options).unwrap()).unwrap();
        assert_eq!(link.control_word.link, LinkType::Link);
        assert_eq!(link.destination_id, 7);
        assert_eq!(link.control_word.transmit_count, 2);

        let direct =
            parse(&Packet::direct_command(1, 9, 255, 0x22, &[100, 3], TransmitOptions::default()).unwrap())
                .unwrap();
        assert_eq!(direct.control_word.link, LinkType::Direct);
        assert_eq!(direct.message_arguments, vec![100, 3]);

        let bad = TransmitOptions {
            repeater_request: 4,
            ..Default::default()
        };
        assert!(matches!(
            Packet::link_command(1, 7, 255, 0x20, &[], bad),
            Err(UpbError::Range { .. })
        ));
    }

    #[test]
    fn test_register_report_only_for_register_values() {
        let word = control_word::encode(0, 0, 0, 0, 0).unwrap();
        let bytes = build(word, 1, 255, 12, 0x90, &[0x10, 0x01, 0x02]).unwrap();
        let report = parse(&bytes).unwrap().register_report().unwrap().unwrap();
        assert_eq!(report.start_register, 0x10);
        assert_eq!(report.values, vec![0x01, 0x02]);

        let bytes = build(word, 1, 255, 12, 0x86, &[0x10]).unwrap();
        assert!(parse(&bytes).unwrap().register_report().is_none());
    }
}
