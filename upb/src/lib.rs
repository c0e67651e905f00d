/*!
# Universal Powerline Bus codec

Wire-level packet handling for UPB networks and import of UPStart project
exports (`.upe` files).

## Core Types

- [`ControlWord`] - Decomposed 16-bit control word
- [`Packet`] - Decoded UPB packet
- [`RegisterReport`] - Register Values Report payload
- [`ConfigDocument`] - Project configuration from a UPE export

## Modules

- [`checksum`] - Byte sum and checksum arithmetic
- [`control_word`] - Control word packing and unpacking
- [`packet`] - Packet building and parsing
- [`register_report`] - Register report decoding
- [`catalog`] - Message set and message names
- [`upe`] - UPE tokenizer and document builder
- [`error`] - Common error types
*/

pub mod catalog;
pub mod checksum;
pub mod control_word;
pub mod error;
pub mod packet;
pub mod register_report;
pub mod upe;

// Re-export commonly used types
pub use control_word::{ControlWord, LinkType};
pub use error::{Result, UpbError};
pub use packet::{Packet, TransmitOptions};
pub use register_report::RegisterReport;
pub use upe::{parse_upe, parse_upe_reader, ConfigDocument, UpeImport};

/// Version information for the library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Protocol constants
pub mod protocol {
    /// Control word, network id, destination id, source id, message data id
    pub const HEADER_LEN: usize = 6;

    /// Shortest input the packet parser accepts
    pub const MIN_PACKET_LEN: usize = 6;

    /// Longest packet on the wire, checksum included
    pub const MAX_PACKET_LEN: usize = 24;

    /// Most message argument bytes a packet can carry
    pub const MAX_ARGUMENTS: usize = MAX_PACKET_LEN - HEADER_LEN - 1;

    /// The only UPE export version the importer reads past its first row
    pub const UPE_SUPPORTED_VERSION: u32 = 5;
}
