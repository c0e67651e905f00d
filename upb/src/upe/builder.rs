/*!
Folds tokenized UPE rows into a [`ConfigDocument`].

Child records (presets, rockers, buttons, ...) carry no module id; each one
belongs to the module record that most recently preceded it. The builder
tracks that module as an index into `document.modules`.
*/

use super::document::{
    Button, ChannelInfo, ClickCommands, ConfigDocument, Contact, Input, Link, MemoryBlock,
    Module, Preset, ReceiveIndicator, Rocker, SystemInfo, Thermostat, Vhc,
};
use super::tokenizer::Row;
use crate::error::{Result, UpbError};
use crate::protocol::UPE_SUPPORTED_VERSION;
use tracing::{debug, info, warn};

/// Record type, from the tag in column 0
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordType {
    BeginFile,
    EndFile,
    Link,
    Module,
    Preset,
    Rocker,
    Button,
    Input,
    ChannelInfo,
    Vhc,
    Installer,
    Customer,
    Memory,
    KeypadIndicator,
    Thermostat,
    RoomIcon,
    DeviceIcon,
    Unknown(String),
}

impl RecordType {
    pub fn from_tag(tag: &str) -> Self {
        match tag.trim().parse::<u32>() {
            Ok(0) => Self::BeginFile,
            Ok(1) => Self::EndFile,
            Ok(2) => Self::Link,
            Ok(3) => Self::Module,
            Ok(4) => Self::Preset,
            Ok(5) => Self::Rocker,
            Ok(6) => Self::Button,
            Ok(7) => Self::Input,
            Ok(8) => Self::ChannelInfo,
            Ok(9) => Self::Vhc,
            Ok(10) => Self::Installer,
            Ok(11) => Self::Customer,
            Ok(12) => Self::Memory,
            Ok(13) => Self::KeypadIndicator,
            Ok(14) => Self::Thermostat,
            Ok(18) => Self::RoomIcon,
            Ok(19) => Self::DeviceIcon,
            _ => Self::Unknown(tag.trim().to_string()),
        }
    }

    /// Fewest fields (tag included) a row of this type must carry
    pub fn min_fields(&self) -> Option<usize> {
        match self {
            Self::BeginFile => Some(6),
            Self::Link => Some(3),
            Self::Module => Some(14),
            Self::Preset => Some(5),
            Self::Rocker | Self::Button => Some(7),
            Self::Input => Some(5),
            Self::ChannelInfo => Some(4),
            Self::Vhc => Some(5),
            Self::Memory => Some(3),
            Self::KeypadIndicator => Some(4),
            Self::Thermostat => Some(5),
            Self::EndFile
            | Self::Installer
            | Self::Customer
            | Self::RoomIcon
            | Self::DeviceIcon
            | Self::Unknown(_) => None,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Self::BeginFile => "begin-of-file",
            Self::EndFile => "end-of-file",
            Self::Link => "link",
            Self::Module => "module",
            Self::Preset => "preset",
            Self::Rocker => "rocker",
            Self::Button => "button",
            Self::Input => "input",
            Self::ChannelInfo => "channel info",
            Self::Vhc => "vhc",
            Self::Installer => "installer",
            Self::Customer => "customer",
            Self::Memory => "memory",
            Self::KeypadIndicator => "keypad indicator",
            Self::Thermostat => "thermostat",
            Self::RoomIcon => "room icon",
            Self::DeviceIcon => "device icon",
            Self::Unknown(tag) => tag,
        }
    }
}

/// What the caller should do after a row was applied
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowOutcome {
    Continue,
    /// The export declares an unsupported version; nothing after it is read
    Stop,
}

/// A row left out of the document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedRow {
    /// Starting line of the row, when the tokenizer could report one
    pub line: Option<u64>,
    pub tag: String,
    pub reason: String,
}

/// Result of importing a UPE export
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpeImport {
    pub document: ConfigDocument,
    pub skipped: Vec<SkippedRow>,
    /// True when an unsupported version halted the import
    pub stopped_early: bool,
}

/// Single-pass builder for one export
#[derive(Debug, Default)]
pub struct DocumentBuilder {
    document: ConfigDocument,
    current_module: Option<usize>,
    skipped: Vec<SkippedRow>,
}

impl DocumentBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply one row.
    ///
    /// A row-level problem comes back as [`UpbError::Format`] and leaves the
    /// document unchanged.
    pub fn apply(&mut self, row: &Row) -> Result<RowOutcome> {
        let record = RecordType::from_tag(row.tag());

        // The version gates everything else, the header's own shape included
        if record == RecordType::BeginFile && !self.accept_version(row) {
            return Ok(RowOutcome::Stop);
        }

        if let Some(min) = record.min_fields() {
            if row.len() < min {
                return Err(UpbError::format(format!(
                    "{} record needs at least {} fields, got {}",
                    record.name(),
                    min,
                    row.len()
                )));
            }
        }

        debug!(line = row.line, record = record.name(), "Applying UPE row");

        match record {
            RecordType::BeginFile => {
                self.document.system_info = Some(SystemInfo {
                    version: UPE_SUPPORTED_VERSION,
                    total_modules: row.number(2, "total modules")?,
                    total_links: row.number(3, "total links")?,
                    network_id: row.number(4, "network id")?,
                    network_pass: row.field(5).to_string(),
                });
            }
            RecordType::EndFile => {}
            RecordType::Link => {
                self.document.links.push(Link {
                    link_id: row.number(1, "link id")?,
                    name: row.field(2).to_string(),
                });
            }
            RecordType::Module => {
                self.document.modules.push(parse_module(row)?);
                self.current_module = Some(self.document.modules.len() - 1);
            }
            RecordType::Preset => {
                let preset = Preset {
                    component_id: row.number(1, "component id")?,
                    link_id: row.number(2, "link id")?,
                    level: row.number(3, "level")?,
                    fade_rate: row.number(4, "fade rate")?,
                };
                self.current_module(&record)?.presets.push(preset);
            }
            RecordType::Rocker => {
                let rocker = Rocker {
                    rocker_id: row.number(1, "rocker id")?,
                    link_id: row.number(2, "link id")?,
                    commands: parse_click_commands(row)?,
                };
                self.current_module(&record)?.rockers.push(rocker);
            }
            RecordType::Button => {
                let button = Button {
                    button_id: row.number(1, "button id")?,
                    link_id: row.number(2, "link id")?,
                    commands: parse_click_commands(row)?,
                };
                self.current_module(&record)?.buttons.push(button);
            }
            RecordType::Input => {
                let input = Input {
                    input_id: row.number(1, "input id")?,
                    link_id: row.number(2, "link id")?,
                    open_command: row.number(3, "open command")?,
                    close_command: row.number(4, "close command")?,
                };
                self.current_module(&record)?.inputs.push(input);
            }
            RecordType::ChannelInfo => {
                let channel = ChannelInfo {
                    channel_id: row.number(1, "channel id")?,
                    dim_enabled: row.flag(2, "dim enabled")?,
                    default_fade_rate: row.number(3, "default fade rate")?,
                };
                self.current_module(&record)?.channel_info.push(channel);
            }
            RecordType::Vhc => {
                let vhc = Vhc {
                    vhc_id: row.number(1, "vhc id")?,
                    link_id: row.number(2, "link id")?,
                    on_command: row.number(3, "on command")?,
                    off_command: row.number(4, "off command")?,
                };
                self.current_module(&record)?.vhcs.push(vhc);
            }
            RecordType::Installer => {
                self.document.installer = Some(parse_contact(row));
            }
            RecordType::Customer => {
                self.document.customer = Some(parse_contact(row));
            }
            RecordType::Memory => {
                let raw = row.field(2).trim();
                let block = MemoryBlock {
                    start_address: row.number(1, "start address")?,
                    data: hex::decode(raw).map_err(|e| {
                        UpbError::format(format!("memory data is not valid hex: {}", e))
                    })?,
                };
                self.current_module(&record)?.memory.push(block);
            }
            RecordType::KeypadIndicator => {
                let indicator = ReceiveIndicator {
                    component_id: row.number(1, "component id")?,
                    link_id: row.number(2, "link id")?,
                    indicator_mask: row.number(3, "indicator mask")?,
                };
                self.current_module(&record)?.receive_indicators.push(indicator);
            }
            RecordType::Thermostat => {
                let thermostat = Thermostat {
                    component_id: row.number(1, "component id")?,
                    link_id: row.number(2, "link id")?,
                    mode: row.number(3, "mode")?,
                    setpoint: row.number(4, "setpoint")?,
                };
                self.current_module(&record)?.thermostats.push(thermostat);
            }
            // Icons are not imported
            RecordType::RoomIcon | RecordType::DeviceIcon => {}
            RecordType::Unknown(ref tag) => {
                warn!(line = row.line, "Ignoring unrecognized UPE record type {:?}", tag);
            }
        }

        Ok(RowOutcome::Continue)
    }

    /// Note a row that could not be used and carry on
    pub fn skip(&mut self, line: Option<u64>, tag: &str, err: &UpbError) {
        warn!("Skipping UPE row at line {:?} (type {:?}): {}", line, tag, err);
        self.skipped.push(SkippedRow {
            line,
            tag: tag.to_string(),
            reason: err.to_string(),
        });
    }

    /// Run every row through the builder and finish the import
    pub fn consume<I>(mut self, rows: I) -> UpeImport
    where
        I: IntoIterator<Item = Result<Row>>,
    {
        let mut stopped_early = false;

        for row in rows {
            let row = match row {
                Ok(row) => row,
                Err(err) => {
                    self.skip(None, "", &err);
                    continue;
                }
            };

            match self.apply(&row) {
                Ok(RowOutcome::Continue) => {}
                Ok(RowOutcome::Stop) => {
                    stopped_early = true;
                    break;
                }
                Err(err) => self.skip(Some(row.line), row.tag(), &err),
            }
        }

        self.finish(stopped_early)
    }

    pub fn finish(self, stopped_early: bool) -> UpeImport {
        UpeImport {
            document: self.document,
            skipped: self.skipped,
            stopped_early,
        }
    }

    /// Check the begin-of-file version.
    ///
    /// On anything but the supported version the header is kept on a
    /// best-effort basis (unreadable numbers become 0) and `false` is returned.
    /// A version that is not a number leaves `system_info` unset.
    fn accept_version(&mut self, row: &Row) -> bool {
        let version = match row.number::<u32>(1, "version") {
            Ok(version) if version == UPE_SUPPORTED_VERSION => return true,
            Ok(version) => version,
            Err(err) => {
                info!(line = row.line, "Unreadable UPE version ({}), stopping import", err);
                return false;
            }
        };

        info!(
            "UPE version {} is not supported (expected {}), stopping import",
            version, UPE_SUPPORTED_VERSION
        );
        self.document.system_info = Some(SystemInfo {
            version,
            total_modules: row.number(2, "total modules").unwrap_or_default(),
            total_links: row.number(3, "total links").unwrap_or_default(),
            network_id: row.number(4, "network id").unwrap_or_default(),
            network_pass: row.field(5).to_string(),
        });
        false
    }

    fn current_module(&mut self, record: &RecordType) -> Result<&mut Module> {
        self.current_module
            .and_then(|idx| self.document.modules.get_mut(idx))
            .ok_or_else(|| {
                UpbError::format(format!(
                    "{} record appears before any module record",
                    record.name()
                ))
            })
    }
}

fn parse_module(row: &Row) -> Result<Module> {
    Ok(Module {
        module_id: row.number(1, "module id")?,
        network_id: row.number(2, "network id")?,
        product_id: row.number(3, "product id")?,
        manufacturer_id: row.number(4, "manufacturer id")?,
        firmware_major_version: row.number(5, "firmware major version")?,
        firmware_minor_version: row.number(6, "firmware minor version")?,
        device_type: row.number(7, "device type")?,
        channels: row.number(8, "channels")?,
        transmit_components: row.number(9, "transmit components")?,
        receive_components: row.number(10, "receive components")?,
        room_name: row.field(11).to_string(),
        device_name: row.field(12).to_string(),
        packet_type: row.number(13, "packet type")?,
        presets: Vec::new(),
        rockers: Vec::new(),
        buttons: Vec::new(),
        inputs: Vec::new(),
        channel_info: Vec::new(),
        vhcs: Vec::new(),
        memory: Vec::new(),
        receive_indicators: Vec::new(),
        thermostats: Vec::new(),
    })
}

fn parse_click_commands(row: &Row) -> Result<ClickCommands> {
    Ok(ClickCommands {
        single_click: row.number(3, "single click command")?,
        double_click: row.number(4, "double click command")?,
        hold: row.number(5, "hold command")?,
        release: row.number(6, "release command")?,
    })
}

fn parse_contact(row: &Row) -> Contact {
    Contact {
        name: row.field(1).to_string(),
        company: row.field(2).to_string(),
        address: row.field(3).to_string(),
        city: row.field(4).to_string(),
        state: row.field(5).to_string(),
        zip: row.field(6).to_string(),
        phone: row.field(7).to_string(),
        email: row.field(8).to_string(),
    }
}
