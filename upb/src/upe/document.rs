/*!
Project configuration reconstructed from a UPE export.

A [`ConfigDocument`] owns every record; each [`Module`] owns the child
records that followed it in the export.
*/

use crate::error::Result;
use serde::{Deserialize, Serialize};

/// Network-wide values from the begin-of-file record
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemInfo {
    pub version: u32,
    pub total_modules: u32,
    pub total_links: u32,
    pub network_id: u8,
    pub network_pass: String,
}

/// Installer or customer contact block
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    pub name: String,
    pub company: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub zip: String,
    pub phone: String,
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Link {
    pub link_id: u8,
    pub name: String,
}

/// Light level and fade rate a receive component applies for a link
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Preset {
    pub component_id: u8,
    pub link_id: u8,
    pub level: u8,
    pub fade_rate: u8,
}

/// Commands a rocker or button transmits per gesture
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClickCommands {
    pub single_click: u8,
    pub double_click: u8,
    pub hold: u8,
    pub release: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rocker {
    pub rocker_id: u8,
    pub link_id: u8,
    #[serde(flatten)]
    pub commands: ClickCommands,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Button {
    pub button_id: u8,
    pub link_id: u8,
    #[serde(flatten)]
    pub commands: ClickCommands,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Input {
    pub input_id: u8,
    pub link_id: u8,
    pub open_command: u8,
    pub close_command: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelInfo {
    pub channel_id: u8,
    pub dim_enabled: bool,
    pub default_fade_rate: u8,
}

/// Virtual home control slot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vhc {
    pub vhc_id: u8,
    pub link_id: u8,
    pub on_command: u8,
    pub off_command: u8,
}

/// Raw setup-register image
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemoryBlock {
    pub start_address: u8,
    pub data: Vec<u8>,
}

/// Keypad indicator LED bound to a link
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReceiveIndicator {
    pub component_id: u8,
    pub link_id: u8,
    pub indicator_mask: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Thermostat {
    pub component_id: u8,
    pub link_id: u8,
    pub mode: u8,
    pub setpoint: u8,
}

/// A UPB device and its child records
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Module {
    pub module_id: u8,
    pub network_id: u8,
    pub product_id: u16,
    pub manufacturer_id: u16,
    pub firmware_major_version: u8,
    pub firmware_minor_version: u8,
    pub device_type: u16,
    pub channels: u8,
    pub transmit_components: u8,
    pub receive_components: u8,
    pub room_name: String,
    pub device_name: String,
    pub packet_type: u8,

    pub presets: Vec<Preset>,
    pub rockers: Vec<Rocker>,
    pub buttons: Vec<Button>,
    pub inputs: Vec<Input>,
    pub channel_info: Vec<ChannelInfo>,
    pub vhcs: Vec<Vhc>,
    pub memory: Vec<MemoryBlock>,
    pub receive_indicators: Vec<ReceiveIndicator>,
    pub thermostats: Vec<Thermostat>,
}

impl Module {
    /// Link ids referenced by any child record, ascending and de-duplicated
    pub fn link_ids(&self) -> Vec<u8> {
        let mut ids: Vec<u8> = self
            .presets
            .iter()
            .map(|p| p.link_id)
            .chain(self.rockers.iter().map(|r| r.link_id))
            .chain(self.buttons.iter().map(|b| b.link_id))
            .chain(self.inputs.iter().map(|i| i.link_id))
            .chain(self.vhcs.iter().map(|v| v.link_id))
            .chain(self.receive_indicators.iter().map(|r| r.link_id))
            .chain(self.thermostats.iter().map(|t| t.link_id))
            .collect();
        ids.sort_unstable();
        ids.dedup();
        ids
    }

    /// Display label in "room device" form
    pub fn label(&self) -> String {
        match (self.room_name.is_empty(), self.device_name.is_empty()) {
            (false, false) => format!("{} {}", self.room_name, self.device_name),
            (true, false) => self.device_name.clone(),
            (false, true) => self.room_name.clone(),
            (true, true) => format!("Module {}", self.module_id),
        }
    }
}

/// The whole imported project
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigDocument {
    pub system_info: Option<SystemInfo>,
    pub installer: Option<Contact>,
    pub customer: Option<Contact>,
    pub links: Vec<Link>,
    pub modules: Vec<Module>,
}

impl ConfigDocument {
    pub fn new() -> Self {
        Self::default()
    }

    /// First module with the given id
    pub fn module(&self, module_id: u8) -> Option<&Module> {
        self.modules.iter().find(|m| m.module_id == module_id)
    }

    /// First link with the given id
    pub fn link(&self, link_id: u8) -> Option<&Link> {
        self.links.iter().find(|l| l.link_id == link_id)
    }

    /// Link ids a module participates in; empty for unknown modules
    pub fn links_for_module(&self, module_id: u8) -> Vec<u8> {
        self.module(module_id).map(Module::link_ids).unwrap_or_default()
    }

    pub fn to_json(&self, pretty: bool) -> Result<String> {
        let json = if pretty {
            serde_json::to_string_pretty(self)?
        } else {
            serde_json::to_string(self)?
        };
        Ok(json)
    }
}
