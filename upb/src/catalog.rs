/*!
Message set and message data id names.

Lookups are total: ids missing from the tables resolve to [`UNKNOWN`].
*/

/// Name returned for ids without a table entry
pub const UNKNOWN: &str = "Unknown";

pub const NULL_COMMAND: u8 = 0x00;
pub const WRITE_ENABLE: u8 = 0x01;
pub const WRITE_PROTECT: u8 = 0x02;
pub const START_SETUP_MODE: u8 = 0x03;
pub const STOP_SETUP_MODE: u8 = 0x04;
pub const GET_SETUP_TIME: u8 = 0x05;
pub const AUTO_ADDRESS: u8 = 0x06;
pub const GET_DEVICE_STATUS: u8 = 0x07;
pub const SET_DEVICE_CONTROL: u8 = 0x08;
pub const ADD_LINK: u8 = 0x0B;
pub const DELETE_LINK: u8 = 0x0C;
pub const TRANSMIT_THIS_MESSAGE: u8 = 0x0D;
pub const DEVICE_RESET: u8 = 0x0E;
pub const GET_DEVICE_SIGNATURE: u8 = 0x0F;
pub const GET_REGISTER_VALUES: u8 = 0x10;
pub const SET_REGISTER_VALUES: u8 = 0x11;

pub const ACTIVATE_LINK: u8 = 0x20;
pub const DEACTIVATE_LINK: u8 = 0x21;
pub const GOTO: u8 = 0x22;
pub const FADE_START: u8 = 0x23;
pub const FADE_STOP: u8 = 0x24;
pub const BLINK: u8 = 0x25;
pub const INDICATE: u8 = 0x26;
pub const TOGGLE: u8 = 0x27;
pub const REPORT_STATE: u8 = 0x30;
pub const STORE_STATE: u8 = 0x31;

pub const ACKNOWLEDGEMENT_RESPONSE: u8 = 0x80;
pub const SETUP_TIME_REPORT: u8 = 0x85;
pub const DEVICE_STATE_REPORT: u8 = 0x86;
pub const DEVICE_STATUS_REPORT: u8 = 0x87;
pub const DEVICE_SIGNATURE_REPORT: u8 = 0x8F;
pub const REGISTER_VALUES_REPORT: u8 = 0x90;
pub const RAM_VALUES_REPORT: u8 = 0x91;
pub const RAW_DATA_REPORT: u8 = 0x92;
pub const HEARTBEAT_REPORT: u8 = 0x93;

/// Indexed by the 3-bit message set id
const MESSAGE_SETS: [&str; 8] = [
    "UPB Core Command",
    "UPB Device Control Command",
    "Reserved",
    "Reserved",
    "UPB Core Report",
    "Reserved",
    "Reserved",
    "Extended Message Set",
];

/// Sorted by id for binary search
const MESSAGES: &[(u8, &str)] = &[
    (NULL_COMMAND, "Null Command"),
    (WRITE_ENABLE, "Write Enable"),
    (WRITE_PROTECT, "Write Protect"),
    (START_SETUP_MODE, "Start Setup Mode"),
    (STOP_SETUP_MODE, "Stop Setup Mode"),
    (GET_SETUP_TIME, "Get Setup Time"),
    (AUTO_ADDRESS, "Auto-Address"),
    (GET_DEVICE_STATUS, "Get Device Status"),
    (SET_DEVICE_CONTROL, "Set Device Control"),
    (ADD_LINK, "Add Link"),
    (DELETE_LINK, "Delete Link"),
    (TRANSMIT_THIS_MESSAGE, "Transmit This Message"),
    (DEVICE_RESET, "Device Reset"),
    (GET_DEVICE_SIGNATURE, "Get Device Signature"),
    (GET_REGISTER_VALUES, "Get Register Values"),
    (SET_REGISTER_VALUES, "Set Register Values"),
    (ACTIVATE_LINK, "Activate Link"),
    (DEACTIVATE_LINK, "Deactivate Link"),
    (GOTO, "Goto"),
    (FADE_START, "Fade Start"),
    (FADE_STOP, "Fade Stop"),
    (BLINK, "Blink"),
    (INDICATE, "Indicate"),
    (TOGGLE, "Toggle"),
    (REPORT_STATE, "Report State"),
    (STORE_STATE, "Store State"),
    (ACKNOWLEDGEMENT_RESPONSE, "Acknowledgement Response"),
    (SETUP_TIME_REPORT, "Setup Time Report"),
    (DEVICE_STATE_REPORT, "Device State Report"),
    (DEVICE_STATUS_REPORT, "Device Status Report"),
    (DEVICE_SIGNATURE_REPORT, "Device Signature Report"),
    (REGISTER_VALUES_REPORT, "Register Values Report"),
    (RAM_VALUES_REPORT, "RAM Values Report"),
    (RAW_DATA_REPORT, "Raw Data Report"),
    (HEARTBEAT_REPORT, "Heartbeat Report"),
];

/// Name of a message set. Only the low 3 bits of `set_id` are meaningful;
/// larger values are unknown.
pub fn message_set_name(set_id: u8) -> &'static str {
    MESSAGE_SETS.get(set_id as usize).copied().unwrap_or(UNKNOWN)
}

/// Name of a full message data id (set and message bits)
pub fn message_name(message_data_id: u8) -> &'static str {
    MESSAGES
        .binary_search_by_key(&message_data_id, |&(id, _)| id)
        .map(|idx| MESSAGES[idx].1)
        .unwrap_or(UNKNOWN)
}
