//! Register Values Report payloads.

use crate::error::{Result, UpbError};
use serde::{Deserialize, Serialize};

/// A run of register values starting at `start_register`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterReport {
    pub start_register: u8,
    pub values: Vec<u8>,
}

impl RegisterReport {
    /// Decode a report from a packet's message arguments
    pub fn decode(payload: &[u8]) -> Result<Self> {
        let (&start_register, values) = payload
            .split_first()
            .ok_or_else(|| UpbError::format("register report payload is empty"))?;

        Ok(Self {
            start_register,
            values: values.to_vec(),
        })
    }

    /// Value of an absolute register address, if it falls inside the run
    pub fn value_at(&self, register: u8) -> Option<u8> {
        let offset = register.checked_sub(self.start_register)?;
        self.values.get(offset as usize).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_report() {
        let report = RegisterReport::decode(&[0x20, 0xAA, 0xBB, 0xCC]).unwrap();
        assert_eq!(report.start_register, 0x20);
        assert_eq!(report.values, vec![0xAA, 0xBB, 0xCC]);
    }

    #[test]
    fn test_decode_start_only() {
        let report = RegisterReport::decode(&[0x05]).unwrap();
        assert_eq!(report.start_register, 0x05);
        assert!(report.values.is_empty());
    }

    #[test]
    fn test_decode_empty_payload() {
        assert!(matches!(RegisterReport::decode(&[]), Err(UpbError::Format(_))));
    }

    #[test]
    fn test_value_at() {
        let report = RegisterReport::decode(&[0x10, 1, 2, 3]).unwrap();
        assert_eq!(report.value_at(0x10), Some(1));
        assert_eq!(report.value_at(0x12), Some(3));
        assert_eq!(report.value_at(0x13), None);
        assert_eq!(report.value_at(0x0F), None);
    }
}
