/*!
UPE project export import.

```no_run
let bytes = std::fs::read("house.upe").unwrap();
let import = upb::upe::parse_upe(&bytes);
for module in &import.document.modules {
    println!("{}: {}", module.module_id, module.label());
}
```
*/

pub mod builder;
pub mod document;
pub mod tokenizer;

pub use builder::{DocumentBuilder, RecordType, RowOutcome, SkippedRow, UpeImport};
pub use document::{ConfigDocument, Contact, Link, Module, SystemInfo};
pub use tokenizer::{Row, RowTokenizer};

use std::io::Read;

/// Import an in-memory export
pub fn parse_upe(data: &[u8]) -> UpeImport {
    DocumentBuilder::new().consume(RowTokenizer::from_bytes(data))
}

/// Import an export from a reader, one row at a time
pub fn parse_upe_reader<R: Read>(reader: R) -> UpeImport {
    DocumentBuilder::new().consume(RowTokenizer::new(reader))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
0,5,3,2,12,D2BD
2,1,\"Evening, All\"
2,2,Away
10,Pat Installer,\"Wiring \"\"Pros\"\"\",1 Main St,Springfield,IL,62701,555-0100,pat@example.com
11,\"Sam
Customer\"
3,10,12,1,5,4,2,1,1,2,1,Kitchen,Island,0
4,0,1,100,3
4,0,2,0,0
6,0,1,32,33,34,35
3,11,12,36,5,4,0,18,6,0,0,Hall,Keypad,1
6,0,2,32,0,0,0
13,0,2,1
18,1,icon.png
3,12,12,2,5,4,1,30,1,1,1,Den,Thermostat,0
14,0,1,2,70
12,0,01020304
1
";

    #[test]
    fn test_full_import() {
        let import = parse_upe(SAMPLE.as_bytes());
        assert!(!import.stopped_early);
        assert!(import.skipped.is_empty(), "{:?}", import.skipped);

        let doc = &import.document;
        let info = doc.system_info.as_ref().unwrap();
        assert_eq!(info.version, 5);
        assert_eq!(info.total_modules, 3);
        assert_eq!(info.network_id, 12);

        assert_eq!(doc.links.len(), 2);
        assert_eq!(doc.link(1).unwrap().name, "Evening, All");

        let installer = doc.installer.as_ref().unwrap();
        assert_eq!(installer.company, "Wiring \"Pros\"");
        assert_eq!(installer.email, "pat@example.com");
        assert_eq!(doc.customer.as_ref().unwrap().name, "Sam\nCustomer");

        assert_eq!(doc.modules.len(), 3);
        let kitchen = doc.module(10).unwrap();
        assert_eq!(kitchen.presets.len(), 2);
        assert_eq!(kitchen.buttons.len(), 1);
        assert_eq!(kitchen.label(), "Kitchen Island");

        let keypad = doc.module(11).unwrap();
        assert_eq!(keypad.buttons.len(), 1);
        assert_eq!(keypad.receive_indicators.len(), 1);

        let den = doc.module(12).unwrap();
        assert_eq!(den.thermostats[0].setpoint, 70);
        assert_eq!(den.memory[0].data, vec![1, 2, 3, 4]);

        assert_eq!(doc.links_for_module(10), vec![1, 2]);
        assert_eq!(doc.links_for_module(12), vec![1]);
    }

    #[test]
    fn test_orphan_child_row_is_skipped() {
        let import = parse_upe(b"0,5,1,0,1,0000\n6,0,1,32,0,0,0\n3,1,1,1,5,4,1,1,1,1,1,A,B,0\n");
        assert_eq!(import.skipped.len(), 1);
        assert_eq!(import.skipped[0].line, Some(2));
        assert!(import.document.modules[0].buttons.is_empty());
    }

    #[test]
    fn test_version_six_stops_after_system_info() {
        let import = parse_upe(b"0,6,1,1,9,FFFF\n2,1,Evening\n3,1,1,1,5,4,1,1,1,1,1,A,B,0\n");
        assert!(import.stopped_early);
        let doc = import.document;
        assert_eq!(doc.system_info.as_ref().map(|s| s.version), Some(6));
        assert!(doc.links.is_empty());
        assert!(doc.modules.is_empty());
    }

    #[test]
    fn test_odd_headers_still_stop() {
        let empty = parse_upe(b"0,6,,,,\n2,1,Evening\n3,1,1,1,5,4,1,1,1,1,1,A,B,0\n");
        assert!(empty.stopped_early);
        assert!(empty.skipped.is_empty());
        assert!(empty.document.links.is_empty());
        assert!(empty.document.modules.is_empty());

        let decimal = parse_upe(b"0,6.0,1,1,1,0000\n2,1,Evening\n");
        assert!(decimal.stopped_early);
        assert!(decimal.document.links.is_empty());
    }

    #[test]
    fn test_reader_entry_point() {
        let import = parse_upe_reader(std::io::Cursor::new(SAMPLE.as_bytes().to_vec()));
        assert_eq!(import, parse_upe(SAMPLE.as_bytes()));
    }
}
