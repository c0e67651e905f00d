/*!
# upbtool

Command-line front end for the UPB codec: imports UPStart `.upe` exports as
JSON and builds or decodes individual UPB packets.

## Usage

### Import a project export
```bash
upbtool import house.upe --output house.json
```

### Build a packet
```bash
upbtool build --link --dest 7 --mdid 0x20
```

### Decode a packet
```bash
upbtool decode "87 00 01 07 FF 20 52"
```
*/

use std::fmt;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use upb::control_word::{ACK_ID, ACK_MESSAGE, ACK_PULSE};
use upb::packet::{self, Packet, TransmitOptions};

mod config;

use config::AppConfig;

#[derive(Parser)]
#[command(name = "upbtool")]
#[command(about = "UPE project import and UPB packet inspection")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path
    #[arg(short, long, default_value = "upbtool.toml")]
    config: PathBuf,
}

#[derive(Subcommand)]
enum Commands {
    /// Import a UPE export and print it as JSON
    Import {
        /// UPE file to read
        file: PathBuf,

        /// Write the JSON document here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Emit compact JSON
        #[arg(long)]
        compact: bool,
    },

    /// Build a packet and print it as hex
    Build(BuildArgs),

    /// Decode a hex packet
    Decode {
        /// Packet bytes as hex; spaces are ignored
        packet: String,
    },

    /// Generate configuration file
    Config {
        /// Output path for configuration file
        #[arg(short, long, default_value = "upbtool.toml")]
        output: PathBuf,
    },
}

#[derive(clap::Args, Debug, Default)]
struct BuildArgs {
    /// Network id (defaults to the configured network)
    #[arg(long, value_parser = parse_byte)]
    network: Option<u8>,

    /// Destination device or link id
    #[arg(long, value_parser = parse_byte)]
    dest: u8,

    /// Source device id (defaults to the configured source)
    #[arg(long, value_parser = parse_byte)]
    source: Option<u8>,

    /// Message data id, e.g. 0x20 for Activate Link
    #[arg(long, value_parser = parse_byte)]
    mdid: u8,

    /// Address a link instead of a device
    #[arg(long)]
    link: bool,

    /// Repeater request (0-3)
    #[arg(long, default_value_t = 0)]
    repeater: u8,

    /// Request an acknowledgement message
    #[arg(long)]
    ack_msg: bool,

    /// Request an ID pulse
    #[arg(long)]
    ack_id: bool,

    /// Request an acknowledgement pulse
    #[arg(long)]
    ack_pulse: bool,

    /// Transmit count (0-3)
    #[arg(long, default_value_t = 0)]
    count: u8,

    /// Transmit sequence (0-3)
    #[arg(long, default_value_t = 0)]
    seq: u8,

    /// Message arguments as hex
    #[arg(long, default_value = "")]
    args: String,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let (config, config_error) = if cli.config.exists() {
        (AppConfig::load_from_file(&cli.config)?, None)
    } else {
        (AppConfig::new(), Some(cli.config.display().to_string()))
    };

    // Logging goes to stderr to keep stdout clean for JSON and hex output
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.output.log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    if let Some(path) = config_error {
        warn!("Config file {} not found, using defaults", path);
    }

    match cli.command {
        Commands::Import { file, output, compact } => {
            run_import(&file, output.as_deref(), config.output.pretty_json && !compact)
        }
        Commands::Build(args) => {
            let bytes = build_packet(&args, &config)?;
            println!("{}", format_hex(&bytes));
            Ok(())
        }
        Commands::Decode { packet: text } => {
            let bytes = parse_hex(&text)?;
            let packet = packet::parse(&bytes).context("Failed to decode packet")?;
            print!("{}", PacketReport(&packet));
            Ok(())
        }
        Commands::Config { output } => generate_config_file(output),
    }
}

/// Import a UPE file and write its JSON document
fn run_import(file: &Path, output: Option<&Path>, pretty: bool) -> Result<()> {
    let data = std::fs::read(file)
        .with_context(|| format!("Failed to read UPE file: {}", file.display()))?;

    let import = upb::parse_upe(&data);
    let doc = &import.document;

    if import.stopped_early {
        warn!("Import stopped at an unsupported export version; the document is partial");
    }
    for skipped in &import.skipped {
        warn!("Dropped row at line {:?} (type {:?}): {}", skipped.line, skipped.tag, skipped.reason);
    }
    info!(
        "Imported {} modules and {} links from {} ({} rows skipped)",
        doc.modules.len(),
        doc.links.len(),
        file.display(),
        import.skipped.len()
    );

    let json = doc.to_json(pretty)?;
    match output {
        Some(path) => {
            std::fs::write(path, json)
                .with_context(|| format!("Failed to write JSON: {}", path.display()))?;
            info!("✅ Wrote {}", path.display());
        }
        None => println!("{}", json),
    }

    Ok(())
}

/// Build packet bytes from command-line arguments
fn build_packet(args: &BuildArgs, config: &AppConfig) -> Result<Vec<u8>> {
    let mut ack_flags = 0;
    if args.ack_msg {
        ack_flags |= ACK_MESSAGE;
    }
    if args.ack_id {
        ack_flags |= ACK_ID;
    }
    if args.ack_pulse {
        ack_flags |= ACK_PULSE;
    }

    let options = TransmitOptions {
        repeater_request: args.repeater,
        ack_flags,
        transmit_count: args.count,
        transmit_sequence: args.seq,
    };
    let network = args.network.unwrap_or(config.network.network_id);
    let source = args.source.unwrap_or(config.network.source_id);
    let arguments = parse_hex(&args.args)?;

    let bytes = if args.link {
        Packet::link_command(network, args.dest, source, args.mdid, &arguments, options)?
    } else {
        Packet::direct_command(network, args.dest, source, args.mdid, &arguments, options)?
    };

    Ok(bytes)
}

/// Human-readable dump of every packet field
struct PacketReport<'a>(&'a Packet);

impl fmt::Display for PacketReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let packet = self.0;
        let cw = &packet.control_word;

        writeln!(f, "Control word:   0x{:04X}", cw.to_u16())?;
        writeln!(f, "  link:         {:?}", cw.link)?;
        writeln!(f, "  repeater:     {}", cw.repeater_request)?;
        writeln!(f, "  length:       {}", cw.length)?;
        writeln!(
            f,
            "  ack:          message={} id={} pulse={}",
            cw.ack_message, cw.ack_id, cw.ack_pulse
        )?;
        writeln!(
            f,
            "  transmit:     count {} sequence {}",
            cw.transmit_count, cw.transmit_sequence
        )?;
        writeln!(f, "Network id:     {}", packet.network_id)?;
        writeln!(f, "Destination id: {}", packet.destination_id)?;
        writeln!(f, "Source id:      {}", packet.source_id)?;
        writeln!(
            f,
            "Message:        0x{:02X} {} ({}, set {} id {})",
            packet.message_data_id,
            packet.message_name(),
            packet.message_set_name(),
            packet.message_set_id(),
            packet.message_id()
        )?;
        if packet.message_arguments.is_empty() {
            writeln!(f, "Arguments:      (none)")?;
        } else {
            writeln!(f, "Arguments:      {}", format_hex(&packet.message_arguments))?;
        }
        writeln!(f, "Checksum:       0x{:02X}", packet.checksum)?;

        match packet.register_report() {
            Some(Ok(report)) => writeln!(
                f,
                "Register report: start 0x{:02X}, values {}",
                report.start_register,
                format_hex(&report.values)
            ),
            Some(Err(err)) => writeln!(f, "Register report: {}", err),
            None => Ok(()),
        }
    }
}

/// Decimal or `0x`-prefixed hex byte
fn parse_byte(s: &str) -> std::result::Result<u8, String> {
    let parsed = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => u8::from_str_radix(hex, 16),
        None => s.parse::<u8>(),
    };
    parsed.map_err(|e| format!("invalid byte {:?}: {}", s, e))
}

fn parse_hex(s: &str) -> Result<Vec<u8>> {
    let compact: String = s.chars().filter(|c| !c.is_whitespace()).collect();
    if compact.len() % 2 != 0 {
        bail!("hex input has an odd number of digits: {:?}", s);
    }
    hex::decode(&compact).with_context(|| format!("Invalid hex input: {:?}", s))
}

fn format_hex(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|b| format!("{:02X}", b))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Generate a default configuration file
fn generate_config_file(output_path: PathBuf) -> Result<()> {
    let config = AppConfig::new();
    config.save_to_file(&output_path)?;

    println!("✅ Generated configuration file: {}", output_path.display());
    println!("📝 Edit the file to customize settings, then run:");
    println!("   upbtool --config {} <command>", output_path.display());

    Ok(())
}
