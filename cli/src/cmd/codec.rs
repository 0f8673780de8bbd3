use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use voting_codec::{MoveType, hex_to_string, string_to_hex};

use crate::util::{parse_hex, print_json};

/// Encode and decode contract values.
#[derive(Parser)]
pub struct Cmd {
    #[clap(subcommand)]
    cmd: SubCmd,
}

impl Cmd {
    pub fn run(self) -> Result<()> {
        match self.cmd {
            SubCmd::Encode(cmd) => cmd.run(),
            SubCmd::Decode(cmd) => cmd.run(),
            SubCmd::HexToString(cmd) => cmd.run(),
            SubCmd::StringToHex(cmd) => cmd.run(),
        }
    }
}

#[derive(Subcommand)]
enum SubCmd {
    Encode(CmdEncode),
    Decode(CmdDecode),
    HexToString(CmdHexToString),
    StringToHex(CmdStringToHex),
}

/// Encode a value into BCS.
#[derive(Parser)]
struct CmdEncode {
    /// Value type: `u8`, `u64`, `u256`, `bool`, `string`, `address`,
    /// `option<u64>` or `vector<T>`.
    ty: MoveType,

    /// Value text. Vector items are separated by commas,
    /// an absent option is `none`.
    #[clap(allow_hyphen_values = true)]
    value: String,
}

impl CmdEncode {
    fn run(self) -> Result<()> {
        let value = self
            .ty
            .parse_value(&self.value)
            .with_context(|| format!("invalid {} value", self.ty))?;

        print_json(serde_json::json!({
            "type": self.ty.to_string(),
            "value": value,
            "bcs": format!("0x{}", hex::encode(value.to_bytes())),
        }))
    }
}

/// Decode a BCS value.
#[derive(Parser)]
struct CmdDecode {
    /// Value type, same as for `encode`.
    ty: MoveType,

    /// Hex-encoded BCS bytes.
    bcs: String,
}

impl CmdDecode {
    fn run(self) -> Result<()> {
        let bytes = parse_hex(&self.bcs).context("invalid hex")?;
        let value = self
            .ty
            .decode(&bytes)
            .with_context(|| format!("invalid {} value", self.ty))?;

        print_json(serde_json::json!({
            "type": self.ty.to_string(),
            "value": value,
        }))
    }
}

/// Render a hex value returned by the chain.
#[derive(Parser)]
struct CmdHexToString {
    hex: String,

    /// Value type. Anything but `String` is treated as a number.
    #[clap(long = "type", default_value = "String")]
    ty: String,
}

impl CmdHexToString {
    fn run(self) -> Result<()> {
        print_json(hex_to_string(&self.hex, &self.ty))
    }
}

/// Hex-encode UTF-8 text.
#[derive(Parser)]
struct CmdStringToHex {
    text: String,
}

impl CmdStringToHex {
    fn run(self) -> Result<()> {
        print_json(string_to_hex(&self.text))
    }
}
