//! Command-line definitions.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand, ValueEnum};
use keystamp_core::{FieldKind, Platform};

#[derive(Parser)]
#[command(name = "keystamp", version)]
#[command(about = "Locate and patch personalization fields in compiled executables")]
pub struct Cli {
    /// TOML file with default platform and info-file path
    #[arg(
        short,
        long,
        global = true,
        env = "KEYSTAMP_CONFIG",
        default_value = "keystamp.toml"
    )]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Scan an executable and print every field found
    Locate {
        exe: PathBuf,
        #[arg(short, long)]
        platform: Option<Platform>,
        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Scan executables once and write the offsets info file
    Info {
        /// Desktop executable
        #[arg(long)]
        windows: Option<PathBuf>,
        /// Mac universal binary
        #[arg(long)]
        mac: Option<PathBuf>,
        #[arg(short, long, env = "KEYSTAMP_OFFSETS")]
        output: Option<PathBuf>,
    },

    /// Write a new value into a located field
    Patch {
        #[command(subcommand)]
        target: PatchTarget,
    },

    /// Derive a license key from seven seeds
    Keygen {
        /// Six seeds in 0..=31 followed by one in 0..=15
        #[arg(num_args = 7, required = true)]
        seeds: Vec<u32>,
        /// Also print the intermediate slot table
        #[arg(long)]
        table: bool,
    },

    /// Read back the current contents of every known field
    Inspect {
        #[command(flatten)]
        target: TargetArgs,
    },

    /// Write a JSON diagnostic of every known offset
    Dump {
        exe: PathBuf,
        #[arg(long, env = "KEYSTAMP_OFFSETS")]
        offsets: Option<PathBuf>,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Display raw bytes of an executable
    Hexdump {
        exe: PathBuf,
        /// File offset (decimal or 0x-prefixed hex)
        offset: String,
        #[arg(short, long, default_value_t = 256)]
        size: usize,
        /// Show ASCII column
        #[arg(long)]
        ascii: bool,
    },
}

/// Executable, platform and offsets shared by commands that use known offsets
#[derive(Args)]
pub struct TargetArgs {
    pub exe: PathBuf,
    #[arg(short, long)]
    pub platform: Option<Platform>,
    #[arg(long, env = "KEYSTAMP_OFFSETS")]
    pub offsets: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum PatchTarget {
    /// Write the license key
    Key {
        #[command(flatten)]
        target: TargetArgs,
        /// Key value in hex
        #[arg(long, conflicts_with = "seeds", required_unless_present = "seeds")]
        key: Option<String>,
        /// Seven comma-separated seeds to derive the key from
        #[arg(long, num_args = 7, value_delimiter = ',')]
        seeds: Option<Vec<u32>>,
    },

    /// Write the title or caption message
    Message {
        #[command(flatten)]
        target: TargetArgs,
        #[arg(long, value_enum)]
        field: MessageField,
        text: String,
    },

    /// Write the expiration date (YYYY-MM-DD)
    Date {
        #[command(flatten)]
        target: TargetArgs,
        date: NaiveDate,
    },

    /// Write the 128x128 splash image
    Image {
        #[command(flatten)]
        target: TargetArgs,
        image: PathBuf,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum MessageField {
    Title,
    Caption,
}

impl From<MessageField> for FieldKind {
    fn from(field: MessageField) -> Self {
        match field {
            MessageField::Title => FieldKind::Title,
            MessageField::Caption => FieldKind::Caption,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_patch_message() {
        let cli = Cli::try_parse_from([
            "keystamp",
            "patch",
            "message",
            "app.exe",
            "--platform",
            "mac-ppc",
            "--field",
            "caption",
            "Licensed to ACME",
        ])
        .unwrap();

        let Command::Patch {
            target: PatchTarget::Message {
                target,
                field,
                text,
            },
        } = cli.command
        else {
            panic!("expected patch message");
        };
        assert_eq!(target.platform, Some(Platform::MacPpc));
        assert_eq!(FieldKind::from(field), FieldKind::Caption);
        assert_eq!(text, "Licensed to ACME");
    }

    #[test]
    fn test_parse_patch_key_seeds() {
        let cli = Cli::try_parse_from([
            "keystamp",
            "patch",
            "key",
            "app.exe",
            "--seeds",
            "4,13,22,18,15,2,1",
        ])
        .unwrap();

        let Command::Patch {
            target: PatchTarget::Key { key, seeds, .. },
        } = cli.command
        else {
            panic!("expected patch key");
        };
        assert!(key.is_none());
        assert_eq!(seeds, Some(vec![4, 13, 22, 18, 15, 2, 1]));
    }

    #[test]
    fn test_parse_patch_key_requires_value() {
        assert!(Cli::try_parse_from(["keystamp", "patch", "key", "app.exe"]).is_err());
    }

    #[test]
    fn test_parse_date() {
        let cli =
            Cli::try_parse_from(["keystamp", "patch", "date", "app.exe", "2030-06-15"]).unwrap();
        let Command::Patch {
            target: PatchTarget::Date { date, .. },
        } = cli.command
        else {
            panic!("expected patch date");
        };
        assert_eq!(date, NaiveDate::from_ymd_opt(2030, 6, 15).unwrap());
    }
}
