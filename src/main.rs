use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use log::{error, info, warn};

use rusbit_bencode::{
    bvalue_to_json, decode_file, decode_value, decode_with, DecodeOptions, DEFAULT_CONFIG_PATH,
};

#[derive(Parser)]
#[command(name = "rusbit-bencode", version, about = "Decode and validate bencoded data")]
struct Cli {
    /// Decoder options file (TOML). Defaults apply when it does not exist.
    #[arg(long, global = true, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    #[arg(long, global = true)]
    max_depth: Option<usize>,

    /// Reject duplicate and unsorted dictionary keys.
    #[arg(long, global = true)]
    strict_keys: bool,

    /// Reject bytes after the root value.
    #[arg(long, global = true)]
    require_eof: bool,

    /// Reject leading zeros and negative zero.
    #[arg(long, global = true)]
    canonical_integers: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Decode a bencoded string and print it as JSON.
    Decode {
        bencoded: String,

        /// Accept any value at the root, not just a dictionary.
        #[arg(long)]
        any_root: bool,
    },
    /// Decode each file and report whether it is well formed.
    Validate {
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
}

impl Cli {
    fn options(&self) -> Result<DecodeOptions> {
        let mut options = DecodeOptions::load_or_default(&self.config)
            .with_context(|| format!("loading {}", self.config.display()))?;
        if let Some(max_depth) = self.max_depth {
            options.max_depth = max_depth;
        }
        options.strict_keys |= self.strict_keys;
        options.require_eof |= self.require_eof;
        options.canonical_integers |= self.canonical_integers;
        Ok(options)
    }
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    match run(&cli) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(err) => {
            error!("{:#}", err);
            ExitCode::FAILURE
        }
    }
}

/// Returns whether every input decoded cleanly.
fn run(cli: &Cli) -> Result<bool> {
    let options = cli.options()?;

    match &cli.command {
        Command::Decode { bencoded, any_root } => {
            let input = bencoded.as_bytes();
            let decoded = if *any_root {
                decode_value(input, &options)
            } else {
                decode_with(input, &options)
            };
            let value = decoded.context("decoding argument")?;
            println!("{}", serde_json::to_string(&bvalue_to_json(&value))?);
            Ok(true)
        }
        Command::Validate { files } => {
            let mut failed = 0usize;
            for path in files {
                match decode_file(path, &options) {
                    Ok(_) => info!("{}: ok", path.display()),
                    Err(err) => {
                        warn!("{}: {}", path.display(), err);
                        failed += 1;
                    }
                }
            }
            info!("{} of {} files valid", files.len() - failed, files.len());
            Ok(failed == 0)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::OsStr;

    #[test]
    fn test_cli_flags_override_config() {
        let dir = tempfile::tempdir().unwrap();
        let config = dir.path().join("opts.toml");
        std::fs::write(&config, "max_depth = 8\nrequire_eof = true\n").unwrap();

        let cli = Cli::try_parse_from([
            "rusbit-bencode",
            "--config",
            config.to_str().unwrap(),
            "--max-depth",
            "4",
            "--strict-keys",
            "decode",
            "de",
        ])
        .unwrap();
        let options = cli.options().unwrap();
        assert_eq!(options.max_depth, 4);
        assert!(options.strict_keys);
        assert!(options.require_eof);
        assert!(!options.canonical_integers);
    }

    #[test]
    fn test_validate_reports_failures() {
        let dir = tempfile::tempdir().unwrap();
        let good = dir.path().join("good.torrent");
        let bad = dir.path().join("bad.torrent");
        std::fs::write(&good, b"d4:name4:spame").unwrap();
        std::fs::write(&bad, b"d4:name5:spame").unwrap();
        let config = dir.path().join("absent.toml");

        let cli = Cli::try_parse_from([
            OsStr::new("rusbit-bencode"),
            OsStr::new("--config"),
            config.as_os_str(),
            OsStr::new("validate"),
            good.as_os_str(),
        ])
        .unwrap();
        assert!(run(&cli).unwrap());

        let cli = Cli::try_parse_from([
            OsStr::new("rusbit-bencode"),
            OsStr::new("--config"),
            config.as_os_str(),
            OsStr::new("validate"),
            good.as_os_str(),
            bad.as_os_str(),
        ])
        .unwrap();
        assert!(!run(&cli).unwrap());
    }

    #[test]
    fn test_decode_command_root_policy() {
        let dir = tempfile::tempdir().unwrap();
        let config = dir.path().join("absent.toml");
        let config = config.to_str().unwrap();

        let args = ["rusbit-bencode", "--config", config, "decode", "i42e"];
        let cli = Cli::try_parse_from(args).unwrap();
        assert!(run(&cli).is_err());

        let args = ["rusbit-bencode", "--config", config, "decode", "--any-root", "i42e"];
        let cli = Cli::try_parse_from(args).unwrap();
        assert!(run(&cli).unwrap());
    }
}
