use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(
    name = "dawg-reader",
    about = "Read-only reader for double-array DAWG/DAFSA dictionary files",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// Which automaton shape the file was built as. Mirrors the Python
/// original's class hierarchy, collapsed into one tag.
#[derive(Clone, Copy, ValueEnum)]
pub enum KindArg {
    /// Membership only, no payload, no completion support.
    Plain,
    /// Membership only, with a Guide for prefix/key enumeration.
    Completion,
    /// Integer value per key, no completion support.
    Int,
    /// Integer value per key, with a Guide for prefix/key enumeration.
    IntCompletion,
    /// Arbitrary byte-string value(s) per key, base64-encoded in the key suffix.
    Bytes,
    /// Fixed-width tuple value(s) per key, packed per a record format string.
    Record,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Test exact membership of a key
    Contains {
        /// Path to the dictionary file
        file: String,
        /// Key to test
        key: String,
        #[arg(short, long, value_enum, default_value = "plain")]
        kind: KindArg,
    },

    /// Look up the integer value of a key (-1 if absent)
    Find {
        file: String,
        key: String,
        #[arg(short, long, value_enum, default_value = "int")]
        kind: KindArg,
    },

    /// Fetch all payload values stored for a key
    Get {
        file: String,
        key: String,
        #[arg(short, long, value_enum, default_value = "bytes")]
        kind: KindArg,
        /// Record format string, required when --kind record
        #[arg(short, long)]
        format: Option<String>,
    },

    /// List every prefix of `query` that is itself a stored key
    Prefixes {
        file: String,
        query: String,
        #[arg(short, long, value_enum, default_value = "plain")]
        kind: KindArg,
    },

    /// Enumerate every stored key under `prefix` (default: every key)
    Keys {
        file: String,
        #[arg(default_value = "")]
        prefix: String,
        #[arg(short, long, value_enum, default_value = "completion")]
        kind: KindArg,
    },

    /// Enumerate every (key, payload) pair under `prefix`
    Items {
        file: String,
        #[arg(default_value = "")]
        prefix: String,
        #[arg(short, long, value_enum, default_value = "completion")]
        kind: KindArg,
        #[arg(short, long)]
        format: Option<String>,
    },

    /// Enumerate every key reachable from `query` under a replacement table
    Similar {
        file: String,
        query: String,
        /// Replacement pairs as `from=to`, e.g. `e=e-acute`, repeatable
        #[arg(short, long = "replace", value_parser = parse_replace_pair)]
        replace: Vec<(String, String)>,
        #[arg(short, long, value_enum, default_value = "completion")]
        kind: KindArg,
    },

    /// Print the container's image layout (sizes, codec, guide presence)
    Inspect {
        /// Path to dictionary file
        file: String,
    },
}

fn parse_replace_pair(raw: &str) -> Result<(String, String), String> {
    let (from, to) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected `from=to`, got {raw:?}"))?;
    Ok((from.to_string(), to.to_string()))
}
