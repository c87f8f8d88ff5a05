// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! `dawg-reader` CLI: inspect and query double-array DAWG/DAFSA
//! dictionary files without ever loading one into a mutable in-memory
//! trie.
//!
//! ```bash
//! # Exact membership
//! dawg-reader contains keys.dawg foo --kind completion
//!
//! # Integer lookup
//! dawg-reader find ints.dawg foo --kind int
//!
//! # Key enumeration under a prefix
//! dawg-reader keys keys.dawg fo
//!
//! # Fuzzy lookup under a replacement table
//! dawg-reader similar keys.dawg foo --replace o=0
//!
//! # Inspect the binary layout
//! dawg-reader inspect keys.dawg
//! ```

use clap::Parser;

mod cli;
use cli::{Cli, Commands, KindArg};

use dawg_reader::header::DictionaryImage;
use dawg_reader::payload::RecordFormat;
use dawg_reader::{Dawg, Error, Kind, MemorySource, Payload, ReplaceTable, Result};

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Contains { file, key, kind } => run_contains(&file, &key, resolve_kind(kind, None)),
        Commands::Find { file, key, kind } => run_find(&file, &key, resolve_kind(kind, None)),
        Commands::Get {
            file,
            key,
            kind,
            format,
        } => run_get(&file, &key, resolve_kind(kind, format.as_deref())),
        Commands::Prefixes { file, query, kind } => {
            run_prefixes(&file, &query, resolve_kind(kind, None))
        }
        Commands::Keys { file, prefix, kind } => run_keys(&file, &prefix, resolve_kind(kind, None)),
        Commands::Items {
            file,
            prefix,
            kind,
            format,
        } => run_items(&file, &prefix, resolve_kind(kind, format.as_deref())),
        Commands::Similar {
            file,
            query,
            replace,
            kind,
        } => run_similar(&file, &query, &replace, resolve_kind(kind, None)),
        Commands::Inspect { file } => run_inspect(&file),
    };

    if let Err(e) = result {
        eprintln!("dawg-reader: {e}");
        std::process::exit(1);
    }
}

fn resolve_kind(arg: KindArg, format: Option<&str>) -> Result<Kind> {
    Ok(match arg {
        KindArg::Plain => Kind::Plain,
        KindArg::Completion => Kind::Completion,
        KindArg::Int => Kind::Int,
        KindArg::IntCompletion => Kind::IntCompletion,
        KindArg::Bytes => Kind::Bytes,
        KindArg::Record => {
            let format = format.ok_or_else(|| {
                Error::MalformedFile {
                    image: "cli",
                    detail: "--kind record requires --format".to_string(),
                }
            })?;
            Kind::Record(RecordFormat::parse(format)?)
        }
    })
}

fn run_contains(file: &str, key: &str, kind: Result<Kind>) -> Result<()> {
    let dawg = Dawg::open(file, kind?)?;
    println!("{}", dawg.contains(key.as_bytes())?);
    Ok(())
}

fn run_find(file: &str, key: &str, kind: Result<Kind>) -> Result<()> {
    let dawg = Dawg::open(file, kind?)?;
    println!("{}", dawg.find(key.as_bytes())?);
    Ok(())
}

fn run_get(file: &str, key: &str, kind: Result<Kind>) -> Result<()> {
    let dawg = Dawg::open(file, kind?)?;
    for value in dawg.get(key.as_bytes())? {
        println!("{}", format_payload(&value));
    }
    Ok(())
}

fn run_prefixes(file: &str, query: &str, kind: Result<Kind>) -> Result<()> {
    let dawg = Dawg::open(file, kind?)?;
    for key in dawg.prefixes(query.as_bytes())? {
        println!("{}", String::from_utf8_lossy(&key));
    }
    Ok(())
}

fn run_keys(file: &str, prefix: &str, kind: Result<Kind>) -> Result<()> {
    let dawg = Dawg::open(file, kind?)?;
    for key in dawg.keys(prefix.as_bytes())? {
        println!("{}", String::from_utf8_lossy(&key));
    }
    Ok(())
}

fn run_items(file: &str, prefix: &str, kind: Result<Kind>) -> Result<()> {
    let dawg = Dawg::open(file, kind?)?;
    for (key, value) in dawg.items(prefix.as_bytes())? {
        println!("{}\t{}", String::from_utf8_lossy(&key), format_payload(&value));
    }
    Ok(())
}

fn run_similar(file: &str, query: &str, replace: &[(String, String)], kind: Result<Kind>) -> Result<()> {
    let dawg = Dawg::open(file, kind?)?;
    let pairs: Vec<(&str, &str)> = replace.iter().map(|(f, t)| (f.as_str(), t.as_str())).collect();
    let table = ReplaceTable::compile_str(&pairs)?;
    for key in dawg.similar_keys(query.as_bytes(), &table)? {
        println!("{}", String::from_utf8_lossy(&key));
    }
    Ok(())
}

fn run_inspect(file: &str) -> Result<()> {
    let bytes = std::fs::read(file)?;
    println!("file:       {file}");
    println!("size:       {} bytes", bytes.len());

    let source = MemorySource::new(bytes.clone());
    let image = DictionaryImage::parse(&source, 0)?;
    println!("base_size:  {} cells", image.base_size);
    println!("dict bytes: {}", image.end_offset());

    if bytes.len() as u64 > image.end_offset() {
        println!(
            "trailing:   {} bytes (guide and/or payload-record data)",
            bytes.len() as u64 - image.end_offset()
        );
    }
    Ok(())
}

fn format_payload(payload: &Payload) -> String {
    match payload {
        Payload::None => String::new(),
        Payload::Int(v) => v.to_string(),
        Payload::Bytes(b) => String::from_utf8_lossy(b).into_owned(),
        Payload::Record(fields) => fields
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(","),
    }
}
