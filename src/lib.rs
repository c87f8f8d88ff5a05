// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! A read-only reader for the double-array DAWG/DAFSA container format
//! produced by a well-known family of builder libraries.
//!
//! The reader never builds or mutates an automaton; it answers membership,
//! prefix, completion, payload, and fuzzy-replacement queries against an
//! already-serialized file, without loading the whole file into memory.
//!
//! # Architecture
//!
//! ```text
//! ┌────────────┐   ┌─────────┐   ┌───────────┐
//! │ source.rs  │──▶│header.rs│──▶│dictionary │
//! │ (ByteSource│   │(image   │   │  .rs      │
//! │  trait)    │   │ offsets)│   │(walker)   │
//! └────────────┘   └─────────┘   └─────┬─────┘
//!                                       │
//!                        ┌──────────────┼──────────────┐
//!                        ▼              ▼              ▼
//!                  ┌──────────┐  ┌────────────┐  ┌───────────┐
//!                  │ guide.rs │─▶│completer.rs│  │ fuzzy.rs  │
//!                  └──────────┘  └────────────┘  └───────────┘
//!                        │              │              │
//!                        └──────────────┼──────────────┘
//!                                       ▼
//!                              ┌────────────────┐
//!                              │   payload.rs   │
//!                              │ (codec layer)  │
//!                              └───────┬────────┘
//!                                      ▼
//!                               ┌─────────────┐
//!                               │   dawg.rs   │
//!                               │ (façades)   │
//!                               └─────────────┘
//! ```
//!
//! # Usage
//!
//! ```no_run
//! use dawg_reader::{Dawg, Kind};
//!
//! let d = Dawg::open("keys.dawg", Kind::Completion)?;
//! assert!(d.contains(b"foo")?);
//! for key in d.keys(b"fo")? {
//!     println!("{}", String::from_utf8_lossy(&key));
//! }
//! # Ok::<(), dawg_reader::Error>(())
//! ```

pub mod completer;
pub mod dawg;
pub mod dictionary;
pub mod error;
pub mod fuzzy;
pub mod guide;
pub mod header;
pub mod payload;
pub mod source;
pub mod units;

#[doc(hidden)]
pub mod testing;

pub use completer::Completer;
pub use dawg::{Dawg, Kind, Payload};
pub use dictionary::Dictionary;
pub use error::{Error, Result};
pub use fuzzy::ReplaceTable;
pub use guide::Guide;
pub use payload::{FieldType, PayloadCodec, RecordFormat, ByteOrder};
pub use source::{ByteSource, FileSource, MemorySource};
