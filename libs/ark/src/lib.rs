//! # arklet-ark
//!
//! ARK (Archival Resource Key) identifier primitives for the arklet service.
//!
//! ## Design Principles
//!
//! - Identifiers are opaque: names are random draws from a restricted
//!   alphabet, not sequence numbers, so they cannot be enumerated
//! - A single check character detects transcription errors
//! - Parsing is storage-independent and tolerant of both the bare
//!   (`ark:/99999/x4fh2`) and prefixed (`https://host/ark:/99999/x4fh2`)
//!   written forms
//!
//! ## Identifier Format
//!
//! A full ARK is `{naan}{shoulder}{noid}{check}`:
//!
//! - `naan` — numeric Name Assigning Authority Number, e.g. `99999`
//! - `shoulder` — sub-namespace starting with `/`, e.g. `/t2`
//! - `noid` — random betanumeric string, e.g. `x4fh2m9p`
//! - `check` — one betanumeric check character
//!
//! Example: `99999/t2x4fh2m9pb`, written as `ark:/99999/t2x4fh2m9pb`.

mod error;
mod noid;
mod parse;

pub use error::ArkError;
pub use noid::{generate_noid, noid_check_digit, BETANUMERIC};
pub use parse::{format_ark, parse_ark, ParsedArk};
