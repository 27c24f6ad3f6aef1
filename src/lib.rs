//! `alleleload` is a crate for loading high-throughput gene-knockout cell
//! lines into a genomic registry, resolving each incoming record to an
//! existing allele or minting a new one with correct nomenclature.
//!
//! The crate is organized around one run per provider file:
//!
//! - An [`input::Reader`] yields raw tab-delimited rows, and a
//!   [`provider::Interpreter`] screens and canonicalizes them into
//!   [`record::Record`]s.
//! - A [`resolver::Resolver`] drives each record through the resolution
//!   state machine: a project that owns no allele gets one created (with a
//!   sequence token from [`sequence::Assigner`] and a molecular note from
//!   [`compose`]), a project that owns exactly one allele is reconciled
//!   against it, and a project that owns several is reported for curation.
//! - Everything the run observes lands in a [`report::Report`], rendered
//!   once at the end of [`load::run`].
//!
//! The registry itself sits behind the [`store::Store`] trait;
//! [`store::memory::MemoryStore`] backs the crate's tests.
//!
//! ```
//! use alleleload::config::Config;
//! use alleleload::load;
//! use alleleload::provider::Family;
//! use alleleload::store::memory::MemoryStore;
//!
//! let config = Config::from_reader(
//!     "LOAD_IDENTITY = tal_load\nPIPELINE = EUCOMM\nPROVIDER_LABCODE = Wtsi\n".as_bytes(),
//! )?;
//! let mut store = MemoryStore::new();
//!
//! let rows: Vec<Vec<String>> = Vec::new();
//! let report = load::run(Family::Targeted, &config, &mut store, rows.into_iter().map(Ok))?;
//! println!("{report}");
//!
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]
#![warn(rust_2021_compatibility)]
#![warn(missing_debug_implementations)]
#![warn(clippy::missing_docs_in_private_items)]
#![warn(rustdoc::broken_intra_doc_links)]

pub mod cache;
pub mod compose;
pub mod config;
pub mod input;
pub mod load;
pub mod model;
pub mod provider;
pub mod record;
pub mod report;
pub mod resolver;
pub mod sequence;
pub mod store;

pub use config::Config;
pub use record::Record;
pub use report::Report;
pub use store::Store;
