// SPDX-License-Identifier: MIT OR Apache-2.0
//! Load-time schema migration for Vellum documents.
//!
//! Given documents freshly deserialized from an older file format plus a
//! snapshot of the schema those files were written with, this crate
//! rewrites the documents in place until they satisfy the current schema,
//! preserving user-visible semantics.
//!
//! ## Architecture
//!
//! - An ordered [`registry`](crate::registry) of transform blocks, each
//!   gated on the document's stored [`VersionTag`](vellum_document::VersionTag)
//!   so it runs at most once per load.
//! - A [`StructOracle`](crate::schema::StructOracle) answering whether a
//!   field existed in the on-disk layout, for the transforms a version
//!   check alone cannot gate.
//! - Migration is fail-forward and single-threaded (one order-independent
//!   bulk rescale excepted): an entity that cannot be converted is skipped
//!   with a [`Report`](crate::report::Report), the load always finishes,
//!   and nothing is ever rolled back.
//!
//! The byte-level reader, the report UI and everything else around the
//! load are external; the entry point is [`migrate_documents`].

pub mod alpha;
pub mod interface_upgrade;
pub mod passes;
pub mod registry;
pub mod report;
pub mod schema;

pub use registry::{
    migrate_document, migrate_documents, run_passes, standard_passes, Pass, PassContext,
    VERSION_CURRENT,
};
pub use report::{Report, ReportLevel, Reports};
pub use schema::{FieldDef, SchemaSnapshot, StructDef, StructOracle};
