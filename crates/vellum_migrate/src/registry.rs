// SPDX-License-Identifier: MIT OR Apache-2.0
//! The ordered registry of migration passes and the per-document runner.

use crate::passes;
use crate::report::Reports;
use crate::schema::{SchemaSnapshot, StructOracle};
use vellum_document::{Document, VersionTag};

/// Schema revision written by the current build.
///
/// Bump this together with every new entry in [`standard_passes`].
pub const VERSION_CURRENT: VersionTag = VersionTag::new(2, 60);

/// Shared context handed to every pass
pub struct PassContext<'a> {
    /// Membership oracle over the stored schema
    pub oracle: &'a StructOracle,
    /// Report sink for the whole load
    pub reports: &'a mut Reports,
}

/// One version-gated transform block
pub struct Pass {
    /// Stable pass name, used in logs
    pub name: &'static str,
    /// The block runs iff the document's stored tag is strictly below this
    pub gate: VersionTag,
    /// The transform itself
    pub run: fn(&mut Document, &mut PassContext<'_>),
}

/// Every migration pass, in increasing gate order.
///
/// Order is load-bearing: later passes assume the document shape earlier
/// passes produce (the dual-role split expects hierarchical interfaces,
/// the blend conversion expects current socket spellings).
pub fn standard_passes() -> Vec<Pass> {
    vec![
        Pass {
            name: "repair_references",
            gate: VersionTag::new(1, 9),
            run: passes::repair_references,
        },
        Pass {
            name: "world_probe_defaults",
            gate: VersionTag::new(1, 12),
            run: passes::apply_world_probe_default,
        },
        Pass {
            name: "interface_from_legacy_lists",
            gate: VersionTag::new(1, 20),
            run: passes::convert_legacy_interfaces,
        },
        Pass {
            name: "split_dual_role_sockets",
            gate: VersionTag::new(1, 24),
            run: passes::split_interface_dual_sockets,
        },
        Pass {
            name: "sort_interface_items",
            gate: VersionTag::new(1, 33),
            run: passes::normalize_interface_order,
        },
        Pass {
            name: "fix_socket_type_names",
            gate: VersionTag::new(1, 45),
            run: passes::canonicalize_interface_types,
        },
        Pass {
            name: "rescale_point_radii",
            gate: VersionTag::new(2, 2),
            run: passes::rescale_point_radii,
        },
        Pass {
            name: "rename_surface_sockets",
            gate: VersionTag::new(2, 40),
            run: passes::rename_surface_emission,
        },
        Pass {
            name: "blend_mode_to_alpha",
            gate: VersionTag::new(2, 51),
            run: passes::convert_blend_modes,
        },
        Pass {
            name: "retire_legacy_engine",
            gate: VersionTag::new(2, 52),
            run: passes::retire_legacy_engine,
        },
    ]
}

/// Run a pass list against one document.
///
/// Gates are evaluated against the tag the file was saved with, so each
/// block executes at most once per load; the tag itself is not advanced
/// here.
pub fn run_passes(
    document: &mut Document,
    passes: &[Pass],
    oracle: &StructOracle,
    reports: &mut Reports,
) {
    debug_assert!(
        passes.windows(2).all(|w| w[0].gate <= w[1].gate),
        "pass gates must be non-decreasing"
    );

    let stored = document.version;
    let mut ctx = PassContext { oracle, reports };
    for pass in passes {
        if stored.at_least(pass.gate.major, pass.gate.minor) {
            continue;
        }
        tracing::debug!(
            pass = pass.name,
            document = %document.name,
            stored = %stored,
            "applying migration pass"
        );
        (pass.run)(document, &mut ctx);
    }
}

/// Migrate one document to the current schema revision.
pub fn migrate_document(document: &mut Document, oracle: &StructOracle, reports: &mut Reports) {
    run_passes(document, &standard_passes(), oracle, reports);
    document.version = VERSION_CURRENT;
}

/// Migrate every document of a load.
///
/// Takes the documents explicitly; linked documents carry their own version
/// tags, so gates are evaluated per document. Returns the accumulated
/// reports for the host to surface once loading finishes.
pub fn migrate_documents(documents: &mut [Document], schema: &SchemaSnapshot) -> Reports {
    let oracle = StructOracle::new(schema);
    let mut reports = Reports::new();
    for document in documents.iter_mut() {
        tracing::info!(document = %document.name, version = %document.version, "migrating document");
        migrate_document(document, &oracle, &mut reports);
    }
    reports
}
