// SPDX-License-Identifier: MIT OR Apache-2.0
//! The individual version-gated transform blocks.
//!
//! Every pass is fail-forward: an entity that cannot be converted is
//! skipped with a report and the rest of the document proceeds. Nothing
//! here ever aborts a load.

use crate::alpha::{self, ConversionOutcome};
use crate::interface_upgrade;
use crate::registry::PassContext;
use rayon::prelude::*;
use std::collections::HashSet;
use vellum_document::{
    BlendMethod, Document, Material, NodeKind, NodeTreeId, ShadowMethod, World, ENGINE_RASTER,
    ENGINE_RASTER_LEGACY,
};

/// Factor converting stored legacy point radii to the current unit.
pub const LEGACY_RADIUS_FACTOR: f32 = 0.001;

/// Remove links whose endpoints no longer resolve and clear group nodes
/// pointing at trees that are not in the document.
///
/// Both defects come from truncated or broken writers; the repair keeps the
/// rest of the graph usable and is reported as informational.
pub fn repair_references(document: &mut Document, ctx: &mut PassContext<'_>) {
    let known: HashSet<NodeTreeId> = document.node_groups.keys().copied().collect();
    let reports = &mut *ctx.reports;
    document.for_each_tree_mut(|tree| {
        let removed = tree.remove_invalid_links();
        if removed > 0 {
            reports.info(
                tree.name.clone(),
                format!("removed {removed} dangling links"),
            );
        }

        let tree_name = tree.name.clone();
        for node in tree.nodes_mut() {
            if let Some(group) = node.group {
                if !known.contains(&group) {
                    node.group = None;
                    reports.unresolved_references += 1;
                    reports.info(
                        tree_name.clone(),
                        format!("cleared unresolved group reference on node '{}'", node.name),
                    );
                }
            }
        }
    });
}

/// Backfill the world probe resolution for files written before the field
/// existed.
///
/// The field landed without a version bump, so the stored schema is the
/// only reliable signal.
pub fn apply_world_probe_default(document: &mut Document, ctx: &mut PassContext<'_>) {
    if ctx.oracle.field_exists("World", "probe_resolution") {
        return;
    }
    for world in document.worlds.values_mut() {
        world.probe_resolution = World::DEFAULT_PROBE_RESOLUTION;
    }
}

/// Convert flat legacy socket lists into hierarchical interfaces.
pub fn convert_legacy_interfaces(document: &mut Document, _ctx: &mut PassContext<'_>) {
    document.for_each_tree_mut(interface_upgrade::interface_from_legacy_lists);
}

/// Split interface sockets erroneously flagged both input and output.
pub fn split_interface_dual_sockets(document: &mut Document, _ctx: &mut PassContext<'_>) {
    document.for_each_tree_mut(interface_upgrade::split_dual_role_sockets);
}

/// Normalize interface ordering: sockets ahead of panels, outputs ahead of
/// inputs.
pub fn normalize_interface_order(document: &mut Document, _ctx: &mut PassContext<'_>) {
    document.for_each_tree_mut(interface_upgrade::sort_interface_items);
}

/// Truncate subtyped interface type names to their canonical spellings.
pub fn canonicalize_interface_types(document: &mut Document, _ctx: &mut PassContext<'_>) {
    document.for_each_tree_mut(interface_upgrade::fix_socket_type_names);
}

/// Rescale stored point radii to the current unit.
///
/// Each radius is read and written independently, so this is the one
/// transform allowed to fan out across worker threads.
pub fn rescale_point_radii(document: &mut Document, _ctx: &mut PassContext<'_>) {
    for point_cloud in document.point_clouds.values_mut() {
        point_cloud
            .radii
            .par_iter_mut()
            .with_min_len(8192)
            .for_each(|radius| *radius *= LEGACY_RADIUS_FACTOR);
    }
}

/// Rename surface node inputs to their current spellings.
pub fn rename_surface_emission(document: &mut Document, _ctx: &mut PassContext<'_>) {
    document.for_each_tree_mut(|tree| {
        for node in tree.nodes_mut() {
            if node.kind != NodeKind::SurfaceBsdf {
                continue;
            }
            if node.input("Emission Color").is_some() {
                // Already written with the current spelling.
                continue;
            }
            if let Some(socket) = node.input_mut("Emission") {
                socket.name = "Emission Color".to_string();
            }
        }
    });
}

/// Convert discrete material blend modes to the continuous alpha model.
///
/// Only documents whose first scene still renders with the legacy engine
/// carry meaningful discrete modes; everything else is untouched. Per
/// material, the alpha analyzer decides between setting the discrete state
/// directly, materializing a threshold comparison, or skipping with a
/// warning when the tree blends alpha more than once.
pub fn convert_blend_modes(document: &mut Document, ctx: &mut PassContext<'_>) {
    let legacy_engine = document
        .first_scene()
        .is_some_and(|scene| scene.engine == ENGINE_RASTER_LEGACY);
    if !legacy_engine {
        return;
    }

    for material in document.materials.values_mut() {
        if !material.use_nodes || material.node_tree.is_none() {
            continue;
        }
        if matches!(
            material.blend_method,
            BlendMethod::Hashed | BlendMethod::Blend
        ) {
            // Compatible modes, nothing to change.
            continue;
        }
        match material.shadow_method {
            ShadowMethod::None | ShadowMethod::Opaque => {}
            ShadowMethod::Clip if material.blend_method == BlendMethod::Clip => {}
            _ => {
                ctx.reports.warn(
                    material.name.clone(),
                    "couldn't convert material because of different blend and shadow modes",
                );
                continue;
            }
        }

        let threshold = if material.blend_method == BlendMethod::Clip {
            material.alpha_threshold
        } else {
            alpha::FORCE_OPAQUE_THRESHOLD
        };

        let Material {
            name,
            blend_method,
            node_tree,
            ..
        } = material;
        let Some(tree) = node_tree.as_mut() else {
            continue;
        };
        match alpha::apply_alpha_threshold(tree, threshold) {
            ConversionOutcome::Converted => {}
            ConversionOutcome::SetDiscrete(state) => *blend_method = state,
            ConversionOutcome::Complex => ctx.reports.warn(
                name.clone(),
                "couldn't convert material because of non-trivial alpha blending",
            ),
        }
    }
}

/// Rewrite retired render engine identifiers.
pub fn retire_legacy_engine(document: &mut Document, _ctx: &mut PassContext<'_>) {
    for scene in document.scenes.values_mut() {
        if scene.engine == ENGINE_RASTER_LEGACY {
            scene.engine = ENGINE_RASTER.to_string();
        }
    }
}
