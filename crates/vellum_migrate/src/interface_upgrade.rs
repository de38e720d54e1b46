// SPDX-License-Identifier: MIT OR Apache-2.0
//! Conversion of legacy flat socket lists into hierarchical interfaces.
//!
//! The oldest schema declared a tree's external ports as two flat ordered
//! lists. The current schema stores one hierarchical item tree with explicit
//! per-item roles, which additionally needs repair for two historical
//! defects: items erroneously flagged both input and output, and type-name
//! strings still carrying a subtype suffix.

use vellum_document::{
    InterfaceItem, InterfaceSocket, LegacySocket, NodeTree, NodeTreeInterface,
};

/// Type-name spellings that carried a subtype suffix, mapped to their
/// canonical base spelling.
const SUBTYPE_MAP: &[(&str, &str)] = &[
    ("socket.float.unsigned", "socket.float"),
    ("socket.float.percentage", "socket.float"),
    ("socket.float.factor", "socket.float"),
    ("socket.float.angle", "socket.float"),
    ("socket.float.time", "socket.float"),
    ("socket.float.distance", "socket.float"),
    ("socket.int.unsigned", "socket.int"),
    ("socket.int.percentage", "socket.int"),
    ("socket.int.factor", "socket.int"),
    ("socket.vector.translation", "socket.vector"),
    ("socket.vector.direction", "socket.vector"),
    ("socket.vector.velocity", "socket.vector"),
    ("socket.vector.euler", "socket.vector"),
];

/// The canonical base spelling for a subtyped type name, or `None` when the
/// name is already canonical.
pub fn canonical_socket_type(type_name: &str) -> Option<&'static str> {
    SUBTYPE_MAP
        .iter()
        .find(|(subtyped, _)| *subtyped == type_name)
        .map(|(_, base)| *base)
}

fn legacy_socket_to_item(legacy: LegacySocket, is_input: bool) -> InterfaceItem {
    InterfaceItem::Socket(InterfaceSocket {
        identifier: legacy.identifier,
        name: legacy.name,
        description: legacy.description,
        // Copied verbatim; subtyped spellings are canonicalized by the
        // later type-name fix pass.
        socket_type: legacy.socket_type,
        is_input,
        is_output: !is_input,
        hide_value: legacy.hide_value,
        hide_in_modifier: legacy.hide_in_modifier,
        default_value: legacy.default_value,
        attribute_domain: legacy.attribute_domain,
    })
}

/// Build the hierarchical interface from the flat legacy lists.
///
/// Outputs convert first to retain the old outputs-then-inputs ordering.
/// When the hierarchical root is already populated the document was written
/// by a newer writer that also emitted the legacy lists for backward
/// compatibility; the hierarchical tree is authoritative and the lists are
/// discarded unused. The lists are drained either way so a re-save never
/// carries them forward.
pub fn interface_from_legacy_lists(tree: &mut NodeTree) {
    let outputs = std::mem::take(&mut tree.legacy_outputs);
    let inputs = std::mem::take(&mut tree.legacy_inputs);
    if outputs.is_empty() && inputs.is_empty() {
        return;
    }
    if !tree.interface.is_empty() {
        return;
    }
    for legacy in outputs {
        tree.interface
            .root
            .items
            .push(legacy_socket_to_item(legacy, false));
    }
    for legacy in inputs {
        tree.interface
            .root
            .items
            .push(legacy_socket_to_item(legacy, true));
    }
}

/// Split every interface socket flagged both input and output.
///
/// The duplicate gets a freshly minted identifier and keeps the input role;
/// the original keeps the output role. The duplicate lands immediately
/// after the original, subject to the owning panel's ordering constraint.
pub fn split_dual_role_sockets(tree: &mut NodeTree) {
    let mut dual = Vec::new();
    tree.interface.for_each_socket(|socket| {
        if socket.is_input && socket.is_output {
            dual.push(socket.identifier.clone());
        }
    });
    for identifier in dual {
        split_socket(&mut tree.interface, &identifier);
    }
}

fn split_socket(interface: &mut NodeTreeInterface, identifier: &str) {
    let Some((path, index)) = interface.locate(identifier) else {
        return;
    };
    // Fresh identifier for the duplicate. This may break existing external
    // links, but the identifier was shared across both roles anyway.
    let fresh = interface.mint_identifier();
    let Some(panel) = interface.panel_at_mut(&path) else {
        return;
    };
    let Some(InterfaceItem::Socket(original)) = panel.items.get_mut(index) else {
        return;
    };

    let mut duplicate = original.clone();
    duplicate.identifier = fresh;
    // Original becomes output-only, the duplicate input-only.
    original.is_input = false;
    duplicate.is_output = false;

    panel.insert_item(InterfaceItem::Socket(duplicate), index + 1);
}

/// Stably order each panel's direct children: sockets ahead of nested
/// panels, outputs ahead of inputs.
///
/// Purely cosmetic and idempotent; links reference items by identifier,
/// never by position.
pub fn sort_interface_items(tree: &mut NodeTree) {
    sort_panel_recursive(&mut tree.interface.root);
}

fn sort_panel_recursive(panel: &mut vellum_document::InterfacePanel) {
    fn order(item: &InterfaceItem) -> u8 {
        match item {
            InterfaceItem::Socket(socket) if socket.is_output => 0,
            InterfaceItem::Socket(_) => 1,
            InterfaceItem::Panel(_) => 2,
        }
    }
    panel.items.sort_by(|a, b| order(a).cmp(&order(b)));
    for item in &mut panel.items {
        if let InterfaceItem::Panel(child) = item {
            sort_panel_recursive(child);
        }
    }
}

/// Truncate subtyped type-name strings to their canonical base spelling.
///
/// Only the label changes; stored values are never touched.
pub fn fix_socket_type_names(tree: &mut NodeTree) {
    tree.interface.for_each_socket_mut(|socket| {
        if let Some(base) = canonical_socket_type(&socket.socket_type) {
            socket.socket_type = base.to_string();
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use vellum_document::{InterfacePanel, SocketValue};

    fn legacy(identifier: &str, socket_type: &str) -> LegacySocket {
        LegacySocket {
            name: identifier.to_uppercase(),
            identifier: identifier.to_string(),
            description: format!("{identifier} port"),
            socket_type: socket_type.to_string(),
            default_value: Some(SocketValue::Float(0.25)),
            hide_value: true,
            hide_in_modifier: false,
            attribute_domain: Some("point".to_string()),
        }
    }

    fn interface_socket(identifier: &str, is_input: bool, is_output: bool) -> InterfaceItem {
        InterfaceItem::Socket(InterfaceSocket {
            identifier: identifier.to_string(),
            name: identifier.to_string(),
            description: String::new(),
            socket_type: "socket.float".to_string(),
            is_input,
            is_output,
            hide_value: false,
            hide_in_modifier: false,
            default_value: None,
            attribute_domain: None,
        })
    }

    #[test]
    fn test_outputs_precede_inputs_after_conversion() {
        let mut tree = NodeTree::new("group");
        tree.legacy_inputs.push(legacy("a", "socket.float"));
        tree.legacy_outputs.push(legacy("b", "socket.float"));

        interface_from_legacy_lists(&mut tree);

        let ids: Vec<&str> = tree
            .interface
            .root
            .items
            .iter()
            .map(|i| i.identifier())
            .collect();
        assert_eq!(ids, ["b", "a"]);
        assert!(tree.legacy_inputs.is_empty());
        assert!(tree.legacy_outputs.is_empty());
    }

    #[test]
    fn test_attributes_copied_verbatim() {
        let mut tree = NodeTree::new("group");
        tree.legacy_inputs.push(legacy("a", "socket.float.factor"));

        interface_from_legacy_lists(&mut tree);

        let socket = tree.interface.find_socket("a").unwrap();
        assert_eq!(socket.name, "A");
        assert_eq!(socket.description, "a port");
        // Subtyped spelling survives conversion; only the fix pass
        // canonicalizes it.
        assert_eq!(socket.socket_type, "socket.float.factor");
        assert_eq!(socket.default_value, Some(SocketValue::Float(0.25)));
        assert!(socket.hide_value);
        assert_eq!(socket.attribute_domain.as_deref(), Some("point"));
        assert!(socket.is_input);
        assert!(!socket.is_output);
    }

    #[test]
    fn test_populated_interface_wins_over_legacy_lists() {
        let mut tree = NodeTree::new("group");
        tree.interface
            .root
            .items
            .push(interface_socket("existing", true, false));
        tree.legacy_inputs.push(legacy("stale", "socket.float"));

        interface_from_legacy_lists(&mut tree);

        assert_eq!(tree.interface.root.items.len(), 1);
        assert!(tree.interface.find_socket("stale").is_none());
        // Legacy lists are drained regardless.
        assert!(tree.legacy_inputs.is_empty());
    }

    #[test]
    fn test_dual_role_socket_splits_into_adjacent_pair() {
        let mut tree = NodeTree::new("group");
        tree.interface
            .root
            .items
            .push(interface_socket("before", true, false));
        tree.interface
            .root
            .items
            .push(interface_socket("dual", true, true));

        split_dual_role_sockets(&mut tree);

        let items = &tree.interface.root.items;
        assert_eq!(items.len(), 3);
        let InterfaceItem::Socket(original) = &items[1] else {
            panic!("expected socket");
        };
        let InterfaceItem::Socket(duplicate) = &items[2] else {
            panic!("expected socket");
        };
        assert_eq!(original.identifier, "dual");
        assert!(original.is_output && !original.is_input);
        assert_ne!(duplicate.identifier, "dual");
        assert!(duplicate.is_input && !duplicate.is_output);
        assert_eq!(duplicate.name, original.name);
    }

    #[test]
    fn test_split_is_stable_for_single_role_sockets() {
        let mut tree = NodeTree::new("group");
        tree.interface
            .root
            .items
            .push(interface_socket("in", true, false));
        tree.interface
            .root
            .items
            .push(interface_socket("out", false, true));

        split_dual_role_sockets(&mut tree);
        assert_eq!(tree.interface.root.items.len(), 2);
    }

    #[test]
    fn test_split_inside_nested_panel() {
        let mut tree = NodeTree::new("group");
        let mut panel = InterfacePanel::new("panel", "Panel");
        panel.items.push(interface_socket("dual", true, true));
        tree.interface.root.items.push(InterfaceItem::Panel(panel));

        split_dual_role_sockets(&mut tree);

        let InterfaceItem::Panel(panel) = &tree.interface.root.items[0] else {
            panic!("expected panel");
        };
        assert_eq!(panel.items.len(), 2);
    }

    #[test]
    fn test_sort_orders_sockets_outputs_inputs_panels() {
        let mut tree = NodeTree::new("group");
        let mut nested = InterfacePanel::new("panel", "Panel");
        nested.items.push(interface_socket("n_in", true, false));
        nested.items.push(interface_socket("n_out", false, true));
        tree.interface.root.items = vec![
            InterfaceItem::Panel(nested),
            interface_socket("in", true, false),
            interface_socket("out", false, true),
        ];

        sort_interface_items(&mut tree);

        let ids: Vec<&str> = tree
            .interface
            .root
            .items
            .iter()
            .map(|i| i.identifier())
            .collect();
        assert_eq!(ids, ["out", "in", "panel"]);

        let InterfaceItem::Panel(nested) = &tree.interface.root.items[2] else {
            panic!("expected panel");
        };
        assert_eq!(nested.items[0].identifier(), "n_out");
    }

    #[test]
    fn test_sort_is_idempotent_and_stable() {
        let mut tree = NodeTree::new("group");
        tree.interface.root.items = vec![
            interface_socket("in_1", true, false),
            interface_socket("in_2", true, false),
        ];
        sort_interface_items(&mut tree);
        sort_interface_items(&mut tree);
        let ids: Vec<&str> = tree
            .interface
            .root
            .items
            .iter()
            .map(|i| i.identifier())
            .collect();
        assert_eq!(ids, ["in_1", "in_2"]);
    }

    #[test]
    fn test_subtype_names_are_truncated() {
        let mut tree = NodeTree::new("group");
        let mut socket = interface_socket("a", true, false);
        if let InterfaceItem::Socket(s) = &mut socket {
            s.socket_type = "socket.vector.euler".to_string();
            s.default_value = Some(SocketValue::Vector([1.0, 2.0, 3.0]));
        }
        tree.interface.root.items.push(socket);

        fix_socket_type_names(&mut tree);

        let socket = tree.interface.find_socket("a").unwrap();
        assert_eq!(socket.socket_type, "socket.vector");
        // The stored value never changes, only the label.
        assert_eq!(
            socket.default_value,
            Some(SocketValue::Vector([1.0, 2.0, 3.0]))
        );
    }

    #[test]
    fn test_canonical_names_untouched() {
        assert!(canonical_socket_type("socket.float").is_none());
        assert_eq!(
            canonical_socket_type("socket.float.angle"),
            Some("socket.float")
        );
    }
}
