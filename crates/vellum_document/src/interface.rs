// SPDX-License-Identifier: MIT OR Apache-2.0
//! Hierarchical interface trees describing a node tree's external ports.

use crate::socket::SocketValue;
use serde::{Deserialize, Serialize};

/// One entry of the flat legacy input/output lists.
///
/// The oldest schema declared a tree's external ports as two separate flat
/// lists. Newer files store a hierarchical [`NodeTreeInterface`] instead;
/// migration drains these lists into it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LegacySocket {
    /// Display name
    pub name: String,
    /// Stable identifier links refer to
    pub identifier: String,
    /// Tooltip description
    pub description: String,
    /// Persisted type-name string, possibly carrying a subtype suffix
    pub socket_type: String,
    /// Default value used while unconnected
    pub default_value: Option<SocketValue>,
    /// Whether the value widget is hidden
    pub hide_value: bool,
    /// Whether the port is hidden from generated modifier UIs
    pub hide_in_modifier: bool,
    /// Attribute domain hint for field-style evaluation
    pub attribute_domain: Option<String>,
}

/// A declared externally visible port of a node tree
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InterfaceSocket {
    /// Stable identifier, unique within the owning interface.
    ///
    /// Links map to external ports through this identifier, never through
    /// the item's position.
    pub identifier: String,
    /// Display name
    pub name: String,
    /// Tooltip description
    pub description: String,
    /// Persisted type-name string, e.g. `socket.float`
    pub socket_type: String,
    /// Whether this port appears on the input side
    pub is_input: bool,
    /// Whether this port appears on the output side
    pub is_output: bool,
    /// Whether the value widget is hidden
    pub hide_value: bool,
    /// Whether the port is hidden from generated modifier UIs
    pub hide_in_modifier: bool,
    /// Default value used while unconnected
    pub default_value: Option<SocketValue>,
    /// Attribute domain hint for field-style evaluation
    pub attribute_domain: Option<String>,
}

/// A panel grouping child interface items
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InterfacePanel {
    /// Stable identifier, unique within the owning interface
    pub identifier: String,
    /// Display name
    pub name: String,
    /// Whether sockets may appear after nested panels.
    ///
    /// When false the panel keeps all sockets ahead of all panels, and
    /// [`InterfacePanel::insert_item`] snaps positions accordingly.
    pub allow_sockets_after_panels: bool,
    /// Child items, ordered
    pub items: Vec<InterfaceItem>,
}

/// Either a socket declaration or a nested panel
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum InterfaceItem {
    /// A declared port
    Socket(InterfaceSocket),
    /// A grouping panel
    Panel(InterfacePanel),
}

impl InterfaceItem {
    /// The item's stable identifier
    pub fn identifier(&self) -> &str {
        match self {
            Self::Socket(socket) => &socket.identifier,
            Self::Panel(panel) => &panel.identifier,
        }
    }

    /// Whether this item is a socket declaration
    pub fn is_socket(&self) -> bool {
        matches!(self, Self::Socket(_))
    }

    /// Whether this item is a panel
    pub fn is_panel(&self) -> bool {
        matches!(self, Self::Panel(_))
    }
}

impl InterfacePanel {
    /// Create an empty panel
    pub fn new(identifier: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            name: name.into(),
            allow_sockets_after_panels: false,
            items: Vec::new(),
        }
    }

    /// Insert an item near `position`, honoring the panel's ordering
    /// constraint.
    ///
    /// When sockets must stay ahead of panels, the position snaps to the
    /// nearest legal slot: a socket lands no later than the first panel
    /// item, a panel no earlier than one past the last socket item. The
    /// position is clamped to the item range either way.
    pub fn insert_item(&mut self, item: InterfaceItem, position: usize) {
        let position = self.valid_insert_position(&item, position);
        let position = position.min(self.items.len());
        self.items.insert(position, item);
    }

    fn valid_insert_position(&self, item: &InterfaceItem, initial: usize) -> usize {
        if self.allow_sockets_after_panels {
            return initial;
        }
        if item.is_panel() {
            // Closest valid slot scanning back from the end: just after the
            // last non-panel item at or after the requested position.
            for test in (initial..self.items.len()).rev() {
                if !self.items[test].is_panel() {
                    return test + 1;
                }
            }
            initial
        } else {
            // No panels may remain at or before the landing slot; inserting
            // at the first panel shifts it to the right.
            for (test, existing) in self.items.iter().enumerate().take(initial + 1) {
                if existing.is_panel() {
                    return test;
                }
            }
            initial
        }
    }

    /// Visit every socket declaration in this panel and its descendants
    pub fn for_each_socket(&self, f: &mut impl FnMut(&InterfaceSocket)) {
        for item in &self.items {
            match item {
                InterfaceItem::Socket(socket) => f(socket),
                InterfaceItem::Panel(panel) => panel.for_each_socket(f),
            }
        }
    }

    /// Visit every socket declaration, mutable
    pub fn for_each_socket_mut(&mut self, f: &mut impl FnMut(&mut InterfaceSocket)) {
        for item in &mut self.items {
            match item {
                InterfaceItem::Socket(socket) => f(socket),
                InterfaceItem::Panel(panel) => panel.for_each_socket_mut(f),
            }
        }
    }
}

/// The hierarchical interface of a node tree.
///
/// Item identifiers are unique per interface; the `next_uid` counter mints
/// fresh ones and is persisted so identifiers stay unique across sessions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeTreeInterface {
    /// Unnamed root panel holding the top-level items
    pub root: InterfacePanel,
    /// Monotonic counter backing [`NodeTreeInterface::mint_identifier`]
    pub next_uid: u32,
}

impl NodeTreeInterface {
    /// Create an empty interface
    pub fn new() -> Self {
        Self {
            root: InterfacePanel::new("", ""),
            next_uid: 0,
        }
    }

    /// Allocate a fresh identifier, unique within this interface
    pub fn mint_identifier(&mut self) -> String {
        let identifier = format!("socket_{}", self.next_uid);
        self.next_uid += 1;
        identifier
    }

    /// Whether the interface has no items at all
    pub fn is_empty(&self) -> bool {
        self.root.items.is_empty()
    }

    /// Visit every socket declaration in the interface
    pub fn for_each_socket(&self, mut f: impl FnMut(&InterfaceSocket)) {
        self.root.for_each_socket(&mut f);
    }

    /// Visit every socket declaration, mutable
    pub fn for_each_socket_mut(&mut self, mut f: impl FnMut(&mut InterfaceSocket)) {
        self.root.for_each_socket_mut(&mut f);
    }

    /// Find a socket declaration by identifier
    pub fn find_socket(&self, identifier: &str) -> Option<&InterfaceSocket> {
        fn find_in<'a>(panel: &'a InterfacePanel, identifier: &str) -> Option<&'a InterfaceSocket> {
            for item in &panel.items {
                match item {
                    InterfaceItem::Socket(socket) if socket.identifier == identifier => {
                        return Some(socket);
                    }
                    InterfaceItem::Panel(child) => {
                        if let Some(found) = find_in(child, identifier) {
                            return Some(found);
                        }
                    }
                    InterfaceItem::Socket(_) => {}
                }
            }
            None
        }
        find_in(&self.root, identifier)
    }

    /// Locate an item: the index path of its parent panel (from the root)
    /// plus its index within that panel.
    pub fn locate(&self, identifier: &str) -> Option<(Vec<usize>, usize)> {
        fn locate_in(
            panel: &InterfacePanel,
            identifier: &str,
            path: &mut Vec<usize>,
        ) -> Option<(Vec<usize>, usize)> {
            for (index, item) in panel.items.iter().enumerate() {
                if item.identifier() == identifier {
                    return Some((path.clone(), index));
                }
                if let InterfaceItem::Panel(child) = item {
                    path.push(index);
                    if let Some(found) = locate_in(child, identifier, path) {
                        return Some(found);
                    }
                    path.pop();
                }
            }
            None
        }
        locate_in(&self.root, identifier, &mut Vec::new())
    }

    /// Resolve a panel index path produced by [`NodeTreeInterface::locate`]
    pub fn panel_at_mut(&mut self, path: &[usize]) -> Option<&mut InterfacePanel> {
        let mut panel = &mut self.root;
        for &index in path {
            panel = match panel.items.get_mut(index) {
                Some(InterfaceItem::Panel(child)) => child,
                _ => return None,
            };
        }
        Some(panel)
    }
}

impl Default for NodeTreeInterface {
    fn default() -> Self {
        Self::new()
    }
}
