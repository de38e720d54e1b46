// SPDX-License-Identifier: MIT OR Apache-2.0
//! Node tree data structure and rewrite primitives.

use crate::interface::{LegacySocket, NodeTreeInterface};
use crate::link::{Link, LinkId};
use crate::node::{Node, NodeId, NodeKind};
use crate::socket::{Socket, SocketDirection, SocketId, SocketType};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a node tree
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeTreeId(pub Uuid);

impl NodeTreeId {
    /// Create a new random tree ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for NodeTreeId {
    fn default() -> Self {
        Self::new()
    }
}

/// Error from a rewrite primitive
#[derive(Debug, thiserror::Error)]
pub enum GraphError {
    /// Node not found
    #[error("node not found: {0:?}")]
    NodeNotFound(NodeId),

    /// Socket not found on the named node
    #[error("socket not found: {0:?}")]
    SocketNotFound(SocketId),
}

/// A directed graph of typed nodes connected via sockets and links.
///
/// The tree owns its nodes, nodes own their sockets; links refer to both by
/// ID. The rewrite primitives uphold one structural guarantee: after any
/// sequence of calls, every link's endpoints resolve to existing sockets on
/// existing nodes. Type compatibility between linked sockets is advisory
/// only; legacy documents carry loosely typed connections.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeTree {
    /// Tree name
    pub name: String,
    /// Nodes in the tree
    nodes: IndexMap<NodeId, Node>,
    /// Links between sockets
    links: IndexMap<LinkId, Link>,
    /// Externally visible ports, as a hierarchical item tree
    pub interface: NodeTreeInterface,
    /// Flat legacy input declarations, from files older than the
    /// hierarchical interface. Drained during migration.
    #[serde(default)]
    pub legacy_inputs: Vec<LegacySocket>,
    /// Flat legacy output declarations, see [`NodeTree::legacy_inputs`]
    #[serde(default)]
    pub legacy_outputs: Vec<LegacySocket>,
}

impl NodeTree {
    /// Create a new empty tree
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            nodes: IndexMap::new(),
            links: IndexMap::new(),
            interface: NodeTreeInterface::new(),
            legacy_inputs: Vec::new(),
            legacy_outputs: Vec::new(),
        }
    }

    /// Add a node of the given kind with its default sockets
    pub fn add_node(&mut self, kind: NodeKind) -> NodeId {
        let node = Node::new(kind);
        let id = node.id;
        self.nodes.insert(id, node);
        id
    }

    /// Remove a node and every link touching any of its sockets
    pub fn remove_node(&mut self, node_id: NodeId) -> Option<Node> {
        self.links.retain(|_, l| !l.involves_node(node_id));
        self.nodes.swap_remove(&node_id)
    }

    /// Get a node by ID
    pub fn node(&self, node_id: NodeId) -> Option<&Node> {
        self.nodes.get(&node_id)
    }

    /// Get a mutable node by ID
    pub fn node_mut(&mut self, node_id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(&node_id)
    }

    /// Get all nodes
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    /// Get all nodes, mutable
    pub fn nodes_mut(&mut self) -> impl Iterator<Item = &mut Node> {
        self.nodes.values_mut()
    }

    /// Get all node IDs
    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes.keys().copied()
    }

    /// Get the number of nodes
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Find the first node of the given kind
    pub fn first_of_kind(&self, kind: &NodeKind) -> Option<NodeId> {
        self.nodes.values().find(|n| n.kind == *kind).map(|n| n.id)
    }

    /// Append a socket to a node's matching socket list
    pub fn add_socket(
        &mut self,
        node_id: NodeId,
        direction: SocketDirection,
        socket_type: SocketType,
        name: impl Into<String>,
    ) -> Result<SocketId, GraphError> {
        let node = self
            .nodes
            .get_mut(&node_id)
            .ok_or(GraphError::NodeNotFound(node_id))?;
        let socket = match direction {
            SocketDirection::Input => Socket::input(name, socket_type),
            SocketDirection::Output => Socket::output(name, socket_type),
        };
        let id = socket.id;
        match direction {
            SocketDirection::Input => node.inputs.push(socket),
            SocketDirection::Output => node.outputs.push(socket),
        }
        Ok(id)
    }

    /// Remove a socket and any link attached to it
    pub fn remove_socket(&mut self, socket_id: SocketId) -> Option<Socket> {
        self.links.retain(|_, l| !l.involves_socket(socket_id));
        for node in self.nodes.values_mut() {
            if let Some(pos) = node.inputs.iter().position(|s| s.id == socket_id) {
                return Some(node.inputs.remove(pos));
            }
            if let Some(pos) = node.outputs.iter().position(|s| s.id == socket_id) {
                return Some(node.outputs.remove(pos));
            }
        }
        None
    }

    /// Connect an output socket to an input socket.
    ///
    /// Inputs accept at most one link: an existing incoming link on
    /// `to_socket` is removed first. Socket types are not checked.
    pub fn add_link(
        &mut self,
        from_node: NodeId,
        from_socket: SocketId,
        to_node: NodeId,
        to_socket: SocketId,
    ) -> Result<LinkId, GraphError> {
        let source = self
            .nodes
            .get(&from_node)
            .ok_or(GraphError::NodeNotFound(from_node))?;
        source
            .socket(from_socket)
            .ok_or(GraphError::SocketNotFound(from_socket))?;
        let target = self
            .nodes
            .get(&to_node)
            .ok_or(GraphError::NodeNotFound(to_node))?;
        target
            .socket(to_socket)
            .ok_or(GraphError::SocketNotFound(to_socket))?;

        if let Some(existing) = self.incoming_link(to_socket).map(|l| l.id) {
            self.links.swap_remove(&existing);
        }

        let link = Link::new(from_node, from_socket, to_node, to_socket);
        let id = link.id;
        self.links.insert(id, link);
        Ok(id)
    }

    /// Remove a link
    pub fn remove_link(&mut self, link_id: LinkId) -> Option<Link> {
        self.links.swap_remove(&link_id)
    }

    /// Get a link by ID
    pub fn link(&self, link_id: LinkId) -> Option<&Link> {
        self.links.get(&link_id)
    }

    /// Get all links
    pub fn links(&self) -> impl Iterator<Item = &Link> {
        self.links.values()
    }

    /// Get the number of links
    pub fn link_count(&self) -> usize {
        self.links.len()
    }

    /// The link feeding an input socket, if any
    pub fn incoming_link(&self, socket_id: SocketId) -> Option<&Link> {
        self.links.values().find(|l| l.to_socket == socket_id)
    }

    /// Find a socket anywhere in the tree
    pub fn socket(&self, socket_id: SocketId) -> Option<&Socket> {
        self.nodes.values().find_map(|n| n.socket(socket_id))
    }

    /// Find a mutable socket anywhere in the tree
    pub fn socket_mut(&mut self, socket_id: SocketId) -> Option<&mut Socket> {
        self.nodes.values_mut().find_map(|n| n.socket_mut(socket_id))
    }

    /// Drop every link whose endpoints no longer resolve.
    ///
    /// Returns the number of links removed. Links only dangle when a
    /// document was written by a broken or truncated writer; the rewrite
    /// primitives themselves never leave one behind.
    pub fn remove_invalid_links(&mut self) -> usize {
        let nodes = &self.nodes;
        let before = self.links.len();
        self.links.retain(|_, link| {
            let from_ok = nodes
                .get(&link.from_node)
                .is_some_and(|n| n.socket(link.from_socket).is_some());
            let to_ok = nodes
                .get(&link.to_node)
                .is_some_and(|n| n.socket(link.to_socket).is_some());
            from_ok && to_ok
        });
        before - self.links.len()
    }

    /// Structural issues in this tree, empty when well-formed
    pub fn validate(&self) -> Vec<String> {
        let mut issues = Vec::new();
        for link in self.links.values() {
            match self.nodes.get(&link.from_node) {
                Some(node) if node.socket(link.from_socket).is_some() => {}
                _ => issues.push(format!(
                    "link {:?} has an unresolved source socket",
                    link.id
                )),
            }
            match self.nodes.get(&link.to_node) {
                Some(node) if node.socket(link.to_socket).is_some() => {}
                _ => issues.push(format!(
                    "link {:?} has an unresolved target socket",
                    link.id
                )),
            }
        }
        issues
    }
}
