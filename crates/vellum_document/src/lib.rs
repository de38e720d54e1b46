// SPDX-License-Identifier: MIT OR Apache-2.0
//! Document model for the Vellum editor.
//!
//! A [`Document`] is the deserialized form of one saved file: typed
//! collections of entities (scenes, materials, worlds, point clouds) plus
//! reusable node groups. Shader-style node trees are arenas of typed nodes
//! connected through sockets and links, with a hierarchical interface tree
//! describing their externally visible ports.
//!
//! ## Architecture
//!
//! - Trees own their nodes, nodes own their sockets; links and interface
//!   items refer to them through stable identifiers only.
//! - Rewrite primitives on [`NodeTree`] keep the graph well-formed: removing
//!   a node or socket also removes every link touching it, and an input
//!   socket never keeps more than one incoming link.
//! - The byte-level reader/writer lives outside this crate; everything here
//!   is plain in-memory data with serde derives.

pub mod catalog;
pub mod document;
pub mod interface;
pub mod link;
pub mod node;
pub mod socket;
pub mod tree;
pub mod version;

pub use document::{
    BlendMethod, Document, EntityId, Material, NodeTreeKey, PointCloud, Scene, ShadowMethod,
    World, ENGINE_RASTER, ENGINE_RASTER_LEGACY,
};
pub use interface::{
    InterfaceItem, InterfacePanel, InterfaceSocket, LegacySocket, NodeTreeInterface,
};
pub use link::{Link, LinkId};
pub use node::{MathOp, Node, NodeId, NodeKind};
pub use socket::{Socket, SocketDirection, SocketId, SocketType, SocketValue};
pub use tree::{GraphError, NodeTree, NodeTreeId};
pub use version::VersionTag;
