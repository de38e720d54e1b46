// SPDX-License-Identifier: MIT OR Apache-2.0
//! Node definitions for node trees.

use crate::socket::{Socket, SocketId};
use crate::tree::NodeTreeId;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeId(pub Uuid);

impl NodeId {
    /// Create a new random node ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for NodeId {
    fn default() -> Self {
        Self::new()
    }
}

/// Scalar math operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MathOp {
    /// A + B
    Add,
    /// A - B
    Subtract,
    /// A * B
    Multiply,
    /// 1 if A > B else 0
    GreaterThan,
    /// 1 if A < B else 0
    LessThan,
}

/// Node kind.
///
/// Covers the kinds the editor and the load-time migration recognize;
/// anything else round-trips through [`NodeKind::Other`] untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum NodeKind {
    /// Final surface output of a material tree
    SurfaceOutput,
    /// Physically based surface closure
    SurfaceBsdf,
    /// Specular surface closure with an inverted transparency input
    SpecularBsdf,
    /// Transparent closure, driven by its color input
    TransparentBsdf,
    /// Blend two closures by a factor
    MixClosure,
    /// Sum two closures
    AddClosure,
    /// Passthrough, forwards its sole input
    Reroute,
    /// Instance of a reusable node group
    Group,
    /// Scalar math
    Math(MathOp),
    /// Sample a 2D image
    ImageTexture,
    /// Constant float value
    Value,
    /// Unrecognized kind, preserved verbatim
    Other(String),
}

impl NodeKind {
    /// Display name for this kind
    pub fn display_name(&self) -> &str {
        match self {
            Self::SurfaceOutput => "Surface Output",
            Self::SurfaceBsdf => "Surface BSDF",
            Self::SpecularBsdf => "Specular BSDF",
            Self::TransparentBsdf => "Transparent BSDF",
            Self::MixClosure => "Mix Closure",
            Self::AddClosure => "Add Closure",
            Self::Reroute => "Reroute",
            Self::Group => "Group",
            Self::Math(_) => "Math",
            Self::ImageTexture => "Image Texture",
            Self::Value => "Value",
            Self::Other(name) => name,
        }
    }
}

/// A node instance in a tree
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Node {
    /// Unique instance ID
    pub id: NodeId,
    /// Node kind
    pub kind: NodeKind,
    /// Display name
    pub name: String,
    /// Position in the graph UI
    pub position: [f32; 2],
    /// Input sockets, ordered
    pub inputs: Vec<Socket>,
    /// Output sockets, ordered
    pub outputs: Vec<Socket>,
    /// Whether the node is collapsed in the UI
    pub hidden: bool,
    /// Referenced group tree, for [`NodeKind::Group`] nodes only.
    ///
    /// Non-owning: the tree lives in the document's group collection.
    pub group: Option<NodeTreeId>,
}

impl Node {
    /// Create a node of the given kind with its default sockets
    pub fn new(kind: NodeKind) -> Self {
        let (inputs, outputs) = crate::catalog::default_sockets(&kind);
        let name = kind.display_name().to_string();
        Self {
            id: NodeId::new(),
            kind,
            name,
            position: [0.0, 0.0],
            inputs,
            outputs,
            hidden: false,
            group: None,
        }
    }

    /// Set the position
    pub fn with_position(mut self, x: f32, y: f32) -> Self {
        self.position = [x, y];
        self
    }

    /// Get an input socket by name
    pub fn input(&self, name: &str) -> Option<&Socket> {
        self.inputs.iter().find(|s| s.name == name)
    }

    /// Get a mutable input socket by name
    pub fn input_mut(&mut self, name: &str) -> Option<&mut Socket> {
        self.inputs.iter_mut().find(|s| s.name == name)
    }

    /// Get an input socket by index
    pub fn input_at(&self, index: usize) -> Option<&Socket> {
        self.inputs.get(index)
    }

    /// Get an output socket by name
    pub fn output(&self, name: &str) -> Option<&Socket> {
        self.outputs.iter().find(|s| s.name == name)
    }

    /// Get an output socket by index
    pub fn output_at(&self, index: usize) -> Option<&Socket> {
        self.outputs.get(index)
    }

    /// Get any socket by ID
    pub fn socket(&self, socket_id: SocketId) -> Option<&Socket> {
        self.sockets().find(|s| s.id == socket_id)
    }

    /// Get any mutable socket by ID
    pub fn socket_mut(&mut self, socket_id: SocketId) -> Option<&mut Socket> {
        self.inputs
            .iter_mut()
            .chain(self.outputs.iter_mut())
            .find(|s| s.id == socket_id)
    }

    /// All sockets, inputs first
    pub fn sockets(&self) -> impl Iterator<Item = &Socket> {
        self.inputs.iter().chain(self.outputs.iter())
    }
}
