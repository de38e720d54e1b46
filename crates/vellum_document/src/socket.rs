// SPDX-License-Identifier: MIT OR Apache-2.0
//! Socket definitions for node inputs/outputs.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a socket
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SocketId(pub Uuid);

impl SocketId {
    /// Create a new random socket ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SocketId {
    fn default() -> Self {
        Self::new()
    }
}

/// Socket direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SocketDirection {
    /// Input socket, accepts at most one incoming link
    Input,
    /// Output socket, may feed any number of links
    Output,
}

/// Data type that can flow through sockets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SocketType {
    /// Floating point value
    Float,
    /// Integer value
    Int,
    /// Boolean value
    Bool,
    /// 3D vector
    Vector,
    /// Color (RGBA)
    Color,
    /// String value
    String,
    /// Shading closure, carries no stored value
    Closure,
}

impl SocketType {
    /// The canonical persisted type-name string for this type.
    ///
    /// Interface items store type names as strings; these are the base
    /// spellings without any subtype suffix.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Float => "socket.float",
            Self::Int => "socket.int",
            Self::Bool => "socket.bool",
            Self::Vector => "socket.vector",
            Self::Color => "socket.color",
            Self::String => "socket.string",
            Self::Closure => "socket.closure",
        }
    }

    /// Whether a link between these types is conventional.
    ///
    /// Advisory only: legacy documents carry loosely typed links and the
    /// rewriter never rejects a connection based on types.
    pub fn can_connect_to(&self, other: &SocketType) -> bool {
        if self == other {
            return true;
        }
        matches!(
            (self, other),
            (Self::Int, Self::Float)
                | (Self::Float, Self::Int)
                | (Self::Float, Self::Vector | Self::Color)
                | (Self::Color, Self::Vector)
                | (Self::Vector, Self::Color)
        )
    }
}

/// Value that can be stored in a socket
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SocketValue {
    /// Floating point
    Float(f32),
    /// Integer
    Int(i32),
    /// Boolean
    Bool(bool),
    /// 3D vector
    Vector([f32; 3]),
    /// Color (RGBA)
    Color([f32; 4]),
    /// String
    String(String),
}

impl SocketValue {
    /// Get the socket type for this value
    pub fn socket_type(&self) -> SocketType {
        match self {
            Self::Float(_) => SocketType::Float,
            Self::Int(_) => SocketType::Int,
            Self::Bool(_) => SocketType::Bool,
            Self::Vector(_) => SocketType::Vector,
            Self::Color(_) => SocketType::Color,
            Self::String(_) => SocketType::String,
        }
    }
}

/// A typed, named connection point on a node.
///
/// Inputs carry a default value that applies while the socket is
/// unconnected; closure sockets have no stored value at all.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Socket {
    /// Unique socket ID
    pub id: SocketId,
    /// Socket name
    pub name: String,
    /// Socket direction
    pub direction: SocketDirection,
    /// Data type
    pub socket_type: SocketType,
    /// Default value used while unconnected
    pub value: Option<SocketValue>,
}

impl Socket {
    /// Create a new input socket
    pub fn input(name: impl Into<String>, socket_type: SocketType) -> Self {
        Self {
            id: SocketId::new(),
            name: name.into(),
            direction: SocketDirection::Input,
            socket_type,
            value: None,
        }
    }

    /// Create a new output socket
    pub fn output(name: impl Into<String>, socket_type: SocketType) -> Self {
        Self {
            id: SocketId::new(),
            name: name.into(),
            direction: SocketDirection::Output,
            socket_type,
            value: None,
        }
    }

    /// Set the default value
    pub fn with_value(mut self, value: SocketValue) -> Self {
        self.value = Some(value);
        self
    }

    /// Stored float value, if this socket holds one
    pub fn float_value(&self) -> Option<f32> {
        match self.value {
            Some(SocketValue::Float(v)) => Some(v),
            _ => None,
        }
    }

    /// Stored color value, if this socket holds one
    pub fn color_value(&self) -> Option<[f32; 4]> {
        match self.value {
            Some(SocketValue::Color(v)) => Some(v),
            _ => None,
        }
    }

    /// Overwrite the stored value with a float
    pub fn set_float_value(&mut self, value: f32) {
        self.value = Some(SocketValue::Float(value));
    }

    /// Overwrite the stored value with a color
    pub fn set_color_value(&mut self, value: [f32; 4]) {
        self.value = Some(SocketValue::Color(value));
    }
}
