// SPDX-License-Identifier: MIT OR Apache-2.0
//! Default socket layouts for each node kind.

use crate::node::NodeKind;
use crate::socket::{Socket, SocketType, SocketValue};

/// Default input and output sockets for a node kind.
///
/// Sockets are created with fresh IDs, so every call yields an independent
/// layout suitable for a new node instance.
pub fn default_sockets(kind: &NodeKind) -> (Vec<Socket>, Vec<Socket>) {
    match kind {
        NodeKind::SurfaceOutput => (
            vec![
                Socket::input("Surface", SocketType::Closure),
                Socket::input("Volume", SocketType::Closure),
                Socket::input("Displacement", SocketType::Vector)
                    .with_value(SocketValue::Vector([0.0, 0.0, 0.0])),
            ],
            vec![],
        ),
        NodeKind::SurfaceBsdf => (
            vec![
                Socket::input("Base Color", SocketType::Color)
                    .with_value(SocketValue::Color([0.8, 0.8, 0.8, 1.0])),
                Socket::input("Metallic", SocketType::Float).with_value(SocketValue::Float(0.0)),
                Socket::input("Roughness", SocketType::Float).with_value(SocketValue::Float(0.5)),
                Socket::input("Emission Color", SocketType::Color)
                    .with_value(SocketValue::Color([0.0, 0.0, 0.0, 1.0])),
                Socket::input("Emission Strength", SocketType::Float)
                    .with_value(SocketValue::Float(0.0)),
                Socket::input("Alpha", SocketType::Float).with_value(SocketValue::Float(1.0)),
            ],
            vec![Socket::output("Surface", SocketType::Closure)],
        ),
        NodeKind::SpecularBsdf => (
            vec![
                Socket::input("Base Color", SocketType::Color)
                    .with_value(SocketValue::Color([0.8, 0.8, 0.8, 1.0])),
                Socket::input("Specular", SocketType::Color)
                    .with_value(SocketValue::Color([0.03, 0.03, 0.03, 1.0])),
                Socket::input("Roughness", SocketType::Float).with_value(SocketValue::Float(0.2)),
                Socket::input("Transparency", SocketType::Float)
                    .with_value(SocketValue::Float(0.0)),
            ],
            vec![Socket::output("Surface", SocketType::Closure)],
        ),
        NodeKind::TransparentBsdf => (
            vec![Socket::input("Color", SocketType::Color)
                .with_value(SocketValue::Color([1.0, 1.0, 1.0, 1.0]))],
            vec![Socket::output("Surface", SocketType::Closure)],
        ),
        NodeKind::MixClosure => (
            vec![
                Socket::input("Factor", SocketType::Float).with_value(SocketValue::Float(0.5)),
                Socket::input("A", SocketType::Closure),
                Socket::input("B", SocketType::Closure),
            ],
            vec![Socket::output("Result", SocketType::Closure)],
        ),
        NodeKind::AddClosure => (
            vec![
                Socket::input("A", SocketType::Closure),
                Socket::input("B", SocketType::Closure),
            ],
            vec![Socket::output("Result", SocketType::Closure)],
        ),
        NodeKind::Reroute => (
            vec![Socket::input("Input", SocketType::Closure)],
            vec![Socket::output("Output", SocketType::Closure)],
        ),
        // Group instance sockets are driven by the group's interface and
        // materialized by the editor, not by the catalog.
        NodeKind::Group => (vec![], vec![]),
        NodeKind::Math(_) => (
            vec![
                Socket::input("A", SocketType::Float).with_value(SocketValue::Float(0.5)),
                Socket::input("B", SocketType::Float).with_value(SocketValue::Float(0.5)),
            ],
            vec![Socket::output("Result", SocketType::Float)],
        ),
        NodeKind::ImageTexture => (
            vec![Socket::input("Vector", SocketType::Vector)],
            vec![
                Socket::output("Color", SocketType::Color),
                Socket::output("Alpha", SocketType::Float),
            ],
        ),
        NodeKind::Value => (
            vec![],
            vec![Socket::output("Value", SocketType::Float).with_value(SocketValue::Float(0.0))],
        ),
        NodeKind::Other(_) => (vec![], vec![]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::MathOp;

    #[test]
    fn test_math_sockets() {
        let (inputs, outputs) = default_sockets(&NodeKind::Math(MathOp::GreaterThan));
        assert_eq!(inputs.len(), 2);
        assert_eq!(outputs.len(), 1);
        assert_eq!(inputs[0].float_value(), Some(0.5));
    }

    #[test]
    fn test_fresh_ids_per_call() {
        let (a, _) = default_sockets(&NodeKind::MixClosure);
        let (b, _) = default_sockets(&NodeKind::MixClosure);
        assert_ne!(a[0].id, b[0].id);
    }
}
