// SPDX-License-Identifier: MIT OR Apache-2.0
//! Classification of where a shading tree's transparency comes from.
//!
//! Old documents express surface transparency as a discrete per-material
//! blend mode; the current model is one continuous alpha value compared
//! against a threshold. To migrate losslessly, the closure subgraph feeding
//! the surface output is classified: if its effective opacity reduces to a
//! single driving scalar, a threshold comparison can be materialized around
//! that scalar. Trees that blend alpha more than once cannot be converted
//! automatically and are reported instead.

use vellum_document::{
    BlendMethod, Link, MathOp, NodeKind, NodeTree, SocketId, SocketType,
};

/// Recursion cap for the classifier; deeper (or cyclic) trees classify as
/// complex rather than overflowing the stack.
const MAX_DEPTH: u32 = 100;

/// Threshold sentinel requesting a forced-opaque conversion.
pub const FORCE_OPAQUE_THRESHOLD: f32 = 2.0;

/// Classification of a closure subgraph's effective opacity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlphaState {
    /// Fully opaque
    Opaque,
    /// Fully transparent
    FullyTransparent,
    /// Driven by a single scalar strictly between 0 and 1
    SemiTransparent,
    /// More than one independent blending decision
    Complex,
}

/// A source of transparency inside the closure part of a shading tree.
///
/// Sources combine down the tree to find where the alpha comes from; more
/// than one independent source makes the tree complex and unconvertible.
#[derive(Debug, Clone, Copy)]
pub struct AlphaSource {
    /// Driving socket, present only for semi-transparent sources
    pub socket: Option<SocketId>,
    /// Classification state
    pub state: AlphaState,
    /// True when the socket carries transparency rather than alpha
    /// (i.e. `1 - alpha`)
    pub inverted: bool,
}

impl AlphaSource {
    /// Fully opaque source
    pub fn opaque() -> Self {
        Self {
            socket: None,
            state: AlphaState::Opaque,
            inverted: false,
        }
    }

    /// Fully transparent source
    pub fn fully_transparent() -> Self {
        Self {
            socket: None,
            state: AlphaState::FullyTransparent,
            inverted: false,
        }
    }

    /// Semi-transparent source driven by `socket`
    pub fn semi(socket: SocketId, inverted: bool) -> Self {
        Self {
            socket: Some(socket),
            state: AlphaState::SemiTransparent,
            inverted,
        }
    }

    /// Unconvertible source
    pub fn complex() -> Self {
        Self {
            socket: None,
            state: AlphaState::Complex,
            inverted: false,
        }
    }

    /// Whether this source is fully opaque
    pub fn is_opaque(&self) -> bool {
        self.state == AlphaState::Opaque
    }

    /// Whether this source is fully transparent
    pub fn is_fully_transparent(&self) -> bool {
        self.state == AlphaState::FullyTransparent
    }

    /// Whether this source carries any transparency at all
    pub fn is_transparent(&self) -> bool {
        self.state != AlphaState::Opaque
    }

    /// Whether this source is driven by a scalar
    pub fn is_semi_transparent(&self) -> bool {
        self.state == AlphaState::SemiTransparent
    }

    /// Whether this source cannot be converted
    pub fn is_complex(&self) -> bool {
        self.state == AlphaState::Complex
    }

    /// Combine two sources blended by a factor socket.
    ///
    /// A semi-transparent operand inside a true mix always yields complex:
    /// the operand's own scalar plus the mix factor are two independent
    /// blending decisions. One fully transparent and one opaque operand
    /// reduce to the factor itself, with inverted sense when the second
    /// operand is the transparent one.
    pub fn mix(a: &AlphaSource, b: &AlphaSource, factor: SocketId) -> Self {
        if a.is_complex() || b.is_complex() {
            return Self::complex();
        }
        if a.is_semi_transparent() || b.is_semi_transparent() {
            return Self::complex();
        }
        if a.is_fully_transparent() && b.is_fully_transparent() {
            return Self::fully_transparent();
        }
        if a.is_opaque() && b.is_opaque() {
            return Self::opaque();
        }
        // Exactly one side is fully transparent.
        Self::semi(factor, !a.is_transparent())
    }

    /// Combine two sources added together.
    ///
    /// Addition keeps whichever operand carries transparency; a
    /// semi-transparent operand meeting any transparent operand means two
    /// sources, hence complex.
    pub fn add(a: &AlphaSource, b: &AlphaSource) -> Self {
        if a.is_complex() || b.is_complex() {
            return Self::complex();
        }
        if a.is_semi_transparent() && b.is_transparent() {
            return Self::complex();
        }
        if a.is_transparent() && b.is_semi_transparent() {
            return Self::complex();
        }
        if a.is_transparent() {
            *a
        } else {
            *b
        }
    }
}

/// Classify the closure subgraph reachable from an input socket.
///
/// An unconnected socket is opaque black. Unrecognized node kinds are
/// opaque; group instances are never introspected and classify as complex.
pub fn classify_alpha_source(tree: &NodeTree, socket: SocketId, depth: u32) -> AlphaSource {
    if depth > MAX_DEPTH {
        // Also guards against link cycles in corrupt documents.
        return AlphaSource::complex();
    }

    let Some(link) = tree.incoming_link(socket) else {
        return AlphaSource::opaque();
    };
    let Some(node) = tree.node(link.from_node) else {
        return AlphaSource::opaque();
    };

    match &node.kind {
        NodeKind::Reroute => match node.input_at(0) {
            Some(input) => classify_alpha_source(tree, input.id, depth + 1),
            None => AlphaSource::opaque(),
        },

        NodeKind::Group => AlphaSource::complex(),

        NodeKind::TransparentBsdf => {
            let Some(color) = node.input("Color") else {
                return AlphaSource::opaque();
            };
            if tree.incoming_link(color.id).is_none() {
                if let Some([r, g, b, _]) = color.color_value() {
                    if r == 0.0 && g == 0.0 && b == 0.0 {
                        return AlphaSource::opaque();
                    }
                    if r == 1.0 && g == 1.0 && b == 1.0 {
                        return AlphaSource::fully_transparent();
                    }
                }
            }
            AlphaSource::semi(color.id, true)
        }

        NodeKind::MixClosure => {
            let Some(factor) = node.input("Factor") else {
                return AlphaSource::opaque();
            };
            let (Some(a), Some(b)) = (node.input_at(1), node.input_at(2)) else {
                return AlphaSource::opaque();
            };
            let src_a = classify_alpha_source(tree, a.id, depth + 1);
            let src_b = classify_alpha_source(tree, b.id, depth + 1);

            if tree.incoming_link(factor.id).is_none() {
                // A factor pinned at exactly 0 or 1 selects one operand.
                match factor.float_value() {
                    Some(v) if v == 0.0 => return src_a,
                    Some(v) if v == 1.0 => return src_b,
                    _ => {}
                }
            }
            AlphaSource::mix(&src_a, &src_b, factor.id)
        }

        NodeKind::AddClosure => {
            let (Some(a), Some(b)) = (node.input_at(0), node.input_at(1)) else {
                return AlphaSource::opaque();
            };
            let src_a = classify_alpha_source(tree, a.id, depth + 1);
            let src_b = classify_alpha_source(tree, b.id, depth + 1);
            AlphaSource::add(&src_a, &src_b)
        }

        NodeKind::SurfaceBsdf => {
            let Some(alpha) = node.input("Alpha") else {
                return AlphaSource::opaque();
            };
            if tree.incoming_link(alpha.id).is_none() {
                match alpha.float_value() {
                    Some(v) if v == 0.0 => return AlphaSource::fully_transparent(),
                    Some(v) if v == 1.0 => return AlphaSource::opaque(),
                    _ => {}
                }
            }
            AlphaSource::semi(alpha.id, false)
        }

        NodeKind::SpecularBsdf => {
            let Some(transparency) = node.input("Transparency") else {
                return AlphaSource::opaque();
            };
            if tree.incoming_link(transparency.id).is_none() {
                match transparency.float_value() {
                    Some(v) if v == 0.0 => return AlphaSource::opaque(),
                    Some(v) if v == 1.0 => return AlphaSource::fully_transparent(),
                    _ => {}
                }
            }
            AlphaSource::semi(transparency.id, true)
        }

        _ => AlphaSource::opaque(),
    }
}

/// Outcome of converting one shading tree
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConversionOutcome {
    /// The tree was converted, or there was nothing to convert
    Converted,
    /// The verdict was unambiguous; write this discrete state directly
    SetDiscrete(BlendMethod),
    /// The tree blends alpha more than once and was left untouched
    Complex,
}

/// Convert a shading tree's alpha input to a step function against
/// `threshold`.
///
/// Passing [`FORCE_OPAQUE_THRESHOLD`] disconnects the driving socket and
/// pins it to the opaque constant instead. A connected driving socket gets
/// a greater-than math node spliced into the link; an unconnected one has
/// the comparison evaluated here and the boolean written as its new
/// default.
pub fn apply_alpha_threshold(tree: &mut NodeTree, threshold: f32) -> ConversionOutcome {
    let Some(output) = tree.first_of_kind(&NodeKind::SurfaceOutput) else {
        return ConversionOutcome::Converted;
    };
    let Some(surface) = tree.node(output).and_then(|n| n.input("Surface")).map(|s| s.id) else {
        return ConversionOutcome::Converted;
    };

    let alpha = classify_alpha_source(tree, surface, 0);

    if alpha.is_complex() {
        return ConversionOutcome::Complex;
    }
    let Some(socket_id) = alpha.socket else {
        return ConversionOutcome::SetDiscrete(match alpha.state {
            AlphaState::FullyTransparent => BlendMethod::Blend,
            _ => BlendMethod::Opaque,
        });
    };

    if threshold == FORCE_OPAQUE_THRESHOLD {
        if let Some(link_id) = tree.incoming_link(socket_id).map(|l| l.id) {
            tree.remove_link(link_id);
        }
        let value = if alpha.inverted { 0.0 } else { 1.0 };
        write_scalar(tree, socket_id, value);
        return ConversionOutcome::Converted;
    }

    if let Some(link) = tree.incoming_link(socket_id).cloned() {
        insert_threshold_node(tree, &link, threshold, alpha.inverted);
    } else {
        evaluate_threshold_in_place(tree, socket_id, threshold, alpha.inverted);
    }
    ConversionOutcome::Converted
}

/// Write an alpha-sense scalar into a socket default, widening to a color
/// where the socket stores one.
fn write_scalar(tree: &mut NodeTree, socket_id: SocketId, value: f32) {
    let Some(socket) = tree.socket_mut(socket_id) else {
        return;
    };
    match socket.socket_type {
        SocketType::Color => socket.set_color_value([value, value, value, 1.0]),
        _ => socket.set_float_value(value),
    }
}

/// Splice a greater-than comparison between a link's source and its target.
fn insert_threshold_node(tree: &mut NodeTree, link: &Link, threshold: f32, inverted: bool) {
    tree.remove_link(link.id);

    let to_pos = tree.node(link.to_node).map(|n| n.position).unwrap_or_default();
    let from_pos = tree.node(link.from_node).map(|n| n.position).unwrap_or(to_pos);

    let math = tree.add_node(NodeKind::Math(MathOp::GreaterThan));
    if let Some(node) = tree.node_mut(math) {
        node.hidden = true;
        node.position = [to_pos[0] - 170.0, to_pos[1].min(from_pos[1])];
    }

    let sockets = tree.node(math).map(|n| {
        (
            n.input("A").map(|s| s.id),
            n.input("B").map(|s| s.id),
            n.output("Result").map(|s| s.id),
        )
    });
    let Some((Some(value_in), Some(threshold_in), Some(result))) = sockets else {
        return;
    };

    // An inverted-sense source compares against the mirrored threshold.
    let operand = if inverted { 1.0 - threshold } else { threshold };
    if let Some(socket) = tree.socket_mut(threshold_in) {
        socket.set_float_value(operand);
    }

    tree.add_link(link.from_node, link.from_socket, math, value_in)
        .ok();
    tree.add_link(math, result, link.to_node, link.to_socket).ok();
}

/// Evaluate the threshold comparison now and store the boolean result as
/// the socket's new default.
fn evaluate_threshold_in_place(
    tree: &mut NodeTree,
    socket_id: SocketId,
    threshold: f32,
    inverted: bool,
) {
    let Some(socket) = tree.socket_mut(socket_id) else {
        return;
    };
    match socket.socket_type {
        SocketType::Color => {
            let Some([r, g, b, _]) = socket.color_value() else {
                return;
            };
            let sum = r + g + b;
            // Skip the division when possible to avoid float imprecision.
            let average = if sum >= 3.0 { 1.0 } else { sum / 3.0 };
            let passed = if inverted {
                average > 1.0 - threshold
            } else {
                average > threshold
            };
            let value = if passed { 1.0 } else { 0.0 };
            socket.set_color_value([value, value, value, 1.0]);
        }
        _ => {
            let Some(current) = socket.float_value() else {
                return;
            };
            let passed = if inverted {
                current > 1.0 - threshold
            } else {
                current > threshold
            };
            socket.set_float_value(if passed { 1.0 } else { 0.0 });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vellum_document::{NodeId, SocketValue};

    /// Tree with a surface output; returns (tree, output id).
    fn output_tree() -> (NodeTree, NodeId) {
        let mut tree = NodeTree::new("shading");
        let output = tree.add_node(NodeKind::SurfaceOutput);
        (tree, output)
    }

    fn connect_surface(tree: &mut NodeTree, from: NodeId, output: NodeId) {
        let from_socket = tree
            .node(from)
            .unwrap()
            .outputs
            .first()
            .unwrap()
            .id;
        let to_socket = tree.node(output).unwrap().input("Surface").unwrap().id;
        tree.add_link(from, from_socket, output, to_socket).unwrap();
    }

    fn surface_socket(tree: &NodeTree, output: NodeId) -> SocketId {
        tree.node(output).unwrap().input("Surface").unwrap().id
    }

    fn set_input_value(tree: &mut NodeTree, node: NodeId, name: &str, value: SocketValue) {
        let node = tree.node_mut(node).unwrap();
        node.input_mut(name).unwrap().value = Some(value);
    }

    // ---- algebra ----------------------------------------------------------

    #[test]
    fn test_mix_is_commutative_in_state() {
        let factor = SocketId::new();
        let cases = [
            AlphaSource::opaque(),
            AlphaSource::fully_transparent(),
            AlphaSource::semi(SocketId::new(), false),
            AlphaSource::complex(),
        ];
        for a in &cases {
            for b in &cases {
                let ab = AlphaSource::mix(a, b, factor);
                let ba = AlphaSource::mix(b, a, factor);
                assert_eq!(ab.state, ba.state);
            }
        }
    }

    #[test]
    fn test_add_identities() {
        let opaque = AlphaSource::opaque();
        let transparent = AlphaSource::fully_transparent();
        assert!(AlphaSource::add(&opaque, &opaque).is_opaque());
        assert!(AlphaSource::add(&transparent, &transparent).is_fully_transparent());
    }

    #[test]
    fn test_complex_operand_forces_complex() {
        let complex = AlphaSource::complex();
        let opaque = AlphaSource::opaque();
        assert!(AlphaSource::mix(&complex, &opaque, SocketId::new()).is_complex());
        assert!(AlphaSource::mix(&opaque, &complex, SocketId::new()).is_complex());
        assert!(AlphaSource::add(&complex, &opaque).is_complex());
        assert!(AlphaSource::add(&opaque, &complex).is_complex());
    }

    #[test]
    fn test_mix_of_transparent_and_opaque_follows_factor() {
        let factor = SocketId::new();
        let src = AlphaSource::mix(
            &AlphaSource::fully_transparent(),
            &AlphaSource::opaque(),
            factor,
        );
        assert!(src.is_semi_transparent());
        assert_eq!(src.socket, Some(factor));
        // First operand transparent: factor behaves as alpha.
        assert!(!src.inverted);

        let src = AlphaSource::mix(
            &AlphaSource::opaque(),
            &AlphaSource::fully_transparent(),
            factor,
        );
        assert!(src.inverted);
    }

    #[test]
    fn test_semi_meeting_transparency_is_complex() {
        let semi = AlphaSource::semi(SocketId::new(), false);
        let transparent = AlphaSource::fully_transparent();
        let opaque = AlphaSource::opaque();
        assert!(AlphaSource::add(&semi, &transparent).is_complex());
        // Added to opaque, the scalar survives.
        assert!(AlphaSource::add(&semi, &opaque).is_semi_transparent());
        // A true mix always has a second decision in its factor.
        assert!(AlphaSource::mix(&semi, &opaque, SocketId::new()).is_complex());
    }

    // ---- classification ---------------------------------------------------

    #[test]
    fn test_unconnected_surface_is_opaque() {
        let (tree, output) = output_tree();
        let source = classify_alpha_source(&tree, surface_socket(&tree, output), 0);
        assert!(source.is_opaque());
    }

    #[test]
    fn test_black_transparent_closure_is_opaque() {
        let (mut tree, output) = output_tree();
        let bsdf = tree.add_node(NodeKind::TransparentBsdf);
        set_input_value(&mut tree, bsdf, "Color", SocketValue::Color([0.0, 0.0, 0.0, 1.0]));
        connect_surface(&mut tree, bsdf, output);

        let source = classify_alpha_source(&tree, surface_socket(&tree, output), 0);
        assert!(source.is_opaque());
        assert!(source.socket.is_none());
    }

    #[test]
    fn test_white_transparent_closure_is_fully_transparent() {
        let (mut tree, output) = output_tree();
        let bsdf = tree.add_node(NodeKind::TransparentBsdf);
        connect_surface(&mut tree, bsdf, output);

        // Catalog default color is white.
        let source = classify_alpha_source(&tree, surface_socket(&tree, output), 0);
        assert!(source.is_fully_transparent());
        assert!(source.socket.is_none());
    }

    #[test]
    fn test_reroute_is_followed() {
        let (mut tree, output) = output_tree();
        let bsdf = tree.add_node(NodeKind::TransparentBsdf);
        let reroute = tree.add_node(NodeKind::Reroute);

        let bsdf_out = tree.node(bsdf).unwrap().output("Surface").unwrap().id;
        let reroute_in = tree.node(reroute).unwrap().input("Input").unwrap().id;
        tree.add_link(bsdf, bsdf_out, reroute, reroute_in).unwrap();
        connect_surface(&mut tree, reroute, output);

        let source = classify_alpha_source(&tree, surface_socket(&tree, output), 0);
        assert!(source.is_fully_transparent());
    }

    #[test]
    fn test_group_is_complex() {
        let (mut tree, output) = output_tree();
        let group = tree.add_node(NodeKind::Group);
        tree.add_socket(
            group,
            vellum_document::SocketDirection::Output,
            SocketType::Closure,
            "Surface",
        )
        .unwrap();
        connect_surface(&mut tree, group, output);

        let source = classify_alpha_source(&tree, surface_socket(&tree, output), 0);
        assert!(source.is_complex());
    }

    #[test]
    fn test_cycle_hits_depth_cap() {
        let (mut tree, output) = output_tree();
        let a = tree.add_node(NodeKind::Reroute);
        let b = tree.add_node(NodeKind::Reroute);

        let a_out = tree.node(a).unwrap().output("Output").unwrap().id;
        let a_in = tree.node(a).unwrap().input("Input").unwrap().id;
        let b_out = tree.node(b).unwrap().output("Output").unwrap().id;
        let b_in = tree.node(b).unwrap().input("Input").unwrap().id;
        tree.add_link(a, a_out, b, b_in).unwrap();
        tree.add_link(b, b_out, a, a_in).unwrap();
        connect_surface(&mut tree, a, output);

        let source = classify_alpha_source(&tree, surface_socket(&tree, output), 0);
        assert!(source.is_complex());
    }

    #[test]
    fn test_pinned_mix_factor_selects_operand() {
        let (mut tree, output) = output_tree();
        let mix = tree.add_node(NodeKind::MixClosure);
        let transparent = tree.add_node(NodeKind::TransparentBsdf);

        let t_out = tree.node(transparent).unwrap().output("Surface").unwrap().id;
        let b_in = tree.node(mix).unwrap().input("B").unwrap().id;
        tree.add_link(transparent, t_out, mix, b_in).unwrap();
        connect_surface(&mut tree, mix, output);

        set_input_value(&mut tree, mix, "Factor", SocketValue::Float(1.0));
        let source = classify_alpha_source(&tree, surface_socket(&tree, output), 0);
        assert!(source.is_fully_transparent());

        set_input_value(&mut tree, mix, "Factor", SocketValue::Float(0.0));
        let source = classify_alpha_source(&tree, surface_socket(&tree, output), 0);
        assert!(source.is_opaque());
    }

    // ---- conversion -------------------------------------------------------

    #[test]
    fn test_black_transparent_closure_sets_opaque_state() {
        let (mut tree, output) = output_tree();
        let bsdf = tree.add_node(NodeKind::TransparentBsdf);
        set_input_value(&mut tree, bsdf, "Color", SocketValue::Color([0.0, 0.0, 0.0, 1.0]));
        connect_surface(&mut tree, bsdf, output);
        let nodes_before = tree.node_count();

        let outcome = apply_alpha_threshold(&mut tree, FORCE_OPAQUE_THRESHOLD);
        assert_eq!(outcome, ConversionOutcome::SetDiscrete(BlendMethod::Opaque));
        assert_eq!(tree.node_count(), nodes_before);
    }

    #[test]
    fn test_white_transparent_closure_sets_transparent_state() {
        let (mut tree, output) = output_tree();
        let bsdf = tree.add_node(NodeKind::TransparentBsdf);
        connect_surface(&mut tree, bsdf, output);
        let nodes_before = tree.node_count();

        let outcome = apply_alpha_threshold(&mut tree, 0.5);
        assert_eq!(outcome, ConversionOutcome::SetDiscrete(BlendMethod::Blend));
        assert_eq!(tree.node_count(), nodes_before);
    }

    #[test]
    fn test_connected_alpha_gets_threshold_node() {
        let (mut tree, output) = output_tree();
        let bsdf = tree.add_node(NodeKind::SurfaceBsdf);
        let texture = tree.add_node(NodeKind::ImageTexture);
        connect_surface(&mut tree, bsdf, output);

        let tex_alpha = tree.node(texture).unwrap().output("Alpha").unwrap().id;
        let bsdf_alpha = tree.node(bsdf).unwrap().input("Alpha").unwrap().id;
        tree.add_link(texture, tex_alpha, bsdf, bsdf_alpha).unwrap();

        let outcome = apply_alpha_threshold(&mut tree, 0.5);
        assert_eq!(outcome, ConversionOutcome::Converted);

        // Exactly one comparison node was spliced in.
        let math = tree
            .first_of_kind(&NodeKind::Math(MathOp::GreaterThan))
            .unwrap();
        assert_eq!(tree.node_count(), 4);
        let math_node = tree.node(math).unwrap();
        assert_eq!(math_node.input("B").unwrap().float_value(), Some(0.5));

        // Texture feeds the comparison, the comparison feeds the alpha.
        let math_a = math_node.input("A").unwrap().id;
        let incoming = tree.incoming_link(math_a).unwrap();
        assert_eq!(incoming.from_socket, tex_alpha);
        let rerouted = tree.incoming_link(bsdf_alpha).unwrap();
        assert_eq!(rerouted.from_node, math);
        assert!(tree.validate().is_empty());
    }

    #[test]
    fn test_unconnected_alpha_is_evaluated_in_place() {
        let (mut tree, output) = output_tree();
        let bsdf = tree.add_node(NodeKind::SurfaceBsdf);
        set_input_value(&mut tree, bsdf, "Alpha", SocketValue::Float(0.7));
        connect_surface(&mut tree, bsdf, output);
        let nodes_before = tree.node_count();

        let outcome = apply_alpha_threshold(&mut tree, 0.5);
        assert_eq!(outcome, ConversionOutcome::Converted);
        assert_eq!(tree.node_count(), nodes_before);

        let alpha = tree.node(bsdf).unwrap().input("Alpha").unwrap();
        assert_eq!(alpha.float_value(), Some(1.0));
    }

    #[test]
    fn test_force_opaque_clears_link_and_default() {
        let (mut tree, output) = output_tree();
        let bsdf = tree.add_node(NodeKind::SurfaceBsdf);
        let texture = tree.add_node(NodeKind::ImageTexture);
        connect_surface(&mut tree, bsdf, output);

        let tex_alpha = tree.node(texture).unwrap().output("Alpha").unwrap().id;
        let bsdf_alpha = tree.node(bsdf).unwrap().input("Alpha").unwrap().id;
        tree.add_link(texture, tex_alpha, bsdf, bsdf_alpha).unwrap();

        let outcome = apply_alpha_threshold(&mut tree, FORCE_OPAQUE_THRESHOLD);
        assert_eq!(outcome, ConversionOutcome::Converted);
        assert!(tree.incoming_link(bsdf_alpha).is_none());
        let alpha = tree.node(bsdf).unwrap().input("Alpha").unwrap();
        assert_eq!(alpha.float_value(), Some(1.0));
    }

    #[test]
    fn test_two_mixed_semi_sources_are_complex() {
        let (mut tree, output) = output_tree();
        let mix = tree.add_node(NodeKind::MixClosure);
        let surface = tree.add_node(NodeKind::SurfaceBsdf);
        let specular = tree.add_node(NodeKind::SpecularBsdf);
        set_input_value(&mut tree, surface, "Alpha", SocketValue::Float(0.3));
        set_input_value(&mut tree, specular, "Transparency", SocketValue::Float(0.4));

        let s_out = tree.node(surface).unwrap().output("Surface").unwrap().id;
        let p_out = tree.node(specular).unwrap().output("Surface").unwrap().id;
        let a_in = tree.node(mix).unwrap().input("A").unwrap().id;
        let b_in = tree.node(mix).unwrap().input("B").unwrap().id;
        tree.add_link(surface, s_out, mix, a_in).unwrap();
        tree.add_link(specular, p_out, mix, b_in).unwrap();
        connect_surface(&mut tree, mix, output);

        assert_eq!(
            apply_alpha_threshold(&mut tree, 0.5),
            ConversionOutcome::Complex
        );
    }
}
