// SPDX-License-Identifier: MIT OR Apache-2.0
//! Top-level document container and entity records.

use crate::tree::{NodeTree, NodeTreeId};
use crate::version::VersionTag;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Current render engine identifier
pub const ENGINE_RASTER: &str = "VELLUM_RASTER";
/// Retired render engine identifier still found in old documents
pub const ENGINE_RASTER_LEGACY: &str = "VELLUM_RASTER_LEGACY";

/// Unique identifier for an entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntityId(pub Uuid);

impl EntityId {
    /// Create a new random entity ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for EntityId {
    fn default() -> Self {
        Self::new()
    }
}

/// Discrete surface blend mode, the legacy transparency model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum BlendMethod {
    /// No transparency
    #[default]
    Opaque,
    /// Binary transparency against a threshold
    Clip,
    /// Stochastic transparency
    Hashed,
    /// Sorted alpha blending
    Blend,
}

/// Discrete shadow transparency mode paired with [`BlendMethod`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ShadowMethod {
    /// Casts no shadow
    None,
    /// Opaque shadow
    #[default]
    Opaque,
    /// Binary shadow transparency
    Clip,
    /// Stochastic shadow transparency
    Hashed,
}

/// A scene entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scene {
    /// Unique ID
    pub id: EntityId,
    /// Scene name
    pub name: String,
    /// Render engine identifier string
    pub engine: String,
    /// Embedded compositing tree
    pub node_tree: Option<NodeTree>,
}

impl Scene {
    /// Create a scene using the current render engine
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: EntityId::new(),
            name: name.into(),
            engine: ENGINE_RASTER.to_string(),
            node_tree: None,
        }
    }
}

/// A material entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Material {
    /// Unique ID
    pub id: EntityId,
    /// Material name
    pub name: String,
    /// Whether the shading tree drives this material
    pub use_nodes: bool,
    /// Legacy discrete blend mode
    pub blend_method: BlendMethod,
    /// Legacy discrete shadow mode
    pub shadow_method: ShadowMethod,
    /// Clip threshold used by [`BlendMethod::Clip`]
    pub alpha_threshold: f32,
    /// Embedded shading tree
    pub node_tree: Option<NodeTree>,
}

impl Material {
    /// Create a material with default shading settings
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: EntityId::new(),
            name: name.into(),
            use_nodes: true,
            blend_method: BlendMethod::default(),
            shadow_method: ShadowMethod::default(),
            alpha_threshold: 0.5,
            node_tree: None,
        }
    }
}

/// A world entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct World {
    /// Unique ID
    pub id: EntityId,
    /// World name
    pub name: String,
    /// Resolution of baked light probes
    pub probe_resolution: u32,
    /// Embedded background shading tree
    pub node_tree: Option<NodeTree>,
}

impl World {
    /// Default probe resolution written for new worlds
    pub const DEFAULT_PROBE_RESOLUTION: u32 = 128;

    /// Create a world with default lighting settings
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: EntityId::new(),
            name: name.into(),
            probe_resolution: Self::DEFAULT_PROBE_RESOLUTION,
            node_tree: None,
        }
    }
}

/// A point cloud entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PointCloud {
    /// Unique ID
    pub id: EntityId,
    /// Point cloud name
    pub name: String,
    /// Per-point radii
    pub radii: Vec<f32>,
}

impl PointCloud {
    /// Create an empty point cloud
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: EntityId::new(),
            name: name.into(),
            radii: Vec::new(),
        }
    }
}

/// Key addressing one node tree within a document.
///
/// Keys stay valid across graph rewrites, which makes a key list a
/// restartable walk: collect once, then resolve each key when (re)visiting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeTreeKey {
    /// Tree embedded in a scene
    Scene(EntityId),
    /// Tree embedded in a material
    Material(EntityId),
    /// Tree embedded in a world
    World(EntityId),
    /// Document-level group tree
    Group(NodeTreeId),
}

/// Deserialized unit containing all entities from one saved file.
///
/// Group trees are document-level entities referenced (not owned) by group
/// nodes, so a group used by many trees still appears exactly once in a
/// walk over [`Document::tree_keys`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    /// Document name, typically the source file stem
    pub name: String,
    /// Schema revision this document was written with
    pub version: VersionTag,
    /// Scenes by ID
    pub scenes: IndexMap<EntityId, Scene>,
    /// Materials by ID
    pub materials: IndexMap<EntityId, Material>,
    /// Worlds by ID
    pub worlds: IndexMap<EntityId, World>,
    /// Point clouds by ID
    pub point_clouds: IndexMap<EntityId, PointCloud>,
    /// Reusable group trees by ID
    pub node_groups: IndexMap<NodeTreeId, NodeTree>,
}

impl Document {
    /// Create an empty document at the given version
    pub fn new(name: impl Into<String>, version: VersionTag) -> Self {
        Self {
            name: name.into(),
            version,
            scenes: IndexMap::new(),
            materials: IndexMap::new(),
            worlds: IndexMap::new(),
            point_clouds: IndexMap::new(),
            node_groups: IndexMap::new(),
        }
    }

    /// Add a scene
    pub fn add_scene(&mut self, scene: Scene) -> EntityId {
        let id = scene.id;
        self.scenes.insert(id, scene);
        id
    }

    /// Add a material
    pub fn add_material(&mut self, material: Material) -> EntityId {
        let id = material.id;
        self.materials.insert(id, material);
        id
    }

    /// Add a world
    pub fn add_world(&mut self, world: World) -> EntityId {
        let id = world.id;
        self.worlds.insert(id, world);
        id
    }

    /// Add a point cloud
    pub fn add_point_cloud(&mut self, point_cloud: PointCloud) -> EntityId {
        let id = point_cloud.id;
        self.point_clouds.insert(id, point_cloud);
        id
    }

    /// Add a group tree, returning its key
    pub fn add_node_group(&mut self, tree: NodeTree) -> NodeTreeId {
        let id = NodeTreeId::new();
        self.node_groups.insert(id, tree);
        id
    }

    /// The first scene in collection order, if any.
    ///
    /// Iteration order over entities is otherwise unspecified; callers that
    /// depend on "the first scene" must go through this accessor.
    pub fn first_scene(&self) -> Option<&Scene> {
        self.scenes.values().next()
    }

    /// Keys for every node tree in the document, each tree exactly once.
    ///
    /// Covers trees embedded in scenes, materials and worlds plus all
    /// document-level groups, however deeply group nodes nest. Order is
    /// unspecified.
    pub fn tree_keys(&self) -> Vec<NodeTreeKey> {
        let mut keys = Vec::new();
        for scene in self.scenes.values() {
            if scene.node_tree.is_some() {
                keys.push(NodeTreeKey::Scene(scene.id));
            }
        }
        for material in self.materials.values() {
            if material.node_tree.is_some() {
                keys.push(NodeTreeKey::Material(material.id));
            }
        }
        for world in self.worlds.values() {
            if world.node_tree.is_some() {
                keys.push(NodeTreeKey::World(world.id));
            }
        }
        for id in self.node_groups.keys() {
            keys.push(NodeTreeKey::Group(*id));
        }
        keys
    }

    /// Resolve a tree key
    pub fn tree(&self, key: &NodeTreeKey) -> Option<&NodeTree> {
        match key {
            NodeTreeKey::Scene(id) => self.scenes.get(id)?.node_tree.as_ref(),
            NodeTreeKey::Material(id) => self.materials.get(id)?.node_tree.as_ref(),
            NodeTreeKey::World(id) => self.worlds.get(id)?.node_tree.as_ref(),
            NodeTreeKey::Group(id) => self.node_groups.get(id),
        }
    }

    /// Resolve a tree key, mutable
    pub fn tree_mut(&mut self, key: &NodeTreeKey) -> Option<&mut NodeTree> {
        match key {
            NodeTreeKey::Scene(id) => self.scenes.get_mut(id)?.node_tree.as_mut(),
            NodeTreeKey::Material(id) => self.materials.get_mut(id)?.node_tree.as_mut(),
            NodeTreeKey::World(id) => self.worlds.get_mut(id)?.node_tree.as_mut(),
            NodeTreeKey::Group(id) => self.node_groups.get_mut(id),
        }
    }

    /// Visit every node tree once, in unspecified order
    pub fn for_each_tree_mut(&mut self, mut f: impl FnMut(&mut NodeTree)) {
        for scene in self.scenes.values_mut() {
            if let Some(tree) = scene.node_tree.as_mut() {
                f(tree);
            }
        }
        for material in self.materials.values_mut() {
            if let Some(tree) = material.node_tree.as_mut() {
                f(tree);
            }
        }
        for world in self.worlds.values_mut() {
            if let Some(tree) = world.node_tree.as_mut() {
                f(tree);
            }
        }
        for tree in self.node_groups.values_mut() {
            f(tree);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::NodeKind;

    #[test]
    fn test_tree_keys_visit_every_tree_once() {
        let mut doc = Document::new("doc", VersionTag::new(1, 0));
        let mut material = Material::new("mat");
        material.node_tree = Some(NodeTree::new("mat tree"));
        doc.add_material(material);
        doc.add_material(Material::new("treeless"));

        let group = doc.add_node_group(NodeTree::new("group"));

        // Two group nodes referencing the same group: still one key.
        let mut world = World::new("world");
        let mut tree = NodeTree::new("world tree");
        for _ in 0..2 {
            let node = tree.add_node(NodeKind::Group);
            if let Some(node) = tree.node_mut(node) {
                node.group = Some(group);
            }
        }
        world.node_tree = Some(tree);
        doc.add_world(world);

        let keys = doc.tree_keys();
        assert_eq!(keys.len(), 3);
        let groups = keys
            .iter()
            .filter(|k| matches!(k, NodeTreeKey::Group(_)))
            .count();
        assert_eq!(groups, 1);
    }

    #[test]
    fn test_walk_is_restartable() {
        let mut doc = Document::new("doc", VersionTag::default());
        let mut material = Material::new("mat");
        material.node_tree = Some(NodeTree::new("tree"));
        doc.add_material(material);

        let keys = doc.tree_keys();
        // Resolving the same key list twice yields the same trees.
        for _ in 0..2 {
            for key in &keys {
                assert!(doc.tree_mut(key).is_some());
            }
        }
    }

    #[test]
    fn test_document_round_trip() {
        let mut doc = Document::new("doc", VersionTag::new(2, 60));
        let mut material = Material::new("mat");
        let mut tree = NodeTree::new("tree");
        tree.add_node(NodeKind::SurfaceOutput);
        material.node_tree = Some(tree);
        doc.add_material(material);

        let text = ron::ser::to_string_pretty(&doc, ron::ser::PrettyConfig::default()).unwrap();
        let loaded: Document = ron::from_str(&text).unwrap();
        assert_eq!(loaded.version, VersionTag::new(2, 60));
        assert_eq!(loaded.materials.len(), 1);
    }
}
