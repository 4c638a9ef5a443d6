//! Tile handles and the proxy-tile lookup contract.

use std::collections::HashMap;
use std::rc::Rc;

use glam::Mat4;

use crate::labels::LabelSet;

/// Quadtree tile address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TileId {
    pub x: i32,
    pub y: i32,
    pub z: u8,
}

impl TileId {
    pub fn new(x: i32, y: i32, z: u8) -> Self {
        Self { x, y, z }
    }

    /// The enclosing tile one zoom level up.
    pub fn parent(&self) -> Option<TileId> {
        if self.z == 0 {
            return None;
        }
        Some(TileId {
            x: self.x >> 1,
            y: self.y >> 1,
            z: self.z - 1,
        })
    }

    /// One of the four covering tiles one zoom level down, `i` in `0..4`.
    pub fn child(&self, i: u8) -> TileId {
        debug_assert!(i < 4);
        TileId {
            x: (self.x << 1) + (i & 1) as i32,
            y: (self.y << 1) + (i >> 1) as i32,
            z: self.z + 1,
        }
    }
}

/// A visible map tile: address, transform, and per-style label sets.
#[derive(Debug)]
pub struct Tile {
    id: TileId,
    source_id: u32,
    proxy: bool,
    mvp: Mat4,
    meshes: HashMap<u32, Rc<LabelSet>>,
}

impl Tile {
    pub fn new(id: TileId, source_id: u32, mvp: Mat4) -> Self {
        Self {
            id,
            source_id,
            proxy: false,
            mvp,
            meshes: HashMap::new(),
        }
    }

    pub fn with_proxy(mut self, proxy: bool) -> Self {
        self.proxy = proxy;
        self
    }

    /// Attach the label set produced for a style at tile build.
    pub fn insert_mesh(&mut self, style_id: u32, set: Rc<LabelSet>) {
        self.meshes.insert(style_id, set);
    }

    /// The style's label set on this tile, if the style produced one.
    /// A mesh of a non-label style is simply absent here.
    pub fn mesh(&self, style_id: u32) -> Option<&Rc<LabelSet>> {
        self.meshes.get(&style_id)
    }

    pub fn id(&self) -> TileId {
        self.id
    }

    pub fn source_id(&self) -> u32 {
        self.source_id
    }

    pub fn is_proxy(&self) -> bool {
        self.proxy
    }

    pub fn mvp(&self) -> &Mat4 {
        &self.mvp
    }
}

/// Lookup of off-screen cached tiles for zoom-transition proxies.
pub trait TileCache {
    fn get(&self, source_id: u32, id: TileId) -> Option<Rc<Tile>>;
}

/// The empty cache: proxies resolve only against the live tile list.
impl TileCache for () {
    fn get(&self, _source_id: u32, _id: TileId) -> Option<Rc<Tile>> {
        None
    }
}

impl TileCache for HashMap<(u32, TileId), Rc<Tile>> {
    fn get(&self, source_id: u32, id: TileId) -> Option<Rc<Tile>> {
        HashMap::get(self, &(source_id, id)).cloned()
    }
}
