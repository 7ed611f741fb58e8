//! Symbolic drawing objects that make up an AOI.

mod shape;

use std::fmt;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

pub use shape::GraphicShape;

use crate::bitmask::BitMask;
use crate::error::{AoiError, Result};
use crate::types::ModeType;

/// Stable handle of an object inside a [`GraphicGroup`].
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema,
)]
#[serde(transparent)]
pub struct ObjectId(u32);

impl ObjectId {
    pub fn value(self) -> u32 {
        self.0
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct GraphicObject {
    pub id: ObjectId,
    pub shape: GraphicShape,
    pub mode: ModeType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

/// Ordered collection of graphic objects. Later objects paint over earlier ones.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct GraphicGroup {
    objects: Vec<GraphicObject>,
    next_id: u32,
}

impl GraphicGroup {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an object and return its handle
    pub fn add(&mut self, shape: GraphicShape, mode: ModeType) -> ObjectId {
        let id = ObjectId(self.next_id);
        self.next_id += 1;
        self.objects.push(GraphicObject {
            id,
            shape,
            mode,
            label: None,
        });
        id
    }

    pub fn remove(&mut self, id: ObjectId) -> Result<GraphicObject> {
        let index = self
            .objects
            .iter()
            .position(|object| object.id == id)
            .ok_or(AoiError::UnknownObject(id))?;
        Ok(self.objects.remove(index))
    }

    pub fn get(&self, id: ObjectId) -> Option<&GraphicObject> {
        self.objects.iter().find(|object| object.id == id)
    }

    pub fn get_mut(&mut self, id: ObjectId) -> Result<&mut GraphicObject> {
        self.objects
            .iter_mut()
            .find(|object| object.id == id)
            .ok_or(AoiError::UnknownObject(id))
    }

    pub fn iter(&self) -> impl Iterator<Item = &GraphicObject> {
        self.objects.iter()
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Remove every object. Handles are not reused afterwards.
    pub fn clear(&mut self) {
        self.objects.clear();
    }

    /// Paint every object, in order, onto an empty mask
    pub fn rasterize(&self) -> BitMask {
        let mut mask = BitMask::new();
        for object in &self.objects {
            object.shape.rasterize_into(&mut mask, object.mode);
        }
        mask
    }
}
