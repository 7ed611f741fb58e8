use std::collections::HashMap;

use strum::{Display, EnumIter, EnumString, IntoStaticStr, VariantNames};

use crate::bitmask::BitMask;
use crate::element::AoiElement;
use crate::error::{AoiError, Result};

/// Types the factory can build by name
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter, VariantNames, IntoStaticStr,
)]
pub enum ObjectType {
    BitMask,
    AoiElement,
}

/// Object handed out by [`ObjectFactory::create_object`]
#[derive(Debug)]
pub enum FactoryObject {
    BitMask(BitMask),
    AoiElement(AoiElement),
}

impl FactoryObject {
    pub fn object_type(&self) -> ObjectType {
        match self {
            FactoryObject::BitMask(_) => ObjectType::BitMask,
            FactoryObject::AoiElement(_) => ObjectType::AoiElement,
        }
    }

    pub fn into_bit_mask(self) -> Option<BitMask> {
        match self {
            FactoryObject::BitMask(mask) => Some(mask),
            FactoryObject::AoiElement(_) => None,
        }
    }

    pub fn into_aoi_element(self) -> Option<AoiElement> {
        match self {
            FactoryObject::AoiElement(element) => Some(element),
            FactoryObject::BitMask(_) => None,
        }
    }
}

/// Creates engine objects from their type name and keeps track of how many
/// are alive.
#[derive(Debug, Default)]
pub struct ObjectFactory {
    live: HashMap<ObjectType, usize>,
    created: usize,
}

impl ObjectFactory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty object of the named type (`"BitMask"` or `"AoiElement"`)
    pub fn create_object(&mut self, type_name: &str) -> Result<FactoryObject> {
        let object_type: ObjectType = type_name
            .parse()
            .map_err(|_| AoiError::UnknownObjectType(type_name.to_owned()))?;

        self.created += 1;
        let object = match object_type {
            ObjectType::BitMask => FactoryObject::BitMask(BitMask::new()),
            ObjectType::AoiElement => {
                FactoryObject::AoiElement(AoiElement::new(format!("AOI {}", self.created)))
            }
        };
        *self.live.entry(object_type).or_default() += 1;
        tracing::debug!(%object_type, live = self.live_count(object_type), "created object");
        Ok(object)
    }

    /// Release an object created by this factory
    pub fn destroy_object(&mut self, object: FactoryObject) {
        let object_type = object.object_type();
        match self.live.get_mut(&object_type) {
            Some(live) if *live > 0 => *live -= 1,
            _ => tracing::warn!(%object_type, "destroying an object this factory did not create"),
        }
        tracing::debug!(%object_type, live = self.live_count(object_type), "destroyed object");
    }

    pub fn live_count(&self, object_type: ObjectType) -> usize {
        self.live.get(&object_type).copied().unwrap_or(0)
    }

    pub fn type_names() -> &'static [&'static str] {
        ObjectType::VARIANTS
    }
}
