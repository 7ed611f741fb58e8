//! # Area of Interest Library
//!
//! Pixel selections for raster analysis: a word-packed 2-D bit set over an
//! unbounded grid, a windowed traversal over it, and an AOI element that
//! records edits as graphic objects and notifies observers.
//!
//! ## Core Features
//!
//! - **BitMask**: set/get single pixels or 32-pixel words, rectangle operators,
//!   union/intersection/difference, inversion to an infinite selection
//! - **BitMaskIterator**: raster-order traversal restricted to a window or to a
//!   raster's extent
//! - **AoiElement**: add/remove/toggle points with one change notification per call
//! - **Persistence**: JSON documents and grayscale image import/export
//!
//! ## Quick Start
//!
//! ```rust
//! use aoi::{AoiElement, BitMaskIterator, PixelLocation, RasterDescriptor};
//!
//! let mut aoi = AoiElement::new("field");
//! aoi.add_points(&vec![PixelLocation::new(10, 28), PixelLocation::new(51, 54)]);
//! aoi.toggle_all_points();
//!
//! let raster = RasterDescriptor::new(100, 100);
//! let iterator = BitMaskIterator::from_raster(Some(aoi.selected_points()), &raster);
//! assert_eq!(iterator.pixel_count(), 100 * 100 - 2);
//! ```

pub mod bitmask;
pub mod element;
pub mod error;
pub mod factory;
pub mod graphic;
pub mod io;
pub mod iterator;
pub mod manager;
pub mod signal;
pub mod types;

pub use bitmask::{BitMask, BitMaskRecord, RegionView};
pub use element::{AoiElement, PointSource};
pub use error::{AoiError, Result};
pub use factory::{FactoryObject, ObjectFactory, ObjectType};
pub use graphic::{GraphicGroup, GraphicObject, GraphicShape, ObjectId};
pub use io::AoiDocument;
pub use iterator::BitMaskIterator;
pub use manager::{AoiCommand, AoiManager, AoiSummary};
pub use signal::{AoiSignal, SignalHub, SubscriptionId};
pub use types::{BoundingBox, ModeType, PixelLocation, RasterDescriptor, RasterExtent};
