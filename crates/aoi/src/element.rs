//! Area of interest: graphic objects plus the pixel selection they produce.
//!
//! An [`AoiElement`] is the only way selections are edited. Each edit is
//! recorded as a graphic object, applied to the cached selection when it is
//! already built, and announced to observers with exactly one
//! [`AoiSignal::PointsChanged`] followed by one [`AoiSignal::Modified`].

use std::cell::OnceCell;

use crate::bitmask::BitMask;
use crate::error::Result;
use crate::graphic::{GraphicGroup, GraphicObject, GraphicShape, ObjectId};
use crate::iterator::BitMaskIterator;
use crate::signal::{AoiSignal, SignalHub, SubscriptionId};
use crate::types::{ModeType, PixelLocation, RasterExtent};

/// Pixels handed to [`AoiElement::add_points`] and friends
#[derive(Debug, Clone, Copy)]
pub enum PointSource<'a> {
    Single(PixelLocation),
    List(&'a [PixelLocation]),
    Mask(&'a BitMask),
}

impl PointSource<'_> {
    fn to_shape(self) -> GraphicShape {
        match self {
            PointSource::Single(point) => GraphicShape::Points { points: vec![point] },
            PointSource::List(points) => GraphicShape::Points {
                points: points.to_vec(),
            },
            PointSource::Mask(mask) => GraphicShape::Mask { mask: mask.clone() },
        }
    }
}

impl From<PixelLocation> for PointSource<'_> {
    fn from(point: PixelLocation) -> Self {
        PointSource::Single(point)
    }
}

impl<'a> From<&'a [PixelLocation]> for PointSource<'a> {
    fn from(points: &'a [PixelLocation]) -> Self {
        PointSource::List(points)
    }
}

impl<'a> From<&'a Vec<PixelLocation>> for PointSource<'a> {
    fn from(points: &'a Vec<PixelLocation>) -> Self {
        PointSource::List(points)
    }
}

impl<'a> From<&'a BitMask> for PointSource<'a> {
    fn from(mask: &'a BitMask) -> Self {
        PointSource::Mask(mask)
    }
}

#[derive(Debug)]
pub struct AoiElement {
    name: String,
    group: GraphicGroup,
    all_toggled: bool,
    selected: OnceCell<BitMask>,
    signals: SignalHub,
    revision: u64,
}

impl AoiElement {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            group: GraphicGroup::new(),
            all_toggled: false,
            selected: OnceCell::from(BitMask::new()),
            signals: SignalHub::default(),
            revision: 0,
        }
    }

    pub(crate) fn from_parts(
        name: String,
        group: GraphicGroup,
        all_toggled: bool,
        selection: Option<BitMask>,
    ) -> Self {
        let selected = match selection {
            Some(mask) => OnceCell::from(mask),
            None => OnceCell::new(),
        };
        Self {
            name,
            group,
            all_toggled,
            selected,
            signals: SignalHub::default(),
            revision: 0,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn rename(&mut self, name: impl Into<String>) {
        self.name = name.into();
        self.modified();
    }

    pub fn group(&self) -> &GraphicGroup {
        &self.group
    }

    /// Bumped on every change, starting at zero
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn attach<F>(&mut self, observer: F) -> SubscriptionId
    where
        F: FnMut(AoiSignal) + 'static,
    {
        self.signals.attach(observer)
    }

    pub fn detach(&mut self, id: SubscriptionId) -> bool {
        self.signals.detach(id)
    }

    /// Select the given pixels
    pub fn add_points<'a>(&mut self, source: impl Into<PointSource<'a>>) -> ObjectId {
        self.edit_points(source.into(), ModeType::Draw)
    }

    /// Deselect the given pixels
    pub fn remove_points<'a>(&mut self, source: impl Into<PointSource<'a>>) -> ObjectId {
        self.edit_points(source.into(), ModeType::Erase)
    }

    /// Flip the given pixels
    pub fn toggle_points<'a>(&mut self, source: impl Into<PointSource<'a>>) -> ObjectId {
        self.edit_points(source.into(), ModeType::Toggle)
    }

    pub fn add_point(&mut self, point: PixelLocation) -> ObjectId {
        self.add_points(point)
    }

    pub fn remove_point(&mut self, point: PixelLocation) -> ObjectId {
        self.remove_points(point)
    }

    pub fn toggle_point(&mut self, point: PixelLocation) -> ObjectId {
        self.toggle_points(point)
    }

    /// Invert the selection over the whole grid
    pub fn toggle_all_points(&mut self) {
        self.all_toggled = !self.all_toggled;
        if let Some(mask) = self.selected.get_mut() {
            mask.invert();
        }
        self.points_changed();
    }

    pub fn all_points_toggled(&self) -> bool {
        self.all_toggled
    }

    /// Drop every object and the toggled state
    pub fn clear_points(&mut self) {
        self.group.clear();
        self.all_toggled = false;
        self.selected = OnceCell::from(BitMask::new());
        self.points_changed();
    }

    /// The current selection, rasterized from the graphic objects if needed
    pub fn selected_points(&self) -> &BitMask {
        self.selected.get_or_init(|| {
            tracing::debug!(
                name = %self.name,
                objects = self.group.len(),
                toggled = self.all_toggled,
                "rasterizing aoi"
            );
            let mut mask = self.group.rasterize();
            if self.all_toggled {
                mask.invert();
            }
            mask
        })
    }

    /// Selected pixels inside the tracked area of the selection
    pub fn pixel_count(&self) -> u64 {
        self.selected_points().count()
    }

    /// Traversal of the selected pixels over the extent of `raster`
    pub fn pixels<R>(&self, raster: &R) -> BitMaskIterator<'_>
    where
        R: RasterExtent + ?Sized,
    {
        BitMaskIterator::from_raster(Some(self.selected_points()), raster)
    }

    /// Append a graphic object painted with `mode`
    pub fn add_object(&mut self, shape: GraphicShape, mode: ModeType) -> ObjectId {
        let id = self.group.add(shape, mode);
        self.invalidate();
        self.points_changed();
        id
    }

    pub fn remove_object(&mut self, id: ObjectId) -> Result<GraphicObject> {
        let object = self.group.remove(id)?;
        self.invalidate();
        self.points_changed();
        Ok(object)
    }

    pub fn set_object_shape(&mut self, id: ObjectId, shape: GraphicShape) -> Result<()> {
        self.group.get_mut(id)?.shape = shape;
        self.invalidate();
        self.points_changed();
        Ok(())
    }

    pub fn move_object(&mut self, id: ObjectId, dx: i32, dy: i32) -> Result<()> {
        let object = self.group.get_mut(id)?;
        object.shape = object.shape.translated(dx, dy);
        self.invalidate();
        self.points_changed();
        Ok(())
    }

    pub fn set_object_label(&mut self, id: ObjectId, label: Option<String>) -> Result<()> {
        self.group.get_mut(id)?.label = label;
        self.modified();
        Ok(())
    }

    /// Cached selection, if it is currently built
    pub(crate) fn cached_selection(&self) -> Option<&BitMask> {
        self.selected.get()
    }

    fn edit_points(&mut self, source: PointSource<'_>, mode: ModeType) -> ObjectId {
        let shape = source.to_shape();
        if let Some(mask) = self.selected.get_mut() {
            shape.rasterize_into(mask, mode);
        }
        // The stored object is painted before the final inversion.
        let stored = if self.all_toggled { mode.inverted() } else { mode };
        let id = self.group.add(shape, stored);
        self.points_changed();
        id
    }

    fn invalidate(&mut self) {
        self.selected.take();
    }

    fn points_changed(&mut self) {
        self.revision += 1;
        self.signals.emit(AoiSignal::PointsChanged);
        self.signals.emit(AoiSignal::Modified);
    }

    fn modified(&mut self) {
        self.revision += 1;
        self.signals.emit(AoiSignal::Modified);
    }
}

impl Clone for AoiElement {
    /// Observers stay attached to the original only.
    fn clone(&self) -> Self {
        Self::from_parts(
            self.name.clone(),
            self.group.clone(),
            self.all_toggled,
            self.selected.get().cloned(),
        )
    }
}
