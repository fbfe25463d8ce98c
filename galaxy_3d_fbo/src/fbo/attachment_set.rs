/// AttachmentSet - the attachments of a render target keyed by point
///
/// Besides the map, the set keeps two ordered views rebuilt on every
/// insert and remove:
/// - the draw order: active color points, ascending index
/// - the active points: color points, then Depth, Stencil, DepthStencil

use rustc_hash::FxHashMap;

use crate::fbo::Attachment;
use crate::graphics_device::AttachmentPoint;

#[derive(Clone, Debug, Default)]
pub struct AttachmentSet {
    attachments: FxHashMap<AttachmentPoint, Attachment>,
    draw_order: Vec<AttachmentPoint>,
    active: Vec<AttachmentPoint>,
}

impl AttachmentSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the attachment at `point`
    ///
    /// Returns the replaced attachment.
    pub fn insert(&mut self, point: AttachmentPoint, attachment: Attachment) -> Option<Attachment> {
        let previous = self.attachments.insert(point, attachment);
        self.build_draw_order();
        previous
    }

    /// Remove the attachment at `point`
    pub fn remove(&mut self, point: AttachmentPoint) -> Option<Attachment> {
        let removed = self.attachments.remove(&point);
        if removed.is_some() {
            self.build_draw_order();
        }
        removed
    }

    pub fn get(&self, point: AttachmentPoint) -> Option<&Attachment> {
        self.attachments.get(&point)
    }

    pub(crate) fn get_mut(&mut self, point: AttachmentPoint) -> Option<&mut Attachment> {
        self.attachments.get_mut(&point)
    }

    pub fn contains(&self, point: AttachmentPoint) -> bool {
        self.attachments.contains_key(&point)
    }

    pub fn len(&self) -> usize {
        self.attachments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attachments.is_empty()
    }

    /// Active color points in draw-buffer order
    pub fn draw_order(&self) -> &[AttachmentPoint] {
        &self.draw_order
    }

    /// Every active point, colors first
    pub fn active_points(&self) -> &[AttachmentPoint] {
        &self.active
    }

    /// Attachments in active-point order
    pub fn iter(&self) -> impl Iterator<Item = (AttachmentPoint, &Attachment)> + '_ {
        self.active.iter()
            .filter_map(move |point| self.attachments.get(point).map(|attachment| (*point, attachment)))
    }

    /// Rebuild the draw order and active point list from the map
    pub fn build_draw_order(&mut self) {
        let mut points: Vec<AttachmentPoint> = self.attachments.keys().copied().collect();
        // AttachmentPoint orders colors by index, then Depth, Stencil, DepthStencil
        points.sort();
        self.draw_order = points.iter().copied().filter(|point| point.is_color()).collect();
        self.active = points;
    }

    /// True if any attachment carries a resolve texture
    pub fn has_resolve(&self) -> bool {
        self.attachments.values().any(|attachment| attachment.resolve().is_some())
    }

    /// Recompute the dirty flags of every active attachment
    pub(crate) fn mark_dirty(&mut self, auto_resolve: bool, auto_mipmap: bool) {
        for attachment in self.attachments.values_mut() {
            attachment.mark_dirty(auto_resolve, auto_mipmap);
        }
    }
}

#[cfg(test)]
#[path = "attachment_set_tests.rs"]
mod tests;
