bitflags::bitflags! {
    /// Paint-state categories changed since they were last captured into a command record.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    pub struct PendingFlags: u32 {
        /// Source color or pattern.
        const SOURCE = 1 << 0;
        /// Global opacity.
        const OPACITY = 1 << 1;
        /// Fill rule, compositing operator, quality hints.
        const PAINT_HINTS = 1 << 2;
        /// User transform. Reserved: flushing it emits nothing yet.
        const TRANSFORM = 1 << 3;
        /// Clip box or region.
        const CLIP = 1 << 4;
        /// Stroke parameters. Reserved: flushing it emits nothing yet.
        const STROKE_PARAMS = 1 << 5;

        /// State every drawing operation depends on.
        const BASE_FLAGS = Self::OPACITY.bits() | Self::PAINT_HINTS.bits() | Self::CLIP.bits();
    }
}

impl PendingFlags {
    /// Every category that can emit a record.
    pub const ALL_STATE: PendingFlags = PendingFlags::BASE_FLAGS
        .union(PendingFlags::SOURCE)
        .union(PendingFlags::TRANSFORM)
        .union(PendingFlags::STROKE_PARAMS);

    /// Required state of box fills and fill-all.
    pub const FILL_BOX: PendingFlags = PendingFlags::BASE_FLAGS.union(PendingFlags::SOURCE);

    /// Required state of path fills.
    pub const FILL_PATH: PendingFlags = PendingFlags::FILL_BOX.union(PendingFlags::TRANSFORM);

    /// Required state of strokes.
    pub const STROKE: PendingFlags = PendingFlags::FILL_PATH.union(PendingFlags::STROKE_PARAMS);

    /// Required state of image blits.
    pub const BLIT: PendingFlags = PendingFlags::BASE_FLAGS.union(PendingFlags::TRANSFORM);

    /// Required state of box filters.
    pub const FILTER_BOX: PendingFlags = PendingFlags::BASE_FLAGS;

    /// Required state of path filters.
    pub const FILTER_PATH: PendingFlags = PendingFlags::BASE_FLAGS.union(PendingFlags::TRANSFORM);

    /// Required state of path-based mask builders.
    pub const MASK_PATH: PendingFlags = PendingFlags::TRANSFORM;

    /// Mark `flags` dirty.
    pub fn mark(&mut self, flags: PendingFlags) {
        self.insert(flags);
    }

    /// Clear exactly the categories a successful flush processed.
    ///
    /// `processed` must be a subset of the dirty set; the toggle is the exact inverse of the mark.
    pub fn clear_flushed(&mut self, processed: PendingFlags) {
        debug_assert!(self.contains(processed));
        self.toggle(processed);
    }
}
