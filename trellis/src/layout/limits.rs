//! Size envelopes reported by elements during layout.
//!
//! Every element answers `limits()` with a (min, max) pair. Parents read the
//! envelopes of their children bottom-up and then allocate bounds top-down.
//! `FULL_EXTENT` is the "grow without bound" sentinel; it is finite so that
//! sums along a stacking axis never overflow to infinity.

use crate::primitives::{Axis, Insets, Size};

/// Sentinel extent meaning "unbounded".
pub const FULL_EXTENT: f32 = 1e6;

/// Min/max size envelope.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewLimits {
    pub min: Size,
    pub max: Size,
}

impl ViewLimits {
    /// Unconstrained: zero minimum, full-extent maximum.
    pub const FULL: Self = Self {
        min: Size::ZERO,
        max: Size::new(FULL_EXTENT, FULL_EXTENT),
    };

    #[inline]
    pub fn new(min: Size, max: Size) -> Self {
        debug_assert!(!min.width.is_nan() && !min.height.is_nan(), "NaN minimum in limits");
        debug_assert!(!max.width.is_nan() && !max.height.is_nan(), "NaN maximum in limits");
        Self { min, max }.validated()
    }

    /// Exactly one size.
    #[inline]
    pub fn fixed(size: Size) -> Self {
        Self::new(size, size)
    }

    /// Grow-only envelope with the given minimum.
    #[inline]
    pub fn at_least(min: Size) -> Self {
        Self::new(min, Size::new(FULL_EXTENT, FULL_EXTENT))
    }

    /// Clamp a size into the envelope.
    #[inline(always)]
    pub fn clamp(&self, size: Size) -> Size {
        debug_assert!(!size.width.is_nan(), "NaN width in layout");
        debug_assert!(!size.height.is_nan(), "NaN height in layout");
        Size {
            width: size.width.clamp(self.min.width, self.max.width),
            height: size.height.clamp(self.min.height, self.max.height),
        }
    }

    /// Check whether a size lies inside the envelope.
    #[inline]
    pub fn contains(&self, size: Size) -> bool {
        size.width >= self.min.width
            && size.width <= self.max.width
            && size.height >= self.min.height
            && size.height <= self.max.height
    }

    /// Minimum along `axis`.
    #[inline]
    pub fn min_along(&self, axis: Axis) -> f32 {
        self.min.along(axis)
    }

    /// Maximum along `axis`.
    #[inline]
    pub fn max_along(&self, axis: Axis) -> f32 {
        self.max.along(axis)
    }

    /// Grow both ends of the envelope by `insets`. The maximum is capped at
    /// `FULL_EXTENT` but never below the new minimum, since content such as a
    /// long virtualized list can legitimately exceed the sentinel.
    #[inline]
    pub fn inflate(&self, insets: &Insets) -> Self {
        let min = Size::new(
            self.min.width + insets.horizontal(),
            self.min.height + insets.vertical(),
        );
        let max = Size::new(
            (self.max.width + insets.horizontal())
                .min(FULL_EXTENT)
                .max(min.width),
            (self.max.height + insets.vertical())
                .min(FULL_EXTENT)
                .max(min.height),
        );
        Self { min, max }.validated()
    }

    /// Enforce `min <= max` on both axes.
    ///
    /// An inverted envelope is a defect in the element that produced it:
    /// debug builds fail fast, release builds raise the maximum to the
    /// minimum and keep going.
    #[inline]
    pub fn validated(mut self) -> Self {
        debug_assert!(
            self.min.width <= self.max.width && self.min.height <= self.max.height,
            "inverted limits: {self:?}"
        );
        if self.min.width > self.max.width || self.min.height > self.max.height {
            tracing::warn!(?self, "inverted limits clamped");
            self.max.width = self.max.width.max(self.min.width);
            self.max.height = self.max.height.max(self.min.height);
        }
        self
    }
}

impl Default for ViewLimits {
    fn default() -> Self {
        Self::FULL
    }
}

/// Flexibility weights used when distributing surplus space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewStretch {
    pub x: f32,
    pub y: f32,
}

impl ViewStretch {
    pub const NONE: Self = Self { x: 0.0, y: 0.0 };

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    #[inline]
    pub fn along(&self, axis: Axis) -> f32 {
        match axis {
            Axis::Horizontal => self.x,
            Axis::Vertical => self.y,
        }
    }
}

impl Default for ViewStretch {
    fn default() -> Self {
        Self { x: 1.0, y: 1.0 }
    }
}
