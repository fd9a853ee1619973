//! Sizes and size ranges used to bound node measurement.

#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub const ZERO: Size = Size {
        width: 0.0,
        height: 0.0,
    };

    pub const UNBOUNDED: Size = Size {
        width: f32::INFINITY,
        height: f32::INFINITY,
    };
}

/// The (min, max) pair a node is measured within.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SizeRange {
    pub min: Size,
    pub max: Size,
}

impl SizeRange {
    pub const fn new(min: Size, max: Size) -> Self {
        Self { min, max }
    }

    /// A range that admits exactly one size.
    pub const fn tight(size: Size) -> Self {
        Self {
            min: size,
            max: size,
        }
    }

    /// A range from zero up to `max`.
    pub const fn loose(max: Size) -> Self {
        Self {
            min: Size::ZERO,
            max,
        }
    }

    /// Returns true if the range admits a single size.
    pub fn is_tight(&self) -> bool {
        self.min == self.max
    }

    /// Clamps `size` into this range, per axis. Where a range is inverted the
    /// maximum wins; NaN bounds are ignored.
    pub fn clamp(&self, size: Size) -> Size {
        Size {
            width: size.width.max(self.min.width).min(self.max.width),
            height: size.height.max(self.min.height).min(self.max.height),
        }
    }

    /// Returns true if `size` lies within the range on both axes.
    pub fn contains(&self, size: Size) -> bool {
        size.width >= self.min.width
            && size.width <= self.max.width
            && size.height >= self.min.height
            && size.height <= self.max.height
    }
}

impl Default for SizeRange {
    fn default() -> Self {
        Self::loose(Size::UNBOUNDED)
    }
}
