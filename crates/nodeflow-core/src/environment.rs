//! Environment trait snapshot handed to every node block.

use crate::geometry::Size;

/// Coarse width/height class of the hosting container.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum SizeClass {
    #[default]
    Unspecified,
    Compact,
    Regular,
}

/// Immutable snapshot of the environment a node is measured in.
///
/// A context copies the controller's snapshot when it is created, so later
/// changes to the controller never reach work already scheduled.
#[derive(Clone, Debug, PartialEq)]
pub struct TraitCollection {
    pub display_scale: f32,
    pub horizontal_size_class: SizeClass,
    pub vertical_size_class: SizeClass,
    pub container_size: Size,
}

impl Default for TraitCollection {
    fn default() -> Self {
        Self {
            display_scale: 1.0,
            horizontal_size_class: SizeClass::Unspecified,
            vertical_size_class: SizeClass::Unspecified,
            container_size: Size::ZERO,
        }
    }
}

impl TraitCollection {
    pub fn with_display_scale(mut self, display_scale: f32) -> Self {
        self.display_scale = display_scale;
        self
    }

    pub fn with_container_size(mut self, container_size: Size) -> Self {
        self.container_size = container_size;
        self
    }

    pub fn with_size_classes(mut self, horizontal: SizeClass, vertical: SizeClass) -> Self {
        self.horizontal_size_class = horizontal;
        self.vertical_size_class = vertical;
        self
    }
}
