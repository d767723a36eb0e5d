//! DOM Window object implementation.

use common::Size;

/// Browser window metrics relevant to embedded players.
#[derive(Clone, Debug)]
pub struct Window {
    /// Inner (viewport) dimensions in CSS pixels.
    pub inner_width: u32,
    pub inner_height: u32,
}

impl Window {
    pub fn new() -> Self {
        Self::with_viewport(1280, 720)
    }

    pub fn with_viewport(width: u32, height: u32) -> Self {
        Self {
            inner_width: width,
            inner_height: height,
        }
    }

    /// Resize the viewport.
    pub fn resize_to(&mut self, width: u32, height: u32) {
        self.inner_width = width;
        self.inner_height = height;
    }

    pub fn viewport(&self) -> Size {
        Size::new(f64::from(self.inner_width), f64::from(self.inner_height))
    }
}

impl Default for Window {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resize() {
        let mut window = Window::new();
        assert_eq!(window.viewport(), Size::new(1280.0, 720.0));
        window.resize_to(375, 812);
        assert_eq!(window.viewport(), Size::new(375.0, 812.0));
    }
}
