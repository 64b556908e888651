//! Page Configuration

/// Page configuration options
#[derive(Debug, Clone)]
pub struct Config {
    /// Viewport width (CSS px)
    pub viewport_width: f64,

    /// Viewport height (CSS px)
    pub viewport_height: f64,

    /// Reveal animated sections on scroll
    pub enable_reveal: bool,

    /// Defer `img[data-src]` until near the viewport
    pub enable_lazy_images: bool,

    /// Track keyboard vs. mouse navigation
    pub enable_keyboard_modality: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            viewport_width: 1280.0,
            viewport_height: 720.0,
            enable_reveal: true,
            enable_lazy_images: cfg!(feature = "lazy-images"),
            enable_keyboard_modality: true,
        }
    }
}
