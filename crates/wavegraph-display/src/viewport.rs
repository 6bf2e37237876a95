//! Viewport: the view's basic geometry, translation and scale
//!
//! A pure coordinate model. The four stored fields (zoom, translation, pixel
//! density, visible size) plus the collaborating store's sample count fully
//! determine every derived quantity; nothing derived is cached, so the model
//! can never disagree with itself mid-gesture.
//!
//! Mutations fire their observer lists synchronously, in registration order,
//! after the new value is stored. Observers are expected to set flags or
//! queue work, not to mutate the viewport re-entrantly.

/// Observer callback for zoom or translation changes
pub type NotifyHandler = Box<dyn FnMut()>;

/// Zoom, scroll and scale state for the graph
pub struct Viewport {
    zoom: f32,
    translation: f32,
    pixel_density: f32,
    visible_width: f32,
    visible_height: f32,
    sample_count: usize,
    zoom_handlers: Vec<NotifyHandler>,
    translate_handlers: Vec<NotifyHandler>,
}

impl Viewport {
    /// Create a viewport at zoom 1 with unit pixel density
    pub fn new() -> Self {
        Self {
            zoom: 1.0,
            translation: 0.0,
            pixel_density: 1.0,
            visible_width: 0.0,
            visible_height: 0.0,
            sample_count: 0,
            zoom_handlers: Vec::new(),
            translate_handlers: Vec::new(),
        }
    }

    // ── Stored state ─────────────────────────────────────────────────────

    /// Multiplicative horizontal scale, always >= 1
    pub fn zoom(&self) -> f32 {
        self.zoom
    }

    /// Set the zoom factor and notify zoom observers
    ///
    /// Values below 1 are clamped; zooming out past the full view has no
    /// meaning.
    pub fn set_zoom(&mut self, zoom: f32) {
        self.zoom = zoom.max(1.0);
        let mut handlers = std::mem::take(&mut self.zoom_handlers);
        for handler in &mut handlers {
            handler();
        }
        self.zoom_handlers = handlers;
    }

    /// Horizontal scroll offset in logical pixels
    ///
    /// Transiently positive (or below the far edge) while rubber-banding.
    pub fn translation(&self) -> f32 {
        self.translation
    }

    /// Set the translation and notify translation observers
    pub fn set_translation(&mut self, translation: f32) {
        self.translation = translation;
        let mut handlers = std::mem::take(&mut self.translate_handlers);
        for handler in &mut handlers {
            handler();
        }
        self.translate_handlers = handlers;
    }

    /// Device pixels per logical unit
    pub fn pixel_density(&self) -> f32 {
        self.pixel_density
    }

    /// On-screen width in logical units
    pub fn visible_width(&self) -> f32 {
        self.visible_width
    }

    /// On-screen height in logical units
    pub fn visible_height(&self) -> f32 {
        self.visible_height
    }

    /// Update the on-screen geometry supplied by the host
    pub fn set_layout(&mut self, width: f32, height: f32, pixel_density: f32) {
        self.visible_width = width.max(0.0);
        self.visible_height = height.max(0.0);
        self.pixel_density = pixel_density.max(f32::MIN_POSITIVE);
    }

    /// Sample count of the collaborating store
    ///
    /// Refreshed by the owning controller on every load; the viewport never
    /// holds a reference back into the store.
    pub fn set_sample_count(&mut self, count: usize) {
        self.sample_count = count;
    }

    pub fn sample_count(&self) -> usize {
        self.sample_count
    }

    // ── Derived quantities (always recomputed) ───────────────────────────

    /// Horizontal units currently on screen
    ///
    /// One unit is one physical pixel, capped by the sample count: a short
    /// track cannot fill more columns than it has samples.
    pub fn visible_unit_count(&self) -> usize {
        if self.sample_count == 0 {
            return 0;
        }
        ((self.visible_width * self.pixel_density) as usize).min(self.sample_count)
    }

    /// Total horizontal units across the zoomed extent, visible or not
    pub fn total_unit_count(&self) -> usize {
        if self.sample_count == 0 {
            return 0;
        }
        ((self.visible_unit_count() as f32 * self.zoom) as usize).min(self.sample_count)
    }

    /// First addressable unit at the left screen edge
    ///
    /// Negative while rubber-banding past the start of the track.
    pub fn starting_unit(&self) -> i64 {
        (-self.translation * self.pixel_density) as i64
    }

    // ── Observers ────────────────────────────────────────────────────────

    /// Register a zoom-change observer; fired synchronously after the value
    /// is stored, in registration order
    pub fn on_zoom(&mut self, handler: impl FnMut() + 'static) {
        self.zoom_handlers.push(Box::new(handler));
    }

    /// Register a translation-change observer
    pub fn on_translate(&mut self, handler: impl FnMut() + 'static) {
        self.translate_handlers.push(Box::new(handler));
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Viewport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Viewport")
            .field("zoom", &self.zoom)
            .field("translation", &self.translation)
            .field("pixel_density", &self.pixel_density)
            .field("visible_width", &self.visible_width)
            .field("visible_height", &self.visible_height)
            .field("sample_count", &self.sample_count)
            .field("zoom_handlers", &self.zoom_handlers.len())
            .field("translate_handlers", &self.translate_handlers.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    fn viewport(width: f32, density: f32, samples: usize) -> Viewport {
        let mut vp = Viewport::new();
        vp.set_layout(width, 400.0, density);
        vp.set_sample_count(samples);
        vp
    }

    #[test]
    fn test_unit_count_invariants() {
        // visible <= total <= sample_count must hold for any zoom >= 1
        let mut vp = viewport(1_000.0, 2.0, 500_000);
        for zoom in [1.0, 1.5, 4.0, 100.0, 10_000.0] {
            vp.set_zoom(zoom);
            let visible = vp.visible_unit_count();
            let total = vp.total_unit_count();
            assert!(visible <= total, "zoom {}: visible {} > total {}", zoom, visible, total);
            assert!(total <= vp.sample_count());
        }
    }

    #[test]
    fn test_unit_counts_capped_by_short_track() {
        let vp = viewport(1_000.0, 2.0, 300);
        assert_eq!(vp.visible_unit_count(), 300);
        assert_eq!(vp.total_unit_count(), 300);
    }

    #[test]
    fn test_starting_unit_follows_translation() {
        let mut vp = viewport(1_000.0, 2.0, 100_000);
        vp.set_translation(-50.0);
        assert_eq!(vp.starting_unit(), 100);

        // Positive translation (rubber-band before start) goes negative
        vp.set_translation(25.0);
        assert_eq!(vp.starting_unit(), -50);
    }

    #[test]
    fn test_zoom_clamped_to_one() {
        let mut vp = viewport(1_000.0, 1.0, 100_000);
        vp.set_zoom(0.25);
        assert_eq!(vp.zoom(), 1.0);
    }

    #[test]
    fn test_observers_fire_in_registration_order() {
        let order: Rc<std::cell::RefCell<Vec<u8>>> = Rc::default();

        let mut vp = Viewport::new();
        let first = Rc::clone(&order);
        vp.on_zoom(move || first.borrow_mut().push(1));
        let second = Rc::clone(&order);
        vp.on_zoom(move || second.borrow_mut().push(2));

        vp.set_zoom(2.0);
        assert_eq!(*order.borrow(), vec![1, 2]);
    }

    #[test]
    fn test_observer_sees_stored_value() {
        // Handlers fire after the mutation lands, so flag-based consumers
        // reading back through shared state observe the new value.
        let fired = Rc::new(Cell::new(false));
        let flag = Rc::clone(&fired);

        let mut vp = Viewport::new();
        vp.on_translate(move || flag.set(true));
        vp.set_translation(-10.0);

        assert!(fired.get());
        assert_eq!(vp.translation(), -10.0);
    }

    #[test]
    fn test_zoom_and_translate_observers_are_independent() {
        let zooms = Rc::new(Cell::new(0u32));
        let pans = Rc::new(Cell::new(0u32));

        let mut vp = Viewport::new();
        let z = Rc::clone(&zooms);
        vp.on_zoom(move || z.set(z.get() + 1));
        let p = Rc::clone(&pans);
        vp.on_translate(move || p.set(p.get() + 1));

        vp.set_zoom(3.0);
        vp.set_translation(-1.0);
        vp.set_translation(-2.0);

        assert_eq!(zooms.get(), 1);
        assert_eq!(pans.get(), 2);
    }
}
