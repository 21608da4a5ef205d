//! Pure calculation functions for image dimensions.
//!
//! All functions here are pure and testable without any I/O or images.

/// Fit `source` dimensions into a `max_edge` × `max_edge` box.
///
/// Keeps the aspect ratio and never upscales: an image that already fits is
/// returned unchanged. The longer edge becomes exactly `max_edge`; the
/// shorter one is rounded and never drops below 1.
///
/// ```
/// # use cam_site::imaging::fit_within;
/// assert_eq!(fit_within((2560, 1920), 256), (256, 192));
/// assert_eq!(fit_within((1920, 2560), 256), (192, 256));
/// assert_eq!(fit_within((200, 100), 256), (200, 100));
/// ```
pub fn fit_within(source: (u32, u32), max_edge: u32) -> (u32, u32) {
    let (w, h) = source;
    if w <= max_edge && h <= max_edge {
        return (w, h);
    }

    let scale = |edge: u32, long: u32| -> u32 {
        ((edge as f64 * max_edge as f64 / long as f64).round() as u32).max(1)
    };

    if w >= h {
        (max_edge, scale(h, w))
    } else {
        (scale(w, h), max_edge)
    }
}
