use std::cell::RefCell;
use std::rc::Rc;

use gloo::events::EventListener;
use invite_core::{AssetManifest, PreloadTracker};
use web_sys::HtmlImageElement;

use crate::error::{WebError, WebResult};

/// Warms the browser cache with every invitation image.
///
/// Holds the detached `<img>` elements and their listeners so loads are not
/// cancelled by garbage collection.
pub struct Preloader {
    _tracker: Rc<RefCell<PreloadTracker>>,
    _images: Vec<(HtmlImageElement, EventListener, EventListener)>,
}

impl Preloader {
    /// Request every manifest image.
    pub fn start(manifest: &AssetManifest) -> WebResult<Self> {
        let tracker = Rc::new(RefCell::new(PreloadTracker::new(manifest)));
        let mut images = Vec::with_capacity(manifest.image_count());

        for path in manifest.image_paths() {
            let image = HtmlImageElement::new().map_err(|e| WebError::js(&e))?;

            let on_load = {
                let tracker = Rc::clone(&tracker);
                let path = path.to_string();
                EventListener::new(&image, "load", move |_| {
                    if let Err(e) = tracker.borrow_mut().mark_loaded(&path) {
                        tracing::debug!(error = %e, "preload bookkeeping");
                    }
                })
            };
            let on_error = {
                let tracker = Rc::clone(&tracker);
                let path = path.to_string();
                EventListener::new(&image, "error", move |_| {
                    if let Err(e) = tracker.borrow_mut().mark_failed(&path) {
                        tracing::debug!(error = %e, "preload bookkeeping");
                    }
                })
            };

            image.set_src(path);
            images.push((image, on_load, on_error));
        }
        tracing::debug!(images = images.len(), "preloading");

        Ok(Self {
            _tracker: tracker,
            _images: images,
        })
    }
}
