use invite_core::{AudioError, AudioSink, Cue};
use wasm_bindgen_futures::JsFuture;
use web_sys::HtmlAudioElement;

use crate::error::describe;

/// Plays cues through two preloaded `<audio>` elements.
///
/// A rejected play promise (typically the autoplay policy) is logged once
/// it settles; it never reaches the controller.
#[derive(Debug, Clone)]
pub struct WebAudio {
    door_open: HtmlAudioElement,
    page_flip: HtmlAudioElement,
}

impl WebAudio {
    /// Create one `<audio>` element per cue, loading from [`Cue::path`].
    pub fn new() -> Result<Self, AudioError> {
        Ok(Self {
            door_open: element(&Cue::DoorOpen.path())?,
            page_flip: element(&Cue::PageFlip.path())?,
        })
    }

    fn element_for(&self, cue: Cue) -> &HtmlAudioElement {
        match cue {
            Cue::DoorOpen => &self.door_open,
            Cue::PageFlip => &self.page_flip,
        }
    }
}

fn element(src: &str) -> Result<HtmlAudioElement, AudioError> {
    HtmlAudioElement::new_with_src(src).map_err(|e| AudioError::Unavailable(describe(&e)))
}

impl AudioSink for WebAudio {
    fn play(&mut self, cue: Cue) -> Result<(), AudioError> {
        let audio = self.element_for(cue);
        audio.set_current_time(0.0);
        let promise = audio
            .play()
            .map_err(|e| AudioError::Rejected(describe(&e)))?;
        wasm_bindgen_futures::spawn_local(async move {
            if let Err(e) = JsFuture::from(promise).await {
                tracing::warn!(%cue, error = %describe(&e), "sound play failed");
            }
        });
        Ok(())
    }
}
