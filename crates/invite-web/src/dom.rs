//! [`View`] over the host page's DOM.

use std::collections::HashMap;

use invite_core::screen::ACTIVE_CLASS;
use invite_core::{DoorPhase, PageMarker, ScreenId, View};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, Element, HtmlButtonElement, HtmlElement};

use crate::error::{WebError, WebResult, describe};

/// Left door panel.
pub const DOOR_LEFT_ID: &str = "door-left";
/// Right door panel.
pub const DOOR_RIGHT_ID: &str = "door-right";
/// Text band under the doors.
pub const BOTTOM_TEXT_ID: &str = "bottom-text";
/// Invitation card behind the doors; tapping it opens the flipbook.
pub const INVITATION_BEHIND_ID: &str = "invitation-behind";
/// Previous-page button.
pub const PREV_BUTTON_ID: &str = "prev-btn";
/// Next-page button.
pub const NEXT_BUTTON_ID: &str = "next-flip-btn";
/// Page counter text.
pub const PAGE_INFO_ID: &str = "page-info";
/// Back-to-invitation button.
pub const BACK_BUTTON_ID: &str = "back-to-door";
/// Book container.
pub const BOOK_ID: &str = "flipbook";

/// Selector for the book's page elements, in page order.
pub const PAGE_SELECTOR: &str = "#flipbook .page";

/// Elements styled purely by CSS off the door screen's classes. They are
/// checked for at startup but never touched.
const DECORATION_IDS: [&str; 4] = [
    DOOR_LEFT_ID,
    DOOR_RIGHT_ID,
    BOTTOM_TEXT_ID,
    INVITATION_BEHIND_ID,
];

/// CSS `display` value for a fallback page.
pub fn display_value(visible: bool) -> &'static str {
    if visible { "flex" } else { "none" }
}

/// Look up an element the page must provide.
pub fn require(document: &Document, id: &'static str) -> WebResult<Element> {
    document
        .get_element_by_id(id)
        .ok_or(WebError::MissingElement(id))
}

/// Live handles to every element the controller drives.
#[derive(Debug, Clone)]
pub struct DomView {
    screens: HashMap<ScreenId, Element>,
    page_info: Element,
    prev: HtmlButtonElement,
    next: HtmlButtonElement,
    pages: Vec<HtmlElement>,
}

impl DomView {
    /// Resolve the DOM contract. Fails on the first missing element.
    pub fn bind(document: &Document) -> WebResult<Self> {
        let mut screens = HashMap::new();
        for screen in ScreenId::ALL {
            screens.insert(screen, require(document, screen.element_id())?);
        }
        for id in DECORATION_IDS {
            require(document, id)?;
        }

        let prev = button(document, PREV_BUTTON_ID)?;
        let next = button(document, NEXT_BUTTON_ID)?;
        let page_info = require(document, PAGE_INFO_ID)?;
        require(document, BOOK_ID)?;

        let nodes = document
            .query_selector_all(PAGE_SELECTOR)
            .map_err(|e| WebError::js(&e))?;
        let pages = (0..nodes.length())
            .filter_map(|i| nodes.item(i))
            .filter_map(|node| node.dyn_into::<HtmlElement>().ok())
            .collect::<Vec<_>>();
        tracing::debug!(pages = pages.len(), "dom bound");

        Ok(Self {
            screens,
            page_info,
            prev,
            next,
            pages,
        })
    }

    fn page(&self, page: u32) -> Option<&HtmlElement> {
        let idx = usize::try_from(page).ok()?.checked_sub(1)?;
        self.pages.get(idx)
    }
}

fn button(document: &Document, id: &'static str) -> WebResult<HtmlButtonElement> {
    require(document, id)?
        .dyn_into::<HtmlButtonElement>()
        .map_err(|_| WebError::MissingElement(id))
}

fn toggle(element: &Element, class: &str, on: bool) {
    let result = if on {
        element.class_list().add_1(class)
    } else {
        element.class_list().remove_1(class)
    };
    log_failure(result, class);
}

fn log_failure(result: Result<(), JsValue>, what: &str) {
    if let Err(e) = result {
        tracing::warn!(what, error = %describe(&e), "dom update failed");
    }
}

impl View for DomView {
    fn set_screen_active(&mut self, screen: ScreenId, active: bool) {
        if let Some(element) = self.screens.get(&screen) {
            toggle(element, ACTIVE_CLASS, active);
        }
    }

    fn set_door_phase(&mut self, phase: DoorPhase, on: bool) {
        if let Some(door) = self.screens.get(&ScreenId::Door) {
            toggle(door, phase.class_name(), on);
        }
    }

    fn set_page_info(&mut self, text: &str) {
        self.page_info.set_text_content(Some(text));
    }

    fn set_nav_enabled(&mut self, previous: bool, next: bool) {
        self.prev.set_disabled(!previous);
        self.next.set_disabled(!next);
    }

    fn set_page_visible(&mut self, page: u32, visible: bool) {
        if let Some(element) = self.page(page) {
            let result = element
                .style()
                .set_property("display", display_value(visible));
            log_failure(result, "display");
        }
    }

    fn clear_page_markers(&mut self, markers: &[PageMarker]) {
        for element in &self.pages {
            for marker in markers {
                log_failure(element.class_list().remove_1(marker.class_name()), marker.class_name());
            }
        }
    }

    fn add_page_marker(&mut self, page: u32, marker: PageMarker) {
        if let Some(element) = self.page(page) {
            toggle(element, marker.class_name(), true);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fallback_display_values() {
        assert_eq!(display_value(true), "flex");
        assert_eq!(display_value(false), "none");
    }
}
