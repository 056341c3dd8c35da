use web_sys::Document;

use crate::error::{WebError, WebResult};

/// Rules for the turned-page pulse and the full-screen turn.js pages.
pub const TURN_CSS: &str = "
.page-turned {
    animation: pageTurn 0.6s ease-in-out;
}

@keyframes pageTurn {
    0% { transform: scale(1); }
    50% { transform: scale(1.02); }
    100% { transform: scale(1); }
}

.turn-page {
    background: #000 !important;
}

.turn-page img {
    width: 100% !important;
    height: 100% !important;
    object-fit: contain !important;
}
";

/// Append [`TURN_CSS`] to `<head>`.
pub fn inject(document: &Document) -> WebResult<()> {
    let head = document.head().ok_or(WebError::MissingElement("head"))?;
    let style = document
        .create_element("style")
        .map_err(|e| WebError::js(&e))?;
    style.set_text_content(Some(TURN_CSS));
    head.append_child(&style).map_err(|e| WebError::js(&e))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use invite_core::PageMarker;

    #[test]
    fn stylesheet_covers_turned_marker() {
        let selector = format!(".{} {{", PageMarker::Turned.class_name());
        assert!(TURN_CSS.contains(&selector));
        assert!(TURN_CSS.contains("@keyframes pageTurn"));
    }
}
