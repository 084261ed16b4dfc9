use folio_protocol::{DomCommand, NodeId, Selector, StyleProperty, ThemeToken};
use log::{debug, trace};

use crate::config::ScrollConfig;
use crate::dom::Document;

/// Border tone for a scroll offset. Only offsets strictly above the
/// threshold count as scrolled; NaN does not.
pub fn tone_for(offset: f64, threshold_px: f64) -> ThemeToken {
    if offset > threshold_px {
        ThemeToken::NavBorderScrolled
    } else {
        ThemeToken::NavBorderResting
    }
}

/// Tints the navigation bar's bottom border once the page scrolls.
///
/// Every scroll event produces a write, even when the tone is unchanged.
#[derive(Debug, Clone)]
pub struct NavScroll {
    nav: NodeId,
    threshold_px: f64,
}

impl NavScroll {
    /// Attach to the first navigation bar. `None` when the page has none,
    /// in which case no scroll listener is needed.
    pub fn install<D: Document + ?Sized>(doc: &D, config: &ScrollConfig) -> Option<Self> {
        let Some(&nav) = doc
            .select(&Selector::Class(config.nav_class.clone()))
            .first()
        else {
            debug!("scroll: no .{} element, not watching", config.nav_class);
            return None;
        };
        Some(Self {
            nav,
            threshold_px: config.threshold_px,
        })
    }

    pub fn nav(&self) -> NodeId {
        self.nav
    }

    pub fn on_scroll(&self, offset: f64) -> Vec<DomCommand> {
        let tone = tone_for(offset, self.threshold_px);
        trace!("scroll: offset {offset} -> {tone:?}");
        vec![DomCommand::set_style(
            self.nav,
            StyleProperty::BorderBottomColor,
            tone.css_value(),
        )]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::{Element, MemoryDocument};

    #[test]
    fn threshold_is_exclusive() {
        assert_eq!(tone_for(0.0, 100.0), ThemeToken::NavBorderResting);
        assert_eq!(tone_for(100.0, 100.0), ThemeToken::NavBorderResting);
        assert_eq!(tone_for(100.5, 100.0), ThemeToken::NavBorderScrolled);
        assert_eq!(tone_for(-30.0, 100.0), ThemeToken::NavBorderResting);
        assert_eq!(tone_for(f64::NAN, 100.0), ThemeToken::NavBorderResting);
    }

    #[test]
    fn no_nav_no_watcher() {
        let doc = MemoryDocument::new("/");
        assert!(NavScroll::install(&doc, &ScrollConfig::default()).is_none());
    }

    #[test]
    fn writes_border_color_each_event() {
        let mut doc = MemoryDocument::new("/");
        let nav = doc.push(Element::new("nav").class("nav"));
        doc.push(Element::new("nav").class("nav"));
        let watcher = NavScroll::install(&doc, &ScrollConfig::default()).unwrap();
        assert_eq!(watcher.nav(), nav);

        doc.apply_all(&watcher.on_scroll(250.0));
        assert_eq!(
            doc.style(nav, StyleProperty::BorderBottomColor),
            Some("rgba(224, 224, 224, 0.8)")
        );

        doc.apply_all(&watcher.on_scroll(40.0));
        assert_eq!(
            doc.style(nav, StyleProperty::BorderBottomColor),
            Some("var(--color-border)")
        );

        // Same tone twice still writes twice.
        assert_eq!(watcher.on_scroll(10.0).len(), 1);
        assert_eq!(watcher.on_scroll(10.0).len(), 1);
    }
}
