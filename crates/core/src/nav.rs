use folio_protocol::{DomCommand, Selector};
use log::debug;

use crate::config::NavConfig;
use crate::dom::Document;

/// The last path segment, or `home` when the path ends in `/` or is empty.
pub fn current_page<'a>(path: &'a str, home: &'a str) -> &'a str {
    match path.rsplit('/').next() {
        Some(segment) if !segment.is_empty() => segment,
        _ => home,
    }
}

/// Mark every navigation link whose `href` names the current page.
///
/// Matching is exact string comparison; links pointing at `./about.html` or
/// absolute URLs are not resolved.
pub fn highlight<D: Document + ?Sized>(doc: &D, config: &NavConfig) -> Vec<DomCommand> {
    let path = doc.location_path();
    let page = current_page(&path, &config.home_page);

    let commands: Vec<_> = doc
        .select(&Selector::Class(config.link_class.clone()))
        .into_iter()
        .filter(|&link| doc.attribute(link, "href").as_deref() == Some(page))
        .map(|node| DomCommand::AddClass {
            node,
            class: config.active_class.clone(),
        })
        .collect();

    debug!("nav: {} link(s) active for {page}", commands.len());
    commands
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::{Element, MemoryDocument};

    fn site(path: &str) -> MemoryDocument {
        let mut doc = MemoryDocument::new(path);
        for href in ["index.html", "about.html", "projects.html"] {
            doc.push(Element::new("a").class("nav-link").attr("href", href));
        }
        doc
    }

    fn active(doc: &MemoryDocument) -> Vec<String> {
        doc.elements()
            .filter(|(_, e)| e.has_class("active"))
            .filter_map(|(_, e)| e.attributes.get("href").cloned())
            .collect()
    }

    #[test]
    fn current_page_takes_last_segment() {
        assert_eq!(current_page("/portfolio/about.html", "index.html"), "about.html");
        assert_eq!(current_page("about.html", "index.html"), "about.html");
    }

    #[test]
    fn current_page_defaults_to_home() {
        assert_eq!(current_page("/", "index.html"), "index.html");
        assert_eq!(current_page("", "index.html"), "index.html");
        assert_eq!(current_page("/blog/", "index.html"), "index.html");
    }

    #[test]
    fn marks_matching_link() {
        let mut doc = site("/about.html");
        let commands = highlight(&doc, &NavConfig::default());
        doc.apply_all(&commands);
        assert_eq!(active(&doc), vec!["about.html"]);
    }

    #[test]
    fn root_path_marks_home() {
        let mut doc = site("/");
        doc.apply_all(&highlight(&doc, &NavConfig::default()));
        assert_eq!(active(&doc), vec!["index.html"]);
    }

    #[test]
    fn unknown_page_marks_nothing() {
        let doc = site("/contact.html");
        assert!(highlight(&doc, &NavConfig::default()).is_empty());
    }

    #[test]
    fn duplicate_hrefs_are_all_marked() {
        let mut doc = site("/about.html");
        doc.push(Element::new("a").class("nav-link").attr("href", "about.html"));
        // Not a nav link: left alone.
        doc.push(Element::new("a").attr("href", "about.html"));
        doc.apply_all(&highlight(&doc, &NavConfig::default()));
        assert_eq!(active(&doc), vec!["about.html", "about.html"]);
    }

    #[test]
    fn links_without_href_are_skipped() {
        let mut doc = MemoryDocument::new("/");
        doc.push(Element::new("a").class("nav-link"));
        assert!(highlight(&doc, &NavConfig::default()).is_empty());
    }
}
