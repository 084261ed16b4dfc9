mod console;
mod document;

use std::cell::RefCell;
use std::rc::Rc;

use folio_core::reveal::{Reveal, VisibilityEntry};
use folio_core::scroll::NavScroll;
use folio_core::{Document, EnhanceConfig, Enhancer, Installation, StartMode, anchor};
use folio_protocol::NodeId;
use log::{LevelFilter, debug, error};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{
    AddEventListenerOptions, Event, IntersectionObserver, IntersectionObserverEntry,
    IntersectionObserverInit,
};

pub use document::WebDocument;

/// Attribute on `<html>` holding a JSON config override.
const CONFIG_ATTRIBUTE: &str = "data-folio-config";

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    console::init(if cfg!(debug_assertions) {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    });

    let doc = Rc::new(WebDocument::new()?);
    let enhancer = Enhancer::new(page_config(&doc));

    match enhancer.start_mode(&*doc) {
        StartMode::Immediate => run(&doc, enhancer),
        StartMode::OnDomContentLoaded => {
            let target = doc.raw().clone();
            let ready = Closure::once_into_js(move || {
                if let Err(err) = run(&doc, enhancer) {
                    error!("initialization failed: {err:?}");
                }
            });
            let options = AddEventListenerOptions::new();
            options.set_once(true);
            target.add_event_listener_with_callback_and_add_event_listener_options(
                "DOMContentLoaded",
                ready.unchecked_ref(),
                &options,
            )
        }
    }
}

/// The page's config override, or the defaults. A broken override is logged
/// and ignored so the page keeps its enhancements.
fn page_config(doc: &WebDocument) -> EnhanceConfig {
    let Some(json) = doc
        .raw()
        .document_element()
        .and_then(|root| root.get_attribute(CONFIG_ATTRIBUTE))
    else {
        return EnhanceConfig::default();
    };
    EnhanceConfig::from_json(&json).unwrap_or_else(|err| {
        error!("ignoring {CONFIG_ATTRIBUTE}: {err}");
        EnhanceConfig::default()
    })
}

fn run(doc: &Rc<WebDocument>, mut enhancer: Enhancer) -> Result<(), JsValue> {
    let Some(installation) = enhancer.run(&**doc) else {
        return Ok(());
    };
    let Installation {
        commands,
        skill_bars,
        anchors,
        fade_ins,
        nav_scroll,
    } = installation;

    for command in &commands {
        doc.apply(command);
    }
    if let Some(reveal) = skill_bars {
        observe(doc, reveal)?;
    }
    intercept_anchors(doc, &anchors)?;
    if let Some(reveal) = fade_ins {
        observe(doc, reveal)?;
    }
    if let Some(watcher) = nav_scroll {
        watch_scroll(doc, watcher)?;
    }
    debug!("enhancements installed");
    Ok(())
}

/// Feed an `IntersectionObserver` into a one-shot [`Reveal`]. The observer
/// lives as long as the page.
fn observe(doc: &Rc<WebDocument>, reveal: Reveal) -> Result<(), JsValue> {
    let threshold = reveal.spec().threshold;
    let targets: Vec<_> = reveal.watched().filter_map(|n| doc.element(n)).collect();
    let reveal = Rc::new(RefCell::new(reveal));

    let host = Rc::clone(doc);
    let callback = Closure::<dyn FnMut(js_sys::Array, IntersectionObserver)>::new(
        move |entries: js_sys::Array, observer: IntersectionObserver| {
            let entries: Vec<VisibilityEntry> = entries
                .iter()
                .filter_map(|v| v.dyn_into::<IntersectionObserverEntry>().ok())
                .map(|entry| VisibilityEntry {
                    node: host.node_of(&entry.target()),
                    ratio: entry.intersection_ratio(),
                    is_intersecting: entry.is_intersecting(),
                })
                .collect();
            let batch = reveal.borrow_mut().on_visibility(&*host, &entries);
            for node in batch.released {
                if let Some(el) = host.element(node) {
                    observer.unobserve(&el);
                }
            }
            for command in &batch.commands {
                host.apply(command);
            }
        },
    );

    let init = IntersectionObserverInit::new();
    init.set_threshold(&JsValue::from_f64(threshold));
    let observer =
        IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &init)?;
    callback.forget();

    for target in &targets {
        observer.observe(target);
    }
    Ok(())
}

fn intercept_anchors(doc: &Rc<WebDocument>, anchors: &[NodeId]) -> Result<(), JsValue> {
    for &node in anchors {
        let Some(el) = doc.element(node) else {
            continue;
        };
        let host = Rc::clone(doc);
        let link = el.clone();
        let handler = Closure::<dyn FnMut(Event)>::new(move |event: Event| {
            let href = link.get_attribute("href");
            let outcome = anchor::on_click(&*host, href.as_deref());
            if outcome.prevent_default {
                event.prevent_default();
            }
            for command in &outcome.commands {
                host.apply(command);
            }
        });
        el.add_event_listener_with_callback("click", handler.as_ref().unchecked_ref())?;
        handler.forget();
    }
    Ok(())
}

fn watch_scroll(doc: &Rc<WebDocument>, watcher: NavScroll) -> Result<(), JsValue> {
    let host = Rc::clone(doc);
    let handler = Closure::<dyn FnMut()>::new(move || {
        for command in &watcher.on_scroll(host.scroll_offset()) {
            host.apply(command);
        }
    });
    doc.window()
        .add_event_listener_with_callback("scroll", handler.as_ref().unchecked_ref())?;
    handler.forget();
    Ok(())
}
