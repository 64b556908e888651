//! folio demo
//!
//! Builds a small portfolio page, mounts the behaviors and walks through a
//! visit: scrolling down, following an in-page link, and tabbing around a
//! project modal.

use anyhow::{Context, Result};
use folio::{Config, Page, ScrollOutcome};
use folio_a11y::{HighContrast, MemoryPreferences, Politeness, announce};
use folio_dom::{DOMRect, Document, Key, KeyModifiers, NodeId};
use folio_reveal::ViewportIntersection;

const SECTION_HEIGHT: f64 = 900.0;

/// Keys pressed inside the project modal, as `KeyboardEvent.key` names
const MODAL_KEYS: [&str; 6] = ["Tab", "Tab", "Tab", "Tab", "Shift+Tab", "Enter"];

fn main() -> Result<()> {
    // Initialize logging (RUST_LOG filters)
    tracing_subscriber::fmt::init();

    let config = Config::default();
    let width = config.viewport_width;
    let mut page = Page::new(portfolio(width)?, config);
    println!("folio v{}", folio::VERSION);

    let outcome = page.mount(&ViewportIntersection);
    report(&page, "mount", &outcome);
    fetch_images(&mut page, &outcome)?;

    for y in [600.0, 1500.0] {
        let outcome = page.scroll_to(y);
        report(&page, &format!("scroll to {}", y), &outcome);
        fetch_images(&mut page, &outcome)?;
    }

    let link = page.document().get_element_by_id("nav-contact").context("missing contact link")?;
    let outcome = page.click(link);
    report(&page, "click #contact", &outcome);

    let dialog = page.document().get_element_by_id("project-modal").context("missing project modal")?;
    page.open_modal(dialog).context("opening project modal")?;
    println!("modal open, focus on {}", describe(page.document(), page.document().active_element()));
    for chord in MODAL_KEYS {
        let (key, modifiers) = parse_chord(chord);
        let proceed = page.press_key(key, modifiers);
        println!(
            "  {:<9} -> {}{}",
            chord,
            describe(page.document(), page.document().active_element()),
            if proceed { "" } else { " (wrapped)" }
        );
    }
    page.close_modal();

    let mut contrast = HighContrast::load(page.document_mut(), MemoryPreferences::new(), false)?;
    let enabled = contrast.toggle(page.document_mut())?;
    let notice = announce(
        page.document_mut(),
        if enabled { "High contrast on" } else { "High contrast off" },
        Politeness::Polite,
    )?;
    println!("announced: {:?}", page.document().text_content(notice.node()));
    notice.dismiss(page.document_mut());

    page.unmount();
    Ok(())
}

fn portfolio(width: f64) -> Result<Document> {
    let mut doc = Document::new("https://portfolio.example.dev/");
    let body = doc.body();

    let nav = doc.append_element(body, "nav", &[])?;
    for (id, href, label) in [
        ("nav-about", "#about", "About"),
        ("nav-projects", "#projects", "Projects"),
        ("nav-contact", "#contact", "Contact"),
    ] {
        let link = doc.append_element(nav, "a", &[("id", id), ("href", href)])?;
        doc.append_text(link, label)?;
    }

    let sections = [
        ("hero", "fade-in"),
        ("about", "fade-up"),
        ("projects", "fade-left"),
        ("skills", "zoom-in"),
        ("contact", "slide-up"),
    ];
    for (i, (id, class)) in sections.into_iter().enumerate() {
        let section = doc.append_element(body, "section", &[("id", id), ("class", class)])?;
        doc.set_layout_rect(section, DOMRect::from_xywh(0.0, i as f64 * SECTION_HEIGHT, width, SECTION_HEIGHT - 100.0));
        if id == "projects" {
            let src = format!("/img/{}.webp", id);
            let img = doc.append_element(section, "img", &[("data-src", src.as_str()), ("alt", "Project preview")])?;
            doc.set_layout_rect(img, DOMRect::from_xywh(40.0, i as f64 * SECTION_HEIGHT + 120.0, 480.0, 270.0));
        }
    }

    let modal = doc.append_element(body, "div", &[("id", "project-modal"), ("role", "dialog"), ("aria-modal", "true")])?;
    doc.append_element(modal, "a", &[("id", "modal-repo"), ("href", "https://github.com/example/project")])?;
    doc.append_element(modal, "a", &[("id", "modal-live"), ("href", "https://project.example.dev")])?;
    doc.append_element(modal, "button", &[("id", "modal-close")])?;
    Ok(doc)
}

/// `"Shift+Tab"` style chord: optional `Shift+` prefix, then a key name
fn parse_chord(chord: &str) -> (Key, KeyModifiers) {
    match chord.strip_prefix("Shift+") {
        Some(name) => (Key::parse(name), KeyModifiers::SHIFT),
        None => (Key::parse(chord), KeyModifiers::NONE),
    }
}

fn fetch_images(page: &mut Page, outcome: &ScrollOutcome) -> Result<()> {
    for request in &outcome.image_requests {
        println!("  fetching {}", request.src);
        page.complete_image(request, Ok(()))?;
    }
    Ok(())
}

fn report(page: &Page, step: &str, outcome: &ScrollOutcome) {
    let revealed: Vec<String> = outcome.revealed.iter().map(|&id| describe(page.document(), Some(id))).collect();
    println!(
        "{} (y = {}): revealed [{}], {} still hidden",
        step,
        page.scroll_y(),
        revealed.join(", "),
        page.reveal().watched_len()
    );
}

fn describe(doc: &Document, node: Option<NodeId>) -> String {
    match node.and_then(|id| doc.element(id)) {
        Some(el) => match el.id() {
            Some(id) => format!("#{}", id),
            None => format!("<{}>", el.tag),
        },
        None => "nothing".to_string(),
    }
}
