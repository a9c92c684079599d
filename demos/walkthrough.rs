//! Walkthrough - Drive a modal and an accordion from scripted input.
//!
//! Run with: cargo run --example walkthrough
//! Set RUST_LOG=spark_widgets=debug to see every transition.

use anyhow::Result;
use spark_widgets::{logging, CloseReason, Config, KeyboardEvent, Runtime, WidgetEvent};

const CONFIG: &str = r#"
namespace = "rs"
debug = true
"#;

fn main() -> Result<()> {
    let config = Config::from_toml_str(CONFIG)?;
    logging::init(&config)?;

    let mut rt = Runtime::new(config);

    // Markup
    let doc = rt.document_mut();
    let body = doc.body();
    let open_signup = doc.element(body, "button", &[("data-rs-modal-open", "signup")]);
    let signup = doc.element(
        body,
        "div",
        &[("data-rs-modal", "signup"), ("data-rs-modal-lock", "true")],
    );
    let overlay = doc.element(signup, "div", &[("class", "modal_overlay")]);
    let content = doc.element(signup, "form", &[("class", "modal_content")]);
    doc.element(content, "input", &[("name", "email")]);
    doc.element(content, "button", &[("data-rs-modal-close", "")]);

    let faq = doc.element(body, "section", &[("data-rs-accordion-offset", "16")]);
    let mut heads = Vec::new();
    for (question, answer) in [
        ("What is this?", "A declarative modal and accordion runtime."),
        ("Does it need a browser?", "No. It runs on its own headless document."),
    ] {
        let item = doc.element(
            faq,
            "div",
            &[("data-rs-accordion-item", ""), ("data-rs-accordion-group", "faq")],
        );
        let head = doc.element(item, "h3", &[("data-rs-accordion-head", ""), ("tabindex", "0")]);
        doc.set_text(head, question);
        let panel = doc.element(item, "div", &[("data-rs-accordion-panel", "")]);
        let p = doc.element(panel, "p", &[]);
        doc.set_text(p, answer);
        heads.push(head);
    }
    doc.scroll_to(420);

    // Listeners
    rt.events().on(|event| match event {
        WidgetEvent::ModalOpen { id, .. } => println!("modal open: {id:?}"),
        WidgetEvent::ModalClose { id, reason, .. } => println!("modal close: {id:?} ({reason})"),
        WidgetEvent::AccordionOpen { item } => println!("accordion open: {item:?}"),
        WidgetEvent::AccordionClose { item } => println!("accordion close: {item:?}"),
    });

    let report = rt.init();
    println!("initialized: {:?}", report.initialized);

    // Modal: open, let focus settle, dismiss via overlay, reopen, escape
    let outcome = rt.click(open_signup);
    println!("trigger click prevented default: {}", outcome.default_prevented);
    rt.tick();
    println!(
        "focus after open: {:?}, page locked: {}",
        rt.document().active_element(),
        rt.env().scroll_lock.is_locked()
    );

    rt.click(overlay);
    rt.click(open_signup);
    rt.key_down(KeyboardEvent::from_dom_key("Escape"));
    println!("scroll restored to {}", rt.document().scroll_y());

    // Accordion: keyboard on the first head, click on the second
    rt.focus(heads[0]);
    rt.key_down(KeyboardEvent::from_dom_key("Enter"));
    rt.click(heads[1]);

    rt.resize(320.0, 640.0);

    rt.open_modal("signup");
    rt.close_modal(CloseReason::Close);

    Ok(())
}
