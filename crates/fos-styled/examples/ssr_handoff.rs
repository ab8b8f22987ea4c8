//! Example: render styles on the server and pick them up on the client

use std::cell::RefCell;
use std::rc::Rc;

use fos_dom::Document;
use fos_styled::{GlobalStyle, ServerStyleSheet, SheetOptions, StyleContext, StyleSheet};
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    // Server render
    let server_context = StyleContext::server();
    let mut server = ServerStyleSheet::new(&server_context);
    server.collect_styles(|sheet| {
        sheet.insert_rules("sc-button", "a", &[".a{color:red;}", ".a:hover{color:blue;}"]);
        sheet.insert_rules("sc-title", "b", &[".b{font-size:2em;}"]);

        let global = GlobalStyle::new("reset");
        let instance = global.allocate_instance(sheet);
        global.render_styles(instance, &["body{margin:0;}"], sheet);
    })?;
    server.seal();

    println!("Server markup:\n{}\n", server.get_style_tags());

    // Client boot: the markup arrives inside <head>
    let document = Rc::new(RefCell::new(Document::new("https://example.com/")));
    {
        let mut document = document.borrow_mut();
        let style = server.get_style_element(&mut document)?;
        let head = document.head();
        document.tree.append_child(head, style)?;
    }

    let context = StyleContext::browser(document.clone());
    let mut sheet = StyleSheet::new(&context, SheetOptions::default());

    // Already rendered on the server, nothing to insert
    if !sheet.has_fingerprint("sc-button", "a") {
        sheet.insert_rules("sc-button", "a", &[".a{color:red;}"]);
    }
    sheet.insert_rules("sc-footer", "c", &[".c{padding:1em;}"]);

    println!("Client sheet:\n{sheet}");
    Ok(())
}
