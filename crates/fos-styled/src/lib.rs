//! fOS Styled Sheets
//!
//! Bookkeeping engine for dynamically generated CSS. Rules are inserted per
//! component id into ordered groups, deduplicated by name, and the whole
//! sheet can be serialized on the server and rehydrated on the client from
//! the emitted `<style>` markup without duplicating rules.
//!
//! # Example
//! ```rust
//! use fos_styled::{SheetOptions, StyleContext, StyleSheet};
//!
//! let context = StyleContext::server();
//! let mut sheet = StyleSheet::new(&context, SheetOptions::server());
//! sheet.insert_rules("sc-button", "a", &[".a{color:red;}"]);
//! assert!(sheet.has_fingerprint("sc-button", "a"));
//! assert!(sheet.serialize().starts_with(".a{color:red;}/*!sc*/\n"));
//! ```

mod config;
mod context;
mod dom;
mod global_style;
mod grouped_tag;
mod registry;
mod rehydration;
mod server;
mod sheet;
mod tag;

pub use config::{SheetOptions, SheetOptionsPatch, Target};
pub use context::{SharedDocument, StyleContext};
pub use dom::{make_style_tag, remove_global_style_tag, resolve_surface, Surface};
pub use global_style::GlobalStyle;
pub use grouped_tag::GroupedTag;
pub use registry::{Group, GroupRegistry, MAX_GROUP};
pub use rehydration::{
    encode_marker, output_sheet, parse_marker, rehydrate_sheet, rehydrate_sheet_from_text, Marker,
};
pub use server::ServerStyleSheet;
pub use sheet::StyleSheet;
pub use tag::{make_tag, CssomTag, Tag, TextTag, VirtualTag};

/// Attribute marking style containers owned by this library
pub const SC_ATTR: &str = "data-styled";

/// Value of [`SC_ATTR`] on containers a live sheet writes into
pub const SC_ATTR_ACTIVE: &str = "active";

/// Attribute carrying the library version of the emitting side
pub const SC_ATTR_VERSION: &str = "data-styled-version";

/// Library version written into [`SC_ATTR_VERSION`]
pub const SC_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Separator between rules and markers in serialized output
pub const SPLITTER: &str = "/*!sc*/\n";

/// Attribute on inline `<style>` elements emitted for global styles
pub const SC_GLOBAL_ATTR: &str = "data-styled-global";

/// Styled sheet errors
#[derive(Debug, thiserror::Error)]
pub enum StyledError {
    #[error("Invalid sheet configuration: {0}")]
    Config(#[from] serde_json::Error),
    #[error("Can't collect styles once the server sheet has been sealed")]
    Sealed,
    #[error("DOM error: {0}")]
    Dom(#[from] fos_dom::DomError),
}
