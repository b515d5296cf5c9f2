//! One module per verification rule family.
//!
//! Every check returns an empty vector for "all good" and one entry per
//! failed expectation; collaborator failures propagate as errors instead of
//! being downgraded into results.

mod dom;
mod fonts;
mod layout;
mod markup;
mod structure;
mod stylesheet;

pub use dom::{
    check_contacts, check_lang, check_load_order, check_logo, check_reset_margins,
    check_semantic_tags, check_title,
};
pub use fonts::check_fonts;
pub use layout::{LayoutCheckError, check_layout};
pub use markup::check_markup;
pub use structure::check_structure;
pub use stylesheet::check_stylesheets;
