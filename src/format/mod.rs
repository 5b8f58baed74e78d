//! Transformations between the compound and the flat element representation

pub mod context;
pub mod expand;
pub mod text;
pub mod zip;

pub use context::{format_element_context, ContextOptions};
pub use expand::{format_element_list, FormatOptions};
pub use text::{denormalize_break, normalize_break, split_text};
pub use zip::{zip_element_list, zip_element_list_in_place};
