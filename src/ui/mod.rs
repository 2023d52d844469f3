//! Server-rendered prediction page

pub mod locale;
pub mod page;

pub use locale::Language;
pub use page::{render, Outcome};
