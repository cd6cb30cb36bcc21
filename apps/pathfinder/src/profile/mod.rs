pub mod completeness;
pub mod controls;
pub mod editor;
pub mod education;
pub mod form;
pub mod legacy;
pub mod merge;
pub mod models;
pub mod validation;

pub use editor::{ProfileEditor, SavePolicy};
