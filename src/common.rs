pub mod clock;
pub mod code_tag;
pub mod datefmt;
pub mod error;
pub mod i18n;
pub mod search;
