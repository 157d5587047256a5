//! # fieldwork-http
//!
//! The submitted-parameter map handed to every validation entry point.
//! [`QueryDict`] keeps keys in the order they were submitted, which is the
//! order in which table forms discover their rows.

pub mod querydict;

pub use querydict::QueryDict;
