//! End-to-end tests for the four vCard syntaxes, custom scribes and
//! configuration.

mod config;
mod custom_scribes;
mod hcard;
mod jcard;
mod text;
mod timezone;
mod xcard;
