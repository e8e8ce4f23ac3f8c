//! # Death Star Core
//!
//! Transport-independent building blocks for the Death Star API client.
//!
//! This crate provides:
//! - Droidspeak decoding (space-separated 8-bit binary octets to text)
//! - Required-property validation for untyped JSON mappings
//! - Immutable domain records (`Prisoner`, `AccessToken`)
//! - Factories that turn a validated mapping into a domain record

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod decoder;
pub mod factory;
pub mod model;
pub mod validator;

pub use decoder::{encode_droidspeak, Decoder, DecodingError, DroidspeakDecoder};
pub use factory::{AccessTokenFactory, PrisonerFactory, RecordFactory, ValidationError};
pub use model::{AccessToken, Prisoner};
pub use validator::{validate_properties, RawMapping};
