//! Result type for the reqcheck binary.
//!
//! Library code returns [`reqcheck::Result`]; command code converts into
//! `color-eyre` reports so errors carry context added with `.wrap_err()`.
use color_eyre::eyre::Result as EyreResult;

/// Standard result type used by the commands.
pub type Result<T> = EyreResult<T>;
