//! Configuration of inference algorithms.
//!
//! Options arrive as a `PropertySet`, a map from option name to its (textual) value, and are
//! validated into a typed `Properties` record when an algorithm is constructed.

use crate::util::{JointlyError, Result};

use indexmap::IndexMap;

/// Option name -> value
pub type PropertySet = IndexMap<String, String>;

/// Settings of `ExactInf`. Exact inference has nothing to tune; the verbosity only controls
/// how much is logged.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Properties {
    /// Diagnostic output level
    pub verbose: usize
}

impl Properties {

    pub const VERBOSE: &'static str = "verbose";

    /// Validate an option set. A missing `verbose` means 0.
    ///
    /// # Errors
    /// * `JointlyError::MalformedConfig` on an unrecognized key, or a `verbose` value that is not
    ///   a non-negative integer
    pub fn from_options(opts: &PropertySet) -> Result<Self> {
        let mut props = Properties::default();

        for (key, value) in opts.iter() {
            match key.as_str() {
                Properties::VERBOSE => {
                    props.verbose = value.trim().parse().map_err(|_| {
                        JointlyError::MalformedConfig(format!("{}={} is not a non-negative integer", key, value))
                    })?;
                },
                _ => {
                    return Err(JointlyError::MalformedConfig(format!("unrecognized key {}", key)));
                }
            }
        }

        Ok(props)
    }

    /// The option set that `from_options` turns back into `self`
    pub fn to_options(&self) -> PropertySet {
        let mut opts = PropertySet::new();
        opts.insert(String::from(Properties::VERBOSE), self.verbose.to_string());
        opts
    }
}
