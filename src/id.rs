//! Code for handling stream IDs
use anyhow::{Context, Result};
use indexmap::IndexSet;

macro_rules! define_id_type {
    ($name:ident) => {
        #[derive(
            Clone,
            std::hash::Hash,
            PartialEq,
            Eq,
            PartialOrd,
            Ord,
            serde::Deserialize,
            Debug,
            serde::Serialize,
        )]
        /// An ID type (e.g. `StreamID`)
        pub struct $name(pub std::rc::Rc<str>);

        impl std::borrow::Borrow<str> for $name {
            fn borrow(&self) -> &str {
                &self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                $name(std::rc::Rc::from(s))
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                $name(std::rc::Rc::from(s))
            }
        }

        impl $name {
            /// Create a new ID from a string slice
            pub fn new(id: &str) -> Self {
                $name(std::rc::Rc::from(id))
            }

            /// The ID as a string slice
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }
    };
}

define_id_type!(StreamID);

/// A data structure containing a set of IDs
pub trait IDCollection {
    /// Get the ID from the collection by its string representation.
    ///
    /// # Returns
    ///
    /// A copy of the ID in `self`, or an error if not found.
    fn get_id_by_str(&self, id: &str) -> Result<StreamID>;
}

impl IDCollection for IndexSet<StreamID> {
    fn get_id_by_str(&self, id: &str) -> Result<StreamID> {
        let found = self
            .get(id)
            .with_context(|| format!("Unknown stream {id} found"))?;
        Ok(found.clone())
    }
}
