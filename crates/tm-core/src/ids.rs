//! Strongly typed identifier wrappers for simulation entities.
//!
//! A microsimulation exposes its edges, lanes, and vehicles as opaque string
//! identifiers, so the wrappers here are string-backed rather than integer
//! indices.  The inner storage is `Arc<str>`: identifiers are cloned on every
//! step (occupant sets are replaced wholesale, spec'd as replace-not-merge),
//! and a refcount bump beats a heap copy for that access pattern.
//!
//! All IDs are `Eq + Hash + Ord` so they can be used as map keys and sorted
//! column headers without ceremony, and `Borrow<str>` so maps keyed by an ID
//! can be probed with a plain `&str`.

use std::borrow::Borrow;
use std::fmt;
use std::sync::Arc;

/// Suffix marking a synthetic sink boundary edge.
pub const SINK_SUFFIX: &str = "-sink";

/// Suffix marking a synthetic source boundary edge.
pub const SOURCE_SUFFIX: &str = "-source";

/// Generate a typed ID wrapper around a shared string.
macro_rules! str_id {
    ($(#[$attr:meta])* $vis:vis struct $name:ident;) => {
        $(#[$attr])*
        #[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        $vis struct $name(Arc<str>);

        impl $name {
            /// Wrap a raw simulation identifier.
            pub fn new(raw: impl AsRef<str>) -> Self {
                Self(Arc::from(raw.as_ref()))
            }

            /// The raw identifier as reported by the simulation.
            #[inline]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(raw: &str) -> Self {
                Self::new(raw)
            }
        }

        impl From<String> for $name {
            fn from(raw: String) -> Self {
                Self(Arc::from(raw))
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl Borrow<str> for $name {
            fn borrow(&self) -> &str {
                &self.0
            }
        }
    };
}

str_id! {
    /// Identifier of a directed network edge capable of holding vehicles.
    pub struct EdgeId;
}

str_id! {
    /// Identifier of a single lane belonging to an edge.
    pub struct LaneId;
}

str_id! {
    /// Identifier of a vehicle present in the simulation.
    pub struct VehicleId;
}

impl EdgeId {
    /// True for synthetic sink boundary edges (`…-sink`).
    pub fn is_sink(&self) -> bool {
        self.0.ends_with(SINK_SUFFIX)
    }

    /// True for synthetic source boundary edges (`…-source`).
    pub fn is_source(&self) -> bool {
        self.0.ends_with(SOURCE_SUFFIX)
    }

    /// True for either kind of synthetic boundary edge.  Boundary edges are
    /// trimmed from the tail of the tracked edge set at collector startup.
    pub fn is_boundary(&self) -> bool {
        self.is_sink() || self.is_source()
    }
}
