//! Names of entities and of the things they expose

use core::{
    borrow::Borrow,
    fmt::{self, Display},
    ops::Deref,
};

use compact_str::CompactString;
use serde::{Deserialize, Serialize};

/// Key of a property, action or event. Short keys are stored inline.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KnobString(CompactString);

impl KnobString {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Deref for KnobString {
    type Target = str;

    fn deref(&self) -> &str {
        &self.0
    }
}

// lookups in BTreeMap<KnobString, _> by &str
impl Borrow<str> for KnobString {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl<T: AsRef<str>> From<T> for KnobString {
    fn from(value: T) -> Self {
        Self(value.as_ref().into())
    }
}

impl<T: AsRef<str> + ?Sized> PartialEq<T> for KnobString {
    fn eq(&self, other: &T) -> bool {
        *self.0 == *other.as_ref()
    }
}

impl Display for KnobString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifier of an entity, eg. `living_room.thermostat`
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(pub KnobString);

impl EntityId {
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl<T: AsRef<str>> From<T> for EntityId {
    fn from(value: T) -> Self {
        Self(KnobString::from(value))
    }
}

impl Deref for EntityId {
    type Target = str;

    fn deref(&self) -> &str {
        self.as_str()
    }
}

impl Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}
