use std::fmt;

/// The reserved struct field holding the owning class or type. It is printed first and is
/// never deleted.
pub const OWNER_FIELD: &str = ".";

/// A struct field name.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Lowercase(Box<str>);

impl Lowercase {
    pub fn owner() -> Self {
        Lowercase(OWNER_FIELD.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_owner(&self) -> bool {
        &*self.0 == OWNER_FIELD
    }
}

impl From<&str> for Lowercase {
    fn from(string: &str) -> Self {
        Lowercase(string.into())
    }
}

impl From<String> for Lowercase {
    fn from(string: String) -> Self {
        Lowercase(string.into_boxed_str())
    }
}

impl PartialEq<str> for Lowercase {
    fn eq(&self, other: &str) -> bool {
        &*self.0 == other
    }
}

impl fmt::Debug for Lowercase {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}

impl fmt::Display for Lowercase {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// A struct's type name. Merged structs remember every name they were known by.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Uppercase(Box<str>);

impl Uppercase {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Uppercase {
    fn from(string: &str) -> Self {
        Uppercase(string.into())
    }
}

impl From<String> for Uppercase {
    fn from(string: String) -> Self {
        Uppercase(string.into_boxed_str())
    }
}

impl fmt::Debug for Uppercase {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}

impl fmt::Display for Uppercase {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// An opaque ground term handed to us by the driver, e.g. the constant-pool entry for `Int`.
///
/// The engine only stores, copies and prints terms. Whether two terms are compatible is the
/// driver's business; the `PartialEq` impl compares handles and is not consulted by
/// unification.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Term(Box<str>);

impl Term {
    pub fn new(name: impl Into<Box<str>>) -> Self {
        Term(name.into())
    }

    pub fn name(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Term {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Term({})", self.0)
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}
