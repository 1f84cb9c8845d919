//! Symbolic references resolved outside the engine: platform resources,
//! theme attributes and styles.

use std::fmt;

/// A platform resource reference such as `@string/title` or
/// `@android:color/white`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResourceRef {
    pub package: Option<String>,
    pub kind: String,
    pub name: String,
}

/// A theme attribute reference such as `?attr/colorAccent`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AttributeRef {
    pub package: Option<String>,
    pub name: String,
}

/// A style reference such as `@style/Title`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StyleRef {
    pub package: Option<String>,
    pub name: String,
}

/// Split `pkg:rest` into `(Some(pkg), rest)`.
fn split_package(s: &str) -> (Option<String>, &str) {
    match s.split_once(':') {
        Some((pkg, rest)) if !pkg.is_empty() => (Some(pkg.to_owned()), rest),
        _ => (None, s),
    }
}

fn valid_name(s: &str) -> bool {
    !s.is_empty()
        && s
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '.')
}

impl ResourceRef {
    pub fn new(kind: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            package: None,
            kind: kind.into(),
            name: name.into(),
        }
    }

    /// Parse `@kind/name` or `@pkg:kind/name`. Returns `None` when `s` does
    /// not have that shape.
    pub fn parse(s: &str) -> Option<Self> {
        let body = s.strip_prefix('@')?;
        let (package, rest) = split_package(body);
        let (kind, name) = rest.split_once('/')?;
        if !valid_name(kind) || !valid_name(name) {
            return None;
        }
        Some(Self {
            package,
            kind: kind.to_owned(),
            name: name.to_owned(),
        })
    }
}

impl AttributeRef {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            package: None,
            name: name.into(),
        }
    }

    /// Parse `?attr/name` or `?pkg:attr/name`.
    pub fn parse(s: &str) -> Option<Self> {
        let body = s.strip_prefix('?')?;
        let (package, rest) = split_package(body);
        let name = rest.strip_prefix("attr/")?;
        valid_name(name).then(|| Self {
            package,
            name: name.to_owned(),
        })
    }
}

impl StyleRef {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            package: None,
            name: name.into(),
        }
    }
}

impl fmt::Display for ResourceRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.package {
            Some(pkg) => write!(f, "@{pkg}:{}/{}", self.kind, self.name),
            None => write!(f, "@{}/{}", self.kind, self.name),
        }
    }
}

impl fmt::Display for AttributeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.package {
            Some(pkg) => write!(f, "?{pkg}:attr/{}", self.name),
            None => write!(f, "?attr/{}", self.name),
        }
    }
}

impl fmt::Display for StyleRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.package {
            Some(pkg) => write!(f, "@{pkg}:style/{}", self.name),
            None => write!(f, "@style/{}", self.name),
        }
    }
}
