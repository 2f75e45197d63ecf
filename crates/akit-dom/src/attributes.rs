//! Element attributes
//!
//! An insertion-ordered map plus the `set_attributes` value type widgets
//! write through (a `false` boolean removes).

/// Attributes of one element, in insertion order
#[derive(Debug, Clone, Default)]
pub struct AttrMap {
    entries: Vec<(String, String)>,
}

/// Value written by `set_attributes`
///
/// `Bool(false)` removes the attribute; everything else is written as a
/// string (`Bool(true)` becomes `"true"`).
#[derive(Debug, Clone, PartialEq)]
pub enum AttrValue {
    Str(String),
    Bool(bool),
    Int(i64),
    Float(f64),
}

impl AttrValue {
    /// String form, or `None` when the attribute should be removed
    pub fn to_attr_string(&self) -> Option<String> {
        match self {
            Self::Str(s) => Some(s.clone()),
            Self::Bool(false) => None,
            Self::Bool(true) => Some("true".to_string()),
            Self::Int(n) => Some(n.to_string()),
            Self::Float(n) => Some(n.to_string()),
        }
    }
}

macro_rules! attr_value_from {
    ($($ty:ty => |$v:ident| $body:expr),* $(,)?) => {
        $(impl From<$ty> for AttrValue {
            fn from($v: $ty) -> Self {
                $body
            }
        })*
    };
}

attr_value_from! {
    &str => |v| Self::Str(v.to_string()),
    String => |v| Self::Str(v),
    &String => |v| Self::Str(v.clone()),
    bool => |v| Self::Bool(v),
    i64 => |v| Self::Int(v),
    i32 => |v| Self::Int(i64::from(v)),
    f64 => |v| Self::Float(v),
}

impl AttrMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.entries.iter().position(|(n, _)| n == name)
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.position(name).map(|i| self.entries[i].1.as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    /// Overwrites in place, keeping the original position
    pub fn set(&mut self, name: &str, value: &str) {
        match self.position(name) {
            Some(i) => self.entries[i].1 = value.to_string(),
            None => self.entries.push((name.to_string(), value.to_string())),
        }
    }

    /// Returns the removed value
    pub fn remove(&mut self, name: &str) -> Option<String> {
        let index = self.position(name)?;
        Some(self.entries.remove(index).1)
    }

    /// Write an `AttrValue`, removing on `Bool(false)`
    pub fn apply(&mut self, name: &str, value: &AttrValue) {
        match value.to_attr_string() {
            Some(v) => self.set(name, &v),
            None => {
                self.remove(name);
            }
        }
    }

    /// Boolean-attribute toggle; `force` pins the outcome. Returns presence.
    pub fn toggle(&mut self, name: &str, force: Option<bool>) -> bool {
        let present = force.unwrap_or(!self.contains(name));
        if !present {
            self.remove(name);
        } else if !self.contains(name) {
            self.set(name, "");
        }
        present
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(n, _)| n.as_str())
    }
}
