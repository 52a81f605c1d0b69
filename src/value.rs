use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fmt;
use std::rc::{Rc, Weak};

/// Runtime value produced by expression evaluation and by facade attribute reads.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    List(Vec<Value>),
    Map(BTreeMap<String, Value>),
}

impl Value {
    /// Short lowercase kind name used in diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "bool",
            Self::Int(_) => "int",
            Self::Float(_) => "float",
            Self::Str(_) => "string",
            Self::List(_) => "list",
            Self::Map(_) => "map",
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match *self {
            Self::Bool(v) => Some(v),
            _ => None,
        }
    }

    /// Numeric view; `Int` widens to `f64`.
    pub fn as_f64(&self) -> Option<f64> {
        match *self {
            Self::Int(v) => Some(v as f64),
            Self::Float(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Convert into the JSON data model. Non-finite floats become `null`.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Self::Null => serde_json::Value::Null,
            Self::Bool(v) => serde_json::Value::Bool(*v),
            Self::Int(v) => serde_json::Value::from(*v),
            Self::Float(v) => serde_json::Number::from_f64(*v)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            Self::Str(s) => serde_json::Value::String(s.clone()),
            Self::List(items) => serde_json::Value::Array(items.iter().map(Self::to_json).collect()),
            Self::Map(m) => serde_json::Value::Object(
                m.iter().map(|(k, v)| (k.clone(), v.to_json())).collect(),
            ),
        }
    }

    /// Build from JSON. Integers that fit `i64` stay integral.
    pub fn from_json(v: &serde_json::Value) -> Self {
        match v {
            serde_json::Value::Null => Self::Null,
            serde_json::Value::Bool(b) => Self::Bool(*b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Self::Int(i),
                None => Self::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            serde_json::Value::String(s) => Self::Str(s.clone()),
            serde_json::Value::Array(items) => Self::List(items.iter().map(Self::from_json).collect()),
            serde_json::Value::Object(m) => Self::Map(
                m.iter()
                    .map(|(k, v)| (k.clone(), Self::from_json(v)))
                    .collect(),
            ),
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::Str(v.to_owned())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::Str(v)
    }
}

impl serde::Serialize for Value {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

impl<'de> serde::Deserialize<'de> for Value {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let v = serde_json::Value::deserialize(deserializer)?;
        Ok(Self::from_json(&v))
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("null"),
            Self::Bool(v) => write!(f, "{v}"),
            Self::Int(v) => write!(f, "{v}"),
            Self::Float(v) => write!(f, "{v:?}"),
            Self::Str(s) => write!(f, "{s:?}"),
            Self::List(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
            Self::Map(m) => {
                f.write_str("{")?;
                for (i, (k, v)) in m.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{k:?}: {v}")?;
                }
                f.write_str("}")
            }
        }
    }
}

/// Something that exposes named members an identifier can resolve against.
///
/// Lookup is exact and case-sensitive. Implementations must not mutate themselves while looking up.
pub trait Namespace {
    fn find_identifier(&self, name: &str) -> Option<Value>;

    /// Names currently bound, in a stable order.
    fn identifiers(&self) -> Vec<String>;
}

impl Namespace for BTreeMap<String, Value> {
    fn find_identifier(&self, name: &str) -> Option<Value> {
        self.get(name).cloned()
    }

    fn identifiers(&self) -> Vec<String> {
        self.keys().cloned().collect()
    }
}

impl Namespace for Value {
    fn find_identifier(&self, name: &str) -> Option<Value> {
        match self {
            Self::Map(m) => m.find_identifier(name),
            _ => None,
        }
    }

    fn identifiers(&self) -> Vec<String> {
        match self {
            Self::Map(m) => m.identifiers(),
            _ => Vec::new(),
        }
    }
}

/// The concrete namespace contexts are built from.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Scope {
    vars: BTreeMap<String, Value>,
}

impl Scope {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap in the shared handle expression nodes bind to.
    pub fn shared(self) -> SharedScope {
        Rc::new(RefCell::new(self))
    }

    pub fn set(&mut self, name: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.vars.insert(name.into(), value.into())
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.vars.get(name)
    }

    pub fn remove(&mut self, name: &str) -> Option<Value> {
        self.vars.remove(name)
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    /// Build a scope from a JSON object's members.
    pub fn from_json_map<'a>(
        members: impl IntoIterator<Item = (&'a String, &'a serde_json::Value)>,
    ) -> Self {
        let vars = members
            .into_iter()
            .map(|(k, v)| (k.clone(), Value::from_json(v)))
            .collect();
        Self { vars }
    }
}

impl Namespace for Scope {
    fn find_identifier(&self, name: &str) -> Option<Value> {
        self.vars.find_identifier(name)
    }

    fn identifiers(&self) -> Vec<String> {
        self.vars.identifiers()
    }
}

/// Owning handle to a context scope, held by whatever session owns the namespace.
pub type SharedScope = Rc<RefCell<Scope>>;

/// Non-owning handle an expression node keeps to its context.
///
/// The node never extends the scope's lifetime; once the owner drops it, lookups through this
/// handle fail instead of dangling.
#[derive(Debug, Clone)]
pub struct ContextHandle(Weak<RefCell<Scope>>);

impl ContextHandle {
    pub fn new(scope: &SharedScope) -> Self {
        Self(Rc::downgrade(scope))
    }

    /// A handle that never resolves anything.
    pub fn detached() -> Self {
        Self(Weak::new())
    }

    pub fn is_alive(&self) -> bool {
        self.0.strong_count() > 0
    }

    /// Look `name` up in the context.
    ///
    /// `None` when the scope is gone, `Some(None)` when it is alive but the name is unbound.
    pub fn lookup(&self, name: &str) -> Option<Option<Value>> {
        let scope = self.0.upgrade()?;
        let found = scope.borrow().find_identifier(name);
        Some(found)
    }

    /// `true` when both handles point at the same scope.
    pub fn same_context(&self, other: &Self) -> bool {
        self.0.ptr_eq(&other.0)
    }
}

impl From<&SharedScope> for ContextHandle {
    fn from(scope: &SharedScope) -> Self {
        Self::new(scope)
    }
}

#[cfg(test)]
#[path = "../tests/unit/value.rs"]
mod tests;
