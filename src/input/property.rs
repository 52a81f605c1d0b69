use crate::foundation::error::{LogicError, LogicResult};
use crate::value::Value;

pub type Getter<T> = fn(&T) -> LogicResult<Value>;
pub type Setter<T> = fn(&T, Value) -> LogicResult<()>;
pub type Method<T> = fn(&T, &[Value]) -> LogicResult<Value>;

/// One named attribute a host can read, and possibly write.
pub struct PropertyDescriptor<T> {
    pub name: &'static str,
    pub get: Getter<T>,
    /// `None` for read-only attributes.
    pub set: Option<Setter<T>>,
    pub doc: &'static str,
}

impl<T> PropertyDescriptor<T> {
    pub const fn read_only(name: &'static str, get: Getter<T>, doc: &'static str) -> Self {
        Self {
            name,
            get,
            set: None,
            doc,
        }
    }

    pub const fn read_write(
        name: &'static str,
        get: Getter<T>,
        set: Setter<T>,
        doc: &'static str,
    ) -> Self {
        Self {
            name,
            get,
            set: Some(set),
            doc,
        }
    }

    pub fn is_writable(&self) -> bool {
        self.set.is_some()
    }
}

/// One named callable a host can invoke.
pub struct MethodDescriptor<T> {
    pub name: &'static str,
    pub call: Method<T>,
    pub doc: &'static str,
}

/// A type exposing a fixed, name-addressed attribute surface.
///
/// The tables are static: they are built once per type and shared by every instance.
pub trait Attributes: Sized + 'static {
    fn properties() -> &'static [PropertyDescriptor<Self>];

    fn methods() -> &'static [MethodDescriptor<Self>] {
        &[]
    }

    fn property(name: &str) -> Option<&'static PropertyDescriptor<Self>> {
        Self::properties().iter().find(|p| p.name == name)
    }

    fn attr_names() -> Vec<&'static str> {
        Self::properties().iter().map(|p| p.name).collect()
    }

    fn get_attr(&self, name: &str) -> LogicResult<Value> {
        let prop =
            Self::property(name).ok_or_else(|| LogicError::UnknownAttribute(name.to_owned()))?;
        (prop.get)(self)
    }

    fn set_attr(&self, name: &str, value: Value) -> LogicResult<()> {
        let prop =
            Self::property(name).ok_or_else(|| LogicError::UnknownAttribute(name.to_owned()))?;
        let set = prop
            .set
            .ok_or_else(|| LogicError::ReadOnly(name.to_owned()))?;
        set(self, value)
    }

    fn call_method(&self, name: &str, args: &[Value]) -> LogicResult<Value> {
        let method = Self::methods()
            .iter()
            .find(|m| m.name == name)
            .ok_or_else(|| LogicError::UnknownAttribute(name.to_owned()))?;
        (method.call)(self, args)
    }
}
