use std::fmt;
use std::marker::PhantomData;

/// Type-safe scene handle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Handle<T> {
    pub id: u64,
    _phantom: PhantomData<T>,
}

impl<T> Handle<T> {
    pub fn new(id: u64) -> Self {
        Self {
            id,
            _phantom: PhantomData,
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }
}

impl<T> fmt::Display for Handle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.id)
    }
}

/// Marker for group handles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Group;

/// Marker for primitive handles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Primitive;

/// A group of primitives sharing one transform.
pub type GroupHandle = Handle<Group>;

/// A single renderable primitive.
pub type PrimitiveHandle = Handle<Primitive>;
