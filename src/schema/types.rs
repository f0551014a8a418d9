/// Type descriptors
///
/// Object types, field descriptors and type references, built the same way
/// for every type in the registry.

use crate::schema::resolver::Resolver;

use indexmap::IndexMap;
use std::fmt;

/// Built-in scalar types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarType {
    Int,
    Float,
    String,
    Boolean,
    Id,
}

impl ScalarType {
    pub const ALL: [ScalarType; 5] = [
        ScalarType::Int,
        ScalarType::Float,
        ScalarType::String,
        ScalarType::Boolean,
        ScalarType::Id,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            ScalarType::Int => "Int",
            ScalarType::Float => "Float",
            ScalarType::String => "String",
            ScalarType::Boolean => "Boolean",
            ScalarType::Id => "ID",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.name() == name)
    }
}

impl fmt::Display for ScalarType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Declared type of a field
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeRef {
    Named(String),
    List(Box<TypeRef>),
}

impl TypeRef {
    pub fn named(name: impl Into<String>) -> Self {
        TypeRef::Named(name.into())
    }

    pub fn scalar(scalar: ScalarType) -> Self {
        TypeRef::Named(scalar.name().to_string())
    }

    pub fn list(inner: TypeRef) -> Self {
        TypeRef::List(Box::new(inner))
    }

    /// Innermost named type
    pub fn base_name(&self) -> &str {
        match self {
            TypeRef::Named(name) => name,
            TypeRef::List(inner) => inner.base_name(),
        }
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeRef::Named(name) => f.write_str(name),
            TypeRef::List(inner) => write!(f, "[{}]", inner),
        }
    }
}

/// A named, typed, resolvable value on an object type
#[derive(Debug, Clone)]
pub struct FieldDescriptor {
    pub(crate) name: String,
    pub(crate) ty: TypeRef,
    pub(crate) description: Option<String>,
    pub(crate) arguments: IndexMap<String, ScalarType>,
    pub(crate) duplicate_arguments: Vec<String>,
    pub(crate) resolver: Resolver,
}

impl FieldDescriptor {
    pub fn new(name: impl Into<String>, ty: TypeRef, resolver: Resolver) -> Self {
        Self {
            name: name.into(),
            ty,
            description: None,
            arguments: IndexMap::new(),
            duplicate_arguments: Vec::new(),
            resolver,
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn argument(mut self, name: impl Into<String>, ty: ScalarType) -> Self {
        let name = name.into();
        if self.arguments.contains_key(&name) {
            self.duplicate_arguments.push(name);
        } else {
            self.arguments.insert(name, ty);
        }
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn ty(&self) -> &TypeRef {
        &self.ty
    }

    pub fn arguments(&self) -> &IndexMap<String, ScalarType> {
        &self.arguments
    }

    pub fn resolver(&self) -> &Resolver {
        &self.resolver
    }
}

/// An object type and its fields in declaration order
#[derive(Debug, Clone)]
pub struct ObjectType {
    pub(crate) name: String,
    pub(crate) description: Option<String>,
    pub(crate) fields: Vec<FieldDescriptor>,
}

impl ObjectType {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            fields: Vec::new(),
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn field(mut self, field: FieldDescriptor) -> Self {
        self.fields.push(field);
        self
    }

    pub fn type_name(&self) -> &str {
        &self.name
    }
}

/// A registered object type with its fields indexed by name
#[derive(Debug, Clone)]
pub struct RegisteredType {
    pub(crate) name: String,
    pub(crate) description: Option<String>,
    pub(crate) fields: IndexMap<String, FieldDescriptor>,
}

impl RegisteredType {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.get(name)
    }

    pub fn fields(&self) -> impl Iterator<Item = &FieldDescriptor> {
        self.fields.values()
    }
}
