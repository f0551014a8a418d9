use crate::error::{BlogqlError, Result};
use crate::schema::types::{ObjectType, RegisteredType, ScalarType};

use indexmap::IndexMap;

/// Field name every object type answers without declaring it
pub const TYPENAME_FIELD: &str = "__typename";

/// Registry of object types, in registration order
#[derive(Debug, Clone, Default)]
pub struct TypeRegistry {
    types: IndexMap<String, RegisteredType>,
}

impl TypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an object type
    ///
    /// Fails when the name is taken (by another object type or a built-in
    /// scalar), when two fields share a name, or when a field or argument
    /// uses a reserved `__` name.
    pub fn define_type(&mut self, object: ObjectType) -> Result<()> {
        let ObjectType {
            name,
            description,
            fields,
        } = object;

        if self.types.contains_key(&name) || ScalarType::from_name(&name).is_some() {
            return Err(BlogqlError::DuplicateType(name));
        }

        let mut indexed = IndexMap::with_capacity(fields.len());
        for field in fields {
            if field.name.starts_with("__") {
                return Err(BlogqlError::SchemaGeneration(format!(
                    "Field '{}.{}' uses a reserved name",
                    name, field.name
                )));
            }

            if let Some(argument) = field.duplicate_arguments.first() {
                return Err(BlogqlError::InvalidArgument {
                    type_name: name,
                    field: field.name,
                    argument: argument.clone(),
                    reason: "declared more than once".to_string(),
                });
            }

            if let Some(argument) = field.arguments.keys().find(|a| a.starts_with("__")) {
                return Err(BlogqlError::InvalidArgument {
                    type_name: name.clone(),
                    field: field.name.clone(),
                    argument: argument.clone(),
                    reason: "names starting with \"__\" are reserved".to_string(),
                });
            }

            if indexed.contains_key(&field.name) {
                return Err(BlogqlError::DuplicateField {
                    type_name: name,
                    field: field.name,
                });
            }
            indexed.insert(field.name.clone(), field);
        }

        tracing::debug!("Registered type {} with {} fields", name, indexed.len());

        self.types.insert(
            name.clone(),
            RegisteredType {
                name,
                description,
                fields: indexed,
            },
        );

        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&RegisteredType> {
        self.types.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.types.contains_key(name)
    }

    pub fn types(&self) -> impl Iterator<Item = &RegisteredType> {
        self.types.values()
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::resolver::Resolver;
    use crate::schema::types::{FieldDescriptor, TypeRef};

    fn id_field() -> FieldDescriptor {
        FieldDescriptor::new("id", TypeRef::scalar(ScalarType::Int), Resolver::attribute("id"))
    }

    #[test]
    fn test_define_type() {
        let mut registry = TypeRegistry::new();
        registry
            .define_type(ObjectType::new("Author").field(id_field()))
            .unwrap();

        assert!(registry.contains("Author"));
        assert_eq!(registry.len(), 1);
        assert!(registry.get("Author").unwrap().field("id").is_some());
    }

    #[test]
    fn test_duplicate_type() {
        let mut registry = TypeRegistry::new();
        registry.define_type(ObjectType::new("Post")).unwrap();

        let err = registry.define_type(ObjectType::new("Post")).unwrap_err();
        assert!(matches!(err, BlogqlError::DuplicateType(name) if name == "Post"));
    }

    #[test]
    fn test_type_cannot_shadow_scalar() {
        let mut registry = TypeRegistry::new();
        let err = registry.define_type(ObjectType::new("String")).unwrap_err();
        assert!(matches!(err, BlogqlError::DuplicateType(_)));
    }

    #[test]
    fn test_duplicate_field() {
        let mut registry = TypeRegistry::new();
        let err = registry
            .define_type(ObjectType::new("Post").field(id_field()).field(id_field()))
            .unwrap_err();

        assert!(matches!(
            err,
            BlogqlError::DuplicateField { ref type_name, ref field } if type_name == "Post" && field == "id"
        ));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_reserved_field_name() {
        let mut registry = TypeRegistry::new();
        let field = FieldDescriptor::new(
            TYPENAME_FIELD,
            TypeRef::scalar(ScalarType::String),
            Resolver::attribute("kind"),
        );

        assert!(registry.define_type(ObjectType::new("Post").field(field)).is_err());
    }

    #[test]
    fn test_duplicate_argument() {
        let mut registry = TypeRegistry::new();
        let field = FieldDescriptor::new("post", TypeRef::named("Post"), Resolver::PostById)
            .argument("id", ScalarType::Int)
            .argument("id", ScalarType::Int);

        let err = registry
            .define_type(ObjectType::new("Query").field(field))
            .unwrap_err();
        assert!(matches!(err, BlogqlError::InvalidArgument { .. }));
    }
}
