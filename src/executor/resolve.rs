use crate::data::{BlogStore, Entity};
use crate::executor::response::{PathSegment, QueryError};
use crate::executor::validate::{FieldPlan, PlanKind};
use crate::schema::resolver::Resolved;
use crate::schema::types::{ScalarType, TypeRef};

use async_graphql::parser::Pos;
use async_graphql::Value;
use indexmap::IndexMap;

/// Resolve a validated plan against the store, depth-first
///
/// Resolver failures null out the failing field only and are returned
/// alongside the data.
pub fn execute_plan<'s>(
    store: &'s BlogStore,
    root_type: &str,
    plan: &[FieldPlan<'s>],
) -> (Value, Vec<QueryError>) {
    let mut resolution = Resolution {
        store,
        errors: Vec::new(),
    };
    let mut path = Vec::new();
    let data = resolution.selection(plan, Entity::Root, root_type, &mut path);
    (data, resolution.errors)
}

struct Resolution<'s> {
    store: &'s BlogStore,
    errors: Vec<QueryError>,
}

impl<'s> Resolution<'s> {
    fn selection(
        &mut self,
        plans: &[FieldPlan<'s>],
        source: Entity<'s>,
        type_name: &str,
        path: &mut Vec<PathSegment>,
    ) -> Value {
        let mut object = IndexMap::with_capacity(plans.len());

        for plan in plans {
            path.push(PathSegment::Field(plan.response_key.to_string()));

            let value = match &plan.kind {
                PlanKind::Typename => Value::String(type_name.to_string()),
                PlanKind::Field {
                    field,
                    arguments,
                    selection,
                    ..
                } => match field.resolver().resolve(self.store, source, arguments) {
                    Ok(resolved) => self.complete(field.ty(), resolved, selection, plan.pos, path),
                    Err(e) => {
                        tracing::debug!("Resolver for {} failed: {}", field.name(), e);
                        self.errors.push(QueryError::resolution(e.message, plan.pos, path));
                        Value::Null
                    }
                },
            };

            path.pop();
            object.insert(plan.response_key.clone(), value);
        }

        Value::Object(object)
    }

    /// Shape a resolved value to the field's declared type
    fn complete(
        &mut self,
        ty: &TypeRef,
        resolved: Resolved<'s>,
        selection: &[FieldPlan<'s>],
        pos: Pos,
        path: &mut Vec<PathSegment>,
    ) -> Value {
        match (ty, resolved) {
            (_, Resolved::Null) => Value::Null,

            (TypeRef::List(inner), Resolved::List(items)) => {
                let mut values = Vec::with_capacity(items.len());
                for (index, item) in items.into_iter().enumerate() {
                    path.push(PathSegment::Index(index));
                    values.push(self.complete(inner, item, selection, pos, path));
                    path.pop();
                }
                Value::List(values)
            }

            (TypeRef::Named(name), Resolved::Scalar(value)) => {
                match ScalarType::from_name(name) {
                    Some(scalar) if scalar_accepts(scalar, &value) => value,
                    _ => self.mismatch(ty, &format!("the value {}", value), pos, path),
                }
            }

            (TypeRef::Named(name), Resolved::Entity(entity))
                if entity.type_name() == Some(name.as_str()) =>
            {
                self.selection(selection, entity, name, path)
            }

            (ty, other) => {
                let found = match other {
                    Resolved::Entity(entity) => {
                        format!("an object of type {}", entity.type_name().unwrap_or("RootQuery"))
                    }
                    Resolved::List(_) => "a list".to_string(),
                    Resolved::Scalar(value) => format!("the value {}", value),
                    Resolved::Null => "null".to_string(),
                };
                self.mismatch(ty, &found, pos, path)
            }
        }
    }

    fn mismatch(&mut self, ty: &TypeRef, found: &str, pos: Pos, path: &[PathSegment]) -> Value {
        self.errors.push(QueryError::resolution(
            format!("Expected a value of type \"{}\" but resolved {}.", ty, found),
            pos,
            path,
        ));
        Value::Null
    }
}

fn scalar_accepts(scalar: ScalarType, value: &Value) -> bool {
    match (scalar, value) {
        (ScalarType::Int, Value::Number(n)) => n
            .as_i64()
            .is_some_and(|i| i32::try_from(i).is_ok()),
        (ScalarType::Float, Value::Number(_)) => true,
        (ScalarType::String, Value::String(_)) => true,
        (ScalarType::Boolean, Value::Boolean(_)) => true,
        (ScalarType::Id, Value::String(_)) => true,
        (ScalarType::Id, Value::Number(n)) => n.is_i64() || n.is_u64(),
        _ => false,
    }
}
