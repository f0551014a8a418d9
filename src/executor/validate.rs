/// Query validation
///
/// Walks the parsed operation against the schema and produces the execution
/// plan: a tree of `FieldPlan`s with arguments already coerced and bound to
/// their resolver. Every problem is collected as a path-tagged
/// `QueryError`; a plan is only returned when there are none.

use crate::config::ExecutorConfig;
use crate::executor::response::{PathSegment, QueryError};
use crate::schema::registry::TYPENAME_FIELD;
use crate::schema::resolver::{ArgumentValue, Arguments};
use crate::schema::types::{FieldDescriptor, RegisteredType, ScalarType};
use crate::schema::Schema;

use async_graphql::parser::types::{
    BaseType, Directive, ExecutableDocument, Field, FragmentDefinition, OperationDefinition,
    Selection, SelectionSet, VariableDefinition,
};
use async_graphql::parser::{Pos, Positioned};
use async_graphql::{Name, Value, Variables};
use indexmap::IndexMap;
use std::collections::HashMap;

/// A validated field selection
#[derive(Debug, Clone)]
pub struct FieldPlan<'s> {
    pub response_key: Name,
    pub pos: Pos,
    pub kind: PlanKind<'s>,
}

#[derive(Debug, Clone)]
pub enum PlanKind<'s> {
    Typename,
    Field {
        field: &'s FieldDescriptor,
        coerced: IndexMap<String, ArgumentValue>,
        arguments: Arguments,
        selection: Vec<FieldPlan<'s>>,
    },
}

/// Validate `operation` and build its plan
pub fn plan_operation<'s>(
    schema: &'s Schema,
    document: &ExecutableDocument,
    operation: &OperationDefinition,
    variables: &Variables,
    limits: &ExecutorConfig,
) -> Result<Vec<FieldPlan<'s>>, Vec<QueryError>> {
    let mut validator = Validator {
        schema,
        fragments: &document.fragments,
        variables: HashMap::new(),
        max_depth: limits.max_depth,
        max_selections: limits.max_selections,
        selections: 0,
        errors: Vec::new(),
    };

    validator.reject_directives(&operation.directives, "QUERY");
    for fragment in document.fragments.values() {
        validator.reject_directives(&fragment.node.directives, "FRAGMENT_DEFINITION");
    }

    for definition in &operation.variable_definitions {
        validator.declare_variable(definition, variables);
    }

    let mut path = Vec::new();
    let mut spreads = Vec::new();
    let plan = validator.selection_set(
        schema.query_type(),
        &operation.selection_set.node,
        &mut path,
        1,
        &mut spreads,
    );

    if validator.errors.is_empty() {
        Ok(plan)
    } else {
        Err(validator.errors)
    }
}

/// A declared variable and the value it takes in this request
struct VariableBinding {
    /// `None` when the declared type is not a usable scalar
    ty: Option<ScalarType>,
    value: Value,
}

struct Validator<'s, 'd> {
    schema: &'s Schema,
    fragments: &'d HashMap<Name, Positioned<FragmentDefinition>>,
    variables: HashMap<Name, VariableBinding>,
    max_depth: usize,
    max_selections: usize,
    selections: usize,
    errors: Vec<QueryError>,
}

impl<'s, 'd> Validator<'s, 'd> {
    fn error(&mut self, message: impl Into<String>, pos: Pos, path: &[PathSegment]) {
        self.errors.push(QueryError::validation(message, pos, path));
    }

    /// Count one visited selection against `max_selections`
    ///
    /// Fragments are expanded at every spread, so the count bounds the
    /// work of a document that spreads the same fragment repeatedly.
    fn visit(&mut self, pos: Pos, path: &[PathSegment]) -> bool {
        self.selections += 1;
        if self.selections <= self.max_selections {
            return true;
        }
        if self.selections == self.max_selections + 1 {
            self.error(
                format!(
                    "Query expands to more than the maximum of {} selections.",
                    self.max_selections
                ),
                pos,
                path,
            );
        }
        false
    }

    fn selection_set(
        &mut self,
        parent: &'s RegisteredType,
        set: &SelectionSet,
        path: &mut Vec<PathSegment>,
        depth: usize,
        spreads: &mut Vec<Name>,
    ) -> Vec<FieldPlan<'s>> {
        let mut plans = Vec::new();
        self.collect(parent, set, path, depth, spreads, &mut plans);
        plans
    }

    /// Collect the fields of `set` into `out`, flattening fragments
    fn collect(
        &mut self,
        parent: &'s RegisteredType,
        set: &SelectionSet,
        path: &mut Vec<PathSegment>,
        depth: usize,
        spreads: &mut Vec<Name>,
        out: &mut Vec<FieldPlan<'s>>,
    ) {
        for selection in &set.items {
            if !self.visit(selection.pos, path) {
                return;
            }
            match &selection.node {
                Selection::Field(field) => {
                    if !self.include(&field.node.directives, path) {
                        continue;
                    }
                    let key = field.node.response_key().node.clone();
                    path.push(PathSegment::Field(key.to_string()));
                    if let Some(plan) = self.field(parent, field, path, depth, spreads) {
                        self.merge(out, plan, path);
                    }
                    path.pop();
                }

                Selection::FragmentSpread(spread) => {
                    if !self.include(&spread.node.directives, path) {
                        continue;
                    }
                    let name = &spread.node.fragment_name.node;
                    if spreads.contains(name) {
                        self.error(
                            format!("Cannot spread fragment \"{}\" within itself.", name),
                            spread.pos,
                            path,
                        );
                        continue;
                    }
                    let fragments = self.fragments;
                    let Some(fragment) = fragments.get(name) else {
                        self.error(format!("Unknown fragment \"{}\".", name), spread.pos, path);
                        continue;
                    };
                    let on = &fragment.node.type_condition.node.on;
                    if !self.type_condition_matches(parent, &on.node, on.pos, path) {
                        continue;
                    }

                    spreads.push(name.clone());
                    self.collect(
                        parent,
                        &fragment.node.selection_set.node,
                        path,
                        depth,
                        spreads,
                        out,
                    );
                    spreads.pop();
                }

                Selection::InlineFragment(fragment) => {
                    if !self.include(&fragment.node.directives, path) {
                        continue;
                    }
                    if let Some(condition) = &fragment.node.type_condition {
                        let on = &condition.node.on;
                        if !self.type_condition_matches(parent, &on.node, on.pos, path) {
                            continue;
                        }
                    }
                    self.collect(
                        parent,
                        &fragment.node.selection_set.node,
                        path,
                        depth,
                        spreads,
                        out,
                    );
                }
            }
        }
    }

    fn type_condition_matches(
        &mut self,
        parent: &RegisteredType,
        on: &Name,
        pos: Pos,
        path: &[PathSegment],
    ) -> bool {
        if on.as_str() == parent.name() {
            return true;
        }
        if self.schema.is_object_type(on) {
            self.error(
                format!(
                    "Fragment cannot be spread here as objects of type \"{}\" can never be of type \"{}\".",
                    parent.name(),
                    on
                ),
                pos,
                path,
            );
        } else {
            self.error(format!("Unknown type \"{}\".", on), pos, path);
        }
        false
    }

    fn field(
        &mut self,
        parent: &'s RegisteredType,
        field: &Positioned<Field>,
        path: &mut Vec<PathSegment>,
        depth: usize,
        spreads: &mut Vec<Name>,
    ) -> Option<FieldPlan<'s>> {
        let node = &field.node;
        let name = node.name.node.as_str();
        let response_key = node.response_key().node.clone();

        if name == TYPENAME_FIELD {
            if let Some((arg, _)) = node.arguments.first() {
                self.error(
                    format!("Unknown argument \"{}\" on field \"{}\".", arg.node, TYPENAME_FIELD),
                    arg.pos,
                    path,
                );
            }
            if !node.selection_set.node.items.is_empty() {
                self.error(
                    format!(
                        "Field \"{}\" must not have a selection since type \"String\" has no subfields.",
                        TYPENAME_FIELD
                    ),
                    field.pos,
                    path,
                );
            }
            return Some(FieldPlan {
                response_key,
                pos: field.pos,
                kind: PlanKind::Typename,
            });
        }

        let Some(descriptor) = parent.field(name) else {
            self.error(
                format!("Cannot query field \"{}\" on type \"{}\".", name, parent.name()),
                node.name.pos,
                path,
            );
            return None;
        };

        let coerced = self.arguments(parent, descriptor, node, path)?;
        let arguments = match descriptor.resolver().bind_arguments(&coerced) {
            Ok(arguments) => arguments,
            Err(reason) => {
                self.error(
                    format!("Invalid arguments for field \"{}\": {}", name, reason),
                    field.pos,
                    path,
                );
                return None;
            }
        };

        let base = descriptor.ty().base_name();
        let selection = match self.schema.object_type(base) {
            Some(object) => {
                if node.selection_set.node.items.is_empty() {
                    self.error(
                        format!(
                            "Field \"{}\" of type \"{}\" must have a selection of subfields.",
                            name,
                            descriptor.ty()
                        ),
                        field.pos,
                        path,
                    );
                    return None;
                }
                if depth >= self.max_depth {
                    self.error(
                        format!("Query is nested deeper than the maximum depth of {}.", self.max_depth),
                        field.pos,
                        path,
                    );
                    return None;
                }
                self.selection_set(object, &node.selection_set.node, path, depth + 1, spreads)
            }
            None => {
                if !node.selection_set.node.items.is_empty() {
                    self.error(
                        format!(
                            "Field \"{}\" must not have a selection since type \"{}\" has no subfields.",
                            name,
                            descriptor.ty()
                        ),
                        node.selection_set.pos,
                        path,
                    );
                    return None;
                }
                Vec::new()
            }
        };

        Some(FieldPlan {
            response_key,
            pos: field.pos,
            kind: PlanKind::Field {
                field: descriptor,
                coerced,
                arguments,
                selection,
            },
        })
    }

    fn arguments(
        &mut self,
        parent: &RegisteredType,
        descriptor: &FieldDescriptor,
        node: &Field,
        path: &[PathSegment],
    ) -> Option<IndexMap<String, ArgumentValue>> {
        let mut coerced = IndexMap::new();
        let mut valid = true;

        for (arg_name, value) in &node.arguments {
            let arg = arg_name.node.as_str();
            if coerced.contains_key(arg) {
                self.error(
                    format!("There can be only one argument named \"{}\".", arg),
                    arg_name.pos,
                    path,
                );
                valid = false;
                continue;
            }

            let Some(ty) = descriptor.arguments().get(arg).copied() else {
                self.error(
                    format!(
                        "Unknown argument \"{}\" on field \"{}.{}\".",
                        arg,
                        parent.name(),
                        descriptor.name()
                    ),
                    arg_name.pos,
                    path,
                );
                valid = false;
                continue;
            };

            let constant = value
                .node
                .clone()
                .into_const_with(|variable| self.variable(&variable, ty));
            let result = constant.and_then(|constant| {
                coerce(&constant, ty).map_err(|reason| {
                    format!("Argument \"{}\" has invalid value {}: {}", arg, constant, reason)
                })
            });

            match result {
                Ok(argument) => {
                    coerced.insert(arg.to_string(), argument);
                }
                Err(message) => {
                    self.error(message, value.pos, path);
                    valid = false;
                }
            }
        }

        valid.then_some(coerced)
    }

    /// Check a variable's declared type and record its request value
    fn declare_variable(&mut self, definition: &Positioned<VariableDefinition>, supplied: &Variables) {
        let node = &definition.node;
        let name = node.name.node.clone();
        let declared = &node.var_type.node;

        let ty = match &declared.base {
            BaseType::Named(base) => match ScalarType::from_name(base.as_str()) {
                Some(scalar) => Some(scalar),
                None if self.schema.is_object_type(base) => {
                    self.error(
                        format!(
                            "Variable \"${}\" cannot be non-input type \"{}\".",
                            name, declared
                        ),
                        node.var_type.pos,
                        &[],
                    );
                    None
                }
                None => {
                    self.error(format!("Unknown type \"{}\".", base), node.var_type.pos, &[]);
                    None
                }
            },
            BaseType::List(_) => {
                self.error(
                    format!(
                        "Variable \"${}\" of list type \"{}\" cannot be used by any argument.",
                        name, declared
                    ),
                    node.var_type.pos,
                    &[],
                );
                None
            }
        };

        let value = supplied
            .get(&name)
            .cloned()
            .or_else(|| node.default_value.as_ref().map(|v| v.node.clone()))
            .unwrap_or(Value::Null);

        if let Some(scalar) = ty {
            if matches!(value, Value::Null) && !declared.nullable {
                self.error(
                    format!(
                        "Variable \"${}\" of non-null type \"{}\" must not be null.",
                        name, declared
                    ),
                    definition.pos,
                    &[],
                );
            } else if let Err(reason) = coerce(&value, scalar) {
                self.error(
                    format!("Variable \"${}\" got invalid value {}: {}", name, value, reason),
                    definition.pos,
                    &[],
                );
            }
        }

        self.variables.insert(name, VariableBinding { ty, value });
    }

    /// Substitute a variable used where `expected` is accepted
    fn variable(&self, name: &Name, expected: ScalarType) -> Result<Value, String> {
        let binding = self
            .variables
            .get(name)
            .ok_or_else(|| format!("Variable \"${}\" is not defined.", name))?;

        match binding.ty {
            Some(ty) if ty != expected => Err(format!(
                "Variable \"${}\" of type \"{}\" used in position expecting type \"{}\".",
                name, ty, expected
            )),
            _ => Ok(binding.value.clone()),
        }
    }

    /// Report directives placed where none are supported
    fn reject_directives(&mut self, directives: &[Positioned<Directive>], location: &str) {
        for directive in directives {
            let name = directive.node.name.node.as_str();
            let message = match name {
                "skip" | "include" => {
                    format!("Directive \"@{}\" may not be used on {}.", name, location)
                }
                _ => format!("Unknown directive \"@{}\".", name),
            };
            self.error(message, directive.pos, &[]);
        }
    }

    /// Evaluate `@skip` / `@include`
    fn include(&mut self, directives: &[Positioned<Directive>], path: &[PathSegment]) -> bool {
        let mut include = true;

        for directive in directives {
            let name = directive.node.name.node.as_str();
            let skip_when = match name {
                "skip" => true,
                "include" => false,
                _ => {
                    self.error(format!("Unknown directive \"@{}\".", name), directive.pos, path);
                    return false;
                }
            };

            let condition = directive
                .node
                .get_argument("if")
                .ok_or_else(|| format!("Directive \"@{}\" requires argument \"if\".", name))
                .and_then(|value| {
                    value
                        .node
                        .clone()
                        .into_const_with(|variable| self.variable(&variable, ScalarType::Boolean))
                });

            match condition {
                Ok(Value::Boolean(flag)) => {
                    if flag == skip_when {
                        include = false;
                    }
                }
                Ok(other) => {
                    self.error(
                        format!(
                            "Argument \"if\" of directive \"@{}\" has invalid value {}: expected type \"Boolean\"",
                            name, other
                        ),
                        directive.pos,
                        path,
                    );
                    return false;
                }
                Err(message) => {
                    self.error(message, directive.pos, path);
                    return false;
                }
            }
        }

        include
    }

    /// Merge a field into the plans of its selection set
    ///
    /// Selections sharing a response key must name the same field with the
    /// same arguments; their sub-selections are combined.
    fn merge(&mut self, out: &mut Vec<FieldPlan<'s>>, plan: FieldPlan<'s>, path: &mut Vec<PathSegment>) {
        let Some(existing) = out.iter_mut().find(|p| p.response_key == plan.response_key) else {
            out.push(plan);
            return;
        };

        let key = plan.response_key.clone();
        let pos = plan.pos;
        match (&mut existing.kind, plan.kind) {
            (PlanKind::Typename, PlanKind::Typename) => {}
            (
                PlanKind::Field {
                    field: left,
                    coerced: left_args,
                    selection: left_selection,
                    ..
                },
                PlanKind::Field {
                    field: right,
                    coerced: right_args,
                    selection: right_selection,
                    ..
                },
            ) if left.name() == right.name() && *left_args == right_args => {
                for child in right_selection {
                    path.push(PathSegment::Field(child.response_key.to_string()));
                    self.merge(left_selection, child, path);
                    path.pop();
                }
            }
            _ => {
                self.error(
                    format!(
                        "Fields \"{}\" conflict because they select different fields or arguments.",
                        key
                    ),
                    pos,
                    path,
                );
            }
        }
    }
}

/// Coerce a constant to a built-in scalar
pub fn coerce(value: &Value, ty: ScalarType) -> Result<ArgumentValue, String> {
    match (ty, value) {
        (_, Value::Null) => Ok(ArgumentValue::Null),
        (ScalarType::Int, Value::Number(n)) => n
            .as_i64()
            .and_then(|i| i32::try_from(i).ok())
            .map(ArgumentValue::Int)
            .ok_or_else(|| "Int cannot represent a non 32-bit signed integer value".to_string()),
        (ScalarType::Float, Value::Number(n)) => n
            .as_f64()
            .map(ArgumentValue::Float)
            .ok_or_else(|| "Float cannot represent this value".to_string()),
        (ScalarType::String, Value::String(s)) => Ok(ArgumentValue::String(s.clone())),
        (ScalarType::Boolean, Value::Boolean(b)) => Ok(ArgumentValue::Boolean(*b)),
        (ScalarType::Id, Value::String(s)) => Ok(ArgumentValue::Id(s.clone())),
        (ScalarType::Id, Value::Number(n)) if n.is_i64() || n.is_u64() => {
            Ok(ArgumentValue::Id(n.to_string()))
        }
        (ty, _) => Err(format!("expected type \"{}\"", ty)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::BlogStore;
    use crate::executor::response::ErrorKind;
    use crate::schema::build_blog_schema;
    use async_graphql::parser::parse_query;
    use async_graphql::parser::types::DocumentOperations;
    use std::sync::Arc;

    fn schema() -> Schema {
        build_blog_schema(Arc::new(BlogStore::sample())).unwrap()
    }

    fn plan<'s>(
        schema: &'s Schema,
        query: &str,
        variables: Variables,
    ) -> Result<Vec<FieldPlan<'s>>, Vec<QueryError>> {
        let document = parse_query(query).expect("query should parse");
        let operation = match &document.operations {
            DocumentOperations::Single(op) => op.node.clone(),
            DocumentOperations::Multiple(ops) => ops.values().next().unwrap().node.clone(),
        };
        plan_operation(schema, &document, &operation, &variables, &ExecutorConfig::default())
    }

    fn keys(plans: &[FieldPlan<'_>]) -> Vec<String> {
        plans.iter().map(|p| p.response_key.to_string()).collect()
    }

    fn children<'a, 's>(plan: &'a FieldPlan<'s>) -> &'a [FieldPlan<'s>] {
        match &plan.kind {
            PlanKind::Field { selection, .. } => selection,
            PlanKind::Typename => &[],
        }
    }

    #[test]
    fn test_plan_binds_lookup_arguments() {
        let schema = schema();
        let plans = plan(&schema, "{ post(id: 2) { title } }", Variables::default()).unwrap();

        assert_eq!(keys(&plans), vec!["post"]);
        match &plans[0].kind {
            PlanKind::Field { arguments, selection, .. } => {
                assert_eq!(arguments, &Arguments::Lookup { id: Some(2) });
                assert_eq!(keys(selection), vec!["title"]);
            }
            PlanKind::Typename => panic!("expected a field plan"),
        }
    }

    #[test]
    fn test_unknown_field_has_path() {
        let schema = schema();
        let errors = plan(
            &schema,
            "{ post(id: 1) { author { nickname } } }",
            Variables::default(),
        )
        .unwrap_err();

        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].kind, ErrorKind::Validation);
        assert_eq!(
            errors[0].path,
            vec![
                PathSegment::from("post"),
                PathSegment::from("author"),
                PathSegment::from("nickname")
            ]
        );
        assert!(errors[0].message.contains("\"nickname\" on type \"Author\""));
    }

    #[test]
    fn test_argument_errors() {
        let schema = schema();

        let errors = plan(&schema, "{ post(id: \"one\") { id } }", Variables::default()).unwrap_err();
        assert!(errors[0].message.contains("Argument \"id\" has invalid value"));

        let errors = plan(&schema, "{ post(slug: 1) { id } }", Variables::default()).unwrap_err();
        assert!(errors[0].message.contains("Unknown argument \"slug\""));

        let errors = plan(&schema, "{ post(id: 1, id: 2) { id } }", Variables::default()).unwrap_err();
        assert!(errors[0].message.contains("only one argument"));

        let errors = plan(&schema, "{ post(id: 4294967296) { id } }", Variables::default()).unwrap_err();
        assert!(errors[0].message.contains("32-bit"));
    }

    #[test]
    fn test_errors_are_collected() {
        let schema = schema();
        let errors = plan(&schema, "{ posts { id nope } authors { zip } }", Variables::default())
            .unwrap_err();

        assert_eq!(errors.len(), 2);
    }

    #[test]
    fn test_subselection_rules() {
        let schema = schema();

        let errors = plan(&schema, "{ posts }", Variables::default()).unwrap_err();
        assert!(errors[0].message.contains("must have a selection of subfields"));

        let errors = plan(&schema, "{ posts { id { value } } }", Variables::default()).unwrap_err();
        assert!(errors[0].message.contains("must not have a selection"));
    }

    #[test]
    fn test_fragments_are_flattened() {
        let schema = schema();
        let plans = plan(
            &schema,
            r#"
            query { posts { ...PostParts ... on Post { content } } }
            fragment PostParts on Post { id title }
            "#,
            Variables::default(),
        )
        .unwrap();

        assert_eq!(keys(children(&plans[0])), vec!["id", "title", "content"]);
    }

    #[test]
    fn test_fragment_type_mismatch() {
        let schema = schema();
        let errors = plan(
            &schema,
            "query { posts { ...A } } fragment A on Author { id }",
            Variables::default(),
        )
        .unwrap_err();

        assert!(errors[0].message.contains("can never be of type \"Author\""));
    }

    #[test]
    fn test_fragment_cycle() {
        let schema = schema();
        let errors = plan(
            &schema,
            "query { posts { ...A } } fragment A on Post { ...B } fragment B on Post { ...A }",
            Variables::default(),
        )
        .unwrap_err();

        assert!(errors[0].message.contains("within itself"));
    }

    #[test]
    fn test_merge_same_response_key() {
        let schema = schema();
        let plans = plan(
            &schema,
            "{ post(id: 1) { title } post(id: 1) { content title } }",
            Variables::default(),
        )
        .unwrap();

        assert_eq!(plans.len(), 1);
        assert_eq!(keys(children(&plans[0])), vec!["title", "content"]);
    }

    #[test]
    fn test_conflicting_response_key() {
        let schema = schema();
        let errors = plan(
            &schema,
            "{ post(id: 1) { title } post(id: 2) { title } }",
            Variables::default(),
        )
        .unwrap_err();

        assert!(errors[0].message.contains("conflict"));
    }

    #[test]
    fn test_aliases_and_typename() {
        let schema = schema();
        let plans = plan(
            &schema,
            "{ first: post(id: 1) { __typename heading: title } second: post(id: 2) { id } }",
            Variables::default(),
        )
        .unwrap();

        assert_eq!(keys(&plans), vec!["first", "second"]);
        assert_eq!(keys(children(&plans[0])), vec!["__typename", "heading"]);
        assert!(matches!(children(&plans[0])[0].kind, PlanKind::Typename));
    }

    #[test]
    fn test_skip_and_include() {
        let schema = schema();
        let plans = plan(
            &schema,
            "{ posts { id @skip(if: true) title @include(if: false) content @include(if: true) } }",
            Variables::default(),
        )
        .unwrap();

        assert_eq!(keys(children(&plans[0])), vec!["content"]);

        let errors = plan(&schema, "{ posts { id @deprecated } }", Variables::default()).unwrap_err();
        assert!(errors[0].message.contains("Unknown directive"));
    }

    #[test]
    fn test_variables() {
        let schema = schema();
        let variables = Variables::from_json(serde_json::json!({ "id": 2 }));
        let plans = plan(
            &schema,
            "query Lookup($id: Int) { post(id: $id) { id } }",
            variables,
        )
        .unwrap();

        match &plans[0].kind {
            PlanKind::Field { arguments, .. } => {
                assert_eq!(arguments, &Arguments::Lookup { id: Some(2) })
            }
            PlanKind::Typename => panic!("expected a field plan"),
        }

        let defaulted = plan(
            &schema,
            "query Lookup($id: Int = 1) { post(id: $id) { id } }",
            Variables::default(),
        )
        .unwrap();
        match &defaulted[0].kind {
            PlanKind::Field { arguments, .. } => {
                assert_eq!(arguments, &Arguments::Lookup { id: Some(1) })
            }
            PlanKind::Typename => panic!("expected a field plan"),
        }

        let errors = plan(&schema, "{ post(id: $missing) { id } }", Variables::default()).unwrap_err();
        assert!(errors[0].message.contains("\"$missing\" is not defined"));
    }

    #[test]
    fn test_variable_declared_types() {
        let schema = schema();

        let errors = plan(
            &schema,
            "query Q($id: Banana) { post(id: $id) { id } }",
            Variables::default(),
        )
        .unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].message.contains("Unknown type \"Banana\""));

        let errors = plan(
            &schema,
            "query Q($post: Post) { posts { id } }",
            Variables::default(),
        )
        .unwrap_err();
        assert!(errors[0].message.contains("non-input type \"Post\""));

        let errors = plan(
            &schema,
            "query Q($ids: [Int]) { posts { id } }",
            Variables::default(),
        )
        .unwrap_err();
        assert!(errors[0].message.contains("list type \"[Int]\""));
    }

    #[test]
    fn test_variable_used_in_wrong_position() {
        let schema = schema();
        let variables = Variables::from_json(serde_json::json!({ "id": "1" }));

        let errors = plan(
            &schema,
            "query Q($id: String) { post(id: $id) { id } }",
            variables,
        )
        .unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].path, vec![PathSegment::from("post")]);
        assert!(errors[0]
            .message
            .contains("of type \"String\" used in position expecting type \"Int\""));

        let errors = plan(
            &schema,
            "query Q($flag: Int) { posts { id @skip(if: $flag) } }",
            Variables::default(),
        )
        .unwrap_err();
        assert!(errors[0].message.contains("expecting type \"Boolean\""));
    }

    #[test]
    fn test_variable_values_match_declared_type() {
        let schema = schema();

        let errors = plan(
            &schema,
            "query Q($id: String = 1) { post(id: $id) { id } }",
            Variables::default(),
        )
        .unwrap_err();
        assert!(errors
            .iter()
            .any(|e| e.message.contains("Variable \"$id\" got invalid value 1")));

        let variables = Variables::from_json(serde_json::json!({ "id": true }));
        let errors = plan(
            &schema,
            "query Q($id: Int) { post(id: $id) { id } }",
            variables,
        )
        .unwrap_err();
        assert!(errors[0].message.contains("got invalid value true"));

        let errors = plan(
            &schema,
            "query Q($id: Int!) { post(id: $id) { id } }",
            Variables::default(),
        )
        .unwrap_err();
        assert!(errors[0].message.contains("non-null type \"Int!\" must not be null"));

        let variables = Variables::from_json(serde_json::json!({ "id": 2 }));
        assert!(plan(
            &schema,
            "query Q($id: Int!) { post(id: $id) { id } }",
            variables,
        )
        .is_ok());
    }

    #[test]
    fn test_directives_outside_selections() {
        let schema = schema();

        let errors = plan(&schema, "query @foo { posts { id } }", Variables::default()).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].message.contains("Unknown directive \"@foo\""));

        let errors = plan(
            &schema,
            "query { posts { ...Parts } } fragment Parts on Post @skip(if: true) { id }",
            Variables::default(),
        )
        .unwrap_err();
        assert!(errors[0]
            .message
            .contains("\"@skip\" may not be used on FRAGMENT_DEFINITION"));
    }

    #[test]
    fn test_max_depth() {
        let schema = schema();
        let document = parse_query(
            "{ posts { author { posts { author { posts { id } } } } } }",
        )
        .unwrap();
        let DocumentOperations::Single(operation) = &document.operations else {
            panic!("expected a single operation");
        };

        let limits = |max_depth| ExecutorConfig {
            max_depth,
            ..ExecutorConfig::default()
        };

        let errors = plan_operation(&schema, &document, &operation.node, &Variables::default(), &limits(3))
            .unwrap_err();
        assert!(errors[0].message.contains("maximum depth of 3"));
        assert!(plan_operation(&schema, &document, &operation.node, &Variables::default(), &limits(6)).is_ok());
    }

    #[test]
    fn test_repeated_fragment_spreads_are_bounded() {
        let schema = schema();
        let mut query = String::from("{ posts { ...F0 } }\n");
        for level in 0..30 {
            query.push_str(&format!(
                "fragment F{} on Post {{ ...F{} ...F{} }}\n",
                level,
                level + 1,
                level + 1
            ));
        }
        query.push_str("fragment F30 on Post { id }\n");

        let errors = plan(&schema, &query, Variables::default()).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].message.contains("maximum of 10000 selections"));
    }

    #[test]
    fn test_selection_limit() {
        let schema = schema();
        let document = parse_query("{ posts { id title content } }").unwrap();
        let DocumentOperations::Single(operation) = &document.operations else {
            panic!("expected a single operation");
        };
        let limits = |max_selections| ExecutorConfig {
            max_selections,
            ..ExecutorConfig::default()
        };

        let errors = plan_operation(&schema, &document, &operation.node, &Variables::default(), &limits(3))
            .unwrap_err();
        assert_eq!(errors[0].path, vec![PathSegment::from("posts")]);
        assert!(plan_operation(&schema, &document, &operation.node, &Variables::default(), &limits(4)).is_ok());
    }

    #[test]
    fn test_coerce() {
        assert_eq!(
            coerce(&Value::Number(7.into()), ScalarType::Int),
            Ok(ArgumentValue::Int(7))
        );
        assert_eq!(
            coerce(&Value::Number(7.into()), ScalarType::Float),
            Ok(ArgumentValue::Float(7.0))
        );
        assert_eq!(
            coerce(&Value::Number(7.into()), ScalarType::Id),
            Ok(ArgumentValue::Id("7".to_string()))
        );
        assert_eq!(coerce(&Value::Null, ScalarType::Boolean), Ok(ArgumentValue::Null));
        assert!(coerce(&Value::Boolean(true), ScalarType::String).is_err());
    }
}
