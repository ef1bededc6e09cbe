//! Memoized construction of named schema types.
//!
//! A [`TypeRegistry`] owns one [`TypeNode`] per type name for the lifetime of
//! a single schema build. Fields refer to other types through [`FieldType`],
//! which holds a weak handle to the registered node, so self-referential
//! graphs (an `Account` whose `owner` is an `Account`) do not leak.
//!
//! Object and interface field sets may be deferred: the thunk runs only when
//! the fields are first needed, by which time the owning type is already
//! registered and can be looked up by name from inside its own fields.
//!
//! ```rust
//! use solana_rpc_graphql::graphql::registry::{FieldSet, TypeNode, TypeRegistry};
//!
//! let registry = TypeRegistry::new();
//! let first = registry
//!     .get_or_create("Node", |_| Ok(TypeNode::interface("Node", FieldSet::ready(vec![]))))
//!     .unwrap();
//! let second = registry
//!     .get_or_create("Node", |_| unreachable!("memoized"))
//!     .unwrap();
//! assert!(std::rc::Rc::ptr_eq(&first, &second));
//! ```

use std::cell::{OnceCell, RefCell};
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::rc::{Rc, Weak};

use async_graphql::dynamic::TypeRef;

use super::resolvers::Resolver;
use crate::error::SchemaBuildError;

/// Input validator for a custom scalar.
pub type ScalarValidator = fn(&async_graphql::Value) -> bool;

/// Deferred field-set constructor.
pub type FieldThunk = Box<dyn FnOnce(&TypeRegistry) -> Result<Vec<FieldDef>, SchemaBuildError>>;

// ============================================================================
// FieldType
// ============================================================================

/// A reference to a registered type by handle.
#[derive(Clone, Debug)]
pub struct NamedType {
    name: String,
    node: Weak<TypeNode>,
}

impl NamedType {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The referenced node, while its registry is alive.
    pub fn node(&self) -> Option<Rc<TypeNode>> {
        self.node.upgrade()
    }
}

/// The declared type of a field or argument.
#[derive(Clone, Debug)]
pub enum FieldType {
    Named(NamedType),
    NonNull(Box<FieldType>),
    List(Box<FieldType>),
}

impl FieldType {
    /// A nullable reference to `node`.
    pub fn named(node: &Rc<TypeNode>) -> Self {
        FieldType::Named(NamedType {
            name: node.name.clone(),
            node: Rc::downgrade(node),
        })
    }

    pub fn non_null(self) -> Self {
        FieldType::NonNull(Box::new(self))
    }

    pub fn list(self) -> Self {
        FieldType::List(Box::new(self))
    }

    /// The innermost named type, with list and non-null wrappers removed.
    pub fn named_type(&self) -> &NamedType {
        match self {
            FieldType::Named(named) => named,
            FieldType::NonNull(inner) | FieldType::List(inner) => inner.named_type(),
        }
    }

    pub(crate) fn to_type_ref(&self) -> TypeRef {
        match self {
            FieldType::Named(named) => TypeRef::Named(named.name.clone().into()),
            FieldType::NonNull(inner) => TypeRef::NonNull(Box::new(inner.to_type_ref())),
            FieldType::List(inner) => TypeRef::List(Box::new(inner.to_type_ref())),
        }
    }
}

// ============================================================================
// FieldDef / InputValueDef
// ============================================================================

/// An argument or input-object field.
#[derive(Clone, Debug)]
pub struct InputValueDef {
    pub name: String,
    pub ty: FieldType,
}

impl InputValueDef {
    pub fn new(name: impl Into<String>, ty: FieldType) -> Self {
        Self {
            name: name.into(),
            ty,
        }
    }
}

/// A field on an object or interface.
#[derive(Clone)]
pub struct FieldDef {
    pub name: String,
    pub description: Option<String>,
    pub ty: FieldType,
    pub args: Vec<InputValueDef>,
    pub resolver: Option<Resolver>,
}

impl FieldDef {
    pub fn new(name: impl Into<String>, ty: FieldType) -> Self {
        Self {
            name: name.into(),
            description: None,
            ty,
            args: Vec::new(),
            resolver: None,
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn arguments(mut self, args: impl IntoIterator<Item = InputValueDef>) -> Self {
        self.args.extend(args);
        self
    }

    pub fn resolver(mut self, resolver: Resolver) -> Self {
        self.resolver = Some(resolver);
        self
    }
}

impl fmt::Debug for FieldDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldDef")
            .field("name", &self.name)
            .field("ty", &self.ty)
            .field("args", &self.args)
            .field("resolver", &self.resolver.is_some())
            .finish()
    }
}

// ============================================================================
// FieldSet
// ============================================================================

/// Fields of an object or interface, possibly not yet evaluated.
pub struct FieldSet {
    thunk: RefCell<Option<FieldThunk>>,
    fields: OnceCell<Vec<FieldDef>>,
}

impl FieldSet {
    /// Fields known up front.
    pub fn ready(fields: Vec<FieldDef>) -> Self {
        Self {
            thunk: RefCell::new(None),
            fields: OnceCell::from(fields),
        }
    }

    /// Fields computed on first use.
    pub fn deferred<F>(thunk: F) -> Self
    where
        F: FnOnce(&TypeRegistry) -> Result<Vec<FieldDef>, SchemaBuildError> + 'static,
    {
        Self {
            thunk: RefCell::new(Some(Box::new(thunk))),
            fields: OnceCell::new(),
        }
    }

    pub fn is_evaluated(&self) -> bool {
        self.fields.get().is_some()
    }

    fn force(&self, owner: &str, registry: &TypeRegistry) -> Result<&[FieldDef], SchemaBuildError> {
        if let Some(fields) = self.fields.get() {
            return Ok(fields);
        }
        // A missing thunk here means the thunk is running further up the stack.
        let thunk = self
            .thunk
            .borrow_mut()
            .take()
            .ok_or_else(|| SchemaBuildError::CyclicConstruction(owner.to_string()))?;
        let fields = thunk(registry)?;
        Ok(self.fields.get_or_init(|| fields))
    }
}

// ============================================================================
// TypeNode
// ============================================================================

/// What kind of type a [`TypeNode`] describes.
pub enum TypeKind {
    Scalar {
        /// Built into the query engine; not registered with it.
        builtin: bool,
        validator: Option<ScalarValidator>,
    },
    Enum {
        values: Vec<String>,
    },
    InputObject {
        fields: Vec<InputValueDef>,
    },
    Object {
        interfaces: Vec<String>,
        fields: FieldSet,
    },
    Interface {
        fields: FieldSet,
    },
}

/// A named, immutable schema type.
pub struct TypeNode {
    name: String,
    description: Option<String>,
    kind: TypeKind,
}

impl TypeNode {
    fn new(name: impl Into<String>, kind: TypeKind) -> Self {
        Self {
            name: name.into(),
            description: None,
            kind,
        }
    }

    pub(crate) fn builtin_scalar(name: &str) -> Self {
        Self::new(
            name,
            TypeKind::Scalar {
                builtin: true,
                validator: None,
            },
        )
    }

    pub fn scalar(name: impl Into<String>, validator: Option<ScalarValidator>) -> Self {
        Self::new(
            name,
            TypeKind::Scalar {
                builtin: false,
                validator,
            },
        )
    }

    pub fn enumeration<I, S>(name: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(
            name,
            TypeKind::Enum {
                values: values.into_iter().map(Into::into).collect(),
            },
        )
    }

    pub fn input_object(name: impl Into<String>, fields: Vec<InputValueDef>) -> Self {
        Self::new(name, TypeKind::InputObject { fields })
    }

    pub fn object(name: impl Into<String>, fields: FieldSet) -> Self {
        Self::new(
            name,
            TypeKind::Object {
                interfaces: Vec::new(),
                fields,
            },
        )
    }

    pub fn interface(name: impl Into<String>, fields: FieldSet) -> Self {
        Self::new(name, TypeKind::Interface { fields })
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Declare that this object implements `interface`. No-op for other kinds.
    pub fn implements(mut self, interface: &TypeNode) -> Self {
        if let TypeKind::Object { interfaces, .. } = &mut self.kind {
            interfaces.push(interface.name.clone());
        }
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn kind(&self) -> &TypeKind {
        &self.kind
    }

    pub fn interfaces(&self) -> &[String] {
        match &self.kind {
            TypeKind::Object { interfaces, .. } => interfaces,
            _ => &[],
        }
    }

    /// Output fields, evaluating a deferred field set on first call.
    ///
    /// Non-composite types have no fields.
    pub fn fields(&self, registry: &TypeRegistry) -> Result<&[FieldDef], SchemaBuildError> {
        match &self.kind {
            TypeKind::Object { fields, .. } | TypeKind::Interface { fields } => {
                fields.force(&self.name, registry)
            }
            _ => Ok(&[]),
        }
    }

    /// Look up one output field by name.
    pub fn field(
        &self,
        registry: &TypeRegistry,
        name: &str,
    ) -> Result<Option<&FieldDef>, SchemaBuildError> {
        Ok(self.fields(registry)?.iter().find(|f| f.name == name))
    }
}

impl fmt::Debug for TypeNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match &self.kind {
            TypeKind::Scalar { .. } => "scalar",
            TypeKind::Enum { .. } => "enum",
            TypeKind::InputObject { .. } => "input",
            TypeKind::Object { .. } => "type",
            TypeKind::Interface { .. } => "interface",
        };
        write!(f, "TypeNode({} {})", kind, self.name)
    }
}

// ============================================================================
// TypeRegistry
// ============================================================================

/// Names of the scalars the query engine provides.
pub const BUILTIN_SCALARS: [&str; 4] = ["String", "Int", "Float", "Boolean"];

/// One canonical [`TypeNode`] per name for the life of a schema build.
///
/// The registry is built on one thread and is not shared.
pub struct TypeRegistry {
    types: RefCell<Vec<Rc<TypeNode>>>,
    index: RefCell<HashMap<String, usize>>,
    in_progress: RefCell<HashSet<String>>,
}

impl TypeRegistry {
    /// A registry holding only the built-in scalars.
    pub fn new() -> Self {
        let registry = Self {
            types: RefCell::new(Vec::new()),
            index: RefCell::new(HashMap::new()),
            in_progress: RefCell::new(HashSet::new()),
        };
        for name in BUILTIN_SCALARS {
            registry.insert(TypeNode::builtin_scalar(name));
        }
        registry
    }

    /// The node registered under `name`, if any.
    pub fn get(&self, name: &str) -> Option<Rc<TypeNode>> {
        let index = self.index.borrow().get(name).copied()?;
        self.types.borrow().get(index).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.borrow().contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.types.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.borrow().is_empty()
    }

    /// Registered nodes in registration order.
    pub fn nodes(&self) -> Vec<Rc<TypeNode>> {
        self.types.borrow().clone()
    }

    /// Return the node for `name`, running `builder` only the first time.
    ///
    /// The builder receives the registry so it can reference other types. A
    /// builder that (directly or indirectly) asks for its own name before
    /// returning is a construction cycle; defer the offending fields with
    /// [`FieldSet::deferred`] instead.
    pub fn get_or_create<F>(&self, name: &str, builder: F) -> Result<Rc<TypeNode>, SchemaBuildError>
    where
        F: FnOnce(&TypeRegistry) -> Result<TypeNode, SchemaBuildError>,
    {
        if let Some(node) = self.get(name) {
            return Ok(node);
        }
        if !self.in_progress.borrow_mut().insert(name.to_string()) {
            return Err(SchemaBuildError::CyclicConstruction(name.to_string()));
        }
        let built = builder(self);
        self.in_progress.borrow_mut().remove(name);

        let node = built?;
        if node.name != name {
            return Err(SchemaBuildError::NameMismatch {
                requested: name.to_string(),
                produced: node.name,
            });
        }
        self.define(node)
    }

    /// Register a node that must not already exist.
    pub fn define(&self, node: TypeNode) -> Result<Rc<TypeNode>, SchemaBuildError> {
        if self.contains(&node.name) {
            return Err(SchemaBuildError::DuplicateType(node.name));
        }
        Ok(self.insert(node))
    }

    fn insert(&self, node: TypeNode) -> Rc<TypeNode> {
        let node = Rc::new(node);
        let mut types = self.types.borrow_mut();
        self.index
            .borrow_mut()
            .insert(node.name.clone(), types.len());
        types.push(node.clone());
        node
    }

    /// Evaluate every deferred field set, including those of types first
    /// registered while evaluating others, and check that every field and
    /// argument refers to a node registered here.
    pub fn force_all(&self) -> Result<Vec<Rc<TypeNode>>, SchemaBuildError> {
        let mut checked = 0;
        loop {
            let nodes = self.nodes();
            if checked == nodes.len() {
                return Ok(nodes);
            }
            for node in &nodes[checked..] {
                for field in node.fields(self)? {
                    self.check_reference(node, &field.name, &field.ty)?;
                    for arg in &field.args {
                        self.check_reference(node, &field.name, &arg.ty)?;
                    }
                }
                if let TypeKind::InputObject { fields } = node.kind() {
                    for field in fields {
                        self.check_reference(node, &field.name, &field.ty)?;
                    }
                }
            }
            checked = nodes.len();
        }
    }

    fn check_reference(
        &self,
        owner: &TypeNode,
        field: &str,
        ty: &FieldType,
    ) -> Result<(), SchemaBuildError> {
        let named = ty.named_type();
        let registered = match (self.get(named.name()), named.node()) {
            (Some(registered), Some(target)) => Rc::ptr_eq(&registered, &target),
            _ => false,
        };
        if registered {
            Ok(())
        } else {
            Err(SchemaBuildError::UnknownType {
                owner: owner.name.clone(),
                field: field.to_string(),
                name: named.name().to_string(),
            })
        }
    }
}

impl Default for TypeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for TypeRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.types.borrow().iter()).finish()
    }
}
