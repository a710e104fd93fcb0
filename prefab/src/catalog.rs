//! Type layouts: the field enumerator the fallback factory consults.
//!
//! A [`ClassLayout`] declares what a type looks like in storage (its fields,
//! superclass and type parameters). Layouts are keyed by identity string, like
//! the factory registry, so they can be registered before anything resolves
//! them.

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::rc::Rc;

use crate::descriptor::{IntoDescriptor, TypeDescriptor};
use crate::error::{PrefabError, Result};
use crate::value::{Instance, Object, Value};

/// Ordinary construction path for a type, taking field values in declaration order
pub type Constructor = Rc<dyn Fn(&[Value]) -> Value>;

/// What kind of storage a type has
#[derive(Debug, Clone)]
pub enum ClassKind {
    Class,
    /// Cannot be constructed normally, but still has fields that can be allocated
    Abstract,
    /// No storage layout at all
    Interface,
    /// A closed set of interned constants
    Enum(Vec<Instance>),
}

/// A declared field
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDecl {
    pub name: String,
    pub ty: TypeDescriptor,
    /// Static fields belong to the type, not to instances, and are never assigned
    pub is_static: bool,
}

/// The storage layout of one type
#[derive(Clone)]
pub struct ClassLayout {
    identity: String,
    type_parameters: Vec<String>,
    superclass: Option<TypeDescriptor>,
    fields: Vec<FieldDecl>,
    kind: ClassKind,
    constructor: Option<Constructor>,
    error: Option<PrefabError>,
}

impl ClassLayout {
    fn with_kind(identity: impl Into<String>, kind: ClassKind) -> Self {
        let identity = trimmed(identity.into());
        let error = identity
            .is_empty()
            .then(|| PrefabError::invalid_argument("layout identity must not be empty"));
        Self {
            identity,
            type_parameters: Vec::new(),
            superclass: None,
            fields: Vec::new(),
            kind,
            constructor: None,
            error,
        }
    }

    pub fn class(identity: impl Into<String>) -> Self {
        Self::with_kind(identity, ClassKind::Class)
    }

    pub fn abstract_class(identity: impl Into<String>) -> Self {
        Self::with_kind(identity, ClassKind::Abstract)
    }

    pub fn interface(identity: impl Into<String>) -> Self {
        Self::with_kind(identity, ClassKind::Interface)
    }

    /// An enumeration whose constants are interned once, here
    pub fn enumeration<I, S>(identity: impl Into<String>, constants: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let identity = trimmed(identity.into());
        let constants = constants
            .into_iter()
            .map(|name| {
                Instance::new(Object::EnumConstant {
                    enumeration: identity.clone(),
                    name: name.into(),
                })
            })
            .collect();
        Self::with_kind(identity, ClassKind::Enum(constants))
    }

    /// Declare type parameters, in declaration order
    pub fn type_parameters<I, S>(mut self, parameters: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.type_parameters = parameters.into_iter().map(Into::into).collect();
        self
    }

    /// Declare the superclass; its type arguments may name this layout's parameters
    pub fn extends(mut self, superclass: impl IntoDescriptor) -> Self {
        match superclass.into_descriptor() {
            Ok(descriptor) => self.superclass = Some(descriptor),
            Err(err) => self.record_error(err),
        }
        self
    }

    pub fn field(self, name: impl Into<String>, ty: impl IntoDescriptor) -> Self {
        self.declare(name.into(), ty, false)
    }

    pub fn static_field(self, name: impl Into<String>, ty: impl IntoDescriptor) -> Self {
        self.declare(name.into(), ty, true)
    }

    /// Attach the ordinary constructor. Synthesis never calls it.
    pub fn constructor(mut self, constructor: impl Fn(&[Value]) -> Value + 'static) -> Self {
        self.constructor = Some(Rc::new(constructor));
        self
    }

    fn declare(mut self, name: String, ty: impl IntoDescriptor, is_static: bool) -> Self {
        if name.trim().is_empty() {
            self.record_error(PrefabError::invalid_argument(format!(
                "field of {} has an empty name",
                self.identity
            )));
            return self;
        }
        if self.fields.iter().any(|field| field.name == name) {
            self.record_error(PrefabError::invalid_argument(format!(
                "{} declares field {} twice",
                self.identity, name
            )));
            return self;
        }
        match ty.into_descriptor() {
            Ok(ty) => self.fields.push(FieldDecl {
                name,
                ty,
                is_static,
            }),
            Err(err) => self.record_error(err),
        }
        self
    }

    // First error wins; it is surfaced when the layout is registered.
    fn record_error(&mut self, err: PrefabError) {
        if self.error.is_none() {
            self.error = Some(err);
        }
    }

    pub fn identity(&self) -> &str {
        &self.identity
    }

    pub fn kind(&self) -> &ClassKind {
        &self.kind
    }

    pub fn declared_fields(&self) -> &[FieldDecl] {
        &self.fields
    }

    pub fn superclass(&self) -> Option<&TypeDescriptor> {
        self.superclass.as_ref()
    }

    pub fn parameters(&self) -> &[String] {
        &self.type_parameters
    }

    /// Interned enum constants, empty for other kinds
    pub fn constants(&self) -> &[Instance] {
        match &self.kind {
            ClassKind::Enum(constants) => constants,
            _ => &[],
        }
    }

    /// Whether instances have storage that can be allocated
    pub fn has_storage(&self) -> bool {
        !matches!(self.kind, ClassKind::Interface)
    }
}

impl fmt::Debug for ClassLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClassLayout")
            .field("identity", &self.identity)
            .field("type_parameters", &self.type_parameters)
            .field("superclass", &self.superclass)
            .field("fields", &self.fields)
            .field("kind", &self.kind)
            .field("has_constructor", &self.constructor.is_some())
            .finish()
    }
}

/// Types whose layout is known statically, typically through `#[derive(Layout)]`
pub trait Described {
    fn layout() -> ClassLayout;
}

/// Source of type layouts
pub trait TypeCatalog {
    fn layout(&self, identity: &str) -> Option<&ClassLayout>;

    /// All instance fields of `descriptor`, inherited fields first, with the
    /// descriptor's type arguments substituted into the field types.
    fn fields(&self, descriptor: &TypeDescriptor) -> Result<Vec<FieldDecl>> {
        let mut chain: Vec<(TypeDescriptor, &ClassLayout)> = Vec::new();
        let mut visited = HashSet::new();
        let mut current = Some(descriptor.clone());

        while let Some(next) = current.take() {
            if !visited.insert(next.identity().to_string()) {
                return Err(PrefabError::invalid_argument(format!(
                    "superclass chain of {} loops back to {}",
                    descriptor,
                    next.identity()
                )));
            }
            let layout = self.layout(next.identity()).ok_or_else(|| {
                PrefabError::cannot_synthesize(
                    next.to_string(),
                    "no layout is registered for this type",
                )
            })?;
            current = layout
                .superclass()
                .map(|parent| parent.substitute(layout.parameters(), next.arguments()));
            chain.push((next, layout));
        }

        let mut fields = Vec::new();
        for (owner, layout) in chain.iter().rev() {
            for field in layout.declared_fields().iter().filter(|f| !f.is_static) {
                fields.push(FieldDecl {
                    name: field.name.clone(),
                    ty: field.ty.substitute(layout.parameters(), owner.arguments()),
                    is_static: false,
                });
            }
        }
        Ok(fields)
    }
}

/// In-memory catalog of layouts
#[derive(Debug, Clone, Default)]
pub struct ClassCatalog {
    layouts: HashMap<String, ClassLayout>,
}

impl ClassCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a layout, surfacing any error recorded while it was built.
    /// Registering the same identity again replaces the earlier layout.
    pub fn register(&mut self, layout: ClassLayout) -> Result<()> {
        if let Some(err) = layout.error.clone() {
            return Err(err);
        }
        self.layouts.insert(layout.identity.clone(), layout);
        Ok(())
    }

    pub fn register_described<T: Described>(&mut self) -> Result<()> {
        self.register(T::layout())
    }

    pub fn contains(&self, identity: &str) -> bool {
        self.layouts.contains_key(identity.trim())
    }

    pub fn len(&self) -> usize {
        self.layouts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layouts.is_empty()
    }

    /// Build an instance through the type's ordinary constructor
    pub fn construct(&self, identity: &str, arguments: &[Value]) -> Result<Value> {
        let layout = self.layouts.get(identity.trim()).ok_or_else(|| {
            PrefabError::invalid_argument(format!("no layout is registered for {}", identity))
        })?;
        let constructor = layout.constructor.as_ref().ok_or_else(|| {
            PrefabError::invalid_argument(format!("{} has no accessible constructor", identity))
        })?;
        Ok(constructor(arguments))
    }
}

impl TypeCatalog for ClassCatalog {
    fn layout(&self, identity: &str) -> Option<&ClassLayout> {
        self.layouts.get(identity.trim())
    }
}

fn trimmed(identity: String) -> String {
    if identity.trim().len() == identity.len() {
        identity
    } else {
        identity.trim().to_string()
    }
}
