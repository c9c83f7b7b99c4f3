//! Kotlin type references.
//!
//! [`TypeRef`] is the typed AST every property type resolves to. The
//! [`simplify`] module renders it back to source text relative to the wrapper's
//! package; the [`parse`] module reads the textual form found in symbol dumps.

pub mod parse;
pub mod simplify;

use std::fmt;

use serde::{Deserialize, Serialize};

pub use parse::{TypeParseError, parse_type_ref};
pub use simplify::TypeNameSimplifier;

/// A class reference split into its package and (possibly nested) simple names.
///
/// `kotlin.collections.Map.Entry` has the package `kotlin.collections` and the
/// simple names `["Map", "Entry"]`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ClassName {
    package: String,
    simple_names: Vec<String>,
}

impl ClassName {
    /// Builds a class name from an explicit package and simple name chain.
    pub fn new<P, I, S>(package: P, simple_names: I) -> Self
    where
        P: Into<String>,
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            package: package.into(),
            simple_names: simple_names.into_iter().map(Into::into).collect(),
        }
    }

    /// Parses a class name, accepting the explicit `package/Outer.Inner` form.
    ///
    /// # Errors
    ///
    /// Returns [`TypeParseError`] when `text` is not a dotted identifier chain.
    pub fn parse(text: &str) -> Result<Self, TypeParseError> {
        parse::parse_class_name(text)
    }

    /// Package the class lives in; empty for the root package.
    #[must_use]
    pub fn package(&self) -> &str {
        &self.package
    }

    /// Simple names from the outermost class inwards.
    #[must_use]
    pub fn simple_names(&self) -> &[String] {
        &self.simple_names
    }

    /// Innermost simple name.
    #[must_use]
    pub fn simple_name(&self) -> &str {
        self.simple_names.last().map_or("", String::as_str)
    }

    /// Simple names joined with `.`, as written inside the declaring package.
    #[must_use]
    pub fn nested_name(&self) -> String {
        self.simple_names.join(".")
    }

    /// Fully qualified name as written in source.
    #[must_use]
    pub fn canonical_name(&self) -> String {
        if self.package.is_empty() {
            self.nested_name()
        } else {
            format!("{}.{}", self.package, self.nested_name())
        }
    }
}

impl fmt::Display for ClassName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.canonical_name())
    }
}

impl TryFrom<String> for ClassName {
    type Error = TypeParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<ClassName> for String {
    fn from(value: ClassName) -> Self {
        if value.package.is_empty() {
            value.nested_name()
        } else {
            format!("{}/{}", value.package, value.nested_name())
        }
    }
}

/// Use-site variance of a projected type argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Variance {
    /// `in T`
    In,
    /// `out T`
    Out,
}

impl Variance {
    /// Keyword used in source.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::In => "in",
            Self::Out => "out",
        }
    }
}

/// A resolved property type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeRef {
    /// A plain class reference such as `kotlin.Int`.
    Named(ClassName),
    /// A class applied to type arguments, such as `List<String>`.
    Parameterized {
        /// The generic class.
        raw: ClassName,
        /// Arguments in declaration order.
        args: Vec<TypeRef>,
    },
    /// A nullable type, `T?`.
    Nullable(Box<TypeRef>),
    /// A reference to a type parameter of the enclosing declaration.
    TypeVariable(String),
    /// The star projection `*`.
    Star,
    /// A variance-projected argument such as `out Number`.
    Projection {
        /// Projection keyword.
        variance: Variance,
        /// Projected type.
        ty: Box<TypeRef>,
    },
    /// A function type such as `(Int) -> Unit`.
    Function {
        /// Parameter types.
        params: Vec<TypeRef>,
        /// Return type.
        ret: Box<TypeRef>,
    },
    /// A type the frontend could not resolve yet, kept as written.
    Error(String),
    /// A resolved type outside the parsed grammar, such as a receiver or
    /// `suspend` function type, kept as written.
    Other(String),
}

impl TypeRef {
    /// Returns the class this type ultimately names, looking through
    /// nullability and type arguments.
    #[must_use]
    pub fn class_name(&self) -> Option<&ClassName> {
        match self {
            Self::Named(name) | Self::Parameterized { raw: name, .. } => Some(name),
            Self::Nullable(inner) => inner.class_name(),
            _ => None,
        }
    }

    /// Whether this type is, or is a nullable, type parameter.
    #[must_use]
    pub fn is_type_variable(&self) -> bool {
        match self {
            Self::TypeVariable(_) => true,
            Self::Nullable(inner) => inner.is_type_variable(),
            _ => false,
        }
    }

    /// Whether an unresolved type appears anywhere in this reference.
    #[must_use]
    pub fn contains_error(&self) -> bool {
        match self {
            Self::Error(_) => true,
            Self::Named(_) | Self::TypeVariable(_) | Self::Star | Self::Other(_) => false,
            Self::Parameterized { args, .. } => args.iter().any(Self::contains_error),
            Self::Nullable(inner) | Self::Projection { ty: inner, .. } => inner.contains_error(),
            Self::Function { params, ret } => {
                params.iter().any(Self::contains_error) || ret.contains_error()
            }
        }
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Named(name) => write!(f, "{name}"),
            Self::Parameterized { raw, args } => {
                write!(f, "{raw}<")?;
                write_joined(f, args)?;
                f.write_str(">")
            }
            Self::Nullable(inner) => match inner.as_ref() {
                Self::Function { .. } => write!(f, "({inner})?"),
                _ => write!(f, "{inner}?"),
            },
            Self::TypeVariable(name) => f.write_str(name),
            Self::Star => f.write_str("*"),
            Self::Projection { variance, ty } => write!(f, "{} {ty}", variance.as_str()),
            Self::Function { params, ret } => {
                f.write_str("(")?;
                write_joined(f, params)?;
                write!(f, ") -> {ret}")
            }
            Self::Error(text) | Self::Other(text) => f.write_str(text),
        }
    }
}

fn write_joined(f: &mut fmt::Formatter<'_>, types: &[TypeRef]) -> fmt::Result {
    for (index, ty) in types.iter().enumerate() {
        if index > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{ty}")?;
    }
    Ok(())
}
