//! Recursive field collection for config models.
//!
//! Walks a model declaration's properties in source order and classifies each
//! one as a plain value, a nested section, or something to report and skip.
//! Collection is pure: diagnostics are returned alongside the fields rather
//! than logged here.

use crate::diagnostic::{Diagnostic, DiagnosticKind};
use crate::model::{ConfigField, NestField, NestedClass, NestedClassSet, ValueField};
use crate::symbols::{Annotated, DeclarationId, Markers, PropertyId, PropertyInfo, SymbolSource};
use crate::types::{TypeNameSimplifier, TypeRef};

/// Output of collecting one declaration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Collected {
    /// Members of the declaration, in declared order.
    pub fields: Vec<ConfigField>,
    /// Inner classes needed by the members, children before parents.
    pub nested: NestedClassSet,
    /// Problems found on the way.
    pub diagnostics: Vec<Diagnostic>,
}

/// Collects [`ConfigField`]s from declarations of a [`SymbolSource`].
#[derive(Debug)]
pub struct FieldCollector<'a, S: ?Sized> {
    source: &'a S,
    markers: &'a Markers,
    simplifier: TypeNameSimplifier<'a>,
}

impl<'a, S> FieldCollector<'a, S>
where
    S: SymbolSource + ?Sized,
{
    /// Creates a collector rendering value types with `simplifier`.
    #[must_use]
    pub const fn new(
        source: &'a S,
        markers: &'a Markers,
        simplifier: TypeNameSimplifier<'a>,
    ) -> Self {
        Self {
            source,
            markers,
            simplifier,
        }
    }

    /// Collects the members of `declaration`.
    ///
    /// `default_subscribe` enables subscription hooks on every value field
    /// reached from here, including those of nested sections.
    #[must_use]
    pub fn collect(&self, declaration: DeclarationId, default_subscribe: bool) -> Collected {
        let mut trail = vec![declaration];
        self.collect_declaration(declaration, default_subscribe, &mut trail)
    }

    fn collect_declaration(
        &self,
        declaration: DeclarationId,
        inherited: bool,
        trail: &mut Vec<DeclarationId>,
    ) -> Collected {
        let mut collected = Collected::default();
        let owner = self.owner_name(declaration);
        for property in self.source.list_properties(declaration) {
            let Some(info) = self.source.property(property) else {
                continue;
            };
            let symbol = format!("{owner}.{}", info.name);
            if !info.has_backing_field {
                collected.diagnostics.push(Diagnostic::new(
                    DiagnosticKind::MissingStorageSlot,
                    symbol,
                    "property has no backing field; no option generated",
                ));
                continue;
            }
            let ty = self.source.resolve_type(property);
            if ty.is_type_variable() {
                collected.diagnostics.push(Diagnostic::new(
                    DiagnosticKind::InvalidFieldShape,
                    symbol,
                    format!("generic field type `{ty}` is not allowed in config classes"),
                ));
                continue;
            }
            let subscribe = inherited || self.has_marker(property, &self.markers.hook);
            if self.has_marker(property, &self.markers.nest) {
                match nest_target(self.source, &ty) {
                    Some(target) if trail.contains(&target) => {
                        collected.diagnostics.push(Diagnostic::new(
                            DiagnosticKind::IllegalSelfReference,
                            symbol,
                            format!("illegal self-reference to `{ty}` in nested config object"),
                        ));
                        continue;
                    }
                    Some(target) => {
                        self.collect_nest(&mut collected, info, target, subscribe, trail);
                        continue;
                    }
                    None => collected.diagnostics.push(Diagnostic::new(
                        DiagnosticKind::NestOnValueType,
                        symbol,
                        format!("`{ty}` is not a config class; treating it as a value"),
                    )),
                }
            }
            collected.fields.push(ConfigField::Value(ValueField {
                name: info.name.clone(),
                key: info.name.clone(),
                type_name: self.simplifier.simplify(&ty),
                mutable: info.mutable,
                subscribe,
            }));
        }
        collected
    }

    fn collect_nest(
        &self,
        collected: &mut Collected,
        info: &PropertyInfo,
        target: DeclarationId,
        subscribe: bool,
        trail: &mut Vec<DeclarationId>,
    ) {
        let class_name = self
            .source
            .declaration(target)
            .map_or_else(String::new, |decl| decl.name.simple_name().to_owned());
        trail.push(target);
        let child = self.collect_declaration(target, subscribe, trail);
        trail.pop();

        // A section reached through several fields reports its problems once.
        for diagnostic in child.diagnostics {
            if !collected.diagnostics.contains(&diagnostic) {
                collected.diagnostics.push(diagnostic);
            }
        }
        collected.nested.merge(child.nested);
        collected.nested.insert(NestedClass {
            name: class_name.clone(),
            fields: child.fields,
        });
        collected.fields.push(ConfigField::Nest(NestField {
            name: info.name.clone(),
            key: info.name.clone(),
            class_name,
        }));
    }

    fn has_marker(&self, property: PropertyId, marker: &str) -> bool {
        self.source
            .has_annotation(Annotated::Property(property), marker)
    }

    fn owner_name(&self, declaration: DeclarationId) -> String {
        self.source.declaration(declaration).map_or_else(
            || format!("<declaration {}>", declaration.index()),
            |info| info.name.canonical_name(),
        )
    }
}

/// Class-like declaration of the universe that `ty` names, if any.
pub(crate) fn nest_target<S>(source: &S, ty: &TypeRef) -> Option<DeclarationId>
where
    S: SymbolSource + ?Sized,
{
    let id = source.resolve_declaration(ty.class_name()?)?;
    let info = source.declaration(id)?;
    info.kind.is_class_like().then_some(id)
}
