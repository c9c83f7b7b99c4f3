//! `nom` grammar for textual Kotlin type references.
//!
//! Accepted forms:
//!
//! - qualified names, either `kotlin.collections.List` (leading lower-case
//!   segments form the package) or the explicit `kotlin.collections/List`;
//! - type arguments `Map<String, List<Int>>`, `*` and `in`/`out` projections;
//! - nullable types `String?` and function types `(Int, String) -> Unit`.
//!
//! ```
//! use kowo_config::types::{TypeRef, parse_type_ref};
//!
//! let ty = parse_type_ref("kotlin.collections.List<kotlin.String>?").unwrap();
//! assert!(matches!(ty, TypeRef::Nullable(_)));
//! ```

use nom::{
    Finish, IResult,
    branch::alt,
    bytes::complete::{tag, take_while},
    character::complete::{char, multispace0, multispace1, satisfy},
    combinator::{all_consuming, map, opt, recognize, value},
    multi::{separated_list0, separated_list1},
    sequence::{delimited, pair, preceded, separated_pair},
};
use thiserror::Error;

use super::{ClassName, TypeRef, Variance};

/// A type reference that does not match the grammar.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("cannot parse type reference `{input}`: unexpected input at `{remainder}`")]
pub struct TypeParseError {
    input: String,
    remainder: String,
}

impl TypeParseError {
    fn new(input: &str, remainder: &str) -> Self {
        Self {
            input: input.to_owned(),
            remainder: remainder.to_owned(),
        }
    }

    /// The text that failed to parse.
    #[must_use]
    pub fn input(&self) -> &str {
        &self.input
    }
}

/// Parses a complete type reference.
///
/// # Errors
///
/// Returns [`TypeParseError`] when `input` is not a well-formed type.
pub fn parse_type_ref(input: &str) -> Result<TypeRef, TypeParseError> {
    all_consuming(delimited(multispace0, type_ref, multispace0))(input)
        .finish()
        .map(|(_, ty)| ty)
        .map_err(|err| TypeParseError::new(input, err.input))
}

pub(super) fn parse_class_name(input: &str) -> Result<ClassName, TypeParseError> {
    all_consuming(delimited(multispace0, class_name, multispace0))(input)
        .finish()
        .map(|(_, name)| name)
        .map_err(|err| TypeParseError::new(input, err.input))
}

fn type_ref(input: &str) -> IResult<&str, TypeRef> {
    let (rest, base) = alt((function_type, parenthesized, named_type))(input)?;
    let (rest, nullable) = opt(preceded(multispace0, char('?')))(rest)?;
    let ty = if nullable.is_some() {
        TypeRef::Nullable(Box::new(base))
    } else {
        base
    };
    Ok((rest, ty))
}

fn function_type(input: &str) -> IResult<&str, TypeRef> {
    map(
        separated_pair(
            delimited(
                char('('),
                separated_list0(char(','), padded_type),
                preceded(multispace0, char(')')),
            ),
            delimited(multispace0, tag("->"), multispace0),
            type_ref,
        ),
        |(params, ret)| TypeRef::Function {
            params,
            ret: Box::new(ret),
        },
    )(input)
}

fn parenthesized(input: &str) -> IResult<&str, TypeRef> {
    delimited(char('('), padded_type, char(')'))(input)
}

fn padded_type(input: &str) -> IResult<&str, TypeRef> {
    delimited(multispace0, type_ref, multispace0)(input)
}

fn named_type(input: &str) -> IResult<&str, TypeRef> {
    let (rest, raw) = class_name(input)?;
    let (rest, args) = opt(preceded(
        multispace0,
        delimited(
            char('<'),
            separated_list1(
                char(','),
                delimited(multispace0, type_argument, multispace0),
            ),
            char('>'),
        ),
    ))(rest)?;
    let ty = match args {
        Some(args) => TypeRef::Parameterized { raw, args },
        None => TypeRef::Named(raw),
    };
    Ok((rest, ty))
}

fn type_argument(input: &str) -> IResult<&str, TypeRef> {
    alt((
        value(TypeRef::Star, char('*')),
        map(
            separated_pair(variance, multispace1, type_ref),
            |(kind, ty)| TypeRef::Projection {
                variance: kind,
                ty: Box::new(ty),
            },
        ),
        type_ref,
    ))(input)
}

fn variance(input: &str) -> IResult<&str, Variance> {
    alt((
        value(Variance::In, tag("in")),
        value(Variance::Out, tag("out")),
    ))(input)
}

fn class_name(input: &str) -> IResult<&str, ClassName> {
    let (rest, leading) = dotted(input)?;
    let (rest, explicit) = opt(preceded(char('/'), dotted))(rest)?;
    let name = match explicit {
        Some(names) => ClassName::new(leading.join("."), names),
        None => split_by_convention(&leading),
    };
    Ok((rest, name))
}

fn dotted(input: &str) -> IResult<&str, Vec<&str>> {
    separated_list1(char('.'), identifier)(input)
}

fn identifier(input: &str) -> IResult<&str, &str> {
    recognize(pair(
        satisfy(|c| c.is_alphabetic() || c == '_'),
        take_while(|c: char| c.is_alphanumeric() || c == '_'),
    ))(input)
}

/// Splits `a.b.Outer.Inner` into package `a.b` and names `Outer.Inner`.
///
/// The first segment starting with an upper-case letter begins the class
/// names. When no segment does, the last one is taken as the class name.
fn split_by_convention(segments: &[&str]) -> ClassName {
    let boundary = segments
        .iter()
        .position(|segment| segment.starts_with(|c: char| c.is_uppercase()))
        .unwrap_or_else(|| segments.len().saturating_sub(1));
    let (package, names) = segments.split_at(boundary);
    ClassName::new(package.join("."), names.iter().copied())
}

#[cfg(test)]
mod tests {
    #![allow(
        unfulfilled_lint_expectations,
        reason = "clippy::expect_used is denied globally; tests may not hit those branches"
    )]
    #![expect(clippy::expect_used, reason = "test panics are acceptable")]
    use super::*;
    use rstest::rstest;

    fn named(package: &str, names: &[&str]) -> TypeRef {
        TypeRef::Named(ClassName::new(package, names.iter().copied()))
    }

    #[rstest]
    #[case("kotlin.Int", "kotlin", &["Int"])]
    #[case("dev.example.Outer.Inner", "dev.example", &["Outer", "Inner"])]
    #[case("kotlin.collections/Map.Entry", "kotlin.collections", &["Map", "Entry"])]
    #[case("Sub", "", &["Sub"])]
    #[case("dev.example.lowercase", "dev.example", &["lowercase"])]
    fn parses_class_names(#[case] text: &str, #[case] package: &str, #[case] names: &[&str]) {
        assert_eq!(parse_type_ref(text), Ok(named(package, names)));
    }

    #[rstest]
    fn parses_nested_arguments() {
        let ty = parse_type_ref("kotlin.collections.Map<kotlin.String, kotlin.collections.List<kotlin.Int?>>")
            .expect("parse map type");
        let TypeRef::Parameterized { raw, args } = ty else {
            panic!("expected parameterized type");
        };
        assert_eq!(raw.canonical_name(), "kotlin.collections.Map");
        assert_eq!(args.len(), 2);
        assert_eq!(
            args.get(1).map(ToString::to_string).as_deref(),
            Some("kotlin.collections.List<kotlin.Int?>")
        );
    }

    #[rstest]
    #[case("List<*>", "List<*>")]
    #[case("List<out Number>", "List<out Number>")]
    #[case("Comparator<in kotlin.String>", "Comparator<in kotlin.String>")]
    #[case("(kotlin.Int, kotlin.String) -> kotlin.Unit", "(kotlin.Int, kotlin.String) -> kotlin.Unit")]
    #[case("(() -> Unit)?", "(() -> Unit)?")]
    #[case(" Map < String , Int > ", "Map<String, Int>")]
    fn display_round_trips_normalised_text(#[case] text: &str, #[case] expected: &str) {
        let ty = parse_type_ref(text).expect("parse type");
        assert_eq!(ty.to_string(), expected);
    }

    #[rstest]
    fn identifiers_starting_with_variance_keywords_are_names() {
        let ty = parse_type_ref("List<internal.Thing>").expect("parse type");
        assert_eq!(ty.to_string(), "List<internal.Thing>");
    }

    #[rstest]
    #[case("")]
    #[case("List<")]
    #[case("kotlin.Int extra")]
    #[case("(Int")]
    fn rejects_malformed_references(#[case] text: &str) {
        let err = parse_type_ref(text).expect_err("should reject");
        assert_eq!(err.input(), text);
    }
}
