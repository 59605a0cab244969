//! Token-level helpers for declaration text.

use nom::{
    branch::alt,
    bytes::complete::{tag, take_till, take_until, take_while, take_while1},
    character::complete::{char, multispace1},
    combinator::{map, opt, recognize, value},
    error::{Error, ErrorKind},
    multi::many0,
    sequence::{pair, preceded, tuple},
    IResult,
};
use viewfn_core::{Attribute, AttributeList};

/// Parse an identifier (starts with letter/underscore, followed by alphanumeric/underscore).
pub fn identifier(input: &str) -> IResult<&str, &str> {
    recognize(pair(
        take_while1(|c: char| c.is_alphabetic() || c == '_'),
        take_while(|c: char| c.is_alphanumeric() || c == '_'),
    ))(input)
}

fn line_comment(input: &str) -> IResult<&str, &str> {
    recognize(pair(tag("//"), take_till(|c| c == '\n')))(input)
}

fn block_comment(input: &str) -> IResult<&str, &str> {
    recognize(tuple((tag("/*"), take_until("*/"), tag("*/"))))(input)
}

/// Skip whitespace and comments.
pub fn trivia(input: &str) -> IResult<&str, ()> {
    value((), many0(alt((multispace1, line_comment, block_comment))))(input)
}

/// Parse a bracketed group and return the text between the delimiters.
///
/// Nested groups of the same kind and string literals are skipped over.
pub fn delimited_group(open: char, close: char) -> impl Fn(&str) -> IResult<&str, &str> {
    move |input: &str| {
        let (rest, _) = char(open)(input)?;
        match find_closing(rest, open, close) {
            Some(end) => Ok((&rest[end + close.len_utf8()..], &rest[..end])),
            None => Err(nom::Err::Error(Error::new(input, ErrorKind::Char))),
        }
    }
}

/// Byte offset of the delimiter closing an already-opened group.
///
/// String literals and comments are skipped.
pub fn find_closing(input: &str, open: char, close: char) -> Option<usize> {
    let mut depth = 1usize;
    let mut in_string = false;
    let mut i = 0usize;

    while let Some(c) = input[i..].chars().next() {
        if in_string {
            match c {
                '\\' => {
                    // Skip the escaped character whole; it may be multi-byte.
                    let escaped = input[i + 1..].chars().next().map_or(0, char::len_utf8);
                    i += 1 + escaped;
                    continue;
                }
                '"' => in_string = false,
                _ => {}
            }
        } else if input[i..].starts_with("//") {
            i += input[i..].find('\n').unwrap_or(input.len() - i);
            continue;
        } else if input[i..].starts_with("/*") {
            i += input[i..].find("*/").map(|p| p + 2).unwrap_or(input.len() - i);
            continue;
        } else if c == '"' {
            in_string = true;
        } else if c == open {
            depth += 1;
        } else if c == close {
            depth -= 1;
            if depth == 0 {
                return Some(i);
            }
        }
        i += c.len_utf8();
    }
    None
}

/// Parse a single attribute: `@Name` or `@Name(args)`.
pub fn attribute(input: &str) -> IResult<&str, Attribute> {
    map(
        preceded(char('@'), pair(identifier, opt(delimited_group('(', ')')))),
        |(name, args): (&str, Option<&str>)| Attribute {
            name: name.to_string(),
            arguments: args.map(|a| a.trim().to_string()),
        },
    )(input)
}

/// Parse a run of attributes separated by whitespace or comments.
pub fn attribute_list(input: &str) -> IResult<&str, AttributeList> {
    let mut attributes = AttributeList::new();
    let mut rest = input;
    loop {
        let (after_trivia, _) = trivia(rest)?;
        match attribute(after_trivia) {
            Ok((next, attr)) => {
                attributes.push(attr);
                rest = next;
            }
            Err(_) => return Ok((after_trivia, attributes)),
        }
    }
}

/// Leading attributes of a type signature such as `@escaping @Sendable () -> Void`.
pub fn type_attributes(type_text: &str) -> AttributeList {
    attribute_list(type_text)
        .map(|(_, attrs)| attrs)
        .unwrap_or_default()
}

/// Remove every occurrence of the named attribute from a type's leading
/// attribute list, keeping the other attributes and the rest of the type.
///
/// Only attributes are matched, so an identifier in the type body that
/// happens to share the name is left alone.
pub fn strip_type_attribute(type_text: &str, name: &str) -> String {
    let trimmed = type_text.trim();
    let Ok((rest, attributes)) = attribute_list(trimmed) else {
        return trimmed.to_string();
    };
    if !attributes.iter().any(|a| a.is(name)) {
        return trimmed.to_string();
    }

    let mut parts: Vec<String> = attributes
        .iter()
        .filter(|a| !a.is(name))
        .map(|a| a.to_string())
        .collect();
    let rest = rest.trim();
    if !rest.is_empty() {
        parts.push(rest.to_string());
    }
    parts.join(" ")
}

/// Convert a byte offset into a 1-based line and column.
pub fn line_col(source: &str, offset: usize) -> (u32, u32) {
    let offset = offset.min(source.len());
    let before = &source[..offset];
    let line = before.matches('\n').count() + 1;
    let column = match before.rfind('\n') {
        Some(nl) => before[nl + 1..].chars().count() + 1,
        None => before.chars().count() + 1,
    };
    (line as u32, column as u32)
}

/// Byte offset of `rest` within `source`. `rest` must be a suffix slice of `source`.
pub fn offset_of(source: &str, rest: &str) -> usize {
    source.len() - rest.len()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identifier() {
        assert_eq!(identifier("arg1: Int"), Ok((": Int", "arg1")));
        assert!(identifier("1abc").is_err());
    }

    #[test]
    fn test_trivia_skips_comments() {
        let (rest, _) = trivia("  // note\n  /* block */ func").unwrap();
        assert_eq!(rest, "func");
    }

    #[test]
    fn test_delimited_group_nested() {
        let (rest, inner) = delimited_group('(', ')')("(a: (Int) -> Void, b: String) rest").unwrap();
        assert_eq!(inner, "a: (Int) -> Void, b: String");
        assert_eq!(rest, " rest");
    }

    #[test]
    fn test_delimited_group_skips_strings() {
        let (_, inner) = delimited_group('{', '}')("{ Text(\"}\") }").unwrap();
        assert_eq!(inner, " Text(\"}\") ");
    }

    #[test]
    fn test_delimited_group_skips_comments() {
        let (_, inner) = delimited_group('{', '}')("{\n  // don't close } here\n  Text(\"a\")\n}").unwrap();
        assert!(inner.ends_with("Text(\"a\")\n"));
    }

    #[test]
    fn test_delimited_group_escape_before_multibyte() {
        let (rest, inner) = delimited_group('{', '}')("{ Text(#\"C:\\é\"#) } tail").unwrap();
        assert_eq!(inner, " Text(#\"C:\\é\"#) ");
        assert_eq!(rest, " tail");

        let (_, inner) = delimited_group('(', ')')("(label: String = \"\\é\")").unwrap();
        assert_eq!(inner, "label: String = \"\\é\"");
    }

    #[test]
    fn test_delimited_group_unbalanced() {
        assert!(delimited_group('{', '}')("{ VStack {").is_err());
    }

    #[test]
    fn test_attribute_with_arguments() {
        let (rest, attr) = attribute("@Environment(\\.dismiss) var dismiss").unwrap();
        assert_eq!(attr.name, "Environment");
        assert_eq!(attr.arguments.as_deref(), Some("\\.dismiss"));
        assert_eq!(rest, " var dismiss");
    }

    #[test]
    fn test_attribute_list() {
        let (rest, attrs) = attribute_list("@ViewComponent\n@MainActor\nfunc hoge()").unwrap();
        assert_eq!(attrs.len(), 2);
        assert!(attrs[0].is("ViewComponent"));
        assert!(attrs[1].is("MainActor"));
        assert_eq!(rest, "func hoge()");
    }

    #[test]
    fn test_strip_escaping() {
        assert_eq!(strip_type_attribute("@escaping () -> Void", "escaping"), "() -> Void");
        assert_eq!(
            strip_type_attribute("@Sendable @escaping (Int) -> Void", "escaping"),
            "@Sendable (Int) -> Void"
        );
    }

    #[test]
    fn test_strip_leaves_unrelated_text() {
        assert_eq!(strip_type_attribute("EscapingBox", "escaping"), "EscapingBox");
        assert_eq!(strip_type_attribute("  Int ", "escaping"), "Int");
    }

    #[test]
    fn test_type_attributes() {
        let attrs = type_attributes("@escaping () -> Void");
        assert_eq!(attrs.len(), 1);
        assert!(attrs[0].is("escaping"));
        assert!(type_attributes("String").is_empty());
    }

    #[test]
    fn test_line_col() {
        let source = "ab\ncd\nef";
        assert_eq!(line_col(source, 0), (1, 1));
        assert_eq!(line_col(source, 4), (2, 2));
        assert_eq!(line_col(source, 6), (3, 1));
    }
}
