//! Identifier mangling from WebAssembly names and indices to C.
//!
//! Every mapping is deterministic. Distinct inputs are assumed to stay
//! distinct after mangling.

use crate::wasm_ast::Name;

pub fn function_name(name: &Name) -> String {
    format!("fn_{}", sanitize_identifier(name.as_str()))
}

pub fn local_name(index: u32) -> String {
    format!("local_{}", index)
}

pub fn variable_name(name: &Name) -> String {
    format!("v{}", sanitize_identifier(name.as_str()))
}

/// Names that are emitted as declared: imports, globals and labels.
pub fn plain_name(name: &Name) -> String {
    let identifier = sanitize_identifier(name.as_str());

    if is_c_reserved(&identifier) {
        format!("_{}", identifier)
    } else {
        identifier
    }
}

fn sanitize_identifier(raw: &str) -> String {
    let mut result = String::with_capacity(raw.len());

    for ch in raw.chars() {
        if ch == '_' || ch.is_ascii_alphanumeric() {
            result.push(ch);
        } else {
            result.push('_');
        }
    }

    if result.is_empty() {
        "_unnamed".to_owned()
    } else if result
        .chars()
        .next()
        .is_some_and(|first| first.is_ascii_digit())
    {
        format!("_{}", result)
    } else {
        result
    }
}

fn is_c_reserved(name: &str) -> bool {
    matches!(
        name,
        "auto"
            | "break"
            | "case"
            | "char"
            | "const"
            | "continue"
            | "default"
            | "do"
            | "double"
            | "else"
            | "enum"
            | "extern"
            | "float"
            | "for"
            | "goto"
            | "if"
            | "inline"
            | "int"
            | "long"
            | "register"
            | "restrict"
            | "return"
            | "short"
            | "signed"
            | "sizeof"
            | "static"
            | "struct"
            | "switch"
            | "typedef"
            | "union"
            | "unsigned"
            | "void"
            | "volatile"
            | "while"
            | "bool"
            | "true"
            | "false"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefixes_follow_the_naming_scheme() {
        assert_eq!(function_name(&Name::from("add")), "fn_add");
        assert_eq!(local_name(3), "local_3");
        assert_eq!(variable_name(&Name::from("counter")), "vcounter");
    }

    #[test]
    fn invalid_characters_become_underscores() {
        assert_eq!(function_name(&Name::from("std::io.print")), "fn_std__io_print");
        assert_eq!(plain_name(&Name::from("0start")), "_0start");
        assert_eq!(plain_name(&Name::from("")), "_unnamed");
    }

    #[test]
    fn reserved_words_are_escaped_only_when_emitted_bare() {
        assert_eq!(plain_name(&Name::from("switch")), "_switch");
        assert_eq!(function_name(&Name::from("switch")), "fn_switch");
    }
}
