// Shared prompt constants.
// Each service that needs LLM calls defines its own prompts.rs alongside it.
// This file contains cross-cutting prompt fragments.

/// System message sent with every completion request.
pub const CONTRACT_LAWYER_SYSTEM: &str = "You are a contract lawyer.";

/// Substitutes `{name}` placeholders in a single pass, so braces inside
/// user-supplied values are never expanded. Unknown placeholders are left as-is.
pub fn fill_template(template: &str, values: &[(&str, &str)]) -> String {
    let capacity = template.len() + values.iter().map(|(_, v)| v.len()).sum::<usize>();
    let mut out = String::with_capacity(capacity);
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let replacement = after.find('}').and_then(|close| {
            let name = &after[..close];
            values
                .iter()
                .find(|(key, _)| *key == name)
                .map(|(_, value)| (*value, close))
        });

        match replacement {
            Some((value, close)) => {
                out.push_str(value);
                rest = &after[close + 1..];
            }
            None => {
                out.push('{');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fill_template_does_not_expand_user_braces() {
        let out = fill_template("A={a} B={b}", &[("a", "{b}"), ("b", "two")]);
        assert_eq!(out, "A={b} B=two");
    }

    #[test]
    fn test_fill_template_keeps_unknown_placeholders() {
        let out = fill_template("{known} {unknown} {", &[("known", "k")]);
        assert_eq!(out, "k {unknown} {");
    }
}
