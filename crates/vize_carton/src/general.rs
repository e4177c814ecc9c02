//! General string helpers.

use compact_str::CompactString;

/// Convert a kebab-case name to camelCase.
///
/// `enter-active-class` becomes `enterActiveClass`.
pub fn camelize(s: &str) -> CompactString {
    let mut out = CompactString::with_capacity(s.len());
    let mut upper_next = false;
    for c in s.chars() {
        if c == '-' {
            upper_next = true;
            continue;
        }
        if upper_next {
            out.extend(c.to_uppercase());
            upper_next = false;
        } else {
            out.push(c);
        }
    }
    if upper_next {
        out.push('-');
    }
    out
}

/// Convert a camelCase name to kebab-case.
///
/// `enterActiveClass` becomes `enter-active-class`.
pub fn hyphenate(s: &str) -> CompactString {
    let mut out = CompactString::with_capacity(s.len() + 4);
    for (i, c) in s.chars().enumerate() {
        if c.is_ascii_uppercase() {
            if i > 0 {
                out.push('-');
            }
            out.push(c.to_ascii_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_camelize() {
        assert_eq!(camelize("foo-bar"), "fooBar");
        assert_eq!(camelize("leave-to-class"), "leaveToClass");
        assert_eq!(camelize("foo"), "foo");
    }

    #[test]
    fn test_hyphenate() {
        assert_eq!(hyphenate("fooBar"), "foo-bar");
        assert_eq!(hyphenate("MyComponent"), "my-component");
        assert_eq!(hyphenate("foo"), "foo");
    }
}
