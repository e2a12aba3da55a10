/// Pull the first top-level `{ ... }` span out of free-form model text.
///
/// Braces are counted without regard to string literals, so a `}` inside a
/// quoted value closes the span early. If the text ends before the braces
/// balance, everything from the first `{` to the end is returned so the
/// JSON parser reports a real error instead of us truncating silently.
///
/// Returns `None` when the text contains no `{` at all.
pub fn extract_object_span(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let mut depth: usize = 0;

    for (offset, byte) in text.as_bytes()[start..].iter().enumerate() {
        match byte {
            b'{' => depth += 1,
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[start..=start + offset]);
                }
            }
            _ => {}
        }
    }

    Some(&text[start..])
}
