/// Section sign used by the client for legacy formatting codes.
pub const SECTION_SIGN: char = '§';

const FORMATTING_CODES: &str = "0123456789AaBbCcDdEeFfKkLlMmNnOoRrXx";

/// Replaces `&`-prefixed formatting codes with their `§` form, e.g. `&6Gold` -> `§6Gold`.
/// An `&` not followed by a valid code is left untouched.
pub fn translate_color_codes(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        match chars.peek() {
            Some(&code) if c == '&' && FORMATTING_CODES.contains(code) => {
                out.push(SECTION_SIGN);
                out.push(code.to_ascii_lowercase());
                chars.next();
            }
            _ => out.push(c),
        }
    }
    out
}
