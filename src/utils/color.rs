/// Parse a CSS-style color into RGB channels.
///
/// Accepts `#rgb`, `#rrggbb` and `rgb(r, g, b)` / `rgba(r, g, b, a)` (alpha is ignored).
pub fn parse_color(input: &str) -> Option<[u8; 3]> {
    let c = input.trim();
    if let Some(hex) = c.strip_prefix('#') {
        return parse_hex(hex);
    }

    let lower = c.to_ascii_lowercase();
    let inner = lower
        .strip_prefix("rgba(")
        .or_else(|| lower.strip_prefix("rgb("))?
        .strip_suffix(')')?;
    let mut channels = inner
        .split(|ch: char| ch == ',' || ch.is_whitespace())
        .filter(|part| !part.is_empty())
        .map(|part| part.parse::<u32>().ok().map(|v| v.min(255) as u8));

    let r = channels.next()??;
    let g = channels.next()??;
    let b = channels.next()??;
    Some([r, g, b])
}

fn parse_hex(hex: &str) -> Option<[u8; 3]> {
    if !hex.chars().all(|ch| ch.is_ascii_hexdigit()) {
        return None;
    }
    match hex.len() {
        3 => {
            let mut out = [0u8; 3];
            for (i, ch) in hex.chars().enumerate() {
                let v = ch.to_digit(16)? as u8;
                out[i] = v * 17;
            }
            Some(out)
        }
        6 => Some([
            u8::from_str_radix(&hex[0..2], 16).ok()?,
            u8::from_str_radix(&hex[2..4], 16).ok()?,
            u8::from_str_radix(&hex[4..6], 16).ok()?,
        ]),
        _ => None,
    }
}

/// Canonical `#rrggbb` form, as written to the store.
pub fn to_hex([r, g, b]: [u8; 3]) -> String {
    format!("#{:02x}{:02x}{:02x}", r, g, b)
}
