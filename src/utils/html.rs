/// Escape text for safe inclusion in HTML element content and attributes.
pub fn escape(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

const PAGE_STYLE: &str = "body, html { margin: 0; padding: 0; height: 100%; background: #0b1220; color: #e5e7eb; } \
.wrap { display: flex; align-items: center; justify-content: center; height: 100%; text-align: center; padding: 20px; box-sizing: border-box; } \
.msg { font-size: 18px; line-height: 1.6; padding: 24px 30px; border: 1px solid #1f2937; border-radius: 16px; background: rgba(17,24,39,0.9); max-width: 720px; word-break: break-word; white-space: pre-wrap; }";

/// Full page showing a single centered block of text. `body` is escaped here.
pub fn message_page(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\" />\n\
<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\" />\n\
<title>{}</title>\n<style>{}</style>\n</head>\n<body>\n\
<div class=\"wrap\"><div class=\"msg\">{}</div></div>\n</body>\n</html>\n",
        escape(title),
        PAGE_STYLE,
        escape(body)
    )
}
