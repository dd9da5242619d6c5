use base64::Engine;
use base64::engine::general_purpose::STANDARD;

/// Icon embedded in every print document
const ICON_SVG: &str = include_str!("icon.svg");

/// Style sheet embedded in every print document.
///
/// Human and assistant blocks use distinct background and accent colors.
/// Code wraps instead of overflowing, a message block never splits across
/// pages, print media uses smaller type and asks for exact color rendering.
pub const STYLESHEET: &str = r#"
body {
  font-family: -apple-system, BlinkMacSystemFont, "Segoe UI", Roboto, Helvetica, Arial, sans-serif;
  font-size: 24px;
  margin: 20px;
  line-height: 1.8;
  color: #333;
}
.header {
  text-align: center;
  margin-bottom: 30px;
  padding-bottom: 15px;
  border-bottom: 1px solid #eee;
}
.message {
  margin-bottom: 25px;
  padding: 15px;
  border-radius: 8px;
  page-break-inside: avoid;
  break-inside: avoid;
  position: relative;
}
.message-label {
  font-weight: bold;
  margin-bottom: 10px;
}
.message-timestamp {
  position: absolute;
  top: 5px;
  right: 10px;
  font-size: 12px;
  color: #666;
}
.human {
  background-color: #f5f7fa;
  border-left: 4px solid #4a90e2;
}
.assistant {
  background-color: #f9f9f9;
  border-left: 4px solid #50b97d;
}
pre {
  white-space: pre-wrap;
  background-color: #f8f9fa;
  border: 1px solid #e1e4e8;
  padding: 12px;
  border-radius: 6px;
  font-family: "SFMono-Regular", Consolas, "Liberation Mono", Menlo, monospace;
  font-size: 14px;
  line-height: 1.4;
  max-width: 100%;
  overflow-wrap: break-word;
  word-wrap: break-word;
  display: block;
  margin: 15px 0;
  page-break-inside: avoid;
}
code {
  font-family: "SFMono-Regular", Consolas, "Liberation Mono", Menlo, monospace;
  font-size: 14px;
  background-color: rgba(0,0,0,0.05);
  padding: 2px 4px;
  border-radius: 3px;
}
pre code {
  background-color: transparent;
  padding: 0;
  border-radius: 0;
}
@media print {
  @page {
    margin: 1.5cm;
  }
  body {
    font-size: 16px;
  }
  .message, pre, code {
    print-color-adjust: exact;
    -webkit-print-color-adjust: exact;
  }
}
"#;

/// `data:` URL of the embedded icon
pub fn icon_data_url() -> String {
    format!("data:image/svg+xml;base64,{}", STANDARD.encode(ICON_SVG))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_icon_data_url_decodes_to_svg() {
        let url = icon_data_url();
        let encoded = url.strip_prefix("data:image/svg+xml;base64,").unwrap();
        let decoded = STANDARD.decode(encoded).unwrap();
        let svg = String::from_utf8(decoded).unwrap();
        assert!(svg.starts_with("<svg"));
        assert!(svg.ends_with("</svg>"));
    }

    #[test]
    fn test_stylesheet_print_contract() {
        assert!(STYLESHEET.contains("white-space: pre-wrap"));
        assert!(STYLESHEET.contains("page-break-inside: avoid"));
        assert!(STYLESHEET.contains("@media print"));
        assert!(STYLESHEET.contains("print-color-adjust: exact"));
        assert!(STYLESHEET.contains("border-left: 4px solid #4a90e2"));
        assert!(STYLESHEET.contains("border-left: 4px solid #50b97d"));
    }
}
