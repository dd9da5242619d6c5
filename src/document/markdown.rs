use crate::document::assembler::PrintDocument;

/// Render a print document as a Markdown transcript
pub fn to_markdown(document: &PrintDocument) -> String {
    let mut out = format!("# {}\n", document.title());

    for block in document.blocks() {
        out.push_str("\n## ");
        out.push_str(block.label());
        if let Some(timestamp) = block.timestamp() {
            out.push_str(&format!(" ({})", timestamp));
        }
        out.push_str("\n\n");
        out.push_str(html2md::parse_html(block.content_html()).trim());
        out.push('\n');
    }

    out
}
