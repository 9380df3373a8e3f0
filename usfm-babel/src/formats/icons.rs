//! Icon mapping for the tree visualization format

/// Get the Unicode icon for a node type
///
/// Node types are the names returned by [`VerseObject::node_type`] plus the
/// structural levels the visualizer adds around them (Document, Headers,
/// Chapter, Front, Verse, Attribute).
///
/// [`VerseObject::node_type`]: crate::ast::VerseObject::node_type
pub fn get_icon(node_type: &str) -> &'static str {
    match node_type {
        "Document" => "⧉",
        "Headers" => "☰",
        "Chapter" => "§",
        "Front" => "⊤",
        "Verse" => "℣",
        "Text" => "◦",
        "Word" => "𝑤",
        "Milestone" => "⊕",
        "Marker" => "¶",
        "Footnote" => "³",
        "Attribute" => "=",
        _ => "○",
    }
}
