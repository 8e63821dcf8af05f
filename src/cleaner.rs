/// Marker characters stripped from the final briefing before it is mailed.
const MARKERS: &[char] = &['*', '_', '`', '#', '>', '-'];

/// Strip markdown emphasis, heading, and list markers from briefing text.
///
/// Total function: any input produces an output containing none of the
/// marker characters, trimmed of surrounding whitespace.
pub fn clean_markdown(text: &str) -> String {
    let unwrapped = text.replace("**", "");
    let stripped: String = unwrapped.chars().filter(|c| !MARKERS.contains(c)).collect();
    stripped.trim().to_string()
}
