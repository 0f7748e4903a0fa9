/// Contributor bylines removed from every post before title extraction.
pub const BYLINES: [&str; 3] = ["By Mathieu Boudreau", "By Pinar S. Ozbay", "By Agah Karakuzu"];

/// Remove contributor bylines from `content`.
///
/// A line holding nothing but a byline is dropped together with its line
/// break; a byline embedded in a longer line is cut out literally.
pub fn strip_bylines(content: &str) -> String {
    let mut out = String::with_capacity(content.len());
    for line in content.split_inclusive('\n') {
        let body = line.trim_end_matches(['\n', '\r']);
        if BYLINES.contains(&body.trim()) {
            continue;
        }
        let mut cleaned = line.to_string();
        for byline in BYLINES {
            if cleaned.contains(byline) {
                cleaned = cleaned.replace(byline, "");
            }
        }
        out.push_str(&cleaned);
    }
    out
}
