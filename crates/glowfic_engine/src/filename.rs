use glowfic_core::ThreadId;

const MAX_STEM_BYTES: usize = 80;

/// Archive file name for a thread: the sanitized title plus `.epub`, or
/// `glowfic_<id>.epub` when nothing usable is left of the title.
pub fn archive_filename(title: &str, thread_id: ThreadId) -> String {
    let stem = sanitize_title(title).unwrap_or_else(|| format!("glowfic_{thread_id}"));
    format!("{stem}.epub")
}

fn sanitize_title(input: &str) -> Option<String> {
    let mut compacted = String::with_capacity(input.len());
    let mut prev_underscore = false;
    for c in input.chars() {
        let c = if is_forbidden(c) { '_' } else { c };
        if c == '_' && prev_underscore {
            continue;
        }
        prev_underscore = c == '_';
        compacted.push(c);
    }

    let mut stem = compacted.trim_matches(&['_', ' ', '.'][..]).to_string();
    if stem.len() > MAX_STEM_BYTES {
        let mut end = MAX_STEM_BYTES;
        while !stem.is_char_boundary(end) {
            end -= 1;
        }
        stem.truncate(end);
        stem = stem.trim_end_matches(&['_', ' ', '.'][..]).to_string();
    }
    if stem.is_empty() {
        return None;
    }
    if is_reserved_windows_name(&stem) {
        stem.push('_');
    }
    Some(stem)
}

fn is_forbidden(c: char) -> bool {
    matches!(c,
        '\\' | '/' | ':' | '*' | '?' | '"' | '<' | '>' | '|' | '\0'..='\u{1F}'
    )
}

fn is_reserved_windows_name(name: &str) -> bool {
    const RESERVED: &[&str] = &[
        "CON", "PRN", "AUX", "NUL", "COM1", "COM2", "COM3", "COM4", "COM5", "COM6", "COM7", "COM8",
        "COM9", "LPT1", "LPT2", "LPT3", "LPT4", "LPT5", "LPT6", "LPT7", "LPT8", "LPT9",
    ];
    RESERVED.iter().any(|r| r.eq_ignore_ascii_case(name))
}
