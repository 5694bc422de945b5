/// Marks a learner may place in a punctuation task.
pub const ALLOWED_MARKS: [&str; 6] = [".", ",", ";", ":", "!", "?"];

/// Punctuation as it appears in Latin-script text: ASCII and Latin-1 marks,
/// the General and Supplemental Punctuation blocks and CJK brackets. Other
/// scripts' marks (fullwidth forms, Armenian, Arabic) are not recognised.
/// ASCII symbols such as `+`, `<` or `$` are not punctuation.
pub fn is_punctuation(ch: char) -> bool {
    if ch.is_ascii() {
        return ch.is_ascii_punctuation()
            && !matches!(ch, '$' | '+' | '<' | '=' | '>' | '^' | '`' | '|' | '~');
    }
    match ch {
        '\u{00A1}' | '\u{00A7}' | '\u{00AB}' | '\u{00B6}' | '\u{00B7}' | '\u{00BB}'
        | '\u{00BF}' => true,
        // General Punctuation block, minus the two math symbols living in it
        '\u{2044}' | '\u{2052}' => false,
        '\u{2010}'..='\u{2027}' | '\u{2030}'..='\u{205E}' => true,
        // Supplemental Punctuation (U+2E2F is a modifier letter)
        '\u{2E2F}' => false,
        '\u{2E00}'..='\u{2E4F}' => true,
        '\u{3001}'..='\u{3003}' | '\u{3008}'..='\u{3011}' => true,
        _ => false,
    }
}

pub fn is_allowed_mark(mark: &str) -> bool {
    ALLOWED_MARKS.contains(&mark)
}
