//! Plain-text layout helpers: measuring, centering and word wrapping.

/// Display length of `text`, counted in characters.
pub fn measure(text: &str) -> usize {
    text.chars().count()
}

/// Center `text` in `width` columns; odd padding goes to the right.
pub fn center(text: &str, width: usize) -> String {
    let len = measure(text);
    if len >= width {
        return text.to_string();
    }
    let left = (width - len) / 2;
    let right = width - len - left;
    format!("{}{text}{}", " ".repeat(left), " ".repeat(right))
}

/// Greedily wrap `text` into lines of at most `width` characters.
///
/// Words longer than `width` are split across lines.
pub fn wrap(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut lines = Vec::new();
    let mut line = String::new();

    for word in text.split_whitespace() {
        let mut word: Vec<char> = word.chars().collect();
        while word.len() > width {
            if !line.is_empty() {
                lines.push(std::mem::take(&mut line));
            }
            let rest = word.split_off(width);
            lines.push(word.into_iter().collect());
            word = rest;
        }
        if word.is_empty() {
            continue;
        }

        let line_len = measure(&line);
        if line.is_empty() {
            line.extend(word);
        } else if line_len + 1 + word.len() <= width {
            line.push(' ');
            line.extend(word);
        } else {
            lines.push(std::mem::take(&mut line));
            line.extend(word);
        }
    }
    if !line.is_empty() {
        lines.push(line);
    }
    lines
}
