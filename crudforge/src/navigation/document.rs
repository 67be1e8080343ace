//! Line-preserving text model

/// A text file as a list of lines, each keeping its own terminator
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Document {
    lines: Vec<String>,
    newline: &'static str,
}

impl Document {
    pub fn parse(content: &str) -> Self {
        let newline = if content.contains("\r\n") { "\r\n" } else { "\n" };
        Self {
            lines: content.split_inclusive('\n').map(str::to_string).collect(),
            newline,
        }
    }

    pub fn render(&self) -> String {
        self.lines.concat()
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Line content without its terminator
    pub fn text(&self, idx: usize) -> &str {
        self.lines[idx].trim_end_matches(['\r', '\n'])
    }

    pub fn texts(&self) -> impl Iterator<Item = (usize, &str)> {
        (0..self.lines.len()).map(move |i| (i, self.text(i)))
    }

    /// Replace the content of a line, keeping its terminator
    pub fn set_text(&mut self, idx: usize, text: &str) {
        let ending = self.ending(idx).to_string();
        self.lines[idx] = format!("{}{}", text, ending);
    }

    /// Insert lines before `idx` (or at the end when `idx == len`)
    pub fn insert(&mut self, idx: usize, texts: &[String]) {
        if texts.is_empty() {
            return;
        }
        let unterminated_end = idx == self.lines.len() && !self.had_trailing_newline();
        if idx > 0 && self.ending(idx - 1).is_empty() {
            let newline = self.newline;
            self.lines[idx - 1].push_str(newline);
        }

        let last = texts.len() - 1;
        let new_lines: Vec<String> = texts
            .iter()
            .enumerate()
            .map(|(i, text)| {
                if unterminated_end && i == last {
                    text.clone()
                } else {
                    format!("{}{}", text, self.newline)
                }
            })
            .collect();
        self.lines.splice(idx..idx, new_lines);
    }

    /// Remove the given line indices
    pub fn remove(&mut self, indices: &[usize]) {
        let mut idx = 0;
        self.lines.retain(|_| {
            let keep = !indices.contains(&idx);
            idx += 1;
            keep
        });
    }

    fn ending(&self, idx: usize) -> &str {
        let line = &self.lines[idx];
        &line[line.trim_end_matches(['\r', '\n']).len()..]
    }

    fn had_trailing_newline(&self) -> bool {
        self.lines.last().map_or(true, |l| l.ends_with('\n'))
    }
}
