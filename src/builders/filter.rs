use crate::builders::rules::RuleSet;

/// The prefix that turns a SQL line into a comment.
pub const COMMENT_MARKER: &str = "-- ";

/// A line that the filter commented out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineChange {
    /// The 1-based line number in the input.
    pub line_number: usize,
    /// The id of the first rule that matched.
    pub rule_id: String,
    /// The line as it was before commenting, terminator included.
    pub original: String,
}

/// The result of running the filter over a document.
#[derive(Debug, Clone, Default)]
pub struct FilterOutcome {
    /// The transformed lines, one per input line.
    pub lines: Vec<String>,
    pub changes: Vec<LineChange>,
}

impl FilterOutcome {
    /// The number of lines the filter changed.
    pub fn changed_count(&self) -> usize {
        self.changes.len()
    }

    /// Joins the lines back into one string. Terminators are part of each
    /// line, so this reproduces the input byte for byte when nothing changed.
    pub fn into_content(self) -> String {
        self.lines.concat()
    }
}

/// Splits file content into lines, keeping each line's terminator.
///
/// `"a\r\nb"` yields `["a\r\n", "b"]`. Empty content yields no lines.
pub fn split_lines(content: &str) -> Vec<&str> {
    content.split_inclusive('\n').collect()
}

/// Returns `true` when the line is already a SQL comment.
pub fn is_commented(line: &str) -> bool {
    line.trim_start().starts_with("--")
}

/// Comments out every line matched by `rules`.
///
/// Lines are tested in order against each rule and the first matching rule
/// wins. Lines that are already comments are left alone even when a rule
/// matches, so running the filter on its own output changes nothing.
pub fn filter<S: AsRef<str>>(lines: &[S], rules: &RuleSet) -> FilterOutcome {
    let mut outcome = FilterOutcome {
        lines: Vec::with_capacity(lines.len()),
        changes: Vec::new(),
    };

    for (index, line) in lines.iter().enumerate() {
        let line = line.as_ref();
        let hit = if is_commented(line) {
            None
        } else {
            rules.first_match(line)
        };

        match hit {
            Some(rule) => {
                outcome.lines.push(format!("{COMMENT_MARKER}{line}"));
                outcome.changes.push(LineChange {
                    line_number: index + 1,
                    rule_id: rule.id.clone(),
                    original: line.to_string(),
                });
            }
            None => outcome.lines.push(line.to_string()),
        }
    }

    outcome
}
