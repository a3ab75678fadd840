/// One line of a text report: free text, or a label/value pair whose labels are right-aligned
/// against the longest label in the block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputLine {
    Text(String),
    Pair(String, String),
}

impl OutputLine {
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }

    pub fn pair(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self::Pair(label.into(), value.into())
    }
}

pub fn format_output_string(lines: &[OutputLine]) -> String {
    let width = lines
        .iter()
        .filter_map(|line| match line {
            OutputLine::Pair(label, _) => Some(label.chars().count()),
            OutputLine::Text(_) => None,
        })
        .max()
        .unwrap_or(0);

    lines
        .iter()
        .map(|line| match line {
            OutputLine::Text(text) => text.clone(),
            OutputLine::Pair(label, value) => format!("{label:>width$}{value}"),
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_are_right_aligned() {
        let output = format_output_string(&[
            OutputLine::text("---- HEADER ----"),
            OutputLine::pair("Ship Type: ", "[Anaconda]"),
            OutputLine::pair("Shield Cell Bank: ", "[0]"),
        ]);
        assert_eq!(
            output,
            "---- HEADER ----\n       Ship Type: [Anaconda]\nShield Cell Bank: [0]"
        );
    }

    #[test]
    fn text_only_blocks_are_untouched() {
        let output = format_output_string(&[OutputLine::text("a"), OutputLine::text("")]);
        assert_eq!(output, "a\n");
    }
}
