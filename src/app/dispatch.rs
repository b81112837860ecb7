/// A submitted input line after classification.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum Submission {
    Empty,
    /// Leading `/`: command word (with the slash) and its arguments.
    Command { name: String, args: Vec<String> },
    Task(String),
}

pub(crate) fn parse_submission(line: &str) -> Submission {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Submission::Empty;
    }
    if !trimmed.starts_with('/') {
        return Submission::Task(trimmed.to_string());
    }
    let mut tokens = trimmed.split_whitespace().map(str::to_string);
    let name = tokens.next().unwrap_or_default();
    Submission::Command {
        name,
        args: tokens.collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_lines_are_empty() {
        assert_eq!(parse_submission("   "), Submission::Empty);
    }

    #[test]
    fn slash_lines_split_into_word_and_args() {
        assert_eq!(
            parse_submission(" /roadmap status docs/roadmap.yaml "),
            Submission::Command {
                name: "/roadmap".to_string(),
                args: vec!["status".to_string(), "docs/roadmap.yaml".to_string()],
            }
        );
    }

    #[test]
    fn other_text_is_a_task() {
        assert_eq!(
            parse_submission("fix the flaky test"),
            Submission::Task("fix the flaky test".to_string())
        );
    }
}
