//! Keystroke filter for numeric text fields.

/// Decides whether `candidate` may be inserted into a field that currently
/// holds `current`. Only digits and a single decimal point are accepted.
pub fn admit(current: &str, candidate: &str) -> bool {
    if candidate.is_empty() {
        return true;
    }
    if !candidate.chars().all(|c| c.is_ascii_digit() || c == '.') {
        return false;
    }
    let dots = current.matches('.').count() + candidate.matches('.').count();
    dots <= 1
}

/// Applies [`admit`] to an in-place edit of a text field.
///
/// The edit is split into the text that survived from `previous` and the text
/// that was inserted; if the insertion is not admitted the field keeps
/// `previous`. Deletions always pass.
pub fn filter_edit(previous: &str, edited: &str) -> String {
    if previous == edited {
        return edited.to_string();
    }

    let prefix = common_prefix_len(previous, edited);
    let suffix = common_suffix_len(&previous[prefix..], &edited[prefix..]);
    let inserted = &edited[prefix..edited.len() - suffix];
    let kept = format!("{}{}", &previous[..prefix], &previous[previous.len() - suffix..]);

    if admit(&kept, inserted) {
        edited.to_string()
    } else {
        tracing::debug!(inserted, "rejected non-numeric input");
        previous.to_string()
    }
}

fn common_prefix_len(a: &str, b: &str) -> usize {
    a.chars()
        .zip(b.chars())
        .take_while(|(x, y)| x == y)
        .map(|(x, _)| x.len_utf8())
        .sum()
}

fn common_suffix_len(a: &str, b: &str) -> usize {
    a.chars()
        .rev()
        .zip(b.chars().rev())
        .take_while(|(x, y)| x == y)
        .map(|(x, _)| x.len_utf8())
        .sum()
}
