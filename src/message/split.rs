//! Splitting a commit message into ticket lines and approval trailers

/// Prefixes of trailer lines this tool owns
pub const APPROVAL_MARKERS: &[&str] = &["Reviewed by:", "Approved by:"];

fn is_boundary(line: &str) -> bool {
    line.is_empty() || APPROVAL_MARKERS.iter().any(|m| line.starts_with(m))
}

/// Lines of `message` that precede the approval section
///
/// The scan stops at the first empty line or approval trailer. The subject
/// line and the blank line separating it from the body belong to the prefix,
/// so the search for an empty line starts at the body.
pub fn split_ticket_lines(message: &str) -> Vec<String> {
    let mut lines = message.lines();
    let mut ticket = Vec::new();

    let Some(subject) = lines.next() else {
        return ticket;
    };
    if is_boundary(subject) {
        return ticket;
    }
    ticket.push(subject.to_string());

    let mut body = lines.peekable();
    if body.next_if(|line| line.is_empty()).is_some() {
        ticket.push(String::new());
    }

    ticket.extend(
        body.take_while(|line| !is_boundary(line))
            .map(String::from),
    );
    ticket
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subject_and_body_kept() {
        assert_eq!(
            split_ticket_lines("Fix bug\n\nTICKET-1"),
            vec!["Fix bug", "", "TICKET-1"]
        );
    }

    #[test]
    fn test_stops_at_marker() {
        let message = "Fix bug\n\nTICKET-1\nReviewed by: A <a@x>\nApproved by: B <b@x>\n";
        assert_eq!(split_ticket_lines(message), vec!["Fix bug", "", "TICKET-1"]);
    }

    #[test]
    fn test_stops_at_blank_body_line() {
        let message = "Fix bug\n\nTICKET-1\n\nChange-Id: I123\n";
        assert_eq!(split_ticket_lines(message), vec!["Fix bug", "", "TICKET-1"]);
    }

    #[test]
    fn test_no_marker_no_blank_yields_whole_message() {
        assert_eq!(
            split_ticket_lines("one\ntwo\nthree"),
            vec!["one", "two", "three"]
        );
    }

    #[test]
    fn test_marker_directly_after_subject() {
        assert_eq!(
            split_ticket_lines("Fix bug\nApproved by: B <b@x>\n"),
            vec!["Fix bug"]
        );
    }

    #[test]
    fn test_leading_marker_yields_empty_prefix() {
        assert!(split_ticket_lines("Reviewed by: A <a@x>\n").is_empty());
        assert!(split_ticket_lines("\nsubject after blank").is_empty());
        assert!(split_ticket_lines("").is_empty());
    }

    #[test]
    fn test_marker_must_start_line() {
        assert_eq!(
            split_ticket_lines("Fix\n\nnot Reviewed by: anyone"),
            vec!["Fix", "", "not Reviewed by: anyone"]
        );
    }
}
