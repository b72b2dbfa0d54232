use std::io::Cursor;

use rundb::error::DbError;
use rundb::LineReader;

/// Collects every logical line the reader yields for `input`.
fn logical_lines(input: &str) -> Vec<String> {
    let mut file = Cursor::new(input);
    let mut reader = LineReader::new(&mut file);
    let mut out = Vec::new();
    while let Some(line) = reader.read().expect("read ok") {
        out.push(line);
    }
    out
}

#[test]
fn comments_tabs_and_trim() {
    let lines = logical_lines("  a\t=\t1   # trailing comment\n");
    assert_eq!(lines, vec!["a = 1"]);
}

#[test]
fn blank_and_comment_only_lines_are_skipped() {
    let lines = logical_lines("# just a comment\n\n   \n# another\nx = 1\n");
    assert_eq!(lines, vec!["x = 1"]);
}

#[test]
fn assignment_adopts_following_lines() {
    // The reader must rewind the "z =" line so it is read again.
    let lines = logical_lines("y = 10 20\n30 40\nz = 5\n");
    assert_eq!(lines, vec!["y = 10 20 30 40", "z = 5"]);
}

#[test]
fn blank_line_ends_adoption() {
    let lines = logical_lines("y = 1\n\n2\n");
    assert_eq!(lines, vec!["y = 1", "2"]);
}

#[test]
fn explicit_continuation_with_comment_in_between() {
    let lines = logical_lines("y = 10 \\\n# commented out\n20\n");
    assert_eq!(lines, vec!["y = 10 20"]);
}

#[test]
fn explicit_continuation_without_spaces_joins_directly() {
    let lines = logical_lines("x = 1\\\n2\n");
    assert_eq!(lines, vec!["x = 12"]);
}

#[test]
fn spaces_around_continuation_collapse_to_one() {
    let lines = logical_lines("x = 1 \\\n 2\n");
    assert_eq!(lines, vec!["x = 1 2"]);
}

#[test]
fn continued_lines_equal_single_physical_line() {
    let joined = logical_lines("a = 1 \\\n2 \\\n3\n");
    let single = logical_lines("a = 1 2 3\n");
    assert_eq!(joined, single);
}

#[test]
fn assignment_as_last_line_survives_eof() {
    // Tentative continuation runs into EOF; the line must still come
    // out, without the tentative trailing space.
    let lines = logical_lines("y = 1 2");
    assert_eq!(lines, vec!["y = 1 2"]);
}

#[test]
fn adoption_across_several_lines_until_eof() {
    let lines = logical_lines("y = 1\n2\n3");
    assert_eq!(lines, vec!["y = 1 2 3"]);
}

#[test]
fn comment_inside_adoption_is_transparent() {
    let lines = logical_lines("y = 1\n# note\n2\nz = 9\n");
    assert_eq!(lines, vec!["y = 1 2", "z = 9"]);
}

#[test]
fn overlong_line_is_rejected() {
    let input = format!("x = {}\n", "9 ".repeat(40_000));
    let mut file = Cursor::new(input.as_bytes());
    let mut reader = LineReader::new(&mut file);
    let err = reader.read().expect_err("should overflow");
    assert!(matches!(err, DbError::LineTooLong { .. }));
    assert_eq!(err.code(), -128);
}

#[test]
fn comment_hash_cuts_rest_of_line_only() {
    let lines = logical_lines("a = 1 # b = 2\nc = 3\n");
    assert_eq!(lines, vec!["a = 1", "c = 3"]);
}
