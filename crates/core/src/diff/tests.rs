use super::*;

fn diff(old: &str, new: &str) -> Vec<String> {
    unified_diff(old, new, "Version 1", "Version 2", DEFAULT_CONTEXT)
}

#[test]
fn split_keeps_line_endings() {
    assert_eq!(
        split_lines_keep_ends("a\r\nb\nc"),
        vec!["a\r\n", "b\n", "c"]
    );
    assert!(split_lines_keep_ends("").is_empty());
}

#[test]
fn split_treats_lone_carriage_return_as_a_boundary() {
    assert_eq!(
        split_lines_keep_ends("a\rb\r\nc\u{2028}d"),
        vec!["a\r", "b\r\n", "c\u{2028}", "d"]
    );
    assert_eq!(split_lines_keep_ends("\r\r\n"), vec!["\r", "\r\n"]);
    assert_eq!(strip_line_end("b\r\n"), "b");
    assert_eq!(strip_line_end("a\r"), "a");
    assert_eq!(strip_line_end("tail"), "tail");
}

#[test]
fn carriage_return_lines_diff_line_by_line() {
    assert_eq!(
        unified_diff("a\rb\rc\r", "a\rX\rc\r", "f", "t", DEFAULT_CONTEXT),
        vec!["--- f", "+++ t", "@@ -1,3 +1,3 @@", " a\r", "-b\r", "+X\r", " c\r"]
    );
}

#[test]
fn identical_inputs_produce_no_lines() {
    assert!(diff("same\ncode\n", "same\ncode\n").is_empty());
    assert!(diff("", "").is_empty());
}

#[test]
fn single_append_has_one_hunk() {
    assert_eq!(
        diff("x = 1\n", "x = 1\ny = 2\n"),
        vec![
            "--- Version 1",
            "+++ Version 2",
            "@@ -1 +1,2 @@",
            " x = 1\n",
            "+y = 2\n",
        ]
    );
}

#[test]
fn distant_changes_split_into_two_hunks() {
    let old = "a\nb\nc\nd\ne\nf\ng\nh\ni\nj\nk\n";
    let new = "a\nB\nc\nd\ne\nf\ng\nh\ni\nj\nK\n";
    assert_eq!(
        diff(old, new),
        vec![
            "--- Version 1",
            "+++ Version 2",
            "@@ -1,5 +1,5 @@",
            " a\n",
            "-b\n",
            "+B\n",
            " c\n",
            " d\n",
            " e\n",
            "@@ -8,4 +8,4 @@",
            " h\n",
            " i\n",
            " j\n",
            "-k\n",
            "+K\n",
        ]
    );
}

#[test]
fn missing_trailing_newline_is_a_change() {
    assert_eq!(
        diff("one\ntwo", "one\ntwo\n"),
        vec![
            "--- Version 1",
            "+++ Version 2",
            "@@ -1,2 +1,2 @@",
            " one\n",
            "-two",
            "+two\n",
        ]
    );
}

#[test]
fn empty_side_uses_zero_length_range() {
    assert_eq!(
        diff("", "new\n"),
        vec!["--- Version 1", "+++ Version 2", "@@ -0,0 +1 @@", "+new\n"]
    );
    assert_eq!(
        diff("gone\n", ""),
        vec!["--- Version 1", "+++ Version 2", "@@ -1 +0,0 @@", "-gone\n"]
    );
}

#[test]
fn swapped_inputs_invert_markers() {
    let old = "speed = 5\nsize = 10\n";
    let new = "speed = 12\nsize = 10\n";

    let forward = diff(old, new);
    let backward = unified_diff(new, old, "Version 2", "Version 1", DEFAULT_CONTEXT);

    let removed = |lines: &[String]| -> Vec<String> {
        lines
            .iter()
            .filter(|l| l.starts_with('-') && !l.starts_with("---"))
            .map(|l| l[1..].to_string())
            .collect()
    };
    let added = |lines: &[String]| -> Vec<String> {
        lines
            .iter()
            .filter(|l| l.starts_with('+') && !l.starts_with("+++"))
            .map(|l| l[1..].to_string())
            .collect()
    };

    assert_eq!(removed(&forward), added(&backward));
    assert_eq!(added(&forward), removed(&backward));
    assert_eq!(removed(&forward), vec!["speed = 5\n".to_string()]);
}

#[test]
fn hunks_reconstruct_both_sides() {
    let old = "class Snake:\n    speed = 5\n    size = 3\n\nsnake = Snake()\n";
    let new = "class Snake:\n    speed = 9\n    size = 3\n    color = 'green'\n\nsnake = Snake()\n";
    let lines = diff(old, new);
    let body = || lines.iter().skip(3);

    let old_side: String = body()
        .filter(|l| l.starts_with(' ') || l.starts_with('-'))
        .map(|l| &l[1..])
        .collect();
    let new_side: String = body()
        .filter(|l| l.starts_with(' ') || l.starts_with('+'))
        .map(|l| &l[1..])
        .collect();

    assert_eq!(old_side, old);
    assert_eq!(new_side, new);
}

#[test]
fn opcodes_are_deterministic_and_minimal() {
    let a = ["a", "b", "c", "a", "b", "b", "a"];
    let b = ["c", "b", "a", "b", "a", "c"];
    let first = opcodes(&a, &b);
    let second = opcodes(&a, &b);
    assert_eq!(first, second);

    let kept: usize = first
        .iter()
        .filter(|op| op.tag == OpTag::Equal)
        .map(|op| op.i2 - op.i1)
        .sum();
    assert_eq!(kept, 4);
}

#[test]
fn full_rewrite_of_a_large_file() {
    let old: String = (0..2000).map(|i| format!("old_{i} = {i}\n")).collect();
    let new: String = (0..2000).map(|i| format!("new_{i} = {i}\n")).collect();
    let lines = diff(&old, &new);

    assert_eq!(lines.len(), 2 + 1 + 4000);
    assert_eq!(lines[2], "@@ -1,2000 +1,2000 @@");
    assert_eq!(lines[3], "-old_0 = 0\n");
    assert_eq!(lines[2003], "+new_0 = 0\n");
    assert_eq!(lines.last().map(String::as_str), Some("+new_1999 = 1999\n"));
}

#[test]
fn sparse_edits_in_a_large_file_stay_minimal() {
    let old: Vec<String> = (0..3000).map(|i| format!("line {i}")).collect();
    let new: Vec<String> = old
        .iter()
        .enumerate()
        .map(|(i, line)| {
            if i % 150 == 0 {
                format!("changed {i}")
            } else {
                line.clone()
            }
        })
        .collect();

    let codes = opcodes(&old, &new);
    let kept: usize = codes
        .iter()
        .filter(|op| op.tag == OpTag::Equal)
        .map(|op| op.i2 - op.i1)
        .sum();
    assert_eq!(kept, 3000 - 20);
    assert_eq!(
        codes.iter().filter(|op| op.tag == OpTag::Replace).count(),
        20
    );
}
