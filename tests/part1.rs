use assert_cmd::Command;
use predicates::prelude::predicate::str;

fn strip_styles(text: &str) -> String {
    let mut plain = String::new();
    let mut chars = text.chars();
    while let Some(c) = chars.next() {
        if c == '\x1b' {
            for c in chars.by_ref() {
                if c.is_ascii_alphabetic() {
                    break;
                }
            }
        } else {
            plain.push(c);
        }
    }

    plain
}

#[test]
fn part1_output_right_answer() {
    let mut cmd = Command::cargo_bin("part1").unwrap();
    cmd.arg("inputs.txt");

    cmd.assert().success().stdout(str::contains("31"));
}

#[test]
fn part1_renders_visited_map() {
    let mut cmd = Command::cargo_bin("part1").unwrap();
    cmd.arg("inputs.txt").arg("--render");

    let output = cmd.assert().success().stdout(str::contains("31")).get_output().clone();
    let stdout = String::from_utf8(output.stdout).unwrap();
    let plain = strip_styles(&stdout);
    for row in ["Sabqponm", "abcryxxl", "accszExk", "acctuvwj", "abdefghi"] {
        assert!(plain.contains(row), "Row {} not rendered in:\n{}", row, plain);
    }
}

#[test]
fn part1_reports_no_path() {
    let mut cmd = Command::cargo_bin("part1").unwrap();
    cmd.arg("tests/data/cliff.txt");

    cmd.assert()
        .success()
        .stderr(str::contains("There's no path from (0, 0) to (2, 2)"));
}

#[test]
fn part1_rejects_invalid_map() {
    let mut cmd = Command::cargo_bin("part1").unwrap();
    cmd.arg("tests/data/bad_char.txt");

    cmd.assert()
        .failure()
        .stderr(str::contains("Invalid character(X) for map."));
}
