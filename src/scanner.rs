//! scanner.rs
//!
//! Locates GoogleTest macro bodies inside raw C++ source lines and
//! decides whether a test already carries a comment.

use regex::Regex;

/* ============================================================
   Test block location
   ============================================================ */

/// Half-open line range `[start, end)` covering one macro invocation
/// plus its brace-delimited body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TestBlock {
    pub start: usize,
    pub end: usize,
}

/// Lazy iterator over the test blocks of a line slice, in ascending
/// document order. Pure function of its input; restartable by
/// constructing it again.
pub struct TestBlocks<'a> {
    lines: &'a [String],
    macro_re: Regex,
    pos: usize,
}

pub fn find_test_blocks(lines: &[String]) -> TestBlocks<'_> {
    TestBlocks {
        lines,
        macro_re: Regex::new(r"^\s*(?:TEST_SUITE|TEST_F|TEST_P|TEST)\s*\(.*\)\s*;?\s*\{?\s*$")
            .unwrap(),
        pos: 0,
    }
}

impl Iterator for TestBlocks<'_> {
    type Item = TestBlock;

    fn next(&mut self) -> Option<TestBlock> {
        while self.pos < self.lines.len() {
            if !self.macro_re.is_match(&self.lines[self.pos]) {
                self.pos += 1;
                continue;
            }

            let start = self.pos;

            // Scan forward to the first '{'. A macro with no reachable
            // opening brace ends block discovery for the whole file.
            let mut j = start;
            while j < self.lines.len() && !self.lines[j].contains('{') {
                j += 1;
            }
            if j == self.lines.len() {
                self.pos = self.lines.len();
                return None;
            }

            // Brace depth is counted verbatim: braces inside string/char
            // literals and comments are NOT skipped. Known imprecision.
            let mut depth = 0i64;
            let mut k = j;
            while k < self.lines.len() {
                depth += self.lines[k].matches('{').count() as i64;
                depth -= self.lines[k].matches('}').count() as i64;
                if depth == 0 {
                    // Resume at the block end so bodies are never re-scanned.
                    self.pos = k + 1;
                    return Some(TestBlock { start, end: k + 1 });
                }
                k += 1;
            }

            // Unbalanced to end-of-file: yield nothing, move past the macro.
            self.pos = start + 1;
        }
        None
    }
}

/* ============================================================
   Comment detection
   ============================================================ */

/// True if the nearest non-blank line above `start` opens or continues
/// a comment (`//`, `/*`, or a `*` continuation line).
pub fn has_preceding_comment(lines: &[String], start: usize) -> bool {
    let mut prev = start;
    while prev > 0 {
        prev -= 1;
        let trimmed = lines[prev].trim_start();
        if trimmed.is_empty() {
            continue;
        }
        return trimmed.starts_with("//")
            || trimmed.starts_with("/*")
            || trimmed.starts_with('*');
    }
    false
}

/* ============================================================
   Tests
   ============================================================ */

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(src: &str) -> Vec<String> {
        src.lines().map(str::to_string).collect()
    }

    #[test]
    fn single_balanced_test_yields_one_block() {
        let src = lines(
            "#include <gtest/gtest.h>\n\
             \n\
             TEST(Math, Adds) {\n\
             \x20 EXPECT_EQ(2 + 2, 4);\n\
             }\n",
        );
        let blocks: Vec<_> = find_test_blocks(&src).collect();
        assert_eq!(blocks, vec![TestBlock { start: 2, end: 5 }]);
    }

    #[test]
    fn same_line_opening_brace_is_matched() {
        let src = lines(
            "TEST(Math, Adds) {\n\
             \x20 EXPECT_EQ(2 + 2, 4);\n\
             }\n",
        );
        let blocks: Vec<_> = find_test_blocks(&src).collect();
        assert_eq!(blocks, vec![TestBlock { start: 0, end: 3 }]);
    }

    #[test]
    fn nested_braces_do_not_end_the_block_early() {
        let src = lines(
            "TEST_F(Fixture, Lambda) {\n\
             \x20 auto f = [] {\n\
             \x20   return 1;\n\
             \x20 };\n\
             \x20 EXPECT_EQ(f(), 1);\n\
             }\n",
        );
        let blocks: Vec<_> = find_test_blocks(&src).collect();
        assert_eq!(blocks, vec![TestBlock { start: 0, end: 6 }]);
    }

    #[test]
    fn scanning_resumes_after_each_block() {
        // The macro-shaped line inside the first body must not be
        // re-matched, since scanning resumes at the block end.
        let src = lines(
            "TEST(A, First) {\n\
             \x20 TEST(A, Ghost)\n\
             }\n\
             TEST(A, Second) {\n\
             }\n",
        );
        let blocks: Vec<_> = find_test_blocks(&src).collect();
        assert_eq!(
            blocks,
            vec![
                TestBlock { start: 0, end: 3 },
                TestBlock { start: 3, end: 5 },
            ]
        );
    }

    #[test]
    fn opening_brace_on_following_line_is_found() {
        let src = lines(
            "TEST_P(Suite, Param)\n\
             {\n\
             \x20 EXPECT_TRUE(true);\n\
             }\n",
        );
        let blocks: Vec<_> = find_test_blocks(&src).collect();
        assert_eq!(blocks, vec![TestBlock { start: 0, end: 4 }]);
    }

    #[test]
    fn macro_with_no_reachable_brace_stops_discovery() {
        let src = lines(
            "TEST(Tail, Malformed)\n\
             // end of file, no body\n",
        );
        let blocks: Vec<_> = find_test_blocks(&src).collect();
        assert!(blocks.is_empty());
    }

    #[test]
    fn non_macro_lines_are_ignored() {
        let src = lines(
            "int main() {\n\
             \x20 RUN_ALL_TESTS();\n\
             }\n\
             // TEST(Commented, Out) {}\n",
        );
        let blocks: Vec<_> = find_test_blocks(&src).collect();
        assert!(blocks.is_empty());
    }

    #[test]
    fn detects_line_comment_above() {
        let src = lines(
            "// verifies addition\n\
             TEST(Math, Adds) {\n\
             }\n",
        );
        assert!(has_preceding_comment(&src, 1));
    }

    #[test]
    fn blank_lines_are_skipped_when_looking_up() {
        let src = lines(
            "/* block comment */\n\
             \n\
             \n\
             TEST(Math, Adds) {\n\
             }\n",
        );
        assert!(has_preceding_comment(&src, 3));
    }

    #[test]
    fn continuation_star_counts_as_comment() {
        let src = lines(
            "/*\n\
             \x20* verifies addition\n\
             \x20*/\n\
             TEST(Math, Adds) {\n\
             }\n",
        );
        assert!(has_preceding_comment(&src, 3));
    }

    #[test]
    fn plain_code_above_is_not_a_comment() {
        let src = lines(
            "int helper();\n\
             TEST(Math, Adds) {\n\
             }\n",
        );
        assert!(!has_preceding_comment(&src, 1));
    }

    #[test]
    fn first_line_of_file_has_no_comment() {
        let src = lines("TEST(Math, Adds) {\n}\n");
        assert!(!has_preceding_comment(&src, 0));
    }
}
