//! Test harness for running fixture cases, plain and wrapped

use crate::common::{ExpectedToken, Gen, TestCase};
use doctoken_core::{Node, TokenKind, TreeParser};

/// Result of running a test
#[derive(Debug)]
pub struct TestResult {
    pub passed: bool,
    pub tree: Node,
    pub expected: Vec<String>,
    pub actual: Vec<String>,
    pub seed: u64,
    pub errors: Vec<String>,
}

/// Drain the parser, formatting each token as it is produced. A traversal
/// error becomes a final `Error "<message>"` entry.
fn collect_tokens(tree: &Node) -> Vec<String> {
    let mut parser = match TreeParser::new(tree) {
        Ok(parser) => parser,
        Err(err) => return vec![format!("Error {:?}", err.to_string())],
    };
    let mut out = Vec::new();
    loop {
        match parser.next_token() {
            Ok(Some(token)) => out.push(format_token(&parser, token)),
            Ok(None) => break,
            Err(err) => {
                out.push(format!("Error {:?}", err.to_string()));
                break;
            }
        }
    }
    out
}

/// Format token for comparison. Structure, null and boolean tokens are bare;
/// the rest carry their text when they have one.
fn format_token(parser: &TreeParser<'_>, token: TokenKind) -> String {
    let bare = token.is_structure_start()
        || token.is_structure_end()
        || matches!(
            token,
            TokenKind::ValueNull | TokenKind::ValueTrue | TokenKind::ValueFalse
        );
    match parser.text() {
        Some(text) if !bare => format!("{} {:?}", token, text),
        _ => token.to_string(),
    }
}

/// Format expected token for comparison
fn format_expected(token: &ExpectedToken) -> String {
    if token.name() != "Error" {
        assert!(
            TokenKind::from_name(token.name()).is_some(),
            "unknown token name in fixture: {}",
            token.name()
        );
    }
    match token.text() {
        Some(text) => format!("{} {:?}", token.name(), text),
        None => token.name().to_string(),
    }
}

/// Run a single test case (canonical, no variations)
pub fn run_test(case: &TestCase) -> TestResult {
    let tree = case.node();
    let actual = collect_tokens(&tree);
    let expected: Vec<String> = case.tokens.iter().map(format_expected).collect();

    let mut errors = Vec::new();

    if actual.len() != expected.len() {
        errors.push(format!(
            "Token count mismatch: expected {}, got {}",
            expected.len(),
            actual.len()
        ));
    }

    for (i, (act, exp)) in actual.iter().zip(expected.iter()).enumerate() {
        if act != exp {
            errors.push(format!("Token {}: expected '{}', got '{}'", i, exp, act));
        }
    }

    TestResult {
        passed: errors.is_empty(),
        tree,
        expected,
        actual,
        seed: 0,
        errors,
    }
}

/// Run test with stochastic variations
///
/// Nests the case's tree one or more levels deep inside random arrays and
/// documents, with random filler siblings on either side.
pub fn run_with_variations(case: &TestCase, gen: &mut Gen) -> TestResult {
    let mut tree = case.node();
    let levels = 1 + gen.geometric(0.5);
    for _ in 0..levels {
        tree = gen.wrap(tree);
    }

    let actual = collect_tokens(&tree);
    let expected: Vec<String> = case.tokens.iter().map(format_expected).collect();

    // The wrapping context adds tokens around the case's own, so the
    // expected stream only has to appear in order.
    let mut errors = Vec::new();
    let mut exp_idx = 0;

    for act in &actual {
        if exp_idx < expected.len() && act == &expected[exp_idx] {
            exp_idx += 1;
        }
    }

    if exp_idx < expected.len() {
        errors.push(format!(
            "Missing expected tokens starting at index {}: {:?}",
            exp_idx,
            &expected[exp_idx..]
        ));
    }

    for act in &actual {
        if act.starts_with("Error") && !expected.iter().any(|e| e.starts_with("Error")) {
            errors.push(format!("Unexpected error: {}", act));
        }
    }

    TestResult {
        passed: errors.is_empty(),
        tree,
        expected,
        actual,
        seed: gen.seed,
        errors,
    }
}

impl TestResult {
    /// Print detailed failure info
    pub fn print_failure(&self, case_id: &str) {
        eprintln!("\n=== FAILED: {} ===", case_id);
        eprintln!(
            "Seed: {} (set DOCTOKEN_TEST_SEED={} to reproduce)",
            self.seed, self.seed
        );
        eprintln!("\nTree:");
        eprintln!("{:#?}", self.tree);
        eprintln!("\nExpected tokens:");
        for (i, e) in self.expected.iter().enumerate() {
            eprintln!("  {}: {}", i, e);
        }
        eprintln!("\nActual tokens:");
        for (i, e) in self.actual.iter().enumerate() {
            eprintln!("  {}: {}", i, e);
        }
        eprintln!("\nErrors:");
        for e in &self.errors {
            eprintln!("  - {}", e);
        }
    }
}
