//! Test-runner invocation building.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::catalog::SelectedClasses;
use crate::error::Result;

/// Interpreter-module prefix for every built command.
///
/// The runner is always invoked through the interpreter rather than as a
/// bare `pytest` executable, avoiding PATH-resolution ambiguity.
const RUNNER_PREFIX: [&str; 3] = ["python", "-m", "pytest"];

/// Fixed execution flags applied to every invocation.
const POLICY_FLAGS: [&str; 2] = ["-v", "--color=yes"];

/// A concrete, ready-to-run test-execution command.
///
/// Pure derived value: an ordered token list plus a marker distinguishing a
/// filtered selection from the full-suite fallback.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Invocation {
    tokens: Vec<String>,
    filtered: bool,
}

impl Invocation {
    /// Build a filtered invocation from the selected classes.
    ///
    /// File targets are the de-duplicated file parts of the class ids; the
    /// class filter is an OR disjunction of the distinct class names, applied
    /// via `-k` as a name filter rather than path-qualified selection
    /// (path-qualified `file::Class` targets conflict with the file-target
    /// list when one file contributes several selected classes). Two
    /// differently-owned classes sharing a name across files will both run;
    /// that over-selection is accepted.
    ///
    /// An empty selection yields the full-suite fallback. A class id without
    /// exactly one `::` separator is a fatal input-contract violation.
    pub fn build(classes: &SelectedClasses) -> Result<Self> {
        if classes.is_empty() {
            return Ok(Self::full_suite());
        }

        let mut files = BTreeSet::new();
        let mut class_names = BTreeSet::new();

        for id in classes {
            let (file, class) = id.split()?;
            files.insert(file.to_string());
            class_names.insert(class.to_string());
        }

        let mut tokens: Vec<String> = RUNNER_PREFIX.iter().map(|t| t.to_string()).collect();
        tokens.extend(files);

        let disjunction = class_names.into_iter().collect::<Vec<_>>().join(" or ");
        tokens.push("-k".to_string());
        tokens.push(format!("({disjunction})"));

        tokens.extend(POLICY_FLAGS.iter().map(|t| t.to_string()));

        Ok(Self {
            tokens,
            filtered: true,
        })
    }

    /// The unfiltered full-suite invocation (fallback when nothing selects).
    pub fn full_suite() -> Self {
        let mut tokens: Vec<String> = RUNNER_PREFIX.iter().map(|t| t.to_string()).collect();
        tokens.extend(POLICY_FLAGS.iter().map(|t| t.to_string()));
        Self {
            tokens,
            filtered: false,
        }
    }

    /// The baseline-capable full-suite invocation used by the `baseline`
    /// subcommand.
    pub fn baseline() -> Self {
        Self::full_suite()
    }

    /// Ordered command tokens; the first token is the executable.
    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    /// Whether this invocation carries a class filter (false = full suite).
    pub fn is_filtered(&self) -> bool {
        self.filtered
    }

    /// Single-line shell-style form of the command.
    pub fn command_line(&self) -> String {
        self.tokens.join(" ")
    }

    /// Multi-line human-readable preview with an execution hint.
    pub fn render_preview(&self, hint: &str) -> String {
        let mut out = String::from("=== TSELECT COMMAND ===\n\n");
        out.push_str("pytest \\\n");
        // Skip the interpreter-module prefix; it is implied by the header.
        for token in self.tokens.iter().skip(RUNNER_PREFIX.len()) {
            out.push_str(&format!("  {token} \\\n"));
        }
        out.push_str("\nTo execute:\n");
        out.push_str(hint);
        out.push('\n');
        out
    }
}
