//! Scripted [`CommandRunner`] for tests: canned outcomes, recorded calls.

use std::cell::RefCell;
use std::io::ErrorKind;

use super::{CommandRunner, Invocation, Outcome};
use crate::error::RunnerError;

#[derive(Debug, Clone)]
enum Response {
    Outcome(Outcome),
    Missing,
}

#[derive(Debug, Clone)]
struct Rule {
    program: String,
    args_prefix: Vec<String>,
    response: Response,
}

impl Rule {
    fn matches(&self, invocation: &Invocation) -> bool {
        if invocation.program_name() != self.program {
            return false;
        }
        if invocation.args.len() < self.args_prefix.len() {
            return false;
        }
        self.args_prefix
            .iter()
            .zip(&invocation.args)
            .all(|(want, got)| got.to_string_lossy() == want.as_str())
    }
}

/// Answers invocations from a rule list; the first matching rule wins.
///
/// Unmatched invocations fail to spawn, like a missing binary.
#[derive(Debug, Default)]
pub struct ScriptedRunner {
    rules: Vec<Rule>,
    calls: RefCell<Vec<Invocation>>,
}

impl ScriptedRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer `program <args_prefix...>` with `outcome`.
    pub fn on(mut self, program: &str, args_prefix: &[&str], outcome: Outcome) -> Self {
        self.rules.push(Rule {
            program: program.to_string(),
            args_prefix: args_prefix.iter().map(|a| a.to_string()).collect(),
            response: Response::Outcome(outcome),
        });
        self
    }

    /// Make `program` fail to spawn.
    pub fn missing(mut self, program: &str) -> Self {
        self.rules.push(Rule {
            program: program.to_string(),
            args_prefix: Vec::new(),
            response: Response::Missing,
        });
        self
    }

    /// Every invocation seen so far, in order.
    pub fn calls(&self) -> Vec<Invocation> {
        self.calls.borrow().clone()
    }

    /// Argument vectors of every invocation of `program`, in order.
    pub fn calls_to(&self, program: &str) -> Vec<Vec<String>> {
        self.calls
            .borrow()
            .iter()
            .filter(|inv| inv.program_name() == program)
            .map(|inv| {
                inv.args
                    .iter()
                    .map(|a| a.to_string_lossy().into_owned())
                    .collect()
            })
            .collect()
    }
}

impl CommandRunner for ScriptedRunner {
    fn run(&self, invocation: &Invocation) -> Result<Outcome, RunnerError> {
        self.calls.borrow_mut().push(invocation.clone());
        let response = self
            .rules
            .iter()
            .find(|rule| rule.matches(invocation))
            .map(|rule| rule.response.clone())
            .unwrap_or(Response::Missing);
        match response {
            Response::Outcome(outcome) => Ok(outcome),
            Response::Missing => Err(RunnerError::Spawn {
                program: invocation.program_name(),
                source: std::io::Error::new(ErrorKind::NotFound, "no scripted response"),
            }),
        }
    }
}
