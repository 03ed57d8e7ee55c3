// src/manifest/template.rs

//! Argv templates and the action logic built from manifest steps.
//!
//! A template is literal text with `{axis}` placeholders; `{{` and `}}`
//! produce literal braces. Placeholders expand to the label of the value the
//! config assigns to that axis.

use std::sync::Arc;

use anyhow::anyhow;
use regex::Regex;

use crate::errors::{MatrixError, Result};
use crate::model::{ActionLogic, Command, CommandResult, CommandSequence, Config, Sequence, Step};

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Placeholder(String),
}

/// A parsed argv element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    segments: Vec<Segment>,
}

impl Template {
    pub fn parse(source: &str) -> Result<Self> {
        let invalid = |reason: &str| {
            MatrixError::ManifestError(format!("invalid template '{source}': {reason}"))
        };

        let mut segments = Vec::new();
        let mut literal = String::new();
        let mut chars = source.chars().peekable();

        while let Some(c) = chars.next() {
            match c {
                '{' if chars.peek() == Some(&'{') => {
                    chars.next();
                    literal.push('{');
                }
                '}' if chars.peek() == Some(&'}') => {
                    chars.next();
                    literal.push('}');
                }
                '{' => {
                    let mut name = String::new();
                    loop {
                        match chars.next() {
                            Some('}') => break,
                            Some('{') => return Err(invalid("nested '{'")),
                            Some(ch) => name.push(ch),
                            None => return Err(invalid("unclosed '{'")),
                        }
                    }
                    let name = name.trim();
                    if name.is_empty() {
                        return Err(invalid("empty placeholder"));
                    }
                    if !literal.is_empty() {
                        segments.push(Segment::Literal(std::mem::take(&mut literal)));
                    }
                    segments.push(Segment::Placeholder(name.to_string()));
                }
                '}' => return Err(invalid("unmatched '}'")),
                other => literal.push(other),
            }
        }
        if !literal.is_empty() {
            segments.push(Segment::Literal(literal));
        }
        Ok(Self { segments })
    }

    /// Axis names referenced by the template, in order of appearance.
    pub fn placeholders(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().filter_map(|s| match s {
            Segment::Placeholder(name) => Some(name.as_str()),
            Segment::Literal(_) => None,
        })
    }

    pub fn render(&self, config: &Config) -> Result<String> {
        let mut out = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Placeholder(axis) => out.push_str(&config.value(axis)?.label()),
            }
        }
        Ok(out)
    }
}

/// Per-axis patterns that must all match.
#[derive(Debug, Clone, Default)]
pub struct Guard {
    patterns: Vec<(String, Regex)>,
}

impl Guard {
    pub fn new(patterns: Vec<(String, Regex)>) -> Self {
        Self { patterns }
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// An empty guard matches every config.
    pub fn matches(&self, config: &Config) -> bool {
        self.patterns
            .iter()
            .all(|(axis, re)| config.get(axis).is_some_and(|v| v.is_match(re)))
    }
}

/// One manifest step, ready to render.
#[derive(Debug, Clone)]
pub struct StepTemplate {
    pub argv: Vec<Template>,
    pub shell: bool,
    pub exit_codes: Vec<i32>,
    pub when: Guard,
    pub continue_on_failure: bool,
}

impl StepTemplate {
    fn command(&self, name: &str, config: &Config) -> Result<Command> {
        let argv = self
            .argv
            .iter()
            .map(|t| t.render(config))
            .collect::<Result<Vec<_>>>()?;
        Ok(Command::new(config, argv)
            .with_name(name)
            .needs_shell(self.shell)
            .exit_codes(self.exit_codes.iter().copied()))
    }
}

/// Action logic declared in a manifest.
#[derive(Debug, Clone)]
pub struct TemplateAction {
    name: String,
    when: Guard,
    steps: Arc<[StepTemplate]>,
}

impl TemplateAction {
    pub fn new(name: impl Into<String>, when: Guard, steps: Vec<StepTemplate>) -> Self {
        Self {
            name: name.into(),
            when,
            steps: Arc::from(steps),
        }
    }
}

impl ActionLogic for TemplateAction {
    fn start(&self, config: &Config) -> anyhow::Result<Box<dyn CommandSequence>> {
        if !self.when.matches(config) {
            return Ok(Box::new(Sequence::empty()));
        }
        Ok(Box::new(StepSequence {
            name: self.name.clone(),
            config: config.clone(),
            steps: Arc::clone(&self.steps),
            next: 0,
            last: None,
        }))
    }
}

struct StepSequence {
    name: String,
    config: Config,
    steps: Arc<[StepTemplate]>,
    next: usize,
    /// Step that produced the most recent result.
    last: Option<usize>,
}

impl CommandSequence for StepSequence {
    fn resume(&mut self, results: &[CommandResult]) -> anyhow::Result<Step> {
        if let (Some(last), Some(result)) = (self.last, results.last()) {
            let keep_going = self.steps.get(last).is_some_and(|s| s.continue_on_failure);
            if !result.success() && !keep_going {
                return Ok(Step::Done);
            }
        }

        while let Some(step) = self.steps.get(self.next) {
            let index = self.next;
            self.next += 1;
            if !step.when.matches(&self.config) {
                continue;
            }
            let command = step
                .command(&self.name, &self.config)
                .map_err(|e| anyhow!("step {} of '{}': {e}", index + 1, self.name))?;
            self.last = Some(index);
            return Ok(Step::Run(command));
        }
        Ok(Step::Done)
    }
}
