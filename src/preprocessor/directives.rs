//! Conditional-compilation tree built from raw header text
//!
//! The header is split into lines and arranged into a tree: plain text lines,
//! and conditional blocks holding a then-branch and an optional else-branch.
//! `#elif` is stored as an else-branch containing a nested conditional that
//! shares the enclosing `#endif`. Evaluation walks the tree for a given
//! symbol table and concatenates the surviving text in source order.

use log::debug;

use super::expr::{is_identifier, parse_condition, PreprocessorExpr};
use super::symbols::{SymbolTable, SymbolValue};
use super::PreprocessorConfig;
use crate::error::PreprocessorError;

/// A node of the directive tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// One source line, without its newline
    Text(String),
    Conditional(Conditional),
    Define {
        name: String,
        value: SymbolValue,
        line: usize,
        span: usize,
    },
    Undef {
        name: String,
        line: usize,
        span: usize,
    },
    /// Any other directive (#include, #pragma, #error, ...), dropped from output
    Other {
        directive: String,
        line: usize,
        span: usize,
    },
}

/// `#if`/`#ifdef`/`#ifndef`/`#elif` block
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conditional {
    pub directive: String,
    pub condition: PreprocessorExpr,
    /// 1-based line of the opening directive
    pub line: usize,
    pub then_branch: Vec<Node>,
    pub else_branch: Option<Vec<Node>>,
    /// Physical lines taken by the opening, `#else` and `#endif` directives
    span: usize,
    else_span: usize,
    endif_span: usize,
}

/// Parsed header ready for evaluation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreprocessorFile {
    pub nodes: Vec<Node>,
}

/// A logical line: continuation lines of a directive are joined
struct Line {
    text: String,
    number: usize,
    span: usize,
    /// Starts inside a `/* ... */` comment, so it cannot be a directive
    in_comment: bool,
}

/// Block still waiting for its #endif
struct OpenBlock {
    directive: String,
    condition: PreprocessorExpr,
    line: usize,
    span: usize,
    then_branch: Vec<Node>,
    else_branch: Option<Vec<Node>>,
    else_span: usize,
    /// Opened by #elif, closed by the parent's #endif
    chained: bool,
}

impl OpenBlock {
    fn new(directive: &str, condition: PreprocessorExpr, line: &Line, chained: bool) -> Self {
        Self {
            directive: directive.to_string(),
            condition,
            line: line.number,
            span: line.span,
            then_branch: Vec::new(),
            else_branch: None,
            else_span: 0,
            chained,
        }
    }

    fn close(self, endif_span: usize) -> Conditional {
        Conditional {
            directive: self.directive,
            condition: self.condition,
            line: self.line,
            then_branch: self.then_branch,
            else_branch: self.else_branch,
            span: self.span,
            else_span: self.else_span,
            endif_span,
        }
    }

    fn target(&mut self) -> &mut Vec<Node> {
        match &mut self.else_branch {
            Some(branch) => branch,
            None => &mut self.then_branch,
        }
    }
}

/// Builds the tree with a stack of open blocks
struct TreeBuilder {
    root: Vec<Node>,
    stack: Vec<OpenBlock>,
}

impl TreeBuilder {
    fn push(&mut self, node: Node) {
        match self.stack.last_mut() {
            Some(block) => block.target().push(node),
            None => self.root.push(node),
        }
    }

    fn open(&mut self, block: OpenBlock) {
        self.stack.push(block);
    }

    /// Switch the innermost block to its else-branch
    fn enter_else(&mut self, directive: &str, line: &Line) -> Result<(), PreprocessorError> {
        let block = self
            .stack
            .last_mut()
            .ok_or_else(|| PreprocessorError::UnbalancedElse {
                directive: directive.to_string(),
                line: line.number,
            })?;

        if block.else_branch.is_some() {
            return Err(PreprocessorError::BranchAfterElse {
                directive: directive.to_string(),
                line: line.number,
            });
        }

        block.else_branch = Some(Vec::new());
        // An #elif line belongs to the nested block it opens
        block.else_span = if directive == "elif" { 0 } else { line.span };
        Ok(())
    }

    /// Close the innermost block and every #elif chained onto it
    fn close(&mut self, line: &Line) -> Result<(), PreprocessorError> {
        let mut block = self
            .stack
            .pop()
            .ok_or(PreprocessorError::UnbalancedEndif { line: line.number })?;

        while block.chained {
            let nested = block.close(0);
            block = self
                .stack
                .pop()
                .ok_or(PreprocessorError::UnbalancedEndif { line: line.number })?;
            block.target().push(Node::Conditional(nested));
        }

        let conditional = block.close(line.span);
        self.push(Node::Conditional(conditional));
        Ok(())
    }

    /// An unclosed `#elif` chain is reported at the `#if` that opened it
    fn finish(self) -> Result<Vec<Node>, PreprocessorError> {
        let opener = self
            .stack
            .iter()
            .rev()
            .find(|block| !block.chained)
            .or(self.stack.last());
        match opener {
            Some(block) => Err(PreprocessorError::UnclosedBlock {
                directive: block.directive.clone(),
                line: block.line,
            }),
            None => Ok(self.root),
        }
    }
}

impl PreprocessorFile {
    /// Parse raw header text into a directive tree
    pub fn parse(text: &str) -> Result<Self, PreprocessorError> {
        let mut builder = TreeBuilder {
            root: Vec::new(),
            stack: Vec::new(),
        };

        for line in logical_lines(text) {
            let directive = if line.in_comment {
                None
            } else {
                split_directive(&line.text)
            };
            let Some((directive, args)) = directive else {
                builder.push(Node::Text(line.text));
                continue;
            };

            match directive.as_str() {
                "if" | "elif" => {
                    let condition = parse_condition(&args).map_err(|message| {
                        PreprocessorError::InvalidExpression {
                            line: line.number,
                            message,
                        }
                    })?;
                    let chained = directive == "elif";
                    if chained {
                        builder.enter_else(&directive, &line)?;
                    }
                    builder.open(OpenBlock::new(&directive, condition, &line, chained));
                }
                "ifdef" | "ifndef" => {
                    let name = first_symbol(&args, &directive, &line)?;
                    let condition = if directive == "ifdef" {
                        PreprocessorExpr::defined(&name)
                    } else {
                        PreprocessorExpr::not_defined(&name)
                    };
                    builder.open(OpenBlock::new(&directive, condition, &line, false));
                }
                "else" => builder.enter_else("else", &line)?,
                "endif" => builder.close(&line)?,
                "define" => {
                    let name = first_symbol(&args, "define", &line)?;
                    // Function-like macros keep only their name
                    let rest = args[name.len()..].trim_start();
                    let value = if rest.starts_with('(') {
                        SymbolValue::True
                    } else {
                        SymbolValue::from_definition(rest)
                    };
                    builder.push(Node::Define {
                        name,
                        value,
                        line: line.number,
                        span: line.span,
                    });
                }
                "undef" => {
                    let name = first_symbol(&args, "undef", &line)?;
                    builder.push(Node::Undef {
                        name,
                        line: line.number,
                        span: line.span,
                    });
                }
                _ => builder.push(Node::Other {
                    directive,
                    line: line.number,
                    span: line.span,
                }),
            }
        }

        Ok(Self {
            nodes: builder.finish()?,
        })
    }

    /// Flatten the tree for one configuration
    pub fn eval(&self, config: &PreprocessorConfig) -> String {
        let mut evaluator = Evaluator {
            symbols: config.symbols.clone(),
            preserve_lines: config.preserve_lines,
            output: String::new(),
        };
        evaluator.walk(&self.nodes, true);
        evaluator.output
    }
}

struct Evaluator {
    /// Working copy: #define/#undef in active branches update it
    symbols: SymbolTable,
    preserve_lines: bool,
    output: String,
}

impl Evaluator {
    fn walk(&mut self, nodes: &[Node], active: bool) {
        for node in nodes {
            match node {
                Node::Text(text) => {
                    if active {
                        self.output.push_str(text);
                        self.output.push('\n');
                    } else {
                        self.blank(1);
                    }
                }
                Node::Conditional(conditional) => self.walk_conditional(conditional, active),
                Node::Define {
                    name, value, span, ..
                } => {
                    if active {
                        self.symbols.define(name, *value);
                    }
                    self.blank(*span);
                }
                Node::Undef { name, span, .. } => {
                    if active {
                        self.symbols.undefine(name);
                    }
                    self.blank(*span);
                }
                Node::Other { span, .. } => self.blank(*span),
            }
        }
    }

    fn walk_conditional(&mut self, conditional: &Conditional, active: bool) {
        let taken = active && conditional.condition.eval(&self.symbols);
        if active {
            debug!(
                "line {}: #{} {:?} -> {}",
                conditional.line,
                conditional.directive,
                conditional.condition,
                if taken { "then" } else { "else" }
            );
        }

        self.blank(conditional.span);
        self.walk(&conditional.then_branch, taken);
        if let Some(else_branch) = &conditional.else_branch {
            self.blank(conditional.else_span);
            self.walk(else_branch, active && !taken);
        }
        self.blank(conditional.endif_span);
    }

    /// Stand-in for dropped lines when line numbers are preserved
    fn blank(&mut self, lines: usize) {
        if self.preserve_lines {
            for _ in 0..lines {
                self.output.push('\n');
            }
        }
    }
}

/// Split text into lines, joining backslash continuations of directives
fn logical_lines(text: &str) -> Vec<Line> {
    let mut lines = Vec::new();
    let mut physical = text.lines().enumerate();
    let mut in_comment = false;

    while let Some((index, first)) = physical.next() {
        let mut line = Line {
            text: first.to_string(),
            number: index + 1,
            span: 1,
            in_comment,
        };

        if !in_comment && line.text.trim_start().starts_with('#') {
            while line.text.ends_with('\\') {
                line.text.pop();
                match physical.next() {
                    Some((_, next)) => {
                        line.text.push(' ');
                        line.text.push_str(next);
                        line.span += 1;
                    }
                    None => break,
                }
            }
        }

        in_comment = ends_in_comment(&line.text, in_comment);
        lines.push(line);
    }

    lines
}

/// Whether a block comment is still open at the end of `text`
fn ends_in_comment(text: &str, mut in_comment: bool) -> bool {
    let mut rest = text;
    loop {
        if in_comment {
            match rest.find("*/") {
                Some(end) => {
                    rest = &rest[end + 2..];
                    in_comment = false;
                }
                None => return true,
            }
        } else {
            match (rest.find("/*"), rest.find("//")) {
                (Some(block), Some(line)) if line < block => return false,
                (Some(block), _) => {
                    rest = &rest[block + 2..];
                    in_comment = true;
                }
                (None, _) => return false,
            }
        }
    }
}

/// `#  name args` -> (name, args without comments)
fn split_directive(text: &str) -> Option<(String, String)> {
    let rest = text.trim_start().strip_prefix('#')?.trim_start();
    let end = rest
        .find(|c: char| !c.is_ascii_alphanumeric() && c != '_')
        .unwrap_or(rest.len());
    let (name, args) = rest.split_at(end);
    Some((name.to_string(), strip_comments(args).trim().to_string()))
}

fn strip_comments(text: &str) -> String {
    let mut result = String::new();
    let mut rest = text;

    loop {
        let line_comment = rest.find("//");
        let block_comment = rest.find("/*");
        match (line_comment, block_comment) {
            (Some(l), Some(b)) if l < b => {
                result.push_str(&rest[..l]);
                return result;
            }
            (Some(l), None) => {
                result.push_str(&rest[..l]);
                return result;
            }
            (_, Some(b)) => {
                result.push_str(&rest[..b]);
                result.push(' ');
                match rest[b + 2..].find("*/") {
                    Some(end) => rest = &rest[b + 2 + end + 2..],
                    None => return result,
                }
            }
            (None, None) => {
                result.push_str(rest);
                return result;
            }
        }
    }
}

fn first_symbol(args: &str, directive: &str, line: &Line) -> Result<String, PreprocessorError> {
    let end = args
        .find(|c: char| !c.is_ascii_alphanumeric() && c != '_')
        .unwrap_or(args.len());
    let name = &args[..end];

    if is_identifier(name) {
        Ok(name.to_string())
    } else {
        Err(PreprocessorError::MissingSymbol {
            directive: directive.to_string(),
            line: line.number,
        })
    }
}
