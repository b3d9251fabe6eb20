//! XPath subset evaluator.
//!
//! Structural-path fingerprints are keyed by expressions like
//! `/html/body/div/ul/li[1]`, and selector maps built from them carry
//! XPath leaves. This module evaluates the location-path subset those maps
//! use against a `dom_query` document:
//!
//! - absolute (`/a/b`) and relative (`./a`) paths, `//` between steps
//! - name tests, `*`, `text()`, `node()`, `.`, `..`, `@attr`, `@*`
//! - axes `child::`, `descendant::`, `descendant-or-self::`, `self::`,
//!   `parent::`, `attribute::`
//! - predicates `[n]`, `[last()]`, `[@a]`, `[@a='v']`, `[text()='v']`,
//!   `[.='v']`, `[contains(@a|text()|., 'v')]`, `[starts-with(..., 'v')]`
//!
//! Anything else is rejected with [`Error::InvalidXPath`].

use std::collections::{HashMap, HashSet};

use crate::dom::{self, Document, NodeId, NodeRef};
use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Axis {
    Child,
    Descendant,
    DescendantOrSelf,
    SelfNode,
    Parent,
    Attribute,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum NodeTest {
    Name(String),
    AnyElement,
    Text,
    AnyNode,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Subject {
    Attr,
    Text,
    StringValue,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Op {
    Equals,
    Contains,
    StartsWith,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Predicate {
    Position(usize),
    Last,
    HasAttr(String),
    Compare {
        subject: Subject,
        attr: String,
        op: Op,
        value: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Step {
    axis: Axis,
    test: NodeTest,
    predicates: Vec<Predicate>,
}

impl Step {
    fn descendant_or_self() -> Self {
        Self {
            axis: Axis::DescendantOrSelf,
            test: NodeTest::AnyNode,
            predicates: Vec::new(),
        }
    }
}

/// A parsed XPath location path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XPath {
    source: String,
    steps: Vec<Step>,
}

/// Whether a selector string should be evaluated as XPath rather than CSS.
#[must_use]
pub fn looks_like_xpath(selector: &str) -> bool {
    let s = selector.trim_start();
    s.starts_with('/') || s.starts_with("./")
}

/// Parse and evaluate `expression`, returning one string per match.
pub fn select_texts(doc: &Document, expression: &str) -> Result<Vec<String>> {
    Ok(XPath::parse(expression)?.evaluate(doc))
}

impl XPath {
    /// Parse an expression in the supported subset.
    pub fn parse(expression: &str) -> Result<Self> {
        let mut parser = Parser::new(expression);
        let steps = parser.parse_path()?;
        Ok(Self {
            source: expression.trim().to_string(),
            steps,
        })
    }

    /// The expression as written.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Evaluate against `doc`, returning one string per match in document
    /// order: trimmed element text, trimmed non-blank text nodes, or
    /// attribute values.
    #[must_use]
    pub fn evaluate(&self, doc: &Document) -> Vec<String> {
        let root = doc.root();
        let order: HashMap<NodeId, usize> = dom::preorder(&root)
            .iter()
            .enumerate()
            .map(|(i, n)| (n.id, i))
            .collect();

        let mut context = vec![root];
        for (i, step) in self.steps.iter().enumerate() {
            if step.axis == Axis::Attribute {
                // Attribute steps are terminal
                if i + 1 != self.steps.len() {
                    return Vec::new();
                }
                return attribute_values(&context, &step.test);
            }
            context = apply_step(&context, step, &order);
        }

        context
            .iter()
            .filter_map(|node| {
                if node.is_text() {
                    let text = node.text();
                    let trimmed = text.trim();
                    (!trimmed.is_empty()).then(|| trimmed.to_string())
                } else {
                    Some(dom::text_content(node))
                }
            })
            .collect()
    }
}

fn matches_test(node: &NodeRef, test: &NodeTest) -> bool {
    match test {
        NodeTest::Name(name) => dom::tag_name(node).is_some_and(|t| t == *name),
        NodeTest::AnyElement => node.is_element(),
        NodeTest::Text => node.is_text(),
        NodeTest::AnyNode => true,
    }
}

fn axis_candidates<'a>(node: &NodeRef<'a>, axis: Axis) -> Vec<NodeRef<'a>> {
    match axis {
        Axis::Child => node.children(),
        Axis::Descendant => dom::preorder(node).into_iter().skip(1).collect(),
        Axis::DescendantOrSelf => dom::preorder(node),
        Axis::SelfNode => vec![*node],
        Axis::Parent => node.parent().into_iter().collect(),
        Axis::Attribute => Vec::new(),
    }
}

fn apply_step<'a>(
    context: &[NodeRef<'a>],
    step: &Step,
    order: &HashMap<NodeId, usize>,
) -> Vec<NodeRef<'a>> {
    let mut seen = HashSet::new();
    let mut out = Vec::new();

    for node in context {
        let mut candidates: Vec<NodeRef<'a>> = axis_candidates(node, step.axis)
            .into_iter()
            .filter(|n| matches_test(n, &step.test))
            .collect();
        for predicate in &step.predicates {
            candidates = apply_predicate(candidates, predicate);
        }
        for candidate in candidates {
            if seen.insert(candidate.id) {
                out.push(candidate);
            }
        }
    }

    out.sort_by_key(|n| order.get(&n.id).copied().unwrap_or(usize::MAX));
    out
}

fn apply_predicate<'a>(candidates: Vec<NodeRef<'a>>, predicate: &Predicate) -> Vec<NodeRef<'a>> {
    match predicate {
        Predicate::Position(n) => candidates.into_iter().nth(n - 1).into_iter().collect(),
        Predicate::Last => candidates.into_iter().last().into_iter().collect(),
        Predicate::HasAttr(name) => candidates
            .into_iter()
            .filter(|n| n.attr(name).is_some())
            .collect(),
        Predicate::Compare {
            subject,
            attr,
            op,
            value,
        } => candidates
            .into_iter()
            .filter(|n| compare(n, *subject, attr, *op, value))
            .collect(),
    }
}

fn compare(node: &NodeRef, subject: Subject, attr: &str, op: Op, value: &str) -> bool {
    let test = |haystack: &str| match op {
        Op::Equals => haystack == value,
        Op::Contains => haystack.contains(value),
        Op::StartsWith => haystack.starts_with(value),
    };
    match subject {
        Subject::Attr => node.attr(attr).is_some_and(|v| test(&*v)),
        Subject::Text => node
            .children()
            .iter()
            .filter(|c| c.is_text())
            .any(|c| test(c.text().trim())),
        Subject::StringValue => test(node.text().trim()),
    }
}

fn attribute_values(context: &[NodeRef], test: &NodeTest) -> Vec<String> {
    let mut out = Vec::new();
    for node in context.iter().filter(|n| n.is_element()) {
        match test {
            NodeTest::Name(name) => {
                if let Some(value) = node.attr(name) {
                    out.push(value.to_string());
                }
            }
            _ => out.extend(node.attrs().iter().map(|a| a.value.to_string())),
        }
    }
    out
}

// === Parsing ===

struct Parser<'s> {
    source: &'s str,
    chars: Vec<char>,
    pos: usize,
}

impl<'s> Parser<'s> {
    fn new(source: &'s str) -> Self {
        Self {
            source,
            chars: source.trim().chars().collect(),
            pos: 0,
        }
    }

    fn error(&self, reason: impl Into<String>) -> Error {
        Error::InvalidXPath {
            expression: self.source.to_string(),
            reason: format!("{} (at offset {})", reason.into(), self.pos),
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<char> {
        self.chars.get(self.pos + offset).copied()
    }

    fn eat(&mut self, c: char) -> bool {
        if self.peek() == Some(c) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn eat_str(&mut self, s: &str) -> bool {
        let len = s.chars().count();
        let matches = self
            .chars
            .get(self.pos..self.pos + len)
            .is_some_and(|slice| slice.iter().copied().eq(s.chars()));
        if matches {
            self.pos += len;
        }
        matches
    }

    fn skip_ws(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.pos += 1;
        }
    }

    fn expect(&mut self, c: char) -> Result<()> {
        self.skip_ws();
        if self.eat(c) {
            Ok(())
        } else {
            Err(self.error(format!("expected `{c}`")))
        }
    }

    fn parse_path(&mut self) -> Result<Vec<Step>> {
        if self.chars.is_empty() {
            return Err(self.error("empty expression"));
        }

        let mut steps = Vec::new();
        if self.eat_str("//") {
            steps.push(Step::descendant_or_self());
        } else if self.eat('/') && self.peek().is_none() {
            // Bare `/` selects the document node
            return Ok(steps);
        }

        loop {
            steps.push(self.parse_step()?);
            if self.peek().is_none() {
                break;
            }
            if self.eat_str("//") {
                steps.push(Step::descendant_or_self());
            } else if !self.eat('/') {
                return Err(self.error("expected `/` between steps"));
            }
        }
        Ok(steps)
    }

    fn parse_name(&mut self) -> String {
        let start = self.pos;
        while self
            .peek()
            .is_some_and(|c| c.is_alphanumeric() || matches!(c, '_' | '-' | '.'))
        {
            self.pos += 1;
        }
        self.chars[start..self.pos].iter().collect()
    }

    fn parse_axis(&mut self) -> Result<Option<Axis>> {
        let start = self.pos;
        let name = self.parse_name();
        if !self.eat_str("::") {
            self.pos = start;
            return Ok(None);
        }
        let axis = match name.as_str() {
            "child" => Axis::Child,
            "descendant" => Axis::Descendant,
            "descendant-or-self" => Axis::DescendantOrSelf,
            "self" => Axis::SelfNode,
            "parent" => Axis::Parent,
            "attribute" => Axis::Attribute,
            other => return Err(self.error(format!("unsupported axis `{other}`"))),
        };
        Ok(Some(axis))
    }

    fn parse_node_test(&mut self, axis: Axis) -> Result<NodeTest> {
        if self.eat('*') {
            return Ok(NodeTest::AnyElement);
        }
        let name = self.parse_name();
        if name.is_empty() {
            return Err(self.error("expected a node test"));
        }
        if axis != Axis::Attribute && self.eat_str("()") {
            return match name.as_str() {
                "text" => Ok(NodeTest::Text),
                "node" => Ok(NodeTest::AnyNode),
                other => Err(self.error(format!("unsupported node test `{other}()`"))),
            };
        }
        Ok(NodeTest::Name(name.to_ascii_lowercase()))
    }

    fn parse_step(&mut self) -> Result<Step> {
        if self.eat_str("..") {
            return Ok(Step {
                axis: Axis::Parent,
                test: NodeTest::AnyNode,
                predicates: Vec::new(),
            });
        }
        if self.peek() == Some('.') && self.peek_at(1) != Some('.') {
            self.pos += 1;
            return Ok(Step {
                axis: Axis::SelfNode,
                test: NodeTest::AnyNode,
                predicates: Vec::new(),
            });
        }

        let axis = if self.eat('@') {
            Axis::Attribute
        } else {
            self.parse_axis()?.unwrap_or(Axis::Child)
        };
        let test = self.parse_node_test(axis)?;

        let mut predicates = Vec::new();
        while self.eat('[') {
            if axis == Axis::Attribute {
                return Err(self.error("predicates on attribute steps are not supported"));
            }
            predicates.push(self.parse_predicate()?);
            self.expect(']')?;
        }

        Ok(Step {
            axis,
            test,
            predicates,
        })
    }

    fn parse_literal(&mut self) -> Result<String> {
        self.skip_ws();
        let Some(quote) = self.peek().filter(|c| *c == '\'' || *c == '"') else {
            return Err(self.error("expected a quoted string"));
        };
        self.pos += 1;
        let start = self.pos;
        while self.peek().is_some_and(|c| c != quote) {
            self.pos += 1;
        }
        if self.peek().is_none() {
            return Err(self.error("unterminated string"));
        }
        let value: String = self.chars[start..self.pos].iter().collect();
        self.pos += 1;
        Ok(value)
    }

    /// `@name`, `text()` or `.`, returning the subject and attribute name.
    fn parse_subject(&mut self) -> Result<(Subject, String)> {
        self.skip_ws();
        if self.eat('@') {
            let name = self.parse_name();
            if name.is_empty() {
                return Err(self.error("expected an attribute name"));
            }
            return Ok((Subject::Attr, name.to_ascii_lowercase()));
        }
        if self.eat_str("text()") {
            return Ok((Subject::Text, String::new()));
        }
        if self.eat('.') {
            return Ok((Subject::StringValue, String::new()));
        }
        Err(self.error("expected `@attr`, `text()` or `.`"))
    }

    fn parse_predicate(&mut self) -> Result<Predicate> {
        self.skip_ws();

        if self.peek().is_some_and(|c| c.is_ascii_digit()) {
            let start = self.pos;
            while self.peek().is_some_and(|c| c.is_ascii_digit()) {
                self.pos += 1;
            }
            let digits: String = self.chars[start..self.pos].iter().collect();
            return match digits.parse::<usize>() {
                Ok(n) if n >= 1 => Ok(Predicate::Position(n)),
                _ => Err(self.error(format!("invalid position `{digits}`"))),
            };
        }

        if self.eat_str("last()") {
            return Ok(Predicate::Last);
        }

        for (function, op) in [("contains(", Op::Contains), ("starts-with(", Op::StartsWith)] {
            if self.eat_str(function) {
                let (subject, attr) = self.parse_subject()?;
                self.expect(',')?;
                let value = self.parse_literal()?;
                self.expect(')')?;
                return Ok(Predicate::Compare {
                    subject,
                    attr,
                    op,
                    value,
                });
            }
        }

        let (subject, attr) = self.parse_subject()?;
        self.skip_ws();
        if self.eat('=') {
            let value = self.parse_literal()?;
            return Ok(Predicate::Compare {
                subject,
                attr,
                op: Op::Equals,
                value,
            });
        }
        match subject {
            Subject::Attr => Ok(Predicate::HasAttr(attr)),
            _ => Err(self.error("expected `=` after `text()` or `.`")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"<html><body>
        <div id="list">
            <ul>
                <li class="item"><a href="/a">Alpha</a> <span class="price">$5</span></li>
                <li class="item sale"><a href="/b">Beta</a> <span class="price">$7</span></li>
                <li class="item"><a href="/c">Gamma</a> <span class="price">$9</span></li>
            </ul>
        </div>
        <p>Footer <b>note</b></p>
    </body></html>"#;

    fn eval(expr: &str) -> Vec<String> {
        let doc = dom::parse(PAGE);
        select_texts(&doc, expr).unwrap_or_else(|e| panic!("{expr}: {e}"))
    }

    #[test]
    fn test_looks_like_xpath() {
        assert!(looks_like_xpath("/html/body"));
        assert!(looks_like_xpath("//li"));
        assert!(looks_like_xpath("  ./div"));
        assert!(!looks_like_xpath(".price"));
        assert!(!looks_like_xpath("div > p"));
    }

    #[test]
    fn test_absolute_path() {
        assert_eq!(eval("/html/body/div/ul/li/a"), vec!["Alpha", "Beta", "Gamma"]);
    }

    #[test]
    fn test_positional_predicate_is_per_parent() {
        assert_eq!(eval("/html/body/div/ul/li[1]/a"), vec!["Alpha"]);
        assert_eq!(eval("//li[last()]/a"), vec!["Gamma"]);
        assert_eq!(eval("//li/a[1]"), vec!["Alpha", "Beta", "Gamma"]);
    }

    #[test]
    fn test_attribute_predicates() {
        assert_eq!(eval("//div[@id='list']//span"), vec!["$5", "$7", "$9"]);
        assert_eq!(eval("//li[contains(@class, 'sale')]/a"), vec!["Beta"]);
        assert_eq!(eval("//a[starts-with(@href, '/c')]"), vec!["Gamma"]);
        assert_eq!(eval("//div[@id]/ul/li[2]/span"), vec!["$7"]);
    }

    #[test]
    fn test_text_predicates_and_steps() {
        assert_eq!(eval("//a[text()='Beta']/@href"), vec!["/b"]);
        assert_eq!(eval("//p/text()"), vec!["Footer"]);
        assert_eq!(eval("//p"), vec!["Footer note"]);
        assert_eq!(eval("//li[contains(., 'Gamma')]/span"), vec!["$9"]);
    }

    #[test]
    fn test_attribute_step() {
        assert_eq!(eval("//li/a/@href"), vec!["/a", "/b", "/c"]);
    }

    #[test]
    fn test_parent_and_self_steps() {
        assert_eq!(eval("//span[.='$7']/../a"), vec!["Beta"]);
        assert_eq!(eval("./html/body/p"), vec!["Footer note"]);
    }

    #[test]
    fn test_explicit_axes() {
        assert_eq!(eval("//ul/child::li[3]/descendant::a"), vec!["Gamma"]);
    }

    #[test]
    fn test_no_match_is_empty() {
        assert!(eval("//table/tr").is_empty());
    }

    #[test]
    fn test_document_order_with_nested_contexts() {
        let doc = dom::parse(r#"<div id="a"><div id="b"><p>1</p></div><p>2</p></div>"#);
        let out = select_texts(&doc, "//div/p").unwrap_or_default();
        assert_eq!(out, vec!["1", "2"]);
    }

    #[test]
    fn test_invalid_expressions() {
        for expr in ["", "/html/", "//li[", "//li[0]", "//li[@class=sale]", "//foo()", "//li[@a][", "//a/@href[1]", "ancestor::div"] {
            assert!(
                matches!(XPath::parse(expr), Err(Error::InvalidXPath { .. })),
                "{expr:?} should be rejected"
            );
        }
    }
}
