//! Filter expressions: `column comparator literal` pairs joined by AND/OR.
//!
//! # Grammar
//!
//! ```text
//! filter     := pair (WS connective WS pair)*
//! pair       := column WS? comparator WS? literal
//! column     := [A-Za-z_][A-Za-z0-9_]*
//! comparator := "=" | "!=" | ">" | ">=" | "<" | "<="
//! literal    := "'" [^']* "'" | [0-9]{1,15} ("." [0-9]{1,15})?
//! connective := "AND" | "OR"            (case-insensitive)
//! ```
//!
//! Quoted strings only accept `=` and `!=`. Numbers accept every comparator
//! except `!=`.
//!
//! # Validation order
//!
//! 1. Lexing and grouping into pairs and connectives (syntax)
//! 2. At least one pair, and exactly one connective between consecutive pairs
//! 3. Every column is in the allow-list
//! 4. Every literal is a single-quoted string or a number within limits
//! 5. Every comparator is valid for its literal kind
//!
//! Column, comparator and literal of a pair always come from the same parsed
//! item.

use crate::column::check_column;
use crate::error::{Expected, ValidationError};
use crate::lex::{Token, TokenKind, tokenize};
use crate::literal::{Literal, LiteralKind, classify_literal, within_digit_limits};
use crate::vocab::{Comparator, Connective};
use std::fmt;

/// One `column comparator literal` triple.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub struct FilterPair {
    /// Column on the left-hand side.
    pub column: String,
    /// Comparator between column and literal.
    pub comparator: Comparator,
    /// Literal on the right-hand side.
    pub literal: Literal,
}

impl FilterPair {
    /// Create a filter pair.
    #[must_use]
    pub fn new(column: impl Into<String>, comparator: Comparator, literal: Literal) -> Self {
        Self {
            column: column.into(),
            comparator,
            literal,
        }
    }
}

impl fmt::Display for FilterPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.column, self.comparator, self.literal)
    }
}

/// A validated filter expression.
///
/// Invariant: `connectives.len() == pairs.len().saturating_sub(1)`. The
/// connective at index `i` joins `pairs[i]` and `pairs[i + 1]`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[non_exhaustive]
pub struct FilterExpression {
    /// Pairs in order of appearance.
    pub pairs: Vec<FilterPair>,
    /// Connectives in order of appearance.
    pub connectives: Vec<Connective>,
}

impl FilterExpression {
    /// Whether the expression has no pairs (empty `filter` parameter).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Number of pairs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    /// Columns referenced by the expression, in order, duplicates included.
    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.pairs.iter().map(|p| p.column.as_str())
    }

    /// Pairs with the connective that precedes them (`None` for the first).
    ///
    /// ```
    /// use listq::{Connective, validate_filter};
    ///
    /// let expr = validate_filter(&["id"], "id=1 OR id=2").unwrap();
    /// let terms: Vec<_> = expr.terms().map(|(c, p)| (c, p.literal.as_str())).collect();
    /// assert_eq!(terms, vec![(None, "1"), (Some(Connective::Or), "2")]);
    /// ```
    pub fn terms(&self) -> impl Iterator<Item = (Option<Connective>, &FilterPair)> {
        let leading = std::iter::once(None).chain(self.connectives.iter().copied().map(Some));
        leading.zip(&self.pairs)
    }
}

impl fmt::Display for FilterExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (connective, pair) in self.terms() {
            if let Some(connective) = connective {
                write!(f, " {connective} ")?;
            }
            write!(f, "{pair}")?;
        }
        Ok(())
    }
}

/// Validate a filter expression against an allow-list.
///
/// An empty allow-list always rejects; an empty expression is accepted as
/// "no filter".
///
/// ```
/// use listq::{ErrorKind, validate_filter};
///
/// let expr = validate_filter(&["id", "name"], "id=1 AND name='Alice'").unwrap();
/// assert_eq!(expr.len(), 2);
///
/// let err = validate_filter(&["id"], "id=1 AND").unwrap_err();
/// assert_eq!(err.kind(), ErrorKind::CardinalityMismatch);
/// ```
pub fn validate_filter<S: AsRef<str>>(
    allow_list: &[S],
    raw: &str,
) -> Result<FilterExpression, ValidationError> {
    if allow_list.is_empty() {
        return Err(ValidationError::EmptyAllowList);
    }
    if raw.is_empty() {
        return Ok(FilterExpression::default());
    }

    let structure = parse_structure(raw)?;
    for pair in &structure.pairs {
        check_column(pair.column.text, allow_list)?;
    }
    structure.resolve()
}

/// Boolean form of [`validate_filter`].
#[inline]
#[must_use]
pub fn is_valid_filter<S: AsRef<str>>(allow_list: &[S], raw: &str) -> bool {
    validate_filter(allow_list, raw).is_ok()
}

/// Parse a filter expression without an allow-list.
///
/// Runs every check of [`validate_filter`] except the column gate. An empty
/// string parses to an empty expression.
pub fn parse_filter(raw: &str) -> Result<FilterExpression, ValidationError> {
    if raw.is_empty() {
        return Ok(FilterExpression::default());
    }
    parse_structure(raw)?.resolve()
}

// =============================================================================
// Structural parsing
// =============================================================================

/// A pair before literal classification.
#[derive(Debug)]
struct RawPair<'a> {
    column: Token<'a>,
    comparator: Comparator,
    literal: Token<'a>,
}

#[derive(Debug)]
enum Item<'a> {
    Pair(RawPair<'a>),
    Connective {
        connective: Connective,
        token: Token<'a>,
        /// Whitespace on both sides.
        surrounded: bool,
    },
}

/// Pairs and connectives that passed the syntax and cardinality checks.
#[derive(Debug)]
struct Structure<'a> {
    pairs: Vec<RawPair<'a>>,
    connectives: Vec<Connective>,
}

fn parse_structure(raw: &str) -> Result<Structure<'_>, ValidationError> {
    let tokens = tokenize(raw)?;
    let items = group_items(raw, &tokens)?;

    let pair_count = items
        .iter()
        .filter(|item| matches!(item, Item::Pair(_)))
        .count();
    let connective_count = items.len() - pair_count;

    if pair_count == 0 {
        let (position, found) = tokens.first().map_or((raw.len(), ""), |t| (t.start, t.text));
        return Err(ValidationError::syntax(position, found, Expected::Column));
    }
    if connective_count != pair_count - 1 {
        return Err(ValidationError::CardinalityMismatch {
            counted: "connectives",
            expected: pair_count - 1,
            found: connective_count,
        });
    }

    let mut structure = Structure {
        pairs: Vec::with_capacity(pair_count),
        connectives: Vec::with_capacity(connective_count),
    };
    for (index, item) in items.into_iter().enumerate() {
        match (index % 2 == 0, item) {
            (true, Item::Pair(pair)) => structure.pairs.push(pair),
            (false, Item::Connective { connective, token, surrounded }) => {
                if !surrounded {
                    return Err(ValidationError::syntax(
                        token.start,
                        token.text,
                        Expected::Whitespace,
                    ));
                }
                structure.connectives.push(connective);
            },
            (true, Item::Connective { token, .. }) => {
                return Err(ValidationError::syntax(token.start, token.text, Expected::Column));
            },
            (false, Item::Pair(pair)) => {
                return Err(ValidationError::syntax(
                    pair.column.start,
                    pair.column.text,
                    Expected::Connective,
                ));
            },
        }
    }
    Ok(structure)
}

/// Group tokens into pairs and connectives, in order of appearance.
///
/// A word is a connective when it spells AND/OR and is not followed by a
/// comparator; `or=1` is a pair on a column named `or`.
fn group_items<'a>(raw: &str, tokens: &[Token<'a>]) -> Result<Vec<Item<'a>>, ValidationError> {
    let end = |expected| ValidationError::syntax(raw.len(), "", expected);
    let mut items = Vec::new();
    let mut pos = 0;

    while let Some(&token) = tokens.get(pos) {
        if token.kind != TokenKind::Word {
            return Err(ValidationError::syntax(token.start, token.text, Expected::Column));
        }

        let next = tokens.get(pos + 1);
        let starts_pair = next.is_some_and(|t| t.comparator().is_some());
        if !starts_pair && let Some(connective) = Connective::from_keyword(token.text) {
            items.push(Item::Connective {
                connective,
                token,
                surrounded: token.spaced && next.is_some_and(|t| t.spaced),
            });
            pos += 1;
            continue;
        }

        let Some(&op) = next else {
            return Err(end(Expected::Comparator));
        };
        let Some(comparator) = op.comparator() else {
            return Err(ValidationError::syntax(op.start, op.text, Expected::Comparator));
        };
        let Some(&literal) = tokens.get(pos + 2) else {
            return Err(end(Expected::Literal));
        };
        if !literal.is_literal() {
            return Err(ValidationError::syntax(literal.start, literal.text, Expected::Literal));
        }

        items.push(Item::Pair(RawPair {
            column: token,
            comparator,
            literal,
        }));
        pos += 3;
    }

    Ok(items)
}

impl Structure<'_> {
    /// Classify literals, then check comparators against literal kinds.
    fn resolve(self) -> Result<FilterExpression, ValidationError> {
        let literals = self
            .pairs
            .iter()
            .map(|pair| resolve_literal(&pair.literal))
            .collect::<Result<Vec<_>, _>>()?;

        for (pair, literal) in self.pairs.iter().zip(&literals) {
            if !pair.comparator.accepts(literal.kind()) {
                return Err(ValidationError::BadComparator {
                    column: pair.column.text.to_string(),
                    comparator: pair.comparator,
                    literal: literal.kind(),
                });
            }
        }

        let pairs = self
            .pairs
            .into_iter()
            .zip(literals)
            .map(|(pair, literal)| FilterPair::new(pair.column.text, pair.comparator, literal))
            .collect();

        Ok(FilterExpression {
            pairs,
            connectives: self.connectives,
        })
    }
}

fn resolve_literal(token: &Token<'_>) -> Result<Literal, ValidationError> {
    let literal = classify_literal(token.text)?;
    if literal.kind() == LiteralKind::Number && !within_digit_limits(token.text) {
        return Err(ValidationError::BadLiteral {
            literal: token.text.to_string(),
        });
    }
    Ok(literal)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;

    const USERS: &[&str] = &["id", "name", "email", "age", "amount"];

    fn kind_of(raw: &str) -> ErrorKind {
        validate_filter(USERS, raw).unwrap_err().kind()
    }

    #[test]
    fn test_single_pairs() {
        assert!(is_valid_filter(USERS, "id=1"));
        assert!(is_valid_filter(USERS, "id = 1"));
        assert!(is_valid_filter(USERS, "age>=18"));
        assert!(is_valid_filter(USERS, "age <= 65"));
        assert!(is_valid_filter(USERS, "age<65"));
        assert!(is_valid_filter(USERS, "age>17"));
        assert!(is_valid_filter(USERS, "amount=10.50"));
        assert!(is_valid_filter(USERS, "name='Alice'"));
        assert!(is_valid_filter(USERS, "name!='Bob'"));
        assert!(is_valid_filter(USERS, "name=''"));
        assert!(is_valid_filter(USERS, "  id=1  "));
    }

    #[test]
    fn test_connectives() {
        assert!(is_valid_filter(USERS, "id=1 AND name='Alice'"));
        assert!(is_valid_filter(USERS, "id=1 OR id=2 OR id=3"));
        assert!(is_valid_filter(USERS, "id=1 and name='x' or age>3"));
        assert!(is_valid_filter(USERS, "id=1\tAND\nid=2"));

        let expr = validate_filter(USERS, "id=1 or name='x' AND age>3").unwrap();
        assert_eq!(expr.connectives, vec![Connective::Or, Connective::And]);
    }

    #[test]
    fn test_extracted_structure() {
        let expr = validate_filter(USERS, "id >= 10 AND name != 'Eve'").unwrap();
        assert_eq!(
            expr.pairs,
            vec![
                FilterPair::new(
                    "id",
                    Comparator::GreaterOrEqual,
                    Literal::Number("10".into())
                ),
                FilterPair::new(
                    "name",
                    Comparator::NotEqual,
                    Literal::QuotedString("'Eve'".into())
                ),
            ]
        );
        assert_eq!(expr.columns().collect::<Vec<_>>(), vec!["id", "name"]);
        assert_eq!(expr.to_string(), "id >= 10 AND name != 'Eve'");
    }

    #[test]
    fn test_empty_inputs() {
        assert!(is_valid_filter(USERS, ""));
        assert!(validate_filter(USERS, "").unwrap().is_empty());

        let none: [&str; 0] = [];
        assert!(!is_valid_filter(&none, ""));
        assert!(!is_valid_filter(&none, "id=1"));
        assert_eq!(
            validate_filter(&none, "id=1").unwrap_err(),
            ValidationError::EmptyAllowList
        );
    }

    #[test]
    fn test_no_pairs() {
        assert_eq!(kind_of("   "), ErrorKind::Syntax);
        assert_eq!(kind_of("AND"), ErrorKind::Syntax);
        assert_eq!(kind_of("id"), ErrorKind::Syntax);
        assert_eq!(kind_of("'Alice'"), ErrorKind::Syntax);
    }

    #[test]
    fn test_cardinality() {
        // Dangling connective
        assert_eq!(
            validate_filter(USERS, "id=1 AND").unwrap_err(),
            ValidationError::CardinalityMismatch {
                counted: "connectives",
                expected: 0,
                found: 1
            }
        );
        // Missing connective
        assert_eq!(
            validate_filter(USERS, "id=1 id=2").unwrap_err(),
            ValidationError::CardinalityMismatch {
                counted: "connectives",
                expected: 1,
                found: 0
            }
        );
        // Doubled connective
        assert_eq!(kind_of("id=1 AND OR id=2"), ErrorKind::CardinalityMismatch);
        // Leading connective
        assert_eq!(kind_of("OR id=1"), ErrorKind::CardinalityMismatch);
    }

    #[test]
    fn test_alternation() {
        // Counts match but order does not
        assert_eq!(
            validate_filter(USERS, "AND id=1 id=2").unwrap_err(),
            ValidationError::syntax(0, "AND", Expected::Column)
        );
        assert_eq!(
            validate_filter(USERS, "id=1 id=2 OR").unwrap_err(),
            ValidationError::syntax(5, "id", Expected::Connective)
        );
    }

    #[test]
    fn test_connective_needs_whitespace() {
        assert_eq!(
            validate_filter(USERS, "name='x'AND id=1").unwrap_err(),
            ValidationError::syntax(8, "AND", Expected::Whitespace)
        );
        // Glued on the right reads as one column name
        assert_eq!(kind_of("id=1 ANDid=2"), ErrorKind::CardinalityMismatch);
    }

    #[test]
    fn test_keyword_named_columns() {
        let allowed = ["and", "or"];
        let expr = validate_filter(&allowed, "and=1 OR or='x'").unwrap();
        assert_eq!(expr.columns().collect::<Vec<_>>(), vec!["and", "or"]);
        assert_eq!(expr.connectives, vec![Connective::Or]);
    }

    #[test]
    fn test_connective_words_inside_quotes() {
        let expr = validate_filter(USERS, "name='a AND b' AND id=1").unwrap();
        assert_eq!(expr.pairs.len(), 2);
        assert_eq!(expr.connectives, vec![Connective::And]);
        assert_eq!(expr.pairs[0].literal.as_str(), "'a AND b'");

        let expr = validate_filter(USERS, "name='x OR y'").unwrap();
        assert!(expr.connectives.is_empty());
        assert_eq!(expr.pairs[0].literal.unquoted(), "x OR y");
    }

    #[test]
    fn test_unknown_columns() {
        let err = validate_filter(USERS, "id=1 AND password='x'").unwrap_err();
        let ValidationError::UnknownColumn { column, .. } = err else {
            panic!("expected UnknownColumn, got different error variant")
        };
        assert_eq!(column, "password");

        // Case-sensitive
        assert_eq!(kind_of("ID=1"), ErrorKind::UnknownColumn);
    }

    #[test]
    fn test_column_gate_runs_before_literal_checks() {
        assert_eq!(kind_of("secret=\"x\""), ErrorKind::UnknownColumn);
        assert_eq!(kind_of("secret!=10"), ErrorKind::UnknownColumn);
    }

    #[test]
    fn test_numeric_not_equal_is_rejected() {
        assert_eq!(
            validate_filter(USERS, "amount!=10").unwrap_err(),
            ValidationError::BadComparator {
                column: "amount".into(),
                comparator: Comparator::NotEqual,
                literal: LiteralKind::Number,
            }
        );
    }

    #[test]
    fn test_string_ordering_is_rejected() {
        assert_eq!(kind_of("name>'a'"), ErrorKind::BadComparator);
        assert_eq!(kind_of("name<='a'"), ErrorKind::BadComparator);
    }

    #[test]
    fn test_bad_literals() {
        // Double-quoted strings lex but do not classify
        assert_eq!(
            validate_filter(USERS, "name=\"Alice\"").unwrap_err(),
            ValidationError::BadLiteral {
                literal: "\"Alice\"".into()
            }
        );
        // Too many digits
        assert_eq!(kind_of("amount=1234567890123456"), ErrorKind::BadLiteral);
        assert_eq!(kind_of("amount=1.1234567890123456"), ErrorKind::BadLiteral);
        assert!(is_valid_filter(USERS, "amount=123456789012345.123456789012345"));
        // Embedded quote
        assert_eq!(kind_of("name='O'Brien'"), ErrorKind::BadLiteral);
    }

    #[test]
    fn test_literal_checks_precede_comparator_checks() {
        // Second pair has a bad literal, first a bad comparator
        assert_eq!(kind_of("amount!=1 AND name=\"x\""), ErrorKind::BadLiteral);
    }

    #[test]
    fn test_syntax_errors() {
        assert_eq!(
            validate_filter(USERS, "id 1").unwrap_err(),
            ValidationError::syntax(3, "1", Expected::Comparator)
        );
        assert_eq!(
            validate_filter(USERS, "id=").unwrap_err(),
            ValidationError::syntax(3, "", Expected::Literal)
        );
        assert_eq!(
            validate_filter(USERS, "id=name").unwrap_err(),
            ValidationError::syntax(3, "name", Expected::Literal)
        );
        assert_eq!(
            validate_filter(USERS, "1=id").unwrap_err(),
            ValidationError::syntax(0, "1", Expected::Column)
        );
        assert_eq!(kind_of("id=1; DROP TABLE users"), ErrorKind::Syntax);
        assert_eq!(kind_of("id=1 -- comment"), ErrorKind::Syntax);
        assert_eq!(kind_of("(id=1)"), ErrorKind::Syntax);
        assert_eq!(kind_of("id=1 OR 1=1"), ErrorKind::Syntax);
    }

    #[test]
    fn test_parse_filter_skips_column_gate() {
        let expr = parse_filter("anything=1 OR other='x'").unwrap();
        assert_eq!(expr.len(), 2);
        assert!(parse_filter("").unwrap().is_empty());
        assert_eq!(
            parse_filter("x!=1").unwrap_err().kind(),
            ErrorKind::BadComparator
        );
    }

    #[test]
    fn test_terms() {
        let expr = validate_filter(USERS, "id=1 AND id=2 OR id=3").unwrap();
        let connectives: Vec<_> = expr.terms().map(|(c, _)| c).collect();
        assert_eq!(
            connectives,
            vec![None, Some(Connective::And), Some(Connective::Or)]
        );
    }
}
