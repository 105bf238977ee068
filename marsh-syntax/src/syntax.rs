// This file is part of marsh, a POSIX-compatible shell.
// Copyright (C) 2024 the marsh authors
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

//! Shell command language syntax
//!
//! This module contains the types that represent abstract syntax trees of the
//! shell language.
//!
//! The AST that represents a whole script is a [`Command::List`] of top-level
//! commands. Commands contain [`Word`]s, and a word is a sequence of
//! [`WordPart`]s: literals, quotations, and substitutions. Every leaf is a
//! [`Token`] that remembers the exact source text it was lexed from and,
//! through its span, where in the [arena](crate::source::Arena) it came from.
//!
//! All nodes are immutable once constructed. The single exception is the
//! body of a [`HereDoc`], which is backfilled through a write-once cell when
//! the parser reaches the newline that starts the here-document content.
//!
//! Most types implement [`Display`](std::fmt::Display), producing a
//! single-line canonical form with here-document contents omitted. For a
//! byte-exact rendition of the original source, use
//! [`Arena::reconstruct`](crate::source::Arena::reconstruct).

use crate::id::Id;
use crate::source::SpanId;
use std::cell::OnceCell;
use std::rc::Rc;
use std::str::FromStr;
use thiserror::Error;

mod impl_display;

/// Primitive lexeme
///
/// The `value` is the literal substring the token was matched from. The span
/// refers back to the arena; tokens synthesized by tests or by re-lexing
/// backquote content have no span.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Token {
    /// Token identifier
    pub id: Id,
    /// Literal text of the token
    pub value: String,
    /// Provenance handle, if the token came from real source
    pub span: Option<SpanId>,
}

impl Token {
    /// Creates a token with no span.
    #[must_use]
    pub fn new<S: Into<String>>(id: Id, value: S) -> Token {
        Token {
            id,
            value: value.into(),
            span: None,
        }
    }
}

/// Element of a [compound word](Word::Compound)
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum WordPart {
    /// Bare text
    Literal(Token),
    /// `\c` outside quotes; the token value includes the backslash
    EscapedLiteral(Token),
    /// `'…'`; one token per source line of the content
    SingleQuoted(Vec<Token>),
    /// `$'…'`; the token holds the raw content, the string its decoded form
    DollarSingleQuoted(Token, String),
    /// `"…"`; expansions enabled, field splitting disabled inside
    DoubleQuoted(Vec<WordPart>),
    /// `$name`, `$1`, `$?`, `$@`, `$*`, …; the token value includes the `$`
    SimpleVarSub(Token),
    /// `${…}`
    BracedVarSub(BracedVarSub),
    /// `~` or `~user` at the start of a word
    TildeSub(Token),
    /// `$(…)` or `` `…` ``
    CommandSub {
        command: Rc<Command>,
        backquoted: bool,
    },
    /// `$((…))`
    ArithSub(ArithExpr),
    /// `(a b c)` on the right-hand side of an assignment
    ArrayLiteral(Vec<Word>),
}

/// Prefix operator of a braced substitution
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum PrefixOp {
    /// `#`: length of the value
    Length,
    /// `!`: indirection through the named parameter
    Indirect,
}

/// Subscript of a braced substitution
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum BracketOp {
    /// `[@]` or `[*]`
    WholeArray(Token),
    /// `[expr]`
    Index(ArithExpr),
}

/// Condition of a [`Switch`]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SwitchCondition {
    /// The switch applies if the parameter is unset.
    Unset,
    /// The switch applies if the parameter is unset or empty (`:` form).
    UnsetOrEmpty,
}

/// Action of a [`Switch`]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SwitchAction {
    /// `+`: substitute the word if the parameter is set
    Alter,
    /// `-`: substitute the word if the parameter is not set
    Default,
    /// `=`: like `Default`, but also assign the word to the parameter
    Assign,
    /// `?`: fail with the word as an error message if the parameter is not set
    Error,
}

/// Conditional substitution modifier, e.g. `${x:-default}`
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Switch {
    pub action: SwitchAction,
    pub condition: SwitchCondition,
    pub word: Word,
}

/// Side a [`Trim`] operates on
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum TrimSide {
    /// `#`: remove a prefix
    Prefix,
    /// `%`: remove a suffix
    Suffix,
}

/// Match length of a [`Trim`]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum TrimLength {
    Shortest,
    Longest,
}

/// Pattern-removal modifier, e.g. `${x%.txt}`
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Trim {
    pub side: TrimSide,
    pub length: TrimLength,
    pub pattern: Word,
}

/// Pattern-substitution modifier, e.g. `${x/from/to}`
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Replace {
    /// True for `//`, replacing every match rather than the first
    pub all: bool,
    pub pattern: Word,
    /// `None` if the closing brace follows the pattern directly
    pub substitute: Option<Word>,
}

/// Substring modifier, e.g. `${x:1:2}`
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Slice {
    pub offset: ArithExpr,
    pub length: Option<ArithExpr>,
}

/// Suffix operator of a braced substitution
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum SuffixOp {
    Switch(Switch),
    Trim(Trim),
    Replace(Replace),
    Slice(Slice),
}

/// Braced variable substitution `${…}`
///
/// A substitution has at most one prefix operator, one subscript, and one
/// suffix operator; the parser rejects other combinations.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct BracedVarSub {
    /// Parameter name, positional digits, or special character
    pub name: Token,
    pub prefix_op: Option<PrefixOp>,
    pub bracket_op: Option<BracketOp>,
    pub suffix_op: Option<SuffixOp>,
}

/// Shell word
///
/// Operator and keyword lexemes are single-token words; everything else is a
/// compound of [`WordPart`]s.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Word {
    Token(Token),
    Compound(Vec<WordPart>),
}

impl Word {
    /// Returns the parts of a compound word, or an empty slice for a token
    /// word.
    #[must_use]
    pub fn parts(&self) -> &[WordPart] {
        match self {
            Word::Token(_) => &[],
            Word::Compound(parts) => parts,
        }
    }

    /// Returns the word as a plain string if it consists only of unquoted
    /// literal text.
    ///
    /// This is how the parser recognizes keywords and test operators: only a
    /// fully literal word can be one.
    #[must_use]
    pub fn to_string_if_literal(&self) -> Option<String> {
        match self {
            Word::Token(token) => Some(token.value.clone()),
            Word::Compound(parts) => {
                let mut result = String::new();
                for part in parts {
                    match part {
                        WordPart::Literal(token) => result.push_str(&token.value),
                        _ => return None,
                    }
                }
                Some(result)
            }
        }
    }

    /// Removes quoting from the word, returning the plain text and whether
    /// any quoting was present.
    ///
    /// Substitutions cannot be unquoted; they contribute their canonical
    /// source form. This is used for here-document delimiters, where a quoted
    /// delimiter disables expansion of the content.
    #[must_use]
    pub fn unquote(&self) -> (String, bool) {
        fn unquote_parts(parts: &[WordPart], result: &mut String) -> bool {
            let mut quoted = false;
            for part in parts {
                match part {
                    WordPart::Literal(token) | WordPart::TildeSub(token) => {
                        result.push_str(&token.value);
                    }
                    WordPart::EscapedLiteral(token) => {
                        result.push_str(&token.value[1..]);
                        quoted = true;
                    }
                    WordPart::SingleQuoted(tokens) => {
                        for token in tokens {
                            result.push_str(&token.value);
                        }
                        quoted = true;
                    }
                    WordPart::DollarSingleQuoted(_, decoded) => {
                        result.push_str(decoded);
                        quoted = true;
                    }
                    WordPart::DoubleQuoted(inner) => {
                        unquote_parts(inner, result);
                        quoted = true;
                    }
                    other => {
                        result.push_str(&other.to_string());
                    }
                }
            }
            quoted
        }

        match self {
            Word::Token(token) => (token.value.clone(), false),
            Word::Compound(parts) => {
                let mut result = String::new();
                let quoted = unquote_parts(parts, &mut result);
                (result, quoted)
            }
        }
    }

    /// Returns the span of the first token in the word, if any.
    #[must_use]
    pub fn first_span(&self) -> Option<SpanId> {
        fn part_span(part: &WordPart) -> Option<SpanId> {
            match part {
                WordPart::Literal(t)
                | WordPart::EscapedLiteral(t)
                | WordPart::DollarSingleQuoted(t, _)
                | WordPart::SimpleVarSub(t)
                | WordPart::TildeSub(t) => t.span,
                WordPart::SingleQuoted(tokens) => tokens.first().and_then(|t| t.span),
                WordPart::DoubleQuoted(parts) => parts.first().and_then(part_span),
                WordPart::BracedVarSub(sub) => sub.name.span,
                WordPart::CommandSub { .. }
                | WordPart::ArithSub(_)
                | WordPart::ArrayLiteral(_) => None,
            }
        }
        match self {
            Word::Token(token) => token.span,
            Word::Compound(parts) => parts.first().and_then(part_span),
        }
    }
}

/// Arithmetic expression, the content of `$((…))` and `((…))`
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ArithExpr {
    /// Bare variable name
    Var(Token),
    /// Integer literal or `$`-substitution, evaluated as a number
    Word(Word),
    /// Unary operator application; `postfix` only for `++` and `--`
    Unary {
        op: Token,
        postfix: bool,
        operand: Box<ArithExpr>,
    },
    /// Binary operator application, including the comma operator
    Binary {
        op: Token,
        lhs: Box<ArithExpr>,
        rhs: Box<ArithExpr>,
    },
    /// `=` and the compound assignment operators
    Assign {
        op: Token,
        lvalue: Box<ArithExpr>,
        rhs: Box<ArithExpr>,
    },
    /// `cond ? consequent : alternative`
    Ternary {
        condition: Box<ArithExpr>,
        consequent: Box<ArithExpr>,
        alternative: Box<ArithExpr>,
    },
    /// Parenthesized sub-expression
    Group(Box<ArithExpr>),
    /// `name(args…)`
    FuncCall { name: Token, args: Vec<ArithExpr> },
}

/// Unary operator of a `[[ ]]` test
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
#[non_exhaustive]
pub enum TestUnaryOp {
    /// `-b`
    BlockDevice,
    /// `-c`
    CharDevice,
    /// `-d`
    Directory,
    /// `-e`
    Exists,
    /// `-f`
    Regular,
    /// `-g`
    SetGid,
    /// `-h` or `-L`
    Symlink,
    /// `-k`
    Sticky,
    /// `-n`
    NonEmptyString,
    /// `-p`
    Pipe,
    /// `-r`
    Readable,
    /// `-s`
    NonEmptyFile,
    /// `-t`
    Terminal,
    /// `-u`
    SetUid,
    /// `-v`
    SetVariable,
    /// `-w`
    Writable,
    /// `-x`
    Executable,
    /// `-z`
    EmptyString,
    /// `-G`
    OwnedByGroup,
    /// `-N`
    ModifiedSinceRead,
    /// `-O`
    OwnedByUser,
    /// `-S`
    Socket,
}

/// Error indicating that a string is not a test operator
#[derive(Clone, Debug, Eq, Error, PartialEq)]
#[error("not a test operator")]
pub struct ParseTestOpError;

impl FromStr for TestUnaryOp {
    type Err = ParseTestOpError;
    fn from_str(s: &str) -> Result<TestUnaryOp, ParseTestOpError> {
        use TestUnaryOp::*;
        match s {
            "-b" => Ok(BlockDevice),
            "-c" => Ok(CharDevice),
            "-d" => Ok(Directory),
            "-e" => Ok(Exists),
            "-f" => Ok(Regular),
            "-g" => Ok(SetGid),
            "-h" | "-L" => Ok(Symlink),
            "-k" => Ok(Sticky),
            "-n" => Ok(NonEmptyString),
            "-p" => Ok(Pipe),
            "-r" => Ok(Readable),
            "-s" => Ok(NonEmptyFile),
            "-t" => Ok(Terminal),
            "-u" => Ok(SetUid),
            "-v" => Ok(SetVariable),
            "-w" => Ok(Writable),
            "-x" => Ok(Executable),
            "-z" => Ok(EmptyString),
            "-G" => Ok(OwnedByGroup),
            "-N" => Ok(ModifiedSinceRead),
            "-O" => Ok(OwnedByUser),
            "-S" => Ok(Socket),
            _ => Err(ParseTestOpError),
        }
    }
}

/// Binary operator of a `[[ ]]` test
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
#[non_exhaustive]
pub enum TestBinaryOp {
    /// `=` or `==`
    StringEqual,
    /// `!=`
    StringNotEqual,
    /// `<`
    StringLess,
    /// `>`
    StringGreater,
    /// `=~`
    Match,
    /// `-eq`
    Equal,
    /// `-ne`
    NotEqual,
    /// `-lt`
    LessThan,
    /// `-le`
    LessOrEqual,
    /// `-gt`
    GreaterThan,
    /// `-ge`
    GreaterOrEqual,
    /// `-nt`
    NewerThan,
    /// `-ot`
    OlderThan,
    /// `-ef`
    SameFile,
}

impl FromStr for TestBinaryOp {
    type Err = ParseTestOpError;
    fn from_str(s: &str) -> Result<TestBinaryOp, ParseTestOpError> {
        use TestBinaryOp::*;
        match s {
            "=" | "==" => Ok(StringEqual),
            "!=" => Ok(StringNotEqual),
            "<" => Ok(StringLess),
            ">" => Ok(StringGreater),
            "=~" => Ok(Match),
            "-eq" => Ok(Equal),
            "-ne" => Ok(NotEqual),
            "-lt" => Ok(LessThan),
            "-le" => Ok(LessOrEqual),
            "-gt" => Ok(GreaterThan),
            "-ge" => Ok(GreaterOrEqual),
            "-nt" => Ok(NewerThan),
            "-ot" => Ok(OlderThan),
            "-ef" => Ok(SameFile),
            _ => Err(ParseTestOpError),
        }
    }
}

/// Boolean expression, the content of `[[ ]]`
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum BoolExpr {
    /// Single word tested for non-emptiness
    WordTest(Word),
    /// Unary test such as `-f file`
    Unary { op: Word, operand: Word },
    /// Binary test such as `a = b`
    Binary { op: Word, lhs: Word, rhs: Word },
    /// `! expr`
    Not(Box<BoolExpr>),
    /// `expr && expr`
    And(Box<BoolExpr>, Box<BoolExpr>),
    /// `expr || expr`
    Or(Box<BoolExpr>, Box<BoolExpr>),
    /// `( expr )`
    Group(Box<BoolExpr>),
}

/// Here-document
///
/// The body is not known when the operator is parsed; the parser fills it in
/// after consuming the newline token that ends the command line. `body` is a
/// write-once cell so the node itself can stay externally immutable.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct HereDoc {
    /// Operator token, `<<` or `<<-`
    pub op: Token,
    /// Delimiter word as written after the operator
    pub delimiter: Word,
    /// Whether leading tabs are stripped from content lines (`<<-`)
    pub remove_tabs: bool,
    /// Whether the content undergoes expansion (the delimiter was unquoted)
    pub do_expansion: bool,
    /// Content of the here-document
    pub body: OnceCell<Word>,
}

impl HereDoc {
    /// Whether the body has been read yet
    #[must_use]
    pub fn was_filled(&self) -> bool {
        self.body.get().is_some()
    }
}

/// Body of a redirection
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum RedirBody {
    /// Redirection taking a file name or descriptor word
    File { op: Token, target: Word },
    /// Here-document
    HereDoc(Rc<HereDoc>),
}

/// Redirection
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Redir {
    /// Explicit file descriptor digits preceding the operator, if any
    pub fd: Option<Token>,
    pub body: RedirBody,
}

/// Variable assignment, `name=value` or `name+=value`
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AssignPair {
    /// Token spelling the name and the `=` or `+=`
    pub name: Token,
    /// True for the appending `+=` form
    pub append: bool,
    /// Value word; may be empty, may hold an array literal
    pub value: Word,
}

impl AssignPair {
    /// Variable name without the trailing `=` or `+=`
    #[must_use]
    pub fn name(&self) -> &str {
        let text = &self.name.value;
        let text = text.strip_suffix('=').unwrap_or(text);
        text.strip_suffix('+').unwrap_or(text)
    }
}

/// Simple command: assignments, words, and redirections
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct SimpleCommand {
    pub assigns: Vec<AssignPair>,
    pub words: Vec<Word>,
    pub redirs: Vec<Redir>,
}

/// How a case arm hands control to the arms after it
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum CaseContinuation {
    /// `;;`: stop after the matching arm
    #[default]
    Break,
    /// `;&`: run the next arm's body unconditionally
    FallThrough,
    /// `;;&`: keep testing the remaining patterns
    Continue,
}

/// Arm of a case command
///
/// The pattern list is never empty.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CaseArm {
    pub patterns: Vec<Word>,
    pub body: Command,
    pub continuation: CaseContinuation,
}

/// Condition and body of an `if` or `elif` clause
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct IfArm {
    pub condition: Command,
    pub body: Command,
}

/// For loop iterating over words, `for name [in words…]; do …; done`
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ForEach {
    pub name: Token,
    pub words: Vec<Word>,
    /// True when the source omitted `in` entirely; the loop then iterates
    /// over the positional parameters
    pub do_arg_iter: bool,
    pub body: Box<Command>,
    pub redirs: Vec<Redir>,
}

/// C-style for loop, `for ((init; cond; update)); do …; done`
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ForExpr {
    pub init: Option<ArithExpr>,
    pub cond: Option<ArithExpr>,
    pub update: Option<ArithExpr>,
    pub body: Box<Command>,
    pub redirs: Vec<Redir>,
}

/// Command, the main syntactic unit
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Command {
    /// Empty command
    NoOp,
    Simple(SimpleCommand),
    /// A command together with its `;` or `&` terminator
    Sentence {
        inner: Box<Command>,
        terminator: Token,
    },
    /// Assignments with no command name, optionally after a declaring word
    /// such as `export`
    Assignment {
        keyword: Option<Token>,
        pairs: Vec<AssignPair>,
    },
    /// Two or more commands connected with `|` or `|&`
    ///
    /// `stderr_indices` lists the child indices whose following pipe also
    /// carries standard error (`|&`).
    Pipeline {
        children: Vec<Command>,
        negated: bool,
        stderr_indices: Vec<usize>,
    },
    /// Two or more pipelines connected with `&&` or `||`
    AndOr {
        children: Vec<Command>,
        ops: Vec<Token>,
    },
    /// Sequence of commands; may have a single element
    List(Vec<Command>),
    /// `do …; done`, the body of a loop
    DoGroup { body: Box<Command> },
    /// `{ …; }`
    BraceGroup {
        body: Box<Command>,
        redirs: Vec<Redir>,
    },
    /// `(…)`
    Subshell {
        body: Box<Command>,
        redirs: Vec<Redir>,
    },
    /// `((…))`
    DParen {
        expr: ArithExpr,
        redirs: Vec<Redir>,
    },
    /// `[[ … ]]`
    DBracket {
        expr: BoolExpr,
        redirs: Vec<Redir>,
    },
    ForEach(ForEach),
    ForExpr(ForExpr),
    While {
        condition: Box<Command>,
        body: Box<Command>,
        redirs: Vec<Redir>,
    },
    Until {
        condition: Box<Command>,
        body: Box<Command>,
        redirs: Vec<Redir>,
    },
    If {
        arms: Vec<IfArm>,
        else_body: Option<Box<Command>>,
        redirs: Vec<Redir>,
    },
    Case {
        subject: Word,
        arms: Vec<CaseArm>,
        redirs: Vec<Redir>,
    },
    FuncDef {
        name: Word,
        body: Box<Command>,
        redirs: Vec<Redir>,
    },
}

impl Command {
    /// Tests if the command is a [`Sentence`](Command::Sentence) or ends in
    /// one, meaning its canonical form already ends with `;` or `&`.
    #[must_use]
    pub fn ends_with_terminator(&self) -> bool {
        match self {
            Command::Sentence { .. } => true,
            Command::List(children) => {
                children.last().is_some_and(Command::ends_with_terminator)
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn assign_pair_name_strips_operator() {
        let plain = AssignPair {
            name: Token::new(Id::VarLike, "foo="),
            append: false,
            value: Word::Compound(vec![]),
        };
        assert_eq!(plain.name(), "foo");

        let append = AssignPair {
            name: Token::new(Id::VarLike, "foo+="),
            append: true,
            value: Word::Compound(vec![]),
        };
        assert_eq!(append.name(), "foo");
    }

    #[test]
    fn word_to_string_if_literal() {
        let word = Word::Compound(vec![
            WordPart::Literal(Token::new(Id::Literal, "ab")),
            WordPart::Literal(Token::new(Id::Other, "=")),
        ]);
        assert_eq!(word.to_string_if_literal(), Some("ab=".to_string()));

        let word = Word::Compound(vec![WordPart::SingleQuoted(vec![Token::new(
            Id::Literal,
            "ab",
        )])]);
        assert_eq!(word.to_string_if_literal(), None);
    }

    #[test]
    fn word_unquote() {
        let word = Word::Compound(vec![
            WordPart::Literal(Token::new(Id::Literal, "a")),
            WordPart::SingleQuoted(vec![Token::new(Id::Literal, "b c")]),
            WordPart::EscapedLiteral(Token::new(Id::EscapedChar, "\\d")),
        ]);
        assert_eq!(word.unquote(), ("ab cd".to_string(), true));

        let word = Word::Compound(vec![WordPart::Literal(Token::new(Id::Literal, "end"))]);
        assert_eq!(word.unquote(), ("end".to_string(), false));
    }

    #[test]
    fn here_doc_fill_flag() {
        let here_doc = HereDoc {
            op: Token::new(Id::LessLess, "<<"),
            delimiter: Word::Compound(vec![WordPart::Literal(Token::new(Id::Literal, "END"))]),
            remove_tabs: false,
            do_expansion: true,
            body: OnceCell::new(),
        };
        assert!(!here_doc.was_filled());
        here_doc.body.set(Word::Compound(vec![])).unwrap();
        assert!(here_doc.was_filled());
    }

    #[test]
    fn test_op_classification() {
        assert_eq!("-f".parse(), Ok(TestUnaryOp::Regular));
        assert_eq!("-L".parse(), Ok(TestUnaryOp::Symlink));
        assert_eq!("=~".parse(), Ok(TestBinaryOp::Match));
        assert_eq!("-ge".parse(), Ok(TestBinaryOp::GreaterOrEqual));
        assert_eq!("-q".parse::<TestUnaryOp>(), Err(ParseTestOpError));
    }
}
