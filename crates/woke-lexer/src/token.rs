//! Token types for the WokeLang lexer.
//!
//! [`TokenKind`] covers every lexeme of the language and [`Token`] pairs a
//! kind with its source [`Span`].

use std::fmt;
use woke_types::Span;

/// Every reserved word, in the order the lexer's keyword table lists them.
///
/// Several of these (concurrency, pattern matching, modules, pragmas and
/// constraints) have no grammar production yet. They are still reserved so
/// that programs using them as names keep failing the same way once the
/// productions exist.
pub const ALL_KEYWORDS: &[&str] = &[
    // Functions & control flow
    "to", "give", "back", "remember", "when", "otherwise", "repeat", "times", "say",
    // Consent & safety
    "only", "if", "okay", "attempt", "safely", "reassure", "complain",
    // Gratitude & lifecycle
    "thanks", "hello", "goodbye",
    // Concurrency
    "worker", "side", "quest", "superpower", "spawn", "send", "receive", "channel",
    "await", "cancel", "from",
    // Pattern matching
    "decide", "based", "on",
    // Units
    "measured", "in",
    // Modules & declarations
    "use", "renamed", "share", "type", "const",
    // Type names
    "String", "Int", "Float", "Bool", "Maybe",
    // Constraints & pragmas
    "must", "have", "care", "strict", "verbose",
    // Literals & logic
    "true", "false", "and", "or", "not",
];

// ─────────────────────────────────────────────────────────────────────
// Token
// ─────────────────────────────────────────────────────────────────────

/// A single token produced by the lexer.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

impl Token {
    pub fn new(kind: TokenKind, span: Span) -> Self {
        Self { kind, span }
    }

    pub fn is_keyword(&self) -> bool {
        self.kind.is_keyword()
    }
}

// ─────────────────────────────────────────────────────────────────────
// TokenKind
// ─────────────────────────────────────────────────────────────────────

/// Every kind of token the lexer can produce.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    // ── Literals & names ──
    /// A run of digits.
    IntLiteral(i64),
    /// `digits.digits`, with the digits exactly as written.
    FloatLiteral { value: f64, text: String },
    /// String contents with the quotes stripped and escapes kept as written.
    StringLiteral(String),
    Identifier(String),

    // ── Keywords ──
    To,
    Give,
    Back,
    Remember,
    When,
    Otherwise,
    Repeat,
    Times,
    Say,
    Only,
    If,
    Okay,
    Attempt,
    Safely,
    Reassure,
    Complain,
    Thanks,
    Hello,
    Goodbye,
    Worker,
    Side,
    Quest,
    Superpower,
    Spawn,
    Send,
    Receive,
    Channel,
    Await,
    Cancel,
    From,
    Decide,
    Based,
    On,
    Measured,
    In,
    Use,
    Renamed,
    Share,
    Type,
    Const,
    KwString,
    KwInt,
    KwFloat,
    KwBool,
    Maybe,
    Must,
    Have,
    Care,
    Strict,
    Verbose,
    True,
    False,
    And,
    Or,
    Not,

    // ── Operators ──
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    /// `=`
    Eq,
    /// `==`
    EqEq,
    /// `!=`
    BangEq,
    Less,
    Greater,
    LessEq,
    GreaterEq,
    /// `->`
    Arrow,
    /// `→`, interchangeable with `->`.
    UnicodeArrow,

    // ── Punctuation ──
    LParen,
    RParen,
    LBrace,
    RBrace,
    LBracket,
    RBracket,
    Comma,
    Semicolon,
    Colon,
    /// `@`, which starts an emote tag.
    At,

    /// End of input. Always the last token.
    Eof,
}

impl TokenKind {
    /// Look up a reserved word. `None` means `s` is an ordinary identifier.
    pub fn from_keyword(s: &str) -> Option<TokenKind> {
        Some(match s {
            "to" => TokenKind::To,
            "give" => TokenKind::Give,
            "back" => TokenKind::Back,
            "remember" => TokenKind::Remember,
            "when" => TokenKind::When,
            "otherwise" => TokenKind::Otherwise,
            "repeat" => TokenKind::Repeat,
            "times" => TokenKind::Times,
            "say" => TokenKind::Say,
            "only" => TokenKind::Only,
            "if" => TokenKind::If,
            "okay" => TokenKind::Okay,
            "attempt" => TokenKind::Attempt,
            "safely" => TokenKind::Safely,
            "reassure" => TokenKind::Reassure,
            "complain" => TokenKind::Complain,
            "thanks" => TokenKind::Thanks,
            "hello" => TokenKind::Hello,
            "goodbye" => TokenKind::Goodbye,
            "worker" => TokenKind::Worker,
            "side" => TokenKind::Side,
            "quest" => TokenKind::Quest,
            "superpower" => TokenKind::Superpower,
            "spawn" => TokenKind::Spawn,
            "send" => TokenKind::Send,
            "receive" => TokenKind::Receive,
            "channel" => TokenKind::Channel,
            "await" => TokenKind::Await,
            "cancel" => TokenKind::Cancel,
            "from" => TokenKind::From,
            "decide" => TokenKind::Decide,
            "based" => TokenKind::Based,
            "on" => TokenKind::On,
            "measured" => TokenKind::Measured,
            "in" => TokenKind::In,
            "use" => TokenKind::Use,
            "renamed" => TokenKind::Renamed,
            "share" => TokenKind::Share,
            "type" => TokenKind::Type,
            "const" => TokenKind::Const,
            "String" => TokenKind::KwString,
            "Int" => TokenKind::KwInt,
            "Float" => TokenKind::KwFloat,
            "Bool" => TokenKind::KwBool,
            "Maybe" => TokenKind::Maybe,
            "must" => TokenKind::Must,
            "have" => TokenKind::Have,
            "care" => TokenKind::Care,
            "strict" => TokenKind::Strict,
            "verbose" => TokenKind::Verbose,
            "true" => TokenKind::True,
            "false" => TokenKind::False,
            "and" => TokenKind::And,
            "or" => TokenKind::Or,
            "not" => TokenKind::Not,
            _ => return None,
        })
    }

    /// Source spelling of a keyword kind, `None` for everything else.
    pub fn keyword_text(&self) -> Option<&'static str> {
        Some(match self {
            TokenKind::To => "to",
            TokenKind::Give => "give",
            TokenKind::Back => "back",
            TokenKind::Remember => "remember",
            TokenKind::When => "when",
            TokenKind::Otherwise => "otherwise",
            TokenKind::Repeat => "repeat",
            TokenKind::Times => "times",
            TokenKind::Say => "say",
            TokenKind::Only => "only",
            TokenKind::If => "if",
            TokenKind::Okay => "okay",
            TokenKind::Attempt => "attempt",
            TokenKind::Safely => "safely",
            TokenKind::Reassure => "reassure",
            TokenKind::Complain => "complain",
            TokenKind::Thanks => "thanks",
            TokenKind::Hello => "hello",
            TokenKind::Goodbye => "goodbye",
            TokenKind::Worker => "worker",
            TokenKind::Side => "side",
            TokenKind::Quest => "quest",
            TokenKind::Superpower => "superpower",
            TokenKind::Spawn => "spawn",
            TokenKind::Send => "send",
            TokenKind::Receive => "receive",
            TokenKind::Channel => "channel",
            TokenKind::Await => "await",
            TokenKind::Cancel => "cancel",
            TokenKind::From => "from",
            TokenKind::Decide => "decide",
            TokenKind::Based => "based",
            TokenKind::On => "on",
            TokenKind::Measured => "measured",
            TokenKind::In => "in",
            TokenKind::Use => "use",
            TokenKind::Renamed => "renamed",
            TokenKind::Share => "share",
            TokenKind::Type => "type",
            TokenKind::Const => "const",
            TokenKind::KwString => "String",
            TokenKind::KwInt => "Int",
            TokenKind::KwFloat => "Float",
            TokenKind::KwBool => "Bool",
            TokenKind::Maybe => "Maybe",
            TokenKind::Must => "must",
            TokenKind::Have => "have",
            TokenKind::Care => "care",
            TokenKind::Strict => "strict",
            TokenKind::Verbose => "verbose",
            TokenKind::True => "true",
            TokenKind::False => "false",
            TokenKind::And => "and",
            TokenKind::Or => "or",
            TokenKind::Not => "not",
            _ => return None,
        })
    }

    pub fn is_keyword(&self) -> bool {
        self.keyword_text().is_some()
    }

    pub fn is_arrow(&self) -> bool {
        matches!(self, TokenKind::Arrow | TokenKind::UnicodeArrow)
    }

    /// A float token for `text`, or `None` when it is not a finite number.
    pub fn float(text: &str) -> Option<Self> {
        let value: f64 = text.parse().ok()?;
        value.is_finite().then(|| TokenKind::FloatLiteral {
            value,
            text: text.to_string(),
        })
    }
}

impl fmt::Display for TokenKind {
    /// Writes the token's source text, so joining a token stream reproduces
    /// the program minus whitespace and comments.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(text) = self.keyword_text() {
            return f.write_str(text);
        }
        match self {
            TokenKind::IntLiteral(n) => write!(f, "{n}"),
            TokenKind::FloatLiteral { text, .. } => f.write_str(text),
            TokenKind::StringLiteral(s) => write!(f, "\"{s}\""),
            TokenKind::Identifier(name) => f.write_str(name),
            TokenKind::Plus => f.write_str("+"),
            TokenKind::Minus => f.write_str("-"),
            TokenKind::Star => f.write_str("*"),
            TokenKind::Slash => f.write_str("/"),
            TokenKind::Percent => f.write_str("%"),
            TokenKind::Eq => f.write_str("="),
            TokenKind::EqEq => f.write_str("=="),
            TokenKind::BangEq => f.write_str("!="),
            TokenKind::Less => f.write_str("<"),
            TokenKind::Greater => f.write_str(">"),
            TokenKind::LessEq => f.write_str("<="),
            TokenKind::GreaterEq => f.write_str(">="),
            TokenKind::Arrow => f.write_str("->"),
            TokenKind::UnicodeArrow => f.write_str("→"),
            TokenKind::LParen => f.write_str("("),
            TokenKind::RParen => f.write_str(")"),
            TokenKind::LBrace => f.write_str("{"),
            TokenKind::RBrace => f.write_str("}"),
            TokenKind::LBracket => f.write_str("["),
            TokenKind::RBracket => f.write_str("]"),
            TokenKind::Comma => f.write_str(","),
            TokenKind::Semicolon => f.write_str(";"),
            TokenKind::Colon => f.write_str(":"),
            TokenKind::At => f.write_str("@"),
            TokenKind::Eof => f.write_str("end of file"),
            // keyword_text() covered every keyword above
            _ => write!(f, "{self:?}"),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────
