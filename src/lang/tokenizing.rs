use crate::{
    lang::{
        code::Op,
        source_buffer::{is_whitespace, SourceBuffer, Span},
    },
    runtime::error::{self, ErrorKind, ScriptError},
};
use std::fmt::{self, Display, Formatter};

/// The kinds of token that can appear in a program.  The kind records what the lexer saw; the
/// behavior the machine runs for the token lives in the attached Op.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum TokenKind {
    /// The `:` that opens a word definition.
    StartDef,

    /// The `;` that closes a word definition.
    EndDef,

    /// The `.` family of printing words, with an optional suffix.
    Print,

    /// A word reference.  Operators are identifiers too, they are picked out by their spelling
    /// when the token executes.
    Identifier,

    /// An integer literal.
    Number,

    /// A double quoted string literal.
    String,

    /// A named address declaration, `[name]`.
    Label,

    /// A `( ... )` comment.
    Comment,
}

/// Make sure the token kinds print nicely in diagnostics.
impl Display for TokenKind {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            TokenKind::StartDef => write!(f, "start-definition"),
            TokenKind::EndDef => write!(f, "end-definition"),
            TokenKind::Print => write!(f, "print"),
            TokenKind::Identifier => write!(f, "identifier"),
            TokenKind::Number => write!(f, "number"),
            TokenKind::String => write!(f, "string"),
            TokenKind::Label => write!(f, "label"),
            TokenKind::Comment => write!(f, "comment"),
        }
    }
}

/// A token is a simple unit of the language.  It records what kind of thing was seen, where in the
/// source text it was seen, and the operation the machine will perform when the instruction
/// pointer reaches it.  Tokens are immutable once the lexer has produced them.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Token {
    /// What the lexer classified this token as.
    pub kind: TokenKind,

    /// Where in the original source text the token was found.
    pub span: Span,

    /// The operation the machine runs for this token.
    pub op: Op,
}

impl Token {
    /// Recover the token's spelling from the original source text.
    pub fn spelling<'a>(&self, source: &'a str) -> &'a str {
        self.span.slice(source)
    }

    /// Check if the token is an identifier.
    pub fn is_identifier(&self) -> bool {
        self.kind == TokenKind::Identifier
    }

    /// Check if the token is a number literal.
    pub fn is_number(&self) -> bool {
        self.kind == TokenKind::Number
    }
}

/// A list of tokens found in the source code.
pub type TokenList = Vec<Token>;

/// A successful match of one token rule against the front of the remaining source text.
struct ScannedToken {
    /// What the rule classified the text as.
    kind: TokenKind,

    /// How many bytes of source text the rule consumed.
    len: usize,

    /// The operation to attach to the new token.
    op: Op,
}

/// Is the text at the given offset a token boundary?  That is, either the end of the input or a
/// whitespace character.  The number and print rules insist on this so that text like `1abc`
/// falls through to the identifier rule as a single word instead of lexing as `1` then `abc`.
fn at_boundary(text: &str, len: usize) -> bool {
    match text[len..].chars().next() {
        Some(next) => is_whitespace(next),
        None => true,
    }
}

/// Decode the escape sequences in a string literal's body into the raw bytes that will be pushed
/// onto the data stack.  A backslash followed by one of the known letters translates, a backslash
/// followed by anything else yields that following character as written, and a backslash that
/// ends the text yields a lone backslash.
fn decode_escapes(body: &str) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(body.len());
    let mut chars = body.chars();

    while let Some(next) = chars.next() {
        if next != '\\' {
            let mut buffer = [0_u8; 4];
            bytes.extend_from_slice(next.encode_utf8(&mut buffer).as_bytes());
            continue;
        }

        match chars.next() {
            Some('n') => bytes.push(b'\n'),
            Some('r') => bytes.push(b'\r'),
            Some('t') => bytes.push(b'\t'),
            Some('"') => bytes.push(b'"'),
            Some('\\') => bytes.push(b'\\'),

            // The escape was on a non-special character so just pass it through without
            // translation.
            Some(other) => {
                let mut buffer = [0_u8; 4];
                bytes.extend_from_slice(other.encode_utf8(&mut buffer).as_bytes());
            }

            None => bytes.push(b'\\'),
        }
    }

    bytes
}

/// Match a `( ... )` comment.  The body is everything up to the first closing paren, newlines
/// included.  An extra `(` inside the body is permitted, matching the long-standing behavior of
/// the language.  Without a closing paren there is no match and the text falls through to the
/// identifier rule.
fn lex_comment(text: &str) -> Option<ScannedToken> {
    if !text.starts_with('(') {
        return None;
    }

    let close = text[1..].find(')')?;

    Some(ScannedToken {
        kind: TokenKind::Comment,
        len: close + 2,
        op: Op::Comment,
    })
}

/// Match the single `:` that opens a word definition.
fn lex_start_def(text: &str) -> Option<ScannedToken> {
    if !text.starts_with(':') {
        return None;
    }

    Some(ScannedToken {
        kind: TokenKind::StartDef,
        len: 1,
        op: Op::StartDef,
    })
}

/// Match the single `;` that closes a word definition.
fn lex_end_def(text: &str) -> Option<ScannedToken> {
    if !text.starts_with(';') {
        return None;
    }

    Some(ScannedToken {
        kind: TokenKind::EndDef,
        len: 1,
        op: Op::EndDef,
    })
}

/// Match a `[name]` label declaration.  The name is a run of one or more characters that are
/// neither whitespace nor the closing bracket.
fn lex_label(text: &str) -> Option<ScannedToken> {
    if !text.starts_with('[') {
        return None;
    }

    let mut name_len = 0;

    for next in text[1..].chars() {
        if next == ']' || is_whitespace(next) {
            break;
        }

        name_len += next.len_utf8();
    }

    if name_len == 0 || !text[1 + name_len..].starts_with(']') {
        return None;
    }

    let len = name_len + 2;

    if !at_boundary(text, len) {
        return None;
    }

    Some(ScannedToken {
        kind: TokenKind::Label,
        len,
        op: Op::Label(text[1..1 + name_len].to_string()),
    })
}

/// Match the `.` printing family.  A `.` alone prints the top of the stack, the `s`, `d`, and `c`
/// suffixes select the string, dump, and character forms, and a quoted suffix prints a string
/// literal directly.  The letter and bare forms require a token boundary; the quoted form is
/// bounded by its closing quote.
fn lex_print(text: &str) -> Option<ScannedToken> {
    if !text.starts_with('.') {
        return None;
    }

    if text[1..].starts_with('"') {
        let close = text[2..].find('"')?;

        return Some(ScannedToken {
            kind: TokenKind::Print,
            len: close + 3,
            op: Op::PrintString(decode_escapes(&text[2..close + 2])),
        });
    }

    let suffix_op = match text[1..].chars().next() {
        Some('s') => Some(Op::PrintStack),
        Some('d') => Some(Op::DebugDump),
        Some('c') => Some(Op::PrintChar),
        _ => None,
    };

    if let Some(op) = suffix_op {
        if at_boundary(text, 2) {
            return Some(ScannedToken {
                kind: TokenKind::Print,
                len: 2,
                op,
            });
        }
    }

    if at_boundary(text, 1) {
        return Some(ScannedToken {
            kind: TokenKind::Print,
            len: 1,
            op: Op::PrintTop,
        });
    }

    None
}

/// Match an integer literal.  An optional minus sign followed by a hex, octal, or decimal body,
/// with the base chosen by the prefix as in C.  The literal must end at a token boundary; `1abc`
/// is not a number followed by a word, it is a single unknown identifier.
fn lex_number(text: &str) -> Option<ScannedToken> {
    let negative = text.starts_with('-');
    let body = if negative { &text[1..] } else { text };
    let sign_len = if negative { 1 } else { 0 };

    let (digits_len, radix, digits_start) = if body.starts_with("0x") || body.starts_with("0X") {
        let digits = count_digits(&body[2..], 16);

        if digits == 0 {
            return None;
        }

        (digits, 16, 2)
    } else if body.starts_with('0') {
        // A bare zero is a valid octal literal all by itself.
        (count_digits(&body[1..], 8) + 1, 8, 0)
    } else {
        let digits = count_digits(body, 10);

        if digits == 0 {
            return None;
        }

        (digits, 10, 0)
    };

    let len = sign_len + digits_start + digits_len;

    if !at_boundary(text, len) {
        return None;
    }

    // Parse through a wide intermediate and wrap to the 32-bit cell size.  A literal too large
    // for even the intermediate falls through to the identifier rule.
    let digits = &body[digits_start..digits_start + digits_len];
    let mut value = i128::from_str_radix(digits, radix).ok()?;

    if negative {
        value = -value;
    }

    Some(ScannedToken {
        kind: TokenKind::Number,
        len,
        op: Op::PushNumber(value as i32),
    })
}

/// Count how many leading characters of the text are digits of the given radix.
fn count_digits(text: &str, radix: u32) -> usize {
    text.chars()
        .take_while(|next| next.is_digit(radix))
        .count()
}

/// Match a `"..."` string literal.  The body runs to the first closing quote, so a quote can not
/// be embedded, escaped or otherwise.  Escape sequences are decoded here so the machine pushes
/// finished bytes at run time.
fn lex_string(text: &str) -> Option<ScannedToken> {
    if !text.starts_with('"') {
        return None;
    }

    let close = text[1..].find('"')?;

    Some(ScannedToken {
        kind: TokenKind::String,
        len: close + 2,
        op: Op::PushString(decode_escapes(&text[1..close + 1])),
    })
}

/// The catch-all rule.  Any run of non-whitespace text that none of the other rules claimed is an
/// identifier.  Whether it is an operator, an intrinsic, or a word in the dictionary is worked
/// out when the token executes.
fn lex_identifier(text: &str) -> Option<ScannedToken> {
    let len: usize = text
        .chars()
        .take_while(|next| !is_whitespace(*next))
        .map(char::len_utf8)
        .sum();

    if len == 0 {
        return None;
    }

    Some(ScannedToken {
        kind: TokenKind::Identifier,
        len,
        op: Op::Word(text[..len].to_string()),
    })
}

/// Tokenize a complete program's source code.  The rules are tried in order at each position and
/// the first one that matches wins.  Whitespace separates tokens and is otherwise ignored.
pub fn tokenize(source: &str) -> error::Result<TokenList> {
    // The rule order matters.  Structural rules go first, the literal rules after them, and the
    // identifier catch-all must come last.
    const RULES: [fn(&str) -> Option<ScannedToken>; 8] = [
        lex_comment,
        lex_start_def,
        lex_end_def,
        lex_label,
        lex_print,
        lex_number,
        lex_string,
        lex_identifier,
    ];

    let mut buffer = SourceBuffer::new(source);
    let mut token_list = TokenList::new();

    loop {
        buffer.skip_whitespace();

        if buffer.at_end() {
            break;
        }

        let text = buffer.remaining();
        let scanned = RULES.iter().find_map(|rule| rule(text));

        match scanned {
            Some(scanned) => {
                token_list.push(Token {
                    kind: scanned.kind,
                    span: Span::new(buffer.offset(), scanned.len),
                    op: scanned.op,
                });

                buffer.advance(scanned.len);
            }

            None => {
                // The identifier rule accepts any non-whitespace run, so this is unreachable with
                // the rule set as it stands.  Keep the diagnostic anyway so a future rule change
                // fails loudly instead of looping forever.
                let spelling: String = text
                    .chars()
                    .take_while(|next| !is_whitespace(*next))
                    .collect();

                return ScriptError::new_as_result(
                    ErrorKind::UnrecognizedToken,
                    format!(
                        "unrecognized token '{}' at byte offset {}",
                        spelling,
                        buffer.offset()
                    ),
                    None,
                );
            }
        }
    }

    Ok(token_list)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds_of(source: &str) -> Vec<TokenKind> {
        tokenize(source)
            .unwrap()
            .iter()
            .map(|token| token.kind)
            .collect()
    }

    fn single_op(source: &str) -> Op {
        let tokens = tokenize(source).unwrap();

        assert_eq!(tokens.len(), 1, "expected one token from {:?}", source);
        tokens[0].op.clone()
    }

    #[test]
    fn classifies_a_simple_program() {
        let kinds = kinds_of(": sq dup * ; 5 sq . ( done )");

        assert_eq!(
            kinds,
            vec![
                TokenKind::StartDef,
                TokenKind::Identifier,
                TokenKind::Identifier,
                TokenKind::Identifier,
                TokenKind::EndDef,
                TokenKind::Number,
                TokenKind::Identifier,
                TokenKind::Print,
                TokenKind::Comment,
            ]
        );
    }

    #[test]
    fn numbers_parse_in_all_three_bases() {
        assert_eq!(single_op("42"), Op::PushNumber(42));
        assert_eq!(single_op("-42"), Op::PushNumber(-42));
        assert_eq!(single_op("0"), Op::PushNumber(0));
        assert_eq!(single_op("0x1f"), Op::PushNumber(31));
        assert_eq!(single_op("0X1F"), Op::PushNumber(31));
        assert_eq!(single_op("017"), Op::PushNumber(15));
        assert_eq!(single_op("-0x10"), Op::PushNumber(-16));
    }

    #[test]
    fn oversized_literals_wrap_to_the_cell_size() {
        assert_eq!(single_op("0xFFFFFFFF"), Op::PushNumber(-1));
        assert_eq!(single_op("4294967296"), Op::PushNumber(0));
    }

    #[test]
    fn numbers_must_end_at_a_boundary() {
        let tokens = tokenize("1abc").unwrap();

        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].kind, TokenKind::Identifier);
        assert_eq!(tokens[0].op, Op::Word("1abc".to_string()));
    }

    #[test]
    fn bad_octal_digits_make_an_identifier() {
        let tokens = tokenize("08").unwrap();

        assert_eq!(tokens[0].kind, TokenKind::Identifier);
    }

    #[test]
    fn print_forms_lex_by_suffix() {
        assert_eq!(single_op("."), Op::PrintTop);
        assert_eq!(single_op(".s"), Op::PrintStack);
        assert_eq!(single_op(".d"), Op::DebugDump);
        assert_eq!(single_op(".c"), Op::PrintChar);
        assert_eq!(
            single_op(".\"hi\""),
            Op::PrintString(b"hi".to_vec())
        );
    }

    #[test]
    fn print_with_a_trailing_letter_is_an_identifier() {
        let tokens = tokenize(".sx").unwrap();

        assert_eq!(tokens[0].kind, TokenKind::Identifier);
    }

    #[test]
    fn strings_decode_their_escapes() {
        assert_eq!(
            single_op("\"a\\tb\\nc\""),
            Op::PushString(b"a\tb\nc".to_vec())
        );

        // An unknown escape passes the following character through as written.
        assert_eq!(single_op("\"a\\qb\""), Op::PushString(b"aqb".to_vec()));
    }

    #[test]
    fn labels_capture_their_name() {
        assert_eq!(single_op("[loop]"), Op::Label("loop".to_string()));
    }

    #[test]
    fn a_label_missing_its_close_is_an_identifier() {
        let tokens = tokenize("[loop").unwrap();

        assert_eq!(tokens[0].kind, TokenKind::Identifier);
    }

    #[test]
    fn comments_allow_an_unbalanced_open_paren() {
        let tokens = tokenize("( a ( b )").unwrap();

        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].kind, TokenKind::Comment);
    }

    #[test]
    fn an_unterminated_string_is_an_identifier() {
        let tokens = tokenize("\"abc").unwrap();

        assert_eq!(tokens[0].kind, TokenKind::Identifier);
    }

    #[test]
    fn spans_recover_the_spelling() {
        let source = "  dup  42";
        let tokens = tokenize(source).unwrap();

        assert_eq!(tokens[0].spelling(source), "dup");
        assert_eq!(tokens[1].spelling(source), "42");
    }

    #[test]
    fn empty_source_produces_no_tokens() {
        assert!(tokenize("").unwrap().is_empty());
        assert!(tokenize("   \n\t  ").unwrap().is_empty());
    }
}
