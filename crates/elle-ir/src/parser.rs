//! Recursive-descent push parser over the [`Token`] stream.

use elle_source::types::{FileID, SourceFile, SourceLocation};
use logos::Logos;

use crate::error::IrParseError;
use crate::event::EventKind;
use crate::receiver::Receiver;
use crate::token::Token;

/// Parses a function header's calling convention, linkage, and visibility
/// keywords.
fn is_decorator(token: &Token) -> bool {
    matches!(
        token,
        Token::KwPrivate
            | Token::KwInternal
            | Token::KwExternal
            | Token::KwWeak
            | Token::KwCommon
            | Token::KwAppending
            | Token::KwLinkonce
            | Token::KwLinkonceOdr
            | Token::KwWeakOdr
            | Token::KwExternWeak
            | Token::KwDefault
            | Token::KwHidden
            | Token::KwProtected
            | Token::KwCcc
            | Token::KwFastcc
            | Token::KwColdcc
    )
}

fn is_parameter_attribute(token: &Token) -> bool {
    matches!(
        token,
        Token::KwZeroext
            | Token::KwSignext
            | Token::KwNoalias
            | Token::KwNocapture
            | Token::KwByval
            | Token::KwSret
            | Token::KwNonnull
            | Token::KwReadonly
            | Token::KwReadnone
    )
}

fn is_int_binop(token: &Token) -> bool {
    matches!(
        token,
        Token::KwAdd
            | Token::KwSub
            | Token::KwMul
            | Token::KwUdiv
            | Token::KwSdiv
            | Token::KwUrem
            | Token::KwSrem
    )
}

fn is_float_binop(token: &Token) -> bool {
    matches!(token, Token::KwFadd | Token::KwFsub | Token::KwFmul | Token::KwFdiv | Token::KwFrem | Token::KwFneg)
}

fn is_bitwise_op(token: &Token) -> bool {
    matches!(token, Token::KwAnd | Token::KwOr | Token::KwXor | Token::KwShl | Token::KwLshr | Token::KwAshr)
}

fn is_conversion(token: &Token) -> bool {
    matches!(
        token,
        Token::KwTrunc
            | Token::KwZext
            | Token::KwSext
            | Token::KwFptrunc
            | Token::KwFpext
            | Token::KwFptoui
            | Token::KwFptosi
            | Token::KwUitofp
            | Token::KwSitofp
            | Token::KwPtrtoint
            | Token::KwInttoptr
            | Token::KwBitcast
            | Token::KwAddrspacecast
    )
}

fn token_text(token: &Token) -> String {
    match token {
        Token::GlobalVar(s)
        | Token::LocalVar(s)
        | Token::MetadataVar(s)
        | Token::Identifier(s)
        | Token::StringLiteral(s)
        | Token::Whitespace(s)
        | Token::Comment(s) => s.clone(),
        Token::LocalVarID(n) | Token::AttrGroupID(n) => n.to_string(),
        Token::IntLiteral(n) => n.to_string(),
        Token::FloatLiteral(n) => n.to_string(),
        _ => format!("{token:?}"),
    }
}

/// A recursive-descent parser turning a pre-lexed token stream into a push
/// event stream.
///
/// Unlike a tree-building parser, `IrParser` never materializes its own
/// tree: every structural boundary and leaf is reported straight to a
/// [`Receiver`], matching the embedded-IR boundary's role as a thin escape
/// hatch rather than a second AST.
pub struct IrParser {
    tokens: Vec<(Token, std::ops::Range<usize>)>,
    position: usize,
    file: SourceFile,
    file_name: String,
    /// Location of the most recently emitted event, used to satisfy
    /// [`Receiver::source_location`]'s ordering guarantee right before a
    /// structural node closes.
    last_location: SourceLocation,
}

impl IrParser {
    /// Lexes `source` and prepares a parser positioned at its start.
    #[must_use]
    pub fn new(source: &str, file_name: impl Into<String>) -> Self {
        let file_name = file_name.into();
        let mut tokens = Vec::new();
        let mut lexer = Token::lexer(source);
        while let Some(result) = lexer.next() {
            let span = lexer.span();
            match result {
                Ok(token) => tokens.push((token, span)),
                Err(()) => tokens.push((Token::Other, span)),
            }
        }
        let file = SourceFile::new(FileID::new(0), file_name.clone(), source.to_string());
        let last_location = SourceLocation::start_of_file(file_name.clone());
        Self { tokens, position: 0, file, file_name, last_location }
    }

    /// The next significant (non-trivia) token entry, without consuming it.
    fn peek_entry(&self) -> Option<&(Token, std::ops::Range<usize>)> {
        self.tokens[self.position..].iter().find(|(t, _)| !t.is_trivia())
    }

    fn peek(&self) -> Option<&Token> { self.peek_entry().map(|(t, _)| t) }

    /// The `n`th significant token ahead of the cursor (`0` is `peek`'s
    /// token), skipping over any interleaved whitespace/comments.
    fn peek_significant(&self, n: usize) -> Option<&Token> {
        self.tokens[self.position..].iter().map(|(t, _)| t).filter(|t| !t.is_trivia()).nth(n)
    }

    /// Consumes and returns the raw next entry — trivia included.
    fn advance_raw(&mut self) -> Option<(Token, std::ops::Range<usize>)> {
        let entry = self.tokens.get(self.position).cloned();
        if entry.is_some() {
            self.position += 1;
        }
        entry
    }

    /// Consumes tokens until (and including) the next significant one,
    /// reporting any whitespace/comments skipped along the way as `Token`
    /// events so the source still round-trips byte-for-byte.
    fn advance(&mut self, receiver: &mut impl Receiver) -> Option<(Token, std::ops::Range<usize>)> {
        loop {
            let (token, span) = self.advance_raw()?;
            if token.is_trivia() {
                self.emit_token(receiver, &token, &span);
                continue;
            }
            return Some((token, span));
        }
    }

    fn location_for(&self, span: &std::ops::Range<usize>) -> SourceLocation {
        let position = self.file.position_from_offset(span.start);
        SourceLocation::new(self.file_name.clone(), position.line, position.column, span.start, span.len())
    }

    fn emit_data(&mut self, receiver: &mut impl Receiver, kind: EventKind, text: &str, location: &SourceLocation) {
        receiver.data(kind, text, location);
        self.last_location = location.clone();
    }

    fn emit_token(&mut self, receiver: &mut impl Receiver, token: &Token, span: &std::ops::Range<usize>) {
        let location = self.location_for(span);
        self.emit_data(receiver, EventKind::Token, &token_text(token), &location);
    }

    /// Ends the most recently started structural node, first reporting the
    /// location of the last event emitted inside it.
    fn close_node(&mut self, receiver: &mut impl Receiver, kind: EventKind) {
        receiver.source_location(&self.last_location);
        receiver.node_end(kind);
    }

    /// Parses the entire token stream as a module, reporting every
    /// top-level item it finds.
    pub fn parse_module(&mut self, receiver: &mut impl Receiver) {
        let module_location = SourceLocation::start_of_file(self.file_name.clone());
        receiver.node_start(EventKind::Module, &module_location);

        while self.peek().is_some() {
            self.parse_top_level_item(receiver);
        }

        self.close_node(receiver, EventKind::Module);
    }

    fn parse_top_level_item(&mut self, receiver: &mut impl Receiver) {
        // Consume leading decorator keywords (linkage/visibility/cc) that
        // precede `define`/`declare`/a global's initializer.
        let mut lookahead = 0;
        while self.peek_significant(lookahead).is_some_and(is_decorator) {
            lookahead += 1;
        }

        match self.peek_significant(lookahead) {
            Some(Token::KwDefine) => self.parse_function(receiver, true),
            Some(Token::KwDeclare) => self.parse_function(receiver, false),
            Some(Token::KwAttributes) => self.parse_attribute_group(receiver),
            _ => self.parse_generic_statement(receiver),
        }
    }

    /// A statement this parser doesn't model structurally: consumed token
    /// by token as `EventKind::Token` up to (and including) the next
    /// statement-ending construct it recognizes — a `}` closing a brace
    /// group it opened, or simply the next token when no brace is open.
    fn parse_generic_statement(&mut self, receiver: &mut impl Receiver) {
        let mut depth = 0i32;
        loop {
            let Some((token, span)) = self.advance(receiver) else { break };
            let is_open = matches!(token, Token::LBrace);
            let is_close = matches!(token, Token::RBrace);
            self.emit_token(receiver, &token, &span);
            if is_open {
                depth += 1;
            }
            if is_close {
                depth -= 1;
            }
            if depth <= 0 {
                break;
            }
        }
    }

    fn parse_attribute_group(&mut self, receiver: &mut impl Receiver) {
        let Some((_, define_span)) = self.advance(receiver) else { return };
        let location = self.location_for(&define_span);
        receiver.node_start(EventKind::AttributeGroup, &location);
        while let Some((token, span)) = self.advance(receiver) {
            let is_close = matches!(token, Token::RBrace);
            self.emit_token(receiver, &token, &span);
            if is_close {
                break;
            }
        }
        self.close_node(receiver, EventKind::AttributeGroup);
    }

    fn parse_function(&mut self, receiver: &mut impl Receiver, has_body: bool) {
        let Some((_, kw_span)) = self.advance(receiver) else { return };
        let location = self.location_for(&kw_span);
        let kind = if has_body { EventKind::FunctionDefinition } else { EventKind::FunctionDeclaration };
        receiver.node_start(kind.clone(), &location);

        while self.peek().is_some_and(is_decorator) {
            if let Some((token, span)) = self.advance(receiver) {
                self.emit_token(receiver, &token, &span);
            }
        }

        self.parse_type(receiver);

        if let Some(Token::GlobalVar(_)) = self.peek() {
            if let Some((token, span)) = self.advance(receiver) {
                if let Token::GlobalVar(name) = &token {
                    let location = self.location_for(&span);
                    self.emit_data(receiver, EventKind::Operand, name, &location);
                }
            }
        }

        self.parse_argument_list(receiver);

        // Skip any trailing attributes/section/align annotations up to the
        // body's `{` or the declaration's implicit end.
        while let Some(token) = self.peek() {
            if matches!(token, Token::LBrace) || matches!(token, Token::KwDefine | Token::KwDeclare | Token::KwAttributes) {
                break;
            }
            if let Some((token, span)) = self.advance(receiver) {
                self.emit_token(receiver, &token, &span);
            }
        }

        if has_body && matches!(self.peek(), Some(Token::LBrace)) {
            self.parse_function_body(receiver);
        }

        self.close_node(receiver, kind);
    }

    fn parse_type(&mut self, receiver: &mut impl Receiver) {
        let Some((token, span)) = self.advance(receiver) else { return };
        let location = self.location_for(&span);
        receiver.node_start(EventKind::Type, &location);
        self.emit_data(receiver, EventKind::Type, &token_text(&token), &location);
        // Consume trailing pointer stars, which commonly follow a type.
        while matches!(self.peek(), Some(Token::Star)) {
            if let Some((token, span)) = self.advance(receiver) {
                self.emit_token(receiver, &token, &span);
            }
        }
        self.close_node(receiver, EventKind::Type);
    }

    fn parse_argument_list(&mut self, receiver: &mut impl Receiver) {
        let Some((_, open_span)) = self.advance(receiver).filter(|(t, _)| matches!(t, Token::LParen)) else { return };
        let location = self.location_for(&open_span);
        receiver.node_start(EventKind::ArgumentList, &location);

        while !matches!(self.peek(), Some(Token::RParen) | None) {
            self.parse_argument(receiver);
            if matches!(self.peek(), Some(Token::Comma)) {
                if let Some((token, span)) = self.advance(receiver) {
                    self.emit_token(receiver, &token, &span);
                }
            }
        }
        if let Some((token, span)) = self.advance(receiver) {
            self.emit_token(receiver, &token, &span);
        }

        self.close_node(receiver, EventKind::ArgumentList);
    }

    fn parse_argument(&mut self, receiver: &mut impl Receiver) {
        let start_span = self.peek_entry().map(|(_, s)| s.clone()).unwrap_or(0..0);
        let location = self.location_for(&start_span);
        receiver.node_start(EventKind::Argument, &location);

        self.parse_type(receiver);
        while self.peek().is_some_and(is_parameter_attribute) {
            if let Some((token, span)) = self.advance(receiver) {
                self.emit_token(receiver, &token, &span);
            }
        }
        if let Some(Token::LocalVar(_)) = self.peek() {
            if let Some((token, span)) = self.advance(receiver) {
                self.emit_token(receiver, &token, &span);
            }
        }

        self.close_node(receiver, EventKind::Argument);
    }

    fn parse_function_body(&mut self, receiver: &mut impl Receiver) {
        let Some((_, open_span)) = self.advance(receiver) else { return };
        let location = self.location_for(&open_span);
        receiver.node_start(EventKind::FunctionBody, &location);

        while !matches!(self.peek(), Some(Token::RBrace) | None) {
            self.parse_basic_block(receiver);
        }
        if let Some((token, span)) = self.advance(receiver) {
            self.emit_token(receiver, &token, &span);
        }

        self.close_node(receiver, EventKind::FunctionBody);
    }

    fn parse_basic_block(&mut self, receiver: &mut impl Receiver) {
        let start_span = self.peek_entry().map(|(_, s)| s.clone()).unwrap_or(0..0);
        let location = self.location_for(&start_span);
        receiver.node_start(EventKind::BasicBlock, &location);

        // An optional `label:` leading a block.
        if let Some(Token::Identifier(name)) = self.peek().cloned() {
            if self.peek_significant(1).is_some_and(|t| matches!(t, Token::Colon)) {
                self.emit_data(receiver, EventKind::Operand, &name, &location);
                self.advance(receiver);
                if let Some((token, span)) = self.advance(receiver) {
                    self.emit_token(receiver, &token, &span);
                }
            }
        }

        while !matches!(self.peek(), Some(Token::RBrace) | None) {
            if let Some(Token::Identifier(_)) = self.peek() {
                if self.peek_significant(1).is_some_and(|t| matches!(t, Token::Colon)) {
                    // The next basic block's label; stop here.
                    break;
                }
            }
            let progressed = self.parse_instruction(receiver);
            if !progressed {
                break;
            }
        }

        self.close_node(receiver, EventKind::BasicBlock);
    }

    /// Parses one instruction line, returning `false` if nothing could be
    /// consumed (guards against an infinite loop on unexpected input).
    fn parse_instruction(&mut self, receiver: &mut impl Receiver) -> bool {
        let Some((first, first_span)) = self.peek_entry().cloned() else { return false };
        let location = self.location_for(&first_span);

        // `%name = <instruction>` assignment form: the destination register
        // is consumed here and reported as an operand before the rest of
        // the instruction's token run is processed.
        let kind = if matches!(first, Token::LocalVar(_)) && self.peek_significant(1).is_some_and(|t| matches!(t, Token::Equals)) {
            if let Some((token, span)) = self.advance(receiver) {
                if let Token::LocalVar(name) = &token {
                    let loc = self.location_for(&span);
                    self.emit_data(receiver, EventKind::Operand, name, &loc);
                }
            }
            if let Some((token, span)) = self.advance(receiver) {
                self.emit_token(receiver, &token, &span);
            }
            let Some(op) = self.peek().cloned() else { return true };
            self.classify_instruction(&op)
        } else {
            self.classify_instruction(&first)
        };

        receiver.node_start(kind.clone(), &location);
        // Consume the rest of the line token-by-token: most instructions'
        // operand grammar (types, `%`/`@` references, `,`) is already
        // well-represented as a flat token run for the purposes of this
        // escape hatch, so individual operands are reported as `Operand`
        // data events rather than further substructure.
        let mut consumed_any = false;
        while let Some(token) = self.peek() {
            if matches!(token, Token::RBrace) {
                break;
            }
            let is_label_start = matches!(token, Token::Identifier(_)) && self.peek_significant(1).is_some_and(|t| matches!(t, Token::Colon));
            if is_label_start {
                break;
            }
            let Some((token, span)) = self.advance(receiver) else { break };
            consumed_any = true;
            let location = self.location_for(&span);
            match &token {
                Token::GlobalVar(s) | Token::LocalVar(s) => self.emit_data(receiver, EventKind::Operand, s, &location),
                Token::IntLiteral(_) | Token::FloatLiteral(_) | Token::KwTrue | Token::KwFalse | Token::KwNull | Token::KwUndef => {
                    let text = token_text(&token);
                    self.emit_data(receiver, EventKind::Operand, &text, &location);
                }
                _ => self.emit_data(receiver, EventKind::Token, &token_text(&token), &location),
            }
            let is_terminator = matches!(token, Token::KwRet | Token::KwBr | Token::KwUnreachable | Token::KwSwitch);
            let next_starts_new = self
                .peek()
                .map(|next| matches!(next, Token::LocalVar(_)) && self.peek_significant(1).is_some_and(|t| matches!(t, Token::Equals)))
                .unwrap_or(false)
                || self.peek().is_some_and(|next| self.is_instruction_keyword(next));
            if is_terminator || next_starts_new {
                break;
            }
        }
        self.close_node(receiver, kind);
        consumed_any
    }

    fn is_instruction_keyword(&self, token: &Token) -> bool {
        is_int_binop(token)
            || is_float_binop(token)
            || is_bitwise_op(token)
            || is_conversion(token)
            || matches!(
                token,
                Token::KwRet
                    | Token::KwBr
                    | Token::KwSwitch
                    | Token::KwIcmp
                    | Token::KwFcmp
                    | Token::KwPhi
                    | Token::KwCall
                    | Token::KwAlloca
                    | Token::KwLoad
                    | Token::KwStore
                    | Token::KwGetelementptr
                    | Token::KwSelect
                    | Token::KwExtractvalue
                    | Token::KwInsertvalue
                    | Token::KwUnreachable
            )
    }

    fn classify_instruction(&self, token: &Token) -> EventKind {
        if is_int_binop(token) {
            return EventKind::IntBinOp;
        }
        if is_float_binop(token) {
            return EventKind::FloatBinOp;
        }
        if is_bitwise_op(token) {
            return EventKind::BitwiseOp;
        }
        if is_conversion(token) {
            return EventKind::Conversion;
        }
        match token {
            Token::KwRet => EventKind::Ret,
            Token::KwBr => EventKind::Br,
            Token::KwSwitch => EventKind::Switch,
            Token::KwIcmp => EventKind::IntCompare,
            Token::KwFcmp => EventKind::FloatCompare,
            Token::KwPhi => EventKind::Phi,
            Token::KwCall => EventKind::Call,
            Token::KwAlloca => EventKind::Alloca,
            Token::KwLoad => EventKind::Load,
            Token::KwStore => EventKind::Store,
            Token::KwGetelementptr => EventKind::GetElementPtr,
            Token::KwSelect => EventKind::Select,
            Token::KwExtractvalue | Token::KwInsertvalue => EventKind::AggregateOp,
            Token::KwUnreachable => EventKind::Unreachable,
            _ => EventKind::Token,
        }
    }
}

/// Reports an unrecognized construct without aborting the parse.
pub fn report_unexpected(receiver: &mut impl Receiver, message: impl Into<String>, location: SourceLocation) {
    receiver.error(&IrParseError::new(message, location));
}
