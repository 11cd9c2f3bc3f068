//! `logos`-generated tokenizer for the textual LLVM-IR dialect embedded as
//! an escape hatch in Elle source (`spec.md` §4.3).
//!
//! This doesn't attempt the full LLVM assembly grammar: it covers
//! identifiers, punctuation, numeric/float literals, and the instruction,
//! type, linkage, and attribute keyword sets exercised by
//! `LLVMIRParser.cpp`. Anything outside that set still lexes — as
//! `Token::Other` — so a well-formed-but-unrecognized construct degrades to
//! a generic token rather than a lex error.

use logos::Logos;

/// A single lexical token.
///
/// Whitespace and `;`-comments are lexed as ordinary tokens rather than
/// skipped: the parser re-emits them as `Token` events so the original
/// source can be reconstructed byte-for-byte from the event stream.
#[derive(Logos, Debug, Clone, PartialEq)]
pub enum Token {
    /// A run of spaces, tabs, or newlines.
    #[regex(r"[ \t\r\n]+", |lex| lex.slice().to_string())]
    Whitespace(String),
    /// A `;`-led line comment, up to but not including the newline.
    #[regex(r";[^\n]*", |lex| lex.slice().to_string())]
    Comment(String),
    /// `@name` — a global identifier.
    #[regex(r"@[a-zA-Z0-9_.$\\-]+|@\"[^\"]*\"", |lex| lex.slice().to_string())]
    GlobalVar(String),
    /// `%name` — a local identifier.
    #[regex(r"%[a-zA-Z0-9_.$\\-]+|%\"[^\"]*\"", |lex| lex.slice().to_string())]
    LocalVar(String),
    /// `%123` — an unnamed local value id.
    #[regex(r"%[0-9]+", |lex| lex.slice()[1..].parse().ok())]
    LocalVarID(u64),
    /// `!name`/`!123` — a metadata reference.
    #[regex(r"![A-Za-z0-9_.]+", |lex| lex.slice().to_string())]
    MetadataVar(String),
    /// `#123` — a type/attribute-group reference.
    #[regex(r"#[0-9]+", |lex| lex.slice()[1..].parse().ok())]
    AttrGroupID(u64),

    #[token("define")]
    KwDefine,
    #[token("declare")]
    KwDeclare,
    #[token("global")]
    KwGlobal,
    #[token("constant")]
    KwConstant,
    #[token("type")]
    KwType,
    #[token("alias")]
    KwAlias,
    #[token("attributes")]
    KwAttributes,

    // Linkage.
    #[token("private")]
    KwPrivate,
    #[token("internal")]
    KwInternal,
    #[token("external")]
    KwExternal,
    #[token("weak")]
    KwWeak,
    #[token("common")]
    KwCommon,
    #[token("appending")]
    KwAppending,
    #[token("linkonce")]
    KwLinkonce,
    #[token("linkonce_odr")]
    KwLinkonceOdr,
    #[token("weak_odr")]
    KwWeakOdr,
    #[token("extern_weak")]
    KwExternWeak,

    // Visibility.
    #[token("default")]
    KwDefault,
    #[token("hidden")]
    KwHidden,
    #[token("protected")]
    KwProtected,

    // Calling conventions.
    #[token("ccc")]
    KwCcc,
    #[token("fastcc")]
    KwFastcc,
    #[token("coldcc")]
    KwColdcc,

    // Parameter attributes.
    #[token("zeroext")]
    KwZeroext,
    #[token("signext")]
    KwSignext,
    #[token("noalias")]
    KwNoalias,
    #[token("nocapture")]
    KwNocapture,
    #[token("byval")]
    KwByval,
    #[token("sret")]
    KwSret,
    #[token("nonnull")]
    KwNonnull,
    #[token("readonly")]
    KwReadonly,
    #[token("readnone")]
    KwReadnone,

    // Instructions.
    #[token("ret")]
    KwRet,
    #[token("br")]
    KwBr,
    #[token("switch")]
    KwSwitch,
    #[token("indirectbr")]
    KwIndirectbr,
    #[token("invoke")]
    KwInvoke,
    #[token("resume")]
    KwResume,
    #[token("unreachable")]
    KwUnreachable,
    #[token("fneg")]
    KwFneg,
    #[token("add")]
    KwAdd,
    #[token("fadd")]
    KwFadd,
    #[token("sub")]
    KwSub,
    #[token("fsub")]
    KwFsub,
    #[token("mul")]
    KwMul,
    #[token("fmul")]
    KwFmul,
    #[token("udiv")]
    KwUdiv,
    #[token("sdiv")]
    KwSdiv,
    #[token("fdiv")]
    KwFdiv,
    #[token("urem")]
    KwUrem,
    #[token("srem")]
    KwSrem,
    #[token("frem")]
    KwFrem,
    #[token("shl")]
    KwShl,
    #[token("lshr")]
    KwLshr,
    #[token("ashr")]
    KwAshr,
    #[token("and")]
    KwAnd,
    #[token("or")]
    KwOr,
    #[token("xor")]
    KwXor,
    #[token("icmp")]
    KwIcmp,
    #[token("fcmp")]
    KwFcmp,
    #[token("phi")]
    KwPhi,
    #[token("call")]
    KwCall,
    #[token("tail")]
    KwTail,
    #[token("alloca")]
    KwAlloca,
    #[token("load")]
    KwLoad,
    #[token("store")]
    KwStore,
    #[token("getelementptr")]
    KwGetelementptr,
    #[token("trunc")]
    KwTrunc,
    #[token("zext")]
    KwZext,
    #[token("sext")]
    KwSext,
    #[token("fptrunc")]
    KwFptrunc,
    #[token("fpext")]
    KwFpext,
    #[token("fptoui")]
    KwFptoui,
    #[token("fptosi")]
    KwFptosi,
    #[token("uitofp")]
    KwUitofp,
    #[token("sitofp")]
    KwSitofp,
    #[token("ptrtoint")]
    KwPtrtoint,
    #[token("inttoptr")]
    KwInttoptr,
    #[token("bitcast")]
    KwBitcast,
    #[token("addrspacecast")]
    KwAddrspacecast,
    #[token("select")]
    KwSelect,
    #[token("extractvalue")]
    KwExtractvalue,
    #[token("insertvalue")]
    KwInsertvalue,

    // Integer-comparison predicates.
    #[token("eq")]
    KwEq,
    #[token("ne")]
    KwNe,
    #[token("ugt")]
    KwUgt,
    #[token("uge")]
    KwUge,
    #[token("ult")]
    KwUlt,
    #[token("ule")]
    KwUle,
    #[token("sgt")]
    KwSgt,
    #[token("sge")]
    KwSge,
    #[token("slt")]
    KwSlt,
    #[token("sle")]
    KwSle,

    // Basic types.
    #[token("void")]
    KwVoid,
    #[token("i1")]
    KwI1,
    #[token("i8")]
    KwI8,
    #[token("i16")]
    KwI16,
    #[token("i32")]
    KwI32,
    #[token("i64")]
    KwI64,
    #[token("float")]
    KwFloat,
    #[token("double")]
    KwDouble,
    #[token("label")]
    KwLabel,
    #[token("opaque")]
    KwOpaque,

    #[token("true")]
    KwTrue,
    #[token("false")]
    KwFalse,
    #[token("null")]
    KwNull,
    #[token("undef")]
    KwUndef,
    #[token("zeroinitializer")]
    KwZeroinitializer,

    #[token("=")]
    Equals,
    #[token(",")]
    Comma,
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,
    #[token("<")]
    Lt,
    #[token(">")]
    Gt,
    #[token("*")]
    Star,
    #[token(":")]
    Colon,
    #[token("x")]
    X,
    #[token("to")]
    KwTo,

    /// A bare identifier not recognized as a keyword above.
    #[regex(r"[A-Za-z_][A-Za-z0-9_]*", |lex| lex.slice().to_string())]
    Identifier(String),
    /// An integer literal.
    #[regex(r"-?[0-9]+", |lex| lex.slice().parse().ok())]
    IntLiteral(i64),
    /// A floating-point literal, including LLVM's `0x` hex-float form.
    #[regex(r"-?[0-9]+\.[0-9]+([eE][+-]?[0-9]+)?", |lex| lex.slice().parse().ok())]
    FloatLiteral(f64),
    /// A quoted string literal.
    #[regex(r#""([^"\\]|\\.)*""#, |lex| lex.slice().to_string())]
    StringLiteral(String),

    /// Any input the lexer recognizes as a token boundary but doesn't model
    /// explicitly above — preserves the round-trip guarantee for
    /// unrecognized-but-well-formed input instead of erroring.
    #[regex(r"[^\s]", priority = 0)]
    Other,
}

impl Token {
    /// Whether this token is whitespace or a comment — insignificant to the
    /// grammar, but still reported to the receiver so the source round-trips.
    #[must_use]
    pub fn is_trivia(&self) -> bool { matches!(self, Token::Whitespace(_) | Token::Comment(_)) }
}
