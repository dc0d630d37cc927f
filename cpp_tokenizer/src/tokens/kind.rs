//! The token vocabulary
//!
//! A closed set of structural token kinds. Paired kinds come as BEGIN/END
//! and are opened and closed through a [`ConstructKind`]; everything else is
//! a unit token. Names are part of the output contract: downstream
//! similarity engines persist them, so existing names never change and new
//! kinds are only ever appended.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Bumped whenever a kind is added
pub const VOCABULARY_VERSION: u32 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TokenKind {
    FunctionBegin,
    FunctionEnd,
    ClassBegin,
    ClassEnd,
    UnionBegin,
    UnionEnd,
    EnumBegin,
    EnumEnd,
    IfBegin,
    IfEnd,
    ElseBegin,
    ElseEnd,
    ForBegin,
    ForEnd,
    WhileBegin,
    WhileEnd,
    DoBegin,
    DoEnd,
    SwitchBegin,
    SwitchEnd,
    TryBegin,
    TryEnd,
    CatchBegin,
    CatchEnd,

    Apply,
    Assign,
    Vardef,
    Case,
    Break,
    Continue,
    Goto,
    Return,
    Throw,
    Newclass,
    Newarray,

    FileEnd,
}

impl TokenKind {
    pub const ALL: [TokenKind; 36] = [
        TokenKind::FunctionBegin,
        TokenKind::FunctionEnd,
        TokenKind::ClassBegin,
        TokenKind::ClassEnd,
        TokenKind::UnionBegin,
        TokenKind::UnionEnd,
        TokenKind::EnumBegin,
        TokenKind::EnumEnd,
        TokenKind::IfBegin,
        TokenKind::IfEnd,
        TokenKind::ElseBegin,
        TokenKind::ElseEnd,
        TokenKind::ForBegin,
        TokenKind::ForEnd,
        TokenKind::WhileBegin,
        TokenKind::WhileEnd,
        TokenKind::DoBegin,
        TokenKind::DoEnd,
        TokenKind::SwitchBegin,
        TokenKind::SwitchEnd,
        TokenKind::TryBegin,
        TokenKind::TryEnd,
        TokenKind::CatchBegin,
        TokenKind::CatchEnd,
        TokenKind::Apply,
        TokenKind::Assign,
        TokenKind::Vardef,
        TokenKind::Case,
        TokenKind::Break,
        TokenKind::Continue,
        TokenKind::Goto,
        TokenKind::Return,
        TokenKind::Throw,
        TokenKind::Newclass,
        TokenKind::Newarray,
        TokenKind::FileEnd,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TokenKind::FunctionBegin => "FUNCTION_BEGIN",
            TokenKind::FunctionEnd => "FUNCTION_END",
            TokenKind::ClassBegin => "CLASS_BEGIN",
            TokenKind::ClassEnd => "CLASS_END",
            TokenKind::UnionBegin => "UNION_BEGIN",
            TokenKind::UnionEnd => "UNION_END",
            TokenKind::EnumBegin => "ENUM_BEGIN",
            TokenKind::EnumEnd => "ENUM_END",
            TokenKind::IfBegin => "IF_BEGIN",
            TokenKind::IfEnd => "IF_END",
            TokenKind::ElseBegin => "ELSE_BEGIN",
            TokenKind::ElseEnd => "ELSE_END",
            TokenKind::ForBegin => "FOR_BEGIN",
            TokenKind::ForEnd => "FOR_END",
            TokenKind::WhileBegin => "WHILE_BEGIN",
            TokenKind::WhileEnd => "WHILE_END",
            TokenKind::DoBegin => "DO_BEGIN",
            TokenKind::DoEnd => "DO_END",
            TokenKind::SwitchBegin => "SWITCH_BEGIN",
            TokenKind::SwitchEnd => "SWITCH_END",
            TokenKind::TryBegin => "TRY_BEGIN",
            TokenKind::TryEnd => "TRY_END",
            TokenKind::CatchBegin => "CATCH_BEGIN",
            TokenKind::CatchEnd => "CATCH_END",
            TokenKind::Apply => "APPLY",
            TokenKind::Assign => "ASSIGN",
            TokenKind::Vardef => "VARDEF",
            TokenKind::Case => "CASE",
            TokenKind::Break => "BREAK",
            TokenKind::Continue => "CONTINUE",
            TokenKind::Goto => "GOTO",
            TokenKind::Return => "RETURN",
            TokenKind::Throw => "THROW",
            TokenKind::Newclass => "NEWCLASS",
            TokenKind::Newarray => "NEWARRAY",
            TokenKind::FileEnd => "FILE_END",
        }
    }

    pub fn from_name(name: &str) -> Option<TokenKind> {
        Self::ALL.iter().copied().find(|kind| kind.as_str() == name)
    }

    /// The construct this kind opens or closes, if it is a paired kind
    pub fn construct(&self) -> Option<ConstructKind> {
        ConstructKind::ALL
            .iter()
            .copied()
            .find(|c| c.begin() == *self || c.end() == *self)
    }

    pub fn is_begin(&self) -> bool {
        self.construct().is_some_and(|c| c.begin() == *self)
    }

    pub fn is_end(&self) -> bool {
        self.construct().is_some_and(|c| c.end() == *self)
    }

    pub fn is_unit(&self) -> bool {
        self.construct().is_none() && *self != TokenKind::FileEnd
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A construct whose extent is marked by a BEGIN/END pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConstructKind {
    Function,
    Class,
    Union,
    Enum,
    If,
    Else,
    For,
    While,
    Do,
    Switch,
    Try,
    Catch,
}

impl ConstructKind {
    pub const ALL: [ConstructKind; 12] = [
        ConstructKind::Function,
        ConstructKind::Class,
        ConstructKind::Union,
        ConstructKind::Enum,
        ConstructKind::If,
        ConstructKind::Else,
        ConstructKind::For,
        ConstructKind::While,
        ConstructKind::Do,
        ConstructKind::Switch,
        ConstructKind::Try,
        ConstructKind::Catch,
    ];

    pub fn begin(&self) -> TokenKind {
        match self {
            ConstructKind::Function => TokenKind::FunctionBegin,
            ConstructKind::Class => TokenKind::ClassBegin,
            ConstructKind::Union => TokenKind::UnionBegin,
            ConstructKind::Enum => TokenKind::EnumBegin,
            ConstructKind::If => TokenKind::IfBegin,
            ConstructKind::Else => TokenKind::ElseBegin,
            ConstructKind::For => TokenKind::ForBegin,
            ConstructKind::While => TokenKind::WhileBegin,
            ConstructKind::Do => TokenKind::DoBegin,
            ConstructKind::Switch => TokenKind::SwitchBegin,
            ConstructKind::Try => TokenKind::TryBegin,
            ConstructKind::Catch => TokenKind::CatchBegin,
        }
    }

    pub fn end(&self) -> TokenKind {
        match self {
            ConstructKind::Function => TokenKind::FunctionEnd,
            ConstructKind::Class => TokenKind::ClassEnd,
            ConstructKind::Union => TokenKind::UnionEnd,
            ConstructKind::Enum => TokenKind::EnumEnd,
            ConstructKind::If => TokenKind::IfEnd,
            ConstructKind::Else => TokenKind::ElseEnd,
            ConstructKind::For => TokenKind::ForEnd,
            ConstructKind::While => TokenKind::WhileEnd,
            ConstructKind::Do => TokenKind::DoEnd,
            ConstructKind::Switch => TokenKind::SwitchEnd,
            ConstructKind::Try => TokenKind::TryEnd,
            ConstructKind::Catch => TokenKind::CatchEnd,
        }
    }
}

impl fmt::Display for ConstructKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let begin = self.begin();
        f.write_str(begin.as_str().trim_end_matches("_BEGIN"))
    }
}
