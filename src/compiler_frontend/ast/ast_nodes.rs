//! ============================================================
//!                         AST Nodes
//! ============================================================
//! The syntax tree is an arena of nodes addressed by stable indices.
//!  - Every node stores its parent index and an ordered list of child indices
//!  - Child order is source evaluation order
//!  - The number and meaning of children is fixed per node kind
//!
//! Child layouts:
//!   Var          -> [Name declarator]+  (each declarator has an optional initializer child)
//!   If           -> [condition, then Block, else Block?]
//!   Case         -> [test, Block]
//!   Default      -> [Block]
//!   Label        -> [statement]
//!   While        -> [condition, Block]
//!   DoWhile      -> [Block, condition]
//!   For          -> [initializer, condition, update, Block] (Empty where omitted)
//!   Function     -> [Block]
//!   GetProp      -> [object]
//!   GetElem      -> [object, key]
//!   Call / New   -> [callee, arguments...]
//!   StringKey    -> [value]
//!   Hook         -> [condition, then value, else value]

use crate::compiler_frontend::tokenizer::tokens::TextLocation;
use std::fmt::{Display, Formatter, Result as FmtResult};

// ============================================================
// Stable IDs
// ============================================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u32);

impl NodeId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl Display for NodeId {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "node({})", self.0)
    }
}

#[derive(Debug, Clone)]
pub struct Node {
    pub kind: NodeKind,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
    pub location: TextLocation,

    /// Set for names that are known to be assigned exactly once and never mutated afterwards.
    pub is_constant_name: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    // --------------------------------------------------------
    // Statements
    // --------------------------------------------------------
    Script,
    Block,
    ExprResult,
    Var,
    If,
    Return,
    Switch,
    Case,
    Default,
    Label(String),
    While,
    DoWhile,
    For,
    Break(Option<String>),
    Continue(Option<String>),
    Throw,
    Empty,

    // --------------------------------------------------------
    // Expressions
    // --------------------------------------------------------
    Name(String),
    Number(f64),
    String(String),
    True,
    False,
    Null,
    This,
    ArrayLit,
    ObjectLit,
    StringKey(String),
    Function {
        name: Option<String>,
        params: Vec<String>,
    },
    Call,
    New,
    GetProp(String),
    GetElem,
    Assign,
    AssignOp(BinaryOperator),
    Hook,
    And,
    Or,
    Binary(BinaryOperator),
    Unary(UnaryOperator),
    Increment { is_decrement: bool, is_postfix: bool },
    Comma,
}

impl NodeKind {
    /// Short name of the kind for diagnostics
    pub fn describe(&self) -> &'static str {
        match self {
            NodeKind::Script => "script",
            NodeKind::Block => "block",
            NodeKind::ExprResult => "expression statement",
            NodeKind::Var => "var declaration",
            NodeKind::If => "if statement",
            NodeKind::Return => "return statement",
            NodeKind::Switch => "switch statement",
            NodeKind::Case => "case clause",
            NodeKind::Default => "default clause",
            NodeKind::Label(_) => "label",
            NodeKind::While => "while loop",
            NodeKind::DoWhile => "do-while loop",
            NodeKind::For => "for loop",
            NodeKind::Break(_) => "break",
            NodeKind::Continue(_) => "continue",
            NodeKind::Throw => "throw",
            NodeKind::Empty => "empty",
            NodeKind::Name(_) => "name",
            NodeKind::Number(_) => "number",
            NodeKind::String(_) => "string",
            NodeKind::True | NodeKind::False => "boolean",
            NodeKind::Null => "null",
            NodeKind::This => "this",
            NodeKind::ArrayLit => "array literal",
            NodeKind::ObjectLit => "object literal",
            NodeKind::StringKey(_) => "object key",
            NodeKind::Function { .. } => "function",
            NodeKind::Call => "call",
            NodeKind::New => "new",
            NodeKind::GetProp(_) => "property access",
            NodeKind::GetElem => "element access",
            NodeKind::Assign => "assignment",
            NodeKind::AssignOp(_) => "compound assignment",
            NodeKind::Hook => "conditional expression",
            NodeKind::And => "logical and",
            NodeKind::Or => "logical or",
            NodeKind::Binary(_) => "binary operation",
            NodeKind::Unary(_) => "unary operation",
            NodeKind::Increment { .. } => "increment",
            NodeKind::Comma => "comma expression",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOperator {
    Add,
    Subtract,
    Multiply,
    Divide,
    Modulus,
    Equal,
    NotEqual,
    StrictEqual,
    StrictNotEqual,
    LessThan,
    GreaterThan,
    LessThanOrEqual,
    GreaterThanOrEqual,
}

impl BinaryOperator {
    pub fn symbol(self) -> &'static str {
        match self {
            BinaryOperator::Add => "+",
            BinaryOperator::Subtract => "-",
            BinaryOperator::Multiply => "*",
            BinaryOperator::Divide => "/",
            BinaryOperator::Modulus => "%",
            BinaryOperator::Equal => "==",
            BinaryOperator::NotEqual => "!=",
            BinaryOperator::StrictEqual => "===",
            BinaryOperator::StrictNotEqual => "!==",
            BinaryOperator::LessThan => "<",
            BinaryOperator::GreaterThan => ">",
            BinaryOperator::LessThanOrEqual => "<=",
            BinaryOperator::GreaterThanOrEqual => ">=",
        }
    }

    pub fn precedence(self) -> u8 {
        match self {
            BinaryOperator::Multiply | BinaryOperator::Divide | BinaryOperator::Modulus => 13,
            BinaryOperator::Add | BinaryOperator::Subtract => 12,
            BinaryOperator::LessThan
            | BinaryOperator::GreaterThan
            | BinaryOperator::LessThanOrEqual
            | BinaryOperator::GreaterThanOrEqual => 10,
            BinaryOperator::Equal
            | BinaryOperator::NotEqual
            | BinaryOperator::StrictEqual
            | BinaryOperator::StrictNotEqual => 9,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOperator {
    Not,
    Negate,
    Plus,
    Typeof,
    Void,
    Delete,
}

impl UnaryOperator {
    pub fn symbol(self) -> &'static str {
        match self {
            UnaryOperator::Not => "!",
            UnaryOperator::Negate => "-",
            UnaryOperator::Plus => "+",
            UnaryOperator::Typeof => "typeof ",
            UnaryOperator::Void => "void ",
            UnaryOperator::Delete => "delete ",
        }
    }
}
