//! Diagnostic reporting for analysis results
//!
//! Binding errors come from the declaration binder, typing errors from the
//! type checker. Every diagnostic carries a stable code so drivers can
//! filter, explain and gate on them.

use std::fmt;

use crate::syntax::{ExpType, Operator};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    SymbolError,
    TypeError,
}

impl Severity {
    pub fn label(&self) -> &'static str {
        match self {
            Severity::SymbolError => "Symbol error",
            Severity::TypeError => "Type error",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::SymbolError => "symbol",
            Severity::TypeError => "type",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DiagnosticKind {
    #[error("`{name}` is already declared in this scope")]
    DuplicateDeclaration { name: String },
    #[error("`{name}` is not declared")]
    UndeclaredIdentifier { name: String },
    #[error("void value used as an operand of `{op}`")]
    VoidOperand { op: Operator },
    #[error("operands of `{op}` must have the same type, found {left} and {right}")]
    OperandTypeMismatch {
        op: Operator,
        left: ExpType,
        right: ExpType,
    },
    #[error("operands of `{op}` cannot both be arrays")]
    ArrayArrayOp { op: Operator },
    #[error("`{op}` is not defined on arrays")]
    ArrayArithmetic { op: Operator },
    #[error("index of `{name}` must be int, found {found}")]
    IndexTypeError { name: String, found: ExpType },
    #[error("`{callee}` takes {expected} argument(s) but {found} were supplied")]
    ArityMismatch {
        callee: String,
        expected: usize,
        found: usize,
    },
    #[error("argument {position} of `{callee}` is void")]
    VoidArgument { callee: String, position: usize },
    #[error("argument {position} of `{callee}` must be {expected}, found {found}")]
    ArgTypeMismatch {
        callee: String,
        position: usize,
        expected: ExpType,
        found: ExpType,
    },
    #[error("condition of `{statement}` is void")]
    VoidCondition { statement: &'static str },
    #[error("`{function}` returns {expected}, but this return {}", returned(.found))]
    ReturnTypeMismatch {
        function: String,
        expected: ExpType,
        found: Option<ExpType>,
    },
}

fn returned(found: &Option<ExpType>) -> String {
    match found {
        Some(ty) => format!("gives {ty}"),
        None => "gives no value".to_string(),
    }
}

impl DiagnosticKind {
    pub fn severity(&self) -> Severity {
        match self {
            DiagnosticKind::DuplicateDeclaration { .. }
            | DiagnosticKind::UndeclaredIdentifier { .. } => Severity::SymbolError,
            _ => Severity::TypeError,
        }
    }

    pub fn code(&self) -> &'static str {
        self.info().code
    }

    pub fn name(&self) -> &'static str {
        self.info().name
    }

    pub fn info(&self) -> &'static DiagnosticInfo {
        let index = match self {
            DiagnosticKind::DuplicateDeclaration { .. } => 0,
            DiagnosticKind::UndeclaredIdentifier { .. } => 1,
            DiagnosticKind::VoidOperand { .. } => 2,
            DiagnosticKind::OperandTypeMismatch { .. } => 3,
            DiagnosticKind::ArrayArrayOp { .. } => 4,
            DiagnosticKind::ArrayArithmetic { .. } => 5,
            DiagnosticKind::IndexTypeError { .. } => 6,
            DiagnosticKind::ArityMismatch { .. } => 7,
            DiagnosticKind::VoidArgument { .. } => 8,
            DiagnosticKind::ArgTypeMismatch { .. } => 9,
            DiagnosticKind::VoidCondition { .. } => 10,
            DiagnosticKind::ReturnTypeMismatch { .. } => 11,
        };
        &CATALOG[index]
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub line: u32,
    pub kind: DiagnosticKind,
}

impl Diagnostic {
    pub fn new(line: u32, kind: DiagnosticKind) -> Self {
        Self { line, kind }
    }

    pub fn severity(&self) -> Severity {
        self.kind.severity()
    }

    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    pub fn message(&self) -> String {
        self.kind.to_string()
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} at line {}: {}",
            self.severity().label(),
            self.line,
            self.kind
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagnosticInfo {
    pub code: &'static str,
    pub name: &'static str,
    pub severity: Severity,
    pub description: &'static str,
    pub example: &'static str,
}

impl DiagnosticInfo {
    /// Finds an entry by code (`T003`) or name (`OperandTypeMismatch`),
    /// ignoring case.
    pub fn find(code_or_name: &str) -> Option<&'static DiagnosticInfo> {
        CATALOG.iter().find(|info| {
            info.code.eq_ignore_ascii_case(code_or_name)
                || info.name.eq_ignore_ascii_case(code_or_name)
        })
    }
}

pub const CATALOG: &[DiagnosticInfo] = &[
    DiagnosticInfo {
        code: "S001",
        name: "DuplicateDeclaration",
        severity: Severity::SymbolError,
        description: "A name is declared twice in the same scope. Declaring the same name in a nested block or function shadows the outer one and is allowed.",
        example: "int x;\nint x;",
    },
    DiagnosticInfo {
        code: "S002",
        name: "UndeclaredIdentifier",
        severity: Severity::SymbolError,
        description: "A variable, array or function is used where no enclosing scope declares it. Locals of one function are invisible in another.",
        example: "void f(void) { int x; }\nvoid g(void) { x = 1; }",
    },
    DiagnosticInfo {
        code: "T001",
        name: "VoidOperand",
        severity: Severity::TypeError,
        description: "The result of a void function is used as an operand. Void values can only be discarded.",
        example: "int x;\nx = output(1) + 1;",
    },
    DiagnosticInfo {
        code: "T002",
        name: "OperandTypeMismatch",
        severity: Severity::TypeError,
        description: "The two operands of an operator or assignment have different types, such as an int and an array.",
        example: "int a[10];\nint x;\nx = a;",
    },
    DiagnosticInfo {
        code: "T003",
        name: "ArrayArrayOp",
        severity: Severity::TypeError,
        description: "Both operands of an arithmetic or comparison operator are whole arrays.",
        example: "int a[10];\nint b[5];\nint c;\nc = a - b;",
    },
    DiagnosticInfo {
        code: "T004",
        name: "ArrayArithmetic",
        severity: Severity::TypeError,
        description: "An array appears in subtraction from an int, or in a multiplication or division.",
        example: "int a[10];\nint x;\nx = x * a;",
    },
    DiagnosticInfo {
        code: "T005",
        name: "IndexTypeError",
        severity: Severity::TypeError,
        description: "An array is indexed with something other than an int.",
        example: "int a[10];\nint b[10];\na[b] = 1;",
    },
    DiagnosticInfo {
        code: "T006",
        name: "ArityMismatch",
        severity: Severity::TypeError,
        description: "A call supplies more or fewer arguments than the function declares.",
        example: "int f(int x) { return x; }\nf(1, 2);",
    },
    DiagnosticInfo {
        code: "T007",
        name: "VoidArgument",
        severity: Severity::TypeError,
        description: "A void value is passed as a call argument.",
        example: "output(output(1));",
    },
    DiagnosticInfo {
        code: "T008",
        name: "ArgTypeMismatch",
        severity: Severity::TypeError,
        description: "An argument's type differs from the declared parameter type, such as an int passed where an array is expected.",
        example: "void sort(int a[]) { }\nsort(3);",
    },
    DiagnosticInfo {
        code: "T009",
        name: "VoidCondition",
        severity: Severity::TypeError,
        description: "The condition of an if or while statement is a void value.",
        example: "if (output(1)) { }",
    },
    DiagnosticInfo {
        code: "T010",
        name: "ReturnTypeMismatch",
        severity: Severity::TypeError,
        description: "A void function returns a value, or an int function returns nothing or a non-int value.",
        example: "int f(void) { return; }",
    },
];
