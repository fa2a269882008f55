use std::fmt::{self, Display, Formatter};

pub mod builder;
pub mod irvalidator;


pub use builder::{IRBuilder, IrEnv, generate_ir};
pub use irvalidator::IRValidator;

use crate::diagnostics::{self, Diagnostic};
use crate::location::Location;

use ariadne::{Color, Fmt};
use thiserror::Error;
use yansi::Paint;

/// Name of the variable that stands for "no value".
pub const UNIT: &str = "unit";

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct IRVar {
    pub name: String,
}

impl IRVar {
    pub fn new(name: impl Into<String>) -> Self {
        IRVar { name: name.into() }
    }

    pub fn unit() -> Self {
        IRVar::new(UNIT)
    }

    pub fn is_unit(&self) -> bool {
        self.name == UNIT
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Label {
    pub name: String,
}

impl Label {
    pub fn new(name: impl Into<String>) -> Self {
        Label { name: name.into() }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Instruction {
    pub kind: InstructionKind,
    pub location: Location,
}

#[derive(Debug, Clone, PartialEq)]
pub enum InstructionKind {
    LoadIntConst {
        value: i64,
        dest: IRVar,
    },
    LoadBoolConst {
        value: bool,
        dest: IRVar,
    },
    Copy {
        source: IRVar,
        dest: IRVar,
    },
    Call {
        callee: IRVar,
        arguments: Vec<IRVar>,
        dest: IRVar,
    },

    // control flow
    Label(Label),
    Jump(Label),
    CondJump {
        cond: IRVar,
        then_label: Label,
        else_label: Label,
    },
}

impl Instruction {
    pub fn new(kind: InstructionKind, location: Location) -> Self {
        Instruction { kind, location }
    }

    /// Variables this instruction reads.
    pub fn operands(&self) -> Vec<&IRVar> {
        match &self.kind {
            InstructionKind::LoadIntConst { .. }
            | InstructionKind::LoadBoolConst { .. }
            | InstructionKind::Label(_)
            | InstructionKind::Jump(_) => vec![],
            InstructionKind::Copy { source, .. } => vec![source],
            InstructionKind::Call {
                callee, arguments, ..
            } => std::iter::once(callee).chain(arguments).collect(),
            InstructionKind::CondJump { cond, .. } => vec![cond],
        }
    }

    /// The variable this instruction writes, if any.
    pub fn dest(&self) -> Option<&IRVar> {
        match &self.kind {
            InstructionKind::LoadIntConst { dest, .. }
            | InstructionKind::LoadBoolConst { dest, .. }
            | InstructionKind::Copy { dest, .. }
            | InstructionKind::Call { dest, .. } => Some(dest),
            InstructionKind::Label(_)
            | InstructionKind::Jump(_)
            | InstructionKind::CondJump { .. } => None,
        }
    }
}

impl Display for IRVar {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

impl Display for Label {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "Label({})", self.name)
    }
}

impl Display for Instruction {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind)
    }
}

impl Display for InstructionKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            InstructionKind::LoadIntConst { value, dest } => {
                write!(f, "LoadIntConst({}, {})", value, dest)
            }
            InstructionKind::LoadBoolConst { value, dest } => {
                write!(f, "LoadBoolConst({}, {})", value, dest)
            }
            InstructionKind::Copy { source, dest } => write!(f, "Copy({}, {})", source, dest),
            InstructionKind::Call {
                callee,
                arguments,
                dest,
            } => {
                write!(f, "Call({}, [", callee)?;
                for (i, argument) in arguments.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", argument)?;
                }
                write!(f, "], {})", dest)
            }
            InstructionKind::Label(label) => write!(f, "{}", label),
            InstructionKind::Jump(label) => write!(f, "Jump({})", label),
            InstructionKind::CondJump {
                cond,
                then_label,
                else_label,
            } => write!(f, "CondJump({}, {}, {})", cond, then_label, else_label),
        }
    }
}

/// One instruction per line, the listing the driver prints.
pub fn listing(instructions: &[Instruction]) -> String {
    instructions
        .iter()
        .map(|instruction| format!("{instruction}\n"))
        .collect()
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum IrError {
    #[error("{location}: no IR variable bound to \"{name}\"")]
    UndefinedName { name: String, location: Location },

    #[error("{location}: only a variable can be assigned to")]
    NotAssignable { location: Location },
}

impl IrError {
    pub fn location(&self) -> Location {
        match self {
            IrError::UndefinedName { location, .. } | IrError::NotAssignable { location } => {
                *location
            }
        }
    }

    pub fn to_report(&self, file: &str, source: &str) -> Diagnostic {
        match self {
            IrError::UndefinedName { name, location } => diagnostics::report_at(
                file,
                source,
                *location,
                "Internal Error",
                "name without an IR variable",
                format!("{} has no IR variable in scope", Fmt::fg(name, Color::Red).bold()),
                Some("builtins must be passed as reserved names".to_string()),
            ),
            IrError::NotAssignable { location } => diagnostics::report_at(
                file,
                source,
                *location,
                "Internal Error",
                "invalid assignment target",
                "the left side of this `=` is not a variable",
                None,
            ),
        }
    }
}
