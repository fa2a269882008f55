use crate::location::Location;

use std::fmt::{self, Display, Formatter};

#[derive(Debug, Clone, PartialEq)]
pub struct Expression {
    pub kind: ExprKind,
    pub location: Location,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ExprKind {
    Literal(Literal),

    Identifier {
        name: String,
    },

    UnaryOp {
        op: String,
        operand: Box<Expression>,
    },

    // assignment is a binary op with `op == "="` and an identifier on the left
    BinaryOp {
        left: Box<Expression>,
        op: String,
        right: Box<Expression>,
    },

    IfExpression {
        condition: Box<Expression>,
        then_branch: Box<Expression>,
        else_branch: Option<Box<Expression>>,
    },

    FunctionCall {
        function: Box<Expression>,
        arguments: Vec<Expression>,
    },

    VariableDeclaration {
        name: String,
        value: Box<Expression>,
    },

    Block {
        statements: Vec<Expression>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Int(i64),
    Bool(bool),
    Unit,
}

impl Expression {
    pub fn new(kind: ExprKind, location: Location) -> Self {
        Expression { kind, location }
    }

    pub fn int(value: i64, location: Location) -> Self {
        Expression::new(ExprKind::Literal(Literal::Int(value)), location)
    }

    pub fn bool(value: bool, location: Location) -> Self {
        Expression::new(ExprKind::Literal(Literal::Bool(value)), location)
    }

    pub fn unit(location: Location) -> Self {
        Expression::new(ExprKind::Literal(Literal::Unit), location)
    }

    pub fn identifier(name: impl Into<String>, location: Location) -> Self {
        Expression::new(ExprKind::Identifier { name: name.into() }, location)
    }

    pub fn unary(op: impl Into<String>, operand: Expression, location: Location) -> Self {
        Expression::new(
            ExprKind::UnaryOp {
                op: op.into(),
                operand: Box::new(operand),
            },
            location,
        )
    }

    pub fn binary(
        left: Expression,
        op: impl Into<String>,
        right: Expression,
        location: Location,
    ) -> Self {
        Expression::new(
            ExprKind::BinaryOp {
                left: Box::new(left),
                op: op.into(),
                right: Box::new(right),
            },
            location,
        )
    }

    pub fn if_else(
        condition: Expression,
        then_branch: Expression,
        else_branch: Option<Expression>,
        location: Location,
    ) -> Self {
        Expression::new(
            ExprKind::IfExpression {
                condition: Box::new(condition),
                then_branch: Box::new(then_branch),
                else_branch: else_branch.map(Box::new),
            },
            location,
        )
    }

    pub fn call(function: Expression, arguments: Vec<Expression>, location: Location) -> Self {
        Expression::new(
            ExprKind::FunctionCall {
                function: Box::new(function),
                arguments,
            },
            location,
        )
    }

    pub fn var(name: impl Into<String>, value: Expression, location: Location) -> Self {
        Expression::new(
            ExprKind::VariableDeclaration {
                name: name.into(),
                value: Box::new(value),
            },
            location,
        )
    }

    pub fn block(statements: Vec<Expression>, location: Location) -> Self {
        Expression::new(ExprKind::Block { statements }, location)
    }

    /// Statements after which a block may omit the `;` separator.
    pub fn is_compound(&self) -> bool {
        matches!(
            self.kind,
            ExprKind::IfExpression { .. }
                | ExprKind::Block { .. }
                | ExprKind::FunctionCall { .. }
                | ExprKind::VariableDeclaration { .. }
        )
    }
}

#[derive(Debug, PartialEq, Eq, Hash, Clone)]
pub enum Type {
    Int,
    Bool,
    Unit,
    Function {
        params: Vec<Type>,
        return_type: Box<Type>,
    },
}

impl Type {
    pub fn function(params: Vec<Type>, return_type: Type) -> Self {
        Type::Function {
            params,
            return_type: Box::new(return_type),
        }
    }
}

impl Display for Type {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Type::Int => write!(f, "Int"),
            Type::Bool => write!(f, "Bool"),
            Type::Unit => write!(f, "Unit"),
            Type::Function {
                params,
                return_type,
            } => {
                write!(f, "(")?;
                for (i, param) in params.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{param}")?;
                }
                write!(f, ") => {return_type}")
            }
        }
    }
}

#[macro_export]
macro_rules! t_int {
    () => {
        $crate::ast::Type::Int
    };
}

#[macro_export]
macro_rules! t_bool {
    () => {
        $crate::ast::Type::Bool
    };
}

#[macro_export]
macro_rules! t_unit {
    () => {
        $crate::ast::Type::Unit
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn function_types_display_like_signatures() {
        let ty = Type::function(vec![t_int!(), t_int!()], t_bool!());
        assert_eq!(ty.to_string(), "(Int, Int) => Bool");
        assert_eq!(Type::function(vec![], t_unit!()).to_string(), "() => Unit");
    }

    #[test]
    fn compound_statements() {
        let l = Location::synthetic();
        assert!(Expression::block(vec![], l).is_compound());
        assert!(Expression::var("x", Expression::int(1, l), l).is_compound());
        assert!(!Expression::identifier("x", l).is_compound());
        assert!(!Expression::binary(Expression::int(1, l), "+", Expression::int(2, l), l).is_compound());
    }
}
