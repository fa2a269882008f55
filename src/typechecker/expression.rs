use crate::ast::{ExprKind, Expression, Literal, Type};
use crate::location::Location;
use crate::symtab::Scope;
use crate::typechecker::{TypeEnv, TypeError};

use crate::t_bool;
use crate::t_int;
use crate::t_unit;

/// Type of `expr` under `env`. Declarations in `expr` land in `env`
/// itself; blocks open their own child scope.
pub fn check_expression(env: &mut TypeEnv<'_>, expr: &Expression) -> Result<Type, TypeError> {
    match &expr.kind {
        ExprKind::Literal(literal) => Ok(match literal {
            Literal::Int(_) => t_int!(),
            Literal::Bool(_) => t_bool!(),
            Literal::Unit => t_unit!(),
        }),

        ExprKind::Identifier { name } => lookup(env, name, expr.location),

        ExprKind::UnaryOp { op, operand } => {
            let operand_type = check_expression(env, operand)?;
            let name = format!("unary_{op}");
            let (params, return_type) = operator_signature(env, &name, expr.location)?;
            let [param] = params.as_slice() else {
                return Err(arity_mismatch(&name, params.len(), 1, expr.location));
            };
            expect(param, &operand_type, format!("operand of \"{op}\""), operand.location)?;
            Ok(return_type)
        }

        ExprKind::BinaryOp { left, op, right } => check_binary(env, left, op, right, expr.location),

        ExprKind::IfExpression {
            condition,
            then_branch,
            else_branch,
        } => {
            let condition_type = check_expression(env, condition)?;
            expect(&t_bool!(), &condition_type, "if condition".to_string(), condition.location)?;

            let then_type = check_expression(env, then_branch)?;
            match else_branch {
                Some(else_branch) => {
                    let else_type = check_expression(env, else_branch)?;
                    if then_type != else_type {
                        return Err(TypeError::BranchMismatch {
                            then_type,
                            else_type,
                            location: else_branch.location,
                        });
                    }
                    Ok(then_type)
                }
                None => {
                    expect(
                        &t_unit!(),
                        &then_type,
                        "then-branch of an if without else".to_string(),
                        then_branch.location,
                    )?;
                    Ok(t_unit!())
                }
            }
        }

        ExprKind::FunctionCall {
            function,
            arguments,
        } => check_call(env, function, arguments),

        ExprKind::VariableDeclaration { name, value } => {
            let ty = check_expression(env, value)?;
            env.define(name.clone(), ty.clone());
            Ok(ty)
        }

        ExprKind::Block { statements } => {
            let mut scope = env.create_child();
            let mut last = t_unit!();
            for statement in statements {
                last = check_expression(&mut scope, statement)?;
            }
            Ok(last)
        }
    }
}

fn check_binary(
    env: &mut TypeEnv<'_>,
    left: &Expression,
    op: &str,
    right: &Expression,
    location: Location,
) -> Result<Type, TypeError> {
    if op == "=" {
        let ExprKind::Identifier { name } = &left.kind else {
            return Err(TypeError::NotAssignable {
                location: left.location,
            });
        };
        let variable_type = lookup(env, name, left.location)?;
        let value_type = check_expression(env, right)?;
        expect(
            &variable_type,
            &value_type,
            format!("value assigned to \"{name}\""),
            right.location,
        )?;
        return Ok(value_type);
    }

    let left_type = check_expression(env, left)?;
    let right_type = check_expression(env, right)?;

    if op == "==" || op == "!=" {
        if left_type != right_type {
            return Err(TypeError::UnequalOperands {
                op: op.to_string(),
                left: left_type,
                right: right_type,
                location,
            });
        }
        return Ok(t_bool!());
    }

    let (params, return_type) = operator_signature(env, op, location)?;
    let [left_param, right_param] = params.as_slice() else {
        return Err(arity_mismatch(op, params.len(), 2, location));
    };
    expect(left_param, &left_type, format!("left operand of \"{op}\""), left.location)?;
    expect(right_param, &right_type, format!("right operand of \"{op}\""), right.location)?;
    Ok(return_type)
}

fn check_call(
    env: &mut TypeEnv<'_>,
    function: &Expression,
    arguments: &[Expression],
) -> Result<Type, TypeError> {
    let (params, return_type) = match check_expression(env, function)? {
        Type::Function {
            params,
            return_type,
        } => (params, return_type),
        found => {
            return Err(TypeError::NotAFunction {
                found,
                location: function.location,
            });
        }
    };

    let name = match &function.kind {
        ExprKind::Identifier { name } => name.clone(),
        _ => "function".to_string(),
    };
    if params.len() != arguments.len() {
        return Err(arity_mismatch(&name, params.len(), arguments.len(), function.location));
    }

    for (i, (param, argument)) in params.iter().zip(arguments).enumerate() {
        let argument_type = check_expression(env, argument)?;
        expect(
            param,
            &argument_type,
            format!("argument {} of \"{name}\"", i + 1),
            argument.location,
        )?;
    }
    Ok(*return_type)
}

fn lookup(env: &TypeEnv<'_>, name: &str, location: Location) -> Result<Type, TypeError> {
    env.lookup(name)
        .cloned()
        .ok_or_else(|| TypeError::UndefinedName {
            name: name.to_string(),
            location,
        })
}

/// Parameter and return types of a builtin operator.
fn operator_signature(
    env: &TypeEnv<'_>,
    op: &str,
    location: Location,
) -> Result<(Vec<Type>, Type), TypeError> {
    match lookup(env, op, location)? {
        Type::Function {
            params,
            return_type,
        } => Ok((params, *return_type)),
        found => Err(TypeError::NotAFunction { found, location }),
    }
}

fn arity_mismatch(function: &str, expected: usize, found: usize, location: Location) -> TypeError {
    TypeError::ArityMismatch {
        function: function.to_string(),
        expected,
        found,
        location,
    }
}

fn expect(expected: &Type, found: &Type, context: String, location: Location) -> Result<(), TypeError> {
    if expected == found {
        return Ok(());
    }
    Err(TypeError::Mismatch {
        context,
        expected: expected.clone(),
        found: found.clone(),
        location,
    })
}
