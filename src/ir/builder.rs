use super::*;
use crate::ast::{ExprKind, Expression, Literal, Type};
use crate::symtab::{Scope, SymTab};

use std::collections::HashSet;

/// Source names in scope mapped to the IR variables holding their values.
pub type IrEnv<'a> = SymTab<'a, IRVar>;

pub struct IRBuilder {
    instructions: Vec<Instruction>,
    used_names: HashSet<String>,
    /// Vars that hold a source variable and can be overwritten by `=`.
    variables: HashSet<IRVar>,
    var_counter: usize,
    label_counter: usize,
}

impl IRBuilder {
    pub fn new<S: AsRef<str>>(reserved_names: &[S]) -> Self {
        let mut used_names: HashSet<String> = reserved_names
            .iter()
            .map(|name| name.as_ref().to_string())
            .collect();
        used_names.insert(UNIT.to_string());

        Self {
            instructions: Vec::new(),
            used_names,
            variables: HashSet::new(),
            var_counter: 0,
            label_counter: 0,
        }
    }

    /// A variable name no reserved name or earlier variable has taken.
    pub fn new_var(&mut self) -> IRVar {
        loop {
            self.var_counter += 1;
            let name = format!("x{}", self.var_counter);
            if self.used_names.insert(name.clone()) {
                return IRVar::new(name);
            }
        }
    }

    pub fn new_label(&mut self, prefix: &str) -> Label {
        self.label_counter += 1;
        Label::new(format!("{}{}", prefix, self.label_counter))
    }

    fn emit(&mut self, kind: InstructionKind, location: Location) {
        self.instructions.push(Instruction::new(kind, location));
    }

    pub fn finish(self) -> Vec<Instruction> {
        self.instructions
    }

    /// Emits the instructions computing `expr` and returns the variable
    /// that holds its value.
    pub fn lower(&mut self, env: &mut IrEnv<'_>, expr: &Expression) -> Result<IRVar, IrError> {
        let location = expr.location;
        match &expr.kind {
            ExprKind::Literal(Literal::Int(value)) => {
                let dest = self.new_var();
                self.emit(
                    InstructionKind::LoadIntConst {
                        value: *value,
                        dest: dest.clone(),
                    },
                    location,
                );
                Ok(dest)
            }
            ExprKind::Literal(Literal::Bool(value)) => {
                let dest = self.new_var();
                self.emit(
                    InstructionKind::LoadBoolConst {
                        value: *value,
                        dest: dest.clone(),
                    },
                    location,
                );
                Ok(dest)
            }
            ExprKind::Literal(Literal::Unit) => Ok(IRVar::unit()),

            ExprKind::Identifier { name } => require(env, name, location),

            ExprKind::UnaryOp { op, operand } => {
                let callee = require(env, &format!("unary_{op}"), location)?;
                let operand = self.lower(env, operand)?;
                Ok(self.call(callee, vec![operand], location))
            }

            ExprKind::BinaryOp { left, op, right } => match op.as_str() {
                "=" => self.lower_assignment(env, left, right, location),
                "and" | "or" => self.lower_short_circuit(env, left, op == "or", right, location),
                _ => {
                    let callee = require(env, op, location)?;
                    let arguments = self.lower_operands(env, &[left.as_ref(), right.as_ref()])?;
                    Ok(self.call(callee, arguments, location))
                }
            },

            ExprKind::IfExpression {
                condition,
                then_branch,
                else_branch,
            } => match else_branch {
                Some(else_branch) => {
                    self.lower_if_else(env, condition, then_branch, else_branch, location)
                }
                None => self.lower_if(env, condition, then_branch, location),
            },

            ExprKind::FunctionCall {
                function,
                arguments,
            } => {
                let operands: Vec<&Expression> = std::iter::once(function.as_ref())
                    .chain(arguments.iter())
                    .collect();
                let mut operands = self.lower_operands(env, &operands)?.into_iter();
                let callee = operands.next().unwrap_or_else(IRVar::unit);
                Ok(self.call(callee, operands.collect(), location))
            }

            ExprKind::VariableDeclaration { name, value } => {
                let value = self.lower(env, value)?;
                let var = self.new_var();
                self.copy(value, var.clone(), location);
                self.variables.insert(var.clone());
                env.define(name.clone(), var.clone());
                Ok(var)
            }

            ExprKind::Block { statements } => {
                let mut scope = env.create_child();
                let mut last = IRVar::unit();
                for statement in statements {
                    last = self.lower(&mut scope, statement)?;
                }
                Ok(last)
            }
        }
    }

    /// Lowers operands left to right. An operand that reads a source
    /// variable is copied out first when a later operand may assign to it,
    /// so the call sees the value from before the assignment.
    fn lower_operands(
        &mut self,
        env: &mut IrEnv<'_>,
        operands: &[&Expression],
    ) -> Result<Vec<IRVar>, IrError> {
        let mut vars = Vec::with_capacity(operands.len());
        for (i, operand) in operands.iter().enumerate() {
            let var = self.lower(env, operand)?;
            let overwritten_later = self.variables.contains(&var)
                && operands[i + 1..].iter().any(|later| assigns(later));
            if overwritten_later {
                let snapshot = self.new_var();
                self.copy(var, snapshot.clone(), operand.location);
                vars.push(snapshot);
            } else {
                vars.push(var);
            }
        }
        Ok(vars)
    }

    fn call(&mut self, callee: IRVar, arguments: Vec<IRVar>, location: Location) -> IRVar {
        let dest = self.new_var();
        self.emit(
            InstructionKind::Call {
                callee,
                arguments,
                dest: dest.clone(),
            },
            location,
        );
        dest
    }

    fn copy(&mut self, source: IRVar, dest: IRVar, location: Location) {
        self.emit(InstructionKind::Copy { source, dest }, location);
    }

    fn lower_assignment(
        &mut self,
        env: &mut IrEnv<'_>,
        target: &Expression,
        value: &Expression,
        location: Location,
    ) -> Result<IRVar, IrError> {
        let ExprKind::Identifier { name } = &target.kind else {
            return Err(IrError::NotAssignable {
                location: target.location,
            });
        };
        let var = require(env, name, target.location)?;
        let value = self.lower(env, value)?;
        self.copy(value, var.clone(), location);
        Ok(var)
    }

    /// `and` evaluates its right side only when the left is true, `or` only
    /// when it is false. The other path loads the deciding constant.
    fn lower_short_circuit(
        &mut self,
        env: &mut IrEnv<'_>,
        left: &Expression,
        is_or: bool,
        right: &Expression,
        location: Location,
    ) -> Result<IRVar, IrError> {
        let prefix = if is_or { "or" } else { "and" };
        let left = self.lower(env, left)?;

        let right_label = self.new_label(&format!("{prefix}_right"));
        let skip_label = self.new_label(&format!("{prefix}_skip"));
        let end_label = self.new_label(&format!("{prefix}_end"));

        let (then_label, else_label) = if is_or {
            (skip_label.clone(), right_label.clone())
        } else {
            (right_label.clone(), skip_label.clone())
        };
        self.emit(
            InstructionKind::CondJump {
                cond: left,
                then_label,
                else_label,
            },
            location,
        );

        let result = self.new_var();

        self.emit(InstructionKind::Label(right_label), location);
        let right = self.lower(env, right)?;
        self.copy(right, result.clone(), location);
        self.emit(InstructionKind::Jump(end_label.clone()), location);

        self.emit(InstructionKind::Label(skip_label), location);
        let constant = self.new_var();
        self.emit(
            InstructionKind::LoadBoolConst {
                value: is_or,
                dest: constant.clone(),
            },
            location,
        );
        self.copy(constant, result.clone(), location);

        self.emit(InstructionKind::Label(end_label), location);
        Ok(result)
    }

    fn lower_if(
        &mut self,
        env: &mut IrEnv<'_>,
        condition: &Expression,
        then_branch: &Expression,
        location: Location,
    ) -> Result<IRVar, IrError> {
        let cond = self.lower(env, condition)?;
        let then_label = self.new_label("then");
        let end_label = self.new_label("if_end");

        self.emit(
            InstructionKind::CondJump {
                cond,
                then_label: then_label.clone(),
                else_label: end_label.clone(),
            },
            location,
        );
        self.emit(InstructionKind::Label(then_label), location);
        self.lower(env, then_branch)?;
        self.emit(InstructionKind::Label(end_label), location);

        Ok(IRVar::unit())
    }

    fn lower_if_else(
        &mut self,
        env: &mut IrEnv<'_>,
        condition: &Expression,
        then_branch: &Expression,
        else_branch: &Expression,
        location: Location,
    ) -> Result<IRVar, IrError> {
        let cond = self.lower(env, condition)?;
        let then_label = self.new_label("then");
        let else_label = self.new_label("else");
        let end_label = self.new_label("if_end");

        self.emit(
            InstructionKind::CondJump {
                cond,
                then_label: then_label.clone(),
                else_label: else_label.clone(),
            },
            location,
        );

        self.emit(InstructionKind::Label(then_label), location);
        let then_var = self.lower(env, then_branch)?;
        // unit branches have nothing to merge
        let result = if then_var.is_unit() {
            None
        } else {
            let result = self.new_var();
            self.copy(then_var, result.clone(), location);
            Some(result)
        };
        self.emit(InstructionKind::Jump(end_label.clone()), location);

        self.emit(InstructionKind::Label(else_label), location);
        let else_var = self.lower(env, else_branch)?;
        if let Some(result) = &result {
            self.copy(else_var, result.clone(), location);
        }
        self.emit(InstructionKind::Label(end_label), location);

        Ok(result.unwrap_or_else(IRVar::unit))
    }
}

/// Whether evaluating `expr` may run an assignment.
fn assigns(expr: &Expression) -> bool {
    match &expr.kind {
        ExprKind::Literal(_) | ExprKind::Identifier { .. } => false,
        ExprKind::UnaryOp { operand, .. } => assigns(operand),
        ExprKind::BinaryOp { left, op, right } => op == "=" || assigns(left) || assigns(right),
        ExprKind::IfExpression {
            condition,
            then_branch,
            else_branch,
        } => {
            assigns(condition)
                || assigns(then_branch)
                || else_branch.as_deref().is_some_and(assigns)
        }
        ExprKind::FunctionCall {
            function,
            arguments,
        } => assigns(function) || arguments.iter().any(assigns),
        ExprKind::VariableDeclaration { value, .. } => assigns(value),
        ExprKind::Block { statements } => statements.iter().any(assigns),
    }
}

fn require(env: &IrEnv<'_>, name: &str, location: Location) -> Result<IRVar, IrError> {
    env.lookup(name).cloned().ok_or_else(|| IrError::UndefinedName {
        name: name.to_string(),
        location,
    })
}

/// Lowers a whole program. Every reserved name is bound to an IR variable
/// of the same name; a program whose value is an Int or Bool ends with a
/// call printing it.
pub fn generate_ir<S: AsRef<str>>(
    reserved_names: &[S],
    root: &Expression,
    root_type: &Type,
) -> Result<Vec<Instruction>, IrError> {
    let mut builder = IRBuilder::new(reserved_names);
    let mut env: IrEnv<'_> = reserved_names
        .iter()
        .map(|name| (name.as_ref().to_string(), IRVar::new(name.as_ref())))
        .collect();

    let result = builder.lower(&mut env, root)?;

    let printer = match root_type {
        Type::Int => Some("print_int"),
        Type::Bool => Some("print_bool"),
        _ => None,
    };
    if let Some(printer) = printer {
        let callee = require(&env, printer, root.location)?;
        builder.call(callee, vec![result], root.location);
    }

    Ok(builder.finish())
}
