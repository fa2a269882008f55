use super::*;

use std::collections::HashSet;

pub struct IRValidator;

impl IRValidator {
    /// Checks the shape `generate_ir` promises: labels are defined once and
    /// every jump lands on one, loads and calls write variables nobody wrote
    /// before, and nothing reads a variable before it is written.
    pub fn validate<S: AsRef<str>>(
        instructions: &[Instruction],
        reserved_names: &[S],
    ) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        let reserved: HashSet<&str> = reserved_names
            .iter()
            .map(|name| name.as_ref())
            .chain([UNIT])
            .collect();

        Self::validate_labels(instructions, &mut errors);
        Self::validate_variables(instructions, &reserved, &mut errors);

        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }

    fn validate_labels(instructions: &[Instruction], errors: &mut Vec<String>) {
        let mut defined = HashSet::new();
        for instruction in instructions {
            if let InstructionKind::Label(label) = &instruction.kind {
                if !defined.insert(&label.name) {
                    errors.push(format!(
                        "{}: {} is defined more than once",
                        instruction.location, label
                    ));
                }
            }
        }

        for instruction in instructions {
            let targets = match &instruction.kind {
                InstructionKind::Jump(label) => vec![label],
                InstructionKind::CondJump {
                    then_label,
                    else_label,
                    ..
                } => vec![then_label, else_label],
                _ => continue,
            };
            for label in targets {
                if !defined.contains(&label.name) {
                    errors.push(format!(
                        "{}: `{}` jumps to undefined {}",
                        instruction.location, instruction, label
                    ));
                }
            }
        }
    }

    fn validate_variables(
        instructions: &[Instruction],
        reserved: &HashSet<&str>,
        errors: &mut Vec<String>,
    ) {
        let mut written: HashSet<&str> = HashSet::new();

        for instruction in instructions {
            for operand in instruction.operands() {
                let name = operand.name.as_str();
                if !reserved.contains(name) && !written.contains(name) {
                    errors.push(format!(
                        "{}: `{}` reads {} before it is written",
                        instruction.location, instruction, operand
                    ));
                }
            }

            let Some(dest) = instruction.dest() else {
                continue;
            };
            let name = dest.name.as_str();
            if reserved.contains(name) {
                errors.push(format!(
                    "{}: `{}` overwrites reserved {}",
                    instruction.location, instruction, dest
                ));
                continue;
            }
            let fresh = written.insert(name);
            let is_copy = matches!(instruction.kind, InstructionKind::Copy { .. });
            if !fresh && !is_copy {
                errors.push(format!(
                    "{}: `{}` writes {} which already holds a value",
                    instruction.location, instruction, dest
                ));
            }
        }
    }
}
