//! Token-stream parser: alias rewriting, operand forms and mnemonic
//! dispatch into instruction records.

use super::symbol_table::SymbolTable;
use crate::consts::ZERO_REGISTER;
use crate::error::ParseError;
use crate::instruction::{
    AddressingMode, ArithmeticOp, BitMode, Branch, Condition, DataTransfer, DpImmediate,
    DpRegister, Instruction, LogicalOp, MultiplyOp, RegisterId, ShiftType, WideMoveOp,
};

/// Alias table: alias, replacement mnemonic and the token index where the
/// zero register is inserted.
const ALIASES: &[(&str, &str, usize)] = &[
    ("cmp", "subs", 1),
    ("cmn", "adds", 1),
    ("neg", "sub", 2),
    ("negs", "subs", 2),
    ("tst", "ands", 1),
    ("mvn", "orn", 2),
    ("mov", "orr", 2),
    ("mul", "madd", 4),
    ("mneg", "msub", 4),
];

/// Parses a tokenised executable line into an instruction record.
///
/// `address` is the line's own instruction address, used to turn label
/// operands into PC-relative word offsets.
pub(crate) fn parse_instruction(
    tokens: &[String],
    labels: &SymbolTable,
    address: u32,
) -> Result<Instruction, ParseError> {
    let tokens = rewrite_alias(tokens)?;
    let mnemonic = tokens.first().map(String::as_str).unwrap_or_default();

    match mnemonic {
        "add" | "adds" | "sub" | "subs" => parse_arithmetic(&tokens),
        "movn" | "movz" | "movk" => parse_wide_move(&tokens),
        "and" | "bic" | "orr" | "orn" | "eor" | "eon" | "ands" | "bics" => parse_logical(&tokens),
        "madd" | "msub" => parse_multiply(&tokens),
        "ldr" | "str" => parse_data_transfer(&tokens, labels, address),
        "b" | "br" => parse_branch(&tokens, labels, address),
        _ => Err(ParseError::UnknownMnemonic(mnemonic.to_owned())),
    }
}

/// Parses the operand of an `.int` directive: `0x…` hex or decimal, with a
/// leading `-` accepted and wrapped.
pub(crate) fn parse_literal(token: &str) -> Result<u32, ParseError> {
    parse_number(token).ok_or_else(|| ParseError::InvalidLiteral(token.to_owned()))
}

/// Rewrites an alias mnemonic into its base form, inserting the zero
/// register of the first operand's bit mode at the table's position.
/// Non-alias token streams pass through unchanged.
fn rewrite_alias(tokens: &[String]) -> Result<Vec<String>, ParseError> {
    let mut tokens = tokens.to_vec();
    let alias = tokens
        .first()
        .and_then(|mnemonic| ALIASES.iter().find(|(alias, ..)| mnemonic == alias));

    if let Some(&(_, mnemonic, index)) = alias {
        let (_, mode) = parse_register(operand(&tokens, 1)?)?;
        let zero = match mode {
            BitMode::Bit32 => "wzr",
            BitMode::Bit64 => "xzr",
        };
        tokens[0] = mnemonic.to_owned();
        tokens.insert(index.min(tokens.len()), zero.to_owned());
    }

    Ok(tokens)
}

fn parse_arithmetic(tokens: &[String]) -> Result<Instruction, ParseError> {
    let op = arithmetic_op(&tokens[0]);
    let (rd, sf) = parse_register(operand(tokens, 1)?)?;
    let (rn, _) = parse_register(operand(tokens, 2)?)?;
    let operand2 = operand(tokens, 3)?;

    if is_immediate(operand2) {
        let imm12 = parse_immediate(operand2)? as u16;
        let amount = if tokens.len() == 4 {
            0
        } else {
            parse_immediate(operand(tokens, 5)?)?
        };
        Ok(Instruction::DataProcessingImmediate(DpImmediate::Arithmetic {
            sf,
            op,
            sh: amount / 12 == 1,
            imm12,
            rn,
            rd,
        }))
    } else {
        let (rm, _) = parse_register(operand2)?;
        let (shift, amount) = parse_optional_shift(tokens, 4)?;
        Ok(Instruction::DataProcessingRegister(DpRegister::Arithmetic {
            sf,
            op,
            shift,
            amount,
            rm,
            rn,
            rd,
        }))
    }
}

fn parse_wide_move(tokens: &[String]) -> Result<Instruction, ParseError> {
    let op = match tokens[0].as_str() {
        "movn" => WideMoveOp::Movn,
        "movz" => WideMoveOp::Movz,
        _ => WideMoveOp::Movk,
    };
    let (rd, sf) = parse_register(operand(tokens, 1)?)?;
    let imm16 = parse_immediate(operand(tokens, 2)?)? as u16;
    let amount = if tokens.len() == 3 {
        0
    } else {
        parse_immediate(operand(tokens, 4)?)?
    };

    Ok(Instruction::DataProcessingImmediate(DpImmediate::WideMove {
        sf,
        op,
        hw: (amount / 16) as u8,
        imm16,
        rd,
    }))
}

fn parse_logical(tokens: &[String]) -> Result<Instruction, ParseError> {
    let op = match tokens[0].as_str() {
        "and" => LogicalOp::And,
        "bic" => LogicalOp::Bic,
        "orr" => LogicalOp::Orr,
        "orn" => LogicalOp::Orn,
        "eor" => LogicalOp::Eor,
        "eon" => LogicalOp::Eon,
        "ands" => LogicalOp::Ands,
        _ => LogicalOp::Bics,
    };
    let (rd, sf) = parse_register(operand(tokens, 1)?)?;
    let (rn, _) = parse_register(operand(tokens, 2)?)?;
    let (rm, _) = parse_register(operand(tokens, 3)?)?;
    let (shift, amount) = parse_optional_shift(tokens, 4)?;

    Ok(Instruction::DataProcessingRegister(DpRegister::Logical {
        sf,
        op,
        shift,
        amount,
        rm,
        rn,
        rd,
    }))
}

fn parse_multiply(tokens: &[String]) -> Result<Instruction, ParseError> {
    let op = if tokens[0] == "madd" {
        MultiplyOp::Madd
    } else {
        MultiplyOp::Msub
    };
    let (rd, sf) = parse_register(operand(tokens, 1)?)?;
    let (rn, _) = parse_register(operand(tokens, 2)?)?;
    let (rm, _) = parse_register(operand(tokens, 3)?)?;
    let (ra, _) = parse_register(operand(tokens, 4)?)?;

    Ok(Instruction::DataProcessingRegister(DpRegister::Multiply {
        sf,
        op,
        rm,
        ra,
        rn,
        rd,
    }))
}

fn parse_data_transfer(
    tokens: &[String],
    labels: &SymbolTable,
    address: u32,
) -> Result<Instruction, ParseError> {
    let load = tokens[0] == "ldr";
    let (rt, sf) = parse_register(operand(tokens, 1)?)?;
    let second = operand(tokens, 2)?;

    if second.starts_with('[') {
        let (xn, _) = parse_register(second)?;
        let mode = if tokens.len() == 3 {
            AddressingMode::UnsignedOffset(0)
        } else {
            let third = operand(tokens, 3)?;
            if is_immediate(third) {
                let value = parse_immediate(third)?;
                if third.ends_with(']') {
                    // The unscaled byte offset is stored divided by the
                    // transfer size.
                    AddressingMode::UnsignedOffset((value / sf.bytes() as u32) as u16)
                } else if third.ends_with('!') {
                    AddressingMode::PreIndex(value as i16)
                } else {
                    AddressingMode::PostIndex(value as i16)
                }
            } else {
                let (xm, _) = parse_register(third)?;
                AddressingMode::RegisterOffset(xm)
            }
        };

        Ok(Instruction::SingleDataTransfer(DataTransfer::Sdt {
            sf,
            load,
            mode,
            xn,
            rt,
        }))
    } else {
        let simm19 = if is_immediate(second) {
            parse_immediate(second)? as i32
        } else {
            word_offset(labels, second, address)?
        };
        Ok(Instruction::SingleDataTransfer(DataTransfer::LoadLiteral {
            sf,
            simm19,
            rt,
        }))
    }
}

fn parse_branch(
    tokens: &[String],
    labels: &SymbolTable,
    address: u32,
) -> Result<Instruction, ParseError> {
    let branch = if tokens[0] == "br" {
        let (xn, _) = parse_register(operand(tokens, 1)?)?;
        Branch::Register { xn }
    } else if tokens.len() == 2 {
        Branch::Unconditional {
            simm26: word_offset(labels, operand(tokens, 1)?, address)?,
        }
    } else {
        Branch::Conditional {
            cond: condition(operand(tokens, 1)?)?,
            simm19: word_offset(labels, operand(tokens, 2)?, address)?,
        }
    };

    Ok(Instruction::Branch(branch))
}

/// PC-relative word offset from `address` to a label.
fn word_offset(labels: &SymbolTable, label: &str, address: u32) -> Result<i32, ParseError> {
    let target = labels
        .lookup(label)
        .ok_or_else(|| ParseError::UndefinedLabel(label.to_owned()))?;
    Ok(((target as i64 - address as i64) / 4) as i32)
}

fn operand(tokens: &[String], index: usize) -> Result<&str, ParseError> {
    tokens
        .get(index)
        .map(String::as_str)
        .ok_or(ParseError::MissingOperand { index })
}

/// The leading character selects the bit mode (`w`/`x`), a `zr` suffix the
/// zero register, anything else a decimal index. Surrounding address
/// punctuation (`[`, `]`, `!`) is ignored.
fn parse_register(token: &str) -> Result<(RegisterId, BitMode), ParseError> {
    let name = token.trim_matches(|c| matches!(c, '[' | ']' | '!'));
    let mode = match name.chars().next() {
        Some('w') => BitMode::Bit32,
        Some('x') => BitMode::Bit64,
        _ => return Err(ParseError::InvalidRegister(token.to_owned())),
    };

    let index = if &name[1..] == "zr" {
        ZERO_REGISTER
    } else {
        name[1..]
            .parse::<RegisterId>()
            .ok()
            .filter(|index| *index < ZERO_REGISTER)
            .ok_or_else(|| ParseError::InvalidRegister(token.to_owned()))?
    };

    Ok((index, mode))
}

fn is_immediate(token: &str) -> bool {
    token.starts_with('#')
}

/// `#`-prefixed hex (`#0x…`) or decimal immediate, with trailing address
/// punctuation ignored and a leading `-` wrapped into two's complement.
fn parse_immediate(token: &str) -> Result<u32, ParseError> {
    token
        .strip_prefix('#')
        .map(|digits| digits.trim_end_matches(|c| matches!(c, ']' | '!')))
        .and_then(parse_number)
        .ok_or_else(|| ParseError::InvalidImmediate(token.to_owned()))
}

fn parse_number(digits: &str) -> Option<u32> {
    if let Some(hex) = digits.strip_prefix("0x").or_else(|| digits.strip_prefix("0X")) {
        u32::from_str_radix(hex, 16).ok()
    } else if let Some(negated) = digits.strip_prefix('-') {
        negated.parse::<u32>().map(u32::wrapping_neg).ok()
    } else {
        digits.parse().ok()
    }
}

fn arithmetic_op(mnemonic: &str) -> ArithmeticOp {
    match mnemonic {
        "add" => ArithmeticOp::Add,
        "adds" => ArithmeticOp::Adds,
        "sub" => ArithmeticOp::Sub,
        _ => ArithmeticOp::Subs,
    }
}

fn parse_optional_shift(tokens: &[String], index: usize) -> Result<(ShiftType, u8), ParseError> {
    if tokens.len() <= index {
        return Ok((ShiftType::Lsl, 0));
    }
    let shift = match operand(tokens, index)? {
        "lsl" => ShiftType::Lsl,
        "lsr" => ShiftType::Lsr,
        "asr" => ShiftType::Asr,
        "ror" => ShiftType::Ror,
        other => return Err(ParseError::InvalidShift(other.to_owned())),
    };
    let amount = parse_immediate(operand(tokens, index + 1)?)? as u8;
    Ok((shift, amount))
}

fn condition(token: &str) -> Result<Condition, ParseError> {
    match token {
        "eq" => Ok(Condition::Eq),
        "ne" => Ok(Condition::Ne),
        "ge" => Ok(Condition::Ge),
        "lt" => Ok(Condition::Lt),
        "gt" => Ok(Condition::Gt),
        "le" => Ok(Condition::Le),
        "al" => Ok(Condition::Al),
        _ => Err(ParseError::InvalidCondition(token.to_owned())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(parts: &[&str]) -> Vec<String> {
        parts.iter().map(|part| (*part).to_owned()).collect()
    }

    #[test]
    fn registers_carry_index_and_mode() {
        assert_eq!(parse_register("w5").unwrap(), (5, BitMode::Bit32));
        assert_eq!(parse_register("x30").unwrap(), (30, BitMode::Bit64));
        assert_eq!(parse_register("xzr").unwrap(), (31, BitMode::Bit64));
        assert_eq!(parse_register("[x2]").unwrap(), (2, BitMode::Bit64));
        assert!(parse_register("x32").is_err());
        assert!(parse_register("r3").is_err());
    }

    #[test]
    fn immediates_accept_hex_decimal_and_negative() {
        assert_eq!(parse_immediate("#42").unwrap(), 42);
        assert_eq!(parse_immediate("#0x1F").unwrap(), 0x1F);
        assert_eq!(parse_immediate("#8]").unwrap(), 8);
        assert_eq!(parse_immediate("#-8]!").unwrap(), 8u32.wrapping_neg());
        assert!(parse_immediate("42").is_err());
        assert!(parse_immediate("#4x2").is_err());
    }

    #[test]
    fn aliases_insert_the_zero_register() {
        let rewritten = rewrite_alias(&tokens(&["cmp", "x0", "#2"])).unwrap();
        assert_eq!(rewritten, tokens(&["subs", "xzr", "x0", "#2"]));

        let rewritten = rewrite_alias(&tokens(&["mov", "w1", "w2"])).unwrap();
        assert_eq!(rewritten, tokens(&["orr", "w1", "wzr", "w2"]));

        let rewritten = rewrite_alias(&tokens(&["mul", "x0", "x1", "x2"])).unwrap();
        assert_eq!(rewritten, tokens(&["madd", "x0", "x1", "x2", "xzr"]));
    }

    #[test]
    fn non_aliases_pass_through() {
        let stream = tokens(&["add", "x0", "x1", "#2"]);
        assert_eq!(rewrite_alias(&stream).unwrap(), stream);
    }

    #[test]
    fn missing_operands_are_reported() {
        let labels = SymbolTable::new();
        assert!(matches!(
            parse_instruction(&tokens(&["add", "x0"]), &labels, 0),
            Err(ParseError::MissingOperand { index: 2 })
        ));
    }
}
