//! Assembler behaviour: passes, directives, aliases and failure reporting.

use a64_vm::prelude::*;
use quickcheck_macros::quickcheck;

fn assemble(source: &str) -> Vec<u8> {
    Assembler::new()
        .assemble(source)
        .expect("source should assemble")
}

#[test]
fn empty_and_blank_lines_emit_nothing() {
    assert!(assemble("").is_empty());
    assert!(assemble("\n   \n\t\n").is_empty());
}

#[test]
fn labels_emit_nothing_and_do_not_take_addresses() {
    let with_labels = assemble("first:\nmovz x0, #1\nsecond:\n\nmovz x1, #2\n");
    let without = assemble("movz x0, #1\nmovz x1, #2\n");
    assert_eq!(with_labels, without);
}

#[test]
fn nop_and_int_are_emitted_verbatim() {
    assert_eq!(assemble("nop"), 0xD503201Fu32.to_le_bytes());
    assert_eq!(assemble(".int 0x8a000000"), 0x8A000000u32.to_le_bytes());
    assert_eq!(assemble(".int 19088743"), 0x01234567u32.to_le_bytes());
}

#[quickcheck]
fn int_directives_pass_through_little_endian(value: u32) -> bool {
    assemble(&format!(".int {value}")) == value.to_le_bytes()
        && assemble(&format!(".int 0x{value:x}")) == value.to_le_bytes()
}

#[test]
fn aliases_match_their_expansions() {
    let cases = [
        ("cmp x3, #7", "subs xzr, x3, #7"),
        ("cmn w1, w2", "adds wzr, w1, w2"),
        ("neg x4, x5", "sub x4, xzr, x5"),
        ("negs w6, w7", "subs w6, wzr, w7"),
        ("tst x1, x2", "ands xzr, x1, x2"),
        ("mvn x8, x9", "orn x8, xzr, x9"),
        ("mov x0, x1", "orr x0, xzr, x1"),
        ("mul x2, x3, x4", "madd x2, x3, x4, xzr"),
        ("mneg w2, w3, w4", "msub w2, w3, w4, wzr"),
    ];

    for (alias, expansion) in cases {
        assert_eq!(assemble(alias), assemble(expansion), "{alias}");
    }
}

#[test]
fn forward_and_backward_references_resolve() {
    let program = assemble("b end\nloop:\nsub x0, x0, #1\nb.ne loop\nend:\n.int 0x8a000000");
    let words: Vec<u32> = program
        .chunks_exact(4)
        .map(|chunk| u32::from_le_bytes(chunk.try_into().unwrap()))
        .collect();

    // b @0 to end=12: +3 words; b.ne @8 to loop=4: -1 word.
    assert_eq!(words[0], 0x14000003);
    assert_eq!(words[2], 0x54FFFFE1);
}

#[test]
fn unknown_mnemonics_name_the_line() {
    let error = Assembler::new()
        .assemble("nop\nnop\nfrobnicate x0\n")
        .unwrap_err();

    match error {
        AssembleError::Parse { line, source } => {
            assert_eq!(line, 3);
            assert_eq!(source, ParseError::UnknownMnemonic("frobnicate".to_owned()));
        }
        other => panic!("unexpected error {other:?}"),
    }
}

#[test]
fn undefined_labels_are_reported() {
    let error = Assembler::new().assemble("b nowhere\n").unwrap_err();

    assert!(matches!(
        error,
        AssembleError::Parse {
            line: 1,
            source: ParseError::UndefinedLabel(label),
        } if label == "nowhere"
    ));
}

#[test]
fn malformed_operands_are_reported() {
    for source in ["add x0, x1", "movz q0, #1", "add x0, x1, #zz", "b.xx somewhere"] {
        assert!(
            matches!(
                Assembler::new().assemble(source),
                Err(AssembleError::Parse { line: 1, .. })
            ),
            "{source}"
        );
    }
}

#[test]
fn addressing_modes_assemble() {
    // One word per line, whatever the addressing mode.
    let program = assemble(
        "ldr x1, [x2]\n\
         ldr x1, [x2, #8]\n\
         ldr x1, [x2, #8]!\n\
         ldr x1, [x2], #8\n\
         ldr x1, [x2, x3]\n\
         str w1, [x2]\n",
    );
    assert_eq!(program.len(), 6 * 4);
}
