use std::fs;
use std::path::PathBuf;

use invaders_runner::{cpm, run, ProgramKind, RunConfig};

#[test]
fn cpm_program_prints_string() {
    let mut program = vec![
        0x0e, 0x09, // MVI C,9
        0x11, 0x0b, 0x01, // LXI D,010Bh
        0xcd, 0x05, 0x00, // CALL 0005h
        0xc3, 0x00, 0x00, // JMP 0000h
    ];
    program.extend_from_slice(b"HELLO, 8080\r\n$");

    let report = run(ProgramKind::Cpm, &program, &RunConfig::default()).unwrap();

    assert_eq!(report.output, "HELLO, 8080\r\n");
    assert!(!report.halted);
    assert_eq!(report.registers.pc(), 0x0002);
}

#[test]
fn cpm_program_prints_decimal_digits() {
    // Print "0123456789" one character at a time through BDOS 2.
    let program = [
        0x31, 0x00, 0x24, // 0100 LXI SP,2400h
        0x3e, b'0', //       0103 MVI A,'0'
        0xf5, //             0105 PUSH PSW
        0x5f, //             0106 MOV E,A
        0x0e, 0x02, //       0107 MVI C,2
        0xcd, 0x05, 0x00, // 0109 CALL 0005h
        0xf1, //             010C POP PSW
        0x3c, //             010D INR A
        0xfe, b'9' + 1, //   010E CPI '9'+1
        0xc2, 0x05, 0x01, // 0110 JNZ 0105h
        0xc3, 0x00, 0x00, // 0113 JMP 0000h
    ];

    let report = cpm::run(&program, Some(1_000)).unwrap();

    assert_eq!(report.output, "0123456789");
    assert_eq!(report.registers.sp(), 0x2400);
}

#[test]
fn raw_program_runs_until_halt() {
    // Sum 10 down to 1 into A.
    let program = [
        0x3e, 0x00, //       0000 MVI A,0
        0x06, 0x0a, //       0002 MVI B,10
        0x80, //             0004 ADD B
        0x05, //             0005 DCR B
        0xc2, 0x04, 0x00, // 0006 JNZ 0004h
        0x76, //             0009 HLT
    ];

    let report = run(ProgramKind::Raw, &program, &RunConfig::default()).unwrap();

    assert!(report.halted);
    assert_eq!(report.registers.a(), 55);
    assert_eq!(report.registers.pc(), 0x000a);
    assert!(report.output.is_empty());
}

#[test]
fn raw_program_at_custom_address() {
    // 2400 LXI H,2410h; INR M; INR M; HLT
    let program = [0x21, 0x10, 0x24, 0x34, 0x34, 0x76];
    let config = RunConfig::builder()
        .load_address(0x2400)
        .entry_point(0x2400)
        .stack_pointer(0x2400)
        .build();

    let report = run(ProgramKind::Raw, &program, &config).unwrap();

    assert!(report.halted);
    assert_eq!(report.instructions, 4);
    assert_eq!(report.registers.hl(), 0x2410);
}

#[test]
fn raw_program_stops_at_limit() {
    let config = RunConfig::builder().max_instructions(25).build();

    let report = run(ProgramKind::Raw, &[0xc3, 0x00, 0x00], &config).unwrap();

    assert!(!report.halted);
    assert_eq!(report.instructions, 25);
}

#[test]
fn program_kind_from_path() {
    assert_eq!(ProgramKind::from_path("TST8080.COM"), ProgramKind::Cpm);
    assert_eq!(ProgramKind::from_path("roms/test.com"), ProgramKind::Cpm);
    assert_eq!(ProgramKind::from_path("invaders.rom"), ProgramKind::Raw);
    assert_eq!(ProgramKind::from_path("image"), ProgramKind::Raw);
}

fn load_exerciser(name: &str) -> Vec<u8> {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("../../assets/roms/8080_tests");
    path.push(name);
    fs::read(&path).expect("failed to read test program")
}

// The exercisers need the CP/M test programs under assets/ and take a long
// time; run them with `cargo test -p invaders_runner -- --ignored`.

#[test]
#[ignore]
fn run_tst8080() {
    let report = cpm::run(&load_exerciser("TST8080.COM"), None).unwrap();
    assert!(report.output.contains("CPU IS OPERATIONAL"), "{}", report.output);
}

#[test]
#[ignore]
fn run_8080pre() {
    let report = cpm::run(&load_exerciser("8080PRE.COM"), None).unwrap();
    assert!(!report.output.contains("ERROR"), "{}", report.output);
}

#[test]
#[ignore]
fn run_cputest() {
    let report = cpm::run(&load_exerciser("CPUTEST.COM"), None).unwrap();
    assert!(!report.output.contains("ERROR"), "{}", report.output);
}

#[test]
#[ignore]
fn run_8080exm() {
    let report = cpm::run(&load_exerciser("8080EXM.COM"), None).unwrap();
    assert!(!report.output.contains("ERROR"), "{}", report.output);
}
