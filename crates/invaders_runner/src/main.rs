use anyhow::{bail, Context, Result};
use invaders_runner::{ProgramKind, RunConfig};

fn main() -> Result<()> {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let Some(path) = args.next() else {
        eprintln!(
            "Usage: invaders8080 <program> [raw|cpm]\n\
             For example: invaders8080 assets/roms/8080_tests/TST8080.COM"
        );
        std::process::exit(1);
    };

    let kind = match args.next().as_deref() {
        Some("raw") | Some("RAW") => ProgramKind::Raw,
        Some("cpm") | Some("CPM") => ProgramKind::Cpm,
        Some(other) => bail!("Unknown mode '{}'. Supported: raw, cpm", other),
        None => ProgramKind::from_path(&path),
    };

    log::info!("Running '{}' as {:?}", path, kind);
    let program =
        std::fs::read(&path).with_context(|| format!("Failed to read program file '{}'", path))?;

    let report = invaders_runner::run(kind, &program, &RunConfig::default())
        .with_context(|| format!("Failed to run '{}'", path))?;

    print!("{}", report.output);
    if !report.output.is_empty() && !report.output.ends_with('\n') {
        println!();
    }
    let regs = &report.registers;
    println!(
        "{} instructions, {}: PC={:04X} SP={:04X} AF={:04X} BC={:04X} DE={:04X} HL={:04X}",
        report.instructions,
        if report.halted { "halted" } else { "exited" },
        regs.pc(),
        regs.sp(),
        regs.af(),
        regs.bc(),
        regs.de(),
        regs.hl()
    );
    Ok(())
}
