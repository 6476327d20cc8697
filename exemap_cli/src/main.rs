use clap::Parser;
use easyerr::{Error, ResultExt};
use exemap_core::space::MemSpace;
use std::path::PathBuf;

/// Reconstructs the runtime address-space layout of a PS-X EXE image.
#[derive(Parser)]
#[command(version)]
struct Args {
    /// Path to the PS-X EXE image.
    exe: PathBuf,
    /// Logging verbosity. Repeat for more detail.
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Debug, Error)]
enum CliError {
    #[error("couldn't read the executable")]
    Read { source: std::io::Error },
    #[error("couldn't load the executable")]
    Load { source: exemap_core::LoadError },
}

fn run(args: &Args) -> Result<(), CliError> {
    let bytes = std::fs::read(&args.exe).context(CliCtx::Read)?;

    let mut space = MemSpace::new();
    let exe = exemap_core::load(&bytes, &mut space).context(CliCtx::Load)?;
    let header = &exe.header;

    println!("pc     : {}", header.initial_pc);
    println!("gp     : 0x{:08X}", header.initial_gp);
    println!("sp     : 0x{:08X}", header.stack_pointer());
    println!(
        "code   : {}..{} ({} bytes)",
        header.load_address,
        header.code_end(),
        header.code_size
    );
    if !header.marker.is_empty() {
        println!("marker : {}", header.marker.to_string_lossy());
    }

    println!("\nregions:");
    for region in space.regions() {
        let kind = if region.is_mirror() { "mirror" } else { "      " };
        println!(
            "  {} {}..{} {} {}",
            region.perms,
            region.base,
            region.base + region.size,
            kind,
            region.name,
        );
    }

    println!("\nsymbols:");
    for (addr, name) in space.functions() {
        println!("  fn {name} @ {addr}");
    }
    if let Some(main) = space.label_at("main") {
        println!("  main @ {main}");
    }
    println!(
        "  {} labels, {} entry point(s)",
        space.labels().len(),
        space.entry_points().len()
    );

    Ok(())
}

fn main() {
    let args = Args::parse();

    let level = match args.verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        _ => log::LevelFilter::Debug,
    };
    env_logger::Builder::new().filter_level(level).init();

    if let Err(err) = run(&args) {
        eprintln!("error: {err}");

        let mut source = std::error::Error::source(&err);
        while let Some(inner) = source {
            eprintln!("  caused by: {inner}");
            source = inner.source();
        }

        std::process::exit(1);
    }
}
