use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "sgprint", about = "Dump a chip site grid.")]
struct Args {
    /// Chip directory containing chip_control and chip_data.
    dir: Option<PathBuf>,
    /// Dimension source; requires --data.
    #[arg(long)]
    control: Option<PathBuf>,
    /// Site-data source; requires --control.
    #[arg(long)]
    data: Option<PathBuf>,
}

fn main() {
    let args = Args::parse();
    let chip = match (&args.dir, &args.control, &args.data) {
        (Some(dir), None, None) => sitegrid::build::build_chip_from_dir(dir),
        (None, Some(control), Some(data)) => sitegrid::build::build_chip(control, data),
        _ => {
            eprintln!("usage: sgprint <DIR> | sgprint --control <FILE> --data <FILE>");
            std::process::exit(2);
        }
    };
    let Some(chip) = chip else {
        std::process::exit(1);
    };
    let mut o = std::io::stdout().lock();
    chip.print(&mut o).unwrap();
}
