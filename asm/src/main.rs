use clap::Parser;
use color_print::cformat;
use std::io::BufRead;

use sicasm::assembler::Assembler;
use sicasm::listing;

const HELP_TEMPLATE: &str = "\
{before-help}{bin} {version}
  {author}
  {about}

{usage-heading}
{tab}{usage}

{all-args}{after-help}";

#[derive(Debug, clap::Parser)]
#[clap(author, version, about, help_template = HELP_TEMPLATE)]
struct Args {
    /// Input source file
    input: String,

    /// Output object file
    #[clap(short, long, default_value = "out.obj")]
    output: String,

    /// Write a listing file
    #[clap(short, long)]
    listing: Option<String>,

    /// Dump the listing to stdout
    #[clap(short, long)]
    dump: bool,

    /// Treat operand mismatches as errors
    #[clap(long)]
    strict: bool,
}

fn main() {
    let args = Args::parse();
    println!("SIC/XE Assembler");

    println!("1. Read Source");
    println!("  < {}", args.input);
    let file = std::fs::File::open(&args.input)
        .expect(&cformat!("<red,bold>Failed to open file</>: {}", args.input));
    let lines: Vec<String> = std::io::BufReader::new(file)
        .lines()
        .map(|line| line.expect(&cformat!("<red,bold>Failed to read line</>")))
        .collect();

    let mut asm = Assembler::new(&args.input, args.strict);

    println!("2. Pass 1: Parse & Collect Symbols");
    asm.pass1(&lines);
    println!(
        "  - {} statement(s), {} symbol(s)",
        asm.statements().len(),
        asm.symtab().len()
    );

    println!("3. Pass 2: Resolve Symbols");
    asm.pass2();

    println!("4. Generate Object");
    let obj = asm.object();
    if let Some(obj) = &obj {
        println!("  > {}", args.output);
        std::fs::write(&args.output, obj)
            .expect(&cformat!("<red,bold>Failed to write file</>: {}", args.output));
    }

    if let Some(path) = &args.listing {
        println!("  > {}", path);
        std::fs::write(path, listing::render(asm.statements()))
            .expect(&cformat!("<red,bold>Failed to write file</>: {}", path));
    }

    if args.dump {
        listing::dump(asm.statements());
    }

    if obj.is_none() {
        std::process::exit(1);
    }
}
