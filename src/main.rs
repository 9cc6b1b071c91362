use clap::{arg, crate_version, ArgAction, Command};
use huffman_codec::{pipeline, Error};

fn build_cli() -> Command {
    let long_help =
"Examples:
---------
Encode:  `huffman -i plain.txt -o plain.huff -e`
Decode:  `huffman -i plain.huff -o plain.txt -d`
ASCII:   `huffman -i plain.txt -o plain.huff -e -a`";

    Command::new("huffman")
        .about("Compress and expand files using classical Huffman coding")
        .after_long_help(long_help)
        .version(crate_version!())
        .arg(arg!(-i --input <PATH> "input file").action(ArgAction::Append).required(false))
        .arg(arg!(-o --output <PATH> "output file").action(ArgAction::Append).required(false))
        .arg(arg!(-e --encode "encode the input").action(ArgAction::Count))
        .arg(arg!(-d --decode "decode the input").action(ArgAction::Count))
        .arg(arg!(-a --ascii "use ASCII ('0'/'1') codewords instead of packed bits").action(ArgAction::SetTrue))
        .arg(arg!(-p --print "also print the encoded or consumed bit string").action(ArgAction::SetTrue))
        .disable_help_flag(true)
        .arg(arg!(-h --help "print usage and exit").action(ArgAction::SetTrue))
}

struct Cli {
    input: String,
    output: String,
    encode: bool,
    ascii: bool,
    print: bool,
}

fn parse_cli(matches: &clap::ArgMatches) -> Result<Cli, Error> {
    let inputs: Vec<&String> = matches.get_many::<String>("input").map(|v| v.collect()).unwrap_or_default();
    let outputs: Vec<&String> = matches.get_many::<String>("output").map(|v| v.collect()).unwrap_or_default();
    if inputs.is_empty() {
        return Err(Error::UsageError("-i PATH is required".into()));
    }
    if inputs.len() > 1 {
        return Err(Error::UsageError("-i may only be given once".into()));
    }
    if outputs.is_empty() {
        return Err(Error::UsageError("-o PATH is required".into()));
    }
    if outputs.len() > 1 {
        return Err(Error::UsageError("-o may only be given once".into()));
    }

    let encode_count = matches.get_count("encode");
    let decode_count = matches.get_count("decode");
    if encode_count > 1 {
        return Err(Error::UsageError("-e may only be given once".into()));
    }
    if decode_count > 1 {
        return Err(Error::UsageError("-d may only be given once".into()));
    }
    if encode_count > 0 && decode_count > 0 {
        return Err(Error::UsageError("-e and -d are mutually exclusive".into()));
    }
    if encode_count == 0 && decode_count == 0 {
        return Err(Error::UsageError("one of -e or -d is required".into()));
    }

    Ok(Cli {
        input: inputs[0].clone(),
        output: outputs[0].clone(),
        encode: encode_count > 0,
        ascii: matches.get_flag("ascii"),
        print: matches.get_flag("print"),
    })
}

fn run() -> Result<(), Error> {
    let main_cmd = build_cli();
    let matches = main_cmd.clone().get_matches();

    if matches.get_flag("help") {
        let mut cmd = main_cmd;
        cmd.print_long_help().expect("usage text is always writable");
        println!();
        std::process::exit(0);
    }

    let cli = parse_cli(&matches)?;

    let mut in_file = std::fs::File::open(&cli.input).map_err(Error::IoOpen)?;
    let mut out_file = std::fs::File::create(&cli.output).map_err(Error::IoOpen)?;

    let config = pipeline::Config {
        ascii: cli.ascii,
        print: cli.print,
        ..pipeline::STD_CONFIG
    };

    let report = if cli.encode {
        pipeline::encode(&mut in_file, &mut out_file, &config)?
    } else {
        pipeline::decode(&mut in_file, &mut out_file, &config)?
    };
    log::info!("{} bytes in, {} bytes out", report.in_bytes, report.out_bytes);

    Ok(())
}

fn main() {
    env_logger::init();
    if let Err(e) = run() {
        log::error!("{e}");
        eprintln!("huffman: {e}");
        std::process::exit(1);
    }
}
