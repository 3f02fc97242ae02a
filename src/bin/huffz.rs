/// huffz – Huffman compression tool.
///
///   huffz file.txt          → compress to file.txt.huf
///   huffz -d file.txt.huf   → decompress to file.txt
///   huffz -o out.huf file   → compress to an explicit output path
///   huffz -c file.txt       → compress to stdout
///   huffz -l file.txt.huf   → list header info about a compressed file
///   cat file.huf | huffz -d → decompress stdin to stdout
///
/// Input files are never removed.
use std::env;
use std::fs;
use std::io::{self, BufReader, BufWriter};
use std::path::{Path, PathBuf};
use std::process::{self, ExitCode};

use huffz::codec::{self, CodecOptions, HeaderInfo};
use huffz::HEADER_SIZE;

const SUFFIX: &str = "huf";

fn usage() {
    eprintln!("huffz - byte-oriented Huffman compression");
    eprintln!();
    eprintln!("Usage: huffz [OPTIONS] [FILE]...");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  -d, --decompress   Decompress mode");
    eprintln!("  -c, --stdout       Write to stdout");
    eprintln!("  -o, --output FILE  Write to FILE (single input only)");
    eprintln!("  -f, --force        Overwrite existing output files");
    eprintln!("  -l, --list         List info about compressed file");
    eprintln!("  -q, --quiet        Suppress warnings");
    eprintln!("  -v, --verbose      Report sizes and ratios");
    eprintln!("  -h, --help         Show this help");
    eprintln!();
    eprintln!("Compressed files use the .{SUFFIX} extension.");
    eprintln!("With no FILE, -d reads stdin and writes stdout.");
}

#[derive(Debug, Default)]
struct Opts {
    decompress: bool,
    to_stdout: bool,
    force: bool,
    list: bool,
    verbose: bool,
    quiet: bool,
    output: Option<PathBuf>,
    files: Vec<String>,
}

fn parse_args() -> Opts {
    let args: Vec<String> = env::args().skip(1).collect();
    let mut opts = Opts::default();

    let mut i = 0;
    while i < args.len() {
        let arg = &args[i];
        match arg.as_str() {
            "-d" | "--decompress" => opts.decompress = true,
            "-c" | "--stdout" | "--to-stdout" => opts.to_stdout = true,
            "-f" | "--force" => opts.force = true,
            "-l" | "--list" => opts.list = true,
            "-v" | "--verbose" => opts.verbose = true,
            "-q" | "--quiet" => opts.quiet = true,
            "-h" | "--help" => {
                usage();
                process::exit(0);
            }
            "-o" | "--output" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("huffz: missing argument for -o");
                    process::exit(1);
                }
                opts.output = Some(PathBuf::from(&args[i]));
            }
            // Handle combined short flags like -dv, -cf, etc.
            s if s.starts_with('-') && !s.starts_with("--") && s.len() > 2 => {
                for ch in s[1..].chars() {
                    match ch {
                        'd' => opts.decompress = true,
                        'c' => opts.to_stdout = true,
                        'f' => opts.force = true,
                        'l' => opts.list = true,
                        'v' => opts.verbose = true,
                        'q' => opts.quiet = true,
                        _ => {
                            eprintln!("huffz: unknown flag '-{ch}'");
                            process::exit(1);
                        }
                    }
                }
            }
            s if s.starts_with("--") => {
                eprintln!("huffz: unknown option '{s}'");
                process::exit(1);
            }
            _ => opts.files.push(arg.clone()),
        }
        i += 1;
    }

    opts
}

/// Determine the output filename for compression.
fn compress_output_path(input: &str) -> PathBuf {
    PathBuf::from(format!("{input}.{SUFFIX}"))
}

/// Determine the output filename for decompression.
fn decompress_output_path(input: &str) -> Option<PathBuf> {
    let path = Path::new(input);
    match path.extension().and_then(|ext| ext.to_str()) {
        Some(SUFFIX) => Some(path.with_extension("")),
        _ => None,
    }
}

/// Percentage saved by the payload, ignoring the header.
fn compression_ratio(input_size: u64, output_size: u64) -> i64 {
    if input_size == 0 {
        return 0;
    }
    let payload = output_size as i64 - HEADER_SIZE as i64;
    (100 * (input_size as i64 - payload)).div_euclid(input_size as i64)
}

/// Percentage the payload grew by when expanded, ignoring the header.
fn expansion_ratio(input_size: u64, output_size: u64) -> i64 {
    let payload = input_size as i64 - HEADER_SIZE as i64;
    if payload <= 0 {
        return 0;
    }
    (100 * (output_size as i64 - payload)).div_euclid(payload)
}

fn check_overwrite(opts: &Opts, out_path: &Path) -> Result<(), String> {
    if out_path.exists() && !opts.force {
        return Err(format!(
            "{} already exists; use -f to overwrite",
            out_path.display()
        ));
    }
    Ok(())
}

fn list_file(opts: &Opts, path: &str) -> Result<String, String> {
    let info = codec::inspect(Path::new(path)).map_err(|e| format!("{path}: {e}"))?;
    Ok(list_line(opts.verbose, &info, path))
}

fn list_header(verbose: bool) -> String {
    if verbose {
        format!(
            "{:>12} {:>12} {:>6} {:>8} {:>7} name",
            "original", "compressed", "ratio", "symbols", "entropy"
        )
    } else {
        format!(
            "{:>12} {:>12} {:>6} {:>8} name",
            "original", "compressed", "ratio", "symbols"
        )
    }
}

/// One row of `-l` output; the entropy column only appears with `-v`.
fn list_line(verbose: bool, info: &HeaderInfo, path: &str) -> String {
    let original = info.original_size();
    let ratio = if original > 0 {
        (info.compressed_size as f64 / original as f64) * 100.0
    } else {
        0.0
    };
    let mut line = format!(
        "{:>12} {:>12} {:5.1}% {:>8}",
        original, info.compressed_size, ratio, info.frequencies.used
    );
    if verbose {
        line.push_str(&format!(" {:>7.3}", info.frequencies.entropy()));
    }
    line.push(' ');
    line.push_str(path);
    line
}

fn process_compress(opts: &Opts, path: &str, options: &CodecOptions) -> Result<(), String> {
    if opts.to_stdout {
        let file = fs::File::open(path).map_err(|e| format!("{path}: {e}"))?;
        let input = BufReader::with_capacity(options.buffer_size, file);
        let output = BufWriter::new(io::stdout().lock());
        codec::compress_stream(input, output, options).map_err(|e| format!("{path}: {e}"))?;
        return Ok(());
    }

    let out_path = opts
        .output
        .clone()
        .unwrap_or_else(|| compress_output_path(path));
    check_overwrite(opts, &out_path)?;

    let (read, written) = codec::compress_with(Path::new(path), &out_path, options)
        .map_err(|e| format!("{e}"))?;

    if opts.verbose {
        eprintln!("{path}: wrote {}", out_path.display());
        eprintln!("  input size:  {read:>12}");
        eprintln!("  output size: {written:>12}");
        eprintln!(
            "  ratio:       {:>11}% (ignoring header)",
            compression_ratio(read, written)
        );
    }
    Ok(())
}

fn process_decompress(opts: &Opts, path: &str, options: &CodecOptions) -> Result<(), String> {
    if opts.to_stdout {
        let file = fs::File::open(path).map_err(|e| format!("{path}: {e}"))?;
        let input = BufReader::with_capacity(options.buffer_size, file);
        let output = BufWriter::new(io::stdout().lock());
        codec::decompress_stream(input, output, options).map_err(|e| format!("{path}: {e}"))?;
        return Ok(());
    }

    let out_path = match opts.output.clone() {
        Some(p) => p,
        None => decompress_output_path(path)
            .ok_or_else(|| format!("{path}: unknown suffix -- ignored (use -o)"))?,
    };
    check_overwrite(opts, &out_path)?;

    let (read, written) = codec::decompress_with(Path::new(path), &out_path, options)
        .map_err(|e| format!("{e}"))?;

    if opts.verbose {
        eprintln!("{path}: wrote {}", out_path.display());
        eprintln!("  input size:  {read:>12}");
        eprintln!("  output size: {written:>12}");
        eprintln!(
            "  expanded by: {:>11}% (ignoring header)",
            expansion_ratio(read, written)
        );
    }
    Ok(())
}

fn process_stdin_stdout(opts: &Opts, options: &CodecOptions) -> Result<(), String> {
    if !opts.decompress {
        return Err("compression needs a seekable input file".to_string());
    }
    let input = BufReader::with_capacity(options.buffer_size, io::stdin().lock());
    let output = BufWriter::new(io::stdout().lock());
    codec::decompress_stream(input, output, options).map_err(|e| format!("stdin: {e}"))?;
    Ok(())
}

fn run() -> Result<(), ()> {
    let opts = parse_args();
    let options = CodecOptions::default();
    let mut had_error = false;

    if opts.files.is_empty() {
        if opts.list {
            eprintln!("huffz: -l requires a file argument");
            return Err(());
        }
        if let Err(e) = process_stdin_stdout(&opts, &options) {
            eprintln!("huffz: {e}");
            return Err(());
        }
        return Ok(());
    }

    if opts.output.is_some() && opts.files.len() > 1 {
        eprintln!("huffz: -o accepts a single input file");
        return Err(());
    }
    if opts.output.is_some() && opts.to_stdout && !opts.quiet {
        eprintln!("huffz: warning: -c given, ignoring -o");
    }

    // List mode
    if opts.list {
        println!("{}", list_header(opts.verbose));
        for path in &opts.files {
            match list_file(&opts, path) {
                Ok(line) => println!("{line}"),
                Err(e) => {
                    eprintln!("huffz: {e}");
                    had_error = true;
                }
            }
        }
        return if had_error { Err(()) } else { Ok(()) };
    }

    for path in &opts.files {
        let result = if opts.decompress {
            process_decompress(&opts, path, &options)
        } else {
            process_compress(&opts, path, &options)
        };

        if let Err(e) = result {
            eprintln!("huffz: {e}");
            had_error = true;
        }
    }

    if had_error {
        Err(())
    } else {
        Ok(())
    }
}

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(()) => ExitCode::FAILURE,
    }
}
