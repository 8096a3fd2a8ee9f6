// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

#![allow(clippy::uninlined_format_args)]

use std::path;

use svgbox::{BitmapSource, BlockPalette, ConvertOptions, Converter, PaletteOptions};

fn main() {
    if let Err(e) = process() {
        eprintln!("Error: {}.", e);
        std::process::exit(1);
    }
}

/// Runs a pipeline stage, printing its duration when `--perf` is set.
fn timed<T>(perf: bool, stage: &str, f: impl FnOnce() -> T) -> T {
    let start = std::time::Instant::now();
    let result = f();
    if perf {
        eprintln!("{}: {:.2}ms", stage, start.elapsed().as_secs_f64() * 1000.0);
    }

    result
}

fn read_input(input: Option<&path::Path>) -> Result<Vec<u8>, String> {
    use std::io::Read;

    match input {
        Some(path) => std::fs::read(path).map_err(|e| format!("cannot read {:?}: {}", path, e)),
        None => {
            let mut buf = Vec::new();
            std::io::stdin()
                .read_to_end(&mut buf)
                .map_err(|e| format!("cannot read stdin: {}", e))?;
            Ok(buf)
        }
    }
}

fn process() -> Result<(), String> {
    let args = match parse_args() {
        Ok(args) => args,
        Err(e) => {
            println!("{}", HELP);
            return Err(e);
        }
    };

    if !args.quiet {
        if let Ok(()) = log::set_logger(&LOGGER) {
            log::set_max_level(log::LevelFilter::Warn);
        }
    }

    let mut svg_data = timed(args.perf, "Reading", || read_input(args.input.as_deref()))?;

    if svg_data.starts_with(&[0x1f, 0x8b]) {
        svg_data = timed(args.perf, "SVGZ Decoding", || {
            svgbox::usvg::decompress_svgz(&svg_data).map_err(|e| e.to_string())
        })?;
    };

    let svg_string = std::str::from_utf8(&svg_data)
        .map_err(|_| "provided data has not an UTF-8 encoding".to_string())?;

    // fontdb initialization is pretty expensive, so perform it only when needed.
    let has_text_nodes = svg_string.contains("<text");

    let converter = timed(args.perf, "Setup", || build_converter(&args, has_text_nodes));

    let tree = timed(args.perf, "SVG Parsing", || {
        converter.prepare(svg_string).map_err(|e| e.to_string())
    })?;

    let bitmap = timed(args.perf, "Rendering", || {
        converter
            .render(&tree, &args.convert)
            .map_err(|e| e.to_string())
    })?;

    if args.print_size {
        println!("{}x{}", bitmap.width(), bitmap.height());
    }

    match args.output {
        Some(Output::Stdout) => {
            use std::io::Write;
            let buf = bitmap.encode_png().map_err(|e| e.to_string())?;
            std::io::stdout()
                .write_all(&buf)
                .map_err(|e| format!("cannot write to stdout: {}", e))?;
        }
        Some(Output::Png(ref path)) => {
            timed(args.perf, "Saving", || bitmap.save_png(path).map_err(|e| e.to_string()))?;
        }
        None => {}
    }

    Ok(())
}

fn build_converter(args: &Args, has_text_nodes: bool) -> Converter {
    let mut usvg = svgbox::usvg::Options::default();
    usvg.resources_dir = args.resources_dir.clone();

    let mut builder = Converter::builder().usvg_options(usvg);

    if has_text_nodes {
        builder = builder.load_system_fonts();
    }

    if args.keep_colors {
        builder = builder.fixup(svgbox::KeepPaint);
    }

    builder
        .rasterizer(svgbox::ResvgRasterizer {
            background: args.background.map(svg_to_skia_color),
        })
        .build()
}

const HELP: &str = "\
svgbox renders an SVG into a bitmap sized for box-drawing output.

USAGE:
  svgbox [OPTIONS] <in-svg> <out-png>  # from file to file
  svgbox [OPTIONS] <in-svg> -c         # from file to stdout
  svgbox [OPTIONS] - <out-png>         # from stdin to file
  svgbox [OPTIONS] - -c                # from stdin to stdout

  svgbox in.svg out.png
  svgbox --palette braille --columns 40 in.svg out.png
  svgbox -w 80 --scale-x 2 --print-size in.svg

OPTIONS:
      --help                    Prints this help
  -V, --version                 Prints version
  -c                            Prints the output PNG to the stdout

  -w, --width LENGTH            Sets the maximum width in pixels
  -h, --height LENGTH           Sets the maximum height in pixels
      --palette NAME            Sizes the output in palette characters
                                [possible values: full, half, quadrant,
                                sextant, braille]
      --columns N               Sets the maximum number of columns
                                (requires --palette)
      --rows N                  Sets the maximum number of rows
                                (requires --palette)
      --scale-x FACTOR          Sets the horizontal stretch factor
                                [default: 1, or 2 with --palette]
      --scale-y FACTOR          Sets the vertical stretch factor
                                [default: 1]
      --keep-colors             Do not paint unpainted shapes white
      --background COLOR        Sets the background color
                                Examples: red, #fff, #fff000
      --resources-dir DIR       Sets a directory that will be used during
                                relative paths resolving.
                                [default: input file directory]

      --print-size              Prints the output size
      --perf                    Prints performance stats
      --quiet                   Disables warnings

ARGS:
  <in-svg>                      Input file
  <out-png>                     Output file
";

#[derive(Debug)]
struct CliArgs {
    width: Option<u32>,
    height: Option<u32>,
    palette: Option<BlockPalette>,
    columns: Option<u32>,
    rows: Option<u32>,
    scale_x: Option<f64>,
    scale_y: Option<f64>,
    keep_colors: bool,
    background: Option<svgtypes::Color>,
    resources_dir: Option<path::PathBuf>,

    print_size: bool,
    perf: bool,
    quiet: bool,

    input: String,
    output: Option<String>,
}

fn collect_args() -> Result<CliArgs, pico_args::Error> {
    let mut input = pico_args::Arguments::from_env();

    if input.contains("--help") {
        print!("{}", HELP);
        std::process::exit(0);
    }

    if input.contains(["-V", "--version"]) {
        println!("{}", env!("CARGO_PKG_VERSION"));
        std::process::exit(0);
    }

    Ok(CliArgs {
        width: input.opt_value_from_fn(["-w", "--width"], parse_length)?,
        height: input.opt_value_from_fn(["-h", "--height"], parse_length)?,
        palette: input.opt_value_from_str("--palette")?,
        columns: input.opt_value_from_fn("--columns", parse_length)?,
        rows: input.opt_value_from_fn("--rows", parse_length)?,
        scale_x: input.opt_value_from_fn("--scale-x", parse_factor)?,
        scale_y: input.opt_value_from_fn("--scale-y", parse_factor)?,
        keep_colors: input.contains("--keep-colors"),
        background: input.opt_value_from_str("--background")?,
        resources_dir: input.opt_value_from_str("--resources-dir")?,

        print_size: input.contains("--print-size"),
        perf: input.contains("--perf"),
        quiet: input.contains("--quiet"),

        input: input.free_from_str()?,
        output: input.opt_free_from_str()?,
    })
}

fn parse_length(s: &str) -> Result<u32, String> {
    let n: u32 = s.parse().map_err(|_| "invalid length")?;

    if n > 0 {
        Ok(n)
    } else {
        Err("LENGTH cannot be zero".to_string())
    }
}

fn parse_factor(s: &str) -> Result<f64, String> {
    let n: f64 = s.parse().map_err(|_| "invalid scale factor")?;

    if n > 0.0 && n.is_finite() {
        Ok(n)
    } else {
        Err("FACTOR should be positive".to_string())
    }
}

enum Output {
    Stdout,
    Png(path::PathBuf),
}

struct Args {
    /// `None` for stdin.
    input: Option<path::PathBuf>,
    output: Option<Output>,
    convert: ConvertOptions,
    keep_colors: bool,
    background: Option<svgtypes::Color>,
    resources_dir: Option<path::PathBuf>,
    print_size: bool,
    perf: bool,
    quiet: bool,
}

fn parse_args() -> Result<Args, String> {
    let args = collect_args().map_err(|e| e.to_string())?;

    let input = match args.input.as_str() {
        "-" => None,
        "-c" => return Err("-c should be set after input".to_string()),
        path => Some(path::PathBuf::from(path)),
    };

    let output = match args.output.as_deref() {
        Some("-c") => Some(Output::Stdout),
        Some(path) => Some(Output::Png(path.into())),
        None => None,
    };

    if output.is_none() && !args.print_size {
        return Err("<out-png> must be set".to_string());
    }

    let convert = match args.palette {
        Some(palette) => {
            if args.width.is_some() || args.height.is_some() {
                return Err("--width and --height cannot be used with --palette".to_string());
            }

            let defaults = PaletteOptions::default();
            let opt = PaletteOptions {
                max_rows: args.rows,
                max_columns: args.columns,
                scale_x: args.scale_x.unwrap_or(defaults.scale_x),
                scale_y: args.scale_y.unwrap_or(defaults.scale_y),
            };

            opt.to_convert_options(&palette)
        }
        None => {
            if args.rows.is_some() || args.columns.is_some() {
                return Err("--rows and --columns require --palette".to_string());
            }

            let defaults = ConvertOptions::default();
            ConvertOptions {
                max_width: args.width,
                max_height: args.height,
                scale_x: args.scale_x.unwrap_or(defaults.scale_x),
                scale_y: args.scale_y.unwrap_or(defaults.scale_y),
            }
        }
    };

    // Relative hrefs resolve against the input file directory by default.
    let resources_dir = args.resources_dir.or_else(|| {
        let path = std::fs::canonicalize(input.as_ref()?).ok()?;
        path.parent().map(path::Path::to_path_buf)
    });

    Ok(Args {
        input,
        output,
        convert,
        keep_colors: args.keep_colors,
        background: args.background,
        resources_dir,
        print_size: args.print_size,
        perf: args.perf,
        quiet: args.quiet,
    })
}

fn svg_to_skia_color(color: svgtypes::Color) -> svgbox::tiny_skia::Color {
    svgbox::tiny_skia::Color::from_rgba8(color.red, color.green, color.blue, color.alpha)
}

/// Prints warnings and errors to stderr.
static LOGGER: StderrLogger = StderrLogger;
struct StderrLogger;
impl log::Log for StderrLogger {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        metadata.level() <= log::Level::Warn
    }

    fn log(&self, record: &log::Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        let kind = if record.level() == log::Level::Error {
            "Error"
        } else {
            "Warning"
        };
        eprintln!("{} (in {}): {}", kind, record.target(), record.args());
    }

    fn flush(&self) {}
}
