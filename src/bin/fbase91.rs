use std::io::{self, BufWriter, Write};
#[cfg(unix)]
use std::mem::ManuallyDrop;
#[cfg(unix)]
use std::os::unix::io::FromRawFd;
use std::process;

use clap::{ArgGroup, Parser};

use basenc_rs::basenc::{self, Config, DEFAULT_WRAP, Mode, Scheme};
use basenc_rs::common::{gnu_name, invocation_name, io_error_msg};

#[derive(Parser)]
#[command(
    name = "base91",
    about = "Encode or decode FILEs, or standard input, to standard output.",
    after_help = "With no FILE, or when FILE is -, read standard input.\n\n\
        If the program name ends with 64, 85, 91 or 122, that is the default\n\
        encoding; otherwise base91. The encoding options override it.\n\n\
        When decoding base64, base85 or base91, line breaks in the input are\n\
        skipped. Base122 uses whitespace as digits, so wrapped base122 text\n\
        must be joined back into one line before decoding.",
    version,
    group(ArgGroup::new("scheme").args(["base64", "base85", "base91", "base122"]))
)]
struct Cli {
    /// Input is binary
    #[arg(short = 'b', long = "binary", overrides_with = "text")]
    binary: bool,

    /// Input is text (default)
    #[arg(short = 't', long = "text", overrides_with = "binary")]
    text: bool,

    /// Decode data
    #[arg(short = 'd', long = "decode")]
    decode: bool,

    /// When decoding, ignore non-alphabet characters
    #[arg(short = 'i', long = "ignore-garbage")]
    ignore_garbage: bool,

    /// Wrap encoded lines after COLS character (default 76).
    /// Use 0 to disable line wrapping
    #[arg(short = 'w', long = "wrap", value_name = "COLS", default_value_t = DEFAULT_WRAP)]
    wrap: usize,

    /// Use base64 encoding
    #[arg(short = '6', long = "base64")]
    base64: bool,

    /// Use base85 encoding
    #[arg(short = '8', long = "base85")]
    base85: bool,

    /// Use base91 encoding
    #[arg(short = '9', long = "base91")]
    base91: bool,

    /// Use base122 encoding
    #[arg(short = 'B', long = "base122")]
    base122: bool,

    /// Files to process (reads stdin if omitted or -)
    files: Vec<String>,
}

impl Cli {
    fn scheme_flag(&self) -> Option<Scheme> {
        if self.base64 {
            Some(Scheme::Base64)
        } else if self.base85 {
            Some(Scheme::Base85)
        } else if self.base91 {
            Some(Scheme::Base91)
        } else if self.base122 {
            Some(Scheme::Base122)
        } else {
            None
        }
    }

    fn config(&self, program: &str) -> Config {
        Config {
            scheme: self
                .scheme_flag()
                .unwrap_or_else(|| Scheme::from_program_name(program)),
            mode: if self.decode {
                Mode::Decode
            } else {
                Mode::Encode
            },
            wrap: self.wrap,
            ignore_garbage: self.ignore_garbage,
        }
    }
}

/// Raw fd stdout, wrapped in a BufWriter below so small symbol runs are batched.
#[cfg(unix)]
#[inline]
fn raw_stdout() -> ManuallyDrop<std::fs::File> {
    unsafe { ManuallyDrop::new(std::fs::File::from_raw_fd(1)) }
}

/// Enlarge pipe buffers on Linux for higher throughput.
#[cfg(target_os = "linux")]
fn enlarge_pipes() {
    for &fd in &[0i32, 1] {
        for &size in &[1024 * 1024i32, 256 * 1024] {
            if unsafe { libc::fcntl(fd, libc::F_SETPIPE_SZ, size) } > 0 {
                break;
            }
        }
    }
}

fn main() {
    basenc_rs::common::reset_sigpipe();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    #[cfg(target_os = "linux")]
    enlarge_pipes();

    let program = invocation_name("fbase91");
    let tool = gnu_name(&program).to_string();
    let cli = Cli::parse();
    let config = cli.config(&program);
    log::debug!("{}: {:?} binary={}", tool, config, cli.binary && !cli.text);

    #[cfg(unix)]
    let raw = raw_stdout();
    #[cfg(unix)]
    let mut out = BufWriter::with_capacity(256 * 1024, &*raw);
    #[cfg(not(unix))]
    let stdout = io::stdout();
    #[cfg(not(unix))]
    let mut out = BufWriter::with_capacity(256 * 1024, stdout.lock());

    let result = basenc::process_inputs(&cli.files, &config, &mut out);

    // Whatever was produced before a failure still goes out.
    if let Err(e) = out.flush() {
        if e.kind() == io::ErrorKind::BrokenPipe {
            process::exit(0);
        }
        eprintln!("{}: write error: {}", tool, io_error_msg(&e));
        process::exit(1);
    }

    if let Err(e) = result {
        if e.is_broken_pipe() {
            process::exit(0);
        }
        eprintln!("{}: {}", tool, e);
        process::exit(1);
    }
}
