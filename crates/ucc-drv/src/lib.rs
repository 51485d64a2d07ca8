//! ucc-drv - the compiler driver.
//!
//! This crate owns everything the other crates don't: turning command-line
//! arguments into a validated [`Config`], running the six-stage pipeline
//! (read, lex, parse, resolve, check, emit) in a [`Session`], printing
//! diagnostics in the `file:line:col: kind: message` form, and picking the
//! process exit code. Everything upstream (`ucc-lex`, `ucc-par`, `ucc-sem`,
//! `ucc-gen`) only ever reports through a [`ucc_util::Handler`] or an
//! internal-invariant error type; this is the one crate allowed to talk to
//! the filesystem and to `std::process::exit`.

use std::path::{Path, PathBuf};

use clap::Parser as ClapParser;
use ucc_util::{DiagnosticCode, FileId, Handler, Level, SourceMap, Span};

/// Command-line surface, parsed by `clap`.
#[derive(ClapParser, Debug)]
#[command(name = "ucc", about = "Compiles uC source files to C++17")]
pub struct Cli {
    /// Path to the `.uc` source file to compile.
    pub input: PathBuf,

    /// Compile to C++ and write the translation unit alongside the input.
    #[arg(short = 'C', long = "compile")]
    pub compile_cpp: bool,

    /// Stop backend emission after this phase (1 = types, 2 = + signatures,
    /// 3 = full bodies).
    #[arg(long = "backend-phase", default_value_t = 3)]
    pub backend_phase: u8,

    /// Trace each pipeline stage to stderr.
    #[arg(short, long)]
    pub verbose: bool,
}

/// A validated, ready-to-run [`Cli`].
#[derive(Debug, Clone)]
pub struct Config {
    pub input: PathBuf,
    pub compile_cpp: bool,
    pub backend_phase: ucc_gen::Phase,
    pub verbose: bool,
}

impl TryFrom<Cli> for Config {
    type Error = DriverError;

    fn try_from(cli: Cli) -> Result<Self, Self::Error> {
        let backend_phase = ucc_gen::Phase::from_number(cli.backend_phase)
            .ok_or_else(|| DriverError::InvalidArguments(format!("--backend-phase must be 1, 2, or 3, got {}", cli.backend_phase)))?;
        Ok(Config { input: cli.input, compile_cpp: cli.compile_cpp, backend_phase, verbose: cli.verbose })
    }
}

/// Everything that can send `ucc` home with a non-zero exit code.
///
/// The split mirrors §7's three error families plus the driver's own
/// surface: a bad flag or unreadable file is [`DriverError::InvalidArguments`]
/// / [`DriverError::Io`] (exit 2), a uC program with lexical, syntactic,
/// symbol, or type errors is [`DriverError::CompilationFailed`] (exit 1, the
/// diagnostics themselves are printed before this is returned), and a
/// violation of the backend's "a checked program is always emittable"
/// guarantee is [`DriverError::Internal`] (exit 2, never user-facing).
#[derive(Debug, thiserror::Error)]
pub enum DriverError {
    #[error("{0}")]
    InvalidArguments(String),

    #[error("could not read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("compilation failed")]
    CompilationFailed,

    #[error("internal compiler error: {0}")]
    Internal(String),
}

impl DriverError {
    /// §6 exit codes: 0 success, 1 a diagnosed compilation failure, 2
    /// everything else (bad invocation or an internal invariant violation).
    pub fn exit_code(&self) -> i32 {
        match self {
            DriverError::CompilationFailed => 1,
            _ => 2,
        }
    }
}

impl From<ucc_gen::GenError> for DriverError {
    fn from(err: ucc_gen::GenError) -> Self {
        DriverError::Internal(err.to_string())
    }
}

/// One compiler invocation: owns the source map and diagnostic handler for
/// the file being compiled and drives it through every stage.
pub struct Session {
    sources: SourceMap,
    handler: Handler,
}

impl Session {
    pub fn new() -> Self {
        Session { sources: SourceMap::new(), handler: Handler::new() }
    }

    /// Runs the full pipeline for `config.input`. Diagnostics are printed to
    /// stderr as they're discovered to have accumulated; a non-empty set at
    /// the end of pass C stops the pipeline before the backend ever runs
    /// (§7: "no backend output if any [symbol or type error] present").
    pub fn compile(&mut self, config: &Config) -> Result<(), DriverError> {
        tracing::debug!(path = %config.input.display(), "reading source file");
        let content = std::fs::read_to_string(&config.input).map_err(|source| DriverError::Io { path: config.input.clone(), source })?;
        let file = self.sources.add_file(config.input.clone(), content);

        tracing::debug!("lexing");
        let tokens = lex(&self.sources, file, &self.handler);

        tracing::debug!(count = tokens.len(), "parsing");
        let mut parser = ucc_par::Parser::new(tokens, &self.handler);
        let program = parser.parse_program();

        tracing::debug!("resolving and type-checking");
        let compiled = ucc_sem::compile(&program, &self.handler);

        if self.handler.has_errors() {
            self.report_diagnostics();
            return Err(DriverError::CompilationFailed);
        }

        if !config.compile_cpp {
            tracing::debug!("no -C flag given, skipping backend emission");
            return Ok(());
        }

        tracing::debug!(phase = ?config.backend_phase, "emitting C++");
        let cpp = ucc_gen::emit(&compiled, config.backend_phase)?;

        let output_path = output_path_for(&config.input, config.backend_phase);
        tracing::debug!(path = %output_path.display(), "writing output");
        std::fs::write(&output_path, cpp).map_err(|source| DriverError::Io { path: output_path, source })?;

        Ok(())
    }

    fn report_diagnostics(&self) {
        for diag in self.handler.diagnostics() {
            let file = self.sources.get(diag.span.file);
            let path = file.path().display();
            let level = match diag.level {
                Level::Error => "error",
                Level::Warning => "warning",
            };
            eprintln!("{path}:{}:{}: {}: {}", diag.span.line, diag.span.column, diagnostic_kind(diag.code, level), diag.message);
        }
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

fn lex(sources: &SourceMap, file: FileId, handler: &Handler) -> Vec<(ucc_lex::Token, Span)> {
    let source = sources.get(file);
    let mut lexer = ucc_lex::Lexer::new(source.content(), file, handler);
    let mut tokens = Vec::new();
    loop {
        let (token, span) = lexer.next_spanned();
        let is_eof = token == ucc_lex::Token::Eof;
        tokens.push((token, span));
        if is_eof {
            break;
        }
    }
    tokens
}

/// §6: the `-C` output is named by replacing the input's `.uc` extension
/// with `.cpp`, unless a sub-phase was requested, in which case the phase
/// number is folded into the stem so a `--backend-phase=1` run can't clobber
/// a full `--backend-phase=3` one for the same input.
fn output_path_for(input: &Path, phase: ucc_gen::Phase) -> PathBuf {
    let stem = input.file_stem().map(|s| s.to_string_lossy().into_owned()).unwrap_or_else(|| "out".to_string());
    let file_name = if phase == ucc_gen::Phase::Bodies { format!("{stem}.cpp") } else { format!("{stem}_phase{}.cpp", phase.as_number()) };
    input.with_file_name(file_name)
}

/// Maps a diagnostic's numeric code (§7's 1000s/2000s/3000s/4000s/5000s
/// ranges) back to the kind name `file:line:col: kind: message` prints.
/// Warnings keep their own label regardless of the code's family, since the
/// family only distinguishes error stages.
fn diagnostic_kind(code: DiagnosticCode, level: &str) -> &'static str {
    if level == "warning" {
        return "warning";
    }
    match code.0 {
        1000..=1999 => "lexical",
        2000..=2999 => "syntactic",
        3000..=3999 => "symbol",
        4000..=4999 => "type",
        _ => "backend",
    }
}

/// Parses arguments, installs the logging subscriber, and runs one
/// compilation. Split out from `main.rs` so the exit-code logic there stays
/// a thin wrapper.
pub fn run() -> Result<(), DriverError> {
    let cli = Cli::parse();
    let verbose = cli.verbose;
    init_logging(verbose);

    let config = Config::try_from(cli)?;
    let mut session = Session::new();
    session.compile(&config)
}

fn init_logging(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let default_filter = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt().with_env_filter(filter).with_target(false).without_time().init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backend_phase_out_of_range_is_rejected() {
        let cli = Cli { input: PathBuf::from("a.uc"), compile_cpp: true, backend_phase: 7, verbose: false };
        let err = Config::try_from(cli).unwrap_err();
        assert!(matches!(err, DriverError::InvalidArguments(_)));
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn compilation_failure_exits_with_code_one() {
        assert_eq!(DriverError::CompilationFailed.exit_code(), 1);
    }

    #[test]
    fn full_phase_output_path_keeps_the_cpp_extension() {
        let path = output_path_for(Path::new("hello.uc"), ucc_gen::Phase::Bodies);
        assert_eq!(path, PathBuf::from("hello.cpp"));
    }

    #[test]
    fn sub_phase_output_path_is_disambiguated() {
        let path = output_path_for(Path::new("hello.uc"), ucc_gen::Phase::Types);
        assert_eq!(path, PathBuf::from("hello_phase1.cpp"));
    }

    #[test]
    fn diagnostic_kind_follows_the_code_range() {
        assert_eq!(diagnostic_kind(DiagnosticCode(1001), "error"), "lexical");
        assert_eq!(diagnostic_kind(DiagnosticCode(3002), "error"), "symbol");
        assert_eq!(diagnostic_kind(DiagnosticCode(4010), "error"), "type");
        assert_eq!(diagnostic_kind(DiagnosticCode(5001), "error"), "backend");
        assert_eq!(diagnostic_kind(DiagnosticCode(4010), "warning"), "warning");
    }

    #[test]
    fn missing_input_file_is_an_io_error_not_a_panic() {
        let config = Config { input: PathBuf::from("/nonexistent/does-not-exist.uc"), compile_cpp: false, backend_phase: ucc_gen::Phase::Bodies, verbose: false };
        let mut session = Session::new();
        let err = session.compile(&config).unwrap_err();
        assert!(matches!(err, DriverError::Io { .. }));
        assert_eq!(err.exit_code(), 2);
    }
}
