use std::{
  env::{self, VarError},
  ffi::OsString,
  path::Path,
  process,
};

use log::LevelFilter;
use loxgen_build::{ast_src::EXPR_SRC, Style};

#[macro_use]
extern crate log;

/// `EX_USAGE` from sysexits.h.
const USAGE_EXIT: i32 = 64;

fn main() {
  let args = env::args_os().skip(1).collect::<Vec<OsString>>();
  let [out_dir] = args.as_slice() else {
    eprintln!("Usage: loxgen <output directory>");
    process::exit(USAGE_EXIT);
  };

  let style = match env::var("LOXGEN_STYLE") {
    Ok(style) => style.parse::<Style>().unwrap_or_else(|e| {
      eprintln!("error: LOXGEN_STYLE: {e}");
      process::exit(USAGE_EXIT);
    }),
    Err(VarError::NotUnicode(style)) => {
      eprintln!("error: LOXGEN_STYLE: unknown style {style:?}, expected `visitor` or `plain`");
      process::exit(USAGE_EXIT);
    }
    Err(VarError::NotPresent) => Style::default(),
  };

  if let Err(e) = setup_logging() {
    eprintln!("error: could not set up logging: {e}");
    process::exit(1);
  }

  match loxgen_build::generate(Path::new(out_dir), &EXPR_SRC, style) {
    Ok(path) => info!("generated {}", path.display()),
    Err(e) => {
      eprintln!("error: {e}");
      process::exit(1);
    }
  }
}

fn setup_logging() -> Result<(), log::SetLoggerError> {
  let (level, invalid) = match env::var("LOXGEN_LOG") {
    Ok(level) => match level.parse() {
      Ok(level) => (level, None),
      Err(_) => (LevelFilter::Info, Some(level)),
    },
    Err(VarError::NotUnicode(level)) => (LevelFilter::Info, Some(format!("{level:?}"))),
    Err(VarError::NotPresent) => (LevelFilter::Info, None),
  };

  fern::Dispatch::new()
    .format(|out, message, record| out.finish(format_args!("[{}] {}", record.level(), message)))
    .level(level)
    .chain(std::io::stderr())
    .apply()?;

  if let Some(invalid) = invalid {
    warn!("LOXGEN_LOG: unknown log level `{invalid}`, using `info`");
  }
  Ok(())
}
