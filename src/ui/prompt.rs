//! Interactive confirmation

use crate::core::error::ShipResult;
use std::io::{self, BufRead, Write};

/// Ask a yes/no question on stdout, reading the answer from stdin
pub fn confirm(message: &str) -> ShipResult<bool> {
  let stdin = io::stdin();
  let stdout = io::stdout();
  confirm_with(message, &mut stdin.lock(), &mut stdout.lock())
}

/// Ask `message` on `output` and read the answer from `input`
///
/// Only `y` or `yes` (any case) confirm. An empty line or EOF declines.
pub fn confirm_with<R: BufRead, W: Write>(message: &str, input: &mut R, output: &mut W) -> ShipResult<bool> {
  write!(output, "\n{} [y/N]: ", message)?;
  output.flush()?;

  let mut answer = String::new();
  input.read_line(&mut answer)?;

  let answer = answer.trim().to_ascii_lowercase();
  Ok(matches!(answer.as_str(), "y" | "yes"))
}
