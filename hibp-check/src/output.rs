use std::io::{self, Write};

use hibp_range_check::{BatchResult, Status};

/// Writes one line per password in input order: results to `out`, failures to `err`.
pub fn write_report(
    out: &mut impl Write,
    err: &mut impl Write,
    result: &BatchResult,
) -> io::Result<()> {
    for outcome in result {
        match outcome {
            Ok(check) => match check.status() {
                Status::Compromised => writeln!(
                    out,
                    "{}: compromised, found {} times",
                    check.password().as_str(),
                    check.count()
                )?,
                Status::Safe => writeln!(out, "{}: not found", check.password().as_str())?,
            },
            Err(failure) => {
                writeln!(err, "{}: check failed: {}", failure.password.as_str(), failure.error)?
            }
        }
    }
    out.flush()?;
    err.flush()
}
