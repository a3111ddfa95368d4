use std::io::{self, BufRead, Write};
use std::path::Path;

/// Ask whether an existing output file may be overwritten.
///
/// Repeats the question until the answer is `y` or `n` (any case). End of
/// input counts as `n`.
pub fn confirm_overwrite<R: BufRead, W: Write>(path: &Path, input: &mut R, output: &mut W) -> io::Result<bool> {
    let mut line = String::new();
    loop {
        write!(
            output,
            "WARNING: The graph output path \"{}\" already exists. Would you like to overwrite it? [y/n]: ",
            path.display()
        )?;
        output.flush()?;

        line.clear();
        if input.read_line(&mut line)? == 0 {
            return Ok(false);
        }
        match line.trim().to_lowercase().as_str() {
            "y" => return Ok(true),
            "n" => return Ok(false),
            _ => {}
        }
    }
}
