use std::io::{self, BufRead, Write};

/// Decides whether a build carries on past warnings
pub trait Confirm {
    fn confirm(&mut self, question: &str) -> io::Result<bool>;
}

/// Always proceeds (`--auto-yes`)
pub struct AutoYes;

impl Confirm for AutoYes {
    fn confirm(&mut self, _question: &str) -> io::Result<bool> {
        println!("Proceeding automatically (--auto-yes specified)");
        Ok(true)
    }
}

/// Asks a Y/N question until it gets an answer. End of input declines.
pub struct Prompt<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompt<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }
}

pub fn stdin_prompt() -> Prompt<io::BufReader<io::Stdin>, io::Stdout> {
    Prompt::new(io::BufReader::new(io::stdin()), io::stdout())
}

impl<R: BufRead, W: Write> Confirm for Prompt<R, W> {
    fn confirm(&mut self, question: &str) -> io::Result<bool> {
        loop {
            write!(self.output, "{} (Y/N): ", question)?;
            self.output.flush()?;

            let mut line = String::new();
            if self.input.read_line(&mut line)? == 0 {
                return Ok(false);
            }

            match line.trim().to_uppercase().as_str() {
                "Y" | "YES" => return Ok(true),
                "N" | "NO" => return Ok(false),
                _ => writeln!(self.output, "Please answer Y or N")?,
            }
        }
    }
}
