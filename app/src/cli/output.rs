use std::io::Write;

use printer::{ColorChoice, Print, PrintCfg, PrintExt, StandardStream};

use crate::result::IOError;

/// Writes results to stdout, with colored expressions if enabled.
pub struct Output {
    stream: StandardStream,
    cfg: PrintCfg,
}

impl Output {
    pub fn stdout(colorize: ColorChoice) -> Self {
        let cfg = PrintCfg { width: usize::MAX, ..Default::default() };
        Self { stream: StandardStream::stdout(colorize), cfg }
    }

    pub fn text(&mut self, text: &str) -> Result<(), IOError> {
        self.stream.write_all(text.as_bytes())?;
        Ok(())
    }

    pub fn print<T: Print>(&mut self, item: &T) -> Result<(), IOError> {
        item.print_colored(&self.cfg, &mut self.stream)?;
        Ok(())
    }

    pub fn comma_separated<T: Print>(&mut self, items: &[T]) -> Result<(), IOError> {
        for (i, item) in items.iter().enumerate() {
            if i > 0 {
                self.text(", ")?;
            }
            self.print(item)?;
        }
        Ok(())
    }

    pub fn newline(&mut self) -> Result<(), IOError> {
        self.text("\n")?;
        self.stream.flush()?;
        Ok(())
    }
}
