use crate::PrintCfg;

use super::Print;
use super::PrintExt;

pub trait PrintToString {
    fn print_to_string(&self, cfg: Option<&PrintCfg>) -> String;

    /// Render on a single, arbitrarily long line. Used for log messages and diagnostics.
    fn print_trace(&self) -> String {
        let cfg = PrintCfg { width: usize::MAX, ..Default::default() };
        self.print_to_string(Some(&cfg))
    }
}

impl<T: Print> PrintToString for T {
    fn print_to_string(&self, cfg: Option<&PrintCfg>) -> String {
        let mut buf = Vec::new();
        let def = PrintCfg::default();
        let cfg = cfg.unwrap_or(&def);
        self.print_io(cfg, &mut buf).expect("Failed to print to string");
        String::from_utf8_lossy(&buf).into_owned()
    }
}
