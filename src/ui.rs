//! Terminal output helpers. Results go to stdout so they can be piped;
//! diagnostics go to stderr.

use console::style;

/// Print a fatal diagnostic.
pub fn display_error(message: &str) {
    eprintln!("{} {}", style("fatal:").red().bold(), message);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_error_does_not_panic() {
        display_error("a diagnostic\nwith a second line");
    }
}
