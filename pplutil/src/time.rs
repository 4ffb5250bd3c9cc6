use std::io::{stderr, Write};
use std::time::Instant;

use crate::{prettyprint_usize, PROGRESS_FREQUENCY_SECONDS};

pub fn elapsed_seconds(since: Instant) -> f64 {
    let dt = since.elapsed();
    (dt.as_secs() as f64) + (f64::from(dt.subsec_nanos()) * 1e-9)
}

pub fn prettyprint_time(seconds: f64) -> String {
    format!("{:.4}s", seconds)
}

struct Progress {
    label: String,
    processed_items: usize,
    total_items: usize,
    started_at: Instant,
    last_printed_at: Instant,
}

impl Progress {
    fn new(label: &str, total_items: usize) -> Progress {
        Progress {
            label: label.to_string(),
            processed_items: 0,
            total_items,
            started_at: Instant::now(),
            last_printed_at: Instant::now(),
        }
    }

    // Returns when done
    fn next(&mut self, quiet: bool) -> Option<(f64, String)> {
        self.processed_items += 1;
        if self.processed_items > self.total_items {
            panic!(
                "{} is too few items for {} progress",
                prettyprint_usize(self.total_items),
                self.label
            );
        }

        if self.processed_items == self.total_items {
            let elapsed = elapsed_seconds(self.started_at);
            let line = format!(
                "{} ({})... {}",
                self.label,
                prettyprint_usize(self.total_items),
                prettyprint_time(elapsed)
            );
            if !quiet {
                clear_current_line();
                eprintln!("{}", line);
            }
            return Some((elapsed, line));
        } else if elapsed_seconds(self.last_printed_at) >= PROGRESS_FREQUENCY_SECONDS {
            self.last_printed_at = Instant::now();
            if !quiet {
                clear_current_line();
                eprint!(
                    "{}: {}/{}... {}",
                    self.label,
                    prettyprint_usize(self.processed_items),
                    prettyprint_usize(self.total_items),
                    prettyprint_time(elapsed_seconds(self.started_at))
                );
                let _ = stderr().flush();
            }
        }
        None
    }
}

enum StackEntry {
    TimerSpan(TimerSpan),
    Progress(Progress),
}

struct TimerSpan {
    name: String,
    started_at: Instant,
    nested_results: Vec<String>,
}

/// Hierarchical timing of a long batch job. Spans nest; progress counters report throttled
/// status lines. Everything goes to STDERR, and a summary of all spans and warnings is printed
/// when the outermost Timer is dropped.
pub struct Timer {
    results: Vec<String>,
    stack: Vec<StackEntry>,

    outermost_name: String,
    warnings: Vec<String>,
    quiet: bool,
}

impl Timer {
    pub fn new(name: &str) -> Timer {
        Timer::build(name, false)
    }

    /// Tracks everything the same way, but never prints.
    pub fn quiet(name: &str) -> Timer {
        Timer::build(name, true)
    }

    /// A quiet Timer for tests and one-off calls.
    pub fn throwaway() -> Timer {
        Timer::quiet("throwaway")
    }

    fn build(name: &str, quiet: bool) -> Timer {
        let mut t = Timer {
            results: Vec::new(),
            stack: Vec::new(),
            outermost_name: name.to_string(),
            warnings: Vec::new(),
            quiet,
        };
        t.start(name);
        t
    }

    fn println(&self, line: String) {
        if !self.quiet {
            eprintln!("{}", line);
        }
    }

    /// Record a warning, log it immediately, and repeat it in the summary at the end.
    pub fn warn(&mut self, line: String) {
        log::warn!("{}", line);
        self.warnings.push(line);
    }

    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    /// Every line recorded by a finished span or progress counter so far, including ones nested
    /// inside spans that are still running.
    pub fn finished(&self) -> Vec<String> {
        let mut lines = self.results.clone();
        for entry in &self.stack {
            if let StackEntry::TimerSpan(ref s) = entry {
                lines.extend(s.nested_results.iter().cloned());
            }
        }
        lines
    }

    pub fn start(&mut self, name: &str) {
        self.println(format!("{}...", name));
        self.stack.push(StackEntry::TimerSpan(TimerSpan {
            name: name.to_string(),
            started_at: Instant::now(),
            nested_results: Vec::new(),
        }));
    }

    pub fn stop(&mut self, name: &str) {
        let span = match self.stack.pop() {
            Some(StackEntry::TimerSpan(s)) => s,
            _ => panic!("Can't stop({}) while a Progress is top of the stack", name),
        };
        assert_eq!(span.name, name);
        let elapsed = elapsed_seconds(span.started_at);
        let line = format!("{} took {}", name, prettyprint_time(elapsed));

        let padding = "  ".repeat(self.stack.len());
        match self.stack.last_mut() {
            Some(StackEntry::TimerSpan(ref mut s)) => {
                s.nested_results.push(format!("{}- {}", padding, line));
                s.nested_results.extend(span.nested_results);
            }
            Some(_) => unreachable!(),
            None => {
                self.results.push(format!("{}- {}", padding, line));
                self.results.extend(span.nested_results);
            }
        }

        self.println(line);
    }

    pub fn start_iter(&mut self, name: &str, total_items: usize) {
        if total_items == 0 {
            return;
        }
        if let Some(StackEntry::Progress(p)) = self.stack.last() {
            panic!(
                "Can't start_iter({}) while Progress({}) is top of the stack",
                name, p.label
            );
        }

        self.stack
            .push(StackEntry::Progress(Progress::new(name, total_items)));
    }

    pub fn next(&mut self) {
        let quiet = self.quiet;
        let maybe_result =
            if let Some(StackEntry::Progress(ref mut progress)) = self.stack.last_mut() {
                progress.next(quiet)
            } else {
                panic!("Can't next() while a TimerSpan is top of the stack");
            };
        if let Some((_, result)) = maybe_result {
            self.stack.pop();
            self.add_result(result);
        }
    }

    fn add_result(&mut self, line: String) {
        let padding = "  ".repeat(self.stack.len());
        match self.stack.last_mut() {
            Some(StackEntry::TimerSpan(ref mut s)) => {
                s.nested_results.push(format!("{}- {}", padding, line));
            }
            Some(_) => unreachable!(),
            None => {
                self.results.push(format!("{}- {}", padding, line));
            }
        }
    }
}

impl std::ops::Drop for Timer {
    fn drop(&mut self) {
        let stop_name = self.outermost_name.clone();

        // If we're unwinding because of an error or panic, don't further blow up.
        match self.stack.last() {
            Some(StackEntry::TimerSpan(ref s)) if s.name == stop_name => {}
            _ => {
                self.println("dropping Timer early".to_string());
                return;
            }
        }

        self.stop(&stop_name);
        self.println(String::new());
        for line in &self.results {
            self.println(line.to_string());
        }
        self.println(String::new());

        if !self.warnings.is_empty() {
            self.println(format!("{} warnings:", self.warnings.len()));
            for line in &self.warnings {
                self.println(line.to_string());
            }
            self.println(String::new());
        }
    }
}

fn clear_current_line() {
    eprint!("\r");
}
